//! ProbLog emitter.
//!
//! Ordinary sentences render exactly as Prolog clauses (with ProbLog's
//! double-quoted strings). The two probabilistic annotation shapes render
//! specially: `Probability(w, s)` becomes `w::<clause>` for every clause of
//! the normalized inner sentence, and `Evidence(s, polarity)` becomes
//! `evidence(<s>, true|false).`. A `query(...)` directive is appended for
//! every declared predicate.

use anyhow::Result;
use typelogic_ir::{Arg, Sentence, SentenceGroup, Term, Theory};

use crate::config::ClauseConfig;
use crate::diagnostics::Diagnostic;
use crate::export::clausal::{format_float, render_clause, render_term};
use crate::export::{Backend, EmitResult};
use crate::normalize::{clauses_for, validate_fact, ClauseOptions};

pub struct ProblogBackend;

fn options() -> ClauseOptions {
    ClauseOptions {
        allow_disjunctive_head: true,
        allow_constraints: true,
    }
}

fn peel_forall(sentence: &Sentence) -> &Sentence {
    match sentence {
        Sentence::Forall { body, .. } => peel_forall(body),
        other => other,
    }
}

fn sentence_lines(
    sentence: &Sentence,
    theory: &Theory,
    config: &ClauseConfig,
    lines: &mut Vec<String>,
) -> Result<(), Diagnostic> {
    let core = peel_forall(sentence);
    match core {
        Sentence::Probability { weight, inner } => {
            let clauses = clauses_for(inner, &theory.registry, options())
                .map_err(|err| Diagnostic::from_error(sentence.to_string(), &err))?;
            for clause in clauses {
                let text = render_clause(&clause, config)
                    .map_err(|err| Diagnostic::from_error(clause.to_string(), &err))?;
                lines.push(format!("{}::{}.", format_float(*weight), text));
            }
            Ok(())
        }
        Sentence::Evidence { positive, inner } => {
            let term = peel_forall(inner).as_term().ok_or_else(|| {
                Diagnostic::error(
                    sentence.to_string(),
                    "evidence must wrap a single atomic sentence",
                )
            })?;
            let text = render_term(term, config)
                .map_err(|err| Diagnostic::from_error(term.to_string(), &err))?;
            lines.push(format!("evidence({}, {}).", text, positive));
            Ok(())
        }
        _ => {
            let clauses = clauses_for(sentence, &theory.registry, options())
                .map_err(|err| Diagnostic::from_error(sentence.to_string(), &err))?;
            for clause in clauses {
                let text = render_clause(&clause, config)
                    .map_err(|err| Diagnostic::from_error(clause.to_string(), &err))?;
                lines.push(format!("{}.", text));
            }
            Ok(())
        }
    }
}

impl Backend for ProblogBackend {
    fn suffix(&self) -> &'static str {
        "problog"
    }

    fn emit(&self, theory: &Theory) -> Result<EmitResult> {
        let config = ClauseConfig::problog();
        let mut lines = Vec::new();
        let mut diagnostics = Vec::new();

        for group in &theory.groups {
            for sentence in &group.sentences {
                if let Err(diagnostic) = sentence_lines(sentence, theory, &config, &mut lines) {
                    diagnostics.push(diagnostic.with_group(&group.name));
                }
            }
        }
        for sentence in &theory.parent_axioms() {
            if let Err(diagnostic) = sentence_lines(sentence, theory, &config, &mut lines) {
                diagnostics.push(diagnostic.with_group("inferred"));
            }
        }

        for fact in &theory.facts {
            match validate_fact(fact, &theory.registry).and_then(|()| render_term(fact, &config)) {
                Ok(text) => lines.push(format!("{}.", text)),
                Err(err) => diagnostics.push(Diagnostic::from_error(fact.to_string(), &err)),
            }
        }

        for pd in theory.registry.predicates() {
            let args: Vec<Arg> = pd.argument_names().map(Arg::var).collect();
            let query = Term::new(
                "query",
                vec![Arg::Term(Term::new(pd.predicate.clone(), args))],
            );
            if let Ok(text) = render_term(&query, &config) {
                lines.push(format!("{}.", text));
            }
        }

        for diagnostic in &diagnostics {
            lines.push(format!("% skipped: {}", diagnostic.format()));
        }

        Ok(EmitResult {
            text: lines.join("\n"),
            diagnostics,
        })
    }

    fn compile_group(&self, theory: &Theory, group: &SentenceGroup) -> Result<String> {
        let config = ClauseConfig::problog();
        let mut lines = vec![format!("% {}", group.name)];
        for sentence in &group.sentences {
            if let Err(diagnostic) = sentence_lines(sentence, theory, &config, &mut lines) {
                lines.push(format!("% skipped: {}", diagnostic.format()));
            }
        }
        Ok(lines.join("\n"))
    }
}
