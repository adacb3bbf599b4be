//! Prolog emitter.
//!
//! Clauses one per line, grouped under `%%` comment headers; variables
//! upper-camel, atoms lowercased, negation-as-failure as `\+ (...)`.
//! Sentences outside the clausal profile surface as `%% untranslatable:`
//! comments rather than being dropped.

use anyhow::Result;
use typelogic_ir::{Arg, SentenceGroup, Term, Theory};

use crate::config::ClauseConfig;
use crate::diagnostics::Diagnostic;
use crate::export::clausal::{render_clause, render_term};
use crate::export::{Backend, EmitResult};
use crate::normalize::{
    clauses_for, normalize_theory, validate_fact, ClauseOptions, NormalizedGroup,
};

/// Theory annotation key that suppresses `query(...)` synthesis.
pub const NO_QUERIES: &str = "no_queries";

pub struct PrologBackend;

fn options() -> ClauseOptions {
    ClauseOptions {
        allow_disjunctive_head: false,
        allow_constraints: true,
    }
}

fn definition_header(theory: &Theory) -> Vec<String> {
    let mut lines = vec!["%% Predicate Definitions".to_string()];
    for pd in theory.registry.predicates() {
        let args = pd
            .arguments
            .iter()
            .map(|(name, typ)| format!("{}: {}", name, typ))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("% {}({})", pd.predicate, args));
    }
    lines
}

fn group_lines(group: &NormalizedGroup, config: &ClauseConfig) -> (Vec<String>, Vec<Diagnostic>) {
    let mut lines = Vec::new();
    let mut diagnostics = group.skipped.clone();
    lines.push(String::new());
    lines.push(format!("%% {}", group.name));
    if let Some(doc) = &group.docstring {
        lines.push(format!("% {}", doc));
    }
    lines.push(String::new());
    for clause in &group.clauses {
        match render_clause(clause, config) {
            Ok(text) => lines.push(format!("{}.", text)),
            Err(err) => {
                diagnostics
                    .push(Diagnostic::from_error(clause.to_string(), &err).with_group(&group.name));
            }
        }
    }
    for diagnostic in &diagnostics {
        lines.push(format!(
            "%% untranslatable: {} ({})",
            diagnostic.subject, diagnostic.message
        ));
    }
    (lines, diagnostics)
}

/// Predicates that no clause body depends on get a `query(...)` directive.
fn query_lines(theory: &Theory, normalized: &[NormalizedGroup], config: &ClauseConfig) -> Vec<String> {
    if theory.annotations.contains_key(NO_QUERIES) {
        return Vec::new();
    }
    let mut depended: Vec<&str> = Vec::new();
    for group in normalized {
        for clause in &group.clauses {
            for lit in &clause.body {
                depended.push(lit.term.predicate.as_str());
            }
        }
    }
    let mut lines = Vec::new();
    for pd in theory.registry.predicates() {
        if depended.contains(&pd.predicate.as_str()) {
            continue;
        }
        let args: Vec<Arg> = pd.argument_names().map(Arg::var).collect();
        let query = Term::new("query", vec![Arg::Term(Term::new(pd.predicate.clone(), args))]);
        if let Ok(text) = render_term(&query, config) {
            lines.push(format!("{}.", text));
        }
    }
    if !lines.is_empty() {
        lines.insert(0, String::new());
    }
    lines
}

impl Backend for PrologBackend {
    fn suffix(&self) -> &'static str {
        "pro"
    }

    fn emit(&self, theory: &Theory) -> Result<EmitResult> {
        let config = ClauseConfig::prolog();
        let normalized = normalize_theory(theory, options());
        let mut diagnostics = Vec::new();
        let mut lines = definition_header(theory);

        for group in &normalized.groups {
            let (group_text, group_diagnostics) = group_lines(group, &config);
            lines.extend(group_text);
            diagnostics.extend(group_diagnostics);
        }

        if !theory.facts.is_empty() {
            lines.push(String::new());
            lines.push("%% Facts".to_string());
            lines.push(String::new());
            for fact in &theory.facts {
                match validate_fact(fact, &theory.registry)
                    .and_then(|()| render_term(fact, &config))
                {
                    Ok(text) => lines.push(format!("{}.", text)),
                    Err(err) => {
                        let diagnostic = Diagnostic::from_error(fact.to_string(), &err);
                        lines.push(format!(
                            "%% untranslatable: {} ({})",
                            diagnostic.subject, diagnostic.message
                        ));
                        diagnostics.push(diagnostic);
                    }
                }
            }
        }

        lines.extend(query_lines(theory, &normalized.groups, &config));

        Ok(EmitResult {
            text: lines.join("\n"),
            diagnostics,
        })
    }

    fn compile_group(&self, theory: &Theory, group: &SentenceGroup) -> Result<String> {
        let config = ClauseConfig::prolog();
        let mut normalized = NormalizedGroup {
            name: group.name.clone(),
            kind: group.kind,
            docstring: group.docstring.clone(),
            clauses: Vec::new(),
            skipped: Vec::new(),
        };
        for sentence in &group.sentences {
            match clauses_for(sentence, &theory.registry, options()) {
                Ok(clauses) => normalized.clauses.extend(clauses),
                Err(err) => normalized.skipped.push(
                    Diagnostic::from_error(sentence.to_string(), &err).with_group(&group.name),
                ),
            }
        }
        let (lines, _) = group_lines(&normalized, &config);
        Ok(lines.join("\n").trim_start_matches('\n').to_string())
    }
}
