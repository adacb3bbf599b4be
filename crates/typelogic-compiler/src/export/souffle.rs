//! Souffle/Datalog emitter.
//!
//! Synthesizes `.type` declarations for every alias and `.decl` for every
//! predicate (scalar types mapped to `symbol`/`number`), then renders the
//! normalized, stratified clauses with Datalog lexical rules. Clause shapes
//! Datalog cannot express (body disjunction, constraints, function terms)
//! are pre-split by the normalizer or skipped with a diagnostic.

use anyhow::Result;
use typelogic_ir::{IrError, Registry, SentenceGroup, Theory, TypeDef};

use crate::config::ClauseConfig;
use crate::diagnostics::Diagnostic;
use crate::export::clausal::{render_clause, render_term};
use crate::export::{Backend, EmitResult};
use crate::normalize::{clauses_for, normalize_theory, stratify, validate_fact, ClauseOptions};

pub struct SouffleBackend;

fn options() -> ClauseOptions {
    ClauseOptions {
        allow_disjunctive_head: false,
        allow_constraints: false,
    }
}

/// Datalog scalar kind of a base type name.
fn scalar_kind(base: &str) -> &'static str {
    match base {
        "int" | "float" => "number",
        _ => "symbol",
    }
}

/// Souffle type names are capitalized.
fn type_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn type_declarations(registry: &Registry) -> (Vec<String>, Vec<Diagnostic>) {
    let mut lines = Vec::new();
    let mut diagnostics = Vec::new();
    for (name, def) in registry.types() {
        let resolved: Result<Vec<String>, IrError> = match def {
            TypeDef::Primitive(target) => registry
                .resolve(target)
                .map(|bases| bases.iter().map(|b| scalar_kind(b).to_string()).collect()),
            TypeDef::Union(alternatives) => alternatives
                .iter()
                .map(|alt| registry.resolve(alt).map(|bases| {
                    bases
                        .iter()
                        .map(|b| scalar_kind(b).to_string())
                        .collect::<Vec<_>>()
                }))
                .collect::<Result<Vec<_>, _>>()
                .map(|nested| nested.into_iter().flatten().collect()),
        };
        match resolved {
            Ok(mut kinds) => {
                kinds.dedup();
                lines.push(format!(".type {} = {}", type_name(name), kinds.join(" | ")));
            }
            Err(err) => diagnostics.push(Diagnostic::from_error(name.to_string(), &err)),
        }
    }
    (lines, diagnostics)
}

fn relation_declarations(registry: &Registry) -> (Vec<String>, Vec<Diagnostic>) {
    let mut lines = Vec::new();
    let mut diagnostics = Vec::new();
    for pd in registry.predicates() {
        let mut args = Vec::new();
        let mut failed = None;
        for (arg, typ) in &pd.arguments {
            if registry.type_def(typ).is_some() {
                args.push(format!("{}: {}", arg.to_lowercase(), type_name(typ)));
                continue;
            }
            match registry.resolve(typ) {
                Ok(bases) => {
                    args.push(format!("{}: {}", arg.to_lowercase(), scalar_kind(&bases[0])))
                }
                Err(err) => {
                    failed = Some(Diagnostic::from_error(
                        format!("{}({}: {})", pd.predicate, arg, typ),
                        &err,
                    ));
                    break;
                }
            }
        }
        match failed {
            Some(diagnostic) => diagnostics.push(diagnostic),
            None => lines.push(format!(".decl {}({})", pd.predicate, args.join(", "))),
        }
    }
    (lines, diagnostics)
}

impl Backend for SouffleBackend {
    fn suffix(&self) -> &'static str {
        "dl"
    }

    fn emit(&self, theory: &Theory) -> Result<EmitResult> {
        let config = ClauseConfig::souffle();
        let mut lines = Vec::new();
        let mut diagnostics = Vec::new();

        let (type_lines, type_diagnostics) = type_declarations(&theory.registry);
        lines.extend(type_lines);
        diagnostics.extend(type_diagnostics);

        let (decl_lines, decl_diagnostics) = relation_declarations(&theory.registry);
        lines.extend(decl_lines);
        diagnostics.extend(decl_diagnostics);

        let normalized = normalize_theory(theory, options());
        diagnostics.extend(normalized.diagnostics());

        let (kept, dropped) = stratify(normalized.clauses().cloned().collect());
        for clause in dropped {
            diagnostics.push(Diagnostic::warning(
                clause.to_string(),
                "dropped to keep negation stratifiable",
            ));
        }
        for clause in &kept {
            match render_clause(clause, &config) {
                Ok(text) => lines.push(format!("{}.", text)),
                Err(err) => diagnostics.push(Diagnostic::from_error(clause.to_string(), &err)),
            }
        }

        for fact in &theory.facts {
            match validate_fact(fact, &theory.registry).and_then(|()| render_term(fact, &config)) {
                Ok(text) => lines.push(format!("{}.", text)),
                Err(err) => diagnostics.push(Diagnostic::from_error(fact.to_string(), &err)),
            }
        }

        for diagnostic in &diagnostics {
            lines.push(format!("// skipped: {}", diagnostic.format()));
        }

        Ok(EmitResult {
            text: lines.join("\n"),
            diagnostics,
        })
    }

    fn compile_group(&self, theory: &Theory, group: &SentenceGroup) -> Result<String> {
        let config = ClauseConfig::souffle();
        let mut lines = vec![format!("// {}", group.name)];
        for sentence in &group.sentences {
            match clauses_for(sentence, &theory.registry, options()) {
                Ok(clauses) => {
                    for clause in clauses {
                        match render_clause(&clause, &config) {
                            Ok(text) => lines.push(format!("{}.", text)),
                            Err(err) => {
                                lines.push(format!("// skipped: {}: {}", clause, err))
                            }
                        }
                    }
                }
                Err(err) => lines.push(format!("// skipped: {}: {}", sentence, err)),
            }
        }
        Ok(lines.join("\n"))
    }
}
