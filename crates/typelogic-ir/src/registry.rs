//! Type aliases and predicate signatures.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::IrError;

/// Base type names understood without declaration.
pub const PRIMITIVE_TYPES: &[&str] = &["str", "int", "float", "bool", "date"];

/// A named type alias: either another type name or an ordered union of
/// alternative type names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDef {
    Primitive(String),
    Union(Vec<String>),
}

impl TypeDef {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeDef::Primitive(name.into())
    }

    pub fn union(alternatives: Vec<&str>) -> Self {
        TypeDef::Union(alternatives.into_iter().map(String::from).collect())
    }
}

/// Signature of a predicate: an ordered, named, typed argument list.
///
/// The argument order is canonical and defines the positional encoding used
/// by every backend. `parents` declares that each fact of this predicate
/// also entails the parent predicate applied to the matching arguments; the
/// subsumption axioms are synthesized by
/// [`Theory::parent_axioms`](crate::Theory::parent_axioms), not enforced
/// structurally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateDefinition {
    pub predicate: String,
    pub arguments: IndexMap<String, String>,
    pub description: Option<String>,
    pub parents: Vec<String>,
}

impl PredicateDefinition {
    pub fn new(predicate: impl Into<String>, arguments: Vec<(&str, &str)>) -> Self {
        PredicateDefinition {
            predicate: predicate.into(),
            arguments: arguments
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            description: None,
            parents: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parents(mut self, parents: Vec<&str>) -> Self {
        self.parents = parents.into_iter().map(String::from).collect();
        self
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn argument_names(&self) -> impl Iterator<Item = &str> {
        self.arguments.keys().map(String::as_str)
    }
}

/// Registry of type aliases and predicate signatures. Declarations are
/// purely additive: redeclaring a name with an identical definition is a
/// no-op, with a different definition an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    types: IndexMap<String, TypeDef>,
    predicates: IndexMap<String, PredicateDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_type(&mut self, name: impl Into<String>, def: TypeDef) -> Result<(), IrError> {
        let name = name.into();
        match self.types.get(&name) {
            Some(existing) if *existing == def => Ok(()),
            Some(_) => Err(IrError::DuplicateDeclaration { name }),
            None => {
                self.types.insert(name, def);
                Ok(())
            }
        }
    }

    pub fn declare_predicate(&mut self, def: PredicateDefinition) -> Result<(), IrError> {
        match self.predicates.get(&def.predicate) {
            Some(existing) if *existing == def => Ok(()),
            Some(_) => Err(IrError::DuplicateDeclaration {
                name: def.predicate,
            }),
            None => {
                self.predicates.insert(def.predicate.clone(), def);
                Ok(())
            }
        }
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeDef)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn predicate(&self, name: &str) -> Option<&PredicateDefinition> {
        self.predicates.get(name)
    }

    pub fn contains_predicate(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    pub fn predicates(&self) -> impl Iterator<Item = &PredicateDefinition> {
        self.predicates.values()
    }

    /// Unroll a type name through aliases and unions down to base type
    /// names. Resolution is deferred to here so that only backends needing
    /// the concrete scalar kind (e.g. Datalog `.decl`) ever fail on an
    /// unknown type.
    pub fn resolve(&self, name: &str) -> Result<Vec<String>, IrError> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        self.resolve_into(name, &mut stack, &mut out)?;
        Ok(out)
    }

    fn resolve_into(
        &self,
        name: &str,
        stack: &mut Vec<String>,
        out: &mut Vec<String>,
    ) -> Result<(), IrError> {
        if stack.iter().any(|seen| seen == name) {
            return Err(IrError::CyclicTypeAlias {
                name: name.to_string(),
            });
        }
        if let Some(def) = self.types.get(name) {
            stack.push(name.to_string());
            match def {
                TypeDef::Primitive(target) => self.resolve_into(target, stack, out)?,
                TypeDef::Union(alternatives) => {
                    for alt in alternatives {
                        self.resolve_into(alt, stack, out)?;
                    }
                }
            }
            stack.pop();
            return Ok(());
        }
        if PRIMITIVE_TYPES.contains(&name) {
            out.push(name.to_string());
            return Ok(());
        }
        Err(IrError::UnknownType {
            name: name.to_string(),
        })
    }

    /// Merge another registry into this one. Identical redeclarations are
    /// tolerated; differing ones fail.
    pub fn merge(&mut self, other: Registry) -> Result<(), IrError> {
        for (name, def) in other.types {
            self.declare_type(name, def)?;
        }
        for (_, def) in other.predicates {
            self.declare_predicate(def)?;
        }
        Ok(())
    }
}
