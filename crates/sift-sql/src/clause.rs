//! Field name to predicate generator registry.

use std::{collections::BTreeMap, fmt, sync::Arc};

use sift_query::Node;

use crate::expr::Expr;

/// Turns a value node into a predicate over one column.
///
/// `value` is a [`Node::Word`], [`Node::PrefixWord`], [`Node::Phrase`], or a
/// [`Node::ValueGroup`] holding only exact words. Returning `None` marks the value as
/// unsupported for the column; the caller then treats the term as matching no rows.
pub trait ClauseGenerator: Send + Sync {
    /// Builds the predicate matching `value`.
    fn clause(&self, value: &Node) -> Option<Expr>;
}

impl<F> ClauseGenerator for F
where
    F: Fn(&Node) -> Option<Expr> + Send + Sync,
{
    fn clause(&self, value: &Node) -> Option<Expr> {
        self(value)
    }
}

/// Field names mapped to their clause generators.
///
/// Aliases resolve to a field for lookups but are not fields of their own, so iteration
/// visits each generator once. Iteration is in field-name order, which keeps generated SQL
/// stable.
#[derive(Clone, Default)]
pub struct ColumnMappings {
    /// Generators keyed by field name.
    generators: BTreeMap<String, Arc<dyn ClauseGenerator>>,
    /// Alias to field name.
    aliases: BTreeMap<String, String>,
}

impl ColumnMappings {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a generator for a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, generator: impl ClauseGenerator + 'static) {
        self.generators.insert(field.into(), Arc::new(generator));
    }

    /// Registers `alias` as another name for `field`.
    ///
    /// A field registered under the same name takes precedence over the alias.
    pub fn insert_alias(&mut self, alias: impl Into<String>, field: impl Into<String>) {
        self.aliases.insert(alias.into(), field.into());
    }

    /// Returns the generator for a field name or alias.
    pub fn get(&self, field: &str) -> Option<&dyn ClauseGenerator> {
        self.generators
            .get(field)
            .or_else(|| {
                self.aliases
                    .get(field)
                    .and_then(|target| self.generators.get(target))
            })
            .map(|generator| generator.as_ref())
    }

    /// Iterates over fields and their generators, skipping aliases.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn ClauseGenerator)> {
        self.generators
            .iter()
            .map(|(field, generator)| (field.as_str(), generator.as_ref()))
    }

    /// Returns the mapped field names.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    /// Number of mapped fields.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// True when no field is mapped.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl fmt::Debug for ColumnMappings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMappings")
            .field("fields", &self.generators.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}
