//! Relational backend for sift queries.
//!
//! A parsed query is layered onto a base `SELECT` over a caller-supplied set of columns:
//!
//! - key/value terms become predicates produced by per-field [`ClauseGenerator`]s
//! - bare words match any mapped column
//! - groups become derived tables joined back on a key column (anti-joined when negated)
//! - top-level alternatives become a `UNION` of independently filtered copies of the base
//!
//! Fields without a generator never raise: the term degrades to a predicate that matches
//! no rows.
//!
//! # Example
//!
//! ```
//! use sift_sql::{
//!     ColumnClause, ColumnKind, ColumnMappings, ColumnRef, Placeholder, Select,
//!     compile_to_relational,
//! };
//!
//! let mut mappings = ColumnMappings::new();
//! mappings.insert(
//!     "status",
//!     ColumnClause::new(ColumnRef::new("records", "status"), ColumnKind::Text),
//! );
//!
//! let base = Select::from_table("records");
//! let statement =
//!     compile_to_relational(&base, "status:(active|terminated)", &mappings, "records", "id")
//!         .unwrap();
//! let rendered = statement.to_sql(Placeholder::Dollar);
//! assert_eq!(rendered.sql, "SELECT * FROM records WHERE records.status IN ($1, $2)");
//! ```

#![warn(missing_docs)]

mod clause;
mod columns;
mod expr;
mod relational;
mod render;
mod statement;

pub use clause::{ClauseGenerator, ColumnMappings};
pub use columns::{ColumnClause, ColumnKind, coerce_bool};
pub use expr::{ColumnRef, CompareOp, Expr, SqlValue, escape_like};
pub use relational::{RelationalVisitor, compile_to_relational};
pub use render::{Placeholder, RenderedSql};
pub use statement::{Join, JoinKind, Select, Statement, TableSource};
