//! sift: compile search queries from the command line.
//!
//! sift turns a compact search syntax (`status:(active|terminated) -tag:test "core link"`)
//! into either a PostgreSQL `tsquery` expression or a parameterized SQL statement over the
//! tables described in `sift.toml`.

#![warn(missing_docs)]

pub mod cli;
