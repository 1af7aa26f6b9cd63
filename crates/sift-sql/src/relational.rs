//! Relational backend: layers a parsed query onto a base `SELECT`.

use std::slice;

use sift_query::{Node, ParseError, parse};
use tracing::{debug, trace};

use crate::{
    clause::{ClauseGenerator, ColumnMappings},
    expr::{ColumnRef, Expr},
    statement::{Join, JoinKind, Select, Statement, TableSource},
};

/// Compiles query trees into statements over a base select.
///
/// A visitor numbers the derived tables it creates (`group_1`, `group_2`, ...), so a fresh
/// one should be used per query.
pub struct RelationalVisitor<'a> {
    /// Statement every branch starts from.
    base: &'a Select,
    /// Field generators.
    mappings: &'a ColumnMappings,
    /// Table or alias the join key is qualified with.
    root_entity: String,
    /// Column joining grouped sub-queries back to the root.
    join_key: String,
    /// Derived tables created so far.
    groups: usize,
}

impl<'a> RelationalVisitor<'a> {
    /// Creates a visitor.
    pub fn new(
        base: &'a Select,
        mappings: &'a ColumnMappings,
        root_entity: impl Into<String>,
        join_key: impl Into<String>,
    ) -> Self {
        Self {
            base,
            mappings,
            root_entity: root_entity.into(),
            join_key: join_key.into(),
            groups: 0,
        }
    }

    /// Compiles a node into a statement.
    ///
    /// A `Query` with several alternatives becomes a `UNION` of independently filtered copies
    /// of the base; an empty query yields the base unchanged.
    pub fn visit(&mut self, node: &Node) -> Statement {
        match node {
            Node::Query(ands) => {
                let mut selects: Vec<Select> = Vec::with_capacity(ands.len());
                for (branch, and) in ands.iter().enumerate() {
                    let select = self.visit_and(and);
                    trace!(branch, sql = %Statement::from(select.clone()), "compiled branch");
                    selects.push(select);
                }
                match selects.len() {
                    0 => Statement::Select(self.base.clone()),
                    1 => Statement::Select(selects.remove(0)),
                    _ => Statement::Union(selects),
                }
            }
            other => Statement::Select(self.visit_and(other)),
        }
    }

    /// Applies each term of an and-expression to a copy of the base.
    fn visit_and(&mut self, node: &Node) -> Select {
        let terms = match node {
            Node::AndExpression(terms) => terms.as_slice(),
            other => slice::from_ref(other),
        };
        let mut select = self.base.clone();
        for term in terms {
            select = self.apply_term(select, term, false);
        }
        select
    }

    /// Narrows `select` by one term.
    fn apply_term(&mut self, select: Select, term: &Node, negated: bool) -> Select {
        if term.is_vacuous() {
            return if negated {
                select.and_where(Expr::FALSE)
            } else {
                select
            };
        }

        match term {
            Node::Negation(inner) => self.apply_term(select, inner, !negated),
            Node::Group(query) => self.join_group(select, query, negated),
            Node::Query(_) | Node::AndExpression(_) => self.join_group(select, term, negated),
            Node::KvTerm { key, value } => {
                let predicate = self.field_predicate(key, value, negated);
                select.and_where(predicate)
            }
            Node::Word(_) | Node::PrefixWord(_) | Node::Phrase(_) | Node::ValueGroup(_) => {
                let predicate = self.any_field_predicate(term, negated);
                select.and_where(predicate)
            }
        }
    }

    /// Joins a grouped sub-query back onto `select` by the join key.
    ///
    /// The sub-query selects only the root key. A negated group becomes an anti-join: a left
    /// outer join keeping the rows with no partner.
    fn join_group(&mut self, select: Select, query: &Node, negated: bool) -> Select {
        self.groups += 1;
        let alias = format!("group_{}", self.groups);
        let root_key = ColumnRef::new(self.root_entity.as_str(), self.join_key.as_str());
        let group_key = ColumnRef::new(alias.as_str(), self.join_key.as_str());

        let sub = self.visit(query).project(slice::from_ref(&root_key));
        let join = Join {
            kind: if negated {
                JoinKind::LeftOuter
            } else {
                JoinKind::Inner
            },
            source: TableSource::Derived {
                query: Box::new(sub),
                alias,
            },
            on: Expr::column(group_key.clone()).equals(Expr::column(root_key)),
        };

        let select = select.join(join);
        if negated {
            select.and_where(Expr::column(group_key).is_null())
        } else {
            select
        }
    }

    /// Predicate for `key:value`.
    ///
    /// A key that is not a plain word adds no filter. Unknown fields and values the field
    /// cannot express yield `FALSE`.
    fn field_predicate(&self, key: &Node, value: &Node, negated: bool) -> Expr {
        let Node::Word(field) = key else {
            debug!(key = %key.to_query_string(), "non-word field key; term skipped");
            return Expr::TRUE;
        };
        let Some(generator) = self.mappings.get(field) else {
            debug!(field = %field, "unknown field; term matches nothing");
            return Expr::FALSE;
        };

        let predicate = match value {
            Node::ValueGroup(values) => value_group_predicate(generator, values, negated),
            other => generator
                .clause(other)
                .map(|expr| if negated { expr.negate() } else { expr }),
        };
        predicate.unwrap_or_else(|| {
            debug!(
                field = %field,
                value = %value.to_query_string(),
                "value not supported by field; term matches nothing"
            );
            Expr::FALSE
        })
    }

    /// Predicate for an unqualified value: a match on any mapped field.
    fn any_field_predicate(&self, value: &Node, negated: bool) -> Expr {
        let matches = Expr::or(
            self.mappings
                .iter()
                .filter_map(|(_, generator)| generator.clause(value)),
        );
        if negated { matches.negate() } else { matches }
    }
}

/// Predicate for `field:(v1|v2|...)`.
///
/// Exact words collapse into one `IN` list (`NOT IN` when negated). Prefix words and phrases
/// become an OR of starts-with matches, or under negation the AND of their negations. The two
/// parts are ANDed together.
fn value_group_predicate(
    generator: &dyn ClauseGenerator,
    values: &[Node],
    negated: bool,
) -> Option<Expr> {
    let (exact, partial): (Vec<&Node>, Vec<&Node>) =
        values.iter().partition(|value| matches!(value, Node::Word(_)));

    let mut parts = Vec::with_capacity(2);
    if !exact.is_empty() {
        let words = Node::ValueGroup(exact.into_iter().cloned().collect());
        let in_list = generator.clause(&words)?;
        parts.push(if negated { in_list.negate() } else { in_list });
    }
    if !partial.is_empty() {
        let matches = partial
            .into_iter()
            .map(|value| generator.clause(value))
            .collect::<Option<Vec<_>>>()?;
        parts.push(if negated {
            Expr::and(matches.into_iter().map(Expr::negate))
        } else {
            Expr::or(matches)
        });
    }

    Some(Expr::and(parts))
}

/// Parses a query string and layers it onto `base`.
///
/// `root_entity` and `join_key` name the column grouped sub-queries are joined back on.
pub fn compile_to_relational(
    base: &Select,
    input: &str,
    mappings: &ColumnMappings,
    root_entity: &str,
    join_key: &str,
) -> Result<Statement, ParseError> {
    let query = parse(input)?;
    let statement = RelationalVisitor::new(base, mappings, root_entity, join_key).visit(&query);
    debug!(query = input, sql = %statement, "compiled relational query");
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        columns::{ColumnClause, ColumnKind},
        expr::SqlValue,
        render::Placeholder,
    };

    fn mappings() -> ColumnMappings {
        let mut mappings = ColumnMappings::new();
        mappings.insert(
            "status",
            ColumnClause::new(ColumnRef::new("records", "status"), ColumnKind::Text),
        );
        mappings.insert(
            "name",
            ColumnClause::new(ColumnRef::new("records", "display_name"), ColumnKind::Text),
        );
        mappings.insert(
            "active",
            ColumnClause::new(ColumnRef::new("records", "is_active"), ColumnKind::Boolean),
        );
        mappings
    }

    fn compile(input: &str) -> Statement {
        compile_to_relational(
            &Select::from_table("records"),
            input,
            &mappings(),
            "records",
            "id",
        )
        .unwrap()
    }

    fn sql(input: &str) -> String {
        compile(input).to_sql(Placeholder::Dollar).sql
    }

    fn text(value: &str) -> SqlValue {
        SqlValue::Text(value.to_string())
    }

    #[test]
    fn empty_query_is_base() {
        assert_eq!(sql(""), "SELECT * FROM records");
        assert_eq!(sql("()"), "SELECT * FROM records");
    }

    #[test]
    fn field_equality() {
        let rendered = compile("status:active").to_sql(Placeholder::Dollar);
        assert_eq!(
            rendered.sql,
            "SELECT * FROM records WHERE records.status = $1"
        );
        assert_eq!(rendered.params, vec![text("active")]);
    }

    #[test]
    fn negated_field() {
        assert_eq!(
            sql("-status:active"),
            "SELECT * FROM records WHERE records.status <> $1"
        );
        assert_eq!(
            sql("-name:jo*"),
            "SELECT * FROM records WHERE records.display_name NOT LIKE $1 ESCAPE '\\'"
        );
    }

    #[test]
    fn prefix_and_phrase_values() {
        let rendered = compile("name:jo*").to_sql(Placeholder::Dollar);
        assert_eq!(
            rendered.sql,
            "SELECT * FROM records WHERE records.display_name LIKE $1 ESCAPE '\\'"
        );
        assert_eq!(rendered.params, vec![text("jo%")]);

        let rendered = compile("name:\"jo sm\"").to_sql(Placeholder::Dollar);
        assert_eq!(rendered.params, vec![text("jo sm%")]);
    }

    #[test]
    fn value_group_is_in_list() {
        let rendered = compile("status:(active|terminated)").to_sql(Placeholder::Dollar);
        assert_eq!(
            rendered.sql,
            "SELECT * FROM records WHERE records.status IN ($1, $2)"
        );
        assert_eq!(rendered.params, vec![text("active"), text("terminated")]);

        assert_eq!(
            sql("-status:(active|terminated)"),
            "SELECT * FROM records WHERE records.status NOT IN ($1, $2)"
        );
    }

    #[test]
    fn value_group_with_prefixes() {
        assert_eq!(
            sql("status:(active|term*)"),
            "SELECT * FROM records WHERE records.status IN ($1) AND records.status LIKE $2 ESCAPE '\\'"
        );
        assert_eq!(
            sql("-status:(active|term*)"),
            "SELECT * FROM records WHERE records.status NOT IN ($1) AND records.status NOT LIKE $2 ESCAPE '\\'"
        );
        assert_eq!(
            sql("status:(active|a*|\"core li\")"),
            "SELECT * FROM records WHERE records.status IN ($1) AND \
             (records.status LIKE $2 ESCAPE '\\' OR records.status LIKE $3 ESCAPE '\\')"
        );
    }

    #[test]
    fn unknown_field_fails_closed() {
        let rendered = compile("missing:x status:active").to_sql(Placeholder::Dollar);
        assert_eq!(
            rendered.sql,
            "SELECT * FROM records WHERE FALSE AND records.status = $1"
        );
        assert_eq!(rendered.params, vec![text("active")]);
        assert_eq!(sql("-missing:x"), "SELECT * FROM records WHERE FALSE");
    }

    #[test]
    fn non_word_key_adds_no_filter() {
        let rendered = compile("\"a b\":x status:a").to_sql(Placeholder::Dollar);
        assert_eq!(
            rendered.sql,
            "SELECT * FROM records WHERE records.status = $1"
        );
        assert_eq!(rendered.params, vec![text("a")]);
        assert_eq!(sql("-\"a b\":x"), "SELECT * FROM records");
        assert_eq!(sql("\"a b\":x"), "SELECT * FROM records");
    }

    #[test]
    fn unsupported_value_fails_closed() {
        assert_eq!(sql("active:maybe"), "SELECT * FROM records WHERE FALSE");
        assert_eq!(
            sql("active:yes"),
            "SELECT * FROM records WHERE records.is_active = $1"
        );
    }

    #[test]
    fn unqualified_word_matches_any_field() {
        let rendered = compile("jo").to_sql(Placeholder::Dollar);
        assert_eq!(
            rendered.sql,
            "SELECT * FROM records WHERE records.display_name = $1 OR records.status = $2"
        );
        assert_eq!(rendered.params, vec![text("jo"), text("jo")]);
    }

    #[test]
    fn negated_unqualified_word() {
        assert_eq!(
            sql("-jo*"),
            "SELECT * FROM records WHERE NOT (records.display_name LIKE $1 ESCAPE '\\' OR \
             records.status LIKE $2 ESCAPE '\\')"
        );
    }

    #[test]
    fn unqualified_boolean_word() {
        assert_eq!(
            sql("yes"),
            "SELECT * FROM records WHERE records.is_active = $1 OR \
             records.display_name = $2 OR records.status = $3"
        );
    }

    #[test]
    fn and_expression_accumulates() {
        assert_eq!(
            sql("status:active name:jo*"),
            "SELECT * FROM records WHERE records.status = $1 AND \
             records.display_name LIKE $2 ESCAPE '\\'"
        );
    }

    #[test]
    fn top_level_or_is_union() {
        let rendered = compile("status:active | status:closed").to_sql(Placeholder::Dollar);
        assert_eq!(
            rendered.sql,
            "SELECT * FROM records WHERE records.status = $1 UNION \
             SELECT * FROM records WHERE records.status = $2"
        );
        assert_eq!(rendered.params, vec![text("active"), text("closed")]);
    }

    #[test]
    fn group_is_inner_join() {
        assert_eq!(
            sql("name:jo* (status:a | status:b)"),
            "SELECT records.* FROM records INNER JOIN (SELECT records.id FROM records \
             WHERE records.status = $1 UNION SELECT records.id FROM records WHERE \
             records.status = $2) AS group_1 ON group_1.id = records.id WHERE \
             records.display_name LIKE $3 ESCAPE '\\'"
        );
    }

    #[test]
    fn negated_group_is_anti_join() {
        assert_eq!(
            sql("-(status:a name:b)"),
            "SELECT records.* FROM records LEFT OUTER JOIN (SELECT records.id FROM records \
             WHERE records.status = $1 AND records.display_name = $2) AS group_1 \
             ON group_1.id = records.id WHERE group_1.id IS NULL"
        );
    }

    #[test]
    fn nested_groups_get_distinct_aliases() {
        let rendered = sql("(a (b | c))");
        assert!(rendered.contains("AS group_1"));
        assert!(rendered.contains("AS group_2"));
    }

    #[test]
    fn negated_empty_group_matches_nothing() {
        assert_eq!(sql("status:a -()"), "SELECT * FROM records WHERE records.status = $1 AND FALSE");
    }

    #[test]
    fn empty_phrase_is_vacuous() {
        assert_eq!(sql("\"\" status:a"), "SELECT * FROM records WHERE records.status = $1");
    }

    #[test]
    fn base_filter_is_kept() {
        let base = Select::from_table("records")
            .and_where(Expr::column(ColumnRef::new("records", "deleted")).is_null());
        let statement =
            compile_to_relational(&base, "status:a | status:b", &mappings(), "records", "id")
                .unwrap();
        assert_eq!(
            statement.to_string(),
            "SELECT * FROM records WHERE records.deleted IS NULL AND records.status = 'a' \
             UNION SELECT * FROM records WHERE records.deleted IS NULL AND records.status = 'b'"
        );
    }

    #[test]
    fn closure_generators() {
        let mut mappings = ColumnMappings::new();
        mappings.insert("tag", |value: &Node| {
            let word = value.text()?;
            Some(Expr::column(ColumnRef::new("tags", "name")).equals(Expr::text(word)))
        });
        let statement = compile_to_relational(
            &Select::from_table("records"),
            "tag:x -tag:\"a b\"",
            &mappings,
            "records",
            "id",
        )
        .unwrap();
        assert_eq!(
            statement.to_string(),
            "SELECT * FROM records WHERE tags.name = 'x' AND FALSE"
        );
    }

    #[test]
    fn parse_errors_propagate() {
        let err = compile_to_relational(
            &Select::from_table("records"),
            "tag:()",
            &mappings(),
            "records",
            "id",
        )
        .unwrap_err();
        assert!(err.to_string().contains("Value term in KVTerm can not be empty"));
    }
}
