//! Serialization of statements into SQL text and an ordered parameter list
//!
//! Rendering is pure: it reads the statement and the context, and produces
//! a fresh [`RenderedQuery`] each time. Clauses are emitted in a fixed order
//! (select, from, joins, where, group by, having, order by, limit/offset)
//! and joined by single spaces. Parameters are collected in the order their
//! placeholders appear in the text, sub-selects included.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::builder::common::{Column, Selection};
use crate::builder::select::SelectStatement;
use crate::condition::{check_raw_params, Condition, ConditionGroup, ConditionLeaf, Operand};
use crate::config::{DatabaseConfig, DialectKind};
use crate::dialect::{Dialect, MySql, NoPrefix, Postgres, Sqlite, TableNaming, TablePrefix};
use crate::{Error, Result, Value};

/// SQL text plus the values bound to its placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Dialect and table naming rule applied while rendering
#[derive(Clone)]
pub struct RenderContext {
    dialect: Arc<dyn Dialect>,
    naming: Arc<dyn TableNaming>,
}

impl RenderContext {
    pub fn new<D, N>(dialect: D, naming: N) -> Self
    where
        D: Dialect + 'static,
        N: TableNaming + 'static,
    {
        Self {
            dialect: Arc::new(dialect),
            naming: Arc::new(naming),
        }
    }

    /// MySQL dialect with a fixed table prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::new(MySql, TablePrefix::new(prefix))
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        let naming = TablePrefix::new(config.table_prefix.clone());
        match config.dialect {
            DialectKind::MySql => Self::new(MySql, naming),
            DialectKind::Postgres => Self::new(Postgres, naming),
            DialectKind::Sqlite => Self::new(Sqlite, naming),
        }
    }

    /// Replace the table naming rule, keeping the dialect
    pub fn with_naming<N>(mut self, naming: N) -> Self
    where
        N: TableNaming + 'static,
    {
        self.naming = Arc::new(naming);
        self
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn physical_name(&self, logical: &str) -> String {
        self.naming.physical_name(logical)
    }

    pub fn render(&self, statement: &SelectStatement) -> Result<RenderedQuery> {
        let mut renderer = Renderer::new(self);
        let sql = renderer.statement(statement)?;
        trace!(
            dialect = self.dialect.name(),
            sql = %sql,
            params = renderer.params.len(),
            "rendered select"
        );
        Ok(RenderedQuery {
            sql,
            params: renderer.params,
        })
    }

    pub fn to_sql(&self, statement: &SelectStatement) -> Result<String> {
        Ok(self.render(statement)?.sql)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(MySql, NoPrefix)
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("dialect", &self.dialect.name())
            .finish_non_exhaustive()
    }
}

/// Core trait for renderable statements
pub trait QueryBuilder {
    fn render(&self, context: &RenderContext) -> Result<RenderedQuery>;

    fn to_sql(&self, context: &RenderContext) -> Result<String> {
        Ok(self.render(context)?.sql)
    }
}

impl QueryBuilder for SelectStatement {
    fn render(&self, context: &RenderContext) -> Result<RenderedQuery> {
        context.render(self)
    }
}

struct Renderer<'a> {
    context: &'a RenderContext,
    params: Vec<Value>,
}

impl<'a> Renderer<'a> {
    fn new(context: &'a RenderContext) -> Self {
        Self {
            context,
            params: Vec::new(),
        }
    }

    fn bind(&mut self, value: &Value) -> String {
        let placeholder = self.context.dialect.placeholder(self.params.len());
        self.params.push(value.clone());
        placeholder
    }

    fn statement(&mut self, statement: &SelectStatement) -> Result<String> {
        if statement.selections.is_empty() {
            return Err(Error::missing_clause(
                "select",
                format!(
                    "statement on '{}' selects no fields or expressions",
                    statement.table
                ),
            ));
        }

        let context = self.context;
        let dialect = context.dialect();
        let mut clauses = Vec::new();

        // 1. SELECT
        let columns = statement
            .selections
            .iter()
            .map(|selection| Self::selection(dialect, statement, selection))
            .collect::<Result<Vec<_>>>()?;
        clauses.push(format!("select {}", columns.join(", ")));

        // 2. FROM
        clauses.push(format!(
            "from {} {}",
            context.physical_name(&statement.table),
            dialect.quote_identifier(&statement.alias)
        ));

        // 3. JOIN
        for join in &statement.joins {
            clauses.push(format!(
                "{} join {} {} on {}",
                join.kind,
                dialect.quote_identifier(&context.physical_name(&join.table)),
                dialect.quote_identifier(&join.alias),
                join.on
            ));
        }

        // 4. WHERE
        let where_sql = self.group(&statement.where_group, false)?;
        if !where_sql.is_empty() {
            clauses.push(format!("where {}", where_sql));
        }

        // 5. GROUP BY
        if !statement.group_by.is_empty() {
            clauses.push(format!("group by {}", statement.group_by.join(", ")));
        }

        // 6. HAVING
        let having_sql = self.group(&statement.having, false)?;
        if !having_sql.is_empty() {
            clauses.push(format!("having {}", having_sql));
        }

        // 7. ORDER BY
        if !statement.order_by.is_empty() {
            let order_parts: Vec<String> = statement
                .order_by
                .iter()
                .map(|clause| format!("{} {}", clause.column, clause.direction))
                .collect();
            clauses.push(format!("order by {}", order_parts.join(", ")));
        }

        // 8. LIMIT / OFFSET
        if let Some(limit) = statement.limit {
            clauses.push(format!("limit {}", limit));
            if let Some(offset) = statement.offset {
                clauses.push(format!("offset {}", offset));
            }
        }

        Ok(clauses.join(" "))
    }

    fn selection(
        dialect: &dyn Dialect,
        statement: &SelectStatement,
        selection: &Selection,
    ) -> Result<String> {
        match selection {
            Selection::Field(field) => {
                if !statement.knows_source(&field.source) {
                    return Err(Error::unknown_source(&field.source));
                }
                let column = match &field.column {
                    Column::Named(name) => {
                        format!("{}.{}", field.source, dialect.quote_identifier(name))
                    }
                    Column::All => format!("{}.*", field.source),
                };
                Ok(match &field.alias {
                    Some(alias) => format!("{} as {}", column, alias),
                    None => column,
                })
            }
            Selection::Expression(expr) => Ok(format!("{} as {}", expr.raw, expr.alias)),
        }
    }

    /// Render a group; only a nested group with two or more parts gets parentheses
    fn group(&mut self, group: &ConditionGroup, nested: bool) -> Result<String> {
        let mut parts = Vec::with_capacity(group.len());
        for child in group.children() {
            let part = self.condition(child)?;
            if !part.is_empty() {
                parts.push(part);
            }
        }

        Ok(match parts.len() {
            0 => String::new(),
            1 => parts.swap_remove(0),
            _ => {
                let joined = parts.join(&format!(" {} ", group.combinator().as_str()));
                if nested {
                    format!("({})", joined)
                } else {
                    joined
                }
            }
        })
    }

    fn condition(&mut self, condition: &Condition) -> Result<String> {
        match condition {
            Condition::Leaf(leaf) => self.leaf(leaf),
            Condition::Group(group) => self.group(group, true),
            Condition::Raw { sql, params } => self.raw(sql, params),
            Condition::Exists { select, negated } => {
                let inner = self.statement(select)?;
                let keyword = if *negated { "not exists" } else { "exists" };
                Ok(format!("{} ({})", keyword, inner))
            }
        }
    }

    /// Swap each `?` for the next placeholder so numbering continues through raw text
    fn raw(&mut self, sql: &str, params: &[Value]) -> Result<String> {
        check_raw_params(sql, params.len())?;
        if sql.trim().is_empty() {
            return Ok(String::new());
        }

        let mut pieces = sql.split('?');
        let mut out = String::with_capacity(sql.len());
        out.push_str(pieces.next().unwrap_or_default());
        for (piece, value) in pieces.zip(params) {
            out.push_str(&self.bind(value));
            out.push_str(piece);
        }
        Ok(out)
    }

    fn leaf(&mut self, leaf: &ConditionLeaf) -> Result<String> {
        let field = leaf.field();
        let operator = leaf.operator();
        match leaf.operand() {
            Operand::None => Ok(format!("{} {}", field, operator)),
            Operand::Value(value) => {
                let placeholder = self.bind(value);
                Ok(format!("{} {} {}", field, operator, placeholder))
            }
            Operand::List(values) => {
                let placeholders: Vec<String> = values.iter().map(|v| self.bind(v)).collect();
                Ok(format!("{} {} ({})", field, operator, placeholders.join(", ")))
            }
            Operand::Select(select) => {
                let inner = self.statement(select)?;
                Ok(format!("{} {} ({})", field, operator, inner))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{and, or, select, Conditions};

    fn render_where(group: ConditionGroup, nested: bool) -> (String, Vec<Value>) {
        let context = RenderContext::default();
        let mut renderer = Renderer::new(&context);
        let sql = renderer.group(&group, nested).unwrap();
        (sql, renderer.params)
    }

    #[test]
    fn test_empty_group_renders_nothing() {
        assert_eq!(render_where(and(), false), (String::new(), vec![]));
        assert_eq!(render_where(or(), true), (String::new(), vec![]));
    }

    #[test]
    fn test_single_child_never_wrapped() {
        let (sql, params) = render_where(and().equals("t.a", 1), true);
        assert_eq!(sql, "t.a = ?");
        assert_eq!(params, vec![Value::I32(1)]);
    }

    #[test]
    fn test_top_level_group_not_wrapped() {
        let (sql, _) = render_where(or().equals("t.a", 1).equals("t.b", 2), false);
        assert_eq!(sql, "t.a = ? or t.b = ?");
    }

    #[test]
    fn test_nested_group_wrapped() {
        let (sql, _) = render_where(or().equals("t.a", 1).equals("t.b", 2), true);
        assert_eq!(sql, "(t.a = ? or t.b = ?)");
    }

    #[test]
    fn test_deep_nesting() {
        let group = and().equals("t.a", 1).group(
            or().equals("t.b", 2)
                .group(and().equals("t.c", 3).equals("t.d", 4)),
        );
        let (sql, params) = render_where(group, false);
        assert_eq!(sql, "t.a = ? and (t.b = ? or (t.c = ? and t.d = ?))");
        assert_eq!(
            params,
            vec![Value::I32(1), Value::I32(2), Value::I32(3), Value::I32(4)]
        );
    }

    #[test]
    fn test_empty_nested_group_skipped() {
        let group = and().equals("t.a", 1).group(or()).is_null("t.b");
        let (sql, _) = render_where(group, false);
        assert_eq!(sql, "t.a = ? and t.b is null");

        // a group whose only child is an empty group renders nothing at all
        let (sql, _) = render_where(and().group(or().group(and())), false);
        assert_eq!(sql, "");
    }

    #[test]
    fn test_in_list_expands_placeholders() {
        let group = and().in_list("t.id", [3, 1, 2]).unwrap();
        let (sql, params) = render_where(group, false);
        assert_eq!(sql, "t.id in (?, ?, ?)");
        assert_eq!(params, vec![Value::I32(3), Value::I32(1), Value::I32(2)]);
    }

    #[test]
    fn test_raw_condition() {
        let group = and()
            .raw("t.created_at > NOW() - INTERVAL ? DAY", [7])
            .unwrap()
            .equals("t.kind", "post");
        let (sql, params) = render_where(group, false);
        assert_eq!(sql, "t.created_at > NOW() - INTERVAL ? DAY and t.kind = ?");
        assert_eq!(params, vec![Value::I32(7), Value::from("post")]);
    }

    #[test]
    fn test_raw_placeholders_follow_postgres_numbering() {
        let context = RenderContext::new(Postgres, TablePrefix::default());
        let query = select("a", "a")
            .add_fields("a")
            .equals("a.x", 1)
            .raw("a.y between ? and ?", [2, 3])
            .unwrap()
            .equals("a.z", 4);
        let rendered = context.render(&query).unwrap();
        assert_eq!(
            rendered.sql,
            r#"select a.* from a "a" where a.x = $1 and a.y between $2 and $3 and a.z = $4"#
        );
        assert_eq!(
            rendered.params,
            vec![Value::I32(1), Value::I32(2), Value::I32(3), Value::I32(4)]
        );
    }

    #[test]
    fn test_raw_params_stay_aligned_with_placeholders() {
        // built directly, bypassing the checks in `raw`
        let blank = and().add(Condition::Raw {
            sql: String::new(),
            params: vec![Value::I32(9)],
        });
        let query = select("a", "a").add_fields("a").group(blank).equals("a.z", 3);
        let err = RenderContext::default().render(&query).unwrap_err();
        assert!(matches!(err, Error::InvalidCondition { .. }));

        let empty = and().add(Condition::Raw {
            sql: " ".to_string(),
            params: Vec::new(),
        });
        let query = select("a", "a").add_fields("a").group(empty).equals("a.z", 3);
        let rendered = RenderContext::default().render(&query).unwrap();
        assert_eq!(rendered.sql, "select a.* from a `a` where a.z = ?");
        assert_eq!(rendered.params, vec![Value::I32(3)]);
    }

    #[test]
    fn test_right_and_full_joins() {
        let query = select("users", "u")
            .add_fields("u")
            .right_join("roles", "r", "r.id = u.role_id")
            .full_join("teams", "m", "m.id = u.team_id");
        assert_eq!(
            RenderContext::new(Postgres, TablePrefix::new("t_"))
                .to_sql(&query)
                .unwrap(),
            r#"select u.* from t_users "u" right join "t_roles" "r" on r.id = u.role_id full outer join "t_teams" "m" on m.id = u.team_id"#
        );
    }

    #[test]
    fn test_exists_sub_select() {
        let orders = select("orders", "o")
            .add_expression("1", "one")
            .unwrap()
            .raw("o.uid = u.uid", Vec::<Value>::new())
            .unwrap();
        let query = select("users", "u").add_fields("u").not_exists(orders);
        assert_eq!(
            RenderContext::with_prefix("t_").to_sql(&query).unwrap(),
            "select u.* from t_users `u` where not exists \
             (select 1 as one from t_orders `o` where o.uid = u.uid)"
        );
    }

    #[test]
    fn test_postgres_numbering_spans_clauses() {
        let context = RenderContext::new(Postgres, TablePrefix::new("t_"));
        let recent = select("posts", "p")
            .add_field("p", "uid")
            .greater_than("p.score", 10);
        let query = select("users", "u")
            .add_field("u", "uid")
            .add_count("*", "n")
            .unwrap()
            .equals("u.active", true)
            .in_select("u.uid", recent)
            .group_by("u.uid")
            .having(and().greater_than("n", 1));
        let rendered = context.render(&query).unwrap();
        assert_eq!(
            rendered.sql,
            r#"select u."uid", COUNT(*) as n from t_users "u" where u.active = $1 and u.uid in (select p."uid" from t_posts "p" where p.score > $2) group by u.uid having n > $3"#
        );
        assert_eq!(
            rendered.params,
            vec![Value::Bool(true), Value::I32(10), Value::I32(1)]
        );
    }

    #[test]
    fn test_param_count_matches_placeholders() {
        let context = RenderContext::new(Postgres, TablePrefix::default());
        let query = select("items", "i")
            .add_fields("i")
            .is_null("i.deleted_at")
            .not_in_list("i.state", ["hidden", "draft"])
            .unwrap()
            .any_of(|g| g.less_than("i.price", 5).is_not_null("i.promo"));
        let rendered = context.render(&query).unwrap();
        assert_eq!(rendered.params.len(), 3);
        assert!(rendered.sql.contains("$3"));
        assert!(!rendered.sql.contains("$4"));
    }

    #[test]
    fn test_naming_rule_applies_at_render_time() {
        let query = select("users", "u")
            .add_fields("u")
            .left_join("roles", "r", "r.id = u.role_id");
        let context = RenderContext::default().with_naming(|name: &str| format!("app_{}", name));
        assert_eq!(
            context.to_sql(&query).unwrap(),
            "select u.* from app_users `u` left join `app_roles` `r` on r.id = u.role_id"
        );
        assert_eq!(
            RenderContext::default().to_sql(&query).unwrap(),
            "select u.* from users `u` left join `roles` `r` on r.id = u.role_id"
        );
    }

    #[test]
    fn test_from_config() {
        let config = DatabaseConfig::new("x_", DialectKind::Sqlite);
        let context = RenderContext::from_config(&config);
        assert_eq!(context.dialect().name(), "SQLite");
        let query = select("a", "a").add_field("a", "id").equals("a.id", 1);
        assert_eq!(
            context.to_sql(&query).unwrap(),
            r#"select a."id" from x_a "a" where a.id = ?"#
        );
    }

    #[test]
    fn test_error_in_sub_select_propagates() {
        let empty = select("posts", "p").equals("p.uid", 1);
        let query = select("users", "u").add_fields("u").in_select("u.uid", empty);
        let err = RenderContext::default().render(&query).unwrap_err();
        assert!(matches!(err, Error::MissingClause { .. }));
    }
}
