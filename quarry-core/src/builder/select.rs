//! SELECT statement builder

use super::common::{
    Column, Expression, FieldRef, IntoColumns, JoinClause, JoinKind, OrderByClause, Selection,
    SortDirection,
};
use crate::condition::{ConditionGroup, Conditions};
use crate::{Error, Result};

/// Accumulated clauses of one SELECT statement
///
/// Every configuration method consumes the statement and returns it, so a
/// statement is built in a single chain. Methods that can introduce an
/// invalid state (a duplicate alias, an unknown sort direction) return
/// `Result<Self>` and fail at that call. The table names stay logical until
/// rendering, where a [`crate::RenderContext`] maps them to physical names.
///
/// # Examples
/// ```
/// use quarry_core::{select, Conditions, RenderContext};
///
/// let query = select("users", "u")
///     .add_fields("u")
///     .equals("u.status", "active")
///     .limit_from(20, 10);
///
/// let rendered = RenderContext::with_prefix("t_").render(&query).unwrap();
/// assert_eq!(
///     rendered.sql,
///     "select u.* from t_users `u` where u.status = ? limit 10 offset 20"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub(crate) table: String,
    pub(crate) alias: String,
    pub(crate) selections: Vec<Selection>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) where_group: ConditionGroup,
    pub(crate) group_by: Vec<String>,
    pub(crate) having: ConditionGroup,
    pub(crate) order_by: Vec<OrderByClause>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
}

impl SelectStatement {
    /// Start a statement reading from the logical `table` under `alias`
    pub fn new(table: &str, alias: &str) -> Self {
        Self {
            table: table.to_string(),
            alias: alias.to_string(),
            selections: Vec::new(),
            joins: Vec::new(),
            where_group: ConditionGroup::and(),
            group_by: Vec::new(),
            having: ConditionGroup::and(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Select one column of `source`, output under its own name
    pub fn add_field(mut self, source: &str, column: &str) -> Self {
        self.selections.push(Selection::Field(FieldRef {
            source: source.to_string(),
            column: Column::Named(column.to_string()),
            alias: None,
        }));
        self
    }

    /// Select one column of `source` under the output alias `alias`
    pub fn add_field_as(mut self, source: &str, column: &str, alias: &str) -> Result<Self> {
        self.ensure_alias_free(alias)?;
        self.selections.push(Selection::Field(FieldRef {
            source: source.to_string(),
            column: Column::Named(column.to_string()),
            alias: Some(alias.to_string()),
        }));
        Ok(self)
    }

    /// Select every column of `source` (`source.*`)
    pub fn add_fields(mut self, source: &str) -> Self {
        self.selections.push(Selection::Field(FieldRef {
            source: source.to_string(),
            column: Column::All,
            alias: None,
        }));
        self
    }

    /// Select a raw SQL expression under `alias`
    pub fn add_expression(mut self, raw: &str, alias: &str) -> Result<Self> {
        self.ensure_alias_free(alias)?;
        self.selections.push(Selection::Expression(Expression {
            raw: raw.to_string(),
            alias: alias.to_string(),
        }));
        Ok(self)
    }

    /// Select `COUNT(expr)` under `alias`
    pub fn add_count(self, expr: &str, alias: &str) -> Result<Self> {
        self.add_expression(&format!("COUNT({})", expr), alias)
    }

    /// Add a JOIN of the given kind
    pub fn join(mut self, kind: JoinKind, table: &str, alias: &str, on: &str) -> Self {
        self.joins.push(JoinClause {
            kind,
            table: table.to_string(),
            alias: alias.to_string(),
            on: on.to_string(),
        });
        self
    }

    pub fn left_join(self, table: &str, alias: &str, on: &str) -> Self {
        self.join(JoinKind::Left, table, alias, on)
    }

    pub fn inner_join(self, table: &str, alias: &str, on: &str) -> Self {
        self.join(JoinKind::Inner, table, alias, on)
    }

    pub fn right_join(self, table: &str, alias: &str, on: &str) -> Self {
        self.join(JoinKind::Right, table, alias, on)
    }

    /// Emitted as-is for every dialect, so MySQL rejects it when executed
    pub fn full_join(self, table: &str, alias: &str, on: &str) -> Self {
        self.join(JoinKind::Full, table, alias, on)
    }

    /// Replace the HAVING condition with a group built separately
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{and, select, Conditions, RenderContext};
    ///
    /// let query = select("orders", "o")
    ///     .add_field("o", "customer")
    ///     .add_count("*", "total")
    ///     .unwrap()
    ///     .group_by("o.customer")
    ///     .having(and().greater_than("total", 5));
    ///
    /// let rendered = RenderContext::default().to_sql(&query).unwrap();
    /// assert!(rendered.ends_with("group by o.customer having total > ?"));
    /// ```
    pub fn having(mut self, group: ConditionGroup) -> Self {
        self.having = group;
        self
    }

    /// Append GROUP BY columns, emitted as given
    pub fn group_by<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.group_by.extend(columns.into_columns());
        self
    }

    /// Append an ORDER BY entry; `direction` is `asc` or `desc` in any case
    pub fn order_by(self, column: &str, direction: &str) -> Result<Self> {
        let direction = direction.parse::<SortDirection>()?;
        Ok(self.order_by_direction(column, direction))
    }

    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by_direction(column, SortDirection::Asc)
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by_direction(column, SortDirection::Desc)
    }

    fn order_by_direction(mut self, column: &str, direction: SortDirection) -> Self {
        self.order_by.push(OrderByClause {
            column: column.to_string(),
            direction,
        });
        self
    }

    /// Limit the result to `count` rows, dropping any offset
    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self.offset = None;
        self
    }

    /// Skip `offset` rows, then return at most `count`
    pub fn limit_from(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some(count);
        self.offset = Some(offset);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn where_group(&self) -> &ConditionGroup {
        &self.where_group
    }

    pub fn having_group(&self) -> &ConditionGroup {
        &self.having
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    /// Whether `alias` names the base table or one of the joins
    pub(crate) fn knows_source(&self, alias: &str) -> bool {
        self.alias == alias || self.joins.iter().any(|join| join.alias == alias)
    }

    fn ensure_alias_free(&self, alias: &str) -> Result<()> {
        if self
            .selections
            .iter()
            .any(|selection| selection.output_alias() == Some(alias))
        {
            return Err(Error::duplicate_alias(alias));
        }
        Ok(())
    }
}

impl Conditions for SelectStatement {
    fn conditions_mut(&mut self) -> &mut ConditionGroup {
        &mut self.where_group
    }
}
