//! Quarry Core - A fluent SELECT statement builder
//!
//! Statements are assembled from logical table names, field references and
//! AND/OR condition trees, then rendered against a [`RenderContext`] into SQL
//! text with positional placeholders plus the ordered parameter list.
//!
//! ```
//! use quarry_core::{or, select, Conditions, RenderContext, Value};
//!
//! let query = select("users", "u")
//!     .add_field("u", "id")
//!     .equals("u.active", true)
//!     .group(or().like("u.name", "a%").is_null("u.name"));
//!
//! let rendered = RenderContext::with_prefix("t_").render(&query).unwrap();
//! assert_eq!(
//!     rendered.sql,
//!     "select u.`id` from t_users `u` where u.active = ? and (u.name like ? or u.name is null)"
//! );
//! assert_eq!(rendered.params, vec![Value::Bool(true), Value::from("a%")]);
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod operator;
pub mod render;
pub mod value;

// Re-export main types
pub use builder::{
    Column, Expression, FieldRef, IntoColumns, JoinClause, JoinKind, OrderByClause,
    SelectStatement, Selection, SortDirection,
};
pub use condition::{Combinator, Condition, ConditionGroup, ConditionLeaf, Conditions, Operand};
pub use config::{DatabaseConfig, DialectKind};
pub use dialect::{Dialect, MySql, NoPrefix, Postgres, Sqlite, TableNaming, TablePrefix};
pub use error::{Error, Result};
pub use executor::{Database, ExecutableQuery, StatementExecutor};
pub use operator::{op, Arity, Operator};
pub use render::{QueryBuilder, RenderContext, RenderedQuery};
pub use value::Value;

#[cfg(feature = "sqlite")]
pub use executor::sqlite::SqliteExecutor;

/// Start a SELECT statement on the logical table `table`, aliased `alias`
pub fn select(table: &str, alias: &str) -> SelectStatement {
    SelectStatement::new(table, alias)
}

/// Create an empty group whose children are joined with AND
pub fn and() -> ConditionGroup {
    ConditionGroup::and()
}

/// Create an empty group whose children are joined with OR
pub fn or() -> ConditionGroup {
    ConditionGroup::or()
}
