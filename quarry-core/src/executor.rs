//! Statement execution interface

use crate::builder::select::SelectStatement;
use crate::condition::ConditionGroup;
use crate::config::DatabaseConfig;
use crate::render::{RenderContext, RenderedQuery};
use crate::{Error, Result, Value};
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;

/// Runs rendered SQL against a database connection
///
/// Result rows are handed back through serde, so any `DeserializeOwned`
/// type whose fields match the selected column names can receive them.
pub trait StatementExecutor: Send + Sync {
    /// Execute a statement that returns no rows and report the affected row count
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = Result<u64>> + Send;

    /// Execute a query that returns multiple rows
    fn fetch_all<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;

    /// Execute a query that returns an optional row
    fn fetch_optional<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;

    /// Execute a query and return the first column of its first row
    fn fetch_scalar<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;
}

/// An executor paired with the context its statements are rendered in
///
/// # Examples
/// ```ignore
/// let db = Database::new(executor, &DatabaseConfig::from_json(r#"{"table_prefix": "t_"}"#)?);
/// let total: Option<i64> = db
///     .select("users", "u")
///     .add_count("*", "count")?
///     .fetch_field(&db)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database<E> {
    executor: E,
    context: RenderContext,
}

impl<E> Database<E> {
    pub fn new(executor: E, config: &DatabaseConfig) -> Self {
        Self::with_context(executor, RenderContext::from_config(config))
    }

    pub fn with_context(executor: E, context: RenderContext) -> Self {
        Self { executor, context }
    }

    /// Start a SELECT statement on the logical table `table`
    pub fn select(&self, table: &str, alias: &str) -> SelectStatement {
        SelectStatement::new(table, alias)
    }

    pub fn and(&self) -> ConditionGroup {
        ConditionGroup::and()
    }

    pub fn or(&self) -> ConditionGroup {
        ConditionGroup::or()
    }

    pub fn render(&self, statement: &SelectStatement) -> Result<RenderedQuery> {
        self.context.render(statement)
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    fn prepare(&self, statement: &SelectStatement) -> Result<RenderedQuery> {
        let rendered = self.render(statement)?;
        debug!(sql = %rendered.sql, params = ?rendered.params, "executing select");
        Ok(rendered)
    }
}

/// Extension trait running a statement through a [`Database`]
pub trait ExecutableQuery {
    /// Execute the query and return all results
    fn fetch_all<T, E>(&self, db: &Database<E>) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        E: StatementExecutor,
        T: DeserializeOwned + Send + Unpin;

    /// Execute the query and return the first result, failing with [`Error::NoRows`]
    fn fetch_one<T, E>(&self, db: &Database<E>) -> impl Future<Output = Result<T>> + Send
    where
        E: StatementExecutor,
        T: DeserializeOwned + Send + Unpin;

    /// Execute the query and return an optional result
    fn fetch_optional<T, E>(
        &self,
        db: &Database<E>,
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        E: StatementExecutor,
        T: DeserializeOwned + Send + Unpin;

    /// Execute the query and return the first column of the first row
    fn fetch_field<T, E>(&self, db: &Database<E>) -> impl Future<Output = Result<Option<T>>> + Send
    where
        E: StatementExecutor,
        T: DeserializeOwned + Send + Unpin;
}

impl ExecutableQuery for SelectStatement {
    async fn fetch_all<T, E>(&self, db: &Database<E>) -> Result<Vec<T>>
    where
        E: StatementExecutor,
        T: DeserializeOwned + Send + Unpin,
    {
        let rendered = db.prepare(self)?;
        db.executor.fetch_all(&rendered.sql, &rendered.params).await
    }

    async fn fetch_one<T, E>(&self, db: &Database<E>) -> Result<T>
    where
        E: StatementExecutor,
        T: DeserializeOwned + Send + Unpin,
    {
        let rendered = db.prepare(self)?;
        db.executor
            .fetch_optional(&rendered.sql, &rendered.params)
            .await?
            .ok_or(Error::NoRows)
    }

    async fn fetch_optional<T, E>(&self, db: &Database<E>) -> Result<Option<T>>
    where
        E: StatementExecutor,
        T: DeserializeOwned + Send + Unpin,
    {
        let rendered = db.prepare(self)?;
        db.executor
            .fetch_optional(&rendered.sql, &rendered.params)
            .await
    }

    async fn fetch_field<T, E>(&self, db: &Database<E>) -> Result<Option<T>>
    where
        E: StatementExecutor,
        T: DeserializeOwned + Send + Unpin,
    {
        let rendered = db.prepare(self)?;
        db.executor
            .fetch_scalar(&rendered.sql, &rendered.params)
            .await
    }
}

/// SQLx-backed SQLite executor
#[cfg(feature = "sqlite")]
pub mod sqlite {
    use super::*;
    use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
    use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};

    /// SQLite connection pool wrapper
    #[derive(Debug, Clone)]
    pub struct SqliteExecutor {
        inner: SqlitePool,
    }

    impl SqliteExecutor {
        /// Create a new SQLite pool from a connection string
        pub async fn connect(database_url: &str) -> Result<Self> {
            let pool = SqlitePool::connect(database_url).await?;
            Ok(Self { inner: pool })
        }

        /// Create from an existing SqlitePool
        pub fn from_pool(pool: SqlitePool) -> Self {
            Self { inner: pool }
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.inner
        }
    }

    impl StatementExecutor for SqliteExecutor {
        async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
            let query = bind_values_to_query(sqlx::query(sql), params);
            let result = query.execute(&self.inner).await?;
            Ok(result.rows_affected())
        }

        async fn fetch_all<T>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let query = bind_values_to_query(sqlx::query(sql), params);
            let rows = query.fetch_all(&self.inner).await?;

            let mut results = Vec::with_capacity(rows.len());
            for row in &rows {
                results.push(serde_json::from_value(row_to_json_value(row)?)?);
            }
            Ok(results)
        }

        async fn fetch_optional<T>(&self, sql: &str, params: &[Value]) -> Result<Option<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let query = bind_values_to_query(sqlx::query(sql), params);
            match query.fetch_optional(&self.inner).await? {
                Some(row) => Ok(Some(serde_json::from_value(row_to_json_value(&row)?)?)),
                None => Ok(None),
            }
        }

        async fn fetch_scalar<T>(&self, sql: &str, params: &[Value]) -> Result<Option<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let query = bind_values_to_query(sqlx::query(sql), params);
            match query.fetch_optional(&self.inner).await? {
                Some(row) if !row.columns().is_empty() => {
                    Ok(Some(serde_json::from_value(column_to_json(&row, 0)?)?))
                }
                _ => Ok(None),
            }
        }
    }

    /// Bind Quarry values to a SQLx query
    fn bind_values_to_query<'q>(
        mut query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
        params: &'q [Value],
    ) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
        for param in params {
            query = match param {
                Value::Null => query.bind(None::<i64>),
                Value::Bool(b) => query.bind(*b),
                Value::I32(i) => query.bind(*i),
                Value::I64(i) => query.bind(*i),
                Value::F64(f) => query.bind(*f),
                Value::String(s) => query.bind(s.as_str()),
                Value::Bytes(b) => query.bind(b.as_slice()),
                // SQLite has no array or JSON column type; both travel as JSON text
                Value::Json(_) | Value::Array(_) => query.bind(param.to_json().to_string()),
            };
        }
        query
    }

    fn row_to_json_value(row: &SqliteRow) -> Result<serde_json::Value> {
        let mut object = serde_json::Map::with_capacity(row.columns().len());
        for column in row.columns() {
            object.insert(
                column.name().to_string(),
                column_to_json(row, column.ordinal())?,
            );
        }
        Ok(serde_json::Value::Object(object))
    }

    /// Decode one column by the storage class of the value actually returned
    fn column_to_json(row: &SqliteRow, index: usize) -> Result<serde_json::Value> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(serde_json::Value::Null);
        }
        let type_name = raw.type_info().name().to_string();

        let value = match type_name.as_str() {
            "INTEGER" | "BOOLEAN" => serde_json::Value::from(row.try_get::<i64, _>(index)?),
            "REAL" => serde_json::Number::from_f64(row.try_get::<f64, _>(index)?)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            "BLOB" => Value::Bytes(row.try_get::<Vec<u8>, _>(index)?).to_json(),
            _ => serde_json::Value::String(row.try_get::<String, _>(index)?),
        };
        Ok(value)
    }

}
