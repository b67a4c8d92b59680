//! Database-specific identifier quoting, placeholders and table naming

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (a column, alias or join table) in the dialect's quotes.
    ///
    /// - MySQL uses backticks: `` `my_column` ``
    /// - PostgreSQL and SQLite use double quotes: `"my_column"`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for the parameter at zero-based `index`.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL and SQLite use `?`
    fn placeholder(&self, index: usize) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn name(&self) -> &'static str {
        "MySQL"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn name(&self) -> &'static str {
        "PostgreSQL"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn name(&self) -> &'static str {
        "SQLite"
    }
}

/// Maps a logical table name to the physical one used in FROM and JOIN
pub trait TableNaming: Send + Sync {
    fn physical_name(&self, logical: &str) -> String;
}

/// Prepends a fixed prefix: `users` becomes `t_users` with prefix `t_`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePrefix(pub String);

impl TablePrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }
}

impl TableNaming for TablePrefix {
    fn physical_name(&self, logical: &str) -> String {
        format!("{}{}", self.0, logical)
    }
}

/// Uses logical names unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPrefix;

impl TableNaming for NoPrefix {
    fn physical_name(&self, logical: &str) -> String {
        logical.to_string()
    }
}

impl<F> TableNaming for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn physical_name(&self, logical: &str) -> String {
        self(logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting() {
        assert_eq!(MySql.quote_identifier("id"), "`id`");
        assert_eq!(MySql.quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(Postgres.quote_identifier("id"), r#""id""#);
        assert_eq!(Sqlite.quote_identifier("id"), r#""id""#);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(MySql.placeholder(4), "?");
        assert_eq!(Sqlite.placeholder(0), "?");
        assert_eq!(Postgres.placeholder(0), "$1");
        assert_eq!(Postgres.placeholder(2), "$3");
    }

    #[test]
    fn test_table_prefix() {
        assert_eq!(TablePrefix::new("t_").physical_name("users"), "t_users");
        assert_eq!(TablePrefix::default().physical_name("users"), "users");
    }

    #[test]
    fn test_no_prefix() {
        assert_eq!(NoPrefix.physical_name("users"), "users");
        assert_eq!(
            NoPrefix.physical_name("orders"),
            TablePrefix::default().physical_name("orders")
        );
    }

    #[test]
    fn test_closure_naming() {
        let naming = |logical: &str| format!("app.{}", logical.to_uppercase());
        assert_eq!(naming.physical_name("users"), "app.USERS");
    }
}
