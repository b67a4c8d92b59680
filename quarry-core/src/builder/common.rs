//! Value objects shared by the statement builder and the renderer

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Column part of a selected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Named(String),
    /// Every column of the source, rendered `alias.*`
    All,
}

/// One selected column, qualified by the alias of its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub source: String,
    pub column: Column,
    pub alias: Option<String>,
}

/// Opaque SQL fragment with a mandatory output alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub raw: String,
    pub alias: String,
}

/// Entry of the SELECT list; fields and expressions keep their insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Field(FieldRef),
    Expression(Expression),
}

impl Selection {
    pub fn output_alias(&self) -> Option<&str> {
        match self {
            Selection::Field(field) => field.alias.as_deref(),
            Selection::Expression(expr) => Some(&expr.alias),
        }
    }
}

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    /// Rendered as `full outer join`; MySQL does not support it
    Full,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "inner"),
            JoinKind::Left => write!(f, "left"),
            JoinKind::Right => write!(f, "right"),
            JoinKind::Full => write!(f, "full outer"),
        }
    }
}

/// A JOIN against a logical table name; the ON text is emitted verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: String,
    pub alias: String,
    pub on: String,
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(Error::invalid_direction(s))
        }
    }
}

/// An ORDER BY entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByClause {
    pub column: String,
    pub direction: SortDirection,
}

/// Trait to convert various types into column lists
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumns for (&str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string(), self.2.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("Desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.to_string(), "desc");

        let err = "sideways".parse::<SortDirection>().unwrap_err();
        assert!(matches!(err, Error::InvalidDirection { .. }));
    }

    #[test]
    fn test_join_kind_display() {
        assert_eq!(JoinKind::Left.to_string(), "left");
        assert_eq!(JoinKind::Full.to_string(), "full outer");
    }

    #[test]
    fn test_output_alias() {
        let field = Selection::Field(FieldRef {
            source: "t".to_string(),
            column: Column::All,
            alias: None,
        });
        assert_eq!(field.output_alias(), None);

        let expr = Selection::Expression(Expression {
            raw: "COUNT(*)".to_string(),
            alias: "total".to_string(),
        });
        assert_eq!(expr.output_alias(), Some("total"));
    }

    #[test]
    fn test_into_columns_implementations() {
        assert_eq!("t.a".into_columns(), vec!["t.a"]);
        assert_eq!(("t.a", "t.b").into_columns(), vec!["t.a", "t.b"]);
        assert_eq!(["t.a", "t.b", "t.c"].into_columns(), vec!["t.a", "t.b", "t.c"]);
        assert_eq!(vec!["t.a"].into_columns(), vec!["t.a"]);
    }
}
