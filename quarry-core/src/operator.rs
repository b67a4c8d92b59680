//! SQL comparison operators

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::Error;

/// What a condition leaf needs on its right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No operand at all (`is null`)
    Nullary,
    /// One bound value or a sub-select
    Single,
    /// A list of bound values or a sub-select
    List,
}

/// Comparison operator of a condition leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// SQL text of the operator, lower case to match the rest of the rendered statement
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::IsNull => "is null",
            Operator::IsNotNull => "is not null",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::IsNull | Operator::IsNotNull => Arity::Nullary,
            Operator::In | Operator::NotIn => Arity::List,
            _ => Arity::Single,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    /// Parse operator text, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let operator = match normalized.as_str() {
            "=" => Operator::Eq,
            "!=" | "<>" => Operator::NotEq,
            "<" => Operator::Lt,
            "<=" => Operator::LtEq,
            ">" => Operator::Gt,
            ">=" => Operator::GtEq,
            "like" => Operator::Like,
            "not like" => Operator::NotLike,
            "in" => Operator::In,
            "not in" => Operator::NotIn,
            "is null" => Operator::IsNull,
            "is not null" => Operator::IsNotNull,
            _ => return Err(Error::invalid_operator(s)),
        };
        Ok(operator)
    }
}

/// Short names for operator variants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::Eq;
    pub const NEQ: Operator = Operator::NotEq;
    pub const LT: Operator = Operator::Lt;
    pub const LTE: Operator = Operator::LtEq;
    pub const GT: Operator = Operator::Gt;
    pub const GTE: Operator = Operator::GtEq;
    pub const LIKE: Operator = Operator::Like;
    pub const NOT_LIKE: Operator = Operator::NotLike;
    pub const IN: Operator = Operator::In;
    pub const NOT_IN: Operator = Operator::NotIn;
    pub const IS_NULL: Operator = Operator::IsNull;
    pub const IS_NOT_NULL: Operator = Operator::IsNotNull;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_text() {
        assert_eq!(Operator::Gt.as_str(), ">");
        assert_eq!(Operator::Like.as_str(), "like");
        assert_eq!(Operator::IsNotNull.to_string(), "is not null");
    }

    #[test]
    fn test_arity() {
        assert_eq!(Operator::IsNull.arity(), Arity::Nullary);
        assert_eq!(Operator::NotIn.arity(), Arity::List);
        assert_eq!(Operator::LtEq.arity(), Arity::Single);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("LIKE".parse::<Operator>().unwrap(), Operator::Like);
        assert_eq!(" Is Not Null ".parse::<Operator>().unwrap(), Operator::IsNotNull);
        assert_eq!("<>".parse::<Operator>().unwrap(), op::NEQ);
    }

    #[test]
    fn test_parse_unknown_operator() {
        let err = "@@".parse::<Operator>().unwrap_err();
        assert!(matches!(err, Error::InvalidOperator { .. }));
        assert_eq!(err.to_string(), "Unknown operator '@@'");
    }
}
