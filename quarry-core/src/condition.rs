//! Condition trees for WHERE and HAVING clauses
//!
//! A [`ConditionGroup`] holds an ordered list of children combined with
//! `and` or `or`. Children are leaves (`field operator operand`), raw SQL
//! fragments, `exists` sub-selects or further groups, nested without limit.

use crate::builder::select::SelectStatement;
use crate::operator::{Arity, Operator};
use crate::{Error, Result, Value};

/// How the children of a group are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }
}

/// Right-hand side of a condition leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    Value(Value),
    List(Vec<Value>),
    Select(Box<SelectStatement>),
}

impl Operand {
    pub fn value(value: impl Into<Value>) -> Self {
        Operand::Value(value.into())
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Operand::List(values.into_iter().map(Into::into).collect())
    }

    pub fn select(statement: SelectStatement) -> Self {
        Operand::Select(Box::new(statement))
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<SelectStatement> for Operand {
    fn from(statement: SelectStatement) -> Self {
        Operand::select(statement)
    }
}

/// A single predicate: `field operator operand`
///
/// The field is raw SQL text (usually already qualified, `t.field`) and is
/// never quoted by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionLeaf {
    field: String,
    operator: Operator,
    operand: Operand,
}

impl ConditionLeaf {
    /// Build a leaf, checking that the operand fits the operator
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{ConditionLeaf, Operand, op};
    ///
    /// assert!(ConditionLeaf::new("t.id", op::EQ, Operand::value(1)).is_ok());
    /// assert!(ConditionLeaf::new("t.id", op::EQ, Operand::None).is_err());
    /// assert!(ConditionLeaf::new("t.id", op::IS_NULL, Operand::value(1)).is_err());
    /// ```
    pub fn new(field: impl Into<String>, operator: Operator, operand: Operand) -> Result<Self> {
        let operand = match (operator.arity(), operand) {
            (Arity::Nullary, Operand::None) => Operand::None,
            (Arity::Nullary, _) => {
                return Err(Error::invalid_condition(format!(
                    "'{}' takes no operand",
                    operator
                )))
            }
            (_, Operand::None) => {
                return Err(Error::invalid_condition(format!(
                    "'{}' requires a value",
                    operator
                )))
            }
            (_, Operand::Select(select)) => Operand::Select(select),
            (Arity::Single, Operand::Value(Value::Array(_))) => {
                return Err(Error::invalid_condition(format!(
                    "'{}' takes a single value, not an array",
                    operator
                )))
            }
            (Arity::Single, Operand::Value(value)) => Operand::Value(value),
            (Arity::Single, Operand::List(_)) => {
                return Err(Error::invalid_condition(format!(
                    "'{}' takes a single value, not a list",
                    operator
                )))
            }
            (Arity::List, Operand::Value(Value::Array(values))) | (Arity::List, Operand::List(values)) => {
                if values.is_empty() {
                    return Err(Error::invalid_condition(format!(
                        "'{}' requires at least one value",
                        operator
                    )));
                }
                Operand::List(values)
            }
            (Arity::List, Operand::Value(value)) => {
                return Err(Error::invalid_condition(format!(
                    "'{}' requires a list of values, got {}",
                    operator,
                    value.kind()
                )))
            }
        };

        Ok(Self {
            field: field.into(),
            operator,
            operand,
        })
    }

    /// Leaf whose operand is known to fit; used by the typed convenience methods
    fn unchecked(field: &str, operator: Operator, operand: Operand) -> Self {
        Self {
            field: field.to_string(),
            operator,
            operand,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }
}

/// One child of a condition group
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Leaf(ConditionLeaf),
    Group(ConditionGroup),
    /// SQL emitted verbatim; `params` are bound in order and its placeholders are not rewritten
    Raw { sql: String, params: Vec<Value> },
    Exists {
        select: Box<SelectStatement>,
        negated: bool,
    },
}

impl From<ConditionLeaf> for Condition {
    fn from(leaf: ConditionLeaf) -> Self {
        Condition::Leaf(leaf)
    }
}

impl From<ConditionGroup> for Condition {
    fn from(group: ConditionGroup) -> Self {
        Condition::Group(group)
    }
}

/// A logical composite of conditions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionGroup {
    combinator: Combinator,
    children: Vec<Condition>,
}

impl ConditionGroup {
    pub fn new(combinator: Combinator) -> Self {
        Self {
            combinator,
            children: Vec::new(),
        }
    }

    pub fn and() -> Self {
        Self::new(Combinator::And)
    }

    pub fn or() -> Self {
        Self::new(Combinator::Or)
    }

    /// Append a child
    pub fn add(mut self, condition: impl Into<Condition>) -> Self {
        self.children.push(condition.into());
        self
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn children(&self) -> &[Condition] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn push(&mut self, condition: Condition) {
        self.children.push(condition);
    }
}

/// Fluent predicate constructors shared by condition groups and statements
///
/// Every method appends one child to [`Conditions::conditions_mut`] and
/// hands `self` back for chaining. A statement appends to its WHERE group.
///
/// The typed comparisons (`equals`, `less_than`, ...) bind whatever value
/// they receive, so a [`Value::Array`] goes out as one array parameter for
/// drivers that support it. Use [`Conditions::condition`] to have the
/// operand checked against the operator.
pub trait Conditions: Sized {
    /// The group receiving appended conditions
    fn conditions_mut(&mut self) -> &mut ConditionGroup;

    /// Append an already built condition
    fn with(mut self, condition: impl Into<Condition>) -> Self {
        self.conditions_mut().push(condition.into());
        self
    }

    /// Generic form, validating the operand against the operator
    fn condition(self, field: &str, operator: Operator, operand: Operand) -> Result<Self> {
        let leaf = ConditionLeaf::new(field, operator, operand)?;
        Ok(self.with(leaf))
    }

    fn equals(self, field: &str, value: impl Into<Value>) -> Self {
        self.with(compare(field, Operator::Eq, value))
    }

    fn not_equals(self, field: &str, value: impl Into<Value>) -> Self {
        self.with(compare(field, Operator::NotEq, value))
    }

    fn less_than(self, field: &str, value: impl Into<Value>) -> Self {
        self.with(compare(field, Operator::Lt, value))
    }

    fn less_or_equal(self, field: &str, value: impl Into<Value>) -> Self {
        self.with(compare(field, Operator::LtEq, value))
    }

    fn greater_than(self, field: &str, value: impl Into<Value>) -> Self {
        self.with(compare(field, Operator::Gt, value))
    }

    fn greater_or_equal(self, field: &str, value: impl Into<Value>) -> Self {
        self.with(compare(field, Operator::GtEq, value))
    }

    fn like(self, field: &str, pattern: impl Into<Value>) -> Self {
        self.with(compare(field, Operator::Like, pattern))
    }

    fn not_like(self, field: &str, pattern: impl Into<Value>) -> Self {
        self.with(compare(field, Operator::NotLike, pattern))
    }

    fn is_null(self, field: &str) -> Self {
        self.with(ConditionLeaf::unchecked(field, Operator::IsNull, Operand::None))
    }

    fn is_not_null(self, field: &str) -> Self {
        self.with(ConditionLeaf::unchecked(
            field,
            Operator::IsNotNull,
            Operand::None,
        ))
    }

    /// `field in (?, ?, ...)`; an empty list is rejected
    fn in_list<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.condition(field, Operator::In, Operand::list(values))
    }

    fn not_in_list<I, V>(self, field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.condition(field, Operator::NotIn, Operand::list(values))
    }

    fn in_select(self, field: &str, select: SelectStatement) -> Self {
        self.with(ConditionLeaf::unchecked(
            field,
            Operator::In,
            Operand::select(select),
        ))
    }

    fn not_in_select(self, field: &str, select: SelectStatement) -> Self {
        self.with(ConditionLeaf::unchecked(
            field,
            Operator::NotIn,
            Operand::select(select),
        ))
    }

    fn exists(self, select: SelectStatement) -> Self {
        self.with(Condition::Exists {
            select: Box::new(select),
            negated: false,
        })
    }

    fn not_exists(self, select: SelectStatement) -> Self {
        self.with(Condition::Exists {
            select: Box::new(select),
            negated: true,
        })
    }

    /// SQL text with one `?` per param; each `?` becomes the dialect's placeholder
    fn raw<I, V>(self, sql: &str, params: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if sql.trim().is_empty() {
            return Err(Error::invalid_condition("raw condition has no SQL text"));
        }
        let params: Vec<Value> = params.into_iter().map(Into::into).collect();
        check_raw_params(sql, params.len())?;
        Ok(self.with(Condition::Raw {
            sql: sql.to_string(),
            params,
        }))
    }

    /// Attach a nested group built independently
    fn group(self, group: ConditionGroup) -> Self {
        self.with(group)
    }

    /// Attach a nested `or` group built by `build`
    fn any_of(self, build: impl FnOnce(ConditionGroup) -> ConditionGroup) -> Self {
        self.group(build(ConditionGroup::or()))
    }
}

/// Every `?` in raw SQL must have exactly one param
pub(crate) fn check_raw_params(sql: &str, params: usize) -> Result<()> {
    let placeholders = sql.matches('?').count();
    if placeholders != params {
        return Err(Error::invalid_condition(format!(
            "raw condition has {} placeholders but {} params",
            placeholders, params
        )));
    }
    Ok(())
}

fn compare(field: &str, operator: Operator, value: impl Into<Value>) -> ConditionLeaf {
    ConditionLeaf::unchecked(field, operator, Operand::Value(value.into()))
}

impl Conditions for ConditionGroup {
    fn conditions_mut(&mut self) -> &mut ConditionGroup {
        self
    }
}
