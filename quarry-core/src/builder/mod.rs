//! Statement builder module

pub mod common;
pub mod select;

pub use common::{
    Column, Expression, FieldRef, IntoColumns, JoinClause, JoinKind, OrderByClause, Selection,
    SortDirection,
};
pub use select::SelectStatement;
