//! Filter expressions understood by every store backend.
//!
//! The record service only ever asks for exact matches, possibly combined, so
//! the expression tree is small:
//!
//! ```ignore
//! use clientapps_core::query::Filter;
//!
//! let by_key = Filter::eq("_id", oid).and(Filter::eq("clientId", "112122060"));
//! let everything = Filter::all();
//! ```
//!
//! Backends translate an [`Expr`] through a [`QueryVisitor`].

use bson::Bson;

use crate::error::StoreError;

/// A filter expression for selecting documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions. An empty list matches every document.
    And(Vec<Expr>),
    /// The field equals the value.
    Eq {
        /// The field name to compare.
        field: String,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Returns true if this expression places no constraint on documents.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Expr::And(exprs) => exprs.iter().all(Expr::is_unconstrained),
            Expr::Eq { .. } => false,
        }
    }
}

/// Helper for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches every document in the collection.
    pub fn all() -> Expr {
        Expr::And(Vec::new())
    }

    /// Matches documents where `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::Eq { field: field.into(), value: value.into() }
    }

    /// Matches documents satisfying every expression.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<StoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Eq { field, value } => self.visit_eq(field, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens_into_existing_list() {
        let expr = Filter::eq("a", 1).and(Filter::eq("b", 2)).and(Filter::eq("c", 3));

        match expr {
            Expr::And(list) => assert_eq!(list.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn all_is_unconstrained() {
        assert!(Filter::all().is_unconstrained());
        assert!(Filter::and([Filter::all()]).is_unconstrained());
        assert!(!Filter::eq("clientId", "x").is_unconstrained());
    }
}
