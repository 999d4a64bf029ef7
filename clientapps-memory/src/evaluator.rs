//! Filter evaluation for in-memory documents.

use bson::{Bson, Document, oid::ObjectId};
use std::collections::HashMap;

use clientapps_core::{
    error::StoreError,
    query::{Expr, QueryVisitor},
};

/// Comparable representation of BSON values.
///
/// Numeric types are normalized to f64 so that an `Int32` filter value
/// matches an `Int64` field. Types outside this set never compare equal.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    ObjectId(ObjectId),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    Unsupported,
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            _ => Comparable::Unsupported,
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Returns true if the document satisfies `expr`.
    pub fn matches(document: &'a Document, expr: &Expr) -> bool {
        DocumentEvaluator::new(document)
            .visit_expr(expr)
            .unwrap_or(false)
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = StoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(match self.document.get(field) {
            Some(field_value) => Comparable::from(field_value) == Comparable::from(value),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use clientapps_core::query::Filter;

    #[test]
    fn matches_object_ids_by_value() {
        let oid = ObjectId::new();
        let document = doc! { "_id": oid, "clientId": "112122060" };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("_id", oid)));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("_id", ObjectId::new())));
    }

    #[test]
    fn and_requires_every_clause() {
        let oid = ObjectId::new();
        let document = doc! { "_id": oid, "clientId": "112122060" };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("_id", oid).and(Filter::eq("clientId", "112122060"))));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("_id", oid).and(Filter::eq("clientId", "other"))));
        assert!(DocumentEvaluator::matches(&document, &Filter::all()));
    }

    #[test]
    fn numbers_compare_across_widths() {
        let document = doc! { "rollNo": 150_i64 };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("rollNo", 150_i32)));
    }

    #[test]
    fn missing_field_and_unsupported_types_never_match() {
        let document = doc! { "blob": Bson::Binary(bson::Binary { subtype: bson::spec::BinarySubtype::Generic, bytes: vec![1] }) };

        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("clientId", "x")));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("blob", document.get("blob").cloned().unwrap())));
    }
}
