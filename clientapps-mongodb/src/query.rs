//! Query translation from clientapps filter expressions to MongoDB query syntax.

use bson::{Bson, Document, doc};

use clientapps_core::{
    error::StoreError,
    query::{Expr, QueryVisitor},
};

/// Translates filter expressions into MongoDB query documents.
///
/// An empty conjunction becomes the empty filter `{}`, since MongoDB rejects
/// `$and` with no clauses.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = StoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        match exprs {
            _ if exprs.iter().all(Expr::is_unconstrained) => Ok(doc! {}),
            [single] => self.visit_expr(single),
            _ => Ok(doc! {
                "$and": exprs
                    .iter()
                    .map(|expr| self.visit_expr(expr))
                    .collect::<Result<Vec<_>, _>>()?,
            }),
        }
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: { "$eq": value },
        })
    }
}
