pub mod document;
pub mod query;

pub use document::{DocumentRow, DocumentStore, StoreError};
pub use query::DocQuery;
