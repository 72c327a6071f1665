//! Raw catalog row sets and the sources that fetch them
//!
//! A [`CatalogSource`] supplies the five row sets (columns, enums,
//! composite types, key constraints, functions) that the graph builder
//! consumes. The builder never talks to a database; it sees a complete
//! [`RawCatalog`] snapshot only.
//!
//! Enable the `postgres` Cargo feature for the live
//! [`PostgresSource`]; the [`MockSource`] serves hand-built row sets
//! for tests and demos.

pub mod mock;
pub mod postgres;
pub mod rows;
pub mod source;

pub use mock::MockSource;
pub use postgres::PostgresSource;
pub use rows::{
    ColumnRow, CompositeFieldRow, CompositeRow, ConstraintKind, EnumRow, FunctionRow, KeyRow,
    RawCatalog,
};
pub use source::{CatalogSource, FetchError};
