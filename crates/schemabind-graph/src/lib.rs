//! Schema graph construction
//!
//! Turns a [`RawCatalog`](schemabind_catalog::RawCatalog) snapshot
//! into one immutable [`SchemaGraph`](schemabind_core::SchemaGraph)
//! per requested schema name: declared types registered first, tables
//! assembled from flat column rows, key relationships wired in a
//! second pass once every table exists.

pub mod builder;
pub mod signature;

pub use builder::{normalize_type_name, BuildError, SchemaGraphBuilder};
pub use signature::{parse_arguments, split_array_suffix, SignatureError};
