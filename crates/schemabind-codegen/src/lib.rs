//! Artifact generation from a resolved schema graph
//!
//! Two projections of one graph: a serializable structural description
//! ([`describe`]) and generated validator source text
//! ([`ArtifactEmitter`] with the [`zod`] profile). Both honor the same
//! skip-lists and never mutate the canonical graph.

pub mod describe;
pub mod emit;
pub mod names;
pub mod zod;

pub use describe::{
    describe, ColumnDescription, FieldDescription, FunctionDescription, ReferenceDescription,
    SchemaDescription, TableDescription, TypeDescription,
};
pub use emit::{ArtifactEmitter, BuilderSet};
pub use names::{pascal_case, EntityKind, NameResolver};
pub use zod::{FieldContext, Operation, TypeExpressionMap, ZodProfile};
