//! Schemabind Core
//!
//! Core domain model: the resolved schema graph, the type interning
//! registry, diagnostics, configuration, and the report schema.

pub mod config;
pub mod diagnostic;
pub mod graph;
pub mod registry;
pub mod report;

pub use config::{Config, ConfigError, ConnectionConfig, RenameRules, ReplaceRules, SkipLists};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use graph::{
    Column, ColumnRef, Field, Function, KeyRole, SchemaGraph, Table, TableId, TypeDef, TypeId,
    TypeKind,
};
pub use registry::{RegistryError, TypeRegistry};
pub use report::{Report, ReportSummary, ReportVersion};
