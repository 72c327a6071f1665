//! Type interning registry
//!
//! Guarantees at most one `TypeId` per distinct type name for the
//! lifetime of one graph build. Declared types (enums, composites) are
//! registered up front; everything else is lazily created as a builtin
//! on first lookup, and later lookups of the same name return the
//! identical id regardless of variant.

use std::collections::HashMap;

use crate::graph::{Field, TypeDef, TypeId, TypeKind};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("type '{name}' is already registered")]
    Duplicate { name: String },
}

/// Name → handle interning map backing one graph's type arena.
///
/// Each build gets a fresh registry; there is no cross-graph sharing.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TypeDef>,
    by_name: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declared enum or composite type.
    ///
    /// A name collision is an error and leaves the first registration
    /// in place.
    pub fn register_declared(&mut self, name: &str, kind: TypeKind) -> Result<TypeId, RegistryError> {
        if self.by_name.contains_key(name) {
            return Err(RegistryError::Duplicate {
                name: name.to_string(),
            });
        }

        let id = TypeId(self.types.len());
        self.types.push(TypeDef {
            name: name.to_string(),
            kind,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Return the interned id for a name, lazily creating a builtin.
    ///
    /// First use wins: if the name was declared as an enum or composite
    /// the existing id is returned unchanged.
    pub fn lookup_or_create_builtin(&mut self, name: &str) -> TypeId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }

        let id = TypeId(self.types.len());
        self.types.push(TypeDef {
            name: name.to_string(),
            kind: TypeKind::Builtin,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: TypeId) -> &TypeDef {
        &self.types[id.0]
    }

    /// Fill the field list of a composite registered as a stub.
    ///
    /// Composite declarations are registered name-first so that fields
    /// of mutually referencing composites can resolve each other; this
    /// second step installs the resolved fields.
    pub fn fill_composite(&mut self, id: TypeId, fields: Vec<Field>) {
        match &mut self.types[id.0].kind {
            TypeKind::Composite { fields: slot } => *slot = fields,
            _ => unreachable!("fill_composite on a non-composite type"),
        }
    }

    /// Consume the registry into the graph's type arena, preserving
    /// declaration / first-use order.
    pub fn into_types(self) -> Vec<TypeDef> {
        self.types
    }
}
