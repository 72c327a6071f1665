//! The resolved schema graph
//!
//! One `SchemaGraph` is produced per requested schema name. It is built
//! once and read-only afterwards; all cross-references are arena
//! indices (`TypeId`, `TableId`, `ColumnRef`), never duplicated
//! entities.

use crate::diagnostic::Diagnostic;

/// Handle to an interned type within one graph.
///
/// Two columns referencing the same type name always carry the same
/// `TypeId`; identity comparison is index equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub usize);

/// Handle to a table within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub usize);

/// Address of a column: table arena index plus column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: TableId,
    pub column: usize,
}

/// Discriminated type variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Scalar catalog type with no internal structure (text, uuid, ...).
    Builtin,

    /// User-defined enum; values preserve declaration order and are
    /// never empty.
    Enum { values: Vec<String> },

    /// User-defined composite type; fields preserve ordinal order.
    Composite { fields: Vec<Field> },
}

/// A named type, interned per graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
}

impl TypeDef {
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum { .. })
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, TypeKind::Composite { .. })
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, TypeKind::Builtin)
    }
}

/// A named, typed slot: composite-type member or function argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_id: TypeId,
    pub array: bool,
    pub nullable: bool,
}

/// Key role of a column.
///
/// A foreign column whose target could not be located keeps the role
/// but carries no target (lossy degradation, see the builder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRole {
    None,
    Primary,
    Foreign { target: Option<ColumnRef> },
}

impl KeyRole {
    pub fn is_primary(&self) -> bool {
        matches!(self, KeyRole::Primary)
    }

    pub fn is_foreign(&self) -> bool {
        matches!(self, KeyRole::Foreign { .. })
    }
}

/// A table column: a field plus default indicator and key role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub type_id: TypeId,
    pub array: bool,
    pub nullable: bool,
    pub default: Option<String>,
    pub key: KeyRole,
}

impl Column {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// A table with its columns in catalog ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    /// Find a column position by name.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// A user-defined function signature.
///
/// The return field is named `returns` and is always nullable; its
/// array flag comes from a trailing `[]` on the catalog return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub args: Vec<Field>,
    pub returns: Field,
}

/// One schema's fully cross-referenced graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaGraph {
    /// Schema name as requested.
    pub name: String,

    /// Interned types, in declaration / first-use order.
    pub types: Vec<TypeDef>,

    /// Tables in first-encounter order from the catalog rows.
    pub tables: Vec<Table>,

    /// User-defined functions.
    pub functions: Vec<Function>,

    /// Non-fatal degradations recorded during the build.
    pub diagnostics: Vec<Diagnostic>,
}

impl SchemaGraph {
    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        &self.types[id.0]
    }

    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    pub fn find_table(&self, name: &str) -> Option<TableId> {
        self.tables.iter().position(|t| t.name == name).map(TableId)
    }

    pub fn find_column(&self, table: &str, column: &str) -> Option<ColumnRef> {
        let table_id = self.find_table(table)?;
        let column = self.table(table_id).find_column(column)?;
        Some(ColumnRef {
            table: table_id,
            column,
        })
    }

    pub fn column(&self, at: ColumnRef) -> &Column {
        &self.table(at.table).columns[at.column]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_table() -> SchemaGraph {
        SchemaGraph {
            name: "public".to_string(),
            types: vec![TypeDef {
                name: "uuid".to_string(),
                kind: TypeKind::Builtin,
            }],
            tables: vec![Table {
                name: "auth".to_string(),
                columns: vec![Column {
                    name: "id".to_string(),
                    type_id: TypeId(0),
                    array: false,
                    nullable: false,
                    default: None,
                    key: KeyRole::Primary,
                }],
            }],
            functions: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn column_lookup_by_table_and_name() {
        let graph = graph_with_table();

        let at = graph.find_column("auth", "id").unwrap();
        assert_eq!(at, ColumnRef { table: TableId(0), column: 0 });
        assert!(graph.column(at).key.is_primary());

        assert!(graph.find_column("auth", "missing").is_none());
        assert!(graph.find_column("missing", "id").is_none());
    }

    #[test]
    fn key_role_predicates() {
        assert!(KeyRole::Primary.is_primary());
        assert!(KeyRole::Foreign { target: None }.is_foreign());
        assert!(!KeyRole::None.is_primary());
    }
}
