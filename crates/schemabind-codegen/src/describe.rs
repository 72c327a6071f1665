//! Structural description projection
//!
//! Serializes one schema graph into the stable JSON shape consumers
//! diff and inspect. Inline type descriptions are expanded at each use
//! site (a column over an enum repeats the enum's values), foreign
//! references embed a full description of the target column, and
//! skip-lists degrade rather than dangle: a skipped type referenced by
//! a surviving column collapses to a bare native marker, a reference to
//! a skipped table or column is omitted.

use schemabind_core::{Column, ColumnRef, Field, KeyRole, SchemaGraph, SkipLists, TypeId, TypeKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDescription>>,
}

impl TypeDescription {
    fn native(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: "native",
            values: None,
            fields: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescription,
    pub array: bool,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescription,
    pub array: bool,
    pub nullable: bool,
    pub key_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<ReferenceDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceDescription {
    pub table_name: String,
    #[serde(flatten)]
    pub column: Box<ColumnDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescription {
    pub name: String,
    pub columns: Vec<ColumnDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDescription {
    pub name: String,
    pub arguments: Vec<FieldDescription>,
    pub returns: FieldDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescription {
    pub name: String,
    pub types: Vec<TypeDescription>,
    pub functions: Vec<FunctionDescription>,
    pub tables: Vec<TableDescription>,
}

impl SchemaDescription {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Project one graph into its description, applying the skip-lists.
pub fn describe(graph: &SchemaGraph, skip: &SkipLists) -> SchemaDescription {
    // Every interned type, declared and builtin alike, in declaration
    // / first-use order.
    let types = (0..graph.types.len())
        .map(TypeId)
        .filter(|id| !skip.skips_type(&graph.type_def(*id).name))
        .map(|id| type_description(graph, skip, id, &mut Vec::new()))
        .collect();

    let functions = graph
        .functions
        .iter()
        .filter(|f| !skip.skips_function(&f.name))
        .map(|f| FunctionDescription {
            name: f.name.clone(),
            arguments: f
                .args
                .iter()
                .map(|arg| field_description(graph, skip, arg))
                .collect(),
            returns: field_description(graph, skip, &f.returns),
        })
        .collect();

    let tables = graph
        .tables
        .iter()
        .filter(|t| !skip.skips_table(&t.name))
        .map(|t| TableDescription {
            name: t.name.clone(),
            columns: t
                .columns
                .iter()
                .filter(|c| !skip.skips_column(&t.name, &c.name))
                .map(|c| column_description(graph, skip, c, &mut Vec::new()))
                .collect(),
        })
        .collect();

    SchemaDescription {
        name: graph.name.clone(),
        types,
        functions,
        tables,
    }
}

/// Expand one type inline. `expanding` breaks composite cycles: a type
/// already on the expansion path collapses to its native marker.
fn type_description(
    graph: &SchemaGraph,
    skip: &SkipLists,
    id: TypeId,
    expanding: &mut Vec<TypeId>,
) -> TypeDescription {
    let ty = graph.type_def(id);
    if skip.skips_type(&ty.name) || expanding.contains(&id) {
        return TypeDescription::native(&ty.name);
    }

    match &ty.kind {
        TypeKind::Builtin => TypeDescription::native(&ty.name),
        TypeKind::Enum { values } => TypeDescription {
            name: ty.name.clone(),
            kind: "enum",
            values: Some(values.clone()),
            fields: None,
        },
        TypeKind::Composite { fields } => {
            expanding.push(id);
            let described = fields
                .iter()
                .map(|field| FieldDescription {
                    name: field.name.clone(),
                    ty: type_description(graph, skip, field.type_id, expanding),
                    array: field.array,
                    nullable: field.nullable,
                })
                .collect();
            expanding.pop();
            TypeDescription {
                name: ty.name.clone(),
                kind: "custom",
                values: None,
                fields: Some(described),
            }
        }
    }
}

fn field_description(graph: &SchemaGraph, skip: &SkipLists, field: &Field) -> FieldDescription {
    FieldDescription {
        name: field.name.clone(),
        ty: type_description(graph, skip, field.type_id, &mut Vec::new()),
        array: field.array,
        nullable: field.nullable,
    }
}

/// Describe one column; `visited` breaks reference chains that loop
/// back on themselves.
fn column_description(
    graph: &SchemaGraph,
    skip: &SkipLists,
    column: &Column,
    visited: &mut Vec<ColumnRef>,
) -> ColumnDescription {
    let key_type = match column.key {
        KeyRole::None => "none",
        KeyRole::Primary => "primary",
        KeyRole::Foreign { .. } => "foreign",
    };

    let references = match column.key {
        KeyRole::Foreign { target: Some(at) } => {
            reference_description(graph, skip, at, visited)
        }
        _ => None,
    };

    ColumnDescription {
        name: column.name.clone(),
        ty: type_description(graph, skip, column.type_id, &mut Vec::new()),
        array: column.array,
        nullable: column.nullable,
        key_type,
        references,
    }
}

fn reference_description(
    graph: &SchemaGraph,
    skip: &SkipLists,
    at: ColumnRef,
    visited: &mut Vec<ColumnRef>,
) -> Option<ReferenceDescription> {
    if visited.contains(&at) {
        return None;
    }

    let table = graph.table(at.table);
    let target = graph.column(at);
    // A reference into skipped territory is omitted, not dangled.
    if skip.skips_table(&table.name) || skip.skips_column(&table.name, &target.name) {
        return None;
    }

    visited.push(at);
    let column = column_description(graph, skip, target, visited);
    visited.pop();

    Some(ReferenceDescription {
        table_name: table.name.clone(),
        column: Box::new(column),
    })
}
