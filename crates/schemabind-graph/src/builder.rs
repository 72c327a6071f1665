//! Two-phase schema graph builder
//!
//! Phase one constructs every entity: declared types are registered
//! name-first (composites as stubs, fields filled once all names
//! exist), tables are grouped from the pre-sorted column rows,
//! functions are parsed. Phase two wires key relationships by
//! (table, column) lookup — it runs only after every table exists, so
//! forward references are always resolvable.
//!
//! The builder is deterministic: identical input rows produce a
//! structurally identical graph.

use std::collections::{HashMap, HashSet};

use schemabind_catalog::{ConstraintKind, RawCatalog};
use schemabind_core::{
    Column, ColumnRef, Diagnostic, DiagnosticCode, Field, Function, KeyRole, SchemaGraph, Severity,
    Table, TableId, TypeKind, TypeRegistry,
};

use crate::signature::{parse_arguments, split_array_suffix};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The requested schema appears in no catalog row set; no partial
    /// graph is produced.
    #[error("schema '{schema}' not found in catalog rows")]
    SchemaNotFound { schema: String },
}

/// Normalize the catalog's array marker into an array flag plus the
/// de-prefixed base type name (`_int4` + `ARRAY` → `(true, "int4")`).
pub fn normalize_type_name<'a>(udt_name: &'a str, data_type: &str) -> (bool, &'a str) {
    if data_type == "ARRAY" {
        (true, udt_name.strip_prefix('_').unwrap_or(udt_name))
    } else {
        (false, udt_name)
    }
}

/// Builds immutable schema graphs from one catalog snapshot.
pub struct SchemaGraphBuilder<'a> {
    catalog: &'a RawCatalog,
}

impl<'a> SchemaGraphBuilder<'a> {
    pub fn new(catalog: &'a RawCatalog) -> Self {
        Self { catalog }
    }

    /// Build one graph per requested schema name, failing fast on the
    /// first absent schema.
    pub fn build_all(&self, schemas: &[String]) -> Result<Vec<SchemaGraph>, BuildError> {
        schemas.iter().map(|name| self.build(name)).collect()
    }

    /// Build the graph for one schema.
    pub fn build(&self, schema: &str) -> Result<SchemaGraph, BuildError> {
        if !self.catalog.contains_schema(schema) {
            return Err(BuildError::SchemaNotFound {
                schema: schema.to_string(),
            });
        }

        let mut diagnostics = Vec::new();
        let mut registry = TypeRegistry::new();

        self.register_declared_types(schema, &mut registry, &mut diagnostics);
        self.fill_composite_fields(schema, &mut registry);

        let mut tables = self.build_tables(schema, &mut registry);
        let functions = self.build_functions(schema, &mut registry, &mut diagnostics);
        self.wire_keys(schema, &mut tables, &mut diagnostics);

        Ok(SchemaGraph {
            name: schema.to_string(),
            types: registry.into_types(),
            tables,
            functions,
            diagnostics,
        })
    }

    /// Register every enum and composite name before anything can
    /// reference a type, composites as empty stubs. First declaration
    /// wins on a name collision.
    fn register_declared_types(
        &self,
        schema: &str,
        registry: &mut TypeRegistry,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for row in self.catalog.enums_for(schema) {
            let values: Vec<String> = row
                .values
                .split(';')
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();

            if values.is_empty() {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::EmptyEnum,
                        Severity::Warn,
                        format!("enum '{}' has no values and was skipped", row.name),
                    )
                    .with_object(&row.name),
                );
                continue;
            }

            if registry
                .register_declared(&row.name, TypeKind::Enum { values })
                .is_err()
            {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DuplicateType,
                        Severity::Warn,
                        format!("enum '{}' collides with an existing type; first declaration kept", row.name),
                    )
                    .with_object(&row.name),
                );
            }
        }

        for row in self.catalog.composites_for(schema) {
            if registry
                .register_declared(&row.name, TypeKind::Composite { fields: Vec::new() })
                .is_err()
            {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DuplicateType,
                        Severity::Warn,
                        format!(
                            "composite type '{}' collides with an existing type; first declaration kept",
                            row.name
                        ),
                    )
                    .with_object(&row.name),
                );
            }
        }
    }

    /// Second sweep over composite declarations: now that every
    /// declared name resolves, install the field lists. Mutually or
    /// cyclically referencing composites resolve through their ids.
    fn fill_composite_fields(&self, schema: &str, registry: &mut TypeRegistry) {
        let mut filled: HashSet<&str> = HashSet::new();

        for row in self.catalog.composites_for(schema) {
            if !filled.insert(row.name.as_str()) {
                continue;
            }
            let Some(id) = registry.lookup(&row.name) else {
                continue;
            };
            if !registry.get(id).is_composite() {
                continue;
            }

            let mut members = row.fields.clone();
            members.sort_by_key(|f| f.ordinal);

            let fields = members
                .iter()
                .map(|member| {
                    let (array, base) = normalize_type_name(&member.udt_name, &member.data_type);
                    Field {
                        name: member.name.clone(),
                        type_id: registry.lookup_or_create_builtin(base),
                        array,
                        nullable: member.nullable,
                    }
                })
                .collect();

            registry.fill_composite(id, fields);
        }
    }

    /// Group column rows into tables on first encounter of each table
    /// name; rows arrive pre-sorted by (table, ordinal), so column
    /// order is arrival order.
    fn build_tables(&self, schema: &str, registry: &mut TypeRegistry) -> Vec<Table> {
        let mut tables: Vec<Table> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for row in self.catalog.columns_for(schema) {
            let at = *index.entry(row.table.clone()).or_insert_with(|| {
                tables.push(Table {
                    name: row.table.clone(),
                    columns: Vec::new(),
                });
                tables.len() - 1
            });

            let (array, base) = normalize_type_name(&row.udt_name, &row.data_type);
            tables[at].columns.push(Column {
                name: row.name.clone(),
                type_id: registry.lookup_or_create_builtin(base),
                array,
                nullable: row.nullable,
                default: row.default.clone(),
                key: KeyRole::None,
            });
        }

        tables
    }

    /// Parse function signatures; a malformed argument list isolates
    /// the failure to that one function.
    fn build_functions(
        &self,
        schema: &str,
        registry: &mut TypeRegistry,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Function> {
        let mut functions = Vec::new();

        for row in self.catalog.functions_for(schema) {
            let parsed = match parse_arguments(&row.args) {
                Ok(parsed) => parsed,
                Err(err) => {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::MalformedFunctionSignature,
                            Severity::Warn,
                            format!("function '{}' skipped: {}", row.name, err),
                        )
                        .with_object(&row.name),
                    );
                    continue;
                }
            };

            let args = parsed
                .into_iter()
                .map(|(name, ty)| {
                    let (array, base) = split_array_suffix(&ty);
                    Field {
                        name,
                        type_id: registry.lookup_or_create_builtin(base),
                        array,
                        nullable: false,
                    }
                })
                .collect();

            let (array, base) = split_array_suffix(&row.return_type);
            let returns = Field {
                name: "returns".to_string(),
                type_id: registry.lookup_or_create_builtin(base),
                array,
                nullable: true,
            };

            functions.push(Function {
                name: row.name.clone(),
                args,
                returns,
            });
        }

        functions
    }

    /// Key pass, strictly after all tables exist. A missing target
    /// column degrades the relation: the role stays foreign with no
    /// target attached.
    fn wire_keys(&self, schema: &str, tables: &mut [Table], diagnostics: &mut Vec<Diagnostic>) {
        fn locate(tables: &[Table], table: &str, column: &str) -> Option<(usize, usize)> {
            let at = tables.iter().position(|t| t.name == table)?;
            let col = tables[at].find_column(column)?;
            Some((at, col))
        }

        for key in self.catalog.keys_for(schema) {
            let Some((table, column)) = locate(tables, &key.table, &key.column) else {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::UnknownKeyColumn,
                        Severity::Warn,
                        format!(
                            "key constraint names unknown column '{}.{}'",
                            key.table, key.column
                        ),
                    )
                    .with_object(format!("{}.{}", key.table, key.column)),
                );
                continue;
            };

            match key.constraint {
                ConstraintKind::PrimaryKey => {
                    tables[table].columns[column].key = KeyRole::Primary;
                }
                ConstraintKind::ForeignKey => {
                    // Targets resolve within this schema's graph only;
                    // a cross-schema target degrades like a missing one.
                    let target = locate(tables, &key.target_table, &key.target_column)
                        .filter(|_| key.target_schema == schema)
                        .map(|(t, c)| ColumnRef {
                            table: TableId(t),
                            column: c,
                        });

                    if target.is_none() {
                        diagnostics.push(
                            Diagnostic::new(
                                DiagnosticCode::UnresolvedForeignKey,
                                Severity::Warn,
                                format!(
                                    "foreign key target '{}.{}.{}' not resolvable in schema '{}'; relation dropped",
                                    key.target_schema, key.target_table, key.target_column, schema
                                ),
                            )
                            .with_object(format!("{}.{}", key.table, key.column)),
                        );
                    }

                    tables[table].columns[column].key = KeyRole::Foreign { target };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_marker_normalization() {
        assert_eq!(normalize_type_name("_int4", "ARRAY"), (true, "int4"));
        assert_eq!(normalize_type_name("int4", "integer"), (false, "int4"));
        // Array discriminator without the underscore prefix still flags.
        assert_eq!(normalize_type_name("text", "ARRAY"), (true, "text"));
    }

    #[test]
    fn missing_schema_fails_fast() {
        let catalog = RawCatalog::default();
        let err = SchemaGraphBuilder::new(&catalog).build("public").unwrap_err();
        assert!(matches!(err, BuildError::SchemaNotFound { .. }));
    }
}
