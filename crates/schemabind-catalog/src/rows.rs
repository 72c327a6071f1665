//! Raw catalog row shapes
//!
//! These mirror what the fixed catalog queries return, normalized only
//! at the text edge (`is_nullable` strings become booleans, constraint
//! types become an enum). Array markers stay raw: an array column
//! carries `data_type == "ARRAY"` and a `_`-prefixed `udt_name`;
//! normalizing that is the graph builder's job.

/// One `information_schema.columns` row.
///
/// Rows arrive pre-sorted by (table, ordinal position); that ordering
/// is a contract on the source, the builder does not re-sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub default: Option<String>,
    pub nullable: bool,

    /// Base type name, `_`-prefixed for arrays (e.g. `_int4`).
    pub udt_name: String,

    /// Data-type discriminator; `"ARRAY"` flags array columns.
    pub data_type: String,
}

/// One enum declaration with its labels joined by `;` in declaration
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRow {
    pub schema: String,
    pub name: String,
    pub values: String,
}

/// One member of a composite type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeFieldRow {
    pub name: String,
    pub nullable: bool,
    pub udt_name: String,
    pub data_type: String,
    pub ordinal: i32,
}

/// One composite (user-defined record) type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeRow {
    pub schema: String,
    pub name: String,
    pub fields: Vec<CompositeFieldRow>,
}

/// Primary vs. foreign key constraint discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
}

/// One primary/foreign-key constraint row.
///
/// For primary keys the target fields point back at the constrained
/// column itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRow {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub constraint: ConstraintKind,
    pub target_schema: String,
    pub target_table: String,
    pub target_column: String,
}

/// One user-defined function row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRow {
    pub schema: String,
    pub name: String,

    /// Argument list as `name type, name type, ...`.
    pub args: String,

    /// Return type, with an optional trailing `[]` array marker.
    pub return_type: String,
}

/// A complete catalog snapshot: the five row sets the graph builder
/// consumes. Construction is a synchronization barrier — a builder
/// only ever sees all five sets fully fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCatalog {
    pub columns: Vec<ColumnRow>,
    pub enums: Vec<EnumRow>,
    pub composites: Vec<CompositeRow>,
    pub keys: Vec<KeyRow>,
    pub functions: Vec<FunctionRow>,
}

impl RawCatalog {
    /// Whether any row set mentions the schema at all.
    pub fn contains_schema(&self, schema: &str) -> bool {
        self.columns.iter().any(|r| r.schema == schema)
            || self.enums.iter().any(|r| r.schema == schema)
            || self.composites.iter().any(|r| r.schema == schema)
            || self.functions.iter().any(|r| r.schema == schema)
    }

    pub fn columns_for<'a>(&'a self, schema: &'a str) -> impl Iterator<Item = &'a ColumnRow> {
        self.columns.iter().filter(move |r| r.schema == schema)
    }

    pub fn enums_for<'a>(&'a self, schema: &'a str) -> impl Iterator<Item = &'a EnumRow> {
        self.enums.iter().filter(move |r| r.schema == schema)
    }

    pub fn composites_for<'a>(&'a self, schema: &'a str) -> impl Iterator<Item = &'a CompositeRow> {
        self.composites.iter().filter(move |r| r.schema == schema)
    }

    pub fn keys_for<'a>(&'a self, schema: &'a str) -> impl Iterator<Item = &'a KeyRow> {
        self.keys.iter().filter(move |r| r.schema == schema)
    }

    pub fn functions_for<'a>(&'a self, schema: &'a str) -> impl Iterator<Item = &'a FunctionRow> {
        self.functions.iter().filter(move |r| r.schema == schema)
    }

    /// Copy of this catalog restricted to the given schemas.
    pub fn restricted_to(&self, schemas: &[String]) -> RawCatalog {
        let keep = |schema: &str| schemas.iter().any(|s| s == schema);
        RawCatalog {
            columns: self.columns.iter().filter(|r| keep(&r.schema)).cloned().collect(),
            enums: self.enums.iter().filter(|r| keep(&r.schema)).cloned().collect(),
            composites: self.composites.iter().filter(|r| keep(&r.schema)).cloned().collect(),
            keys: self.keys.iter().filter(|r| keep(&r.schema)).cloned().collect(),
            functions: self.functions.iter().filter(|r| keep(&r.schema)).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_schema_catalog() -> RawCatalog {
        RawCatalog {
            columns: vec![
                ColumnRow {
                    schema: "public".to_string(),
                    table: "user".to_string(),
                    name: "id".to_string(),
                    default: None,
                    nullable: false,
                    udt_name: "uuid".to_string(),
                    data_type: "uuid".to_string(),
                },
                ColumnRow {
                    schema: "audit".to_string(),
                    table: "log".to_string(),
                    name: "id".to_string(),
                    default: None,
                    nullable: false,
                    udt_name: "int8".to_string(),
                    data_type: "bigint".to_string(),
                },
            ],
            ..RawCatalog::default()
        }
    }

    #[test]
    fn schema_scoped_iteration() {
        let catalog = two_schema_catalog();

        assert!(catalog.contains_schema("public"));
        assert!(catalog.contains_schema("audit"));
        assert!(!catalog.contains_schema("missing"));

        let tables: Vec<&str> = catalog.columns_for("public").map(|c| c.table.as_str()).collect();
        assert_eq!(tables, vec!["user"]);
    }

    #[test]
    fn restriction_drops_other_schemas() {
        let catalog = two_schema_catalog();
        let restricted = catalog.restricted_to(&["audit".to_string()]);

        assert!(!restricted.contains_schema("public"));
        assert_eq!(restricted.columns.len(), 1);
    }
}
