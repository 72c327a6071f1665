//! Catalog fixtures for builder tests
//!
//! Reproduces the reference test database: four tables (auth, basic,
//! edge_cases, user), one enum, two composite types, and a couple of
//! user-defined functions.

use schemabind_catalog::{
    ColumnRow, CompositeFieldRow, CompositeRow, ConstraintKind, EnumRow, FunctionRow, KeyRow,
    RawCatalog,
};

pub const SCHEMA: &str = "public";

pub fn column(table: &str, name: &str, udt_name: &str, nullable: bool) -> ColumnRow {
    ColumnRow {
        schema: SCHEMA.to_string(),
        table: table.to_string(),
        name: name.to_string(),
        default: None,
        nullable,
        udt_name: udt_name.to_string(),
        data_type: udt_name.to_string(),
    }
}

pub fn array_column(table: &str, name: &str, udt_name: &str, nullable: bool) -> ColumnRow {
    ColumnRow {
        data_type: "ARRAY".to_string(),
        ..column(table, name, udt_name, nullable)
    }
}

pub fn with_default(row: ColumnRow, default: &str) -> ColumnRow {
    ColumnRow {
        default: Some(default.to_string()),
        ..row
    }
}

pub fn composite_field(
    name: &str,
    udt_name: &str,
    data_type: &str,
    ordinal: i32,
) -> CompositeFieldRow {
    CompositeFieldRow {
        name: name.to_string(),
        nullable: true,
        udt_name: udt_name.to_string(),
        data_type: data_type.to_string(),
        ordinal,
    }
}

pub fn primary_key(table: &str, column: &str) -> KeyRow {
    KeyRow {
        schema: SCHEMA.to_string(),
        table: table.to_string(),
        column: column.to_string(),
        constraint: ConstraintKind::PrimaryKey,
        target_schema: SCHEMA.to_string(),
        target_table: table.to_string(),
        target_column: column.to_string(),
    }
}

pub fn foreign_key(table: &str, column: &str, target_table: &str, target_column: &str) -> KeyRow {
    KeyRow {
        schema: SCHEMA.to_string(),
        table: table.to_string(),
        column: column.to_string(),
        constraint: ConstraintKind::ForeignKey,
        target_schema: SCHEMA.to_string(),
        target_table: target_table.to_string(),
        target_column: target_column.to_string(),
    }
}

pub fn function(name: &str, args: &str, return_type: &str) -> FunctionRow {
    FunctionRow {
        schema: SCHEMA.to_string(),
        name: name.to_string(),
        args: args.to_string(),
        return_type: return_type.to_string(),
    }
}

/// The reference catalog snapshot.
pub fn sample_catalog() -> RawCatalog {
    RawCatalog {
        columns: vec![
            // auth
            column("auth", "id", "uuid", false),
            column("auth", "key", "text", false),
            column("auth", "hash", "text", false),
            column("auth", "disabled", "bool", false),
            column("auth", "valid_from", "timestamptz", false),
            column("auth", "valid_until", "timestamptz", true),
            // basic
            with_default(column("basic", "id", "uuid", false), "gen_random_uuid()"),
            column("basic", "text_optional", "text", true),
            column("basic", "text_required", "text", false),
            with_default(
                column("basic", "text_required_with_default", "text", false),
                "'hello'::text",
            ),
            array_column("basic", "text_array", "_text", true),
            column("basic", "number_int", "int4", true),
            array_column("basic", "number_array", "_float8", true),
            column("basic", "jsonb", "jsonb", true),
            // edge_cases
            with_default(
                column("edge_cases", "id", "int4", false),
                "nextval('edge_cases_id_seq'::regclass)",
            ),
            array_column("edge_cases", "type", "_custom_array_type", true),
            // user
            column("user", "id", "uuid", false),
            column("user", "auth_id", "uuid", false),
            column("user", "role", "role_type", false),
            column("user", "name", "text", false),
        ],
        enums: vec![EnumRow {
            schema: SCHEMA.to_string(),
            name: "role_type".to_string(),
            values: "admin;user".to_string(),
        }],
        composites: vec![
            CompositeRow {
                schema: SCHEMA.to_string(),
                name: "custom_array_type".to_string(),
                fields: vec![
                    composite_field("id", "uuid", "uuid", 1),
                    composite_field("roles", "_role_type", "ARRAY", 2),
                ],
            },
            CompositeRow {
                schema: SCHEMA.to_string(),
                name: "user_auth_type".to_string(),
                fields: vec![
                    composite_field("id", "uuid", "uuid", 1),
                    composite_field("role", "role_type", "USER-DEFINED", 2),
                ],
            },
        ],
        keys: vec![
            primary_key("auth", "id"),
            primary_key("basic", "id"),
            primary_key("edge_cases", "id"),
            primary_key("user", "id"),
            foreign_key("user", "auth_id", "auth", "id"),
        ],
        functions: vec![
            function("get_user", "user_id uuid", "user_auth_type"),
            function("list_role_arrays", "", "role_type[]"),
        ],
    }
}
