//! Description and artifact emission tests over a small catalog.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use schemabind_catalog::{
    ColumnRow, CompositeFieldRow, CompositeRow, ConstraintKind, EnumRow, FunctionRow, KeyRow,
    RawCatalog,
};
use schemabind_codegen::{describe, ArtifactEmitter, EntityKind, NameResolver};
use schemabind_core::{ReplaceRules, SchemaGraph, SkipLists};
use schemabind_graph::SchemaGraphBuilder;
use serde_json::json;

const SCHEMA: &str = "public";

fn column(table: &str, name: &str, udt_name: &str, nullable: bool) -> ColumnRow {
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

fn key(table: &str, col: &str, constraint: ConstraintKind, target: (&str, &str)) -> KeyRow {
    KeyRow {
        schema: SCHEMA.to_string(),
        table: table.to_string(),
        column: col.to_string(),
        constraint,
        target_schema: SCHEMA.to_string(),
        target_table: target.0.to_string(),
        target_column: target.1.to_string(),
    }
}

fn sample_catalog() -> RawCatalog {
    RawCatalog {
        columns: vec![
            column("auth", "id", "uuid", false),
            column("auth", "key", "text", false),
            column("user", "id", "uuid", false),
            column("user", "auth_id", "uuid", false),
            column("user", "role", "role_type", false),
            ColumnRow {
                default: Some("''::text".to_string()),
                ..column("user", "name", "text", false)
            },
            ColumnRow {
                data_type: "ARRAY".to_string(),
                ..column("user", "labels", "_text", true)
            },
        ],
        enums: vec![EnumRow {
            schema: SCHEMA.to_string(),
            name: "role_type".to_string(),
            values: "admin;user".to_string(),
        }],
        composites: vec![CompositeRow {
            schema: SCHEMA.to_string(),
            name: "user_auth_type".to_string(),
            fields: vec![
                CompositeFieldRow {
                    name: "id".to_string(),
                    nullable: true,
                    udt_name: "uuid".to_string(),
                    data_type: "uuid".to_string(),
                    ordinal: 1,
                },
                CompositeFieldRow {
                    name: "role".to_string(),
                    nullable: true,
                    udt_name: "role_type".to_string(),
                    data_type: "USER-DEFINED".to_string(),
                    ordinal: 2,
                },
            ],
        }],
        keys: vec![
            key("auth", "id", ConstraintKind::PrimaryKey, ("auth", "id")),
            key("user", "id", ConstraintKind::PrimaryKey, ("user", "id")),
            key("user", "auth_id", ConstraintKind::ForeignKey, ("auth", "id")),
        ],
        functions: vec![FunctionRow {
            schema: SCHEMA.to_string(),
            name: "get_user".to_string(),
            args: "user_id uuid".to_string(),
            return_type: "user_auth_type".to_string(),
        }],
    }
}

fn sample_graph() -> SchemaGraph {
    let catalog = sample_catalog();
    SchemaGraphBuilder::new(&catalog).build(SCHEMA).unwrap()
}

#[test]
fn description_matches_reference_shape() {
    let description = describe(&sample_graph(), &SkipLists::default());
    let actual = serde_json::to_value(&description).unwrap();

    let uuid = json!({ "name": "uuid", "type": "native" });
    let text = json!({ "name": "text", "type": "native" });
    let role_enum = json!({
        "name": "role_type",
        "type": "enum",
        "values": ["admin", "user"],
    });
    let user_auth = json!({
        "name": "user_auth_type",
        "type": "custom",
        "fields": [
            { "name": "id", "type": uuid, "array": false, "nullable": true },
            { "name": "role", "type": role_enum, "array": false, "nullable": true },
        ],
    });

    let expected = json!({
        "name": "public",
        // Declaration / first-use order: the declared types come first,
        // then builtins as the tables intern them.
        "types": [role_enum, user_auth, uuid, text],
        "functions": [{
            "name": "get_user",
            "arguments": [
                { "name": "user_id", "type": uuid, "array": false, "nullable": false },
            ],
            "returns": { "name": "returns", "type": user_auth, "array": false, "nullable": true },
        }],
        "tables": [
            {
                "name": "auth",
                "columns": [
                    { "name": "id", "type": uuid, "array": false, "nullable": false, "key_type": "primary" },
                    { "name": "key", "type": text, "array": false, "nullable": false, "key_type": "none" },
                ],
            },
            {
                "name": "user",
                "columns": [
                    { "name": "id", "type": uuid, "array": false, "nullable": false, "key_type": "primary" },
                    {
                        "name": "auth_id", "type": uuid, "array": false, "nullable": false,
                        "key_type": "foreign",
                        "references": {
                            "table_name": "auth",
                            "name": "id", "type": uuid, "array": false, "nullable": false,
                            "key_type": "primary",
                        },
                    },
                    { "name": "role", "type": role_enum, "array": false, "nullable": false, "key_type": "none" },
                    { "name": "name", "type": text, "array": false, "nullable": false, "key_type": "none" },
                    { "name": "labels", "type": text, "array": true, "nullable": true, "key_type": "none" },
                ],
            },
        ],
    });

    assert_eq!(actual, expected);
}

#[test]
fn builtin_types_are_listed_alongside_declared_ones() {
    let description = describe(&sample_graph(), &SkipLists::default());

    let names: Vec<&str> = description.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["role_type", "user_auth_type", "uuid", "text"]);

    let uuid = description.types.iter().find(|t| t.name == "uuid").unwrap();
    assert_eq!(uuid.kind, "native");
    assert!(uuid.values.is_none());
    assert!(uuid.fields.is_none());
}

#[test]
fn skipped_type_degrades_to_native_at_use_sites() {
    let skip = SkipLists {
        types: vec!["role_type".to_string()],
        ..SkipLists::default()
    };
    let description = describe(&sample_graph(), &skip);

    assert!(description.types.iter().all(|t| t.name != "role_type"));

    let user = description.tables.iter().find(|t| t.name == "user").unwrap();
    let role = user.columns.iter().find(|c| c.name == "role").unwrap();
    assert_eq!(role.ty.name, "role_type");
    assert_eq!(role.ty.kind, "native");
    assert!(role.ty.values.is_none());

    // The composite field over the skipped enum degrades the same way.
    let composite = description
        .types
        .iter()
        .find(|t| t.name == "user_auth_type")
        .unwrap();
    let field = &composite.fields.as_ref().unwrap()[1];
    assert_eq!(field.ty.kind, "native");
}

#[test]
fn reference_into_skipped_table_is_omitted() {
    let skip = SkipLists {
        tables: vec!["auth".to_string()],
        ..SkipLists::default()
    };
    let description = describe(&sample_graph(), &skip);

    assert!(description.tables.iter().all(|t| t.name != "auth"));

    let user = description.tables.iter().find(|t| t.name == "user").unwrap();
    let auth_id = user.columns.iter().find(|c| c.name == "auth_id").unwrap();
    // The role stays foreign even though the target is gone.
    assert_eq!(auth_id.key_type, "foreign");
    assert!(auth_id.references.is_none());
}

#[test]
fn skipped_column_is_absent_from_description() {
    let skip = SkipLists {
        columns: HashMap::from([("user".to_string(), vec!["name".to_string()])]),
        ..SkipLists::default()
    };
    let description = describe(&sample_graph(), &skip);

    let user = description.tables.iter().find(|t| t.name == "user").unwrap();
    assert!(user.columns.iter().all(|c| c.name != "name"));
    assert_eq!(user.columns.len(), 4);
}

#[test]
fn zod_artifact_snapshot() {
    let artifact = ArtifactEmitter::default().emit(&sample_graph());

    let expected = "\
/** This file is auto-generated. Do not edit. */

import z from 'zod';

export enum RoleType {
\tadmin = 'admin',
\tuser = 'user',
}

export const zodUserAuthType = z.object({
\tid: z.string().uuid().nullable().optional(),
\trole: z.nativeEnum(RoleType).nullable().optional(),
});
export type UserAuthType = z.infer<typeof zodUserAuthType>;

export const get_user = {
\targuments: z.object({
\t\tuser_id: z.string().uuid(),
\t}),
\treturns: zodUserAuthType.nullable().optional(),
};

export const zodAuth = z.object({
\tid: z.string().uuid().optional(),
\tkey: z.string().optional(),
});
export type Auth = z.infer<typeof zodAuth>;

export const zodUser = z.object({
\tid: z.string().uuid().optional(),
\tauth_id: z.string().uuid().optional(),
\trole: z.nativeEnum(RoleType).optional(),
\tname: z.string().optional(),
\tlabels: z.array(z.string()).nullable().optional(),
});
export type User = z.infer<typeof zodUser>;
";

    assert_eq!(artifact, expected);
}

#[test]
fn emission_is_deterministic() {
    let graph = sample_graph();
    let emitter = ArtifactEmitter::default();
    assert_eq!(emitter.emit(&graph), emitter.emit(&graph));
}

#[test]
fn renames_flow_to_reference_sites() {
    let names = NameResolver::new().with_literal(EntityKind::Enum, "role_type", "Role");
    let artifact = ArtifactEmitter::default()
        .with_names(names)
        .emit(&sample_graph());

    assert!(artifact.contains("export enum Role {"));
    assert!(artifact.contains("role: z.nativeEnum(Role).optional(),"));
    assert!(!artifact.contains("RoleType"));
}

#[test]
fn replacement_text_wins_over_builder() {
    let replace = ReplaceRules {
        tables: HashMap::from([(
            "auth".to_string(),
            "export type Auth = unknown;".to_string(),
        )]),
        columns: HashMap::from([(
            "labels".to_string(),
            "\tlabels: z.array(z.string()).default([]),".to_string(),
        )]),
        ..ReplaceRules::default()
    };
    let artifact = ArtifactEmitter::default()
        .with_replacements(replace)
        .emit(&sample_graph());

    assert!(artifact.contains("export type Auth = unknown;"));
    assert!(!artifact.contains("zodAuth"));
    assert!(artifact.contains("\tlabels: z.array(z.string()).default([]),"));
    assert!(!artifact.contains("labels: z.array(z.string()).nullable().optional(),"));
}

#[test]
fn skip_lists_filter_generated_artifacts() {
    let skip = SkipLists {
        functions: vec!["get_user".to_string()],
        tables: vec!["auth".to_string()],
        columns: HashMap::from([("user".to_string(), vec!["labels".to_string()])]),
        ..SkipLists::default()
    };
    let artifact = ArtifactEmitter::zod(skip).emit(&sample_graph());

    assert!(!artifact.contains("get_user"));
    assert!(!artifact.contains("zodAuth"));
    assert!(!artifact.contains("labels"));
    assert!(artifact.contains("zodUser"));
}

#[test]
fn skipped_type_references_degrade_in_artifact() {
    let skip = SkipLists {
        types: vec!["role_type".to_string(), "user_auth_type".to_string()],
        ..SkipLists::default()
    };
    let artifact = ArtifactEmitter::zod(skip).emit(&sample_graph());

    // The declarations are gone and nothing still names them.
    assert!(!artifact.contains("export enum RoleType"));
    assert!(!artifact.contains("zodUserAuthType"));
    assert!(!artifact.contains("z.nativeEnum"));

    // Reference sites fall back instead of dangling.
    assert!(artifact.contains("\trole: z.any().optional(),"));
    assert!(artifact.contains("\treturns: z.any().nullable().optional(),"));
}
