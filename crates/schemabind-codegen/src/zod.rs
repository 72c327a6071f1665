//! Zod validator emission profile
//!
//! Maps graph types onto `zod` expressions and supplies the default
//! fragment builders for the [`ArtifactEmitter`](crate::ArtifactEmitter).
//! Type lookup is longest-prefix: `timestamptz` matches the `timestamp`
//! entry even when a shorter prefix also applies. Unmapped builtins
//! fall back to `z.any()`, and so does a reference to a skipped enum
//! or composite, whose declaration is absent from the artifact.

use std::rc::Rc;

use schemabind_core::{SchemaGraph, SkipLists, TypeId, TypeKind};

use crate::emit::BuilderSet;
use crate::names::{EntityKind, NameResolver};

/// The statement a generated validator is checked against. Decides
/// which fields are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

/// Per-field facts the optionality rules consume.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldContext {
    pub array: bool,
    pub nullable: bool,
    pub has_default: bool,
    pub primary: bool,
}

/// Prefix-keyed map from builtin type names to target expressions.
#[derive(Debug, Clone)]
pub struct TypeExpressionMap {
    entries: Vec<(String, String)>,
}

impl Default for TypeExpressionMap {
    fn default() -> Self {
        let mut map = Self {
            entries: Vec::new(),
        };
        map.insert("uuid", "z.string().uuid()");
        map.insert("serial", "z.number().int().min(1)");
        map.insert("bool", "z.boolean()");
        map.insert("double", "z.number()");
        map.insert("float", "z.number()");
        map.insert("numeric", "z.number()");
        map.insert("int", "z.number().int()");
        map.insert("text", "z.string()");
        map.insert("varchar", "z.string()");
        map.insert("char", "z.string()");
        map.insert("timestamp", "z.string().datetime()");
        map.insert("date", "z.string()");
        map.insert("json", "z.any()");
        map
    }
}

impl TypeExpressionMap {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, prefix: impl Into<String>, expr: impl Into<String>) {
        let prefix = prefix.into();
        let expr = expr.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = expr,
            None => self.entries.push((prefix, expr)),
        }
    }

    pub fn with(mut self, prefix: impl Into<String>, expr: impl Into<String>) -> Self {
        self.insert(prefix, expr);
        self
    }

    /// Longest matching prefix wins, independent of insertion order.
    pub fn lookup(&self, type_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|(prefix, _)| type_name.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, expr)| expr.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZodProfile {
    pub type_map: TypeExpressionMap,

    /// Skip-lists shared with the emitter. A reference to a skipped
    /// enum or composite cannot name its validator (the declaration is
    /// skipped too), so the expression degrades to the fallback.
    pub skip: SkipLists,
}

impl ZodProfile {
    pub fn new(type_map: TypeExpressionMap) -> Self {
        Self {
            type_map,
            skip: SkipLists::default(),
        }
    }

    pub fn with_skip(mut self, skip: SkipLists) -> Self {
        self.skip = skip;
        self
    }

    /// The full expression for one field: base expression by type kind,
    /// array wrapper, nullability, then operation-dependent optionality.
    pub fn expr(
        &self,
        type_id: TypeId,
        cx: FieldContext,
        op: Operation,
        names: &NameResolver,
        graph: &SchemaGraph,
    ) -> String {
        let ty = graph.type_def(type_id);
        let fallback = || self.type_map.lookup(&ty.name).unwrap_or("z.any()").to_string();
        let base = match &ty.kind {
            _ if self.skip.skips_type(&ty.name) => fallback(),
            TypeKind::Enum { .. } => format!(
                "z.nativeEnum({})",
                names.resolve(EntityKind::Enum, &ty.name)
            ),
            TypeKind::Composite { .. } => names.resolve(EntityKind::CompositeValidator, &ty.name),
            TypeKind::Builtin => fallback(),
        };

        let mut expr = if cx.array {
            format!("z.array({base})")
        } else {
            base
        };
        if cx.nullable {
            expr.push_str(".nullable()");
        }

        let mandatory = match op {
            Operation::Select => false,
            Operation::Insert => !cx.has_default && !cx.nullable,
            Operation::Update | Operation::Delete => cx.primary,
        };
        if !mandatory {
            expr.push_str(".optional()");
        }
        expr
    }

    /// The default builder set: TypeScript enums, `z.object` validators
    /// with inferred type aliases, and function signature objects.
    pub fn builder_set(self) -> BuilderSet {
        let profile = Rc::new(self);

        let enum_builder = {
            Box::new(
                move |ty: &schemabind_core::TypeDef,
                      names: &NameResolver,
                      _graph: &SchemaGraph| {
                    let TypeKind::Enum { values } = &ty.kind else {
                        return String::new();
                    };
                    let body: String = values
                        .iter()
                        .map(|v| format!("\t{v} = '{v}',\n"))
                        .collect();
                    format!(
                        "export enum {} {{\n{}}}",
                        names.resolve(EntityKind::Enum, &ty.name),
                        body
                    )
                },
            )
        };

        let composite_builder = {
            let profile = Rc::clone(&profile);
            Box::new(
                move |ty: &schemabind_core::TypeDef, names: &NameResolver, graph: &SchemaGraph| {
                    let TypeKind::Composite { fields } = &ty.kind else {
                        return String::new();
                    };
                    let body: String = fields
                        .iter()
                        .map(|field| {
                            let expr = profile.expr(
                                field.type_id,
                                FieldContext {
                                    array: field.array,
                                    nullable: field.nullable,
                                    ..FieldContext::default()
                                },
                                Operation::Select,
                                names,
                                graph,
                            );
                            format!("\t{}: {},\n", field.name, expr)
                        })
                        .collect();
                    format!(
                        "export const {validator} = z.object({{\n{body}}});\nexport type {alias} = z.infer<typeof {validator}>;",
                        validator = names.resolve(EntityKind::CompositeValidator, &ty.name),
                        alias = names.resolve(EntityKind::CompositeType, &ty.name),
                        body = body,
                    )
                },
            )
        };

        let function_builder = {
            let profile = Rc::clone(&profile);
            Box::new(
                move |function: &schemabind_core::Function,
                      names: &NameResolver,
                      graph: &SchemaGraph| {
                    let args: String = function
                        .args
                        .iter()
                        .map(|arg| {
                            let expr = profile.expr(
                                arg.type_id,
                                FieldContext {
                                    array: arg.array,
                                    nullable: arg.nullable,
                                    ..FieldContext::default()
                                },
                                Operation::Insert,
                                names,
                                graph,
                            );
                            format!("\t\t{}: {},\n", arg.name, expr)
                        })
                        .collect();
                    let returns = profile.expr(
                        function.returns.type_id,
                        FieldContext {
                            array: function.returns.array,
                            nullable: function.returns.nullable,
                            ..FieldContext::default()
                        },
                        Operation::Insert,
                        names,
                        graph,
                    );
                    format!(
                        "export const {name} = {{\n\targuments: z.object({{\n{args}\t}}),\n\treturns: {returns},\n}};",
                        name = names.resolve(EntityKind::Function, &function.name),
                    )
                },
            )
        };

        let column_builder = {
            let profile = Rc::clone(&profile);
            Box::new(
                move |column: &schemabind_core::Column,
                      names: &NameResolver,
                      graph: &SchemaGraph| {
                    let expr = profile.expr(
                        column.type_id,
                        FieldContext {
                            array: column.array,
                            nullable: column.nullable,
                            has_default: column.has_default(),
                            primary: column.key.is_primary(),
                        },
                        Operation::Select,
                        names,
                        graph,
                    );
                    format!(
                        "\t{}: {},",
                        names.resolve(EntityKind::Column, &column.name),
                        expr
                    )
                },
            )
        };

        let table_builder = Box::new(
            |table: &schemabind_core::Table,
             columns: &str,
             names: &NameResolver,
             _graph: &SchemaGraph| {
                format!(
                    "export const {validator} = z.object({{\n{columns}\n}});\nexport type {alias} = z.infer<typeof {validator}>;",
                    validator = names.resolve(EntityKind::TableValidator, &table.name),
                    alias = names.resolve(EntityKind::Table, &table.name),
                    columns = columns,
                )
            },
        );

        let template = Box::new(|body: &str| {
            format!(
                "/** This file is auto-generated. Do not edit. */\n\nimport z from 'zod';\n\n{body}\n"
            )
        });

        BuilderSet {
            enum_builder,
            composite_builder,
            function_builder,
            column_builder,
            table_builder,
            template,
        }
    }
}
