//! Artifact emitter
//!
//! Walks one schema graph in a fixed order (enums, composites,
//! functions, tables) and concatenates the fragments the configured
//! builders produce. Every fragment site checks the skip-lists first,
//! then the literal replacement text, then falls through to the
//! builder, so configuration wins over generation at each level.

use schemabind_core::{Column, Function, ReplaceRules, SchemaGraph, SkipLists, Table, TypeDef};

use crate::names::NameResolver;
use crate::zod::ZodProfile;

pub type TypeBuilderFn = Box<dyn Fn(&TypeDef, &NameResolver, &SchemaGraph) -> String>;
pub type FunctionBuilderFn = Box<dyn Fn(&Function, &NameResolver, &SchemaGraph) -> String>;
pub type ColumnBuilderFn = Box<dyn Fn(&Column, &NameResolver, &SchemaGraph) -> String>;
pub type TableBuilderFn = Box<dyn Fn(&Table, &str, &NameResolver, &SchemaGraph) -> String>;
pub type TemplateFn = Box<dyn Fn(&str) -> String>;

/// The per-entity fragment builders plus the file template. The table
/// builder receives its column fragments pre-joined so a replacement
/// table never renders its columns.
pub struct BuilderSet {
    pub enum_builder: TypeBuilderFn,
    pub composite_builder: TypeBuilderFn,
    pub function_builder: FunctionBuilderFn,
    pub column_builder: ColumnBuilderFn,
    pub table_builder: TableBuilderFn,
    pub template: TemplateFn,
}

impl Default for BuilderSet {
    fn default() -> Self {
        ZodProfile::default().builder_set()
    }
}

pub struct ArtifactEmitter {
    builders: BuilderSet,
    skip: SkipLists,
    replace: ReplaceRules,
    names: NameResolver,
}

impl Default for ArtifactEmitter {
    fn default() -> Self {
        Self::new(BuilderSet::default())
    }
}

impl ArtifactEmitter {
    pub fn new(builders: BuilderSet) -> Self {
        Self {
            builders,
            skip: SkipLists::default(),
            replace: ReplaceRules::default(),
            names: NameResolver::new(),
        }
    }

    /// Emitter over the default zod profile with one set of skip-lists
    /// governing both declaration filtering and reference expressions,
    /// so a skipped type never leaves a dangling identifier behind.
    pub fn zod(skip: SkipLists) -> Self {
        Self::new(ZodProfile::default().with_skip(skip.clone()).builder_set()).with_skip(skip)
    }

    pub fn with_skip(mut self, skip: SkipLists) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_replacements(mut self, replace: ReplaceRules) -> Self {
        self.replace = replace;
        self
    }

    pub fn with_names(mut self, names: NameResolver) -> Self {
        self.names = names;
        self
    }

    /// Render the whole artifact for one schema. Repeated calls over
    /// the same graph produce byte-identical text.
    pub fn emit(&self, graph: &SchemaGraph) -> String {
        let enums = self.section(graph.types.iter().filter(|t| t.is_enum()), |ty| {
            self.replace
                .enums
                .get(&ty.name)
                .cloned()
                .unwrap_or_else(|| (self.builders.enum_builder)(ty, &self.names, graph))
        });

        let composites = self.section(graph.types.iter().filter(|t| t.is_composite()), |ty| {
            self.replace
                .types
                .get(&ty.name)
                .cloned()
                .unwrap_or_else(|| (self.builders.composite_builder)(ty, &self.names, graph))
        });

        let functions: Vec<String> = graph
            .functions
            .iter()
            .filter(|f| !self.skip.skips_function(&f.name))
            .map(|f| {
                self.replace
                    .functions
                    .get(&f.name)
                    .cloned()
                    .unwrap_or_else(|| (self.builders.function_builder)(f, &self.names, graph))
            })
            .collect();

        let tables: Vec<String> = graph
            .tables
            .iter()
            .filter(|t| !self.skip.skips_table(&t.name))
            .map(|t| self.emit_table(t, graph))
            .collect();

        let body = [enums, composites, functions, tables]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n\n");

        (self.builders.template)(&body)
    }

    fn section<'g>(
        &self,
        types: impl Iterator<Item = &'g TypeDef>,
        fragment: impl Fn(&TypeDef) -> String,
    ) -> Vec<String> {
        types
            .filter(|ty| !self.skip.skips_type(&ty.name))
            .map(fragment)
            .collect()
    }

    fn emit_table(&self, table: &Table, graph: &SchemaGraph) -> String {
        if let Some(text) = self.replace.tables.get(&table.name) {
            return text.clone();
        }

        let columns = table
            .columns
            .iter()
            .filter(|c| !self.skip.skips_column(&table.name, &c.name))
            .map(|c| {
                self.replace
                    .columns
                    .get(&c.name)
                    .cloned()
                    .unwrap_or_else(|| (self.builders.column_builder)(c, &self.names, graph))
            })
            .collect::<Vec<_>>()
            .join("\n");

        (self.builders.table_builder)(table, &columns, &self.names, graph)
    }
}
