//! Identifier resolution for emitted artifacts
//!
//! Every generated identifier flows through one [`NameResolver`], so a
//! rename configured once applies to the declaration and to every
//! reference site alike. Resolution precedence: a literal per-entity
//! override, then a per-kind strategy, then the built-in default for
//! the kind.

use std::collections::HashMap;

use schemabind_core::RenameRules;

/// What is being named. Validator kinds are distinct from the type or
/// table they validate because both identifiers can appear in one
/// artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Enum,
    CompositeType,
    CompositeValidator,
    Table,
    TableValidator,
    Column,
    Function,
}

type NamerFn = Box<dyn Fn(&str) -> String>;

/// Pascal-case a catalog identifier: words split on space, hyphen, or
/// underscore, first letter of each word upper-cased, digits untouched.
pub fn pascal_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut upper_next = true;
    for ch in raw.chars() {
        if matches!(ch, ' ' | '-' | '_') {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[derive(Default)]
pub struct NameResolver {
    literal: HashMap<EntityKind, HashMap<String, String>>,
    per_kind: HashMap<EntityKind, NamerFn>,
}

impl NameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed literal overrides from configured rename rules. Composite
    /// type renames also rename the matching validator, keeping the
    /// alias and its validator in step.
    pub fn from_renames(rules: &RenameRules) -> Self {
        let mut names = Self::new().with_literals(EntityKind::Enum, rules.enums.clone());
        for (raw, renamed) in &rules.types {
            names = names
                .with_literal(EntityKind::CompositeType, raw, renamed)
                .with_literal(EntityKind::CompositeValidator, raw, format!("zod{renamed}"));
        }
        for (raw, renamed) in &rules.tables {
            names = names
                .with_literal(EntityKind::Table, raw, renamed)
                .with_literal(EntityKind::TableValidator, raw, format!("zod{renamed}"));
        }
        names
            .with_literals(EntityKind::Column, rules.columns.clone())
            .with_literals(EntityKind::Function, rules.functions.clone())
    }

    /// Pin one entity to an exact output name.
    pub fn with_literal(
        mut self,
        kind: EntityKind,
        raw: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.literal
            .entry(kind)
            .or_default()
            .insert(raw.into(), name.into());
        self
    }

    /// Install many literal overrides for one kind at once.
    pub fn with_literals(mut self, kind: EntityKind, names: HashMap<String, String>) -> Self {
        self.literal.entry(kind).or_default().extend(names);
        self
    }

    /// Replace the naming strategy for every entity of one kind.
    pub fn with_kind_namer(
        mut self,
        kind: EntityKind,
        namer: impl Fn(&str) -> String + 'static,
    ) -> Self {
        self.per_kind.insert(kind, Box::new(namer));
        self
    }

    pub fn resolve(&self, kind: EntityKind, raw: &str) -> String {
        if let Some(name) = self.literal.get(&kind).and_then(|m| m.get(raw)) {
            return name.clone();
        }
        if let Some(namer) = self.per_kind.get(&kind) {
            return namer(raw);
        }
        match kind {
            // Validators are runtime values next to the type they
            // validate, so they carry a disambiguating prefix.
            EntityKind::CompositeValidator | EntityKind::TableValidator => {
                format!("zod{}", pascal_case(raw))
            }
            // Columns and functions keep their catalog spelling; the
            // generated artifact addresses them by wire name.
            EntityKind::Column | EntityKind::Function => raw.to_string(),
            EntityKind::Enum | EntityKind::CompositeType | EntityKind::Table => pascal_case(raw),
        }
    }
}
