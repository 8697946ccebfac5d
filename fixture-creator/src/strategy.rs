//! Generation strategies: the expression each field type is populated with.
//!
//! A [`StrategyTable`] maps a resolved [`TypeRef`] to an expression template.
//! Templates may reference the type's simple name through
//! [`CLASS_NAME_PLACEHOLDER`]. Types with no entry fall back to the table's
//! default template, which delegates to the nested type's own fixture:
//!
//! ```text
//! {{CLASS_NAME}}Fixture.get().random().build()
//! ```
//!
//! Tables are assembled once through [`StrategyTableBuilder`] and are
//! read-only afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::debug;

use crate::config::DEFAULT_FIXTURE_SUFFIX;
use crate::error::{FixtureError, Result};
use crate::schema::{TypeRef, is_identifier};

/// Placeholder replaced by the field type's simple name
pub const CLASS_NAME_PLACEHOLDER: &str = "{{CLASS_NAME}}";

static BUILTIN: LazyLock<StrategyTable> = LazyLock::new(|| {
    StrategyTable::builder()
        .put("java.time.LocalDate", "LocalDate.now()")
        .put("java.lang.String", "randomAlphanumeric(20)")
        .put("java.lang.Integer", "nextInt()")
        .put("java.lang.Long", "nextLong()")
        .put("java.math.BigDecimal", "new BigDecimal(nextDouble())")
        .put("java.lang.Boolean", "nextBoolean()")
        .build()
});

/// Default template delegating to a nested fixture class with the given suffix
pub fn default_template_for_suffix(suffix: &str) -> String {
    format!("{}{}.get().random().build()", CLASS_NAME_PLACEHOLDER, suffix)
}

/// Read-only mapping from type to generation-expression template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyTable {
    entries: HashMap<TypeRef, String>,
    default_template: String,
    // The stock fallback is renamed after the emitter's fixture suffix
    default_follows_suffix: bool,
}

impl StrategyTable {
    /// Start assembling a new table
    pub fn builder() -> StrategyTableBuilder {
        StrategyTableBuilder::new()
    }

    /// The shared table of built-in strategies
    pub fn builtin() -> &'static StrategyTable {
        &BUILTIN
    }

    /// A copy of this table's entries in a fresh builder
    pub fn to_builder(&self) -> StrategyTableBuilder {
        StrategyTableBuilder {
            entries: self.entries.clone(),
            default_template: self.default_template.clone(),
        }
    }

    /// The template registered for exactly this type
    pub fn get(&self, ty: &TypeRef) -> Option<&str> {
        self.entries.get(ty).map(String::as_str)
    }

    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.entries.contains_key(ty)
    }

    /// Template used for types with no entry
    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by type name
    pub fn entries(&self) -> Vec<(&TypeRef, &str)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(ty, template)| (ty, template.as_str()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Resolve the generation expression for a field of type `ty`
    ///
    /// Lookup is by exact type. Unmapped types use the default template.
    pub fn resolve(&self, ty: &TypeRef) -> Result<String> {
        self.resolve_for_suffix(ty, DEFAULT_FIXTURE_SUFFIX)
    }

    /// Like [`resolve`](Self::resolve), for fixtures named with `suffix`
    ///
    /// When the table still carries the stock default template, unmapped
    /// types delegate to `<Type><suffix>`. A custom default template is used
    /// as written.
    pub fn resolve_for_suffix(&self, ty: &TypeRef, suffix: &str) -> Result<String> {
        if let Some(template) = self.entries.get(ty) {
            return substitute(template, ty);
        }

        debug!(type_name = ty.name(), "no strategy entry, delegating to nested fixture");
        if self.default_follows_suffix && suffix != DEFAULT_FIXTURE_SUFFIX {
            substitute(&default_template_for_suffix(suffix), ty)
        } else {
            substitute(&self.default_template, ty)
        }
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn substitute(template: &str, ty: &TypeRef) -> Result<String> {
    if !template.contains(CLASS_NAME_PLACEHOLDER) {
        return Ok(template.to_string());
    }

    let class_name = ty.class_name();
    if !is_identifier(class_name) {
        return Err(FixtureError::unresolvable_type(ty.name()));
    }
    Ok(template.replace(CLASS_NAME_PLACEHOLDER, class_name))
}

/// Fluent builder for [`StrategyTable`]
///
/// ```rust
/// use fixture_creator::{StrategyTable, TypeRef};
///
/// let table = StrategyTable::builder()
///     .put("java.util.UUID", "UUID.randomUUID()")
///     .build();
///
/// assert_eq!(
///     table.resolve(&TypeRef::new("java.util.UUID")).unwrap(),
///     "UUID.randomUUID()"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StrategyTableBuilder {
    entries: HashMap<TypeRef, String>,
    default_template: String,
}

impl StrategyTableBuilder {
    /// An empty builder with the stock nested-fixture fallback
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            default_template: default_template_for_suffix(DEFAULT_FIXTURE_SUFFIX),
        }
    }

    /// Register a template for a type, replacing any previous entry
    pub fn put(mut self, ty: impl Into<TypeRef>, template: impl Into<String>) -> Self {
        self.entries.insert(ty.into(), template.into());
        self
    }

    /// Register several templates at once
    pub fn extend<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<TypeRef>,
        V: Into<String>,
    {
        self.entries
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replace the fallback template for unmapped types
    pub fn default_template(mut self, template: impl Into<String>) -> Self {
        self.default_template = template.into();
        self
    }

    /// Freeze the table
    pub fn build(self) -> StrategyTable {
        let default_follows_suffix =
            self.default_template == default_template_for_suffix(DEFAULT_FIXTURE_SUFFIX);
        StrategyTable {
            entries: self.entries,
            default_template: self.default_template,
            default_follows_suffix,
        }
    }
}

impl Default for StrategyTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
