//! Field introspection: turning a raw type schema into a resolved [`TargetType`].
//!
//! Every provider goes through [`resolve_target`], which validates the schema
//! and resolves each declared type name through an [`ImportScope`].

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use tracing::debug;

use crate::error::{FixtureError, Result};
use crate::schema::{
    Describe, FieldDescriptor, SchemaDocument, TargetType, TypeRef, TypeSchema, is_identifier,
};

/// Types visible without an import
const JAVA_LANG: &[&str] = &[
    "String",
    "Integer",
    "Long",
    "Boolean",
    "Double",
    "Float",
    "Short",
    "Byte",
    "Character",
    "Object",
];

const PRIMITIVES: &[&str] = &[
    "int", "long", "boolean", "double", "float", "short", "byte", "char",
];

/// A source of target type metadata
pub trait Introspect {
    /// Resolve the target type with its declared fields
    fn target(&self) -> Result<TargetType>;

    /// Every declared field of the target, in declaration order
    fn list_fields(&self) -> Result<Vec<FieldDescriptor>> {
        Ok(self.target()?.fields().to_vec())
    }
}

/// Name-resolution scope for the declared types of one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportScope {
    package: Option<String>,
    imports: HashMap<String, String>,
}

impl ImportScope {
    /// Build a scope from a package and explicit imports
    ///
    /// Fails when an import is not a qualified name or two imports share a
    /// simple name.
    pub fn new(target: &str, package: Option<&str>, imports: &[String]) -> Result<Self> {
        let mut by_simple_name = HashMap::new();
        for import in imports {
            let ty = TypeRef::new(import.trim());
            if !ty.is_qualified() || !is_identifier(ty.simple_name()) {
                return Err(FixtureError::introspection(
                    target,
                    format!("import '{}' is not a qualified type name", import),
                ));
            }
            let simple = ty.simple_name().to_string();
            if let Some(previous) = by_simple_name.insert(simple, ty.name().to_string())
                && previous != ty.name()
            {
                return Err(FixtureError::introspection(
                    target,
                    format!(
                        "imports '{}' and '{}' share a simple name",
                        previous,
                        ty.name()
                    ),
                ));
            }
        }

        Ok(Self {
            package: package
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            imports: by_simple_name,
        })
    }

    /// Resolve a declared type name
    ///
    /// Qualified names and primitives are kept as written. Bare names are
    /// looked up in the explicit imports, then `java.lang`, and otherwise
    /// belong to the target's own package. Type arguments are resolved the
    /// same way, and array dimensions (`[]` or a trailing `...`) are kept on
    /// the resolved element type.
    pub fn resolve(&self, declared: &str) -> TypeRef {
        TypeRef::new(self.resolve_name(declared.trim()))
    }

    fn resolve_name(&self, declared: &str) -> String {
        let (element, dimensions) = split_array_dimensions(declared);

        let mut resolved = match element.find('<') {
            Some(idx) if element.ends_with('>') => {
                let arguments = split_type_arguments(&element[idx + 1..element.len() - 1])
                    .into_iter()
                    .map(|argument| self.resolve_argument(argument))
                    .collect::<Vec<_>>();
                format!(
                    "{}<{}>",
                    self.resolve_base(element[..idx].trim()),
                    arguments.join(",")
                )
            }
            // Unbalanced brackets
            Some(_) => return declared.to_string(),
            None => self.resolve_base(element),
        };

        for _ in 0..dimensions {
            resolved.push_str("[]");
        }
        resolved
    }

    fn resolve_argument(&self, argument: &str) -> String {
        let argument = argument.trim();
        if argument == "?" {
            return argument.to_string();
        }
        for bound in ["? extends ", "? super "] {
            if let Some(rest) = argument.strip_prefix(bound) {
                return format!("{}{}", bound, self.resolve_name(rest.trim()));
            }
        }
        self.resolve_name(argument)
    }

    fn resolve_base(&self, base: &str) -> String {
        if base.contains('.') || PRIMITIVES.contains(&base) {
            base.to_string()
        } else if let Some(import) = self.imports.get(base) {
            import.clone()
        } else if JAVA_LANG.contains(&base) {
            format!("java.lang.{}", base)
        } else if let Some(package) = &self.package {
            format!("{}.{}", package, base)
        } else {
            base.to_string()
        }
    }
}

/// Strip trailing `[]` / `...` markers, returning the element and the dimension count
fn split_array_dimensions(declared: &str) -> (&str, usize) {
    let mut element = declared.trim_end();
    let mut dimensions = 0;
    loop {
        if let Some(rest) = element.strip_suffix("[]") {
            element = rest.trim_end();
        } else if let Some(rest) = element.strip_suffix("...") {
            element = rest.trim_end();
        } else {
            return (element, dimensions);
        }
        dimensions += 1;
    }
}

/// Split a type argument list on its top-level commas
fn split_type_arguments(arguments: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in arguments.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(arguments[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(arguments[start..].trim());
    parts
}

/// Validate a raw schema and resolve it into a target type
pub fn resolve_target(schema: &TypeSchema) -> Result<TargetType> {
    let name = schema.name.trim();
    if name.is_empty() {
        return Err(FixtureError::introspection(
            "<unnamed>",
            "target type has no name",
        ));
    }
    if !is_identifier(name) {
        return Err(FixtureError::introspection(
            name,
            "target type name is not an identifier",
        ));
    }

    let fields = schema
        .fields
        .as_ref()
        .ok_or_else(|| FixtureError::introspection(name, "no accessible field metadata"))?;

    let scope = ImportScope::new(name, schema.package.as_deref(), &schema.imports)?;

    let mut seen = HashSet::new();
    let mut descriptors = Vec::with_capacity(fields.len());
    for field in fields {
        let field_name = field.name.trim();
        if !is_identifier(field_name) {
            return Err(FixtureError::introspection(
                name,
                format!("field name '{}' is not an identifier", field.name),
            ));
        }
        if field.ty.trim().is_empty() {
            return Err(FixtureError::introspection(
                name,
                format!("field '{}' has no declared type", field_name),
            ));
        }
        if !seen.insert(field_name) {
            return Err(FixtureError::introspection(
                name,
                format!("field '{}' is declared more than once", field_name),
            ));
        }

        let declared_type = scope.resolve(&field.ty);
        debug!(target_type = name, field = field_name, declared_type = declared_type.name(), "resolved field");
        descriptors.push(FieldDescriptor::new(field_name, declared_type));
    }

    Ok(TargetType::new(name, scope.package, descriptors))
}

/// Introspects a named type from a [`SchemaDocument`]
#[derive(Debug, Clone)]
pub struct SchemaIntrospector<'a> {
    document: &'a SchemaDocument,
    target: String,
}

impl<'a> SchemaIntrospector<'a> {
    pub fn new(document: &'a SchemaDocument, target: impl Into<String>) -> Self {
        Self {
            document,
            target: target.into(),
        }
    }

    /// Simple name of the requested target
    pub fn target_name(&self) -> &str {
        &self.target
    }
}

impl Introspect for SchemaIntrospector<'_> {
    fn target(&self) -> Result<TargetType> {
        self.document.validate()?;
        let schema = self.document.get(&self.target).ok_or_else(|| {
            let available = self.document.type_names();
            let message = if available.is_empty() {
                "schema document declares no types".to_string()
            } else {
                format!("type not found (available: {})", available.join(", "))
            };
            FixtureError::introspection(&self.target, message)
        })?;
        resolve_target(schema)
    }
}

/// Introspects a Rust type through its [`Describe`] implementation
#[derive(Debug)]
pub struct DescribeIntrospector<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Describe> DescribeIntrospector<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: Describe> Default for DescribeIntrospector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Describe> Introspect for DescribeIntrospector<T> {
    fn target(&self) -> Result<TargetType> {
        resolve_target(&T::describe())
    }
}

/// A resolved target can also serve as its own introspector
impl Introspect for TargetType {
    fn target(&self) -> Result<TargetType> {
        Ok(self.clone())
    }
}
