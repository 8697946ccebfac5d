//! Schema model for target types and their declared fields.
//!
//! There are two layers here. [`TypeSchema`] and [`FieldSchema`] are the raw,
//! serializable descriptions supplied by a caller (a JSON document or the
//! `Describe` derive). [`TargetType`], [`FieldDescriptor`] and [`TypeRef`] are
//! the resolved, read-only model the emitter works from.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FixtureError, Result};

/// Opaque reference to a declared type
///
/// Holds the type name as resolved by introspection, usually package
/// qualified (`java.lang.String`). Equality and hashing use the full name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef {
    name: String,
}

impl TypeRef {
    /// Create a type reference from a (possibly qualified) type name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The full name, as rendered in generated parameter declarations
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last `.`-separated segment of the name, ignoring generic arguments
    pub fn simple_name(&self) -> &str {
        self.base_name().rsplit('.').next().unwrap_or_default().trim()
    }

    /// The package part of a qualified name, if any
    pub fn package(&self) -> Option<&str> {
        self.base_name()
            .rsplit_once('.')
            .map(|(package, _)| package)
            .filter(|package| !package.is_empty())
    }

    /// Whether the name carries a package prefix
    pub fn is_qualified(&self) -> bool {
        self.base_name().contains('.')
    }

    /// Whether the type is an array (`byte[]`, `java.lang.String[][]`)
    pub fn is_array(&self) -> bool {
        let name = self.name.trim_end();
        name.ends_with("[]") || name.ends_with("...")
    }

    /// Class name a nested fixture for this type is named after
    ///
    /// This is the simple name of the element type, with primitives boxed,
    /// so both `byte[]` and `Byte` map to `Byte`.
    pub fn class_name(&self) -> &str {
        match self.simple_name() {
            "int" => "Integer",
            "long" => "Long",
            "boolean" => "Boolean",
            "double" => "Double",
            "float" => "Float",
            "short" => "Short",
            "byte" => "Byte",
            "char" => "Character",
            other => other,
        }
    }

    fn base_name(&self) -> &str {
        let mut base = self.name.split('<').next().unwrap_or_default().trim_end();
        while let Some(rest) = base
            .strip_suffix("[]")
            .or_else(|| base.strip_suffix("..."))
        {
            base = rest.trim_end();
        }
        base
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A declared field of a target type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    declared_type: TypeRef,
}

impl FieldDescriptor {
    /// Create a field descriptor
    pub fn new(name: impl Into<String>, declared_type: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }

    /// The field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's declared type
    pub fn declared_type(&self) -> &TypeRef {
        &self.declared_type
    }
}

/// The type a fixture is generated for
///
/// Fields are kept in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetType {
    simple_name: String,
    package: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl TargetType {
    /// Create a target type
    pub fn new(
        simple_name: impl Into<String>,
        package: Option<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            simple_name: simple_name.into(),
            package,
            fields,
        }
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Declared fields, in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The package-qualified name, or the simple name when there is no package
    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, self.simple_name),
            None => self.simple_name.clone(),
        }
    }
}

/// Raw description of a single declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Raw description of a target type as supplied by a schema provider
///
/// Type names in `fields` may be bare (`String`, `Address`) and are resolved
/// against `package` and `imports` during introspection. A missing `fields`
/// entry means the type has no accessible field metadata, which is different
/// from an empty field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(default)]
    pub fields: Option<Vec<FieldSchema>>,
}

impl TypeSchema {
    /// Create a schema with an empty field list
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            imports: Vec::new(),
            fields: Some(Vec::new()),
        }
    }

    /// Set the package
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Add an explicit import
    pub fn import(mut self, qualified: impl Into<String>) -> Self {
        self.imports.push(qualified.into());
        self
    }

    /// Append a field
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.fields
            .get_or_insert_with(Vec::new)
            .push(FieldSchema::new(name, ty));
        self
    }
}

/// Types that can describe their own declared fields
///
/// Usually implemented with `#[derive(Describe)]`.
pub trait Describe {
    fn describe() -> TypeSchema;
}

/// A collection of type schemas, in document order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    pub types: Vec<TypeSchema>,
}

impl SchemaDocument {
    pub fn new(types: Vec<TypeSchema>) -> Self {
        Self { types }
    }

    /// Parse a JSON schema document
    ///
    /// A document is either `{ "types": [...] }` or a single type schema.
    /// Type names must be unique.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let malformed = |e: serde_json::Error| {
            FixtureError::introspection("<schema>", format!("malformed schema document: {}", e))
        };

        let value: serde_json::Value = serde_json::from_str(json).map_err(malformed)?;
        let document = if value.get("types").is_some() {
            serde_json::from_str::<SchemaDocument>(json).map_err(malformed)?
        } else {
            Self::new(vec![serde_json::from_str::<TypeSchema>(json).map_err(malformed)?])
        };

        document.validate()?;
        Ok(document)
    }

    /// Check that no type name is declared twice
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for schema in &self.types {
            let name = schema.name.trim();
            if !seen.insert(name) {
                return Err(FixtureError::introspection(
                    name,
                    "type is declared more than once in the schema document",
                ));
            }
        }
        Ok(())
    }

    /// Read and parse a JSON schema document from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            FixtureError::introspection(
                "<schema>",
                format!("cannot read {}: {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&json)
    }

    /// Look up a type schema by simple name
    pub fn get(&self, name: &str) -> Option<&TypeSchema> {
        self.types.iter().find(|schema| schema.name == name)
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|schema| schema.name.as_str()).collect()
    }

    /// The only type in the document, if there is exactly one
    pub fn sole_type(&self) -> Option<&TypeSchema> {
        match self.types.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Whether `name` is a valid Java identifier
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
