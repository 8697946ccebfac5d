//! # Fixture Creator - Test Fixture Classes from Declared Fields
//!
//! Fixture Creator reads the declared fields of a target type and emits the
//! source of a companion fixture class: a fluent test-data factory with one
//! setter per field, a `build()` that forwards to the type's own builder and a
//! `random()` that fills every field with a generated value.
//!
//! ## Quick Start
//!
//! ```rust
//! use fixture_creator::{EmitterConfig, SchemaDocument, SchemaIntrospector, StrategyTable, generate};
//!
//! let document = SchemaDocument::from_json_str(r#"{
//!     "name": "Xpto",
//!     "package": "br.com.kimae.in",
//!     "fields": [
//!         { "name": "s1", "type": "String" },
//!         { "name": "address", "type": "Address" }
//!     ]
//! }"#).unwrap();
//!
//! let artifact = generate(
//!     &SchemaIntrospector::new(&document, "Xpto"),
//!     StrategyTable::builtin(),
//!     &EmitterConfig::default(),
//! ).unwrap();
//!
//! assert_eq!(artifact.class_name(), "XptoFixture");
//! assert!(artifact.to_string().contains(".address(AddressFixture.get().random().build())"));
//! ```
//!
//! ## Describing Rust types
//!
//! With the `derive` feature, a struct can describe itself:
//!
//! ```rust
//! use fixture_creator::{Describe, generate_for};
//!
//! #[derive(Describe)]
//! #[describe(package = "br.com.kimae.in")]
//! struct Xpto {
//!     s1: String,
//!     #[describe(ty = "Integer")]
//!     i1: i32,
//! }
//!
//! let artifact = generate_for::<Xpto>().unwrap();
//! assert_eq!(artifact.line_count(), 19);
//! ```

// Public modules
pub mod batch;
pub mod config;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod introspect;
pub mod schema;
pub mod strategy;

// Re-export the main public API
pub use batch::generate_all;
pub use config::{
    BatchConfig, ConfigError, DEFAULT_FIXTURE_SUFFIX, EmitterConfig, GeneratorSettings, Indent,
    MAX_INDENT_WIDTH,
};
pub use emitter::{FixtureEmitter, GeneratedArtifact, expected_line_count};
pub use error::{FixtureError, Result};
pub use generator::{generate, generate_for};
pub use introspect::{
    DescribeIntrospector, ImportScope, Introspect, SchemaIntrospector, resolve_target,
};
pub use schema::{
    Describe, FieldDescriptor, FieldSchema, SchemaDocument, TargetType, TypeRef, TypeSchema,
};
pub use strategy::{
    CLASS_NAME_PLACEHOLDER, StrategyTable, StrategyTableBuilder, default_template_for_suffix,
};

// Re-export derive macro when feature is enabled
#[cfg(feature = "derive")]
pub use fixture_creator_derive::Describe;
