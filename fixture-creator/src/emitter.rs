//! Fixture emission: assembling the fixture class text for a target type.
//!
//! The emitted class has four parts, always in this order:
//!
//! 1. a header with the class declaration, the wrapped builder, `build()` and `get()`
//! 2. one fluent setter per field, in declaration order
//! 3. `random()`, chaining one call per field with its generation expression
//! 4. the closing brace
//!
//! For `N` fields the artifact has exactly `9 + 5 * N` lines.

use std::fmt;
use std::io::{self, Write};

use tracing::debug;

use crate::config::EmitterConfig;
use crate::error::Result;
use crate::schema::{FieldDescriptor, TargetType};
use crate::strategy::StrategyTable;

/// Lines in the header block
pub const HEADER_LINES: usize = 4;
/// Lines in each per-field setter block
pub const SETTER_LINES: usize = 4;

/// Number of lines emitted for a target with `field_count` fields
pub fn expected_line_count(field_count: usize) -> usize {
    // header + setters + random() open/return + chain + terminator/close + class close
    HEADER_LINES + SETTER_LINES * field_count + 2 + field_count + 2 + 1
}

/// The generated source of one fixture class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    class_name: String,
    lines: Vec<String>,
}

impl GeneratedArtifact {
    pub fn new(class_name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            class_name: class_name.into(),
            lines,
        }
    }

    /// Name of the generated fixture class
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Emitted lines, without line terminators
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Conventional source file name for the class
    pub fn file_name(&self) -> String {
        format!("{}.java", self.class_name)
    }

    /// Write every line, newline-terminated, to `sink`
    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(sink, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Display for GeneratedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Emits fixture classes using a strategy table and emitter configuration
#[derive(Debug, Clone, Copy)]
pub struct FixtureEmitter<'a> {
    table: &'a StrategyTable,
    config: &'a EmitterConfig,
}

impl<'a> FixtureEmitter<'a> {
    pub fn new(table: &'a StrategyTable, config: &'a EmitterConfig) -> Self {
        Self { table, config }
    }

    /// Emit the fixture class for `target`
    ///
    /// The artifact is assembled completely before it is returned, so a
    /// failing field never leaves partial output behind.
    #[tracing::instrument(skip_all, fields(target_type = target.simple_name(), field_count = target.fields().len()))]
    pub fn emit(&self, target: &TargetType) -> Result<GeneratedArtifact> {
        self.config.validate()?;
        let target_name = target.simple_name();
        let fixture_name = self.config.fixture_class_name(target_name);
        let mut out = LineBuffer::new(self.config, expected_line_count(target.fields().len()));

        out.push(0, format!("public class {} {{", fixture_name));
        out.push(
            1,
            format!(
                "private {}Builder builder = {}.builder();",
                target_name, target_name
            ),
        );
        out.push(
            1,
            format!("public {} build() {{ return builder.build(); }}", target_name),
        );
        out.push(
            1,
            format!(
                "public static {} get() {{ return new {}(); }}",
                fixture_name, fixture_name
            ),
        );

        for field in target.fields() {
            self.emit_setter(&mut out, &fixture_name, field);
        }

        out.push(1, format!("public {} random() {{", fixture_name));
        out.push(2, "return this".to_string());
        for field in target.fields() {
            let expression = self
                .table
                .resolve_for_suffix(field.declared_type(), &self.config.fixture_suffix)
                .map_err(|e| e.with_field(field.name()))?;
            debug!(field = field.name(), expression = %expression, "resolved strategy");
            out.push(3, format!(".{}({})", field.name(), expression));
        }
        out.push(2, ";".to_string());
        out.push(1, "}".to_string());
        out.push(0, "}".to_string());

        let lines = out.finish();
        debug_assert_eq!(lines.len(), expected_line_count(target.fields().len()));
        Ok(GeneratedArtifact::new(fixture_name, lines))
    }

    fn emit_setter(&self, out: &mut LineBuffer<'_>, fixture_name: &str, field: &FieldDescriptor) {
        let name = field.name();
        out.push(
            1,
            format!(
                "public {} {}(final {} {}) {{",
                fixture_name,
                name,
                field.declared_type().name(),
                name
            ),
        );
        out.push(2, format!("builder.{}({});", name, name));
        out.push(2, "return this;".to_string());
        out.push(1, "}".to_string());
    }
}

struct LineBuffer<'a> {
    config: &'a EmitterConfig,
    lines: Vec<String>,
}

impl<'a> LineBuffer<'a> {
    fn new(config: &'a EmitterConfig, capacity: usize) -> Self {
        Self {
            config,
            lines: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, depth: usize, text: String) {
        self.lines
            .push(format!("{}{}", self.config.indent.at_depth(depth), text));
    }

    fn finish(self) -> Vec<String> {
        self.lines
    }
}
