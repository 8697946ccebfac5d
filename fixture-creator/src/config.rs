//! Configuration types for controlling fixture emission and batch generation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FixtureError, Result};
use crate::schema::is_identifier;
use crate::strategy::{StrategyTable, default_template_for_suffix};

/// Suffix appended to the target's simple name to form the fixture class name
pub const DEFAULT_FIXTURE_SUFFIX: &str = "Fixture";

/// Widest accepted space indentation per nesting level
pub const MAX_INDENT_WIDTH: usize = 16;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Space indentation must be at least one column wide
    ZeroIndentWidth,
    /// Space indentation is wider than [`MAX_INDENT_WIDTH`]
    IndentTooWide(usize),
    /// The fixture suffix must be usable inside a class name
    InvalidSuffix(String),
    /// A strategy override was given an empty type name
    EmptyStrategyType,
    /// A strategy override was given an empty expression template
    EmptyStrategyTemplate(String),
    /// Invalid number of worker threads (must be > 0)
    InvalidThreadCount(usize),
    /// The settings document could not be parsed
    MalformedSettings(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroIndentWidth => {
                write!(f, "Invalid indentation width: 0 (must be > 0)")
            }
            ConfigError::IndentTooWide(width) => write!(
                f,
                "Invalid indentation width: {} (must be at most {})",
                width, MAX_INDENT_WIDTH
            ),
            ConfigError::InvalidSuffix(suffix) => {
                write!(f, "Invalid fixture suffix: '{}' (must be an identifier)", suffix)
            }
            ConfigError::EmptyStrategyType => {
                write!(f, "Strategy override has an empty type name")
            }
            ConfigError::EmptyStrategyTemplate(ty) => {
                write!(f, "Strategy override for '{}' has an empty template", ty)
            }
            ConfigError::InvalidThreadCount(n) => {
                write!(f, "Invalid thread count: {} (must be > 0)", n)
            }
            ConfigError::MalformedSettings(message) => {
                write!(f, "Malformed settings: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Indentation unit used for emitted lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    /// Indentation for the given nesting depth
    ///
    /// Space widths above [`MAX_INDENT_WIDTH`] are clamped; validation
    /// rejects them before emission.
    pub fn at_depth(&self, depth: usize) -> String {
        match self {
            Indent::Tab => "\t".repeat(depth),
            Indent::Spaces(width) => {
                let columns = (*width)
                    .min(MAX_INDENT_WIDTH)
                    .checked_mul(depth)
                    .unwrap_or(MAX_INDENT_WIDTH);
                " ".repeat(columns)
            }
        }
    }
}

/// Configuration for the fixture emitter
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    /// Indentation unit for nested lines
    pub indent: Indent,
    /// Suffix that turns a target name into a fixture class name
    pub fixture_suffix: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            indent: Indent::Tab,
            fixture_suffix: DEFAULT_FIXTURE_SUFFIX.to_string(),
        }
    }
}

impl EmitterConfig {
    /// Create a new emitter configuration with validation
    pub fn new(indent: Indent, fixture_suffix: impl Into<String>) -> std::result::Result<Self, ConfigError> {
        let config = Self {
            indent,
            fixture_suffix: fixture_suffix.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the emitter configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        match self.indent {
            Indent::Spaces(0) => return Err(ConfigError::ZeroIndentWidth),
            Indent::Spaces(width) if width > MAX_INDENT_WIDTH => {
                return Err(ConfigError::IndentTooWide(width));
            }
            _ => {}
        }
        validate_suffix(&self.fixture_suffix)
    }

    /// Name of the fixture class generated for `target_name`
    pub fn fixture_class_name(&self, target_name: &str) -> String {
        format!("{}{}", target_name, self.fixture_suffix)
    }
}

/// Configuration for generating several fixtures at once
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Number of worker threads
    pub num_threads: usize,
    /// Whether to spread the batch across threads at all
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            parallel: true,
        }
    }
}

impl BatchConfig {
    /// Create a new batch configuration with validation
    pub fn new(num_threads: usize, parallel: bool) -> std::result::Result<Self, ConfigError> {
        if num_threads == 0 {
            return Err(ConfigError::InvalidThreadCount(num_threads));
        }
        Ok(Self {
            num_threads,
            parallel,
        })
    }

    /// A configuration that generates everything on the calling thread
    pub fn sequential() -> Self {
        Self {
            num_threads: 1,
            parallel: false,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.num_threads == 0 {
            return Err(ConfigError::InvalidThreadCount(self.num_threads));
        }
        Ok(())
    }
}

/// User-facing generator settings, usually loaded from a JSON config file
///
/// Every field is optional; unset fields fall back to the defaults of
/// [`EmitterConfig`], [`BatchConfig`] and the built-in strategy table.
///
/// ```json
/// {
///   "indent_spaces": 4,
///   "fixture_suffix": "Fixture",
///   "threads": 2,
///   "strategies": { "java.util.UUID": "UUID.randomUUID()" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Indent with this many spaces instead of tabs
    pub indent_spaces: Option<usize>,
    /// Fixture class name suffix
    pub fixture_suffix: Option<String>,
    /// Worker threads for batch generation
    pub threads: Option<usize>,
    /// Extra strategies keyed by resolved type name; may use `{{CLASS_NAME}}`
    pub strategies: BTreeMap<String, String>,
}

impl GeneratorSettings {
    /// Parse settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FixtureError::Config(ConfigError::MalformedSettings(e.to_string())))
    }

    /// Read settings from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| FixtureError::io(e.to_string(), Some(path.display().to_string())))?;
        Self::from_json_str(&json)
    }

    /// Merge with `overrides`, whose set values take precedence
    ///
    /// Strategy maps are combined; an override replaces an entry for the same type.
    pub fn merge_with(mut self, overrides: GeneratorSettings) -> Self {
        self.strategies.extend(overrides.strategies);
        Self {
            indent_spaces: overrides.indent_spaces.or(self.indent_spaces),
            fixture_suffix: overrides.fixture_suffix.or(self.fixture_suffix),
            threads: overrides.threads.or(self.threads),
            strategies: self.strategies,
        }
    }

    /// Build the emitter configuration these settings describe
    pub fn emitter_config(&self) -> std::result::Result<EmitterConfig, ConfigError> {
        let indent = match self.indent_spaces {
            Some(width) => Indent::Spaces(width),
            None => Indent::Tab,
        };
        let suffix = self
            .fixture_suffix
            .clone()
            .unwrap_or_else(|| DEFAULT_FIXTURE_SUFFIX.to_string());
        EmitterConfig::new(indent, suffix)
    }

    /// Build the batch configuration these settings describe
    pub fn batch_config(&self) -> std::result::Result<BatchConfig, ConfigError> {
        match self.threads {
            Some(threads) => BatchConfig::new(threads, threads > 1),
            None => Ok(BatchConfig::default()),
        }
    }

    /// Build the strategy table these settings describe
    ///
    /// Starts from the built-in entries, adds the configured overrides and
    /// points the nested-fixture fallback at the configured suffix.
    pub fn strategy_table(&self) -> std::result::Result<StrategyTable, ConfigError> {
        let suffix = self
            .fixture_suffix
            .as_deref()
            .unwrap_or(DEFAULT_FIXTURE_SUFFIX);
        validate_suffix(suffix)?;

        let mut builder = StrategyTable::builtin()
            .to_builder()
            .default_template(default_template_for_suffix(suffix));
        for (ty, template) in &self.strategies {
            if ty.trim().is_empty() {
                return Err(ConfigError::EmptyStrategyType);
            }
            if template.trim().is_empty() {
                return Err(ConfigError::EmptyStrategyTemplate(ty.clone()));
            }
            builder = builder.put(ty.trim(), template.as_str());
        }
        Ok(builder.build())
    }
}

fn validate_suffix(suffix: &str) -> std::result::Result<(), ConfigError> {
    // The suffix is appended to an identifier, so it may start with a digit.
    let as_tail = format!("_{}", suffix);
    if suffix.is_empty() || !is_identifier(&as_tail) {
        return Err(ConfigError::InvalidSuffix(suffix.to_string()));
    }
    Ok(())
}
