//! Single-target generation: introspect, then emit.

use tracing::info;

use crate::config::EmitterConfig;
use crate::emitter::{FixtureEmitter, GeneratedArtifact};
use crate::error::Result;
use crate::introspect::{DescribeIntrospector, Introspect};
use crate::schema::Describe;
use crate::strategy::StrategyTable;

/// Generate the fixture for the target exposed by `introspector`
///
/// Introspection happens first; if it fails nothing is emitted.
pub fn generate<I: Introspect + ?Sized>(
    introspector: &I,
    table: &StrategyTable,
    config: &EmitterConfig,
) -> Result<GeneratedArtifact> {
    config.validate()?;
    let target = introspector.target()?;
    let artifact = FixtureEmitter::new(table, config).emit(&target)?;
    info!(
        target_type = target.simple_name(),
        fixture = artifact.class_name(),
        lines = artifact.line_count(),
        "generated fixture"
    );
    Ok(artifact)
}

/// Generate the fixture for a [`Describe`] type with the built-in strategies
/// and default configuration
pub fn generate_for<T: Describe>() -> Result<GeneratedArtifact> {
    generate(
        &DescribeIntrospector::<T>::new(),
        StrategyTable::builtin(),
        &EmitterConfig::default(),
    )
}
