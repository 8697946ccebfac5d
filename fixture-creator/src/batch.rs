//! Generating fixtures for every type of a schema document.
//!
//! Each generation is independent and the strategy table is read-only, so
//! types can be spread across scoped worker threads without locking. Results
//! come back in document order and the batch is all-or-nothing.

use tracing::{debug, info};

use crate::config::{BatchConfig, EmitterConfig};
use crate::emitter::{FixtureEmitter, GeneratedArtifact};
use crate::error::{FixtureError, Result};
use crate::introspect::resolve_target;
use crate::schema::{SchemaDocument, TypeSchema};
use crate::strategy::StrategyTable;

/// Generate a fixture for every type in `document`
///
/// Returns the artifacts in document order. If any type fails, the first
/// failure in document order is returned and no artifacts are.
#[tracing::instrument(skip_all, fields(type_count = document.len(), threads = batch.num_threads))]
pub fn generate_all(
    document: &SchemaDocument,
    table: &StrategyTable,
    config: &EmitterConfig,
    batch: &BatchConfig,
) -> Result<Vec<GeneratedArtifact>> {
    config.validate()?;
    batch.validate()?;
    document.validate()?;

    let types = &document.types;
    let num_threads = batch.num_threads.min(types.len());
    if !batch.parallel || num_threads <= 1 {
        debug!("generating sequentially");
        return types
            .iter()
            .map(|schema| generate_one(schema, table, config))
            .collect();
    }

    let chunk_size = types.len().div_ceil(num_threads);
    info!(num_threads, chunk_size, "generating in parallel");

    // Use crossbeam for scoped threads so workers can borrow the table
    let joined = crossbeam::scope(|s| {
        let handles: Vec<_> = types
            .chunks(chunk_size)
            .map(|chunk| {
                s.spawn(move |_| {
                    chunk
                        .iter()
                        .map(|schema| generate_one(schema, table, config))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Vec<_>>()
    })
    .map_err(|_| FixtureError::internal("worker thread panicked during batch generation"))?;

    let mut artifacts = Vec::with_capacity(types.len());
    for chunk in joined {
        let results = chunk.map_err(|_| {
            FixtureError::internal("worker thread panicked during batch generation")
        })?;
        for result in results {
            artifacts.push(result?);
        }
    }
    Ok(artifacts)
}

fn generate_one(
    schema: &TypeSchema,
    table: &StrategyTable,
    config: &EmitterConfig,
) -> Result<GeneratedArtifact> {
    let target = resolve_target(schema)?;
    FixtureEmitter::new(table, config).emit(&target)
}
