use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use fixture_creator::{
    GeneratedArtifact, GeneratorSettings, SchemaDocument, SchemaIntrospector, generate,
    generate_all,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Parser)]
#[command(name = "fixture-creator")]
#[command(about = "Generate builder-style test fixture classes from a type schema", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a JSON settings file (indentation, suffix, extra strategies)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fixture classes for types in a schema document
    Generate {
        /// Path to the JSON schema document
        schema: PathBuf,

        /// Simple name of the type to generate (may be omitted if the schema has one type)
        #[arg(short, long, conflicts_with = "all")]
        target: Option<String>,

        /// Generate a fixture for every type in the schema
        #[arg(short, long)]
        all: bool,

        /// Write `<Class>.java` files into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent with this many spaces instead of tabs (1 to 16)
        #[arg(long)]
        indent_spaces: Option<usize>,

        /// Fixture class name suffix
        #[arg(long)]
        suffix: Option<String>,

        /// Worker threads for --all
        #[arg(long)]
        threads: Option<usize>,
    },
    /// List the types declared in a schema document
    Types {
        /// Path to the JSON schema document
        schema: PathBuf,
    },
    /// Show the generation strategy table in effect
    Strategies,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => GeneratorSettings::from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => GeneratorSettings::default(),
    };

    match cli.command {
        Commands::Generate {
            schema,
            target,
            all,
            output,
            indent_spaces,
            suffix,
            threads,
        } => {
            let overrides = GeneratorSettings {
                indent_spaces,
                fixture_suffix: suffix,
                threads,
                ..Default::default()
            };
            generate_fixtures(
                &schema,
                target,
                all,
                output,
                settings.merge_with(overrides),
            )
        }
        Commands::Types { schema } => list_types(&schema),
        Commands::Strategies => show_strategies(&settings),
    }
}

// Logs go to stderr; stdout carries the generated source.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}

fn load_schema(path: &Path) -> Result<SchemaDocument> {
    SchemaDocument::from_path(path)
        .with_context(|| format!("Failed to load schema from {}", path.display()))
}

fn generate_fixtures(
    schema_path: &Path,
    target: Option<String>,
    all: bool,
    output: Option<PathBuf>,
    settings: GeneratorSettings,
) -> Result<()> {
    let document = load_schema(schema_path)?;
    let config = settings
        .emitter_config()
        .context("Invalid emitter settings")?;
    let table = settings
        .strategy_table()
        .context("Invalid strategy settings")?;

    let artifacts = if all {
        let batch = settings.batch_config().context("Invalid batch settings")?;
        generate_all(&document, &table, &config, &batch)
            .context("Failed to generate fixtures")?
    } else {
        let target = match target {
            Some(name) => name,
            None => match document.sole_type() {
                Some(schema) => schema.name.clone(),
                None => bail!(
                    "Schema declares {} types ({}); pick one with --target or use --all",
                    document.len(),
                    document.type_names().join(", ")
                ),
            },
        };
        let artifact = generate(&SchemaIntrospector::new(&document, &target), &table, &config)
            .with_context(|| format!("Failed to generate fixture for '{}'", target))?;
        vec![artifact]
    };

    match output {
        Some(dir) => write_files(&dir, &artifacts),
        None => print_artifacts(&artifacts),
    }
}

fn print_artifacts(artifacts: &[GeneratedArtifact]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (idx, artifact) in artifacts.iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }
        artifact
            .write_to(&mut out)
            .context("Failed to write fixture to stdout")?;
    }
    out.flush()?;

    Ok(())
}

fn write_files(dir: &Path, artifacts: &[GeneratedArtifact]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    // Stage everything first so a write error leaves no fixture files behind.
    let mut staged = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(artifact.file_name());
        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
        artifact
            .write_to(&mut file)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        staged.push((path, file, artifact.line_count()));
    }

    for (path, file, line_count) in staged {
        file.persist(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!(
            "{}",
            format!("✓ Wrote {} ({} lines)", path.display(), line_count).green()
        );
    }

    Ok(())
}

fn list_types(schema_path: &Path) -> Result<()> {
    let document = load_schema(schema_path)?;

    if document.is_empty() {
        println!("{}", "No types declared.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} type(s):", document.len()).bold()
    );
    println!();

    for schema in &document.types {
        print!("  {} ", "●".bright_cyan());
        print!("{}", schema.name.cyan().bold());
        match &schema.fields {
            Some(fields) => println!(
                " ({} field{})",
                fields.len(),
                if fields.len() == 1 { "" } else { "s" }
            ),
            None => println!(" {}", "(no field metadata)".bright_red()),
        }
    }

    Ok(())
}

fn show_strategies(settings: &GeneratorSettings) -> Result<()> {
    let table = settings
        .strategy_table()
        .context("Invalid strategy settings")?;

    println!("{}", "Generation Strategies".bold().cyan());
    println!();
    for (ty, template) in table.entries() {
        println!("  {}: {}", ty.name().bold(), template);
    }
    println!();
    println!(
        "  {}: {}",
        "Any other type".bold(),
        table.default_template().bright_black()
    );

    Ok(())
}
