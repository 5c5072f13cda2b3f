//! Treeplus CLI - inspect tree-sitter parse trees through a grammar-independent element model

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use treeplus::config::{self, TreeplusConfig};
use treeplus::language::{default_registry, GrammarRegistry};
use treeplus::{scan, ui};

#[derive(Parser)]
#[command(name = "treeplus")]
#[command(version)]
#[command(about = "Grammar-independent element model over tree-sitter parse trees")]
#[command(long_about = r#"
Treeplus wraps tree-sitter parse trees in a uniform element model of
entities, properties and relations derived from each grammar, and lists
every node's values in source order.

Example usage:
  treeplus entities --language python
  treeplus show src/app.py --depth 3
  treeplus scan --path ./src
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entities derived from a grammar
    Entities {
        /// Grammar name (python, javascript, rust, go)
        #[arg(short, long)]
        language: String,

        /// Show a single entity
        #[arg(short, long)]
        entity: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a file's element tree in source order
    Show {
        /// File to parse
        file: PathBuf,

        /// Maximum nesting depth to expand
        #[arg(short, long)]
        depth: Option<usize>,

        /// Print JSON instead of an outline
        #[arg(long)]
        json: bool,
    },

    /// Wrap every supported file in a directory
    Scan {
        /// Directory to scan
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Entities {
            language,
            entity,
            json,
        } => {
            let registry = load_registry(&config)?;
            let grammar = registry
                .find_by_name(&language)
                .with_context(|| format!("unknown language '{}'", language))?;
            let metamodel = grammar.metamodel();

            let entities: Vec<_> = match &entity {
                Some(name) => vec![metamodel
                    .entity(name)
                    .with_context(|| format!("{} has no entity '{}'", grammar.name(), name))?],
                None => metamodel.entities().iter().collect(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entities)?);
            } else {
                ui::header(&format!("{} entities: {}", grammar.name(), entities.len()));
                println!("{}", ui::entity_table(entities));
            }
        }

        Commands::Show { file, depth, json } => {
            let registry = load_registry(&config)?;
            let grammar = registry
                .find_for_path(&file)
                .with_context(|| format!("no grammar handles {}", file.display()))?;
            let outline = scan::render_file(grammar, &file, depth.or(config.max_depth))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outline)?);
            } else {
                ui::file(&file.display().to_string(), grammar.name());
                ui::outline(&outline);
            }
        }

        Commands::Scan { path } => {
            let registry = load_registry(&config)?;
            ui::header(&format!("Scanning {}", path.display()));
            let report = scan::scan(&path, &registry, &config);

            for file in &report.files {
                ui::file(
                    &file.path.display().to_string(),
                    &format!("{} elements ({})", file.elements, file.grammar),
                );
            }
            for (path, error) in &report.failures {
                ui::error(&format!("{}: {}", path.display(), error));
            }

            let files = report.files.len().to_string();
            let elements = report.total_elements().to_string();
            let failed = report.failures.len().to_string();
            let skipped = report.skipped.to_string();
            ui::section("Summary");
            println!(
                "{}",
                ui::stats_table(&[
                    ("Files", files.as_str()),
                    ("Elements", elements.as_str()),
                    ("Failed", failed.as_str()),
                    ("Skipped", skipped.as_str()),
                ])
            );

            if report.failures.is_empty() {
                ui::success("Scan complete");
            } else {
                ui::warn(&format!("{} files could not be wrapped", report.failures.len()));
            }
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let default = TreeplusConfig {
                languages: Some(
                    default_registry()?
                        .grammars()
                        .iter()
                        .map(|g| g.name().to_lowercase())
                        .collect(),
                ),
                ..Default::default()
            };
            config::write_config(&path, &default, force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
    }

    Ok(())
}

/// Built-in grammars, narrowed to the configured languages
fn load_registry(config: &TreeplusConfig) -> anyhow::Result<GrammarRegistry> {
    let mut registry = default_registry()?;
    if let Some(languages) = &config.languages {
        registry.retain_named(languages);
        tracing::debug!(grammars = registry.grammars().len(), "filtered grammars by config");
    }
    Ok(registry)
}
