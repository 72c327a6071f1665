use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use schemabind_catalog::{CatalogSource, PostgresSource};
use schemabind_codegen::{describe, ArtifactEmitter, NameResolver};
use schemabind_core::{Config, Report, SchemaGraph, Severity};
use schemabind_graph::SchemaGraphBuilder;

/// Schemabind - database schema introspection and validator generation
#[derive(Parser)]
#[command(name = "schemabind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemabind.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Connect over TLS
    #[arg(long, global = true)]
    tls: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a structural description of each schema as JSON
    Describe {
        /// Output file (suffixed per schema when several are configured)
        #[arg(short, long, default_value = "schema.json")]
        output: PathBuf,
    },

    /// Generate zod validator source for each schema
    Generate {
        /// Output file (suffixed per schema when several are configured)
        #[arg(short, long, default_value = "schema.ts")]
        output: PathBuf,

        /// Also write a diagnostics report
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Verify database connectivity and exit
    CheckConnection,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("schemabind.toml").exists() {
        Config::from_file(Path::new("schemabind.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if cli.verbose {
        eprintln!(
            "{} {}@{}:{}/{}",
            "Target:".cyan(),
            config.connection.user,
            config.connection.host,
            config.connection.port,
            config.connection.database
        );
    }

    match cli.command {
        Commands::Describe { output } => {
            describe_command(&config, &output, cli.tls, cli.verbose).await
        }
        Commands::Generate { output, report } => {
            generate_command(&config, &output, report.as_deref(), cli.tls, cli.verbose).await
        }
        Commands::CheckConnection => check_connection_command(&config, cli.tls, cli.verbose).await,
    }
}

async fn connect(config: &Config, tls: bool) -> Result<PostgresSource> {
    let conn_str = config.connection.connection_string();
    let source = if tls {
        PostgresSource::from_connection_string_with_tls(&conn_str).await
    } else {
        PostgresSource::from_connection_string(&conn_str).await
    };
    source.map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))
}

/// Introspect the configured schemas into graphs.
async fn fetch_graphs(config: &Config, tls: bool, verbose: bool) -> Result<Vec<SchemaGraph>> {
    let source = connect(config, tls).await?;

    if verbose {
        eprintln!(
            "{} {}",
            "Fetching catalog for schemas:".cyan(),
            config.schemas.join(", ")
        );
    }

    let catalog = source
        .fetch_catalog(&config.schemas)
        .await
        .map_err(|e| anyhow::anyhow!("Catalog introspection failed: {}", e))?;

    let graphs = SchemaGraphBuilder::new(&catalog).build_all(&config.schemas)?;

    if verbose {
        for graph in &graphs {
            eprintln!(
                "  {} '{}': {} tables, {} types, {} functions",
                "Built".cyan(),
                graph.name,
                graph.tables.len(),
                graph.types.len(),
                graph.functions.len()
            );
        }
    }

    Ok(graphs)
}

/// Describe command - serialize each schema's structure to JSON
async fn describe_command(config: &Config, output: &Path, tls: bool, verbose: bool) -> Result<()> {
    let graphs = fetch_graphs(config, tls, verbose).await?;
    let multiple = graphs.len() > 1;

    for graph in &graphs {
        let description = describe(graph, &config.skip);
        let path = output_path_for(output, &graph.name, multiple);
        std::fs::write(&path, description.to_json_pretty()?)?;

        if verbose {
            eprintln!("{} {}", "Description saved to:".green(), path.display());
        }
    }

    print_diagnostics(&graphs);
    Ok(())
}

/// Generate command - emit validator source per schema
async fn generate_command(
    config: &Config,
    output: &Path,
    report_path: Option<&Path>,
    tls: bool,
    verbose: bool,
) -> Result<()> {
    let graphs = fetch_graphs(config, tls, verbose).await?;
    let multiple = graphs.len() > 1;

    let emitter = ArtifactEmitter::zod(config.skip.clone())
        .with_replacements(config.replace.clone())
        .with_names(NameResolver::from_renames(&config.rename));

    for graph in &graphs {
        let artifact = emitter.emit(graph);
        let path = output_path_for(output, &graph.name, multiple);
        std::fs::write(&path, artifact)?;

        if verbose {
            eprintln!("{} {}", "Validators saved to:".green(), path.display());
        }
    }

    if let Some(path) = report_path {
        let report = Report::from_graphs(&graphs);
        std::fs::write(path, report.to_json_pretty()?)?;

        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }

        print_report_summary(&report);
        if report.summary.errors > 0 {
            std::process::exit(1);
        }
    } else {
        print_diagnostics(&graphs);
    }

    Ok(())
}

/// Check-connection command - round-trip a trivial query
async fn check_connection_command(config: &Config, tls: bool, verbose: bool) -> Result<()> {
    let source = connect(config, tls).await?;

    if verbose {
        eprintln!("{}", "Testing database connection...".cyan());
    }

    source
        .test_connection()
        .await
        .map_err(|e| anyhow::anyhow!("Connection test failed: {}", e))?;

    println!("{}", "✓ Connection successful".green());
    Ok(())
}

/// Resolve the output path for one schema. With several schemas the
/// schema name lands before the extension: schema.ts -> schema.public.ts
fn output_path_for(base: &Path, schema: &str, multiple: bool) -> PathBuf {
    if !multiple {
        return base.to_path_buf();
    }

    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("schema");
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}.{}", stem, schema, ext),
        None => format!("{}.{}", stem, schema),
    };
    base.with_file_name(name)
}

/// Print all diagnostics collected during the build.
fn print_diagnostics(graphs: &[SchemaGraph]) {
    let total: usize = graphs.iter().map(|g| g.diagnostics.len()).sum();
    if total == 0 {
        println!("{}", "✓ No issues found".green());
        return;
    }

    println!("{}", "Diagnostics:".bold());
    for graph in graphs {
        for diag in &graph.diagnostics {
            let severity = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };
            print!("  [{}] {}: {}", severity, diag.code.as_str(), diag.message);
            if let Some(object) = &diag.object {
                print!(" ({})", object);
            }
            println!();
        }
    }
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Introspection Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Schemas:   {}", report.summary.schemas);
    println!("  Tables:    {}", report.summary.tables);
    println!("  Types:     {}", report.summary.types);
    println!("  Functions: {}", report.summary.functions);

    if report.summary.errors > 0 {
        println!(
            "  Errors:    {}",
            format!("{}", report.summary.errors).red().bold()
        );
    } else {
        println!(
            "  Errors:    {}",
            format!("{}", report.summary.errors).green()
        );
    }

    if report.summary.warnings > 0 {
        println!(
            "  Warnings:  {}",
            format!("{}", report.summary.warnings).yellow()
        );
    } else {
        println!(
            "  Warnings:  {}",
            format!("{}", report.summary.warnings).green()
        );
    }

    println!("  Info:      {}", report.summary.info);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };
            print!("  [{}] {}: {}", severity, diag.code.as_str(), diag.message);
            if let Some(object) = &diag.object {
                print!(" ({})", object);
            }
            println!();
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}
