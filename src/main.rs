//! swaggen CLI entrypoint
//! Parses command-line arguments and dispatches to the use cases.
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use swaggen::application::{CheckUseCase, GenerateRequest, GenerateUseCase, SwaggenConfig};
use swaggen::infrastructure::{FileSystemOutputService, default_orchestrator};

#[derive(Parser)]
#[command(name = "swaggen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate a client/server package from a Swagger 2.0 document
    Generate {
        /// Path or URL to the Swagger document (JSON or YAML)
        #[arg(long)]
        spec: String,
        /// Package name for the generated crate
        #[arg(long)]
        package: Option<String>,
        /// Output directory, defaults to ./<package>
        #[arg(long)]
        output: Option<PathBuf>,
        /// Service name used in request headers and spans
        #[arg(long)]
        service_name: Option<String>,
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a Swagger document without writing anything
    Check {
        /// Path or URL to the Swagger document (JSON or YAML)
        #[arg(long)]
        spec: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            spec,
            package,
            output,
            service_name,
            config,
        } => {
            generate(GenerateArgs {
                spec,
                package,
                output,
                service_name,
                config,
            })
            .await?
        }
        Commands::Check { spec } => check(&spec).await?,
    }

    Ok(())
}

struct GenerateArgs {
    spec: String,
    package: Option<String>,
    output: Option<PathBuf>,
    service_name: Option<String>,
    config: Option<PathBuf>,
}

async fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => SwaggenConfig::load(path)
            .await
            .context("Failed to load configuration")?,
        None => SwaggenConfig::default(),
    };

    let package = args
        .package
        .or(config.generator.package)
        .context("A package name is required (--package or [generator].package)")?;
    let output_dir = args
        .output
        .or(config.generator.output_dir)
        .unwrap_or_else(|| PathBuf::from(&package));

    info!(spec = %args.spec, package = %package, "Generating package");

    let orchestrator = default_orchestrator().context("Failed to initialize generator")?;
    let use_case = GenerateUseCase::new(
        Arc::new(orchestrator),
        Arc::new(FileSystemOutputService::new()),
    );

    let response = use_case
        .execute(GenerateRequest {
            spec_source: args.spec,
            package,
            output_dir,
            service_name: args.service_name.or(config.generator.service_name),
            client: config.client,
        })
        .await
        .context("Generation failed")?;

    println!(
        "Generated {} operations into {} ({} files, {} changed)",
        response.operations,
        response.output_path.display(),
        response.artifacts_count,
        response.written
    );
    println!("fingerprint: {}", response.fingerprint);
    Ok(())
}

async fn check(spec: &str) -> anyhow::Result<()> {
    let orchestrator = default_orchestrator().context("Failed to initialize generator")?;
    let report = CheckUseCase::new(Arc::new(orchestrator))
        .execute(spec)
        .await
        .context("Check failed")?;

    println!(
        "{}: {} operations, {} models",
        report.title,
        report.operations.len(),
        report.models
    );
    for operation in &report.operations {
        println!("  {operation}");
    }
    Ok(())
}
