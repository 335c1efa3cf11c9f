//! Stackdock - Local AI Stack Deployment CLI
//!
//! The `stackdock` command turns a deployment request file (JSON) into a
//! deployable docker-compose bundle.
//!
//! ## Commands
//!
//! - `components`: List the component catalog
//! - `init`: Write a starter deployment request file
//! - `validate`: Check a request against the catalog and the host
//! - `generate`: Validate and write the artifacts to the install dir
//! - `deploy`: Full pipeline, optionally starting the containers
//! - `stop`: Stop the stack's containers
//! - `status`: Per-component container liveness for a request

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use stackdock_core::{
    generate, validate, ComponentId, DeploymentRequest, HostProbes, SelectionState, CATALOG,
};
use stackdock_host::{
    detect_probes, fetch_version_map, is_docker_available, write_artifacts, ChannelSink,
    ComposeRuntime, DeployPipeline,
};

#[derive(Parser)]
#[command(name = "stackdock")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local AI stack deployment resolver", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the component catalog with default ports and dependencies
    Components,

    /// Write a starter deployment request file
    Init {
        /// Output path for the request file
        #[arg(default_value = "stackdock.json")]
        path: PathBuf,

        /// Installation directory to record in the request
        #[arg(short, long, default_value = "/opt/ai")]
        install_dir: PathBuf,
    },

    /// Validate a deployment request
    Validate {
        /// Path to the request file (JSON)
        request: PathBuf,

        /// Skip host probes (port availability, capacity, writability)
        #[arg(long)]
        no_host_checks: bool,
    },

    /// Validate a request and write the artifacts to its install dir
    Generate {
        /// Path to the request file (JSON)
        request: PathBuf,

        /// Pin image tags to the latest stable versions before rendering
        #[arg(long)]
        pin_versions: bool,

        /// Skip host probes
        #[arg(long)]
        no_host_checks: bool,
    },

    /// Run the full deployment pipeline
    Deploy {
        /// Path to the request file (JSON)
        request: PathBuf,

        /// Start containers even if the request says otherwise
        #[arg(long, conflicts_with = "no_launch")]
        launch: bool,

        /// Only write artifacts, never start containers
        #[arg(long)]
        no_launch: bool,

        /// Pin image tags to the latest stable versions before rendering
        #[arg(long)]
        pin_versions: bool,

        /// Skip host probes
        #[arg(long)]
        no_host_checks: bool,
    },

    /// Stop the running containers for a request
    Stop {
        /// Path to the request file (JSON)
        request: PathBuf,
    },

    /// Show container liveness for the components in a request
    Status {
        /// Path to the request file (JSON)
        request: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Components => cmd_components(),
        Commands::Init { path, install_dir } => cmd_init(&path, &install_dir),
        Commands::Validate {
            request,
            no_host_checks,
        } => cmd_validate(&request, no_host_checks).await,
        Commands::Generate {
            request,
            pin_versions,
            no_host_checks,
        } => cmd_generate(&request, pin_versions, no_host_checks).await,
        Commands::Deploy {
            request,
            launch,
            no_launch,
            pin_versions,
            no_host_checks,
        } => cmd_deploy(&request, launch, no_launch, pin_versions, no_host_checks).await,
        Commands::Stop { request } => cmd_stop(&request).await,
        Commands::Status { request } => cmd_status(&request).await,
    }
}

fn init_tracing(json: bool, level: Level) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_request(path: &Path) -> Result<DeploymentRequest> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read request file: {}", path.display()))?;
    DeploymentRequest::from_json(&content)
        .context(format!("Failed to parse request file: {}", path.display()))
}

fn probes_for(no_host_checks: bool) -> HostProbes {
    if no_host_checks {
        HostProbes::none()
    } else {
        detect_probes()
    }
}

async fn pin_versions_if(request: &mut DeploymentRequest, pin: bool) -> Result<()> {
    if !pin {
        return Ok(());
    }
    let client = reqwest::Client::builder()
        .user_agent(concat!("stackdock/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;
    println!("Fetching latest stable image versions...");
    request.versions = fetch_version_map(&client).await;
    Ok(())
}

/// List the component catalog
fn cmd_components() -> Result<()> {
    println!(
        "{:<12} {:<16} {:>6}  {:<24} {}",
        "ID", "NAME", "PORT", "DEPENDS ON", "DESCRIPTION"
    );
    for spec in CATALOG.iter() {
        let deps: Vec<&str> = spec.dependencies.iter().map(|d| d.as_str()).collect();
        let deps = if deps.is_empty() {
            "-".to_string()
        } else {
            deps.join(", ")
        };
        println!(
            "{:<12} {:<16} {:>6}  {:<24} {}",
            spec.id, spec.display_name, spec.default_port, deps, spec.description
        );
    }
    Ok(())
}

/// Write a starter request file with the default component selection
fn cmd_init(path: &Path, install_dir: &Path) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite existing file: {}", path.display());
    }

    let mut request = DeploymentRequest::new(install_dir);
    request.selection = SelectionState::from_enabled([
        ComponentId::N8n,
        ComponentId::Ollama,
        ComponentId::OpenWebUi,
        ComponentId::Qdrant,
        ComponentId::Postgres,
    ]);

    std::fs::write(path, request.to_json()?)
        .context(format!("Failed to write request file: {}", path.display()))?;
    println!("Wrote starter request to {}", path.display());
    println!("Edit the selection, ports, and credentials, then run:");
    println!("  stackdock validate {}", path.display());
    Ok(())
}

/// Validate a request and print the full issue list
async fn cmd_validate(path: &Path, no_host_checks: bool) -> Result<()> {
    let request = load_request(path)?;
    let report = validate(&request, &probes_for(no_host_checks)).await;

    if report.passed() {
        println!(
            "Configuration is valid ({} component(s) selected)",
            request.selection.enabled().len()
        );
        Ok(())
    } else {
        for issue in &report.issues {
            println!("error: {}", issue.message);
        }
        bail!("validation failed with {} issue(s)", report.issues.len());
    }
}

/// Validate, render, and write the artifact bundle
async fn cmd_generate(path: &Path, pin_versions: bool, no_host_checks: bool) -> Result<()> {
    let mut request = load_request(path)?;
    pin_versions_if(&mut request, pin_versions).await?;

    let report = validate(&request, &probes_for(no_host_checks)).await;
    if !report.passed() {
        for issue in &report.issues {
            println!("error: {}", issue.message);
        }
        bail!("validation failed with {} issue(s)", report.issues.len());
    }

    let artifacts = generate(&request)?;
    let written = write_artifacts(&request.install_dir, &artifacts).await?;

    println!("Wrote {}", written.compose.display());
    println!("Wrote {}", written.env.display());
    println!("Wrote {}", written.readme.display());
    println!("Bundle digest: {}", artifacts.digest());
    Ok(())
}

/// Run the full pipeline, streaming progress lines to stdout
async fn cmd_deploy(
    path: &Path,
    launch: bool,
    no_launch: bool,
    pin_versions: bool,
    no_host_checks: bool,
) -> Result<()> {
    let mut request = load_request(path)?;
    pin_versions_if(&mut request, pin_versions).await?;
    if launch {
        request.launch_after_generate = true;
    }
    if no_launch {
        request.launch_after_generate = false;
    }

    if request.launch_after_generate && !is_docker_available().await {
        bail!("Docker is not installed or not running");
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            println!("{line}");
        }
    });

    // The pipeline owns the channel sender; it must drop before the printer
    // is awaited, or the channel never closes and the await never returns.
    let outcome = {
        let pipeline = DeployPipeline::new(
            probes_for(no_host_checks),
            ComposeRuntime::new(),
            Arc::new(ChannelSink(tx)),
        );
        pipeline.run(&request).await?
    };
    let _ = printer.await;

    if !outcome.report.passed() {
        bail!(
            "validation failed with {} issue(s)",
            outcome.report.issues.len()
        );
    }

    if !outcome.services.is_empty() {
        println!();
        print_liveness(&outcome.services, &request);
    }
    Ok(())
}

/// Stop the stack's containers via `docker-compose down` in the install dir
async fn cmd_stop(path: &Path) -> Result<()> {
    let request = load_request(path)?;
    let runtime = ComposeRuntime::new();
    runtime
        .down(&request.install_dir)
        .await
        .context("Failed to stop services")?;
    println!("Services stopped");
    Ok(())
}

/// Poll container liveness for the request's selection
async fn cmd_status(path: &Path) -> Result<()> {
    let request = load_request(path)?;
    let runtime = ComposeRuntime::new();
    let services = runtime
        .liveness(&request.selection)
        .await
        .context("Failed to query container status")?;
    print_liveness(&services, &request);
    Ok(())
}

fn print_liveness(
    services: &std::collections::BTreeMap<ComponentId, bool>,
    request: &DeploymentRequest,
) {
    for (id, running) in services {
        let marker = if *running { "up" } else { "down" };
        let endpoint = format!("http://localhost:{}", request.ports.port_for(*id));
        println!("{:<12} {:<5} {}", id.as_str(), marker, endpoint);
    }
}
