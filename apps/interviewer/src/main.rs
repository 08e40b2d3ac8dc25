mod agents;
mod config;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod resume_source;
mod routes;
mod state;
mod timeout;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::Pipeline;
use crate::routes::build_router;
use crate::state::AppState;

/// Turns a résumé and a job description into a structured interview-question table.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline once and print the interview table as JSON
    Run(RunArgs),

    /// Serve the pipeline over HTTP
    Serve,
}

#[derive(Args)]
struct RunArgs {
    /// Résumé file: OCR text output or a PDF
    #[arg(short, long, value_name = "FILE")]
    resume: PathBuf,

    /// Job description text
    #[arg(short, long, conflicts_with = "job_description_file")]
    job_description: Option<String>,

    /// File containing the job description
    #[arg(long, value_name = "FILE")]
    job_description_file: Option<PathBuf>,

    /// Job role title written into the table
    #[arg(long)]
    role: String,

    /// Also print the per-stage report to stderr
    #[arg(long)]
    report: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries only the table.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting interviewer v{}", env!("CARGO_PKG_VERSION"));

    let pipeline_config = config.pipeline();
    let client = LlmClient::new(
        pipeline_config.endpoint.clone(),
        pipeline_config.api_key.clone(),
    );
    info!(
        "Completion client initialized (endpoint: {}, model: {}, mode: {:?})",
        client.endpoint(),
        pipeline_config.model,
        pipeline_config.output_mode
    );
    let pipeline = Pipeline::new(Arc::new(client), pipeline_config);

    match cli.command {
        Commands::Run(args) => run_once(&pipeline, args).await,
        Commands::Serve => serve(pipeline, config.port).await,
    }
}

async fn run_once(pipeline: &Pipeline, args: RunArgs) -> Result<()> {
    let job_description = match (args.job_description, args.job_description_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read job description from {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide --job-description or --job-description-file"),
    };

    let run = pipeline
        .run_from_file(&args.resume, &job_description, &args.role)
        .await?;

    if args.report {
        eprintln!("{}", serde_json::to_string_pretty(&run.stages)?);
    }
    println!("{}", serde_json::to_string_pretty(&run.table)?);
    Ok(())
}

async fn serve(pipeline: Pipeline, port: u16) -> Result<()> {
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
