use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use web_summarizer::{
    AppState,
    api::routes::create_router,
    config::Config,
    fetch::ReqwestHttpClient,
    llm::build_summarizer,
    pipeline::Pipeline,
};

const PREVIEW_CHARS: usize = 1000;

#[derive(Parser)]
#[command(name = "web-summarizer", about = "Fetch a web page and summarize its main content")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Summarize one URL and print the result
    Summarize {
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load()?;

    // The model client is built once and shared by every request.
    let summarizer = build_summarizer(&config.backend);
    tracing::info!(model = summarizer.model_name(), "summarizer ready");

    let http = Arc::new(ReqwestHttpClient::new()?);
    let pipeline = Pipeline::new(http, summarizer, &config.pipeline);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            serve(config, pipeline).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Summarize { url } => {
            let result = pipeline.summarize(&url).await;
            if let Some(error) = &result.error {
                eprintln!("Error: {}", error);
                return Ok(ExitCode::FAILURE);
            }

            println!("\n=== Extracted Text (truncated) ===\n");
            println!("{}...\n", preview(&result.extracted_text, PREVIEW_CHARS));
            println!("\n=== AI Summary ===\n");
            println!("{}", result.summary);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn serve(config: Config, pipeline: Pipeline) -> Result<(), Box<dyn std::error::Error>> {
    let server_addr = config.server_addr;

    let app_state = AppState {
        config: Arc::new(config),
        pipeline: Arc::new(pipeline),
    };

    let app = create_router(app_state);
    let listener = TcpListener::bind(server_addr).await?;

    tracing::info!(%server_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
