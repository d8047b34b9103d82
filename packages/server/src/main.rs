use beacon_server::{serve, ServerState, DEFAULT_PORT};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Serve a site with the Beacon publish widget
#[derive(Parser)]
#[command(name = "beacon-server")]
#[command(version)]
struct Args {
    /// Directory to serve (default: current directory)
    root: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let addr = format!("{}:{}", args.host, args.port);

    println!("{} http://{}", "Serving".green().bold(), addr);
    println!("  root: {}", root.display());

    serve(ServerState::new(root), &addr).await
}
