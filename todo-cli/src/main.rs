use clap::Parser;
use std::sync::Arc;
use todo_cli::Commands;
use todo_list::{StoreConfig, StoreRepository, TaskStore, TodoViewModel};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Keep a to-do list on this machine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Cli::parse();

    let config = StoreConfig::load()?;
    let store = Arc::new(TaskStore::connect(&config).await?);
    let view_model = TodoViewModel::new(Arc::new(StoreRepository::new(store)));

    let output = todo_cli::execute(&view_model, args.command).await?;
    println!("{}", output);

    Ok(())
}
