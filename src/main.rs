use codiner_tags::{init_logging, parse_file, render_file, replay_file, tags, ReplayConfig};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "codiner-tags", version, about = "Parse tool tags out of streamed model responses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed pieces of a response as JSON
    Parse {
        /// Response file, or `-` for stdin
        file: PathBuf,
        /// Treat the response as still being generated
        #[arg(long)]
        stream_active: bool,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Render a response the way the chat view shows it
    Render {
        /// Response file, or `-` for stdin
        file: PathBuf,
        /// Treat the response as still being generated
        #[arg(long)]
        stream_active: bool,
    },
    /// Feed a response through the parser chunk by chunk
    Replay {
        /// Response file, or `-` for stdin
        file: PathBuf,
        /// Characters per chunk
        #[arg(long, default_value_t = 16)]
        chunk_size: usize,
        /// Milliseconds to wait before each chunk
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Cancel generation after this many chunks
        #[arg(long)]
        abort_after: Option<usize>,
    },
    /// List the recognised tag names
    Tags,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file, stream_active, pretty } => parse_file(&file, stream_active, pretty),
        Commands::Render { file, stream_active } => render_file(&file, stream_active),
        Commands::Replay { file, chunk_size, delay_ms, abort_after } => {
            let config = ReplayConfig {
                chunk_size,
                delay: Duration::from_millis(delay_ms),
                abort_after,
            };
            replay_file(&file, config).await
        }
        Commands::Tags => tags(),
    }
}
