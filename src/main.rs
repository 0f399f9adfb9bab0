use clap::Parser;
use std::path::PathBuf;
use stream_feedback::web::{run_server, ServerConfig};
use stream_feedback::{setup_logging, FeedbackPipeline, LogConfig};

/// Serve the stream feedback form.
#[derive(Debug, Parser)]
#[command(name = "stream-feedback", version, about)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8501)]
    port: u16,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Only log to the console
    #[arg(long)]
    no_file_log: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(LogConfig {
        log_dir: cli.log_dir,
        log_level: cli.log_level,
        console_output: true,
        file_output: !cli.no_file_log,
    })?;

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
    };
    println!("Open http://{}:{}/ in a browser", config.host, config.port);

    run_server(&config, FeedbackPipeline::default()).await
}
