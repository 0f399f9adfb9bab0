use crate::utils::{truncate_str, wrap_text};
use crate::ExtractionResult;
use anyhow::Context;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt as subscriber_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub log_level: String,
    pub console_output: bool,
    pub file_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".into(),
            log_level: "info".into(),
            console_output: true,
            file_output: true,
        }
    }
}

fn create_separator(width: usize, ch: char) -> String {
    std::iter::repeat_n(ch, width).collect()
}

/// Logs a boxed summary of one scraped page.
pub fn log_extraction_card(result: &ExtractionResult) {
    const CARD_WIDTH: usize = 80;
    const CONTENT_WIDTH: usize = CARD_WIDTH - 2;

    let Some(metadata) = result.metadata() else {
        return;
    };

    let horizontal_line = create_separator(CARD_WIDTH - 2, '═');

    info!(
        "\n╔{}╗\n\
         Link: {}\n\
         Title: {}\n\
         Desc: {}\n\
         Followers: {}\n\
         Viewers: {}\n\
         ╚{}╝",
        horizontal_line,
        wrap_text(result.link(), CONTENT_WIDTH - 6),
        wrap_text(&metadata.title, CONTENT_WIDTH - 7),
        wrap_text(&metadata.description, CONTENT_WIDTH - 6),
        wrap_text(&metadata.followers, CONTENT_WIDTH - 11),
        wrap_text(&metadata.viewers, CONTENT_WIDTH - 9),
        horizontal_line,
    );
}

pub fn log_error_card<E: Display + std::error::Error>(link: &str, error: &E) {
    const CARD_WIDTH: usize = 70;
    const CONTENT_WIDTH: usize = CARD_WIDTH - 8;

    let top_bottom = create_separator(CARD_WIDTH - 2, '═');
    let middle = create_separator(CARD_WIDTH - 2, '─');

    let mut error_details = error.to_string();
    if let Some(source) = error.source() {
        error_details = format!("{error_details} (cause: {source})");
    }

    error!(
        "\n╔═{}═╗\n\
         ║ Link:  {:<width$} ║\n\
         ║{}║\n\
         ║ Error: {:<width$} ║\n\
         ╚═{}═╝",
        top_bottom,
        truncate_str(link, CONTENT_WIDTH),
        middle,
        truncate_str(&error_details, CONTENT_WIDTH),
        top_bottom,
        width = CONTENT_WIDTH
    );
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `config.log_level`.
pub fn setup_logging(config: LogConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let mut layers = Vec::new();

    if config.console_output {
        let console_layer = subscriber_fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true);
        layers.push(console_layer.boxed());
    }

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("create log directory {}", config.log_dir.display()))?;

        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "stream-feedback.log");

        let file_layer = subscriber_fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .with_file(true)
            .with_writer(file_appender);

        layers.push(file_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("set global default subscriber")?;

    debug!("Logging system initialized with config: {:?}", config);
    Ok(())
}

/// Scoped subscriber at a fixed level, for tests and one-off tools.
pub struct LogLevelGuard {
    _guard: tracing::dispatcher::DefaultGuard,
}

impl LogLevelGuard {
    pub fn set_level(level: &str) -> Self {
        let filter = EnvFilter::new(level);
        let subscriber = tracing_subscriber::registry()
            .with(subscriber_fmt::layer().with_test_writer())
            .with(filter);

        LogLevelGuard {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}
