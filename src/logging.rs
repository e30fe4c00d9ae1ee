use anyhow::Result;
use std::fs;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::MakeWriter;

use crate::core::config;

/// Writer factory that appends to the ecovista log file. The TUI owns the
/// terminal (alternate screen + raw mode), so tracing output must never
/// reach stdout while it is running; one-shot commands share the same file
/// to keep a single trail.
#[derive(Clone)]
pub(crate) struct LogFileMakeWriter {
    path: std::path::PathBuf,
}

impl<'a> MakeWriter<'a> for LogFileMakeWriter {
    type Writer = Box<dyn std::io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        match fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            Ok(file) => Box::new(file),
            Err(_) => Box::new(std::io::sink()),
        }
    }
}

/// Install the global subscriber. Level defaults to INFO; RUST_LOG-style
/// filtering is deliberately out of scope for a client this small.
pub fn init() -> Result<()> {
    let log_dir = config::data_dir().join("logs");
    fs::create_dir_all(&log_dir)?;

    let make_writer = LogFileMakeWriter {
        path: log_dir.join("ecovista.log"),
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_writer(make_writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
