use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use voxora_core::SettingsManager;

mod catalog;
mod speak;
mod summarize;
mod voices;

#[derive(Parser, Debug)]
#[command(name = "voxora")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Voxora - text to speech from the terminal")]
struct Args {
    /// Use a settings file other than ~/.voxora/settings.toml
    #[arg(long, value_name = "PATH", global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize text and play it
    Speak(speak::SpeakArgs),

    /// List the languages and standard voices on offer
    Languages,

    /// Manage cloned voices
    Voices {
        #[command(subcommand)]
        command: voices::VoicesCommand,
    },

    /// Extract the text of a document and print its gist
    Summarize(summarize::SummarizeArgs),
}

fn main() -> Result<()> {
    let _guard = setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = Args::parse();
    info!("CLI startup: command={:?}", args.command);

    let settings = match args.settings {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };

    match args.command {
        Command::Speak(speak_args) => speak::run(&settings, speak_args).await,
        Command::Languages => {
            catalog::print_languages();
            Ok(())
        }
        Command::Voices { command } => voices::run(&settings, command).await,
        Command::Summarize(summarize_args) => summarize::run(&settings, summarize_args).await,
    }
}

fn setup_tracing() -> Result<WorkerGuard> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Create trace directory in user's home
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    let trace_dir = PathBuf::from(home).join(".voxora").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("voxora.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(guard)
}
