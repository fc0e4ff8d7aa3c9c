use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use iocraft::prelude::*;

use dag_board::app::App;
use dag_board::color::ColorDepth;
use dag_board::config::loader;
use dag_board::engine::{AirflowEngine, Engine, EngineHandle, StubEngine};
use dag_board::params::QueryParams;
use dag_board::theme::{Background, ResolvedTheme};

#[derive(Parser)]
#[command(name = "dag-board", version, about = "Airflow DAG list in the terminal")]
struct Cli {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging to debug.log.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Shorthand: `dag-board <LOCATION>` (prefer `dag-board open <LOCATION>`).
    #[arg(value_name = "LOCATION")]
    location: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the DAG list on a console URL or bare query string.
    Open {
        /// e.g. `http://localhost:8080/dags?tags=etl` or `?paused=false`.
        location: String,
    },
    /// Browse bundled sample DAGs without an Airflow server.
    Demo {
        location: Option<String>,
    },
}

fn parse_location(raw: &str) -> Result<QueryParams> {
    QueryParams::from_location(raw).ok_or_else(|| anyhow::anyhow!("unrecognised location: {raw}"))
}

fn main() -> Result<()> {
    // Install a panic hook that writes to a file, since the fullscreen TUI
    // swallows stderr.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!("{info}\n\n{backtrace}");
        let _ = std::fs::write("panic.log", &msg);
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();

    let (demo, location_arg) = match cli.command {
        Some(Commands::Open { location }) => (false, Some(location)),
        Some(Commands::Demo { location }) => (true, location),
        None => {
            if cli.location.is_some() {
                eprintln!("hint: use \"dag-board open <LOCATION>\" for clarity");
            }
            (false, cli.location)
        }
    };

    // Set up tracing.
    if cli.debug {
        let file = std::fs::File::create("debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    // Load config.
    let config = loader::load_config(cli.config.as_deref())?;

    let initial_location =
        parse_location(location_arg.as_deref().unwrap_or(&config.defaults.initial_query))?;

    // Detect terminal capabilities.
    let color_depth = ColorDepth::detect();
    let background = Background::detect();
    let theme = ResolvedTheme::resolve(&config.theme, background);

    // The engine runs in a dedicated OS thread (owns its own Tokio runtime).
    // Dropping `engine_handle` at the end of `main` closes the sender
    // channel, signalling the engine to shut down.
    let engine_handle: EngineHandle = if demo {
        StubEngine::demo().start()
    } else {
        AirflowEngine::new(config.clone()).start()
    };

    tracing::info!(demo, location = %initial_location, "dag-board starting");

    // Enter fullscreen TUI (iocraft uses smol internally).
    smol::block_on(
        element! {
            App(
                config: &config,
                engine: &engine_handle,
                theme: &theme,
                color_depth,
                initial_location,
            )
        }
        .fullscreen(),
    )?;

    Ok(())
}
