//! Run command - host a quiz session on the seat controller.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};
use standfirst::config::ConfigFile;
use standfirst::engine::DebounceEdge;
use standfirst::logging;

use crate::audio::AudioCues;
use crate::error::CliError;
use crate::link::{self, LinkConfig};
use crate::tui_app::{self, SessionConfig};

/// Debounce edge selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EdgeArg {
    /// Commit on the first flip, ignore chatter for the bounce time
    Leading,
    /// Commit once the seat has been quiet for the bounce time
    Trailing,
}

impl From<EdgeArg> for DebounceEdge {
    fn from(edge: EdgeArg) -> Self {
        match edge {
            EdgeArg::Leading => DebounceEdge::Leading,
            EdgeArg::Trailing => DebounceEdge::Trailing,
        }
    }
}

/// Arguments for the run command. Flags override config.ini.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Seat controller device (e.g. /dev/ttyACM0)
    #[arg(long)]
    pub port: Option<PathBuf>,

    /// Number of seats
    #[arg(long)]
    pub players: Option<usize>,

    /// Bounce time in milliseconds
    #[arg(long)]
    pub bounce_ms: Option<u64>,

    /// Quiet time after everyone sits before the ready cue, in milliseconds
    #[arg(long)]
    pub ready_wait_ms: Option<u64>,

    /// Debounce edge
    #[arg(long, value_enum)]
    pub edge: Option<EdgeArg>,

    /// Use this config file instead of the default
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run without sound
    #[arg(long)]
    pub no_sound: bool,

    /// Print status lines instead of the full-screen board
    #[arg(long)]
    pub headless: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut ConfigFile) {
        if let Some(port) = &self.port {
            config.link.port = port.clone();
        }
        if let Some(players) = self.players {
            config.players.count = players;
        }
        if let Some(bounce_ms) = self.bounce_ms {
            config.timing.bounce_ms = bounce_ms;
        }
        if let Some(ready_wait_ms) = self.ready_wait_ms {
            config.timing.ready_wait_ms = ready_wait_ms;
        }
        if let Some(edge) = self.edge {
            config.timing.edge = edge.into();
        }
    }

    fn load_config(&self) -> Result<ConfigFile, CliError> {
        let mut config = match &self.config {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let config = args.load_config()?;
    let engine = config.engine_config()?;

    let _log_guard = logging::init_logging(&config.logging.directory, args.verbose)?;
    tracing::info!(
        version = standfirst::VERSION,
        players = engine.players,
        bounce_ms = engine.bounce_time.as_millis() as u64,
        ready_wait_ms = engine.ready_wait.as_millis() as u64,
        edge = %engine.edge,
        port = %config.link.port.display(),
        "Starting session"
    );

    // Set up signal handler for graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })?;

    let audio = if args.no_sound {
        None
    } else {
        AudioCues::open(&config.sounds)
    };
    if let Some(audio) = &audio {
        if config.sounds.startup_check {
            audio.startup_check();
        }
    }

    let (sensors, link) = link::spawn_link(
        LinkConfig {
            port: config.link.port.clone(),
            retry: Duration::from_millis(config.link.retry_ms.max(1)),
        },
        Arc::clone(&shutdown),
    )?;

    let session = SessionConfig {
        engine,
        shutdown: Arc::clone(&shutdown),
        audio,
        sensors,
        link,
    };

    let interactive =
        !args.headless && atty::is(atty::Stream::Stdout) && atty::is(atty::Stream::Stdin);
    let result = if interactive {
        tui_app::run_tui(session)
    } else {
        tui_app::run_headless(session)
    };

    shutdown.store(true, Ordering::SeqCst);
    tracing::info!("Session ended");
    result
}
