use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod animation;
mod color;
mod config;
mod display;
mod error;
mod ipc;
mod radar;
mod scope;
mod session;

use config::Config;
use display::DisplayMode;
use radar::{Direction, PointSetRegistry};
use session::RadarSession;

#[derive(Parser, Debug)]
#[command(name = "cyradar")]
#[command(author, version, about = "Terminal radar scope with animated point set rotation")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Display mode: terminal or headless
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rotation tween length in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Range of the outermost ring in centimetres
    #[arg(long)]
    range_cm: Option<f64>,

    /// Don't listen on the control socket
    #[arg(long)]
    no_ipc: bool,

    /// Blue marker color as hex, e.g. "#4080FF"
    #[arg(long)]
    blue_color: Option<String>,

    /// Red marker color as hex
    #[arg(long)]
    red_color: Option<String>,

    /// Write a commented config file to the default location and exit
    #[arg(long)]
    init_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum)]
    completions: Option<clap_complete::Shell>,
}

/// Client commands for a running instance
#[derive(Subcommand, Debug)]
enum Command {
    /// Rotate both point sets on a running instance
    Rotate {
        /// Amount in degrees
        #[arg(allow_hyphen_values = true)]
        degrees: String,
        /// left (counter-clockwise) or right (clockwise)
        #[arg(value_enum, default_value = "left")]
        direction: Direction,
    },
    /// Print rotation and animation state of a running instance
    Status,
    /// Send a raw control line, e.g. `send positions blue`
    Send {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "cyradar", &mut std::io::stdout());
        return Ok(());
    }

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote config template to {}", path.display());
        return Ok(());
    }

    if let Some(command) = &args.command {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("cyradar=warn".parse()?))
            .with_writer(std::io::stderr)
            .init();
        return run_client(command).await;
    }

    let mut config = Config::load_or_default(args.config.as_deref())?;

    init_logging(args.mode.unwrap_or(config.display.mode))?;

    config.merge_args(&args);
    config.validate()?;

    info!("Starting cyradar in {:?} mode", config.display.mode);

    let registry = PointSetRegistry::new(config.radar.blue.clone(), config.radar.red.clone())?;
    let session = RadarSession::new(registry, config.animation.duration());

    let ipc_rx = if config.display.ipc {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            if let Err(e) = ipc::start_server(tx).await {
                warn!("IPC server stopped: {:#}", e);
            }
        });
        Some(rx)
    } else {
        None
    };

    match config.display.mode {
        DisplayMode::Terminal => {
            display::terminal::run(config, session, ipc_rx).await?;
        }
        DisplayMode::Headless => {
            display::headless::run(config, session, ipc_rx).await?;
        }
    }

    Ok(())
}

async fn run_client(command: &Command) -> Result<()> {
    let line = match command {
        Command::Rotate { degrees, direction } => {
            session::parse_degrees(degrees)?;
            format!("rotate {} {}", degrees.trim(), direction)
        }
        Command::Status => "status".to_string(),
        Command::Send { line } => line.join(" "),
    };

    let reply = ipc::send_command(&line).await?;
    println!("{}", reply);
    if reply.starts_with("err:") {
        std::process::exit(1);
    }
    Ok(())
}

/// Terminal mode owns the screen, so its logs go to a file under the cache
/// directory. Headless mode logs to stderr.
fn init_logging(mode: DisplayMode) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("cyradar=info".parse()?);

    match mode {
        DisplayMode::Headless => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        DisplayMode::Terminal => match open_log_file() {
            Some(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
            None => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::sink)
                    .init();
            }
        },
    }

    Ok(())
}

fn open_log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join("cyradar");
    std::fs::create_dir_all(&dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("cyradar.log"))
        .ok()
}
