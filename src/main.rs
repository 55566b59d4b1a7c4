mod automation;
mod commands;
mod init;
mod shutdown;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::Settings;
use shutdown::Finished;
use std::future::Future;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wadrive_appium::AppiumDevice;
use wadrive_core::{
    config::{self, AppVariant, Config},
    traits::Device,
};

#[derive(Parser)]
#[command(
    name = "wadrive",
    version,
    about = "Send the daily WhatsApp message from an Android phone through Appium"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Device profile to use instead of the configured one.
    #[arg(long, global = true)]
    profile: Option<String>,

    /// App to drive: business or personal.
    #[arg(long, global = true)]
    variant: Option<AppVariant>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the daily message to every chat in the chat list.
    Send {
        /// Open each chat but send nothing and write no logs.
        #[arg(long)]
        dry_run: bool,
    },
    /// Walk the chat list on screen, sending to chats without unread messages.
    Scan {
        /// Only chats whose name contains this text.
        #[arg(long)]
        filter: Option<String>,
        /// Walk rows by position and page with long swipes.
        #[arg(long)]
        positional: bool,
    },
    /// Save every chat name in the chat list to a text file.
    Scrape {
        /// Output file (default: a timestamped file in the txt dir).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Test the Appium connection and open the app.
    Check,
    /// Push a photo to the device and read it back.
    PushPhoto {
        /// Photo to push (default: the one in the daily photo folder).
        path: Option<PathBuf>,
    },
    /// Write a copy of the chat list with priority customers on top.
    Reorganize {
        /// Output file (default: <chat list>_reorganized.txt in the txt dir).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove a name prefix from every line of a chat list.
    StripPrefix {
        prefix: String,
        /// File to clean (default: the chat list).
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List device profiles and their fallback coordinates.
    Profiles,
    /// Interactive setup wizard.
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // The wizard must work without a readable config.
    if let Commands::Init = cli.command {
        return init::run(&cli.config);
    }

    let cfg = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg)?;
    let settings = Settings::new(cfg, cli.variant, cli.profile.as_deref());

    let report = dispatch(&settings, cli.command).await?;
    println!("{report}");
    Ok(())
}

async fn dispatch(settings: &Settings, command: Commands) -> anyhow::Result<String> {
    let report = match command {
        Commands::Init => anyhow::bail!("init runs before the config is loaded"),
        Commands::Profiles => commands::profiles(settings),
        Commands::Reorganize { output } => commands::reorganize(settings, output.as_deref())?,
        Commands::StripPrefix { prefix, file } => {
            commands::strip_prefix(settings, &prefix, file.as_deref())?
        }
        Commands::Send { dry_run } => {
            let device = connect(settings).await?;
            let auto = settings.automator(&device);
            guarded(&device, commands::send(settings, &auto, dry_run)).await?
        }
        Commands::Scan { filter, positional } => {
            let device = connect(settings).await?;
            let auto = settings.automator(&device);
            guarded(
                &device,
                commands::scan(settings, &auto, filter.as_deref(), positional),
            )
            .await?
        }
        Commands::Scrape { output } => {
            let device = connect(settings).await?;
            let auto = settings.automator(&device);
            guarded(&device, commands::scrape(settings, &auto, output.as_deref())).await?
        }
        Commands::Check => {
            let device = connect(settings).await?;
            let auto = settings.automator(&device);
            guarded(&device, commands::check(settings, &auto)).await?
        }
        Commands::PushPhoto { path } => {
            let device = connect(settings).await?;
            let auto = settings.automator(&device);
            guarded(&device, commands::push_photo(settings, &auto, path.as_deref())).await?
        }
    };
    Ok(report)
}

/// Log to stderr and to a daily file in `logs_dir`.
///
/// The level comes from the config unless `RUST_LOG` is set. Keep the
/// returned guard alive so buffered file lines are flushed on exit.
fn init_logging(cfg: &Config) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.wadrive.log_level));

    let logs_dir = cfg.resolve(&cfg.wadrive.logs_dir);
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("cannot create log directory {}", logs_dir.display()))?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&logs_dir, "wadrive.log"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();
    Ok(guard)
}

async fn connect(settings: &Settings) -> anyhow::Result<AppiumDevice> {
    let appium = &settings.cfg.appium;
    info!(
        "connecting to {} for {}",
        appium.server_url,
        settings.variant.display_name()
    );
    wadrive_appium::connect(appium, settings.variant)
        .await
        .with_context(|| format!("cannot open an Appium session at {}", appium.server_url))
}

/// Run a device command until it finishes or a shutdown signal arrives.
async fn guarded(
    device: &dyn Device,
    work: impl Future<Output = anyhow::Result<String>>,
) -> anyhow::Result<String> {
    match shutdown::run_until(device, work, shutdown::signal()).await? {
        Finished::Completed(report) => Ok(report),
        Finished::Interrupted => Ok("interrupted; the automation session was closed".into()),
    }
}
