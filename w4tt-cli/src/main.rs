use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use w4tt_core::time::format_local;
use w4tt_core::{Assignment, Scheduler};

mod config;
mod input;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "w4tt",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("W4TT_BUILD_SHA"), ")"),
    about = "Assign pending tasks to free business-hours slots"
)]
struct Cli {
    /// Log decisions at debug level (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a {tasks, slots} body and print the assignments as JSON
    Assign {
        /// Request file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,

        /// Reference instant instead of the wall clock
        #[arg(long)]
        now: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Print the task ranking to stderr before assigning
        #[arg(long)]
        explain: bool,
    },

    /// List the free candidate slots for the busy periods in a request
    Slots {
        /// Request file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,

        #[arg(long)]
        now: Option<String>,

        /// Horizon override in days
        #[arg(long)]
        days: Option<u32>,
    },

    /// Manage ~/.w4tt/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

#[derive(Debug, Serialize)]
struct SlotPreview {
    start: String,
    end: String,
    minutes: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Assign {
            input,
            now,
            pretty,
            explain,
        } => {
            let cfg = config::load_config()?;
            let now = input::resolve_now(now.as_deref())?;
            let req = input::load_request(&input).await?;
            let scheduler = Scheduler::new(cfg.scheduler).context("invalid scheduler config")?;

            if explain {
                for (rank, r) in scheduler.rank(&req.tasks, now).iter().enumerate() {
                    eprintln!(
                        "{:>3}. score={:>6.2} duration={:>3}m | {} | {}",
                        rank + 1,
                        r.score,
                        scheduler.analyzer().duration(r.task),
                        r.task.id,
                        r.task.title
                    );
                }
            }

            let out: Vec<Assignment> = scheduler.assign(&req.tasks, &req.slots, now);
            print_json(&out, pretty || cfg.output.pretty)?;
        }

        Command::Slots { input, now, days } => {
            let cfg = config::load_config()?;
            let now = input::resolve_now(now.as_deref())?;
            let req = input::load_request(&input).await?;
            let scheduler = Scheduler::new(cfg.scheduler).context("invalid scheduler config")?;

            let generator = scheduler.slot_generator();
            let busy = generator.parse_busy_periods(&req.slots);
            let local_now = scheduler.converter().to_local(now);
            let horizon = days.unwrap_or(scheduler.config().horizon_days);

            let preview: Vec<SlotPreview> = generator
                .available_slots(&busy, &[], local_now, horizon)
                .map(|slot| SlotPreview {
                    start: format_local(&slot.start),
                    end: format_local(&slot.end),
                    minutes: slot.minutes(),
                })
                .collect();
            print_json(&preview, cfg.output.pretty)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::Path => println!("{}", config::config_path()?.display()),
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let s = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("serialize output")?;
    println!("{}", s);
    Ok(())
}
