//! # Dukshi
//!
//! Terminal entry point for the Dukshi duel:
//! - `play`: turn-based duel against the bot over stdin/stdout
//! - `sim`: bot-vs-bot turn-based series with win statistics
//! - `realtime`: headless bot-vs-bot real-time match

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dukshi_common::SchemaVersion;
use dukshi_engine::output::{fighter_line, EventPrinter};
use dukshi_engine::play::run_interactive;
use dukshi_engine::sim::{run_realtime, run_turn_series};
use dukshi_engine::timing::FrameClock;
use dukshi_gameplay::{Difficulty, DuelConfig, RealtimeRules, CONFIG_FILE};

/// Dukshi: a three-move duel against a rule-driven bot
#[derive(Parser, Debug)]
#[command(name = "dukshi", version)]
#[command(about = "Play or simulate the Dukshi duel")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Bot difficulty (overrides the config file)
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Random seed for reproducible matches
    #[arg(long)]
    seed: Option<u64>,

    /// Real-time ruleset (overrides the config file)
    #[arg(long, value_enum)]
    ruleset: Option<Ruleset>,

    /// Write events and results as JSON lines
    #[arg(long)]
    json: bool,

    /// Write logs as JSON to stderr
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the turn-based duel against the bot
    Play,

    /// Run bot-vs-bot turn-based matches and report win rates
    Sim {
        /// Number of matches
        #[arg(long, default_value_t = 100)]
        matches: u32,

        /// Difficulty driving the player seat
        #[arg(long, default_value = "normal")]
        challenger: Difficulty,

        /// Print every event as it happens
        #[arg(long)]
        events: bool,
    },

    /// Run one bot-vs-bot real-time match
    Realtime {
        /// Ticks before the match is called a draw
        #[arg(long, default_value_t = 3600)]
        max_ticks: u64,

        /// Difficulty driving the player seat
        #[arg(long, default_value = "normal")]
        challenger: Difficulty,

        /// Run at 60 ticks per second instead of as fast as possible
        #[arg(long)]
        paced: bool,
    },

    /// Write the effective configuration to the config path
    WriteConfig,
}

/// Real-time rule presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Ruleset {
    /// Weaker blocks, no mega attack, fighters stop on contact
    Early,
    /// Mega attack enabled, fighters bounce apart
    Final,
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is kept for game output
    let filter = EnvFilter::from_default_env().add_directive("dukshi=info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }

    info!("Dukshi starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Event schema: {}", SchemaVersion::EVENTS);

    let config = effective_config(&cli);

    match cli.command {
        Command::Play => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_interactive(&config, stdin.lock(), &mut stdout, cli.json)?;
        },
        Command::Sim {
            matches,
            challenger,
            events,
        } => {
            let mut printer = EventPrinter::new(io::stdout(), cli.json);
            let stats = run_turn_series(
                &config,
                challenger,
                matches,
                events.then_some(&mut printer),
            );
            let mut stdout = io::stdout();
            if cli.json {
                writeln!(stdout, "{}", serde_json::to_string(&stats)?)?;
            } else {
                writeln!(stdout, "{stats}")?;
            }
        },
        Command::Realtime {
            max_ticks,
            challenger,
            paced,
        } => {
            let mut printer = EventPrinter::new(io::stdout(), cli.json);
            let mut clock = FrameClock::default();
            let mut owed = 0;
            let show_status = !cli.json;

            let result = run_realtime(&config, challenger, max_ticks, Some(&mut printer), |duel| {
                if paced {
                    while owed == 0 {
                        thread::sleep(Duration::from_millis(1));
                        let dt = clock.delta_time();
                        owed += clock.accumulate(dt);
                    }
                    owed -= 1;
                }
                if show_status && duel.tick_count() % 60 == 0 {
                    println!("{}", fighter_line("YOU", duel.player()));
                    println!("{}", fighter_line("BOT", duel.bot()));
                }
                true
            });

            let mut stdout = io::stdout();
            if cli.json {
                writeln!(stdout, "{}", serde_json::to_string(&result)?)?;
            } else {
                match &result.summary {
                    Some(summary) => writeln!(stdout, "{summary}")?,
                    None => writeln!(stdout, "Draw after {} ticks", result.ticks)?,
                }
            }
        },
        Command::WriteConfig => {
            config.save_to(&cli.config)?;
            println!("Wrote {} (schema {})", cli.config.display(), SchemaVersion::CONFIG);
        },
    }

    info!("Dukshi shutdown complete");
    Ok(())
}

/// Config file merged with command-line overrides.
fn effective_config(cli: &Cli) -> DuelConfig {
    let mut config = DuelConfig::load_from(&cli.config);
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    match cli.ruleset {
        Some(Ruleset::Early) => config.realtime = RealtimeRules::early(),
        Some(Ruleset::Final) => config.realtime = RealtimeRules::default(),
        None => {},
    }
    config
}
