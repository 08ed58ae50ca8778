//! Interactive turn-based duel on a line-oriented terminal.
//!
//! Reads one command per line: `a`/`b`/`c` (or the action names) to commit a
//! move, `r` to start over, `q` to leave. The bot's reveal is paced by
//! wall-clock time through [`FrameClock`].

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use dukshi_gameplay::{DuelConfig, EventBus, TurnAction, TurnMatch, TurnReport};

use crate::output::{combatant_line, turn_lines, EventPrinter};
use crate::sim::drain;
use crate::timing::FrameClock;

/// Sleep between reveal clock samples.
const REVEAL_POLL: Duration = Duration::from_millis(10);

/// A parsed line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Act(TurnAction),
    Restart,
    Quit,
    Help,
}

fn parse_command(line: &str) -> Result<Command, String> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "restart" => Ok(Command::Restart),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "?" | "h" | "help" => Ok(Command::Help),
        other => other.parse().map(Command::Act),
    }
}

/// Runs an interactive session until `q` or end of input.
///
/// With `json` set, only the event stream is written, one JSON object per
/// line; otherwise a readable transcript with prompts.
pub fn run_interactive<R: BufRead, W: Write>(
    config: &DuelConfig,
    input: R,
    out: &mut W,
    json: bool,
) -> Result<()> {
    let bus = EventBus::default();
    let mut duel = TurnMatch::from_config(config).with_events(bus.sender());
    let mut lines = input.lines();

    info!("Interactive duel against the {} bot", config.difficulty);
    if !json {
        writeln!(out, "Dukshi vs the {} bot. Type ? for help.", config.difficulty)?;
    }

    loop {
        if !json {
            prompt(out, &duel)?;
        }

        let Some(line) = lines.next() else {
            debug!("End of input");
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                if !json {
                    writeln!(out, "{e}")?;
                }
                continue;
            },
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                if !json {
                    writeln!(
                        out,
                        "a = Dukshi (1 mana), b = Barrier (1 mana), c = Charge (+1 mana), r = restart, q = quit"
                    )?;
                }
            },
            Command::Restart => {
                duel.restart();
                if !json {
                    writeln!(out, "New match: {}", duel.id())?;
                }
            },
            Command::Act(action) => match duel.submit(action) {
                Ok(delay) => {
                    if !json && !delay.is_zero() {
                        writeln!(out, "BOT is thinking...")?;
                    }
                    match wait_for_reveal(&mut duel) {
                        Some(report) if !json => print_report(out, &report)?,
                        _ => {},
                    }
                },
                Err(e) => {
                    if !json {
                        writeln!(out, "{e}")?;
                    }
                },
            },
        }

        if json {
            drain(&bus, Some(&mut EventPrinter::new(&mut *out, true)));
        } else {
            drain::<EventPrinter<W>>(&bus, None);
        }
    }

    info!("Interactive duel finished after {} turns", duel.turn());
    Ok(())
}

/// Blocks until the pending reveal fires.
fn wait_for_reveal(duel: &mut TurnMatch) -> Option<TurnReport> {
    let mut clock = FrameClock::default();
    loop {
        if let Some(report) = duel.advance(clock.delta_time()) {
            return Some(report);
        }
        if duel.reveal_remaining().is_none() {
            return None;
        }
        thread::sleep(REVEAL_POLL);
    }
}

fn prompt<W: Write>(out: &mut W, duel: &TurnMatch) -> Result<()> {
    if let Some(summary) = duel.summary() {
        writeln!(out, "Game over: {summary}. r to play again, q to quit.")?;
        return Ok(());
    }

    writeln!(out, "{}", combatant_line("YOU", duel.player()))?;
    writeln!(out, "{}", combatant_line("BOT", duel.bot()))?;
    let choices: Vec<String> = duel
        .available_actions()
        .iter()
        .map(|action| format!("{} ({})", action, key_for(action)))
        .collect();
    writeln!(out, "Turn {}: choose {}", duel.turn(), choices.join(", "))?;
    Ok(())
}

const fn key_for(action: TurnAction) -> char {
    match action {
        TurnAction::Attack => 'a',
        TurnAction::Barrier => 'b',
        TurnAction::Charge => 'c',
    }
}

fn print_report<W: Write>(out: &mut W, report: &TurnReport) -> Result<()> {
    for line in turn_lines(report) {
        writeln!(out, "{line}")?;
    }
    if let Some(summary) = &report.summary {
        writeln!(out, "{}", if summary.player_won() { "You win!" } else { "The bot wins." })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dukshi_gameplay::Difficulty;

    fn instant_config() -> DuelConfig {
        let mut config = DuelConfig {
            seed: Some(11),
            difficulty: Difficulty::Easy,
            ..DuelConfig::default()
        };
        config.turn.reveal_delay_min_ms = 0;
        config.turn.reveal_delay_max_ms = 0;
        config
    }

    fn session(script: &str, json: bool) -> String {
        let mut out = Vec::new();
        run_interactive(&instant_config(), script.as_bytes(), &mut out, json).expect("session");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(" Q "), Ok(Command::Quit));
        assert_eq!(parse_command("r"), Ok(Command::Restart));
        assert_eq!(parse_command("c"), Ok(Command::Act(TurnAction::Charge)));
        assert_eq!(parse_command("dukshi"), Ok(Command::Act(TurnAction::Attack)));
        assert!(parse_command("x").is_err());
    }

    #[test]
    fn test_turn_is_reported() {
        let text = session("a\nq\n", false);
        assert!(text.contains("Turn 1: YOU Dukshi"));
        assert!(text.contains("Turn 2: choose"));
    }

    #[test]
    fn test_rejection_is_explained() {
        // Mana starts full, so an opening Charge is refused and the turn stays put.
        let text = session("c\nq\n", false);
        assert!(text.contains("Charge cannot be performed: mana is already full"));
        assert!(!text.contains("Turn 2: choose"));
    }

    #[test]
    fn test_unknown_command_keeps_going() {
        let text = session("zzz\na\n", false);
        assert!(text.contains("unknown action: zzz"));
        assert!(text.contains("YOU Dukshi"));
    }

    #[test]
    fn test_json_mode_emits_events_only() {
        let text = session("a\nr\nq\n", true);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() >= 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).expect("json line");
            assert!(value.is_object());
        }
        assert!(text.contains("TurnResolved"));
        assert!(text.contains("MatchRestarted"));
    }
}
