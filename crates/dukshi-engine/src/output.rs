//! Rendering of duel events and state for the terminal.

use std::io::Write;

use dukshi_gameplay::{CombatantState, DuelEvent, EventHandler, Fighter, TurnReport};

/// Writes drained events as text lines or JSON lines.
#[derive(Debug)]
pub struct EventPrinter<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> EventPrinter<W> {
    /// Creates a printer. `json` selects one JSON object per line.
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    /// Consumes the printer and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventHandler for EventPrinter<W> {
    fn handle(&mut self, event: &DuelEvent) {
        let line = if self.json {
            match serde_json::to_string(event) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Could not encode event: {e}");
                    return;
                },
            }
        } else {
            describe(event)
        };
        if let Err(e) = writeln!(self.out, "{line}") {
            tracing::warn!("Could not write event: {e}");
        }
    }
}

/// One-line description of an event.
#[must_use]
pub fn describe(event: &DuelEvent) -> String {
    match event {
        DuelEvent::TurnResolved {
            turn,
            player_action,
            bot_action,
            message,
            ..
        } => format!("Turn {turn}: YOU {player_action} / BOT {bot_action}: {message}"),
        DuelEvent::ActionRejected {
            side,
            action,
            reason,
        } => format!("{side}: {action} refused ({reason})"),
        DuelEvent::HitLanded { tick, strike, .. } => format!(
            "[{tick:>5}] {} hits for {}{}{}",
            strike.attacker,
            strike.dealt,
            if strike.mega { " with a mega attack" } else { "" },
            if strike.blocked { " through a block" } else { "" },
        ),
        DuelEvent::BlockStarted { side, tick } => format!("[{tick:>5}] {side} blocks"),
        DuelEvent::BlockEnded {
            side,
            tick,
            expired,
        } => format!(
            "[{tick:>5}] {side} {}",
            if *expired {
                "can't hold the block any longer"
            } else {
                "lowers the block"
            }
        ),
        DuelEvent::MatchOver { summary } => format!("Game over: {summary}"),
        DuelEvent::MatchRestarted { match_id } => format!("New match: {match_id}"),
    }
}

/// Text bar of `width` cells filled to `percent`.
#[must_use]
pub fn bar(percent: f32, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f32).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}

/// Status line for a turn-based combatant.
#[must_use]
pub fn combatant_line(label: &str, state: &CombatantState) -> String {
    let mut line = format!(
        "{label:<4} life {} {}/{}  mana {} {}/{}",
        bar(state.life_percentage(), 6),
        state.life(),
        state.max_life(),
        bar(state.mana_percentage(), 6),
        state.mana(),
        state.max_mana(),
    );
    if state.charge_bonus() > 0 {
        line.push_str(&format!("  charged +{}", state.charge_bonus()));
    }
    if state.consecutive_defense() > 1 {
        line.push_str(&format!("  guarding x{}", state.consecutive_defense()));
    }
    if let Some(last) = state.last_action() {
        line.push_str(&format!("  last: {last}"));
    }
    line
}

/// Status line for a real-time fighter.
#[must_use]
pub fn fighter_line(label: &str, fighter: &Fighter) -> String {
    format!(
        "{label:<4} hp {} {}/{}  mana {} {}/{}  x {:>5.1}",
        bar(fighter.health_percentage(), 6),
        fighter.health(),
        fighter.max_health(),
        bar(fighter.mana_percentage(), 10),
        fighter.mana(),
        fighter.max_mana(),
        fighter.position().x,
    )
}

/// Multi-line rendering of a resolved turn.
#[must_use]
pub fn turn_lines(report: &TurnReport) -> Vec<String> {
    vec![
        format!(
            "Turn {}: YOU {} / BOT {}",
            report.turn, report.player_action, report.bot_action
        ),
        report.outcome.message.clone(),
        combatant_line("YOU", &report.player),
        combatant_line("BOT", &report.bot),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use dukshi_common::{MatchId, Side};
    use dukshi_gameplay::{MatchLength, MatchSummary, TurnRules};

    #[test]
    fn test_bar_widths() {
        assert_eq!(bar(0.0, 4), "[----]");
        assert_eq!(bar(50.0, 4), "[##--]");
        assert_eq!(bar(100.0, 4), "[####]");
        assert_eq!(bar(250.0, 4), "[####]");
    }

    #[test]
    fn test_json_lines() {
        let mut printer = EventPrinter::new(Vec::new(), true);
        printer.handle(&DuelEvent::MatchOver {
            summary: MatchSummary {
                match_id: MatchId::from_raw(3),
                winner: Side::Player,
                length: MatchLength::Turns(4),
            },
        });
        let text = String::from_utf8(printer.into_inner()).expect("utf8");
        let value: serde_json::Value = serde_json::from_str(text.trim()).expect("json");
        assert!(value.get("MatchOver").is_some());
    }

    #[test]
    fn test_combatant_line_mentions_streaks() {
        let state = CombatantState::new(&TurnRules::default())
            .with_charge_bonus(2)
            .with_mana(1);
        let line = combatant_line("YOU", &state);
        assert!(line.contains("charged +2"));
        assert!(line.contains("1/3"));
    }
}
