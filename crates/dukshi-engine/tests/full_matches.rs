use dukshi_engine::output::EventPrinter;
use dukshi_engine::play::run_interactive;
use dukshi_engine::sim::{run_realtime, run_turn_series, TURN_LIMIT};
use dukshi_gameplay::{Difficulty, DuelConfig, RealtimeRules, CONFIG_FILE};

fn seeded(seed: u64, difficulty: Difficulty) -> DuelConfig {
    DuelConfig {
        seed: Some(seed),
        difficulty,
        ..DuelConfig::default()
    }
}

#[test]
fn every_pairing_finishes_its_series() {
    for defender in Difficulty::ALL {
        for challenger in Difficulty::ALL {
            let stats = run_turn_series::<EventPrinter<Vec<u8>>>(
                &seeded(42, defender),
                challenger,
                10,
                None,
            );
            assert_eq!(stats.matches, 10);
            assert_eq!(stats.player_wins + stats.bot_wins + stats.draws, 10);
            if let Some(longest) = stats.longest {
                assert!(longest <= TURN_LIMIT);
            }
        }
    }
}

#[test]
fn series_stats_serialize_to_json() {
    let stats = run_turn_series::<EventPrinter<Vec<u8>>>(
        &seeded(3, Difficulty::Hard),
        Difficulty::Normal,
        5,
        None,
    );
    let value = serde_json::to_value(&stats).expect("json");
    assert_eq!(value["matches"], 5);
    assert_eq!(value["defender"], "hard");
}

#[test]
fn realtime_match_streams_json_events() {
    let mut printer = EventPrinter::new(Vec::new(), true);
    let result = run_realtime(
        &seeded(9, Difficulty::Hard),
        Difficulty::Hard,
        3600,
        Some(&mut printer),
        |duel| {
            let rules = duel.rules();
            for fighter in [duel.player(), duel.bot()] {
                let x = fighter.position().x;
                assert!(x >= 0.0 && x + rules.fighter_width <= rules.arena_width);
            }
            true
        },
    );

    let text = String::from_utf8(printer.into_inner()).expect("utf8");
    for line in text.lines() {
        serde_json::from_str::<serde_json::Value>(line).expect("one object per line");
    }
    if let Some(summary) = result.summary {
        assert!(text.contains("MatchOver"));
        let loser_health = if summary.player_won() {
            result.bot_health
        } else {
            result.player_health
        };
        assert_eq!(loser_health, 0);
    } else {
        assert_eq!(result.ticks, 3600);
    }
}

#[test]
fn early_ruleset_never_lands_a_mega() {
    let mut config = seeded(21, Difficulty::Hard);
    config.realtime = RealtimeRules::early();

    let mut printer = EventPrinter::new(Vec::new(), true);
    run_realtime(&config, Difficulty::Hard, 2000, Some(&mut printer), |_| true);

    let text = String::from_utf8(printer.into_inner()).expect("utf8");
    assert!(!text.contains("\"mega\":true"));
}

#[test]
fn scripted_session_plays_to_the_end() {
    let mut config = seeded(5, Difficulty::Normal);
    config.turn.reveal_delay_min_ms = 0;
    config.turn.reveal_delay_max_ms = 0;

    // Mana starts full: attack first, then refill.
    let script = "a\nc\n".repeat(60);
    let mut out = Vec::new();
    run_interactive(&config, script.as_bytes(), &mut out, false).expect("session");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Turn 1: YOU Dukshi"));
    assert!(!text.contains("mana is already full"));
    assert!(text.contains("Game over") || text.contains("Turn 60"));
}

#[test]
fn config_file_drives_the_match() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(CONFIG_FILE);

    let mut config = seeded(77, Difficulty::Easy);
    config.turn.max_life = 1;
    config.save_to(&path).expect("save");

    let loaded = DuelConfig::load_from(&path);
    assert_eq!(loaded, config);

    let stats = run_turn_series::<EventPrinter<Vec<u8>>>(&loaded, Difficulty::Hard, 20, None);
    assert_eq!(stats.player_wins + stats.bot_wins + stats.draws, 20);
    if stats.player_wins + stats.bot_wins > 0 {
        assert!(stats.average_turns() >= 1.0);
    }
}
