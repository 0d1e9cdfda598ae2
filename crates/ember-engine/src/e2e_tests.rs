//! End-to-end tests for the headless skirmish.
//!
//! These run the whole pipeline (combat state, event bus, popup system and
//! overlay) on the simulated clock and check what the player would see.

#![cfg(test)]

use crate::app::simulate;
use crate::config::EngineConfig;

fn config(sim_seconds: f32) -> EngineConfig {
    EngineConfig {
        sim_seconds,
        seed: Some(7),
        print_summary: false,
        ..EngineConfig::default()
    }
}

#[test]
fn e2e_every_popup_is_shown_and_finishes() {
    let summary = simulate(&config(12.0)).expect("run");

    // Two card hits, goblin, cleric hit and heal, then the burst.
    assert_eq!(summary.shown.total(), 55);
    assert_eq!(summary.shown.heal, 1);
    assert!(summary.shown.critical >= 1, "the card's second hit is a crit");
    assert_eq!(summary.completed, 55);
    assert_eq!(summary.destroyed_in_flight, 0);
    assert_eq!(summary.stats.dropped, 0);
    assert_eq!(summary.stats.max_active_drainers, 1);
}

#[test]
fn e2e_departed_cleric_falls_back_to_center() {
    let summary = simulate(&config(2.0)).expect("run");
    assert_eq!(summary.stats.fallback_anchors, 2);
}

#[test]
fn e2e_burst_is_paced() {
    let summary = simulate(&config(12.0)).expect("run");
    // One label per 0.1s with a 1.5s lifetime keeps roughly 15 on screen.
    assert!(summary.max_live_labels >= 10);
    assert!(summary.max_live_labels <= 16);
}

#[test]
fn e2e_shutdown_destroys_labels_in_flight() {
    let summary = simulate(&config(3.0)).expect("run");
    assert!(summary.destroyed_in_flight > 0);
    assert_eq!(
        summary.completed + summary.destroyed_in_flight,
        summary.stats.spawned
    );
    assert!(summary.stats.enqueued > summary.stats.spawned);
}

#[test]
fn e2e_zero_length_run_shows_nothing() {
    let summary = simulate(&config(0.0)).expect("run");
    assert_eq!(summary.steps, 0);
    assert_eq!(summary.shown.total(), 0);
}
