//! Headless application: a scripted skirmish driven through the popup
//! pipeline on a fixed-step clock.
//!
//! The script covers the situations the overlay has to cope with:
//! - Two hits on a card in the same frame
//! - A heal whose target leaves the field before the popup is processed
//! - A 50-hit burst on a world-space target that keeps walking

use anyhow::{Context, Result};
use ember_common::{EntityId, ScreenRect, Viewport};
use ember_gameplay::{CombatState, Combatant, CombatantArena, Presence};
use ember_kernel::{
    Camera, DestroyReason, OverlayEvent, OverlayRoot, PopupKind, PopupRegistrar, PopupStats,
    PopupSystem,
};
use glam::Vec2;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::timing::FrameTiming;

/// Hits in the closing burst.
const BURST_HITS: u32 = 50;

/// World units per second the burst target walks.
const OGRE_SPEED: Vec2 = Vec2::new(40.0, 0.0);

/// Counts of labels shown, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    /// Plain damage labels
    pub damage: u64,
    /// Critical labels
    pub critical: u64,
    /// Heal labels
    pub heal: u64,
}

impl KindCounts {
    fn record(&mut self, kind: PopupKind) {
        match kind {
            PopupKind::Damage => self.damage += 1,
            PopupKind::Critical => self.critical += 1,
            PopupKind::Heal => self.heal += 1,
        }
    }

    /// Total labels shown.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.damage + self.critical + self.heal
    }
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Frames simulated
    pub frames: u64,
    /// Fixed steps run
    pub steps: u64,
    /// Simulated seconds
    pub simulated_seconds: f64,
    /// Labels shown, by kind
    pub shown: KindCounts,
    /// Labels that finished their fade
    pub completed: u64,
    /// Labels destroyed by shutdown while still animating
    pub destroyed_in_flight: u64,
    /// Most labels alive at once
    pub max_live_labels: usize,
    /// Scheduler counters at shutdown
    pub stats: PopupStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    TwoHits,
    HealLeavingTarget,
    Burst,
}

/// Scripted combat against a fixed cast.
#[derive(Debug)]
struct Skirmish {
    knight_card: EntityId,
    cleric: EntityId,
    goblin: EntityId,
    ogre: EntityId,
    ogre_position: Vec2,
    cues: Vec<(f32, Cue)>,
    next_cue: usize,
    burst_left: u32,
    rng: fastrand::Rng,
}

impl Skirmish {
    fn new(combatants: &mut CombatantArena, seed: Option<u64>) -> Self {
        let knight_card = combatants.spawn(Combatant::new(
            "Knight",
            Presence::Overlay(ScreenRect::new(40.0, 520.0, 160.0, 180.0)),
            120,
        ));
        let cleric = combatants.spawn(Combatant::new(
            "Cleric",
            Presence::Overlay(ScreenRect::new(220.0, 520.0, 160.0, 180.0)),
            80,
        ));
        let goblin = combatants.spawn(Combatant::new(
            "Goblin",
            Presence::World(Vec2::new(-200.0, -80.0)),
            40,
        ));
        let ogre_position = Vec2::new(-300.0, 60.0);
        let ogre = combatants.spawn(Combatant::new("Ogre", Presence::World(ogre_position), 5_000));

        Self {
            knight_card,
            cleric,
            goblin,
            ogre,
            ogre_position,
            cues: vec![(0.0, Cue::TwoHits), (0.5, Cue::HealLeavingTarget), (1.0, Cue::Burst)],
            next_cue: 0,
            burst_left: 0,
            rng: seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed),
        }
    }

    /// Plays every cue due at `now`, one burst hit, and moves the ogre.
    fn step(&mut self, now: f32, dt: f32, combat: &mut CombatState) -> Result<()> {
        while let Some(&(at, cue)) = self.cues.get(self.next_cue) {
            if at > now {
                break;
            }
            self.next_cue += 1;
            debug!(?cue, at, "skirmish cue");
            self.play(cue, combat)?;
        }

        if self.burst_left > 0 {
            self.burst_left -= 1;
            let critical = self.rng.u8(..5) == 0;
            let base = self.rng.i32(5..=30);
            let amount = if critical { base * 2 } else { base };
            combat.apply_damage(self.ogre, amount, critical)?;
        }

        self.ogre_position += OGRE_SPEED * dt;
        combat
            .combatants_mut()
            .set_presence(self.ogre, Presence::World(self.ogre_position))?;
        Ok(())
    }

    fn play(&mut self, cue: Cue, combat: &mut CombatState) -> Result<()> {
        match cue {
            Cue::TwoHits => {
                combat.apply_damage(self.knight_card, 10, false)?;
                combat.apply_damage(self.knight_card, 15, true)?;
            },
            Cue::HealLeavingTarget => {
                combat.apply_damage(self.goblin, 8, false)?;
                combat.apply_damage(self.cleric, 20, false)?;
                combat.apply_heal(self.cleric, 7)?;
                let cleric = combat.combatants_mut().despawn(self.cleric)?;
                info!("{} left the field with a heal still queued", cleric.name());
            },
            Cue::Burst => self.burst_left = BURST_HITS,
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Tally {
    shown: KindCounts,
    completed: u64,
    destroyed_in_flight: u64,
    max_live_labels: usize,
}

impl Tally {
    fn record(&mut self, events: Vec<OverlayEvent>) {
        for event in events {
            match event {
                OverlayEvent::Spawned { kind, .. } => self.shown.record(kind),
                OverlayEvent::Destroyed {
                    reason: DestroyReason::Completed,
                    ..
                } => self.completed += 1,
                OverlayEvent::Destroyed {
                    reason: DestroyReason::Teardown,
                    ..
                } => self.destroyed_in_flight += 1,
            }
        }
    }
}

/// Runs the skirmish for `config.sim_seconds` and returns what was shown.
pub fn simulate(config: &EngineConfig) -> Result<RunSummary> {
    let width = config.viewport_width as f32;
    let height = config.viewport_height as f32;
    let viewport = Viewport::new(width, height, config.ui_scale);
    let camera = Camera::new(width, height);

    let mut combat = CombatState::new();
    let mut popups = PopupSystem::try_startup(
        config.popups.clone(),
        Some(OverlayRoot::new(viewport)),
        Some(&mut combat as &mut dyn PopupRegistrar),
        config.seed,
    )
    .context("starting popup system")?;

    let mut skirmish = Skirmish::new(combat.combatants_mut(), config.seed);
    let mut timing = FrameTiming::new(config.target_fps);
    timing.set_fixed_dt(config.fixed_dt);
    let frame_dt = timing.frame_dt();
    let fixed_dt = timing.fixed_dt();

    let mut tally = Tally::default();
    let mut now = 0.0_f32;
    while now < config.sim_seconds {
        for _ in 0..timing.accumulate(frame_dt) {
            skirmish.step(now, fixed_dt, &mut combat)?;
            combat.dispatch_events();
            popups.update(fixed_dt, combat.combatants(), &camera);
            tally.record(popups.drain_events());
            let live = popups.overlay().map_or(0, OverlayRoot::active_count);
            tally.max_live_labels = tally.max_live_labels.max(live);
            now += fixed_dt;
        }
    }

    let stats = popups.stats();
    tally.record(popups.shutdown());

    Ok(RunSummary {
        frames: timing.frames(),
        steps: timing.steps(),
        simulated_seconds: timing.simulated_seconds(),
        shown: tally.shown,
        completed: tally.completed,
        destroyed_in_flight: tally.destroyed_in_flight,
        max_live_labels: tally.max_live_labels,
        stats,
    })
}

/// Runs the headless skirmish and reports the summary.
pub fn run(config: &EngineConfig) -> Result<()> {
    info!("Configuration loaded:");
    info!("  Viewport: {}x{} @ {}x", config.viewport_width, config.viewport_height, config.ui_scale);
    info!("  Timing: {} fps, fixed step {:.4}s", config.target_fps, config.fixed_dt);
    info!("  Simulating {:.1}s (seed {:?})", config.sim_seconds, config.seed);

    let summary = simulate(config)?;

    info!(
        "Shown {} popup(s): {} damage, {} critical, {} heal",
        summary.shown.total(),
        summary.shown.damage,
        summary.shown.critical,
        summary.shown.heal
    );
    info!(
        "Completed {}, destroyed in flight {}, peak {} live, {} fallback anchor(s)",
        summary.completed,
        summary.destroyed_in_flight,
        summary.max_live_labels,
        summary.stats.fallback_anchors
    );

    if config.print_summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
