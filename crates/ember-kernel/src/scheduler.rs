//! Popup scheduler: a FIFO queue drained by at most one paced consumer.
//!
//! `enqueue_*` appends a request and, if nobody is draining, starts the
//! drainer. The drainer lives in [`DrainState`] rather than in a task: each
//! [`PopupScheduler::step`] counts down its pacing wait and, once the wait has
//! elapsed, either processes the next request or goes back to idle if the
//! queue is empty. At most one request is processed per step, and after each
//! one the drainer waits `delay_between_numbers` before the next.
//!
//! Requests may also arrive through a [`PopupHandle`], a cloneable channel
//! sender handed to the game-state owner. Those are moved into the queue, in
//! send order, by [`PopupScheduler::pump_commands`].

use std::collections::VecDeque;

use crossbeam_channel::{unbounded, Receiver, Sender};
use ember_common::{TargetLookup, TargetRef};
use serde::Serialize;
use tracing::{debug, warn};

use crate::camera::Camera;
use crate::label::{PopupKind, PopupRequest};
use crate::overlay::OverlayRoot;
use crate::resolver::CoordinateResolver;
use crate::settings::PopupSettings;

/// State of the queue consumer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrainState {
    /// No consumer is running.
    #[default]
    Idle,
    /// The consumer is running and will look at the queue once `wait`
    /// seconds have passed.
    Draining {
        /// Remaining pacing delay
        wait: f32,
    },
}

/// Popup request sent through a [`PopupHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupCommand {
    /// Damage popup.
    Damage {
        /// Damage amount
        amount: i32,
        /// Entity hit
        target: TargetRef,
        /// Critical hit
        critical: bool,
    },
    /// Heal popup.
    Heal {
        /// Amount healed
        amount: i32,
        /// Entity healed
        target: TargetRef,
    },
}

/// Cloneable sender for popup requests.
///
/// Sending never fails from the caller's point of view: sends to a scheduler
/// that no longer exists are ignored. Amounts are checked when the scheduler
/// pumps the command, so non-positive ones are counted as rejected there.
#[derive(Debug, Clone)]
pub struct PopupHandle {
    sender: Sender<PopupCommand>,
}

impl PopupHandle {
    /// Requests a damage popup.
    pub fn enqueue_damage(&self, amount: i32, target: impl Into<TargetRef>, critical: bool) {
        self.send(PopupCommand::Damage {
            amount,
            target: target.into(),
            critical,
        });
    }

    /// Requests a heal popup.
    pub fn enqueue_heal(&self, amount: i32, target: impl Into<TargetRef>) {
        self.send(PopupCommand::Heal {
            amount,
            target: target.into(),
        });
    }

    fn send(&self, command: PopupCommand) {
        let _ = self.sender.send(command);
    }
}

/// Counters describing what the scheduler has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopupStats {
    /// Requests accepted into the queue
    pub enqueued: u64,
    /// Requests rejected for a non-positive amount
    pub rejected: u64,
    /// Labels spawned
    pub spawned: u64,
    /// Labels destroyed after completing their animation
    pub destroyed: u64,
    /// Requests dequeued but not shown (overlay unavailable)
    pub dropped: u64,
    /// Times a drainer was started
    pub drains_started: u64,
    /// Drainers running right now
    pub active_drainers: u32,
    /// Highest number of drainers ever running at once
    pub max_active_drainers: u32,
    /// Anchors that fell back to the viewport center
    pub fallback_anchors: u64,
}

/// Ordered popup queue with a single paced drainer.
#[derive(Debug)]
pub struct PopupScheduler {
    settings: PopupSettings,
    queue: VecDeque<PopupRequest>,
    state: DrainState,
    resolver: CoordinateResolver,
    inbox: Receiver<PopupCommand>,
    outbox: Sender<PopupCommand>,
    stats: PopupStats,
}

impl PopupScheduler {
    /// Creates a scheduler with an entropy-seeded resolver.
    #[must_use]
    pub fn new(settings: PopupSettings) -> Self {
        let resolver = CoordinateResolver::new(settings.jitter_x);
        Self::with_resolver(settings, resolver)
    }

    /// Creates a scheduler with a specific resolver (e.g. a seeded one).
    #[must_use]
    pub fn with_resolver(settings: PopupSettings, resolver: CoordinateResolver) -> Self {
        let (outbox, inbox) = unbounded();
        Self {
            settings,
            queue: VecDeque::with_capacity(64),
            state: DrainState::Idle,
            resolver,
            inbox,
            outbox,
            stats: PopupStats::default(),
        }
    }

    /// New handle feeding this scheduler.
    #[must_use]
    pub fn handle(&self) -> PopupHandle {
        PopupHandle {
            sender: self.outbox.clone(),
        }
    }

    /// Queues a damage popup. Returns `false` if the amount was not positive.
    pub fn enqueue_damage(&mut self, amount: i32, target: impl Into<TargetRef>, critical: bool) -> bool {
        self.enqueue(amount, PopupKind::damage(critical), target.into())
    }

    /// Queues a heal popup. Returns `false` if the amount was not positive.
    pub fn enqueue_heal(&mut self, amount: i32, target: impl Into<TargetRef>) -> bool {
        self.enqueue(amount, PopupKind::Heal, target.into())
    }

    /// Queues a popup of any kind. Returns `false` if the amount was not positive.
    pub fn enqueue(&mut self, amount: i32, kind: PopupKind, target: TargetRef) -> bool {
        let Some(request) = PopupRequest::new(amount, kind, target) else {
            self.stats.rejected += 1;
            debug!(amount, ?kind, "non-positive popup amount ignored");
            return false;
        };

        self.queue.push_back(request);
        self.stats.enqueued += 1;
        self.start_drainer();
        true
    }

    /// Moves requests received through handles into the queue.
    ///
    /// Returns the number of commands received.
    pub fn pump_commands(&mut self) -> usize {
        let mut received = 0;
        while let Ok(command) = self.inbox.try_recv() {
            received += 1;
            match command {
                PopupCommand::Damage {
                    amount,
                    target,
                    critical,
                } => self.enqueue_damage(amount, target, critical),
                PopupCommand::Heal { amount, target } => self.enqueue_heal(amount, target),
            };
        }
        received
    }

    fn start_drainer(&mut self) {
        if self.state != DrainState::Idle {
            return;
        }
        self.state = DrainState::Draining { wait: 0.0 };
        self.stats.drains_started += 1;
        self.stats.active_drainers += 1;
        self.stats.max_active_drainers = self.stats.max_active_drainers.max(self.stats.active_drainers);
        debug_assert!(self.stats.active_drainers <= 1, "more than one popup drainer");
        debug!(queued = self.queue.len(), "popup drain started");
    }

    fn stop_drainer(&mut self) {
        self.state = DrainState::Idle;
        self.stats.active_drainers = self.stats.active_drainers.saturating_sub(1);
        debug!("popup drain finished");
    }

    /// Advances the drainer by `dt` seconds.
    ///
    /// Returns `true` if a request was processed this step.
    pub fn step(
        &mut self,
        dt: f32,
        overlay: &mut OverlayRoot,
        targets: &dyn TargetLookup,
        camera: &Camera,
    ) -> bool {
        let DrainState::Draining { wait } = self.state else {
            return false;
        };

        let wait = wait - dt.max(0.0);
        if wait > 0.0 {
            self.state = DrainState::Draining { wait };
            return false;
        }

        let Some(request) = self.queue.pop_front() else {
            self.stop_drainer();
            return false;
        };

        self.process(&request, overlay, targets, camera);
        self.state = DrainState::Draining {
            wait: self.settings.delay_between_numbers,
        };
        true
    }

    fn process(
        &mut self,
        request: &PopupRequest,
        overlay: &mut OverlayRoot,
        targets: &dyn TargetLookup,
        camera: &Camera,
    ) {
        let anchor = self
            .resolver
            .resolve(request.target(), targets, camera, overlay.viewport());
        if anchor.fallback {
            self.stats.fallback_anchors += 1;
            debug!(target = ?request.target(), "popup target absent, using viewport center");
        }

        match overlay.spawn(request, anchor.point, &self.settings) {
            Ok(_) => self.stats.spawned += 1,
            Err(e) => {
                self.stats.dropped += 1;
                warn!("Popup {} dropped: {e}", request.amount());
            },
        }
    }

    /// Records labels destroyed by the overlay this tick.
    pub fn record_destroyed(&mut self, count: usize) {
        self.stats.destroyed += count as u64;
    }

    /// Empties the queue and stops the drainer.
    ///
    /// Returns the number of requests discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.queue.len();
        self.queue.clear();
        while self.inbox.try_recv().is_ok() {}
        if self.state != DrainState::Idle {
            self.stop_drainer();
        }
        discarded
    }

    /// Requests waiting to be processed.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Pending requests in processing order.
    pub fn pending(&self) -> impl Iterator<Item = &PopupRequest> {
        self.queue.iter()
    }

    /// Current drainer state.
    #[must_use]
    pub const fn state(&self) -> DrainState {
        self.state
    }

    /// Whether a drainer is running.
    #[must_use]
    pub fn is_draining(&self) -> bool {
        matches!(self.state, DrainState::Draining { .. })
    }

    /// Counters.
    #[must_use]
    pub const fn stats(&self) -> &PopupStats {
        &self.stats
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &PopupSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayEvent;
    use ember_common::{EntityId, NoTargets, Viewport};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        scheduler: PopupScheduler,
        overlay: OverlayRoot,
        camera: Camera,
    }

    impl Rig {
        fn new() -> Self {
            let settings = PopupSettings::default();
            Self {
                scheduler: PopupScheduler::with_resolver(settings, CoordinateResolver::with_seed(20.0, 3)),
                overlay: OverlayRoot::new(Viewport::new(800.0, 600.0, 1.0)),
                camera: Camera::new(800.0, 600.0),
            }
        }

        fn tick(&mut self) -> bool {
            self.scheduler.pump_commands();
            let destroyed = self.overlay.update(DT);
            self.scheduler.record_destroyed(destroyed);
            self.scheduler.step(DT, &mut self.overlay, &NoTargets, &self.camera)
        }

        fn run_until_idle(&mut self, max_ticks: usize) {
            for _ in 0..max_ticks {
                self.tick();
                if !self.scheduler.is_draining() && self.scheduler.queue_len() == 0 {
                    return;
                }
            }
        }

        fn spawned_texts(&mut self) -> Vec<String> {
            self.overlay
                .drain_events()
                .into_iter()
                .filter_map(|e| match e {
                    OverlayEvent::Spawned { text, .. } => Some(text),
                    OverlayEvent::Destroyed { .. } => None,
                })
                .collect()
        }
    }

    #[test]
    fn test_non_positive_amounts_are_ignored() {
        let mut rig = Rig::new();
        assert!(!rig.scheduler.enqueue_damage(0, TargetRef::none(), false));
        assert!(!rig.scheduler.enqueue_heal(-3, TargetRef::none()));
        assert_eq!(rig.scheduler.queue_len(), 0);
        assert!(!rig.scheduler.is_draining());
        assert_eq!(rig.scheduler.stats().rejected, 2);

        rig.run_until_idle(100);
        assert_eq!(rig.overlay.active_count(), 0);
    }

    #[test]
    fn test_enqueue_starts_single_drainer() {
        let mut rig = Rig::new();
        rig.scheduler.enqueue_damage(1, TargetRef::none(), false);
        rig.scheduler.enqueue_damage(2, TargetRef::none(), false);
        rig.scheduler.enqueue_heal(3, TargetRef::none());
        assert!(rig.scheduler.is_draining());
        assert_eq!(rig.scheduler.stats().drains_started, 1);
        assert_eq!(rig.scheduler.stats().active_drainers, 1);
    }

    #[test]
    fn test_first_request_processed_on_next_step() {
        let mut rig = Rig::new();
        rig.scheduler.enqueue_damage(10, TargetRef::none(), false);
        assert!(rig.tick());
        assert_eq!(rig.overlay.active_count(), 1);
    }

    #[test]
    fn test_two_hits_same_tick() {
        let mut rig = Rig::new();
        let target = EntityId::new();
        rig.scheduler.enqueue_damage(10, target, false);
        rig.scheduler.enqueue_damage(15, target, true);

        assert!(rig.tick());
        assert_eq!(rig.scheduler.queue_len(), 1);
        let first = rig.overlay.labels().next().expect("first label");
        assert_eq!(first.text(), "10");
        assert_eq!(first.kind(), PopupKind::Damage);
        assert_eq!(first.style().color, [1.0, 0.2, 0.2, 1.0]);
        let first_font_size = first.style().font_size;

        // The second waits out the pacing delay that began when the first was dequeued.
        let mut ticks = 0;
        while !rig.tick() {
            ticks += 1;
        }
        assert!(ticks as f32 * DT >= 0.1 - 2.0 * DT);
        let second = rig.overlay.labels().nth(1).expect("second label");
        assert_eq!(second.text(), "15!");
        assert_eq!(second.kind(), PopupKind::Critical);
        assert!(second.style().font_size > first_font_size);
    }

    #[test]
    fn test_drainer_exits_after_delay_when_empty() {
        let mut rig = Rig::new();
        rig.scheduler.enqueue_damage(5, TargetRef::none(), false);
        rig.tick();
        assert!(rig.scheduler.is_draining());

        // Re-entrant enqueue during the pacing delay reuses the running drainer.
        rig.tick();
        rig.scheduler.enqueue_damage(6, TargetRef::none(), false);
        assert_eq!(rig.scheduler.stats().drains_started, 1);

        rig.run_until_idle(600);
        assert!(!rig.scheduler.is_draining());
        assert_eq!(rig.scheduler.stats().active_drainers, 0);
        assert_eq!(rig.scheduler.stats().spawned, 2);

        // Next enqueue starts a fresh drainer.
        rig.scheduler.enqueue_heal(1, TargetRef::none());
        assert_eq!(rig.scheduler.stats().drains_started, 2);
    }

    #[test]
    fn test_handle_commands_are_queued_in_send_order() {
        let mut rig = Rig::new();
        let handle = rig.scheduler.handle();
        handle.enqueue_damage(1, TargetRef::none(), false);
        handle.enqueue_heal(0, TargetRef::none());
        handle.enqueue_heal(2, TargetRef::none());
        handle.enqueue_damage(3, TargetRef::none(), true);

        handle.enqueue_heal(-4, TargetRef::none());

        rig.run_until_idle(600);
        assert_eq!(rig.spawned_texts(), vec!["1", "+2", "3!"]);
        assert_eq!(rig.scheduler.stats().enqueued, 3);
        assert_eq!(rig.scheduler.stats().rejected, 2);
    }

    #[test]
    fn test_handle_rejections_match_direct_enqueue() {
        let mut rig = Rig::new();
        let handle = rig.scheduler.handle();
        handle.enqueue_damage(0, TargetRef::none(), true);
        assert_eq!(rig.scheduler.pump_commands(), 1);
        assert!(!rig.scheduler.enqueue_damage(0, TargetRef::none(), true));
        assert_eq!(rig.scheduler.stats().rejected, 2);
        assert_eq!(rig.scheduler.queue_len(), 0);
        assert!(!rig.scheduler.is_draining());
    }

    #[test]
    fn test_burst_of_fifty_is_paced_and_ordered() {
        let mut rig = Rig::new();
        for amount in 1..=50 {
            rig.scheduler.enqueue_damage(amount, TargetRef::none(), false);
        }
        rig.run_until_idle(2_000);

        let spawns: Vec<(String, f64)> = rig
            .overlay
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                OverlayEvent::Spawned { text, at, .. } => Some((text, at)),
                OverlayEvent::Destroyed { .. } => None,
            })
            .collect();

        assert_eq!(spawns.len(), 50);
        for (i, (text, _)) in spawns.iter().enumerate() {
            assert_eq!(text, &(i + 1).to_string());
        }
        for pair in spawns.windows(2) {
            let gap = pair[1].1 - pair[0].1;
            assert!(gap >= 0.1 - 1e-4, "gap {gap} shorter than pacing delay");
            assert!(gap <= 0.1 + f64::from(DT) + 1e-4, "gap {gap} too long");
        }
        assert_eq!(rig.scheduler.stats().max_active_drainers, 1);
        assert_eq!(rig.scheduler.stats().drains_started, 1);
    }

    #[test]
    fn test_dropped_when_overlay_torn_down() {
        let mut rig = Rig::new();
        rig.overlay.teardown();
        rig.scheduler.enqueue_damage(9, TargetRef::none(), false);
        rig.scheduler.enqueue_damage(10, TargetRef::none(), false);
        rig.run_until_idle(600);
        assert_eq!(rig.scheduler.stats().dropped, 2);
        assert_eq!(rig.scheduler.stats().spawned, 0);
        assert!(!rig.scheduler.is_draining());
    }

    #[test]
    fn test_clear_discards_queue() {
        let mut rig = Rig::new();
        rig.scheduler.enqueue_damage(1, TargetRef::none(), false);
        rig.scheduler.enqueue_damage(2, TargetRef::none(), false);
        assert_eq!(rig.scheduler.clear(), 2);
        assert!(!rig.scheduler.is_draining());
        assert_eq!(rig.scheduler.stats().active_drainers, 0);
    }

    proptest! {
        #[test]
        fn prop_non_positive_never_enqueued(amounts in prop::collection::vec(-10_000i32..=0, 0..64)) {
            let mut rig = Rig::new();
            for amount in &amounts {
                prop_assert!(!rig.scheduler.enqueue_damage(*amount, TargetRef::none(), false));
            }
            prop_assert_eq!(rig.scheduler.queue_len(), 0);
            rig.run_until_idle(10);
            prop_assert_eq!(rig.overlay.active_count(), 0);
        }

        #[test]
        fn prop_fifo_order(amounts in prop::collection::vec(1i32..100_000, 1..40)) {
            let mut rig = Rig::new();
            for amount in &amounts {
                rig.scheduler.enqueue_damage(*amount, TargetRef::none(), false);
            }
            rig.run_until_idle(5_000);
            let expected: Vec<String> = amounts.iter().map(ToString::to_string).collect();
            prop_assert_eq!(rig.spawned_texts(), expected);
        }

        #[test]
        fn prop_at_most_one_drainer(ops in prop::collection::vec((-5i32..50, 0usize..12), 1..80)) {
            let mut rig = Rig::new();
            for (amount, ticks) in ops {
                rig.scheduler.enqueue_heal(amount, TargetRef::none());
                prop_assert!(rig.scheduler.stats().active_drainers <= 1);
                for _ in 0..ticks {
                    rig.tick();
                    prop_assert!(rig.scheduler.stats().active_drainers <= 1);
                }
            }
            prop_assert!(rig.scheduler.stats().max_active_drainers <= 1);
        }
    }
}
