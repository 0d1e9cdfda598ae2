//! Overlay root: the parent of every live popup label.
//!
//! The overlay owns its labels outright. A label is created by
//! [`OverlayRoot::spawn`], advanced by [`OverlayRoot::update`] and removed on
//! the tick its fade completes. [`OverlayRoot::teardown`] destroys whatever is
//! still in flight and refuses later spawns, so nothing can be scheduled
//! against a parent that no longer exists.

use std::collections::VecDeque;

use ember_common::{LabelId, OverlayError, OverlayPoint, ScreenRect, Viewport};
use tracing::{debug, info};

use crate::label::{LabelInstance, PopupKind, PopupLabel, PopupRequest};
use crate::settings::PopupSettings;

/// Why a label went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyReason {
    /// Its fade-out finished.
    Completed,
    /// The overlay was torn down.
    Teardown,
}

/// Lifecycle notifications for hosts and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// A label was created.
    Spawned {
        /// Label id
        id: LabelId,
        /// Popup kind
        kind: PopupKind,
        /// Displayed text
        text: String,
        /// Spawn position
        anchor: OverlayPoint,
        /// Overlay clock at spawn (seconds)
        at: f64,
    },
    /// A label was destroyed.
    Destroyed {
        /// Label id
        id: LabelId,
        /// Seconds the label was alive
        lifetime: f32,
        /// Overlay clock at destruction (seconds)
        at: f64,
        /// Cause
        reason: DestroyReason,
    },
}

/// Most lifecycle events kept between two drains.
pub const MAX_RETAINED_EVENTS: usize = 1024;

/// Bounded lifecycle log. Once full, the oldest events are discarded.
#[derive(Debug, Default)]
struct EventLog {
    events: VecDeque<OverlayEvent>,
    discarded: u64,
}

impl EventLog {
    fn push(&mut self, event: OverlayEvent) {
        if self.events.len() == MAX_RETAINED_EVENTS {
            self.events.pop_front();
            self.discarded += 1;
        }
        self.events.push_back(event);
    }

    fn drain(&mut self) -> Vec<OverlayEvent> {
        self.events.drain(..).collect()
    }
}

/// Fixed 2D root node that popup labels are parented under.
#[derive(Debug)]
pub struct OverlayRoot {
    viewport: Viewport,
    labels: Vec<PopupLabel>,
    next_id: u64,
    clock: f64,
    events: EventLog,
    torn_down: bool,
}

impl OverlayRoot {
    /// Creates an empty overlay covering `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            labels: Vec::with_capacity(32),
            next_id: 1,
            clock: 0.0,
            events: EventLog::default(),
            torn_down: false,
        }
    }

    /// Overlay viewport.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Updates the viewport after a resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Seconds of overlay time since creation.
    #[must_use]
    pub const fn clock(&self) -> f64 {
        self.clock
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Instantiates a label for `request` at `anchor`.
    pub fn spawn(
        &mut self,
        request: &PopupRequest,
        anchor: OverlayPoint,
        settings: &PopupSettings,
    ) -> Result<LabelId, OverlayError> {
        if self.torn_down {
            return Err(OverlayError::TornDown);
        }

        let id = LabelId::new(self.next_id);
        self.next_id += 1;

        let label = PopupLabel::spawn(id, request, anchor, settings);
        debug!(label = id.raw(), text = label.text(), x = anchor.x, y = anchor.y, "popup spawned");
        self.events.push(OverlayEvent::Spawned {
            id,
            kind: label.kind(),
            text: label.text().to_string(),
            anchor,
            at: self.clock,
        });
        self.labels.push(label);
        Ok(id)
    }

    /// Advances every label by `dt` and removes those whose fade completed.
    ///
    /// Returns the number of labels destroyed this tick.
    pub fn update(&mut self, dt: f32) -> usize {
        if self.torn_down {
            return 0;
        }
        self.clock += f64::from(dt.max(0.0));

        let clock = self.clock;
        let events = &mut self.events;
        let before = self.labels.len();
        self.labels.retain_mut(|label| {
            if label.advance(dt) {
                debug!(label = label.id().raw(), "popup finished");
                events.push(OverlayEvent::Destroyed {
                    id: label.id(),
                    lifetime: label.elapsed(),
                    at: clock,
                    reason: DestroyReason::Completed,
                });
            }
            !label.is_destroyed()
        });
        before - self.labels.len()
    }

    /// Destroys every in-flight label and disables the overlay.
    ///
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let count = self.labels.len();
        for mut label in self.labels.drain(..) {
            if label.destroy() {
                self.events.push(OverlayEvent::Destroyed {
                    id: label.id(),
                    lifetime: label.elapsed(),
                    at: self.clock,
                    reason: DestroyReason::Teardown,
                });
            }
        }
        self.torn_down = true;
        info!("Overlay torn down, {count} popup(s) destroyed in flight");
    }

    /// Live label by id. `None` once it has been destroyed.
    #[must_use]
    pub fn label(&self, id: LabelId) -> Option<&PopupLabel> {
        self.labels.iter().find(|label| label.id() == id)
    }

    /// Live labels in spawn order.
    pub fn labels(&self) -> impl Iterator<Item = &PopupLabel> {
        self.labels.iter()
    }

    /// Number of live labels.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.labels.len()
    }

    /// Text and render data for every live label.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, LabelInstance)> {
        self.labels
            .iter()
            .map(|label| (label.text().to_string(), label.instance()))
            .collect()
    }

    /// Topmost label under `point` that accepts pointer input.
    ///
    /// Popup labels are click-through, so this only finds labels whose
    /// `intercepts_pointer` is set.
    #[must_use]
    pub fn pick(&self, point: OverlayPoint) -> Option<LabelId> {
        self.labels
            .iter()
            .rev()
            .filter(|label| label.intercepts_pointer())
            .find(|label| label_bounds(label).contains(point))
            .map(PopupLabel::id)
    }

    /// Takes the lifecycle events recorded since the last call.
    ///
    /// At most [`MAX_RETAINED_EVENTS`] are kept; hosts that never drain only
    /// lose the oldest ones.
    pub fn drain_events(&mut self) -> Vec<OverlayEvent> {
        self.events.drain()
    }

    /// Events pushed out of the log because it was full.
    #[must_use]
    pub const fn discarded_events(&self) -> u64 {
        self.events.discarded
    }
}

/// Approximate on-screen box of a label, centered on its position.
fn label_bounds(label: &PopupLabel) -> ScreenRect {
    let height = label.style().font_size * label.scale();
    let width = height * 0.6 * label.text().chars().count() as f32;
    let center = label.position();
    ScreenRect::new(center.x - width * 0.5, center.y - height * 0.5, width, height)
}
