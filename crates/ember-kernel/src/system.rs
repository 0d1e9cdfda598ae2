//! Popup system facade: startup, registration and the per-frame update.
//!
//! [`PopupSystem::startup`] wires the scheduler to an overlay root and
//! registers a [`PopupHandle`] with the game-state owner. If either is
//! missing the system logs the problem once and stays inert: every call
//! remains safe and simply does nothing.

use ember_common::{PopupError, PopupResult, TargetLookup, TargetRef};
use tracing::{error, info, warn};

use crate::camera::Camera;
use crate::overlay::{OverlayEvent, OverlayRoot};
use crate::resolver::CoordinateResolver;
use crate::scheduler::{PopupHandle, PopupScheduler, PopupStats};
use crate::settings::PopupSettings;

/// Something the popup system registers itself with at startup.
pub trait PopupRegistrar {
    /// Stores the handle combat code uses to request popups.
    fn register_popups(&mut self, handle: PopupHandle);
}

#[derive(Debug)]
struct ActivePopups {
    scheduler: PopupScheduler,
    overlay: OverlayRoot,
}

/// Popup pipeline: scheduler plus overlay, or nothing when inert.
#[derive(Debug, Default)]
pub struct PopupSystem {
    active: Option<ActivePopups>,
}

impl PopupSystem {
    /// Starts the popup system, logging and going inert on failure.
    pub fn startup(
        settings: PopupSettings,
        overlay: Option<OverlayRoot>,
        owner: Option<&mut dyn PopupRegistrar>,
    ) -> Self {
        Self::try_startup(settings, overlay, owner, None).unwrap_or_else(|e| {
            error!("Popup system disabled: {e}");
            Self::inert()
        })
    }

    /// Starts the popup system, returning why it could not start.
    ///
    /// `seed` fixes the jitter RNG; `None` seeds it from entropy.
    pub fn try_startup(
        mut settings: PopupSettings,
        overlay: Option<OverlayRoot>,
        owner: Option<&mut dyn PopupRegistrar>,
        seed: Option<u64>,
    ) -> PopupResult<Self> {
        if let Err(e) = settings.validate() {
            warn!("{e}; using default popup settings");
            settings = PopupSettings::default();
        }

        let overlay = overlay.ok_or(PopupError::MissingOverlayRoot)?;
        let owner = owner.ok_or(PopupError::MissingOwner)?;

        let resolver = match seed {
            Some(seed) => CoordinateResolver::with_seed(settings.jitter_x, seed),
            None => CoordinateResolver::new(settings.jitter_x),
        };
        let scheduler = PopupScheduler::with_resolver(settings, resolver);
        owner.register_popups(scheduler.handle());
        info!("Popup system registered with game state");

        Ok(Self {
            active: Some(ActivePopups { scheduler, overlay }),
        })
    }

    /// A system that accepts calls and never shows anything.
    #[must_use]
    pub const fn inert() -> Self {
        Self { active: None }
    }

    /// Whether popups can be shown.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Additional handle for another event source.
    #[must_use]
    pub fn handle(&self) -> Option<PopupHandle> {
        self.active.as_ref().map(|a| a.scheduler.handle())
    }

    /// Queues a damage popup. Returns `false` if nothing was queued.
    pub fn enqueue_damage(&mut self, amount: i32, target: impl Into<TargetRef>, critical: bool) -> bool {
        self.active
            .as_mut()
            .is_some_and(|a| a.scheduler.enqueue_damage(amount, target, critical))
    }

    /// Queues a heal popup. Returns `false` if nothing was queued.
    pub fn enqueue_heal(&mut self, amount: i32, target: impl Into<TargetRef>) -> bool {
        self.active
            .as_mut()
            .is_some_and(|a| a.scheduler.enqueue_heal(amount, target))
    }

    /// Runs one frame: pulls handle commands, animates live labels, then
    /// lets the drainer process at most one queued popup.
    pub fn update(&mut self, dt: f32, targets: &dyn TargetLookup, camera: &Camera) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.scheduler.pump_commands();
        let destroyed = active.overlay.update(dt);
        active.scheduler.record_destroyed(destroyed);
        active
            .scheduler
            .step(dt, &mut active.overlay, targets, camera);
    }

    /// Tears the overlay down, destroying in-flight labels and discarding
    /// anything still queued. The system is inert afterwards.
    pub fn shutdown(&mut self) -> Vec<OverlayEvent> {
        let Some(mut active) = self.active.take() else {
            return Vec::new();
        };
        let discarded = active.scheduler.clear();
        active.overlay.teardown();
        info!("Popup system shut down ({discarded} queued popup(s) discarded)");
        active.overlay.drain_events()
    }

    /// Overlay, if active.
    #[must_use]
    pub fn overlay(&self) -> Option<&OverlayRoot> {
        self.active.as_ref().map(|a| &a.overlay)
    }

    /// Mutable overlay, if active.
    pub fn overlay_mut(&mut self) -> Option<&mut OverlayRoot> {
        self.active.as_mut().map(|a| &mut a.overlay)
    }

    /// Scheduler, if active.
    #[must_use]
    pub fn scheduler(&self) -> Option<&PopupScheduler> {
        self.active.as_ref().map(|a| &a.scheduler)
    }

    /// Scheduler counters. Zeroed when inert.
    #[must_use]
    pub fn stats(&self) -> PopupStats {
        self.scheduler().map(|s| *s.stats()).unwrap_or_default()
    }

    /// Takes overlay lifecycle events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<OverlayEvent> {
        self.overlay_mut().map(OverlayRoot::drain_events).unwrap_or_default()
    }
}
