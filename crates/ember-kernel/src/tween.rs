//! Timed property tracks.
//!
//! A label animates through a handful of independent [`TweenTrack`]s. Each
//! track moves one numeric property from a start value to an end value over
//! a duration, optionally after a start delay. Tracks are sampled once per
//! tick with the label's elapsed time; they keep no clock of their own.

use crate::easing::Easing;

/// Animated label property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenProperty {
    /// Uniform scale factor
    Scale,
    /// Vertical offset from the anchor (negative is up)
    OffsetY,
    /// Opacity
    Alpha,
}

/// A single timed interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenTrack {
    /// Property driven by this track
    pub property: TweenProperty,
    /// Value at the start of the track
    pub from: f32,
    /// Value at the end of the track
    pub to: f32,
    /// Track length in seconds
    pub duration: f32,
    /// Seconds after spawn before the track starts
    pub delay: f32,
    /// Easing curve
    pub easing: Easing,
}

impl TweenTrack {
    /// Creates a track that starts at spawn.
    #[must_use]
    pub fn new(property: TweenProperty, from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            property,
            from,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            easing,
        }
    }

    /// Delays the start of the track.
    #[must_use]
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Time after spawn at which the track completes.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }

    /// Whether the track has started at `elapsed`.
    #[must_use]
    pub fn has_started(&self, elapsed: f32) -> bool {
        elapsed >= self.delay
    }

    /// Whether the track has completed at `elapsed`.
    #[must_use]
    pub fn is_finished(&self, elapsed: f32) -> bool {
        elapsed >= self.end_time()
    }

    /// Normalized progress in `[0, 1]` at `elapsed`.
    #[must_use]
    pub fn progress(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            return if self.has_started(elapsed) { 1.0 } else { 0.0 };
        }
        ((elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    /// Property value at `elapsed`.
    #[must_use]
    pub fn sample(&self, elapsed: f32) -> f32 {
        let t = self.easing.apply(self.progress(elapsed));
        self.from + (self.to - self.from) * t
    }
}

/// Samples `property` across a set of tracks.
///
/// The latest-starting track that has begun wins; before any track for the
/// property has begun, the earliest one's start value holds. Returns
/// `fallback` when no track drives the property.
#[must_use]
pub fn sample_property(tracks: &[TweenTrack], property: TweenProperty, elapsed: f32, fallback: f32) -> f32 {
    let mut first: Option<&TweenTrack> = None;
    let mut active: Option<&TweenTrack> = None;

    for track in tracks.iter().filter(|t| t.property == property) {
        if first.map_or(true, |f| track.delay < f.delay) {
            first = Some(track);
        }
        if track.has_started(elapsed) && active.map_or(true, |a| track.delay >= a.delay) {
            active = Some(track);
        }
    }

    match (active, first) {
        (Some(track), _) => track.sample(elapsed),
        (None, Some(track)) => track.from,
        (None, None) => fallback,
    }
}
