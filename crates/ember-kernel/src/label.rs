//! Popup requests and the animated labels they turn into.
//!
//! A [`PopupRequest`] is what the combat side hands over: an amount, a kind
//! and a target. When the scheduler dequeues it, the request becomes a
//! [`PopupLabel`], which owns four tween tracks:
//!
//! | Stage    | Property | Start                  | Length              |
//! |----------|----------|------------------------|---------------------|
//! | Pop-in   | scale    | 0                      | `pop_in_duration`   |
//! | Settle   | scale    | end of pop-in          | `settle_duration`   |
//! | Drift    | offset Y | 0                      | `display_duration`  |
//! | Fade-out | alpha    | `display - fade_out`   | `fade_out_duration` |
//!
//! The fade is the terminal track. Once it completes the label is destroyed
//! and every later call to [`PopupLabel::advance`] is a no-op.

use std::num::NonZeroU32;

use bytemuck::{Pod, Zeroable};
use ember_common::{LabelId, OverlayPoint, TargetRef};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::settings::{KindStyle, PopupSettings};
use crate::tween::{sample_property, TweenProperty, TweenTrack};

/// What a popup announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PopupKind {
    /// Regular damage.
    Damage,
    /// Critical damage.
    Critical,
    /// Healing.
    Heal,
}

impl PopupKind {
    /// Damage kind for a hit.
    #[must_use]
    pub const fn damage(critical: bool) -> Self {
        if critical {
            Self::Critical
        } else {
            Self::Damage
        }
    }
}

/// A queued popup. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupRequest {
    amount: NonZeroU32,
    kind: PopupKind,
    target: TargetRef,
}

impl PopupRequest {
    /// Builds a request, or `None` when the amount is zero or negative.
    #[must_use]
    pub fn new(amount: i32, kind: PopupKind, target: TargetRef) -> Option<Self> {
        let amount = u32::try_from(amount).ok().and_then(NonZeroU32::new)?;
        Some(Self {
            amount,
            kind,
            target,
        })
    }

    /// Amount to display.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount.get()
    }

    /// Popup kind.
    #[must_use]
    pub const fn kind(&self) -> PopupKind {
        self.kind
    }

    /// Target the popup is anchored to.
    #[must_use]
    pub const fn target(&self) -> TargetRef {
        self.target
    }
}

/// Stage a label is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStage {
    /// Scaling up from the initial scale.
    PopIn,
    /// Scaling back down to rest.
    Settle,
    /// At rest, drifting.
    Drift,
    /// Fading out.
    FadeOut,
    /// Gone.
    Destroyed,
}

/// GPU-friendly label instance for rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LabelInstance {
    /// Position in overlay space (x, y).
    pub position: [f32; 2],
    /// Current scale.
    pub scale: f32,
    /// Current opacity.
    pub alpha: f32,
    /// Color with alpha applied.
    pub color: [f32; 4],
    /// Font size before scaling.
    pub font_size: f32,
    /// 1 for bold, 0 otherwise.
    pub bold: u32,
    /// Number of glyphs in the text.
    pub glyph_count: u32,
}

impl LabelInstance {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// One animated popup label on the overlay.
#[derive(Debug, Clone)]
pub struct PopupLabel {
    id: LabelId,
    kind: PopupKind,
    text: String,
    style: KindStyle,
    anchor: OverlayPoint,
    tracks: Vec<TweenTrack>,
    terminal: usize,
    elapsed: f32,
    destroyed: bool,
    scale: f32,
    offset_y: f32,
    alpha: f32,
}

impl PopupLabel {
    /// Instantiates a label for `request` at `anchor`.
    #[must_use]
    pub fn spawn(id: LabelId, request: &PopupRequest, anchor: OverlayPoint, settings: &PopupSettings) -> Self {
        let style = settings.template.style(request.kind()).clone();
        let text = style.format(request.amount());

        let tracks = vec![
            TweenTrack::new(
                TweenProperty::Scale,
                settings.initial_scale,
                settings.pop_scale,
                settings.pop_in_duration,
                settings.pop_in_easing,
            ),
            TweenTrack::new(
                TweenProperty::Scale,
                settings.pop_scale,
                settings.final_scale,
                settings.settle_duration,
                Easing::EaseIn,
            )
            .with_delay(settings.pop_in_duration),
            TweenTrack::new(
                TweenProperty::OffsetY,
                0.0,
                -settings.move_distance,
                settings.display_duration,
                Easing::EaseOut,
            ),
            TweenTrack::new(
                TweenProperty::Alpha,
                1.0,
                0.0,
                settings.fade_out_duration,
                Easing::Linear,
            )
            .with_delay(settings.fade_start()),
        ];

        let mut label = Self {
            id,
            kind: request.kind(),
            text,
            style,
            anchor,
            tracks,
            terminal: 3,
            elapsed: 0.0,
            destroyed: false,
            scale: settings.initial_scale,
            offset_y: 0.0,
            alpha: 1.0,
        };
        label.sample();
        label
    }

    /// Advances the animation by `dt` seconds.
    ///
    /// Returns `true` on the tick the terminal fade completes and the label
    /// is destroyed. Calls on an already destroyed label do nothing and
    /// return `false`.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.destroyed {
            return false;
        }

        self.elapsed += dt.max(0.0);
        self.sample();

        if self.tracks[self.terminal].is_finished(self.elapsed) {
            self.destroyed = true;
            return true;
        }
        false
    }

    /// Marks the label destroyed without finishing its animation.
    ///
    /// Used by overlay teardown. Returns `false` if it was already destroyed.
    pub fn destroy(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }

    fn sample(&mut self) {
        self.scale = sample_property(&self.tracks, TweenProperty::Scale, self.elapsed, 1.0);
        self.offset_y = sample_property(&self.tracks, TweenProperty::OffsetY, self.elapsed, 0.0);
        self.alpha = sample_property(&self.tracks, TweenProperty::Alpha, self.elapsed, 1.0);
    }

    /// Overlay-unique id.
    #[must_use]
    pub const fn id(&self) -> LabelId {
        self.id
    }

    /// Popup kind the label was created for.
    #[must_use]
    pub const fn kind(&self) -> PopupKind {
        self.kind
    }

    /// Displayed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Style the label was instantiated with.
    #[must_use]
    pub const fn style(&self) -> &KindStyle {
        &self.style
    }

    /// Spawn position in overlay space.
    #[must_use]
    pub const fn anchor(&self) -> OverlayPoint {
        self.anchor
    }

    /// Current position (anchor plus drift).
    #[must_use]
    pub fn position(&self) -> OverlayPoint {
        self.anchor + Vec2::new(0.0, self.offset_y)
    }

    /// Current scale.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Current opacity.
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Seconds since spawn.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether the label has been destroyed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Labels are informational only and never take pointer input.
    #[must_use]
    pub const fn intercepts_pointer(&self) -> bool {
        false
    }

    /// Current animation stage.
    #[must_use]
    pub fn stage(&self) -> LabelStage {
        if self.destroyed {
            return LabelStage::Destroyed;
        }
        let [pop_in, settle, _drift, fade] = [0, 1, 2, 3].map(|i| &self.tracks[i]);
        if fade.has_started(self.elapsed) {
            LabelStage::FadeOut
        } else if !pop_in.is_finished(self.elapsed) {
            LabelStage::PopIn
        } else if !settle.is_finished(self.elapsed) {
            LabelStage::Settle
        } else {
            LabelStage::Drift
        }
    }

    /// Render data for the current frame.
    #[must_use]
    pub fn instance(&self) -> LabelInstance {
        let mut color = self.style.color;
        color[3] *= self.alpha;
        let position = self.position();
        LabelInstance {
            position: [position.x, position.y],
            scale: self.scale,
            alpha: self.alpha,
            color,
            font_size: self.style.font_size,
            bold: u32::from(self.style.bold),
            glyph_count: self.text.chars().count() as u32,
        }
    }
}
