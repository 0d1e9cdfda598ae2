//! Popup tuning parameters.
//!
//! Every timing, scale and styling constant of the popup pipeline lives in
//! [`PopupSettings`]. It deserializes from the `[popups]` table of the engine
//! config and fills missing keys with defaults.

use ember_common::{PopupError, PopupResult};
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::label::PopupKind;

/// Default pause between two queued popups, in seconds.
pub const DEFAULT_DELAY_BETWEEN_NUMBERS: f32 = 0.1;

/// Default total lifetime of a label, in seconds.
pub const DEFAULT_DISPLAY_DURATION: f32 = 1.5;

/// Default fade-out length, in seconds.
pub const DEFAULT_FADE_OUT_DURATION: f32 = 0.3;

/// Visual style for one popup kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindStyle {
    /// RGBA colour
    pub color: [f32; 4],
    /// Font size in overlay units
    pub font_size: f32,
    /// Render in bold
    pub bold: bool,
    /// Text placed before the amount
    pub prefix: String,
    /// Text placed after the amount
    pub suffix: String,
}

impl Default for KindStyle {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            font_size: 36.0,
            bold: false,
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

impl KindStyle {
    /// Formats an amount with this style's decorations.
    #[must_use]
    pub fn format(&self, amount: u32) -> String {
        format!("{}{amount}{}", self.prefix, self.suffix)
    }
}

/// Label template: the per-kind styles a spawned label is instantiated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelTemplate {
    /// Plain damage
    pub damage: KindStyle,
    /// Critical damage
    pub critical: KindStyle,
    /// Healing
    pub heal: KindStyle,
}

impl Default for LabelTemplate {
    fn default() -> Self {
        Self {
            damage: KindStyle {
                color: [1.0, 0.2, 0.2, 1.0], // Red
                ..KindStyle::default()
            },
            critical: KindStyle {
                color: [1.0, 0.5, 0.0, 1.0], // Orange
                font_size: 48.0,
                bold: true,
                suffix: "!".to_string(),
                ..KindStyle::default()
            },
            heal: KindStyle {
                color: [0.2, 1.0, 0.2, 1.0], // Green
                prefix: "+".to_string(),
                ..KindStyle::default()
            },
        }
    }
}

impl LabelTemplate {
    /// Style used for a popup kind.
    #[must_use]
    pub fn style(&self, kind: PopupKind) -> &KindStyle {
        match kind {
            PopupKind::Damage => &self.damage,
            PopupKind::Critical => &self.critical,
            PopupKind::Heal => &self.heal,
        }
    }
}

/// Popup pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSettings {
    /// Pause between processing two queued popups (seconds)
    pub delay_between_numbers: f32,
    /// Total lifetime of a label (seconds)
    pub display_duration: f32,
    /// Length of the closing fade (seconds)
    pub fade_out_duration: f32,
    /// Length of the pop-in scale-up (seconds)
    pub pop_in_duration: f32,
    /// Curve of the pop-in scale-up
    pub pop_in_easing: Easing,
    /// Length of the settle scale-down that follows pop-in (seconds)
    pub settle_duration: f32,
    /// Scale at spawn
    pub initial_scale: f32,
    /// Peak scale at the end of pop-in
    pub pop_scale: f32,
    /// Resting scale after settle
    pub final_scale: f32,
    /// Upward drift over the label's lifetime (overlay units)
    pub move_distance: f32,
    /// Maximum random horizontal offset either side of the anchor (overlay units)
    pub jitter_x: f32,
    /// Per-kind label styles
    pub template: LabelTemplate,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            delay_between_numbers: DEFAULT_DELAY_BETWEEN_NUMBERS,
            display_duration: DEFAULT_DISPLAY_DURATION,
            fade_out_duration: DEFAULT_FADE_OUT_DURATION,
            pop_in_duration: 0.2,
            pop_in_easing: Easing::EaseOut,
            settle_duration: 0.1,
            initial_scale: 0.5,
            pop_scale: 1.5,
            final_scale: 1.0,
            move_distance: 100.0,
            jitter_x: 20.0,
            template: LabelTemplate::default(),
        }
    }
}

impl PopupSettings {
    /// Rejects non-finite values, then clamps the rest to a consistent range.
    ///
    /// After validation the fade fits inside the display duration and so do
    /// pop-in plus settle.
    pub fn validate(&mut self) -> PopupResult<()> {
        let fields = [
            ("delay_between_numbers", self.delay_between_numbers),
            ("display_duration", self.display_duration),
            ("fade_out_duration", self.fade_out_duration),
            ("pop_in_duration", self.pop_in_duration),
            ("settle_duration", self.settle_duration),
            ("initial_scale", self.initial_scale),
            ("pop_scale", self.pop_scale),
            ("final_scale", self.final_scale),
            ("move_distance", self.move_distance),
            ("jitter_x", self.jitter_x),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(PopupError::InvalidSetting {
                    field,
                    reason: format!("{value} is not a finite number"),
                });
            }
        }

        self.delay_between_numbers = self.delay_between_numbers.max(0.0);
        self.display_duration = self.display_duration.max(0.01);
        self.fade_out_duration = self.fade_out_duration.clamp(0.0, self.display_duration);
        self.pop_in_duration = self.pop_in_duration.clamp(0.0, self.display_duration);
        self.settle_duration = self
            .settle_duration
            .clamp(0.0, self.display_duration - self.pop_in_duration);
        self.initial_scale = self.initial_scale.max(0.0);
        self.pop_scale = self.pop_scale.max(0.0);
        self.final_scale = self.final_scale.max(0.0);
        self.move_distance = self.move_distance.max(0.0);
        self.jitter_x = self.jitter_x.abs();
        Ok(())
    }

    /// Time after spawn at which the fade begins.
    #[must_use]
    pub fn fade_start(&self) -> f32 {
        (self.display_duration - self.fade_out_duration).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_text() {
        let template = LabelTemplate::default();
        assert_eq!(template.style(PopupKind::Damage).format(10), "10");
        assert_eq!(template.style(PopupKind::Critical).format(15), "15!");
        assert_eq!(template.style(PopupKind::Heal).format(7), "+7");
    }

    #[test]
    fn test_critical_is_larger_and_bold() {
        let template = LabelTemplate::default();
        assert!(template.critical.font_size > template.damage.font_size);
        assert!(template.critical.bold);
        assert!(!template.damage.bold);
    }

    #[test]
    fn test_fade_start() {
        let settings = PopupSettings::default();
        assert!((settings.fade_start() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_validate_clamps_fade_to_display() {
        let mut settings = PopupSettings {
            display_duration: 1.0,
            fade_out_duration: 3.0,
            move_distance: -40.0,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
        assert!((settings.fade_out_duration - 1.0).abs() < f32::EPSILON);
        assert!(settings.fade_start().abs() < f32::EPSILON);
        // Labels only ever drift upward.
        assert!(settings.move_distance.abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut settings = PopupSettings {
            jitter_x: f32::NAN,
            ..Default::default()
        };
        let err = settings.validate();
        assert!(matches!(
            err,
            Err(PopupError::InvalidSetting {
                field: "jitter_x",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: PopupSettings =
            serde_json::from_str(r#"{"display_duration": 2.0}"#).expect("valid settings");
        assert!((settings.display_duration - 2.0).abs() < f32::EPSILON);
        assert!((settings.delay_between_numbers - DEFAULT_DELAY_BETWEEN_NUMBERS).abs() < f32::EPSILON);
        assert_eq!(settings.pop_in_easing, Easing::EaseOut);
    }

    #[test]
    fn test_pop_in_easing_from_config() {
        let settings: PopupSettings =
            serde_json::from_str(r#"{"pop_in_easing": "EaseOutBack"}"#).expect("valid settings");
        assert_eq!(settings.pop_in_easing, Easing::EaseOutBack);
    }
}
