//! Paired bounded/text representation of one continuous parameter.
//!
//! A [`ScaledControl`] models a slider and the text field next to it as
//! a single owned unit. The slider side is an integer position confined
//! to `[min, max]`; the text side is the free-form field content. The
//! continuous value is `position / scale`.
//!
//! The two sides are deliberately asymmetric:
//!
//! - Writing the bounded side always re-renders the text.
//! - Writing the text side accepts any plain decimal string, even one
//!   outside the control range. The derived position is clamped, but the
//!   text keeps what was typed unless the position actually moved.
//! - Text that is not a plain decimal number is ignored entirely.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// Plain decimal number: digits with an optional fraction, or a bare
/// fraction. No sign, no exponent, no surrounding whitespace.
#[allow(clippy::expect_used)] // literal pattern, checked by tests
static DECIMAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)$").expect("decimal pattern must compile")
});

/// Maximum number of fractional digits shown in the text side.
pub const DISPLAY_DECIMALS: usize = 4;

/// Range and quantization of a bounded control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSpec {
    min: i32,
    max: i32,
    scale: i32,
}

impl ControlSpec {
    /// Create a spec for positions in `[min, max]` with `value = position / scale`.
    ///
    /// `min` must not exceed `max` and `scale` must be positive.
    #[must_use]
    pub const fn new(min: i32, max: i32, scale: i32) -> Self {
        debug_assert!(min <= max, "control range must not be empty");
        debug_assert!(scale > 0, "control scale must be positive");
        Self { min, max, scale }
    }

    /// Lowest bounded position.
    #[must_use]
    pub const fn min(self) -> i32 {
        self.min
    }

    /// Highest bounded position.
    #[must_use]
    pub const fn max(self) -> i32 {
        self.max
    }

    /// Positions per unit of value.
    #[must_use]
    pub const fn scale(self) -> i32 {
        self.scale
    }

    /// Lowest value reachable through the bounded side.
    #[must_use]
    pub fn min_value(self) -> f64 {
        self.value_at(self.min)
    }

    /// Highest value reachable through the bounded side.
    #[must_use]
    pub fn max_value(self) -> f64 {
        self.value_at(self.max)
    }

    /// Clamp a position into `[min, max]`.
    #[must_use]
    pub const fn clamp(self, position: i32) -> i32 {
        if position < self.min {
            self.min
        } else if position > self.max {
            self.max
        } else {
            position
        }
    }

    /// Continuous value at `position`.
    #[must_use]
    pub fn value_at(self, position: i32) -> f64 {
        f64::from(position) / f64::from(self.scale)
    }

    /// Nearest clamped position for a continuous value.
    ///
    /// `NaN` maps to `min`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // clamped to the i32 range first
    pub fn position_for(self, value: f64) -> i32 {
        let raw = (value * f64::from(self.scale)).round();
        if raw.is_nan() {
            return self.min;
        }
        raw.clamp(f64::from(self.min), f64::from(self.max)) as i32
    }
}

/// Render a value with up to [`DISPLAY_DECIMALS`] fractional digits,
/// dropping trailing zeros and a dangling decimal point.
#[must_use]
pub fn format_value(value: f64) -> String {
    let mut text = format!("{value:.prec$}", prec = DISPLAY_DECIMALS);
    if text.contains('.') {
        let kept = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(kept);
    }
    if text == "-0" {
        text.replace_range(.., "0");
    }
    text
}

/// Whether `raw` is accepted by the text side of a control.
#[must_use]
pub fn is_plain_decimal(raw: &str) -> bool {
    DECIMAL_PATTERN.is_match(raw)
}

/// A slider and its text field kept in sync under a fixed scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaledControl {
    spec: ControlSpec,
    position: i32,
    text: String,
}

impl ScaledControl {
    /// Create a control showing `value`.
    ///
    /// The bounded side takes the nearest clamped position; the text side
    /// shows `value` itself, so an off-grid or out-of-range value is
    /// displayed as given.
    #[must_use]
    pub fn new(spec: ControlSpec, value: f64) -> Self {
        Self {
            spec,
            position: spec.position_for(value),
            text: format_value(value),
        }
    }

    /// Range and quantization of the bounded side.
    #[must_use]
    pub const fn spec(&self) -> ControlSpec {
        self.spec
    }

    /// Current bounded position.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Current text field content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Continuous value of the bounded side, `position / scale`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.spec.value_at(self.position)
    }

    /// Move the bounded side and re-render the text.
    ///
    /// The position is clamped into range. Returns `true` if the
    /// position changed. The text is re-rendered either way.
    pub fn set_from_bounded(&mut self, position: i32) -> bool {
        let position = self.spec.clamp(position);
        let moved = position != self.position;
        self.position = position;
        self.text = format_value(self.value());
        trace!(position, text = %self.text, moved, "bounded side synced");
        moved
    }

    /// Apply typed text.
    ///
    /// Returns `false` and leaves the control untouched when `raw` is not
    /// a plain decimal number. Otherwise the text side takes `raw` as-is
    /// and the bounded side moves to the nearest clamped position; when
    /// that position differs from the current one, the text is re-rendered
    /// from the new position.
    pub fn set_from_text(&mut self, raw: &str) -> bool {
        if !is_plain_decimal(raw) {
            trace!(raw, "ignored malformed text");
            return false;
        }
        // The pattern only admits digits and one point, which always parse.
        let Ok(parsed) = raw.parse::<f64>() else {
            return false;
        };
        raw.clone_into(&mut self.text);
        let position = self.spec.position_for(parsed);
        if position != self.position {
            self.set_from_bounded(position);
        }
        true
    }

    /// Overwrite both sides from a continuous value without any notion of
    /// user input. Used by settings resets.
    pub fn reset(&mut self, value: f64) {
        *self = Self::new(self.spec, value);
    }
}
