//! Feedback choreography as plain math.
//!
//! The host UI owns the animation runtime; it samples these functions with
//! its own animated values (scroll offset, drag translation, shake progress)
//! and applies the results to its views.

use std::time::Duration;

/// Dragging the question card further left than this asks to skip it.
pub const SKIP_DRAG_THRESHOLD: f32 = -200.0;

/// Hold time before a pan on the question card starts dragging it.
pub const DRAG_ACTIVATION: Duration = Duration::from_millis(200);

/// Length of the bounce that plays after a wrong answer.
pub const SHAKE_DURATION: Duration = Duration::from_millis(700);

/// Progress value the shake runs up to before settling back to zero.
pub const SHAKE_PEAK: f32 = 3.0;

const SHAKE_INPUT: [f32; 7] = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0];
const SHAKE_OUTPUT: [f32; 7] = [0.0, -15.0, 0.0, 15.0, 0.0, -15.0, 0.0];

const REVEAL_RANGE: [f32; 2] = [30.0, 90.0];
const HEADER_FADE_RANGE: [f32; 2] = [40.0, 90.0];

/// Behaviour outside the first and last input points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Continue the slope of the nearest segment.
    #[default]
    Extend,
    /// Hold the nearest output value.
    Clamp,
}

/// Piecewise-linear map of `value` through matching `input`/`output` points.
///
/// `input` must be ascending and the same length as `output`. Fewer than two
/// points, or mismatched lengths, yield the first output (or `0.0`).
#[must_use]
pub fn interpolate(value: f32, input: &[f32], output: &[f32], extrapolation: Extrapolation) -> f32 {
    if input.len() < 2 || input.len() != output.len() {
        return output.first().copied().unwrap_or(0.0);
    }
    let last = input.len() - 1;

    if extrapolation == Extrapolation::Clamp {
        if value <= input[0] {
            return output[0];
        }
        if value >= input[last] {
            return output[last];
        }
    }

    let segment = input
        .windows(2)
        .position(|w| value <= w[1])
        .unwrap_or(last - 1);
    let (x0, x1) = (input[segment], input[segment + 1]);
    let (y0, y1) = (output[segment], output[segment + 1]);
    if (x1 - x0).abs() < f32::EPSILON {
        return y0;
    }
    y0 + (value - x0) * (y1 - y0) / (x1 - x0)
}

/// Horizontal card offset for a shake progress in `0.0..=SHAKE_PEAK`.
#[must_use]
pub fn shake_offset(progress: f32) -> f32 {
    interpolate(progress, &SHAKE_INPUT, &SHAKE_OUTPUT, Extrapolation::Extend)
}

/// Scroll-linked styling of the pinned progress bar and the inline header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBarReveal {
    pub bar_opacity: f32,
    pub bar_translate_y: f32,
    pub header_opacity: f32,
}

impl ProgressBarReveal {
    #[must_use]
    pub fn at(scroll_y: f32) -> Self {
        Self {
            bar_opacity: interpolate(scroll_y, &REVEAL_RANGE, &[0.0, 1.0], Extrapolation::Clamp),
            bar_translate_y: interpolate(
                scroll_y,
                &REVEAL_RANGE,
                &[-40.0, 0.0],
                Extrapolation::Clamp,
            ),
            header_opacity: interpolate(
                scroll_y,
                &HEADER_FADE_RANGE,
                &[1.0, 0.0],
                Extrapolation::Clamp,
            ),
        }
    }
}

/// Filled share of the progress bar for a 1-based `current` out of `total`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_fraction(current: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    current.min(total) as f32 / total as f32
}

/// Position of the question card while it is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardDrag {
    position: f32,
}

impl CardDrag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the finger; only leftward movement moves the card.
    pub fn update(&mut self, translation_x: f32) {
        if translation_x < 0.0 {
            self.position = translation_x;
        }
    }

    /// Finish the drag, snapping the card back. Returns `true` when the
    /// release should open the skip prompt.
    pub fn release(&mut self, translation_x: f32) -> bool {
        self.position = 0.0;
        translation_x < SKIP_DRAG_THRESHOLD
    }

    #[must_use]
    pub fn translate_x(&self) -> f32 {
        self.position
    }

    /// Tilt in degrees that accompanies the horizontal offset.
    #[must_use]
    pub fn rotate_z(&self) -> f32 {
        self.position / 10.0
    }
}
