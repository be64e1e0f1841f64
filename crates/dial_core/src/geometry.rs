//! Pointer-to-value mapping
//!
//! A pointer coordinate inside an element's bounds is projected onto the
//! control's axis as a percentage, then interpolated into a domain value and
//! quantized to the range's step. Everything here is pure.
//!
//! # Example
//!
//! ```rust
//! use dial_core::events::{Orientation, Point};
//! use dial_core::geometry::{DomainRange, PointerGeometryMapper, Rect};
//!
//! let range = DomainRange::new(0.0, 100.0, 5.0);
//! let mapper = PointerGeometryMapper::new(Orientation::Horizontal, false);
//! let track = Rect::new(0.0, 0.0, 200.0, 20.0);
//!
//! assert_eq!(mapper.value_at(Point::new(160.0, 10.0), track, &range), Some(80.0));
//! ```

use crate::error::{Error, Result};
use crate::events::{Orientation, Point};

/// Slack used when comparing step counts computed in floating point
const STEP_EPSILON: f64 = 1e-9;

/// Bounding rectangle of a host element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Numeric domain `{min, max, step}` with `min <= max` and `step > 0`
///
/// Deserialized ranges are repaired the same way as [`DomainRange::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawRange")
)]
pub struct DomainRange {
    min: f64,
    max: f64,
    step: f64,
}

impl Default for DomainRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
        }
    }
}

/// Unchecked wire form of [`DomainRange`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRange {
    min: f64,
    max: f64,
    step: f64,
}

#[cfg(feature = "serde")]
impl From<RawRange> for DomainRange {
    fn from(raw: RawRange) -> Self {
        DomainRange::new(raw.min, raw.max, raw.step)
    }
}

impl DomainRange {
    /// Validate and create a range
    pub fn try_new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !min.is_finite() {
            return Err(Error::NonFiniteBound(min));
        }
        if !max.is_finite() {
            return Err(Error::NonFiniteBound(max));
        }
        if min > max {
            return Err(Error::InvertedRange { min, max });
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidStep(step));
        }
        Ok(Self { min, max, step })
    }

    /// Create a range, repairing invalid input instead of failing
    ///
    /// Swapped bounds are re-ordered, non-finite bounds fall back to the
    /// default range and an invalid step falls back to 1.
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        match Self::try_new(min, max, step) {
            Ok(range) => range,
            Err(err) => {
                tracing::warn!("repairing slider range: {}", err);
                let (mut min, mut max) = if min.is_finite() && max.is_finite() {
                    (min.min(max), min.max(max))
                } else {
                    (0.0, 100.0)
                };
                if min > max {
                    std::mem::swap(&mut min, &mut max);
                }
                let step = if step.is_finite() && step > 0.0 {
                    step
                } else {
                    1.0
                };
                Self { min, max, step }
            }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Large keyboard increment: a tenth of the span, never less than a step
    pub fn page_step(&self) -> f64 {
        (self.span() / 10.0).max(self.step)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.min(self.max).max(self.min)
    }

    /// Quantize to the nearest multiple of `step` from `min` (round half up)
    ///
    /// The step count is clamped to the largest multiple that still fits in
    /// the range, so a step that does not divide `max - min` never yields an
    /// off-grid `max`.
    pub fn snap(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        let max_steps = (self.span() / self.step + STEP_EPSILON).floor().max(0.0);
        let steps = ((value - self.min) / self.step + 0.5)
            .floor()
            .clamp(0.0, max_steps);
        let snapped = round_to_places(
            self.min + steps * self.step,
            decimal_places(self.step).max(decimal_places(self.min)),
        );
        self.clamp(snapped)
    }

    /// Whether `value` lies on the step grid (within floating-point tolerance)
    pub fn is_on_grid(&self, value: f64) -> bool {
        let steps = (value - self.min) / self.step;
        (steps - steps.round()).abs() < 1e-6
    }

    /// Position of `value` along the range in `[0, 100]`
    pub fn percent_for_value(&self, value: f64) -> f64 {
        if self.span() <= 0.0 {
            return 0.0;
        }
        ((self.clamp(value) - self.min) / self.span() * 100.0).clamp(0.0, 100.0)
    }

    /// Raw (unsnapped) value at `percent` along the range
    pub fn value_for_percent(&self, percent: f64) -> f64 {
        self.min + (percent.clamp(0.0, 100.0) / 100.0) * self.span()
    }
}

/// Number of decimals in `step`, capped to avoid runaway precision
fn decimal_places(step: f64) -> i32 {
    let text = format!("{}", step);
    match text.split_once('.') {
        Some((_, fraction)) => fraction.len().min(12) as i32,
        None => 0,
    }
}

fn round_to_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Maps pointer coordinates to percentages and domain values
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerGeometryMapper {
    pub orientation: Orientation,
    /// Flip the axis (max at the start instead of the end)
    pub inverted: bool,
}

impl PointerGeometryMapper {
    pub fn new(orientation: Orientation, inverted: bool) -> Self {
        Self {
            orientation,
            inverted,
        }
    }

    /// Percentage in `[0, 100]` of `point` along the axis of `rect`
    ///
    /// Horizontal runs left to right, vertical runs bottom to top. Returns
    /// `None` for a degenerate rectangle.
    pub fn percent_at(&self, point: Point, rect: Rect) -> Option<f64> {
        let percent = match self.orientation {
            Orientation::Horizontal => {
                if rect.width <= 0.0 {
                    return None;
                }
                f64::from(point.x - rect.x) / f64::from(rect.width) * 100.0
            }
            Orientation::Vertical => {
                if rect.height <= 0.0 {
                    return None;
                }
                f64::from(rect.bottom() - point.y) / f64::from(rect.height) * 100.0
            }
        };
        if !percent.is_finite() {
            return None;
        }
        let percent = if self.inverted {
            100.0 - percent
        } else {
            percent
        };
        Some(percent.clamp(0.0, 100.0))
    }

    /// Quantized, clamped domain value at `point`
    pub fn value_at(&self, point: Point, rect: Rect, range: &DomainRange) -> Option<f64> {
        let percent = self.percent_at(point, rect)?;
        Some(range.snap(range.value_for_percent(percent)))
    }

    /// Display position of `value` along the axis, honoring `inverted`
    pub fn percent_for_value(&self, value: f64, range: &DomainRange) -> f64 {
        let percent = range.percent_for_value(value);
        if self.inverted {
            100.0 - percent
        } else {
            percent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Rect {
        Rect::new(10.0, 20.0, 200.0, 8.0)
    }

    #[test]
    fn test_try_new_rejects_invalid() {
        assert_eq!(
            DomainRange::try_new(10.0, 0.0, 1.0),
            Err(Error::InvertedRange {
                min: 10.0,
                max: 0.0
            })
        );
        assert_eq!(
            DomainRange::try_new(0.0, 10.0, 0.0),
            Err(Error::InvalidStep(0.0))
        );
        assert!(matches!(
            DomainRange::try_new(f64::NAN, 10.0, 1.0),
            Err(Error::NonFiniteBound(_))
        ));
    }

    #[test]
    fn test_new_repairs_invalid() {
        let range = DomainRange::new(10.0, 0.0, -2.0);
        assert_eq!(range.min(), 0.0);
        assert_eq!(range.max(), 10.0);
        assert_eq!(range.step(), 1.0);
    }

    #[test]
    fn test_snap_round_half_up() {
        let range = DomainRange::new(0.0, 100.0, 5.0);
        assert_eq!(range.snap(82.4), 80.0);
        assert_eq!(range.snap(82.5), 85.0);
        assert_eq!(range.snap(-3.0), 0.0);
        assert_eq!(range.snap(140.0), 100.0);
    }

    #[test]
    fn test_snap_is_relative_to_min() {
        let range = DomainRange::new(3.0, 23.0, 5.0);
        assert_eq!(range.snap(9.0), 8.0);
        assert_eq!(range.snap(11.0), 13.0);
    }

    #[test]
    fn test_snap_uneven_step_stays_on_grid() {
        let range = DomainRange::new(0.0, 10.0, 3.0);
        assert_eq!(range.snap(10.0), 9.0);
        assert_eq!(range.snap(1000.0), 9.0);
        assert!(range.is_on_grid(range.snap(7.7)));
    }

    #[test]
    fn test_snap_fractional_step_has_no_float_noise() {
        let range = DomainRange::new(0.0, 1.0, 0.1);
        assert_eq!(range.snap(0.29), 0.3);
        assert_eq!(range.snap(0.71), 0.7);
    }

    #[test]
    fn test_clamp_and_grid_for_many_inputs() {
        let ranges = [
            DomainRange::new(0.0, 100.0, 5.0),
            DomainRange::new(-1.0, 1.0, 0.25),
            DomainRange::new(0.0, 10.0, 3.0),
            DomainRange::new(2.0, 2.0, 1.0),
        ];
        for range in ranges {
            let mut raw = range.min() - 50.0;
            while raw <= range.max() + 50.0 {
                let value = range.snap(raw);
                assert!(value >= range.min() && value <= range.max(), "{value} out of {range:?}");
                assert!(range.is_on_grid(value), "{value} off grid for {range:?}");
                raw += 0.37;
            }
        }
    }

    #[test]
    fn test_horizontal_mapping() {
        let range = DomainRange::new(0.0, 100.0, 5.0);
        let mapper = PointerGeometryMapper::new(Orientation::Horizontal, false);

        assert_eq!(mapper.percent_at(Point::new(10.0, 0.0), track()), Some(0.0));
        assert_eq!(mapper.percent_at(Point::new(110.0, 0.0), track()), Some(50.0));
        assert_eq!(mapper.value_at(Point::new(170.0, 0.0), track(), &range), Some(80.0));
        // Outside the track clamps to the ends
        assert_eq!(mapper.value_at(Point::new(-500.0, 0.0), track(), &range), Some(0.0));
        assert_eq!(mapper.value_at(Point::new(900.0, 0.0), track(), &range), Some(100.0));
    }

    #[test]
    fn test_inverted_mapping() {
        let range = DomainRange::new(0.0, 100.0, 1.0);
        let mapper = PointerGeometryMapper::new(Orientation::Horizontal, true);

        assert_eq!(mapper.value_at(Point::new(60.0, 0.0), track(), &range), Some(75.0));
        assert_eq!(mapper.percent_for_value(75.0, &range), 25.0);
    }

    #[test]
    fn test_vertical_mapping_grows_upwards() {
        let range = DomainRange::new(0.0, 100.0, 1.0);
        let mapper = PointerGeometryMapper::new(Orientation::Vertical, false);
        let rect = Rect::new(0.0, 0.0, 8.0, 200.0);

        assert_eq!(mapper.value_at(Point::new(4.0, 200.0), rect, &range), Some(0.0));
        assert_eq!(mapper.value_at(Point::new(4.0, 50.0), rect, &range), Some(75.0));
    }

    #[test]
    fn test_degenerate_rect() {
        let mapper = PointerGeometryMapper::default();
        assert_eq!(mapper.percent_at(Point::new(5.0, 5.0), Rect::new(0.0, 0.0, 0.0, 10.0)), None);
    }

    #[test]
    fn test_percent_for_value() {
        let range = DomainRange::new(0.0, 200.0, 1.0);
        assert_eq!(range.percent_for_value(50.0), 25.0);
        assert_eq!(range.percent_for_value(-10.0), 0.0);
        assert_eq!(DomainRange::new(5.0, 5.0, 1.0).percent_for_value(5.0), 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_range_deserializes() {
        let range: DomainRange =
            serde_json::from_str(r#"{"min": 0.0, "max": 2.0, "step": 0.5}"#).unwrap();
        assert_eq!(range.snap(1.3), 1.5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialized_range_is_repaired() {
        let range: DomainRange =
            serde_json::from_str(r#"{"min": 10, "max": 0, "step": 1}"#).unwrap();
        assert_eq!(range.min(), 0.0);
        assert_eq!(range.max(), 10.0);
        assert_eq!(range.snap(5.0), 5.0);
        assert_eq!(range.clamp(20.0), 10.0);

        let range: DomainRange =
            serde_json::from_str(r#"{"min": 0, "max": 10, "step": -3}"#).unwrap();
        assert_eq!(range.step(), 1.0);
    }

    #[test]
    fn test_page_step_is_at_least_one_step() {
        assert_eq!(DomainRange::new(0.0, 100.0, 1.0).page_step(), 10.0);
        assert_eq!(DomainRange::new(0.0, 10.0, 3.0).page_step(), 3.0);
    }
}
