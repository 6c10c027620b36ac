use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::transform::Transform;

/// Which screen axis a scale maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// A linear map from a data-space interval onto a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl Default for LinearScale {
    /// The unit scale `[0, 1] -> [0, 1]`, i.e. identity.
    fn default() -> Self {
        Self {
            domain: [0.0, 1.0],
            range: [0.0, 1.0],
        }
    }
}

impl LinearScale {
    /// Fails when the domain has zero width or is not finite.
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Result<Self, CoreError> {
        let span = domain[1] - domain[0];
        if span == 0.0 || !span.is_finite() {
            return Err(CoreError::DegenerateScale(domain[0], domain[1]));
        }
        Ok(Self { domain, range })
    }

    /// `[0, 1] -> [0, 1]`.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Map a domain value into the range.
    pub fn apply(&self, value: f64) -> f64 {
        let t = (value - self.domain[0]) / (self.domain[1] - self.domain[0]);
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    /// Map a range value back into the domain.
    pub fn invert(&self, value: f64) -> f64 {
        let t = (value - self.range[0]) / (self.range[1] - self.range[0]);
        self.domain[0] + t * (self.domain[1] - self.domain[0])
    }

    /// Compose `transform` on top of this scale for one axis.
    ///
    /// The returned scale keeps this scale's range and gets a new domain, so
    /// that `result.apply(v) == self.apply(v) * scale + translate`. Nothing is
    /// mutated; call it again with the next transform instead.
    pub fn rescale(&self, transform: &Transform, axis: Axis) -> Result<Self, CoreError> {
        transform.validate()?;
        let invert = |r: f64| match axis {
            Axis::X => transform.invert_x(r),
            Axis::Y => transform.invert_y(r),
        };
        let domain = [
            self.invert(invert(self.range[0])),
            self.invert(invert(self.range[1])),
        ];
        LinearScale::new(domain, self.range)
    }

    /// [`LinearScale::rescale`] along the horizontal axis.
    pub fn rescale_x(&self, transform: &Transform) -> Result<Self, CoreError> {
        self.rescale(transform, Axis::X)
    }

    /// [`LinearScale::rescale`] along the vertical axis.
    pub fn rescale_y(&self, transform: &Transform) -> Result<Self, CoreError> {
        self.rescale(transform, Axis::Y)
    }

    /// Roughly `count` human-friendly tick values inside the domain, in the
    /// domain's direction. Steps are 1, 2 or 5 times a power of ten.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [d0, d1] = self.domain;
        if count == 0 || !d0.is_finite() || !d1.is_finite() {
            return Vec::new();
        }
        let reverse = d1 < d0;
        let (start, stop) = if reverse { (d1, d0) } else { (d0, d1) };

        let Some((i1, i2, inc)) = tick_bounds(start, stop, count as f64) else {
            return Vec::new();
        };
        if i2 < i1 {
            return Vec::new();
        }

        let n = (i2 - i1 + 1.0) as usize;
        let mut ticks: Vec<f64> = (0..n)
            .map(|i| {
                let k = i1 + i as f64;
                if inc < 0.0 {
                    k / -inc
                } else {
                    k * inc
                }
            })
            .collect();
        if reverse {
            ticks.reverse();
        }
        ticks
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Integer tick bounds and increment. A negative increment means "divide by
/// `-inc`", which keeps sub-unit steps exact.
fn tick_bounds(start: f64, stop: f64, count: f64) -> Option<(f64, f64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        inc = 10f64.powf(-power) / factor;
        i1 = (start * inc).round();
        i2 = (stop * inc).round();
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        return finish(i1, i2, -inc, start, stop, count);
    }
    inc = 10f64.powf(power) * factor;
    i1 = (start / inc).round();
    i2 = (stop / inc).round();
    if i1 * inc < start {
        i1 += 1.0;
    }
    if i2 * inc > stop {
        i2 -= 1.0;
    }
    finish(i1, i2, inc, start, stop, count)
}

fn finish(
    i1: f64,
    i2: f64,
    inc: f64,
    start: f64,
    stop: f64,
    count: f64,
) -> Option<(f64, f64, f64)> {
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_bounds(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}
