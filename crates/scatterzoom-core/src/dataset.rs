use std::ops::Deref;
use std::rc::Rc;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rgb};

/// Shape of a generated dataset.
///
/// Points land in `[start_x, start_x + max_x) × [start_y, start_y + max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetBounds {
    pub count: usize,
    pub max_x: f64,
    pub max_y: f64,
    pub start_x: f64,
    pub start_y: f64,
    /// Smallest circle radius, in pixels.
    pub min_size: f64,
    /// Largest circle radius, in pixels.
    pub max_size: f64,
}

impl Default for DatasetBounds {
    fn default() -> Self {
        Self {
            count: 16_000,
            max_x: 4000.0,
            max_y: 4000.0,
            start_x: -2000.0,
            start_y: -2000.0,
            min_size: 1.0,
            max_size: 5.0,
        }
    }
}

impl DatasetBounds {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// An immutable, cheaply clonable set of points for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    points: Rc<[Point]>,
}

impl Dataset {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points: points.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Deref for Dataset {
    type Target = [Point];

    fn deref(&self) -> &[Point] {
        &self.points
    }
}

impl From<Vec<Point>> for Dataset {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Generate `bounds.count` random points. Unseeded: two calls with the same
/// bounds give different points.
pub fn generate(bounds: &DatasetBounds) -> Dataset {
    generate_with_rng(bounds, &mut rand::rng())
}

/// Generate points from a caller-supplied random source.
pub fn generate_with_rng<R: Rng>(bounds: &DatasetBounds, rng: &mut R) -> Dataset {
    let size_span = (bounds.max_size - bounds.min_size).max(0.0);
    let points: Vec<Point> = (0..bounds.count)
        .map(|_| {
            let x = bounds.start_x + rng.random::<f64>() * bounds.max_x;
            let y = bounds.start_y + rng.random::<f64>() * bounds.max_y;
            let size = bounds.min_size + rng.random::<f64>() * size_span;
            let color = Rgb::new(rng.random(), rng.random(), rng.random());
            Point::new(x, y, size, color)
        })
        .collect();
    debug!("generated {} points", points.len());
    Dataset::new(points)
}
