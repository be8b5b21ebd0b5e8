//! Points and the session dataset.

use std::collections::{HashMap, HashSet};

use egui::Color32;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{PlotError, Result};

/// Seed for the presentation-order shuffle applied on load.
pub const SHUFFLE_SEED: u64 = 124;

/// One coordinate axis of the plot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A single scatter point.
///
/// `x`, `y` and `text` never change after load; `color` and `batch` are
/// patched in place when the host refreshes the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub batch: String,
    pub text: String,
    pub color: Color32,
    /// Position of this point in the host's input order.
    pub order: usize,
}

impl Point {
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Return every label that occurs more than once, each reported once in
/// first-seen order.
pub fn find_duplicate_labels<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut dups = Vec::new();
    for label in labels {
        if !seen.insert(label) && reported.insert(label) {
            dups.push(label.to_string());
        }
    }
    dups
}

/// Ordered point collection owned by a plot session.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    points: Vec<Point>,
    by_text: HashMap<String, usize>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate labels.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        let dups = find_duplicate_labels(points.iter().map(|p| p.text.as_str()));
        if !dups.is_empty() {
            return Err(PlotError::DuplicateLabels(dups));
        }
        let mut ds = Self {
            points,
            by_text: HashMap::new(),
        };
        ds.reindex();
        Ok(ds)
    }

    fn reindex(&mut self) {
        self.by_text = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.text.clone(), i))
            .collect();
    }

    /// Shuffle presentation order with a fixed seed so overlapping batches
    /// do not systematically hide each other.
    pub fn shuffled(mut self, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        self.points.shuffle(&mut rng);
        self.reindex();
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn by_text(&self, text: &str) -> Option<&Point> {
        self.by_text.get(text).map(|&i| &self.points[i])
    }

    /// Min/max of the finite values on one axis.
    pub fn extent(&self, axis: Axis) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|p| p.coord(axis))
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// True when the dataset is non-empty and every value on `axis` is NaN.
    pub fn all_nan(&self, axis: Axis) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.coord(axis).is_nan())
    }

    /// Points matching any of `labels`, in host input order.
    pub fn matching_labels<'a>(&'a self, labels: &[String]) -> Vec<&'a Point> {
        let wanted: HashSet<&str> = labels.iter().map(String::as_str).collect();
        let mut hits: Vec<&Point> = self
            .points
            .iter()
            .filter(|p| wanted.contains(p.text.as_str()))
            .collect();
        hits.sort_by_key(|p| p.order);
        hits
    }
}

#[cfg(test)]
pub(crate) fn test_point(x: f64, y: f64, text: &str) -> Point {
    Point {
        x,
        y,
        batch: "b".into(),
        text: text.into(),
        color: Color32::RED,
        order: 0,
    }
}
