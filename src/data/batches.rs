//! Batch cardinalities and legend construction.

use std::collections::HashMap;

use egui::Color32;

use super::point::Dataset;

/// Batch id -> point count, plus batches ordered smallest to largest.
#[derive(Debug, Clone, Default)]
pub struct BatchIndex {
    cardinality: HashMap<String, usize>,
    order: Vec<String>,
}

impl BatchIndex {
    pub fn build(dataset: &Dataset) -> Self {
        let mut cardinality: HashMap<String, usize> = HashMap::new();
        let mut order = Vec::new();
        for p in dataset.iter() {
            let n = cardinality.entry(p.batch.clone()).or_insert_with(|| {
                order.push(p.batch.clone());
                0
            });
            *n += 1;
        }
        // stable: equal cardinalities keep first-appearance order
        order.sort_by_key(|b| cardinality[b]);
        Self { cardinality, order }
    }

    /// Batch ids sorted ascending by cardinality.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn cardinality(&self, batch: &str) -> usize {
        self.cardinality.get(batch).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub batch: String,
    pub color: Color32,
}

/// Legend content; typesetting is up to the embedding layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    pub title: String,
    /// Entries in display (alphabetical) order.
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Default legend: the color of the first point of each batch.
    pub fn from_batches(title: &str, batches: &BatchIndex, dataset: &Dataset) -> Self {
        let entries = batches
            .order()
            .iter()
            .filter_map(|bid| {
                dataset.iter().find(|p| &p.batch == bid).map(|p| LegendEntry {
                    batch: bid.clone(),
                    color: p.color,
                })
            })
            .collect();
        Self::sorted(title, entries)
    }

    /// Legend from an explicit host-supplied color map.
    pub fn from_color_map(title: &str, map: &[(String, Color32)]) -> Self {
        let entries = map
            .iter()
            .map(|(batch, color)| LegendEntry {
                batch: batch.clone(),
                color: *color,
            })
            .collect();
        Self::sorted(title, entries)
    }

    fn sorted(title: &str, mut entries: Vec<LegendEntry>) -> Self {
        entries.sort_by(|a, b| a.batch.cmp(&b.batch));
        Self {
            title: title.to_string(),
            entries,
        }
    }
}

/// Informational counters shown next to the plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlotInfo {
    pub n_points: usize,
    pub n_batches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::point::{test_point, Point};

    fn pt(text: &str, batch: &str, color: Color32) -> Point {
        let mut p = test_point(0.0, 0.0, text);
        p.batch = batch.into();
        p.color = color;
        p
    }

    #[test]
    fn batches_sorted_by_cardinality() {
        let ds = Dataset::new(vec![
            pt("1", "big", Color32::RED),
            pt("2", "big", Color32::RED),
            pt("3", "big", Color32::RED),
            pt("4", "small", Color32::BLUE),
            pt("5", "mid", Color32::GREEN),
            pt("6", "mid", Color32::GREEN),
        ])
        .unwrap();
        let idx = BatchIndex::build(&ds);
        assert_eq!(idx.order(), &["small", "mid", "big"]);
        assert_eq!(idx.cardinality("big"), 3);
        assert_eq!(idx.cardinality("none"), 0);
        assert_eq!(idx.len(), 3);
    }

    #[test]
    fn default_legend_uses_first_point_color_sorted_alphabetically() {
        let ds = Dataset::new(vec![
            pt("1", "zeta", Color32::RED),
            pt("2", "alpha", Color32::BLUE),
            pt("3", "alpha", Color32::GREEN),
        ])
        .unwrap();
        let idx = BatchIndex::build(&ds);
        let legend = Legend::from_batches("Batches", &idx, &ds);
        assert_eq!(legend.title, "Batches");
        assert_eq!(
            legend.entries,
            vec![
                LegendEntry { batch: "alpha".into(), color: Color32::BLUE },
                LegendEntry { batch: "zeta".into(), color: Color32::RED },
            ]
        );
    }

    #[test]
    fn explicit_color_map_wins() {
        let legend = Legend::from_color_map(
            "L",
            &[("b".into(), Color32::RED), ("a".into(), Color32::BLUE)],
        );
        assert_eq!(legend.entries[0].batch, "a");
        assert_eq!(legend.entries[1].color, Color32::RED);
    }
}
