//! Persistent point selection and de-duplicated host notification.

use crate::data::point::{Dataset, Point};
use crate::host::{ClickType, HostChannel, HostMessage, HoverNotice, SelectionNotice};

/// Ordered selection plus the label sequence last reported to the host.
///
/// Selected points are copies of dataset points. When the dataset is
/// refreshed they are patched by label rather than replaced, so a selection
/// can outlive the points it was made from.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    points: Vec<Point>,
    last_sent: Option<Vec<String>>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point. Duplicates are kept.
    pub fn add(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Replace the selection wholesale.
    pub fn replace<I: IntoIterator<Item = Point>>(&mut self, points: I) {
        self.points = points.into_iter().collect();
    }

    /// Append every point matched by a finished lasso drag.
    pub fn merge_drag_result<I: IntoIterator<Item = Point>>(&mut self, matches: I) {
        self.points.extend(matches);
    }

    /// Overwrite color and batch of selected points from the refreshed
    /// dataset entry with the same label. Labels no longer present are left
    /// untouched.
    pub fn patch_after_dataset_refresh(&mut self, dataset: &Dataset) {
        for p in &mut self.points {
            if let Some(fresh) = dataset.by_text(&p.text) {
                p.color = fresh.color;
                p.batch = fresh.batch.clone();
            }
        }
    }

    /// Selected labels in selection order.
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.text.clone()).collect()
    }

    /// The label sequence most recently sent to the host.
    pub fn last_sent(&self) -> Option<&[String]> {
        self.last_sent.as_deref()
    }

    /// Send the current selection unless the same label sequence was the
    /// last one sent. Returns whether a message went out.
    pub fn notify(&mut self, channel: &HostChannel, axis: &str, click_type: ClickType) -> bool {
        let labels = self.labels();
        self.send_labels(channel, axis, labels, click_type)
    }

    /// Like [`notify`](Self::notify), with an extra (hovered) point
    /// appended to the reported labels.
    pub fn notify_with(&mut self, channel: &HostChannel, axis: &str, extra: &Point, click_type: ClickType) -> bool {
        let mut labels = self.labels();
        labels.push(extra.text.clone());
        self.send_labels(channel, axis, labels, click_type)
    }

    fn send_labels(&mut self, channel: &HostChannel, axis: &str, labels: Vec<String>, click_type: ClickType) -> bool {
        if self.last_sent.as_ref() == Some(&labels) {
            return false;
        }
        self.last_sent = Some(labels.clone());
        channel.emit(HostMessage::SelectLabels(SelectionNotice {
            axis: axis.to_string(),
            point_ids: labels,
            click_type,
        }));
        true
    }

    /// Hover notices are never de-duplicated.
    pub fn notify_hover(&self, channel: &HostChannel, axis: &str, point: &Point) {
        channel.emit(HostMessage::Mouseover(HoverNotice {
            axis: axis.to_string(),
            point_id: point.text.clone(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::point::test_point;
    use egui::Color32;

    #[test]
    fn identical_sequence_is_sent_once() {
        let ch = HostChannel::new();
        let rx = ch.subscribe_all();
        let mut sel = SelectionManager::new();
        sel.add(test_point(0.0, 0.0, "a"));
        assert!(sel.notify(&ch, "column", ClickType::CtrlClick));
        assert!(!sel.notify(&ch, "column", ClickType::CtrlClick));
        assert_eq!(rx.try_iter().count(), 1);

        sel.add(test_point(1.0, 0.0, "b"));
        assert!(sel.notify(&ch, "column", ClickType::CtrlClick));
        assert_eq!(sel.last_sent(), Some(&["a".to_string(), "b".to_string()][..]));
    }

    #[test]
    fn order_matters_for_dedup() {
        let ch = HostChannel::new();
        let mut sel = SelectionManager::new();
        sel.replace([test_point(0.0, 0.0, "a"), test_point(0.0, 0.0, "b")]);
        assert!(sel.notify(&ch, "column", ClickType::StandardClick));
        sel.replace([test_point(0.0, 0.0, "b"), test_point(0.0, 0.0, "a")]);
        assert!(sel.notify(&ch, "column", ClickType::StandardClick));
    }

    #[test]
    fn hover_is_always_sent() {
        let ch = HostChannel::new();
        let rx = ch.subscribe_all();
        let sel = SelectionManager::new();
        let p = test_point(0.0, 0.0, "h");
        sel.notify_hover(&ch, "column", &p);
        sel.notify_hover(&ch, "column", &p);
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn refresh_patches_color_and_batch_by_label() {
        let mut sel = SelectionManager::new();
        sel.add(test_point(0.0, 0.0, "a"));
        sel.add(test_point(0.0, 0.0, "gone"));
        let mut fresh = test_point(9.0, 9.0, "a");
        fresh.color = Color32::BLUE;
        fresh.batch = "new".into();
        let ds = Dataset::new(vec![fresh]).unwrap();
        sel.patch_after_dataset_refresh(&ds);
        assert_eq!(sel.points()[0].color, Color32::BLUE);
        assert_eq!(sel.points()[0].batch, "new");
        // position is not patched
        assert_eq!(sel.points()[0].x, 0.0);
        assert_eq!(sel.points()[1].color, Color32::RED);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut sel = SelectionManager::new();
        sel.add(test_point(0.0, 0.0, "a"));
        sel.merge_drag_result(vec![test_point(0.0, 0.0, "a")]);
        assert_eq!(sel.labels(), vec!["a", "a"]);
    }
}
