//! Host channel: JSON message shapes exchanged with the embedding host and
//! the `mpsc` plumbing that carries them.
//!
//! Outbound notifications (selection, hover) go through [`HostChannel`],
//! which fans each message out to every subscriber whose [`MessageKind`]
//! filter matches. Inbound requests (`plot`, `makeHiLite`) are queued on a
//! [`RequestSink`] and drained by the UI thread between frames.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use egui::Color32;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{PlotGeometry, PlotOptions};
use crate::data::color::{parse_color, UNKNOWN_POINT_COLOR};
use crate::data::point::{Dataset, Point};
use crate::error::{PlotError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Outbound messages
// ─────────────────────────────────────────────────────────────────────────────

/// How a selection notification was triggered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClickType {
    StandardClick,
    ShiftClick,
    CtrlClick,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionNotice {
    pub axis: String,
    pub point_ids: Vec<String>,
    pub click_type: ClickType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverNotice {
    pub axis: String,
    pub point_id: String,
}

/// A message sent to the host, serialized as `{"op": .., "selection": ..}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "selection")]
pub enum HostMessage {
    #[serde(rename = "selectLabels")]
    SelectLabels(SelectionNotice),
    #[serde(rename = "mouseover")]
    Mouseover(HoverNotice),
}

impl HostMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            HostMessage::SelectLabels(_) => MessageKind::SELECTION,
            HostMessage::Mouseover(_) => MessageKind::HOVER,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Bitflags over outbound message categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageKind(pub u8);

impl MessageKind {
    pub const SELECTION: Self = Self(1 << 0);
    pub const HOVER: Self = Self(1 << 1);
    pub const ALL: Self = Self(u8::MAX);

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for MessageKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HostChannel
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: MessageKind,
    sender: Sender<HostMessage>,
}

struct ChannelInner {
    subscribers: Vec<Subscriber>,
    sent: u64,
}

/// Fire-and-forget fan-out of [`HostMessage`]s to subscribers.
///
/// Cloning yields another handle onto the same subscriber list.
#[derive(Clone)]
pub struct HostChannel {
    inner: Arc<Mutex<ChannelInner>>,
}

impl HostChannel {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ChannelInner {
                subscribers: Vec::new(),
                sent: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChannelInner> {
        // A panicked subscriber cannot leave the list half-updated.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Receive every message whose kind intersects `filter`.
    pub fn subscribe(&self, filter: MessageKind) -> Receiver<HostMessage> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.lock().subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<HostMessage> {
        self.subscribe(MessageKind::ALL)
    }

    /// Deliver to matching subscribers; dropped receivers are pruned.
    pub fn emit(&self, msg: HostMessage) {
        let kind = msg.kind();
        let mut inner = self.lock();
        inner.sent += 1;
        log::trace!("host <- {:?}", msg);
        inner.subscribers.retain(|sub| {
            if sub.filter.intersects(kind) {
                sub.sender.send(msg.clone()).is_ok()
            } else {
                true
            }
        });
    }

    /// Messages emitted since creation.
    pub fn sent_count(&self) -> u64 {
        self.lock().sent
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl Default for HostChannel {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inbound requests
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of an explicit batch color map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorMapEntry {
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "Color")]
    pub color: String,
}

/// Dataset and presentation settings for a (re)build of the plot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotRequest {
    #[serde(deserialize_with = "lenient_numbers")]
    pub x: Vec<f64>,
    #[serde(deserialize_with = "lenient_numbers")]
    pub y: Vec<f64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub batches: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub colors: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub selected_labels: Option<Vec<String>>,
    #[serde(default)]
    pub color_map: Option<Vec<ColorMapEntry>>,
    #[serde(default)]
    pub axis: Option<String>,
    #[serde(default)]
    pub options: PlotOptions,
    #[serde(default)]
    pub geometry: Option<PlotGeometry>,
}

impl PlotRequest {
    /// Check that every positional array has as many entries as `labels`.
    pub fn validate_lengths(&self) -> Result<()> {
        let expected = self.labels.len();
        let fields: [(&'static str, usize); 4] = [
            ("x", self.x.len()),
            ("y", self.y.len()),
            ("batches", self.batches.len()),
            ("colors", self.colors.len()),
        ];
        for (field, actual) in fields {
            if actual != expected {
                return Err(PlotError::LengthMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Build the unshuffled dataset. Fails on length mismatch or
    /// duplicate labels.
    pub fn to_dataset(&self) -> Result<Dataset> {
        self.validate_lengths()?;
        let points = (0..self.labels.len())
            .map(|i| Point {
                x: self.x[i],
                y: self.y[i],
                batch: self.batches[i].clone(),
                text: self.labels[i].clone(),
                color: point_color(&self.colors[i]),
                order: i,
            })
            .collect();
        Dataset::new(points)
    }

    /// The explicit color map, if supplied, with colors parsed.
    pub fn color_map_entries(&self) -> Option<Vec<(String, Color32)>> {
        self.color_map.as_ref().map(|entries| {
            entries
                .iter()
                .map(|e| (e.class.clone(), point_color(&e.color)))
                .collect()
        })
    }
}

fn point_color(s: &str) -> Color32 {
    parse_color(s).unwrap_or_else(|| {
        log::warn!("unparseable color '{}', using fallback", s);
        UNKNOWN_POINT_COLOR
    })
}

/// Replace the selection with the points whose labels are listed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiLiteRequest {
    pub axis: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub point_ids: Vec<String>,
}

/// A request from the host, parsed from `{"op": .., "data": ..}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum HostRequest {
    #[serde(rename = "plot")]
    Plot(Box<PlotRequest>),
    #[serde(rename = "makeHiLite")]
    MakeHiLite(HiLiteRequest),
}

impl HostRequest {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

fn lenient_numbers<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<f64>, D::Error> {
    let raw: Vec<serde_json::Value> = Vec::deserialize(d)?;
    Ok(raw
        .iter()
        .map(|v| match v {
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            _ => f64::NAN,
        })
        .collect())
}

fn lenient_strings<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
    let raw: Vec<serde_json::Value> = Vec::deserialize(d)?;
    Ok(raw
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Request queue
// ─────────────────────────────────────────────────────────────────────────────

/// Sending half of the inbound request queue.
#[derive(Clone)]
pub struct RequestSink {
    tx: Sender<HostRequest>,
}

impl RequestSink {
    pub fn send(&self, req: HostRequest) -> std::result::Result<(), std::sync::mpsc::SendError<HostRequest>> {
        self.tx.send(req)
    }

    /// Parse a raw JSON message and queue it.
    pub fn send_json(&self, json: &str) -> Result<()> {
        let req = HostRequest::from_json(json)?;
        self.tx
            .send(req)
            .map_err(|_| PlotError::Config("request receiver dropped".to_string()))
    }

    pub fn plot(&self, req: PlotRequest) -> std::result::Result<(), std::sync::mpsc::SendError<HostRequest>> {
        self.send(HostRequest::Plot(Box::new(req)))
    }
}

/// Create a request queue for driving a session from another thread.
pub fn channel_requests() -> (RequestSink, Receiver<HostRequest>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (RequestSink { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_message_shape() {
        let msg = HostMessage::SelectLabels(SelectionNotice {
            axis: "column".into(),
            point_ids: vec!["a".into(), "b".into()],
            click_type: ClickType::CtrlClick,
        });
        let v: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(v["op"], "selectLabels");
        assert_eq!(v["selection"]["pointIds"][1], "b");
        assert_eq!(v["selection"]["clickType"], "ctrlClick");
    }

    #[test]
    fn hover_message_shape() {
        let msg = HostMessage::Mouseover(HoverNotice {
            axis: "row".into(),
            point_id: "p1".into(),
        });
        let v: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(v["op"], "mouseover");
        assert_eq!(v["selection"]["pointId"], "p1");
    }

    #[test]
    fn channel_filters_by_kind_and_prunes_dropped() {
        let ch = HostChannel::new();
        let all = ch.subscribe_all();
        let hover = ch.subscribe(MessageKind::HOVER);
        let dropped = ch.subscribe(MessageKind::SELECTION);
        drop(dropped);
        ch.emit(HostMessage::SelectLabels(SelectionNotice {
            axis: "column".into(),
            point_ids: vec![],
            click_type: ClickType::StandardClick,
        }));
        assert!(all.try_recv().is_ok());
        assert!(hover.try_recv().is_err());
        assert_eq!(ch.subscriber_count(), 2);
        assert_eq!(ch.sent_count(), 1);
    }

    #[test]
    fn plot_request_accepts_numeric_strings_and_nulls() {
        let req = HostRequest::from_json(
            r##"{"op":"plot","data":{"x":[1,"2.5",null,"abc"],"y":[0,0,0,0],
                "batches":["a","a",3,"b"],"colors":["red","#00ff00","bogus","blue"],
                "labels":["p","q","r","s"],"axis":"row"}}"##,
        )
        .unwrap();
        let HostRequest::Plot(plot) = req else {
            panic!("expected plot request");
        };
        assert_eq!(plot.x[0], 1.0);
        assert_eq!(plot.x[1], 2.5);
        assert!(plot.x[2].is_nan());
        assert!(plot.x[3].is_nan());
        assert_eq!(plot.batches[2], "3");
        assert_eq!(plot.options, PlotOptions::default());
        let ds = plot.to_dataset().unwrap();
        assert_eq!(ds.by_text("r").map(|p| p.color), Some(UNKNOWN_POINT_COLOR));
        assert_eq!(ds.by_text("s").map(|p| p.order), Some(3));
    }

    #[test]
    fn length_mismatch_is_reported() {
        let req = PlotRequest {
            x: vec![0.0, 1.0],
            y: vec![0.0],
            batches: vec!["a".into(), "a".into()],
            colors: vec!["red".into(), "red".into()],
            labels: vec!["p".into(), "q".into()],
            ..PlotRequest::default()
        };
        match req.to_dataset() {
            Err(PlotError::LengthMismatch { field, expected, actual }) => {
                assert_eq!((field, expected, actual), ("y", 2, 1));
            }
            other => panic!("expected length mismatch, got {other:?}"),
        }
    }

    #[test]
    fn hilite_and_color_map_parse() {
        let req = HostRequest::from_json(
            r#"{"op":"makeHiLite","data":{"axis":"COLUMN","pointIds":["a","b"]}}"#,
        )
        .unwrap();
        assert_eq!(
            req,
            HostRequest::MakeHiLite(HiLiteRequest {
                axis: "COLUMN".into(),
                point_ids: vec!["a".into(), "b".into()],
            })
        );
        let plot: PlotRequest = serde_json::from_str(
            r##"{"x":[],"y":[],"labels":[],"colorMap":[{"Class":"k","Color":"#0000ff"}]}"##,
        )
        .unwrap();
        assert_eq!(
            plot.color_map_entries(),
            Some(vec![("k".to_string(), Color32::from_rgb(0, 0, 255))])
        );
    }

    #[test]
    fn request_sink_queues_parsed_json() {
        let (sink, rx) = channel_requests();
        sink.send_json(r#"{"op":"makeHiLite","data":{"axis":"column","pointIds":[]}}"#)
            .unwrap();
        assert!(matches!(rx.try_recv(), Ok(HostRequest::MakeHiLite(_))));
        assert!(sink.send_json("{not json").is_err());
    }
}
