//! canvasplot crate root: re-exports and module wiring.
//!
//! An interactive 2D scatter plot built on egui/eframe: pan/zoom, lasso
//! selection, nearest-point hover and level-of-detail rendering for large
//! datasets, driven by JSON requests from a host and reporting selections
//! back to it.
//!
//! The crate is split into cohesive modules:
//! - `host`: JSON request/notification types and the host channels
//! - `config`: geometry, options and YAML persistence
//! - `data`: points, batches, colors and the demo generator
//! - `transform` / `spatial` / `lasso`: coordinate math, quadtree, polygon tests
//! - `render` / `surface`: layer display lists and LOD drawing
//! - `selection` / `interaction` / `session`: plot state and gesture handling
//! - `app`: the egui window; `export`: PNG snapshots

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod host;
pub mod hotkeys;
pub mod interaction;
pub mod lasso;
pub mod render;
pub mod selection;
pub mod session;
pub mod spatial;
pub mod surface;
pub mod transform;

// Public re-exports for a compact external API
pub use app::{run_canvasplot, ScatterPlotApp};
pub use config::{PlotConfig, PlotGeometry, PlotOptions};
pub use error::{PlotError, Result};
pub use host::{channel_requests, HostChannel, HostMessage, HostRequest, MessageKind, PlotRequest, RequestSink};
pub use interaction::{InputEvent, Mode};
pub use session::PlotSession;
