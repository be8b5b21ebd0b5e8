//! Interactive egui front end for a [`PlotSession`].
//!
//! | Sub-module  | Responsibility |
//! | ----------- | -------------- |
//! | [`update`]  | Per-frame request draining, input mapping and panel layout |
//! | [`paint`]   | Painting layers, axes, legend and tooltip with egui shapes |
//! | [`run`]     | [`run_canvasplot()`] entry point |

mod paint;
mod run;
mod update;

pub use run::run_canvasplot;

use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

use crate::config::PlotConfig;
use crate::host::{HostChannel, HostMessage, HostRequest};
use crate::session::PlotSession;

// Outbound messages kept for the message log panel.
const MESSAGE_LOG_LEN: usize = 8;

/// Standalone window hosting one scatter plot.
pub struct ScatterPlotApp {
    pub(crate) session: PlotSession,
    pub(crate) requests: Receiver<HostRequest>,
    pub(crate) outbound: Receiver<HostMessage>,
    pub(crate) message_log: VecDeque<String>,
    /// Fatal load errors waiting to be acknowledged by the user.
    pub(crate) errors: Vec<String>,
    pub(crate) warnings: Vec<String>,
    pub(crate) pointer_inside: bool,
    pub(crate) last_hover: Option<[f64; 2]>,
    pub(crate) status: Option<String>,
}

impl ScatterPlotApp {
    pub fn new(config: PlotConfig, requests: Receiver<HostRequest>) -> Self {
        let channel = HostChannel::new();
        let outbound = channel.subscribe_all();
        Self {
            session: PlotSession::new(config, channel),
            requests,
            outbound,
            message_log: VecDeque::with_capacity(MESSAGE_LOG_LEN),
            errors: Vec::new(),
            warnings: Vec::new(),
            pointer_inside: false,
            last_hover: None,
            status: None,
        }
    }

    pub fn session(&self) -> &PlotSession {
        &self.session
    }

    /// Apply queued host requests and collect what the host was sent.
    pub(crate) fn pump(&mut self) {
        let drained = self.session.drain_requests(&self.requests);
        if drained.applied > 0 {
            self.warnings = drained.warnings.iter().map(|w| w.to_string()).collect();
        }
        self.errors.extend(drained.errors.iter().map(|e| e.to_string()));
        while let Ok(msg) = self.outbound.try_recv() {
            let line = msg.to_json().unwrap_or_else(|e| e.to_string());
            if self.message_log.len() == MESSAGE_LOG_LEN {
                self.message_log.pop_front();
            }
            self.message_log.push_back(line);
        }
    }
}
