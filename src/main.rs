//! Standalone viewer.
//!
//! `canvasplot [FILE.json]` plots a host request read from FILE (either a
//! bare plot payload or an `{"op": ..., "data": ...}` message).
//! `canvasplot --large N` plots N synthetic points instead of the default
//! demo clusters.

use std::path::Path;

use canvasplot::data::demo::{self, DemoSpec};
use canvasplot::{channel_requests, run_canvasplot, HostRequest, PlotConfig, PlotError, PlotRequest};

fn read_request(path: &Path) -> canvasplot::Result<HostRequest> {
    let text = std::fs::read_to_string(path)?;
    match HostRequest::from_json(&text) {
        Ok(req) => Ok(req),
        Err(_) => {
            let plot: PlotRequest = serde_json::from_str(&text).map_err(PlotError::from)?;
            Ok(HostRequest::Plot(Box::new(plot)))
        }
    }
}

fn initial_request(args: &[String]) -> canvasplot::Result<HostRequest> {
    match args {
        [flag, n] if flag == "--large" => {
            let total = n
                .parse::<usize>()
                .map_err(|e| PlotError::Config(format!("--large {}: {}", n, e)))?;
            Ok(HostRequest::Plot(Box::new(demo::generate(&DemoSpec::large(total)))))
        }
        [path] => read_request(Path::new(path)),
        _ => Ok(HostRequest::Plot(Box::new(demo::generate(&DemoSpec::default())))),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = PlotConfig::load_or_default();
    let request = match initial_request(&args) {
        Ok(r) => r,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let (sink, rx) = channel_requests();
    if sink.send(request).is_err() {
        log::error!("request queue closed before start");
        std::process::exit(1);
    }

    if let Err(e) = run_canvasplot(rx, config) {
        log::error!("viewer failed: {}", e);
        std::process::exit(1);
    }
}
