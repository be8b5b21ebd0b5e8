//! Synthetic demo data: Gaussian point clusters, one per batch.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::color::to_hex;
use crate::host::PlotRequest;

/// Shape of the generated dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoSpec {
    pub batches: usize,
    /// Points per batch are drawn uniformly from this inclusive range.
    pub points_per_batch: (usize, usize),
    pub seed: u64,
}

impl Default for DemoSpec {
    fn default() -> Self {
        Self {
            batches: 20,
            points_per_batch: (20, 50),
            seed: 7,
        }
    }
}

impl DemoSpec {
    /// A large dataset that exercises mid-gesture subsampling.
    pub fn large(total_points: usize) -> Self {
        let per = (total_points / 20).max(1);
        Self {
            batches: 20,
            points_per_batch: (per, per),
            seed: 7,
        }
    }
}

// Box-Muller; `rand` alone has no normal distribution.
fn gauss(rng: &mut StdRng, mu: f64, sigma: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen::<f64>();
    mu + sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Generate a plot request with clusters centered in `[-500, 500]^2`.
pub fn generate(spec: &DemoSpec) -> PlotRequest {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut req = PlotRequest::default();
    let (lo, hi) = (
        spec.points_per_batch.0.min(spec.points_per_batch.1),
        spec.points_per_batch.0.max(spec.points_per_batch.1),
    );

    let push = |req: &mut PlotRequest, label: String, x: f64, y: f64, batch: &str, color: &str| {
        req.x.push(x);
        req.y.push(y);
        req.labels.push(label);
        req.batches.push(batch.to_string());
        req.colors.push(color.to_string());
    };

    for b in 0..spec.batches {
        let mux = rng.gen_range(-500.0..500.0);
        let muy = rng.gen_range(-500.0..500.0);
        let sigmax = rng.gen_range(20.0..30.0);
        let sigmay = rng.gen_range(10.0..40.0);
        let n = rng.gen_range(lo..=hi);
        let color = to_hex(egui::Color32::from_rgb(rng.gen(), rng.gen(), rng.gen()));
        let batch = format!("batch-{:02}", b);
        for k in 0..n {
            let x = round1(gauss(&mut rng, mux, sigmax));
            let y = round1(gauss(&mut rng, muy, sigmay));
            push(&mut req, format!("{}-{}: {}, {}", batch, k, x, y), x, y, &batch, &color);
        }
    }
    req.options.plot_title = "Gaussian clusters".to_string();
    req.options.legend_title = "Batch".to_string();
    req
}
