//! Plot data model: points, batches, palettes and synthetic demo data.

pub mod batches;
pub mod color;
pub mod demo;
pub mod point;
