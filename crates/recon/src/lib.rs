//! `invcheck-recon`: inventory count reconciliation engine.
//!
//! Pure engine crate: receives two pre-loaded counts, returns merged rows,
//! headline metrics and per-brand summaries. No CLI or IO dependencies.

pub mod accuracy;
pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;

pub use config::{ColumnConfig, PolicyConfig, ReconConfig};
pub use engine::run;
pub use error::ReconError;
pub use model::{
    BrandSummary, Cell, MergedRow, NormalizedRow, OverallMetrics, RawCount, RawSheet, ReconMeta,
    ReconResult,
};
