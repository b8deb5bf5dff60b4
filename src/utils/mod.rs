//! Generic helpers shared across the pipeline.

pub mod toposort;
