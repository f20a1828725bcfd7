//! Export orchestration: the two-pass crawl-convert-finalize protocol

mod orchestrator;

pub use orchestrator::Exporter;
