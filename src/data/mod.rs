mod charts;
mod export;
mod loader;

pub use charts::ChartBundle;
pub use export::{csv_bytes, traceability_rows, write_csv_file, TraceabilityRow};
pub use loader::Dataset;
