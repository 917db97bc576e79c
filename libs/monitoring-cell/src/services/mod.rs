pub mod instrumentation;
pub mod metrics;

pub use instrumentation::Instrumentation;
pub use metrics::MetricsStore;
