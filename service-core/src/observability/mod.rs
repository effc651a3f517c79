pub mod logging;
pub mod usage;

pub use logging::init_tracing;
pub use usage::AiUsageMetrics;
