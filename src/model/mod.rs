pub mod metrics;
pub mod rank;
pub mod record;
pub mod stats;
pub mod thresholds;
