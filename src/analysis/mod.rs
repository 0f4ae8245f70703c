pub mod aggregator;
pub mod classifier;
pub mod coaching;
pub mod grader;
pub mod models;
pub mod report;
pub mod scoring;
pub mod squad;
pub mod synergy;
