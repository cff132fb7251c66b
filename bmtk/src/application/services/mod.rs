// bmtk/src/application/services/mod.rs
pub mod hierarchy;
pub mod preprocessor;
pub mod session;
pub mod statistics;
pub mod text_analysis;
pub mod timeseries;
