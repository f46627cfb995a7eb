// Domain layer - Result records, chart specifications and their errors
pub mod chart;
pub mod error;
pub mod result;
