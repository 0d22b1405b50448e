pub mod analytics;
pub mod assessment;
