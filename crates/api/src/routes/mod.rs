pub mod model;
pub mod predictions;
pub mod reports;
