pub mod aggregate;
pub mod handlers;
pub mod models;
pub mod service;

pub use aggregate::{AggregationError, DailyAggregator, SelectionPolicy};
pub use service::{ForecastError, ForecastService};
