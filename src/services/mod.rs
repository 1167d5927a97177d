pub mod chart;
pub mod coin_query;
pub mod coin_service;
pub mod format;
pub mod price_generator;
pub mod schema;
pub mod smoothing;
