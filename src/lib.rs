//! Synthetic crypto market backend for the InsightBoard dashboard.
//!
//! Serves believable, deterministic price histories over HTTP and carries the
//! client-side pieces a dashboard needs: a coalescing query cache and the
//! price chart display model.

pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
