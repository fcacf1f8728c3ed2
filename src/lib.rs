// src/lib.rs
//! Client for the HireSignal job-fit service: résumé and job-list intake, fit analysis,
//! outreach drafting, and saving/exporting applications.

pub mod cli;
pub mod core;
pub mod environment;
pub mod error;
pub mod export;
pub mod listing_scraper;
pub mod pipeline;
pub mod session;
pub mod types;
pub mod upload;
pub mod utils;

/// Structured application logging, forwarded to `tracing`
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

pub use crate::core::{JobService, ServiceClient};
pub use environment::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use session::{SessionController, SessionState, SessionStore};
