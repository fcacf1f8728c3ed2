// src/session/mod.rs
//! In-memory session view-model and the controller that drives it

pub mod banner;
pub mod controller;
pub mod materials;
pub mod state;
pub mod store;

pub use banner::StatusBanner;
pub use controller::SessionController;
pub use materials::{MaterialsEntry, MaterialsField};
pub use state::{Action, Busy, LoadingState, ResumeState, SessionState, UrlBatch};
pub use store::SessionStore;
