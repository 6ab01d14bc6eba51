//! Data models shared across database access and API handlers.

pub mod envelope;
pub mod patient;

pub use envelope::{InsertOutcome, QueryOutcome};
pub use patient::{SeedPatient, SEED_PATIENTS};
