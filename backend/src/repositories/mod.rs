//! Write access to persisted tables.

pub mod patient;

pub use patient::insert_seed_data;
