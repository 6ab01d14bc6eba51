pub mod connection;
pub mod rows;
