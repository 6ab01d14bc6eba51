pub mod cors;
pub mod logging;

pub use cors::{cors, AllowedOrigin};
pub use logging::log_error_responses;
