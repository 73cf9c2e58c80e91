//! HTTP protocol layer module
//!
//! Content-type resolution and response construction, decoupled from the
//! request handling business logic.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_500_response, build_options_response, finalize,
};
