//! HTTP protocol utilities module
//!
//! Response builders, body decoding, and the error-to-response translation
//! shared by all request handlers.

pub mod error;
pub mod request;
pub mod response;

pub use error::{ApiError, RenderError};
pub use request::read_json;
pub use response::{empty_response, json_response};
