//! Request handler module
//!
//! Routes requests to the item handlers. Item-scoped routes pass through the
//! id validator before their handler runs.

pub mod items;
pub mod router;
pub mod validator;

// Re-export main entry point
pub use router::{dispatch, handle_request, match_route, Route};
