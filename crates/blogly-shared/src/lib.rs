//! # Blogly Shared
//!
//! Types exchanged with the browser: submitted forms and error bodies.

pub mod dto;
pub mod response;

pub use dto::FormError;
pub use response::ErrorResponse;
