//! # Yatube Shared
//!
//! Wire types shared by the HTML routes and the JSON API: submitted form
//! bodies, query strings and response envelopes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
