//! API DTOs module
//!
//! This module contains the data transfer objects for the Gemini REST API:
//! - `generate`: generateContent requests, responses and error envelopes
//! - `schema`: structured-output schema declarations

pub mod generate;
pub mod schema;

pub use generate::*;
pub use schema::*;
