//! The echo handler: reflects each request back as a JSON document.

pub mod handler;
pub mod payload;

pub use handler::{EchoHandler, SUPPORTED_METHODS};
pub use payload::{EchoHeaders, EchoPayload};
