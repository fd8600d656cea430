//! HTTP listener and wire types
//!
//! This module provides the HTTP/1.1 plumbing the echo handler runs on:
//! request parsing, response encoding, CORS headers, the accept loop and a
//! small client for driving the server from tests.

pub mod client;
pub mod config;
pub mod cors;
pub mod protocol;
pub mod request;
pub mod response;
pub mod server;


pub use client::HttpClient;
pub use config::HttpConfig;
pub use request::Request;
pub use response::Response;
pub use server::{HttpEchoServer, HttpServer, RequestHandler};
