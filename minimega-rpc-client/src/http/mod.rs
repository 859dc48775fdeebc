//! JSON-RPC over HTTP

mod client;

pub use client::HttpClient;
