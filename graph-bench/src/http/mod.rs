//! HTTP graph service adapter.
//!
//! Talks to a REST-like graph service through three fixed endpoints:
//! `POST /graph/recon`, `POST /graph/add-edge` and `POST /graph/get-degrees`.
mod client;
mod response;

pub use client::HttpBackend;
pub use response::{parse_degrees, NO_PATH_SENTINEL};

pub const RECON_PATH: &str = "/graph/recon";
pub const ADD_EDGE_PATH: &str = "/graph/add-edge";
pub const GET_DEGREES_PATH: &str = "/graph/get-degrees";
