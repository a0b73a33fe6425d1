//! Preview Deployer Library
//!
//! Keeps a branch's preview deployment and its API URL variable in sync with a
//! hosting platform, plus a small health-check server.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod server;
pub mod utils;
