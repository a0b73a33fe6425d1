//! Hosting platform REST API models

pub mod models;
