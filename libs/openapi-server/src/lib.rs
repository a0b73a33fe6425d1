//! Health-check server models

pub mod models;
