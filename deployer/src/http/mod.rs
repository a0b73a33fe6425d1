pub mod api;
pub mod client;
pub mod deployments;
pub mod env_vars;
