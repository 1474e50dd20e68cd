//! Command implementations

pub mod certs;
pub mod config;
pub mod render;
pub mod status;
pub mod up;
pub mod verify;
pub mod version;
