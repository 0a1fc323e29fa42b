//! HeyGen streaming avatar client.
//!
//! Implements the `AvatarSdk` trait over the v1 streaming REST endpoints
//! (https://api.heygen.com/v1/streaming.new, .start, .task, .stop).

mod api;
mod client;
mod config;

pub use client::{HeygenClient, HeygenConnector};
pub use config::HeygenConfig;
