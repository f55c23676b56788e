//! AT Protocol HTTP adapters.

mod client;
mod dto;
mod well_known;

pub use client::{USER_AGENT, XrpcClient, server_origin};
pub use well_known::WellKnownClient;
