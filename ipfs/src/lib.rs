pub use client::{api_base_url, IpfsClient};
pub use config::{IpfsAuth, IpfsConfig};
pub use error::{Error, Result};

pub mod client;
pub mod config;
mod error;
