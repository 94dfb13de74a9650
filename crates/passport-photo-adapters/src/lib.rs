//! Passport Photo Adapters - External adapters for passport-photo.
//!
//! This crate provides adapters for:
//! - The Azure Face, Content Safety and Vision REST services
//! - Credential loading from the environment
//! - Filesystem image source

pub mod azure;
pub mod credentials;
pub mod fs;

pub use azure::{gateways, ClientSettings};
pub use credentials::{AzureCredentials, CredentialsError, ServiceCredentials};
pub use fs::FsImageSource;
