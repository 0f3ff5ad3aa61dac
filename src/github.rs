mod client;
mod client_builder;
mod error;
mod models;
mod permissions;
mod result;

pub use client::Client;
pub use client_builder::ClientBuilder;
pub use error::Error;
pub use models::{Identity, Repository};
pub use permissions::{build_permission_index, is_truthy, PermissionIndex};
pub use result::Result;
