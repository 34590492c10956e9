pub mod access;
pub mod error;
pub mod frontmatter;
pub mod reconcile;
pub mod scanner;
pub mod store;
pub mod types;
pub mod writer;

pub use access::{Capability, ImportedFiles, Vault, VaultRoot};
pub use error::VaultError;
pub use store::VaultStore;
pub use types::{Author, FileRef, MetaValue, Metadata, Post};

#[cfg(test)]
mod tests;
