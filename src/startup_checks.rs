use crate::Config;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Failed to create vault directory: {0}")]
    VaultDirectoryCreationFailed(std::io::Error),

    #[error("Vault directory is not accessible: {0}")]
    VaultDirectoryUnreadable(std::io::Error),
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    let vault_dir = &config.vault.source_directory;
    if !vault_dir.exists() {
        info!("Vault directory does not exist, creating: {:?}", vault_dir);
        if let Err(e) = tokio::fs::create_dir_all(vault_dir).await {
            error!("Failed to create vault directory {:?}: {}", vault_dir, e);
            errors.push(StartupCheckError::VaultDirectoryCreationFailed(e));
        } else {
            info!("Vault directory created successfully");
        }
    } else {
        match tokio::fs::read_dir(vault_dir).await {
            Ok(_) => info!("Vault directory is accessible: {:?}", vault_dir),
            Err(e) => {
                error!("Vault directory is not accessible: {}", e);
                errors.push(StartupCheckError::VaultDirectoryUnreadable(e));
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
