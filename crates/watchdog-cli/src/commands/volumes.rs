//! Volume commands: exists, create, rm

use anyhow::Result;
use watchdog_core::ContainerAdmin;

/// Report whether a volume exists
pub async fn volume_exists(admin: &ContainerAdmin, name: &str) -> Result<bool> {
    let exists = admin.volume_exists(name).await?;
    println!("{}", if exists { "yes" } else { "no" });
    Ok(exists)
}

/// Create a data volume with the configured driver
pub async fn volume_create(admin: &ContainerAdmin, name: &str, size: Option<u64>) -> Result<()> {
    let volume = admin.create_volume(name, size).await?;
    println!("Created volume '{}' (driver: {})", volume.name, volume.driver);
    Ok(())
}

/// Force-remove a volume
pub async fn volume_remove(admin: &ContainerAdmin, name: &str) -> Result<()> {
    admin.remove_volume(name).await?;
    println!("Removed volume '{}'", name);
    Ok(())
}
