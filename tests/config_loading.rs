//! Configuration loading from TOML files

use anyhow::Result;
use media_vault::VaultConfig;

#[test]
fn loads_vault_config_from_toml_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("vault.toml");
    std::fs::write(
        &path,
        r#"
        bucket = "media"
        region = "us-east-1"
        prefix = "cases"
        record_id = "rec1"

        [naming]
        link_expiration_secs = 3600
        "#,
    )?;

    let config = VaultConfig::from_toml_file(&path)?;
    assert_eq!(config.bucket, "media");
    assert_eq!(config.scoped_prefix(), "cases/rec1/");
    assert_eq!(config.naming.link_expiration_secs, 3600);
    // Unspecified naming fields keep their defaults
    assert_eq!(config.naming.block_seconds, 10.0);
    Ok(())
}

#[test]
fn missing_config_file_is_a_config_error() {
    let result = VaultConfig::from_toml_file(std::path::Path::new("/nonexistent/vault.toml"));
    assert!(matches!(result, Err(media_vault::Error::Config(_))));
}

#[test]
fn placeholder_prefix_fails_validation_on_load() {
    let result = VaultConfig::from_toml_str(
        r#"
        bucket = "media"
        prefix = "Change_this_prefix"
        "#,
    );
    assert!(result.is_err());
}
