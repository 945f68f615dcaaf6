//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Root folder resolution priority order:
/// 1. Environment variable (highest priority)
/// 2. TOML config file
/// 3. OS-dependent compiled default (fallback)
///
/// The root folder holds the service database and any mirrored
/// recording trees this host tracks.
pub fn resolve_root_folder(env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(root_folder));
                }
            }
        }
    }

    // Priority 3: OS-dependent compiled default
    Ok(get_default_root_folder())
}

/// Read a single string key from the TOML config file, if present
///
/// Used by services for settings that have no environment override of
/// their own (program dates, roster paths). Returns None when the file
/// or key is absent, or the file fails to parse.
pub fn read_config_key(key: &str) -> Option<String> {
    let config_path = find_config_file().ok()?;
    let toml_content = std::fs::read_to_string(&config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&toml_content).ok()?;
    config
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Get default configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/tutortrack/config.toml first, then /etc/tutortrack/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("tutortrack").join("config.toml"));
        let system_config = PathBuf::from("/etc/tutortrack/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else if cfg!(target_os = "macos") || cfg!(target_os = "windows") {
        dirs::config_dir()
            .map(|d| d.join("tutortrack").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    } else {
        return Err(Error::Config("Unsupported platform".to_string()));
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/tutortrack (or /var/lib/tutortrack for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("tutortrack"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tutortrack"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/tutortrack
        dirs::data_dir()
            .map(|d| d.join("tutortrack"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tutortrack"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\tutortrack
        dirs::data_local_dir()
            .map(|d| d.join("tutortrack"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tutortrack"))
    } else {
        PathBuf::from("./tutortrack_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_var_takes_priority() {
        std::env::set_var("TUTORTRACK_TEST_ROOT", "/tmp/tutortrack-test");
        let resolved = resolve_root_folder("TUTORTRACK_TEST_ROOT").unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/tutortrack-test"));
        std::env::remove_var("TUTORTRACK_TEST_ROOT");
    }

    #[test]
    #[serial]
    fn test_fallback_to_default_when_env_unset() {
        std::env::remove_var("TUTORTRACK_TEST_ROOT_UNSET");
        let resolved = resolve_root_folder("TUTORTRACK_TEST_ROOT_UNSET").unwrap();
        // Default path always ends with the product folder name
        assert!(resolved.to_string_lossy().contains("tutortrack"));
    }
}
