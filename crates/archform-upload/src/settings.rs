use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use archform_core::storage::settings_path;

use crate::UploadError;

/// Endpoint and credentials for [`HttpSink`](crate::HttpSink). There is no
/// default endpoint; `url` must name a server that accepts plain key and
/// secret headers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub workspace_id: u64,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
}

/// Read `~/.archform/settings.json`. A missing or unreadable file yields
/// the defaults.
pub fn read_settings() -> UploadSettings {
    read_settings_or_default(&settings_path())
}

fn read_settings_or_default(path: &Path) -> UploadSettings {
    if !path.exists() {
        return UploadSettings::default();
    }
    read_settings_from(path).unwrap_or_else(|err| {
        warn!(
            path = path.display().to_string().as_str(),
            error = err.to_string().as_str();
            "Ignoring unreadable upload settings"
        );
        UploadSettings::default()
    })
}

pub fn read_settings_from(path: &Path) -> Result<UploadSettings, UploadError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn write_settings(settings: &UploadSettings) -> Result<(), UploadError> {
    write_settings_to(&settings_path(), settings)
}

pub fn write_settings_to(path: &Path, settings: &UploadSettings) -> Result<(), UploadError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn upload_configured(settings: &UploadSettings) -> bool {
    !settings.url.is_empty()
        && settings.workspace_id != 0
        && !settings.api_key.is_empty()
        && !settings.api_secret.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_not_configured() {
        let settings = UploadSettings::default();
        assert!(settings.url.is_empty());
        assert!(!upload_configured(&settings));
    }

    #[test]
    fn credentials_without_endpoint_are_not_configured() {
        let settings = UploadSettings {
            workspace_id: 37816,
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            ..UploadSettings::default()
        };
        assert!(!upload_configured(&settings));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_settings_from(&path),
            Err(UploadError::Settings(_))
        ));
        assert_eq!(read_settings_or_default(&path), UploadSettings::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(read_settings_or_default(&path), UploadSettings::default());
    }

    #[test]
    fn settings_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = UploadSettings {
            url: "http://localhost:8080".to_string(),
            workspace_id: 37816,
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        };
        write_settings_to(&path, &settings).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"workspaceId\": 37816"));
        let loaded = read_settings_from(&path).unwrap();
        assert_eq!(loaded, settings);
        assert!(upload_configured(&loaded));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"apiKey": "k"}"#).unwrap();
        let loaded = read_settings_from(&path).unwrap();
        assert!(loaded.url.is_empty());
        assert_eq!(loaded.api_key, "k");
        assert_eq!(loaded.workspace_id, 0);
    }
}
