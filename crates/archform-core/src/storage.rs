//! Local workspace files.
//!
//! Workspaces are stored as `<name>.json` documents in `~/.archform/`. Every
//! function has an `_in` variant taking the directory explicitly.

use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{ModelError, Workspace};

const EXTENSION: &str = "json";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Model(#[from] ModelError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Resolve the global workspace directory (~/.archform/).
pub fn workspaces_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".archform")
}

fn workspace_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, EXTENSION))
}

/// List all stored workspace names (without extension), sorted.
pub fn list_workspaces() -> Result<Vec<String>, StorageError> {
    list_workspaces_in(&workspaces_dir())
}

pub fn list_workspaces_in(dir: &Path) -> Result<Vec<String>, StorageError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name == SETTINGS_FILE || name.starts_with('.') {
                return None;
            }
            name.strip_suffix(".json").map(|n| n.to_string())
        })
        .collect();
    names.sort();
    Ok(names)
}

/// Read a workspace document as a raw JSON string.
pub fn read_workspace_raw(name: &str) -> Result<String, StorageError> {
    read_workspace_raw_in(&workspaces_dir(), name)
}

pub fn read_workspace_raw_in(dir: &Path, name: &str) -> Result<String, StorageError> {
    let path = workspace_path(dir, name);
    fs::read_to_string(&path).map_err(io_error(&path))
}

/// Read and validate a stored workspace.
pub fn read_workspace(name: &str) -> Result<Workspace, StorageError> {
    read_workspace_in(&workspaces_dir(), name)
}

pub fn read_workspace_in(dir: &Path, name: &str) -> Result<Workspace, StorageError> {
    let raw = read_workspace_raw_in(dir, name)?;
    Ok(Workspace::from_json(&raw)?)
}

/// Write a workspace document from a raw JSON string.
///
/// Uses atomic write (temp file + rename) so a reader never observes a
/// half-written document.
pub fn write_workspace_raw(name: &str, data: &str) -> Result<(), StorageError> {
    write_workspace_raw_in(&workspaces_dir(), name, data)
}

pub fn write_workspace_raw_in(dir: &Path, name: &str, data: &str) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(io_error(dir))?;
    let tmp = dir.join(format!(".{}.{}.tmp", name, EXTENSION));
    let path = workspace_path(dir, name);
    fs::write(&tmp, data).map_err(io_error(&tmp))?;
    fs::rename(&tmp, &path).map_err(io_error(&path))?;
    debug!(path = path.display().to_string().as_str(); "Workspace written");
    Ok(())
}

pub fn write_workspace(name: &str, workspace: &Workspace) -> Result<(), StorageError> {
    write_workspace_in(&workspaces_dir(), name, workspace)
}

pub fn write_workspace_in(dir: &Path, name: &str, workspace: &Workspace) -> Result<(), StorageError> {
    let json = workspace.to_json()?;
    write_workspace_raw_in(dir, name, &json)
}

/// Delete a workspace by name. Missing files are not an error.
pub fn delete_workspace(name: &str) -> Result<(), StorageError> {
    delete_workspace_in(&workspaces_dir(), name)
}

pub fn delete_workspace_in(dir: &Path, name: &str) -> Result<(), StorageError> {
    let path = workspace_path(dir, name);
    if path.exists() {
        fs::remove_file(&path).map_err(io_error(&path))
    } else {
        Ok(())
    }
}

/// Path of the settings file next to the stored workspaces.
pub fn settings_path() -> PathBuf {
    workspaces_dir().join(SETTINGS_FILE)
}
