//! Retrieval of the published poll file.
//!
//! The download lands in the temp directory first. It only replaces the current
//! copy when there is no current copy or the content changed (SHA-256).

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// What a fetch did to the local poll file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No previous copy existed.
    Created,
    /// The remote content differs from the previous copy.
    Updated,
    /// The remote content matches the previous copy; nothing was replaced.
    Unchanged,
}

/// Download `url` and install it as `dir_current/file_name` if it changed.
pub fn fetch_poll_file(url: &str, dir_current: &Path, dir_temp: &Path, file_name: &str) -> Result<FetchOutcome, AppError> {
    let path_current = dir_current.join(file_name);
    let path_temp = dir_temp.join(file_name);
    tracing::info!(url, path = %path_current.display(), "fetching poll data");

    let body = download(url)?;
    fs::write(&path_temp, &body)
        .map_err(|e| AppError::fetch(format!("Failed to write '{}': {e}", path_temp.display())))?;

    install_if_changed(&path_temp, &path_current)
}

fn download(url: &str) -> Result<Vec<u8>, AppError> {
    let resp = Client::new()
        .get(url)
        .send()
        .map_err(|e| AppError::fetch(format!("Poll data request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::fetch(format!(
            "Poll data request failed with status {}.",
            resp.status()
        )));
    }

    let bytes = resp
        .bytes()
        .map_err(|e| AppError::fetch(format!("Failed to read poll data response: {e}")))?;
    Ok(bytes.to_vec())
}

/// Replace `current` with `temp` unless both have the same content.
///
/// `temp` is always consumed.
pub fn install_if_changed(temp: &Path, current: &Path) -> Result<FetchOutcome, AppError> {
    let new_bytes = read(temp)?;

    let outcome = match fs::read(current) {
        Err(_) => {
            tracing::info!("no previous poll data");
            FetchOutcome::Created
        }
        Ok(old_bytes) if digest(&old_bytes) != digest(&new_bytes) => {
            tracing::info!("poll data has changed");
            FetchOutcome::Updated
        }
        Ok(_) => {
            tracing::info!("poll data has not changed, nothing to do");
            remove(temp)?;
            return Ok(FetchOutcome::Unchanged);
        }
    };

    fs::write(current, &new_bytes)
        .map_err(|e| AppError::fetch(format!("Failed to write '{}': {e}", current.display())))?;
    remove(temp)?;
    Ok(outcome)
}

fn digest(bytes: &[u8]) -> Vec<u8> {
    Sha256::digest(bytes).to_vec()
}

fn read(path: &Path) -> Result<Vec<u8>, AppError> {
    fs::read(path).map_err(|e| AppError::fetch(format!("Failed to read '{}': {e}", path.display())))
}

fn remove(path: &Path) -> Result<(), AppError> {
    fs::remove_file(path).map_err(|e| AppError::fetch(format!("Failed to remove '{}': {e}", path.display())))
}

/// Path of the local poll file.
pub fn poll_file_path(dir_csv: &Path, file_name: &str) -> PathBuf {
    dir_csv.join(file_name)
}
