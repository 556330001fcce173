use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// RapidAPI key for OpenCritic: the trimmed contents of a one-line text file.
pub fn load_api_key(path: &Path) -> Result<String, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::CredentialUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let key = raw.trim();
    if key.is_empty() {
        return Err(ConfigError::CredentialEmpty {
            path: path.to_path_buf(),
        });
    }
    Ok(key.to_string())
}
