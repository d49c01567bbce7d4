//! JSON persistence helpers for files under ~/.dino-run/.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = ".dino-run";

/// Get the ~/.dino-run/ directory path, creating it if needed.
pub fn app_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(APP_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Full path for `filename` inside ~/.dino-run/.
pub fn save_path(filename: &str) -> io::Result<PathBuf> {
    Ok(app_dir()?.join(filename))
}

/// Load `T` from `path`, falling back to `T::default()` if missing or invalid.
pub fn load_json_from<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("ignoring malformed {}: {}", path.display(), e);
            T::default()
        }),
        Err(_) => T::default(),
    }
}

/// Write `data` as pretty-printed JSON to `path`.
pub fn save_json_to<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

/// Load a JSON file from ~/.dino-run/, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(filename: &str) -> T {
    match save_path(filename) {
        Ok(path) => load_json_from(&path),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON to ~/.dino-run/.
pub fn save_json<T: serde::Serialize>(filename: &str, data: &T) -> io::Result<()> {
    save_json_to(&save_path(filename)?, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_path_format() {
        let path = save_path("test.json").expect("save_path should succeed");
        assert!(path.to_string_lossy().ends_with(".dino-run/test.json"));
    }

    #[test]
    fn test_load_missing_returns_default() {
        let val: Vec<String> = load_json_or_default("nonexistent_test_file_12345.json");
        assert!(val.is_empty());
    }

    #[test]
    fn test_save_and_load_at_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let data = vec!["hello".to_string(), "world".to_string()];
        save_json_to(&path, &data).unwrap();

        let loaded: Vec<String> = load_json_from(&path);
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_malformed_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{not json").unwrap();

        let loaded: Vec<String> = load_json_from(&path);
        assert!(loaded.is_empty());
    }
}
