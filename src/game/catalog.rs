//! Obstacle catalog: the visual variants obstacles are drawn from.
//!
//! The catalog is a JSON manifest with two lists, `normal` for ground
//! obstacles and `high` for elevated ones. A built-in manifest ships with the
//! binary; a replacement can be loaded from disk.

use super::types::Placement;
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../assets/obstacles.json");

/// One visual variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleVariant {
    pub name: String,
    /// Character used by the terminal renderer.
    pub glyph: char,
    /// RGB foreground color.
    #[serde(default = "default_color")]
    pub color: [u8; 3],
}

fn default_color() -> [u8; 3] {
    [200, 200, 200]
}

/// Variants partitioned by placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleCatalog {
    pub normal: Vec<ObstacleVariant>,
    pub high: Vec<ObstacleVariant>,
}

impl ObstacleCatalog {
    /// The manifest compiled into the binary.
    pub fn builtin() -> Result<Self, GameError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a manifest.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read a manifest from disk. A missing file is an asset that is not ready;
    /// any other read failure is passed through as I/O.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(GameError::AssetNotReady(format!(
                    "no obstacle catalog at {}",
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_json(&json)
    }

    /// Both categories must have at least one variant.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.normal.is_empty() {
            return Err(GameError::AssetNotReady(
                "catalog has no ground obstacles".to_string(),
            ));
        }
        if self.high.is_empty() {
            return Err(GameError::AssetNotReady(
                "catalog has no elevated obstacles".to_string(),
            ));
        }
        Ok(())
    }

    pub fn variants(&self, placement: Placement) -> &[ObstacleVariant] {
        match placement {
            Placement::Ground => &self.normal,
            Placement::Elevated => &self.high,
        }
    }

    pub fn variant(&self, placement: Placement, index: usize) -> Option<&ObstacleVariant> {
        self.variants(placement).get(index)
    }
}
