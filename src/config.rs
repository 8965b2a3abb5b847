// Copyright (C) 2025 Joshua Kesler
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Optional settings file at `<config dir>/snapcam/config.toml`.

use crate::error::ConfigError;
use serde::Deserialize;
use std::{path::{Path, PathBuf}, time::Duration};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// UI language, e.g. "en-US" or "ja". Falls back to the OS locale.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub notice: NoticeConfig,
    #[serde(default)]
    pub save: SaveConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct CameraConfig {
    #[serde(default)]
    pub device: u32,
}

#[derive(Debug, Deserialize)]
pub struct NoticeConfig {
    #[serde(default = "default_notice_seconds")]
    pub seconds: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self { seconds: default_notice_seconds() }
    }
}

impl NoticeConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self { file_name: default_file_name() }
    }
}

fn default_notice_seconds() -> u64 {
    3
}

fn default_file_name() -> String {
    String::from("camera_capture.png")
}

impl Config {
    /// Reads the config file. A missing file gives the defaults; a file that
    /// exists but can't be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(PathBuf::from).or_else(default_path) {
            Some(p) => p,
            None => return Ok(Config::default()),
        };

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("snapcam").join("config.toml"))
}
