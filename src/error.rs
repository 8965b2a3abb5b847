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

use std::path::PathBuf;
use thiserror::Error;

/// Why the camera could not be started. Produced once by the camera worker
/// so the rest of the program never inspects backend error strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraFailure {
    #[error("camera capture is not supported on this platform")]
    Unsupported,
    #[error("camera access was denied")]
    PermissionDenied,
    #[error("no camera device was found")]
    DeviceNotFound,
    #[error("camera is in use by another application")]
    DeviceBusy,
    #[error("camera cannot satisfy the requested format")]
    Unsatisfiable,
    #[error("camera access is blocked by a security restriction")]
    SecurityRestricted,
    #[error("camera error: {0}")]
    Other(String),
}

impl CameraFailure {
    pub fn i18n_key(&self) -> &'static str {
        match self {
            CameraFailure::Unsupported => "error-camera-unsupported",
            CameraFailure::PermissionDenied => "error-camera-permission-denied",
            CameraFailure::DeviceNotFound => "error-camera-not-found",
            CameraFailure::DeviceBusy => "error-camera-busy",
            CameraFailure::Unsatisfiable => "error-camera-constraints",
            CameraFailure::SecurityRestricted => "error-camera-security",
            CameraFailure::Other(_) => "error-camera-other",
        }
    }

    /// Sorts a backend error message into one of the known failure kinds.
    /// Anything unrecognised is kept verbatim as `Other`.
    pub fn from_message(msg: &str) -> Self {
        let lower = msg.to_lowercase();

        if lower.contains("permission")
            || lower.contains("denied")
            || lower.contains("not authorized")
            || lower.contains("authorization")
        {
            return CameraFailure::PermissionDenied;
        }

        if lower.contains("sandbox") || lower.contains("security") {
            return CameraFailure::SecurityRestricted;
        }

        if lower.contains("busy") || lower.contains("in use") || lower.contains("already open") {
            return CameraFailure::DeviceBusy;
        }

        if lower.contains("no device")
            || lower.contains("no such device")
            || lower.contains("device not found")
            || lower.contains("no camera")
        {
            return CameraFailure::DeviceNotFound;
        }

        if lower.contains("format")
            || lower.contains("resolution")
            || lower.contains("frame rate")
            || lower.contains("framerate")
        {
            return CameraFailure::Unsatisfiable;
        }

        CameraFailure::Other(msg.to_string())
    }
}

/// Failures of the load/save/resize operations. The `Display` text is what
/// the user sees.
#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid data URL")]
    InvalidDataUri,
    #[error("{0}")]
    Base64(#[from] base64::DecodeError),
    #[error("{0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("width and height must be positive whole numbers")]
pub struct DimensionError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
