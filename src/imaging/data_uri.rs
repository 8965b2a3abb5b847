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

use crate::error::ImagingError;
use base64::{Engine as _, engine::general_purpose};
use image::{ImageFormat, RgbImage};
use std::{fmt, io::Cursor};

/// An image fully encoded in a standard raster format, carried around as a
/// `data:<mime>;base64,<body>` string.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn from_data_uri(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes)))
    }

    /// Lossless PNG encoding of a camera frame.
    pub fn from_rgb_png(frame: &RgbImage) -> Result<Self, ImagingError> {
        let mut out = Vec::new();
        frame.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
        Ok(Self::from_bytes("image/png", &out))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn mime(&self) -> Option<&str> {
        self.split().ok().map(|(mime, _)| mime)
    }

    /// Decodes the base64 body back into the encoded file bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ImagingError> {
        let (_, body) = self.split()?;
        Ok(general_purpose::STANDARD.decode(body)?)
    }

    fn split(&self) -> Result<(&str, &str), ImagingError> {
        let (header, body) = self.0.split_once(',').ok_or(ImagingError::InvalidDataUri)?;
        if body.contains(',') {
            return Err(ImagingError::InvalidDataUri);
        }

        header
            .strip_prefix("data:")
            .and_then(|h| h.strip_suffix(";base64"))
            .map(|mime| (mime, body))
            .ok_or(ImagingError::InvalidDataUri)
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the body can be megabytes long
        write!(f, "EncodedImage({:?}, {} bytes)", self.mime(), self.as_str().len())
    }
}
