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

use super::data_uri::EncodedImage;
use crate::error::ImagingError;
use image::{ImageFormat, imageops::FilterType};
use std::{fs, io::Cursor, path::Path};

fn mime_for(path: &Path, bytes: &[u8]) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => match image::guess_format(bytes) {
            Ok(fmt) => fmt.to_mime_type(),
            Err(_) => "image/png",
        },
    }
}

pub fn load_image(path: &Path) -> Result<EncodedImage, ImagingError> {
    let contents = fs::read(path)?;
    Ok(EncodedImage::from_bytes(mime_for(path, &contents), &contents))
}

/// Writes the payload's bytes as they are; nothing is re-encoded.
pub fn save_image(image: &EncodedImage, path: &Path) -> Result<(), ImagingError> {
    let bytes = image.decode()?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Fits the image inside `width`x`height` keeping its aspect ratio and
/// returns it as PNG along with the size it ended up at.
pub fn resize_image(image: &EncodedImage, width: u32, height: u32) -> Result<(EncodedImage, u32, u32), ImagingError> {
    let decoded = image::load_from_memory(&image.decode()?)?;
    let resized = decoded.resize(width, height, FilterType::Lanczos3);

    let mut output = Vec::new();
    resized.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok((EncodedImage::from_bytes("image/png", &output), resized.width(), resized.height()))
}
