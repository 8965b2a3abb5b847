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

use crate::imaging::EncodedImage;
use std::{fmt, path::PathBuf};

#[derive(Debug)]
pub enum ImagingCommand {
    Load { path: PathBuf },
    Save { image: EncodedImage, path: PathBuf },
    Resize { image: EncodedImage, width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagingOp {
    Load,
    Save,
    Resize,
}

impl fmt::Display for ImagingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImagingOp::Load => write!(f, "load"),
            ImagingOp::Save => write!(f, "save"),
            ImagingOp::Resize => write!(f, "resize"),
        }
    }
}

#[derive(Debug)]
pub enum ImagingReply {
    Loaded { path: PathBuf, image: EncodedImage },
    Saved { path: PathBuf },
    Resized { image: EncodedImage, width: u32, height: u32 },
    Failed { op: ImagingOp, message: String },
}
