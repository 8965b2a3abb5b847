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

use crate::error::CameraFailure;
use image::RgbImage;
use std::sync::Arc;

/// Every `Start` carries a fresh serial; everything the worker sends back
/// for that stream echoes it so replies to an abandoned start can be told
/// apart from the current one.
#[derive(Debug, PartialEq, Eq)]
pub enum CameraCommand {
    Start { serial: u64 },
    Stop,
}

pub enum CameraMessage {
    Started { serial: u64, width: u32, height: u32 },
    Failed { serial: u64, failure: CameraFailure },
    /// The stream died while it was running.
    Lost { serial: u64, detail: String },
    Stopped { serial: u64 },
}

/// Decoded frame at the camera's native resolution. Sent on its own
/// single-slot channel; the worker drops frames the UI hasn't picked up.
pub struct CameraFrame {
    pub serial: u64,
    pub image: Arc<RgbImage>,
}
