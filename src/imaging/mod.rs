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

mod data_uri;
mod ops;

pub use data_uri::EncodedImage;

use crate::messages::imaging::{ImagingCommand, ImagingOp, ImagingReply};
use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Runs load/save/resize requests one at a time off the UI thread. Exits
/// once the command channel is dropped.
pub fn start_thread(cmd_rx: Receiver<ImagingCommand>, reply_tx: Sender<ImagingReply>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new().name(String::from("imaging")).spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let reply = match cmd {
                ImagingCommand::Load { path } => match ops::load_image(&path) {
                    Ok(image) => {
                        log::info!("Loaded {} ({:?})", path.display(), image.mime());
                        ImagingReply::Loaded { path, image }
                    },
                    Err(e) => failed(ImagingOp::Load, e),
                },
                ImagingCommand::Save { image, path } => match ops::save_image(&image, &path) {
                    Ok(()) => {
                        log::info!("Saved image to {}", path.display());
                        ImagingReply::Saved { path }
                    },
                    Err(e) => failed(ImagingOp::Save, e),
                },
                ImagingCommand::Resize { image, width, height } => match ops::resize_image(&image, width, height) {
                    Ok((image, width, height)) => ImagingReply::Resized { image, width, height },
                    Err(e) => failed(ImagingOp::Resize, e),
                },
            };

            if reply_tx.send(reply).is_err() {
                break;
            }
        }
        log::debug!("Imaging thread exiting");
    })
}

fn failed(op: ImagingOp, err: crate::error::ImagingError) -> ImagingReply {
    log::error!("Image {} failed: {:?}", op, err);
    ImagingReply::Failed { op, message: err.to_string() }
}
