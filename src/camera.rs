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

use crate::{error::CameraFailure, messages::camera::{CameraCommand, CameraFrame, CameraMessage}};
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use nokhwa::{Camera, NokhwaError, pixel_format::RgbFormat, query, utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType}};
use std::{sync::Arc, thread::{self, JoinHandle}};

const MAX_FRAME_ERRORS: u32 = 30;

enum StreamEnd {
    Stopped,
    Lost(String),
    Disconnected,
}

/// Owns the physical camera. Waits for `Start`, streams frames until `Stop`,
/// then waits again. Exits when the command channel is dropped.
///
/// `frame_tx` should be a bounded channel: frames that don't fit are dropped
/// rather than queued.
pub fn start_camera_thread(
    tx: Sender<CameraMessage>,
    frame_tx: Sender<CameraFrame>,
    cmd_rx: Receiver<CameraCommand>,
    device: u32,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new().name(String::from("camera")).spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                CameraCommand::Start { serial } => {
                    let mut camera = match open_camera(device) {
                        Ok(c) => c,
                        Err(failure) => {
                            log::error!("Camera {} failed to start: {:?}", device, failure);
                            let _ = tx.send(CameraMessage::Failed { serial, failure });
                            continue;
                        }
                    };

                    let res = camera.resolution();
                    log::info!("Camera started: {} ({}x{} @ {}fps)", camera.info().human_name(), res.width(), res.height(), camera.frame_rate());
                    let _ = tx.send(CameraMessage::Started { serial, width: res.width(), height: res.height() });

                    let end = stream(&mut camera, serial, &frame_tx, &cmd_rx);
                    if let Err(e) = camera.stop_stream() {
                        log::warn!("Camera stream did not shut down cleanly: {}", e);
                    }

                    match end {
                        StreamEnd::Stopped => { let _ = tx.send(CameraMessage::Stopped { serial }); },
                        StreamEnd::Lost(detail) => { let _ = tx.send(CameraMessage::Lost { serial, detail }); },
                        StreamEnd::Disconnected => break,
                    }
                    log::info!("Camera stopped");
                },
                CameraCommand::Stop => {},
            }
        }
        log::debug!("Camera thread exiting");
    })
}

fn stream(camera: &mut Camera, serial: u64, frame_tx: &Sender<CameraFrame>, cmd_rx: &Receiver<CameraCommand>) -> StreamEnd {
    let mut errors = 0;
    loop {
        match cmd_rx.try_recv() {
            Ok(CameraCommand::Stop) => return StreamEnd::Stopped,
            Ok(CameraCommand::Start { .. }) | Err(TryRecvError::Empty) => {},
            Err(TryRecvError::Disconnected) => return StreamEnd::Disconnected,
        }

        match camera.frame() {
            Ok(frame) => {
                errors = 0;
                match frame.decode_image::<RgbFormat>() {
                    Ok(decoded) => match frame_tx.try_send(CameraFrame { serial, image: Arc::new(decoded) }) {
                        Ok(()) | Err(TrySendError::Full(_)) => {},
                        Err(TrySendError::Disconnected(_)) => return StreamEnd::Disconnected,
                    },
                    Err(e) => log::warn!("Dropped undecodable frame: {}", e),
                }
            },
            Err(e) => {
                errors += 1;
                log::warn!("Frame read failed ({}/{}): {}", errors, MAX_FRAME_ERRORS, e);
                if errors >= MAX_FRAME_ERRORS {
                    return StreamEnd::Lost(e.to_string());
                }
            }
        }
    }
}

fn open_camera(device: u32) -> Result<Camera, CameraFailure> {
    let devices = query(ApiBackend::Auto).map_err(|e| classify(&e))?;
    if devices.is_empty() {
        return Err(CameraFailure::DeviceNotFound);
    }

    // video only, whatever the device does best
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
    let mut camera = Camera::new(CameraIndex::Index(device), requested).map_err(|e| classify(&e))?;
    camera.open_stream().map_err(|e| classify(&e))?;
    Ok(camera)
}

fn classify(err: &NokhwaError) -> CameraFailure {
    match err {
        NokhwaError::UnsupportedOperationError(_) | NokhwaError::NotImplementedError(_) => CameraFailure::Unsupported,
        NokhwaError::SetPropertyError { .. } => CameraFailure::Unsatisfiable,
        other => CameraFailure::from_message(&other.to_string()),
    }
}
