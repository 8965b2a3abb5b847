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

//! The capture/edit session: which camera stream is live, which image is
//! current, what the window shows, and what to tell the user.

use crate::{
    error::{CameraFailure, DimensionError},
    i18n::I18n,
    imaging::EncodedImage,
    messages::{camera::{CameraCommand, CameraFrame, CameraMessage}, imaging::{ImagingCommand, ImagingOp, ImagingReply}},
    notice::NoticeBoard,
    picker::FilePicker,
};
use crossbeam_channel::{Receiver, Sender};
use image::RgbImage;
use std::{sync::Arc, time::{Duration, Instant}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Empty,
    LiveCamera,
    StillImage,
}

/// Intents that wait on a worker reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    StartCamera,
    Load,
    Save,
    Resize,
}

pub struct CameraSession {
    pub width: u32,
    pub height: u32,
    latest: Option<Arc<RgbImage>>,
    frame_serial: u64,
}

pub struct Session {
    camera_tx: Sender<CameraCommand>,
    camera_rx: Receiver<CameraMessage>,
    frame_rx: Receiver<CameraFrame>,
    imaging_tx: Sender<ImagingCommand>,
    imaging_rx: Receiver<ImagingReply>,
    camera: Option<CameraSession>,
    /// Serial of the most recent `Start`; camera replies carrying any other
    /// serial belong to an abandoned stream.
    start_serial: u64,
    current: Option<EncodedImage>,
    image_serial: u64,
    view: View,
    pending: Option<Pending>,
    notices: NoticeBoard,
    i18n: I18n,
}

impl Session {
    pub fn new(
        camera_tx: Sender<CameraCommand>,
        camera_rx: Receiver<CameraMessage>,
        frame_rx: Receiver<CameraFrame>,
        imaging_tx: Sender<ImagingCommand>,
        imaging_rx: Receiver<ImagingReply>,
        i18n: I18n,
        notice_duration: Duration,
    ) -> Self {
        let mut notices = NoticeBoard::new(notice_duration);
        notices.info(i18n.tr("status-ready"));
        Self {
            camera_tx,
            camera_rx,
            frame_rx,
            imaging_tx,
            imaging_rx,
            camera: None,
            start_serial: 0,
            current: None,
            image_serial: 0,
            view: View::Empty,
            pending: None,
            notices,
            i18n,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn camera(&self) -> Option<&CameraSession> {
        self.camera.as_ref()
    }

    pub fn is_camera_live(&self) -> bool {
        self.camera.is_some()
    }

    pub fn current_image(&self) -> Option<&EncodedImage> {
        self.current.as_ref()
    }

    /// Bumped every time the current image is replaced.
    pub fn image_serial(&self) -> u64 {
        self.image_serial
    }

    /// The newest camera frame and a counter that changes with each frame.
    pub fn latest_frame(&self) -> Option<(&Arc<RgbImage>, u64)> {
        let cam = self.camera.as_ref()?;
        cam.latest.as_ref().map(|f| (f, cam.frame_serial))
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    fn is_idle(&mut self) -> bool {
        match self.pending {
            None => true,
            Some(p) => {
                log::debug!("Ignoring request while {:?} is in flight", p);
                self.notices.info(self.i18n.tr("status-busy"));
                false
            }
        }
    }

    fn report_error(&mut self, key: &str, detail: Option<&str>) {
        let text = match detail {
            Some(d) => self.i18n.tr_args(key, &[("detail", d.to_string())]),
            None => self.i18n.tr(key),
        };
        log::error!("{} ({})", text, detail.unwrap_or(key));
        self.notices.error(text);
    }

    fn replace_image(&mut self, image: EncodedImage) {
        self.current = Some(image);
        self.image_serial += 1;
        self.view = View::StillImage;
    }

    pub fn start_camera(&mut self) {
        if self.camera.is_some() {
            log::debug!("Camera already running");
            return;
        }
        if !self.is_idle() {
            return;
        }

        self.start_serial += 1;
        if self.camera_tx.send(CameraCommand::Start { serial: self.start_serial }).is_err() {
            self.report_error(CameraFailure::Unsupported.i18n_key(), None);
            return;
        }
        self.pending = Some(Pending::StartCamera);
        self.notices.info(self.i18n.tr("status-camera-requesting"));
    }

    pub fn stop_camera(&mut self) {
        if self.pending == Some(Pending::StartCamera) {
            log::info!("Cancelling camera start");
            let _ = self.camera_tx.send(CameraCommand::Stop);
            self.pending = None;
            self.view = View::Empty;
            self.notices.info(self.i18n.tr("status-camera-stopped"));
            return;
        }

        if self.camera.take().is_none() {
            log::debug!("Stop requested with no camera running");
            return;
        }

        let _ = self.camera_tx.send(CameraCommand::Stop);
        self.view = View::Empty;
        self.notices.info(self.i18n.tr("status-camera-stopped"));
    }

    /// Takes the newest frame as the current image and ends the camera session.
    pub fn capture_photo(&mut self) {
        if self.camera.is_none() {
            self.report_error("error-camera-not-started", None);
            return;
        }
        if !self.is_idle() {
            return;
        }

        let Some(frame) = self.camera.as_ref().and_then(|c| c.latest.clone()) else {
            self.report_error("error-capture-no-frame", None);
            return;
        };

        match EncodedImage::from_rgb_png(&frame) {
            Ok(image) => {
                self.replace_image(image);
                self.camera = None;
                let _ = self.camera_tx.send(CameraCommand::Stop);
                log::info!("Captured {}x{} photo", frame.width(), frame.height());
                self.notices.info(self.i18n.tr("status-photo-captured"));
            },
            Err(e) => self.report_error("error-capture-failed", Some(&e.to_string())),
        }
    }

    pub fn load_image(&mut self, picker: &mut dyn FilePicker) {
        if !self.is_idle() {
            return;
        }
        let Some(path) = picker.pick_image() else {
            return;
        };

        self.send_imaging(Pending::Load, ImagingCommand::Load { path });
    }

    pub fn save_image(&mut self, picker: &mut dyn FilePicker) {
        let Some(image) = self.current.clone() else {
            self.report_error("error-no-image-to-save", None);
            return;
        };
        if !self.is_idle() {
            return;
        }
        let Some(path) = picker.pick_save_path() else {
            return;
        };

        self.send_imaging(Pending::Save, ImagingCommand::Save { image, path });
    }

    /// `width` and `height` are the raw text the user typed.
    pub fn resize_image(&mut self, width: &str, height: &str) {
        let Some(image) = self.current.clone() else {
            self.report_error("error-no-image-to-resize", None);
            return;
        };
        let (width, height) = match parse_dimensions(width, height) {
            Ok(dims) => dims,
            Err(e) => {
                log::debug!("Rejected resize input: {}", e);
                self.notices.error(self.i18n.tr("error-invalid-dimensions"));
                return;
            }
        };
        if !self.is_idle() {
            return;
        }

        self.send_imaging(Pending::Resize, ImagingCommand::Resize { image, width, height });
    }

    fn send_imaging(&mut self, pending: Pending, cmd: ImagingCommand) {
        if self.imaging_tx.send(cmd).is_err() {
            let key = match pending {
                Pending::Load => "error-load-failed",
                Pending::Save => "error-save-failed",
                _ => "error-resize-failed",
            };
            self.report_error(key, Some("image service is not running"));
            return;
        }
        self.pending = Some(pending);
    }

    /// Applies whatever the workers have sent since the last call and expires
    /// old notices.
    pub fn poll(&mut self, now: Instant) {
        while let Ok(msg) = self.camera_rx.try_recv() {
            self.on_camera(msg);
        }
        while let Ok(frame) = self.frame_rx.try_recv() {
            self.on_frame(frame);
        }
        while let Ok(reply) = self.imaging_rx.try_recv() {
            self.on_imaging(reply);
        }
        self.notices.prune(now);
    }

    fn on_camera(&mut self, msg: CameraMessage) {
        match msg {
            CameraMessage::Started { serial, width, height } => {
                if serial != self.start_serial || self.pending != Some(Pending::StartCamera) {
                    // the start was cancelled; its queued Stop shuts the stream down
                    log::debug!("Ignoring camera start #{}", serial);
                    return;
                }
                self.pending = None;
                self.camera = Some(CameraSession { width, height, latest: None, frame_serial: 0 });
                self.view = View::LiveCamera;
                self.notices.info(self.i18n.tr("status-camera-started"));
            },
            CameraMessage::Failed { serial, failure } => {
                if serial != self.start_serial || self.pending != Some(Pending::StartCamera) {
                    log::info!("Cancelled camera start #{} failed: {:?}", serial, failure);
                    return;
                }
                self.pending = None;
                match &failure {
                    CameraFailure::Other(detail) => self.report_error(failure.i18n_key(), Some(detail.as_str())),
                    _ => self.report_error(failure.i18n_key(), None),
                }
            },
            CameraMessage::Lost { serial, detail } => {
                if serial == self.start_serial && self.camera.take().is_some() {
                    self.view = View::Empty;
                    self.report_error("error-camera-lost", Some(detail.as_str()));
                }
            },
            CameraMessage::Stopped { serial } => {
                if serial == self.start_serial && self.camera.take().is_some() {
                    log::warn!("Camera stopped without being asked to");
                    self.view = View::Empty;
                    self.notices.info(self.i18n.tr("status-camera-stopped"));
                } else {
                    log::debug!("Camera worker confirmed stop of #{}", serial);
                }
            },
        }
    }

    fn on_frame(&mut self, frame: CameraFrame) {
        if frame.serial != self.start_serial {
            return;
        }
        if let Some(cam) = self.camera.as_mut() {
            cam.latest = Some(frame.image);
            cam.frame_serial += 1;
        }
    }

    fn on_imaging(&mut self, reply: ImagingReply) {
        self.pending = None;
        match reply {
            ImagingReply::Loaded { path, image } => {
                log::info!("Showing {}", path.display());
                self.replace_image(image);
                self.notices.info(self.i18n.tr("status-image-loaded"));
            },
            ImagingReply::Saved { path } => {
                let text = self.i18n.tr_args("status-image-saved", &[("path", path.display().to_string())]);
                self.notices.info(text);
            },
            ImagingReply::Resized { image, width, height } => {
                self.replace_image(image);
                let text = self.i18n.tr_args("status-image-resized", &[("width", width.to_string()), ("height", height.to_string())]);
                self.notices.info(text);
            },
            ImagingReply::Failed { op, message } => {
                let key = match op {
                    ImagingOp::Load => "error-load-failed",
                    ImagingOp::Save => "error-save-failed",
                    ImagingOp::Resize => "error-resize-failed",
                };
                self.report_error(key, Some(&message));
            },
        }
    }

    /// Stops any live or starting camera. Called when the window closes.
    pub fn shutdown(&mut self) {
        if self.camera.take().is_some() || self.pending == Some(Pending::StartCamera) {
            log::info!("Stopping camera on exit");
            let _ = self.camera_tx.send(CameraCommand::Stop);
        }
        self.pending = None;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn parse_dimension(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

pub fn parse_dimensions(width: &str, height: &str) -> Result<(u32, u32), DimensionError> {
    match (parse_dimension(width), parse_dimension(height)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(DimensionError),
    }
}

#[cfg(test)]
mod tests;
