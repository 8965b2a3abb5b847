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

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod camera;
mod config;
mod error;
mod i18n;
mod imaging;
mod messages;
mod notice;
mod picker;
mod session;

use anyhow::Context;
use config::Config;
use crossbeam_channel::{bounded, unbounded};
use eframe::NativeOptions;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load(None).unwrap_or_else(|e| {
        log::warn!("{}; using defaults", e);
        Config::default()
    });
    let i18n = i18n::I18n::new(config.language.as_deref());
    log::info!("Starting with locale {}", i18n.locale());

    let (cam_command_tx, cam_command_rx) = unbounded();
    let (cam_tx, cam_rx) = unbounded();
    let (frame_tx, frame_rx) = bounded(1);
    let (img_command_tx, img_command_rx) = unbounded();
    let (img_reply_tx, img_reply_rx) = unbounded();
    camera::start_camera_thread(cam_tx, frame_tx, cam_command_rx, config.camera.device).context("failed to spawn camera thread")?;
    imaging::start_thread(img_command_rx, img_reply_tx).context("failed to spawn imaging thread")?;

    let picker = picker::RfdPicker::new(i18n.tr("dialog-image-filter"), i18n.tr("dialog-png-filter"), config.save.file_name.clone());
    let session = session::Session::new(cam_command_tx, cam_rx, frame_rx, img_command_tx, img_reply_rx, i18n, config.notice.duration());

    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([800.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native("SnapCam", options, Box::new(|cc| {
        Ok(Box::new(app::SnapApp::new(cc, session, picker)))
    }))
    .map_err(|e| anyhow::anyhow!("failed to run application: {}", e))
}
