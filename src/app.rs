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

use crate::{notice::Severity, picker::RfdPicker, session::{Session, View}};
use eframe::{egui, App, Frame};
use std::time::{Duration, Instant};

pub struct SnapApp {
    session: Session,
    picker: RfdPicker,
    width_input: String,
    height_input: String,
    camera_texture: Option<(u64, egui::TextureHandle)>,
    still_texture: Option<(u64, Option<egui::TextureHandle>)>,
}

impl SnapApp {
    pub fn new(_cc: &eframe::CreationContext, session: Session, picker: RfdPicker) -> Self {
        Self {
            session,
            picker,
            width_input: String::new(),
            height_input: String::new(),
            camera_texture: None,
            still_texture: None,
        }
    }
}

impl App for SnapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let now = Instant::now();
        self.session.poll(now);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_controls(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(notice) = self.session.notices().visible_at(now) {
                let color = match notice.severity {
                    Severity::Info => egui::Color32::from_rgb(40, 160, 70),
                    Severity::Error => egui::Color32::RED,
                };
                ui.colored_label(color, &notice.text);
            } else {
                ui.label("");
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.session.view() {
                View::Empty => {
                    ui.centered_and_justified(|ui| {
                        ui.label(self.session.i18n().tr("placeholder-empty"));
                    });
                },
                View::LiveCamera => self.show_camera(ctx, ui),
                View::StillImage => self.show_still(ctx, ui),
            }
        });

        if self.session.is_camera_live() || self.session.pending().is_some() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

impl SnapApp {
    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let tr = |key: &str| self.session.i18n().tr(key);
        let start = tr("button-start-camera");
        let stop = tr("button-stop-camera");
        let capture = tr("button-capture");
        let load = tr("button-load");
        let save = tr("button-save");
        let resize = tr("button-resize");
        let width = tr("label-width");
        let height = tr("label-height");

        ui.horizontal_wrapped(|ui| {
            if self.session.is_camera_live() {
                if ui.button(stop).clicked() {
                    self.session.stop_camera();
                }
                if ui.button(capture).clicked() {
                    self.session.capture_photo();
                }
            } else if ui.button(start).clicked() {
                self.session.start_camera();
            }

            ui.separator();
            if ui.button(load).clicked() {
                self.session.load_image(&mut self.picker);
            }
            if ui.button(save).clicked() {
                self.session.save_image(&mut self.picker);
            }

            ui.separator();
            ui.label(width);
            ui.add(egui::TextEdit::singleline(&mut self.width_input).desired_width(60.0));
            ui.label(height);
            ui.add(egui::TextEdit::singleline(&mut self.height_input).desired_width(60.0));
            if ui.button(resize).clicked() {
                self.session.resize_image(&self.width_input, &self.height_input);
            }

            if self.session.pending().is_some() {
                ui.spinner();
            }
        });
    }

    fn show_camera(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let Some((frame, serial)) = self.session.latest_frame() else {
            ui.centered_and_justified(|ui| { ui.spinner(); });
            return;
        };

        let stale = self.camera_texture.as_ref().is_none_or(|(s, _)| *s != serial);
        if stale {
            let img = egui::ColorImage::from_rgb([frame.width() as usize, frame.height() as usize], frame.as_raw());
            match &mut self.camera_texture {
                Some((s, texture)) => {
                    texture.set(img, Default::default());
                    *s = serial;
                },
                None => self.camera_texture = Some((serial, ctx.load_texture("camera", img, Default::default()))),
            }
        }

        if let Some(cam) = self.session.camera() {
            ui.label(format!("{}x{}", cam.width, cam.height));
        }
        if let Some((_, texture)) = &self.camera_texture {
            fit_texture(ui, texture);
        }
    }

    fn show_still(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let serial = self.session.image_serial();
        if self.still_texture.as_ref().is_none_or(|(s, _)| *s != serial) {
            let texture = self.session.current_image().and_then(|encoded| {
                let bytes = encoded.decode().ok()?;
                match image::load_from_memory(&bytes) {
                    Ok(decoded) => {
                        let rgba = decoded.to_rgba8();
                        let img = egui::ColorImage::from_rgba_unmultiplied([rgba.width() as usize, rgba.height() as usize], rgba.as_raw());
                        Some(ctx.load_texture(format!("still-{}", serial), img, Default::default()))
                    },
                    Err(e) => {
                        log::warn!("Cannot preview current image: {}", e);
                        None
                    }
                }
            });
            self.still_texture = Some((serial, texture));
        }

        match &self.still_texture {
            Some((_, Some(texture))) => fit_texture(ui, texture),
            _ => {
                ui.centered_and_justified(|ui| {
                    ui.label(self.session.i18n().tr("placeholder-preview-unavailable"));
                });
            }
        }
    }
}

fn fit_texture(ui: &mut egui::Ui, texture: &egui::TextureHandle) {
    let size = texture.size_vec2();
    let aspect = size.x / size.y;
    let available_w = ui.available_width();
    let available_h = ui.available_height();

    let (w, h) = if available_w / aspect <= available_h {
        (available_w, available_w / aspect)
    } else {
        (available_h * aspect, available_h)
    };

    ui.centered_and_justified(|ui| {
        ui.add(egui::Image::new(texture).fit_to_exact_size(egui::vec2(w, h)));
    });
}
