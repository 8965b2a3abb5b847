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

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];
pub const SAVE_EXTENSIONS: &[&str] = &["png"];

/// Native file dialogs. `None` means the user picked nothing.
pub trait FilePicker {
    fn pick_image(&mut self) -> Option<PathBuf>;
    fn pick_save_path(&mut self) -> Option<PathBuf>;
}

pub struct RfdPicker {
    image_filter: String,
    png_filter: String,
    default_file_name: String,
    last_dir: Option<PathBuf>,
}

impl RfdPicker {
    pub fn new(image_filter: String, png_filter: String, default_file_name: String) -> Self {
        Self { image_filter, png_filter, default_file_name, last_dir: None }
    }

    fn dialog(&self) -> rfd::FileDialog {
        match &self.last_dir {
            Some(dir) => rfd::FileDialog::new().set_directory(dir),
            None => rfd::FileDialog::new(),
        }
    }

    fn remember(&mut self, picked: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(dir) = picked.as_ref().and_then(|p| p.parent()) {
            self.last_dir = Some(dir.to_path_buf());
        }
        picked
    }
}

impl FilePicker for RfdPicker {
    fn pick_image(&mut self) -> Option<PathBuf> {
        let picked = self.dialog().add_filter(&self.image_filter, IMAGE_EXTENSIONS).pick_file();
        self.remember(picked)
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        let picked = self.dialog()
            .add_filter(&self.png_filter, SAVE_EXTENSIONS)
            .set_file_name(&self.default_file_name)
            .save_file();
        self.remember(picked)
    }
}
