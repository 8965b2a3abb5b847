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

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
    shown_at: Instant,
}

/// The single status line. A newer notice replaces the old one; each
/// disappears on its own after `duration`.
pub struct NoticeBoard {
    current: Option<Notice>,
    duration: Duration,
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self { current: None, duration }
    }

    pub fn info(&mut self, text: String) {
        self.push(text, Severity::Info, Instant::now());
    }

    pub fn error(&mut self, text: String) {
        self.push(text, Severity::Error, Instant::now());
    }

    pub fn push(&mut self, text: String, severity: Severity, now: Instant) {
        self.current = Some(Notice { text, severity, shown_at: now });
    }

    pub fn visible_at(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|n| now.saturating_duration_since(n.shown_at) < self.duration)
    }

    /// The latest notice, expired or not.
    pub fn last(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn prune(&mut self, now: Instant) {
        if self.visible_at(now).is_none() {
            self.current = None;
        }
    }
}
