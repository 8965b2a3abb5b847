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

//! Localized strings, loaded from the `.ftl` files embedded at build time.

use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

const DEFAULT_LOCALE: &str = "en-US";

pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    current_locale: LanguageIdentifier,
}

impl I18n {
    /// `preferred` usually comes from the config file; the OS locale is
    /// tried next, then en-US.
    pub fn new(preferred: Option<&str>) -> Self {
        let mut bundles = HashMap::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale) = filename.strip_suffix(".ftl").and_then(|s| s.parse::<LanguageIdentifier>().ok()) else {
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };

            let source = String::from_utf8_lossy(content.data.as_ref()).to_string();
            let res = match FluentResource::try_new(source) {
                Ok(res) => res,
                Err((_, errors)) => {
                    log::warn!("Skipping {}: {:?}", filename, errors);
                    continue;
                }
            };

            let mut bundle = FluentBundle::new(vec![locale.clone()]);
            bundle.set_use_isolating(false);
            if let Err(errors) = bundle.add_resource(res) {
                log::warn!("Duplicate messages in {}: {:?}", filename, errors);
            }
            bundles.insert(locale, bundle);
        }

        let available: Vec<LanguageIdentifier> = bundles.keys().cloned().collect();
        let current_locale = resolve_locale(preferred, sys_locale::get_locale().as_deref(), &available)
            .unwrap_or_else(default_locale);
        log::debug!("Using locale {}", current_locale);

        Self { bundles, current_locale }
    }

    pub fn locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    pub fn tr(&self, key: &str) -> String {
        self.format(key, None)
    }

    pub fn tr_args(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut fargs = FluentArgs::new();
        for (name, value) in args {
            fargs.set(*name, value.clone());
        }
        self.format(key, Some(&fargs))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(bundle) = self.bundles.get(&self.current_locale) {
            if let Some(msg) = bundle.get_message(key) {
                if let Some(pattern) = msg.value() {
                    let mut errors = vec![];
                    let value = bundle.format_pattern(pattern, args, &mut errors);
                    if errors.is_empty() {
                        return value.to_string();
                    }
                    log::warn!("Formatting '{}' failed: {:?}", key, errors);
                }
            }
        }
        format!("MISSING: {}", key)
    }
}

fn default_locale() -> LanguageIdentifier {
    DEFAULT_LOCALE.parse().unwrap_or_default()
}

/// Exact match first, then the first available locale sharing the language
/// ("ja-JP" picks "ja").
fn resolve_locale(preferred: Option<&str>, os_locale: Option<&str>, available: &[LanguageIdentifier]) -> Option<LanguageIdentifier> {
    [preferred, os_locale, Some(DEFAULT_LOCALE)]
        .into_iter()
        .flatten()
        .filter_map(|s| s.parse::<LanguageIdentifier>().ok())
        .find_map(|wanted| {
            available.iter().find(|l| **l == wanted).or_else(|| {
                available.iter().find(|l| l.language == wanted.language)
            }).cloned()
        })
}
