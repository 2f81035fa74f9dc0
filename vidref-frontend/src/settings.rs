/* This file is part of the Video Reference Browser project - https://github.com/vidref/vidref-browser
*
*  Copyright (C) 2025 the Video Reference Browser contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::{num::NonZeroUsize, rc::Rc};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::built_info;
use crate::player::TiktokPlayerVariant;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: Rc<str>,
    pub entries_per_page: NonZeroUsize,
    /// 0 applies the search text on every keystroke
    pub search_debounce_ms: u32,
    pub autoplay_in_list: bool,
    pub tiktok_player_variant: TiktokPlayerVariant,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: built_info::DEFAULT_API_URL.into(),
            entries_per_page: NonZeroUsize::new(24).expect("24 should be a valid NonZeroUsize"),
            search_debounce_ms: 500,
            autoplay_in_list: true,
            tiktok_player_variant: TiktokPlayerVariant::default(),
        }
    }
}

impl Settings {
    /// The API base as a joinable URL, falling back to the built-in default if the stored value is broken
    pub fn api_base(&self) -> Url {
        parse_base(&self.api_base_url)
            .or_else(|| parse_base(built_info::DEFAULT_API_URL))
            .expect("the built-in API URL should be valid")
    }
}

fn parse_base(url: &str) -> Option<Url> {
    let mut url = Url::parse(url).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    // relative joins drop the last segment otherwise
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"entries_per_page": 48}"#).unwrap();
        assert_eq!(settings.entries_per_page.get(), 48);
        assert_eq!(settings.search_debounce_ms, 500);
        assert!(settings.autoplay_in_list);
        assert_eq!(settings.tiktok_player_variant, TiktokPlayerVariant::EmbedV2);
    }

    #[test]
    fn api_base_gets_a_trailing_slash() {
        let settings = Settings { api_base_url: "https://example.com/api".into(), ..Settings::default() };
        assert_eq!(settings.api_base().as_str(), "https://example.com/api/");
    }

    #[test]
    fn broken_api_base_falls_back_to_the_default() {
        let settings = Settings { api_base_url: "not a url".into(), ..Settings::default() };
        assert_eq!(settings.api_base().as_str(), built_info::DEFAULT_API_URL);
    }
}
