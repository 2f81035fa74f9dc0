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
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use reqwest::{Client, Url};

use crate::built_info;

pub static REQWEST_CLIENT: LazyLock<Client> = LazyLock::new(Client::new);

// Data based on build-time constants

pub static VERSION_STRING: LazyLock<&'static str>                  = LazyLock::new(create_version_string);
pub static COMMIT_LINK:    LazyLock<&'static str>                  = LazyLock::new(create_commit_link);
pub static BUILD_TIME:     LazyLock<Option<DateTime<FixedOffset>>> = LazyLock::new(|| DateTime::parse_from_rfc2822(built_info::BUILT_TIME_UTC).ok());
pub static COMMIT_TIME:    LazyLock<Option<DateTime<FixedOffset>>> = LazyLock::new(|| built_info::GIT_COMMIT_TIMESTAMP.and_then(|t| DateTime::parse_from_rfc3339(t).ok()));

// Embed provider URLs

pub static YOUTUBE_EMBED_URL:   LazyLock<Url> = LazyLock::new(|| Url::parse("https://www.youtube.com/embed/").expect("should be able to parse the youtube embed url"));
pub static TIKTOK_EMBED_URL:    LazyLock<Url> = LazyLock::new(|| Url::parse("https://www.tiktok.com/embed/v2/").expect("should be able to parse the tiktok embed url"));
pub static TIKTOK_PLAYER_URL:   LazyLock<Url> = LazyLock::new(|| Url::parse("https://www.tiktok.com/player/v1/").expect("should be able to parse the tiktok player url"));
pub static FACEBOOK_PLUGIN_URL: LazyLock<Url> = LazyLock::new(|| Url::parse("https://www.facebook.com/plugins/video.php").expect("should be able to parse the facebook video plugin url"));
pub const FACEBOOK_ORIGIN: &str           = "https://www.facebook.com";
pub const FACEBOOK_EMBED_WIDTH: &str      = "400";
pub const INSTAGRAM_EMBED_SCRIPT: &str    = "https://www.instagram.com/embed.js";
pub const INSTAGRAM_EMBED_VERSION: &str   = "14";

// Local storage keys

pub const AUTH_TOKEN_KEY: &str          = "auth_token";
pub const SETTINGS_KEY: &str            = "settings";
/// Not namespaced per user, all accounts on a browser share the tree layout
pub const EXPANDED_CATEGORIES_KEY: &str = "expandedCategories";

// Timing

pub const LAZY_LOAD_SETTLE_MS: u32     = 300;
pub const LAZY_LOAD_ROOT_MARGIN: &str  = "200px";
pub const LAZY_LOAD_THRESHOLD: f64     = 0.25;
pub const INFINITE_SCROLL_ROOT_MARGIN: &str = "400px";
pub const VERIFICATION_RESEND_SECS: u32 = 60;
pub const SWIPE_THRESHOLD: f64          = 120.0;
pub const SWIPE_IDLE_RESET_MS: f64      = 250.0;
pub const SWIPE_COOLDOWN_MS: f64        = 600.0;

// Regexes

pub static NON_DIGIT_REGEX:         LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").expect("NON_DIGIT_REGEX should be valid"));
pub static VERIFICATION_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6}$").expect("VERIFICATION_CODE_REGEX should be valid"));

fn create_version_string() -> &'static str {
    match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
        (Some(hash), Some(true)) => format!("{}+g{hash}-dirty", built_info::PKG_VERSION).leak(),
        (Some(hash), _) => format!("{}+g{hash}", built_info::PKG_VERSION).leak(),
        _ => built_info::PKG_VERSION,
    }
}

fn create_commit_link() -> &'static str {
    format!("https://github.com/vidref/vidref-browser/commit/{}", built_info::GIT_COMMIT_HASH.unwrap_or("")).leak()
}
