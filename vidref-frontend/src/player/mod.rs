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

//! Picks and configures the embed for a video reference
//!
//! [`select_player`] is pure and returns an [`Embed`] descriptor, the [`components`] module turns
//! descriptors into markup.

use std::rc::Rc;
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr, VariantArray};

use crate::constants::{TIKTOK_EMBED_URL, TIKTOK_PLAYER_URL, YOUTUBE_EMBED_URL};
use crate::filters::Platform;
use crate::utils::ReqwestUrlExt;

pub mod components;
pub mod facebook;
pub mod instagram;

/// Which of the two documented TikTok iframe endpoints to use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, IntoStaticStr, EnumString, VariantArray, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TiktokPlayerVariant {
    /// `https://www.tiktok.com/embed/v2/{id}`
    #[default]
    EmbedV2,
    /// `https://www.tiktok.com/player/v1/{id}`
    PlayerV1,
}

impl TiktokPlayerVariant {
    fn base_url(self) -> &'static Url {
        match self {
            Self::EmbedV2 => &*TIKTOK_EMBED_URL,
            Self::PlayerV1 => &*TIKTOK_PLAYER_URL,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::EmbedV2 => "Embed (v2)",
            Self::PlayerV1 => "Player (v1)",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlayerConfig {
    pub autoplay: bool,
    pub muted: bool,
    pub r#loop: bool,
    pub controls: bool,
    /// Facebook only: show the text of the post next to the video
    pub show_text: bool,
    pub tiktok_variant: TiktokPlayerVariant,
}

impl PlayerConfig {
    /// Small muted looping players in the video grid
    ///
    /// Instagram embeds are never autoplayed, only youtube & tiktok get controls.
    pub fn list(platform: &str, visible: bool, autoplay_enabled: bool) -> PlayerConfig {
        let platform = Platform::from_str(platform).ok();
        PlayerConfig {
            autoplay: autoplay_enabled && visible && platform != Some(Platform::Instagram),
            muted: true,
            r#loop: true,
            controls: matches!(platform, Some(Platform::Youtube | Platform::Tiktok)),
            show_text: false,
            tiktok_variant: TiktokPlayerVariant::default(),
        }
    }

    /// The large player on the video page
    pub fn detail() -> PlayerConfig {
        PlayerConfig {
            autoplay: true,
            muted: false,
            r#loop: false,
            controls: true,
            show_text: false,
            tiktok_variant: TiktokPlayerVariant::default(),
        }
    }

    #[must_use]
    pub fn with_tiktok_variant(mut self, variant: TiktokPlayerVariant) -> PlayerConfig {
        self.tiktok_variant = variant;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceholderReason {
    NotAvailable,
    UnsupportedPlatform,
}

impl PlaceholderReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::NotAvailable => "Video not available",
            Self::UnsupportedPlatform => "Unsupported platform",
        }
    }
}

/// Declarative description of what to render for a video
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Embed {
    Iframe {
        url: Rc<str>,
        allow: &'static str,
        class: &'static str,
    },
    /// Instagram's `blockquote.instagram-media` marker, picked up by its embed script
    Instagram {
        permalink: Rc<str>,
    },
    Placeholder(PlaceholderReason),
}

const YOUTUBE_ALLOW: &str  = "autoplay; encrypted-media; picture-in-picture";
const TIKTOK_ALLOW: &str   = "autoplay; fullscreen; encrypted-media";
const FACEBOOK_ALLOW: &str = "autoplay; clipboard-write; encrypted-media; picture-in-picture; web-share";

fn flag(b: bool) -> &'static str {
    if b { "1" } else { "0" }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Selects the embed for a video
///
/// Never fails: missing data yields [`PlaceholderReason::NotAvailable`], unknown platforms yield
/// [`PlaceholderReason::UnsupportedPlatform`].
pub fn select_player(platform: &str, video_id: Option<&str>, source_url: Option<&str>, config: &PlayerConfig) -> Embed {
    let (Some(platform), Some(video_id)) = (non_empty(Some(platform)), non_empty(video_id)) else {
        return Embed::Placeholder(PlaceholderReason::NotAvailable);
    };
    let Ok(platform) = Platform::from_str(platform) else {
        return Embed::Placeholder(PlaceholderReason::UnsupportedPlatform);
    };

    match platform {
        Platform::Youtube => youtube_embed(video_id, config),
        Platform::Tiktok => tiktok_embed(video_id, config),
        Platform::Instagram => match non_empty(source_url) {
            Some(permalink) => Embed::Instagram { permalink: permalink.into() },
            None => Embed::Placeholder(PlaceholderReason::NotAvailable),
        },
        Platform::Facebook => match non_empty(source_url) {
            Some(source_url) => Embed::Iframe {
                url: facebook::embed_url(source_url, config.show_text).into(),
                allow: FACEBOOK_ALLOW,
                class: "facebook-player",
            },
            None => Embed::Placeholder(PlaceholderReason::NotAvailable),
        },
    }
}

fn youtube_embed(video_id: &str, config: &PlayerConfig) -> Embed {
    let Ok(mut url) = YOUTUBE_EMBED_URL.join_segments([video_id]) else {
        return Embed::Placeholder(PlaceholderReason::NotAvailable);
    };
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("controls", flag(config.controls))
            .append_pair("autoplay", flag(config.autoplay))
            .append_pair("mute", flag(config.muted))
            .append_pair("rel", "0")
            .append_pair("playsinline", "1")
            .append_pair("enablejsapi", "1");
        // looping a single video needs it to be its own playlist
        if config.r#loop {
            query
                .append_pair("loop", "1")
                .append_pair("playlist", video_id);
        }
    }
    Embed::Iframe {
        url: url.as_str().into(),
        allow: YOUTUBE_ALLOW,
        class: "youtube-player",
    }
}

fn tiktok_embed(video_id: &str, config: &PlayerConfig) -> Embed {
    let Ok(mut url) = config.tiktok_variant.base_url().join_segments([video_id]) else {
        return Embed::Placeholder(PlaceholderReason::NotAvailable);
    };
    url.query_pairs_mut()
        .append_pair("controls", flag(config.controls))
        .append_pair("autoplay", flag(config.autoplay))
        .append_pair("muted", flag(config.muted))
        .append_pair("loop", flag(config.r#loop))
        .append_pair("rel", "0");
    Embed::Iframe {
        url: url.as_str().into(),
        allow: TIKTOK_ALLOW,
        class: "tiktok-player",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iframe_url(embed: Embed) -> String {
        match embed {
            Embed::Iframe { url, .. } => url.to_string(),
            other => panic!("expected an iframe, got {other:?}"),
        }
    }

    #[test]
    fn unknown_platform_is_a_placeholder() {
        let embed = select_player("unsupported", Some("abc"), Some("https://example.com"), &PlayerConfig::detail());
        assert_eq!(embed, Embed::Placeholder(PlaceholderReason::UnsupportedPlatform));
    }

    #[test]
    fn missing_id_is_a_placeholder() {
        let embed = select_player("youtube", Some(""), Some(""), &PlayerConfig::detail());
        assert_eq!(embed, Embed::Placeholder(PlaceholderReason::NotAvailable));
        let embed = select_player("youtube", None, None, &PlayerConfig::detail());
        assert_eq!(embed, Embed::Placeholder(PlaceholderReason::NotAvailable));
    }

    #[test]
    fn missing_platform_is_checked_before_support() {
        let embed = select_player("", Some("abc"), None, &PlayerConfig::detail());
        assert_eq!(embed, Embed::Placeholder(PlaceholderReason::NotAvailable));
    }

    #[test]
    fn youtube_list_player_loops_with_a_playlist() {
        let config = PlayerConfig::list("youtube", true, true);
        let url = iframe_url(select_player("youtube", Some("dQw4w9WgXcQ"), None, &config));
        assert_eq!(url, "https://www.youtube.com/embed/dQw4w9WgXcQ?controls=1&autoplay=1&mute=1&rel=0&playsinline=1&enablejsapi=1&loop=1&playlist=dQw4w9WgXcQ");
    }

    #[test]
    fn youtube_detail_player_does_not_loop() {
        let url = iframe_url(select_player("youtube", Some("dQw4w9WgXcQ"), None, &PlayerConfig::detail()));
        assert_eq!(url, "https://www.youtube.com/embed/dQw4w9WgXcQ?controls=1&autoplay=1&mute=0&rel=0&playsinline=1&enablejsapi=1");
    }

    #[test]
    fn tiktok_uses_the_configured_variant() {
        let config = PlayerConfig::list("tiktok", false, true);
        let url = iframe_url(select_player("tiktok", Some("7301234567890123456"), None, &config));
        assert_eq!(url, "https://www.tiktok.com/embed/v2/7301234567890123456?controls=1&autoplay=0&muted=1&loop=1&rel=0");

        let config = config.with_tiktok_variant(TiktokPlayerVariant::PlayerV1);
        let url = iframe_url(select_player("tiktok", Some("7301234567890123456"), None, &config));
        assert!(url.starts_with("https://www.tiktok.com/player/v1/7301234567890123456?"));
    }

    #[test]
    fn instagram_uses_the_source_url_as_permalink() {
        let embed = select_player("instagram", Some("C0abc"), Some("https://www.instagram.com/reel/C0abc/"), &PlayerConfig::detail());
        assert_eq!(embed, Embed::Instagram { permalink: "https://www.instagram.com/reel/C0abc/".into() });
        let embed = select_player("instagram", Some("C0abc"), None, &PlayerConfig::detail());
        assert_eq!(embed, Embed::Placeholder(PlaceholderReason::NotAvailable));
    }

    #[test]
    fn facebook_embeds_the_normalized_source() {
        let embed = select_player("facebook", Some("123"), Some("https://www.facebook.com/watch/?v=123&ref=share"), &PlayerConfig::detail());
        assert_eq!(
            iframe_url(embed),
            "https://www.facebook.com/plugins/video.php?href=https%3A%2F%2Fwww.facebook.com%2Fwatch%2F%3Fv%3D123&show_text=0&width=400",
        );
    }

    #[test]
    fn list_preset_per_platform() {
        let instagram = PlayerConfig::list("instagram", true, true);
        assert!(!instagram.autoplay);
        assert!(!instagram.controls);
        assert!(instagram.muted && instagram.r#loop);

        let facebook = PlayerConfig::list("facebook", true, true);
        assert!(facebook.autoplay);
        assert!(!facebook.controls);

        assert!(!PlayerConfig::list("youtube", false, true).autoplay);
        assert!(!PlayerConfig::list("youtube", true, false).autoplay);
    }
}
