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
use std::borrow::Cow;

use gloo_console::warn;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;

use crate::constants::{FACEBOOK_EMBED_WIDTH, FACEBOOK_ORIGIN, FACEBOOK_PLUGIN_URL};

/// Characters escaped by JS `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Strips everything the video plugin chokes on from a Facebook video URL
///
/// `/watch` URLs keep only their `v` parameter, any other URL keeps only its path.
/// URLs that fail to parse are returned unchanged.
pub fn normalize_url(source_url: &str) -> Cow<'_, str> {
    let url = match Url::parse(source_url) {
        Ok(url) => url,
        Err(e) => {
            if cfg!(target_arch = "wasm32") {
                warn!(format!("Could not normalize Facebook URL {source_url:?}: {e}"));
            }
            return Cow::Borrowed(source_url);
        },
    };

    if url.path().contains("/watch") {
        if let Some((_, v)) = url.query_pairs().find(|(k, v)| k == "v" && !v.is_empty()) {
            return Cow::Owned(format!("{FACEBOOK_ORIGIN}/watch/?v={v}"));
        }
    }
    Cow::Owned(format!("{FACEBOOK_ORIGIN}{}", url.path()))
}

/// Video plugin iframe URL for a Facebook video
pub fn embed_url(source_url: &str, show_text: bool) -> String {
    let href = utf8_percent_encode(&normalize_url(source_url), URI_COMPONENT).to_string();
    format!(
        "{}?href={href}&show_text={}&width={FACEBOOK_EMBED_WIDTH}",
        FACEBOOK_PLUGIN_URL.as_str(),
        if show_text { "1" } else { "0" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_urls_keep_only_the_video_parameter() {
        assert_eq!(
            normalize_url("https://www.facebook.com/watch/?ref=saved&v=123456&t=10"),
            "https://www.facebook.com/watch/?v=123456",
        );
    }

    #[test]
    fn other_urls_keep_only_the_path() {
        assert_eq!(
            normalize_url("https://m.facebook.com/reel/987654321?mibextid=abc&s=yWDuG2"),
            "https://www.facebook.com/reel/987654321",
        );
        assert_eq!(
            normalize_url("https://www.facebook.com/someone/videos/1122/?__tn__=R"),
            "https://www.facebook.com/someone/videos/1122/",
        );
    }

    #[test]
    fn watch_without_video_parameter_keeps_the_path() {
        assert_eq!(normalize_url("https://www.facebook.com/watch/?ref=tab"), "https://www.facebook.com/watch/");
    }

    #[test]
    fn unparseable_urls_pass_through() {
        assert_eq!(normalize_url("reel/123"), "reel/123");
    }

    #[test]
    fn href_is_encoded_like_encode_uri_component() {
        assert_eq!(
            embed_url("https://www.facebook.com/reel/42", true),
            "https://www.facebook.com/plugins/video.php?href=https%3A%2F%2Fwww.facebook.com%2Freel%2F42&show_text=1&width=400",
        );
        assert_eq!(
            embed_url("not a url (really)", false),
            "https://www.facebook.com/plugins/video.php?href=not%20a%20url%20(really)&show_text=0&width=400",
        );
    }
}
