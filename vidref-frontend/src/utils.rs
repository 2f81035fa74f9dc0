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

use chrono::{DateTime, Utc};
use cloneable_errors::{ErrContext, ErrorContext, ResContext};
use gloo_console::{error, warn};
use reqwest::Url;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::js_sys::JsString;
use web_sys::{window, Storage};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// stringifying js values
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = String)]
    pub fn make_jsstring(value: &JsValue) -> JsString;
}

/// Converts a JS exception into an error chain
pub fn js_error(value: &JsValue) -> ErrorContext {
    ErrorContext::new(String::from(make_jsstring(value)))
}


/// Represents a registered one-shot timeout
///
/// Automatically cancelled when this object is dropped
pub struct Timeout {
    _callback: Closure<dyn FnMut()>,
    handle: i32,
}

impl Timeout {
    pub fn new<F>(callback: F, timeout_ms: u32) -> Result<Timeout, ErrorContext>
    where F: 'static + FnOnce(),
    {
        let callback = Closure::once(callback);
        let window = window().context("window should exist")?;
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                i32::try_from(timeout_ms).unwrap_or(i32::MAX),
            )
            .map_err(|e| js_error(&e).context("Failed to register a timeout"))?;
        Ok(Timeout { _callback: callback, handle })
    }

    pub fn cancel(&self) {
        if let Some(window) = window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}


// local storage

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

/// Reads a raw string from local storage, `None` if missing or storage is unavailable
pub fn storage_get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

pub fn storage_set(key: &str, value: &str) {
    let Some(storage) = local_storage() else {
        warn!(format!("Local storage is unavailable, {key} will not persist"));
        return;
    };
    if let Err(e) = storage.set_item(key, value) {
        error!(format!("Failed to write {key} to local storage"), e);
    }
}

pub fn storage_remove(key: &str) {
    if let Some(storage) = local_storage() {
        if let Err(e) = storage.remove_item(key) {
            error!(format!("Failed to remove {key} from local storage"), e);
        }
    }
}

/// Reads and deserializes a JSON value from local storage
///
/// Corrupted values are logged and treated as missing.
pub fn storage_get_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = storage_get(key)?;
    match serde_json::from_str(&raw).with_context(|| format!("Failed to deserialize {key} from local storage")) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(format!("{e:?}"));
            None
        },
    }
}

pub fn storage_set_json<T: Serialize + ?Sized>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => storage_set(key, &raw),
        Err(e) => error!(format!("{:?}", e.context(format!("Failed to serialize {key}")))),
    }
}


pub fn render_datetime(dt: DateTime<Utc>) -> String {
    format!("{}", dt.format(TIME_FORMAT))
}

/// Renders an RFC 3339 timestamp from the backend, unparseable values are shown as-is
pub fn render_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp).map_or_else(|_| timestamp.to_owned(), |dt| render_datetime(dt.into()))
}

/// Renders a duration in seconds as `m:ss`
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub trait RenderNumber {
    /// Render a large integer in a human-readable way:
    /// Digits will be arranged in groups of 3, with spaces in between
    fn render_int(&self) -> String;
    /// Render a large integer in an abbreviated form:
    /// for example: 21370 will become 21K
    fn abbreviate_int(&self) -> String;
}

macro_rules! define_render_number {
    ($type: ident) => {
        impl RenderNumber for $type {
            fn render_int(&self) -> String {
                let string_n = format!("{self}");
                let chunks = string_n.as_bytes() // digits are ASCII = 1B each
                    .rchunks(3)
                    .rev()
                    .collect::<Vec<_>>();
                String::from_utf8(chunks.join(b" " as &[u8]))
                    .expect("this should always be valid utf8")
            }

            #[allow(unreachable_patterns)]
            fn abbreviate_int(&self) -> String {
                match self {
                    (0..=999) => format!("{self}"),
                    (1_000..=999_999) => format!("{}K", self/1_000),
                    (1_000_000..=999_999_999) => format!("{}M", self/1_000_000),
                    (1_000_000_000..) => format!("{}B", (self/1_000_000_000).render_int()),
                    _ => unreachable!(),
                }
            }
        }
    };
}

define_render_number!(u32);
define_render_number!(u64);
define_render_number!(usize);

pub trait ReqwestUrlExt {
    #[allow(clippy::result_unit_err)]
    fn extend_segments<I>(&mut self, segments: I) -> Result<&mut Self, ()>
    where I: IntoIterator,
    I::Item: AsRef<str>;
    #[allow(clippy::result_unit_err)]
    fn join_segments<I>(&self, segments: I) -> Result<Self, ()>
    where I: IntoIterator,
    I::Item: AsRef<str>,
    Self: Sized;
}

impl ReqwestUrlExt for Url {
    fn extend_segments<I>(&mut self, segments: I) -> Result<&mut Self, ()>
        where I: IntoIterator,
        I::Item: AsRef<str>,
    {
        {
            let mut path = self.path_segments_mut()?;
            // base URLs end with a slash, which leaves an empty last segment
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(self)
    }
    fn join_segments<I>(&self, segments: I) -> Result<Self, ()>
        where I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.clone();
        url.extend_segments(segments)?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_minutes_and_padded_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(9), "0:09");
        assert_eq!(format_duration(75), "1:15");
        assert_eq!(format_duration(3600), "60:00");
    }

    #[test]
    fn backend_timestamps_are_rendered_in_utc() {
        assert_eq!(render_timestamp("2024-05-01T12:30:00.000000Z"), "2024-05-01 12:30:00");
        assert_eq!(render_timestamp("2024-05-01T14:30:00+02:00"), "2024-05-01 12:30:00");
        assert_eq!(render_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn numbers_are_grouped_and_abbreviated() {
        assert_eq!(1_234_567u64.render_int(), "1 234 567");
        assert_eq!(999u64.render_int(), "999");
        assert_eq!(999u64.abbreviate_int(), "999");
        assert_eq!(21_370u64.abbreviate_int(), "21K");
        assert_eq!(4_500_000u32.abbreviate_int(), "4M");
    }

    #[test]
    fn segments_are_joined_onto_a_base_with_trailing_slash() {
        let base = Url::parse("http://localhost:8000/api/").unwrap();
        let url = base.join_segments(["collections", "5", "videos"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/collections/5/videos");
    }

    #[test]
    fn joined_segments_are_percent_encoded() {
        let base = Url::parse("http://localhost:8000/api/").unwrap();
        let url = base.join_segments(["shared", "collections", "a b/c", "videos"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/shared/collections/a%20b%2Fc/videos");
    }
}
