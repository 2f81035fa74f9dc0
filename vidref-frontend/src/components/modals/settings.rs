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

use std::{fmt::Display, num::NonZeroUsize, rc::Rc, str::FromStr};

use reqwest::Url;
use strum::VariantArray;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::contexts::SettingsContext;
use crate::player::TiktokPlayerVariant;

/// Generator macro for a revert callback (Esc key pressed)
///
/// Takes in the name of the settings field and a function to verify the input field's value
macro_rules! revert_callback {
    ($name:ident, $verify_func:ident) => {
        move |e: KeyboardEvent, settings_context| {
            if e.key() == "Escape" {
                let settings = settings_context.settings();
                let target: HtmlInputElement = e.target_unchecked_into();
                target.set_value(&settings.$name.to_string());
                if $verify_func(&target).is_none() {
                    target.set_value(&settings_context.default.$name.to_string());
                    assert!($verify_func(&target).is_some(), stringify!(Default value of $name setting was invalid!));
                }
            }
        }
    };
}

/// Generator macro for a save callback (change committed)
///
/// Takes in the name of the settings field, a function to verify & parse the input field's value
macro_rules! save_callback {
    ($name:ident, $verify_func:ident) => {
        move |e: Event, settings_context| {
            let target: HtmlInputElement = e.target_unchecked_into();
            if let Some(v) = $verify_func(&target) {
                let mut settings = settings_context.settings().clone();
                settings.$name = v;
                settings_context.update(settings);
            }
        }
    };
}

/// Generator macro for input field validation & parsing functions
///
/// Takes the name of the new function, the return type and a code block that does additional verification,
/// should the JS verification pass.
macro_rules! verify_fn {
    ($name:ident) => {
        fn $name(target: &HtmlInputElement) -> Option<String> {
            target.report_validity().then(|| target.value())
        }
    };
    ($name:ident: $target:ident -> $type:ty => $check:block) => {
        fn $name($target: &HtmlInputElement) -> Option<$type> {
            let mut res = None;
            $target.set_custom_validity("");
            if $target.validity().valid() {
                res = match $check {
                    Err(e) => {
                        $target.set_custom_validity(&format!("{e}"));
                        None
                    },
                    Ok(v) => Some(v),
                }
            }
            if !$target.report_validity() {
                None
            } else {
                res
            }
        }
    };
}

macro_rules! setting_class {
    ($initial_settings:expr, $current_settings:expr, $name:ident) => {
        if $initial_settings.$name != $current_settings.$name {
            classes!("setting-changed")
        } else {
            classes!()
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BaseUrlVerifyError {
    UrlParseError(<Url as FromStr>::Err),
    CannotBeABase,
    InvalidScheme,
}

impl std::error::Error for BaseUrlVerifyError {}
impl Display for BaseUrlVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UrlParseError(ref e) => write!(f, "{e}"),
            Self::CannotBeABase => write!(f, "This URL cannot be a base"),
            Self::InvalidScheme => write!(f, "Invalid scheme - only http: and https: are accepted"),
        }
    }
}


verify_fn!(nonzerousize_verify: target -> NonZeroUsize => {
    NonZeroUsize::from_str(&target.value())
});
verify_fn!(milliseconds_verify: target -> u32 => {
    u32::from_str(&target.value())
});
verify_fn!(baseurl_verify: target -> Rc<str> => {
    verify_base_url(&target.value())
});

fn verify_base_url(value: &str) -> Result<Rc<str>, BaseUrlVerifyError> {
    let url = Url::from_str(value).map_err(BaseUrlVerifyError::UrlParseError)?;
    if url.cannot_be_a_base() {
        Err(BaseUrlVerifyError::CannotBeABase)
    } else if !matches!(url.scheme(), "http" | "https") {
        Err(BaseUrlVerifyError::InvalidScheme)
    } else {
        Ok(url.to_string().into())
    }
}


#[function_component]
pub fn SettingsModal() -> Html {
    let settings_context: SettingsContext = use_context().expect("SettingsContext should be available");
    let initial_settings = use_memo((), |()| settings_context.settings().clone());
    let current_settings = settings_context.settings();

    let nonzerousize_oninput = use_callback((), move |e: InputEvent, ()| {
        nonzerousize_verify(&e.target_unchecked_into());
    });
    let milliseconds_oninput = use_callback((), move |e: InputEvent, ()| {
        milliseconds_verify(&e.target_unchecked_into());
    });
    let baseurl_oninput = use_callback((), move |e: InputEvent, ()| {
        baseurl_verify(&e.target_unchecked_into());
    });
    let entries_per_page_revert = use_callback(settings_context.clone(), revert_callback!(entries_per_page, nonzerousize_verify));
    let search_debounce_ms_revert = use_callback(settings_context.clone(), revert_callback!(search_debounce_ms, milliseconds_verify));
    let api_base_url_revert = use_callback(settings_context.clone(), revert_callback!(api_base_url, baseurl_verify));
    let entries_per_page_save = use_callback(settings_context.clone(), save_callback!(entries_per_page, nonzerousize_verify));
    let search_debounce_ms_save = use_callback(settings_context.clone(), save_callback!(search_debounce_ms, milliseconds_verify));
    let api_base_url_save = use_callback(settings_context.clone(), save_callback!(api_base_url, baseurl_verify));
    let autoplay_in_list_save = use_callback(settings_context.clone(), |e: Event, settings_context| {
        let target: HtmlInputElement = e.target_unchecked_into();
        let mut settings = settings_context.settings().clone();
        settings.autoplay_in_list = target.checked();
        settings_context.update(settings);
    });
    let tiktok_player_variant_save = use_callback(settings_context.clone(), |e: Event, settings_context| {
        let target: HtmlSelectElement = e.target_unchecked_into();
        if let Ok(variant) = TiktokPlayerVariant::from_str(&target.value()) {
            let mut settings = settings_context.settings().clone();
            settings.tiktok_player_variant = variant;
            settings_context.update(settings);
        }
    });

    html! {
        <div id="settings-modal">
            <h2>{"Video Reference Browser Settings"}</h2>
            <fieldset>
                <legend>{"Browsing"}</legend>
                <label for="entries_per_page">{"Videos per page: "}</label>
                <input
                    class={setting_class!(initial_settings, current_settings, entries_per_page)}
                    id="entries_per_page"
                    type="number" step=1 min=1 required=true
                    oninput={nonzerousize_oninput}
                    onkeydown={entries_per_page_revert}
                    onchange={entries_per_page_save}
                    ~value={current_settings.entries_per_page.to_string()}
                />
                <br />
                <label for="search_debounce_ms">{"Search delay (ms): "}</label>
                <input
                    class={setting_class!(initial_settings, current_settings, search_debounce_ms)}
                    id="search_debounce_ms"
                    type="number" step=50 min=0 required=true
                    oninput={milliseconds_oninput}
                    onkeydown={search_debounce_ms_revert}
                    onchange={search_debounce_ms_save}
                    ~value={current_settings.search_debounce_ms.to_string()}
                />
            </fieldset>
            <fieldset>
                <legend>{"Players"}</legend>
                <input
                    class={setting_class!(initial_settings, current_settings, autoplay_in_list)}
                    id="autoplay_in_list"
                    type="checkbox"
                    onchange={autoplay_in_list_save}
                    ~checked={current_settings.autoplay_in_list}
                />
                <label for="autoplay_in_list">{"Autoplay videos in the grid"}</label>
                <br />
                <label for="tiktok_player_variant">{"TikTok player: "}</label>
                <select
                    class={setting_class!(initial_settings, current_settings, tiktok_player_variant)}
                    id="tiktok_player_variant"
                    onchange={tiktok_player_variant_save}
                >
                    {for TiktokPlayerVariant::VARIANTS.iter().map(|variant| {
                        let value: &'static str = variant.into();
                        html! {
                            <option {value} selected={*variant == current_settings.tiktok_player_variant}>{variant.label()}</option>
                        }
                    })}
                </select>
            </fieldset>
            <fieldset>
                <legend>{"Backend"}</legend>
                <label for="api_base_url">{"API base URL: "}</label>
                <input
                    class={setting_class!(initial_settings, current_settings, api_base_url)}
                    id="api_base_url"
                    type="url" required=true
                    oninput={baseurl_oninput}
                    onkeydown={api_base_url_revert}
                    onchange={api_base_url_save}
                    ~value={current_settings.api_base_url.to_string()}
                />
            </fieldset>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_urls_must_be_http_bases() {
        assert_eq!(&*verify_base_url("http://localhost:8000/api/").unwrap(), "http://localhost:8000/api/");
        assert_eq!(verify_base_url("ftp://example.com/"), Err(BaseUrlVerifyError::InvalidScheme));
        assert_eq!(verify_base_url("mailto:someone@example.com"), Err(BaseUrlVerifyError::CannotBeABase));
        assert!(matches!(verify_base_url("not a url"), Err(BaseUrlVerifyError::UrlParseError(..))));
    }
}
