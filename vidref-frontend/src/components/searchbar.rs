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
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::icon::*;
use crate::contexts::SettingsContext;
use crate::hooks::use_debounced;

#[derive(Properties, PartialEq)]
pub struct SearchbarProps {
    /// Receives the search text once typing paused, or right away when it was cleared
    pub on_search: Callback<AttrValue>,
    #[prop_or(AttrValue::Static("Search videos..."))]
    pub placeholder: AttrValue,
}

#[function_component]
pub fn Searchbar(props: &SearchbarProps) -> Html {
    let settings_context: SettingsContext = use_context().expect("SettingsContext should be available");
    let text = use_state_eq(|| AttrValue::Static(""));
    let delay = if text.is_empty() { 0 } else { settings_context.settings().search_debounce_ms };
    let debounced = use_debounced((*text).clone(), delay);

    {
        let on_search = props.on_search.clone();
        use_effect_with(debounced, move |debounced| on_search.emit(debounced.clone()));
    }

    let oninput = {
        let text = text.clone();
        use_callback((), move |e: InputEvent, ()| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(input.value().into());
        })
    };
    let onclear = {
        let text = text.clone();
        use_callback((), move |_: MouseEvent, ()| text.set(AttrValue::Static("")))
    };

    html! {
        <div id="searchbar">
            <Icon r#type={IconType::Search} />
            <input
                type="search"
                placeholder={props.placeholder.clone()}
                value={(*text).clone()}
                {oninput}
            />
            if !text.is_empty() {
                <span class="clickable search-clear" onclick={onclear}>
                    <Icon r#type={IconType::Close} tooltip="Clear search" />
                </span>
            }
        </div>
    }
}
