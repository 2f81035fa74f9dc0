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
use std::rc::Rc;

use yew::prelude::*;

pub use crate::api_client::ApiClient;
pub use crate::auth::AuthContext;
pub use crate::components::modals::{ModalMessage, ModalRendererControls};
use crate::constants::SETTINGS_KEY;
use crate::settings::Settings;
use crate::utils::{storage_get_json, storage_set_json};

#[derive(Clone, PartialEq)]
pub struct SettingsContext {
    settings: Rc<Settings>,
    update_callback: Callback<Settings>,
    pub default: Rc<Settings>,
}

impl SettingsContext {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces and persists the settings
    pub fn update(&self, settings: Settings) {
        self.update_callback.emit(settings);
    }
}

#[derive(Properties, PartialEq)]
pub struct ProviderProps {
    #[prop_or_default]
    pub children: Html,
}

#[function_component]
pub fn SettingsProvider(props: &ProviderProps) -> Html {
    let settings = use_state_eq(|| Rc::new(storage_get_json::<Settings>(SETTINGS_KEY).unwrap_or_default()));
    let default = use_memo((), |()| Settings::default());
    let update_callback = {
        let settings = settings.clone();
        use_callback((), move |new: Settings, ()| {
            storage_set_json(SETTINGS_KEY, &new);
            settings.set(Rc::new(new));
        })
    };
    let context = SettingsContext {
        settings: (*settings).clone(),
        update_callback,
        default,
    };

    html! {
        <ContextProvider<SettingsContext> {context}>
            {props.children.clone()}
        </ContextProvider<SettingsContext>>
    }
}

/// IDs of the listing the user last browsed, in display order
///
/// Used by the video page to swipe to the neighbouring videos.
#[derive(Clone, PartialEq)]
pub struct VideoListContext {
    pub ids: Rc<[u64]>,
    setter: Callback<Rc<[u64]>>,
}

impl VideoListContext {
    pub fn set(&self, ids: Rc<[u64]>) {
        self.setter.emit(ids);
    }
}

#[function_component]
pub fn VideoListProvider(props: &ProviderProps) -> Html {
    let ids: UseStateHandle<Rc<[u64]>> = use_state_eq(|| Rc::from([]));
    let setter = {
        let ids = ids.clone();
        use_callback((), move |new: Rc<[u64]>, ()| ids.set(new))
    };
    let context = VideoListContext { ids: (*ids).clone(), setter };

    html! {
        <ContextProvider<VideoListContext> {context}>
            {props.children.clone()}
        </ContextProvider<VideoListContext>>
    }
}
