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
use yew::prelude::*;
use yew_router::prelude::*;

mod api_client;
mod auth;
mod categories;
mod components;
mod constants;
mod contexts;
mod filters;
mod hooks;
mod lazy_load;
mod pages;
mod paging;
mod player;
mod settings;
mod swipe;
mod utils;

use auth::AuthProvider;
use contexts::{SettingsProvider, VideoListProvider};
use pages::{render_main_route, MainRoute};

pub mod built_info {
    // Contents generated by buildscript, using built
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[function_component]
fn App() -> Html {
    html! {
        <SettingsProvider>
            <AuthProvider>
                <VideoListProvider>
                    <BrowserRouter>
                        <Switch<MainRoute> render={render_main_route} />
                    </BrowserRouter>
                </VideoListProvider>
            </AuthProvider>
        </SettingsProvider>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
