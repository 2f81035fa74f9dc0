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
use yew_hooks::use_async;

use crate::built_info;
use crate::constants::{BUILD_TIME, COMMIT_LINK, COMMIT_TIME};
use crate::contexts::*;
use crate::filters::QueryObject;
use crate::utils::{render_datetime, RenderNumber};

macro_rules! number_hoverswitch {
    ($switch_element: tt, $n: expr) => {
        if $n >= 1000 {
            html!{
                <$switch_element class="hoverswitch">
                    <span>{$n.abbreviate_int()}</span>
                    <span>{$n.render_int()}</span>
                </$switch_element>
            }
        } else {
            html!{
                <$switch_element>{$n}</$switch_element>
            }
        }
    };
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct LibraryStats {
    catalog_videos: u64,
    /// Only known for signed in users
    personal: Option<PersonalStats>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct PersonalStats {
    likes: usize,
    collections: usize,
    saved_videos: u64,
}

async fn fetch_stats(api: ApiClient) -> Result<LibraryStats, String> {
    let catalog = api.search_videos(&QueryObject::default(), 1, 1).await.map_err(|e| e.to_string())?;
    let personal = if api.token().is_some() {
        let likes = api.user_likes().await.map_err(|e| e.to_string())?;
        let collections = api.collections().await.map_err(|e| e.to_string())?;
        Some(PersonalStats {
            likes: likes.len(),
            collections: collections.len(),
            saved_videos: collections.iter().map(|c| c.video_references_count).sum(),
        })
    } else {
        None
    };
    Ok(LibraryStats {
        catalog_videos: catalog.meta().total,
        personal,
    })
}

/// About modal, opened from the footer
#[function_component]
pub fn StatusModal() -> Html {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let settings_context: SettingsContext = use_context().expect("SettingsContext should be available");
    let stats = {
        let api = api.clone();
        use_async(fetch_stats(api))
    };
    {
        let stats = stats.clone();
        use_effect_with(api, move |_| stats.run());
    }

    html! {
        <div id="status-modal">
            <h2>{"About Video Reference Browser"}</h2>
            <div id="status-modal-client">
                <h3>{"Client information"}</h3>
                <table>
                    <tr>
                        <th>{"Version"}</th>
                        <td>{built_info::PKG_VERSION}</td>
                    </tr>
                    <tr>
                        <th>{"Git hash"}</th>
                        <td>
                            if let Some(hash) = built_info::GIT_COMMIT_HASH_SHORT {
                                <a href={*COMMIT_LINK} target="_blank">{hash}</a>
                                if built_info::GIT_DIRTY == Some(true) {
                                    {" "}<b>{"+ uncommitted changes"}</b>
                                }
                            } else {
                                <em>{"Unknown"}</em>
                            }
                        </td>
                    </tr>
                    <tr>
                        <th>{"Commit date"}</th>
                        <td>
                            if let Some(dt) = *COMMIT_TIME {
                                {render_datetime(dt.into())}
                            } else {
                                <em>{"Unknown"}</em>
                            }
                        </td>
                    </tr>
                    <tr>
                        <th>{"Build date"}</th>
                        <td>
                            if let Some(dt) = *BUILD_TIME {
                                {render_datetime(dt.into())}
                            } else {
                                <em>{"Unknown"}</em>
                            }
                        </td>
                    </tr>
                    <tr>
                        <th>{"API base URL"}</th>
                        <td><code>{settings_context.settings().api_base_url.to_string()}</code></td>
                    </tr>
                </table>
            </div>
            <div id="status-modal-library">
                <h3>{"Library"}</h3>
                if stats.loading {
                    <em>{"Loading..."}</em>
                } else if let Some(ref error) = stats.error {
                    <em>{format!("Failed to load statistics: {error}")}</em>
                } else if let Some(stats) = stats.data {
                    <table>
                        <tr class="hoverswitch-trigger">
                            <th>{"Videos in the catalog"}</th>
                            {number_hoverswitch!(td, stats.catalog_videos)}
                        </tr>
                        if let Some(personal) = stats.personal {
                            <tr class="hoverswitch-trigger">
                                <th>{"Your liked videos"}</th>
                                {number_hoverswitch!(td, personal.likes)}
                            </tr>
                            <tr class="hoverswitch-trigger">
                                <th>{"Your collections"}</th>
                                {number_hoverswitch!(td, personal.collections)}
                            </tr>
                            <tr class="hoverswitch-trigger">
                                <th>{"Videos saved in collections"}</th>
                                {number_hoverswitch!(td, personal.saved_videos)}
                            </tr>
                        }
                    </table>
                }
            </div>
        </div>
    }
}
