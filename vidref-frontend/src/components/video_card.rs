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

use vidref_api::unsync::VideoReference;
use yew::prelude::*;
use yew_router::prelude::use_navigator;

use crate::components::icon::*;
use crate::components::library_buttons::{BookmarkButton, LikeButton};
use crate::lazy_load::use_viewport_lazy_load;
use crate::pages::MainRoute;
use crate::player::components::ListPlayer;
use crate::utils::format_duration;

/// Stand-in shown on cards without a preview image
pub fn platform_icon(platform: &str) -> &'static str {
    match platform {
        "youtube" => "▶️",
        "instagram" => "📷",
        "tiktok" => "🎵",
        _ => "🎬",
    }
}

#[derive(Properties, PartialEq)]
pub struct VideoCardProps {
    pub video: Rc<VideoReference>,
    /// Shows a remove button, e.g. on collection pages
    #[prop_or_default]
    pub on_remove: Option<Callback<u64>>,
}

#[function_component]
pub fn VideoCard(props: &VideoCardProps) -> Html {
    let navigator = use_navigator().expect("navigator should exist");
    let node = use_node_ref();
    let lazy = use_viewport_lazy_load(node.clone());
    let video = &props.video;

    let onclick = {
        let id = video.id;
        Callback::from(move |_: MouseEvent| navigator.push(&MainRoute::Video { id }))
    };
    let remove = props.on_remove.as_ref().map(|on_remove| {
        let id = video.id;
        on_remove.reform(move |e: MouseEvent| {
            e.stop_propagation();
            id
        })
    });
    let icon = platform_icon(&video.platform);

    let preview = if lazy.should_load {
        html! { <ListPlayer video={video.clone()} visible={lazy.is_visible} /> }
    } else if let Some(ref url) = video.preview_url {
        html! { <img src={AttrValue::from(url.clone())} alt={AttrValue::from(video.title.clone())} loading="lazy" /> }
    } else {
        html! {
            <div class="video-placeholder">
                <span class="video-icon">{icon}</span>
            </div>
        }
    };

    html! {
        <div class="video-card clickable" ref={node} {onclick}>
            <div class="video-preview">
                {preview}
                if let Some(duration) = video.duration_sec.filter(|d| *d > 0) {
                    <div class="video-duration">{format_duration(duration)}</div>
                }
                <div class="video-platform">{icon}</div>
            </div>
            <div class="video-info">
                <h3 class="video-title">{video.title.to_string()}</h3>
                if let Some(ref category) = video.category {
                    <span class="video-category">{category.name.to_string()}</span>
                }
                if let Some(ref summary) = video.public_summary {
                    <p class="video-summary">{summary.to_string()}</p>
                }
            </div>
            <div class="video-actions">
                <LikeButton video_id={video.id} liked={video.is_liked} likes_count={video.likes_count} />
                <BookmarkButton video_id={video.id} saved={video.is_saved} />
                if let Some(onclick) = remove {
                    <button class="remove-button" {onclick}>
                        <Icon r#type={IconType::Delete} tooltip="Remove from collection" />
                    </button>
                }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_platforms_get_the_generic_icon() {
        assert_eq!(platform_icon("youtube"), "▶️");
        assert_eq!(platform_icon("tiktok"), "🎵");
        assert_eq!(platform_icon("facebook"), "🎬");
        assert_eq!(platform_icon(""), "🎬");
    }
}
