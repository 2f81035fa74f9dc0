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

use crate::components::icon::*;
use crate::components::video_card::VideoCard;
use crate::contexts::VideoListContext;
use crate::lazy_load::use_near_viewport;

#[derive(Properties, PartialEq)]
pub struct VideoGridProps {
    pub videos: Rc<[Rc<VideoReference>]>,
    pub loading: bool,
    #[prop_or_default]
    pub has_more: bool,
    #[prop_or_default]
    pub on_load_more: Callback<()>,
    #[prop_or_default]
    pub on_remove: Option<Callback<u64>>,
    #[prop_or(AttrValue::Static("No videos found"))]
    pub empty_message: AttrValue,
}

#[function_component]
pub fn VideoGrid(props: &VideoGridProps) -> Html {
    let list_context: Option<VideoListContext> = use_context();
    let sentinel = use_node_ref();
    let near_end = use_near_viewport(sentinel.clone());

    {
        let ids: Rc<[u64]> = props.videos.iter().map(|v| v.id).collect();
        use_effect_with(ids, move |ids| {
            if let Some(context) = list_context {
                context.set(ids.clone());
            }
        });
    }
    {
        // re-evaluated after every page, the sentinel may still be in view
        let on_load_more = props.on_load_more.clone();
        use_effect_with((near_end, props.loading, props.has_more, props.videos.len()), move |(near_end, loading, has_more, _)| {
            if *near_end && !*loading && *has_more {
                on_load_more.emit(());
            }
        });
    }

    let content = if props.videos.is_empty() && props.loading {
        html! {
            <div class="video-grid-status">
                <Icon r#type={IconType::Wait} />
                {" Loading..."}
            </div>
        }
    } else if props.videos.is_empty() {
        html! {
            <div class="video-grid-status">{props.empty_message.clone()}</div>
        }
    } else {
        html! {
            <div class="video-grid">
                {for props.videos.iter().map(|video| html! {
                    <VideoCard key={video.id} video={video.clone()} on_remove={props.on_remove.clone()} />
                })}
            </div>
        }
    };

    html! {
        <>
            {content}
            <div class="video-grid-sentinel" ref={sentinel}>
                if props.loading && !props.videos.is_empty() {
                    <Icon r#type={IconType::Wait} tooltip="Loading more videos" />
                }
            </div>
        </>
    }
}
