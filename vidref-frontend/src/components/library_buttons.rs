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

//! Like and bookmark buttons shown on cards and on the video page

use gloo_console::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::icon::*;
use crate::components::modals::auth::RegisterModal;
use crate::components::modals::collections::SaveToCollectionModal;
use crate::contexts::*;
use crate::hooks::use_memo_state_eq;
use crate::utils::RenderNumber;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LikeState {
    liked: bool,
    count: u64,
}

#[derive(Properties, PartialEq)]
pub struct LikeButtonProps {
    pub video_id: u64,
    pub liked: bool,
    pub likes_count: u64,
}

#[function_component]
pub fn LikeButton(props: &LikeButtonProps) -> Html {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let modal_controls: ModalRendererControls = use_context().expect("LikeButton should be placed inside a ModalRenderer");
    let state = use_memo_state_eq((props.liked, props.likes_count), || LikeState { liked: props.liked, count: props.likes_count });
    let loading = use_state_eq(|| false);

    let is_authenticated = auth.state().is_authenticated();
    let onclick = {
        let (state, loading, video_id) = (state.clone(), loading.clone(), props.video_id);
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            if !is_authenticated {
                modal_controls.emit(ModalMessage::Open(html! {<RegisterModal />}));
                return;
            }
            if *loading {
                return;
            }
            loading.set(true);
            let (api, state, loading) = (api.clone(), state.clone(), loading.clone());
            spawn_local(async move {
                match api.toggle_like(video_id).await {
                    Ok(response) => state.set(LikeState { liked: response.liked, count: response.likes_count }),
                    Err(e) => error!(format!("Failed to toggle the like on video {video_id}: {e}")),
                }
                loading.set(false);
            });
        })
    };

    let tooltip = match (is_authenticated, state.liked) {
        (false, _) => "Sign up to like videos",
        (true, true) => "Remove like",
        (true, false) => "Like",
    };

    html! {
        <button class={classes!("like-button", state.liked.then_some("liked"))} {onclick} disabled={*loading} title={tooltip}>
            <Icon r#type={if state.liked { IconType::Liked } else { IconType::NotLiked }} />
            if state.count > 0 {
                <span class="like-count">{state.count.abbreviate_int()}</span>
            }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct BookmarkButtonProps {
    pub video_id: u64,
    pub saved: bool,
    #[prop_or_default]
    pub show_text: bool,
}

/// Opens the collection picker for a video
#[function_component]
pub fn BookmarkButton(props: &BookmarkButtonProps) -> Html {
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let modal_controls: ModalRendererControls = use_context().expect("BookmarkButton should be placed inside a ModalRenderer");
    let saved = use_memo_state_eq(props.saved, || props.saved);

    let is_authenticated = auth.state().is_authenticated();
    let onclick = {
        let (saved, video_id) = (saved.clone(), props.video_id);
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            if is_authenticated {
                let on_saved_change = {
                    let saved = saved.clone();
                    Callback::from(move |is_saved| saved.set(is_saved))
                };
                modal_controls.emit(ModalMessage::Open(html! {<SaveToCollectionModal {video_id} {on_saved_change} />}));
            } else {
                modal_controls.emit(ModalMessage::Open(html! {<RegisterModal />}));
            }
        })
    };

    let tooltip = match (is_authenticated, *saved) {
        (false, _) => "Sign up to save videos",
        (true, true) => "Video saved in a collection",
        (true, false) => "Save to collection",
    };

    html! {
        <button class={classes!("bookmark-button", saved.then_some("saved"))} {onclick} title={tooltip}>
            <Icon r#type={if *saved { IconType::Saved } else { IconType::NotSaved }} />
            if props.show_text {
                <span>{"Save"}</span>
            }
        </button>
    }
}
