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

use futures::join;
use gloo_console::error;
use vidref_api::unsync::{Collection, VideoReference};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::ApiResult;
use crate::components::video_grid::VideoGrid;
use crate::contexts::*;
use crate::hooks::use_async_suspension;
use crate::pages::collections::video_count;
use crate::pages::{use_redirect_anonymous, MainRoute};

struct CollectionContents {
    collection: Collection,
    videos: Rc<[Rc<VideoReference>]>,
}

async fn fetch_contents(api: &ApiClient, id: u64) -> ApiResult<CollectionContents> {
    let (collection, videos) = join!(api.collection(id), api.collection_videos(id));
    Ok(CollectionContents {
        collection: collection?,
        videos: videos?.into_iter().map(Rc::new).collect(),
    })
}

#[derive(Properties, PartialEq)]
struct RenameFormProps {
    id: u64,
    name: AttrValue,
    on_done: Callback<()>,
}

#[function_component]
fn RenameForm(props: &RenameFormProps) -> Html {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let name = use_state(|| props.name.to_string());
    let error = use_state(|| None::<String>);

    let oninput = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };
    let onsubmit = {
        let (name, error, on_done, id) = (name.clone(), error.clone(), props.on_done.clone(), props.id);
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let new_name = name.trim().to_owned();
            if new_name.is_empty() {
                return;
            }
            let (api, error, on_done) = (api.clone(), error.clone(), on_done.clone());
            spawn_local(async move {
                match api.update_collection(id, &new_name).await {
                    Ok(_) => on_done.emit(()),
                    Err(e) => {
                        error!(format!("Failed to rename collection {id}: {e}"));
                        error.set(Some(e.user_message("Failed to rename the collection")));
                    },
                }
            });
        })
    };
    let cancel = props.on_done.reform(|_: MouseEvent| ());

    html! {
        <form class="collection-rename" {onsubmit}>
            <input type="text" required=true value={(*name).clone()} {oninput} />
            <button type="submit" class="primary">{"Save"}</button>
            <button type="button" onclick={cancel}>{"Cancel"}</button>
            if let Some(ref message) = *error {
                <div class="error">{message}</div>
            }
        </form>
    }
}

#[derive(Properties, PartialEq)]
struct CollectionContentsViewProps {
    id: u64,
    version: u32,
    on_changed: Callback<()>,
}

#[function_component]
fn CollectionContentsView(props: &CollectionContentsViewProps) -> HtmlResult {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let renaming = use_state_eq(|| false);
    let result: Rc<ApiResult<CollectionContents>> = use_async_suspension(|(api, id, _)| async move {
        let result = fetch_contents(&api, id).await;
        if let Err(ref e) = result {
            error!(format!("Failed to fetch collection {id}: {e:?}"));
        }
        result
    }, (api.clone(), props.id, props.version))?;

    let contents = match *result {
        Ok(ref contents) => contents,
        Err(ref e) => return Ok(html! {
            <div class="error-banner">
                <h3>{e.user_message("Failed to load this collection")}</h3>
                <Link<MainRoute> to={MainRoute::Collections}>{"Back to my collections"}</Link<MainRoute>>
            </div>
        }),
    };
    let collection = &contents.collection;

    let on_remove = {
        let (on_changed, collection_id) = (props.on_changed.clone(), collection.id);
        Callback::from(move |video_id: u64| {
            let (api, on_changed) = (api.clone(), on_changed.clone());
            spawn_local(async move {
                match api.remove_from_collection(collection_id, video_id).await {
                    Ok(()) => on_changed.emit(()),
                    Err(e) => error!(format!("Failed to remove video {video_id} from collection {collection_id}: {e}")),
                }
            });
        })
    };
    let on_renamed = {
        let (renaming, on_changed) = (renaming.clone(), props.on_changed.clone());
        Callback::from(move |()| {
            renaming.set(false);
            on_changed.emit(());
        })
    };
    let start_renaming = {
        let renaming = renaming.clone();
        Callback::from(move |_: MouseEvent| renaming.set(true))
    };

    Ok(html! {
        <>
            <div class="collection-header">
                if *renaming {
                    <RenameForm id={collection.id} name={AttrValue::from(collection.name.to_string())} on_done={on_renamed} />
                } else {
                    <h2>{collection.name.to_string()}</h2>
                    <button class="link-button" onclick={start_renaming}>{"Rename"}</button>
                }
                if collection.is_default {
                    <span class="badge">{"Default"}</span>
                }
                <span class="collection-count">{video_count(contents.videos.len() as u64)}</span>
            </div>
            <VideoGrid videos={contents.videos.clone()} loading=false {on_remove} empty_message="This collection is empty" />
        </>
    })
}

#[derive(Properties, PartialEq)]
pub struct CollectionDetailPageProps {
    pub id: u64,
}

#[function_component]
pub fn CollectionDetailPage(props: &CollectionDetailPageProps) -> Html {
    use_redirect_anonymous();
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let version = use_state_eq(|| 0u32);
    let on_changed = {
        let version = version.clone();
        use_callback(*version, move |(), version_value| version.set(version_value.wrapping_add(1)))
    };

    if !auth.state().is_authenticated() {
        return html! {};
    }
    let fallback = html! {
        <center><b>{"Loading..."}</b></center>
    };

    html! {
        <div id="page-collection">
            <Link<MainRoute> to={MainRoute::Collections} classes="back-link">{"← My collections"}</Link<MainRoute>>
            <Suspense {fallback}>
                <CollectionContentsView id={props.id} version={*version} {on_changed} />
            </Suspense>
        </div>
    }
}
