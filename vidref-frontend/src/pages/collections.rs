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

use gloo_console::error;
use vidref_api::unsync::Collection;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, HtmlInputElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::ApiResult;
use crate::components::icon::*;
use crate::contexts::*;
use crate::hooks::use_async_suspension;
use crate::pages::{use_redirect_anonymous, MainRoute};

pub fn video_count(count: u64) -> String {
    match count {
        1 => "1 video".to_owned(),
        n => format!("{n} videos"),
    }
}

fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[derive(Properties, PartialEq)]
struct CollectionListProps {
    /// Bumped to refetch the list
    version: u32,
    on_changed: Callback<()>,
    on_error: Callback<String>,
}

#[function_component]
fn CollectionList(props: &CollectionListProps) -> HtmlResult {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let result: Rc<ApiResult<Vec<Collection>>> = use_async_suspension(|(api, _)| async move {
        let result = api.collections().await;
        if let Err(ref e) = result {
            error!(format!("Failed to fetch collections: {e:?}"));
        }
        result
    }, (api.clone(), props.version))?;

    let collections = match *result {
        Ok(ref collections) => collections,
        Err(ref e) => return Ok(html! {
            <div class="error-banner">{e.user_message("Failed to load collections")}</div>
        }),
    };
    if collections.is_empty() {
        return Ok(html! {
            <div class="video-grid-status">{"You don't have any collections yet"}</div>
        });
    }

    Ok(html! {
        <ul class="collection-list">
            {for collections.iter().map(|collection| {
                let id = collection.id;
                let ondelete = (!collection.is_default).then(|| {
                    let (api, on_changed, on_error) = (api.clone(), props.on_changed.clone(), props.on_error.clone());
                    let name = collection.name.clone();
                    Callback::from(move |_: MouseEvent| {
                        if !confirm(&format!("Delete the collection \"{name}\"?")) {
                            return;
                        }
                        let (api, on_changed, on_error) = (api.clone(), on_changed.clone(), on_error.clone());
                        spawn_local(async move {
                            match api.delete_collection(id).await {
                                Ok(()) => on_changed.emit(()),
                                Err(e) => {
                                    error!(format!("Failed to delete collection {id}: {e}"));
                                    on_error.emit(e.user_message("Failed to delete the collection"));
                                },
                            }
                        });
                    })
                });
                html! {
                    <li key={id} class="collection-item">
                        <Link<MainRoute> to={MainRoute::CollectionDetail { id }} classes="collection-name">
                            <Icon r#type={IconType::Collection} />{" "}{collection.name.to_string()}
                        </Link<MainRoute>>
                        if collection.is_default {
                            <span class="badge">{"Default"}</span>
                        }
                        <span class="collection-count">{video_count(collection.video_references_count)}</span>
                        if let Some(ref token) = collection.share_token {
                            <Link<MainRoute> to={MainRoute::Shared { token: AttrValue::from(token.to_string()) }} classes="collection-share">
                                <Icon r#type={IconType::Share} tooltip="Public link" />
                            </Link<MainRoute>>
                        }
                        if let Some(onclick) = ondelete {
                            <button class="remove-button" {onclick}>
                                <Icon r#type={IconType::Delete} tooltip="Delete collection" />
                            </button>
                        }
                    </li>
                }
            })}
        </ul>
    })
}

#[function_component]
pub fn CollectionsPage() -> Html {
    use_redirect_anonymous();
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let version = use_state_eq(|| 0u32);
    let new_name = use_state(String::new);
    let creating = use_state_eq(|| false);
    let error = use_state(|| None::<String>);

    let on_changed = {
        let version = version.clone();
        use_callback(*version, move |(), version_value| version.set(version_value.wrapping_add(1)))
    };
    let on_error = {
        let error = error.clone();
        use_callback((), move |message: String, ()| error.set(Some(message)))
    };
    let oninput = {
        let new_name = new_name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            new_name.set(input.value());
        })
    };
    let onsubmit = {
        let (new_name, creating, error, on_changed) = (new_name.clone(), creating.clone(), error.clone(), on_changed.clone());
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let name = new_name.trim().to_owned();
            if name.is_empty() || *creating {
                return;
            }
            creating.set(true);
            error.set(None);
            let (api, new_name, creating, error, on_changed) = (api.clone(), new_name.clone(), creating.clone(), error.clone(), on_changed.clone());
            spawn_local(async move {
                match api.create_collection(&name).await {
                    Ok(_) => {
                        new_name.set(String::new());
                        on_changed.emit(());
                    },
                    Err(e) => {
                        error!(format!("Failed to create collection: {e}"));
                        error.set(Some(e.user_message("Failed to create the collection")));
                    },
                }
                creating.set(false);
            });
        })
    };

    if !auth.state().is_authenticated() {
        return html! {};
    }
    let fallback = html! {
        <center><b>{"Loading..."}</b></center>
    };

    html! {
        <div id="page-collections">
            <h2>{"My collections"}</h2>
            <form class="collection-create" {onsubmit}>
                <input type="text" placeholder="New collection name" value={(*new_name).clone()} {oninput} />
                <button type="submit" class="primary" disabled={*creating || new_name.trim().is_empty()}>
                    {if *creating { "Creating..." } else { "Create" }}
                </button>
            </form>
            if let Some(ref message) = *error {
                <div class="error-banner">{message}</div>
            }
            <Suspense {fallback}>
                <CollectionList version={*version} {on_changed} {on_error} />
            </Suspense>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_counts_are_pluralized() {
        assert_eq!(video_count(0), "0 videos");
        assert_eq!(video_count(1), "1 video");
        assert_eq!(video_count(12), "12 videos");
    }
}
