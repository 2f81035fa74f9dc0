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
use std::collections::BTreeSet;
use std::rc::Rc;

use gloo_console::error;
use vidref_api::unsync::Collection;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api_client::{ApiError, ApiResult};
use crate::contexts::*;

/// Collections whose name contains `search`, ignoring case
fn filter_collections<'a>(collections: &'a [Collection], search: &str) -> Vec<&'a Collection> {
    let search = search.trim().to_lowercase();
    collections
        .iter()
        .filter(|c| search.is_empty() || c.name.to_lowercase().contains(&search))
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct SaveToCollectionModalProps {
    pub video_id: u64,
    /// Receives whether the video is in any collection after every change
    #[prop_or_default]
    pub on_saved_change: Callback<bool>,
}

/// Collection memberships of one video, refreshed from the server after every change
#[derive(Clone, Default, PartialEq)]
struct Memberships {
    collection_ids: BTreeSet<u64>,
    /// Collections with a change in flight
    pending: BTreeSet<u64>,
}

enum MembershipAction {
    Started(u64),
    /// Fresh membership list if the refetch succeeded, and the collection whose change completed
    Refreshed(Option<BTreeSet<u64>>, Option<u64>),
}

impl Reducible for Memberships {
    type Action = MembershipAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            MembershipAction::Started(id) => {
                next.pending.insert(id);
            },
            MembershipAction::Refreshed(ids, done) => {
                if let Some(ids) = ids {
                    next.collection_ids = ids;
                }
                if let Some(id) = done {
                    next.pending.remove(&id);
                }
            },
        }
        Rc::new(next)
    }
}

async fn fetch_memberships(api: &ApiClient, video_id: u64) -> ApiResult<(bool, BTreeSet<u64>)> {
    let saved = api.saved_state(video_id).await?;
    Ok((saved.is_saved, saved.collection_ids.into_iter().collect()))
}

#[function_component]
pub fn SaveToCollectionModal(props: &SaveToCollectionModalProps) -> Html {
    let api: ApiClient = use_context().expect("ApiClient should be available");

    let collections = use_state(|| None::<Rc<[Collection]>>);
    let memberships = use_reducer(Memberships::default);
    let search = use_state(String::new);
    let new_name = use_state(String::new);
    let creating = use_state(|| false);
    let error = use_state(|| None::<String>);

    // refetches the memberships and reports them, `done` is cleared from the pending set
    let refresh = {
        let (api, memberships, on_saved_change, video_id) = (api.clone(), memberships.clone(), props.on_saved_change.clone(), props.video_id);
        Callback::from(move |done: Option<u64>| {
            let (api, memberships, on_saved_change) = (api.clone(), memberships.clone(), on_saved_change.clone());
            spawn_local(async move {
                let ids = match fetch_memberships(&api, video_id).await {
                    Ok((is_saved, ids)) => {
                        on_saved_change.emit(is_saved);
                        Some(ids)
                    },
                    Err(e) => {
                        error!(format!("Failed to check the saved state of video {video_id}: {e}"));
                        None
                    },
                };
                memberships.dispatch(MembershipAction::Refreshed(ids, done));
            });
        })
    };

    {
        let (api, collections, error, refresh) = (api.clone(), collections.clone(), error.clone(), refresh.clone());
        use_effect_with(props.video_id, move |_| {
            refresh.emit(None);
            spawn_local(async move {
                match api.collections().await {
                    Ok(list) => collections.set(Some(list.into())),
                    Err(e) => {
                        error!(format!("Failed to load collections: {e}"));
                        error.set(Some(e.user_message("Failed to load collections")));
                        collections.set(Some(Rc::from([])));
                    },
                }
            });
        });
    }

    let toggle = {
        let (api, memberships, refresh, video_id) = (api.clone(), memberships.clone(), refresh.clone(), props.video_id);
        Callback::from(move |collection_id: u64| {
            if memberships.pending.contains(&collection_id) {
                return;
            }
            let was_member = memberships.collection_ids.contains(&collection_id);
            memberships.dispatch(MembershipAction::Started(collection_id));

            let (api, refresh) = (api.clone(), refresh.clone());
            spawn_local(async move {
                let result = if was_member {
                    api.remove_from_collection(collection_id, video_id).await
                } else {
                    api.add_to_collection(collection_id, video_id).await
                };
                match result {
                    // already in there
                    Ok(()) | Err(ApiError::Conflict { .. }) => (),
                    Err(e) => error!(format!("Failed to update collection {collection_id}: {e}")),
                }
                refresh.emit(Some(collection_id));
            });
        })
    };

    let oncreate = {
        let (api, collections, new_name, creating, error, refresh, video_id) = (api, collections.clone(), new_name.clone(), creating.clone(), error.clone(), refresh, props.video_id);
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let name = new_name.trim().to_owned();
            if name.is_empty() || *creating {
                return;
            }
            creating.set(true);
            let (api, collections, new_name, creating, error, refresh) = (api.clone(), collections.clone(), new_name.clone(), creating.clone(), error.clone(), refresh.clone());
            spawn_local(async move {
                match api.create_collection(&name).await {
                    Ok(collection) => {
                        let id = collection.id;
                        let mut list: Vec<Collection> = collections.as_deref().unwrap_or_default().to_vec();
                        list.push(collection);
                        collections.set(Some(list.into()));
                        new_name.set(String::new());
                        match api.add_to_collection(id, video_id).await {
                            Ok(()) | Err(ApiError::Conflict { .. }) => (),
                            Err(e) => error!(format!("Failed to add video {video_id} to the new collection: {e}")),
                        }
                        refresh.emit(None);
                    },
                    Err(e) => {
                        error!(format!("Failed to create a collection: {e}"));
                        error.set(Some(e.user_message("Failed to create the collection")));
                    },
                }
                creating.set(false);
            });
        })
    };
    let onsearch = {
        let search = search.clone();
        use_callback((), move |e: InputEvent, ()| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search.set(input.value());
        })
    };
    let onnameinput = {
        let new_name = new_name.clone();
        use_callback((), move |e: InputEvent, ()| {
            let input: HtmlInputElement = e.target_unchecked_into();
            new_name.set(input.value());
        })
    };

    let list = match *collections {
        None => html! { <div class="loading">{"Loading collections..."}</div> },
        Some(ref all) => {
            let visible = filter_collections(all, &search);
            if visible.is_empty() {
                html! {
                    <div class="empty-collections">
                        {if all.is_empty() { "You have no collections yet" } else { "No collections match your search" }}
                    </div>
                }
            } else {
                html! {
                    <ul class="collection-list">
                        {for visible.into_iter().map(|collection| {
                            let id = collection.id;
                            let selected = memberships.collection_ids.contains(&id);
                            let onclick = toggle.reform(move |_: MouseEvent| id);
                            html! {
                                <li key={id} class={classes!("collection-item", "clickable", selected.then_some("selected"))} {onclick}>
                                    <input type="checkbox" checked={selected} disabled={memberships.pending.contains(&id)} />
                                    <span class="collection-name">{collection.name.to_string()}</span>
                                    if selected {
                                        <span class="collection-added">{"Added"}</span>
                                    }
                                </li>
                            }
                        })}
                    </ul>
                }
            }
        },
    };

    html! {
        <div id="save-to-collection-modal">
            <h2>{"Collections"}</h2>
            if let Some(ref message) = *error {
                <div class="error">{message}</div>
            }
            <input type="search" placeholder="Search collections" value={(*search).clone()} oninput={onsearch} />
            {list}
            <form class="create-collection" onsubmit={oncreate}>
                <input type="text" placeholder="New collection name" value={(*new_name).clone()} oninput={onnameinput} />
                <button type="submit" disabled={*creating || new_name.trim().is_empty()}>
                    {if *creating { "Creating..." } else { "Create new collection" }}
                </button>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(id: u64, name: &str) -> Collection {
        Collection {
            id,
            name: name.into(),
            is_default: id == 1,
            video_references_count: 0,
            share_token: None,
        }
    }

    #[test]
    fn refresh_clears_only_the_finished_change() {
        let state = Rc::new(Memberships::default())
            .reduce(MembershipAction::Started(1))
            .reduce(MembershipAction::Started(2))
            .reduce(MembershipAction::Refreshed(Some([1].into()), Some(1)));
        assert_eq!(state.collection_ids, [1].into());
        assert_eq!(state.pending, [2].into());
        let state = state.reduce(MembershipAction::Refreshed(None, Some(2)));
        assert_eq!(state.collection_ids, [1].into());
        assert!(state.pending.is_empty());
    }

    #[test]
    fn collection_search_ignores_case() {
        let all = [collection(1, "Favorites"), collection(2, "Transitions"), collection(3, "3D intros")];
        let names: Vec<_> = filter_collections(&all, "  TRANS ").into_iter().map(|c| c.id).collect();
        assert_eq!(names, [2]);
        assert_eq!(filter_collections(&all, "").len(), 3);
        assert!(filter_collections(&all, "nothing").is_empty());
    }
}
