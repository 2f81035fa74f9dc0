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
use vidref_api::unsync::{User, VideoReference};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api_client::ApiResult;
use crate::auth::AuthAction;
use crate::components::icon::*;
use crate::components::modals::auth::VerificationModal;
use crate::components::video_grid::VideoGrid;
use crate::contexts::*;
use crate::hooks::use_async_suspension;
use crate::pages::use_redirect_anonymous;
use crate::utils::render_timestamp;

/// Trimmed new name, `None` if there's nothing to save
fn name_change(current: &str, edited: &str) -> Option<String> {
    let edited = edited.trim();
    (!edited.is_empty() && edited != current).then(|| edited.to_owned())
}

#[derive(Properties, PartialEq)]
struct NameEditorProps {
    user: Rc<User>,
}

#[function_component]
fn NameEditor(props: &NameEditorProps) -> Html {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let editing = use_state_eq(|| false);
    let name = use_state(|| props.user.name.to_string());
    let error = use_state(|| None::<String>);
    let saving = use_state_eq(|| false);

    let start_editing = {
        let (editing, name, error, current) = (editing.clone(), name.clone(), error.clone(), props.user.name.clone());
        Callback::from(move |_: MouseEvent| {
            name.set(current.to_string());
            error.set(None);
            editing.set(true);
        })
    };
    let cancel = {
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| editing.set(false))
    };
    let oninput = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };
    let onsubmit = {
        let (editing, name, error, saving) = (editing.clone(), name.clone(), error.clone(), saving.clone());
        let current = props.user.name.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            let Some(new_name) = name_change(&current, &name) else {
                editing.set(false);
                return;
            };
            saving.set(true);
            let (api, auth, editing, error, saving) = (api.clone(), auth.clone(), editing.clone(), error.clone(), saving.clone());
            spawn_local(async move {
                match api.update_profile(&new_name).await {
                    Ok(user) => {
                        auth.dispatch(AuthAction::UserUpdated(user));
                        editing.set(false);
                    },
                    Err(e) => {
                        error!(format!("Failed to update profile: {e}"));
                        error.set(Some(e.user_message("Failed to update profile")));
                    },
                }
                saving.set(false);
            });
        })
    };

    if !*editing {
        return html! {
            <div class="profile-field">
                <span class="profile-name">{props.user.name.to_string()}</span>
                <button class="link-button" onclick={start_editing}>{"Edit"}</button>
            </div>
        };
    }
    html! {
        <form class="profile-field" {onsubmit}>
            <input type="text" required=true value={(*name).clone()} {oninput} />
            <button type="submit" class="primary" disabled={*saving}>{if *saving { "Saving..." } else { "Save" }}</button>
            <button type="button" onclick={cancel}>{"Cancel"}</button>
            if let Some(ref message) = *error {
                <div class="error">{message}</div>
            }
        </form>
    }
}

#[function_component]
fn LikedVideos() -> HtmlResult {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let result: Rc<ApiResult<Rc<[Rc<VideoReference>]>>> = use_async_suspension(|api| async move {
        let result = api.user_likes().await.map(|videos| videos.into_iter().map(Rc::new).collect());
        if let Err(ref e) = result {
            error!(format!("Failed to fetch liked videos: {e:?}"));
        }
        result
    }, api)?;

    Ok(match *result {
        Ok(ref videos) => html! {
            <VideoGrid videos={videos.clone()} loading=false empty_message="You haven't liked any videos yet" />
        },
        Err(ref e) => html! {
            <div class="error-banner">{e.user_message("Failed to load liked videos")}</div>
        },
    })
}

#[function_component]
pub fn ProfilePage() -> Html {
    use_redirect_anonymous();
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let modal_controls: ModalRendererControls = use_context().expect("ProfilePage should be placed inside a ModalRenderer");
    let api: ApiClient = use_context().expect("ApiClient should be available");

    // the session user may predate a verification or a rename done elsewhere
    {
        let auth = auth.clone();
        use_effect_with(api.token().cloned(), move |token| {
            if token.is_some() {
                spawn_local(async move {
                    match api.profile().await {
                        Ok(user) => auth.dispatch(AuthAction::UserUpdated(user)),
                        Err(e) => error!(format!("Failed to refresh the profile: {e}")),
                    }
                });
            }
        });
    }

    let Some(user) = auth.state().user().cloned() else {
        return html! {};
    };

    let verify = {
        let email = AttrValue::from(user.email.to_string());
        Callback::from(move |_: MouseEvent| {
            modal_controls.emit(ModalMessage::Open(html! {<VerificationModal email={email.clone()} />}));
        })
    };
    let fallback = html! {
        <center><b>{"Loading..."}</b></center>
    };

    html! {
        <div id="page-profile">
            <h2>{"Profile"}</h2>
            <table class="profile-table">
                <tr>
                    <th>{"Name"}</th>
                    <td><NameEditor user={user.clone()} /></td>
                </tr>
                <tr>
                    <th>{"Email"}</th>
                    <td>
                        {user.email.to_string()}{" "}
                        if user.email_verified_at.is_some() {
                            <span class="badge verified"><Icon r#type={IconType::Done} />{" Verified"}</span>
                        } else {
                            <button class="link-button" onclick={verify}>{"Verify email"}</button>
                        }
                    </td>
                </tr>
                if let Some(ref created_at) = user.created_at {
                    <tr>
                        <th>{"Member since"}</th>
                        <td>{render_timestamp(created_at)}</td>
                    </tr>
                }
            </table>
            <h3>{"Liked videos"}</h3>
            <Suspense {fallback}>
                <LikedVideos />
            </Suspense>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_real_name_changes_are_saved() {
        assert_eq!(name_change("Ada", "  Grace "), Some("Grace".to_owned()));
        assert_eq!(name_change("Ada", "Ada "), None);
        assert_eq!(name_change("Ada", "   "), None);
    }
}
