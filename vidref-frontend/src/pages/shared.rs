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
use vidref_api::unsync::VideoReference;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::ApiResult;
use crate::components::video_grid::VideoGrid;
use crate::contexts::*;
use crate::hooks::use_async_suspension;
use crate::pages::collections::video_count;
use crate::pages::MainRoute;

#[derive(Properties, PartialEq)]
struct SharedCollectionProps {
    token: AttrValue,
}

#[function_component]
fn SharedCollection(props: &SharedCollectionProps) -> HtmlResult {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let result: Rc<ApiResult<(AttrValue, Rc<[Rc<VideoReference>]>)>> = use_async_suspension(|(api, token)| async move {
        let result = api.shared_collection(&token).await.map(|shared| {
            (AttrValue::from(shared.name.to_string()), shared.videos.into_iter().map(Rc::new).collect())
        });
        if let Err(ref e) = result {
            error!(format!("Failed to fetch shared collection {token}: {e:?}"));
        }
        result
    }, (api, props.token.clone()))?;

    Ok(match *result {
        Ok((ref name, ref videos)) => html! {
            <>
                <div class="collection-header">
                    <h2>{name.clone()}</h2>
                    <span class="badge">{"Shared"}</span>
                    <span class="collection-count">{video_count(videos.len() as u64)}</span>
                </div>
                <VideoGrid videos={videos.clone()} loading=false empty_message="This collection is empty" />
            </>
        },
        Err(ref e) => html! {
            <div class="error-banner">
                <h3>{e.user_message("This shared collection is not available")}</h3>
                <Link<MainRoute> to={MainRoute::Home}>{"Return to home page"}</Link<MainRoute>>
            </div>
        },
    })
}

#[derive(Properties, PartialEq)]
pub struct SharedCollectionPageProps {
    pub token: AttrValue,
}

/// Public view of a collection, works without an account
#[function_component]
pub fn SharedCollectionPage(props: &SharedCollectionPageProps) -> Html {
    let fallback = html! {
        <center><b>{"Loading..."}</b></center>
    };
    html! {
        <div id="page-shared">
            <Suspense {fallback}>
                <SharedCollection token={props.token.clone()} />
            </Suspense>
        </div>
    }
}
