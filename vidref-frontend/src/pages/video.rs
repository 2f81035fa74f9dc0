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
use std::cell::RefCell;
use std::rc::Rc;

use enumflags2::BitFlags;
use gloo_console::error;
use serde_json::Value;
use strum::VariantArray;
use vidref_api::unsync::{Tutorial, VideoReference};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::ApiResult;
use crate::components::library_buttons::{BookmarkButton, LikeButton};
use crate::components::icon::*;
use crate::contexts::*;
use crate::filters::{video_features, Feature};
use crate::hooks::use_async_suspension;
use crate::pages::MainRoute;
use crate::player::components::DetailPlayer;
use crate::swipe::{neighbour, SwipeAccumulator, SwipeDirection};
use crate::utils::format_duration;

/// `camera_angle` -> `Camera angle`
fn humanize_key(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_detail_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Array(items) => items.iter().map(render_detail_value).collect::<Vec<_>>().join(", "),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn tutorial_span(tutorial: &Tutorial) -> Option<String> {
    match (tutorial.start_sec, tutorial.end_sec) {
        (Some(start), Some(end)) => Some(format!("{} - {}", format_duration(start), format_duration(end))),
        (Some(start), None) => Some(format!("from {}", format_duration(start))),
        (None, Some(end)) => Some(format!("until {}", format_duration(end))),
        (None, None) => None,
    }
}

#[derive(Properties, PartialEq)]
struct FeatureChecklistProps {
    features: BitFlags<Feature>,
}

#[function_component]
fn FeatureChecklist(props: &FeatureChecklistProps) -> Html {
    html! {
        <ul class="feature-checklist">
            {for Feature::VARIANTS.iter().map(|feature| {
                let present = props.features.contains(*feature);
                html! {
                    <li key={feature.key()} class={classes!(present.then_some("present"))}>
                        <span class="feature-mark">{if present { "✓" } else { "✗" }}</span>
                        {feature.label()}
                    </li>
                }
            })}
        </ul>
    }
}

#[derive(Properties, PartialEq)]
struct VideoSidebarProps {
    video: Rc<VideoReference>,
}

#[function_component]
fn VideoSidebar(props: &VideoSidebarProps) -> Html {
    let video = &props.video;
    let features = video_features(video);

    html! {
        <div id="video-sidebar">
            <h2>{video.title.to_string()}</h2>
            if let Some(ref category) = video.category {
                <span class="video-category badge">{category.name.to_string()}</span>
            }
            <div class="video-actions">
                <LikeButton video_id={video.id} liked={video.is_liked} likes_count={video.likes_count} />
                <BookmarkButton video_id={video.id} saved={video.is_saved} show_text=true />
            </div>
            if let Some(ref summary) = video.public_summary {
                <p class="video-summary">{summary.to_string()}</p>
            }
            if let Some(ref url) = video.source_url {
                <a class="source-link" href={AttrValue::from(url.clone())} target="_blank" rel="noopener noreferrer">
                    <Icon r#type={IconType::ExternalLink} />{" View original"}
                </a>
            }
            if !video.tags.is_empty() {
                <div class="video-tags">
                    <h3>{"Tags"}</h3>
                    {for video.tags.iter().map(|tag| html! {
                        <span key={tag.id} class="tag">{tag.name.to_string()}</span>
                    })}
                </div>
            }
            if !video.tutorials.is_empty() {
                <div class="video-tutorials">
                    <h3>{"Tutorials"}</h3>
                    <ul>
                        {for video.tutorials.iter().enumerate().map(|(i, tutorial)| {
                            let label = tutorial.label.as_deref().unwrap_or("Tutorial").to_owned();
                            html! {
                                <li key={i}>
                                    if let Some(ref url) = tutorial.tutorial_url {
                                        <a href={AttrValue::from(url.clone())} target="_blank" rel="noopener noreferrer">{label}</a>
                                    } else {
                                        <span>{label}</span>
                                    }
                                    if let Some(span) = tutorial_span(tutorial) {
                                        <span class="tutorial-span">{" ("}{span}{")"}</span>
                                    }
                                </li>
                            }
                        })}
                    </ul>
                </div>
            }
            <div class="video-features">
                <h3>{"Features"}</h3>
                <FeatureChecklist {features} />
            </div>
            if let Some(ref details) = video.details_public {
                if !details.is_empty() {
                    <table class="video-details">
                        {for details.iter().map(|(key, value)| html! {
                            <tr key={key.to_string()}>
                                <th>{humanize_key(key)}</th>
                                <td>{render_detail_value(value)}</td>
                            </tr>
                        })}
                    </table>
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct VideoDetailsProps {
    id: u64,
}

#[function_component]
fn VideoDetails(props: &VideoDetailsProps) -> HtmlResult {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let result: Rc<ApiResult<Rc<VideoReference>>> = use_async_suspension(|(api, id)| async move {
        let result = api.video(id).await.map(Rc::new);
        if let Err(ref e) = result {
            error!(format!("Failed to fetch video {id}: {e:?}"));
        }
        result
    }, (api, props.id))?;

    Ok(match *result {
        Ok(ref video) => html! {
            <>
                <div id="video-player">
                    <DetailPlayer video={video.clone()} />
                </div>
                <VideoSidebar video={video.clone()} />
            </>
        },
        Err(ref e) => html! {
            <div class="error-banner">
                <h3>{e.user_message("Failed to load this video")}</h3>
                <Link<MainRoute> to={MainRoute::Home}>{"Return to home page"}</Link<MainRoute>>
            </div>
        },
    })
}

#[derive(Properties, PartialEq)]
pub struct VideoPageProps {
    pub id: u64,
}

#[function_component]
pub fn VideoPage(props: &VideoPageProps) -> Html {
    let navigator = use_navigator().expect("navigator should exist");
    let list_context: Option<VideoListContext> = use_context();
    let ids: Rc<[u64]> = list_context.map(|c| c.ids).unwrap_or_else(|| Rc::from([]));
    let swipe: Rc<RefCell<SwipeAccumulator>> = use_mut_ref(SwipeAccumulator::default);

    let go = {
        let (navigator, ids, id) = (navigator.clone(), ids.clone(), props.id);
        move |direction: SwipeDirection| {
            if let Some(id) = neighbour(&ids, id, direction) {
                navigator.push(&MainRoute::Video { id });
            }
        }
    };
    let onwheel = {
        let go = go.clone();
        Callback::from(move |e: WheelEvent| {
            let direction = swipe.borrow_mut().on_wheel(e.delta_y(), e.time_stamp());
            if let Some(direction) = direction {
                go(direction);
            }
        })
    };
    let previous = neighbour(&ids, props.id, SwipeDirection::Previous).is_some();
    let next = neighbour(&ids, props.id, SwipeDirection::Next).is_some();
    let on_previous = {
        let go = go.clone();
        Callback::from(move |_: MouseEvent| go(SwipeDirection::Previous))
    };
    let on_next = Callback::from(move |_: MouseEvent| go(SwipeDirection::Next));

    let fallback = html! {
        <center><b>{"Loading..."}</b></center>
    };

    html! {
        <div id="page-video" {onwheel}>
            <Suspense {fallback}>
                <VideoDetails key={props.id} id={props.id} />
            </Suspense>
            <div class="video-nav">
                <button disabled={!previous} onclick={on_previous} title="Previous video">{"▲"}</button>
                <button disabled={!next} onclick={on_next} title="Next video">{"▼"}</button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_keys_are_humanized() {
        assert_eq!(humanize_key("camera_angle"), "Camera angle");
        assert_eq!(humanize_key("color-grade"), "Color grade");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn detail_values_render_as_text() {
        assert_eq!(render_detail_value(&Value::from("slow")), "slow");
        assert_eq!(render_detail_value(&Value::from(true)), "Yes");
        assert_eq!(render_detail_value(&serde_json::json!(["a", 2])), "a, 2");
        assert_eq!(render_detail_value(&Value::Null), "-");
        assert_eq!(render_detail_value(&Value::from(3.5)), "3.5");
    }

    #[test]
    fn tutorial_spans_use_available_bounds() {
        let mut tutorial = Tutorial { label: None, start_sec: Some(5), end_sec: Some(75), tutorial_url: None };
        assert_eq!(tutorial_span(&tutorial).as_deref(), Some("0:05 - 1:15"));
        tutorial.end_sec = None;
        assert_eq!(tutorial_span(&tutorial).as_deref(), Some("from 0:05"));
        tutorial.start_sec = None;
        assert_eq!(tutorial_span(&tutorial), None);
    }
}
