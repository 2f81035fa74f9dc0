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
use web_sys::Element;
use yew::prelude::*;

use crate::contexts::SettingsContext;
use crate::player::{instagram, select_player, Embed, PlayerConfig};

#[derive(Properties, PartialEq)]
pub struct EmbedProps {
    pub embed: Embed,
}

/// Renders an [`Embed`] descriptor
///
/// Every player is keyed by its URL, so a different embed always gets a fresh element.
#[function_component]
pub fn EmbedRenderer(props: &EmbedProps) -> Html {
    match props.embed {
        Embed::Iframe { ref url, allow, class } => html! {
            <div class={classes!("player", class)} key={url.to_string()}>
                <iframe
                    src={AttrValue::from(url.clone())}
                    {allow}
                    allowfullscreen=true
                    frameborder="0"
                    scrolling="no"
                    title="Embedded video"
                />
            </div>
        },
        Embed::Instagram { ref permalink } => html! {
            <InstagramEmbed key={permalink.to_string()} permalink={AttrValue::from(permalink.clone())} />
        },
        Embed::Placeholder(reason) => html! {
            <div class="player player-placeholder">
                <span>{reason.message()}</span>
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
struct InstagramEmbedProps {
    permalink: AttrValue,
}

#[function_component]
fn InstagramEmbed(props: &InstagramEmbedProps) -> Html {
    let container = use_node_ref();
    {
        let container = container.clone();
        use_effect_with(props.permalink.clone(), move |permalink| {
            let Some(element) = container.cast::<Element>() else { return };
            if let Err(e) = instagram::mount_embed(&element, permalink) {
                error!(format!("{e:?}"));
            }
        });
    }

    html! {
        <div class="player instagram-player" ref={container} />
    }
}

#[derive(Properties, PartialEq)]
pub struct PlayerProps {
    pub video: Rc<VideoReference>,
}

fn embed_for(video: &VideoReference, config: &PlayerConfig) -> Embed {
    select_player(&video.platform, video.platform_video_id.as_deref(), video.source_url.as_deref(), config)
}

/// The large player on the video page
#[function_component]
pub fn DetailPlayer(props: &PlayerProps) -> Html {
    let settings_context: SettingsContext = use_context().expect("SettingsContext should be available");
    let variant = settings_context.settings().tiktok_player_variant;
    let embed = use_memo((props.video.clone(), variant), |(video, variant)| {
        embed_for(video, &PlayerConfig::detail().with_tiktok_variant(*variant))
    });

    html! {
        <div class="detail-player">
            <EmbedRenderer embed={(*embed).clone()} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ListPlayerProps {
    pub video: Rc<VideoReference>,
    pub visible: bool,
}

/// The small player of a video card, only mounted once the card settled in view
#[function_component]
pub fn ListPlayer(props: &ListPlayerProps) -> Html {
    let settings_context: SettingsContext = use_context().expect("SettingsContext should be available");
    let settings = settings_context.settings();
    let embed = use_memo(
        (props.video.clone(), props.visible, settings.autoplay_in_list, settings.tiktok_player_variant),
        |(video, visible, autoplay, variant)| {
            let config = PlayerConfig::list(&video.platform, *visible, *autoplay).with_tiktok_variant(*variant);
            embed_for(video, &config)
        },
    );

    html! {
        <div class="list-player">
            <EmbedRenderer embed={(*embed).clone()} />
        </div>
    }
}
