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

use yew::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconType {
    Logo,
    Settings,
    Close,
    Wait,
    Done,
    Liked,
    NotLiked,
    Saved,
    NotSaved,
    User,
    Collection,
    Share,
    Delete,
    Filter,
    Search,
    ExternalLink,
}

#[derive(Properties, PartialEq)]
pub struct IconProps {
    pub r#type: IconType,
    #[prop_or_default]
    pub tooltip: Option<AttrValue>,
}

#[function_component]
pub fn Icon(props: &IconProps) -> Html {
    let class = match props.r#type {
        IconType::Logo         => classes!("icon", "icon-logo"),
        IconType::Settings     => classes!("icon", "icon-settings"),
        IconType::Close        => classes!("icon", "icon-close"),
        IconType::Wait         => classes!("icon", "icon-wait"),
        IconType::Done         => classes!("icon", "icon-done"),
        IconType::Liked        => classes!("icon", "icon-heart", "filled"),
        IconType::NotLiked     => classes!("icon", "icon-heart"),
        IconType::Saved        => classes!("icon", "icon-bookmark", "filled"),
        IconType::NotSaved     => classes!("icon", "icon-bookmark"),
        IconType::User         => classes!("icon", "icon-user"),
        IconType::Collection   => classes!("icon", "icon-collection"),
        IconType::Share        => classes!("icon", "icon-share"),
        IconType::Delete       => classes!("icon", "icon-delete"),
        IconType::Filter       => classes!("icon", "icon-filter"),
        IconType::Search       => classes!("icon", "icon-search"),
        IconType::ExternalLink => classes!("icon", "icon-external-link"),
    };

    html! {
        <span {class} title={props.tooltip.clone()}></span>
    }
}
