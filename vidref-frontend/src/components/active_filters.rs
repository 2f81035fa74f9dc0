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

use yew::prelude::*;

use crate::categories::{CategoryTree, SelectedCategoryIds};
use crate::components::filter_sidebar::LookupLists;
use crate::filters::{active_filters, BadgeRemoval, FilterState};

#[derive(Properties, PartialEq)]
pub struct ActiveFiltersProps {
    pub filters: Rc<FilterState>,
    pub selected_categories: Rc<SelectedCategoryIds>,
    #[prop_or_default]
    pub tree: Option<Rc<CategoryTree>>,
    #[prop_or_default]
    pub lookups: LookupLists,
    pub on_remove: Callback<BadgeRemoval>,
    pub on_clear_all: Callback<()>,
}

/// Removable badges for every active filter, hidden while nothing is filtered
#[function_component]
pub fn ActiveFilters(props: &ActiveFiltersProps) -> Html {
    let badges = active_filters(&props.filters, &props.selected_categories, props.lookups.lookups(props.tree.as_deref()));
    if badges.is_empty() {
        return html! {};
    }
    let clear_all = props.on_clear_all.reform(|_: MouseEvent| ());

    html! {
        <div class="active-filters-container">
            {for badges.into_iter().map(|badge| {
                let removal = badge.removal;
                let onclick = props.on_remove.reform(move |_: MouseEvent| removal);
                html! {
                    <span key={badge.key} class="active-filter-badge">
                        <span class="badge-label">{badge.label}</span>
                        <span class="clickable badge-remove" title="Remove filter" {onclick}>{"×"}</span>
                    </span>
                }
            })}
            <button class="clear-all-btn" onclick={clear_all}>{"Clear all"}</button>
        </div>
    }
}
