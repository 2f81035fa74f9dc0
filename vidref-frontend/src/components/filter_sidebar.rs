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

use strum::VariantArray;
use vidref_api::unsync::{Hook, Tag, TransitionType};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::categories::CategoryTree;
use crate::filters::{Feature, FilterAction, FilterLookups, FilterState, Pacing, Platform, ProductionLevel};

/// Reference lists the attribute filters pick from
#[derive(Clone, Default, PartialEq)]
pub struct LookupLists {
    pub hooks: Rc<[Hook]>,
    pub tags: Rc<[Tag]>,
    pub transition_types: Rc<[TransitionType]>,
}

impl LookupLists {
    pub fn lookups<'a>(&'a self, categories: Option<&'a CategoryTree>) -> FilterLookups<'a> {
        FilterLookups {
            categories,
            hooks: &self.hooks,
            tags: &self.tags,
            transition_types: &self.transition_types,
        }
    }
}

/// Generator macro for a group of toggle chips over one enum
///
/// Takes the enum type, the [`FilterState`] field and the matching [`FilterAction`] variant.
macro_rules! chip_group {
    ($props:expr, $title:expr, $type:ty, $field:ident, $action:ident) => {
        html! {
            <div class="filter-group">
                <label>{$title}</label>
                <div class="filter-chips">
                    {for <$type>::VARIANTS.iter().map(|value| {
                        let active = $props.filters.$field.contains(value);
                        let value = *value;
                        let onclick = $props.dispatch.reform(move |_: MouseEvent| FilterAction::$action(value));
                        html! {
                            <button class={classes!("filter-chip", active.then_some("active"))} {onclick}>{value.label()}</button>
                        }
                    })}
                </div>
            </div>
        }
    };
}

/// Items whose name contains `search`, ignoring case
fn matching<'a>(items: impl IntoIterator<Item = (u64, &'a str)>, search: &str) -> Vec<(u64, &'a str)> {
    let search = search.trim().to_lowercase();
    items
        .into_iter()
        .filter(|(_, name)| search.is_empty() || name.to_lowercase().contains(&search))
        .collect()
}

fn named_items<'a>(items: impl Iterator<Item = (u64, &'a Rc<str>)>) -> Rc<[(u64, Rc<str>)]> {
    items.map(|(id, name)| (id, name.clone())).collect()
}

#[derive(Properties, PartialEq)]
struct LookupGroupProps {
    title: AttrValue,
    items: Rc<[(u64, Rc<str>)]>,
    selected: Rc<[u64]>,
    on_toggle: Callback<u64>,
}

/// A searchable checkbox list over one of the lookup tables
#[function_component]
fn LookupGroup(props: &LookupGroupProps) -> Html {
    let search = use_state_eq(String::new);
    let oninput = {
        let search = search.clone();
        use_callback((), move |e: InputEvent, ()| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search.set(input.value());
        })
    };

    if props.items.is_empty() {
        return html! {};
    }
    let visible = matching(props.items.iter().map(|(id, name)| (*id, &**name)), &search);

    html! {
        <div class="filter-group">
            <label>{props.title.clone()}</label>
            <input type="search" class="filter-search" placeholder="Filter..." value={(*search).clone()} {oninput} />
            <div class="filter-options">
                {for visible.into_iter().map(|(id, name)| {
                    let onchange = props.on_toggle.reform(move |_: Event| id);
                    html! {
                        <label key={id}>
                            <input type="checkbox" checked={props.selected.contains(&id)} {onchange} />
                            {name.to_owned()}
                        </label>
                    }
                })}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FilterSidebarProps {
    pub filters: Rc<FilterState>,
    pub dispatch: Callback<FilterAction>,
    #[prop_or_default]
    pub lookups: LookupLists,
}

#[function_component]
pub fn FilterSidebar(props: &FilterSidebarProps) -> Html {
    let hooks = named_items(props.lookups.hooks.iter().map(|h| (h.id, &h.name)));
    let tags = named_items(props.lookups.tags.iter().map(|t| (t.id, &t.name)));
    let transition_types = named_items(props.lookups.transition_types.iter().map(|t| (t.id, &t.name)));

    let toggle_hook = props.dispatch.reform(FilterAction::ToggleHook);
    let toggle_tag = props.dispatch.reform(FilterAction::ToggleTag);
    let toggle_transition_type = props.dispatch.reform(FilterAction::ToggleTransitionType);
    let reset = props.dispatch.reform(|_: MouseEvent| FilterAction::Reset);

    html! {
        <div class="filter-sidebar">
            {chip_group!(props, "Platform", Platform, platform, TogglePlatform)}
            {chip_group!(props, "Pacing", Pacing, pacing, TogglePacing)}
            {chip_group!(props, "Production level", ProductionLevel, production_level, ToggleProductionLevel)}
            <div class="filter-group checkboxes">
                {for Feature::VARIANTS.iter().map(|feature| {
                    let feature = *feature;
                    let onchange = props.dispatch.reform(move |_: Event| FilterAction::ToggleFeature(feature));
                    html! {
                        <label key={feature.key().to_owned()}>
                            <input type="checkbox" checked={props.filters.features.contains(feature)} {onchange} />
                            {feature.label()}
                        </label>
                    }
                })}
            </div>
            <LookupGroup title="Hooks" items={hooks} selected={props.filters.hook_ids.iter().copied().collect::<Rc<[_]>>()} on_toggle={toggle_hook} />
            <LookupGroup title="Tags" items={tags} selected={props.filters.tag_ids.iter().copied().collect::<Rc<[_]>>()} on_toggle={toggle_tag} />
            <LookupGroup title="Transitions" items={transition_types} selected={props.filters.transition_type_ids.iter().copied().collect::<Rc<[_]>>()} on_toggle={toggle_transition_type} />
            if !props.filters.is_empty() {
                <button class="filter-reset" onclick={reset}>{format!("Reset filters ({})", props.filters.active_count())}</button>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_search_is_case_insensitive() {
        let items = [(1, "Whip pan"), (2, "Zoom"), (3, "Match cut")];
        assert_eq!(matching(items, "ZO"), [(2, "Zoom")]);
        assert_eq!(matching(items, " ").len(), 3);
    }
}
