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

//! Attribute filters and the composition of the backend search query

use std::collections::BTreeSet;
use std::rc::Rc;

use enumflags2::{bitflags, BitFlags};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr, VariantArray};
use vidref_api::unsync::{Hook, Tag, TransitionType};
use yew::Reducible;

use crate::categories::{CategoryTree, SelectedCategoryIds};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, IntoStaticStr, EnumString, VariantArray, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Tiktok,
    Facebook,
}

impl Platform {
    pub fn label(self) -> &'static str {
        match self {
            Self::Youtube   => "YouTube",
            Self::Instagram => "Instagram",
            Self::Tiktok    => "TikTok",
            Self::Facebook  => "Facebook",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, IntoStaticStr, EnumString, VariantArray, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Pacing {
    Slow,
    Fast,
    Mixed,
}

impl Pacing {
    pub fn label(self) -> &'static str {
        match self {
            Self::Slow  => "Slow",
            Self::Fast  => "Fast",
            Self::Mixed => "Mixed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, IntoStaticStr, EnumString, VariantArray, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductionLevel {
    Low,
    Mid,
    High,
}

impl ProductionLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low  => "Low",
            Self::Mid  => "Mid",
            Self::High => "High",
        }
    }
}

/// Boolean "has ..." attributes of a video reference
#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr, VariantArray)]
pub enum Feature {
    #[strum(serialize = "has_visual_effects")]
    VisualEffects,
    #[strum(serialize = "has_3d")]
    ThreeD,
    #[strum(serialize = "has_animations")]
    Animations,
    #[strum(serialize = "has_typography")]
    Typography,
    #[strum(serialize = "has_sound_design")]
    SoundDesign,
    #[strum(serialize = "has_ai")]
    Ai,
    #[strum(serialize = "has_tutorial")]
    Tutorial,
}

impl Feature {
    /// Query parameter name
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VisualEffects => "Visual Effects",
            Self::ThreeD        => "3D",
            Self::Animations    => "Animations",
            Self::Typography    => "Typography",
            Self::SoundDesign   => "Sound Design",
            Self::Ai            => "AI",
            Self::Tutorial      => "Has Tutorial",
        }
    }
}

/// Features present on a video reference
pub fn video_features(video: &vidref_api::unsync::VideoReference) -> BitFlags<Feature> {
    let mut flags = BitFlags::empty();
    for (set, feature) in [
        (video.has_visual_effects, Feature::VisualEffects),
        (video.has_3d,             Feature::ThreeD),
        (video.has_animations,     Feature::Animations),
        (video.has_typography,     Feature::Typography),
        (video.has_sound_design,   Feature::SoundDesign),
        (video.has_ai,             Feature::Ai),
        (video.has_tutorial,       Feature::Tutorial),
    ] {
        if set {
            flags |= feature;
        }
    }
    flags
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub platform: BTreeSet<Platform>,
    pub pacing: BTreeSet<Pacing>,
    pub production_level: BTreeSet<ProductionLevel>,
    pub hook_ids: BTreeSet<u64>,
    pub tag_ids: BTreeSet<u64>,
    pub transition_type_ids: BTreeSet<u64>,
    pub features: BitFlags<Feature>,
}

/// User actions mutating a [`FilterState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterAction {
    TogglePlatform(Platform),
    TogglePacing(Pacing),
    ToggleProductionLevel(ProductionLevel),
    ToggleHook(u64),
    ToggleTag(u64),
    ToggleTransitionType(u64),
    ToggleFeature(Feature),
    Reset,
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

impl FilterState {
    pub fn apply(&mut self, action: FilterAction) {
        match action {
            FilterAction::TogglePlatform(p)        => toggle(&mut self.platform, p),
            FilterAction::TogglePacing(p)          => toggle(&mut self.pacing, p),
            FilterAction::ToggleProductionLevel(l) => toggle(&mut self.production_level, l),
            FilterAction::ToggleHook(id)           => toggle(&mut self.hook_ids, id),
            FilterAction::ToggleTag(id)            => toggle(&mut self.tag_ids, id),
            FilterAction::ToggleTransitionType(id) => toggle(&mut self.transition_type_ids, id),
            FilterAction::ToggleFeature(f)         => self.features.toggle(f),
            FilterAction::Reset                    => self.reset(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of filter groups in use, for the filter button badge
    pub fn active_count(&self) -> usize {
        [
            self.platform.is_empty(),
            self.pacing.is_empty(),
            self.production_level.is_empty(),
            self.hook_ids.is_empty(),
            self.tag_ids.is_empty(),
            self.transition_type_ids.is_empty(),
        ].into_iter().filter(|empty| !empty).count() + self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

impl Reducible for FilterState {
    type Action = FilterAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut state = (*self).clone();
        state.apply(action);
        state.into()
    }
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    Text(Rc<str>),
    List(Vec<Rc<str>>),
    Flag,
}

/// A composed backend search query
///
/// Entries keep insertion order, two equal objects describe the same query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryObject {
    entries: Vec<(&'static str, QueryValue)>,
}

impl QueryObject {
    fn push(&mut self, key: &'static str, value: QueryValue) {
        self.entries.push((key, value));
    }

    fn push_list<I, S>(&mut self, key: &'static str, values: I)
    where I: IntoIterator<Item = S>,
          S: Into<Rc<str>>,
    {
        let mut values: Vec<Rc<str>> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return;
        }
        values.sort();
        values.dedup();
        self.push(key, QueryValue::List(values));
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire encoding: `key[]=v` per list item, `key=1` per flag, `key=value` for text
    pub fn query_pairs(&self) -> Vec<(String, Rc<str>)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.entries {
            match value {
                QueryValue::Text(text) => pairs.push(((*key).to_owned(), text.clone())),
                QueryValue::List(items) => {
                    let key = format!("{key}[]");
                    pairs.extend(items.iter().map(|item| (key.clone(), item.clone())));
                },
                QueryValue::Flag => pairs.push(((*key).to_owned(), Rc::from("1"))),
            }
        }
        pairs
    }

    pub fn append_to(&self, url: &mut Url) {
        if self.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (key, value) in self.query_pairs() {
            query.append_pair(&key, &value);
        }
    }
}

/// Builds the backend search query, pruning every empty value
pub fn compose(search: &str, filters: &FilterState, selected_categories: &SelectedCategoryIds) -> QueryObject {
    let mut query = QueryObject::default();

    let search = search.trim();
    if !search.is_empty() {
        query.push("search", QueryValue::Text(search.into()));
    }
    // BTreeSet iteration is already ascending
    if !selected_categories.is_empty() {
        query.push("category_ids", QueryValue::List(selected_categories.iter().map(|id| Rc::from(id.to_string())).collect()));
    }
    query.push_list("platform", filters.platform.iter().map(|p| <&'static str>::from(*p)));
    query.push_list("pacing", filters.pacing.iter().map(|p| <&'static str>::from(*p)));
    query.push_list("production_level", filters.production_level.iter().map(|l| <&'static str>::from(*l)));
    query.push_list("hook_ids", filters.hook_ids.iter().map(ToString::to_string));
    query.push_list("tag_ids", filters.tag_ids.iter().map(ToString::to_string));
    query.push_list("transition_type_ids", filters.transition_type_ids.iter().map(ToString::to_string));
    for feature in Feature::VARIANTS {
        if filters.features.contains(*feature) {
            query.push(feature.key(), QueryValue::Flag);
        }
    }

    query
}


/// What removing an active filter badge does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeRemoval {
    Category(u64),
    Filter(FilterAction),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveFilter {
    pub key: String,
    pub label: String,
    pub removal: BadgeRemoval,
}

/// Reference data used to name filter badges
#[derive(Clone, Copy, Default)]
pub struct FilterLookups<'a> {
    pub categories: Option<&'a CategoryTree>,
    pub hooks: &'a [Hook],
    pub tags: &'a [Tag],
    pub transition_types: &'a [TransitionType],
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lists removable badges for every active filter
///
/// Hooks, tags and transition types only get a badge once they can be named.
pub fn active_filters(filters: &FilterState, selected_categories: &SelectedCategoryIds, lookups: FilterLookups<'_>) -> Vec<ActiveFilter> {
    let mut badges = Vec::new();

    for id in selected_categories {
        badges.push(ActiveFilter {
            key: format!("category-{id}"),
            label: match lookups.categories {
                Some(tree) => tree.name_of(*id).to_string(),
                None => format!("Category {id}"),
            },
            removal: BadgeRemoval::Category(*id),
        });
    }
    for p in &filters.platform {
        let value: &'static str = p.into();
        badges.push(ActiveFilter {
            key: format!("platform-{value}"),
            label: format!("Platform: {}", capitalize(value)),
            removal: BadgeRemoval::Filter(FilterAction::TogglePlatform(*p)),
        });
    }
    for p in &filters.pacing {
        let value: &'static str = p.into();
        badges.push(ActiveFilter {
            key: format!("pacing-{value}"),
            label: format!("Pacing: {value}"),
            removal: BadgeRemoval::Filter(FilterAction::TogglePacing(*p)),
        });
    }
    for l in &filters.production_level {
        let value: &'static str = l.into();
        badges.push(ActiveFilter {
            key: format!("prod-{value}"),
            label: format!("Prod: {value}"),
            removal: BadgeRemoval::Filter(FilterAction::ToggleProductionLevel(*l)),
        });
    }
    for feature in Feature::VARIANTS {
        if filters.features.contains(*feature) {
            badges.push(ActiveFilter {
                key: feature.key().to_owned(),
                label: feature.label().to_owned(),
                removal: BadgeRemoval::Filter(FilterAction::ToggleFeature(*feature)),
            });
        }
    }
    for id in &filters.hook_ids {
        if let Some(hook) = lookups.hooks.iter().find(|h| h.id == *id) {
            badges.push(ActiveFilter {
                key: format!("hook-{id}"),
                label: format!("Hook: {}", hook.name),
                removal: BadgeRemoval::Filter(FilterAction::ToggleHook(*id)),
            });
        }
    }
    for id in &filters.tag_ids {
        if let Some(tag) = lookups.tags.iter().find(|t| t.id == *id) {
            badges.push(ActiveFilter {
                key: format!("tag-{id}"),
                label: format!("Tag: {}", tag.name),
                removal: BadgeRemoval::Filter(FilterAction::ToggleTag(*id)),
            });
        }
    }
    for id in &filters.transition_type_ids {
        if let Some(tt) = lookups.transition_types.iter().find(|t| t.id == *id) {
            badges.push(ActiveFilter {
                key: format!("transition-{id}"),
                label: format!("Transition: {}", tt.name),
                removal: BadgeRemoval::Filter(FilterAction::ToggleTransitionType(*id)),
            });
        }
    }

    badges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(query: &QueryObject, key: &str) -> Vec<String> {
        match query.get(key) {
            Some(QueryValue::List(items)) => items.iter().map(ToString::to_string).collect(),
            other => panic!("expected a list under {key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_inputs_compose_to_an_empty_query() {
        let query = compose("", &FilterState::default(), &SelectedCategoryIds::new());
        assert!(query.is_empty());
        assert!(query.query_pairs().is_empty());
    }

    #[test]
    fn whitespace_search_is_pruned() {
        let query = compose("   ", &FilterState::default(), &SelectedCategoryIds::new());
        assert!(query.is_empty());
    }

    #[test]
    fn search_is_trimmed() {
        let query = compose("  glitch  ", &FilterState::default(), &SelectedCategoryIds::new());
        assert_eq!(query.get("search"), Some(&QueryValue::Text("glitch".into())));
    }

    #[test]
    fn platforms_alone_are_sorted() {
        let mut filters = FilterState::default();
        filters.apply(FilterAction::TogglePlatform(Platform::Youtube));
        filters.apply(FilterAction::TogglePlatform(Platform::Tiktok));
        let query = compose("", &filters, &SelectedCategoryIds::new());
        assert_eq!(query.keys().collect::<Vec<_>>(), ["platform"]);
        assert_eq!(list(&query, "platform"), ["tiktok", "youtube"]);
    }

    #[test]
    fn category_ids_are_ascending() {
        let selected: SelectedCategoryIds = [12, 3, 7].into_iter().collect();
        let query = compose("", &FilterState::default(), &selected);
        assert_eq!(list(&query, "category_ids"), ["3", "7", "12"]);
    }

    #[test]
    fn flags_are_present_only_when_set() {
        let mut filters = FilterState::default();
        filters.apply(FilterAction::ToggleFeature(Feature::ThreeD));
        filters.apply(FilterAction::ToggleFeature(Feature::Tutorial));
        let query = compose("", &filters, &SelectedCategoryIds::new());
        assert_eq!(query.get("has_3d"), Some(&QueryValue::Flag));
        assert_eq!(query.get("has_tutorial"), Some(&QueryValue::Flag));
        assert_eq!(query.get("has_ai"), None);

        filters.apply(FilterAction::ToggleFeature(Feature::ThreeD));
        let query = compose("", &filters, &SelectedCategoryIds::new());
        assert_eq!(query.get("has_3d"), None);
    }

    #[test]
    fn wire_encoding_uses_bracketed_lists_and_numeric_flags() {
        let mut filters = FilterState::default();
        filters.apply(FilterAction::ToggleTag(9));
        filters.apply(FilterAction::ToggleTag(2));
        filters.apply(FilterAction::ToggleFeature(Feature::Ai));
        let query = compose("intro", &filters, &SelectedCategoryIds::new());
        let pairs: Vec<(String, String)> = query.query_pairs().into_iter().map(|(k, v)| (k, v.to_string())).collect();
        assert_eq!(pairs, [
            ("search".to_owned(), "intro".to_owned()),
            ("tag_ids[]".to_owned(), "2".to_owned()),
            ("tag_ids[]".to_owned(), "9".to_owned()),
            ("has_ai".to_owned(), "1".to_owned()),
        ]);

        let mut url = Url::parse("http://localhost:8000/api/video-references").unwrap();
        query.append_to(&mut url);
        assert_eq!(url.query(), Some("search=intro&tag_ids%5B%5D=2&tag_ids%5B%5D=9&has_ai=1"));
    }

    #[test]
    fn equal_inputs_compose_equal_queries() {
        let mut a = FilterState::default();
        a.apply(FilterAction::TogglePacing(Pacing::Fast));
        a.apply(FilterAction::TogglePacing(Pacing::Slow));
        let mut b = FilterState::default();
        b.apply(FilterAction::TogglePacing(Pacing::Slow));
        b.apply(FilterAction::TogglePacing(Pacing::Fast));
        let selected = SelectedCategoryIds::new();
        assert_eq!(compose("x", &a, &selected), compose(" x", &b, &selected));
        assert_ne!(compose("x", &a, &selected), compose("y", &a, &selected));
    }

    #[test]
    fn active_count_counts_groups_and_flags() {
        let mut filters = FilterState::default();
        assert_eq!(filters.active_count(), 0);
        filters.apply(FilterAction::TogglePlatform(Platform::Youtube));
        filters.apply(FilterAction::TogglePlatform(Platform::Instagram));
        filters.apply(FilterAction::ToggleHook(4));
        filters.apply(FilterAction::ToggleFeature(Feature::Animations));
        filters.apply(FilterAction::ToggleFeature(Feature::SoundDesign));
        assert_eq!(filters.active_count(), 4);
        filters.apply(FilterAction::Reset);
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn badges_skip_unresolved_lookups() {
        let mut filters = FilterState::default();
        filters.apply(FilterAction::TogglePlatform(Platform::Tiktok));
        filters.apply(FilterAction::ToggleProductionLevel(ProductionLevel::High));
        filters.apply(FilterAction::ToggleHook(1));
        filters.apply(FilterAction::ToggleHook(2));
        filters.apply(FilterAction::ToggleFeature(Feature::VisualEffects));
        let hooks = [Hook { id: 1, name: "Question".into() }];
        let selected: SelectedCategoryIds = [5].into_iter().collect();
        let badges = active_filters(&filters, &selected, FilterLookups { hooks: &hooks, ..Default::default() });
        let labels: Vec<&str> = badges.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Category 5", "Platform: Tiktok", "Prod: high", "Visual Effects", "Hook: Question"]);
        assert_eq!(badges[0].removal, BadgeRemoval::Category(5));
        assert_eq!(badges[4].removal, BadgeRemoval::Filter(FilterAction::ToggleHook(1)));
    }

    #[test]
    fn removing_a_badge_clears_that_filter() {
        let mut filters = FilterState::default();
        filters.apply(FilterAction::TogglePacing(Pacing::Mixed));
        let badges = active_filters(&filters, &SelectedCategoryIds::new(), FilterLookups::default());
        let BadgeRemoval::Filter(action) = badges[0].removal else { panic!("expected a filter badge") };
        filters.apply(action);
        assert!(filters.is_empty());
    }
}
