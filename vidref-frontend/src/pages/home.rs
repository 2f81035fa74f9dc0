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

use futures::join;
use gloo_console::error;
use vidref_api::unsync::VideoReference;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::categories::{CategoryTree, SelectedCategoryIds};
use crate::components::active_filters::ActiveFilters;
use crate::components::category_sidebar::CategorySidebar;
use crate::components::filter_sidebar::{FilterSidebar, LookupLists};
use crate::components::icon::*;
use crate::components::searchbar::Searchbar;
use crate::components::video_grid::VideoGrid;
use crate::contexts::*;
use crate::filters::{compose, BadgeRemoval, FilterAction, FilterState, QueryObject};
use crate::paging::PagedResults;

/// Results are keyed by the query, the page size and whether a token was sent
///
/// Per-user fields like `is_liked` change with the session, so a login or logout refetches.
type SearchKey = (QueryObject, usize, bool);

#[derive(Clone, Default, PartialEq)]
struct CatalogLookups {
    tree: Option<Rc<CategoryTree>>,
    lists: LookupLists,
}

async fn fetch_lookups(api: &ApiClient) -> CatalogLookups {
    let (categories, hooks, tags, transition_types) = join!(
        api.categories(),
        api.hooks(None),
        api.tags(None),
        api.transition_types(None),
    );
    let tree = match categories {
        Ok(categories) => Some(Rc::new(CategoryTree::new(&categories))),
        Err(e) => {
            error!(format!("Failed to fetch categories: {e:?}"));
            None
        },
    };
    let mut lists = LookupLists::default();
    match hooks {
        Ok(hooks) => lists.hooks = hooks.into(),
        Err(e) => error!(format!("Failed to fetch hooks: {e:?}")),
    }
    match tags {
        Ok(tags) => lists.tags = tags.into(),
        Err(e) => error!(format!("Failed to fetch tags: {e:?}")),
    }
    match transition_types {
        Ok(transition_types) => lists.transition_types = transition_types.into(),
        Err(e) => error!(format!("Failed to fetch transition types: {e:?}")),
    }
    CatalogLookups { tree, lists }
}

#[function_component]
pub fn HomePage() -> Html {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let settings_context: SettingsContext = use_context().expect("SettingsContext should be available");
    let per_page = settings_context.settings().entries_per_page.get();
    let authenticated = api.token().is_some();

    let lookups = use_state_eq(CatalogLookups::default);
    {
        let lookups = lookups.clone();
        use_effect_with(api.clone(), move |api| {
            let api = api.clone();
            spawn_local(async move {
                lookups.set(fetch_lookups(&api).await);
            });
        });
    }

    let search = use_state_eq(|| AttrValue::Static(""));
    let filters = use_reducer_eq(FilterState::default);
    let filters_rc: Rc<FilterState> = use_memo((*filters).clone(), Clone::clone);
    let selected_categories = use_state_eq(|| Rc::new(SelectedCategoryIds::new()));
    let show_filters = use_state_eq(|| false);
    let fetch_error = use_state_eq(|| None::<AttrValue>);

    let query = use_memo(
        ((*search).clone(), filters_rc.clone(), (*selected_categories).clone()),
        |(search, filters, selected)| compose(search, filters, selected),
    );

    let results: Rc<RefCell<PagedResults<SearchKey, Rc<VideoReference>>>> = use_mut_ref(|| PagedResults::new((QueryObject::default(), per_page, false)));
    let update = use_force_update();

    let fetch_more = {
        let results = results.clone();
        let fetch_error = fetch_error.clone();
        use_callback(api, move |(), api| {
            let Some(page) = results.borrow_mut().next_page() else { return };
            let key = results.borrow().query().clone();
            fetch_error.set(None);
            update.force_update();

            let api = api.clone();
            let results = results.clone();
            let update = update.clone();
            let fetch_error = fetch_error.clone();
            spawn_local(async move {
                let (ref query, per_page, _) = key;
                match api.search_videos(query, page, per_page).await {
                    Ok(response) => {
                        let meta = response.meta();
                        results.borrow_mut().accept(&key, page, meta, response.data.into_iter().map(Rc::new));
                    },
                    Err(e) => {
                        error!(format!("Failed to fetch page {page} of the catalog: {e:?}"));
                        results.borrow_mut().fail(&key, page);
                        fetch_error.set(Some(e.user_message("Failed to load videos").into()));
                    },
                }
                update.force_update();
            });
        })
    };

    {
        let results = results.clone();
        let fetch_more = fetch_more.clone();
        use_effect_with(((*query).clone(), per_page, authenticated), move |key| {
            let reset = results.borrow_mut().reset(key.clone());
            if reset || results.borrow().is_pristine() {
                fetch_more.emit(());
            }
        });
    }

    let on_search = {
        let search = search.clone();
        use_callback((), move |text: AttrValue, ()| search.set(text))
    };
    let dispatch = {
        let dispatcher = filters.dispatcher();
        use_callback((), move |action: FilterAction, ()| dispatcher.dispatch(action))
    };
    let on_category_toggle = {
        let selected_categories = selected_categories.clone();
        use_callback((lookups.tree.clone(), (*selected_categories).clone()), move |id: u64, (tree, selected)| {
            if let Some(tree) = tree {
                selected_categories.set(Rc::new(tree.toggled(selected, id)));
            }
        })
    };
    let on_category_reset = {
        let selected_categories = selected_categories.clone();
        use_callback((), move |(), ()| selected_categories.set(Rc::default()))
    };
    let on_remove_badge = {
        let dispatch = dispatch.clone();
        use_callback(on_category_toggle.clone(), move |removal: BadgeRemoval, on_category_toggle| match removal {
            BadgeRemoval::Category(id) => on_category_toggle.emit(id),
            BadgeRemoval::Filter(action) => dispatch.emit(action),
        })
    };
    let on_clear_all = {
        let dispatch = dispatch.clone();
        let on_category_reset = on_category_reset.clone();
        use_callback((), move |(), ()| {
            dispatch.emit(FilterAction::Reset);
            on_category_reset.emit(());
        })
    };
    let toggle_filters = {
        let show_filters = show_filters.clone();
        Callback::from(move |_: MouseEvent| show_filters.set(!*show_filters))
    };

    let (videos, loading, has_more, total) = {
        let results = results.borrow();
        let videos: Rc<[Rc<VideoReference>]> = results.items().iter().cloned().collect();
        (videos, results.is_loading(), results.has_more(), results.total())
    };
    let active_count = filters.active_count() + selected_categories.len();

    html! {
        <div id="catalog">
            <div id="catalog-toolbar">
                <Searchbar {on_search} />
                <button class={classes!("filter-toggle", (*show_filters).then_some("active"))} onclick={toggle_filters}>
                    <Icon r#type={IconType::Filter} />
                    {" Filters"}
                    if active_count > 0 {
                        <span class="badge">{active_count}</span>
                    }
                </button>
                if let Some(total) = total {
                    <span class="result-count">{format!("{total} videos")}</span>
                }
            </div>
            <ActiveFilters
                filters={filters_rc.clone()}
                selected_categories={(*selected_categories).clone()}
                tree={lookups.tree.clone()}
                lookups={lookups.lists.clone()}
                on_remove={on_remove_badge}
                {on_clear_all}
            />
            <div id="catalog-body">
                if let Some(ref tree) = lookups.tree {
                    if !tree.is_empty() {
                        <CategorySidebar
                            tree={tree.clone()}
                            selected={(*selected_categories).clone()}
                            on_toggle={on_category_toggle}
                            on_reset={on_category_reset}
                        />
                    }
                }
                <div id="catalog-results">
                    if let Some(ref message) = *fetch_error {
                        <div class="error-banner">
                            {message.clone()}{" "}
                            <button onclick={fetch_more.reform(|_: MouseEvent| ())}>{"Retry"}</button>
                        </div>
                    }
                    <VideoGrid {videos} {loading} {has_more} on_load_more={fetch_more.clone()} />
                </div>
                if *show_filters {
                    <FilterSidebar filters={filters_rc} {dispatch} lookups={lookups.lists.clone()} />
                }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use vidref_api::unsync::PageMeta;

    use super::*;

    #[test]
    fn session_change_invalidates_loaded_pages() {
        let meta = PageMeta { current_page: 1, last_page: 1, per_page: 20, total: 1 };
        let mut results: PagedResults<SearchKey, u32> = PagedResults::new((QueryObject::default(), 20, false));
        results.next_page();
        results.accept(&(QueryObject::default(), 20, false), 1, meta, [1]);
        assert!(!results.has_more());

        assert!(results.reset((QueryObject::default(), 20, true)));
        assert!(results.is_pristine());
        assert_eq!(results.next_page(), Some(1));
    }
}
