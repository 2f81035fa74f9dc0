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

use crate::categories::{CategoryTree, ExpandedCategories, SelectedCategoryIds};

#[derive(Properties, PartialEq)]
pub struct CategorySidebarProps {
    pub tree: Rc<CategoryTree>,
    pub selected: Rc<SelectedCategoryIds>,
    pub on_toggle: Callback<u64>,
    pub on_reset: Callback<()>,
}

fn row_padding(level: usize) -> String {
    format!("padding-left: {}px;", level * 20 + 12)
}

struct RowContext<'a> {
    tree: &'a CategoryTree,
    selected: &'a SelectedCategoryIds,
    expanded: &'a ExpandedCategories,
    on_toggle: &'a Callback<u64>,
    on_expand: &'a Callback<u64>,
}

impl RowContext<'_> {
    fn render(&self, id: u64, level: usize) -> Html {
        let has_children = self.tree.has_children(id);
        let is_expanded = has_children && self.expanded.is_expanded(id);
        let is_selected = self.selected.contains(&id);
        let select = self.on_toggle.reform(move |_: MouseEvent| id);
        let expand = self.on_expand.reform(move |_: MouseEvent| id);

        html! {
            <div class="category-item" key={id}>
                <div class={classes!("category-row", is_selected.then_some("active"))} style={row_padding(level)}>
                    if has_children {
                        <span class="clickable category-toggle" onclick={expand}>{if is_expanded { "▼" } else { "▶" }}</span>
                    } else {
                        <span class="category-spacer" />
                    }
                    <span class="clickable category-name" onclick={select}>{self.tree.name_of(id).into_owned()}</span>
                </div>
                if is_expanded {
                    <div class="category-children">
                        {for self.tree.children_of(id).iter().map(|child| self.render(*child, level + 1))}
                    </div>
                }
            </div>
        }
    }
}

#[function_component]
pub fn CategorySidebar(props: &CategorySidebarProps) -> Html {
    let expanded = use_state_eq(ExpandedCategories::load);
    let on_expand = {
        let expanded = expanded.clone();
        Callback::from(move |id: u64| {
            let next = expanded.toggled(id);
            next.save();
            expanded.set(next);
        })
    };
    let on_reset = props.on_reset.reform(|_: MouseEvent| ());

    let rows = RowContext {
        tree: &props.tree,
        selected: &props.selected,
        expanded: &expanded,
        on_toggle: &props.on_toggle,
        on_expand: &on_expand,
    };

    html! {
        <div class="category-sidebar">
            <div class="category-header">
                <h3>{"Categories"}</h3>
                if !props.selected.is_empty() {
                    <button class="category-reset" onclick={on_reset}>{"Reset"}</button>
                }
            </div>
            <div class="category-list">
                if props.tree.is_empty() {
                    <div class="category-empty">{"No categories"}</div>
                } else {
                    {for props.tree.roots().iter().map(|id| rows.render(*id, 0))}
                }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_indent_by_level() {
        assert_eq!(row_padding(0), "padding-left: 12px;");
        assert_eq!(row_padding(2), "padding-left: 52px;");
    }
}
