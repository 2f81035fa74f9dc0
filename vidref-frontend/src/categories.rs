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

//! Category tree index and the category selection rules

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use vidref_api::unsync::Category;

use crate::constants::EXPANDED_CATEGORIES_KEY;
use crate::utils::{storage_get_json, storage_set_json};

pub type SelectedCategoryIds = BTreeSet<u64>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryNode {
    pub id: u64,
    pub name: Rc<str>,
    pub parent_id: Option<u64>,
}

/// Precomputed index over the category tree
///
/// Accepts both the flat (`parent_id`) and the nested (`children`) shape of the category listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryTree {
    nodes: HashMap<u64, CategoryNode>,
    children: HashMap<u64, Vec<u64>>,
    roots: Vec<u64>,
}

impl CategoryTree {
    pub fn new(categories: &[Category]) -> CategoryTree {
        let mut order = Vec::new();
        let mut nodes = HashMap::new();
        let mut stack: Vec<(&Category, Option<u64>)> = categories.iter().rev().map(|c| (c, None)).collect();
        while let Some((category, nesting_parent)) = stack.pop() {
            if nodes.contains_key(&category.id) {
                continue;
            }
            nodes.insert(category.id, CategoryNode {
                id: category.id,
                name: category.name.clone(),
                parent_id: category.parent_id.or(nesting_parent),
            });
            order.push(category.id);
            stack.extend(category.children.iter().rev().map(|c| (c, Some(category.id))));
        }

        let mut children: HashMap<u64, Vec<u64>> = HashMap::new();
        let mut roots = Vec::new();
        for id in order {
            match nodes[&id].parent_id {
                // a dangling parent reference makes the category a root
                Some(parent) if nodes.contains_key(&parent) => children.entry(parent).or_default().push(id),
                _ => roots.push(id),
            }
        }

        CategoryTree { nodes, children, roots }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[u64] {
        &self.roots
    }

    pub fn children_of(&self, id: u64) -> &[u64] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn has_children(&self, id: u64) -> bool {
        !self.children_of(id).is_empty()
    }

    pub fn parent_of(&self, id: u64) -> Option<u64> {
        self.nodes.get(&id)?.parent_id.filter(|p| self.nodes.contains_key(p))
    }

    /// Name of the category, `Category {id}` for unknown ids
    pub fn name_of(&self, id: u64) -> Cow<'_, str> {
        match self.nodes.get(&id) {
            Some(node) => Cow::Borrowed(&node.name),
            None => Cow::Owned(format!("Category {id}")),
        }
    }

    /// Distance from the root, 0 for roots and unknown ids
    pub fn depth(&self, id: u64) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            depth += 1;
            current = parent;
            if depth > self.nodes.len() {
                break;
            }
        }
        depth
    }

    /// All descendants of `id`, excluding `id` itself
    pub fn descendants(&self, id: u64) -> Vec<u64> {
        let mut result = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut stack: Vec<u64> = self.children_of(id).to_vec();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            result.push(current);
            stack.extend_from_slice(self.children_of(current));
        }
        result
    }

    /// Applies a click on category `id` to the selection
    ///
    /// - A selected category whose parent is not selected is deselected together with all of its
    ///   descendants.
    /// - Otherwise the category and all of its descendants are selected. If the direct parent
    ///   was selected, the parent and the other children of the parent are deselected, leaving
    ///   the explicit child choice. Descendants of those siblings are left as they were.
    pub fn toggle(&self, selected: &mut SelectedCategoryIds, id: u64) {
        let parent = self.parent_of(id);
        let parent_selected = parent.is_some_and(|p| selected.contains(&p));

        if selected.contains(&id) && !parent_selected {
            selected.remove(&id);
            for descendant in self.descendants(id) {
                selected.remove(&descendant);
            }
            return;
        }

        selected.insert(id);
        selected.extend(self.descendants(id));
        if let (Some(parent), true) = (parent, parent_selected) {
            selected.remove(&parent);
            for sibling in self.children_of(parent) {
                if *sibling != id {
                    selected.remove(sibling);
                }
            }
        }
    }

    /// Returns the selection after a click on `id`
    pub fn toggled(&self, selected: &SelectedCategoryIds, id: u64) -> SelectedCategoryIds {
        let mut selected = selected.clone();
        self.toggle(&mut selected, id);
        selected
    }
}

/// Which tree nodes are expanded in the category sidebar
///
/// Persisted in local storage, shared by every account using the browser.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpandedCategories(pub BTreeSet<u64>);

impl ExpandedCategories {
    pub fn load() -> ExpandedCategories {
        ExpandedCategories(storage_get_json(EXPANDED_CATEGORIES_KEY).unwrap_or_default())
    }

    pub fn save(&self) {
        storage_set_json(EXPANDED_CATEGORIES_KEY, &self.0);
    }

    pub fn is_expanded(&self, id: u64) -> bool {
        self.0.contains(&id)
    }

    #[must_use]
    pub fn toggled(&self, id: u64) -> ExpandedCategories {
        let mut expanded = self.0.clone();
        if !expanded.remove(&id) {
            expanded.insert(id);
        }
        ExpandedCategories(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u64, name: &str, parent_id: Option<u64>) -> Category {
        Category { id, name: name.into(), parent_id, children: Vec::new() }
    }

    /// 1 Motion
    /// ├── 2 Kinetic type
    /// │   └── 5 Masked reveals
    /// └── 3 Transitions
    ///     ├── 6 Whip pans
    ///     └── 7 Match cuts
    /// 4 Sound
    fn flat_tree() -> CategoryTree {
        CategoryTree::new(&[
            category(1, "Motion", None),
            category(2, "Kinetic type", Some(1)),
            category(3, "Transitions", Some(1)),
            category(4, "Sound", None),
            category(5, "Masked reveals", Some(2)),
            category(6, "Whip pans", Some(3)),
            category(7, "Match cuts", Some(3)),
        ])
    }

    fn set(ids: &[u64]) -> SelectedCategoryIds {
        ids.iter().copied().collect()
    }

    #[test]
    fn nested_and_flat_listings_build_the_same_index() {
        let mut motion = category(1, "Motion", None);
        let mut kinetic = category(2, "Kinetic type", None);
        kinetic.children.push(category(5, "Masked reveals", None));
        let mut transitions = category(3, "Transitions", None);
        transitions.children.push(category(6, "Whip pans", None));
        transitions.children.push(category(7, "Match cuts", None));
        motion.children.push(kinetic);
        motion.children.push(transitions);
        let nested = CategoryTree::new(&[motion, category(4, "Sound", None)]);

        assert_eq!(nested, flat_tree());
        assert_eq!(nested.roots(), [1, 4]);
        assert_eq!(nested.children_of(3), [6, 7]);
    }

    #[test]
    fn lookups() {
        let tree = flat_tree();
        assert_eq!(tree.name_of(6), "Whip pans");
        assert_eq!(tree.name_of(99), "Category 99");
        assert!(tree.has_children(2));
        assert!(!tree.has_children(5));
        assert_eq!(tree.depth(1), 0);
        assert_eq!(tree.depth(5), 2);
        assert_eq!(tree.parent_of(7), Some(3));
        let mut descendants = tree.descendants(1);
        descendants.sort_unstable();
        assert_eq!(descendants, [2, 3, 5, 6, 7]);
    }

    #[test]
    fn unknown_parent_becomes_a_root() {
        let tree = CategoryTree::new(&[category(1, "Orphan", Some(42)), category(2, "Child", Some(1))]);
        assert_eq!(tree.roots(), [1]);
        assert_eq!(tree.parent_of(1), None);
        assert_eq!(tree.depth(2), 1);
    }

    #[test]
    fn selecting_a_parent_then_a_child_refines_to_the_child() {
        let tree = CategoryTree::new(&[
            category(1, "Root", None),
            category(2, "Leaf1", Some(1)),
            category(3, "Leaf2", Some(1)),
        ]);
        let selected = tree.toggled(&set(&[]), 1);
        assert_eq!(selected, set(&[1, 2, 3]));
        let selected = tree.toggled(&selected, 2);
        assert_eq!(selected, set(&[2]));
        let selected = tree.toggled(&selected, 2);
        assert_eq!(selected, set(&[]));
    }

    #[test]
    fn deselecting_removes_all_descendants() {
        let tree = flat_tree();
        let selected = tree.toggled(&set(&[]), 1);
        assert_eq!(selected, set(&[1, 2, 3, 5, 6, 7]));
        let selected = tree.toggled(&selected, 1);
        assert_eq!(selected, set(&[]));
    }

    #[test]
    fn refining_keeps_sibling_descendants() {
        let tree = flat_tree();
        let selected = tree.toggled(&set(&[]), 1);
        let selected = tree.toggled(&selected, 3);
        // 2 is a sibling of 3 and gets dropped, 5 is below 2 and stays
        assert_eq!(selected, set(&[3, 5, 6, 7]));
    }

    #[test]
    fn isolated_leaf_is_a_plain_add_remove() {
        let tree = flat_tree();
        let selected = tree.toggled(&set(&[6]), 4);
        assert_eq!(selected, set(&[4, 6]));
        assert_eq!(tree.toggled(&selected, 4), set(&[6]));
    }

    #[test]
    fn unknown_ids_behave_like_leaves() {
        let tree = flat_tree();
        let selected = tree.toggled(&set(&[]), 100);
        assert_eq!(selected, set(&[100]));
        assert_eq!(tree.toggled(&selected, 100), set(&[]));
    }

    #[test]
    fn deselected_nodes_never_leave_descendants_behind() {
        let tree = flat_tree();
        let ids = [1u64, 2, 3, 4, 5, 6, 7];
        let mut selected = SelectedCategoryIds::new();
        // small LCG for a deterministic pseudo-random click sequence
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            let id = ids[usize::try_from(seed >> 33).unwrap() % ids.len()];
            let was_selected = selected.contains(&id);
            tree.toggle(&mut selected, id);
            if was_selected && !selected.contains(&id) {
                for descendant in tree.descendants(id) {
                    assert!(!selected.contains(&descendant), "{descendant} survived deselecting {id}");
                }
            }
        }
    }

    #[test]
    fn expanded_state_toggles() {
        let expanded = ExpandedCategories::default().toggled(3);
        assert!(expanded.is_expanded(3));
        assert!(!expanded.toggled(3).is_expanded(3));
    }
}
