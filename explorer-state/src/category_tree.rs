//! Category taxonomy stored as an arena: entries live in one flat `Vec`,
//! parents own index lists of their children, and every traversal is an
//! explicit stack walk.

use std::collections::{BTreeSet, HashMap, HashSet};

use shared_types::{CategoryId, CategoryNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntry {
    pub id: CategoryId,
    pub name: String,
    pub icon: Option<String>,
    /// 0 for top-level categories.
    pub depth: usize,
    children: Vec<NodeIndex>,
}

impl CategoryEntry {
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    Partial,
    Unchecked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCategory {
    pub id: CategoryId,
    pub name: String,
}

/// One checkbox line of the category panel under a top-level category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub id: CategoryId,
    pub name: String,
    pub depth: usize,
    pub has_children: bool,
    pub state: CheckState,
    /// Second-level rows only: whether their children are listed.
    pub expanded: bool,
}

/// Selected categories living under one top-level category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGroup {
    pub top_id: CategoryId,
    pub top_name: String,
    pub items: Vec<SelectedCategory>,
}

impl SelectionGroup {
    /// The first `limit` items and how many were left out.
    pub fn preview(&self, limit: usize) -> (&[SelectedCategory], usize) {
        let shown = self.items.len().min(limit);
        (&self.items[..shown], self.items.len() - shown)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTree {
    nodes: Vec<CategoryEntry>,
    roots: Vec<NodeIndex>,
    by_id: HashMap<CategoryId, NodeIndex>,
}

impl CategoryTree {
    pub fn from_nodes(roots: &[CategoryNode]) -> Self {
        let mut tree = CategoryTree::default();

        // (wire node, parent slot, depth); reversed so roots keep their order.
        let mut stack: Vec<(&CategoryNode, Option<NodeIndex>, usize)> =
            roots.iter().rev().map(|node| (node, None, 0)).collect();

        while let Some((node, parent, depth)) = stack.pop() {
            let index = NodeIndex(tree.nodes.len());
            tree.nodes.push(CategoryEntry {
                id: node.id,
                name: node.name.clone(),
                icon: node.icon.clone().or_else(|| node.svg_icon.clone()),
                depth,
                children: Vec::with_capacity(node.children.len()),
            });

            match parent {
                Some(parent) => tree.nodes[parent.0].children.push(index),
                None => tree.roots.push(index),
            }

            if tree.by_id.contains_key(&node.id) {
                tracing::warn!(category_id = node.id, "duplicate category id in tree");
            } else {
                tree.by_id.insert(node.id, index);
            }

            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .map(|child| (child, Some(index), depth + 1)),
            );
        }

        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn node(&self, index: NodeIndex) -> &CategoryEntry {
        &self.nodes[index.0]
    }

    pub fn find(&self, id: CategoryId) -> Option<NodeIndex> {
        self.by_id.get(&id).copied()
    }

    pub fn name_of(&self, id: CategoryId) -> Option<&str> {
        self.find(id).map(|index| self.nodes[index.0].name.as_str())
    }

    /// Pre-order, left-to-right walk of the subtree rooted at `start`.
    pub fn walk(&self, start: NodeIndex) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![start],
        }
    }

    /// Every positive id under `start` (inclusive), without duplicates.
    /// Id 0 is the upstream "all categories" sentinel and never selectable.
    pub fn flatten_category_ids(&self, start: NodeIndex) -> Vec<CategoryId> {
        let mut seen = HashSet::new();
        self.walk(start)
            .map(|entry| entry.id)
            .filter(|id| *id > 0 && seen.insert(*id))
            .collect()
    }

    pub fn check_state(&self, start: NodeIndex, selection: &BTreeSet<CategoryId>) -> CheckState {
        subtree_check_state(&self.flatten_category_ids(start), selection)
    }

    /// Rows below `top` for the category panel. Second-level rows are always
    /// listed; anything deeper only while its second-level branch is in
    /// `open_branches`.
    pub fn panel_rows(
        &self,
        top: NodeIndex,
        selection: &BTreeSet<CategoryId>,
        open_branches: &BTreeSet<CategoryId>,
    ) -> Vec<PanelRow> {
        let base = self.node(top).depth;
        let mut branch_open = false;
        let mut rows = Vec::new();

        for entry in self.walk(top).skip(1) {
            let level = entry.depth - base;
            if level == 1 {
                branch_open = open_branches.contains(&entry.id);
            } else if !branch_open {
                continue;
            }

            let state = match self.find(entry.id) {
                Some(index) if entry.has_children() => self.check_state(index, selection),
                _ if selection.contains(&entry.id) => CheckState::Checked,
                _ => CheckState::Unchecked,
            };
            rows.push(PanelRow {
                id: entry.id,
                name: entry.name.clone(),
                depth: level,
                has_children: entry.has_children(),
                state,
                expanded: level == 1 && branch_open && entry.has_children(),
            });
        }

        rows
    }

    /// Selected ids grouped by the top-level category containing them,
    /// items sorted by name.
    pub fn grouped_selection(&self, selection: &BTreeSet<CategoryId>) -> Vec<SelectionGroup> {
        if selection.is_empty() {
            return Vec::new();
        }

        self.roots
            .iter()
            .filter_map(|root| {
                let mut items: Vec<SelectedCategory> = self
                    .flatten_category_ids(*root)
                    .into_iter()
                    .filter(|id| selection.contains(id))
                    .map(|id| SelectedCategory {
                        id,
                        name: self.name_of(id).unwrap_or_default().to_string(),
                    })
                    .collect();

                if items.is_empty() {
                    return None;
                }
                items.sort_by(|a, b| a.name.cmp(&b.name));

                let top = self.node(*root);
                Some(SelectionGroup {
                    top_id: top.id,
                    top_name: top.name.clone(),
                    items,
                })
            })
            .collect()
    }
}

pub struct Walk<'a> {
    tree: &'a CategoryTree,
    stack: Vec<NodeIndex>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a CategoryEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let entry = &self.tree.nodes[index.0];
        self.stack.extend(entry.children.iter().rev().copied());
        Some(entry)
    }
}

pub fn subtree_check_state(
    subtree_ids: &[CategoryId],
    selection: &BTreeSet<CategoryId>,
) -> CheckState {
    let selected = subtree_ids
        .iter()
        .filter(|id| selection.contains(id))
        .count();

    if !subtree_ids.is_empty() && selected == subtree_ids.len() {
        CheckState::Checked
    } else if selected > 0 {
        CheckState::Partial
    } else {
        CheckState::Unchecked
    }
}

/// Removes the whole subtree when it is fully selected, otherwise adds it.
pub fn toggle_all(
    selection: &BTreeSet<CategoryId>,
    subtree_ids: &[CategoryId],
) -> BTreeSet<CategoryId> {
    let mut next = selection.clone();
    if subtree_check_state(subtree_ids, selection) == CheckState::Checked {
        for id in subtree_ids {
            next.remove(id);
        }
    } else {
        next.extend(subtree_ids.iter().copied());
    }
    next
}

pub fn toggle_one(selection: &BTreeSet<CategoryId>, id: CategoryId) -> BTreeSet<CategoryId> {
    let mut next = selection.clone();
    if !next.remove(&id) {
        next.insert(id);
    }
    next
}
