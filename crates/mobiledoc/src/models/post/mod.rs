// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The document root.
//!
//! A [`Post`] owns every node of the document in three arenas (sections,
//! markers and markups) and the ordered list of its top-level sections.
//! Nodes are addressed by [`SectionId`], [`MarkerId`] and [`MarkupId`];
//! a node that has been removed from its list stays in its arena, no
//! longer reachable from the post, until it is released: removed markers
//! when the edit that removed them completes, removed sections when the
//! render flags are cleared.
//!
//! The impl is split across files by concern: `queries` reads the tree,
//! `surgery` performs list-level mutations, `invariants`, `to_tree` and
//! `to_html` are for checking and debugging.

mod invariants;
mod queries;
mod surgery;
mod to_html;
mod to_tree;

use std::collections::HashMap;

use crate::builder::PostNodeBuilder;
use crate::linked_list::Arena;
use crate::models::{
    Marker, MarkerId, Markup, MarkupId, Section, SectionId, SectionList,
    SectionParent,
};

#[derive(Clone, Debug)]
pub struct Post {
    pub(crate) sections: SectionList,
    pub(crate) section_arena: Arena<SectionId, Section>,
    pub(crate) marker_arena: Arena<MarkerId, Marker>,
    pub(crate) markups: Arena<MarkupId, Markup>,
    /// Interned markups keyed by [`Markup::cache_key`].
    pub(crate) markup_cache: HashMap<String, MarkupId>,
}

impl Default for Post {
    fn default() -> Self {
        Self {
            sections: SectionList::new(SectionParent::Post),
            section_arena: Arena::new(),
            marker_arena: Arena::new(),
            markups: Arena::new(),
            markup_cache: HashMap::new(),
        }
    }
}

impl Post {
    /// An empty post.
    pub fn new() -> Self {
        Self::default()
    }

    /// The factory for nodes of this post.
    pub fn builder(&mut self) -> PostNodeBuilder<'_> {
        PostNodeBuilder::new(self)
    }

    pub fn sections(&self) -> &SectionList {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.section_arena[id]
    }

    pub fn marker(&self, id: MarkerId) -> &Marker {
        &self.marker_arena[id]
    }

    pub fn markup(&self, id: MarkupId) -> &Markup {
        &self.markups[id]
    }

    /// Ids of the top-level sections, in order.
    pub fn top_level_sections(&self) -> Vec<SectionId> {
        self.sections.to_vec(&self.section_arena)
    }

    /// Ids of the markers of a markerable section, in order. Empty for
    /// any other section.
    pub fn markers_of(&self, section: SectionId) -> Vec<MarkerId> {
        self.section_arena[section]
            .markers()
            .map(|markers| markers.to_vec(&self.marker_arena))
            .unwrap_or_default()
    }

    /// Ids of the items of a list section. Empty for any other section.
    pub fn items_of(&self, section: SectionId) -> Vec<SectionId> {
        self.section_arena[section]
            .items()
            .map(|items| items.to_vec(&self.section_arena))
            .unwrap_or_default()
    }

    /// Every interned markup, in the order it was first created.
    pub fn all_markups(&self) -> impl Iterator<Item = (MarkupId, &Markup)> {
        self.markup_cache
            .values()
            .copied()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .map(|id| (id, &self.markups[id]))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
