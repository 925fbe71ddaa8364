// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::linked_list::{arena_id, Linked, LinkedList, Links};
use crate::models::{
    ListTag, MarkerId, MarkupSectionTag, RenderFlags, SectionType,
};

arena_id!(
    /// Identifies a [`Section`] within one post.
    SectionId
);

/// Where a section lives: directly in the post, or inside a list section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionParent {
    Post,
    List(SectionId),
}

pub type MarkerList = LinkedList<MarkerId, SectionId>;
pub type SectionList = LinkedList<SectionId, SectionParent>;

#[derive(Clone, Debug)]
pub enum SectionKind {
    Markup {
        tag: MarkupSectionTag,
        attributes: BTreeMap<String, String>,
        markers: MarkerList,
        /// Set on sections the editor supplies on its own, e.g. the blank
        /// paragraph that replaces a deleted card.
        is_generated: bool,
    },
    List {
        tag: ListTag,
        attributes: BTreeMap<String, String>,
        items: SectionList,
    },
    ListItem {
        markers: MarkerList,
    },
    Image {
        src: String,
    },
    Card {
        name: String,
        payload: Value,
    },
}

#[derive(Clone, Debug)]
pub struct Section {
    pub(crate) links: Links<SectionId, SectionParent>,
    pub(crate) kind: SectionKind,
    pub(crate) render: RenderFlags,
}

impl Linked<SectionId, SectionParent> for Section {
    fn links(&self) -> &Links<SectionId, SectionParent> {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links<SectionId, SectionParent> {
        &mut self.links
    }
}

impl Section {
    pub(crate) fn new(kind: SectionKind) -> Self {
        Self {
            links: Links::default(),
            kind,
            render: RenderFlags::default(),
        }
    }

    pub fn kind(&self) -> &SectionKind {
        &self.kind
    }

    pub fn section_type(&self) -> SectionType {
        match self.kind {
            SectionKind::Markup { .. } => SectionType::MarkupSection,
            SectionKind::List { .. } => SectionType::ListSection,
            SectionKind::ListItem { .. } => SectionType::ListItem,
            SectionKind::Image { .. } => SectionType::ImageSection,
            SectionKind::Card { .. } => SectionType::CardSection,
        }
    }

    /// Markup sections and list items hold markers.
    pub fn is_markerable(&self) -> bool {
        self.markers().is_some()
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self.kind, SectionKind::ListItem { .. })
    }

    pub fn is_list_section(&self) -> bool {
        matches!(self.kind, SectionKind::List { .. })
    }

    pub fn is_card(&self) -> bool {
        matches!(self.kind, SectionKind::Card { .. })
    }

    /// Leaf sections are the ones a position can point into.
    pub fn is_leaf(&self) -> bool {
        !self.is_list_section()
    }

    pub fn markers(&self) -> Option<&MarkerList> {
        match &self.kind {
            SectionKind::Markup { markers, .. }
            | SectionKind::ListItem { markers } => Some(markers),
            _ => None,
        }
    }

    pub(crate) fn markers_mut(&mut self) -> Option<&mut MarkerList> {
        match &mut self.kind {
            SectionKind::Markup { markers, .. }
            | SectionKind::ListItem { markers } => Some(markers),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&SectionList> {
        match &self.kind {
            SectionKind::List { items, .. } => Some(items),
            _ => None,
        }
    }

    pub(crate) fn items_mut(&mut self) -> Option<&mut SectionList> {
        match &mut self.kind {
            SectionKind::List { items, .. } => Some(items),
            _ => None,
        }
    }

    /// The section's tag name as it appears on the wire (`"p"`, `"ul"`,
    /// `"li"`), `None` for images and cards.
    pub fn tag_name(&self) -> Option<String> {
        match &self.kind {
            SectionKind::Markup { tag, .. } => Some(tag.to_string()),
            SectionKind::List { tag, .. } => Some(tag.to_string()),
            SectionKind::ListItem { .. } => Some("li".to_owned()),
            _ => None,
        }
    }

    pub fn markup_tag(&self) -> Option<MarkupSectionTag> {
        match &self.kind {
            SectionKind::Markup { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    pub fn list_tag(&self) -> Option<ListTag> {
        match &self.kind {
            SectionKind::List { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    pub fn attributes(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            SectionKind::Markup { attributes, .. }
            | SectionKind::List { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub(crate) fn attributes_mut(
        &mut self,
    ) -> Option<&mut BTreeMap<String, String>> {
        match &mut self.kind {
            SectionKind::Markup { attributes, .. }
            | SectionKind::List { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(
            self.kind,
            SectionKind::Markup {
                is_generated: true,
                ..
            }
        )
    }

    pub fn parent(&self) -> Option<SectionParent> {
        self.links.parent
    }

    pub fn prev(&self) -> Option<SectionId> {
        self.links.prev
    }

    pub fn next(&self) -> Option<SectionId> {
        self.links.next
    }

    pub fn render_flags(&self) -> RenderFlags {
        self.render
    }
}
