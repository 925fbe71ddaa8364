// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Inline runs: plain text markers and atoms.

use serde_json::Value;
use widestring::{Utf16Str, Utf16String};

use crate::linked_list::{arena_id, Linked, Links};
use crate::models::{MarkupId, RenderFlags, SectionId};

arena_id!(
    /// Identifies a [`Marker`] (text run or atom) within one post.
    MarkerId
);

/// An inline opaque object, e.g. a mention. Counts as one code unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    pub name: String,
    pub value: String,
    pub payload: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MarkerContent {
    Text(Utf16String),
    Atom(Atom),
}

/// An inline run inside a markerable section.
///
/// `markups` are ordered outermost first.
#[derive(Clone, Debug)]
pub struct Marker {
    pub(crate) links: Links<MarkerId, SectionId>,
    pub(crate) content: MarkerContent,
    pub(crate) markups: Vec<MarkupId>,
    pub(crate) render: RenderFlags,
}

impl Linked<MarkerId, SectionId> for Marker {
    fn links(&self) -> &Links<MarkerId, SectionId> {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links<MarkerId, SectionId> {
        &mut self.links
    }
}

impl Marker {
    pub(crate) fn new(content: MarkerContent, markups: Vec<MarkupId>) -> Self {
        Self {
            links: Links::default(),
            content,
            markups,
            render: RenderFlags::default(),
        }
    }

    pub(crate) fn text(value: Utf16String, markups: Vec<MarkupId>) -> Self {
        Self::new(MarkerContent::Text(value), markups)
    }

    pub fn content(&self) -> &MarkerContent {
        &self.content
    }

    /// The text of a text marker, `None` for atoms.
    pub fn utf16_text(&self) -> Option<&Utf16Str> {
        match &self.content {
            MarkerContent::Text(text) => Some(text),
            MarkerContent::Atom(_) => None,
        }
    }

    pub fn atom(&self) -> Option<&Atom> {
        match &self.content {
            MarkerContent::Atom(atom) => Some(atom),
            MarkerContent::Text(_) => None,
        }
    }

    pub fn is_atom(&self) -> bool {
        matches!(self.content, MarkerContent::Atom(_))
    }

    /// The marker's text, or the atom's display value.
    pub fn value(&self) -> String {
        match &self.content {
            MarkerContent::Text(text) => text.to_string(),
            MarkerContent::Atom(atom) => atom.value.clone(),
        }
    }

    /// Length in UTF-16 code units. Atoms always have length 1.
    pub fn length(&self) -> usize {
        match &self.content {
            MarkerContent::Text(text) => text.len(),
            MarkerContent::Atom(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    pub fn markups(&self) -> &[MarkupId] {
        &self.markups
    }

    pub fn has_markup(&self, markup: MarkupId) -> bool {
        self.markups.contains(&markup)
    }

    pub fn section(&self) -> Option<SectionId> {
        self.links.parent
    }

    pub fn prev(&self) -> Option<MarkerId> {
        self.links.prev
    }

    pub fn next(&self) -> Option<MarkerId> {
        self.links.next
    }

    pub fn render_flags(&self) -> RenderFlags {
        self.render
    }

    pub(crate) fn add_markup(&mut self, markup: MarkupId) {
        if !self.has_markup(markup) {
            self.markups.push(markup);
        }
    }

    pub(crate) fn remove_markups_where(
        &mut self,
        mut predicate: impl FnMut(MarkupId) -> bool,
    ) -> bool {
        let before = self.markups.len();
        self.markups.retain(|m| !predicate(*m));
        before != self.markups.len()
    }

    /// A copy of this marker that is not linked into any section.
    pub(crate) fn detached_clone(&self) -> Self {
        Self::new(self.content.clone(), self.markups.clone())
    }

    /// A detached text marker holding the code units `[start, end)`.
    /// Atoms cannot be sliced and are cloned whole.
    pub(crate) fn slice(&self, start: usize, end: usize) -> Self {
        match &self.content {
            MarkerContent::Text(text) => Self::text(
                crate::text::slice(text, start, end),
                self.markups.clone(),
            ),
            MarkerContent::Atom(_) => self.detached_clone(),
        }
    }

    /// Append the text of `other` to this text marker.
    pub(crate) fn join_text(&mut self, other: &Utf16Str) {
        if let MarkerContent::Text(text) = &mut self.content {
            text.push_utfstr(other);
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn text(value: &str) -> Marker {
        Marker::text(Utf16String::from_str(value), Vec::new())
    }

    #[test]
    fn length_is_counted_in_utf16_code_units() {
        assert_eq!(text("abc").length(), 3);
        assert_eq!(text("😀").length(), 2);
        assert!(text("").is_empty());
    }

    #[test]
    fn atoms_have_length_one() {
        let atom = Marker::new(
            MarkerContent::Atom(Atom {
                name: "mention".into(),
                value: "@bob".into(),
                payload: json!({}),
            }),
            Vec::new(),
        );
        assert_eq!(atom.length(), 1);
        assert_eq!(atom.value(), "@bob");
        assert!(atom.is_atom());
        assert!(atom.utf16_text().is_none());
    }

    #[test]
    fn slicing_keeps_markups() {
        use crate::linked_list::ArenaId;
        let mut marker = text("hello");
        marker.add_markup(MarkupId::from_index(3));
        let slice = marker.slice(1, 3);
        assert_eq!(slice.value(), "el");
        assert_eq!(slice.markups(), marker.markups());
        assert!(slice.section().is_none());
    }

    #[test]
    fn adding_a_markup_twice_keeps_one() {
        use crate::linked_list::ArenaId;
        let mut marker = text("x");
        marker.add_markup(MarkupId::from_index(0));
        marker.add_markup(MarkupId::from_index(0));
        assert_eq!(marker.markups().len(), 1);
        assert!(marker.remove_markups_where(|_| true));
        assert!(marker.markups().is_empty());
    }
}
