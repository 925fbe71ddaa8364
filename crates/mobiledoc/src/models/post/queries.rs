// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Read-only walks over a post.

use std::collections::HashSet;

use widestring::Utf16String;

use super::Post;
use crate::cursor::{Position, Range};
use crate::models::{MarkerContent, MarkerId, MarkupId, SectionId, SectionParent};
use crate::text::OBJECT_REPLACEMENT;

impl Post {
    /// Length of a section in UTF-16 code units. Cards, images and list
    /// sections have length 0.
    pub fn section_length(&self, section: SectionId) -> usize {
        self.markers_of(section)
            .into_iter()
            .map(|m| self.marker_arena[m].length())
            .sum()
    }

    /// The section's text with atoms rendered by their value.
    pub fn section_text(&self, section: SectionId) -> String {
        self.markers_of(section)
            .into_iter()
            .map(|m| self.marker_arena[m].value())
            .collect()
    }

    /// The section's code units with each atom standing in as one
    /// U+FFFC, so indexes line up with offsets.
    pub(crate) fn section_units(&self, section: SectionId) -> Vec<u16> {
        let mut units = Vec::new();
        for marker in self.markers_of(section) {
            match &self.marker_arena[marker].content {
                MarkerContent::Text(text) => {
                    units.extend_from_slice(text.as_slice())
                }
                MarkerContent::Atom(_) => units.push(OBJECT_REPLACEMENT),
            }
        }
        units
    }

    /// The text of a markerable section as a UTF-16 string.
    pub fn section_utf16_text(&self, section: SectionId) -> Utf16String {
        Utf16String::from_str(&self.section_text(section))
    }

    /// A markerable section is blank when it has no content; a list
    /// section when it has no items. Cards and images are never blank.
    pub fn is_blank(&self, section: SectionId) -> bool {
        let s = &self.section_arena[section];
        if let Some(items) = s.items() {
            items.is_empty()
        } else if s.is_markerable() {
            self.section_length(section) == 0
        } else {
            false
        }
    }

    /// Whether the section is reachable from the post. Released ids are
    /// never attached.
    pub fn is_attached(&self, section: SectionId) -> bool {
        let Some(s) = self.section_arena.get(section) else {
            return false;
        };
        match s.parent() {
            Some(SectionParent::Post) => true,
            Some(SectionParent::List(list)) => self.is_attached(list),
            None => false,
        }
    }

    /// The top-level section containing `section` (itself when it is not a
    /// list item).
    pub fn top_level_section(&self, section: SectionId) -> SectionId {
        match self.section_arena[section].parent() {
            Some(SectionParent::List(list)) => self.top_level_section(list),
            _ => section,
        }
    }

    /// Leaf sections (everything but list sections, whose items are
    /// listed instead) in document order.
    pub fn leaf_sections(&self) -> Vec<SectionId> {
        let mut leaves = Vec::new();
        for section in self.top_level_sections() {
            match self.section_arena[section].items() {
                Some(items) => {
                    leaves.extend(items.iter(&self.section_arena))
                }
                None => leaves.push(section),
            }
        }
        leaves
    }

    pub fn next_leaf_section(&self, section: SectionId) -> Option<SectionId> {
        let s = &self.section_arena[section];
        match s.next() {
            Some(next) => self.first_leaf_in(next),
            None => match s.parent()? {
                SectionParent::List(list) => self.next_leaf_section(list),
                SectionParent::Post => None,
            },
        }
    }

    pub fn prev_leaf_section(&self, section: SectionId) -> Option<SectionId> {
        let s = &self.section_arena[section];
        match s.prev() {
            Some(prev) => self.last_leaf_in(prev),
            None => match s.parent()? {
                SectionParent::List(list) => self.prev_leaf_section(list),
                SectionParent::Post => None,
            },
        }
    }

    fn first_leaf_in(&self, section: SectionId) -> Option<SectionId> {
        match self.section_arena[section].items() {
            Some(items) => match items.head() {
                Some(head) => Some(head),
                None => self.next_leaf_section(section),
            },
            None => Some(section),
        }
    }

    fn last_leaf_in(&self, section: SectionId) -> Option<SectionId> {
        match self.section_arena[section].items() {
            Some(items) => match items.tail() {
                Some(tail) => Some(tail),
                None => self.prev_leaf_section(section),
            },
            None => Some(section),
        }
    }

    /// The first position in the post, `None` when it has no leaves.
    pub fn head_position(&self) -> Option<Position> {
        let head = self.sections.head()?;
        let leaf = self.first_leaf_in(head)?;
        Some(Position::head_of(leaf))
    }

    /// The last position in the post.
    pub fn tail_position(&self) -> Option<Position> {
        let tail = self.sections.tail()?;
        let leaf = self.last_leaf_in(tail)?;
        Some(Position::tail_of(self, leaf))
    }

    /// Leaf sections from `head` to `tail` inclusive.
    pub fn leaf_sections_between(
        &self,
        head: SectionId,
        tail: SectionId,
    ) -> Vec<SectionId> {
        let mut sections = vec![head];
        let mut current = head;
        while current != tail {
            match self.next_leaf_section(current) {
                Some(next) => {
                    sections.push(next);
                    current = next;
                }
                None => break,
            }
        }
        sections
    }

    /// Markerable sections touched by the range, in document order.
    pub fn markerable_sections_in_range(&self, range: &Range) -> Vec<SectionId> {
        self.leaf_sections_between(range.head.section, range.tail.section)
            .into_iter()
            .filter(|s| self.section_arena[*s].is_markerable())
            .collect()
    }

    /// Call `callback` with every markerable section touched by the range
    /// and the range trimmed to that section.
    pub fn walk_markerable_sections(
        &self,
        range: &Range,
        mut callback: impl FnMut(SectionId, Range),
    ) {
        for section in self.markerable_sections_in_range(range) {
            callback(section, range.trim_to(self, section));
        }
    }

    /// Top-level sections strictly between the top-level sections holding
    /// the range's head and tail.
    pub fn sections_contained_by(&self, range: &Range) -> Vec<SectionId> {
        let head = self.top_level_section(range.head.section);
        let tail = self.top_level_section(range.tail.section);
        if head == tail {
            return Vec::new();
        }
        let mut contained = Vec::new();
        let mut current = self.section_arena[head].next();
        while let Some(section) = current {
            if section == tail {
                break;
            }
            contained.push(section);
            current = self.section_arena[section].next();
        }
        contained
    }

    /// Markers lying wholly inside the range, in document order.
    ///
    /// A collapsed range contains no markers.
    pub fn markers_contained_by_range(&self, range: &Range) -> Vec<MarkerId> {
        let mut markers = Vec::new();
        if range.is_collapsed() {
            return markers;
        }
        self.walk_markerable_sections(range, |section, trimmed| {
            let mut start = 0;
            for marker in self.markers_of(section) {
                let end = start + self.marker_arena[marker].length();
                if start >= trimmed.head.offset
                    && end <= trimmed.tail.offset
                    && end > start
                {
                    markers.push(marker);
                }
                start = end;
            }
        });
        markers
    }

    /// Markups present on any marker overlapping the range. A collapsed
    /// range reports the markups of the marker just before it.
    pub fn markups_in_range(&self, range: &Range) -> Vec<MarkupId> {
        let mut seen = HashSet::new();
        let mut markups = Vec::new();
        let mut push_all = |ids: &[MarkupId]| {
            for id in ids {
                if seen.insert(*id) {
                    markups.push(*id);
                }
            }
        };
        if range.is_collapsed() {
            if let Some(marker) = self.marker_before(range.head) {
                push_all(self.marker_arena[marker].markups());
            }
            return markups;
        }
        self.walk_markerable_sections(range, |section, trimmed| {
            let mut start = 0;
            for marker in self.markers_of(section) {
                let end = start + self.marker_arena[marker].length();
                if end > trimmed.head.offset && start < trimmed.tail.offset {
                    push_all(self.marker_arena[marker].markups());
                }
                start = end;
            }
        });
        markups
    }

    /// The marker ending at or containing the code unit just before
    /// `position`, `None` at the head of a section.
    pub(crate) fn marker_before(&self, position: Position) -> Option<MarkerId> {
        if position.offset == 0 {
            return None;
        }
        position.marker_position(self).map(|p| p.marker)
    }

    /// A new post holding a copy of the content covered by `range`.
    pub fn trim_to(&self, range: &Range) -> Post {
        let mut post = Post::new();
        let mut current_list: Option<(SectionId, SectionId)> = None;

        for section in
            self.leaf_sections_between(range.head.section, range.tail.section)
        {
            let trimmed = range.trim_to(self, section);
            let copy = self.copy_leaf_into(&mut post, section, &trimmed);
            match self.section_arena[section].parent() {
                Some(SectionParent::List(list)) => {
                    let target = match current_list {
                        Some((source, target)) if source == list => target,
                        _ => {
                            let target =
                                post.copy_section_shell(self, list);
                            post.append_section(SectionParent::Post, target);
                            current_list = Some((list, target));
                            target
                        }
                    };
                    post.append_section(SectionParent::List(target), copy);
                }
                _ => {
                    current_list = None;
                    post.append_section(SectionParent::Post, copy);
                }
            }
        }
        post
    }
}
