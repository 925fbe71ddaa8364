// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::Post;
use crate::linked_list::{ArenaId, Linked, LinkedList};
use crate::models::{SectionId, SectionParent};

impl Post {
    /// Panic if the tree is inconsistent: broken links, children with the
    /// wrong parent, list items outside lists or empty text markers.
    ///
    /// Run automatically at the end of every edit when the
    /// `assert-invariants` feature is enabled.
    pub fn explicitly_assert_invariants(&self) {
        self.assert_list_links(&self.sections, &self.section_arena);
        for section in self.sections.iter(&self.section_arena) {
            let s = &self.section_arena[section];
            assert!(
                !s.is_list_item(),
                "List item {section:?} is a top-level section"
            );
            if let Some(items) = s.items() {
                self.assert_list_links(items, &self.section_arena);
                for item in items.iter(&self.section_arena) {
                    assert!(
                        self.section_arena[item].is_list_item(),
                        "{item:?} in list {section:?} is not a list item"
                    );
                    assert_eq!(
                        self.section_arena[item].parent(),
                        Some(SectionParent::List(section))
                    );
                    self.assert_markers(item);
                }
            } else {
                self.assert_markers(section);
            }
        }
    }

    fn assert_markers(&self, section: SectionId) {
        let Some(markers) = self.section_arena[section].markers() else {
            return;
        };
        self.assert_list_links(markers, &self.marker_arena);
        for marker in markers.iter(&self.marker_arena) {
            let m = &self.marker_arena[marker];
            assert_eq!(m.section(), Some(section));
            assert!(
                m.is_atom() || m.length() > 0,
                "Empty marker {marker:?} left in {section:?}"
            );
        }
    }

    fn assert_list_links<I, P, T>(
        &self,
        list: &LinkedList<I, P>,
        arena: &crate::linked_list::Arena<I, T>,
    ) where
        I: ArenaId,
        P: Copy + PartialEq + std::fmt::Debug,
        T: Linked<I, P>,
    {
        let items = list.to_vec(arena);
        assert_eq!(items.len(), list.len(), "List length is out of date");
        assert_eq!(items.first().copied(), list.head());
        assert_eq!(items.last().copied(), list.tail());
        let mut prev = None;
        for item in items {
            let links = arena[item].links();
            assert_eq!(links.prev(), prev, "Broken prev link on {item:?}");
            assert_eq!(links.parent(), Some(list.owner()));
            prev = Some(item);
        }
    }
}
