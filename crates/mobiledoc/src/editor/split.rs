// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Splitting markers and sections.

use log::trace;

use super::PostEditor;
use crate::cursor::{Position, Range};
use crate::error::ModelError;
use crate::models::{MarkerId, SectionId, SectionParent};

impl PostEditor<'_> {
    /// Make sure a marker boundary exists `offset` code units into
    /// `marker`, returning the markers either side of it.
    ///
    /// Splitting at either end of the marker allocates nothing: the result
    /// is the existing neighbour and the marker itself. Otherwise the
    /// marker is replaced by two new markers with the same markups.
    pub fn split_marker(
        &mut self,
        marker: MarkerId,
        offset: usize,
    ) -> Result<(Option<MarkerId>, Option<MarkerId>), ModelError> {
        let m = self.post.marker(marker);
        let length = m.length();
        if offset > length {
            return Err(ModelError::OffsetOutOfBounds { offset, length });
        }
        if offset == 0 {
            return Ok((m.prev(), Some(marker)));
        }
        if offset == length {
            return Ok((Some(marker), m.next()));
        }

        trace!("Splitting {marker:?} at {offset}");
        let before = m.slice(0, offset);
        let after = m.slice(offset, length);
        let section = m.section();
        let before = self.post.alloc_marker(before);
        let after = self.post.alloc_marker(after);
        self.post.replace_marker(marker, &[before, after]);
        if let Some(section) = section {
            self.schedule_for_coalescing(section);
        }
        self.changed();
        Ok((Some(before), Some(after)))
    }

    /// Make sure a marker boundary exists at `offset` in `section`.
    pub fn split_section_marker_at_offset(
        &mut self,
        section: SectionId,
        offset: usize,
    ) -> Result<(), ModelError> {
        let position = Position::new(section, offset).validated(self.post)?;
        if let Some(at) = position.marker_position(self.post) {
            self.split_marker(at.marker, at.offset)?;
        }
        Ok(())
    }

    /// Split markers at both ends of `range` and return the markers it
    /// now wholly contains.
    pub fn split_markers(
        &mut self,
        range: &Range,
    ) -> Result<Vec<MarkerId>, ModelError> {
        let range = range.validated(self.post)?;
        self.split_section_marker_at_offset(range.head.section, range.head.offset)?;
        self.split_section_marker_at_offset(range.tail.section, range.tail.offset)?;
        Ok(self.post.markers_contained_by_range(&range))
    }

    /// Split the section at `position` in two.
    ///
    /// A markerable section is replaced by two new sections of the same
    /// kind holding the content before and after the position. A card or
    /// image gets a blank paragraph inserted after it. A blank last list
    /// item is not split: it is removed and a blank paragraph follows the
    /// list instead, so pressing enter in an empty item leaves the list.
    pub fn split_section(
        &mut self,
        position: Position,
    ) -> Result<(Option<SectionId>, Option<SectionId>), ModelError> {
        let position = position.validated(self.post)?;
        let section = position.section;
        let s = self.post.section(section);

        if !s.is_markerable() {
            let blank = self.post.builder().create_blank_markup_section();
            let parent = self.post.section(section).parent();
            let next = self.post.section(section).next();
            if let Some(parent) = parent {
                self.post.insert_section(parent, blank, next)?;
            }
            self.changed();
            return Ok((Some(section), Some(blank)));
        }

        if s.is_list_item() && s.next().is_none() && self.post.is_blank(section) {
            if let Some(SectionParent::List(list)) = s.parent() {
                let blank = self.post.builder().create_blank_markup_section();
                let parent = self
                    .post
                    .section(list)
                    .parent()
                    .unwrap_or(SectionParent::Post);
                let next = self.post.section(list).next();
                self.post.insert_section(parent, blank, next)?;
                self.post.remove_section(section);
                self.changed();
                return Ok((None, Some(blank)));
            }
        }

        self.split_section_marker_at_offset(section, position.offset)?;
        let source = Range::from_section(self.post, section);
        let before_range = Range::new(source.head, position);
        let after_range = Range::new(position, source.tail);
        let before = self.post.copy_leaf(section, &before_range);
        let after = self.post.copy_leaf(section, &after_range);
        self.replace_section_with(section, &[before, after])?;
        Ok((Some(before), Some(after)))
    }
}
