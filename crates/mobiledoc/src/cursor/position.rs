// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cmp::Ordering;

use crate::error::ModelError;
use crate::models::{MarkerId, Post, SectionId};
use crate::text::{char_width_after, char_width_before};

/// A caret location: a leaf section and an offset into its text, in UTF-16
/// code units. Cards and images only have offset 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub section: SectionId,
    pub offset: usize,
}

/// A [`Position`] resolved to the marker it falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerPosition {
    pub marker: MarkerId,
    pub offset: usize,
}

impl Position {
    pub fn new(section: SectionId, offset: usize) -> Self {
        Self { section, offset }
    }

    pub fn head_of(section: SectionId) -> Self {
        Self::new(section, 0)
    }

    pub fn tail_of(post: &Post, section: SectionId) -> Self {
        Self::new(section, post.section_length(section))
    }

    /// This position, or an error if it does not point into an attached
    /// section of `post`.
    pub fn validated(self, post: &Post) -> Result<Self, ModelError> {
        if !post.is_attached(self.section) {
            return Err(ModelError::Detached(self.section));
        }
        let length = post.section_length(self.section);
        if self.offset > length {
            return Err(ModelError::OffsetOutOfBounds {
                offset: self.offset,
                length,
            });
        }
        Ok(self)
    }

    pub fn is_head(&self) -> bool {
        self.offset == 0
    }

    pub fn is_tail(&self, post: &Post) -> bool {
        self.offset == post.section_length(self.section)
    }

    /// The marker holding this position and the offset within it.
    ///
    /// A position on the boundary between two markers resolves to the end
    /// of the earlier one. `None` for sections without markers.
    pub fn marker_position(&self, post: &Post) -> Option<MarkerPosition> {
        let mut remaining = self.offset;
        for marker in post.markers_of(self.section) {
            let length = post.marker(marker).length();
            if remaining <= length {
                return Some(MarkerPosition {
                    marker,
                    offset: remaining,
                });
            }
            remaining -= length;
        }
        None
    }

    /// One character to the left, moving to the end of the previous leaf
    /// section from the head of this one. Surrogate pairs are one
    /// character.
    pub fn move_left(&self, post: &Post) -> Option<Position> {
        if self.offset > 0 {
            let units = post.section_units(self.section);
            let width = char_width_before(&units, self.offset);
            Some(Self::new(self.section, self.offset - width))
        } else {
            let prev = post.prev_leaf_section(self.section)?;
            Some(Self::tail_of(post, prev))
        }
    }

    pub fn move_right(&self, post: &Post) -> Option<Position> {
        if !self.is_tail(post) {
            let units = post.section_units(self.section);
            let width = char_width_after(&units, self.offset);
            Some(Self::new(self.section, self.offset + width))
        } else {
            let next = post.next_leaf_section(self.section)?;
            Some(Self::head_of(next))
        }
    }

    /// Document order of two positions in `post`.
    pub fn compare(&self, other: &Position, post: &Post) -> Ordering {
        if self.section == other.section {
            return self.offset.cmp(&other.offset);
        }
        let leaves = post.leaf_sections();
        let index = |s: SectionId| leaves.iter().position(|l| *l == s);
        index(self.section)
            .cmp(&index(other.section))
            .then(self.offset.cmp(&other.offset))
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::*;
    use crate::tests::testutils_post::post_from;

    fn three_markers() -> (Post, SectionId, Vec<MarkerId>) {
        let (mut post, _) = post_from("|");
        let section = post.leaf_sections()[0];
        let markers: Vec<MarkerId> = ["ab", "cd", "ef"]
            .iter()
            .map(|text| {
                let m = post.builder().create_marker(text, vec![]);
                post.append_marker(section, m);
                m
            })
            .collect();
        (post, section, markers)
    }

    #[test]
    fn marker_position_prefers_the_earlier_marker_on_boundaries() {
        let (post, section, markers) = three_markers();
        let at = |offset| Position::new(section, offset).marker_position(&post);
        assert_eq!(
            at(0),
            Some(MarkerPosition {
                marker: markers[0],
                offset: 0
            })
        );
        assert_eq!(
            at(2),
            Some(MarkerPosition {
                marker: markers[0],
                offset: 2
            })
        );
        assert_eq!(
            at(3),
            Some(MarkerPosition {
                marker: markers[1],
                offset: 1
            })
        );
        assert_eq!(
            at(6),
            Some(MarkerPosition {
                marker: markers[2],
                offset: 2
            })
        );
        assert_eq!(at(7), None);
    }

    #[test]
    fn validation_rejects_offsets_past_the_end() {
        let (post, section, _) = three_markers();
        assert!(Position::new(section, 6).validated(&post).is_ok());
        assert_eq!(
            Position::new(section, 7).validated(&post),
            Err(ModelError::OffsetOutOfBounds {
                offset: 7,
                length: 6
            })
        );
    }

    #[test]
    fn moving_steps_over_surrogate_pairs_and_sections() {
        let (post, _) = post_from("a😀|\nb");
        let leaves = post.leaf_sections();
        let end = Position::tail_of(&post, leaves[0]);
        assert_eq!(end.offset, 3);
        let left = end.move_left(&post).unwrap();
        assert_eq!(left.offset, 1);
        assert_eq!(left.move_right(&post), Some(end));
        assert_eq!(end.move_right(&post), Some(Position::head_of(leaves[1])));
        assert_eq!(Position::head_of(leaves[1]).move_left(&post), Some(end));
        assert_eq!(Position::head_of(leaves[0]).move_left(&post), None);
    }

    #[test]
    fn positions_compare_in_document_order() {
        let (post, _) = post_from("ab|\n* c\nd");
        let leaves = post.leaf_sections();
        let a = Position::new(leaves[0], 2);
        let b = Position::new(leaves[1], 0);
        let c = Position::new(leaves[2], 1);
        assert_eq!(a.compare(&b, &post), Ordering::Less);
        assert_eq!(c.compare(&b, &post), Ordering::Greater);
        assert_eq!(a.compare(&a, &post), Ordering::Equal);
    }
}
