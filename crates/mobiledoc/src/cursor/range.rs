// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cmp::Ordering;

use super::{Direction, Position};
use crate::error::ModelError;
use crate::models::{Post, SectionId};

/// A span between two positions. `head` never comes after `tail`;
/// `direction` records which end the user is moving, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub head: Position,
    pub tail: Position,
    pub direction: Option<Direction>,
}

impl Range {
    pub fn new(head: Position, tail: Position) -> Self {
        Self {
            head,
            tail,
            direction: None,
        }
    }

    pub fn with_direction(
        head: Position,
        tail: Position,
        direction: Direction,
    ) -> Self {
        Self {
            head,
            tail,
            direction: Some(direction),
        }
    }

    pub fn collapsed(position: Position) -> Self {
        Self::new(position, position)
    }

    /// The whole of one section.
    pub fn from_section(post: &Post, section: SectionId) -> Self {
        Self::new(Position::head_of(section), Position::tail_of(post, section))
    }

    pub fn is_collapsed(&self) -> bool {
        self.head == self.tail
    }

    /// The end the user is moving: the head of a backward range, the tail
    /// otherwise.
    pub fn focused_position(&self) -> Position {
        match self.direction {
            Some(Direction::Backward) => self.head,
            _ => self.tail,
        }
    }

    /// Check both ends point into `post` and the head does not come after
    /// the tail.
    pub fn validated(self, post: &Post) -> Result<Self, ModelError> {
        let head = self.head.validated(post)?;
        let tail = self.tail.validated(post)?;
        if head.compare(&tail, post) == Ordering::Greater {
            return Err(ModelError::InvertedRange);
        }
        Ok(self)
    }

    /// This range clamped to `section`: an end outside the section moves to
    /// the section's head or tail.
    pub fn trim_to(&self, post: &Post, section: SectionId) -> Range {
        let length = post.section_length(section);
        let head_offset = if self.head.section == section {
            self.head.offset.min(length)
        } else {
            0
        };
        let tail_offset = if self.tail.section == section {
            self.tail.offset.min(length)
        } else {
            length
        };
        Range::new(
            Position::new(section, head_offset),
            Position::new(section, tail_offset),
        )
    }

    /// Move the focused end by `units` characters (negative is left). A
    /// collapsed range takes the direction of the move.
    pub fn extend(&self, post: &Post, units: isize) -> Range {
        let direction = match self.direction {
            Some(direction) if !self.is_collapsed() => direction,
            _ if units < 0 => Direction::Backward,
            _ => Direction::Forward,
        };
        let mut focus = match direction {
            Direction::Backward => self.head,
            Direction::Forward => self.tail,
        };
        for _ in 0..units.unsigned_abs() {
            let moved = if units < 0 {
                focus.move_left(post)
            } else {
                focus.move_right(post)
            };
            match moved {
                Some(position) => focus = position,
                None => break,
            }
        }
        let anchor = match direction {
            Direction::Backward => self.tail,
            Direction::Forward => self.head,
        };
        if focus.compare(&anchor, post) == Ordering::Less {
            Range::with_direction(focus, anchor, Direction::Backward)
        } else {
            Range::with_direction(anchor, focus, Direction::Forward)
        }
    }
}
