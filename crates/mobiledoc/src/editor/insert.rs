// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Inserting text, atoms and markers at a position.

use serde_json::Value;

use super::PostEditor;
use crate::cursor::Position;
use crate::error::ModelError;
use crate::models::{MarkerId, MarkupId};

impl PostEditor<'_> {
    /// Insert detached markers at `position` and return the position just
    /// after them.
    pub fn insert_markers(
        &mut self,
        position: Position,
        markers: Vec<MarkerId>,
    ) -> Result<Position, ModelError> {
        self.insert_markers_for("insert markers into", position, markers)
    }

    /// Insert `text` at `position`. The new text carries the markups of the
    /// marker the position is in, so typing at the end of bold text stays
    /// bold.
    pub fn insert_text(
        &mut self,
        position: Position,
        text: &str,
    ) -> Result<Position, ModelError> {
        let position = self.check_markerable("insert text into", position)?;
        if text.is_empty() {
            return Ok(position);
        }
        let markups = self.markups_at(position);
        let marker = self.post.builder().create_marker(text, markups);
        self.insert_markers_for("insert text into", position, vec![marker])
    }

    pub fn insert_atom(
        &mut self,
        position: Position,
        name: &str,
        value: &str,
        payload: Value,
    ) -> Result<Position, ModelError> {
        let position = self.check_markerable("insert an atom into", position)?;
        let markups = self.markups_at(position);
        let atom = self.post.builder().create_atom(name, value, payload, markups);
        self.insert_markers_for("insert an atom into", position, vec![atom])
    }

    fn insert_markers_for(
        &mut self,
        operation: &'static str,
        position: Position,
        markers: Vec<MarkerId>,
    ) -> Result<Position, ModelError> {
        let position = self.check_markerable(operation, position)?;
        let section = position.section;
        let before = match position.marker_position(self.post) {
            Some(at) => self.split_marker(at.marker, at.offset)?.1,
            None => None,
        };
        let mut offset = position.offset;
        for marker in markers {
            offset += self.post.marker(marker).length();
            self.post.insert_marker(section, marker, before);
        }
        self.schedule_for_coalescing(section);
        self.changed();
        Ok(Position::new(section, offset))
    }

    fn check_markerable(
        &self,
        operation: &'static str,
        position: Position,
    ) -> Result<Position, ModelError> {
        let position = position.validated(self.post)?;
        let s = self.post.section(position.section);
        if s.is_markerable() {
            Ok(position)
        } else {
            Err(ModelError::NotMarkerable {
                operation,
                section_type: s.section_type(),
            })
        }
    }

    fn markups_at(&self, position: Position) -> Vec<MarkupId> {
        position
            .marker_position(self.post)
            .map(|at| self.post.marker(at.marker).markups().to_vec())
            .unwrap_or_default()
    }
}
