// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Deleting ranges and single characters.

use log::trace;

use super::PostEditor;
use crate::cursor::{Direction, Position, Range};
use crate::error::ModelError;
use crate::models::SectionId;
use crate::text::{char_width_after, char_width_before};

impl PostEditor<'_> {
    /// Delete the content of `range` and return where the caret belongs
    /// afterwards.
    ///
    /// Across sections, the head section is cut to its end, the tail
    /// section is cut from its start, every leaf in between is removed and
    /// what is left of the tail is joined onto the head. A card at either
    /// end is removed; when nothing markerable is left a blank paragraph
    /// takes the place of the range.
    pub fn delete_range(&mut self, range: &Range) -> Result<Position, ModelError> {
        let range = range.validated(self.post)?;
        if range.is_collapsed() {
            return Ok(range.head);
        }
        let (head, tail) = (range.head, range.tail);
        trace!("Deleting {range:?}");

        if head.section == tail.section {
            self.cut_section(head.section, head.offset, tail.offset)?;
            return Ok(head);
        }

        let leaves = self.post.leaf_sections_between(head.section, tail.section);
        let head_markerable = self.post.section(head.section).is_markerable();
        let tail_markerable = self.post.section(tail.section).is_markerable();

        if head_markerable {
            let length = self.post.section_length(head.section);
            self.cut_section(head.section, head.offset, length)?;
        }
        if tail_markerable {
            self.cut_section(tail.section, 0, tail.offset)?;
        }
        for section in &leaves[1..leaves.len() - 1] {
            self.post.remove_section(*section);
        }
        self.changed();

        match (head_markerable, tail_markerable) {
            (true, true) => {
                self.join_sections(head.section, tail.section);
                Ok(head)
            }
            (true, false) => {
                self.post.remove_section(tail.section);
                Ok(head)
            }
            (false, true) => {
                self.post.remove_section(head.section);
                Ok(Position::head_of(tail.section))
            }
            (false, false) => {
                let blank = self.replace_with_blank(head.section)?;
                self.post.remove_section(tail.section);
                Ok(Position::head_of(blank))
            }
        }
    }

    /// Remove the content of `section` between two offsets. Sections
    /// without markers are left alone.
    pub fn cut_section(
        &mut self,
        section: SectionId,
        head_offset: usize,
        tail_offset: usize,
    ) -> Result<(), ModelError> {
        if !self.post.section(section).is_markerable() {
            return Ok(());
        }
        let range = Range::new(
            Position::new(section, head_offset),
            Position::new(section, tail_offset),
        )
        .validated(self.post)?;
        if range.is_collapsed() {
            return Ok(());
        }
        for marker in self.split_markers(&range)? {
            self.post.remove_marker(marker);
        }
        self.schedule_for_coalescing(section);
        self.changed();
        Ok(())
    }

    /// Delete one character next to `position`, or join sections when the
    /// position is at a section boundary. Returns the new caret position.
    ///
    /// Deleting backwards from the head of the post, or forwards from its
    /// tail, does nothing. Backspace at the head of the first or last item
    /// of a list turns the item into a paragraph.
    pub fn delete_from(
        &mut self,
        position: Position,
        direction: Direction,
    ) -> Result<Position, ModelError> {
        let position = position.validated(self.post)?;
        if self.post.section(position.section).is_card() {
            let blank = self.replace_with_blank(position.section)?;
            return Ok(Position::head_of(blank));
        }
        match direction {
            Direction::Backward => self.delete_backward(position),
            Direction::Forward => self.delete_forward(position),
        }
    }

    fn delete_backward(
        &mut self,
        position: Position,
    ) -> Result<Position, ModelError> {
        let section = position.section;
        if position.offset > 0 {
            let units = self.post.section_units(section);
            let start = position.offset - char_width_before(&units, position.offset);
            self.cut_section(section, start, position.offset)?;
            return Ok(Position::new(section, start));
        }

        let s = self.post.section(section);
        if s.is_list_item() && (s.prev().is_none() || s.next().is_none()) {
            let paragraph = self.unlist_item_to_paragraph(section)?;
            return Ok(Position::head_of(paragraph));
        }

        let Some(prev) = self.post.prev_leaf_section(section) else {
            return Ok(position);
        };
        if !self.post.section(prev).is_markerable() {
            if self.post.is_blank(section) {
                self.post.remove_section(section);
                self.changed();
                return Ok(Position::tail_of(self.post, prev));
            }
            self.post.remove_section(prev);
            self.changed();
            return Ok(position);
        }

        let joined_at = Position::tail_of(self.post, prev);
        self.join_sections(prev, section);
        Ok(joined_at)
    }

    fn delete_forward(
        &mut self,
        position: Position,
    ) -> Result<Position, ModelError> {
        let section = position.section;
        let length = self.post.section_length(section);
        if position.offset < length {
            let units = self.post.section_units(section);
            let end = position.offset + char_width_after(&units, position.offset);
            self.cut_section(section, position.offset, end)?;
            return Ok(position);
        }

        let Some(next) = self.post.next_leaf_section(section) else {
            return Ok(position);
        };
        if self.post.is_blank(section) {
            self.post.remove_section(section);
            self.changed();
            return Ok(Position::head_of(next));
        }
        if !self.post.section(next).is_markerable() {
            self.post.remove_section(next);
            self.changed();
            return Ok(position);
        }
        self.join_sections(section, next);
        Ok(position)
    }

    /// Move the markers of `from` onto the end of `to` and remove `from`.
    fn join_sections(&mut self, to: SectionId, from: SectionId) {
        trace!("Joining {from:?} into {to:?}");
        self.post.move_markers(from, to);
        self.post.remove_section(from);
        self.schedule_for_coalescing(to);
        self.changed();
    }

    /// Put a generated blank paragraph where `section` is.
    fn replace_with_blank(
        &mut self,
        section: SectionId,
    ) -> Result<SectionId, ModelError> {
        let blank = self.post.builder().create_blank_markup_section();
        self.replace_section(section, blank)?;
        Ok(blank)
    }

    /// Turn a list item into a paragraph holding its markers, splitting
    /// the list around it.
    fn unlist_item_to_paragraph(
        &mut self,
        item: SectionId,
    ) -> Result<SectionId, ModelError> {
        let paragraph = self
            .post
            .builder()
            .create_markup_section("p", vec![], false)?;
        self.post.move_markers(item, paragraph);
        self.replace_section(item, paragraph)?;
        Ok(paragraph)
    }
}

#[cfg(test)]
mod test {
    use crate::cursor::{Direction, Range};
    use crate::editor::PostEditor;
    use crate::error::ModelError;
    use crate::tests::testutils_post::{post_from, post_to_string};

    fn delete_range(text: &str) -> String {
        let (mut post, range) = post_from(text);
        let (_, completed) = PostEditor::new(&mut post)
            .run(|editor| {
                let position = editor.delete_range(&range)?;
                editor.set_range(Range::collapsed(position));
                Ok::<_, ModelError>(())
            })
            .unwrap();
        post.explicitly_assert_invariants();
        post_to_string(&post, &completed.range.unwrap())
    }

    fn delete(text: &str, direction: Direction) -> String {
        let (mut post, range) = post_from(text);
        let (_, completed) = PostEditor::new(&mut post)
            .run(|editor| {
                let position = editor.delete_from(range.head, direction)?;
                editor.set_range(Range::collapsed(position));
                Ok::<_, ModelError>(())
            })
            .unwrap();
        post.explicitly_assert_invariants();
        post_to_string(&post, &completed.range.unwrap())
    }

    fn backspace(text: &str) -> String {
        delete(text, Direction::Backward)
    }

    fn forward_delete(text: &str) -> String {
        delete(text, Direction::Forward)
    }

    // ===================================================================
    // Ranges
    // ===================================================================

    #[test]
    fn deleting_everything_in_a_section_leaves_it_blank() {
        let (mut post, _) = post_from("|");
        let section = post.leaf_sections()[0];
        for text in ["ab", "cd"] {
            let marker = post.builder().create_marker(text, vec![]);
            post.append_marker(section, marker);
        }
        let range = Range::from_section(&post, section);

        PostEditor::new(&mut post)
            .run(|editor| editor.delete_range(&range))
            .unwrap();

        assert_eq!(post.top_level_sections(), vec![section]);
        assert_eq!(post.section(section).tag_name().as_deref(), Some("p"));
        assert!(post.is_blank(section));
    }

    #[test]
    fn deleting_within_a_section() {
        assert_eq!(delete_range("a{bc}d"), "a|d");
        assert_eq!(delete_range("{abc}d"), "|d");
    }

    #[test]
    fn deleting_across_sections_joins_the_ends() {
        assert_eq!(delete_range("a{bc\nde\nf}g"), "a|g");
        assert_eq!(delete_range("* a{b\n* c}d\n* e"), "* a|d\n* e");
        assert_eq!(delete_range("a{b\n* c\n* d}e"), "a|e");
    }

    #[test]
    fn deleting_into_a_card_removes_it() {
        assert_eq!(delete_range("a{b\n}[card]\nc"), "a|\nc");
        assert_eq!(delete_range("{[card]\nab}c"), "|c");
    }

    #[test]
    fn cutting_removes_whole_and_partial_markers() {
        let (mut post, _) = post_from("|");
        let section = post.leaf_sections()[0];
        for text in ["ab", "cd", "ef"] {
            let marker = post.builder().create_marker(text, vec![]);
            post.append_marker(section, marker);
        }
        PostEditor::new(&mut post)
            .run(|editor| editor.cut_section(section, 1, 5))
            .unwrap();
        assert_eq!(post.section_text(section), "af");
        assert_eq!(post.markers_of(section).len(), 1);
    }

    #[test]
    fn cutting_a_card_does_nothing() {
        let (mut post, _) = post_from("[card]");
        let card = post.leaf_sections()[0];
        let ((), completed) = PostEditor::new(&mut post)
            .run(|editor| editor.cut_section(card, 0, 0))
            .unwrap();
        assert!(!completed.did_update);
    }

    // ===================================================================
    // Backspace
    // ===================================================================

    #[test]
    fn backspace_deletes_a_character() {
        assert_eq!(backspace("ab|c"), "a|c");
        assert_eq!(backspace("a😀|"), "a|");
    }

    #[test]
    fn backspace_at_the_start_joins_with_the_previous_section() {
        let (mut post, range) = post_from("foo\n|bar");
        let (_, completed) = PostEditor::new(&mut post)
            .run(|editor| {
                let position = editor.delete_from(range.head, Direction::Backward)?;
                editor.set_range(Range::collapsed(position));
                Ok::<_, ModelError>(())
            })
            .unwrap();
        assert_eq!(post.top_level_sections().len(), 1);
        assert_eq!(post.section_text(post.leaf_sections()[0]), "foobar");
        assert_eq!(post_to_string(&post, &completed.range.unwrap()), "foo|bar");
    }

    #[test]
    fn backspace_at_the_head_of_the_post_does_nothing() {
        let (mut post, _) = post_from("foo\nbar");
        let head = post.head_position().unwrap();
        let (position, completed) = PostEditor::new(&mut post)
            .run(|editor| editor.delete_from(head, Direction::Backward))
            .unwrap();
        assert_eq!(position, head);
        assert!(!completed.did_update);
        assert_eq!(post.top_level_sections().len(), 2);
    }

    #[test]
    fn backspace_in_a_first_or_last_list_item_leaves_the_list() {
        assert_eq!(backspace("* |a\n* b"), "|a\n* b");
        assert_eq!(backspace("* a\n* |b"), "* a\n|b");
        assert_eq!(backspace("* a\n* b\n* |c"), "* a\n* b\n|c");
        assert_eq!(backspace("* a\n* |b\n* c"), "* a|b\n* c");
        assert_eq!(backspace("* a\n|b"), "* a|b");
    }

    #[test]
    fn backspace_after_a_card() {
        assert_eq!(backspace("[card]\n|x"), "|x");
        assert_eq!(backspace("[card]\n|"), "|[card]");
        assert_eq!(backspace("|[card]"), "|");
    }

    // ===================================================================
    // Forward delete
    // ===================================================================

    #[test]
    fn forward_delete_deletes_a_character() {
        assert_eq!(forward_delete("a|bc"), "a|c");
        assert_eq!(forward_delete("a|😀b"), "a|b");
    }

    #[test]
    fn forward_delete_at_the_end_joins_the_next_section() {
        assert_eq!(forward_delete("ab|\ncd"), "ab|cd");
        assert_eq!(forward_delete("|\n# cd"), "# |cd");
        assert_eq!(forward_delete("ab|\n[card]"), "ab|");
        assert_eq!(forward_delete("ab|"), "ab|");
    }
}
