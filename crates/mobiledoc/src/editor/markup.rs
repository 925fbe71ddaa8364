// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Applying and removing inline markups.

use super::PostEditor;
use crate::cursor::Range;
use crate::error::ModelError;
use crate::models::{MarkerId, MarkupId, MarkupTag};

impl PostEditor<'_> {
    /// Add `markup` to every marker in `range`, splitting the markers at
    /// the ends of the range first.
    pub fn add_markup_to_range(
        &mut self,
        range: &Range,
        markup: MarkupId,
    ) -> Result<(), ModelError> {
        for marker in self.split_markers(range)? {
            let m = &mut self.post.marker_arena[marker];
            m.add_markup(markup);
            m.render.is_dirty = true;
            self.touch_marker_section(marker);
        }
        self.changed();
        Ok(())
    }

    pub fn remove_markup_from_range(
        &mut self,
        range: &Range,
        markup: MarkupId,
    ) -> Result<(), ModelError> {
        self.remove_markup_from_range_where(range, |m| m == markup)
    }

    /// Remove every markup matching `predicate` from the markers in
    /// `range`.
    pub fn remove_markup_from_range_where(
        &mut self,
        range: &Range,
        mut predicate: impl FnMut(MarkupId) -> bool,
    ) -> Result<(), ModelError> {
        for marker in self.split_markers(range)? {
            let m = &mut self.post.marker_arena[marker];
            if m.remove_markups_where(&mut predicate) {
                m.render.is_dirty = true;
                self.touch_marker_section(marker);
                self.changed();
            }
        }
        Ok(())
    }

    /// Remove markups with this tag from `range` if any marker in it has
    /// one, otherwise add the markup to the whole range. Does nothing for a
    /// collapsed range.
    pub fn toggle_markup(
        &mut self,
        range: &Range,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), ModelError> {
        let markup = self.post.builder().create_markup(tag, attributes)?;
        let range = range.validated(self.post)?;
        if range.is_collapsed() {
            return Ok(());
        }
        let tag = self.post.markup(markup).tag();
        let present = self
            .post
            .markups_in_range(&range)
            .into_iter()
            .any(|id| self.post.markup(id).has_tag(tag));
        if present {
            self.remove_markups_with_tag(&range, tag)
        } else {
            self.add_markup_to_range(&range, markup)
        }
    }

    fn remove_markups_with_tag(
        &mut self,
        range: &Range,
        tag: MarkupTag,
    ) -> Result<(), ModelError> {
        let matching: Vec<MarkupId> = self
            .post
            .all_markups()
            .filter(|(_, markup)| markup.has_tag(tag))
            .map(|(id, _)| id)
            .collect();
        self.remove_markup_from_range_where(range, |id| matching.contains(&id))
    }

    fn touch_marker_section(&mut self, marker: MarkerId) {
        if let Some(section) = self.post.marker(marker).section() {
            self.post.mark_section_dirty(section);
            self.schedule_for_coalescing(section);
        }
    }
}

#[cfg(test)]
mod test {
    use indoc::indoc;

    use crate::cursor::{Position, Range};
    use crate::editor::PostEditor;
    use crate::error::ModelError;
    use crate::models::Post;
    use crate::tests::testutils_post::post_from;

    #[test]
    fn adding_a_markup_splits_the_markers() {
        let (mut post, range) = post_from("a{bc}d");
        let bold = post.builder().create_markup("b", &[]).unwrap();
        PostEditor::new(&mut post)
            .run(|editor| editor.add_markup_to_range(&range, bold))
            .unwrap();
        assert_eq!(
            post.to_tree(),
            indoc! {r#"

                └>p
                  ├>"a"
                  ├>"bc" [b]
                  └>"d"
            "#}
        );
    }

    #[test]
    fn adding_a_markup_across_sections() {
        let (mut post, range) = post_from("a{b\nc}d");
        let link = post
            .builder()
            .create_markup("a", &[("href", "https://example.org")])
            .unwrap();
        PostEditor::new(&mut post)
            .run(|editor| editor.add_markup_to_range(&range, link))
            .unwrap();
        assert_eq!(
            post.to_tree(),
            indoc! {r#"

                ├>p
                │ ├>"a"
                │ └>"b" [a href="https://example.org"]
                └>p
                  ├>"c" [a href="https://example.org"]
                  └>"d"
            "#}
        );
    }

    #[test]
    fn removing_a_markup_from_part_of_a_range() {
        let (mut post, _) = post_from("abcd|");
        let section = post.leaf_sections()[0];
        let bold = post.builder().create_markup("b", &[]).unwrap();
        let whole = Range::from_section(&post, section);
        PostEditor::new(&mut post)
            .run(|editor| editor.add_markup_to_range(&whole, bold))
            .unwrap();

        let middle =
            Range::new(Position::new(section, 1), Position::new(section, 3));
        PostEditor::new(&mut post)
            .run(|editor| editor.remove_markup_from_range(&middle, bold))
            .unwrap();
        assert_eq!(
            post.to_tree(),
            indoc! {r#"

                └>p
                  ├>"a" [b]
                  ├>"bc"
                  └>"d" [b]
            "#}
        );
    }

    #[test]
    fn toggling_a_markup_twice_restores_the_markers() {
        let (mut post, range) = post_from("a{bc}d");
        let section = range.head.section;
        PostEditor::new(&mut post)
            .run(|editor| editor.toggle_markup(&range, "strong", &[]))
            .unwrap();
        assert_eq!(post.markers_of(section).len(), 3);

        PostEditor::new(&mut post)
            .run(|editor| editor.toggle_markup(&range, "strong", &[]))
            .unwrap();
        assert_eq!(
            post.to_tree(),
            indoc! {r#"

                └>p
                  └>"abcd"
            "#}
        );
    }

    #[test]
    fn toggling_a_link_removes_links_with_other_targets() {
        let (mut post, range) = post_from("{ab}");
        PostEditor::new(&mut post)
            .run(|editor| {
                editor.toggle_markup(&range, "a", &[("href", "https://a.org")])
            })
            .unwrap();
        PostEditor::new(&mut post)
            .run(|editor| {
                editor.toggle_markup(&range, "a", &[("href", "https://b.org")])
            })
            .unwrap();
        assert_eq!(
            post.to_tree(),
            indoc! {r#"

                └>p
                  └>"ab"
            "#}
        );
    }

    #[test]
    fn toggling_on_a_caret_does_nothing() {
        let (mut post, range) = post_from("ab|c");
        let ((), completed) = PostEditor::new(&mut post)
            .run(|editor| editor.toggle_markup(&range, "em", &[]))
            .unwrap();
        assert!(!completed.did_update);
    }

    #[test]
    fn toggling_an_unknown_markup_fails() {
        let (mut post, range) = post_from("{ab}");
        let mut editor = PostEditor::new(&mut post);
        assert_eq!(
            editor.toggle_markup(&range, "blink", &[]),
            Err(ModelError::InvalidMarkupTag("blink".to_owned()))
        );
    }

    #[test]
    fn repeated_formatting_does_not_grow_the_post() {
        let (mut post, _) = post_from("0123456789|");
        let section = post.leaf_sections()[0];
        let range = Range::new(Position::new(section, 2), Position::new(section, 7));
        let bold = post.builder().create_markup("b", &[]).unwrap();
        let round_trip = |post: &mut Post| {
            PostEditor::new(post)
                .run(|editor| editor.add_markup_to_range(&range, bold))
                .unwrap();
            PostEditor::new(post)
                .run(|editor| editor.remove_markup_from_range(&range, bold))
                .unwrap();
        };

        round_trip(&mut post);
        let capacity = post.marker_arena.capacity();
        for _ in 0..1000 {
            round_trip(&mut post);
        }

        assert_eq!(post.markers_of(section).len(), 1);
        assert_eq!(post.marker_arena.len(), 1);
        assert_eq!(post.marker_arena.capacity(), capacity);
        assert!(capacity < 10);
    }
}
