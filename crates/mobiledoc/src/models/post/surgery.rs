// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! List-level mutations of a post.
//!
//! These keep the containment lists and back-references consistent and
//! set render flags, but know nothing about transactions or coalescing.
//! Edits go through [`crate::PostEditor`], which is built on top of them.

use log::{debug, trace};

use super::Post;
use crate::cursor::Range;
use crate::error::ModelError;
use crate::linked_list::Arena;
use crate::models::{
    Marker, MarkerId, MarkerList, MarkupId, RenderFlags, Section, SectionId,
    SectionKind, SectionList, SectionParent, SectionType,
};

impl Post {
    // ─── Section lists ──────────────────────────────────────────────────

    /// Run `f` against the list of sections owned by `parent`.
    ///
    /// List headers are plain values, so the list is copied out of its
    /// owner, mutated together with the arena, and written back.
    pub(crate) fn with_section_list<R>(
        &mut self,
        parent: SectionParent,
        f: impl FnOnce(&mut SectionList, &mut Arena<SectionId, Section>) -> R,
    ) -> R {
        match parent {
            SectionParent::Post => f(&mut self.sections, &mut self.section_arena),
            SectionParent::List(list) => {
                let mut items = match self.section_arena[list].items() {
                    Some(items) => *items,
                    None => panic!("{list:?} is not a list section"),
                };
                let result = f(&mut items, &mut self.section_arena);
                if let Some(slot) = self.section_arena[list].items_mut() {
                    *slot = items;
                }
                result
            }
        }
    }

    /// Whether `section` may be a child of `parent`.
    pub(crate) fn check_parent(
        &self,
        parent: SectionParent,
        section: SectionId,
    ) -> Result<(), ModelError> {
        let child = self.section_arena[section].section_type();
        let allowed = match parent {
            SectionParent::Post => child != SectionType::ListItem,
            SectionParent::List(list) => {
                self.section_arena[list].is_list_section()
                    && child == SectionType::ListItem
            }
        };
        if allowed {
            Ok(())
        } else {
            Err(ModelError::InvalidParent {
                child,
                parent: match parent {
                    SectionParent::Post => "post".to_owned(),
                    SectionParent::List(list) => {
                        self.section_arena[list].section_type().to_string()
                    }
                },
            })
        }
    }

    /// Insert a detached section into `parent` before `before` (or at the
    /// end when `before` is `None`).
    pub(crate) fn insert_section(
        &mut self,
        parent: SectionParent,
        section: SectionId,
        before: Option<SectionId>,
    ) -> Result<(), ModelError> {
        self.check_parent(parent, section)?;
        self.with_section_list(parent, |list, arena| {
            list.insert_before(arena, section, before)
        });
        self.section_arena[section].render.is_removed = false;
        self.mark_section_dirty(section);
        Ok(())
    }

    /// Append without checking the parent. Used by the builder and the
    /// parser, which only produce well-formed trees.
    pub(crate) fn append_section(
        &mut self,
        parent: SectionParent,
        section: SectionId,
    ) {
        self.with_section_list(parent, |list, arena| {
            list.append(arena, section)
        });
        self.mark_section_dirty(section);
    }

    /// Take a section out of its parent list without cascading.
    pub(crate) fn detach_section(&mut self, section: SectionId) {
        if let Some(parent) = self.section_arena[section].parent() {
            self.with_section_list(parent, |list, arena| {
                list.remove(arena, section)
            });
            if let SectionParent::List(list) = parent {
                self.mark_section_dirty(list);
            }
        }
    }

    /// Remove a section. Removing a detached section is a no-op, and a
    /// list section left without items is removed as well.
    pub(crate) fn remove_section(&mut self, section: SectionId) {
        let Some(parent) = self.section_arena[section].parent() else {
            return;
        };
        if let SectionParent::List(list) = parent {
            if !self.is_attached(list) {
                return;
            }
        }
        self.with_section_list(parent, |list, arena| {
            list.remove(arena, section)
        });
        self.mark_section_removed(section);

        if let SectionParent::List(list) = parent {
            if self.is_blank(list) {
                debug!("Removing emptied list section {list:?}");
                self.remove_section(list);
            } else {
                self.mark_section_dirty(list);
            }
        }
    }

    // ─── Marker lists ───────────────────────────────────────────────────

    /// The marker list of a markerable section together with the marker
    /// arena.
    pub(crate) fn marker_list_mut(
        &mut self,
        section: SectionId,
        operation: &'static str,
    ) -> Result<(&mut MarkerList, &mut Arena<MarkerId, Marker>), ModelError> {
        let s = &mut self.section_arena[section];
        let section_type = s.section_type();
        match s.markers_mut() {
            Some(markers) => Ok((markers, &mut self.marker_arena)),
            None => Err(ModelError::NotMarkerable {
                operation,
                section_type,
            }),
        }
    }

    pub(crate) fn append_marker(&mut self, section: SectionId, marker: MarkerId) {
        self.insert_marker(section, marker, None);
    }

    /// Insert a detached marker before `before` (or at the end). Does
    /// nothing for sections that hold no markers.
    pub(crate) fn insert_marker(
        &mut self,
        section: SectionId,
        marker: MarkerId,
        before: Option<MarkerId>,
    ) {
        if let Ok((markers, arena)) = self.marker_list_mut(section, "insert into")
        {
            markers.insert_before(arena, marker, before);
            self.marker_arena[marker].render = RenderFlags {
                is_dirty: true,
                is_removed: false,
            };
            self.mark_section_dirty(section);
        }
    }

    /// Move every marker of `from` to the end of `to`.
    pub(crate) fn move_markers(&mut self, from: SectionId, to: SectionId) {
        for marker in self.markers_of(from) {
            self.remove_marker(marker);
            self.append_marker(to, marker);
        }
    }

    pub(crate) fn remove_marker(&mut self, marker: MarkerId) {
        let Some(section) = self.marker_arena[marker].section() else {
            return;
        };
        if let Ok((markers, arena)) = self.marker_list_mut(section, "remove from")
        {
            markers.remove(arena, marker);
            self.marker_arena[marker].render.is_removed = true;
            self.mark_section_dirty(section);
        }
    }

    /// Replace `marker` with `replacements`, in place.
    pub(crate) fn replace_marker(
        &mut self,
        marker: MarkerId,
        replacements: &[MarkerId],
    ) {
        let Some(section) = self.marker_arena[marker].section() else {
            return;
        };
        if let Ok((markers, arena)) = self.marker_list_mut(section, "splice") {
            markers.splice(arena, Some(marker), 1, replacements);
            self.marker_arena[marker].render.is_removed = true;
            for id in replacements {
                self.marker_arena[*id].render.is_dirty = true;
            }
            self.mark_section_dirty(section);
        }
    }

    // ─── Allocation and copying ─────────────────────────────────────────

    pub(crate) fn alloc_marker(&mut self, marker: Marker) -> MarkerId {
        self.marker_arena.alloc(marker)
    }

    /// Allocate a detached section. `make` gets the new id so lists can be
    /// owned by it.
    pub(crate) fn alloc_section(
        &mut self,
        make: impl FnOnce(SectionId) -> SectionKind,
    ) -> SectionId {
        self.section_arena.alloc_with(|id| Section::new(make(id)))
    }

    /// A detached copy of a section of `source` without markers or items.
    pub(crate) fn copy_section_shell(
        &mut self,
        source: &Post,
        section: SectionId,
    ) -> SectionId {
        self.alloc_shell(source.section_arena[section].kind.clone())
    }

    /// A detached copy of `section` without markers or items.
    pub(crate) fn copy_shell(&mut self, section: SectionId) -> SectionId {
        let kind = self.section_arena[section].kind.clone();
        self.alloc_shell(kind)
    }

    fn alloc_shell(&mut self, kind: SectionKind) -> SectionId {
        self.alloc_section(|id| match kind {
            SectionKind::Markup {
                tag,
                attributes,
                is_generated,
                ..
            } => SectionKind::Markup {
                tag,
                attributes,
                markers: MarkerList::new(id),
                is_generated,
            },
            SectionKind::List {
                tag, attributes, ..
            } => SectionKind::List {
                tag,
                attributes,
                items: SectionList::new(SectionParent::List(id)),
            },
            SectionKind::ListItem { .. } => SectionKind::ListItem {
                markers: MarkerList::new(id),
            },
            other => other,
        })
    }

    /// Detached slices of the markers of `section` covered by `range`.
    fn marker_pieces(&self, section: SectionId, range: &Range) -> Vec<Marker> {
        let mut pieces = Vec::new();
        let mut start = 0;
        for marker in self.markers_of(section) {
            let source = &self.marker_arena[marker];
            let end = start + source.length();
            let from = range.head.offset.max(start);
            let to = range.tail.offset.min(end);
            if from < to {
                pieces.push(source.slice(from - start, to - start));
            }
            start = end;
        }
        pieces
    }

    /// A detached copy of the part of a leaf section covered by `range`.
    pub(crate) fn copy_leaf(
        &mut self,
        section: SectionId,
        range: &Range,
    ) -> SectionId {
        let copy = self.copy_shell(section);
        for piece in self.marker_pieces(section, range) {
            let id = self.alloc_marker(piece);
            self.append_marker(copy, id);
        }
        copy
    }

    /// Like [`Post::copy_leaf`], but the copy is made in `target`.
    pub(crate) fn copy_leaf_into(
        &self,
        target: &mut Post,
        section: SectionId,
        range: &Range,
    ) -> SectionId {
        let copy = target.copy_section_shell(self, section);
        for mut piece in self.marker_pieces(section, range) {
            piece.markups = target.import_markups(self, &piece.markups);
            let id = target.alloc_marker(piece);
            target.append_marker(copy, id);
        }
        copy
    }

    /// Intern the markups of another post into this one.
    pub(crate) fn import_markups(
        &mut self,
        source: &Post,
        markups: &[MarkupId],
    ) -> Vec<MarkupId> {
        markups
            .iter()
            .map(|id| {
                let markup = &source.markups[*id];
                self.builder()
                    .intern_markup(markup.tag, markup.attributes.clone())
            })
            .collect()
    }

    // ─── Render flags ───────────────────────────────────────────────────

    pub(crate) fn mark_section_dirty(&mut self, section: SectionId) {
        self.section_arena[section].render.is_dirty = true;
        if let Some(SectionParent::List(list)) =
            self.section_arena[section].parent()
        {
            self.section_arena[list].render.is_dirty = true;
        }
    }

    fn mark_section_removed(&mut self, section: SectionId) {
        self.section_arena[section].render.is_removed = true;
    }

    /// Attached sections changed since the last
    /// [`Post::clear_render_flags`], in arena order.
    pub fn dirty_sections(&self) -> Vec<SectionId> {
        self.section_arena
            .ids()
            .filter(|id| {
                self.section_arena[*id].render.is_dirty && self.is_attached(*id)
            })
            .collect()
    }

    /// Sections removed since the last [`Post::clear_render_flags`].
    pub fn removed_sections(&self) -> Vec<SectionId> {
        self.section_arena
            .ids()
            .filter(|id| {
                self.section_arena[*id].render.is_removed
                    && !self.is_attached(*id)
            })
            .collect()
    }

    /// Forget what changed. Removed sections, with everything they hold,
    /// are released: their ids must not be used afterwards.
    pub fn clear_render_flags(&mut self) {
        for section in self.removed_sections() {
            self.release_section(section);
        }
        self.release_removed_markers();
        for id in self.section_arena.ids().collect::<Vec<_>>() {
            self.section_arena[id].render = Default::default();
        }
        for id in self.marker_arena.ids().collect::<Vec<_>>() {
            self.marker_arena[id].render = Default::default();
        }
    }

    // ─── Releasing ──────────────────────────────────────────────────────

    /// Release markers that were removed from their section and not put
    /// back anywhere. Nothing reports removed markers, so this runs at the
    /// end of every edit.
    pub(crate) fn release_removed_markers(&mut self) {
        let removed: Vec<MarkerId> = self
            .marker_arena
            .ids()
            .filter(|id| {
                let marker = &self.marker_arena[*id];
                marker.render.is_removed && marker.section().is_none()
            })
            .collect();
        if !removed.is_empty() {
            trace!("Releasing {} removed markers", removed.len());
        }
        for marker in removed {
            self.marker_arena.release(marker);
        }
    }

    /// Release a detached section together with its markers or items.
    fn release_section(&mut self, section: SectionId) {
        let Some(released) = self.section_arena.release(section) else {
            return;
        };
        if let Some(markers) = released.markers() {
            for marker in markers.to_vec(&self.marker_arena) {
                self.marker_arena.release(marker);
            }
        }
        if let Some(items) = released.items() {
            for item in items.to_vec(&self.section_arena) {
                self.release_section(item);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::error::ModelError;
    use crate::models::{SectionParent, SectionType};
    use crate::Post;

    #[test]
    fn removing_the_last_item_removes_the_list() {
        let mut post = Post::new();
        let mut builder = post.builder();
        let item = builder.create_list_item(vec![]);
        let list = builder.create_list_section("ul", vec![item]).unwrap();
        post.append_section(SectionParent::Post, list);

        post.remove_section(item);

        assert!(post.is_empty());
        assert!(!post.is_attached(list));
        assert_eq!(post.removed_sections(), vec![item, list]);
    }

    #[test]
    fn removing_a_detached_section_is_a_no_op() {
        let mut post = Post::new();
        let section = post
            .builder()
            .create_markup_section("p", vec![], false)
            .unwrap();
        post.remove_section(section);
        post.append_section(SectionParent::Post, section);
        post.remove_section(section);
        post.remove_section(section);
        assert!(post.is_empty());
    }

    #[test]
    fn list_items_only_go_into_lists() {
        let mut post = Post::new();
        let item = post.builder().create_list_item(vec![]);
        assert_eq!(
            post.insert_section(SectionParent::Post, item, None),
            Err(ModelError::InvalidParent {
                child: SectionType::ListItem,
                parent: "post".to_owned(),
            })
        );

        let card = post.builder().create_card_section("c", json!({}));
        let list = post.builder().create_list_section("ol", vec![]).unwrap();
        post.append_section(SectionParent::Post, list);
        assert!(post
            .insert_section(SectionParent::List(list), card, None)
            .is_err());
        assert!(post
            .insert_section(SectionParent::List(list), item, None)
            .is_ok());
    }

    #[test]
    fn render_flags_track_changes_until_cleared() {
        let mut post = Post::new();
        let section = post
            .builder()
            .create_markup_section("p", vec![], false)
            .unwrap();
        post.append_section(SectionParent::Post, section);
        assert_eq!(post.dirty_sections(), vec![section]);

        post.clear_render_flags();
        assert!(post.dirty_sections().is_empty());

        let marker = post.builder().create_marker("x", vec![]);
        post.append_marker(section, marker);
        assert_eq!(post.dirty_sections(), vec![section]);
        assert!(post.marker(marker).render_flags().is_dirty);
    }

    #[test]
    fn clearing_render_flags_releases_removed_sections() {
        let mut post = Post::new();
        let mut builder = post.builder();
        let marker = builder.create_marker("x", vec![]);
        let item = builder.create_list_item(vec![marker]);
        let list = builder.create_list_section("ul", vec![item]).unwrap();
        let kept = builder.create_markup_section("p", vec![], false).unwrap();
        post.append_section(SectionParent::Post, list);
        post.append_section(SectionParent::Post, kept);
        post.clear_render_flags();

        post.remove_section(list);
        assert_eq!(post.removed_sections(), vec![list]);
        post.clear_render_flags();

        assert!(post.removed_sections().is_empty());
        assert!(!post.is_attached(list));
        assert!(!post.is_attached(item));
        assert!(post.marker_arena.get(marker).is_none());
        assert_eq!(post.section_arena.len(), 1);

        let reused = post
            .builder()
            .create_markup_section("h1", vec![], false)
            .unwrap();
        assert_ne!(reused, list);
        assert_eq!(post.section_arena.capacity(), 3);
    }
}
