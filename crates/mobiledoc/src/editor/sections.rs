// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Section-level edits: inserting, removing, replacing and moving
//! sections, changing their tags and attributes.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use super::PostEditor;
use crate::cursor::{Position, Range};
use crate::error::ModelError;
use crate::models::{
    ListTag, MarkupSectionTag, SectionId, SectionKind, SectionParent,
    SectionTag, VALID_SECTION_ATTRIBUTES,
};

impl PostEditor<'_> {
    /// Insert a detached `section` into `parent` before `before`, or at the
    /// end of `parent` when `before` is `None`.
    pub fn insert_section_before(
        &mut self,
        parent: SectionParent,
        section: SectionId,
        before: Option<SectionId>,
    ) -> Result<(), ModelError> {
        if let Some(before) = before {
            if self.post.section(before).parent() != Some(parent) {
                return Err(ModelError::Detached(before));
            }
        }
        self.post.insert_section(parent, section, before)?;
        self.changed();
        Ok(())
    }

    pub fn insert_section_at_end(
        &mut self,
        section: SectionId,
    ) -> Result<(), ModelError> {
        self.insert_section_before(SectionParent::Post, section, None)
    }

    /// Remove `section` from the post. Removing a section that is already
    /// gone does nothing; removing the last item of a list removes the
    /// list too.
    pub fn remove_section(&mut self, section: SectionId) {
        if self.post.is_attached(section) {
            self.post.remove_section(section);
            self.changed();
        }
    }

    /// Put `new_section` where `section` is.
    ///
    /// A list item replaced by anything other than a list item splits its
    /// list around the replacement.
    pub fn replace_section(
        &mut self,
        section: SectionId,
        new_section: SectionId,
    ) -> Result<(), ModelError> {
        self.replace_section_with(section, &[new_section])
    }

    pub(crate) fn replace_section_with(
        &mut self,
        section: SectionId,
        replacements: &[SectionId],
    ) -> Result<(), ModelError> {
        let parent = self
            .post
            .section(section)
            .parent()
            .ok_or(ModelError::Detached(section))?;
        let leaves_list = replacements
            .iter()
            .any(|r| !self.post.section(*r).is_list_item());
        match parent {
            SectionParent::List(list) if leaves_list => {
                self.split_list_at_item(list, section, replacements)?
            }
            _ => {
                for replacement in replacements {
                    self.post
                        .insert_section(parent, *replacement, Some(section))?;
                }
                self.post.remove_section(section);
            }
        }
        self.changed();
        Ok(())
    }

    /// Replace `item` of `list` with top-level `replacements`: items before
    /// it stay in `list`, items after it move to a new list of the same
    /// kind following the replacements.
    fn split_list_at_item(
        &mut self,
        list: SectionId,
        item: SectionId,
        replacements: &[SectionId],
    ) -> Result<(), ModelError> {
        let parent = self
            .post
            .section(list)
            .parent()
            .ok_or(ModelError::Detached(list))?;
        let trailing: Vec<SectionId> = self
            .post
            .items_of(list)
            .into_iter()
            .skip_while(|i| *i != item)
            .skip(1)
            .collect();

        let mut before = self.post.section(list).next();
        if !trailing.is_empty() {
            let tail_list = self.post.copy_shell(list);
            for trailing_item in trailing {
                self.post.detach_section(trailing_item);
                self.post
                    .append_section(SectionParent::List(tail_list), trailing_item);
            }
            self.post.insert_section(parent, tail_list, before)?;
            before = Some(tail_list);
        }
        for replacement in replacements {
            self.post.insert_section(parent, *replacement, before)?;
        }
        debug!("Split list {list:?} at item {item:?}");
        self.post.remove_section(item);
        Ok(())
    }

    /// Move an attached section so it comes before `before` in `parent`.
    pub fn move_section_before(
        &mut self,
        parent: SectionParent,
        section: SectionId,
        before: Option<SectionId>,
    ) -> Result<(), ModelError> {
        if before == Some(section) {
            return Ok(());
        }
        if !self.post.is_attached(section) {
            return Err(ModelError::Detached(section));
        }
        self.post.check_parent(parent, section)?;
        self.post.remove_section(section);
        self.insert_section_before(parent, section, before)
    }

    /// Swap a section with its previous sibling. Does nothing for the first
    /// section of its parent.
    pub fn move_section_up(&mut self, section: SectionId) -> Result<(), ModelError> {
        let s = self.post.section(section);
        match (s.parent(), s.prev()) {
            (Some(parent), Some(prev)) => {
                self.move_section_before(parent, section, Some(prev))
            }
            _ => Ok(()),
        }
    }

    /// Swap a section with its next sibling. Does nothing for the last
    /// section of its parent.
    pub fn move_section_down(
        &mut self,
        section: SectionId,
    ) -> Result<(), ModelError> {
        let s = self.post.section(section);
        match (s.parent(), s.next()) {
            (Some(parent), Some(next)) => {
                let after_next = self.post.section(next).next();
                self.move_section_before(parent, section, after_next)
            }
            _ => Ok(()),
        }
    }

    /// Change the sections touched by `range` to `tag`, or back to `p` when
    /// they all have it already.
    ///
    /// `tag` is a markup section tag (`"h2"`, `"blockquote"`, ...) or a list
    /// tag (`"ul"`, `"ol"`). Sections turned into list items join an
    /// adjacent list of the same kind. Returns `range` moved onto the
    /// sections that replaced the originals.
    pub fn toggle_section(
        &mut self,
        range: &Range,
        tag: &str,
    ) -> Result<Range, ModelError> {
        let tag = tag
            .parse::<SectionTag>()
            .map_err(|_| ModelError::InvalidSectionTag(tag.to_owned()))?;
        let range = range.validated(self.post)?;
        let sections = self.post.markerable_sections_in_range(&range);
        let mut replaced = HashMap::new();

        match tag {
            SectionTag::Markup(tag) => {
                let all_have = sections
                    .iter()
                    .all(|s| self.post.section(*s).markup_tag() == Some(tag));
                let target = if all_have { MarkupSectionTag::P } else { tag };
                for section in sections {
                    if self.post.section(section).is_list_item() {
                        let new_section = self.unlist_item(section, target)?;
                        replaced.insert(section, new_section);
                    } else {
                        self.set_markup_tag(section, target);
                    }
                }
            }
            SectionTag::List(tag) => {
                let all_in = sections
                    .iter()
                    .all(|s| self.list_tag_of(*s) == Some(tag));
                let mut created = Vec::new();
                for section in sections {
                    if all_in {
                        let new_section =
                            self.unlist_item(section, MarkupSectionTag::P)?;
                        replaced.insert(section, new_section);
                    } else if let Some(SectionParent::List(list)) =
                        self.post.section(section).parent()
                    {
                        self.set_list_tag(list, tag);
                        created.push(list);
                    } else {
                        let (list, item) = self.list_from_section(section, tag)?;
                        replaced.insert(section, item);
                        created.push(list);
                    }
                }
                for list in created {
                    self.join_adjacent_lists(list);
                }
            }
        }

        self.changed();
        let map = |p: Position| {
            Position::new(*replaced.get(&p.section).unwrap_or(&p.section), p.offset)
        };
        Ok(Range {
            head: map(range.head),
            tail: map(range.tail),
            direction: range.direction,
        })
    }

    /// Replace a list item with a markup section holding its markers.
    fn unlist_item(
        &mut self,
        item: SectionId,
        tag: MarkupSectionTag,
    ) -> Result<SectionId, ModelError> {
        let section = self
            .post
            .builder()
            .create_markup_section_with_tag(tag, vec![], false);
        self.post.move_markers(item, section);
        self.replace_section(item, section)?;
        Ok(section)
    }

    /// Replace a markup section with a new one-item list.
    fn list_from_section(
        &mut self,
        section: SectionId,
        tag: ListTag,
    ) -> Result<(SectionId, SectionId), ModelError> {
        let mut builder = self.post.builder();
        let item = builder.create_list_item(vec![]);
        let list = builder.create_list_section_with_tag(tag, vec![item])?;
        self.post.move_markers(section, item);
        self.replace_section(section, list)?;
        Ok((list, item))
    }

    /// Merge `list` with its neighbours when they are lists of the same
    /// kind.
    fn join_adjacent_lists(&mut self, list: SectionId) {
        if !self.post.is_attached(list) {
            return;
        }
        let mut list = list;
        let tag = self.post.section(list).list_tag();
        if let Some(prev) = self.post.section(list).prev() {
            if self.post.section(prev).list_tag() == tag {
                self.join_lists(prev, list);
                list = prev;
            }
        }
        if let Some(next) = self.post.section(list).next() {
            if self.post.section(next).list_tag() == tag {
                self.join_lists(list, next);
            }
        }
    }

    /// Move the items of `from` to the end of `to` and remove `from`.
    fn join_lists(&mut self, to: SectionId, from: SectionId) {
        for item in self.post.items_of(from) {
            self.post.detach_section(item);
            self.post.append_section(SectionParent::List(to), item);
        }
        self.post.remove_section(from);
    }

    fn list_tag_of(&self, section: SectionId) -> Option<ListTag> {
        match self.post.section(section).parent() {
            Some(SectionParent::List(list)) => self.post.section(list).list_tag(),
            _ => None,
        }
    }

    fn set_markup_tag(&mut self, section: SectionId, new_tag: MarkupSectionTag) {
        if let SectionKind::Markup { tag, .. } =
            &mut self.post.section_arena[section].kind
        {
            *tag = new_tag;
        }
        self.post.mark_section_dirty(section);
    }

    fn set_list_tag(&mut self, list: SectionId, new_tag: ListTag) {
        if let SectionKind::List { tag, .. } =
            &mut self.post.section_arena[list].kind
        {
            *tag = new_tag;
        }
        self.post.mark_section_dirty(list);
    }

    /// Set an attribute on every section touched by `range`. List items
    /// carry no attributes, so their list gets it instead.
    pub fn set_attribute(
        &mut self,
        range: &Range,
        key: &str,
        value: &str,
    ) -> Result<(), ModelError> {
        self.update_attributes(range, key, |attributes| {
            attributes.insert(key.to_owned(), value.to_owned());
        })
    }

    pub fn remove_attribute(
        &mut self,
        range: &Range,
        key: &str,
    ) -> Result<(), ModelError> {
        self.update_attributes(range, key, |attributes| {
            attributes.remove(key);
        })
    }

    fn update_attributes(
        &mut self,
        range: &Range,
        key: &str,
        mut update: impl FnMut(&mut BTreeMap<String, String>),
    ) -> Result<(), ModelError> {
        if !VALID_SECTION_ATTRIBUTES.contains(key) {
            return Err(ModelError::InvalidAttribute(key.to_owned()));
        }
        let range = range.validated(self.post)?;
        let mut targets: Vec<SectionId> = Vec::new();
        for section in self.post.markerable_sections_in_range(&range) {
            let target = match self.post.section(section).parent() {
                Some(SectionParent::List(list)) => list,
                _ => section,
            };
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        for target in targets {
            if let Some(attributes) =
                self.post.section_arena[target].attributes_mut()
            {
                update(attributes);
            }
            self.post.mark_section_dirty(target);
        }
        self.changed();
        Ok(())
    }
}
