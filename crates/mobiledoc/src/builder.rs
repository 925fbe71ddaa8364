// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Factory for the nodes of one post.
//!
//! Every node is created detached and lives in the post's arenas; it only
//! becomes part of the document once inserted into a list. Markups are
//! interned: asking twice for the same tag and attributes returns the same
//! [`MarkupId`].

use std::collections::BTreeMap;

use serde_json::Value;
use widestring::Utf16String;

use crate::error::ModelError;
use crate::models::{
    Atom, ListTag, Marker, MarkerContent, MarkerId, MarkerList, Markup,
    MarkupId, MarkupSectionTag, MarkupTag, Post, SectionId, SectionKind,
    SectionList, SectionParent,
};

pub struct PostNodeBuilder<'a> {
    post: &'a mut Post,
}

impl<'a> PostNodeBuilder<'a> {
    pub(crate) fn new(post: &'a mut Post) -> Self {
        Self { post }
    }

    /// A markup section such as `p` or `h2`, holding `markers`.
    pub fn create_markup_section(
        &mut self,
        tag: &str,
        markers: Vec<MarkerId>,
        is_generated: bool,
    ) -> Result<SectionId, ModelError> {
        let tag = tag
            .parse::<MarkupSectionTag>()
            .map_err(|_| ModelError::InvalidSectionTag(tag.to_owned()))?;
        Ok(self.create_markup_section_with_tag(tag, markers, is_generated))
    }

    pub fn create_markup_section_with_tag(
        &mut self,
        tag: MarkupSectionTag,
        markers: Vec<MarkerId>,
        is_generated: bool,
    ) -> SectionId {
        let section = self.post.alloc_section(|id| SectionKind::Markup {
            tag,
            attributes: BTreeMap::new(),
            markers: MarkerList::new(id),
            is_generated,
        });
        for marker in markers {
            self.post.append_marker(section, marker);
        }
        section
    }

    /// An empty `p`, as supplied by the editor when content is needed
    /// where a card or list used to be.
    pub fn create_blank_markup_section(&mut self) -> SectionId {
        self.create_markup_section_with_tag(
            MarkupSectionTag::P,
            Vec::new(),
            true,
        )
    }

    pub fn create_list_section(
        &mut self,
        tag: &str,
        items: Vec<SectionId>,
    ) -> Result<SectionId, ModelError> {
        let tag = tag
            .parse::<ListTag>()
            .map_err(|_| ModelError::InvalidListTag(tag.to_owned()))?;
        self.create_list_section_with_tag(tag, items)
    }

    pub fn create_list_section_with_tag(
        &mut self,
        tag: ListTag,
        items: Vec<SectionId>,
    ) -> Result<SectionId, ModelError> {
        let list = self.post.alloc_section(|id| SectionKind::List {
            tag,
            attributes: BTreeMap::new(),
            items: SectionList::new(SectionParent::List(id)),
        });
        for item in items {
            self.post
                .insert_section(SectionParent::List(list), item, None)?;
        }
        Ok(list)
    }

    pub fn create_list_item(&mut self, markers: Vec<MarkerId>) -> SectionId {
        let item = self.post.alloc_section(|id| SectionKind::ListItem {
            markers: MarkerList::new(id),
        });
        for marker in markers {
            self.post.append_marker(item, marker);
        }
        item
    }

    pub fn create_image_section(&mut self, src: &str) -> SectionId {
        self.post.alloc_section(|_| SectionKind::Image {
            src: src.to_owned(),
        })
    }

    pub fn create_card_section(
        &mut self,
        name: &str,
        payload: Value,
    ) -> SectionId {
        self.post.alloc_section(|_| SectionKind::Card {
            name: name.to_owned(),
            payload,
        })
    }

    pub fn create_marker(
        &mut self,
        value: &str,
        markups: Vec<MarkupId>,
    ) -> MarkerId {
        self.post
            .alloc_marker(Marker::text(Utf16String::from_str(value), markups))
    }

    pub fn create_atom(
        &mut self,
        name: &str,
        value: &str,
        payload: Value,
        markups: Vec<MarkupId>,
    ) -> MarkerId {
        let atom = Atom {
            name: name.to_owned(),
            value: value.to_owned(),
            payload,
        };
        self.post
            .alloc_marker(Marker::new(MarkerContent::Atom(atom), markups))
    }

    /// The markup with this tag and attributes, created on first use.
    pub fn create_markup(
        &mut self,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<MarkupId, ModelError> {
        let tag = tag
            .parse::<MarkupTag>()
            .map_err(|_| ModelError::InvalidMarkupTag(tag.to_owned()))?;
        let attributes = attributes
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Ok(self.intern_markup(tag, attributes))
    }

    pub(crate) fn intern_markup(
        &mut self,
        tag: MarkupTag,
        attributes: BTreeMap<String, String>,
    ) -> MarkupId {
        let markup = Markup::new(tag, attributes);
        let key = markup.cache_key();
        if let Some(id) = self.post.markup_cache.get(&key) {
            return *id;
        }
        let id = self.post.markups.alloc(markup);
        self.post.markup_cache.insert(key, id);
        id
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::error::ModelError;
    use crate::models::{MarkupSectionTag, Post, SectionType};

    #[test]
    fn markups_are_interned() {
        let mut post = Post::new();
        let mut builder = post.builder();
        let b1 = builder.create_markup("b", &[]).unwrap();
        let b2 = builder.create_markup("B", &[]).unwrap();
        let a1 = builder
            .create_markup("a", &[("href", "x"), ("rel", "y")])
            .unwrap();
        let a2 = builder
            .create_markup("a", &[("rel", "y"), ("href", "x")])
            .unwrap();
        let a3 = builder.create_markup("a", &[("href", "z")]).unwrap();
        assert_eq!(b1, b2);
        assert_eq!(a1, a2);
        assert_ne!(a1, a3);
        assert_eq!(post.all_markups().count(), 3);
    }

    #[test]
    fn invalid_tags_are_rejected() {
        let mut post = Post::new();
        let mut builder = post.builder();
        assert_eq!(
            builder.create_markup("blink", &[]),
            Err(ModelError::InvalidMarkupTag("blink".to_owned()))
        );
        assert_eq!(
            builder.create_markup_section("div", vec![], false),
            Err(ModelError::InvalidSectionTag("div".to_owned()))
        );
        assert_eq!(
            builder.create_list_section("dl", vec![]),
            Err(ModelError::InvalidListTag("dl".to_owned()))
        );
    }

    #[test]
    fn sections_adopt_their_children() {
        let mut post = Post::new();
        let mut builder = post.builder();
        let marker = builder.create_marker("abc", vec![]);
        let item = builder.create_list_item(vec![marker]);
        let list = builder.create_list_section("ul", vec![item]).unwrap();
        assert_eq!(post.marker(marker).section(), Some(item));
        assert_eq!(post.items_of(list), vec![item]);
        assert_eq!(post.section_length(item), 3);
        assert_eq!(post.section(list).section_type(), SectionType::ListSection);
    }

    #[test]
    fn pull_quote_creates_an_aside() {
        let mut post = Post::new();
        let section = post
            .builder()
            .create_markup_section("pull-quote", vec![], false)
            .unwrap();
        assert_eq!(
            post.section(section).markup_tag(),
            Some(MarkupSectionTag::Aside)
        );
    }

    #[test]
    fn cards_and_atoms_keep_their_payloads() {
        let mut post = Post::new();
        let mut builder = post.builder();
        let card = builder.create_card_section("gallery", json!({"n": 3}));
        let atom = builder.create_atom("mention", "@x", json!([1]), vec![]);
        assert!(post.section(card).is_card());
        let atom = post.marker(atom).atom().unwrap();
        assert_eq!(atom.payload, json!([1]));
    }
}
