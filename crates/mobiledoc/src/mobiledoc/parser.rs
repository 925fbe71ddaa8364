// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Rebuild a [`Post`] from a [`Mobiledoc`].

use log::trace;

use super::{
    AtomEntry, CardEntry, CardRef, MarkerValue, Mobiledoc, WireMarker,
    WireSection,
};
use crate::error::{ModelError, ParseError};
use crate::models::{
    MarkerId, MarkupId, Post, SectionId, SectionParent,
    VALID_SECTION_ATTRIBUTES,
};

pub(crate) fn parse(mobiledoc: &Mobiledoc) -> Result<Post, ParseError> {
    let mut parser = Parser {
        mobiledoc,
        post: Post::new(),
        markups: Vec::new(),
    };
    parser.parse_markups()?;
    for section in &mobiledoc.sections {
        let section = parser.parse_section(section)?;
        parser.post.append_section(SectionParent::Post, section);
    }
    parser.post.clear_render_flags();
    Ok(parser.post)
}

struct Parser<'a> {
    mobiledoc: &'a Mobiledoc,
    post: Post,
    /// The markups table, interned into `post`.
    markups: Vec<MarkupId>,
}

impl<'a> Parser<'a> {
    fn parse_markups(&mut self) -> Result<(), ParseError> {
        for entry in &self.mobiledoc.markups {
            if entry.attributes.len() % 2 != 0 {
                return Err(ParseError::Malformed(format!(
                    "odd attribute list for markup {}",
                    entry.tag
                )));
            }
            let attributes: Vec<(&str, &str)> = entry
                .attributes
                .chunks(2)
                .map(|kv| (kv[0].as_str(), kv[1].as_str()))
                .collect();
            let markup =
                self.post.builder().create_markup(&entry.tag, &attributes)?;
            self.markups.push(markup);
        }
        Ok(())
    }

    fn parse_section(
        &mut self,
        section: &'a WireSection,
    ) -> Result<SectionId, ParseError> {
        match section {
            WireSection::Markup {
                tag,
                markers,
                attributes,
            } => {
                let markers = self.parse_markers(markers)?;
                let section = self
                    .post
                    .builder()
                    .create_markup_section(tag, markers, false)?;
                self.set_attributes(section, attributes)?;
                Ok(section)
            }
            WireSection::Image { src } => {
                Ok(self.post.builder().create_image_section(src))
            }
            WireSection::List {
                tag,
                items,
                attributes,
            } => {
                let mut parsed = Vec::with_capacity(items.len());
                for markers in items {
                    let markers = self.parse_markers(markers)?;
                    parsed.push(self.post.builder().create_list_item(markers));
                }
                let list =
                    self.post.builder().create_list_section(tag, parsed)?;
                self.set_attributes(list, attributes)?;
                Ok(list)
            }
            WireSection::Card(card) => {
                let CardEntry { name, payload } = self.card(card)?;
                Ok(self
                    .post
                    .builder()
                    .create_card_section(name, payload.clone()))
            }
        }
    }

    /// Replay the markers of one section against a stack of active
    /// markups. Empty text markers are dropped.
    fn parse_markers(
        &mut self,
        markers: &[WireMarker],
    ) -> Result<Vec<MarkerId>, ParseError> {
        let mut stack: Vec<MarkupId> = Vec::new();
        let mut parsed = Vec::new();
        for marker in markers {
            for index in &marker.opened {
                let markup = self.markups.get(*index).ok_or(
                    ParseError::MissingTableEntry {
                        table: "markups",
                        index: *index,
                    },
                )?;
                stack.push(*markup);
            }

            match &marker.value {
                MarkerValue::Text(text) if text.is_empty() => {
                    trace!("Dropping blank marker");
                }
                MarkerValue::Text(text) => {
                    parsed.push(
                        self.post.builder().create_marker(text, stack.clone()),
                    );
                }
                MarkerValue::Atom(index) => {
                    let AtomEntry {
                        name,
                        value,
                        payload,
                    } = self.atom(*index)?;
                    parsed.push(self.post.builder().create_atom(
                        name,
                        value,
                        payload.clone(),
                        stack.clone(),
                    ));
                }
            }

            if marker.close_count > stack.len() {
                return Err(ParseError::Malformed(format!(
                    "marker closes {} markups but only {} are open",
                    marker.close_count,
                    stack.len()
                )));
            }
            stack.truncate(stack.len() - marker.close_count);
        }
        Ok(parsed)
    }

    fn atom(&self, index: usize) -> Result<&'a AtomEntry, ParseError> {
        self.mobiledoc
            .atoms
            .get(index)
            .ok_or(ParseError::MissingTableEntry {
                table: "atoms",
                index,
            })
    }

    fn card(&self, card: &'a CardRef) -> Result<&'a CardEntry, ParseError> {
        match card {
            CardRef::Inline(card) => Ok(card),
            CardRef::Index(index) => self.mobiledoc.cards.get(*index).ok_or(
                ParseError::MissingTableEntry {
                    table: "cards",
                    index: *index,
                },
            ),
        }
    }

    fn set_attributes(
        &mut self,
        section: SectionId,
        attributes: &[String],
    ) -> Result<(), ParseError> {
        for kv in attributes.chunks(2) {
            let [key, value] = kv else {
                return Err(ParseError::Malformed(
                    "odd section attribute list".to_owned(),
                ));
            };
            if !VALID_SECTION_ATTRIBUTES.contains(key.as_str()) {
                return Err(ModelError::InvalidAttribute(key.clone()).into());
            }
            if let Some(map) = self.post.section_arena[section].attributes_mut()
            {
                map.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }
}
