// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Run visitor opcodes to build a [`Mobiledoc`].

use std::collections::{BTreeMap, HashMap};

use super::visitor::Opcode;
use super::{
    AtomEntry, CardEntry, CardRef, MarkerValue, MarkupEntry, Mobiledoc,
    MobiledocVersion, WireMarker, WireSection,
};
use crate::error::SerializeError;
use crate::models::Markup;

pub(crate) fn compile(
    opcodes: &[Opcode],
    version: MobiledocVersion,
) -> Result<Mobiledoc, SerializeError> {
    let mut compiler = Compiler::new(version);
    for opcode in opcodes {
        compiler.run(opcode)?;
    }
    Ok(compiler.finish())
}

struct Compiler {
    version: MobiledocVersion,
    atoms: Vec<AtomEntry>,
    cards: Vec<CardEntry>,
    markups: Vec<MarkupEntry>,
    markup_indexes: HashMap<String, usize>,
    sections: Vec<WireSection>,
}

impl Compiler {
    fn new(version: MobiledocVersion) -> Self {
        Self {
            version,
            atoms: Vec::new(),
            cards: Vec::new(),
            markups: Vec::new(),
            markup_indexes: HashMap::new(),
            sections: Vec::new(),
        }
    }

    fn run(&mut self, opcode: &Opcode) -> Result<(), SerializeError> {
        match opcode {
            Opcode::OpenPost => {
                self.sections.clear();
            }
            Opcode::OpenMarkupSection { tag, attributes } => {
                self.sections.push(WireSection::Markup {
                    tag: tag.to_string(),
                    markers: Vec::new(),
                    attributes: self.section_attributes(attributes),
                });
            }
            Opcode::OpenListSection { tag, attributes } => {
                self.sections.push(WireSection::List {
                    tag: tag.to_string(),
                    items: Vec::new(),
                    attributes: self.section_attributes(attributes),
                });
            }
            Opcode::OpenListItem => {
                if let Some(WireSection::List { items, .. }) =
                    self.sections.last_mut()
                {
                    items.push(Vec::new());
                }
            }
            Opcode::OpenImageSection { src } => {
                self.sections.push(WireSection::Image {
                    src: (*src).to_owned(),
                });
            }
            Opcode::OpenCardSection { name, payload } => {
                let card = CardEntry {
                    name: (*name).to_owned(),
                    payload: (*payload).clone(),
                };
                let card = if self.version.has_tables() {
                    self.cards.push(card);
                    CardRef::Index(self.cards.len() - 1)
                } else {
                    CardRef::Inline(card)
                };
                self.sections.push(WireSection::Card(card));
            }
            Opcode::OpenMarker { close_count, value } => {
                self.push_marker(*close_count, MarkerValue::Text(value.clone()));
            }
            Opcode::OpenAtom { close_count, atom } => {
                if !self.version.has_tables() {
                    return Err(SerializeError::AtomsNotSupported {
                        version: self.version,
                    });
                }
                self.atoms.push(AtomEntry {
                    name: atom.name.clone(),
                    value: atom.value.clone(),
                    payload: atom.payload.clone(),
                });
                self.push_marker(
                    *close_count,
                    MarkerValue::Atom(self.atoms.len() - 1),
                );
            }
            Opcode::OpenMarkup { markup } => {
                let index = self.markup_index(markup);
                if let Some(marker) =
                    self.current_markers().and_then(|markers| markers.last_mut())
                {
                    marker.opened.push(index);
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Mobiledoc {
        Mobiledoc {
            version: self.version,
            atoms: self.atoms,
            cards: self.cards,
            markups: self.markups,
            sections: self.sections,
        }
    }

    /// The marker list the next marker goes into: that of the last markup
    /// section, or of the last item of the last list.
    fn current_markers(&mut self) -> Option<&mut Vec<WireMarker>> {
        match self.sections.last_mut()? {
            WireSection::Markup { markers, .. } => Some(markers),
            WireSection::List { items, .. } => items.last_mut(),
            _ => None,
        }
    }

    fn push_marker(&mut self, close_count: usize, value: MarkerValue) {
        if let Some(markers) = self.current_markers() {
            markers.push(WireMarker {
                opened: Vec::new(),
                close_count,
                value,
            });
        }
    }

    fn markup_index(&mut self, markup: &Markup) -> usize {
        let key = markup.cache_key();
        if let Some(index) = self.markup_indexes.get(&key) {
            return *index;
        }
        self.markups.push(MarkupEntry {
            tag: markup.tag().to_string(),
            attributes: markup.sorted_attribute_kvs(),
        });
        let index = self.markups.len() - 1;
        self.markup_indexes.insert(key, index);
        index
    }

    fn section_attributes(
        &self,
        attributes: &BTreeMap<String, String>,
    ) -> Vec<String> {
        if !self.version.has_section_attributes() {
            return Vec::new();
        }
        attributes
            .iter()
            .flat_map(|(k, v)| [k.clone(), v.clone()])
            .collect()
    }
}
