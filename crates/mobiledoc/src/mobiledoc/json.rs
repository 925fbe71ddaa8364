// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The JSON shapes of each Mobiledoc version.
//!
//! ```text
//! 0.2.0  {version, sections: [markerTypes, sections]}
//! 0.3.x  {version, atoms, cards, markups, sections}
//! ```

use serde_json::{json, Map, Value};

use super::{
    AtomEntry, CardEntry, CardRef, MarkerValue, MarkupEntry, Mobiledoc,
    MobiledocVersion, WireMarker, WireSection, ATOM_MARKER_TYPE,
    CARD_SECTION_TYPE, IMAGE_SECTION_TYPE, LIST_SECTION_TYPE,
    MARKUP_SECTION_TYPE, TEXT_MARKER_TYPE,
};
use crate::error::ParseError;

impl Mobiledoc {
    pub fn to_value(&self) -> Value {
        let sections: Vec<Value> =
            self.sections.iter().map(|s| self.section_value(s)).collect();
        let markups: Vec<Value> =
            self.markups.iter().map(markup_value).collect();
        if self.version.has_tables() {
            json!({
                "version": self.version.to_string(),
                "atoms": self
                    .atoms
                    .iter()
                    .map(|a| json!([a.name, a.value, a.payload]))
                    .collect::<Vec<_>>(),
                "cards": self
                    .cards
                    .iter()
                    .map(|c| json!([c.name, c.payload]))
                    .collect::<Vec<_>>(),
                "markups": markups,
                "sections": sections,
            })
        } else {
            json!({
                "version": self.version.to_string(),
                "sections": [markups, sections],
            })
        }
    }

    fn section_value(&self, section: &WireSection) -> Value {
        match section {
            WireSection::Markup {
                tag,
                markers,
                attributes,
            } => {
                let mut tuple = vec![
                    json!(MARKUP_SECTION_TYPE),
                    json!(tag),
                    self.markers_value(markers),
                ];
                if !attributes.is_empty() {
                    tuple.push(json!(attributes));
                }
                Value::Array(tuple)
            }
            WireSection::Image { src } => json!([IMAGE_SECTION_TYPE, src]),
            WireSection::List {
                tag,
                items,
                attributes,
            } => {
                let items: Vec<Value> =
                    items.iter().map(|i| self.markers_value(i)).collect();
                let mut tuple =
                    vec![json!(LIST_SECTION_TYPE), json!(tag), json!(items)];
                if !attributes.is_empty() {
                    tuple.push(json!(attributes));
                }
                Value::Array(tuple)
            }
            WireSection::Card(CardRef::Inline(card)) => {
                json!([CARD_SECTION_TYPE, card.name, card.payload])
            }
            WireSection::Card(CardRef::Index(index)) => {
                json!([CARD_SECTION_TYPE, index])
            }
        }
    }

    fn markers_value(&self, markers: &[WireMarker]) -> Value {
        let markers: Vec<Value> = markers
            .iter()
            .map(|m| {
                let value = match &m.value {
                    MarkerValue::Text(text) => json!(text),
                    MarkerValue::Atom(index) => json!(index),
                };
                if self.version.has_tables() {
                    let kind = match m.value {
                        MarkerValue::Text(_) => TEXT_MARKER_TYPE,
                        MarkerValue::Atom(_) => ATOM_MARKER_TYPE,
                    };
                    json!([kind, m.opened, m.close_count, value])
                } else {
                    json!([m.opened, m.close_count, value])
                }
            })
            .collect();
        Value::Array(markers)
    }

    /// Read a Mobiledoc of any supported version.
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let object = value
            .as_object()
            .ok_or_else(|| malformed("document", value))?;
        let version = object
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::Malformed("missing version".to_owned()))?;
        let version: MobiledocVersion = version
            .parse()
            .map_err(|_| ParseError::UnsupportedVersion(version.to_owned()))?;

        if version.has_tables() {
            Self::from_object_0_3(version, object)
        } else {
            Self::from_object_0_2(version, object)
        }
    }

    fn from_object_0_2(
        version: MobiledocVersion,
        object: &Map<String, Value>,
    ) -> Result<Self, ParseError> {
        let sections = field_array(object, "sections")?;
        let [markups, sections] = sections.as_slice() else {
            return Err(ParseError::Malformed(
                "sections must be [markerTypes, sections]".to_owned(),
            ));
        };
        let reader = Reader { version };
        Ok(Self {
            version,
            atoms: Vec::new(),
            cards: Vec::new(),
            markups: array(markups, "marker types")?
                .iter()
                .map(read_markup)
                .collect::<Result<_, _>>()?,
            sections: array(sections, "sections")?
                .iter()
                .map(|s| reader.section(s))
                .collect::<Result<_, _>>()?,
        })
    }

    fn from_object_0_3(
        version: MobiledocVersion,
        object: &Map<String, Value>,
    ) -> Result<Self, ParseError> {
        let reader = Reader { version };
        Ok(Self {
            version,
            atoms: optional_field_array(object, "atoms")?
                .iter()
                .map(read_atom)
                .collect::<Result<_, _>>()?,
            cards: optional_field_array(object, "cards")?
                .iter()
                .map(read_card)
                .collect::<Result<_, _>>()?,
            markups: optional_field_array(object, "markups")?
                .iter()
                .map(read_markup)
                .collect::<Result<_, _>>()?,
            sections: field_array(object, "sections")?
                .iter()
                .map(|s| reader.section(s))
                .collect::<Result<_, _>>()?,
        })
    }
}

struct Reader {
    version: MobiledocVersion,
}

impl Reader {
    fn section(&self, value: &Value) -> Result<WireSection, ParseError> {
        let tuple = array(value, "section")?;
        let section_type = tuple
            .first()
            .and_then(Value::as_u64)
            .ok_or_else(|| malformed("section", value))?;
        match section_type {
            MARKUP_SECTION_TYPE => Ok(WireSection::Markup {
                tag: string_at(tuple, 1, "section tag")?,
                markers: self.markers(item(tuple, 2, "section markers")?)?,
                attributes: self.attributes(tuple.get(3))?,
            }),
            IMAGE_SECTION_TYPE => Ok(WireSection::Image {
                src: string_at(tuple, 1, "image src")?,
            }),
            LIST_SECTION_TYPE => Ok(WireSection::List {
                tag: string_at(tuple, 1, "list tag")?,
                items: array(item(tuple, 2, "list items")?, "list items")?
                    .iter()
                    .map(|i| self.markers(i))
                    .collect::<Result<_, _>>()?,
                attributes: self.attributes(tuple.get(3))?,
            }),
            CARD_SECTION_TYPE if self.version.has_tables() => {
                let index = item(tuple, 1, "card index")?;
                let index = index
                    .as_u64()
                    .ok_or_else(|| malformed("card index", index))?;
                Ok(WireSection::Card(CardRef::Index(index as usize)))
            }
            CARD_SECTION_TYPE => Ok(WireSection::Card(CardRef::Inline(
                CardEntry {
                    name: string_at(tuple, 1, "card name")?,
                    payload: tuple.get(2).cloned().unwrap_or(Value::Null),
                },
            ))),
            other => Err(ParseError::UnexpectedSectionType(other)),
        }
    }

    fn markers(&self, value: &Value) -> Result<Vec<WireMarker>, ParseError> {
        array(value, "markers")?
            .iter()
            .map(|m| self.marker(m))
            .collect()
    }

    fn marker(&self, value: &Value) -> Result<WireMarker, ParseError> {
        let tuple = array(value, "marker")?;
        let (kind, rest) = if self.version.has_tables() {
            let kind = tuple
                .first()
                .and_then(Value::as_u64)
                .ok_or_else(|| malformed("marker", value))?;
            (kind, &tuple[1..])
        } else {
            (TEXT_MARKER_TYPE, tuple.as_slice())
        };
        let [opened, close_count, content] = rest else {
            return Err(malformed("marker", value));
        };
        let opened = array(opened, "opened markups")?
            .iter()
            .map(|i| index(i, "markup index"))
            .collect::<Result<_, _>>()?;
        let close_count = index(close_count, "close count")?;
        let value = match kind {
            TEXT_MARKER_TYPE => MarkerValue::Text(
                content
                    .as_str()
                    .ok_or_else(|| malformed("marker text", content))?
                    .to_owned(),
            ),
            ATOM_MARKER_TYPE => {
                MarkerValue::Atom(index(content, "atom index")?)
            }
            other => return Err(ParseError::UnexpectedMarkerType(other)),
        };
        Ok(WireMarker {
            opened,
            close_count,
            value,
        })
    }

    fn attributes(
        &self,
        value: Option<&Value>,
    ) -> Result<Vec<String>, ParseError> {
        match value {
            Some(value) if self.version.has_section_attributes() => {
                strings(value, "section attributes")
            }
            _ => Ok(Vec::new()),
        }
    }
}

fn markup_value(markup: &MarkupEntry) -> Value {
    if markup.attributes.is_empty() {
        json!([markup.tag])
    } else {
        json!([markup.tag, markup.attributes])
    }
}

fn read_markup(value: &Value) -> Result<MarkupEntry, ParseError> {
    let tuple = array(value, "markup")?;
    Ok(MarkupEntry {
        tag: string_at(tuple, 0, "markup tag")?,
        attributes: match tuple.get(1) {
            Some(attributes) => strings(attributes, "markup attributes")?,
            None => Vec::new(),
        },
    })
}

fn read_atom(value: &Value) -> Result<AtomEntry, ParseError> {
    let tuple = array(value, "atom")?;
    Ok(AtomEntry {
        name: string_at(tuple, 0, "atom name")?,
        value: string_at(tuple, 1, "atom value")?,
        payload: tuple.get(2).cloned().unwrap_or(Value::Null),
    })
}

fn read_card(value: &Value) -> Result<CardEntry, ParseError> {
    let tuple = array(value, "card")?;
    Ok(CardEntry {
        name: string_at(tuple, 0, "card name")?,
        payload: tuple.get(1).cloned().unwrap_or(Value::Null),
    })
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn malformed(what: &str, value: &Value) -> ParseError {
    ParseError::Malformed(format!("unexpected {what} {value}"))
}

fn array<'a>(
    value: &'a Value,
    what: &str,
) -> Result<&'a Vec<Value>, ParseError> {
    value.as_array().ok_or_else(|| malformed(what, value))
}

fn item<'a>(
    tuple: &'a [Value],
    index: usize,
    what: &str,
) -> Result<&'a Value, ParseError> {
    tuple
        .get(index)
        .ok_or_else(|| ParseError::Malformed(format!("missing {what}")))
}

fn string_at(
    tuple: &[Value],
    index: usize,
    what: &str,
) -> Result<String, ParseError> {
    let value = item(tuple, index, what)?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| malformed(what, value))
}

fn strings(value: &Value, what: &str) -> Result<Vec<String>, ParseError> {
    array(value, what)?
        .iter()
        .map(|s| {
            s.as_str()
                .map(str::to_owned)
                .ok_or_else(|| malformed(what, s))
        })
        .collect()
}

fn index(value: &Value, what: &str) -> Result<usize, ParseError> {
    value
        .as_u64()
        .map(|i| i as usize)
        .ok_or_else(|| malformed(what, value))
}

fn field_array<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Vec<Value>, ParseError> {
    let value = object
        .get(field)
        .ok_or_else(|| ParseError::Malformed(format!("missing {field}")))?;
    array(value, field)
}

fn optional_field_array<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a [Value], ParseError> {
    match object.get(field) {
        Some(value) => array(value, field).map(Vec::as_slice),
        None => Ok(&[]),
    }
}
