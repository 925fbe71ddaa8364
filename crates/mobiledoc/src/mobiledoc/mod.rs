// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The Mobiledoc wire format.
//!
//! Serializing a post happens in two steps: [`visitor`] walks the post and
//! emits a flat list of opcodes, then [`compiler`] runs the opcodes to fill
//! the interning tables and section arrays of a [`Mobiledoc`]. Parsing goes
//! the other way in [`parser`]. The JSON shape of each version lives in
//! [`json`].
//!
//! Markers do not repeat their full markup list. Each one names only the
//! markups it opens and says how many of the active markups close after
//! it:
//!
//! ```text
//! "a" [b]  "c" [b, em]  "d"   =>   [0,[0],0,"a"] [0,[1],2,"c"] [0,[],0,"d"]
//! ```

mod compiler;
mod json;
mod parser;
mod visitor;

use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{ParseError, SerializeError};
use crate::models::Post;

pub const MARKUP_SECTION_TYPE: u64 = 1;
pub const IMAGE_SECTION_TYPE: u64 = 2;
pub const LIST_SECTION_TYPE: u64 = 3;
pub const CARD_SECTION_TYPE: u64 = 10;

pub const TEXT_MARKER_TYPE: u64 = 0;
pub const ATOM_MARKER_TYPE: u64 = 1;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
)]
pub enum MobiledocVersion {
    #[strum(serialize = "0.2.0")]
    V0_2_0,
    #[strum(serialize = "0.3.0")]
    V0_3_0,
    #[strum(serialize = "0.3.1")]
    V0_3_1,
    #[default]
    #[strum(serialize = "0.3.2")]
    V0_3_2,
}

impl MobiledocVersion {
    /// Atoms and card tables came with 0.3.
    pub fn has_tables(self) -> bool {
        self >= Self::V0_3_0
    }

    pub fn has_section_attributes(self) -> bool {
        self >= Self::V0_3_2
    }
}

impl Serialize for MobiledocVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MobiledocVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let version = String::deserialize(deserializer)?;
        version.parse().map_err(|_| {
            serde::de::Error::custom(format!("unsupported version {version:?}"))
        })
    }
}

/// `[tag]` or `[tag, [key, value, ...]]` in the markups table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupEntry {
    pub tag: String,
    pub attributes: Vec<String>,
}

/// `[name, value, payload]` in the atoms table.
#[derive(Clone, Debug, PartialEq)]
pub struct AtomEntry {
    pub name: String,
    pub value: String,
    pub payload: Value,
}

/// `[name, payload]`: an entry of the cards table, or inline in a 0.2 card
/// section.
#[derive(Clone, Debug, PartialEq)]
pub struct CardEntry {
    pub name: String,
    pub payload: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CardRef {
    Inline(CardEntry),
    Index(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkerValue {
    Text(String),
    /// Index into the atoms table.
    Atom(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireMarker {
    /// Indexes into the markups table of the markups this marker opens.
    pub opened: Vec<usize>,
    /// How many of the active markups close after this marker.
    pub close_count: usize,
    pub value: MarkerValue,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WireSection {
    Markup {
        tag: String,
        markers: Vec<WireMarker>,
        /// Flattened `[key, value, ...]`, only written by 0.3.2.
        attributes: Vec<String>,
    },
    Image {
        src: String,
    },
    List {
        tag: String,
        items: Vec<Vec<WireMarker>>,
        attributes: Vec<String>,
    },
    Card(CardRef),
}

/// A Mobiledoc document of any supported version.
///
/// 0.2 documents keep their cards inline and have empty `atoms` and
/// `cards` tables.
#[derive(Clone, Debug, PartialEq)]
pub struct Mobiledoc {
    pub version: MobiledocVersion,
    pub atoms: Vec<AtomEntry>,
    pub cards: Vec<CardEntry>,
    pub markups: Vec<MarkupEntry>,
    pub sections: Vec<WireSection>,
}

impl Mobiledoc {
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }
}

impl FromStr for Mobiledoc {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

impl Serialize for Mobiledoc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Mobiledoc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl Post {
    /// Serialize this post as a Mobiledoc of the given version.
    pub fn to_mobiledoc(
        &self,
        version: MobiledocVersion,
    ) -> Result<Mobiledoc, SerializeError> {
        let opcodes = visitor::visit(self);
        debug!(
            "Serializing post as mobiledoc {version} ({} opcodes)",
            opcodes.len()
        );
        compiler::compile(&opcodes, version)
    }

    /// Rebuild a post from a Mobiledoc. Any failure aborts the whole parse.
    pub fn from_mobiledoc(mobiledoc: &Mobiledoc) -> Result<Post, ParseError> {
        debug!(
            "Parsing mobiledoc {} with {} sections",
            mobiledoc.version,
            mobiledoc.sections.len()
        );
        parser::parse(mobiledoc).inspect_err(|e| debug!("{e}"))
    }

    pub fn from_mobiledoc_json(json: &str) -> Result<Post, ParseError> {
        Mobiledoc::from_json(json)
            .and_then(|mobiledoc| Self::from_mobiledoc(&mobiledoc))
            .inspect_err(|e| debug!("{e}"))
    }
}
