// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A rich-text document model, the editor that changes it and the
//! Mobiledoc format it is stored in.
//!
//! A [`Post`] is a list of sections (paragraphs, headings, lists, images
//! and cards). Markerable sections hold markers: runs of text or atoms,
//! each carrying an ordered list of interned [`Markup`]s. All offsets are
//! UTF-16 code units.
//!
//! Posts are built with [`PostNodeBuilder`] or parsed with
//! [`Post::from_mobiledoc`], changed through a [`PostEditor`], and written
//! back with [`Post::to_mobiledoc`].

mod builder;
mod cursor;
mod editor;
mod error;
mod linked_list;
mod mobiledoc;
mod models;
mod text;

#[cfg(test)]
mod tests;

pub use crate::builder::PostNodeBuilder;
pub use crate::cursor::{Direction, MarkerPosition, Position, Range};
pub use crate::editor::{CompletedEdit, EditDelegate, PostEditor};
pub use crate::error::{ModelError, ParseError, SerializeError};
pub use crate::linked_list::{Arena, ArenaId, Iter, Linked, LinkedList, Links};
pub use crate::mobiledoc::{
    AtomEntry, CardEntry, CardRef, MarkerValue, MarkupEntry, Mobiledoc,
    MobiledocVersion, WireMarker, WireSection, ATOM_MARKER_TYPE,
    CARD_SECTION_TYPE, IMAGE_SECTION_TYPE, LIST_SECTION_TYPE,
    MARKUP_SECTION_TYPE, TEXT_MARKER_TYPE,
};
pub use crate::models::{
    Atom, ListTag, Marker, MarkerContent, MarkerId, MarkerList, Markup,
    MarkupId, MarkupSectionTag, MarkupTag, Post, RenderFlags, Section,
    SectionId, SectionKind, SectionList, SectionParent, SectionTag,
    SectionType,
};
