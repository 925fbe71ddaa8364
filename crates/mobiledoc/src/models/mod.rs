// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The document model: a [`Post`] of sections holding markers.

mod marker;
mod markup;
mod post;
mod render_flags;
mod section;
mod tags;

pub use marker::{Atom, Marker, MarkerContent, MarkerId};
pub(crate) use markup::common_item_length;
pub use markup::{Markup, MarkupId};
pub use post::Post;
pub use render_flags::RenderFlags;
pub use section::{
    MarkerList, Section, SectionId, SectionKind, SectionList, SectionParent,
};
pub(crate) use tags::VALID_SECTION_ATTRIBUTES;
pub use tags::{ListTag, MarkupSectionTag, MarkupTag, SectionTag, SectionType};
