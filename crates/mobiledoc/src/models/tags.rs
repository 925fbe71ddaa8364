// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Tag names and section types.
//!
//! Tag names are parsed case-insensitively and always printed in lower
//! case, so `"H2".parse::<MarkupSectionTag>()` yields `H2` which prints as
//! `"h2"`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Tag names a [`crate::SectionKind::Markup`] section may carry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MarkupSectionTag {
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Blockquote,
    // Older documents call this a pull-quote.
    #[strum(to_string = "aside", serialize = "pull-quote")]
    Aside,
}

impl Default for MarkupSectionTag {
    fn default() -> Self {
        Self::P
    }
}

/// Tag names a list section may carry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ListTag {
    Ul,
    Ol,
}

/// Inline markup tag names.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MarkupTag {
    A,
    B,
    Code,
    Em,
    I,
    S,
    Strong,
    Sub,
    Sup,
    U,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SectionType {
    MarkupSection,
    ListSection,
    ListItem,
    ImageSection,
    CardSection,
}

/// Attribute keys markup and list sections accept.
pub(crate) static VALID_SECTION_ATTRIBUTES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["data-md-text-align"]));

/// A tag name that can be given to `toggle_section`: either a markup
/// section tag or a list tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionTag {
    Markup(MarkupSectionTag),
    List(ListTag),
}

impl std::str::FromStr for SectionTag {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ListTag>()
            .map(SectionTag::List)
            .or_else(|_| s.parse::<MarkupSectionTag>().map(SectionTag::Markup))
    }
}
