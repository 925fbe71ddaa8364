// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use thiserror::Error;

use crate::mobiledoc::MobiledocVersion;
use crate::models::{SectionId, SectionType};

/// A model operation was called with input it cannot accept.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Cannot create section of type {0}")]
    InvalidSectionTag(String),
    #[error("Cannot create list section of type {0}")]
    InvalidListTag(String),
    #[error("Cannot create markup of tagName {0}")]
    InvalidMarkupTag(String),
    #[error("Invalid attribute {0} for section")]
    InvalidAttribute(String),
    #[error("Offset {offset} is out of bounds for a section of length {length}")]
    OffsetOutOfBounds { offset: usize, length: usize },
    #[error("Cannot {operation} a section of type {section_type}")]
    NotMarkerable {
        operation: &'static str,
        section_type: SectionType,
    },
    #[error("A {child} cannot be a child of a {parent}")]
    InvalidParent { child: SectionType, parent: String },
    #[error("Section {0:?} is not attached to the post")]
    Detached(SectionId),
    #[error("Range head comes after its tail")]
    InvertedRange,
}

/// Reading a mobiledoc failed. No partial post is produced.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unable to parse mobiledoc: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unable to parse mobiledoc: unsupported version {0:?}")]
    UnsupportedVersion(String),
    #[error("Unable to parse mobiledoc: {0}")]
    Malformed(String),
    #[error("Unable to parse mobiledoc: unexpected section type {0}")]
    UnexpectedSectionType(u64),
    #[error("Unable to parse mobiledoc: unexpected marker type {0}")]
    UnexpectedMarkerType(u64),
    #[error("Unable to parse mobiledoc: no {table} at index {index}")]
    MissingTableEntry { table: &'static str, index: usize },
    #[error("Unable to parse mobiledoc: {0}")]
    Model(#[from] ModelError),
}

/// Writing a mobiledoc failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializeError {
    #[error("Mobiledoc {version} cannot represent atoms")]
    AtomsNotSupported { version: MobiledocVersion },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_errors_say_what_failed() {
        let err = ParseError::UnexpectedSectionType(7);
        assert_eq!(
            err.to_string(),
            "Unable to parse mobiledoc: unexpected section type 7"
        );
        let err: ParseError =
            ModelError::InvalidMarkupTag("blink".to_owned()).into();
        assert_eq!(
            err.to_string(),
            "Unable to parse mobiledoc: Cannot create markup of tagName blink"
        );
    }

    #[test]
    fn model_errors_name_the_section_type() {
        let err = ModelError::NotMarkerable {
            operation: "split",
            section_type: SectionType::CardSection,
        };
        assert_eq!(err.to_string(), "Cannot split a section of type card-section");
    }
}
