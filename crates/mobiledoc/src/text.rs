// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! UTF-16 helpers. All offsets in the model are UTF-16 code units.

use widestring::{Utf16Str, Utf16String};

/// Stands in for an atom when a section's code units are laid out flat.
pub(crate) const OBJECT_REPLACEMENT: u16 = 0xFFFC;

/// The code units `[start, end)` of `text`. A lone surrogate left by a
/// split through a surrogate pair becomes U+FFFD, keeping the length.
pub(crate) fn slice(text: &Utf16Str, start: usize, end: usize) -> Utf16String {
    let units = &text.as_slice()[start..end];
    Utf16String::from_str(&String::from_utf16_lossy(units))
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

/// Width of the character that ends at `offset`: 2 for a surrogate pair,
/// otherwise 1.
pub(crate) fn char_width_before(units: &[u16], offset: usize) -> usize {
    if offset >= 2
        && is_low_surrogate(units[offset - 1])
        && is_high_surrogate(units[offset - 2])
    {
        2
    } else {
        1
    }
}

/// Width of the character that starts at `offset`.
pub(crate) fn char_width_after(units: &[u16], offset: usize) -> usize {
    if offset + 1 < units.len()
        && is_high_surrogate(units[offset])
        && is_low_surrogate(units[offset + 1])
    {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn units(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn surrogate_pairs_are_one_character() {
        let text = units("a😀b");
        assert_eq!(char_width_before(&text, 1), 1);
        assert_eq!(char_width_before(&text, 3), 2);
        assert_eq!(char_width_after(&text, 1), 2);
        assert_eq!(char_width_after(&text, 3), 1);
    }

    #[test]
    fn slicing_by_code_units() {
        let text = Utf16String::from_str("a😀b");
        assert_eq!(slice(&text, 1, 3).to_string(), "😀");
        assert_eq!(slice(&text, 3, 4).to_string(), "b");
    }
}
