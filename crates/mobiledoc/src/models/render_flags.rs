// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// What a render layer needs to know about a node after an edit.
///
/// The editor sets these on every structural change; the render layer
/// clears them with [`crate::Post::clear_render_flags`] once it has caught
/// up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderFlags {
    pub is_dirty: bool,
    pub is_removed: bool,
}
