// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The transactional mutation engine.
//!
//! A [`PostEditor`] borrows a [`Post`] for the length of one edit. Edits
//! queue work in three queues which are flushed, in order, when the editor
//! is completed:
//!
//! 1. *before completion*: caller callbacks, then coalescing of every
//!    section a marker-level edit touched (empty text markers are dropped
//!    and neighbours with the same markups are joined);
//! 2. *completion*: the `rerender` and `did_update` notifications (each at
//!    most once) and caller callbacks, in the order they were queued;
//! 3. *after completion*: caller follow-ups, e.g. restoring a selection.
//!
//! [`PostEditor::complete`] takes the editor by value, so an edit can only
//! be completed once and nothing can be queued afterwards.
//!
//! The impl is split across files by concern: `delete`, `split`, `markup`,
//! `sections` and `insert`.

mod delete;
mod insert;
mod markup;
mod sections;
mod split;

use std::collections::BTreeSet;

use log::debug;

use crate::cursor::Range;
use crate::models::{MarkerContent, Post, SectionId};

/// Receives the notifications of completed edits. Both methods default to
/// doing nothing.
pub trait EditDelegate {
    fn rerender(&mut self, _post: &Post) {}
    fn did_update(&mut self, _post: &Post) {}
}

/// What happened when an edit was completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletedEdit {
    /// The range last set on the editor, if any.
    pub range: Option<Range>,
    pub did_rerender: bool,
    pub did_update: bool,
}

type Callback<'a> = Box<dyn FnOnce(&mut Post) + 'a>;

enum Completion<'a> {
    Rerender,
    DidUpdate,
    Callback(Callback<'a>),
}

pub struct PostEditor<'a> {
    pub(crate) post: &'a mut Post,
    delegate: Option<&'a mut dyn EditDelegate>,
    range: Option<Range>,
    before_completion: Vec<Callback<'a>>,
    completion: Vec<Completion<'a>>,
    after_completion: Vec<Callback<'a>>,
    coalescing: BTreeSet<SectionId>,
}

impl<'a> PostEditor<'a> {
    pub fn new(post: &'a mut Post) -> Self {
        Self {
            post,
            delegate: None,
            range: None,
            before_completion: Vec::new(),
            completion: Vec::new(),
            after_completion: Vec::new(),
            coalescing: BTreeSet::new(),
        }
    }

    pub fn with_delegate(mut self, delegate: &'a mut dyn EditDelegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Run `edit` and complete the editor if it succeeds. On error the
    /// editor is dropped without completing; changes already made to the
    /// post stay.
    pub fn run<R, E>(
        mut self,
        edit: impl FnOnce(&mut Self) -> Result<R, E>,
    ) -> Result<(R, CompletedEdit), E> {
        let result = edit(&mut self)?;
        Ok((result, self.complete()))
    }

    pub fn post(&self) -> &Post {
        self.post
    }

    pub fn range(&self) -> Option<Range> {
        self.range
    }

    /// The range to report when the edit completes.
    pub fn set_range(&mut self, range: Range) {
        self.range = Some(range);
    }

    pub fn schedule_before_completion(
        &mut self,
        callback: impl FnOnce(&mut Post) + 'a,
    ) {
        self.before_completion.push(Box::new(callback));
    }

    /// Queue `callback` in the completion queue, after any notification
    /// already queued.
    pub fn schedule(&mut self, callback: impl FnOnce(&mut Post) + 'a) {
        self.completion.push(Completion::Callback(Box::new(callback)));
    }

    pub fn schedule_after_completion(
        &mut self,
        callback: impl FnOnce(&mut Post) + 'a,
    ) {
        self.after_completion.push(Box::new(callback));
    }

    pub fn schedule_rerender(&mut self) {
        if !self
            .completion
            .iter()
            .any(|c| matches!(c, Completion::Rerender))
        {
            self.completion.push(Completion::Rerender);
        }
    }

    pub fn schedule_did_update(&mut self) {
        if !self
            .completion
            .iter()
            .any(|c| matches!(c, Completion::DidUpdate))
        {
            self.completion.push(Completion::DidUpdate);
        }
    }

    pub(crate) fn schedule_for_coalescing(&mut self, section: SectionId) {
        self.coalescing.insert(section);
    }

    /// Queue both notifications.
    pub(crate) fn changed(&mut self) {
        self.schedule_rerender();
        self.schedule_did_update();
    }

    /// Flush the queues and finish the edit.
    pub fn complete(self) -> CompletedEdit {
        let Self {
            post,
            mut delegate,
            range,
            before_completion,
            completion,
            after_completion,
            coalescing,
        } = self;
        debug!(
            "Completing edit: {} before, {} completion, {} after, {} to coalesce",
            before_completion.len(),
            completion.len(),
            after_completion.len(),
            coalescing.len()
        );

        for callback in before_completion {
            callback(&mut *post);
        }
        for section in coalescing {
            coalesce_markers(post, section);
        }

        cfg_if::cfg_if! {
            if #[cfg(feature = "assert-invariants")] {
                post.explicitly_assert_invariants();
            }
        }

        let mut did_rerender = false;
        let mut did_update = false;
        for item in completion {
            match item {
                Completion::Rerender => {
                    did_rerender = true;
                    if let Some(delegate) = delegate.as_mut() {
                        delegate.rerender(post);
                    }
                }
                Completion::DidUpdate => {
                    did_update = true;
                    if let Some(delegate) = delegate.as_mut() {
                        delegate.did_update(post);
                    }
                }
                Completion::Callback(callback) => callback(&mut *post),
            }
        }

        for callback in after_completion {
            callback(&mut *post);
        }
        post.release_removed_markers();

        CompletedEdit {
            range,
            did_rerender,
            did_update,
        }
    }
}

/// Drop empty text markers from `section` and join neighbouring text
/// markers that carry the same markups.
fn coalesce_markers(post: &mut Post, section: SectionId) {
    if !post.is_attached(section) || !post.section(section).is_markerable() {
        return;
    }
    let mut previous = None;
    for marker in post.markers_of(section) {
        let m = post.marker(marker);
        if m.is_empty() && !m.is_atom() {
            post.remove_marker(marker);
            continue;
        }
        let joined = match (previous, &m.content) {
            (Some(prev), MarkerContent::Text(text)) => {
                let p = post.marker(prev);
                if !p.is_atom() && p.markups == m.markups {
                    Some((prev, text.clone()))
                } else {
                    None
                }
            }
            _ => None,
        };
        match joined {
            Some((prev, text)) => {
                post.marker_arena[prev].join_text(&text);
                post.marker_arena[prev].render.is_dirty = true;
                post.remove_marker(marker);
            }
            None => previous = Some(marker),
        }
    }
}
