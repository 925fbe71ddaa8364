// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::BTreeMap;

use super::Post;
use crate::models::{MarkerContent, MarkerId, MarkupId, SectionId, SectionKind};

impl Post {
    /// A textual tree of the post, for tests and debugging:
    ///
    /// ```text
    ///
    /// ├>p
    /// │ ├>"plain "
    /// │ └>"bold" [b]
    /// └>ul
    ///   └>li
    ///     └>"item"
    /// ```
    pub fn to_tree(&self) -> String {
        let mut out = String::from("\n");
        let sections = self.top_level_sections();
        for (i, section) in sections.iter().enumerate() {
            self.section_to_tree(
                &mut out,
                *section,
                "",
                i + 1 == sections.len(),
            );
        }
        out
    }

    fn section_to_tree(
        &self,
        out: &mut String,
        section: SectionId,
        indent: &str,
        is_last: bool,
    ) {
        push_line(out, indent, is_last, &self.section_label(section));
        let child_indent =
            format!("{indent}{}", if is_last { "  " } else { "│ " });

        let children: Vec<Child> = match &self.section_arena[section].kind {
            SectionKind::List { items, .. } => items
                .iter(&self.section_arena)
                .map(Child::Section)
                .collect(),
            SectionKind::Markup { markers, .. }
            | SectionKind::ListItem { markers } => markers
                .iter(&self.marker_arena)
                .map(Child::Marker)
                .collect(),
            _ => Vec::new(),
        };
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            match child {
                Child::Section(id) => {
                    self.section_to_tree(out, *id, &child_indent, last)
                }
                Child::Marker(id) => push_line(
                    out,
                    &child_indent,
                    last,
                    &self.marker_label(*id),
                ),
            }
        }
    }

    fn section_label(&self, section: SectionId) -> String {
        match &self.section_arena[section].kind {
            SectionKind::Markup {
                tag, attributes, ..
            } => format!("{tag}{}", attributes_label(attributes)),
            SectionKind::List {
                tag, attributes, ..
            } => format!("{tag}{}", attributes_label(attributes)),
            SectionKind::ListItem { .. } => "li".to_owned(),
            SectionKind::Image { src } => format!("img \"{src}\""),
            SectionKind::Card { name, .. } => format!("card \"{name}\""),
        }
    }

    fn marker_label(&self, marker: MarkerId) -> String {
        let m = &self.marker_arena[marker];
        let mut label = match &m.content {
            MarkerContent::Text(text) => format!("\"{text}\""),
            MarkerContent::Atom(atom) => {
                format!("@{} \"{}\"", atom.name, atom.value)
            }
        };
        if !m.markups.is_empty() {
            let markups: Vec<String> =
                m.markups.iter().map(|id| self.markup_label(*id)).collect();
            label.push_str(&format!(" [{}]", markups.join(", ")));
        }
        label
    }

    fn markup_label(&self, markup: MarkupId) -> String {
        let markup = &self.markups[markup];
        format!("{}{}", markup.tag, attributes_label(&markup.attributes))
    }
}

enum Child {
    Section(SectionId),
    Marker(MarkerId),
}

fn push_line(out: &mut String, indent: &str, is_last: bool, label: &str) {
    out.push_str(indent);
    out.push_str(if is_last { "└>" } else { "├>" });
    out.push_str(label);
    out.push('\n');
}

fn attributes_label(attributes: &BTreeMap<String, String>) -> String {
    attributes
        .iter()
        .map(|(k, v)| format!(" {k}=\"{v}\""))
        .collect()
}
