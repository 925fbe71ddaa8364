// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Walk a post and emit the opcodes the compiler runs.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{
    common_item_length, Atom, ListTag, MarkerContent, Markup,
    MarkupSectionTag, Post, SectionId, SectionKind,
};

#[derive(Clone, Debug)]
pub(crate) enum Opcode<'a> {
    OpenPost,
    OpenMarkupSection {
        tag: MarkupSectionTag,
        attributes: &'a BTreeMap<String, String>,
    },
    OpenListSection {
        tag: ListTag,
        attributes: &'a BTreeMap<String, String>,
    },
    OpenListItem,
    OpenImageSection {
        src: &'a str,
    },
    OpenCardSection {
        name: &'a str,
        payload: &'a Value,
    },
    OpenMarker {
        close_count: usize,
        value: String,
    },
    OpenAtom {
        close_count: usize,
        atom: &'a Atom,
    },
    /// A markup opened by the marker before it.
    OpenMarkup {
        markup: &'a Markup,
    },
}

pub(crate) fn visit(post: &Post) -> Vec<Opcode<'_>> {
    let mut opcodes = vec![Opcode::OpenPost];
    for section in post.top_level_sections() {
        visit_section(post, section, &mut opcodes);
    }
    opcodes
}

fn visit_section<'a>(
    post: &'a Post,
    section: SectionId,
    opcodes: &mut Vec<Opcode<'a>>,
) {
    match post.section(section).kind() {
        SectionKind::Markup {
            tag, attributes, ..
        } => {
            opcodes.push(Opcode::OpenMarkupSection {
                tag: *tag,
                attributes,
            });
            visit_markers(post, section, opcodes);
        }
        SectionKind::List {
            tag,
            attributes,
            items,
        } => {
            opcodes.push(Opcode::OpenListSection {
                tag: *tag,
                attributes,
            });
            for item in items.iter(&post.section_arena) {
                visit_section(post, item, opcodes);
            }
        }
        SectionKind::ListItem { .. } => {
            opcodes.push(Opcode::OpenListItem);
            visit_markers(post, section, opcodes);
        }
        SectionKind::Image { src } => {
            opcodes.push(Opcode::OpenImageSection { src })
        }
        SectionKind::Card { name, payload } => {
            opcodes.push(Opcode::OpenCardSection { name, payload })
        }
    }
}

/// Each marker opens the markups it does not share with the previous
/// marker and closes the ones it does not share with the next.
fn visit_markers<'a>(
    post: &'a Post,
    section: SectionId,
    opcodes: &mut Vec<Opcode<'a>>,
) {
    let markers = post.markers_of(section);
    for (i, id) in markers.iter().enumerate() {
        let marker = post.marker(*id);
        let markups = marker.markups();
        let shared_with_prev = i
            .checked_sub(1)
            .map(|p| {
                common_item_length(post.marker(markers[p]).markups(), markups)
            })
            .unwrap_or(0);
        let shared_with_next = markers
            .get(i + 1)
            .map(|n| common_item_length(markups, post.marker(*n).markups()))
            .unwrap_or(0);
        let close_count = markups.len() - shared_with_next;

        opcodes.push(match marker.content() {
            MarkerContent::Text(_) => Opcode::OpenMarker {
                close_count,
                value: marker.value(),
            },
            MarkerContent::Atom(atom) => Opcode::OpenAtom { close_count, atom },
        });
        for markup in &markups[shared_with_prev..] {
            opcodes.push(Opcode::OpenMarkup {
                markup: post.markup(*markup),
            });
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::testutils_post::post_from;

    fn marker_summary(opcodes: &[Opcode]) -> Vec<String> {
        opcodes
            .iter()
            .filter_map(|op| match op {
                Opcode::OpenMarker { close_count, value } => {
                    Some(format!("{value}/{close_count}"))
                }
                Opcode::OpenMarkup { markup } => {
                    Some(format!("+{}", markup.tag()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn nested_markups_open_once_and_close_together() {
        let (mut post, _) = post_from("|");
        let section = post.leaf_sections()[0];
        let mut builder = post.builder();
        let b = builder.create_markup("b", &[]).unwrap();
        let em = builder.create_markup("em", &[]).unwrap();
        let markers = vec![
            builder.create_marker("a", vec![b]),
            builder.create_marker("c", vec![b, em]),
            builder.create_marker("d", vec![]),
        ];
        for marker in markers {
            post.append_marker(section, marker);
        }

        let opcodes = visit(&post);
        assert_eq!(
            marker_summary(&opcodes),
            vec!["a/0", "+b", "c/2", "+em", "d/0"]
        );
    }

    #[test]
    fn sections_are_visited_in_order() {
        let (post, _) = post_from("x|\n* a\n![pic.png]");
        let opcodes = visit(&post);
        let kinds: Vec<&str> = opcodes
            .iter()
            .map(|op| match op {
                Opcode::OpenPost => "post",
                Opcode::OpenMarkupSection { .. } => "markup-section",
                Opcode::OpenListSection { .. } => "list-section",
                Opcode::OpenListItem => "list-item",
                Opcode::OpenImageSection { .. } => "image",
                Opcode::OpenCardSection { .. } => "card",
                Opcode::OpenMarker { .. } => "marker",
                Opcode::OpenAtom { .. } => "atom",
                Opcode::OpenMarkup { .. } => "markup",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "post",
                "markup-section",
                "marker",
                "list-section",
                "list-item",
                "marker",
                "image"
            ]
        );
        assert!(matches!(
            opcodes[1],
            Opcode::OpenMarkupSection {
                tag: MarkupSectionTag::P,
                ..
            }
        ));
    }
}
