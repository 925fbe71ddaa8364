// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A plain HTML rendering of a post, used for debugging and tests. Live
//! DOM rendering and diffing belong to the render layer.

use std::collections::BTreeMap;

use super::Post;
use crate::models::{
    common_item_length, MarkerContent, MarkupId, SectionId, SectionKind,
};

impl Post {
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for section in self.top_level_sections() {
            self.push_section_html(&mut html, section);
        }
        html
    }

    fn push_section_html(&self, html: &mut String, section: SectionId) {
        match &self.section_arena[section].kind {
            SectionKind::Markup {
                tag, attributes, ..
            } => {
                html.push_str(&format!("<{tag}{}>", html_attributes(attributes)));
                self.push_markers_html(html, section);
                html.push_str(&format!("</{tag}>"));
            }
            SectionKind::List {
                tag,
                attributes,
                items,
            } => {
                html.push_str(&format!("<{tag}{}>", html_attributes(attributes)));
                for item in items.iter(&self.section_arena) {
                    self.push_section_html(html, item);
                }
                html.push_str(&format!("</{tag}>"));
            }
            SectionKind::ListItem { .. } => {
                html.push_str("<li>");
                self.push_markers_html(html, section);
                html.push_str("</li>");
            }
            SectionKind::Image { src } => {
                html.push_str(&format!(
                    "<img src=\"{}\" />",
                    html_escape::encode_double_quoted_attribute(src)
                ));
            }
            SectionKind::Card { name, .. } => {
                html.push_str(&format!(
                    "<div data-card=\"{}\"></div>",
                    html_escape::encode_double_quoted_attribute(name)
                ));
            }
        }
    }

    /// Markups are opened and closed the same way the serializer counts
    /// them: whatever prefix the next marker shares stays open.
    fn push_markers_html(&self, html: &mut String, section: SectionId) {
        let mut open: Vec<MarkupId> = Vec::new();
        for marker in self.markers_of(section) {
            let marker = &self.marker_arena[marker];
            let common = common_item_length(&open, &marker.markups);
            while open.len() > common {
                if let Some(markup) = open.pop() {
                    html.push_str(&format!("</{}>", self.markups[markup].tag));
                }
            }
            for markup in &marker.markups[common..] {
                let m = &self.markups[*markup];
                html.push_str(&format!(
                    "<{}{}>",
                    m.tag,
                    html_attributes(&m.attributes)
                ));
                open.push(*markup);
            }
            match &marker.content {
                MarkerContent::Text(text) => {
                    html.push_str(&html_escape::encode_text(&text.to_string()))
                }
                MarkerContent::Atom(atom) => html.push_str(&format!(
                    "<span data-atom=\"{}\">{}</span>",
                    html_escape::encode_double_quoted_attribute(&atom.name),
                    html_escape::encode_text(&atom.value)
                )),
            }
        }
        while let Some(markup) = open.pop() {
            html.push_str(&format!("</{}>", self.markups[markup].tag));
        }
    }
}

fn html_attributes(attributes: &BTreeMap<String, String>) -> String {
    attributes
        .iter()
        .map(|(k, v)| {
            format!(" {k}=\"{}\"", html_escape::encode_double_quoted_attribute(v))
        })
        .collect()
}

#[cfg(test)]
mod test {
    use crate::tests::testutils_post::post_from;

    #[test]
    fn sections_render_as_blocks() {
        let (post, _) = post_from("a < b|\n1. one\n![pic.png]");
        assert_eq!(
            post.to_html(),
            "<p>a &lt; b</p><ol><li>one</li></ol><img src=\"pic.png\" />"
        );
    }

    #[test]
    fn shared_markups_stay_open() {
        let (mut post, _) = post_from("|");
        let section = post.leaf_sections()[0];
        let mut builder = post.builder();
        let b = builder.create_markup("b", &[]).unwrap();
        let em = builder.create_markup("em", &[]).unwrap();
        let m1 = builder.create_marker("x", vec![b]);
        let m2 = builder.create_marker("y", vec![b, em]);
        let m3 = builder.create_marker("z", vec![]);
        for m in [m1, m2, m3] {
            post.append_marker(section, m);
        }
        assert_eq!(post.to_html(), "<p><b>x<em>y</em></b>z</p>");
    }
}
