// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use indoc::indoc;
use mobiledoc::{
    Direction, EditDelegate, ModelError, Mobiledoc, MobiledocVersion, Position,
    Post, PostEditor, PostNodeBuilder, Range, SectionId,
};
use serde_json::{json, Value};
use speculoos::{assert_that, AssertionFailure, Spec};

/// Build a post whose top-level sections are created by `build`.
fn post_with(
    build: impl FnOnce(&mut PostNodeBuilder) -> Vec<SectionId>,
) -> Post {
    let mut post = Post::new();
    let sections = build(&mut post.builder());
    PostEditor::new(&mut post)
        .run(|editor| {
            for section in sections {
                editor.insert_section_at_end(section)?;
            }
            Ok::<_, ModelError>(())
        })
        .unwrap();
    post
}

fn paragraphs(texts: &[&str]) -> Post {
    post_with(|b| {
        texts
            .iter()
            .map(|text| {
                let markers = if text.is_empty() {
                    vec![]
                } else {
                    vec![b.create_marker(text, vec![])]
                };
                b.create_markup_section("p", markers, false).unwrap()
            })
            .collect()
    })
}

trait Roundtrips {
    fn roundtrips(&self);
}

impl Roundtrips for Spec<'_, Value> {
    fn roundtrips(&self) {
        let subject = self.subject;
        let mobiledoc = Mobiledoc::from_value(subject).unwrap();
        let post = Post::from_mobiledoc(&mobiledoc).unwrap();
        post.explicitly_assert_invariants();

        let output = post.to_mobiledoc(mobiledoc.version).unwrap();
        let output = output.to_value();
        if output != *subject {
            AssertionFailure::from_spec(self)
                .with_expected(subject.to_string())
                .with_actual(output.to_string())
                .fail();
        }
    }
}

#[test]
fn deleting_everything_leaves_a_blank_paragraph() {
    let mut post = paragraphs(&["ab"]);
    let section = post.leaf_sections()[0];
    let more = post.builder().create_marker("cd", vec![]);
    let tail = Position::tail_of(&post, section);
    PostEditor::new(&mut post)
        .run(|editor| editor.insert_markers(tail, vec![more]))
        .unwrap();
    assert_eq!(post.section_text(section), "abcd");

    let range = Range::new(
        Position::head_of(section),
        Position::tail_of(&post, section),
    );
    let (position, edit) = PostEditor::new(&mut post)
        .run(|editor| editor.delete_range(&range))
        .unwrap();

    assert_eq!(position, Position::head_of(section));
    assert!(edit.did_rerender);
    assert_eq!(post.leaf_sections(), vec![section]);
    assert!(post.is_blank(section));
    assert_eq!(post.to_html(), "<p></p>");
}

#[test]
fn backspace_at_the_start_of_a_paragraph_joins_it_to_the_previous_one() {
    let mut post = paragraphs(&["foo", "bar"]);
    let [foo, bar] = post.leaf_sections()[..] else {
        panic!("expected two sections");
    };

    let (position, _) = PostEditor::new(&mut post)
        .run(|editor| {
            editor.delete_from(Position::head_of(bar), Direction::Backward)
        })
        .unwrap();

    assert_eq!(position, Position::new(foo, 3));
    assert_eq!(post.leaf_sections(), vec![foo]);
    assert_eq!(post.section_text(foo), "foobar");
    assert!(!post.is_attached(bar));
    assert_eq!(post.to_html(), "<p>foobar</p>");
}

#[test]
fn nested_markups_serialize_to_one_marker() {
    let post = post_with(|b| {
        let bold = b.create_markup("b", &[]).unwrap();
        let em = b.create_markup("em", &[]).unwrap();
        let marker = b.create_marker("hi", vec![bold, em]);
        vec![b.create_markup_section("p", vec![marker], false).unwrap()]
    });

    let mobiledoc = post.to_mobiledoc(MobiledocVersion::V0_3_2).unwrap();
    assert_eq!(
        mobiledoc.to_value(),
        json!({
            "version": "0.3.2",
            "atoms": [],
            "cards": [],
            "markups": [["b"], ["em"]],
            "sections": [[1, "p", [[0, [0, 1], 2, "hi"]]]]
        })
    );
}

#[test]
fn enter_in_the_only_blank_list_item_leaves_the_list() {
    let mut post = post_with(|b| {
        let item = b.create_list_item(vec![]);
        vec![b.create_list_section("ul", vec![item]).unwrap()]
    });
    let item = post.leaf_sections()[0];

    let ((before, after), _) = PostEditor::new(&mut post)
        .run(|editor| editor.split_section(Position::head_of(item)))
        .unwrap();

    assert!(before.is_none());
    let after = after.unwrap();
    assert_eq!(post.leaf_sections(), vec![after]);
    assert!(!post.section(after).is_list_item());
    assert_eq!(post.to_html(), "<p></p>");
}

#[test]
fn backspace_at_the_head_of_the_post_does_nothing() {
    let mut post = paragraphs(&["abc"]);
    let section = post.leaf_sections()[0];
    let before = post.to_tree();

    let (position, edit) = PostEditor::new(&mut post)
        .run(|editor| {
            editor.delete_from(Position::head_of(section), Direction::Backward)
        })
        .unwrap();

    assert_eq!(position, Position::head_of(section));
    assert!(!edit.did_update);
    assert_eq!(post.to_tree(), before);
}

#[test]
fn markups_with_equal_tag_and_attributes_are_the_same_markup() {
    let mut post = Post::new();
    let mut builder = post.builder();
    let a = builder
        .create_markup("a", &[("href", "https://x"), ("rel", "nofollow")])
        .unwrap();
    let b = builder
        .create_markup("a", &[("rel", "nofollow"), ("href", "https://x")])
        .unwrap();
    let c = builder.create_markup("a", &[("href", "https://y")]).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn typed_text_coalesces_into_one_marker() {
    let mut post = paragraphs(&[""]);
    let section = post.leaf_sections()[0];
    PostEditor::new(&mut post)
        .run(|editor| {
            let mut position = Position::head_of(section);
            for text in ["a", "b", "c"] {
                position = editor.insert_text(position, text)?;
            }
            Ok::<_, ModelError>(())
        })
        .unwrap();

    assert_eq!(post.markers_of(section).len(), 1);
    assert_eq!(post.section_text(section), "abc");
}

#[test]
fn toggling_bold_twice_restores_the_post() {
    let mut post = paragraphs(&["hello world"]);
    let section = post.leaf_sections()[0];
    let range = Range::new(Position::new(section, 0), Position::new(section, 5));

    PostEditor::new(&mut post)
        .run(|editor| editor.toggle_markup(&range, "b", &[]))
        .unwrap();
    assert_eq!(post.to_html(), "<p><b>hello</b> world</p>");

    PostEditor::new(&mut post)
        .run(|editor| editor.toggle_markup(&range, "b", &[]))
        .unwrap();
    assert_eq!(post.to_html(), "<p>hello world</p>");
    assert_eq!(post.markers_of(section).len(), 1);
}

#[test]
fn notifications_reach_the_delegate_once() {
    #[derive(Default)]
    struct Counter {
        rerenders: usize,
        updates: usize,
    }
    impl EditDelegate for Counter {
        fn rerender(&mut self, _post: &Post) {
            self.rerenders += 1;
        }
        fn did_update(&mut self, _post: &Post) {
            self.updates += 1;
        }
    }

    let mut post = paragraphs(&["ab", "cd"]);
    let [first, second] = post.leaf_sections()[..] else {
        panic!("expected two sections");
    };
    let mut counter = Counter::default();
    PostEditor::new(&mut post)
        .with_delegate(&mut counter)
        .run(|editor| {
            editor.insert_text(Position::head_of(first), "x")?;
            editor.remove_section(second);
            Ok::<_, ModelError>(())
        })
        .unwrap();

    assert_eq!(counter.rerenders, 1);
    assert_eq!(counter.updates, 1);
}

#[test]
fn toggling_a_list_and_serializing_it() {
    let mut post = paragraphs(&["one", "two"]);
    let [one, two] = post.leaf_sections()[..] else {
        panic!("expected two sections");
    };
    let range = Range::new(Position::head_of(one), Position::tail_of(&post, two));
    PostEditor::new(&mut post)
        .run(|editor| editor.toggle_section(&range, "ol"))
        .unwrap();

    assert_eq!(
        post.to_tree(),
        indoc! {r#"

            └>ol
              ├>li
              │ └>"one"
              └>li
                └>"two"
        "#}
    );
    assert_eq!(
        post.to_mobiledoc(MobiledocVersion::V0_3_2)
            .unwrap()
            .to_value()["sections"],
        json!([[3, "ol", [[[0, [], 0, "one"]], [[0, [], 0, "two"]]]]])
    );
}

#[test]
fn a_full_document_roundtrips() {
    assert_that!(json!({
        "version": "0.3.2",
        "atoms": [["mention", "@bob", {"id": 42}]],
        "cards": [["gallery", {"images": ["a.png"]}]],
        "markups": [["a", ["href", "https://example.org"]], ["b"]],
        "sections": [
            [1, "h1", [[0, [], 0, "Title"]]],
            [1, "p", [
                [0, [0], 0, "link "],
                [0, [1], 2, "bold"],
                [0, [], 0, " and "],
                [1, [], 0, 0]
            ], ["data-md-text-align", "center"]],
            [3, "ul", [[[0, [], 0, "item"]], []]],
            [2, "cat.gif"],
            [10, 0]
        ]
    }))
    .roundtrips();
}

#[test]
fn atoms_inside_a_text_run_roundtrip_in_every_0_3_version() {
    for version in ["0.3.0", "0.3.1", "0.3.2"] {
        assert_that!(json!({
            "version": version,
            "atoms": [
                ["mention", "@bob", {"id": 42}],
                ["hashtag", "#rust", {}],
                ["mention", "@bob", {"id": 42}]
            ],
            "cards": [],
            "markups": [["b"]],
            "sections": [
                [1, "p", [
                    [0, [], 0, "hi "],
                    [1, [], 0, 0],
                    [0, [0], 0, " and "],
                    [1, [], 0, 1],
                    [0, [], 1, "!"]
                ]],
                [3, "ol", [[[1, [], 0, 2], [0, [], 0, " again"]]]]
            ]
        }))
        .roundtrips();
    }
}

#[test]
fn an_empty_document_roundtrips() {
    assert_that!(json!({
        "version": "0.3.2",
        "atoms": [],
        "cards": [],
        "markups": [],
        "sections": []
    }))
    .roundtrips();
}

#[test]
fn old_documents_are_read_and_written_as_0_2() {
    let json = r#"{"version":"0.2.0","sections":[[["em"]],[[1,"p",[[[0],1,"hi"]]]]]}"#;
    let post = Post::from_mobiledoc_json(json).unwrap();
    assert_eq!(post.to_html(), "<p><em>hi</em></p>");

    let written = post.to_mobiledoc(MobiledocVersion::V0_2_0).unwrap();
    assert_eq!(
        written.to_value(),
        serde_json::from_str::<Value>(json).unwrap()
    );
}

#[test]
fn unknown_versions_are_rejected() {
    let err = Post::from_mobiledoc_json(r#"{"version":"9.9.9","sections":[]}"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to parse mobiledoc: unsupported version \"9.9.9\""
    );
}
