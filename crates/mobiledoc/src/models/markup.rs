// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::BTreeMap;

use crate::linked_list::arena_id;
use crate::models::MarkupTag;

arena_id!(
    /// Identifies an interned [`Markup`] within one [`crate::Post`]. Two
    /// markups with the same tag and attributes share one id.
    MarkupId
);

/// Inline formatting such as `<b>` or `<a href="...">`.
///
/// Markups are interned per post by the builder, so comparing ids is the
/// same as comparing tag and attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markup {
    pub(crate) tag: MarkupTag,
    pub(crate) attributes: BTreeMap<String, String>,
}

impl Markup {
    pub(crate) fn new(tag: MarkupTag, attributes: BTreeMap<String, String>) -> Self {
        Self { tag, attributes }
    }

    pub fn tag(&self) -> MarkupTag {
        self.tag
    }

    pub fn has_tag(&self, tag: MarkupTag) -> bool {
        self.tag == tag
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attributes flattened to `[key, value, key, value, ...]`, sorted by
    /// key.
    pub fn sorted_attribute_kvs(&self) -> Vec<String> {
        self.attributes
            .iter()
            .flat_map(|(k, v)| [k.clone(), v.clone()])
            .collect()
    }

    pub(crate) fn cache_key(&self) -> String {
        format!("{}-{}", self.tag, self.sorted_attribute_kvs().join("-"))
    }
}

/// Length of the longest common prefix of two markup lists.
pub(crate) fn common_item_length(a: &[MarkupId], b: &[MarkupId]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::linked_list::ArenaId;

    fn ids(indexes: &[usize]) -> Vec<MarkupId> {
        indexes.iter().map(|i| MarkupId::from_index(*i)).collect()
    }

    #[test]
    fn cache_key_sorts_attributes() {
        let markup = Markup::new(
            MarkupTag::A,
            BTreeMap::from([
                ("rel".to_owned(), "nofollow".to_owned()),
                ("href".to_owned(), "http://x".to_owned()),
            ]),
        );
        assert_eq!(markup.cache_key(), "a-href-http://x-rel-nofollow");
        assert_eq!(markup.attribute("href"), Some("http://x"));
    }

    #[test]
    fn cache_key_without_attributes() {
        let markup = Markup::new(MarkupTag::B, BTreeMap::new());
        assert_eq!(markup.cache_key(), "b-");
    }

    #[test]
    fn common_prefix_of_markup_lists() {
        assert_eq!(common_item_length(&ids(&[0, 1]), &ids(&[0, 1, 2])), 2);
        assert_eq!(common_item_length(&ids(&[0, 1]), &ids(&[1, 0])), 0);
        assert_eq!(common_item_length(&ids(&[]), &ids(&[1])), 0);
    }
}
