// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Arena-backed intrusive doubly linked lists.
//!
//! Nodes live in an [`Arena`] and are addressed by small copyable ids. A
//! [`LinkedList`] only records its owner, head, tail and length; the
//! `prev`, `next` and `parent` links are stored on the nodes themselves
//! (see [`Links`]), so a node can move between lists without being
//! reallocated.
//!
//! Inserting a node *adopts* it (its parent becomes the list's owner) and
//! removing it *frees* it (all three links are cleared). Inserting a node
//! that is still linked somewhere is a programming error and panics.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A typed, generational index into an [`Arena`]. An id goes stale when
/// its node is released, even if the slot is reused later.
pub trait ArenaId: Copy + Eq + fmt::Debug {
    fn new(index: usize, generation: u32) -> Self;
    fn index(self) -> usize;
    fn generation(self) -> u32;

    fn from_index(index: usize) -> Self {
        Self::new(index, 0)
    }
}

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl $crate::linked_list::ArenaId for $name {
            fn new(index: usize, generation: u32) -> Self {
                Self {
                    index: index as u32,
                    generation,
                }
            }

            fn index(self) -> usize {
                self.index as usize
            }

            fn generation(self) -> u32 {
                self.generation
            }
        }
    };
}
pub(crate) use arena_id;

/// Links stored on every node that can live in a [`LinkedList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Links<I, P> {
    pub(crate) prev: Option<I>,
    pub(crate) next: Option<I>,
    pub(crate) parent: Option<P>,
}

impl<I, P> Default for Links<I, P> {
    fn default() -> Self {
        Self {
            prev: None,
            next: None,
            parent: None,
        }
    }
}

impl<I: Copy, P: Copy> Links<I, P> {
    pub fn prev(&self) -> Option<I> {
        self.prev
    }

    pub fn next(&self) -> Option<I> {
        self.next
    }

    pub fn parent(&self) -> Option<P> {
        self.parent
    }

    fn is_linked(&self) -> bool {
        self.prev.is_some() || self.next.is_some() || self.parent.is_some()
    }
}

/// Implemented by node types that carry [`Links`].
pub trait Linked<I, P> {
    fn links(&self) -> &Links<I, P>;
    fn links_mut(&mut self) -> &mut Links<I, P>;
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Storage for nodes. Released slots are reused by later allocations with
/// a bumped generation, so the arena stays as large as the most nodes it
/// has held at once.
#[derive(Clone, Debug)]
pub struct Arena<I, T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    _id: PhantomData<I>,
}

impl<I, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            _id: PhantomData,
        }
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, item: T) -> I {
        self.alloc_with(|_| item)
    }

    /// Allocate a node whose construction needs to know its own id.
    pub fn alloc_with(&mut self, make: impl FnOnce(I) -> T) -> I {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                let id = I::new(index, slot.generation);
                slot.value = Some(make(id));
                id
            }
            None => {
                let id = I::new(self.slots.len(), 0);
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(make(id)),
                });
                id
            }
        }
    }

    /// Drop the node and free its slot. Returns `None` for a stale id.
    pub fn release(&mut self, id: I) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        Some(value)
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: I) -> bool {
        self.get(id).is_some()
    }

    /// Live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Ids of the live nodes, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|_| I::new(index, slot.generation))
        })
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("{id:?} has been released"),
        }
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        match self.get_mut(id) {
            Some(item) => item,
            None => panic!("{id:?} has been released"),
        }
    }
}

/// The head/tail bookkeeping of one list. Cheap to copy: the node links
/// themselves live in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkedList<I, P> {
    owner: P,
    head: Option<I>,
    tail: Option<I>,
    length: usize,
}

impl<I, P> LinkedList<I, P>
where
    I: ArenaId,
    P: Copy + PartialEq + fmt::Debug,
{
    pub fn new(owner: P) -> Self {
        Self {
            owner,
            head: None,
            tail: None,
            length: 0,
        }
    }

    pub fn owner(&self) -> P {
        self.owner
    }

    pub fn head(&self) -> Option<I> {
        self.head
    }

    pub fn tail(&self) -> Option<I> {
        self.tail
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn append<T: Linked<I, P>>(&mut self, arena: &mut Arena<I, T>, item: I) {
        self.insert_before(arena, item, None);
    }

    pub fn prepend<T: Linked<I, P>>(
        &mut self,
        arena: &mut Arena<I, T>,
        item: I,
    ) {
        let head = self.head;
        self.insert_before(arena, item, head);
    }

    /// Insert `item` after `after`, or at the head when `after` is `None`.
    pub fn insert_after<T: Linked<I, P>>(
        &mut self,
        arena: &mut Arena<I, T>,
        item: I,
        after: Option<I>,
    ) {
        let before = match after {
            Some(after) => {
                self.assert_member(arena, after);
                arena[after].links().next
            }
            None => self.head,
        };
        self.insert_before(arena, item, before);
    }

    /// Insert `item` before `before`, or at the tail when `before` is `None`.
    pub fn insert_before<T: Linked<I, P>>(
        &mut self,
        arena: &mut Arena<I, T>,
        item: I,
        before: Option<I>,
    ) {
        assert!(
            !arena[item].links().is_linked() && self.head != Some(item),
            "Cannot insert {item:?} into a list: it is already in a list"
        );
        let prev = match before {
            Some(before) => {
                self.assert_member(arena, before);
                arena[before].links().prev
            }
            None => self.tail,
        };

        *arena[item].links_mut() = Links {
            prev,
            next: before,
            parent: Some(self.owner),
        };
        match prev {
            Some(prev) => arena[prev].links_mut().next = Some(item),
            None => self.head = Some(item),
        }
        match before {
            Some(before) => arena[before].links_mut().prev = Some(item),
            None => self.tail = Some(item),
        }
        self.length += 1;
    }

    pub fn remove<T: Linked<I, P>>(&mut self, arena: &mut Arena<I, T>, item: I) {
        self.assert_member(arena, item);
        let Links { prev, next, .. } = *arena[item].links();
        match prev {
            Some(prev) => arena[prev].links_mut().next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => arena[next].links_mut().prev = prev,
            None => self.tail = prev,
        }
        *arena[item].links_mut() = Links::default();
        self.length -= 1;
    }

    /// Remove `remove_count` items starting at `target`, then insert
    /// `new_items` where the removed run was. A `None` target means the
    /// end of the list.
    pub fn splice<T: Linked<I, P>>(
        &mut self,
        arena: &mut Arena<I, T>,
        target: Option<I>,
        remove_count: usize,
        new_items: &[I],
    ) {
        let mut before = target;
        for _ in 0..remove_count {
            let Some(item) = before else {
                break;
            };
            before = arena[item].links().next;
            self.remove(arena, item);
        }
        for &item in new_items {
            self.insert_before(arena, item, before);
        }
    }

    pub fn iter<'a, T: Linked<I, P>>(
        &self,
        arena: &'a Arena<I, T>,
    ) -> Iter<'a, I, P, T> {
        Iter {
            arena,
            next: self.head,
            _parent: PhantomData,
        }
    }

    pub fn to_vec<T: Linked<I, P>>(&self, arena: &Arena<I, T>) -> Vec<I> {
        self.iter(arena).collect()
    }

    pub fn for_each<T: Linked<I, P>>(
        &self,
        arena: &Arena<I, T>,
        mut callback: impl FnMut(I, &T),
    ) {
        for id in self.iter(arena) {
            callback(id, &arena[id]);
        }
    }

    /// The first item matching `predicate`.
    pub fn detect<T: Linked<I, P>>(
        &self,
        arena: &Arena<I, T>,
        mut predicate: impl FnMut(&T) -> bool,
    ) -> Option<I> {
        self.iter(arena).find(|id| predicate(&arena[*id]))
    }

    /// Items from `start` (or the head) to `end` (or the tail), inclusive.
    pub fn read_range<T: Linked<I, P>>(
        &self,
        arena: &Arena<I, T>,
        start: Option<I>,
        end: Option<I>,
    ) -> Vec<I> {
        let mut items = Vec::new();
        let mut current = start.or(self.head);
        while let Some(id) = current {
            items.push(id);
            if Some(id) == end {
                break;
            }
            current = arena[id].links().next;
        }
        items
    }

    pub fn object_at<T: Linked<I, P>>(
        &self,
        arena: &Arena<I, T>,
        index: usize,
    ) -> Option<I> {
        self.iter(arena).nth(index)
    }

    pub fn index_of<T: Linked<I, P>>(
        &self,
        arena: &Arena<I, T>,
        item: I,
    ) -> Option<usize> {
        self.iter(arena).position(|id| id == item)
    }

    fn assert_member<T: Linked<I, P>>(&self, arena: &Arena<I, T>, item: I) {
        assert_eq!(
            arena[item].links().parent,
            Some(self.owner),
            "{item:?} is not a member of the list owned by {:?}",
            self.owner
        );
    }
}

pub struct Iter<'a, I, P, T> {
    arena: &'a Arena<I, T>,
    next: Option<I>,
    _parent: PhantomData<P>,
}

impl<'a, I, P, T> Iterator for Iter<'a, I, P, T>
where
    I: ArenaId,
    T: Linked<I, P>,
    P: Copy,
{
    type Item = I;

    fn next(&mut self) -> Option<I> {
        let id = self.next?;
        self.next = self.arena[id].links().next;
        Some(id)
    }
}
