//! Doubly linked list of slot indices over an external arena.
//!
//! An [`IndexedList`] stores only its ends and length. The `prev`/`next`
//! links live in the [`IndexNode`]s of an arena owned by someone else, so
//! several lists can partition one arena and a slot can move between lists
//! in O(1) without reallocating.
//!
//! # Arena Invariant
//!
//! A list must always be used with the same arena, and a node may be linked
//! into at most one list at a time. The caller tracks which list a node is
//! in (the buffer simulator does this with the slot state).
//!
//! # Example
//! ```
//! use epochsim::buffer::{IndexNode, IndexedList};
//! use epochsim::SlotId;
//!
//! let mut arena: Vec<IndexNode<char>> = "abc".chars().map(IndexNode::new).collect();
//! let mut ready = IndexedList::new();
//! let mut done = IndexedList::new();
//!
//! for i in 0..3 {
//!     ready.push_back(&mut arena, SlotId::new(i));
//! }
//!
//! // Move the middle node to another list
//! ready.remove(&mut arena, SlotId::new(1));
//! done.push_back(&mut arena, SlotId::new(1));
//!
//! assert_eq!(ready.iter(&arena).collect::<Vec<_>>(), vec![SlotId::new(0), SlotId::new(2)]);
//! assert_eq!(done.front(), Some(SlotId::new(1)));
//! ```

use crate::common::SlotId;

/// An arena element: a value plus the links of whichever list holds it.
#[derive(Debug, Clone)]
pub struct IndexNode<V> {
    /// User payload.
    pub value: V,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

impl<V> IndexNode<V> {
    /// Creates a new unlinked node.
    #[inline]
    pub fn new(value: V) -> Self {
        Self {
            value,
            prev: None,
            next: None,
        }
    }

    /// Previous node in the owning list.
    #[inline]
    pub fn prev(&self) -> Option<SlotId> {
        self.prev
    }

    /// Next node in the owning list.
    #[inline]
    pub fn next(&self) -> Option<SlotId> {
        self.next
    }

    /// True if neither link is set.
    ///
    /// The sole member of a list is also unlinked by this definition; use
    /// the list's ends to tell the two apart.
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

impl<V: Default> Default for IndexNode<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

/// A doubly linked list whose nodes live in an external `[IndexNode<V>]`.
///
/// All operations are O(1) except traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedList {
    front: Option<SlotId>,
    back: Option<SlotId>,
    len: usize,
}

impl IndexedList {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self {
            front: None,
            back: None,
            len: 0,
        }
    }

    /// First node, or `None` if empty.
    #[inline]
    pub fn front(&self) -> Option<SlotId> {
        self.front
    }

    /// Last node, or `None` if empty.
    #[inline]
    pub fn back(&self) -> Option<SlotId> {
        self.back
    }

    /// Number of linked nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the list has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.front.is_none(), self.back.is_none());
        debug_assert_eq!(self.len == 0, self.front.is_none());
        self.front.is_none()
    }

    /// Append an unlinked node at the back.
    ///
    /// # Panics
    /// Panics if `id` is out of range for `arena` or already linked.
    ///
    /// The sole member of *another* list has no links and is not this
    /// list's front, so it passes the check and ends up in both lists.
    /// Callers must know which list a node is in before pushing it.
    pub fn push_back<V>(&mut self, arena: &mut [IndexNode<V>], id: SlotId) {
        assert!(
            arena[id.0].is_unlinked() && self.front != Some(id),
            "{} is already linked",
            id
        );

        match self.back {
            None => {
                self.front = Some(id);
            }
            Some(back) => {
                arena[id.0].prev = Some(back);
                arena[back.0].next = Some(id);
            }
        }
        self.back = Some(id);
        self.len += 1;
    }

    /// Unlink `id` from wherever it sits in this list.
    ///
    /// The node's own links are reset, so it can be pushed onto any list
    /// afterwards.
    ///
    /// # Panics
    /// Panics if `id`'s links contradict this list's ends, which means it
    /// is not a member.
    ///
    /// Only a node with a missing link is checked against the ends. An
    /// interior node of *another* list is spliced out of that list while
    /// this list's `len` drops, corrupting both without a panic.
    pub fn remove<V>(&mut self, arena: &mut [IndexNode<V>], id: SlotId) {
        let (prev, next) = (arena[id.0].prev, arena[id.0].next);

        match prev {
            None => {
                assert_eq!(self.front, Some(id), "{} is not in this list", id);
                self.front = next;
            }
            Some(p) => arena[p.0].next = next,
        }

        match next {
            None => {
                assert_eq!(self.back, Some(id), "{} is not in this list", id);
                self.back = prev;
            }
            Some(n) => arena[n.0].prev = prev,
        }

        arena[id.0].prev = None;
        arena[id.0].next = None;
        self.len -= 1;
    }

    /// Remove and return the front node, or `None` if the list is empty.
    pub fn pop_front<V>(&mut self, arena: &mut [IndexNode<V>]) -> Option<SlotId> {
        let front = self.front?;
        self.remove(arena, front);
        Some(front)
    }

    /// Visit every node front to back, returning how many were visited.
    ///
    /// The successor is read before `visit` runs, so the visitor may remove
    /// the node it is given (from this list, through the `&mut IndexedList`
    /// argument). Removing any other node during traversal is not supported.
    pub fn for_each<V, F>(&mut self, arena: &mut [IndexNode<V>], mut visit: F) -> usize
    where
        F: FnMut(&mut IndexedList, &mut [IndexNode<V>], SlotId),
    {
        let mut visited = 0;
        let mut cursor = self.front;
        while let Some(id) = cursor {
            cursor = arena[id.0].next;
            visit(self, arena, id);
            visited += 1;
        }
        visited
    }

    /// Read-only front-to-back iterator over node ids.
    pub fn iter<'a, V>(&self, arena: &'a [IndexNode<V>]) -> Iter<'a, V> {
        Iter {
            arena,
            cursor: self.front,
            remaining: self.len,
        }
    }
}

/// Iterator returned by [`IndexedList::iter`].
pub struct Iter<'a, V> {
    arena: &'a [IndexNode<V>],
    cursor: Option<SlotId>,
    remaining: usize,
}

impl<V> Iterator for Iter<'_, V> {
    type Item = SlotId;

    fn next(&mut self) -> Option<SlotId> {
        let id = self.cursor?;
        self.cursor = self.arena[id.0].next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(n: usize) -> Vec<IndexNode<u32>> {
        (0..n as u32).map(IndexNode::new).collect()
    }

    fn ids(list: &IndexedList, arena: &[IndexNode<u32>]) -> Vec<usize> {
        list.iter(arena).map(SlotId::index).collect()
    }

    #[test]
    fn test_empty_list() {
        let mut nodes = arena(4);
        let mut list = IndexedList::new();

        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.pop_front(&mut nodes), None);
    }

    #[test]
    fn test_push_back_order() {
        let mut nodes = arena(4);
        let mut list = IndexedList::new();

        for i in [2, 0, 3] {
            list.push_back(&mut nodes, SlotId::new(i));
        }

        assert_eq!(list.len(), 3);
        assert_eq!(list.front(), Some(SlotId::new(2)));
        assert_eq!(list.back(), Some(SlotId::new(3)));
        assert_eq!(ids(&list, &nodes), vec![2, 0, 3]);
    }

    #[test]
    fn test_pop_front_fifo() {
        let mut nodes = arena(3);
        let mut list = IndexedList::new();
        for i in 0..3 {
            list.push_back(&mut nodes, SlotId::new(i));
        }

        assert_eq!(list.pop_front(&mut nodes), Some(SlotId::new(0)));
        assert_eq!(list.pop_front(&mut nodes), Some(SlotId::new(1)));
        assert_eq!(list.pop_front(&mut nodes), Some(SlotId::new(2)));
        assert_eq!(list.pop_front(&mut nodes), None);
        assert!(list.is_empty());
        assert!(nodes.iter().all(IndexNode::is_unlinked));
    }

    #[test]
    fn test_remove_middle_front_back() {
        let mut nodes = arena(5);
        let mut list = IndexedList::new();
        for i in 0..5 {
            list.push_back(&mut nodes, SlotId::new(i));
        }

        list.remove(&mut nodes, SlotId::new(2));
        assert_eq!(ids(&list, &nodes), vec![0, 1, 3, 4]);
        assert!(nodes[2].is_unlinked());

        list.remove(&mut nodes, SlotId::new(0));
        assert_eq!(list.front(), Some(SlotId::new(1)));
        assert_eq!(ids(&list, &nodes), vec![1, 3, 4]);

        list.remove(&mut nodes, SlotId::new(4));
        assert_eq!(list.back(), Some(SlotId::new(3)));
        assert_eq!(ids(&list, &nodes), vec![1, 3]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_then_push_moves_to_back() {
        let mut nodes = arena(3);
        let mut list = IndexedList::new();
        for i in 0..3 {
            list.push_back(&mut nodes, SlotId::new(i));
        }

        list.remove(&mut nodes, SlotId::new(0));
        list.push_back(&mut nodes, SlotId::new(0));

        assert_eq!(ids(&list, &nodes), vec![1, 2, 0]);
    }

    #[test]
    fn test_remove_sole_member() {
        let mut nodes = arena(1);
        let mut list = IndexedList::new();
        list.push_back(&mut nodes, SlotId::new(0));

        list.remove(&mut nodes, SlotId::new(0));

        assert!(list.is_empty());
        assert_eq!(list.back(), None);
    }

    #[test]
    fn test_move_between_lists() {
        let mut nodes = arena(4);
        let mut a = IndexedList::new();
        let mut b = IndexedList::new();
        for i in 0..4 {
            a.push_back(&mut nodes, SlotId::new(i));
        }

        while let Some(id) = a.pop_front(&mut nodes) {
            b.push_back(&mut nodes, id);
        }

        assert!(a.is_empty());
        assert_eq!(ids(&b, &nodes), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_for_each_allows_removing_visited_node() {
        let mut nodes = arena(6);
        let mut list = IndexedList::new();
        for i in 0..6 {
            list.push_back(&mut nodes, SlotId::new(i));
        }

        let mut seen = Vec::new();
        let visited = list.for_each(&mut nodes, |list, nodes, id| {
            seen.push(id.index());
            if id.index() % 2 == 0 {
                list.remove(nodes, id);
            }
        });

        assert_eq!(visited, 6);
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(ids(&list, &nodes), vec![1, 3, 5]);
    }

    #[test]
    fn test_for_each_drain_into_other_list() {
        let mut nodes = arena(3);
        let mut src = IndexedList::new();
        let mut dst = IndexedList::new();
        for i in 0..3 {
            src.push_back(&mut nodes, SlotId::new(i));
        }

        src.for_each(&mut nodes, |src, nodes, id| {
            src.remove(nodes, id);
            dst.push_back(nodes, id);
        });

        assert!(src.is_empty());
        assert_eq!(ids(&dst, &nodes), vec![0, 1, 2]);
    }

    #[test]
    fn test_iter_size_hint() {
        let mut nodes = arena(3);
        let mut list = IndexedList::new();
        list.push_back(&mut nodes, SlotId::new(1));
        list.push_back(&mut nodes, SlotId::new(2));

        let iter = list.iter(&nodes);
        assert_eq!(iter.len(), 2);
    }

    #[test]
    #[should_panic(expected = "already linked")]
    fn test_push_linked_node_panics() {
        let mut nodes = arena(2);
        let mut list = IndexedList::new();
        list.push_back(&mut nodes, SlotId::new(0));
        list.push_back(&mut nodes, SlotId::new(1));
        list.push_back(&mut nodes, SlotId::new(0));
    }

    #[test]
    #[should_panic(expected = "already linked")]
    fn test_push_sole_member_twice_panics() {
        let mut nodes = arena(1);
        let mut list = IndexedList::new();
        list.push_back(&mut nodes, SlotId::new(0));
        list.push_back(&mut nodes, SlotId::new(0));
    }

    #[test]
    #[should_panic(expected = "not in this list")]
    fn test_remove_foreign_node_panics() {
        let mut nodes = arena(3);
        let mut a = IndexedList::new();
        let mut b = IndexedList::new();
        a.push_back(&mut nodes, SlotId::new(0));
        b.push_back(&mut nodes, SlotId::new(1));

        a.remove(&mut nodes, SlotId::new(1));
    }

    // Membership is the caller's to track; the list cannot see these misuses.

    #[test]
    fn test_push_cannot_see_other_lists_sole_member() {
        let mut nodes = arena(1);
        let mut a = IndexedList::new();
        let mut b = IndexedList::new();
        a.push_back(&mut nodes, SlotId::new(0));

        b.push_back(&mut nodes, SlotId::new(0));

        assert_eq!(a.front(), Some(SlotId::new(0)));
        assert_eq!(b.front(), Some(SlotId::new(0)));
    }

    #[test]
    fn test_remove_cannot_see_other_lists_interior_node() {
        let mut nodes = arena(4);
        let mut a = IndexedList::new();
        let mut b = IndexedList::new();
        for i in 0..3 {
            a.push_back(&mut nodes, SlotId::new(i));
        }
        b.push_back(&mut nodes, SlotId::new(3));

        b.remove(&mut nodes, SlotId::new(1));

        // Spliced out of `a`, but `a` still counts it
        assert_eq!(ids(&a, &nodes), vec![0, 2]);
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 0);
    }
}
