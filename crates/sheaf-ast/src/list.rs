//! Doubly linked list whose cells live in an arena owned by the list.
//!
//! Handles are stable: inserting or removing one element never invalidates a
//! handle to another. A handle carries the id of the list that produced it and
//! the generation of its cell, so a handle from another list or to a removed
//! element is rejected instead of touching an unrelated cell.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_LIST_ID: AtomicU32 = AtomicU32::new(1);

fn next_list_id() -> u32 {
    NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed)
}

pub struct Handle<T> {
    list: u32,
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}:{}#{})", self.list, self.index, self.generation)
    }
}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.list.hash(state);
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list && self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

struct Cell<T> {
    value: Option<T>,
    prev: Option<u32>,
    next: Option<u32>,
    generation: u32,
}

pub struct List<T> {
    id: u32,
    cells: Vec<Cell<T>>,
    free: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self {
            id: next_list_id(),
            cells: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<Handle<T>> {
        self.head.map(|index| self.handle(index))
    }

    pub fn tail(&self) -> Option<Handle<T>> {
        self.tail.map(|index| self.handle(index))
    }

    pub fn first(&self) -> Option<&T> {
        self.head.and_then(|index| self.cells[index as usize].value.as_ref())
    }

    pub fn last(&self) -> Option<&T> {
        self.tail.and_then(|index| self.cells[index as usize].value.as_ref())
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let index = self.resolve(handle)?;
        self.cells[index as usize].value.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let index = self.resolve(handle)?;
        self.cells[index as usize].value.as_mut()
    }

    pub fn next(&self, handle: Handle<T>) -> Option<Handle<T>> {
        let index = self.resolve(handle)?;
        self.cells[index as usize].next.map(|next| self.handle(next))
    }

    pub fn prev(&self, handle: Handle<T>) -> Option<Handle<T>> {
        let index = self.resolve(handle)?;
        self.cells[index as usize].prev.map(|prev| self.handle(prev))
    }

    /// Returns `true` if `handle` refers to a live element of this list.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.resolve(handle).is_some()
    }

    pub fn append(&mut self, value: T) -> Handle<T> {
        let index = self.alloc(value, self.tail, None);
        match self.tail {
            Some(tail) => self.cells[tail as usize].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.handle(index)
    }

    pub fn prepend(&mut self, value: T) -> Handle<T> {
        let index = self.alloc(value, None, self.head);
        match self.head {
            Some(head) => self.cells[head as usize].prev = Some(index),
            None => self.tail = Some(index),
        }
        self.head = Some(index);
        self.handle(index)
    }

    /// Inserts `value` right before `handle`. Returns `None` (dropping nothing
    /// but `value`) when the handle does not belong to this list.
    pub fn insert_before(&mut self, handle: Handle<T>, value: T) -> Option<Handle<T>> {
        let at = self.resolve(handle)?;
        let prev = self.cells[at as usize].prev;
        let index = self.alloc(value, prev, Some(at));

        self.cells[at as usize].prev = Some(index);
        match prev {
            Some(prev) => self.cells[prev as usize].next = Some(index),
            None => self.head = Some(index),
        }
        Some(self.handle(index))
    }

    pub fn insert_after(&mut self, handle: Handle<T>, value: T) -> Option<Handle<T>> {
        let at = self.resolve(handle)?;
        let next = self.cells[at as usize].next;
        let index = self.alloc(value, Some(at), next);

        self.cells[at as usize].next = Some(index);
        match next {
            Some(next) => self.cells[next as usize].prev = Some(index),
            None => self.tail = Some(index),
        }
        Some(self.handle(index))
    }

    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let index = self.resolve(handle)?;
        let cell = &mut self.cells[index as usize];
        let (prev, next) = (cell.prev.take(), cell.next.take());
        let value = cell.value.take();
        cell.generation = cell.generation.wrapping_add(1);

        match prev {
            Some(prev) => self.cells[prev as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.cells[next as usize].prev = prev,
            None => self.tail = prev,
        }

        self.free.push(index);
        self.len -= 1;
        value
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail()?;
        self.remove(tail)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head()?;
        self.remove(head)
    }

    /// Removes every element. Handles taken before the call are rejected
    /// afterwards, even once new elements reuse the freed cells.
    pub fn clear(&mut self) {
        self.id = next_list_id();
        self.cells.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { list: self, next: self.head, remaining: self.len }
    }

    /// Calls `f` on every element, front to back.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let mut next = self.head;
        while let Some(index) = next {
            let cell = &mut self.cells[index as usize];
            next = cell.next;
            if let Some(value) = cell.value.as_mut() {
                f(value);
            }
        }
    }

    /// Handles of every element, front to back.
    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        self.indices().map(|index| self.handle(index))
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Vec<U> {
        self.iter().map(f).collect()
    }

    fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        std::iter::successors(self.head, |&index| self.cells[index as usize].next)
    }

    fn handle(&self, index: u32) -> Handle<T> {
        Handle {
            list: self.id,
            index,
            generation: self.cells[index as usize].generation,
            _marker: PhantomData,
        }
    }

    fn resolve(&self, handle: Handle<T>) -> Option<u32> {
        if handle.list != self.id {
            return None;
        }

        let cell = self.cells.get(handle.index as usize)?;
        (cell.generation == handle.generation && cell.value.is_some()).then_some(handle.index)
    }

    fn alloc(&mut self, value: T, prev: Option<u32>, next: Option<u32>) -> u32 {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let cell = &mut self.cells[index as usize];
            cell.value = Some(value);
            cell.prev = prev;
            cell.next = next;
            return index;
        }

        let index = self.cells.len() as u32;
        self.cells.push(Cell { value: Some(value), prev, next, generation: 0 });
        index
    }
}

pub struct Iter<'a, T> {
    list: &'a List<T>,
    next: Option<u32>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = &self.list.cells[self.next? as usize];
        self.next = cell.next;
        self.remaining -= 1;
        cell.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let order: Vec<u32> = self.indices().collect();
        order
            .into_iter()
            .filter_map(|index| self.cells[index as usize].value.take())
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

/// Clones get a fresh identity: handles of the original do not apply to them.
impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(list: &List<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn append_and_iterate() {
        let mut list = List::new();
        assert!(list.is_empty());

        list.append(1);
        list.append(2);
        list.prepend(0);

        assert_eq!(items(&list), vec![0, 1, 2]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.first(), Some(&0));
        assert_eq!(list.last(), Some(&2));
        assert_eq!(list.map(|x| x * 10), vec![0, 10, 20]);
    }

    #[test]
    fn remove_relinks_neighbours() {
        let mut list = List::new();
        let a = list.append(1);
        let b = list.append(2);
        let c = list.append(3);

        assert_eq!(list.remove(b), Some(2));
        assert_eq!(items(&list), vec![1, 3]);
        assert_eq!(list.next(a), Some(c));
        assert_eq!(list.prev(c), Some(a));

        assert_eq!(list.remove(a), Some(1));
        assert_eq!(list.head(), Some(c));
        assert_eq!(list.remove(c), Some(3));
        assert!(list.is_empty());
        assert_eq!(list.tail(), None);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn insert_around_handle() {
        let mut list = List::new();
        let middle = list.append(2);

        let first = list.insert_before(middle, 1).unwrap();
        list.insert_after(middle, 4).unwrap();
        list.insert_after(middle, 3).unwrap();

        assert_eq!(items(&list), vec![1, 2, 3, 4]);
        assert_eq!(list.head(), Some(first));
        assert_eq!(list.last(), Some(&4));
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut list = List::new();
        let a = list.append(1);
        list.remove(a);

        let b = list.append(2);
        assert_eq!(list.get(a), None);
        assert_eq!(list.remove(a), None);
        assert_eq!(list.insert_before(a, 9), None);
        assert_eq!(list.get(b), Some(&2));
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut list = List::new();
        let stale = list.append("old");
        list.clear();
        assert!(list.is_empty());

        let fresh = list.append("new");
        assert_eq!(list.get(stale), None);
        assert_eq!(list.remove(stale), None);
        assert_eq!(list.insert_after(stale, "other"), None);
        assert_eq!(list.get(fresh), Some(&"new"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let mut one = List::new();
        let mut two = List::new();
        let handle = one.append(1);
        two.append(1);

        assert!(!two.contains(handle));
        assert_eq!(two.remove(handle), None);
        assert_eq!(two.insert_after(handle, 5), None);
        assert_eq!(items(&two), vec![1]);

        let copy = one.clone();
        assert!(!copy.contains(handle));
        assert_eq!(copy, one);
    }

    #[test]
    fn for_each_mut_follows_list_order() {
        let mut list = List::new();
        let b = list.append(2);
        list.prepend(1);
        list.remove(b);
        list.append(3);
        list.prepend(0);

        list.for_each_mut(|value| *value *= 2);

        assert_eq!(items(&list), vec![0, 2, 6]);
        assert_eq!(list.into_iter().collect::<Vec<_>>(), vec![0, 2, 6]);
    }

    #[test]
    fn pop_from_both_ends() {
        let mut list: List<i32> = (1..=4).collect();

        assert_eq!(list.pop_back(), Some(4));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(items(&list), vec![2, 3]);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.pop_back(), None);
    }
}
