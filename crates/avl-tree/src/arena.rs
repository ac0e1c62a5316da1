//! Slot arena backing the tree nodes.
//!
//! Nodes reference each other by `u32` slot index. Freed slots go on a free
//! list and are handed out again by later allocations; each slot carries a
//! generation counter that is bumped on every free, so an index captured
//! before a removal can be told apart from the node that later reuses it.

use std::collections::TryReserveError;
use std::ops::{Index, IndexMut};

#[derive(Clone, Debug)]
struct Slot<N> {
    generation: u32,
    node: Option<N>,
}

#[derive(Clone, Debug)]
pub struct Arena<N> {
    slots: Vec<Slot<N>>,
    free: Vec<u32>,
    len: usize,
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Arena<N> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity() - self.slots.len() + self.free.len()
    }

    fn missing(&self, additional: usize) -> usize {
        additional.saturating_sub(self.free.len())
    }

    pub fn reserve(&mut self, additional: usize) {
        let missing = self.missing(additional);
        self.slots.reserve(missing);
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let missing = self.missing(additional);
        self.slots.try_reserve(missing)
    }

    /// Releases spare capacity. Vacant slots are kept so their generations
    /// keep rejecting handles captured before the slot was freed.
    pub fn shrink_to_fit(&mut self) {
        self.slots.shrink_to_fit();
        self.free.shrink_to_fit();
    }

    /// Stores `node` and returns its `(index, generation)`.
    pub fn alloc(&mut self, node: N) -> (u32, u32) {
        if let Some(i) = self.free.pop() {
            let slot = &mut self.slots[i as usize];
            debug_assert!(slot.node.is_none());
            slot.node = Some(node);
            self.len += 1;
            return (i, slot.generation);
        }
        let i = u32::try_from(self.slots.len()).expect("arena index overflow");
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        self.len += 1;
        (i, 0)
    }

    /// Like [`alloc`](Self::alloc), but reports allocation failure instead of
    /// aborting.
    pub fn try_alloc(&mut self, node: N) -> Result<(u32, u32), TryReserveError> {
        if self.free.is_empty() {
            self.slots.try_reserve(1)?;
        }
        Ok(self.alloc(node))
    }

    /// Vacates slot `i` and returns its node. Panics if the slot is vacant.
    pub fn free(&mut self, i: u32) -> N {
        let slot = &mut self.slots[i as usize];
        let node = slot.node.take().expect("freeing a vacant arena slot");
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(i);
        self.len -= 1;
        node
    }

    pub fn get(&self, i: u32) -> Option<&N> {
        self.slots.get(i as usize).and_then(|s| s.node.as_ref())
    }

    /// `true` when slot `i` is occupied by the node allocated at `generation`.
    pub fn is_live(&self, i: u32, generation: u32) -> bool {
        self.slots
            .get(i as usize)
            .is_some_and(|s| s.node.is_some() && s.generation == generation)
    }

    /// Generation of an occupied slot.
    pub fn generation(&self, i: u32) -> Option<u32> {
        self.slots
            .get(i as usize)
            .filter(|s| s.node.is_some())
            .map(|s| s.generation)
    }

    /// Drops every node and forgets all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

impl<N> Index<u32> for Arena<N> {
    type Output = N;

    fn index(&self, i: u32) -> &N {
        match self.slots[i as usize].node.as_ref() {
            Some(node) => node,
            None => panic!("arena slot {i} is vacant"),
        }
    }
}

impl<N> IndexMut<u32> for Arena<N> {
    fn index_mut(&mut self, i: u32) -> &mut N {
        match self.slots[i as usize].node.as_mut() {
            Some(node) => node,
            None => panic!("arena slot {i} is vacant"),
        }
    }
}
