//! Index-addressed arena backing the LFU entry lists.
//!
//! Entries live in a `Vec<Option<T>>` and are referenced by [`SlotId`]. Freed
//! slots go on a free list and are reused by the next insert, so ids stay
//! small and stable while an entry is resident. Bucket lists link entries by
//! `SlotId` instead of pointers.

/// Stable handle to an occupied arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Slot storage with free-list reuse.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value`, reusing the most recently freed slot if there is one.
    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    /// Frees the slot and returns its value; `None` if already vacant.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value and forgets all slot ids.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    /// Reserves room for at least `additional` more occupied slots.
    pub fn reserve(&mut self, additional: usize) {
        let spare = self.free_list.len();
        self.slots.reserve(additional.saturating_sub(spare));
    }

    /// Occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (SlotId(idx), value)))
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
