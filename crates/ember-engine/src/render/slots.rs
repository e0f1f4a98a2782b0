//! Per-batch texture slot table.

use crate::device::TextureId;

/// Fixed-capacity ordered table assigning small slot indices to texture
/// handles for the duration of one batch.
///
/// The table never flushes anything itself; the accumulator checks
/// [`is_full`](Self::is_full) and flushes before inserting. Slot indices are
/// stable only within one batch; `clear` invalidates all of them.
#[derive(Debug)]
pub(super) struct TextureSlots {
    slots: Vec<TextureId>,
    capacity: usize,
}

impl TextureSlots {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Slot index of `texture` if it is already live in this batch.
    pub fn find(&self, texture: TextureId) -> Option<u32> {
        // Linear scan; the table is at most a few dozen entries.
        self.slots.iter().position(|&t| t == texture).map(|i| i as u32)
    }

    /// Appends `texture` at the next free index; `None` when full.
    ///
    /// Callers must `find` first: inserting a handle that is already live
    /// would break the no-duplicates invariant.
    pub fn insert(&mut self, texture: TextureId) -> Option<u32> {
        debug_assert!(
            self.find(texture).is_none(),
            "texture {texture:?} already has a slot"
        );
        if self.is_full() {
            return None;
        }
        self.slots.push(texture);
        Some((self.slots.len() - 1) as u32)
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Live handles in slot order, for binding slot N to texture unit N.
    pub fn iter(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.slots.iter().copied()
    }
}
