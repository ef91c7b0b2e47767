//! Sprite Handles
//!
//! Sprites live in arena slots and are referred to by generational ids.
//! Projectiles come and go every second; when an expired bomb's slot is
//! reused, the generation bump keeps stale ids (e.g. in a queued collision)
//! from resolving to the new occupant.

/// Handle to a sprite stored in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId {
    index: u32,
    generation: u32,
}

impl SpriteId {
    /// Placeholder for sprites that have not been inserted yet.
    pub const DETACHED: SpriteId = SpriteId { index: u32::MAX, generation: 0 };

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the world arena.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_detached(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for SpriteId {
    fn default() -> Self {
        SpriteId::DETACHED
    }
}

/// Hands out sprite ids and recycles freed slots.
#[derive(Debug, Default)]
pub struct SpriteAllocator {
    generations: Vec<u32>,
    /// Freed slots, reused LIFO
    free: Vec<u32>,
    alive: u32,
}

impl SpriteAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> SpriteId {
        self.alive += 1;

        if let Some(index) = self.free.pop() {
            // Generation was bumped when the slot was freed
            SpriteId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            SpriteId::new(index, 0)
        }
    }

    /// Free a sprite slot. Returns false for stale or detached ids.
    pub fn free(&mut self, id: SpriteId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.generations[id.index as usize] += 1;
        self.free.push(id.index);
        self.alive -= 1;
        true
    }

    pub fn is_alive(&self, id: SpriteId) -> bool {
        if id.is_detached() {
            return false;
        }
        self.generations
            .get(id.index as usize)
            .is_some_and(|&generation| generation == id.generation)
    }

    pub fn alive_count(&self) -> u32 {
        self.alive
    }

    /// Number of slots ever handed out.
    pub fn slot_count(&self) -> usize {
        self.generations.len()
    }
}
