//! Game Events
//!
//! The world reports what happened during a frame through typed queues
//! instead of calling into the UI. The app drains them after each frame to
//! update the HUD and show toasts:
//!
//! 1. Collision pass sees runner touching a coin → `collision` + `item_collected`
//! 2. App reads `item_collected` → refreshes the score display
//! 3. Runner falls out of play → `life_lost`, app flashes the lives counter
//!
//! Queues that nobody drains are cleared by `clear_all`.

use super::entity::SpriteId;
use super::sprite::SpriteKind;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all game events.
#[derive(Debug, Default)]
pub struct Events {
    /// Two sprites' hitboxes overlapped
    pub collision: EventQueue<CollisionEvent>,

    /// Runner picked up a coin or jewel
    pub item_collected: EventQueue<ItemCollectedEvent>,

    /// Runner fell out of the playfield
    pub life_lost: EventQueue<LifeLostEvent>,

    /// Runner touched an enemy
    pub game_over: EventQueue<GameOverEvent>,

    /// Resume countdown tick (3, 2, 1)
    pub countdown: EventQueue<CountdownEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all event queues.
    pub fn clear_all(&mut self) {
        self.collision.clear();
        self.item_collected.clear();
        self.life_lost.clear();
        self.game_over.clear();
        self.countdown.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.collision.is_empty()
            && self.item_collected.is_empty()
            && self.life_lost.is_empty()
            && self.game_over.is_empty()
            && self.countdown.is_empty()
    }
}

// =============================================================================
// Event Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Sprite with the collide behavior
    pub collider: SpriteId,
    pub other: SpriteId,
    pub other_kind: SpriteKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemCollectedEvent {
    pub item: SpriteId,
    /// Copied since the item is hidden afterwards
    pub kind: SpriteKind,
    pub value: u32,
    /// Score after the pickup
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeLostEvent {
    pub lives_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOverEvent {
    pub score: u32,
    /// What the runner ran into
    pub culprit: SpriteKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownEvent {
    pub remaining: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue() {
        let mut queue: EventQueue<i32> = EventQueue::new();

        queue.send(1);
        queue.send(2);
        queue.send(3);

        assert_eq!(queue.len(), 3);

        let collected: Vec<_> = queue.drain().collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_events_container() {
        let mut events = Events::new();

        events.item_collected.send(ItemCollectedEvent {
            item: SpriteId::default(),
            kind: SpriteKind::Coin,
            value: 50,
            score: 50,
        });
        events.countdown.send(CountdownEvent { remaining: 3 });

        assert_eq!(events.item_collected.len(), 1);
        assert!(!events.is_empty());

        events.clear_all();
        assert!(events.is_empty());
    }
}
