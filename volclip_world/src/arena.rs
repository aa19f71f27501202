use serde::{Deserialize, Serialize};

use volclip_ids::ActorID;

use crate::Actor;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    actor: Option<Actor>,
}

/// Generational storage for actors. Index 0 is nil, so slot `i` is ID
/// index `i + 1`; freeing a slot bumps its generation so stale IDs miss.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActorArena {
    slots: Vec<Slot>,
    #[serde(default)]
    free: Vec<u32>,
}

impl ActorArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor: Actor) -> ActorID {
        let idx = match self.free.pop() {
            Some(idx) => idx as usize,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[idx];
        slot.actor = Some(actor);
        ActorID::new(idx as u32 + 1, slot.generation)
    }

    fn slot_index(&self, id: ActorID) -> Option<usize> {
        if id.is_nil() {
            return None;
        }
        let idx = id.slot() as usize - 1;
        let slot = self.slots.get(idx)?;
        (slot.generation == id.generation() && slot.actor.is_some()).then_some(idx)
    }

    #[inline]
    pub fn get(&self, id: ActorID) -> Option<&Actor> {
        let idx = self.slot_index(id)?;
        self.slots[idx].actor.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: ActorID) -> Option<&mut Actor> {
        let idx = self.slot_index(id)?;
        self.slots[idx].actor.as_mut()
    }

    /// Removes an actor, freeing its slot for reuse under a new generation.
    pub fn remove(&mut self, id: ActorID) -> Option<Actor> {
        let idx = self.slot_index(id)?;
        let slot = &mut self.slots[idx];
        let out = slot.actor.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(idx as u32);
        Some(out)
    }

    #[inline]
    pub fn contains_key(&self, id: ActorID) -> bool {
        self.slot_index(id).is_some()
    }

    /// Live actors in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorID, &Actor)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.actor
                .as_ref()
                .map(|actor| (ActorID::new(idx as u32 + 1, slot.generation), actor))
        })
    }
}
