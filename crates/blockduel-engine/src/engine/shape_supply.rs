use serde::{Deserialize, Serialize};

use crate::core::shape::ShapeDefinition;

/// Index of a slot in the [`ShapeSupply`] arena.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct SlotId(usize);

impl SlotId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A tray occurrence of a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeInstance {
    definition: Option<ShapeDefinition>,
    active: bool,
    at_start_position: bool,
}

impl ShapeInstance {
    const UNUSED: Self = Self {
        definition: None,
        active: false,
        at_start_position: true,
    };

    #[must_use]
    pub fn definition(&self) -> Option<&ShapeDefinition> {
        self.definition.as_ref()
    }

    /// Still available to place.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sitting in the tray, neither dragged nor committed.
    #[must_use]
    pub fn is_at_start_position(&self) -> bool {
        self.at_start_position
    }

    fn is_loaded(&self) -> bool {
        self.definition.is_some()
    }

    fn is_available(&self) -> bool {
        self.is_loaded() && self.active && self.at_start_position
    }
}

/// Arena of reusable shape slots.
///
/// Slots are allocated lazily up to the largest batch seen and are reused by
/// later batches; they are never removed.
///
/// # Example
///
/// ```
/// use blockduel_engine::{ShapeDefinition, ShapeSupply, SlotId};
///
/// let dot = ShapeDefinition::parse("dot", &["#"]).unwrap();
/// let mut supply = ShapeSupply::new();
/// supply.refill(vec![dot.clone(), dot]);
/// assert_eq!(supply.remaining(), 2);
///
/// supply.select(SlotId::new(0));
/// supply.commit(SlotId::new(0));
/// assert!(!supply.all_exhausted());
///
/// supply.select(SlotId::new(1));
/// supply.commit(SlotId::new(1));
/// assert!(supply.all_exhausted());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeSupply {
    slots: Vec<ShapeInstance>,
    selected: Option<SlotId>,
}

impl ShapeSupply {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a new batch, one shape per slot, all active and at their start
    /// positions. Slots beyond the batch are left unused.
    ///
    /// Returns the number of shapes loaded.
    pub fn refill<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = ShapeDefinition>,
    {
        self.selected = None;
        let mut loaded = 0;
        for definition in batch {
            if loaded == self.slots.len() {
                self.slots.push(ShapeInstance::UNUSED);
            }
            self.slots[loaded] = ShapeInstance {
                definition: Some(definition),
                active: true,
                at_start_position: true,
            };
            loaded += 1;
        }
        self.slots[loaded..].fill(ShapeInstance::UNUSED);
        loaded
    }

    /// Unloads every slot.
    pub fn reset(&mut self) {
        self.selected = None;
        self.slots.fill(ShapeInstance::UNUSED);
    }

    /// Number of allocated slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn instance(&self, slot: SlotId) -> Option<&ShapeInstance> {
        self.slots.get(slot.0)
    }

    /// Loaded instances, by slot.
    pub fn instances(&self) -> impl Iterator<Item = (SlotId, &ShapeInstance)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, instance)| instance.is_loaded())
            .map(|(i, instance)| (SlotId(i), instance))
    }

    /// Shapes that can still be picked up from the tray.
    pub fn available(&self) -> impl Iterator<Item = (SlotId, &ShapeDefinition)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, instance)| instance.is_available())
            .filter_map(|(i, instance)| Some((SlotId(i), instance.definition.as_ref()?)))
    }

    /// Starts dragging a shape.
    ///
    /// A previously selected shape that was not committed goes back to its
    /// start position. Returns `false`, changing nothing, when the slot holds
    /// no active shape.
    pub fn select(&mut self, slot: SlotId) -> bool {
        if !self.slots.get(slot.0).is_some_and(|s| s.is_loaded() && s.active) {
            return false;
        }
        if let Some(previous) = self.selected.take() {
            self.slots[previous.0].at_start_position = true;
        }
        self.slots[slot.0].at_start_position = false;
        self.selected = Some(slot);
        true
    }

    #[must_use]
    pub fn selected(&self) -> Option<SlotId> {
        self.selected
    }

    #[must_use]
    pub fn selected_shape(&self) -> Option<(SlotId, &ShapeDefinition)> {
        let slot = self.selected?;
        Some((slot, self.slots[slot.0].definition.as_ref()?))
    }

    /// Puts a shape back in the tray.
    pub fn return_to_start(&mut self, slot: SlotId) {
        if let Some(instance) = self.slots.get_mut(slot.0) {
            instance.at_start_position = true;
        }
        if self.selected == Some(slot) {
            self.selected = None;
        }
    }

    /// Marks a shape as placed on the board.
    pub fn commit(&mut self, slot: SlotId) {
        if let Some(instance) = self.slots.get_mut(slot.0) {
            instance.active = false;
            instance.at_start_position = false;
        }
        if self.selected == Some(slot) {
            self.selected = None;
        }
    }

    /// Deactivates every shape that left its start position without being
    /// committed. Shapes in the tray stay interactable.
    ///
    /// Returns the deactivated slots.
    pub fn deactivate_off_start(&mut self) -> Vec<SlotId> {
        let mut deactivated = vec![];
        for (i, instance) in self.slots.iter_mut().enumerate() {
            if instance.is_loaded() && instance.active && !instance.at_start_position {
                instance.active = false;
                deactivated.push(SlotId(i));
            }
        }
        if self.selected.is_some_and(|slot| deactivated.contains(&slot)) {
            self.selected = None;
        }
        deactivated
    }

    /// Number of shapes still in the tray and active.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.slots.iter().filter(|s| s.is_available()).count()
    }

    /// `true` when no loaded shape is both in the tray and active.
    #[must_use]
    pub fn all_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
