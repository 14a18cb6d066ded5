// swapman/src/damage.rs
//
//! Damage rectangles, the bounded per-frame damage history, and stale-content accounting for
//! reused framebuffers.

use crate::egl::types::EGLint;

use std::collections::VecDeque;

/// How many per-frame damage rectangles are remembered for buffer-age reconstruction.
pub(crate) const DAMAGE_HISTORY_DEPTH: usize = 10;

/// Buffer age assumed when the driver can't report one, or reports 0. Old enough to pull most
/// of the recorded history into the existing-damage union.
pub(crate) const FALLBACK_BUFFER_AGE: u32 = 4;

/// How many framebuffer ids can hold an existing-damage entry at once. Sized to the deepest
/// swap chains in use.
pub(crate) const EXISTING_DAMAGE_SLOTS: usize = 4;

/// An axis-aligned rectangle in drawing-surface coordinates: origin top-left, Y increasing
/// downward, right and bottom exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl DamageRect {
    #[inline]
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> DamageRect {
        DamageRect { left, top, right, bottom }
    }

    /// The full rectangle of a surface of the given size.
    #[inline]
    pub fn of_size(width: i32, height: i32) -> DamageRect {
        DamageRect { left: 0, top: 0, right: width, bottom: height }
    }

    /// The bounding box of both rectangles.
    #[inline]
    pub fn union(&self, other: &DamageRect) -> DamageRect {
        DamageRect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Converts to the `{x, y, width, height}` layout of the native swap APIs, whose origin is
    /// bottom-left with Y increasing upward. The caller supplies the surface's *current*
    /// height.
    pub(crate) fn to_native(&self, surface_height: i32) -> [EGLint; 4] {
        [
            self.left,
            surface_height - self.bottom,
            self.right - self.left,
            self.bottom - self.top,
        ]
    }

    #[allow(dead_code)]
    pub(crate) fn from_native(rect: [EGLint; 4], surface_height: i32) -> DamageRect {
        DamageRect {
            left: rect[0],
            top: surface_height - rect[1] - rect[3],
            right: rect[0] + rect[2],
            bottom: surface_height - rect[1],
        }
    }
}

/// The most recent per-frame damage rectangles, most recent last, bounded at
/// [`DAMAGE_HISTORY_DEPTH`] entries with FIFO eviction.
pub(crate) struct DamageHistory {
    entries: VecDeque<DamageRect>,
}

impl DamageHistory {
    pub(crate) fn new() -> DamageHistory {
        DamageHistory {
            entries: VecDeque::with_capacity(DAMAGE_HISTORY_DEPTH),
        }
    }

    pub(crate) fn push(&mut self, rect: DamageRect) {
        self.entries.push_back(rect);
        if self.entries.len() > DAMAGE_HISTORY_DEPTH {
            self.entries.pop_front();
        }
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> impl Iterator<Item = &DamageRect> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reconstructs the damage already present in a reused buffer of the given age.
    ///
    /// An age of 0 or 1 carries no reuse information, so the whole surface must be treated as
    /// stale. Otherwise the buffer missed the last `age - 1` presented frames, and their
    /// recorded damage rectangles are unioned. When the history holds fewer entries than that,
    /// the walk stops early and the result covers only the recorded frames.
    pub(crate) fn existing_damage_for_age(&self, age: u32, full_surface: DamageRect) -> DamageRect {
        if age <= 1 {
            return full_surface;
        }
        let mut taken = self.entries.iter().rev().take(age as usize - 1);
        let first = match taken.next() {
            Some(rect) => *rect,
            None => return full_surface,
        };
        taken.fold(first, |damage, rect| damage.union(rect))
    }
}

/// Existing-damage results handed out to the host, keyed by framebuffer id.
///
/// One entry per framebuffer id in flight. Re-querying an id replaces its entry; a new frame
/// targeting an id releases it. The table is a fixed set of slots with round-robin eviction
/// once every slot is occupied, so ids that fall out of rotation cannot accumulate.
pub(crate) struct ExistingDamage {
    slots: [Option<(u32, DamageRect)>; EXISTING_DAMAGE_SLOTS],
    next_eviction: usize,
}

impl ExistingDamage {
    pub(crate) fn new() -> ExistingDamage {
        ExistingDamage {
            slots: [None; EXISTING_DAMAGE_SLOTS],
            next_eviction: 0,
        }
    }

    pub(crate) fn record(&mut self, fbo_id: u32, rect: DamageRect) {
        if let Some(slot) = self.slot_for(fbo_id) {
            *slot = Some((fbo_id, rect));
            return;
        }
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some((fbo_id, rect));
            return;
        }
        self.slots[self.next_eviction] = Some((fbo_id, rect));
        self.next_eviction = (self.next_eviction + 1) % EXISTING_DAMAGE_SLOTS;
    }

    pub(crate) fn release(&mut self, fbo_id: u32) {
        if let Some(slot) = self.slot_for(fbo_id) {
            *slot = None;
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, fbo_id: u32) -> Option<DamageRect> {
        self.slots
            .iter()
            .flatten()
            .find(|(id, _)| *id == fbo_id)
            .map(|(_, rect)| *rect)
    }

    fn slot_for(&mut self, fbo_id: u32) -> Option<&mut Option<(u32, DamageRect)>> {
        self.slots
            .iter_mut()
            .find(|slot| matches!(slot, Some((id, _)) if *id == fbo_id))
    }
}
