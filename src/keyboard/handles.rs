//! Handle registry
//!
//! The composer reports every node it wants exposed as a `(Slot, NodeHandle)`
//! binding. [`HandleTable::from_bindings`] folds those into an immutable
//! table, and [`KeyboardHandles`] publishes it: the container is created once
//! per rig and keeps its identity across re-renders, only the table inside is
//! swapped.

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;

use crate::keyboard::layout::Row;
use crate::scene::NodeHandle;

// ============================================================================
// Slots
// ============================================================================

/// One part of a key switch. `Keycap` is the keycap surface above the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchPart {
    Keycap,
    Stem,
    TopHousing,
    BottomHousing,
    CenterMast,
    MetalSpring,
    Ml1,
    Ml2,
}

impl SwitchPart {
    /// Parts that live under a switch group (the keycap lives under its row).
    pub const SWITCH_BODY: [SwitchPart; 7] = [
        SwitchPart::Stem,
        SwitchPart::TopHousing,
        SwitchPart::BottomHousing,
        SwitchPart::CenterMast,
        SwitchPart::MetalSpring,
        SwitchPart::Ml1,
        SwitchPart::Ml2,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SwitchPart::Keycap => "keycap",
            SwitchPart::Stem => "stem",
            SwitchPart::TopHousing => "top_housing",
            SwitchPart::BottomHousing => "bottom_housing",
            SwitchPart::CenterMast => "center_mast",
            SwitchPart::MetalSpring => "metal_spring",
            SwitchPart::Ml1 => "ml1",
            SwitchPart::Ml2 => "ml2",
        }
    }
}

/// A named place in the handle table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    MainGroup,
    KeyboardStructure,
    Plate,
    Frame,
    SwitchRow(Row),
    KeycapRow(Row),
    Key(String),
    SwitchComponent(String, SwitchPart),
    ExtrudeGroup,
}

// ============================================================================
// Table
// ============================================================================

/// One handle per row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowHandles {
    pub row1: Option<NodeHandle>,
    pub row2: Option<NodeHandle>,
    pub row3: Option<NodeHandle>,
    pub row4: Option<NodeHandle>,
    pub row5: Option<NodeHandle>,
}

impl RowHandles {
    #[must_use]
    pub fn get(&self, row: Row) -> Option<NodeHandle> {
        *self.slot(row)
    }

    fn slot(&self, row: Row) -> &Option<NodeHandle> {
        match row {
            Row::Row1 => &self.row1,
            Row::Row2 => &self.row2,
            Row::Row3 => &self.row3,
            Row::Row4 => &self.row4,
            Row::Row5 => &self.row5,
        }
    }

    fn slot_mut(&mut self, row: Row) -> &mut Option<NodeHandle> {
        match row {
            Row::Row1 => &mut self.row1,
            Row::Row2 => &mut self.row2,
            Row::Row3 => &mut self.row3,
            Row::Row4 => &mut self.row4,
            Row::Row5 => &mut self.row5,
        }
    }

    /// Bound rows in order.
    pub fn iter(&self) -> impl Iterator<Item = (Row, NodeHandle)> + '_ {
        Row::ALL.into_iter().filter_map(|r| self.get(r).map(|h| (r, h)))
    }
}

/// Handles to the parts of one key switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchComponents {
    pub keycap: Option<NodeHandle>,
    pub stem: Option<NodeHandle>,
    pub top_housing: Option<NodeHandle>,
    pub bottom_housing: Option<NodeHandle>,
    pub center_mast: Option<NodeHandle>,
    pub metal_spring: Option<NodeHandle>,
    pub ml1: Option<NodeHandle>,
    pub ml2: Option<NodeHandle>,
}

impl SwitchComponents {
    #[must_use]
    pub fn get(&self, part: SwitchPart) -> Option<NodeHandle> {
        match part {
            SwitchPart::Keycap => self.keycap,
            SwitchPart::Stem => self.stem,
            SwitchPart::TopHousing => self.top_housing,
            SwitchPart::BottomHousing => self.bottom_housing,
            SwitchPart::CenterMast => self.center_mast,
            SwitchPart::MetalSpring => self.metal_spring,
            SwitchPart::Ml1 => self.ml1,
            SwitchPart::Ml2 => self.ml2,
        }
    }

    fn slot_mut(&mut self, part: SwitchPart) -> &mut Option<NodeHandle> {
        match part {
            SwitchPart::Keycap => &mut self.keycap,
            SwitchPart::Stem => &mut self.stem,
            SwitchPart::TopHousing => &mut self.top_housing,
            SwitchPart::BottomHousing => &mut self.bottom_housing,
            SwitchPart::CenterMast => &mut self.center_mast,
            SwitchPart::MetalSpring => &mut self.metal_spring,
            SwitchPart::Ml1 => &mut self.ml1,
            SwitchPart::Ml2 => &mut self.ml2,
        }
    }
}

/// Immutable snapshot of every exposed handle from one build.
///
/// All slots start empty. `switch_components` is always present; it stays
/// empty unless the capability was enabled for the build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandleTable {
    pub main_group: Option<NodeHandle>,
    pub keyboard_structure: Option<NodeHandle>,
    pub plate: Option<NodeHandle>,
    pub frame: Option<NodeHandle>,
    pub switches: RowHandles,
    pub keycaps: RowHandles,
    pub keys: FxHashMap<String, NodeHandle>,
    pub switch_components: FxHashMap<String, SwitchComponents>,
    pub extrude_group: Option<NodeHandle>,
    switch_components_enabled: bool,
}

impl HandleTable {
    /// Folds composer bindings into a table.
    ///
    /// A slot is bound at most once: a second binding for the same slot is
    /// dropped and logged.
    pub fn from_bindings<I>(bindings: I, switch_components_enabled: bool) -> Self
    where
        I: IntoIterator<Item = (Slot, NodeHandle)>,
    {
        let mut table = HandleTable {
            switch_components_enabled,
            ..Default::default()
        };

        for (slot, handle) in bindings {
            if !table.bind(&slot, handle) {
                log::error!("Slot {slot:?} bound twice in one build, keeping the first binding");
            }
        }
        table
    }

    /// Returns `false` if the slot was already bound.
    fn bind(&mut self, slot: &Slot, handle: NodeHandle) -> bool {
        let target = match slot {
            Slot::MainGroup => &mut self.main_group,
            Slot::KeyboardStructure => &mut self.keyboard_structure,
            Slot::Plate => &mut self.plate,
            Slot::Frame => &mut self.frame,
            Slot::SwitchRow(row) => self.switches.slot_mut(*row),
            Slot::KeycapRow(row) => self.keycaps.slot_mut(*row),
            Slot::ExtrudeGroup => &mut self.extrude_group,
            Slot::Key(key) => {
                if self.keys.contains_key(key) {
                    return false;
                }
                self.keys.insert(key.clone(), handle);
                return true;
            }
            Slot::SwitchComponent(key, part) => {
                if !self.switch_components_enabled {
                    log::debug!("Switch component binding for '{key}' ignored: capability disabled");
                    return true;
                }
                self.switch_components.entry(key.clone()).or_default().slot_mut(*part)
            }
        };

        if target.is_some() {
            return false;
        }
        *target = Some(handle);
        true
    }

    /// Whether per-switch-part handles were requested for this build.
    ///
    /// Distinguishes "capability disabled" from "enabled but nothing bound".
    #[inline]
    #[must_use]
    pub fn switch_components_available(&self) -> bool {
        self.switch_components_enabled
    }

    /// Direct key lookup. Keys that were not configured resolve to `None`.
    #[must_use]
    pub fn key(&self, name: &str) -> Option<NodeHandle> {
        self.keys.get(name).copied()
    }

    #[must_use]
    pub fn switch_component(&self, key: &str, part: SwitchPart) -> Option<NodeHandle> {
        self.switch_components.get(key)?.get(part)
    }

    /// Number of bound slots.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        let singles = [
            self.main_group,
            self.keyboard_structure,
            self.plate,
            self.frame,
            self.extrude_group,
        ];
        let parts: usize = self
            .switch_components
            .values()
            .map(|c| {
                [SwitchPart::Keycap]
                    .into_iter()
                    .chain(SwitchPart::SWITCH_BODY)
                    .filter(|&p| c.get(p).is_some())
                    .count()
            })
            .sum();
        singles.iter().flatten().count()
            + self.switches.iter().count()
            + self.keycaps.iter().count()
            + self.keys.len()
            + parts
    }
}

// ============================================================================
// Published container
// ============================================================================

struct HandleState {
    table: HandleTable,
    mounted: bool,
    generation: u64,
}

/// Stable, shared view of a rig's handles.
///
/// One instance exists per [`KeyboardRig`] for its whole life, so callers may
/// hold the `Arc` across re-renders and always read the current build. Every
/// read goes through one lock, so a reader sees either the previous table or
/// the next one in full.
///
/// [`KeyboardRig`]: crate::keyboard::KeyboardRig
pub struct KeyboardHandles {
    state: RwLock<HandleState>,
}

impl KeyboardHandles {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HandleState {
                table: HandleTable::default(),
                mounted: false,
                generation: 0,
            }),
        }
    }

    /// Swaps in a fully built table.
    pub fn publish(&self, table: HandleTable) {
        let mut state = self.state.write();
        state.table = table;
        state.mounted = true;
        state.generation += 1;
    }

    /// Invalidates every slot at once.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.table = HandleTable::default();
        state.mounted = false;
        state.generation += 1;
    }

    /// Read access to the current table. Do not hold across a render.
    pub fn table(&self) -> MappedRwLockReadGuard<'_, HandleTable> {
        RwLockReadGuard::map(self.state.read(), |s| &s.table)
    }

    /// Owned copy of the current table.
    #[must_use]
    pub fn snapshot(&self) -> HandleTable {
        self.state.read().table.clone()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.read().mounted
    }

    /// Incremented by every publish and clear.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    // --- Slot accessors ---

    #[must_use]
    pub fn main_group(&self) -> Option<NodeHandle> {
        self.table().main_group
    }

    #[must_use]
    pub fn keyboard_structure(&self) -> Option<NodeHandle> {
        self.table().keyboard_structure
    }

    #[must_use]
    pub fn plate(&self) -> Option<NodeHandle> {
        self.table().plate
    }

    #[must_use]
    pub fn frame(&self) -> Option<NodeHandle> {
        self.table().frame
    }

    #[must_use]
    pub fn switch_row(&self, row: Row) -> Option<NodeHandle> {
        self.table().switches.get(row)
    }

    #[must_use]
    pub fn keycap_row(&self, row: Row) -> Option<NodeHandle> {
        self.table().keycaps.get(row)
    }

    #[must_use]
    pub fn key(&self, name: &str) -> Option<NodeHandle> {
        self.table().key(name)
    }

    #[must_use]
    pub fn switch_components(&self, key: &str) -> Option<SwitchComponents> {
        self.table().switch_components.get(key).copied()
    }

    #[must_use]
    pub fn extrude_group(&self) -> Option<NodeHandle> {
        self.table().extrude_group
    }
}

impl Default for KeyboardHandles {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyboardHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("KeyboardHandles")
            .field("mounted", &state.mounted)
            .field("generation", &state.generation)
            .field("table", &state.table)
            .finish()
    }
}
