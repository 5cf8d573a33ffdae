//! Static keyboard layout
//!
//! Physical arrangement of a 75% board: five logical rows, with row 5
//! spanning two physical lines (shift line, then the modifier/arrow
//! cluster). Placement is expressed in key units and converted to scene
//! units through [`KEY_PITCH`].
//!
//! Asset naming convention (the names an asset must author):
//! - keycaps: `keycap_{key}` surface plus `keycap_{key}_uv` overlay
//! - switches: one shared mesh per part, `switch_{part}`
//! - legends: `legend_{key}`
//! - structure: `plate`, `frame`, `port`, `legs`, `cable`

use glam::Vec3;

use crate::keyboard::handles::SwitchPart;

/// Centre-to-centre distance of two 1u keys: 19.05 mm in scene units.
pub const KEY_PITCH: f32 = 0.019_05;

/// Width of the widest line, in key units.
pub const BOARD_UNITS: f32 = 16.0;

/// Extra depth between the function row and the number row, in key units.
pub const FUNCTION_ROW_GAP: f32 = 0.25;

/// Height of the switch housings above the plate.
pub const SWITCH_HEIGHT: f32 = 0.005;

/// Height of the keycap containers above the plate.
pub const KEYCAP_HEIGHT: f32 = 0.0115;

/// Height of the legend overlay above the plate.
pub const LEGEND_HEIGHT: f32 = 0.0205;

// ============================================================================
// Rows
// ============================================================================

/// Logical keyboard row. Every key belongs to exactly one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Row {
    /// Function row.
    Row1,
    /// Number row.
    Row2,
    /// Top letter row.
    Row3,
    /// Home row.
    Row4,
    /// Bottom row plus the modifier/arrow cluster.
    Row5,
}

impl Row {
    pub const ALL: [Row; 5] = [Row::Row1, Row::Row2, Row::Row3, Row::Row4, Row::Row5];

    /// 1-based row number.
    #[must_use]
    pub fn number(self) -> usize {
        self as usize + 1
    }

    #[must_use]
    pub fn from_number(n: usize) -> Option<Row> {
        Row::ALL.get(n.checked_sub(1)?).copied()
    }
}

// ============================================================================
// Keys
// ============================================================================

/// One key on a physical line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeySpec {
    pub name: &'static str,
    /// Width in key units.
    pub width: f32,
    /// Empty space left of the key, in key units.
    pub gap_before: f32,
}

impl KeySpec {
    const fn key(name: &'static str) -> Self {
        Self {
            name,
            width: 1.0,
            gap_before: 0.0,
        }
    }

    const fn wide(self, width: f32) -> Self {
        Self { width, ..self }
    }

    const fn after_gap(self, gap_before: f32) -> Self {
        Self { gap_before, ..self }
    }

    /// Modifier-sized keys get the modifier keycap material.
    #[must_use]
    pub fn is_modifier(&self) -> bool {
        self.width > 1.0 || MODIFIER_KEYS.contains(&self.name)
    }

    /// Keys that carry no printed legend.
    #[must_use]
    pub fn has_legend(&self) -> bool {
        self.name != "space"
    }
}

const fn k(name: &'static str) -> KeySpec {
    KeySpec::key(name)
}

const ACCENT_KEYS: &[&str] = &["esc", "enter"];
const MODIFIER_KEYS: &[&str] = &[
    "alt_right",
    "fn",
    "ctrl_right",
    "arrow_up",
    "arrow_left",
    "arrow_down",
    "arrow_right",
    "delete",
    "page_up",
    "page_down",
    "home",
    "end",
];

const ROW1: &[KeySpec] = &[
    k("esc"),
    k("f1").after_gap(0.25),
    k("f2"),
    k("f3"),
    k("f4"),
    k("f5").after_gap(0.25),
    k("f6"),
    k("f7"),
    k("f8"),
    k("f9").after_gap(0.25),
    k("f10"),
    k("f11"),
    k("f12"),
    k("delete").after_gap(0.25),
];

const ROW2: &[KeySpec] = &[
    k("grave"),
    k("1"),
    k("2"),
    k("3"),
    k("4"),
    k("5"),
    k("6"),
    k("7"),
    k("8"),
    k("9"),
    k("0"),
    k("minus"),
    k("equal"),
    k("backspace").wide(2.0),
    k("page_up"),
];

const ROW3: &[KeySpec] = &[
    k("tab").wide(1.5),
    k("q"),
    k("w"),
    k("e"),
    k("r"),
    k("t"),
    k("y"),
    k("u"),
    k("i"),
    k("o"),
    k("p"),
    k("bracket_left"),
    k("bracket_right"),
    k("backslash").wide(1.5),
    k("page_down"),
];

const ROW4: &[KeySpec] = &[
    k("caps_lock").wide(1.75),
    k("a"),
    k("s"),
    k("d"),
    k("f"),
    k("g"),
    k("h"),
    k("j"),
    k("k"),
    k("l"),
    k("semicolon"),
    k("quote"),
    k("enter").wide(2.25),
    k("home"),
];

const ROW5_SHIFT_LINE: &[KeySpec] = &[
    k("shift_left").wide(2.25),
    k("z"),
    k("x"),
    k("c"),
    k("v"),
    k("b"),
    k("n"),
    k("m"),
    k("comma"),
    k("period"),
    k("slash"),
    k("shift_right").wide(1.75),
    k("arrow_up"),
    k("end"),
];

const ROW5_MODIFIER_LINE: &[KeySpec] = &[
    k("ctrl_left").wide(1.25),
    k("meta").wide(1.25),
    k("alt_left").wide(1.25),
    k("space").wide(6.25),
    k("alt_right"),
    k("fn"),
    k("ctrl_right"),
    k("arrow_left"),
    k("arrow_down"),
    k("arrow_right"),
];

// ============================================================================
// Layout
// ============================================================================

/// One logical row: its physical lines and sculpted-profile tilt.
#[derive(Debug, Clone, Copy)]
pub struct RowLayout {
    pub row: Row,
    pub lines: &'static [&'static [KeySpec]],
    /// Keycap profile tilt around X, in radians.
    pub tilt: f32,
}

impl RowLayout {
    pub fn keys(&self) -> impl Iterator<Item = &'static KeySpec> + '_ {
        self.lines.iter().flat_map(|line| line.iter())
    }
}

/// Computed placement of one key.
#[derive(Debug, Clone, Copy)]
pub struct KeyPlacement {
    pub spec: &'static KeySpec,
    pub row: Row,
    /// Physical line inside the row (row 5 has two).
    pub line: usize,
    /// Position relative to the row container, in scene units.
    pub local: Vec3,
}

/// The full board: rows in front-to-back order.
#[derive(Debug, Clone, Copy)]
pub struct KeyboardLayout {
    pub rows: &'static [RowLayout],
}

const STANDARD_ROWS: &[RowLayout] = &[
    RowLayout {
        row: Row::Row1,
        lines: &[ROW1],
        tilt: -0.12,
    },
    RowLayout {
        row: Row::Row2,
        lines: &[ROW2],
        tilt: -0.08,
    },
    RowLayout {
        row: Row::Row3,
        lines: &[ROW3],
        tilt: -0.04,
    },
    RowLayout {
        row: Row::Row4,
        lines: &[ROW4],
        tilt: 0.0,
    },
    RowLayout {
        row: Row::Row5,
        lines: &[ROW5_SHIFT_LINE, ROW5_MODIFIER_LINE],
        tilt: 0.06,
    },
];

impl KeyboardLayout {
    /// The 75% layout the asset naming convention is authored against.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            rows: STANDARD_ROWS,
        }
    }

    /// Every key name, rows in order.
    pub fn key_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rows.iter().flat_map(RowLayout::keys).map(|k| k.name)
    }

    #[must_use]
    pub fn row_of(&self, key: &str) -> Option<Row> {
        self.rows
            .iter()
            .find(|r| r.keys().any(|k| k.name == key))
            .map(|r| r.row)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.row_of(key).is_some()
    }

    /// Origin of a row container, relative to the keycap or switch section.
    ///
    /// Rows advance towards +Z; the function row is separated from the rest
    /// by [`FUNCTION_ROW_GAP`].
    #[must_use]
    pub fn row_origin(&self, row: Row) -> Vec3 {
        let mut depth_units = 0.0;
        for r in self.rows {
            if r.row == row {
                break;
            }
            depth_units += r.lines.len() as f32;
            if r.row == Row::Row1 {
                depth_units += FUNCTION_ROW_GAP;
            }
        }
        let half_depth = self.depth_units() / 2.0;
        Vec3::new(0.0, 0.0, (depth_units + 0.5 - half_depth) * KEY_PITCH)
    }

    /// Total depth in key units, gaps included.
    #[must_use]
    pub fn depth_units(&self) -> f32 {
        let lines: usize = self.rows.iter().map(|r| r.lines.len()).sum();
        lines as f32 + FUNCTION_ROW_GAP
    }

    /// Placements of the keys in `row`, relative to its row container.
    #[must_use]
    pub fn placements(&self, row: Row) -> Vec<KeyPlacement> {
        let Some(row_layout) = self.rows.iter().find(|r| r.row == row) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for (line, keys) in row_layout.lines.iter().enumerate() {
            let mut cursor = 0.0;
            for spec in *keys {
                cursor += spec.gap_before;
                let center_units = cursor + spec.width / 2.0 - BOARD_UNITS / 2.0;
                out.push(KeyPlacement {
                    spec,
                    row,
                    line,
                    local: Vec3::new(center_units * KEY_PITCH, 0.0, line as f32 * KEY_PITCH),
                });
                cursor += spec.width;
            }
        }
        out
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Naming
// ============================================================================

pub const MAIN_GROUP: &str = "keyboard";
pub const KEYBOARD_STRUCTURE: &str = "keyboard_structure";
pub const PORT_ASSEMBLY: &str = "port_assembly";
pub const SWITCHES: &str = "switches";
pub const KEYCAPS: &str = "keycaps";
pub const EXTRUDE: &str = "extrude";

/// Structural meshes: (node and mesh name, material name, position).
pub const STRUCTURE_PARTS: &[(&str, &str, Vec3)] = &[
    ("plate", "plate", Vec3::new(0.0, 0.0, 0.0)),
    ("frame", "frame", Vec3::new(0.0, -0.004, 0.0)),
];

/// Port assembly meshes, relative to the assembly group.
pub const PORT_PARTS: &[(&str, &str, Vec3)] = &[
    ("port", "metal", Vec3::new(0.0, 0.0, 0.0)),
    ("legs", "rubber", Vec3::new(0.0, -0.009, 0.055)),
    ("cable", "cable", Vec3::new(0.0, 0.0, -0.012)),
];

/// Back-left corner of the frame, where the USB port sits.
pub const PORT_ASSEMBLY_POSITION: Vec3 = Vec3::new(-0.118, -0.006, -0.062);

pub const LEGEND_MATERIAL: &str = "legend";
pub const KEYCAP_UV_MATERIAL: &str = "keycap_uv";

#[must_use]
pub fn switch_row_name(row: Row) -> String {
    format!("switches_row{}", row.number())
}

#[must_use]
pub fn keycap_row_name(row: Row) -> String {
    format!("keycaps_row{}", row.number())
}

#[must_use]
pub fn keycap_name(key: &str) -> String {
    format!("keycap_{key}")
}

#[must_use]
pub fn keycap_overlay_name(key: &str) -> String {
    format!("keycap_{key}_uv")
}

#[must_use]
pub fn switch_name(key: &str) -> String {
    format!("switch_{key}")
}

/// Node name of one switch part instance.
#[must_use]
pub fn switch_part_node_name(key: &str, part: SwitchPart) -> String {
    format!("switch_{key}_{}", part.as_str())
}

/// Shared mesh and material name of a switch part.
#[must_use]
pub fn switch_part_asset_name(part: SwitchPart) -> String {
    format!("switch_{}", part.as_str())
}

/// Offset of a switch part inside its switch group.
#[must_use]
pub fn switch_part_offset(part: SwitchPart) -> Vec3 {
    match part {
        SwitchPart::Keycap => Vec3::new(0.0, KEYCAP_HEIGHT - SWITCH_HEIGHT, 0.0),
        SwitchPart::Stem => Vec3::new(0.0, 0.0035, 0.0),
        SwitchPart::TopHousing => Vec3::new(0.0, 0.0015, 0.0),
        SwitchPart::BottomHousing => Vec3::new(0.0, -0.002, 0.0),
        SwitchPart::CenterMast => Vec3::new(0.0, -0.0045, 0.0),
        SwitchPart::MetalSpring => Vec3::ZERO,
        SwitchPart::Ml1 => Vec3::new(-0.003, -0.001, 0.002),
        SwitchPart::Ml2 => Vec3::new(0.003, -0.001, 0.002),
    }
}

#[must_use]
pub fn legend_name(key: &str) -> String {
    format!("legend_{key}")
}

/// Keycap surface material for a key.
#[must_use]
pub fn keycap_material(spec: &KeySpec) -> &'static str {
    if ACCENT_KEYS.contains(&spec.name) {
        "keycap_accent"
    } else if spec.is_modifier() {
        "keycap_modifier"
    } else {
        "keycap_alpha"
    }
}
