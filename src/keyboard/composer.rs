//! Scene Composer
//!
//! Builds the keyboard hierarchy from resolved asset names and the static
//! layout. The output depends only on its inputs, so every render produces
//! an equivalent tree.
//!
//! ```text
//! keyboard
//! ├── keyboard_structure
//! │   ├── plate
//! │   ├── frame
//! │   └── port_assembly (port, legs, cable)
//! ├── switches
//! │   └── switches_row{1..5}
//! │       └── switch_{key} (switch_{key}_{part})
//! ├── keycaps
//! │   └── keycaps_row{1..5}
//! │       ├── keycap_{key}
//! │       └── keycap_{key}_uv
//! └── extrude
//!     └── legend_{key}
//! ```
//!
//! Groups never depend on assets and are always built. A mesh instance whose
//! mesh or material is missing from the asset is skipped and reported.

use std::fmt;

use glam::Vec3;

use crate::assets::NamedAssets;
use crate::keyboard::handles::{Slot, SwitchPart};
use crate::keyboard::layout::{self, KeyPlacement, KeyboardLayout};
use crate::keyboard::settings::RigSettings;
use crate::resources::Mesh;
use crate::scene::{NodeHandle, Scene, Transform};

/// Overlays draw after the keycap surface they double.
const OVERLAY_RENDER_ORDER: i32 = 1;

// ============================================================================
// Output
// ============================================================================

/// Which asset a skipped mesh instance was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingAsset {
    Mesh(String),
    Material(String),
}

impl fmt::Display for MissingAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingAsset::Mesh(name) => write!(f, "mesh '{name}'"),
            MissingAsset::Material(name) => write!(f, "material '{name}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNode {
    pub node: String,
    pub missing: MissingAsset,
}

/// Mesh instances that could not be built.
#[derive(Debug, Clone, Default)]
pub struct ComposeReport {
    skipped: Vec<SkippedNode>,
}

impl ComposeReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    #[must_use]
    pub fn skipped(&self) -> &[SkippedNode] {
        &self.skipped
    }

    #[must_use]
    pub fn was_skipped(&self, node: &str) -> bool {
        self.skipped.iter().any(|s| s.node == node)
    }
}

/// Result of one composition.
#[derive(Debug)]
pub struct Composition {
    /// The `keyboard` group.
    pub root: NodeHandle,
    /// Slots to expose, in document order.
    pub bindings: Vec<(Slot, NodeHandle)>,
    pub report: ComposeReport,
}

// ============================================================================
// Composer
// ============================================================================

/// Builds the keyboard under `parent` (or as a scene root).
pub fn compose(
    scene: &mut Scene,
    parent: Option<NodeHandle>,
    assets: &NamedAssets,
    board: &KeyboardLayout,
    settings: &RigSettings,
) -> Composition {
    let mut composer = Composer {
        scene,
        assets,
        settings,
        bindings: Vec::new(),
        report: ComposeReport::default(),
    };

    let root = composer.group(layout::MAIN_GROUP, parent, Transform::new());
    composer.bind(Slot::MainGroup, root);

    composer.structure(root);
    composer.switches(root, board);
    composer.keycaps(root, board);
    composer.legends(root, board);

    let Composer {
        bindings, report, ..
    } = composer;

    if !report.is_complete() {
        log::warn!(
            "'{}': {} mesh instance(s) skipped, assets missing",
            assets.resource_id(),
            report.skipped.len()
        );
    }

    Composition {
        root,
        bindings,
        report,
    }
}

struct Composer<'a> {
    scene: &'a mut Scene,
    assets: &'a NamedAssets,
    settings: &'a RigSettings,
    bindings: Vec<(Slot, NodeHandle)>,
    report: ComposeReport,
}

impl Composer<'_> {
    fn bind(&mut self, slot: Slot, handle: NodeHandle) {
        self.bindings.push((slot, handle));
    }

    fn group(&mut self, name: &str, parent: Option<NodeHandle>, transform: Transform) -> NodeHandle {
        let builder = self.scene.build_node(name).with_transform(transform);
        match parent {
            Some(p) => builder.with_parent(p).build(),
            None => builder.build(),
        }
    }

    /// Builds a mesh instance, or records it as skipped.
    fn mesh_instance(
        &mut self,
        node: &str,
        mesh: &str,
        material: &str,
        parent: NodeHandle,
        transform: Transform,
    ) -> Option<NodeHandle> {
        let Some(geometry) = self.assets.mesh(mesh) else {
            self.skip(node, MissingAsset::Mesh(mesh.to_string()));
            return None;
        };
        let Some(material_handle) = self.assets.material(material) else {
            self.skip(node, MissingAsset::Material(material.to_string()));
            return None;
        };

        let component = Mesh::new(geometry, material_handle)
            .with_name(node)
            .with_shadows(self.settings.cast_shadows, self.settings.receive_shadows);

        Some(
            self.scene
                .build_node(node)
                .with_parent(parent)
                .with_transform(transform)
                .with_mesh(component)
                .build(),
        )
    }

    fn skip(&mut self, node: &str, missing: MissingAsset) {
        log::debug!("Skipping '{node}': {missing} not found");
        self.report.skipped.push(SkippedNode {
            node: node.to_string(),
            missing,
        });
    }

    // --- Sections ---

    fn structure(&mut self, root: NodeHandle) {
        let structure = self.group(layout::KEYBOARD_STRUCTURE, Some(root), Transform::new());
        self.bind(Slot::KeyboardStructure, structure);

        for &(name, material, position) in layout::STRUCTURE_PARTS {
            let transform = Transform::from_placement(position, None);
            if let Some(handle) = self.mesh_instance(name, name, material, structure, transform) {
                match name {
                    "plate" => self.bind(Slot::Plate, handle),
                    "frame" => self.bind(Slot::Frame, handle),
                    _ => {}
                }
            }
        }

        let port = self.group(
            layout::PORT_ASSEMBLY,
            Some(structure),
            Transform::from_placement(layout::PORT_ASSEMBLY_POSITION, None),
        );
        for &(name, material, position) in layout::PORT_PARTS {
            self.mesh_instance(name, name, material, port, Transform::from_placement(position, None));
        }
    }

    fn keycaps(&mut self, root: NodeHandle, board: &KeyboardLayout) {
        let section = self.group(
            layout::KEYCAPS,
            Some(root),
            Transform::from_placement(Vec3::new(0.0, layout::KEYCAP_HEIGHT, 0.0), None),
        );

        for row_layout in board.rows {
            let row = row_layout.row;
            let container = self.group(
                &layout::keycap_row_name(row),
                Some(section),
                Transform::from_placement(board.row_origin(row), None),
            );
            self.bind(Slot::KeycapRow(row), container);

            for placement in board.placements(row) {
                let tilt = Some(Vec3::new(row_layout.tilt, 0.0, 0.0));
                let key = placement.spec.name;

                let surface = self.mesh_instance(
                    &layout::keycap_name(key),
                    &layout::keycap_name(key),
                    layout::keycap_material(placement.spec),
                    container,
                    Transform::from_placement(placement.local, tilt),
                );
                // Coincident UV-projection double of the surface.
                let overlay = self.mesh_instance(
                    &layout::keycap_overlay_name(key),
                    &layout::keycap_overlay_name(key),
                    layout::KEYCAP_UV_MATERIAL,
                    container,
                    Transform::from_placement(placement.local, tilt),
                );
                if let Some(overlay) = overlay
                    && let Some(mesh) = self.scene.get_mesh_mut(overlay)
                {
                    mesh.render_order = OVERLAY_RENDER_ORDER;
                    mesh.cast_shadows = false;
                }

                if let Some(surface) = surface {
                    if self.settings.binds_key(key) {
                        self.bind(Slot::Key(key.to_string()), surface);
                    }
                    if self.settings.binds_switch_components(key) {
                        let slot = Slot::SwitchComponent(key.to_string(), SwitchPart::Keycap);
                        self.bind(slot, surface);
                    }
                }
            }
        }
    }

    fn switches(&mut self, root: NodeHandle, board: &KeyboardLayout) {
        let section = self.group(
            layout::SWITCHES,
            Some(root),
            Transform::from_placement(Vec3::new(0.0, layout::SWITCH_HEIGHT, 0.0), None),
        );

        for row_layout in board.rows {
            let row = row_layout.row;
            let container = self.group(
                &layout::switch_row_name(row),
                Some(section),
                Transform::from_placement(board.row_origin(row), None),
            );
            self.bind(Slot::SwitchRow(row), container);

            for placement in board.placements(row) {
                self.switch(container, &placement);
            }
        }
    }

    fn switch(&mut self, container: NodeHandle, placement: &KeyPlacement) {
        let key = placement.spec.name;
        let group = self.group(
            &layout::switch_name(key),
            Some(container),
            Transform::from_placement(placement.local, None),
        );
        let bind_parts = self.settings.binds_switch_components(key);

        for part in SwitchPart::SWITCH_BODY {
            let asset = layout::switch_part_asset_name(part);
            let built = self.mesh_instance(
                &layout::switch_part_node_name(key, part),
                &asset,
                &asset,
                group,
                Transform::from_placement(layout::switch_part_offset(part), None),
            );
            if bind_parts && let Some(handle) = built {
                self.bind(Slot::SwitchComponent(key.to_string(), part), handle);
            }
        }
    }

    fn legends(&mut self, root: NodeHandle, board: &KeyboardLayout) {
        let extrude = self.group(
            layout::EXTRUDE,
            Some(root),
            Transform::from_placement(Vec3::new(0.0, layout::LEGEND_HEIGHT, 0.0), None),
        );
        self.bind(Slot::ExtrudeGroup, extrude);

        if !self.settings.legends {
            return;
        }

        for row_layout in board.rows {
            let origin = board.row_origin(row_layout.row);
            for placement in board.placements(row_layout.row) {
                if !placement.spec.has_legend() {
                    continue;
                }
                let key = placement.spec.name;
                let legend = self.mesh_instance(
                    &layout::legend_name(key),
                    &layout::legend_name(key),
                    layout::LEGEND_MATERIAL,
                    extrude,
                    Transform::from_placement(
                        origin + placement.local,
                        Some(Vec3::new(row_layout.tilt, 0.0, 0.0)),
                    ),
                );
                if let Some(legend) = legend
                    && let Some(mesh) = self.scene.get_mesh_mut(legend)
                {
                    mesh.cast_shadows = false;
                    mesh.receive_shadows = false;
                }
            }
        }
    }
}
