use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec3;
use keyrig::keyboard::layout::{self, KeyboardLayout};
use keyrig::keyboard::{self, SwitchPart};
use keyrig::resources::{Geometry, Material};
use keyrig::{AssetServer, GroupProps, KeyboardRig, NamedAssets, RigSettings, Row, Scene};

const FRAMES: usize = 48;
const DT: f32 = 1.0 / 24.0;
const WAVE_AMPLITUDE: f32 = 0.003;
const PRESS_DEPTH: f32 = 0.004;

/// Typing Wave Demo
///
/// Usage: `typing-wave [model.glb] [settings.json]`
///
/// Without a model, every keyboard part is stood in by a box so the demo runs
/// anywhere.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let server = AssetServer::new();
    let resource_id = match args.next() {
        Some(path) => path,
        None => {
            let id = "memory://typing_wave";
            placeholder_assets(&server, id);
            id.to_string()
        }
    };
    let settings = match args.next() {
        Some(path) => RigSettings::from_json_str(&std::fs::read_to_string(path)?)?,
        None => RigSettings::default(),
    };

    keyboard::preload(&server, &resource_id);

    let mut scene = Scene::new();
    let props = GroupProps {
        rotation: Some(Vec3::new(0.35, 0.0, 0.0)),
        ..GroupProps::default()
    };
    let mut rig = KeyboardRig::new(&resource_id, props, settings);
    let handles = rig.render(&mut scene, &server)?;

    println!(
        "Mounted '{}': {} nodes, {} skipped instances",
        rig.resource_id(),
        scene.node_count(),
        rig.last_report().skipped().len()
    );

    let rest: Vec<(Row, Vec3)> = Row::ALL
        .into_iter()
        .filter_map(|row| {
            let handle = handles.keycap_row(row)?;
            Some((row, scene.get_node(handle)?.transform.position))
        })
        .collect();
    let typed: Vec<String> = rig.settings().bound_keys.clone();

    for frame in 0..FRAMES {
        let t = frame as f32 * DT;

        // Rows ripple front to back
        for &(row, origin) in &rest {
            let Some(handle) = handles.keycap_row(row) else {
                continue;
            };
            let phase = t * TAU - row.number() as f32 * 0.6;
            scene
                .node(handle)
                .set_position(origin + Vec3::Y * phase.sin() * WAVE_AMPLITUDE);
        }

        // One bound key pressed per frame, released on the next
        let pressed = typed.get(frame % typed.len().max(1));
        for key in &typed {
            let Some(handle) = handles.key(key) else {
                continue;
            };
            let depth = if Some(key) == pressed { -PRESS_DEPTH } else { 0.0 };
            if let Some(node) = scene.get_node_mut(handle) {
                node.transform.position.y = depth;
            }
        }

        scene.update_matrix_world();

        if let Some(key) = pressed
            && let Some(handle) = handles.key(key)
            && let Some(node) = scene.get_node(handle)
        {
            let position = node.transform.world_position();
            log::info!("frame {frame:02}: '{key}' down at {position:.4}");
        }
    }

    if let Some(main) = handles.main_group()
        && let Some(bbox) = scene.get_bbox_of_node(main, &server)
    {
        println!("Keyboard bounds: {:.3} x {:.3} x {:.3}", bbox.size().x, bbox.size().y, bbox.size().z);
    }

    rig.unmount(&mut scene);
    println!("Unmounted, handles live: {}", handles.is_mounted());
    Ok(())
}

/// Registers one box per mesh name the standard layout asks for.
fn placeholder_assets(server: &AssetServer, id: &str) -> Arc<NamedAssets> {
    let board = KeyboardLayout::standard();
    let mut builder = server.named(id);
    let key = layout::KEY_PITCH * 0.95;

    for row in board.rows {
        for placement in board.placements(row.row) {
            let name = placement.spec.name;
            let width = layout::KEY_PITCH * placement.spec.width - (layout::KEY_PITCH - key);
            builder.add_mesh(&layout::keycap_name(name), Geometry::new_box(width, 0.008, key));
            builder.add_mesh(&layout::keycap_overlay_name(name), Geometry::new_box(width, 0.008, key));
            if placement.spec.has_legend() {
                builder.add_mesh(&layout::legend_name(name), Geometry::new_box(0.006, 0.0002, 0.006));
            }
        }
    }
    for part in SwitchPart::SWITCH_BODY {
        let name = layout::switch_part_asset_name(part);
        builder.add_mesh(&name, Geometry::new_box(0.014, 0.004, 0.014));
        builder.add_material(&name, Material::default());
    }

    let width = layout::BOARD_UNITS * layout::KEY_PITCH;
    let depth = board.depth_units() * layout::KEY_PITCH;
    builder.add_mesh("plate", Geometry::new_box(width, 0.0015, depth));
    builder.add_mesh("frame", Geometry::new_box(width + 0.01, 0.012, depth + 0.01));
    for &(name, _, _) in layout::PORT_PARTS {
        builder.add_mesh(name, Geometry::new_box(0.01, 0.004, 0.008));
    }

    for &(_, material, _) in layout::STRUCTURE_PARTS.iter().chain(layout::PORT_PARTS) {
        builder.add_material(material, Material::default());
    }
    for material in [
        "keycap_alpha",
        "keycap_modifier",
        "keycap_accent",
        layout::KEYCAP_UV_MATERIAL,
        layout::LEGEND_MATERIAL,
    ] {
        builder.add_material(material, Material::default());
    }

    builder.finish()
}
