//! CPU-seitiger Aufbau der Render-Szene.
//!
//! Erzeugt upload-fertige Draw-Listen; Shader-Bindung und Buffer-Upload
//! uebernimmt der Host-Renderer.

pub mod types;

use std::sync::Arc;

use glam::{Quat, Vec3};

pub use types::{
    decode_picking_color, encode_picking_color, HoleInstance, MeshBuffers, RenderMode,
    SectionVertex, CAVITY_COLOR, HOLE_COLOR_HOVER, HOLE_COLOR_IDLE, HOLE_COLOR_SELECTED,
    SECTION_OBJECT_COLOR, SECTION_SUPPORTS_COLOR,
};

use crate::app::state::GizmoState;

/// Komplette Render-Szene eines Frames.
#[derive(Debug, Clone, Default)]
pub struct RenderScene {
    /// Loch-Markierungen (Display- oder Picking-Farben)
    pub holes: Vec<HoleInstance>,
    /// Triangulierter Objekt-Querschnitt
    pub object_section: Vec<SectionVertex>,
    /// Triangulierter Support-Querschnitt
    pub supports_section: Vec<SectionVertex>,
    /// Kavitaets-Volumen der Hollowing-Vorschau
    pub cavity: Option<Arc<MeshBuffers>>,
}

/// Baut die Loch-Instanzen fuer einen Draw-Pass.
///
/// Punkte, deren Oberflaechenpunkt von der Clipping-Ebene weggeschnitten
/// ist, werden uebersprungen. Die Farbe haengt vom Modus ab: Picking
/// codiert den Index, Display nutzt Hover-/Selektionsfarben.
pub fn build_hole_instances(state: &GizmoState, mode: RenderMode) -> Vec<HoleInstance> {
    let Some(model) = state.model.as_deref() else {
        return Vec::new();
    };

    let clip_active = state.clip.distance > 0.0;
    let mut instances = Vec::with_capacity(model.drain_holes.len());

    for (idx, hole) in model.drain_holes.iter().enumerate() {
        if clip_active {
            let world = model.instance_transform.transform_point3(hole.surface_point());
            if state.clip.plane.is_point_clipped(world) {
                continue;
            }
        }

        let color = match mode {
            RenderMode::Picking => encode_picking_color(idx),
            RenderMode::Display => {
                if state.selection.hover_id == Some(idx) {
                    HOLE_COLOR_HOVER
                } else if state.selection.selected.get(idx).copied().unwrap_or(false) {
                    HOLE_COLOR_SELECTED
                } else {
                    HOLE_COLOR_IDLE
                }
            }
        };

        instances.push(HoleInstance {
            position: hole.position,
            rotation: Quat::from_rotation_arc(Vec3::Z, -hole.normal),
            radius: hole.radius,
            height: hole.height,
            color,
        });
    }

    instances
}

/// Wandelt Cut-Dreiecke in eine Vertex-Liste mit konstanter Farbe um.
pub fn section_vertices(triangles: &[Vec3], color: [f32; 4]) -> Vec<SectionVertex> {
    triangles
        .iter()
        .map(|p| SectionVertex::new(p.to_array(), color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing;
    use crate::core::{ClippingPlane, ModelObject, ObjectId, TriangleMesh};
    use std::sync::Arc;

    fn state_with_two_holes() -> GizmoState {
        let mut state = GizmoState::new();
        state.model = Some(Arc::new(ModelObject::new(
            ObjectId(1),
            Arc::new(TriangleMesh::cube(10.0)),
        )));
        // Vorderseite (+Z) und Rueckseite (-Z)
        editing::place_hole(&mut state, Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        editing::place_hole(&mut state, Vec3::new(0.0, 0.0, -10.0), Vec3::NEG_Z);
        state
    }

    #[test]
    fn display_colors_follow_hover_and_selection() {
        let mut state = state_with_two_holes();
        state.selection.hover_id = Some(0);
        state.selection.selected[1] = true;
        state.selection.selection_empty = false;

        let instances = build_hole_instances(&state, RenderMode::Display);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].color, HOLE_COLOR_HOVER);
        assert_eq!(instances[1].color, HOLE_COLOR_SELECTED);
    }

    #[test]
    fn picking_colors_encode_the_index() {
        let state = state_with_two_holes();
        let instances = build_hole_instances(&state, RenderMode::Picking);
        assert_eq!(instances[0].color, encode_picking_color(0));
        assert_eq!(instances[1].color, encode_picking_color(1));
    }

    #[test]
    fn clipped_holes_are_skipped() {
        let mut state = state_with_two_holes();
        // Rueckseite (z < 0) wegschneiden
        state.clip.distance = 0.5;
        state.clip.plane = ClippingPlane::new(Vec3::Z, -5.0);

        let instances = build_hole_instances(&state, RenderMode::Display);
        assert_eq!(instances.len(), 1);
        assert!(instances[0].position.z > 0.0);
    }

    #[test]
    fn cylinder_axis_points_against_the_hole_normal() {
        let state = state_with_two_holes();
        let instances = build_hole_instances(&state, RenderMode::Display);
        // Loch 0: Normale -Z, Achse also +Z
        let axis = instances[0].rotation * Vec3::Z;
        assert!((axis - Vec3::Z).length() < 1e-5);
    }
}
