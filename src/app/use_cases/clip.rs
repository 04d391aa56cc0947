//! Use-Case: Clipping-Ebene aus Kamera und Objekt-Bounding ableiten.

use crate::app::state::GizmoState;
use crate::core::{Camera, ClippingPlane};
use crate::shared::options::CLIP_WHEEL_STEP;

use glam::Vec3;

/// Berechnet die Clipping-Ebene neu.
///
/// Bei `keep_normal` wird eine vorhandene (Nicht-Null-)Normale
/// wiederverwendet, sonst kommt sie aus der negativen Blickrichtung der
/// Kamera. Der Offset bildet die normierte Distanz auf die umschliessende
/// Kugel der Instanz ab: Distanz 0 schneidet nichts, Distanz 1 alles.
pub fn update_clipping_plane(state: &mut GizmoState, camera: &Camera, keep_normal: bool) {
    let Some(model) = state.model.as_deref() else {
        return;
    };

    let normal = if keep_normal && state.clip.plane.normal != Vec3::ZERO {
        state.clip.plane.normal
    } else {
        -camera.forward()
    };

    let (center, radius) = model.instance_bounding_sphere();
    let offset = normal.dot(center) - radius + state.clip.distance * 2.0 * radius;
    state.clip.plane = ClippingPlane::new(normal, offset);
}

/// Mausrad-Schritt auf der Clip-Distanz; behaelt die aktuelle Normale.
pub fn wheel_step(state: &mut GizmoState, camera: &Camera, up: bool) {
    let step = if up { CLIP_WHEEL_STEP } else { -CLIP_WHEEL_STEP };
    state.clip.distance = (state.clip.distance + step).clamp(0.0, 1.0);
    update_clipping_plane(state, camera, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ModelObject, ObjectId, TriangleMesh};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn state_with_cube() -> GizmoState {
        let mut state = GizmoState::new();
        state.model = Some(Arc::new(ModelObject::new(
            ObjectId(1),
            Arc::new(TriangleMesh::cube(10.0)),
        )));
        state
    }

    #[test]
    fn offset_follows_distance_over_bounding_sphere() {
        let mut state = state_with_cube();
        let camera = Camera::new();
        let radius = (3.0_f32).sqrt() * 10.0;

        state.clip.distance = 0.0;
        update_clipping_plane(&mut state, &camera, false);
        // Kamera blickt -Z, Normale ist +Z; Zentrum im Ursprung
        assert_relative_eq!(state.clip.plane.normal.z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(state.clip.plane.offset, -radius, epsilon = 1e-3);

        state.clip.distance = 1.0;
        update_clipping_plane(&mut state, &camera, false);
        assert_relative_eq!(state.clip.plane.offset, radius, epsilon = 1e-3);
    }

    #[test]
    fn distance_zero_clips_no_mesh_point() {
        let mut state = state_with_cube();
        let camera = Camera::new();
        state.clip.distance = 0.0;
        update_clipping_plane(&mut state, &camera, false);

        let mesh = TriangleMesh::cube(10.0);
        for v in &mesh.vertices {
            assert!(!state.clip.plane.is_point_clipped(*v));
        }
    }

    #[test]
    fn wheel_steps_clamp_to_unit_interval() {
        let mut state = state_with_cube();
        let camera = Camera::new();

        for _ in 0..150 {
            wheel_step(&mut state, &camera, true);
        }
        assert_eq!(state.clip.distance, 1.0);

        for _ in 0..300 {
            wheel_step(&mut state, &camera, false);
        }
        assert_eq!(state.clip.distance, 0.0);
    }

    #[test]
    fn keep_normal_reuses_custom_plane_normal() {
        let mut state = state_with_cube();
        let camera = Camera::new();
        let custom = Vec3::new(1.0, 0.0, 0.0);
        state.clip.plane = ClippingPlane::new(custom, 0.0);
        state.clip.distance = 0.5;

        update_clipping_plane(&mut state, &camera, true);
        assert_eq!(state.clip.plane.normal, custom);

        update_clipping_plane(&mut state, &camera, false);
        assert_relative_eq!(state.clip.plane.normal.z, 1.0, epsilon = 1e-5);
    }
}
