//! Raycaster-Adapter fuer Mesh-Treffer und Sichtbarkeitstests.
//!
//! Der Adapter wird lazy erstellt und vom Controller gecacht, solange die
//! Mesh-Identitaet des aktiven Objekts unveraendert bleibt.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use indexmap::IndexSet;

use super::camera::Camera;
use super::clipping::ClippingPlane;
use super::mesh::{Ray, TriangleMesh};

/// Toleranz fuer den Moeller-Trumbore-Schnitttest.
const RAY_EPSILON: f32 = 1e-8;
/// Relative Toleranz fuer den Selbstverdeckungs-Test.
const OCCLUSION_EPSILON: f32 = 1e-3;

/// Moeller-Trumbore Strahl/Dreieck-Schnitt.
///
/// Gibt `(t, u, v)` zurueck; `t` ist der Strahlparameter, `u`/`v` sind die
/// baryzentrischen Koordinaten.
fn ray_triangle_intersection(
    origin: Vec3,
    direction: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<(f32, f32, f32)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t > RAY_EPSILON {
        Some((t, u, v))
    } else {
        None
    }
}

/// Ein Treffer in Mesh-lokalen Koordinaten.
#[derive(Debug, Clone, Copy)]
struct LocalHit {
    t: f32,
    position: Vec3,
    normal: Vec3,
}

/// Raycaster ueber dem Mesh des aktiven Objekts.
#[derive(Debug, Clone)]
pub struct MeshRaycaster {
    mesh: Arc<TriangleMesh>,
}

impl MeshRaycaster {
    /// Erstellt einen Raycaster fuer das gegebene Mesh.
    pub fn new(mesh: Arc<TriangleMesh>) -> Self {
        Self { mesh }
    }

    /// Das indizierte Mesh (fuer Identitaetsvergleiche des Caches).
    pub fn mesh(&self) -> &Arc<TriangleMesh> {
        &self.mesh
    }

    /// Alle Treffer eines Mesh-lokalen Strahls, aufsteigend nach `t`.
    fn hits_local(&self, ray: &Ray) -> Vec<LocalHit> {
        let mut hits = Vec::new();
        for i in 0..self.mesh.triangle_count() {
            let [v0, v1, v2] = self.mesh.triangle(i);
            if let Some((t, _, _)) =
                ray_triangle_intersection(ray.origin, ray.direction, v0, v1, v2)
            {
                let normal = (v1 - v0).cross(v2 - v0).normalize();
                hits.push(LocalHit {
                    t,
                    position: ray.at(t),
                    normal,
                });
            }
        }
        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }

    /// Unprojiziert einen Screen-Punkt auf das Mesh.
    ///
    /// Gibt den naechsten Treffer zurueck, dessen Weltposition nicht von der
    /// Clipping-Ebene weggeschnitten ist — Position und Facetten-Normale in
    /// Mesh-lokalen Koordinaten. `None`, wenn kein solcher Treffer existiert.
    pub fn unproject_on_mesh(
        &self,
        screen: Vec2,
        transform: Mat4,
        camera: &Camera,
        viewport: [f32; 2],
        clip: Option<&ClippingPlane>,
    ) -> Option<(Vec3, Vec3)> {
        let world_ray = camera.ray_from_screen(screen, viewport);

        let inverse = transform.inverse();
        let local_ray = Ray {
            origin: inverse.transform_point3(world_ray.origin),
            direction: inverse.transform_vector3(world_ray.direction).normalize(),
        };

        for hit in self.hits_local(&local_ray) {
            let clipped = clip.is_some_and(|plane| {
                plane.is_point_clipped(transform.transform_point3(hit.position))
            });
            if !clipped {
                return Some((hit.position, hit.normal));
            }
        }

        None
    }

    /// Bestimmt, welche der Weltpunkte weder weggeschnitten noch vom Mesh
    /// selbst verdeckt sind.
    ///
    /// Verdeckung: Strahl von der Kamera zum Punkt trifft das Mesh deutlich
    /// vor dem Punkt. Die Reihenfolge der Eingabe bleibt im Ergebnis erhalten.
    pub fn unobscured_indices(
        &self,
        transform: Mat4,
        camera: &Camera,
        points_world: &[Vec3],
        clip: Option<&ClippingPlane>,
    ) -> IndexSet<usize> {
        let inverse = transform.inverse();
        let camera_local = inverse.transform_point3(camera.position);

        let mut visible = IndexSet::new();
        'points: for (idx, point) in points_world.iter().enumerate() {
            if clip.is_some_and(|plane| plane.is_point_clipped(*point)) {
                continue;
            }

            let target_local = inverse.transform_point3(*point);
            // Unnormierte Richtung: t = 1 entspricht genau dem Punkt selbst
            let ray = Ray {
                origin: camera_local,
                direction: target_local - camera_local,
            };

            for i in 0..self.mesh.triangle_count() {
                let [v0, v1, v2] = self.mesh.triangle(i);
                if let Some((t, _, _)) =
                    ray_triangle_intersection(ray.origin, ray.direction, v0, v1, v2)
                {
                    if t < 1.0 - OCCLUSION_EPSILON {
                        continue 'points;
                    }
                }
            }

            visible.insert(idx);
        }

        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VIEWPORT: [f32; 2] = [800.0, 600.0];

    fn cube_raycaster(half: f32) -> MeshRaycaster {
        MeshRaycaster::new(Arc::new(TriangleMesh::cube(half)))
    }

    #[test]
    fn center_ray_hits_front_face_of_cube() {
        let raycaster = cube_raycaster(10.0);
        let camera = Camera::new();

        let (position, normal) = raycaster
            .unproject_on_mesh(Vec2::new(400.0, 300.0), Mat4::IDENTITY, &camera, VIEWPORT, None)
            .expect("Strahl durch die Bildmitte muss den Wuerfel treffen");

        assert_relative_eq!(position.z, 10.0, epsilon = 1e-4);
        assert_relative_eq!(normal.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn ray_outside_mesh_misses() {
        let raycaster = cube_raycaster(10.0);
        let camera = Camera::new();

        assert!(raycaster
            .unproject_on_mesh(Vec2::new(0.0, 0.0), Mat4::IDENTITY, &camera, VIEWPORT, None)
            .is_none());
    }

    #[test]
    fn clipped_front_hit_falls_through_to_back_face() {
        let raycaster = cube_raycaster(10.0);
        let camera = Camera::new();
        // Geclippt ist dot(p, n) < offset: mit Normale -Z und Offset 0
        // faellt die Vorderseite (z > 0) weg, die Rueckseite bleibt.
        let plane = ClippingPlane::new(Vec3::NEG_Z, 0.0);

        let (position, _) = raycaster
            .unproject_on_mesh(
                Vec2::new(400.0, 300.0),
                Mat4::IDENTITY,
                &camera,
                VIEWPORT,
                Some(&plane),
            )
            .expect("geclippter Treffer muss auf die Rueckseite durchfallen");

        assert_relative_eq!(position.z, -10.0, epsilon = 1e-4);
    }

    #[test]
    fn transform_is_applied_to_the_ray() {
        let raycaster = cube_raycaster(10.0);
        let camera = Camera::new();
        let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, 50.0));

        let (position, _) = raycaster
            .unproject_on_mesh(Vec2::new(400.0, 300.0), transform, &camera, VIEWPORT, None)
            .expect("verschobener Wuerfel liegt weiter vor der Kamera");

        // Treffer in Mesh-lokalen Koordinaten: weiterhin die +Z-Seite
        assert_relative_eq!(position.z, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn back_face_points_are_occluded_by_the_mesh() {
        let raycaster = cube_raycaster(10.0);
        let camera = Camera::new();

        let front = Vec3::new(0.0, 0.0, 11.0);
        let back = Vec3::new(0.0, 0.0, -11.0);
        let visible =
            raycaster.unobscured_indices(Mat4::IDENTITY, &camera, &[front, back], None);

        assert!(visible.contains(&0));
        assert!(!visible.contains(&1));
    }

    #[test]
    fn clipped_points_are_never_visible() {
        let raycaster = cube_raycaster(10.0);
        let camera = Camera::new();
        // Alles geclippt: dot(p, +Z) < 100
        let plane = ClippingPlane::new(Vec3::Z, 100.0);

        let front = Vec3::new(0.0, 0.0, 11.0);
        let visible =
            raycaster.unobscured_indices(Mat4::IDENTITY, &camera, &[front], Some(&plane));

        assert!(visible.is_empty());
    }
}
