//! Das editierte Modell-Objekt: Mesh, Instanz-Transformation, Loecher.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::hole::DrainHole;
use super::mesh::TriangleMesh;
use crate::shared::options::OptionValue;

/// Eindeutige Objekt-ID innerhalb der Szene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Das aktuell editierte Modell-Objekt.
///
/// Wird im Gizmo-Zustand als `Arc<ModelObject>` gehalten (Copy-on-Write via
/// `Arc::make_mut`), damit History-Snapshots O(1) bleiben.
#[derive(Debug, Clone)]
pub struct ModelObject {
    /// Szenen-weite ID
    pub id: ObjectId,
    /// Dreiecksnetz in Mesh-lokalen Koordinaten
    pub mesh: Arc<TriangleMesh>,
    /// Instanz-Transformation (Mesh → Welt)
    pub instance_transform: Mat4,
    /// Drainage-Loecher in Mesh-lokalen Koordinaten
    pub drain_holes: Vec<DrainHole>,
    /// Objekt-Overrides fuer den Konfigurations-Store
    pub config: HashMap<String, OptionValue>,
}

impl ModelObject {
    /// Erstellt ein Objekt mit Identitaets-Transformation und ohne Loecher.
    pub fn new(id: ObjectId, mesh: Arc<TriangleMesh>) -> Self {
        Self {
            id,
            mesh,
            instance_transform: Mat4::IDENTITY,
            drain_holes: Vec::new(),
            config: HashMap::new(),
        }
    }

    /// Umschliessende Kugel der Instanz in Welt-Koordinaten.
    ///
    /// Der Radius beruecksichtigt den groessten Skalierungsanteil der
    /// Instanz-Transformation.
    pub fn instance_bounding_sphere(&self) -> (Vec3, f32) {
        let (local_center, local_radius) = self.mesh.bounding_sphere();
        let center = self.instance_transform.transform_point3(local_center);

        let (scale, _, _) = self.instance_transform.to_scale_rotation_translation();
        let max_scale = scale.x.abs().max(scale.y.abs()).max(scale.z.abs());

        (center, local_radius * max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bounding_sphere_follows_instance_transform() {
        let mut model = ModelObject::new(ObjectId(7), Arc::new(TriangleMesh::cube(1.0)));
        model.instance_transform =
            Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));

        let (center, radius) = model.instance_bounding_sphere();
        assert_relative_eq!(center.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(radius, 2.0 * (3.0_f32).sqrt(), epsilon = 1e-4);
    }
}
