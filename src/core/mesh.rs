//! Indiziertes Dreiecksnetz und Strahl-Typ.

use glam::Vec3;

/// Strahl in einem beliebigen Koordinatensystem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ursprung des Strahls
    pub origin: Vec3,
    /// Richtung (nicht zwingend normiert)
    pub direction: Vec3,
}

impl Ray {
    /// Punkt auf dem Strahl bei Parameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Indiziertes Dreiecksnetz in Mesh-lokalen Koordinaten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Eckpunkte
    pub vertices: Vec<Vec3>,
    /// Dreiecke als Indices in `vertices` (CCW = Aussenseite)
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Erstellt ein Mesh aus Eckpunkten und Dreiecks-Indices.
    pub fn new(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self { vertices, indices }
    }

    /// Gibt `true` zurueck, wenn das Mesh keine Dreiecke enthaelt.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Anzahl der Dreiecke.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Eckpunkte des Dreiecks `i`.
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let [a, b, c] = self.indices[i];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Mittelpunkt und Radius der umschliessenden Kugel (Mesh-lokal).
    ///
    /// Mittelpunkt = Zentrum der Bounding-Box, Radius = maximaler
    /// Eckpunkt-Abstand dazu.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, 0.0);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        let center = (min + max) * 0.5;

        let mut radius_sq: f32 = 0.0;
        for v in &self.vertices {
            radius_sq = radius_sq.max(center.distance_squared(*v));
        }

        (center, radius_sq.sqrt())
    }

    /// Achsen-alignierter Wuerfel mit Halbkante `half` um den Ursprung.
    ///
    /// Standard-Testgeometrie; die Dreiecke sind CCW nach aussen gewickelt.
    pub fn cube(half: f32) -> Self {
        let h = half;
        let vertices = vec![
            Vec3::new(-h, -h, -h), // 0
            Vec3::new(h, -h, -h),  // 1
            Vec3::new(h, h, -h),   // 2
            Vec3::new(-h, h, -h),  // 3
            Vec3::new(-h, -h, h),  // 4
            Vec3::new(h, -h, h),   // 5
            Vec3::new(h, h, h),    // 6
            Vec3::new(-h, h, h),   // 7
        ];
        let indices = vec![
            // -Z
            [0, 2, 1],
            [0, 3, 2],
            // +Z
            [4, 5, 6],
            [4, 6, 7],
            // -Y
            [0, 1, 5],
            [0, 5, 4],
            // +Y
            [3, 7, 6],
            [3, 6, 2],
            // -X
            [0, 4, 7],
            [0, 7, 3],
            // +X
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self { vertices, indices }
    }
}
