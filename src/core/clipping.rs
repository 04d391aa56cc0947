//! Clipping-Ebene und memoisierter Querschnitt (Cut-Dreiecke).

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::mesh::TriangleMesh;

/// Toleranz fuer Ebenen-Klassifikation und Punkt-Quantisierung.
const PLANE_TOLERANCE: f32 = 1e-5;

/// Clipping-Ebene `dot(p, normal) = offset`.
///
/// Sichtbar ist der Halbraum `dot(p, normal) >= offset`; bei Distanz 0 der
/// Formel aus [`crate::app::use_cases::clip`] wird nichts weggeschnitten,
/// bei Distanz 1 alles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClippingPlane {
    /// Einheitsnormale der Ebene
    pub normal: Vec3,
    /// Vorzeichenbehafteter Abstand entlang der Normale
    pub offset: f32,
}

impl ClippingPlane {
    /// Erstellt eine Ebene aus Normale und Offset.
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self { normal, offset }
    }

    /// Ebene, die nichts wegschneidet (Null-Normale).
    pub fn clips_nothing() -> Self {
        Self {
            normal: Vec3::ZERO,
            offset: 0.0,
        }
    }

    /// Gibt `true` zurueck, wenn der Weltpunkt weggeschnitten ist.
    pub fn is_point_clipped(&self, point: Vec3) -> bool {
        self.normal != Vec3::ZERO && point.dot(self.normal) < self.offset
    }
}

impl Default for ClippingPlane {
    fn default() -> Self {
        Self::clips_nothing()
    }
}

/// Memoisierter Querschnitt eines Meshes mit der Clipping-Ebene.
///
/// Das Ergebnis wird erst bei [`MeshCutter::refresh`] neu berechnet und nur
/// dann, wenn sich Ebene oder Transformation seit dem letzten Mal geaendert
/// haben. Fuer ein anderes Mesh wird ein neuer Cutter erstellt (die
/// Mesh-Identitaet ist der Cache-Schluessel des Controllers).
#[derive(Debug, Clone)]
pub struct MeshCutter {
    mesh: Arc<TriangleMesh>,
    plane: ClippingPlane,
    transform: Mat4,
    triangles: Vec<Vec3>,
    dirty: bool,
}

impl MeshCutter {
    /// Erstellt einen Cutter fuer das gegebene Mesh.
    pub fn new(mesh: Arc<TriangleMesh>) -> Self {
        Self {
            mesh,
            plane: ClippingPlane::clips_nothing(),
            transform: Mat4::IDENTITY,
            triangles: Vec::new(),
            dirty: true,
        }
    }

    /// Das geschnittene Mesh (fuer Identitaetsvergleiche des Caches).
    pub fn mesh(&self) -> &Arc<TriangleMesh> {
        &self.mesh
    }

    /// Setzt die Schnittebene; markiert den Cache bei Aenderung als ungueltig.
    pub fn set_plane(&mut self, plane: ClippingPlane) {
        if self.plane != plane {
            self.plane = plane;
            self.dirty = true;
        }
    }

    /// Setzt die Mesh→Welt-Transformation; markiert den Cache bei Aenderung
    /// als ungueltig.
    pub fn set_transform(&mut self, transform: Mat4) {
        if self.transform != transform {
            self.transform = transform;
            self.dirty = true;
        }
    }

    /// Berechnet den Querschnitt neu, falls noetig.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        self.triangles = compute_cut_triangles(&self.mesh, self.transform, &self.plane);
    }

    /// Die triangulierten Cut-Flaechen in Welt-Koordinaten
    /// (flache Liste, je drei Punkte ein Dreieck).
    pub fn triangles(&self) -> &[Vec3] {
        &self.triangles
    }
}

/// Quantisierter Punkt-Schluessel zum Verketten von Segment-Endpunkten.
fn point_key(p: Vec3) -> [i64; 3] {
    let q = 1.0 / (PLANE_TOLERANCE * 10.0);
    [
        (p.x * q).round() as i64,
        (p.y * q).round() as i64,
        (p.z * q).round() as i64,
    ]
}

/// Schneidet ein Dreieck mit der Ebene; liefert hoechstens ein Segment.
fn intersect_triangle(v: [Vec3; 3], plane: &ClippingPlane) -> Option<(Vec3, Vec3)> {
    let d = [
        v[0].dot(plane.normal) - plane.offset,
        v[1].dot(plane.normal) - plane.offset,
        v[2].dot(plane.normal) - plane.offset,
    ];

    let mut points: Vec<Vec3> = Vec::with_capacity(2);
    for i in 0..3 {
        let j = (i + 1) % 3;
        // Kante schneidet die Ebene, wenn die Vorzeichen wechseln
        if (d[i] > PLANE_TOLERANCE && d[j] < -PLANE_TOLERANCE)
            || (d[i] < -PLANE_TOLERANCE && d[j] > PLANE_TOLERANCE)
        {
            let t = d[i] / (d[i] - d[j]);
            points.push(v[i] + t * (v[j] - v[i]));
        } else if d[i].abs() <= PLANE_TOLERANCE {
            let candidate = v[i];
            if !points
                .iter()
                .any(|p| p.distance_squared(candidate) < PLANE_TOLERANCE)
            {
                points.push(candidate);
            }
        }
    }

    if points.len() == 2 && points[0].distance_squared(points[1]) > PLANE_TOLERANCE {
        Some((points[0], points[1]))
    } else {
        None
    }
}

/// Verkettet Schnittsegmente zu geschlossenen Schleifen.
///
/// Offene Ketten (nicht-wasserdichte Meshes) werden verworfen.
fn chain_segments(segments: &[(Vec3, Vec3)]) -> Vec<Vec<Vec3>> {
    use std::collections::HashMap;

    // Endpunkt → Liste von (Segment-Index, Endpunkt-Seite)
    let mut endpoint_map: HashMap<[i64; 3], Vec<(usize, bool)>> = HashMap::new();
    for (idx, (a, b)) in segments.iter().enumerate() {
        endpoint_map.entry(point_key(*a)).or_default().push((idx, false));
        endpoint_map.entry(point_key(*b)).or_default().push((idx, true));
    }

    let mut used = vec![false; segments.len()];
    let mut loops = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let (first, mut current) = segments[start];
        let mut polyline = vec![first, current];
        let mut closed = false;

        loop {
            let key = point_key(current);
            let next = endpoint_map
                .get(&key)
                .and_then(|entries| entries.iter().find(|(idx, _)| !used[*idx]).copied());

            let Some((idx, side)) = next else {
                break;
            };
            used[idx] = true;

            let (a, b) = segments[idx];
            current = if side { a } else { b };

            if point_key(current) == point_key(first) {
                closed = true;
                break;
            }
            polyline.push(current);
        }

        if closed && polyline.len() >= 3 {
            loops.push(polyline);
        }
    }

    loops
}

/// Trianguliert eine geschlossene Schleife per Ear-Clipping in der
/// 2D-Ebenenbasis.
fn triangulate_loop(polygon: &[Vec3], plane: &ClippingPlane, out: &mut Vec<Vec3>) {
    if polygon.len() < 3 {
        return;
    }

    // Orthonormale Basis in der Schnittebene
    let n = plane.normal;
    let u = if n.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let u = (u - n * u.dot(n)).normalize();
    let v = n.cross(u);

    let points_2d: Vec<Vec2> = polygon.iter().map(|p| Vec2::new(p.dot(u), p.dot(v))).collect();

    let signed_area: f32 = points_2d
        .windows(2)
        .map(|w| w[0].perp_dot(w[1]))
        .sum::<f32>()
        + points_2d[points_2d.len() - 1].perp_dot(points_2d[0]);
    let ccw = signed_area >= 0.0;

    let mut remaining: Vec<usize> = (0..polygon.len()).collect();
    let mut guard = 0;

    while remaining.len() > 3 && guard < polygon.len() * polygon.len() {
        guard += 1;
        let len = remaining.len();
        let mut clipped_one = false;

        for i in 0..len {
            let prev = points_2d[remaining[(i + len - 1) % len]];
            let curr = points_2d[remaining[i]];
            let next = points_2d[remaining[(i + 1) % len]];

            let cross = (curr - prev).perp_dot(next - curr);
            let convex = if ccw { cross > 0.0 } else { cross < 0.0 };
            if !convex {
                continue;
            }

            // Kein anderer Punkt darf im Kandidaten-Ohr liegen
            let ear_is_empty = remaining.iter().enumerate().all(|(j, &rj)| {
                if j == (i + len - 1) % len || j == i || j == (i + 1) % len {
                    return true;
                }
                !point_in_triangle(points_2d[rj], prev, curr, next)
            });
            if !ear_is_empty {
                continue;
            }

            out.push(polygon[remaining[(i + len - 1) % len]]);
            out.push(polygon[remaining[i]]);
            out.push(polygon[remaining[(i + 1) % len]]);
            remaining.remove(i);
            clipped_one = true;
            break;
        }

        if !clipped_one {
            // Degeneriertes Polygon: Rest als Faecher ausgeben
            break;
        }
    }

    if remaining.len() == 3 {
        out.push(polygon[remaining[0]]);
        out.push(polygon[remaining[1]]);
        out.push(polygon[remaining[2]]);
    } else {
        for i in 1..remaining.len().saturating_sub(1) {
            out.push(polygon[remaining[0]]);
            out.push(polygon[remaining[i]]);
            out.push(polygon[remaining[i + 1]]);
        }
    }
}

/// Punkt-in-Dreieck-Test ueber Vorzeichen der Kanten-Kreuzprodukte.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Berechnet die triangulierten Cut-Flaechen in Welt-Koordinaten.
fn compute_cut_triangles(
    mesh: &TriangleMesh,
    transform: Mat4,
    plane: &ClippingPlane,
) -> Vec<Vec3> {
    if mesh.is_empty() || plane.normal == Vec3::ZERO {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(i);
        let world = [
            transform.transform_point3(a),
            transform.transform_point3(b),
            transform.transform_point3(c),
        ];
        if let Some(segment) = intersect_triangle(world, plane) {
            segments.push(segment);
        }
    }

    let mut triangles = Vec::new();
    for polygon in chain_segments(&segments) {
        triangulate_loop(&polygon, plane, &mut triangles);
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn null_plane_clips_nothing() {
        let plane = ClippingPlane::clips_nothing();
        assert!(!plane.is_point_clipped(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn points_below_offset_are_clipped() {
        let plane = ClippingPlane::new(Vec3::Z, 1.0);
        assert!(plane.is_point_clipped(Vec3::ZERO));
        assert!(!plane.is_point_clipped(Vec3::new(0.0, 0.0, 2.0)));
    }

    /// Flaeche einer flachen Dreiecksliste (je 3 Punkte ein Dreieck).
    fn total_area(triangles: &[Vec3]) -> f32 {
        triangles
            .chunks(3)
            .map(|t| 0.5 * (t[1] - t[0]).cross(t[2] - t[0]).length())
            .sum()
    }

    #[test]
    fn cube_cross_section_covers_the_full_square() {
        let mut cutter = MeshCutter::new(Arc::new(TriangleMesh::cube(10.0)));
        cutter.set_plane(ClippingPlane::new(Vec3::Z, 0.0));
        cutter.set_transform(Mat4::IDENTITY);
        cutter.refresh();

        let triangles = cutter.triangles();
        assert!(!triangles.is_empty());
        assert_eq!(triangles.len() % 3, 0);
        // Querschnitt des 20er-Wuerfels bei z = 0: 20 x 20
        assert_relative_eq!(total_area(triangles), 400.0, epsilon = 1.0);
        for p in triangles {
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn plane_outside_mesh_yields_no_section() {
        let mut cutter = MeshCutter::new(Arc::new(TriangleMesh::cube(10.0)));
        cutter.set_plane(ClippingPlane::new(Vec3::Z, 50.0));
        cutter.set_transform(Mat4::IDENTITY);
        cutter.refresh();
        assert!(cutter.triangles().is_empty());
    }

    #[test]
    fn section_is_recomputed_when_transform_changes() {
        let mut cutter = MeshCutter::new(Arc::new(TriangleMesh::cube(10.0)));
        cutter.set_plane(ClippingPlane::new(Vec3::Z, 0.0));
        cutter.set_transform(Mat4::IDENTITY);
        cutter.refresh();
        let area_unit = total_area(cutter.triangles());

        cutter.set_transform(Mat4::from_scale(Vec3::splat(2.0)));
        cutter.refresh();
        let area_scaled = total_area(cutter.triangles());

        assert_relative_eq!(area_scaled, area_unit * 4.0, epsilon = 4.0);
    }

    #[test]
    fn empty_mesh_yields_no_section() {
        let mut cutter = MeshCutter::new(Arc::new(TriangleMesh::default()));
        cutter.set_plane(ClippingPlane::new(Vec3::Z, 0.0));
        cutter.refresh();
        assert!(cutter.triangles().is_empty());
    }
}
