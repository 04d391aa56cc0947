//! Rendering-Typen: Vertices, Render-Modus, Picking-Farbcodierung.

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

use crate::core::TriangleMesh;

/// Zweck eines Draw-Passes.
///
/// Dieselbe Geometrie wird entweder fuer die Anzeige (Hover/Selektion-
/// Farben) oder fuer das GPU-Picking (eindeutige Index-Farbe je Punkt)
/// gezeichnet; der Modus wird explizit uebergeben statt ueber globale
/// Draw-Flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Anzeige mit Hover-/Selektionsfarben
    Display,
    /// Hit-Test-Pass mit Index-Farbcodierung
    Picking,
}

/// Vertex fuer Querschnitt- und Cavity-Geometrie.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SectionVertex {
    /// Position im 3D-Raum
    pub position: [f32; 3],
    /// RGBA-Farbe
    pub color: [f32; 4],
}

impl SectionVertex {
    /// Erstellt einen neuen SectionVertex.
    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// Eine Loch-Markierung als Zylinder-Instanz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleInstance {
    /// Zylinder-Spitze in Mesh-lokalen Koordinaten
    pub position: Vec3,
    /// Rotation von +Z auf die Zylinder-Achse (-Normale)
    pub rotation: Quat,
    /// Zylinder-Radius
    pub radius: f32,
    /// Zylinder-Laenge
    pub height: f32,
    /// RGBA-Farbe (Anzeige- oder Picking-Farbe)
    pub color: [f32; 4],
}

/// Upload-fertige Dreiecksliste eines Meshes mit konstanter Farbe.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    /// Flache Vertex-Liste (je 3 ein Dreieck)
    pub vertices: Vec<SectionVertex>,
}

impl MeshBuffers {
    /// Baut die Dreiecksliste aus einem Mesh.
    pub fn from_mesh(mesh: &TriangleMesh, color: [f32; 4]) -> Self {
        let mut vertices = Vec::with_capacity(mesh.triangle_count() * 3);
        for i in 0..mesh.triangle_count() {
            for v in mesh.triangle(i) {
                vertices.push(SectionVertex::new(v.to_array(), color));
            }
        }
        Self { vertices }
    }
}

// ── Farben ──────────────────────────────────────────────────────────

/// Farbe des gehoverten Punkts (Cyan).
pub const HOLE_COLOR_HOVER: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
/// Farbe selektierter Punkte (Rot, halbtransparent).
pub const HOLE_COLOR_SELECTED: [f32; 4] = [1.0, 0.3, 0.3, 0.5];
/// Farbe unselektierter Punkte (Grau, halbtransparent).
pub const HOLE_COLOR_IDLE: [f32; 4] = [0.7, 0.7, 0.7, 0.5];
/// Farbe des Objekt-Querschnitts (Orange).
pub const SECTION_OBJECT_COLOR: [f32; 4] = [1.0, 0.37, 0.0, 1.0];
/// Farbe des Support-Querschnitts (Magenta).
pub const SECTION_SUPPORTS_COLOR: [f32; 4] = [1.0, 0.0, 0.37, 1.0];
/// Farbe des Kavitaets-Volumens (Rot, halbtransparent).
pub const CAVITY_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 0.5];

// ── Picking-Farbcodierung ───────────────────────────────────────────

/// Codiert einen Punkt-Index als eindeutige RGB-Farbe (Alpha 1).
///
/// `index + 1` wird little-endian auf die drei 8-Bit-Kanaele verteilt;
/// Farbe 0 bleibt fuer "kein Punkt" reserviert.
pub fn encode_picking_color(index: usize) -> [f32; 4] {
    let id = (index + 1) as u32;
    [
        (id & 0xff) as f32 / 255.0,
        ((id >> 8) & 0xff) as f32 / 255.0,
        ((id >> 16) & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Decodiert eine im Picking-Pass ausgelesene RGB-Farbe zurueck zum Index.
///
/// Gibt `None` fuer den reservierten Hintergrund (0, 0, 0) zurueck.
pub fn decode_picking_color(rgb: [u8; 3]) -> Option<usize> {
    let id = rgb[0] as u32 | ((rgb[1] as u32) << 8) | ((rgb[2] as u32) << 16);
    if id == 0 {
        None
    } else {
        Some((id - 1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picking_color_round_trips() {
        for index in [0usize, 1, 7, 255, 256, 65535, 1_000_000] {
            let color = encode_picking_color(index);
            let rgb = [
                (color[0] * 255.0).round() as u8,
                (color[1] * 255.0).round() as u8,
                (color[2] * 255.0).round() as u8,
            ];
            assert_eq!(decode_picking_color(rgb), Some(index));
        }
    }

    #[test]
    fn background_color_decodes_to_none() {
        assert_eq!(decode_picking_color([0, 0, 0]), None);
    }

    #[test]
    fn mesh_buffers_cover_every_triangle() {
        let mesh = TriangleMesh::cube(1.0);
        let buffers = MeshBuffers::from_mesh(&mesh, CAVITY_COLOR);
        assert_eq!(buffers.vertices.len(), mesh.triangle_count() * 3);
    }
}
