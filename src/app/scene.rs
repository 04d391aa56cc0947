//! Vertraege zum Host: Szenen-Kontext und Support-Schritt-Status.

use std::sync::Arc;

use glam::Mat4;

use crate::core::{Camera, ObjectId, TriangleMesh};

/// Pro Frame vom Host gelieferter Szenen-Kontext.
///
/// Das Gizmo fragt diese Daten jeden Frame neu ab und cacht nichts davon
/// ueber den Frame hinaus.
#[derive(Clone, Copy)]
pub struct SceneContext<'a> {
    /// Aktive Kamera
    pub camera: &'a Camera,
    /// Viewport-Groesse in Pixeln [Breite, Hoehe]
    pub viewport: [f32; 2],
    /// ID des aktuell in der Szene selektierten Objekts
    pub selected_object_id: Option<ObjectId>,
}

/// Status des extern berechneten Support-Schritts.
///
/// Der Abschluss wird jeden Frame gepollt (Flag + Timestamp) statt
/// gepusht — die Neuberechnung des Querschnitts ist billig im Vergleich
/// zum Mesh-Schnitt selbst.
pub trait SupportStepProvider {
    /// Gibt `true` zurueck, wenn der Support-Schritt abgeschlossen ist.
    fn is_step_done(&self) -> bool;

    /// Monoton steigender Timestamp der letzten Neuberechnung.
    fn timestamp(&self) -> u64;

    /// Das berechnete Support-Mesh (kann leer sein).
    fn support_mesh(&self) -> Option<Arc<TriangleMesh>>;

    /// Transformation des Support-Meshes in Welt-Koordinaten.
    fn support_transform(&self) -> Mat4 {
        Mat4::IDENTITY
    }
}

/// Provider ohne Support-Schritt (z.B. bevor der Backend-Job existiert).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSupports;

impl SupportStepProvider for NoSupports {
    fn is_step_done(&self) -> bool {
        false
    }

    fn timestamp(&self) -> u64 {
        0
    }

    fn support_mesh(&self) -> Option<Arc<TriangleMesh>> {
        None
    }
}
