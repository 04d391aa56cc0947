//! Drainage-Loch-Datensatz und Lock-Step-Operationen auf der Lochliste.
//!
//! Die Loch-Liste lebt auf dem [`crate::core::ModelObject`], die parallele
//! Selektions-Liste im Gizmo-Zustand. Jede Mutation muss beide Listen
//! gleich lang halten; eine Verletzung ist ein Programmierfehler.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::shared::options::HOLE_STICK_OUT_LENGTH;

/// Ein zylindrisches Drainage-Loch in Mesh-lokalen Koordinaten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrainHole {
    /// Position der Zylinder-Spitze (Treffer + Ueberstand entlang der Trefffnormale)
    pub position: Vec3,
    /// Einheitsnormale, zeigt von der Spitze aus nach aussen (= negierte Trefffnormale)
    pub normal: Vec3,
    /// Zylinder-Radius (> 0)
    pub radius: f32,
    /// Zylinder-Laenge inklusive Ueberstand (> 0)
    pub height: f32,
}

impl DrainHole {
    /// Erstellt ein Loch aus einem Raycast-Treffer.
    ///
    /// `height` ist die Tiefe ohne Ueberstand; der feste Ueberstand wird
    /// auf Position und Laenge aufgeschlagen.
    pub fn from_hit(hit: Vec3, hit_normal: Vec3, radius: f32, height: f32) -> Self {
        Self {
            position: hit + HOLE_STICK_OUT_LENGTH * hit_normal,
            normal: -hit_normal,
            radius,
            height: height + HOLE_STICK_OUT_LENGTH,
        }
    }

    /// Punkt auf der Mesh-Oberflaeche, an dem das Loch platziert wurde.
    /// Dient als Testpunkt fuer den Clipping-Check.
    pub fn surface_point(&self) -> Vec3 {
        self.position + HOLE_STICK_OUT_LENGTH * self.normal
    }
}

/// Haengt ein Loch samt `false`-Selektionsflag an beide Listen an.
pub fn push_hole(holes: &mut Vec<DrainHole>, selected: &mut Vec<bool>, hole: DrainHole) {
    holes.push(hole);
    selected.push(false);
    assert_eq!(
        holes.len(),
        selected.len(),
        "Lochliste und Selektionsliste muessen gleich lang sein"
    );
}

/// Entfernt alle selektierten Loecher aus beiden Listen in einem
/// aufsteigenden Durchlauf.
///
/// Der Cursor rueckt nur vor, wenn kein Eintrag entfernt wurde, damit der
/// nachrueckende Index nicht uebersprungen wird. Gibt die Anzahl entfernter
/// Loecher zurueck.
pub fn remove_selected_holes(holes: &mut Vec<DrainHole>, selected: &mut Vec<bool>) -> usize {
    assert_eq!(
        holes.len(),
        selected.len(),
        "Lochliste und Selektionsliste muessen gleich lang sein"
    );

    let mut removed = 0;
    let mut idx = 0;
    while idx < holes.len() {
        if selected[idx] {
            selected.remove(idx);
            holes.remove(idx);
            removed += 1;
        } else {
            idx += 1;
        }
    }

    removed
}

/// Leert beide Listen.
pub fn clear_holes(holes: &mut Vec<DrainHole>, selected: &mut Vec<bool>) {
    holes.clear();
    selected.clear();
}
