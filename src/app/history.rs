//! Snapshot-basierte Undo/Redo-History.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{ClippingPlane, ModelObject, ObjectId};

use super::state::GizmoState;

/// Serialisierbarer Gizmo-Anteil eines Snapshots.
///
/// Die Feld-Reihenfolge ist das persistierte Record-Layout und darf nicht
/// umsortiert werden. Transiente Caches (Raycaster, Querschnitte,
/// Cavity-Mesh) sind bewusst ausgeschlossen und werden lazy neu aufgebaut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GizmoSnapshot {
    /// Normierte Clip-Distanz
    pub clip_distance: f32,
    /// Schnittebene (Normale + Offset)
    pub clip_plane: ClippingPlane,
    /// ID des editierten Objekts
    pub object_id: Option<ObjectId>,
    /// Radius fuer neue Loecher
    pub new_hole_radius: f32,
    /// Tiefe fuer neue Loecher (ohne Ueberstand)
    pub new_hole_height: f32,
    /// Selektionsflags je Loch
    pub selected: Vec<bool>,
    /// Gecachte ODER-Reduktion der Selektion
    pub selection_empty: bool,
}

impl GizmoSnapshot {
    /// Serialisiert den Record fuer die Projektdatei des Hosts.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Liest einen zuvor persistierten Record.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Snapshot reduziert auf die fuer Undo/Redo relevanten Teile.
///
/// Nutzt Arc-Clone (Copy-on-Write): Das Erstellen eines Snapshots ist O(1) —
/// der teure Modell-Klon findet erst beim naechsten `Arc::make_mut()` in
/// einem Use-Case statt.
#[derive(Clone)]
pub struct Snapshot {
    /// Modell inklusive Lochliste (Arc-Klon fuer O(1)-Snapshot)
    pub model: Option<Arc<ModelObject>>,
    /// Serialisierbarer Gizmo-Anteil
    pub gizmo: GizmoSnapshot,
}

impl Snapshot {
    /// Erstellt einen O(1)-Snapshot durch Arc-Clone statt Deep-Clone.
    pub fn from_state(state: &GizmoState) -> Self {
        Self {
            model: state.model.clone(),
            gizmo: GizmoSnapshot {
                clip_distance: state.clip.distance,
                clip_plane: state.clip.plane,
                object_id: state.model.as_ref().map(|m| m.id),
                new_hole_radius: state.hole_defaults.radius,
                new_hole_height: state.hole_defaults.height,
                selected: state.selection.selected.clone(),
                selection_empty: state.selection.selection_empty,
            },
        }
    }

    /// Stellt den Snapshot wieder her.
    ///
    /// `hover_id` und laufende Gesten sind transient und bleiben unberuehrt;
    /// der Controller baut seine Caches beim naechsten Frame lazy neu auf.
    pub fn apply_to(self, state: &mut GizmoState) {
        state.model = self.model;
        state.clip.distance = self.gizmo.clip_distance;
        state.clip.plane = self.gizmo.clip_plane;
        state.hole_defaults.radius = self.gizmo.new_hole_radius;
        state.hole_defaults.height = self.gizmo.new_hole_height;
        state.selection.selected = self.gizmo.selected;
        state.selection.selection_empty = self.gizmo.selection_empty;
        state.assert_selection_consistent();
    }
}

/// Eintrag auf Undo- oder Redo-Stack.
#[derive(Clone)]
struct HistoryEntry {
    label: String,
    snapshot: Snapshot,
}

/// Einfacher Undo/Redo-Manager mit Snapshotting.
pub struct EditHistory {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_depth: usize,
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::with_capacity(max_depth),
            max_depth,
        }
    }

    /// Nimmt einen fertig gebauten Snapshot auf.
    ///
    /// Use-Cases snapshotten VOR der Mutation; der aufgenommene Zustand ist
    /// der Wiederherstellungspunkt des naechsten Undo.
    pub fn record_snapshot(&mut self, label: &str, snap: Snapshot) {
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(HistoryEntry {
            label: label.to_string(),
            snapshot: snap,
        });
        self.redo_stack.clear();
    }

    /// Prueft ob Undo moeglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prueft ob Redo moeglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Aktuelle Tiefe des Undo-Stacks.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Label des naechsten Undo-Schritts.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.label.as_str())
    }

    /// Pop vom Undo-Stack; `current` wandert auf den Redo-Stack.
    /// Gibt den anzuwendenden Snapshot zurueck.
    pub fn pop_undo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let entry = self.undo_stack.pop()?;
        if self.redo_stack.len() >= self.max_depth {
            self.redo_stack.remove(0);
        }
        self.redo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    /// Pop vom Redo-Stack; `current` wandert auf den Undo-Stack.
    /// Gibt den anzuwendenden Snapshot zurueck.
    pub fn pop_redo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let entry = self.redo_stack.pop()?;
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TriangleMesh;

    fn snapshot_with_distance(distance: f32) -> Snapshot {
        let mut state = GizmoState::new();
        state.model = Some(Arc::new(ModelObject::new(
            ObjectId(1),
            Arc::new(TriangleMesh::cube(1.0)),
        )));
        state.clip.distance = distance;
        Snapshot::from_state(&state)
    }

    #[test]
    fn empty_history_cannot_undo_or_redo() {
        let history = EditHistory::new_with_capacity(10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn record_enables_undo_and_clears_redo() {
        let mut history = EditHistory::new_with_capacity(10);
        history.record_snapshot("Add drainage hole", snapshot_with_distance(0.0));
        assert!(history.can_undo());
        assert_eq!(history.undo_label(), Some("Add drainage hole"));

        let _ = history.pop_undo_with_current(snapshot_with_distance(0.5));
        assert!(history.can_redo());

        history.record_snapshot("Delete drainage hole", snapshot_with_distance(0.1));
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_then_redo_round_trips_the_state() {
        let mut history = EditHistory::new_with_capacity(10);
        history.record_snapshot("x", snapshot_with_distance(0.2));

        let restored = history
            .pop_undo_with_current(snapshot_with_distance(0.7))
            .expect("Undo vorhanden");
        assert_eq!(restored.gizmo.clip_distance, 0.2);

        let redone = history
            .pop_redo_with_current(restored)
            .expect("Redo vorhanden");
        assert_eq!(redone.gizmo.clip_distance, 0.7);
    }

    #[test]
    fn depth_limit_drops_oldest_entries() {
        let mut history = EditHistory::new_with_capacity(2);
        history.record_snapshot("a", snapshot_with_distance(0.1));
        history.record_snapshot("b", snapshot_with_distance(0.2));
        history.record_snapshot("c", snapshot_with_distance(0.3));

        let first = history
            .pop_undo_with_current(snapshot_with_distance(0.9))
            .expect("Undo vorhanden");
        assert_eq!(first.gizmo.clip_distance, 0.3);
        let second = history
            .pop_undo_with_current(first)
            .expect("Undo vorhanden");
        assert_eq!(second.gizmo.clip_distance, 0.2);
        assert!(!history.can_undo());
    }

    #[test]
    fn snapshot_record_round_trips_through_json() {
        let snap = snapshot_with_distance(0.4);
        let json = snap.gizmo.to_json().expect("Snapshot serialisierbar");
        let restored = GizmoSnapshot::from_json(&json).expect("Snapshot lesbar");
        assert_eq!(restored, snap.gizmo);
    }

    #[test]
    fn snapshot_record_keeps_field_order() {
        let snap = snapshot_with_distance(0.4);
        let json = snap.gizmo.to_json().expect("Snapshot serialisierbar");

        let order = [
            "clip_distance",
            "clip_plane",
            "object_id",
            "new_hole_radius",
            "new_hole_height",
            "selected",
            "selection_empty",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|field| json.find(field).expect("Feld im Record enthalten"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
