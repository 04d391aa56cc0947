//! Use-Case: Loecher platzieren und loeschen.

use std::sync::Arc;

use glam::Vec3;

use crate::app::state::GizmoState;
use crate::core::{push_hole, remove_selected_holes, DrainHole};

use super::selection;

/// Platziert ein neues Loch an einem Raycast-Treffer (Mesh-lokal).
///
/// Snapshot VOR der Mutation; das neue Loch wird mit `false`-Selektionsflag
/// angehaengt, damit die Laengen-Invariante erhalten bleibt.
pub fn place_hole(state: &mut GizmoState, hit: Vec3, hit_normal: Vec3) {
    if state.model.is_none() {
        log::warn!("Kein Loch platzierbar: kein aktives Objekt");
        return;
    }

    state.record_undo_snapshot("Add drainage hole");

    let hole = DrainHole::from_hit(
        hit,
        hit_normal,
        state.hole_defaults.radius,
        state.hole_defaults.height,
    );

    let Some(model_arc) = state.model.as_mut() else {
        return;
    };
    let model = Arc::make_mut(model_arc);
    push_hole(&mut model.drain_holes, &mut state.selection.selected, hole);
    state.assert_selection_consistent();

    log::info!(
        "Loch an ({:.2}, {:.2}, {:.2}) platziert, Radius {:.2}",
        hole.position.x,
        hole.position.y,
        hole.position.z,
        hole.radius
    );
}

/// Loescht alle selektierten Loecher.
///
/// Bei leerer Selektion ein No-op, es entsteht kein History-Eintrag.
pub fn delete_selected(state: &mut GizmoState) {
    if state.selection.selection_empty {
        log::debug!("Nichts zum Loeschen selektiert");
        return;
    }
    if state.model.is_none() {
        return;
    }

    state.record_undo_snapshot("Delete drainage hole");

    let Some(model_arc) = state.model.as_mut() else {
        return;
    };
    let model = Arc::make_mut(model_arc);
    let removed = remove_selected_holes(&mut model.drain_holes, &mut state.selection.selected);

    selection::select_none(state);
    state.assert_selection_consistent();

    log::info!("{} Loch/Loecher geloescht", removed);
}

/// Loescht alle Loecher des Objekts (Selektieren + Loeschen).
pub fn delete_all(state: &mut GizmoState) {
    selection::select_all(state);
    delete_selected(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::history::Snapshot;
    use crate::core::{ModelObject, ObjectId, TriangleMesh};
    use crate::shared::options::HOLE_STICK_OUT_LENGTH;
    use std::sync::Arc;

    fn state_with_model() -> GizmoState {
        let mut state = GizmoState::new();
        state.model = Some(Arc::new(ModelObject::new(
            ObjectId(1),
            Arc::new(TriangleMesh::cube(10.0)),
        )));
        state
    }

    #[test]
    fn place_hole_applies_stick_out_formula() {
        let mut state = state_with_model();
        let hit = Vec3::new(0.0, 0.0, 10.0);
        place_hole(&mut state, hit, Vec3::Z);

        let model = state.model.as_deref().expect("Modell vorhanden");
        let hole = &model.drain_holes[0];
        assert_eq!(hole.position, hit + HOLE_STICK_OUT_LENGTH * Vec3::Z);
        assert_eq!(hole.normal, -Vec3::Z);
        assert_eq!(state.selection.selected, vec![false]);
        assert!(state.can_undo());
    }

    #[test]
    fn lengths_stay_in_lockstep_over_mixed_operations() {
        let mut state = state_with_model();
        for i in 0..5 {
            place_hole(&mut state, Vec3::new(i as f32, 0.0, 10.0), Vec3::Z);
            state.assert_selection_consistent();
        }

        selection::select_point(&mut state, 1);
        selection::select_point(&mut state, 3);
        delete_selected(&mut state);
        state.assert_selection_consistent();
        assert_eq!(state.hole_count(), 3);

        place_hole(&mut state, Vec3::new(9.0, 0.0, 10.0), Vec3::Z);
        state.assert_selection_consistent();
        assert_eq!(state.hole_count(), 4);
    }

    #[test]
    fn delete_all_twice_is_idempotent() {
        let mut state = state_with_model();
        place_hole(&mut state, Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        place_hole(&mut state, Vec3::new(1.0, 0.0, 10.0), Vec3::Z);

        delete_all(&mut state);
        assert_eq!(state.hole_count(), 0);
        assert!(state.selection.selection_empty);
        let undo_depth_after_first = state.history.undo_depth();

        // Zweiter Aufruf: Selektion bleibt leer, kein neuer History-Eintrag
        delete_all(&mut state);
        assert_eq!(state.hole_count(), 0);
        assert_eq!(state.history.undo_depth(), undo_depth_after_first);
    }

    #[test]
    fn undo_after_delete_restores_holes_and_selection() {
        let mut state = state_with_model();
        place_hole(&mut state, Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        selection::select_point(&mut state, 0);
        delete_selected(&mut state);
        assert_eq!(state.hole_count(), 0);

        let current = Snapshot::from_state(&state);
        let prev = state
            .history
            .pop_undo_with_current(current)
            .expect("Undo vorhanden");
        prev.apply_to(&mut state);

        assert_eq!(state.hole_count(), 1);
        assert!(state.selection.selected[0]);
        state.assert_selection_consistent();
    }
}
