//! Use-Case: Loch-Selektion (Klick-Toggle, Alles/Nichts, Rechteck).

use indexmap::IndexSet;

use crate::app::history::Snapshot;
use crate::app::state::{GizmoState, RectangleMode};
use crate::shared::options::HOLE_STICK_OUT_LENGTH;

/// Selektiert das Loch `idx` und uebernimmt dessen Radius/Tiefe als
/// Defaults fuer das naechste platzierte Loch.
pub fn select_point(state: &mut GizmoState, idx: usize) {
    state.assert_selection_consistent();
    let Some(model) = state.model.as_deref() else {
        return;
    };
    let Some(hole) = model.drain_holes.get(idx) else {
        log::warn!("Selektion ignoriert: Loch-Index {} existiert nicht", idx);
        return;
    };

    state.hole_defaults.radius = hole.radius;
    state.hole_defaults.height = hole.height - HOLE_STICK_OUT_LENGTH;
    state.selection.selected[idx] = true;
    state.selection.selection_empty = false;
}

/// Deselektiert das Loch `idx` und berechnet `selection_empty` neu.
pub fn unselect_point(state: &mut GizmoState, idx: usize) {
    state.assert_selection_consistent();
    if let Some(flag) = state.selection.selected.get_mut(idx) {
        *flag = false;
    }
    state.selection.recompute_empty();
}

/// Selektiert alle Loecher; Defaults kommen vom ersten Loch.
pub fn select_all(state: &mut GizmoState) {
    state.assert_selection_consistent();
    state.selection.selected.fill(true);

    let first = state.model.as_deref().and_then(|m| m.drain_holes.first());
    if let Some(hole) = first {
        state.hole_defaults.radius = hole.radius;
        state.hole_defaults.height = hole.height - HOLE_STICK_OUT_LENGTH;
        state.selection.selection_empty = false;
    } else {
        state.selection.selection_empty = true;
    }

    log::info!("Alle {} Loecher selektiert", state.selection.selected.len());
}

/// Hebt die komplette Selektion auf.
pub fn select_none(state: &mut GizmoState) {
    state.selection.selected.fill(false);
    state.selection.selection_empty = true;
}

/// Wendet eine finalisierte Rechteck-Geste an.
///
/// `indices_in_rect` sind die Loch-Indices, deren Projektion im Rechteck
/// liegt; `visible` sind Positionen innerhalb dieser Teilmenge, die der
/// Raycaster als unverdeckt gemeldet hat. Nur der Schnitt beider Mengen
/// wird umgeschaltet — verdeckte Punkte im Rechteck bleiben unberuehrt.
/// Aendert sich die Selektion, wird vorher ein Undo-Snapshot aufgenommen.
pub fn apply_rectangle(
    state: &mut GizmoState,
    mode: RectangleMode,
    indices_in_rect: &[usize],
    visible: &IndexSet<usize>,
) {
    // Snapshot VOR der Mutation; wird nur aufgenommen, wenn sich die
    // Selektion tatsaechlich aendert
    let before = Snapshot::from_state(state);

    for &subset_idx in visible {
        let Some(&hole_idx) = indices_in_rect.get(subset_idx) else {
            continue;
        };
        match mode {
            RectangleMode::Select => select_point(state, hole_idx),
            RectangleMode::Deselect => unselect_point(state, hole_idx),
        }
    }

    if state.selection.selected != before.gizmo.selected {
        state.history.record_snapshot("Selection-change", before);
    }
}
