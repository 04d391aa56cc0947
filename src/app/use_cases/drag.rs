//! Use-Case: Drag-Lifecycle eines gehoverten Lochs.
//!
//! Waehrend des Drags wird das Loch jeden Frame live ueberschrieben, ohne
//! History-Eintrag. Der Commit passiert erst beim Drag-Ende per
//! Rollback-then-Redo: alte Position kurz zurueckschreiben, Snapshot
//! nehmen, neue Position wiederherstellen — so ist der
//! Wiederherstellungspunkt des Undo der Zustand VOR dem Drag.

use std::sync::Arc;

use glam::Vec3;

use crate::app::state::GizmoState;
use crate::core::DrainHole;
use crate::shared::options::HOLE_STICK_OUT_LENGTH;

use super::selection;

/// Drag-Beginn: selektiert exklusiv das gehoverte Loch und merkt sich
/// dessen Position.
pub fn start_dragging(state: &mut GizmoState) {
    if let Some(hover) = state.selection.hover_id {
        selection::select_none(state);
        selection::select_point(state, hover);
        state.gesture.hole_before_drag = state
            .model
            .as_deref()
            .and_then(|m| m.drain_holes.get(hover))
            .map(|hole| hole.position);
    } else {
        state.gesture.hole_before_drag = None;
    }
}

/// Drag-Update: ueberschreibt das gehoverte Loch mit einem neuen
/// Raycast-Treffer (live, ohne History-Eintrag).
///
/// Ohne Treffer (z.B. Cursor neben dem Mesh) bleibt das Loch unveraendert.
pub fn update_drag(state: &mut GizmoState, hit: Vec3, hit_normal: Vec3) {
    let Some(hover) = state.selection.hover_id else {
        return;
    };
    let Some(model_arc) = state.model.as_mut() else {
        return;
    };

    let model = Arc::make_mut(model_arc);
    if let Some(hole) = model.drain_holes.get_mut(hover) {
        hole.position = hit + HOLE_STICK_OUT_LENGTH * hit_normal;
        hole.normal = -hit_normal;
    }
}

/// Drag-Ende: nimmt den History-Snapshot per Rollback-then-Redo.
///
/// Hat sich die Position nicht geaendert (Klick ohne Bewegung), passiert
/// nichts und es entsteht kein History-Eintrag.
pub fn stop_dragging(state: &mut GizmoState) {
    let hover = state.selection.hover_id;
    let before = state.gesture.hole_before_drag.take();

    let (Some(hover), Some(before)) = (hover, before) else {
        return;
    };

    let current: Option<DrainHole> = state
        .model
        .as_deref()
        .and_then(|m| m.drain_holes.get(hover))
        .copied();
    let Some(backup) = current else {
        return;
    };

    if backup.position == before {
        return;
    }

    // Rollback: alte Position fuer den Snapshot wiederherstellen
    if let Some(model_arc) = state.model.as_mut() {
        let model = Arc::make_mut(model_arc);
        if let Some(hole) = model.drain_holes.get_mut(hover) {
            hole.position = before;
        }
    }

    state.record_undo_snapshot("Move drainage hole");

    // Redo: finale Position wieder anwenden
    if let Some(model_arc) = state.model.as_mut() {
        let model = Arc::make_mut(model_arc);
        if let Some(hole) = model.drain_holes.get_mut(hover) {
            hole.position = backup.position;
        }
    }

    log::info!("Loch {} verschoben", hover);
}
