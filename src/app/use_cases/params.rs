//! Use-Case: Drei-Phasen-Commit fuer Slider-Edits.
//!
//! Phase 1 (Press): Ausgangswert stashen. Phase 2 (Edit): neuen Wert live
//! anwenden, ohne History. Phase 3 (Release): Rollback-then-Redo — alten
//! Wert zurueckschreiben, Snapshot nehmen, neuen Wert wieder anwenden.
//! Der Undo-Eintrag traegt damit den Wert von VOR dem Press, nicht einen
//! Zwischenstand des Drags.

use std::sync::Arc;

use crate::app::state::GizmoState;
use crate::shared::options::{
    self, HollowingParams, OptionValue, HOLE_STICK_OUT_LENGTH, HOLLOWING_CLOSING_DISTANCE_MAX,
    HOLLOWING_OFFSET_MAX, NEW_HOLE_RADIUS_MAX, NEW_HOLE_RADIUS_MIN,
};

/// Signale eines Slider-Widgets fuer einen Frame.
///
/// Entspricht 1:1 den Item-Abfragen einer Immediate-Mode-UI
/// (angeklickt / wird gezogen / gerade losgelassen).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliderSignal {
    /// Slider wurde in diesem Frame angeklickt
    pub clicked: bool,
    /// Wert hat sich bei gehaltener Taste geaendert
    pub edited: bool,
    /// Taste wurde nach einem Edit losgelassen
    pub released: bool,
}

/// Schreibt die Hollowing-Parameter als Objekt-Overrides.
fn write_hollowing_params(state: &mut GizmoState, params: HollowingParams) {
    state.set_object_option(
        options::HOLLOWING_MIN_THICKNESS,
        OptionValue::Float(params.offset),
    );
    state.set_object_option(
        options::HOLLOWING_QUALITY,
        OptionValue::Float(params.quality),
    );
    state.set_object_option(
        options::HOLLOWING_CLOSING_DISTANCE,
        OptionValue::Float(params.closing_distance),
    );
}

/// Slider-Edit der Hollowing-Parameter (Offset/Qualitaet/Closing-Distanz).
pub fn edit_hollowing_params(
    state: &mut GizmoState,
    signal: SliderSignal,
    mut values: HollowingParams,
) {
    values.offset = values.offset.clamp(0.0, HOLLOWING_OFFSET_MAX);
    values.quality = values.quality.clamp(0.0, 1.0);
    values.closing_distance = values.closing_distance.clamp(0.0, HOLLOWING_CLOSING_DISTANCE_MAX);

    if signal.clicked {
        state.params.hollowing_stash = Some(state.hollowing_params());
    }

    if signal.edited || signal.released {
        if signal.released {
            if let Some(stash) = state.params.hollowing_stash.take() {
                write_hollowing_params(state, stash);
                state.record_undo_snapshot("Hollowing parameter change");
            }
        }
        write_hollowing_params(state, values);
    }
}

/// Setzt oder loescht das Hollowing-Enable-Flag des Objekts.
pub fn set_hollowing_enabled(state: &mut GizmoState, enabled: bool) {
    state.set_object_option(options::HOLLOWING_ENABLE, OptionValue::Bool(enabled));
    log::info!("Hollowing {}", if enabled { "aktiviert" } else { "deaktiviert" });
}

/// Slider-Edit von Radius/Tiefe.
///
/// Der Wert wird immer als Default fuer neue Loecher uebernommen; auf
/// bestehende Loecher wirkt er nur, wenn welche selektiert sind — sonst
/// sind die Regler wirkungslos. `height` ist die Tiefe ohne Ueberstand.
pub fn edit_hole_dimensions(state: &mut GizmoState, signal: SliderSignal, radius: f32, height: f32) {
    let radius = radius.clamp(NEW_HOLE_RADIUS_MIN, NEW_HOLE_RADIUS_MAX);
    state.hole_defaults.radius = radius;
    state.hole_defaults.height = height;

    if state.selection.selection_empty {
        return;
    }

    if signal.clicked {
        state.params.holes_stash = state.model.as_deref().map(|m| m.drain_holes.clone());
    }

    if signal.edited || signal.released {
        apply_to_selected(state, radius, height);
    }

    if signal.released {
        let Some(stash) = state.params.holes_stash.take() else {
            return;
        };
        let Some(new_holes) = state.model.as_deref().map(|m| m.drain_holes.clone()) else {
            return;
        };

        // Rollback: Lochliste und Defaults von vor dem Press
        if let Some(model_arc) = state.model.as_mut() {
            Arc::make_mut(model_arc).drain_holes = stash.clone();
        }
        let defaults_backup = state.hole_defaults;
        let first_selected = state
            .selection
            .selected
            .iter()
            .position(|s| *s)
            .and_then(|i| stash.get(i));
        if let Some(hole) = first_selected {
            state.hole_defaults.radius = hole.radius;
            state.hole_defaults.height = hole.height - HOLE_STICK_OUT_LENGTH;
        }

        state.record_undo_snapshot("Change drainage hole diameter");

        // Redo: Live-Zustand wiederherstellen
        state.hole_defaults = defaults_backup;
        if let Some(model_arc) = state.model.as_mut() {
            Arc::make_mut(model_arc).drain_holes = new_holes;
        }
    }
}

/// Wendet Radius/Tiefe auf alle selektierten Loecher an.
fn apply_to_selected(state: &mut GizmoState, radius: f32, height: f32) {
    let selected = state.selection.selected.clone();
    let Some(model_arc) = state.model.as_mut() else {
        return;
    };
    let model = Arc::make_mut(model_arc);
    for (idx, hole) in model.drain_holes.iter_mut().enumerate() {
        if selected.get(idx).copied().unwrap_or(false) {
            hole.radius = radius;
            hole.height = height + HOLE_STICK_OUT_LENGTH;
        }
    }
}
