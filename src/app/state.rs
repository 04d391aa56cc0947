//! Gizmo-Zustand — zentrale Datenhaltung.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::core::{Camera, ClippingPlane, ModelObject};
use crate::shared::options::{
    self, ConfigStore, HollowingParams, OptionValue, DEFAULT_NEW_HOLE_HEIGHT,
    DEFAULT_NEW_HOLE_RADIUS,
};

use super::history::Snapshot;

/// Selektions-Zustand, index-parallel zur Lochliste des Modells.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Selektionsflag je Loch (gleich lang wie `drain_holes`)
    pub selected: Vec<bool>,
    /// Gecachte ODER-Reduktion ueber `selected`
    pub selection_empty: bool,
    /// Index des Lochs unter dem Cursor (vom Host-Picking gesetzt)
    pub hover_id: Option<usize>,
}

impl SelectionState {
    /// Erstellt einen leeren Selektions-Zustand.
    pub fn new() -> Self {
        Self {
            selected: Vec::new(),
            selection_empty: true,
            hover_id: None,
        }
    }

    /// Setzt die Selektionsliste auf `count` unselektierte Eintraege zurueck.
    pub fn reload(&mut self, count: usize) {
        self.selected.clear();
        self.selected.resize(count, false);
        self.selection_empty = true;
        self.hover_id = None;
    }

    /// Berechnet `selection_empty` per ODER-Reduktion neu.
    pub fn recompute_empty(&mut self) {
        self.selection_empty = !self.selected.iter().any(|s| *s);
    }
}

/// Modus einer Rechteck-Selektion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectangleMode {
    /// Punkte im Rechteck selektieren
    Select,
    /// Punkte im Rechteck deselektieren
    Deselect,
}

/// Zustand einer aktiven Rechteck-Selektion in Screen-Koordinaten.
#[derive(Debug, Clone)]
pub struct RectangleSelection {
    /// Selektieren oder Deselektieren
    pub mode: RectangleMode,
    /// Startpunkt der Geste
    pub start: Vec2,
    /// Aktuelle Cursor-Position
    pub current: Vec2,
}

impl RectangleSelection {
    /// Beginnt eine Rechteck-Geste am gegebenen Punkt.
    pub fn start_dragging(start: Vec2, mode: RectangleMode) -> Self {
        Self {
            mode,
            start,
            current: start,
        }
    }

    /// Aktualisiert die Cursor-Position waehrend der Geste.
    pub fn dragging(&mut self, position: Vec2) {
        self.current = position;
    }

    /// Gibt `true` zurueck, wenn der Screen-Punkt im Rechteck liegt.
    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.start.min(self.current);
        let max = self.start.max(self.current);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Indices aller Weltpunkte, deren Projektion im Rechteck liegt.
    pub fn contained_indices(
        &self,
        points_world: &[Vec3],
        camera: &Camera,
        viewport: [f32; 2],
    ) -> Vec<usize> {
        points_world
            .iter()
            .enumerate()
            .filter_map(|(idx, point)| {
                camera
                    .project_to_screen(*point, viewport)
                    .filter(|screen| self.contains(*screen))
                    .map(|_| idx)
            })
            .collect()
    }
}

/// Implizite Gesten-Flags des Event-Handlers.
#[derive(Debug, Clone, Default)]
pub struct GestureState {
    /// Aktive Rechteck-Selektion (None = keine)
    pub rectangle: Option<RectangleSelection>,
    /// Ein Punkt wurde gerade platziert; bis zum Button-Release werden
    /// Move/Up-Events konsumiert (unterdrueckt die Kamera-Rotation)
    pub wait_for_up: bool,
    /// Position des Lochs vor Drag-Beginn (fuer den History-Commit)
    pub hole_before_drag: Option<Vec3>,
}

/// Clipping-Zustand.
#[derive(Debug, Clone)]
pub struct ClipState {
    /// Normierte Distanz der Schnittebene (0 = aus, 1 = alles)
    pub distance: f32,
    /// Aktuelle Schnittebene
    pub plane: ClippingPlane,
}

impl Default for ClipState {
    fn default() -> Self {
        Self {
            distance: 0.0,
            plane: ClippingPlane::clips_nothing(),
        }
    }
}

/// Radius/Tiefe fuer das naechste platzierte Loch.
///
/// `height` ist die Tiefe ohne den festen Ueberstand; beim Platzieren wird
/// der Ueberstand aufgeschlagen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleDefaults {
    /// Radius neuer Loecher
    pub radius: f32,
    /// Tiefe neuer Loecher (ohne Ueberstand)
    pub height: f32,
}

impl Default for HoleDefaults {
    fn default() -> Self {
        Self {
            radius: DEFAULT_NEW_HOLE_RADIUS,
            height: DEFAULT_NEW_HOLE_HEIGHT,
        }
    }
}

/// Transiente Stashes fuer laufende Slider-Edits (drei-Phasen-Commit).
#[derive(Debug, Clone, Default)]
pub struct ParamEditState {
    /// Hollowing-Parameter beim Slider-Press
    pub hollowing_stash: Option<HollowingParams>,
    /// Lochliste beim Slider-Press (Radius/Tiefe-Edit)
    pub holes_stash: Option<Vec<crate::core::DrainHole>>,
}

/// Hauptzustand des Gizmos.
pub struct GizmoState {
    /// Aktuell editiertes Objekt (None = Gizmo inaktiv)
    pub model: Option<Arc<ModelObject>>,
    /// Selektions-Zustand (index-parallel zu den Loechern)
    pub selection: SelectionState,
    /// Clipping-Ebene und -Distanz
    pub clip: ClipState,
    /// Gesten-Flags des Event-Handlers
    pub gesture: GestureState,
    /// Radius/Tiefe fuer neue Loecher
    pub hole_defaults: HoleDefaults,
    /// Stashes fuer laufende Slider-Edits
    pub params: ParamEditState,
    /// Support-Querschnitt anzeigen
    pub show_supports: bool,
    /// Undo/Redo-History (Snapshot-basiert)
    pub history: super::history::EditHistory,
    /// Geschichteter Konfigurations-Store (Preset + Defaults)
    pub config: ConfigStore,
}

impl GizmoState {
    /// Erstellt einen neuen, inaktiven Gizmo-Zustand.
    pub fn new() -> Self {
        Self {
            model: None,
            selection: SelectionState::new(),
            clip: ClipState::default(),
            gesture: GestureState::default(),
            hole_defaults: HoleDefaults::default(),
            params: ParamEditState::default(),
            show_supports: true,
            history: super::history::EditHistory::new_with_capacity(200),
            config: ConfigStore::new(),
        }
    }

    /// Gibt zurueck, ob ein Undo-Schritt verfuegbar ist.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurueck, ob ein Redo-Schritt verfuegbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Erstellt einen Undo-Snapshot des aktuellen Zustands.
    /// Reduziert Boilerplate in mutierenden Use-Cases.
    pub fn record_undo_snapshot(&mut self, label: &str) {
        let snap = Snapshot::from_state(self);
        self.history.record_snapshot(label, snap);
    }

    /// Sucht eine Option: Objekt-Override → Preset → Default.
    pub fn get_option(&self, key: &str) -> Option<OptionValue> {
        self.config.get(self.model.as_deref(), key)
    }

    /// Float-Option mit 0.0 als letztem Fallback.
    pub fn get_float_option(&self, key: &str) -> f32 {
        self.get_option(key).and_then(OptionValue::as_float).unwrap_or(0.0)
    }

    /// Bool-Option mit `false` als letztem Fallback.
    pub fn get_bool_option(&self, key: &str) -> bool {
        self.get_option(key).and_then(OptionValue::as_bool).unwrap_or(false)
    }

    /// Schreibt einen Objekt-Override auf das aktive Modell.
    pub fn set_object_option(&mut self, key: &str, value: OptionValue) {
        if let Some(model) = self.model.as_mut() {
            Arc::make_mut(model).config.insert(key.to_string(), value);
        }
    }

    /// Die aktuell wirksamen Hollowing-Parameter.
    pub fn hollowing_params(&self) -> HollowingParams {
        HollowingParams {
            offset: self.get_float_option(options::HOLLOWING_MIN_THICKNESS),
            quality: self.get_float_option(options::HOLLOWING_QUALITY),
            closing_distance: self.get_float_option(options::HOLLOWING_CLOSING_DISTANCE),
        }
    }

    /// Anzahl der Loecher des aktiven Modells.
    pub fn hole_count(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.drain_holes.len())
    }

    /// Prueft die Laengen-Invariante zwischen Loechern und Selektion.
    pub fn assert_selection_consistent(&self) {
        assert_eq!(
            self.hole_count(),
            self.selection.selected.len(),
            "Lochliste und Selektionsliste muessen gleich lang sein"
        );
    }
}

impl Default for GizmoState {
    fn default() -> Self {
        Self::new()
    }
}
