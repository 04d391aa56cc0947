//! Gizmo-Controller: Event-Dispatch, transiente Caches, Frame-Update.
//!
//! Der Controller besitzt alles, was nicht in den Undo-Snapshot gehoert:
//! Raycaster, Querschnitt-Cutter, Cavity-Mesh und den laufenden
//! Hollowing-Job. Der persistierte Zustand liegt im [`GizmoState`].

use std::sync::Arc;

use glam::Vec2;

use crate::core::{MeshCutter, MeshRaycaster, ModelObject, ObjectId, TriangleMesh};
use crate::render::{self, MeshBuffers, RenderMode, RenderScene, CAVITY_COLOR};

use super::events::{EventResponse, GizmoEvent, Modifiers};
use super::jobs::{HollowJob, HollowingEngine};
use super::scene::{SceneContext, SupportStepProvider};
use super::state::{GizmoState, RectangleMode, RectangleSelection};
use super::use_cases::{clip, drag, editing, selection};

/// Ergebnis des Frame-Updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Gizmo ist konsistent mit der Szene und bleibt aktiv
    Active,
    /// Das editierte Objekt passt nicht mehr zur Szenen-Selektion;
    /// der Host soll das Gizmo deaktivieren statt auf veralteten Daten
    /// zu arbeiten
    DeactivationRequested,
}

/// Der Hollowing-Gizmo-Controller.
pub struct HollowGizmo {
    engine: HollowingEngine,
    raycaster: Option<MeshRaycaster>,
    raycaster_object: Option<ObjectId>,
    object_cutter: Option<MeshCutter>,
    supports_cutter: Option<MeshCutter>,
    supports_timestamp: Option<u64>,
    cavity_mesh: Option<Arc<TriangleMesh>>,
    cavity_buffers: Option<Arc<MeshBuffers>>,
    hollow_job: Option<HollowJob>,
}

impl HollowGizmo {
    /// Erstellt einen Controller mit dem injizierten Hollowing-Schritt.
    pub fn new(engine: HollowingEngine) -> Self {
        Self {
            engine,
            raycaster: None,
            raycaster_object: None,
            object_cutter: None,
            supports_cutter: None,
            supports_timestamp: None,
            cavity_mesh: None,
            cavity_buffers: None,
            hollow_job: None,
        }
    }

    // ── Aktivierung / Objektbindung ─────────────────────────────────

    /// Bindet das editierte Objekt.
    ///
    /// Bei gewechselter Objekt-ID werden alle transienten Caches verworfen
    /// und die Selektionsliste auf die Lochanzahl zurueckgesetzt.
    pub fn set_model_object(&mut self, state: &mut GizmoState, model: Arc<ModelObject>) {
        let changed = state.model.as_ref().map(|m| m.id) != Some(model.id);
        if changed {
            log::info!("Aktives Objekt gewechselt: {:?}", model.id);
            self.drop_transient_caches();
            state.selection.reload(model.drain_holes.len());
        }
        state.model = Some(model);
        state.assert_selection_consistent();
    }

    /// Deaktiviert das Gizmo: Clip-Distanz zurueck, Caches verwerfen.
    pub fn deactivate(&mut self, state: &mut GizmoState) {
        state.clip.distance = 0.0;
        state.gesture.rectangle = None;
        state.gesture.wait_for_up = false;
        state.gesture.hole_before_drag = None;
        state.selection.hover_id = None;
        self.drop_transient_caches();
    }

    fn drop_transient_caches(&mut self) {
        self.raycaster = None;
        self.raycaster_object = None;
        self.object_cutter = None;
        self.supports_cutter = None;
        self.supports_timestamp = None;
        self.cavity_mesh = None;
        self.cavity_buffers = None;
        self.hollow_job = None;
    }

    /// Hover-Index aus dem Picking-Pass des Hosts uebernehmen.
    pub fn set_hover_id(&self, state: &mut GizmoState, hover: Option<usize>) {
        state.selection.hover_id = hover.filter(|&i| i < state.hole_count());
    }

    /// Effektives Mesh fuer Querschnitt und Anzeige: die berechnete
    /// Kavitaet, solange vorhanden, sonst das Objekt-Mesh.
    fn effective_mesh(&self, state: &GizmoState) -> Option<Arc<TriangleMesh>> {
        match (&self.cavity_mesh, &state.model) {
            (Some(cavity), _) => Some(cavity.clone()),
            (None, Some(model)) => Some(model.mesh.clone()),
            (None, None) => None,
        }
    }

    /// Baut den Raycaster lazy neu auf, wenn Objekt oder Mesh gewechselt
    /// haben. Teuer im Aufbau, deshalb ueber Frames hinweg gecacht.
    fn ensure_raycaster(&mut self, state: &GizmoState) {
        let Some(model) = state.model.as_deref() else {
            self.raycaster = None;
            self.raycaster_object = None;
            return;
        };

        let rebuild = match (&self.raycaster, self.raycaster_object) {
            (Some(rc), Some(id)) => id != model.id || !Arc::ptr_eq(rc.mesh(), &model.mesh),
            _ => true,
        };
        if rebuild {
            self.raycaster = Some(MeshRaycaster::new(model.mesh.clone()));
            self.raycaster_object = Some(model.id);
        }
    }

    // ── Frame-Update ────────────────────────────────────────────────

    /// Pro-Frame-Update: Konsistenz-Check, Job-Poll, Cache-Refresh.
    pub fn update_frame(
        &mut self,
        state: &mut GizmoState,
        scene: &SceneContext<'_>,
        supports: &dyn SupportStepProvider,
    ) -> FrameOutcome {
        if let Some(model) = state.model.as_deref() {
            if scene.selected_object_id != Some(model.id) {
                log::warn!(
                    "Szenen-Selektion passt nicht mehr zu {:?} — Deaktivierung angefordert",
                    model.id
                );
                return FrameOutcome::DeactivationRequested;
            }
        }

        self.poll_hollow_job(state, scene);
        self.ensure_raycaster(state);
        self.refresh_sections(state, supports);

        FrameOutcome::Active
    }

    /// Aktualisiert Objekt- und Support-Querschnitt.
    fn refresh_sections(&mut self, state: &GizmoState, supports: &dyn SupportStepProvider) {
        // Distanz 0 oder leeres Mesh: nichts schneiden
        let effective = self.effective_mesh(state);
        let skip = state.clip.distance == 0.0
            || effective.as_deref().is_none_or(TriangleMesh::is_empty);
        let Some(model) = state.model.as_deref() else {
            return;
        };

        if skip {
            self.object_cutter = None;
        } else if let Some(mesh) = effective {
            let stale = self
                .object_cutter
                .as_ref()
                .is_none_or(|cutter| !Arc::ptr_eq(cutter.mesh(), &mesh));
            if stale {
                self.object_cutter = Some(MeshCutter::new(mesh));
            }
            if let Some(cutter) = self.object_cutter.as_mut() {
                cutter.set_plane(state.clip.plane);
                cutter.set_transform(model.instance_transform);
                cutter.refresh();
            }
        }

        // Support-Querschnitt: Timestamp-gesteuert; ohne fertigen Schritt
        // wird der Cache komplett verworfen — nie veraltete Supports zeigen
        if skip || !supports.is_step_done() {
            self.supports_cutter = None;
            self.supports_timestamp = None;
            return;
        }
        match supports.support_mesh() {
            Some(mesh) if !mesh.is_empty() => {
                let timestamp = supports.timestamp();
                if self.supports_cutter.is_none() || self.supports_timestamp != Some(timestamp) {
                    self.supports_cutter = Some(MeshCutter::new(mesh));
                    self.supports_timestamp = Some(timestamp);
                }
                if let Some(cutter) = self.supports_cutter.as_mut() {
                    cutter.set_plane(state.clip.plane);
                    cutter.set_transform(supports.support_transform());
                    cutter.refresh();
                }
            }
            _ => {
                self.supports_cutter = None;
                self.supports_timestamp = None;
            }
        }
    }

    // ── Hollowing-Job ───────────────────────────────────────────────

    /// Stoesst die Hollowing-Vorschau an (nicht-blockierend).
    ///
    /// Ein laufender Job wird ersetzt; nur das Ergebnis des zuletzt
    /// gestarteten Jobs wird uebernommen (last-write-wins).
    pub fn trigger_hollow(&mut self, state: &GizmoState) {
        if !state.get_bool_option(crate::shared::options::HOLLOWING_ENABLE) {
            log::debug!("Hollowing nicht aktiviert, Vorschau uebersprungen");
            return;
        }
        let Some(model) = state.model.as_deref() else {
            return;
        };

        let params = state.hollowing_params();
        log::info!(
            "Hollowing-Vorschau gestartet (Offset {:.2}, Qualitaet {:.2})",
            params.offset,
            params.quality
        );
        self.hollow_job = Some(HollowJob::spawn(
            self.engine.clone(),
            model.mesh.clone(),
            params,
        ));
    }

    /// Pollt den laufenden Job und uebernimmt ein fertiges Ergebnis.
    fn poll_hollow_job(&mut self, state: &mut GizmoState, scene: &SceneContext<'_>) {
        let Some(job) = self.hollow_job.as_mut() else {
            return;
        };
        let Some(result) = job.try_take() else {
            return;
        };
        self.hollow_job = None;

        self.cavity_mesh = result.map(Arc::new);
        self.cavity_buffers = self
            .cavity_mesh
            .as_ref()
            .map(|mesh| Arc::new(MeshBuffers::from_mesh(mesh, CAVITY_COLOR)));
        // Querschnitt ab jetzt gegen die Kavitaet schneiden
        self.object_cutter = None;

        if self.cavity_mesh.is_some() {
            log::info!("Hollowing-Ergebnis uebernommen");
            if state.clip.distance == 0.0 {
                state.clip.distance = 0.5;
                clip::update_clipping_plane(state, scene.camera, false);
            }
        } else {
            log::warn!("Hollowing lieferte kein Ergebnis");
        }
    }

    /// Gibt zurueck, ob ein Hollowing-Job laeuft.
    pub fn hollow_job_running(&self) -> bool {
        self.hollow_job.is_some()
    }

    /// Das zuletzt uebernommene Kavitaets-Mesh.
    pub fn cavity_mesh(&self) -> Option<&Arc<TriangleMesh>> {
        self.cavity_mesh.as_ref()
    }

    // ── Event-Dispatch (Gesten-Zustandsmaschine) ────────────────────

    /// Verarbeitet ein Eingabe-Event des Host-Canvas.
    ///
    /// `handled == false` bedeutet: das Event war nicht fuer das Gizmo
    /// bestimmt (der Host darf z.B. eine Kamera-Rotation daraus machen).
    pub fn handle_event(
        &mut self,
        state: &mut GizmoState,
        scene: &SceneContext<'_>,
        event: GizmoEvent,
    ) -> EventResponse {
        match event {
            GizmoEvent::LeftDown { screen, modifiers } if modifiers.any() => {
                self.left_down_with_modifiers(state, screen, modifiers)
            }
            GizmoEvent::LeftDown { screen, .. } => self.left_down_plain(state, scene, screen),
            GizmoEvent::LeftUp { .. } | GizmoEvent::ShiftUp | GizmoEvent::AltUp
                if state.gesture.rectangle.is_some() =>
            {
                self.finalize_rectangle(state, scene)
            }
            GizmoEvent::LeftUp { .. } => {
                if state.gesture.wait_for_up {
                    state.gesture.wait_for_up = false;
                    EventResponse::handled()
                } else {
                    EventResponse::ignored()
                }
            }
            GizmoEvent::ShiftUp | GizmoEvent::AltUp => EventResponse::ignored(),
            GizmoEvent::Dragging { screen } => {
                if state.gesture.wait_for_up {
                    // Punkt wurde gerade platziert, Taste noch unten:
                    // konsumieren, sonst beginnt der Host eine Rotation
                    return EventResponse::handled();
                }
                if let Some(rectangle) = state.gesture.rectangle.as_mut() {
                    rectangle.dragging(screen);
                    return EventResponse::handled_with_refresh();
                }
                EventResponse::ignored()
            }
            GizmoEvent::Delete => {
                if let Some(hover) = state.selection.hover_id {
                    if !state.selection.selected.get(hover).copied().unwrap_or(false) {
                        selection::select_none(state);
                        selection::select_point(state, hover);
                    }
                }
                editing::delete_selected(state);
                EventResponse::handled_with_refresh()
            }
            GizmoEvent::RightDown => {
                if let Some(hover) = state.selection.hover_id {
                    selection::select_none(state);
                    selection::select_point(state, hover);
                    editing::delete_selected(state);
                    EventResponse::handled_with_refresh()
                } else {
                    EventResponse::ignored()
                }
            }
            GizmoEvent::SelectAll => {
                selection::select_all(state);
                EventResponse::handled_with_refresh()
            }
            GizmoEvent::MouseWheelUp { modifiers } if modifiers.ctrl => {
                clip::wheel_step(state, scene.camera, true);
                EventResponse::handled()
            }
            GizmoEvent::MouseWheelDown { modifiers } if modifiers.ctrl => {
                clip::wheel_step(state, scene.camera, false);
                EventResponse::handled()
            }
            GizmoEvent::MouseWheelUp { .. } | GizmoEvent::MouseWheelDown { .. } => {
                EventResponse::ignored()
            }
            GizmoEvent::ResetClippingPlane => {
                clip::update_clipping_plane(state, scene.camera, false);
                EventResponse::handled()
            }
        }
    }

    /// LeftDown mit Modifier: Rechteck starten oder Punkt togglen.
    fn left_down_with_modifiers(
        &mut self,
        state: &mut GizmoState,
        screen: Vec2,
        modifiers: Modifiers,
    ) -> EventResponse {
        match state.selection.hover_id {
            None => {
                if modifiers.shift || modifiers.alt {
                    let mode = if modifiers.alt {
                        RectangleMode::Deselect
                    } else {
                        RectangleMode::Select
                    };
                    state.gesture.rectangle = Some(RectangleSelection::start_dragging(screen, mode));
                }
            }
            Some(hover) => {
                // Punkt unter dem Cursor hat Vorrang vor der Rechteck-Geste
                if state.selection.selected.get(hover).copied().unwrap_or(false) {
                    selection::unselect_point(state, hover);
                } else if !modifiers.alt {
                    selection::select_point(state, hover);
                }
            }
        }
        EventResponse::handled()
    }

    /// LeftDown ohne Modifier: platzieren, Selektion aufheben oder an den
    /// Host zurueckgeben (Drag-Beginn auf gehovertem Punkt).
    fn left_down_plain(
        &mut self,
        state: &mut GizmoState,
        scene: &SceneContext<'_>,
        screen: Vec2,
    ) -> EventResponse {
        if state.gesture.rectangle.is_some() {
            return EventResponse::ignored();
        }
        // Gehoverter Punkt: Drag-Beginn gehoert dem Host
        if state.selection.hover_id.is_some() {
            return EventResponse::ignored();
        }

        if !state.selection.selection_empty {
            // Klick ins Leere bei bestehender Selektion: nur deselektieren
            selection::select_none(state);
            return EventResponse::handled();
        }

        let Some(hit) = self.unproject_on_mesh(state, scene, screen) else {
            return EventResponse::ignored();
        };

        editing::place_hole(state, hit.0, hit.1);
        state.gesture.wait_for_up = true;
        EventResponse::handled_with_refresh()
    }

    /// Unprojiziert einen Screen-Punkt auf das Objekt-Mesh.
    fn unproject_on_mesh(
        &mut self,
        state: &GizmoState,
        scene: &SceneContext<'_>,
        screen: Vec2,
    ) -> Option<(glam::Vec3, glam::Vec3)> {
        self.ensure_raycaster(state);
        let model = state.model.as_deref()?;
        let clip_plane = (state.clip.distance > 0.0).then_some(&state.clip.plane);
        self.raycaster.as_ref()?.unproject_on_mesh(
            screen,
            model.instance_transform,
            scene.camera,
            scene.viewport,
            clip_plane,
        )
    }

    /// Finalisiert die Rechteck-Geste: Rechteck ∩ Sichtbarkeit anwenden.
    fn finalize_rectangle(
        &mut self,
        state: &mut GizmoState,
        scene: &SceneContext<'_>,
    ) -> EventResponse {
        let Some(rectangle) = state.gesture.rectangle.take() else {
            return EventResponse::ignored();
        };
        self.ensure_raycaster(state);
        let Some(model) = state.model.as_deref() else {
            return EventResponse::handled();
        };
        let Some(raycaster) = self.raycaster.as_ref() else {
            return EventResponse::handled();
        };

        // Weltpositionen unter der AKTUELLEN Instanz-Transformation
        let transform = model.instance_transform;
        let points_world: Vec<glam::Vec3> = model
            .drain_holes
            .iter()
            .map(|hole| transform.transform_point3(hole.position))
            .collect();

        let indices_in_rect =
            rectangle.contained_indices(&points_world, scene.camera, scene.viewport);
        let points_inside: Vec<glam::Vec3> =
            indices_in_rect.iter().map(|&i| points_world[i]).collect();

        let clip_plane = (state.clip.distance > 0.0).then_some(&state.clip.plane);
        let visible =
            raycaster.unobscured_indices(transform, scene.camera, &points_inside, clip_plane);

        selection::apply_rectangle(state, rectangle.mode, &indices_in_rect, &visible);
        EventResponse::handled_with_refresh()
    }

    // ── UI-Buttons ──────────────────────────────────────────────────

    /// Button "Remove selected holes". Der Refresh-Wunsch ersetzt die
    /// Sofort-Neuzeichnen-Schleife des Hosts.
    pub fn remove_selected(&mut self, state: &mut GizmoState) -> EventResponse {
        editing::delete_selected(state);
        EventResponse::handled_with_refresh()
    }

    /// Button "Remove all holes".
    pub fn remove_all(&mut self, state: &mut GizmoState) -> EventResponse {
        editing::delete_all(state);
        EventResponse::handled_with_refresh()
    }

    // ── Drag-Lifecycle (vom Host bei erkannter Drag-Geste gerufen) ──

    /// Drag-Beginn auf dem gehoverten Loch.
    pub fn start_dragging(&mut self, state: &mut GizmoState) {
        drag::start_dragging(state);
    }

    /// Drag-Update: Loch dem Cursor folgen lassen (live, ohne History).
    /// Ohne Mesh-Treffer unter dem Cursor bleibt das Loch stehen.
    pub fn update_drag(&mut self, state: &mut GizmoState, scene: &SceneContext<'_>, screen: Vec2) {
        if state.selection.hover_id.is_none() {
            return;
        }
        let Some((hit, hit_normal)) = self.unproject_on_mesh(state, scene, screen) else {
            return;
        };
        drag::update_drag(state, hit, hit_normal);
    }

    /// Drag-Ende: History-Commit per Rollback-then-Redo.
    pub fn stop_dragging(&mut self, state: &mut GizmoState) {
        drag::stop_dragging(state);
    }

    // ── Undo/Redo ───────────────────────────────────────────────────

    /// Fuehrt einen Undo-Schritt aus, falls vorhanden.
    pub fn undo(&mut self, state: &mut GizmoState) {
        let current = super::history::Snapshot::from_state(state);
        if let Some(prev) = state.history.pop_undo_with_current(current) {
            prev.apply_to(state);
            log::info!("Undo ausgefuehrt");
        } else {
            log::debug!("Undo: nichts zu tun");
        }
    }

    /// Fuehrt einen Redo-Schritt aus, falls vorhanden.
    pub fn redo(&mut self, state: &mut GizmoState) {
        let current = super::history::Snapshot::from_state(state);
        if let Some(next) = state.history.pop_redo_with_current(current) {
            next.apply_to(state);
            log::info!("Redo ausgefuehrt");
        } else {
            log::debug!("Redo: nichts zu tun");
        }
    }

    // ── Render-Szene ────────────────────────────────────────────────

    /// Baut die CPU-seitige Render-Szene fuer den Display- oder
    /// Picking-Pass.
    pub fn build_render_scene(&self, state: &GizmoState, mode: RenderMode) -> RenderScene {
        let holes = render::build_hole_instances(state, mode);

        if mode == RenderMode::Picking {
            // Picking zeichnet ausschliesslich die Punkte
            return RenderScene {
                holes,
                object_section: Vec::new(),
                supports_section: Vec::new(),
                cavity: None,
            };
        }

        let section_active = state.clip.distance > 0.0;
        let object_section = if section_active {
            self.object_cutter
                .as_ref()
                .map(|cutter| render::section_vertices(cutter.triangles(), render::SECTION_OBJECT_COLOR))
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        let supports_section = if section_active && state.show_supports {
            self.supports_cutter
                .as_ref()
                .map(|cutter| render::section_vertices(cutter.triangles(), render::SECTION_SUPPORTS_COLOR))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        RenderScene {
            holes,
            object_section,
            supports_section,
            cavity: self.cavity_buffers.clone(),
        }
    }
}
