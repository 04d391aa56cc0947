//! SLA Hollowing-Gizmo Library.
//! Interaktions- und Zustandslogik fuer das Platzieren, Verschieben und
//! Selektieren von Drainage-Loechern auf einem Dreiecksnetz, inklusive
//! Clipping-Ebene, Hollowing-Vorschau und Undo/Redo-Snapshots.

pub mod app;
pub mod core;
pub mod render;
pub mod shared;

pub use app::{
    EditHistory, EventResponse, FrameOutcome, GizmoEvent, GizmoSnapshot, GizmoState, HollowGizmo,
    HollowingEngine, Modifiers, NoSupports, RectangleMode, RectangleSelection, SceneContext,
    SelectionState, SliderSignal, Snapshot, SupportStepProvider,
};
pub use core::{
    Camera, ClippingPlane, DrainHole, MeshCutter, MeshRaycaster, ModelObject, ObjectId, Ray,
    TriangleMesh,
};
pub use render::{HoleInstance, MeshBuffers, RenderMode, RenderScene, SectionVertex};
pub use shared::{ConfigStore, HollowingParams, OptionValue};
