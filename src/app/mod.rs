//! Application-Layer: Controller, State, Events, History und Use-Cases.

pub mod controller;
pub mod events;
pub mod history;
pub mod jobs;
pub mod scene;
/// Gizmo-Zustand (Selektion, Clipping, Gesten, Defaults)
pub mod state;
pub mod use_cases;

pub use controller::{FrameOutcome, HollowGizmo};
pub use events::{EventResponse, GizmoEvent, Modifiers};
pub use history::{EditHistory, GizmoSnapshot, Snapshot};
pub use jobs::{HollowJob, HollowingEngine};
pub use scene::{NoSupports, SceneContext, SupportStepProvider};
pub use state::{
    ClipState, GestureState, GizmoState, HoleDefaults, RectangleMode, RectangleSelection,
    SelectionState,
};
pub use use_cases::params::SliderSignal;
