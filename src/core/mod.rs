//! Core-Domaenentypen: Mesh, Kamera, Loecher, Raycaster, Clipping.

pub mod camera;
pub mod clipping;
pub mod hole;
pub mod mesh;
pub mod model;
pub mod raycast;

pub use camera::Camera;
pub use clipping::{ClippingPlane, MeshCutter};
pub use hole::{clear_holes, push_hole, remove_selected_holes, DrainHole};
pub use mesh::{Ray, TriangleMesh};
pub use model::{ModelObject, ObjectId};
pub use raycast::MeshRaycaster;
