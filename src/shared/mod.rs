//! Geteilte Typen fuer layer-uebergreifende Vertraege.
//!
//! Enthaelt Konstanten, Laufzeit-Optionen und den geschichteten
//! Konfigurations-Store, die zwischen `app` und `render` geteilt werden.

pub mod options;

pub use options::{ConfigStore, HollowingParams, OptionValue};
pub use options::{
    CLIP_WHEEL_STEP, DEFAULT_NEW_HOLE_HEIGHT, DEFAULT_NEW_HOLE_RADIUS, HOLE_STICK_OUT_LENGTH,
};
