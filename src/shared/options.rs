//! Zentrale Konfiguration fuer den Hollowing-Gizmo.
//!
//! Die `const`-Werte sind die eingebauten Defaults; der [`ConfigStore`]
//! schichtet darueber Preset-Werte und Objekt-Overrides (Suchreihenfolge:
//! Objekt → Preset → Default).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── Drainage-Loecher ────────────────────────────────────────────────

/// Fester Ueberstand, mit dem ein Loch-Zylinder sichtbar aus der
/// Oberflaeche herausragt (Welteinheiten, mm).
pub const HOLE_STICK_OUT_LENGTH: f32 = 1.0;
/// Standard-Radius neu platzierter Loecher.
pub const DEFAULT_NEW_HOLE_RADIUS: f32 = 2.0;
/// Standard-Tiefe neu platzierter Loecher (ohne Ueberstand).
pub const DEFAULT_NEW_HOLE_HEIGHT: f32 = 6.0;
/// Obergrenze fuer den Loch-Radius-Slider.
pub const NEW_HOLE_RADIUS_MAX: f32 = 20.0;
/// Untergrenze fuer den Loch-Radius-Slider.
pub const NEW_HOLE_RADIUS_MIN: f32 = 0.1;

// ── Clipping-Ebene ──────────────────────────────────────────────────

/// Schrittweite der Clip-Distanz bei Mausrad + Modifier.
pub const CLIP_WHEEL_STEP: f32 = 0.01;

// ── Hollowing-Parameter (Slider-Bereiche) ───────────────────────────

/// Maximale Wandstaerke (Offset) im Hollowing-Slider.
pub const HOLLOWING_OFFSET_MAX: f32 = 5.0;
/// Maximale Closing-Distanz im Hollowing-Slider.
pub const HOLLOWING_CLOSING_DISTANCE_MAX: f32 = 10.0;

// ── Konfigurations-Schluessel ───────────────────────────────────────

/// Hollowing fuer das Objekt aktiviert.
pub const HOLLOWING_ENABLE: &str = "hollowing_enable";
/// Wandstaerke des ausgehoehlten Shells in mm.
pub const HOLLOWING_MIN_THICKNESS: &str = "hollowing_min_thickness";
/// Qualitaet/Aufloesung des Hollowing-Schritts (0..1).
pub const HOLLOWING_QUALITY: &str = "hollowing_quality";
/// Closing-Distanz des morphologischen Schliessens in mm.
pub const HOLLOWING_CLOSING_DISTANCE: &str = "hollowing_closing_distance";

/// Wert einer Konfigurations-Option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolescher Schalter
    Bool(bool),
    /// Gleitkomma-Parameter
    Float(f32),
}

impl OptionValue {
    /// Gibt den Bool-Wert zurueck, falls die Option boolesch ist.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(b),
            OptionValue::Float(_) => None,
        }
    }

    /// Gibt den Float-Wert zurueck, falls die Option numerisch ist.
    pub fn as_float(self) -> Option<f32> {
        match self {
            OptionValue::Float(f) => Some(f),
            OptionValue::Bool(_) => None,
        }
    }
}

/// Parameter fuer den externen Hollowing-Schritt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HollowingParams {
    /// Wandstaerke des Shells in mm
    pub offset: f32,
    /// Qualitaet/Aufloesung (0..1)
    pub quality: f32,
    /// Closing-Distanz in mm
    pub closing_distance: f32,
}

impl Default for HollowingParams {
    fn default() -> Self {
        Self {
            offset: 3.0,
            quality: 0.5,
            closing_distance: 2.0,
        }
    }
}

/// Geschichteter Konfigurations-Store.
///
/// Objekt-Overrides liegen auf dem [`crate::core::ModelObject`] selbst; der
/// Store haelt die Preset-Schicht und kennt die eingebauten Defaults.
/// Die Preset-Schicht wird als `sla_hollow_gizmo.toml` neben der Binary
/// gespeichert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigStore {
    /// Preset-Schicht (zwischen Objekt-Override und Default)
    preset: HashMap<String, OptionValue>,
}

impl ConfigStore {
    /// Erstellt einen Store ohne Preset-Werte.
    pub fn new() -> Self {
        Self {
            preset: HashMap::new(),
        }
    }

    /// Eingebauter Default fuer einen bekannten Schluessel.
    pub fn builtin_default(key: &str) -> Option<OptionValue> {
        let defaults = HollowingParams::default();
        match key {
            HOLLOWING_ENABLE => Some(OptionValue::Bool(false)),
            HOLLOWING_MIN_THICKNESS => Some(OptionValue::Float(defaults.offset)),
            HOLLOWING_QUALITY => Some(OptionValue::Float(defaults.quality)),
            HOLLOWING_CLOSING_DISTANCE => Some(OptionValue::Float(defaults.closing_distance)),
            _ => None,
        }
    }

    /// Sucht eine Option: Objekt-Override → Preset → eingebauter Default.
    pub fn get(
        &self,
        object: Option<&crate::core::ModelObject>,
        key: &str,
    ) -> Option<OptionValue> {
        object
            .and_then(|model| model.config.get(key).copied())
            .or_else(|| self.preset.get(key).copied())
            .or_else(|| Self::builtin_default(key))
    }

    /// Setzt einen Wert in der Preset-Schicht.
    pub fn set_preset(&mut self, key: &str, value: OptionValue) {
        self.preset.insert(key.to_string(), value);
    }

    /// Laedt die Preset-Schicht aus einer TOML-Datei. Bei Fehler: leer.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(store) => {
                    log::info!("Konfiguration geladen aus: {}", path.display());
                    store
                }
                Err(e) => {
                    log::warn!("Konfigurations-Datei fehlerhaft, verwende Defaults: {}", e);
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("Keine Konfigurations-Datei gefunden, verwende Defaults");
                Self::new()
            }
        }
    }

    /// Speichert die Preset-Schicht als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Konfiguration gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Konfigurations-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("sla_hollow_gizmo"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("sla_hollow_gizmo.toml")
    }
}
