//! Eingabe-Events des Host-Canvas und die Antwort des Gizmos.

use glam::Vec2;

/// Zustand der Modifier-Tasten zum Zeitpunkt eines Events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift gedrueckt
    pub shift: bool,
    /// Alt gedrueckt
    pub alt: bool,
    /// Ctrl/Cmd gedrueckt
    pub ctrl: bool,
}

impl Modifiers {
    /// Keine Modifier gedrueckt.
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        ctrl: false,
    };

    /// Gibt `true` zurueck, wenn irgendein Modifier gedrueckt ist.
    pub fn any(&self) -> bool {
        self.shift || self.alt || self.ctrl
    }
}

/// Vom Host-Canvas klassifizierte Eingabe-Events.
///
/// Der Host ruft [`crate::app::HollowGizmo::handle_event`] auf und wertet die
/// Antwort aus: ein nicht behandeltes Event darf er anderweitig
/// interpretieren (z.B. als Kamera-Rotation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GizmoEvent {
    /// Linke Maustaste gedrueckt
    LeftDown { screen: Vec2, modifiers: Modifiers },
    /// Linke Maustaste losgelassen
    LeftUp { screen: Vec2, modifiers: Modifiers },
    /// Shift losgelassen (finalisiert eine aktive Rechteck-Geste)
    ShiftUp,
    /// Alt losgelassen (finalisiert eine aktive Rechteck-Geste)
    AltUp,
    /// Cursor-Bewegung bei gedrueckter linker Taste
    Dragging { screen: Vec2 },
    /// Rechte Maustaste gedrueckt
    RightDown,
    /// Entf-Taste
    Delete,
    /// Alles-selektieren-Shortcut
    SelectAll,
    /// Mausrad nach oben
    MouseWheelUp { modifiers: Modifiers },
    /// Mausrad nach unten
    MouseWheelDown { modifiers: Modifiers },
    /// Expliziter Reset der Clipping-Ebene
    ResetClippingPlane,
}

/// Antwort des Gizmos auf ein Event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventResponse {
    /// Das Event wurde konsumiert; der Host darf es nicht weiterverwenden
    pub handled: bool,
    /// Der Host soll sofort einen weiteren Frame zeichnen
    pub needs_refresh: bool,
}

impl EventResponse {
    /// Event nicht behandelt.
    pub fn ignored() -> Self {
        Self {
            handled: false,
            needs_refresh: false,
        }
    }

    /// Event konsumiert, kein Neuzeichnen noetig.
    pub fn handled() -> Self {
        Self {
            handled: true,
            needs_refresh: false,
        }
    }

    /// Event konsumiert, sofort neu zeichnen.
    pub fn handled_with_refresh() -> Self {
        Self {
            handled: true,
            needs_refresh: true,
        }
    }
}
