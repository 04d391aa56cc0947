//! Perspektivische 3D-Kamera mit Screen↔Welt-Umrechnung.

use glam::{Vec2, Vec3};

use super::mesh::Ray;

/// Perspektivische Kamera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in Welt-Koordinaten
    pub position: Vec3,
    /// Blickziel in Welt-Koordinaten
    pub target: Vec3,
    /// Up-Vektor (nicht zwingend orthogonal zur Blickrichtung)
    pub up: Vec3,
    /// Vertikaler Oeffnungswinkel in Radiant
    pub fov_y: f32,
}

impl Camera {
    /// Standard-Oeffnungswinkel (45 Grad).
    pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_4;

    /// Erstellt eine Kamera auf der Z-Achse mit Blick auf den Ursprung.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 100.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: Self::DEFAULT_FOV_Y,
        }
    }

    /// Richtet die Kamera auf einen Punkt aus.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Normierte Blickrichtung.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Orthonormale Kamera-Basis (right, up, forward).
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Welt-Strahl durch einen Screen-Punkt (Pixel, Y nach unten).
    pub fn ray_from_screen(&self, screen: Vec2, viewport: [f32; 2]) -> Ray {
        let ndc_x = (screen.x / viewport[0]) * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen.y / viewport[1]) * 2.0;
        let aspect = viewport[0] / viewport[1];
        let fov_factor = (self.fov_y * 0.5).tan();

        let (right, up, forward) = self.basis();
        let direction =
            (forward + right * (ndc_x * aspect * fov_factor) + up * (ndc_y * fov_factor))
                .normalize();

        Ray {
            origin: self.position,
            direction,
        }
    }

    /// Projiziert einen Weltpunkt auf Screen-Koordinaten (Pixel).
    ///
    /// Gibt `None` zurueck, wenn der Punkt hinter der Kamera liegt.
    pub fn project_to_screen(&self, world: Vec3, viewport: [f32; 2]) -> Option<Vec2> {
        let (right, up, forward) = self.basis();
        let rel = world - self.position;

        let view_z = rel.dot(forward);
        if view_z <= 1e-6 {
            return None;
        }

        let aspect = viewport[0] / viewport[1];
        let fov_factor = (self.fov_y * 0.5).tan();
        let ndc_x = (rel.dot(right) / view_z) / (aspect * fov_factor);
        let ndc_y = (rel.dot(up) / view_z) / fov_factor;

        Some(Vec2::new(
            (ndc_x + 1.0) * 0.5 * viewport[0],
            (1.0 - ndc_y) * 0.5 * viewport[1],
        ))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VIEWPORT: [f32; 2] = [800.0, 600.0];

    #[test]
    fn center_ray_points_along_forward() {
        let camera = Camera::new();
        let ray = camera.ray_from_screen(Vec2::new(400.0, 300.0), VIEWPORT);
        assert_relative_eq!(ray.direction.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ray.direction.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ray.direction.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn project_and_unproject_are_inverse() {
        let camera = Camera::new();
        let screen = Vec2::new(520.0, 180.0);
        let ray = camera.ray_from_screen(screen, VIEWPORT);
        let world = ray.at(80.0);

        let back = camera
            .project_to_screen(world, VIEWPORT)
            .expect("Punkt liegt vor der Kamera");
        assert_relative_eq!(back.x, screen.x, epsilon = 1e-2);
        assert_relative_eq!(back.y, screen.y, epsilon = 1e-2);
    }

    #[test]
    fn point_behind_camera_is_not_projected() {
        let camera = Camera::new();
        assert!(camera
            .project_to_screen(Vec3::new(0.0, 0.0, 200.0), VIEWPORT)
            .is_none());
    }
}
