/// Camera and object placement, and the control commands that update them between frames
use nalgebra::{Matrix4, Vector3};

use crate::error::{Error, Result};
use crate::transform::Transform;

/// Radians applied per rotate command
pub const ROTATION_STEP: f64 = 0.1;
/// Units applied per move or dolly command
pub const MOVE_STEP: f64 = 5.0;

/// Discrete camera/object control commands produced by an input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    RotateLeft,
    RotateRight,
    RotateUp,
    RotateDown,
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    DollyOut,
    DollyIn,
}

/// Per-frame camera and object parameters.
///
/// `camera_position` is spherical `(r, phi, zenith)` around `camera_target`;
/// see [`CameraState::eye`] for the cartesian eye point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub camera_position: Vector3<f64>,
    pub camera_target: Vector3<f64>,
    pub camera_up: Vector3<f64>,
    pub object_position: Vector3<f64>,
    pub rotation_x: f64,
    pub rotation_y: f64,
}

impl CameraState {
    pub fn new() -> Self {
        Self {
            camera_position: Vector3::new(12.0, std::f64::consts::PI, 0.0),
            camera_target: Vector3::zeros(),
            camera_up: Vector3::new(0.0, 1.0, 0.0),
            object_position: Vector3::zeros(),
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }

    /// Cartesian eye position
    pub fn eye(&self) -> Vector3<f64> {
        spherical_to_cartesian(&self.camera_position, &self.camera_target)
    }

    /// Unit vector from the eye towards the target
    pub fn view_direction(&self) -> Vector3<f64> {
        (self.camera_target - self.eye()).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        Transform::view(&self.eye(), &self.camera_target, &self.camera_up)
    }

    /// Object rotation only, as applied to normals
    pub fn rotation_matrix(&self) -> Matrix4<f64> {
        Transform::rotation(self.rotation_x, self.rotation_y)
    }

    /// `Scale × RotationX × RotationY × Translation`
    pub fn model_matrix(&self, scale: f64) -> Matrix4<f64> {
        let p = self.object_position;
        let scaled = Transform::multiply(&Transform::scale(scale, scale, scale), &self.rotation_matrix());
        Transform::multiply(&scaled, &Transform::translation(p.x, p.y, p.z))
    }

    pub fn apply(&mut self, command: ControlCommand) {
        match command {
            ControlCommand::RotateLeft => self.rotation_y -= ROTATION_STEP,
            ControlCommand::RotateRight => self.rotation_y += ROTATION_STEP,
            ControlCommand::RotateUp => self.rotation_x -= ROTATION_STEP,
            ControlCommand::RotateDown => self.rotation_x += ROTATION_STEP,
            ControlCommand::MoveForward => self.shift(Vector3::new(0.0, 0.0, MOVE_STEP)),
            ControlCommand::MoveBack => self.shift(Vector3::new(0.0, 0.0, -MOVE_STEP)),
            ControlCommand::MoveLeft => self.shift(Vector3::new(MOVE_STEP, 0.0, 0.0)),
            ControlCommand::MoveRight => self.shift(Vector3::new(-MOVE_STEP, 0.0, 0.0)),
            ControlCommand::DollyOut => self.camera_position.x += MOVE_STEP,
            ControlCommand::DollyIn => self.camera_position.x -= MOVE_STEP,
        }
    }

    /// Apply every active command, in order
    pub fn apply_all<I: IntoIterator<Item = ControlCommand>>(&mut self, commands: I) {
        for command in commands {
            self.apply(command);
        }
    }

    // The object and the camera target travel together
    fn shift(&mut self, delta: Vector3<f64>) {
        self.object_position += delta;
        self.camera_target += delta;
    }

    /// Reject configurations for which the view matrix is undefined
    pub fn validate(&self) -> Result<()> {
        let finite = self
            .camera_position
            .iter()
            .chain(self.camera_target.iter())
            .chain(self.camera_up.iter())
            .chain(self.object_position.iter())
            .chain([self.rotation_x, self.rotation_y].iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::DegenerateCamera("non-finite camera parameter"));
        }

        let up_len = self.camera_up.norm();
        if up_len < 1e-9 {
            return Err(Error::DegenerateCamera("up vector is zero"));
        }

        let forward = self.camera_target - self.eye();
        let forward_len = forward.norm();
        if forward_len < 1e-9 {
            return Err(Error::DegenerateCamera("camera sits on its target"));
        }

        if self.camera_up.cross(&forward).norm() < 1e-9 * up_len * forward_len {
            return Err(Error::DegenerateCamera("up vector is parallel to the view direction"));
        }
        Ok(())
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new()
    }
}

/// Spherical `(r, phi, zenith)` around `center` to cartesian coordinates
pub fn spherical_to_cartesian(v: &Vector3<f64>, center: &Vector3<f64>) -> Vector3<f64> {
    let (r, phi, zenith) = (v.x, v.y, v.z);
    Vector3::new(
        r * zenith.cos() * phi.sin(),
        r * zenith.sin(),
        -r * zenith.cos() * phi.cos(),
    ) + center
}
