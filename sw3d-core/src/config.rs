use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::framebuffer::Rgb;

/// Phong material: base colors (0-255 scale) and term weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub ambient: Vector3<f64>,
    pub diffuse: Vector3<f64>,
    // Multiplies the specular term after it is raised to `specular_exponent`.
    pub specular: Vector3<f64>,
    pub ambient_weight: f64,
    pub diffuse_weight: f64,
    pub specular_exponent: i32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vector3::new(60.0, 10.0, 10.0),
            diffuse: Vector3::new(250.0, 100.0, 30.0),
            specular: Vector3::repeat(1.0 / 200.0),
            ambient_weight: 0.5,
            diffuse_weight: 10.0,
            specular_exponent: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    // Output surface size in pixels.
    pub width: usize,
    pub height: usize,
    // Vertical field of view in radians.
    pub fov: f64,
    // Clip plane distances. `far` may be `.inf` to drop the far plane.
    pub near: f64,
    pub far: f64,
    // Uniform scale applied to the model before rotation.
    pub model_scale: f64,
    // Not normalized: its squared length divides the diffuse term.
    pub light_direction: Vector3<f64>,
    pub material: Material,
    pub background: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov: std::f64::consts::PI / 8.0,
            near: 0.1,
            far: 100.0,
            model_scale: 0.4,
            light_direction: Vector3::new(10.0, 0.0, 10.0),
            material: Material::default(),
            background: Rgb::BLACK,
        }
    }
}

fn assertion(cond: bool, err_msg: &str) -> std::result::Result<(), String> {
    if cond {
        Ok(())
    } else {
        Err(err_msg.to_string())
    }
}

impl RenderConfig {
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        assertion(self.width > 0, "width must be greater than 0")?;
        assertion(self.height > 0, "height must be greater than 0")?;
        assertion(
            self.fov > 0.0 && self.fov < std::f64::consts::PI,
            "fov must lie strictly between 0 and pi",
        )?;
        assertion(self.near > 0.0, "near must be greater than 0")?;
        assertion(self.far > self.near, "far must be greater than near")?;
        assertion(
            self.model_scale.is_finite() && self.model_scale != 0.0,
            "model_scale must be finite and non-zero",
        )?;
        assertion(
            self.light_direction.norm_squared() > 0.0,
            "light_direction must be non-zero",
        )?;
        assertion(
            self.material.ambient_weight >= 0.0 && self.material.diffuse_weight >= 0.0,
            "material weights must not be negative",
        )?;
        assertion(
            self.material.specular_exponent >= 0,
            "material.specular_exponent must not be negative",
        )?;
        Ok(())
    }

    pub fn from_yaml(s: &str) -> Result<Self> {
        let config: RenderConfig = serde_yaml::from_str(s)
            .map_err(|e| Error::Config(format!("error parsing config: {}", e)))?;
        config.validate().map_err(Error::Config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.aspect() - 800.0 / 600.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = RenderConfig::from_yaml(
            "width: 320\nheight: 200\nlight_direction: [0, 0, 5]\nmaterial:\n  diffuse_weight: 2.5\n",
        )
        .unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 200);
        assert_eq!(config.light_direction, Vector3::new(0.0, 0.0, 5.0));
        assert_eq!(config.material.diffuse_weight, 2.5);
        assert_eq!(config.material.specular_exponent, 4);
        assert_eq!(config.near, 0.1);
    }

    #[test]
    fn test_infinite_far_plane() {
        let config = RenderConfig::from_yaml("far: .inf\n").unwrap();
        assert!(config.far.is_infinite());
    }

    #[test]
    fn test_invalid_values_rejected() {
        for yaml in [
            "width: 0\n",
            "near: 5\nfar: 1\n",
            "fov: 4.0\n",
            "light_direction: [0, 0, 0]\n",
            "material:\n  specular_exponent: -1\n",
        ] {
            assert!(matches!(RenderConfig::from_yaml(yaml), Err(Error::Config(_))), "{}", yaml);
        }
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        assert!(matches!(
            RenderConfig::from_yaml("width: [1, 2"),
            Err(Error::Config(_))
        ));
    }
}
