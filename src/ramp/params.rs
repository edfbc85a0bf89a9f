//! Ramp parameters and chain configuration
//!
//! Parameters use the same camelCase keys as the ramp editor stores them in,
//! so a configuration saved by the editor can be loaded as-is:
//!
//! ```
//! use surframp::ramp::{RampParams, RampDirection, Style};
//!
//! let json = r#"{ "styleEnum": "Thin", "rampEnum": "Left", "angle": 45 }"#;
//! let params = RampParams::from_reader(json.as_bytes()).unwrap();
//! assert_eq!(params.style, Style::Thin);
//! assert_eq!(params.direction, RampDirection::Left);
//! assert_eq!(params.width, 256.0);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

use serde::{Deserialize, Serialize};

/// Cross-section shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Style {
    /// Solid triangle
    #[default]
    Wedge,
    /// Sloped wall of a fixed thickness
    Thin,
}

/// Which side(s) of the cross-section carry a playable slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Surf {
    #[default]
    Both,
    Left,
    Right,
}

/// Sweep direction and shape of a ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RampDirection {
    /// Horizontal turn to the right
    #[default]
    Right,
    /// Horizontal turn to the left
    Left,
    Up,
    Down,
    /// Vertical sweep like `Down` with corrected clip volumes
    Arc,
    /// Vertical sweep like `Up` with corrected clip volumes
    Dip,
    Straight,
}

/// Family of a ramp's sweep, used to decide how clip volumes overlap and
/// which junctions between chained ramps can be reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampAxis {
    Horizontal,
    Vertical,
    Straight,
}

impl RampDirection {
    pub fn axis(self) -> RampAxis {
        match self {
            RampDirection::Right | RampDirection::Left => RampAxis::Horizontal,
            RampDirection::Up | RampDirection::Down | RampDirection::Arc | RampDirection::Dip => {
                RampAxis::Vertical
            }
            RampDirection::Straight => RampAxis::Straight,
        }
    }
}

impl RampAxis {
    /// Two ramps can share reconciled clip volumes when they sweep around the
    /// same family of axes or when either one does not sweep at all.
    pub fn is_compatible_with(self, other: RampAxis) -> bool {
        match (self, other) {
            (RampAxis::Straight, _) | (_, RampAxis::Straight) => true,
            (RampAxis::Horizontal, RampAxis::Horizontal) => true,
            (RampAxis::Vertical, RampAxis::Vertical) => true,
            (RampAxis::Horizontal, RampAxis::Vertical)
            | (RampAxis::Vertical, RampAxis::Horizontal) => false,
        }
    }
}

/// How the ramps of a chain attach to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Each ramp attaches its end to the start of the previous ramp
    Start,
    /// Each ramp attaches its start to the end of the previous ramp
    #[default]
    End,
}

/// All parameters of a single ramp
///
/// Immutable for the duration of a generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampParams {
    #[serde(rename = "rampName")]
    pub name: String,
    #[serde(rename = "materialName")]
    pub material: String,
    #[serde(rename = "styleEnum")]
    pub style: Style,
    /// Wall thickness of the `Thin` style
    pub thickness: f64,
    #[serde(rename = "surfEnum")]
    pub surf: Surf,
    #[serde(rename = "rampEnum")]
    pub direction: RampDirection,
    pub width: f64,
    pub height: f64,
    /// Number of segments of a curved sweep
    pub smoothness: u32,
    /// Sweep angle in degrees, 0 means straight
    pub angle: f64,
    /// Length of a straight ramp or radius of a curved one
    pub size: f64,
    #[serde(rename = "uvScale")]
    pub uv_scale: f64,
    /// Entity class wrapping the visual brushes of a chain
    #[serde(rename = "visualEntity")]
    pub visual_entity: String,
}

impl Default for RampParams {
    fn default() -> Self {
        Self {
            name: "ramp".to_string(),
            material: "default".to_string(),
            style: Style::Wedge,
            thickness: 32.0,
            surf: Surf::Both,
            direction: RampDirection::Right,
            width: 256.0,
            height: 320.0,
            smoothness: 16,
            angle: 90.0,
            size: 1024.0,
            uv_scale: 0.25,
            visual_entity: "func_brush".to_string(),
        }
    }
}

impl RampParams {
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// A ramp is straight when it has no sweep angle or is explicitly `Straight`
    pub fn is_straight(&self) -> bool {
        self.angle == 0.0 || self.direction == RampDirection::Straight
    }

    /// The effective sweep family, taking straightness into account
    pub fn axis(&self) -> RampAxis {
        if self.is_straight() {
            RampAxis::Straight
        } else {
            self.direction.axis()
        }
    }

    /// A sweep of a full turn or more closes on itself and has no caps
    pub fn is_loop(&self) -> bool {
        !self.is_straight() && self.angle.abs() >= 360.0
    }

    /// Number of brush segments per swept solid
    pub fn segment_count(&self) -> usize {
        if self.is_straight() {
            1
        } else {
            self.smoothness.max(1) as usize
        }
    }

    pub fn angle_rad(&self) -> f64 {
        self.angle.to_radians()
    }

    /// Parameters of the chain member at `index`, the shared parameters
    /// overridden by the member's own configuration.
    pub fn with_overrides(&self, config: &RampConfig, index: usize) -> RampParams {
        RampParams {
            name: format!("{}_{}", self.name, index + 1),
            direction: config.direction,
            angle: config.angle,
            size: config.size,
            smoothness: config.smoothness.unwrap_or(self.smoothness),
            ..self.clone()
        }
    }
}

/// Per-ramp overrides of a chain member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampConfig {
    #[serde(rename = "rampEnum")]
    pub direction: RampDirection,
    pub angle: f64,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothness: Option<u32>,
}

impl RampConfig {
    pub fn new(direction: RampDirection, angle: f64, size: f64) -> Self {
        Self {
            direction,
            angle,
            size,
            smoothness: None,
        }
    }
}

/// A chain of ramps sharing their cross-section parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    #[serde(rename = "sharedParams")]
    pub shared: RampParams,
    pub ramps: Vec<RampConfig>,
    #[serde(rename = "connectionMode")]
    pub connection_mode: ConnectionMode,
}

impl ChainConfig {
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(error) => Some(error),
            ConfigError::Json(error) => Some(error),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(error) => write!(f, "IO error: {error}"),
            ConfigError::Json(error) => write!(f, "JSON error: {error}"),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(error: io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            ConfigError::Io(error.into())
        } else {
            ConfigError::Json(error)
        }
    }
}
