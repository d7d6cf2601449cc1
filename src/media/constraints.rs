//! Camera constraint profiles and their fallback order.

use serde::{Deserialize, Serialize};

/// Direction a camera faces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FacingMode {
    /// Front camera, facing the player.
    #[default]
    User,
    /// Back camera.
    Environment,
}

/// Frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Creates a resolution.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 1280×720, the preferred capture size.
    pub const HD: Resolution = Resolution::new(1280, 720);
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One video-only capture request.
///
/// `None` fields are unconstrained. Resolutions are ideal values: a device
/// may deliver another size without failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintProfile {
    /// Required facing direction.
    pub facing: Option<FacingMode>,
    /// Preferred frame size.
    pub ideal_resolution: Option<Resolution>,
}

impl ConstraintProfile {
    /// Profiles tried by camera acquisition, most specific first.
    pub const FALLBACK_CHAIN: [ConstraintProfile; 4] = [
        ConstraintProfile {
            facing: Some(FacingMode::User),
            ideal_resolution: Some(Resolution::HD),
        },
        ConstraintProfile {
            facing: Some(FacingMode::User),
            ideal_resolution: None,
        },
        ConstraintProfile {
            facing: Some(FacingMode::Environment),
            ideal_resolution: None,
        },
        ConstraintProfile {
            facing: None,
            ideal_resolution: None,
        },
    ];

    /// True if a camera facing `facing` satisfies this profile.
    pub fn accepts_facing(&self, facing: FacingMode) -> bool {
        self.facing.is_none_or(|wanted| wanted == facing)
    }
}

impl std::fmt::Display for ConstraintProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.facing, self.ideal_resolution) {
            (Some(facing), Some(res)) => write!(f, "{facing} camera @ {res}"),
            (Some(facing), None) => write!(f, "{facing} camera"),
            (None, Some(res)) => write!(f, "any camera @ {res}"),
            (None, None) => write!(f, "any camera"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order() {
        let labels: Vec<String> = ConstraintProfile::FALLBACK_CHAIN
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            labels,
            [
                "user camera @ 1280x720",
                "user camera",
                "environment camera",
                "any camera"
            ]
        );
    }

    #[test]
    fn test_any_camera_accepts_both() {
        let any = ConstraintProfile::FALLBACK_CHAIN[3];
        assert!(any.accepts_facing(FacingMode::User));
        assert!(any.accepts_facing(FacingMode::Environment));
        assert!(!ConstraintProfile::FALLBACK_CHAIN[0].accepts_facing(FacingMode::Environment));
    }
}
