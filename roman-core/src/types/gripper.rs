use serde::{Deserialize, Serialize};

/// Number of fingers of the three-finger gripper.
pub const FINGERS: usize = 3;

/// Finger selector of a gripper command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finger {
    #[default]
    All,
    A,
    B,
    C,
}

impl Finger {
    /// Whether this selector addresses the finger with the given index.
    pub fn selects(self, index: usize) -> bool {
        match self {
            Finger::All => index < FINGERS,
            Finger::A => index == 0,
            Finger::B => index == 1,
            Finger::C => index == 2,
        }
    }
}

/// Finger position: `0` is fully opened, `255` fully closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GripperPosition(pub u8);

impl GripperPosition {
    pub const OPENED: Self = Self(0);
    pub const CLOSED: Self = Self(255);

    /// Position as a fraction of the closing stroke in `[0, 1]`.
    pub fn to_ratio(self) -> f64 {
        f64::from(self.0) / 255.0
    }

    /// Nearest position to the given fraction of the closing stroke.
    pub fn from_ratio(ratio: f64) -> Self {
        Self((ratio.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

impl From<u8> for GripperPosition {
    fn from(value: u8) -> Self {
        Self(value)
    }
}
