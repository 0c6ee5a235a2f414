//! Arena geometry

use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::PaddleId};

/// Geometry and speeds of the playing field.
///
/// Coordinates follow screen conventions: x grows to the right, y grows
/// downward, and a paddle's `y` is its top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
    pub paddle_width: f64,
    pub paddle_height: f64,
    /// Horizontal gap between a side wall and the paddle facing it
    pub paddle_inset: f64,
    pub paddle_speed: f64,
    pub ball_radius: f64,
    /// Initial horizontal ball speed
    pub ball_speed_x: f64,
    /// Initial vertical ball speed, and the bound of the randomized serve
    pub ball_speed_y: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            paddle_width: 20.0,
            paddle_height: 80.0,
            paddle_inset: 50.0,
            paddle_speed: 50.0,
            ball_radius: 10.0,
            ball_speed_x: 50.0,
            ball_speed_y: 50.0,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfiguration {
                    message: format!("arena {name} must be positive and finite, got {value}"),
                });
            }
        }
        if self.paddle_height >= self.height {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "paddle height {} must be smaller than arena height {}",
                    self.paddle_height, self.height
                ),
            });
        }
        if self.paddle_inset < 0.0 || 2.0 * (self.paddle_inset + self.paddle_width) > self.width {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "paddle inset {} does not fit in arena width {}",
                    self.paddle_inset, self.width
                ),
            });
        }
        if self.paddle_speed < 0.0 || self.ball_speed_x < 0.0 || self.ball_speed_y < 0.0 {
            return Err(Error::InvalidConfiguration {
                message: "speeds must be non-negative".to_string(),
            });
        }
        Ok(())
    }

    /// Largest legal paddle `y` (top edge).
    pub fn max_paddle_y(&self) -> f64 {
        self.height - self.paddle_height
    }

    /// Paddle `y` that centers a paddle vertically.
    pub fn centered_paddle_y(&self) -> f64 {
        self.height / 2.0 - self.paddle_height / 2.0
    }

    /// Left edge of the given paddle.
    pub fn paddle_x(&self, paddle: PaddleId) -> f64 {
        match paddle {
            PaddleId::Left => self.paddle_inset,
            PaddleId::Right => self.width - self.paddle_inset - self.paddle_width,
        }
    }

    /// Bounding box of a paddle whose top edge is at `y`.
    pub fn paddle_rect(&self, paddle: PaddleId, y: f64) -> Rect {
        let min_x = self.paddle_x(paddle);
        Rect {
            min_x,
            min_y: y,
            max_x: min_x + self.paddle_width,
            max_y: y + self.paddle_height,
        }
    }

    /// Bounding box of a ball centered at `(x, y)`.
    pub fn ball_rect(&self, x: f64, y: f64) -> Rect {
        Rect {
            min_x: x - self.ball_radius,
            min_y: y - self.ball_radius,
            max_x: x + self.ball_radius,
            max_y: y + self.ball_radius,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Strict overlap test; boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }
}
