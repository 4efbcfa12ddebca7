//! Damped spring integrator.
//!
//! A plain value type: configuration, position, velocity and target, moved
//! forward by [`Spring::step`]. Integration is implicit (backward) Euler
//! over 1 ms sub-steps. Each sub-step solves the linear spring equation
//! exactly for the new velocity, so it never gains energy whatever the
//! mass, tension and friction: a light or stiff spring still settles.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Integration sub-step in seconds.
const SUB_STEP: f64 = 0.001;

/// Longest frame delta integrated in one step. Longer gaps (a stalled
/// terminal, a debugger pause) are treated as this long.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Physical constants of a spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub mass: f64,
    pub tension: f64,
    pub friction: f64,
    /// Displacement and velocity below this count as settled.
    pub precision: f64,
}

impl SpringConfig {
    /// The decoder's spring: heavy and overdamped, so progress creeps in
    /// without overshooting.
    pub const DECODER: Self = Self {
        mass: 10.0,
        tension: 170.0,
        friction: 120.0,
        precision: 0.05,
    };

    /// A lighter, bouncier spring for general use.
    pub const GENTLE: Self = Self {
        mass: 1.0,
        tension: 170.0,
        friction: 26.0,
        precision: 0.01,
    };

    /// Spring whose friction is exactly the critical damping for `mass`
    /// and `tension`.
    pub fn critically_damped(mass: f64, tension: f64) -> Self {
        Self {
            mass,
            tension,
            friction: 2.0 * (tension * mass).sqrt(),
            precision: Self::DECODER.precision,
        }
    }

    /// Damping ratio: 1 is critical, above 1 overdamped, below 1 bouncy.
    pub fn damping_ratio(&self) -> f64 {
        self.friction / (2.0 * (self.tension * self.mass).sqrt())
    }

    /// Replace unusable constants with the decoder defaults.
    pub fn normalized(self) -> Self {
        let d = Self::DECODER;
        let positive = |v: f64, fallback: f64, name: &str| {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                log::warn!("spring {name} {v} is not a positive number; using {fallback}");
                fallback
            }
        };
        // Without friction the spring oscillates forever and never settles
        Self {
            mass: positive(self.mass, d.mass, "mass"),
            tension: positive(self.tension, d.tension, "tension"),
            friction: positive(self.friction, d.friction, "friction"),
            precision: positive(self.precision, d.precision, "precision"),
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DECODER
    }
}

/// A spring in motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    position: f64,
    velocity: f64,
    target: f64,
    settled: bool,
}

impl Spring {
    /// Spring at rest at `from`, pulled toward `to`.
    pub fn new(config: SpringConfig, from: f64, to: f64) -> Self {
        let mut spring = Self {
            config: config.normalized(),
            position: from,
            velocity: 0.0,
            target: to,
            settled: false,
        };
        spring.settled = spring.within_precision();
        if spring.settled {
            spring.snap();
        }
        spring
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Move the target, keeping current position and velocity.
    pub fn retarget(&mut self, to: f64) {
        self.target = to;
        self.settled = self.within_precision();
    }

    /// Jump straight to the target and stop.
    pub fn snap(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
        self.settled = true;
    }

    /// Advance by `dt` (clamped to [`MAX_FRAME_DELTA`]).
    ///
    /// Returns true once the spring has settled. A settled spring does not
    /// move.
    pub fn step(&mut self, dt: Duration) -> bool {
        if self.settled {
            return true;
        }

        let dt = dt.min(MAX_FRAME_DELTA).as_secs_f64();
        if dt <= 0.0 {
            return false;
        }

        let steps = (dt / SUB_STEP).ceil().max(1.0);
        let h = dt / steps;
        let SpringConfig {
            mass,
            tension,
            friction,
            ..
        } = self.config;

        // v' = v + h·a(x', v'), x' = x + h·v', solved for v'
        let denominator = 1.0 + h * friction / mass + h * h * tension / mass;
        for _ in 0..steps as u32 {
            let displacement = self.position - self.target;
            self.velocity = (self.velocity - h * tension * displacement / mass) / denominator;
            self.position += self.velocity * h;
        }

        if !self.position.is_finite() || !self.velocity.is_finite() {
            log::warn!("spring state diverged ({:?}); snapping to target", self.config);
            self.snap();
        } else if self.within_precision() {
            self.snap();
        }
        self.settled
    }

    fn within_precision(&self) -> bool {
        (self.position - self.target).abs() < self.config.precision
            && self.velocity.abs() < self.config.precision
    }
}

// =============================================================================
// TESTS
// =============================================================================
