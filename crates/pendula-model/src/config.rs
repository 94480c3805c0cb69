//! Session configuration and its JSON loader.

use serde::{Deserialize, Serialize};

use crate::error::{ParamError, Result};

/// Top-level configuration for a simulation session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub simulation: SimulationConfig,
    pub trail: TrailConfig,
    pub chaos_map: ChaosMapConfig,
    pub render: RenderConfig,
}

/// Real-time integration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Internal RK4 step (s), before the speed multiplier.
    pub dt: f64,
    /// RK4 sub-steps per displayed frame.
    pub steps_per_frame: usize,
    /// Playback speed multiplier applied to `dt`.
    pub speed: f64,
    /// Nominal host frame interval (s) used when no timestamp is supplied.
    pub frame_interval: f64,
    /// Relative energy drift considered "at tolerance" when grading frames.
    pub energy_tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 0.001,
            steps_per_frame: 10,
            speed: 1.0,
            frame_interval: 1.0 / 60.0,
            energy_tolerance: 1e-3,
        }
    }
}

impl SimulationConfig {
    pub const SPEED_RANGE: (f64, f64) = (0.1, 5.0);
}

/// Trail history settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Whether frames include the trail.
    pub enabled: bool,
    /// Keep points regardless of age (still capped by `max_length`).
    pub infinite: bool,
    /// Maximum point age (s) when not infinite.
    pub duration: f64,
    /// Hard cap on stored points.
    pub max_length: usize,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            infinite: false,
            duration: 5.0,
            max_length: 2000,
        }
    }
}

impl TrailConfig {
    pub const DURATION_RANGE: (f64, f64) = (0.5, 30.0);
}

/// Chaos-map sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaosMapConfig {
    /// Grid side length.
    pub resolution: usize,
    /// Simulated duration per cell (s).
    pub simulation_time: f64,
    /// RK4 step used by the estimator (s).
    pub dt: f64,
    /// Initial separation of the perturbed trajectory.
    pub perturbation: f64,
    /// Cells computed per cooperative tick.
    pub chunk_size: usize,
}

impl Default for ChaosMapConfig {
    fn default() -> Self {
        Self {
            resolution: 100,
            simulation_time: 10.0,
            dt: 0.01,
            perturbation: 1e-8,
            chunk_size: 100,
        }
    }
}

impl ChaosMapConfig {
    pub const RESOLUTION_RANGE: (usize, usize) = (2, 400);
}

/// Display-surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Viewport width (px).
    pub width: f64,
    /// Viewport height (px).
    pub height: f64,
    /// Pivot height as a fraction of the viewport height.
    pub pivot_y_fraction: f64,
    /// Fraction of the viewport's short side covered by the fully extended pendulum.
    pub fill_fraction: f64,
    pub pivot_radius: f64,
    /// Bob radius (px) for a 1 kg mass.
    pub mass_radius: f64,
    /// Grid divisions drawn over the chaos map.
    pub grid_divisions: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 760.0,
            height: 760.0,
            pivot_y_fraction: 0.38,
            fill_fraction: 0.42,
            pivot_radius: 8.0,
            mass_radius: 15.0,
            grid_divisions: 4,
        }
    }
}

fn invalid(msg: impl Into<String>) -> ParamError {
    ParamError::InvalidConfig(msg.into())
}

fn positive(name: &str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a positive number, got {v}")))
    }
}

impl SessionConfig {
    /// Parse and validate a JSON document. Missing sections take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!("loaded session config: {config:?}");
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every setting for a usable value.
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        positive("simulation.dt", sim.dt)?;
        positive("simulation.frame_interval", sim.frame_interval)?;
        positive("simulation.energy_tolerance", sim.energy_tolerance)?;
        if sim.steps_per_frame == 0 {
            return Err(invalid("simulation.steps_per_frame must be at least 1"));
        }
        let (lo, hi) = SimulationConfig::SPEED_RANGE;
        if !(lo..=hi).contains(&sim.speed) {
            return Err(invalid(format!(
                "simulation.speed must be in [{lo}, {hi}], got {}",
                sim.speed
            )));
        }

        let trail = &self.trail;
        let (lo, hi) = TrailConfig::DURATION_RANGE;
        if !(lo..=hi).contains(&trail.duration) {
            return Err(invalid(format!(
                "trail.duration must be in [{lo}, {hi}], got {}",
                trail.duration
            )));
        }
        if trail.max_length == 0 {
            return Err(invalid("trail.max_length must be at least 1"));
        }

        let chaos = &self.chaos_map;
        let (lo, hi) = ChaosMapConfig::RESOLUTION_RANGE;
        if !(lo..=hi).contains(&chaos.resolution) {
            return Err(invalid(format!(
                "chaos_map.resolution must be in [{lo}, {hi}], got {}",
                chaos.resolution
            )));
        }
        positive("chaos_map.simulation_time", chaos.simulation_time)?;
        positive("chaos_map.dt", chaos.dt)?;
        positive("chaos_map.perturbation", chaos.perturbation)?;
        if chaos.dt > chaos.simulation_time {
            return Err(invalid("chaos_map.dt must not exceed chaos_map.simulation_time"));
        }
        if chaos.chunk_size == 0 {
            return Err(invalid("chaos_map.chunk_size must be at least 1"));
        }

        let render = &self.render;
        positive("render.width", render.width)?;
        positive("render.height", render.height)?;
        positive("render.fill_fraction", render.fill_fraction)?;
        if !(0.0..=1.0).contains(&render.pivot_y_fraction) {
            return Err(invalid("render.pivot_y_fraction must be in [0, 1]"));
        }
        if render.grid_divisions == 0 {
            return Err(invalid("render.grid_divisions must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.steps_per_frame, 10);
        assert_eq!(config.chaos_map.resolution, 100);
        assert_eq!(config.trail.max_length, 2000);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config =
            SessionConfig::from_json(r#"{ "chaos_map": { "resolution": 32 } }"#).unwrap();
        assert_eq!(config.chaos_map.resolution, 32);
        assert_eq!(config.chaos_map.dt, 0.01);
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = SessionConfig::default();
        config.trail.infinite = true;
        config.simulation.speed = 2.0;
        let json = config.to_json().unwrap();
        let back = SessionConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(matches!(
            SessionConfig::from_json(r#"{ "simulation": { "speed": 50.0 } }"#),
            Err(ParamError::InvalidConfig(_))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{ "chaos_map": { "resolution": 1 } }"#),
            Err(ParamError::InvalidConfig(_))
        ));
        assert!(matches!(
            SessionConfig::from_json("{ not json"),
            Err(ParamError::Json(_))
        ));
    }
}
