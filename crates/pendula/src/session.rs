//! The session: one simulated pendulum, its trail, and its chaos map.
//!
//! A [`Session`] owns the parameters, the live state and the chaos-map
//! builder. Hosts drive it from two callbacks on the same thread: the
//! animation callback calls [`Session::step`] (or [`Session::step_at`]) once
//! per display refresh, and the batch callback calls
//! [`Session::tick_chaos_map`] to compute one bounded chunk of the current
//! sweep. Each sweep works on its own copy of the parameters, so edits made
//! while it runs never leak into its cells.
//!
//! Play states:
//!
//! ```text
//!            play                 pause
//! Stopped ─────────▶ Playing ─────────▶ Paused
//!    ▲                  ▲     play        │
//!    │                  └─────────────────┘
//!    └──────── reset (from any state) ◀───┘
//! ```
//!
//! Editing an initial condition (θ1, θ2, ω1, ω2) while not playing resets
//! the state so the displayed pose matches the new value. Other edits take
//! effect on the next step.

use pendula_guardian::{ConservationMonitor, ConservationState, SolverQuality};
use pendula_lyapunov::{ChaosMapBuilder, ChaosMapResult, SweepGrid, SweepHandle};
use pendula_model::{
    ChaosAxis, ChaosMapConfig, ParamId, Params, SessionConfig, SimulationConfig, State,
    TrailConfig,
};
use pendula_rigid::{bob_positions, total_energy};
use pendula_viz::{ExportOptions, Pose, Projector, Snapshot, TrailVertex, compose_snapshot};
use pendula_world::Trail;

use crate::{Result, SessionError, Simulator};

/// Playback state of the real-time loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Frozen at the initial conditions.
    #[default]
    Stopped,
    Playing,
    /// Frozen mid-trajectory.
    Paused,
}

impl PlayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayState::Stopped => "stopped",
            PlayState::Playing => "playing",
            PlayState::Paused => "paused",
        }
    }
}

/// Everything a display surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Simulated time since the last reset (s).
    pub time: f64,
    pub play_state: PlayState,
    /// `None` once the trajectory is no longer finite.
    pub pose: Option<Pose>,
    /// Empty when the trail is disabled.
    pub trail: Vec<TrailVertex>,
    /// Total mechanical energy (J).
    pub energy: f64,
    /// Relative energy drift since the last reset.
    pub energy_drift: f64,
    /// Integration quality from the drift; `None` while damping drains
    /// energy on purpose.
    pub quality: Option<SolverQuality>,
}

/// Result of picking a chaos-map cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPick {
    pub col: usize,
    pub row: usize,
    /// Swept X parameter and its value (external units).
    pub x: (ParamId, f64),
    /// Swept Y parameter and its value (external units).
    pub y: (ParamId, f64),
}

/// Invert the sweep mapping for a pixel of a `width × height` canvas
/// showing `result`.
pub fn pick_chaos_map_cell(
    result: &ChaosMapResult,
    px: f64,
    py: f64,
    width: f64,
    height: f64,
) -> Option<CellPick> {
    let grid = result.grid();
    let (col, row) = grid.pick_cell(px, py, width, height)?;
    let (x, y) = grid.cell_values(col, row);
    Some(CellPick {
        col,
        row,
        x: (grid.axis_x().param(), x),
        y: (grid.axis_y().param(), y),
    })
}

fn check_setting(setting: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(SessionError::InvalidSetting {
            setting,
            value,
            min,
            max,
        })
    }
}

pub struct Session {
    config: SessionConfig,
    params: Params,
    /// Damping as last set, kept while damping is switched off.
    damping: f64,
    damping_enabled: bool,
    state: State,
    play_state: PlayState,
    simulator: Simulator,
    trail: Trail,
    baseline: ConservationState,
    /// Host clock of the last frame (s).
    clock: f64,
    axes: (ChaosAxis, ChaosAxis),
    builder: ChaosMapBuilder,
}

impl Session {
    /// Create a session with default parameters. The configuration is
    /// validated first.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SessionConfig) -> Self {
        let params = Params::default();
        let state = State::from_params(&params);
        Self {
            trail: Trail::new(&config.trail),
            builder: ChaosMapBuilder::new(&config.chaos_map),
            baseline: ConservationState::new(&params, &state.phase),
            damping: params.damping,
            damping_enabled: true,
            params,
            state,
            play_state: PlayState::Stopped,
            simulator: Simulator::new(),
            clock: 0.0,
            axes: (ChaosAxis::Theta1, ChaosAxis::Theta2),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn is_damping_enabled(&self) -> bool {
        self.damping_enabled
    }

    // ---- parameters ----

    /// Validate and store a parameter in external units.
    ///
    /// Rejected values leave the session untouched. Editing an initial
    /// condition while not playing resets the simulation.
    pub fn set_parameter(&mut self, id: ParamId, value: f64) -> Result<()> {
        if id == ParamId::Damping {
            let value = id.spec().check(value)?;
            self.damping = value;
            self.params.damping = if self.damping_enabled { value } else { 0.0 };
        } else {
            self.params.set_external(id, value)?;
        }
        log::debug!("set {id} = {value}");

        if id.is_initial_condition() {
            if self.play_state != PlayState::Playing {
                self.reset();
            }
        } else {
            self.rebaseline();
        }
        Ok(())
    }

    /// [`set_parameter`](Self::set_parameter) by parameter name.
    pub fn set_parameter_by_name(&mut self, name: &str, value: f64) -> Result<()> {
        let id: ParamId = name.parse()?;
        self.set_parameter(id, value)
    }

    /// Parameter value in external units.
    pub fn parameter(&self, id: ParamId) -> f64 {
        if id == ParamId::Damping {
            return self.damping;
        }
        self.params.get_external(id)
    }

    /// Switch damping off (forces it to zero) or back on at its last value.
    pub fn set_damping_enabled(&mut self, enabled: bool) {
        self.damping_enabled = enabled;
        self.params.damping = if enabled { self.damping } else { 0.0 };
        self.rebaseline();
    }

    /// Energy drift is measured from here; the physics just changed.
    fn rebaseline(&mut self) {
        self.baseline = ConservationState::new(&self.params, &self.state.phase);
    }

    // ---- play state ----

    pub fn play(&mut self) {
        if self.play_state != PlayState::Playing {
            log::debug!("{} -> playing", self.play_state.as_str());
            self.play_state = PlayState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.play_state == PlayState::Playing {
            log::debug!("playing -> paused at t = {:.3}", self.state.time);
            self.play_state = PlayState::Paused;
        }
    }

    pub fn toggle_play(&mut self) {
        if self.play_state == PlayState::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Back to the initial conditions, stopped, with an empty trail.
    pub fn reset(&mut self) {
        log::debug!("reset from {}", self.play_state.as_str());
        self.play_state = PlayState::Stopped;
        self.state = State::from_params(&self.params);
        self.trail.clear();
        self.rebaseline();
    }

    // ---- real-time loop ----

    /// Advance one frame on the nominal clock.
    pub fn step(&mut self) -> Frame {
        let now = self.clock + self.config.simulation.frame_interval;
        self.step_at(now)
    }

    /// Advance one frame; `now` is the host clock in seconds and only ages
    /// the trail.
    pub fn step_at(&mut self, now: f64) -> Frame {
        self.clock = now;
        if self.play_state == PlayState::Playing {
            let sim = &self.config.simulation;
            let dt = sim.dt * sim.speed;
            self.simulator
                .simulate(&self.params, &mut self.state, dt, sim.steps_per_frame);

            if self.state.is_finite() {
                let bobs = bob_positions(&self.params, &self.state.phase);
                self.trail.push(bobs.mass2, now);
            } else {
                log::trace!("non-finite state at t = {}, trail point skipped", self.state.time);
                self.trail.prune(now);
            }
        }
        self.frame()
    }

    /// Renderable view of the current state without advancing it.
    pub fn frame(&self) -> Frame {
        let projector = Projector::for_params(&self.config.render, &self.params);
        let phase = &self.state.phase;
        let monitor = ConservationMonitor::check(&self.baseline, &self.params, phase);
        let quality = if self.params.damping > 0.0 {
            None
        } else {
            Some(SolverQuality::assess_from_monitor(
                &monitor,
                self.config.simulation.energy_tolerance,
            ))
        };
        Frame {
            time: self.state.time,
            play_state: self.play_state,
            pose: projector.project(&self.params, phase),
            trail: if self.config.trail.enabled {
                projector.project_trail(&self.trail)
            } else {
                Vec::new()
            },
            energy: total_energy(&self.params, phase),
            energy_drift: monitor.energy_error,
            quality,
        }
    }

    // ---- display and trail settings ----

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.config.simulation.speed =
            check_setting("speed", speed, SimulationConfig::SPEED_RANGE)?;
        Ok(())
    }

    pub fn set_trail_duration(&mut self, seconds: f64) -> Result<()> {
        let seconds = check_setting("trail duration", seconds, TrailConfig::DURATION_RANGE)?;
        self.config.trail.duration = seconds;
        self.trail.duration = seconds;
        self.trail.prune(self.clock);
        Ok(())
    }

    pub fn set_trail_infinite(&mut self, infinite: bool) {
        self.config.trail.infinite = infinite;
        self.trail.infinite = infinite;
    }

    /// Hide or show the trail. Points are recorded either way.
    pub fn set_trail_enabled(&mut self, enabled: bool) {
        self.config.trail.enabled = enabled;
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<()> {
        let range = (1.0, f64::MAX);
        let width = check_setting("viewport width", width, range)?;
        let height = check_setting("viewport height", height, range)?;
        self.config.render.width = width;
        self.config.render.height = height;
        Ok(())
    }

    // ---- chaos map ----

    pub fn chaos_axes(&self) -> (ChaosAxis, ChaosAxis) {
        self.axes
    }

    /// Select the swept parameters. The next request sweeps them.
    pub fn set_chaos_axes(&mut self, axis_x: ChaosAxis, axis_y: ChaosAxis) -> Result<()> {
        SweepGrid::new(axis_x, axis_y, self.config.chaos_map.resolution)?;
        self.axes = (axis_x, axis_y);
        Ok(())
    }

    /// Grid for the current axes and resolution.
    pub fn chaos_grid(&self) -> Result<SweepGrid> {
        let (x, y) = self.axes;
        Ok(SweepGrid::new(x, y, self.config.chaos_map.resolution)?)
    }

    /// Start (or join) a sweep. The axes and resolution become current.
    pub fn request_chaos_map(
        &mut self,
        axis_x: ChaosAxis,
        axis_y: ChaosAxis,
        resolution: usize,
    ) -> Result<SweepHandle> {
        let grid = SweepGrid::new(axis_x, axis_y, resolution)?;
        self.axes = (axis_x, axis_y);
        self.config.chaos_map.resolution = resolution;
        Ok(self.builder.request(grid, &self.params))
    }

    /// Make sure a map for the current axes and parameters exists or is
    /// being computed.
    pub fn ensure_chaos_map(&mut self) -> Result<SweepHandle> {
        let grid = self.chaos_grid()?;
        Ok(self.builder.request(grid, &self.params))
    }

    /// Drop the finished map and start over.
    pub fn recompute_chaos_map(&mut self) -> Result<SweepHandle> {
        self.builder.discard();
        self.ensure_chaos_map()
    }

    /// Compute a current map right now on the rayon pool, unless one exists.
    pub fn ensure_chaos_map_blocking(&mut self) -> Result<&ChaosMapResult> {
        let grid = self.chaos_grid()?;
        let handle = self.builder.compute_parallel(grid, &self.params);
        self.builder
            .result(handle)
            .ok_or(SessionError::UnknownSweep(handle))
    }

    /// Compute one chunk of the running sweep. True while work remains.
    pub fn tick_chaos_map(&mut self) -> bool {
        self.builder.tick()
    }

    pub fn progress(&self, handle: SweepHandle) -> Result<f64> {
        self.builder
            .progress(handle)
            .ok_or(SessionError::UnknownSweep(handle))
    }

    pub fn result(&self, handle: SweepHandle) -> Option<&ChaosMapResult> {
        self.builder.result(handle)
    }

    pub fn cancel(&mut self, handle: SweepHandle) -> bool {
        self.builder.cancel(handle)
    }

    pub fn chaos_builder(&self) -> &ChaosMapBuilder {
        &self.builder
    }

    pub fn chaos_builder_mut(&mut self) -> &mut ChaosMapBuilder {
        &mut self.builder
    }

    pub fn chaos_map_config(&self) -> &ChaosMapConfig {
        &self.config.chaos_map
    }

    /// The finished map, provided it still matches the current axes and
    /// parameters.
    pub fn current_chaos_map(&self) -> Result<&ChaosMapResult> {
        let result = self.builder.latest().ok_or(SessionError::NoChaosMap)?;
        let expected = self.builder.signature(&self.chaos_grid()?, &self.params);
        let found = result.signature();
        if expected != found {
            return Err(SessionError::StaleChaosMap { expected, found });
        }
        Ok(result)
    }

    /// Select the cell under a pixel of the displayed map: both swept
    /// parameters take the cell's values and the simulation resets.
    pub fn pick_chaos_map_cell(
        &mut self,
        px: f64,
        py: f64,
        width: f64,
        height: f64,
    ) -> Result<CellPick> {
        let pick = pick_chaos_map_cell(self.current_chaos_map()?, px, py, width, height)
            .ok_or(SessionError::PickOutOfBounds { x: px, y: py })?;

        // Validate both before writing either.
        let (x_id, x) = pick.x;
        let (y_id, y) = pick.y;
        let mut params = self.params;
        params.set_external(x_id, x)?;
        params.set_external(y_id, y)?;
        self.params = params;

        log::debug!("picked cell ({}, {}): {x_id} = {x}, {y_id} = {y}", pick.col, pick.row);
        self.reset();
        Ok(pick)
    }

    /// Snapshot of the current map marked at the current parameters.
    pub fn export_snapshot(&self, options: &ExportOptions) -> Result<Snapshot> {
        let result = self.current_chaos_map()?;
        Ok(compose_snapshot(result, &self.params, options))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::with_valid_config(SessionConfig::default())
    }
}
