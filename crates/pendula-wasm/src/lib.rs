//! WebAssembly bindings for the pendula session.
//!
//! Arrays cross the boundary flat: frames and trails as `f64`, chaos-map
//! rasters as packed RGB bytes.

use std::fmt::Display;

use pendula::pendula_viz::{MapOverlay, render_chaos_map};
use pendula::{
    ChaosAxis, ExportOptions, Frame, ParamId, Session, SessionConfig, SweepHandle,
};
use wasm_bindgen::prelude::*;

/// Values per frame returned by [`WasmSession::step`].
pub const FRAME_LEN: usize = 13;

fn js_error(err: impl Display) -> JsError {
    JsError::new(&err.to_string())
}

fn parse_axis(name: &str) -> Result<ChaosAxis, JsError> {
    name.parse::<ChaosAxis>().map_err(js_error)
}

/// `[time, pivot x/y, mass1 x/y, mass2 x/y, pivot r, r1, r2, energy, drift,
/// play state]`. Positions are NaN once the trajectory blew up.
fn flatten_frame(frame: &Frame) -> Vec<f64> {
    let mut out = Vec::with_capacity(FRAME_LEN);
    out.push(frame.time);
    match &frame.pose {
        Some(pose) => {
            out.extend_from_slice(&pose.pivot);
            out.extend_from_slice(&pose.mass1);
            out.extend_from_slice(&pose.mass2);
            out.extend([pose.pivot_radius, pose.radius1, pose.radius2]);
        }
        None => out.extend([f64::NAN; 9]),
    }
    out.push(frame.energy);
    out.push(frame.energy_drift);
    out.push(frame.play_state as u8 as f64);
    out
}

#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
    sweep: Option<SweepHandle>,
}

#[wasm_bindgen]
impl WasmSession {
    /// Session with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmSession {
        WasmSession {
            session: Session::default(),
            sweep: None,
        }
    }

    /// Session from a JSON `SessionConfig`; missing fields take defaults.
    pub fn from_config_json(json: &str) -> Result<WasmSession, JsError> {
        let config = SessionConfig::from_json(json).map_err(js_error)?;
        let session = Session::new(config).map_err(js_error)?;
        Ok(WasmSession {
            session,
            sweep: None,
        })
    }

    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), JsError> {
        self.session
            .set_parameter_by_name(name, value)
            .map_err(js_error)
    }

    /// Current value of a parameter in display units.
    pub fn parameter(&self, name: &str) -> Result<f64, JsError> {
        let id = name.parse::<ParamId>().map_err(js_error)?;
        Ok(self.session.parameter(id))
    }

    pub fn set_damping_enabled(&mut self, enabled: bool) {
        self.session.set_damping_enabled(enabled);
    }

    pub fn play(&mut self) {
        self.session.play();
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn toggle_play(&mut self) {
        self.session.toggle_play();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn play_state(&self) -> String {
        self.session.play_state().as_str().to_string()
    }

    /// Advance one frame at the host timestamp `now` (s).
    pub fn step(&mut self, now: f64) -> Vec<f64> {
        flatten_frame(&self.session.step_at(now))
    }

    /// The current frame without advancing.
    pub fn frame(&self) -> Vec<f64> {
        flatten_frame(&self.session.frame())
    }

    /// Trail in screen space as `[x, y, alpha]` triples.
    pub fn trail(&self) -> Vec<f64> {
        self.session
            .frame()
            .trail
            .iter()
            .flat_map(|v| [v.x, v.y, v.alpha])
            .collect()
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), JsError> {
        self.session.set_speed(speed).map_err(js_error)
    }

    pub fn set_trail_duration(&mut self, seconds: f64) -> Result<(), JsError> {
        self.session.set_trail_duration(seconds).map_err(js_error)
    }

    pub fn set_trail_infinite(&mut self, infinite: bool) {
        self.session.set_trail_infinite(infinite);
    }

    pub fn set_trail_enabled(&mut self, enabled: bool) {
        self.session.set_trail_enabled(enabled);
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<(), JsError> {
        self.session.set_viewport(width, height).map_err(js_error)
    }

    /// Start or join a sweep; returns its generation.
    pub fn request_chaos_map(
        &mut self,
        axis_x: &str,
        axis_y: &str,
        resolution: usize,
    ) -> Result<u64, JsError> {
        let handle = self
            .session
            .request_chaos_map(parse_axis(axis_x)?, parse_axis(axis_y)?, resolution)
            .map_err(js_error)?;
        log::debug!("host requested {handle}");
        self.sweep = Some(handle);
        Ok(handle.generation())
    }

    /// Compute one chunk. True while the sweep still has work.
    pub fn tick_chaos_map(&mut self) -> bool {
        self.session.tick_chaos_map()
    }

    /// Progress of the last requested sweep; 0 if it was superseded.
    pub fn progress(&self) -> f64 {
        self.sweep
            .and_then(|handle| self.session.progress(handle).ok())
            .unwrap_or(0.0)
    }

    pub fn cancel_chaos_map(&mut self) -> bool {
        match self.sweep.take() {
            Some(handle) => self.session.cancel(handle),
            None => false,
        }
    }

    /// Current map as `resolution × resolution` packed RGB.
    pub fn chaos_map_pixels(&self, overlay: bool) -> Result<Vec<u8>, JsError> {
        let result = self.session.current_chaos_map().map_err(js_error)?;
        let overlay = overlay.then(|| MapOverlay::from(&self.session.config().render));
        Ok(render_chaos_map(result, overlay.as_ref()).into_raw())
    }

    /// Write the cell under a canvas pixel back into the parameters.
    /// Returns `[col, row, x value, y value]`.
    pub fn pick_chaos_map_cell(
        &mut self,
        px: f64,
        py: f64,
        width: f64,
        height: f64,
    ) -> Result<Vec<f64>, JsError> {
        let pick = self
            .session
            .pick_chaos_map_cell(px, py, width, height)
            .map_err(js_error)?;
        Ok(vec![pick.col as f64, pick.row as f64, pick.x.1, pick.y.1])
    }

    /// Snapshot metadata as JSON.
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        let snapshot = self
            .session
            .export_snapshot(&ExportOptions::default())
            .map_err(js_error)?;
        snapshot.to_json().map_err(js_error)
    }

    /// Snapshot image as PNG bytes.
    pub fn snapshot_png(&self) -> Result<Vec<u8>, JsError> {
        let snapshot = self
            .session
            .export_snapshot(&ExportOptions::default())
            .map_err(js_error)?;
        snapshot.encode_png().map_err(js_error)
    }
}

impl Default for WasmSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ok<T>(result: Result<T, JsError>) -> T {
        match result {
            Ok(value) => value,
            Err(_) => panic!("call returned a JsError"),
        }
    }

    fn quick() -> WasmSession {
        let json = r#"{ "chaos_map": { "simulation_time": 1.0, "chunk_size": 8 } }"#;
        ok(WasmSession::from_config_json(json))
    }

    #[test]
    fn test_frame_layout() {
        let mut sim = WasmSession::new();
        let before = sim.frame();
        assert_eq!(before.len(), FRAME_LEN);
        assert_eq!(before[0], 0.0);

        sim.play();
        let after = sim.step(0.0);
        assert_eq!(after.len(), FRAME_LEN);
        assert!(after[0] > 0.0);
        assert_eq!(after[12], 1.0);
        assert_eq!(sim.play_state(), "playing");
        assert_eq!(sim.trail().len() % 3, 0);
    }

    #[test]
    fn test_parameters_by_name() {
        let mut sim = WasmSession::new();
        ok(sim.set_parameter("theta1", 45.0));
        assert_relative_eq!(ok(sim.parameter("theta1")), 45.0, epsilon = 1e-9);
        ok(sim.set_parameter("g", 1.62));
        assert_relative_eq!(ok(sim.parameter("g")), 1.62);
    }

    #[test]
    fn test_chaos_map_round_trip() {
        let mut sim = quick();
        let generation = ok(sim.request_chaos_map("theta1", "omega2", 4));
        assert_eq!(sim.progress(), 0.0);
        while sim.tick_chaos_map() {}
        assert_eq!(sim.progress(), 1.0);

        let plain = ok(sim.chaos_map_pixels(false));
        assert_eq!(plain.len(), 4 * 4 * 3);
        assert_eq!(ok(sim.chaos_map_pixels(true)).len(), plain.len());

        // Joining the same sweep hands back the same generation.
        assert_eq!(ok(sim.request_chaos_map("theta1", "omega2", 4)), generation);

        let pick = ok(sim.pick_chaos_map_cell(0.0, 0.0, 100.0, 100.0));
        assert_eq!(&pick[..2], &[0.0, 0.0]);
        assert_relative_eq!(ok(sim.parameter("theta1")), pick[2], epsilon = 1e-9);
        assert_relative_eq!(ok(sim.parameter("omega2")), pick[3], epsilon = 1e-9);

        let json = ok(sim.snapshot_json());
        assert!(json.contains("\"theta1\""));
        assert!(!ok(sim.snapshot_png()).is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut sim = quick();
        ok(sim.request_chaos_map("theta1", "theta2", 4));
        assert!(sim.cancel_chaos_map());
        assert!(!sim.tick_chaos_map());
        assert_eq!(sim.progress(), 0.0);
    }
}
