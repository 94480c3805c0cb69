//! Snapshot export.
//!
//! A snapshot is everything needed to reproduce an exported picture of the
//! current experiment: the parameter table, both axis descriptions, the
//! chaos map upscaled with its overlay, and a cross-hair on the cell nearest
//! the current parameter values. It is a pure function of a
//! [`ChaosMapResult`] and a [`Params`].

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage, imageops};
use pendula_lyapunov::ChaosMapResult;
use pendula_model::{ChaosAxis, ParamId, Params};
use serde::Serialize;

use crate::raster::{MapOverlay, render_chaos_map};
use crate::Result;

const MARKER: Rgb<u8> = Rgb([255, 255, 255]);
const MARKER_OUTLINE: Rgb<u8> = Rgb([10, 8, 18]);
/// Largest side of an exported image (px).
pub const MAX_EXPORT_SIDE: u32 = 8192;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Output pixels per map cell. Clamped so the image side stays within
    /// [`MAX_EXPORT_SIDE`].
    pub scale: u32,
    pub overlay: Option<MapOverlay>,
    /// Cross-hair arm length in output pixels.
    pub marker_arm: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 4,
            overlay: Some(MapOverlay::default()),
            marker_arm: 10,
        }
    }
}

/// One row of the exported parameter table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamRow {
    pub name: &'static str,
    pub label: &'static str,
    /// Value formatted with the parameter's display precision.
    pub value: String,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisInfo {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
}

impl From<ChaosAxis> for AxisInfo {
    fn from(axis: ChaosAxis) -> Self {
        let spec = axis.spec();
        Self {
            name: spec.name,
            label: spec.label,
            unit: spec.unit,
            min: spec.min,
            max: spec.max,
        }
    }
}

/// Marked chaos-map cell and the parameter values it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub col: usize,
    pub row: usize,
    pub x_value: f64,
    pub y_value: f64,
    /// Exponent stored in the cell.
    pub exponent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub parameters: Vec<ParamRow>,
    pub axis_x: AxisInfo,
    pub axis_y: AxisInfo,
    pub resolution: usize,
    pub max_exponent: f64,
    pub marker: Marker,
    /// Hex signature of the map the snapshot was drawn from.
    pub signature: String,
    #[serde(skip)]
    pub image: RgbImage,
}

impl Snapshot {
    /// Metadata (everything but the image) as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// The parameter table for `params`, in table order.
pub fn parameter_table(params: &Params) -> Vec<ParamRow> {
    ParamId::ALL
        .into_iter()
        .map(|id| {
            let spec = id.spec();
            ParamRow {
                name: spec.name,
                label: spec.label,
                value: spec.format(params.get_external(id)),
                unit: spec.unit,
            }
        })
        .collect()
}

/// Assemble a snapshot of `result` marked at the cell nearest `params`.
pub fn compose_snapshot(
    result: &ChaosMapResult,
    params: &Params,
    options: &ExportOptions,
) -> Snapshot {
    let grid = result.grid();
    let (axis_x, axis_y) = (grid.axis_x(), grid.axis_y());
    let (col, row) = grid.cell_at(
        params.get_external(axis_x.param()),
        params.get_external(axis_y.param()),
    );
    let (x_value, y_value) = grid.cell_values(col, row);
    let marker = Marker {
        col,
        row,
        x_value,
        y_value,
        exponent: result.value(col, row).unwrap_or(0.0),
    };

    let map = render_chaos_map(result, options.overlay.as_ref());
    let scale = export_scale(map.width(), options.scale);
    let size = map.width() * scale;
    let mut image = imageops::resize(&map, size, size, imageops::FilterType::Nearest);
    let centre = (
        col as u32 * scale + scale / 2,
        row as u32 * scale + scale / 2,
    );
    draw_crosshair(&mut image, centre, options.marker_arm);

    Snapshot {
        parameters: parameter_table(params),
        axis_x: axis_x.into(),
        axis_y: axis_y.into(),
        resolution: result.resolution(),
        max_exponent: result.max_value(),
        marker,
        signature: result.signature().to_string(),
        image,
    }
}

/// Pixels per cell for a `size`-pixel map: at least 1, and small enough
/// that the upscaled side fits [`MAX_EXPORT_SIDE`].
fn export_scale(size: u32, requested: u32) -> u32 {
    let limit = (MAX_EXPORT_SIDE / size.max(1)).max(1);
    requested.clamp(1, limit)
}

fn put(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

/// Cross-hair with a one-pixel dark outline so it reads on any colour.
fn draw_crosshair(image: &mut RgbImage, centre: (u32, u32), arm: u32) {
    let (cx, cy) = (centre.0 as i64, centre.1 as i64);
    let arm = arm as i64;
    for d in -arm - 1..=arm + 1 {
        for side in [-1, 1] {
            put(image, cx + d, cy + side, MARKER_OUTLINE);
            put(image, cx + side, cy + d, MARKER_OUTLINE);
        }
    }
    for d in -arm..=arm {
        put(image, cx + d, cy, MARKER);
        put(image, cx, cy + d, MARKER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::map_with;

    #[test]
    fn test_parameter_table() {
        let table = parameter_table(&Params::default());
        assert_eq!(table.len(), 10);
        assert_eq!(table[0].name, "m1");
        assert_eq!(table[0].value, "1.00");
        assert_eq!(table[4].name, "theta1");
        assert_eq!(table[4].value, "90.0");
        assert_eq!(table[8].value, "9.81");
    }

    #[test]
    fn test_marker_follows_params() {
        let result = map_with(ChaosAxis::Theta1, ChaosAxis::Theta2, 10, |col, row| {
            (col + row) as f64
        });
        let mut params = Params::default();
        params.set_external(ParamId::Theta1, -180.0).unwrap();
        params.set_external(ParamId::Theta2, -180.0).unwrap();
        let snapshot = compose_snapshot(&result, &params, &ExportOptions::default());

        assert_eq!((snapshot.marker.col, snapshot.marker.row), (0, 9));
        assert_eq!(snapshot.marker.exponent, 9.0);
        assert_eq!(snapshot.image.dimensions(), (40, 40));
        assert_eq!(*snapshot.image.get_pixel(2, 38), MARKER);
        assert_eq!(snapshot.axis_y.name, "theta2");
        assert_eq!(snapshot.max_exponent, 18.0);
    }

    #[test]
    fn test_export_scale_is_bounded() {
        assert_eq!(export_scale(100, 4), 4);
        assert_eq!(export_scale(100, 0), 1);
        assert_eq!(export_scale(100, u32::MAX), 81);
        assert_eq!(export_scale(400, u32::MAX) * 400, 8000);
        assert_eq!(export_scale(10_000, 3), 1);

        let result = map_with(ChaosAxis::Theta1, ChaosAxis::Theta2, 4, |_, _| 0.0);
        let options = ExportOptions {
            scale: 0,
            ..ExportOptions::default()
        };
        let snapshot = compose_snapshot(&result, &Params::default(), &options);
        assert_eq!(snapshot.image.dimensions(), (4, 4));
        // Flat field: the exported maximum falls back to 1.
        assert_eq!(snapshot.max_exponent, 1.0);
    }

    #[test]
    fn test_snapshot_is_reproducible() {
        let result = map_with(ChaosAxis::Omega1, ChaosAxis::Omega2, 6, |col, _| col as f64);
        let params = Params::default();
        let a = compose_snapshot(&result, &params, &ExportOptions::default());
        let b = compose_snapshot(&result, &params, &ExportOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_json_and_png() {
        let result = map_with(ChaosAxis::Theta1, ChaosAxis::Omega1, 4, |_, _| 1.0);
        let snapshot = compose_snapshot(&result, &Params::default(), &ExportOptions::default());
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"axis_x\""));
        assert!(json.contains("\"signature\""));
        assert!(!json.contains("\"image\""));

        let png = snapshot.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
