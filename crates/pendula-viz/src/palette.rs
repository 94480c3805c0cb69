//! Colours.

use image::Rgb;
use pendula_math::lerp;

/// Stable end of the chaos gradient.
pub const STABLE: Rgb<u8> = Rgb([26, 74, 138]);
/// Midpoint of the chaos gradient.
pub const TRANSITION: Rgb<u8> = Rgb([138, 74, 138]);
/// Chaotic end of the chaos gradient.
pub const CHAOTIC: Rgb<u8> = Rgb([255, 74, 74]);

/// Overlay line colour for the chaos map.
pub const OVERLAY: Rgb<u8> = Rgb([232, 240, 255]);

/// Round half up to the nearest channel value.
fn channel(v: f64) -> u8 {
    (v + 0.5).floor().clamp(0.0, 255.0) as u8
}

fn mix(a: Rgb<u8>, b: Rgb<u8>, t: f64) -> Rgb<u8> {
    Rgb([
        channel(lerp(a[0] as f64, b[0] as f64, t)),
        channel(lerp(a[1] as f64, b[1] as f64, t)),
        channel(lerp(a[2] as f64, b[2] as f64, t)),
    ])
}

/// Colour of a chaos-map cell: blue (stable) through purple to red (chaotic).
///
/// `value` is normalized by `max` and clamped to `[0, 1]`. A non-finite
/// ratio is drawn as stable.
pub fn chaos_color(value: f64, max: f64) -> Rgb<u8> {
    let n = value / max;
    let n = if n.is_nan() { 0.0 } else { n.clamp(0.0, 1.0) };
    if n < 0.5 {
        mix(STABLE, TRANSITION, n * 2.0)
    } else {
        mix(TRANSITION, CHAOTIC, (n - 0.5) * 2.0)
    }
}

/// Alpha-blend `color` over `base`.
pub fn blend(base: Rgb<u8>, color: Rgb<u8>, alpha: f64) -> Rgb<u8> {
    let alpha = alpha.clamp(0.0, 1.0);
    Rgb([
        channel(lerp(base[0] as f64, color[0] as f64, alpha)),
        channel(lerp(base[1] as f64, color[1] as f64, alpha)),
        channel(lerp(base[2] as f64, color[2] as f64, alpha)),
    ])
}
