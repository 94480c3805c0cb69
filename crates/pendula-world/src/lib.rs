//! Recorded history of a running pendulum.
//!
//! The trail follows the second bob. Points are kept in pendulum-plane
//! coordinates (meters from the pivot, `y` down) so the display can be
//! resized without distorting history.

pub mod trail;

pub use trail::{Trail, TrailPoint, TrailStats};
