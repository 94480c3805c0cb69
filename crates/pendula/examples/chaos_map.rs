//! Compute a chaos map over (θ1, θ2), write it as a PNG next to a JSON
//! description of the snapshot.
//!
//! `RUST_LOG=info cargo run --release -p pendula --example chaos_map -- [resolution] [out.png]`

use std::env;
use std::fs;

use pendula::{ChaosAxis, ExportOptions, Session, SessionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let resolution: usize = match args.next() {
        Some(arg) => arg.parse()?,
        None => 60,
    };
    let out = args.next().unwrap_or_else(|| "chaos_map.png".to_string());

    let mut config = SessionConfig::default();
    config.chaos_map.resolution = resolution;
    let mut session = Session::new(config)?;
    session.set_chaos_axes(ChaosAxis::Theta1, ChaosAxis::Theta2)?;

    let result = session.ensure_chaos_map_blocking()?;
    println!(
        "{}x{} map, max exponent {:.4}",
        result.resolution(),
        result.resolution(),
        result.max_value()
    );

    let snapshot = session.export_snapshot(&ExportOptions::default())?;
    fs::write(&out, snapshot.encode_png()?)?;
    fs::write(format!("{out}.json"), snapshot.to_json()?)?;
    println!("wrote {out}");
    Ok(())
}
