//! Run the default pendulum for ten simulated seconds and print the energy
//! readout once per simulated second.
//!
//! `RUST_LOG=debug cargo run -p pendula --example double_pendulum`

use pendula::{ParamId, Session};

fn main() -> pendula::Result<()> {
    env_logger::init();

    let mut session = Session::default();
    session.set_parameter(ParamId::Theta1, 120.0)?;
    session.set_parameter(ParamId::Theta2, -30.0)?;
    session.play();

    println!("{:>6} {:>12} {:>12} {:>10} {:>7}", "t", "energy", "drift", "quality", "trail");
    for frame_index in 1..=600 {
        let frame = session.step();
        if frame_index % 60 == 0 {
            let quality = frame.quality.map_or("n/a", |q| q.as_str());
            println!(
                "{:>6.2} {:>12.6} {:>12.3e} {:>10} {:>7}",
                frame.time,
                frame.energy,
                frame.energy_drift,
                quality,
                frame.trail.len()
            );
        }
    }

    if let Some(pose) = session.frame().pose {
        println!("bob 2 at ({:.1}, {:.1}) px", pose.mass2[0], pose.mass2[1]);
    }
    Ok(())
}
