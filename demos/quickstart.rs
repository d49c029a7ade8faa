use std::sync::Arc;

use chrono::Utc;
use miqat::{preset_board, Countdown, EngineConfig, PresetCities, Session, SystemClock};

fn main() -> Result<(), miqat::MiqatError> {
    let presets = PresetCities::default();
    let aachen = presets
        .find("Aachen")
        .ok_or_else(|| miqat::MiqatError::unresolved("Aachen", "not a preset city"))?
        .resolve()?;

    let session = Session::new(aachen, EngineConfig::default(), Arc::new(SystemClock))?;
    let snapshot = session.evaluate();

    println!("{} at {}", session.location().name(), snapshot.clock.now());
    match &snapshot.prayers {
        Ok(prayers) => {
            for (prayer, at) in prayers.iter() {
                println!("  {prayer:<8} {}", at.format("%H:%M"));
            }
        }
        Err(err) => println!("  prayer times unavailable: {err}"),
    }
    match &snapshot.phase {
        Ok(report) => println!("phase: {report}"),
        Err(err) => println!("phase unavailable: {err}"),
    }
    if let Ok(bearing) = snapshot.qibla {
        println!("qibla: {bearing:.1}°");
    }

    println!();
    for entry in preset_board(Utc::now())? {
        match entry.iftar {
            Ok(iftar) => {
                let left = match iftar.countdown {
                    Countdown::Remaining(_) => format!("in {}", iftar.countdown),
                    Countdown::Passed => iftar.countdown.to_string(),
                };
                println!("{:<22} {}  {left}", entry.city, iftar.maghrib.format("%H:%M %Z"));
            }
            Err(err) => println!("{:<22} {err}", entry.city),
        }
    }
    Ok(())
}
