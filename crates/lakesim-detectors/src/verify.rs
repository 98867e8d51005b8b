//! Sanity checks on simulated surface temperature
//!
//! A crashed or diverged run typically leaves the surface layer frozen at a
//! single value or drifting to unphysical temperatures. The initial time step
//! is skipped since it holds the initial conditions.

use lakesim_core::{Error, Field, FrameReader, Grid, Result};
use tracing::{debug, info};

/// Highest plausible lake temperature (°C)
pub const MAX_TEMPERATURE: f64 = 40.0;

/// Uniform fields at this temperature are a valid cold start
const UNIFORM_START_TEMPERATURE: f64 = 4.0;

/// Verify the surface temperature of every time step after the first
pub fn verify_temperature(readers: &[Box<dyn FrameReader>]) -> Result<()> {
    info!("Verifying simulation results");
    let mut checked = 0usize;

    for (reader_index, reader) in readers.iter().enumerate() {
        let timestamps = reader.timestamps()?;
        let skip = usize::from(reader_index == 0);

        for (time_index, timestamp) in timestamps.iter().enumerate().skip(skip) {
            let grid = reader.read_field(Field::Temperature, time_index, 0)?;
            check_surface(&grid).map_err(|problem| {
                Error::validation(format!("{} at {} ({})", problem, timestamp, reader.name()))
            })?;
            checked += 1;
        }
    }

    debug!(frames = checked, "surface temperature verified");
    Ok(())
}

fn check_surface(grid: &Grid) -> std::result::Result<(), String> {
    // Negative values mark dry or inactive cells in the surface layer, so only
    // the upper bound needs checking
    let values: Vec<f64> = grid.valid_values().into_iter().filter(|&v| v >= 0.0).collect();
    if values.is_empty() {
        return Ok(());
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    if min == mean && mean == max && min != UNIFORM_START_TEMPERATURE {
        return Err(format!("Simulation fails with all same values ({}degC)", mean));
    }
    if max > MAX_TEMPERATURE {
        return Err(format!("Simulation contains unrealistic temperature value ({}degC)", max));
    }
    Ok(())
}
