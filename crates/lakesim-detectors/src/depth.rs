//! Depth-slice resolution

use lakesim_core::{Error, Result};

/// Map a requested depth to the nearest vertical layer
///
/// Layer depths may be stored as positive depths or negative elevations;
/// both are compared by magnitude. The accepted range extends half a layer
/// spacing beyond the outermost layers:
/// `[2·min − second_min, 2·max − second_max]`. Ties resolve to the lower index.
pub fn resolve_depth_index(layer_depths: &[f64], requested: f64) -> Result<usize> {
    if !requested.is_finite() {
        return Err(Error::config(format!("requested depth {} is not a number", requested)));
    }

    match layer_depths.len() {
        0 => return Err(Error::resource("grid has no depth layers")),
        1 => return Ok(0),
        _ => {}
    }

    let depths: Vec<f64> = layer_depths.iter().map(|d| d.abs()).collect();
    if depths.iter().any(|d| !d.is_finite()) {
        return Err(Error::resource("layer depths contain non-finite values"));
    }

    let mut sorted = depths.clone();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let min = 2.0 * sorted[0] - sorted[1];
    let max = 2.0 * sorted[n - 1] - sorted[n - 2];

    if requested < min || requested > max {
        return Err(Error::OutOfRange { requested, min, max });
    }

    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, depth) in depths.iter().enumerate() {
        let distance = (depth - requested).abs();
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }

    Ok(best)
}
