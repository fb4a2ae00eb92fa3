use super::types::GpsBounds;

const GRID: f64 = 10_000.0;
const MARGIN: f64 = 0.0001;

fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

fn clamp_lng(lng: f64) -> f64 {
    lng.clamp(-180.0, 180.0)
}

fn round_up(deg: f64) -> f64 {
    (deg * GRID).ceil() / GRID + MARGIN
}

fn round_down(deg: f64) -> f64 {
    (deg * GRID).floor() / GRID - MARGIN
}

/// Parses `north,east,south,west` into a widened bounding box.
///
/// Swapped edges are put back in order and out-of-range coordinates are
/// clamped, so only the shape of the input can make this fail.
pub fn gps_bounds(bounds: &str) -> Result<GpsBounds, String> {
    if bounds.trim().is_empty() {
        return Err("no coordinates found".to_string());
    }

    let parts: Vec<&str> = bounds.splitn(5, ',').collect();
    if parts.len() != 4 {
        return Err(format!("expected 4 coordinates, found {}", parts.len()));
    }

    let mut coords = [0f64; 4];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        let value = part
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid coordinate: {}", part.trim()))?;
        if !value.is_finite() {
            return Err(format!("invalid coordinate: {}", part.trim()));
        }
        *slot = value;
    }

    let [mut north, mut east, mut south, mut west] = coords;
    if north < south {
        std::mem::swap(&mut north, &mut south);
    }
    if east < west {
        std::mem::swap(&mut east, &mut west);
    }

    Ok(GpsBounds {
        north: round_up(clamp_lat(north)),
        east: round_up(clamp_lng(east)),
        south: round_down(clamp_lat(south)),
        west: round_down(clamp_lng(west)),
    })
}
