//! Fill missing positions from the nearest positioned sample in elapsed time.

use super::types::{FusionError, Sample};

/// Give every sample without a position the position of its nearest
/// positioned neighbour, measured by `|elapsed_time|` difference.
///
/// On a tie the earlier sample wins. Altitude is left alone. Returns the
/// number of samples that were filled.
pub fn backfill_positions(samples: &mut [Sample]) -> Result<usize, FusionError> {
    // Indices of positioned samples, ascending; searched once per hole.
    let anchors: Vec<usize> = samples
        .iter()
        .enumerate()
        .filter(|(_, s)| s.has_position())
        .map(|(i, _)| i)
        .collect();

    if anchors.len() == samples.len() {
        return Ok(0);
    }
    if anchors.is_empty() {
        return Err(FusionError::NoPositionsFound);
    }

    let mut filled = 0;
    for i in 0..samples.len() {
        if samples[i].has_position() {
            continue;
        }

        let (lat, lon) = nearest_anchor(samples, &anchors, i)
            .and_then(|source| samples[source].position())
            .ok_or(FusionError::NoPositionsFound)?;
        samples[i].position_lat = Some(lat);
        samples[i].position_long = Some(lon);
        filled += 1;
    }

    tracing::debug!(
        "Backfilled {} of {} samples from {} positioned samples",
        filled,
        samples.len(),
        anchors.len()
    );

    Ok(filled)
}

/// Pick the anchor closest to `index` in elapsed time. `anchors` is an
/// ascending list of indices that does not contain `index`.
fn nearest_anchor(samples: &[Sample], anchors: &[usize], index: usize) -> Option<usize> {
    let split = anchors.partition_point(|&a| a < index);
    let previous = split.checked_sub(1).map(|k| anchors[k]);
    let next = anchors.get(split).copied();

    match (previous, next) {
        (Some(p), Some(n)) => {
            let elapsed = samples[index].elapsed_time;
            let to_previous = (elapsed - samples[p].elapsed_time).abs();
            let to_next = (elapsed - samples[n].elapsed_time).abs();
            Some(if to_previous <= to_next { p } else { n })
        }
        (previous, next) => previous.or(next),
    }
}
