use ndarray::Array2;
use rayon::prelude::*;

use super::SemblancePanel;
use super::energy::Workspace;
use crate::bounds::VelocityBounds;
use crate::error::{VelocityError, ensure_len};
use crate::gather::{Gather, VelocityGrid};

/// Cells computed for one velocity column.
struct ColumnPatch {
    velocity_index: usize,
    cells: Vec<(usize, f32)>,
}

/// Semblance restricted to the velocity corridor described by `bounds`.
///
/// Each velocity index is evaluated only over the contiguous time range whose
/// corridor can reach it, padded by `window` for energy aggregation. Cells
/// outside every corridor stay `0.0` and are flagged as not evaluated.
pub fn calc_partial_semblance(
    gather: &Gather,
    velocities: &VelocityGrid,
    bounds: &VelocityBounds,
    window: usize,
) -> Result<SemblancePanel, VelocityError> {
    let num_times = gather.num_times();
    let num_offsets = gather.num_offsets();
    ensure_len("bounds", num_times, bounds.len())?;
    let Some((first_velocity, last_velocity)) = bounds.velocity_index_range() else {
        return Ok(empty_panel(num_times, velocities.len()));
    };
    if last_velocity >= velocities.len() {
        return Err(VelocityError::ShapeMismatch {
            what: "bounds velocity index",
            expected: velocities.len(),
            actual: last_velocity + 1,
        });
    }

    let patches: Vec<ColumnPatch> = (first_velocity..=last_velocity)
        .into_par_iter()
        .map_init(
            || Workspace::new(num_times, num_offsets),
            |workspace, velocity_index| {
                let (t_low, t_up) = time_range(bounds, velocity_index, num_times);
                let inside: Vec<usize> = (t_low..=t_up)
                    .filter(|&t| bounds.contains(t, velocity_index))
                    .collect();
                if t_low > t_up || inside.is_empty() {
                    return ColumnPatch {
                        velocity_index,
                        cells: Vec::new(),
                    };
                }
                let first = t_low.saturating_sub(window);
                let last = (t_up + window).min(num_times - 1);
                let velocity = velocities.values()[velocity_index];
                let energy = workspace.load(gather, velocity, first, last);
                let cells = inside
                    .into_iter()
                    .map(|t| (t, energy.semblance_at(t, window)))
                    .collect();
                ColumnPatch {
                    velocity_index,
                    cells,
                }
            },
        )
        .collect();

    let mut values = Array2::zeros((num_times, velocities.len()));
    let mut evaluated = Array2::from_elem((num_times, velocities.len()), false);
    for patch in patches {
        for (t, value) in patch.cells {
            values[[t, patch.velocity_index]] = value;
            evaluated[[t, patch.velocity_index]] = true;
        }
    }
    Ok(SemblancePanel::with_mask(values, evaluated))
}

/// Earliest time whose upper bound reaches `velocity_index` and latest time
/// whose lower bound reaches it, defaulting to the record ends.
fn time_range(bounds: &VelocityBounds, velocity_index: usize, num_times: usize) -> (usize, usize) {
    let t_low = bounds
        .upper()
        .iter()
        .position(|&upper| upper >= velocity_index)
        .unwrap_or(0);
    let t_up = bounds
        .lower()
        .iter()
        .rposition(|&lower| lower <= velocity_index)
        .unwrap_or(num_times - 1);
    (t_low, t_up)
}

fn empty_panel(num_times: usize, num_velocities: usize) -> SemblancePanel {
    SemblancePanel::with_mask(
        Array2::zeros((num_times, num_velocities)),
        Array2::from_elem((num_times, num_velocities), false),
    )
}
