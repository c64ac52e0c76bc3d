//! End-to-end velocity picking for one gather.

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::bounds::ReferenceCurve;
use crate::config::PickerConfig;
use crate::error::VelocityError;
use crate::gather::{Gather, VelocityGrid};
use crate::path::VelocityModel;
use crate::peaks::{Pick, find_local_maximas};
use crate::semblance::{SemblancePanel, calc_partial_semblance, calc_semblance, reference_from_panel};

/// Everything produced while picking one gather.
#[derive(Debug, Clone)]
pub struct VelocityAnalysis {
    pub panel: SemblancePanel,
    pub picks: Vec<Pick>,
    pub model: VelocityModel,
}

/// Short serializable summary of an analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub num_times: usize,
    pub num_velocities: usize,
    pub evaluated_cells: usize,
    pub pick_count: usize,
    pub model: VelocityModel,
}

impl VelocityAnalysis {
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            num_times: self.panel.num_times(),
            num_velocities: self.panel.num_velocities(),
            evaluated_cells: self.panel.evaluated_count(),
            pick_count: self.picks.len(),
            model: self.model.clone(),
        }
    }
}

/// Runs semblance, peak detection and path search with one configuration.
#[derive(Debug, Clone)]
pub struct VelocityPicker {
    config: PickerConfig,
}

impl VelocityPicker {
    pub fn new(config: PickerConfig) -> Result<Self, VelocityError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Pick a velocity model, restricting semblance to a corridor around
    /// `reference` when one is given.
    pub fn pick(
        &self,
        gather: &Gather,
        velocities: &VelocityGrid,
        reference: Option<&ReferenceCurve>,
    ) -> Result<VelocityAnalysis, VelocityError> {
        let _span = info_span!(
            "pick",
            times = gather.num_times(),
            offsets = gather.num_offsets(),
            velocities = velocities.len(),
            bounded = reference.is_some()
        )
        .entered();
        let panel = match reference {
            Some(reference) => {
                let bounds = reference.bounds(gather.times(), velocities, self.config.tolerance)?;
                calc_partial_semblance(gather, velocities, &bounds, self.config.window)?
            }
            None => calc_semblance(gather, velocities, self.config.window),
        };
        debug!(evaluated = panel.evaluated_count(), "Semblance panel ready");
        self.pick_from_panel(panel, gather.times(), velocities)
    }

    /// Full pass, then a bounded pass around the full panel's per-time maxima.
    pub fn refine(
        &self,
        gather: &Gather,
        velocities: &VelocityGrid,
    ) -> Result<VelocityAnalysis, VelocityError> {
        let coarse = self.pick(gather, velocities, None)?;
        let reference = reference_from_panel(&coarse.panel, gather.times(), velocities)?;
        self.pick(gather, velocities, Some(&reference))
    }

    /// Peak detection and path search on an existing panel.
    pub fn pick_from_panel(
        &self,
        panel: SemblancePanel,
        times: &[f32],
        velocities: &VelocityGrid,
    ) -> Result<VelocityAnalysis, VelocityError> {
        let search = self.config.path_search();
        let picks = find_local_maximas(&panel, times, velocities, search.area_factor, search.peak_tolerance)?;
        debug!(picks = picks.len(), "Semblance peaks detected");
        let model = search.search(&panel, times, velocities, &picks)?;
        info!(
            points = model.points().len(),
            score = model.score(),
            "Velocity model picked"
        );
        Ok(VelocityAnalysis { panel, picks, model })
    }
}
