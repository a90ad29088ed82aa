use std::fmt;

use crate::error::Result;
use crate::mesh::{FaceId, MeshStore, UvLayerId};

use super::{
    AnalysisParams, DensityCheck, DensityReport, FlipReport, FlippedCheck, SegmentIslands,
    StretchCheck, StretchReport, UvIsland,
};

/// Combined result of every UV check on one mesh.
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// The analyzed layer; `None` if the mesh had no UV layer.
    pub layer: Option<UvLayerId>,
    /// Parameters the checks ran with.
    pub params: AnalysisParams,
    /// Number of faces in the mesh.
    pub face_count: usize,
    /// UV islands.
    pub islands: Vec<UvIsland>,
    /// Stretch check result.
    pub stretch: StretchReport,
    /// Density check result.
    pub density: DensityReport,
    /// Flip check result.
    pub flipped: FlipReport,
}

impl AuditReport {
    fn empty(params: AnalysisParams, face_count: usize) -> Self {
        Self {
            layer: None,
            params,
            face_count,
            islands: Vec::new(),
            stretch: StretchReport::default(),
            density: DensityReport::default(),
            flipped: FlipReport::default(),
        }
    }

    /// Returns `true` if no check flagged anything.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.stretch.flagged.is_empty()
            && self.density.flagged().next().is_none()
            && self.flipped.flagged.is_empty()
    }

    /// Union of every flagged face, each listed once.
    #[must_use]
    pub fn flagged_faces(&self) -> Vec<FaceId> {
        let mut faces: Vec<FaceId> = self
            .stretch
            .flagged
            .iter()
            .copied()
            .chain(self.density.flagged_faces())
            .chain(self.flipped.flagged.iter().copied())
            .collect();
        faces.sort_unstable();
        faces.dedup();
        faces
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layer.is_none() {
            return write!(f, "no UV layer, nothing analyzed");
        }
        writeln!(
            f,
            "{} UV island(s) over {} face(s)",
            self.islands.len(),
            self.face_count
        )?;
        writeln!(
            f,
            "stretch: {} face(s) above {}",
            self.stretch.flagged.len(),
            self.params.stretch_threshold
        )?;
        for (index, island) in self.density.islands.iter().enumerate() {
            if island.flagged {
                writeln!(
                    f,
                    "density: island {index} at {:.1} texels/unit ({:+.1}% from {})",
                    island.density, island.deviation_percent, self.params.target_density
                )?;
            }
        }
        writeln!(f, "flipped: {} face(s)", self.flipped.flagged.len())?;
        let skipped = self.stretch.skipped.max(self.flipped.skipped);
        if skipped > 0 {
            writeln!(f, "skipped: {skipped} face(s) without usable UVs")?;
        }
        if self.is_clean() {
            write!(f, "no issues")?;
        }
        Ok(())
    }
}

/// Runs island segmentation and the stretch, density and flip checks in one
/// pass over a mesh.
pub struct UvAudit {
    layer: Option<UvLayerId>,
    params: AnalysisParams,
}

impl UvAudit {
    /// Creates an audit of the given layer with default parameters.
    #[must_use]
    pub fn new(layer: UvLayerId) -> Self {
        Self {
            layer: Some(layer),
            params: AnalysisParams::default(),
        }
    }

    /// Creates an audit of whichever layer is active when it executes.
    #[must_use]
    pub fn active_layer() -> Self {
        Self {
            layer: None,
            params: AnalysisParams::default(),
        }
    }

    /// Sets the analysis parameters.
    #[must_use]
    pub fn with_params(mut self, params: AnalysisParams) -> Self {
        self.params = params;
        self
    }

    /// Executes every check.
    ///
    /// A mesh without any UV layer yields an empty report and a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or an explicit layer is
    /// not found.
    pub fn execute(&self, store: &MeshStore) -> Result<AuditReport> {
        self.params.validate()?;
        let Some(layer) = self.layer.or_else(|| store.active_uv_layer()) else {
            tracing::warn!(faces = store.face_count(), "mesh has no UV layer, skipping audit");
            return Ok(AuditReport::empty(self.params, store.face_count()));
        };
        let params = &self.params;

        let islands = SegmentIslands::new(layer)
            .with_tolerance(params.uv_tolerance)
            .with_uv_match(params.uv_match)
            .with_seams(params.respect_seams)
            .execute(store)?;
        let stretch = StretchCheck::new(layer)
            .with_threshold(params.stretch_threshold)
            .execute(store)?;
        let density = DensityCheck::new(layer)
            .with_texture_size(params.texture)
            .with_target_density(params.target_density)
            .with_tolerance_percent(params.density_tolerance_percent)
            .with_islands(islands.clone())
            .execute(store)?;
        let flipped = FlippedCheck::new(layer)
            .with_epsilon(params.flip_epsilon)
            .execute(store)?;

        let report = AuditReport {
            layer: Some(layer),
            params: self.params,
            face_count: store.face_count(),
            islands,
            stretch,
            density,
            flipped,
        };
        tracing::info!(
            islands = report.islands.len(),
            stretched = report.stretch.flagged.len(),
            off_density = report.density.flagged().count(),
            flipped = report.flipped.flagged.len(),
            "UV audit finished"
        );
        Ok(report)
    }

    /// Executes every check and selects the flagged faces, replacing the
    /// current selection.
    ///
    /// # Errors
    ///
    /// See [`UvAudit::execute`].
    pub fn execute_and_select(&self, store: &mut MeshStore) -> Result<AuditReport> {
        let report = self.execute(store)?;
        store.set_selection(&report.flagged_faces())?;
        Ok(report)
    }
}
