// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live threshold preview and model generation for one loaded blueprint

use crate::assembly::{ModelCollection, RegenerateReport, SceneRoot};
use crate::config::BlueprintConfig;
use crate::contours::{BorderFollowingTracer, ContourTracer};
use crate::error::{Error, Result};
use crate::image_ops::{CannyEdgeDetector, EdgeDetector};
use crate::preview::{DisplayImage, PreviewSlot};
use crate::types::IntensityBuffer;

/// Holds the loaded source image, the current edge raster and both preview
/// images.
///
/// Every threshold change recomputes the edge raster with
/// `(threshold, threshold * high_threshold_ratio)` and replaces the edge
/// preview.
pub struct PreviewSession<D = CannyEdgeDetector, T = BorderFollowingTracer>
where
    D: EdgeDetector,
    T: ContourTracer,
{
    config: BlueprintConfig,
    detector: D,
    tracer: T,
    source: Option<IntensityBuffer>,
    edges: Option<IntensityBuffer>,
    source_preview: PreviewSlot,
    edge_preview: PreviewSlot,
}

impl PreviewSession {
    pub fn new(config: BlueprintConfig) -> Self {
        Self::with_collaborators(config, CannyEdgeDetector::new(), BorderFollowingTracer::default())
    }
}

impl<D: EdgeDetector, T: ContourTracer> PreviewSession<D, T> {
    pub fn with_collaborators(config: BlueprintConfig, detector: D, tracer: T) -> Self {
        Self {
            config,
            detector,
            tracer,
            source: None,
            edges: None,
            source_preview: PreviewSlot::new(),
            edge_preview: PreviewSlot::new(),
        }
    }

    pub fn config(&self) -> &BlueprintConfig {
        &self.config
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    /// Replace the source image.
    ///
    /// Both previews are released first, so a failed load leaves the session
    /// without an image.
    pub fn load(&mut self, source: IntensityBuffer) -> Result<()> {
        self.source = None;
        self.edges = None;
        self.source_preview.release();
        self.edge_preview.release();

        self.source_preview.show(&source)?;
        tracing::info!(
            width = source.width(),
            height = source.height(),
            channels = source.channels(),
            "Loaded blueprint"
        );
        self.source = Some(source);

        self.refresh_edges()
    }

    /// Store a new low threshold and recompute the edge preview
    pub fn set_threshold(&mut self, threshold: f32) -> Result<()> {
        let candidate = BlueprintConfig {
            threshold,
            ..self.config.clone()
        };
        candidate.validate()?;
        self.config = candidate;

        if self.source.is_none() {
            return Ok(());
        }
        self.refresh_edges()
    }

    fn refresh_edges(&mut self) -> Result<()> {
        let Some(source) = self.source.as_ref() else {
            return Err(Error::NoEdges);
        };

        let low = self.config.threshold;
        let high = self.config.high_threshold();
        self.edges = None;
        self.edge_preview.release();

        let edges = self.detector.detect(source, low, high)?;
        self.edge_preview.show(&edges)?;
        self.edges = Some(edges);

        tracing::debug!(low, high, "Refreshed edge preview");
        Ok(())
    }

    pub fn source_preview(&self) -> Option<&DisplayImage> {
        self.source_preview.get()
    }

    pub fn edge_preview(&self) -> Option<&DisplayImage> {
        self.edge_preview.get()
    }

    /// Current edge raster
    pub fn edges(&self) -> Option<&IntensityBuffer> {
        self.edges.as_ref()
    }

    /// Trace the current edge raster and append the resulting walls to
    /// `model`
    pub fn generate<R: SceneRoot>(&self, model: &mut ModelCollection<R>) -> Result<RegenerateReport> {
        let edges = self.edges.as_ref().ok_or(Error::NoEdges)?;
        let loops = self.tracer.trace(edges)?;
        Ok(model.regenerate(&loops, &self.config.wall_params()))
    }
}
