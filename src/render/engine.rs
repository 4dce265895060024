use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};

use crate::app_config::RenderConfig;
use crate::errors::RenderError;
use crate::render::plan::RenderPlan;
use crate::render::service::ProgressReporter;

/// Encoded video returned by an engine
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub data: Bytes,
    pub mime_type: String,
}

/// Common trait for video engines
///
/// The service drives an engine through `load` then `render`; an engine
/// reports progress and observes cancellation through the reporter.
#[async_trait]
pub trait RenderEngine: Send + Sync + Debug {
    /// Prepare the engine. Must be cheap to call more than once.
    async fn load(&self) -> Result<(), RenderError>;

    /// Render the plan into a video
    async fn render(&self, plan: &RenderPlan, reporter: &ProgressReporter) -> Result<RenderOutput, RenderError>;
}

// @const: Body of the placeholder video
const PLACEHOLDER_VIDEO: &[u8] = b"fake-video-content";

/// Stand-in engine that paces progress events and returns a placeholder
/// container instead of encoding anything
#[derive(Debug)]
pub struct SimulatedEngine {
    loaded: AtomicBool,
    steps: u32,
    step_delay: Duration,
}

impl SimulatedEngine {
    pub fn new(steps: u32, step_delay: Duration) -> Self {
        Self {
            loaded: AtomicBool::new(false),
            steps: steps.max(1),
            step_delay,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.simulated_steps, Duration::from_millis(config.step_delay_ms))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }
}

#[async_trait]
impl RenderEngine for SimulatedEngine {
    async fn load(&self) -> Result<(), RenderError> {
        if !self.loaded.swap(true, Ordering::AcqRel) {
            debug!("Render engine loaded (simulated)");
        }
        Ok(())
    }

    async fn render(&self, plan: &RenderPlan, reporter: &ProgressReporter) -> Result<RenderOutput, RenderError> {
        if plan.image_count() == 0 {
            return Err(RenderError::NoImages);
        }

        reporter.report(10.0, "Preparing assets...")?;

        info!(
            "Processing {} images for {}s total.",
            plan.image_count(),
            plan.timeline.total_duration()
        );
        info!(
            "Each image displays for {:.2}s.",
            plan.timeline.per_image_duration()
        );
        info!("Animation style: {}", plan.animation.display_name());

        for segment in &plan.segments {
            debug!(
                "Segment {} {:?}: {} cue(s)",
                segment.window,
                segment.image,
                segment.cue_ids.len()
            );
        }

        for batch in 1..=self.steps {
            reporter.pause(self.step_delay).await?;
            let percent = 20.0 + (batch as f64 / self.steps as f64) * 80.0;
            reporter.report(
                percent,
                format!("Rendering frame batch {}/{}...", batch, self.steps),
            )?;
        }

        reporter.report(100.0, "Finalizing video container...")?;

        Ok(RenderOutput {
            data: Bytes::from_static(PLACEHOLDER_VIDEO),
            mime_type: "video/mp4".to_string(),
        })
    }
}
