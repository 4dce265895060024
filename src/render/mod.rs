/*!
 * Rendering collaborator.
 *
 * Turns a [`RenderJob`] into a video through a pluggable [`RenderEngine`].
 * The engine only sees a [`RenderPlan`]: every image paired with its timeline
 * window and the cues that overlap it, so subtitle burn-in uses the same
 * overlap test as the preview.
 *
 * - `plan`: job description and the per-image segments derived from it
 * - `engine`: engine trait and the simulated engine
 * - `service`: background job runner with progress, cancellation and status
 * - `status`: user-facing processing state
 */

pub mod engine;
pub mod plan;
pub mod service;
pub mod status;

pub use engine::{RenderEngine, RenderOutput, SimulatedEngine};
pub use plan::{RenderJob, RenderPlan, RenderSegment};
pub use service::{CancelToken, ProgressReporter, RenderHandle, RenderProgress, RenderService};
pub use status::{ProcessingState, ProcessingStatus};
