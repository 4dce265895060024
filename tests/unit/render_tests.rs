/*!
 * Tests for render jobs, progress events and cancellation
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use slidereel::app_config::ProjectConfig;
use slidereel::errors::RenderError;
use slidereel::render::{
    ProcessingState, ProcessingStatus, ProgressReporter, RenderEngine, RenderJob, RenderOutput,
    RenderPlan, RenderService, SimulatedEngine,
};
use crate::common;

fn job(image_count: usize, audio_duration: f64) -> RenderJob {
    RenderJob {
        images: (0..image_count)
            .map(|i| PathBuf::from(format!("img{}.png", i)))
            .collect(),
        audio: Some(PathBuf::from("song.mp3")),
        subtitles: vec![
            common::cue(1, 0.5, 1.5, "first"),
            common::cue(2, 3.0, 6.0, "second"),
        ],
        project: ProjectConfig::default(),
        audio_duration,
    }
}

fn service(steps: u32, delay_ms: u64) -> RenderService {
    RenderService::new(Arc::new(SimulatedEngine::new(
        steps,
        Duration::from_millis(delay_ms),
    )))
}

/// Engine that cannot be loaded
#[derive(Debug)]
struct BrokenEngine;

#[async_trait]
impl RenderEngine for BrokenEngine {
    async fn load(&self) -> Result<(), RenderError> {
        Err(RenderError::EngineLoad("no codecs".to_string()))
    }

    async fn render(&self, _plan: &RenderPlan, _reporter: &ProgressReporter) -> Result<RenderOutput, RenderError> {
        unreachable!("render is never reached when load fails")
    }
}

#[test]
fn test_plan_build_withSubtitles_shouldAlignSegments() {
    let plan = RenderPlan::build(&job(4, 10.0)).unwrap();

    assert_eq!(plan.image_count(), 4);
    assert_eq!(plan.timeline.per_image_duration(), 2.5);
    let cue_ids: Vec<Vec<usize>> = plan.segments.iter().map(|s| s.cue_ids.clone()).collect();
    assert_eq!(cue_ids, vec![vec![1], vec![2], vec![2], vec![]]);

    let texts: Vec<&str> = plan.cues_for(&plan.segments[1]).map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["second"]);
    assert_eq!(plan.segments[3].image, PathBuf::from("img3.png"));
}

#[test]
fn test_plan_build_withMissingInputs_shouldFail() {
    assert!(matches!(RenderPlan::build(&job(0, 10.0)), Err(RenderError::NoImages)));

    let mut no_audio = job(2, 10.0);
    no_audio.audio = None;
    assert!(matches!(RenderPlan::build(&no_audio), Err(RenderError::NoAudio)));

    assert!(matches!(
        RenderPlan::build(&job(2, -3.0)),
        Err(RenderError::Timeline(_))
    ));
}

#[tokio::test]
async fn test_render_withSimulatedEngine_shouldEmitProgressInOrder() {
    common::init_logging();
    let mut handle = service(4, 1).start(job(4, 10.0));

    let mut events = Vec::new();
    while let Some(event) = handle.next_progress().await {
        events.push(event);
    }

    let percents: Vec<f64> = events.iter().map(|e| e.percent).collect();
    assert_eq!(percents, vec![10.0, 40.0, 60.0, 80.0, 100.0, 100.0]);
    assert_eq!(events[0].message, "Preparing assets...");
    assert_eq!(events[1].message, "Rendering frame batch 1/4...");
    assert_eq!(events[4].message, "Rendering frame batch 4/4...");
    assert_eq!(events[5].message, "Finalizing video container...");

    let status = handle.status();
    assert_eq!(status, ProcessingStatus::completed());

    let output = handle.wait().await.unwrap();
    assert_eq!(output.data.as_ref(), b"fake-video-content");
    assert_eq!(output.mime_type, "video/mp4");
}

#[tokio::test]
async fn test_render_withCancellation_shouldStopAndReportCancelled() {
    let mut handle = service(10, 50).start(job(3, 9.0));

    let first = handle.next_progress().await.unwrap();
    assert_eq!(first.percent, 10.0);

    handle.cancel();
    while handle.next_progress().await.is_some() {}

    let status = handle.status();
    assert_eq!(status.state, ProcessingState::Error);
    assert_eq!(status.error.as_deref(), Some("Render cancelled"));
    assert!(matches!(handle.wait().await, Err(RenderError::Cancelled)));
}

#[tokio::test]
async fn test_render_withCancelToken_shouldBeObservable() {
    let handle = service(10, 50).start(job(2, 4.0));
    let token = handle.cancel_token();

    assert!(!token.is_cancelled());
    token.cancel();
    assert!(token.is_cancelled());

    assert!(matches!(handle.wait().await, Err(RenderError::Cancelled)));
}

#[tokio::test]
async fn test_render_withNoImages_shouldFailWithoutProgress() {
    let mut handle = service(2, 1).start(job(0, 10.0));

    assert!(handle.next_progress().await.is_none());
    let status = handle.status();
    assert_eq!(status.state, ProcessingState::Error);
    assert_eq!(status.error.as_deref(), Some("No images provided"));
    assert!(matches!(handle.wait().await, Err(RenderError::NoImages)));
}

#[tokio::test]
async fn test_render_withNoAudio_shouldFail() {
    let mut no_audio = job(2, 10.0);
    no_audio.audio = None;
    let handle = service(2, 1).start(no_audio);

    assert!(matches!(handle.wait().await, Err(RenderError::NoAudio)));
}

#[tokio::test]
async fn test_render_withBrokenEngine_shouldSurfaceLoadError() {
    let handle = RenderService::new(Arc::new(BrokenEngine)).start(job(2, 4.0));

    let id = handle.id();
    assert!(!id.is_nil());
    match handle.wait().await {
        Err(RenderError::EngineLoad(message)) => assert_eq!(message, "no codecs"),
        other => panic!("expected load error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_simulated_engine_load_shouldBeRepeatable() {
    let engine = SimulatedEngine::new(1, Duration::from_millis(1));
    assert!(!engine.is_loaded());

    engine.load().await.unwrap();
    engine.load().await.unwrap();
    assert!(engine.is_loaded());
}

#[test]
fn test_processing_status_constructors_shouldSetStates() {
    assert_eq!(ProcessingStatus::default().state, ProcessingState::Idle);
    assert_eq!(ProcessingStatus::analyzing().message, "Initializing engine...");
    assert_eq!(ProcessingStatus::rendering(150.0, "x").progress, 100.0);
    assert!(ProcessingStatus::completed().is_terminal());
    assert!(ProcessingStatus::failed("boom").is_terminal());
    assert!(!ProcessingStatus::rendering(50.0, "x").is_terminal());
}
