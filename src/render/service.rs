use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::app_config::RenderConfig;
use crate::errors::RenderError;
use crate::render::engine::{RenderEngine, RenderOutput, SimulatedEngine};
use crate::render::plan::{RenderJob, RenderPlan};
use crate::render::status::ProcessingStatus;

/// One progress event
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProgress {
    /// 0 to 100
    pub percent: f64,
    pub message: String,
}

/// Engine-side end of a job: publishes progress and observes cancellation
#[derive(Debug)]
pub struct ProgressReporter {
    progress: mpsc::UnboundedSender<RenderProgress>,
    cancel: watch::Receiver<bool>,
    status: Arc<Mutex<ProcessingStatus>>,
}

impl ProgressReporter {
    /// Publish a progress event. Fails once the job is cancelled.
    pub fn report(&self, percent: f64, message: impl Into<String>) -> Result<(), RenderError> {
        self.check_cancelled()?;

        let message = message.into();
        *self.status.lock() = ProcessingStatus::rendering(percent, message.clone());

        // Nobody listening is fine
        let _ = self.progress.send(RenderProgress { percent, message });
        Ok(())
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    pub fn check_cancelled(&self) -> Result<(), RenderError> {
        if self.is_cancelled() {
            Err(RenderError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleep for `duration`, waking early with an error on cancellation
    pub async fn pause(&self, duration: Duration) -> Result<(), RenderError> {
        self.check_cancelled()?;

        let mut cancel = self.cancel.clone();
        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);

        let cancelled = tokio::select! {
            _ = &mut sleep => false,
            changed = cancel.wait_for(|cancelled| *cancelled) => changed.is_ok(),
        };

        if cancelled {
            return Err(RenderError::Cancelled);
        }

        // The handle went away without cancelling; finish the wait
        if !sleep.is_elapsed() {
            (&mut sleep).await;
        }

        Ok(())
    }
}

/// Cloneable cancellation trigger for a running job
#[derive(Debug, Clone)]
pub struct CancelToken(Arc<watch::Sender<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }
}

/// Caller-side end of a job
#[derive(Debug)]
pub struct RenderHandle {
    id: Uuid,
    status: Arc<Mutex<ProcessingStatus>>,
    progress: mpsc::UnboundedReceiver<RenderProgress>,
    cancel: CancelToken,
    task: JoinHandle<Result<RenderOutput, RenderError>>,
}

impl RenderHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current status snapshot
    pub fn status(&self) -> ProcessingStatus {
        self.status.lock().clone()
    }

    /// Next progress event, or `None` once the job has finished
    pub async fn next_progress(&mut self) -> Option<RenderProgress> {
        self.progress.recv().await
    }

    /// Ask the job to stop at its next checkpoint
    pub fn cancel(&self) {
        debug!("Cancelling render job {}", self.id);
        self.cancel.cancel();
    }

    /// Token that can cancel this job from elsewhere
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the terminal result
    pub async fn wait(self) -> Result<RenderOutput, RenderError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                let err = RenderError::Engine(format!("render task failed: {}", e));
                *self.status.lock() = ProcessingStatus::failed(err.to_string());
                Err(err)
            }
        }
    }
}

/// Runs render jobs in the background on a shared engine
#[derive(Debug, Clone)]
pub struct RenderService {
    engine: Arc<dyn RenderEngine>,
}

impl RenderService {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self { engine }
    }

    /// Service backed by the simulated engine
    pub fn simulated(config: &RenderConfig) -> Self {
        Self::new(Arc::new(SimulatedEngine::from_config(config)))
    }

    /// Start a job. Must be called inside a tokio runtime.
    pub fn start(&self, job: RenderJob) -> RenderHandle {
        let id = Uuid::new_v4();
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let status = Arc::new(Mutex::new(ProcessingStatus::analyzing()));

        let reporter = ProgressReporter {
            progress: progress_tx,
            cancel: cancel_rx,
            status: Arc::clone(&status),
        };
        let engine = Arc::clone(&self.engine);
        let task_status = Arc::clone(&status);

        info!("Starting render job {} ({} images)", id, job.images.len());

        let task = tokio::spawn(async move {
            let result = run_job(engine.as_ref(), &job, &reporter).await;

            *task_status.lock() = match &result {
                Ok(_) => ProcessingStatus::completed(),
                Err(e) => {
                    error!("Render job {} failed: {}", id, e);
                    ProcessingStatus::failed(e.to_string())
                }
            };

            // Dropping the reporter closes the progress channel
            drop(reporter);
            result
        });

        RenderHandle {
            id,
            status,
            progress: progress_rx,
            cancel: CancelToken(Arc::new(cancel_tx)),
            task,
        }
    }
}

async fn run_job(
    engine: &dyn RenderEngine,
    job: &RenderJob,
    reporter: &ProgressReporter,
) -> Result<RenderOutput, RenderError> {
    engine.load().await?;
    reporter.check_cancelled()?;

    let plan = RenderPlan::build(job)?;
    engine.render(&plan, reporter).await
}
