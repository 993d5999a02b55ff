//! Request loop execution
//!
//! A run is a strictly sequential series of iterations: render the body,
//! send the request, report the outcome, wait, repeat. Whether a failed
//! iteration ends the run depends on the loop budget: only open-ended loops
//! retry, a finite loop aborts on its first failure just like a single
//! request does.

use crate::error::{TabbyError, TabbyResult};
use crate::format::{IterationReport, ReportMode};
use crate::masking::MaskingConfig;
use crate::renderer::TemplateRenderer;
use crate::traits::{FsTemplateSource, Reporter, TemplateSource, Transport};
use crate::types::{
    BodySource, HttpMethod, HttpRequestData, IterationBudget, IterationResult, LoopConfig,
    RunSummary,
};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Loop controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Rendering,
    Sending,
    AwaitingResponse,
    Reporting,
    Waiting,
    Done,
}

/// What a failed iteration does to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Wait the interval and carry on with the next iteration
    RecoverInLoop,
    /// Abort the whole run
    Fatal,
}

impl FailureDisposition {
    /// Classify a failed iteration.
    ///
    /// Recoverable errors are retried only in open-ended loop mode. A finite
    /// count aborts on the first failure.
    pub fn classify(budget: IterationBudget, error: &TabbyError) -> Self {
        match budget {
            IterationBudget::Unbounded if error.is_recoverable() => FailureDisposition::RecoverInLoop,
            _ => FailureDisposition::Fatal,
        }
    }
}

/// Drives a [`LoopConfig`] against a transport
pub struct RequestLoop {
    transport: Arc<dyn Transport>,
    template_source: Arc<dyn TemplateSource>,
    renderer: TemplateRenderer,
    masking: MaskingConfig,
    cancel: Option<CancellationToken>,
    state: LoopState,
}

impl RequestLoop {
    /// Create a loop using the file system for templates and the shared
    /// generator registry
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            template_source: Arc::new(FsTemplateSource),
            renderer: TemplateRenderer::new(),
            masking: MaskingConfig::default(),
            cancel: None,
            state: LoopState::Idle,
        }
    }

    pub fn with_template_source(mut self, template_source: Arc<dyn TemplateSource>) -> Self {
        self.template_source = template_source;
        self
    }

    /// Stop signal checked between iterations and raced against every wait
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    fn transition(&mut self, next: LoopState) {
        debug!(from = ?self.state, to = ?next, "Loop state change");
        self.state = next;
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, |token| token.is_cancelled())
    }

    /// Run `future` unless the stop signal fires first
    async fn unless_cancelled<F: Future>(&self, future: F) -> Option<F::Output> {
        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                output = future => Some(output),
                _ = token.cancelled() => None,
            },
            None => Some(future.await),
        }
    }

    /// Sleep for `interval`; false if the stop signal fired meanwhile
    async fn wait(&mut self, interval: Duration) -> bool {
        self.transition(LoopState::Waiting);
        self.unless_cancelled(tokio::time::sleep(interval)).await.is_some()
    }

    fn stopped(&mut self, requests_sent: u64) -> RunSummary {
        info!("🛑 Stop signal received after {} requests", requests_sent);
        self.transition(LoopState::Done);
        RunSummary {
            requests_sent,
            completed: false,
        }
    }

    /// Execute the configured run.
    ///
    /// Returns the summary on natural completion or when stopped, and the
    /// aborting error otherwise. A failing iteration is never reported
    /// through [`Reporter::report`].
    pub async fn run(
        &mut self,
        config: &LoopConfig,
        reporter: &mut dyn Reporter,
    ) -> TabbyResult<RunSummary> {
        config.validate()?;

        let budget = config.iteration_budget();
        let mode = if config.loop_enabled {
            ReportMode::Loop
        } else {
            ReportMode::Single
        };

        info!(
            method = %config.method,
            url = %config.url,
            budget = ?budget,
            interval_ms = config.interval.as_millis() as u64,
            "🚀 Starting request run"
        );

        let mut requests_sent: u64 = 0;

        loop {
            if self.is_cancelled() {
                return Ok(self.stopped(requests_sent));
            }

            let index = requests_sent + 1;

            self.transition(LoopState::Rendering);
            let body = match self.render_body(config).await {
                Ok(body) => body,
                Err(e) => {
                    error!("Failed to prepare request #{}: {}", index, e);
                    self.transition(LoopState::Done);
                    return Err(e);
                }
            };
            let request = build_request(config, body);

            self.transition(LoopState::Sending);
            debug!(
                index,
                headers = %self.masking.mask_headers(&request.headers),
                body_bytes = request.body.as_ref().map_or(0, Vec::len),
                "Sending request"
            );

            let started = Instant::now();
            let transport = Arc::clone(&self.transport);
            self.transition(LoopState::AwaitingResponse);
            let outcome = match self.unless_cancelled(transport.send(request)).await {
                Some(outcome) => outcome,
                None => return Ok(self.stopped(requests_sent)),
            };
            let elapsed = started.elapsed();
            requests_sent += 1;

            match outcome {
                Ok(response) => {
                    self.transition(LoopState::Reporting);
                    debug!(
                        index,
                        status = response.status_code,
                        duration_ms = elapsed.as_millis() as u64,
                        body_bytes = response.body_length(),
                        "Response received"
                    );

                    let result = IterationResult::success(index, elapsed, response);
                    reporter.report(&IterationReport::from_result(&result, mode));
                }
                Err(e) => match FailureDisposition::classify(budget, &e) {
                    FailureDisposition::RecoverInLoop => {
                        warn!("⚠ Request #{} failed, retrying after interval: {}", index, e);
                        reporter.report_failure(index, &e);
                        if !self.wait(config.interval).await {
                            return Ok(self.stopped(requests_sent));
                        }
                        continue;
                    }
                    FailureDisposition::Fatal => {
                        error!("Request #{} failed, aborting run: {}", index, e);
                        self.transition(LoopState::Done);
                        return Err(e);
                    }
                },
            }

            if budget.is_exhausted(requests_sent) {
                break;
            }

            if !self.wait(config.interval).await {
                return Ok(self.stopped(requests_sent));
            }
        }

        self.transition(LoopState::Done);
        let summary = RunSummary {
            requests_sent,
            completed: true,
        };

        if config.loop_enabled {
            reporter.summary(&summary);
        }
        info!("✓ Run completed with {} requests", requests_sent);

        Ok(summary)
    }

    /// Produce this iteration's body; template files are re-read every time
    async fn render_body(&self, config: &LoopConfig) -> TabbyResult<Option<String>> {
        let rendered = match &config.body_source {
            BodySource::None => return Ok(None),
            BodySource::Literal(data) => self.renderer.render(data),
            BodySource::TemplateFile(path) => {
                let template = self.template_source.read_template(path).await?;
                self.renderer.render(&template)
            }
        };

        Ok(Some(rendered).filter(|body| !body.is_empty()))
    }
}

/// Assemble the outbound request.
///
/// POST requests always get the configured `Content-Type` first, even an
/// empty one; explicit headers follow in declaration order and replace
/// earlier values of the same name.
pub fn build_request(config: &LoopConfig, body: Option<String>) -> HttpRequestData {
    let mut request = HttpRequestData::new(config.method, config.url.trim());

    if config.method == HttpMethod::Post {
        request.set_header("Content-Type", config.content_type.as_str());
        if let Some(body) = body {
            request.set_body_string(body);
        }
    }

    for (name, value) in &config.headers {
        request.set_header(name.as_str(), value.as_str());
    }

    request
}
