//! Upload session state machine.
//!
//! `Idle → FileSelected → Analyzing → {Succeeded, Failed}`; both outcomes
//! behave like `FileSelected` for the next action and `clear` returns to
//! `Idle` from anywhere. A result and an error are never held together.
//!
//! Every transition that abandons the current request bumps a generation
//! counter. A late response whose generation no longer matches is dropped.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use fraudscreen_core::{
    classify, encode, AnalysisError, AnalysisResult, EncodedPayload, RiskReport, RiskTier,
    UploadedDocument,
};

use crate::gateway_client::AnalysisGateway;
use crate::preview::{PreviewHandle, PreviewStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileSelected,
    Analyzing,
    Succeeded,
    Failed,
}

/// A validated result together with its presentation values.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub result: AnalysisResult,
    pub report: RiskReport,
}

/// Guard failures. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("No document selected")]
    NoDocumentSelected,
    #[error("An analysis is already in progress")]
    AnalysisInProgress,
}

enum Outcome {
    Succeeded(Assessment),
    Failed(AnalysisError),
}

enum Session {
    Idle,
    Selected {
        document: UploadedDocument,
        preview: PreviewHandle,
        outcome: Option<Outcome>,
    },
    Analyzing {
        document: UploadedDocument,
        preview: PreviewHandle,
    },
}

/// Read-only view of the session for rendering.
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot<'a> {
    pub phase: Phase,
    pub document: Option<&'a UploadedDocument>,
    pub preview: Option<&'a PreviewHandle>,
    pub assessment: Option<&'a Assessment>,
    pub error: Option<&'a AnalysisError>,
}

/// An analysis that has been started but not yet sent.
pub struct PendingAnalysis {
    generation: u64,
    payload: Result<EncodedPayload, AnalysisError>,
    gateway: Arc<dyn AnalysisGateway>,
}

impl PendingAnalysis {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The network round trip. An encoding failure short-circuits here
    /// without a request.
    pub async fn run(self) -> FinishedAnalysis {
        let outcome = match self.payload {
            Ok(payload) => self.gateway.submit(&payload).await,
            Err(e) => Err(e),
        };
        FinishedAnalysis {
            generation: self.generation,
            outcome,
        }
    }
}

pub struct FinishedAnalysis {
    generation: u64,
    outcome: Result<AnalysisResult, AnalysisError>,
}

pub struct UploadController {
    gateway: Arc<dyn AnalysisGateway>,
    previews: Arc<dyn PreviewStore>,
    session: Session,
    generation: u64,
}

impl UploadController {
    pub fn new(gateway: Arc<dyn AnalysisGateway>, previews: Arc<dyn PreviewStore>) -> Self {
        Self {
            gateway,
            previews,
            session: Session::Idle,
            generation: 0,
        }
    }

    /// Replace the current document. The old preview is revoked before the
    /// new one is created; any prior result or error is dropped.
    pub fn select_file(&mut self, document: UploadedDocument) {
        self.generation += 1;
        self.release_preview();
        let preview = self.previews.create(&document);
        info!(
            document = %document.display_name,
            mime_type = %document.mime_type,
            size = %document.size_label(),
            "Document selected"
        );
        self.session = Session::Selected {
            document,
            preview,
            outcome: None,
        };
    }

    /// Guard, encode and enter `Analyzing`. Nothing is awaited here.
    pub fn begin_analysis(&mut self) -> Result<PendingAnalysis, ControllerError> {
        let (document, preview) = match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Selected {
                document, preview, ..
            } => (document, preview),
            other => {
                let err = match &other {
                    Session::Idle => ControllerError::NoDocumentSelected,
                    _ => ControllerError::AnalysisInProgress,
                };
                self.session = other;
                warn!(error = %err, "Analysis not started");
                return Err(err);
            }
        };

        self.generation += 1;
        let payload = encode(&document);
        debug!(generation = self.generation, document = %document.display_name, "Analysis started");
        self.session = Session::Analyzing { document, preview };

        Ok(PendingAnalysis {
            generation: self.generation,
            payload,
            gateway: Arc::clone(&self.gateway),
        })
    }

    /// Apply a finished analysis. Returns `false` when the session moved on
    /// since it was started, in which case nothing changes.
    pub fn complete(&mut self, finished: FinishedAnalysis) -> bool {
        if finished.generation != self.generation {
            debug!(
                stale = finished.generation,
                current = self.generation,
                "Discarding stale analysis response"
            );
            return false;
        }

        let (document, preview) = match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Analyzing { document, preview } => (document, preview),
            other => {
                self.session = other;
                return false;
            }
        };

        let outcome = match finished.outcome {
            Ok(result) => {
                let report = classify(&result);
                notify(&document, &report);
                Outcome::Succeeded(Assessment { result, report })
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, document = %document.display_name, "Analysis failed");
                Outcome::Failed(e)
            }
        };

        self.session = Session::Selected {
            document,
            preview,
            outcome: Some(outcome),
        };
        true
    }

    /// Begin, run and complete in one call.
    pub async fn start_analysis(&mut self) -> Result<Phase, ControllerError> {
        let pending = self.begin_analysis()?;
        let finished = pending.run().await;
        self.complete(finished);
        Ok(self.phase())
    }

    /// Back to `Idle`. An outstanding request is not cancelled; its response
    /// will be ignored.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.release_preview();
        debug!("Session cleared");
    }

    pub fn phase(&self) -> Phase {
        match &self.session {
            Session::Idle => Phase::Idle,
            Session::Analyzing { .. } => Phase::Analyzing,
            Session::Selected { outcome: None, .. } => Phase::FileSelected,
            Session::Selected {
                outcome: Some(Outcome::Succeeded(_)),
                ..
            } => Phase::Succeeded,
            Session::Selected {
                outcome: Some(Outcome::Failed(_)),
                ..
            } => Phase::Failed,
        }
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        match &self.session {
            Session::Idle => None,
            Session::Selected { document, .. } | Session::Analyzing { document, .. } => {
                Some(document)
            }
        }
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        match &self.session {
            Session::Idle => None,
            Session::Selected { preview, .. } | Session::Analyzing { preview, .. } => Some(preview),
        }
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        match &self.session {
            Session::Selected {
                outcome: Some(Outcome::Succeeded(assessment)),
                ..
            } => Some(assessment),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.session {
            Session::Selected {
                outcome: Some(Outcome::Failed(e)),
                ..
            } => Some(e),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            phase: self.phase(),
            document: self.document(),
            preview: self.preview(),
            assessment: self.assessment(),
            error: self.error(),
        }
    }

    fn release_preview(&mut self) {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Idle => {}
            Session::Selected { preview, .. } | Session::Analyzing { preview, .. } => {
                self.previews.revoke(preview);
            }
        }
    }
}

impl Drop for UploadController {
    fn drop(&mut self) {
        self.release_preview();
    }
}

fn notify(document: &UploadedDocument, report: &RiskReport) {
    let tier = report.tier;
    match tier {
        RiskTier::High => error!(
            document = %document.display_name,
            probability = report.probability,
            "{}: {}",
            tier.label(),
            tier.description()
        ),
        RiskTier::Medium => warn!(
            document = %document.display_name,
            probability = report.probability,
            "{}: {}",
            tier.label(),
            tier.description()
        ),
        RiskTier::Low => info!(
            document = %document.display_name,
            probability = report.probability,
            "{}: {}",
            tier.label(),
            tier.description()
        ),
    }
}
