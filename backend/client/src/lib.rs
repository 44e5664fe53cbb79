//! Client side of FraudScreen: the upload session state machine and the
//! HTTP client for the analysis service.

pub mod controller;
pub mod gateway_client;
pub mod preview;

pub use controller::{
    Assessment, ControllerError, FinishedAnalysis, PendingAnalysis, Phase, SessionSnapshot,
    UploadController,
};
pub use gateway_client::{AnalysisGateway, AnalysisGatewayClient};
pub use preview::{LocalPreviewStore, PreviewHandle, PreviewStore};
