//! FraudScreen analysis service
//!
//! HTTP front door for document analysis: request validation, the fixed
//! screening prompt, one vision-model call per request, and error mapping.

pub mod analyze;
pub mod error;
pub mod health_api;
pub mod model;
pub mod prompt;
pub mod server;
pub mod service;

pub use error::ApiError;
pub use model::OpenAiCompatModel;
pub use server::{build_router, serve, start_server, GatewayState};
pub use service::AnalysisService;
