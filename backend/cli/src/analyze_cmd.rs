//! CLI Analyze Command
//!
//! Runs one document through the upload session against a remote analysis
//! service and prints the verdict.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use fraudscreen_client::{AnalysisGatewayClient, LocalPreviewStore, Phase, UploadController};
use fraudscreen_config::ClientConfig;
use fraudscreen_core::UploadedDocument;

use crate::report;
use crate::terminal_output::{note_error, note_info, supports_color};

pub async fn run(config: &ClientConfig, file: &Path, json: bool) -> Result<()> {
    let document = UploadedDocument::from_path(file)
        .with_context(|| format!("Cannot open {}", file.display()))?;
    if !document.is_accepted() {
        bail!(
            "Unsupported file type {} for {}; upload an image or PDF",
            document.mime_type,
            document.display_name
        );
    }

    let client = AnalysisGatewayClient::from_config(config)?;
    note_info(&format!(
        "Analyzing {} ({}) via {}",
        document.display_name,
        document.size_label(),
        client.endpoint()
    ));

    let mut controller = UploadController::new(Arc::new(client), Arc::new(LocalPreviewStore::new()));
    controller.select_file(document);
    let phase = controller.start_analysis().await?;

    if phase == Phase::Failed {
        if let Some(error) = controller.error() {
            note_error(&error.to_string());
            bail!("Analysis failed ({})", error.kind());
        }
    }

    let Some(assessment) = controller.assessment() else {
        bail!("Analysis finished without a result");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment.result)?);
    } else {
        print!("{}", report::render(assessment, supports_color()));
    }
    Ok(())
}
