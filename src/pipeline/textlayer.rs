//! Full-document text-layer extraction.
//!
//! A thin stage: the whole document goes through the text-layer tool in
//! layout-preserving mode, bounded by a generous timeout for large files.
//! Unlike the classifier's sampling call, a failure here is fatal — the
//! method decision has already been made, and falling back to OCR silently
//! would hide a real problem from the caller.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::tools::{TextLayerTool, ToolError};

/// Extract the embedded text layer of the entire document.
pub async fn extract_full(
    tool: &Arc<dyn TextLayerTool>,
    pdf: &Path,
    config: &ExtractionConfig,
) -> Result<String, ExtractError> {
    info!("Extracting embedded text layer (layout preserved)");
    let timeout = Duration::from_secs(config.extract_timeout_secs);

    tool.extract(pdf, None, timeout).await.map_err(|e| match e {
        ToolError::Timeout { secs, .. } => ExtractError::TextLayerTimeout { secs },
        other => ExtractError::TextLayerFailed {
            detail: other.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Stub {
        result: Result<&'static str, ToolError>,
    }

    #[async_trait]
    impl TextLayerTool for Stub {
        async fn extract(
            &self,
            _pdf: &Path,
            last_page: Option<u32>,
            _timeout: Duration,
        ) -> Result<String, ToolError> {
            assert!(last_page.is_none(), "full extraction must not limit pages");
            match &self.result {
                Ok(s) => Ok(s.to_string()),
                Err(ToolError::Timeout { tool, secs }) => Err(ToolError::Timeout {
                    tool: *tool,
                    secs: *secs,
                }),
                Err(_) => Err(ToolError::Failed {
                    tool: "pdftotext",
                    stderr: "boom".into(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn returns_tool_output() {
        let tool: Arc<dyn TextLayerTool> = Arc::new(Stub {
            result: Ok("Hello   world\nwith layout"),
        });
        let text = extract_full(&tool, Path::new("x.pdf"), &ExtractionConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "Hello   world\nwith layout");
    }

    #[tokio::test]
    async fn timeout_maps_to_text_layer_timeout() {
        let tool: Arc<dyn TextLayerTool> = Arc::new(Stub {
            result: Err(ToolError::Timeout {
                tool: "pdftotext",
                secs: 120,
            }),
        });
        let err = extract_full(&tool, Path::new("x.pdf"), &ExtractionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::TextLayerTimeout { secs: 120 }));
    }

    #[tokio::test]
    async fn failure_maps_to_text_layer_failed() {
        let tool: Arc<dyn TextLayerTool> = Arc::new(Stub {
            result: Err(ToolError::Failed {
                tool: "pdftotext",
                stderr: String::new(),
            }),
        });
        let err = extract_full(&tool, Path::new("x.pdf"), &ExtractionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::TextLayerFailed { .. }));
    }
}
