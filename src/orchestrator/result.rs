//! Generation wire bodies and the caller-facing result.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Recovery, TrackerError};
use crate::orchestrator::styles::CaptionStyle;

/// One caption as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    #[serde(default)]
    pub caption: String,
}

/// `POST /generate-captions` body.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequestBody {
    pub image: String,
    pub styles: Vec<&'static str>,
    pub word_limits: BTreeMap<&'static str, u32>,
}

/// `POST /generate-captions` response. Keys are left as strings so unknown
/// styles do not fail decoding.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponseBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub captions: HashMap<String, Caption>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of a generation call. Always returned, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub success: bool,
    /// On success, exactly one entry per requested style.
    pub captions: BTreeMap<CaptionStyle, Caption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery: Option<Recovery>,
}

impl GenerationResult {
    pub fn succeeded(captions: BTreeMap<CaptionStyle, Caption>) -> Self {
        Self {
            success: true,
            captions,
            error: None,
            error_type: None,
            recovery: None,
        }
    }

    pub fn failed(err: &TrackerError) -> Self {
        Self {
            success: false,
            captions: BTreeMap::new(),
            error: Some(err.to_string()),
            error_type: Some(err.error_type()),
            recovery: Some(err.recovery()),
        }
    }

    pub fn caption(&self, style: CaptionStyle) -> Option<&str> {
        self.captions.get(&style).map(|c| c.caption.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_carries_hint() {
        let result = GenerationResult::failed(&TrackerError::NoBackend);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No backend URL found"));
        assert_eq!(result.recovery, Some(Recovery::FindBackend));
    }

    #[test]
    fn test_result_serializes_style_keys() {
        let mut captions = BTreeMap::new();
        captions.insert(CaptionStyle::HumanFriendly, Caption { caption: "hi".into() });
        let json = serde_json::to_value(GenerationResult::succeeded(captions)).unwrap();
        assert_eq!(json["captions"]["human-friendly"]["caption"], "hi");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_response_body_ignores_unknown_keys() {
        let body: GenerateResponseBody = serde_json::from_str(
            r#"{"success": true, "captions": {"short": {"caption": "x"}, "poem": {"caption": "y"}}, "elapsed": 3.2}"#,
        )
        .unwrap();
        assert!(body.success);
        assert_eq!(body.captions.len(), 2);
    }
}
