//! Caption styles, style selection and word limits.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::WordLimitDefaults;
use crate::error::{TrackerError, TrackerResult};

/// A named caption style. Ordering is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CaptionStyle {
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "technical")]
    Technical,
    #[serde(rename = "human-friendly")]
    HumanFriendly,
}

impl CaptionStyle {
    pub const ALL: [CaptionStyle; 3] = [
        CaptionStyle::Short,
        CaptionStyle::Technical,
        CaptionStyle::HumanFriendly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CaptionStyle::Short => "short",
            CaptionStyle::Technical => "technical",
            CaptionStyle::HumanFriendly => "human-friendly",
        }
    }
}

impl fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptionStyle {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(CaptionStyle::Short),
            "technical" => Ok(CaptionStyle::Technical),
            "human-friendly" | "human_friendly" | "human" => Ok(CaptionStyle::HumanFriendly),
            other => Err(TrackerError::InvalidRequest(format!("unknown style '{}'", other))),
        }
    }
}

/// Which styles a generation request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSelection {
    /// The `all` sentinel.
    All,
    /// A non-empty explicit set, deduplicated and display-ordered.
    Only(Vec<CaptionStyle>),
}

impl StyleSelection {
    /// Build an explicit selection. Empty input is rejected.
    pub fn only(styles: impl IntoIterator<Item = CaptionStyle>) -> TrackerResult<Self> {
        let mut styles: Vec<_> = styles.into_iter().collect();
        styles.sort();
        styles.dedup();
        if styles.is_empty() {
            return Err(TrackerError::InvalidRequest("at least one style is required".to_string()));
        }
        Ok(StyleSelection::Only(styles))
    }

    /// Styles the backend must return.
    pub fn expected(&self) -> Vec<CaptionStyle> {
        match self {
            StyleSelection::All => CaptionStyle::ALL.to_vec(),
            StyleSelection::Only(styles) => styles.clone(),
        }
    }

    /// Names sent on the wire: `["all"]` or the explicit list.
    pub fn wire_names(&self) -> Vec<&'static str> {
        match self {
            StyleSelection::All => vec!["all"],
            StyleSelection::Only(styles) => styles.iter().map(|s| s.as_str()).collect(),
        }
    }
}

impl FromStr for StyleSelection {
    type Err = TrackerError;

    /// `all`, or a comma-separated list of style names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        if parts.iter().any(|p| p.eq_ignore_ascii_case("all")) {
            return Ok(StyleSelection::All);
        }
        let styles = parts
            .into_iter()
            .map(CaptionStyle::from_str)
            .collect::<TrackerResult<Vec<_>>>()?;
        StyleSelection::only(styles)
    }
}

/// Per-style positive word caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordLimits(BTreeMap<CaptionStyle, u32>);

impl WordLimits {
    /// Start from defaults, then apply overrides. Zero is rejected.
    pub fn with_overrides(
        defaults: &WordLimitDefaults,
        overrides: impl IntoIterator<Item = (CaptionStyle, u32)>,
    ) -> TrackerResult<Self> {
        let mut limits = WordLimits::from(defaults);
        for (style, limit) in overrides {
            if limit == 0 {
                return Err(TrackerError::InvalidRequest(format!(
                    "word limit for '{}' must be positive",
                    style
                )));
            }
            limits.0.insert(style, limit);
        }
        Ok(limits)
    }

    pub fn get(&self, style: CaptionStyle) -> Option<u32> {
        self.0.get(&style).copied()
    }

    /// Wire map keyed by style name.
    pub fn to_wire(&self) -> BTreeMap<&'static str, u32> {
        self.0.iter().map(|(style, limit)| (style.as_str(), *limit)).collect()
    }
}

impl From<&WordLimitDefaults> for WordLimits {
    fn from(defaults: &WordLimitDefaults) -> Self {
        let mut map = BTreeMap::new();
        map.insert(CaptionStyle::Short, defaults.short.max(1));
        map.insert(CaptionStyle::Technical, defaults.technical.max(1));
        map.insert(CaptionStyle::HumanFriendly, defaults.human_friendly.max(1));
        WordLimits(map)
    }
}

impl Default for WordLimits {
    fn default() -> Self {
        WordLimits::from(&WordLimitDefaults::default())
    }
}
