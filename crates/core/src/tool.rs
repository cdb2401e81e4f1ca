//! The fixed registry of public tools.
//!
//! Slugs double as URL path segments and as the tool component of result
//! keys, so the set is closed and compile-time checked.

use serde::{Deserialize, Serialize};

/// Public tools that produce shareable results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    StrainRecommender,
    StrainCompare,
    CbdVsThc,
    ToleranceBreakPlanner,
    GrowTimeline,
    TerpeneGuide,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::StrainRecommender,
        Tool::StrainCompare,
        Tool::CbdVsThc,
        Tool::ToleranceBreakPlanner,
        Tool::GrowTimeline,
        Tool::TerpeneGuide,
    ];

    /// URL/key slug for this tool.
    pub fn slug(self) -> &'static str {
        match self {
            Tool::StrainRecommender => "strain-recommender",
            Tool::StrainCompare => "strain-compare",
            Tool::CbdVsThc => "cbd-vs-thc",
            Tool::ToleranceBreakPlanner => "tolerance-break-planner",
            Tool::GrowTimeline => "grow-timeline",
            Tool::TerpeneGuide => "terpene-guide",
        }
    }

    /// Human-readable name used by the page layer (e.g. the "expired" state).
    pub fn display_name(self) -> &'static str {
        match self {
            Tool::StrainRecommender => "Strain Recommender",
            Tool::StrainCompare => "Strain Compare",
            Tool::CbdVsThc => "CBD vs THC",
            Tool::ToleranceBreakPlanner => "Tolerance Break Planner",
            Tool::GrowTimeline => "Grow Timeline",
            Tool::TerpeneGuide => "Terpene Guide",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.slug() == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_roundtrip() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_slug(tool.slug()), Some(tool));
        }
    }

    #[test]
    fn test_from_slug_unknown() {
        assert_eq!(Tool::from_slug("mood-ring"), None);
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&Tool::CbdVsThc).unwrap();
        assert_eq!(json, "\"cbd-vs-thc\"");
        let back: Tool = serde_json::from_str("\"tolerance-break-planner\"").unwrap();
        assert_eq!(back, Tool::ToleranceBreakPlanner);
    }
}
