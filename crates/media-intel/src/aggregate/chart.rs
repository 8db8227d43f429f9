//! Chart identities and their display metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartShape {
    Pie,
    Line,
    HorizontalBar,
}

/// The five dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Sentiment,
    EngagementTrend,
    Platform,
    MediaType,
    TopLocations,
}

impl ChartKind {
    /// All charts in dashboard order.
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Sentiment,
        ChartKind::EngagementTrend,
        ChartKind::Platform,
        ChartKind::MediaType,
        ChartKind::TopLocations,
    ];

    /// Position in [`Self::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Sentiment => 0,
            Self::EngagementTrend => 1,
            Self::Platform => 2,
            Self::MediaType => 3,
            Self::TopLocations => 4,
        }
    }

    /// Stable identifier, also used as the insight slot key.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::EngagementTrend => "engagement_trend",
            Self::Platform => "platform",
            Self::MediaType => "media_type",
            Self::TopLocations => "top_locations",
        }
    }

    /// Label sent to the model alongside the data.
    pub fn label(&self, top_locations: usize) -> String {
        match self {
            Self::Sentiment => "Sentiment Breakdown".to_string(),
            Self::EngagementTrend => "Engagement Trend over Time".to_string(),
            Self::Platform => "Platform Engagements".to_string(),
            Self::MediaType => "Media Type Mix".to_string(),
            Self::TopLocations => format!("Top {} Locations", top_locations),
        }
    }

    pub fn title(&self, top_locations: usize) -> String {
        match self {
            Self::Sentiment => "Sentiment Distribution".to_string(),
            Self::EngagementTrend => "Total Engagements Over Time".to_string(),
            Self::Platform => "Total Engagements by Platform".to_string(),
            Self::MediaType => "Media Type Distribution".to_string(),
            Self::TopLocations => format!("Top {} Locations by Total Engagements", top_locations),
        }
    }

    /// Field name of the key in serialized records.
    pub fn key_field(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::EngagementTrend => "date",
            Self::Platform => "platform",
            Self::MediaType => "mediaType",
            Self::TopLocations => "location",
        }
    }

    /// Field name of the metric in serialized records.
    pub fn metric_field(&self) -> &'static str {
        match self {
            Self::Sentiment | Self::MediaType => "count",
            Self::EngagementTrend | Self::Platform | Self::TopLocations => "engagements",
        }
    }

    pub fn shape(&self) -> ChartShape {
        match self {
            Self::Sentiment | Self::MediaType => ChartShape::Pie,
            Self::EngagementTrend => ChartShape::Line,
            Self::Platform | Self::TopLocations => ChartShape::HorizontalBar,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<&str> = ChartKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(ids.len(), ChartKind::ALL.len());
    }

    #[test]
    fn test_index_matches_dashboard_order() {
        for (i, kind) in ChartKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_serde_uses_ids() {
        for kind in ChartKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }

    #[test]
    fn test_top_locations_label_follows_limit() {
        assert_eq!(ChartKind::TopLocations.label(5), "Top 5 Locations");
        assert_eq!(ChartKind::TopLocations.label(3), "Top 3 Locations");
        assert_eq!(ChartKind::Platform.label(3), "Platform Engagements");
    }

    #[test]
    fn test_shapes() {
        assert_eq!(ChartKind::Sentiment.shape(), ChartShape::Pie);
        assert_eq!(ChartKind::EngagementTrend.shape(), ChartShape::Line);
        assert_eq!(ChartKind::TopLocations.shape(), ChartShape::HorizontalBar);
    }
}
