//! Flat result record of one detection run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anomaly::AnomalyFindings;
use crate::layering::LayeringFindings;
use crate::network::NetworkFindings;
use crate::smurfing::SmurfingFindings;

/// Output of [`crate::PatternDetector`].
///
/// Scores are within `0..=100`; counts are exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAnalysisResult {
    pub smurfing_confidence: u8,
    pub smurfing_patterns: usize,
    pub layering_complexity: u8,
    pub layering_chains: usize,
    pub network_hub_score: u8,
    pub suspicious_nodes: usize,
    pub anomaly_score: u8,
    pub anomalous_transactions: usize,
    pub analysis_timestamp: DateTime<Utc>,
}

impl PatternAnalysisResult {
    /// All-zero result
    pub fn empty(analysis_timestamp: DateTime<Utc>) -> Self {
        Self::from_findings(
            SmurfingFindings::default(),
            LayeringFindings::default(),
            NetworkFindings::default(),
            AnomalyFindings::default(),
            analysis_timestamp,
        )
    }

    pub fn from_findings(
        smurfing: SmurfingFindings,
        layering: LayeringFindings,
        network: NetworkFindings,
        anomaly: AnomalyFindings,
        analysis_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            smurfing_confidence: smurfing.confidence,
            smurfing_patterns: smurfing.pattern_count,
            layering_complexity: layering.complexity,
            layering_chains: layering.chain_count,
            network_hub_score: network.hub_score,
            suspicious_nodes: network.suspicious_nodes,
            anomaly_score: anomaly.score,
            anomalous_transactions: anomaly.anomalous_count,
            analysis_timestamp,
        }
    }

    /// True when no analyzer found anything
    pub fn is_clean(&self) -> bool {
        self.smurfing_patterns == 0
            && self.layering_chains == 0
            && self.suspicious_nodes == 0
            && self.anomalous_transactions == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_field_names() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
        let result = PatternAnalysisResult::empty(at);
        let json = serde_json::to_value(&result).unwrap();

        for field in [
            "smurfingConfidence",
            "smurfingPatterns",
            "layeringComplexity",
            "layeringChains",
            "networkHubScore",
            "suspiciousNodes",
            "anomalyScore",
            "anomalousTransactions",
            "analysisTimestamp",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert!(result.is_clean());
    }
}
