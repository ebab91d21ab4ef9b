//! Network hubs: accounts that take part in far more transactions than
//! their peers.

use amlwatch_core::Transaction;
use serde::{Deserialize, Serialize};

use crate::analyzer::Analyzer;
use crate::config::NetworkConfig;
use crate::error::PatternResult;
use crate::graph::TransactionGraph;
use crate::stats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkFindings {
    pub hub_score: u8,
    pub suspicious_nodes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NetworkAnalyzer {
    config: NetworkConfig,
}

impl NetworkAnalyzer {
    pub fn new(config: NetworkConfig) -> Self {
        Self { config }
    }

    /// Accounts whose degree exceeds `mean + hub_sigma * std`
    pub fn hubs<'g>(&self, graph: &'g TransactionGraph) -> Vec<&'g str> {
        let degrees: Vec<f64> = graph.degrees().map(|(_, d)| d as f64).collect();
        let (Some(mean), Some(std)) = (stats::mean(&degrees), stats::std_dev(&degrees)) else {
            return Vec::new();
        };
        let threshold = mean + self.config.hub_sigma * std;

        graph
            .degrees()
            .filter(|(_, d)| *d as f64 > threshold)
            .map(|(account, _)| account)
            .collect()
    }
}

impl Analyzer for NetworkAnalyzer {
    type Output = NetworkFindings;
    const NAME: &'static str = "network";

    fn analyze(&self, batch: &[Transaction]) -> PatternResult<NetworkFindings> {
        let graph = TransactionGraph::from_transactions(batch);
        let hubs = self.hubs(&graph);

        Ok(NetworkFindings {
            hub_score: stats::percentage(hubs.len(), graph.node_count()),
            suspicious_nodes: hubs.len(),
        })
    }
}
