//! Layering: funds fanned out and pushed through intermediaries
//!
//! For every source that pays several distinct accounts, each destination
//! that passes funds on is traced as one chain.

use amlwatch_core::Transaction;
use serde::{Deserialize, Serialize};

use crate::analyzer::Analyzer;
use crate::config::LayeringConfig;
use crate::error::PatternResult;
use crate::graph::TransactionGraph;
use crate::stats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayeringFindings {
    pub complexity: u8,
    pub chain_count: usize,
}

/// One traced chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeringChain {
    pub source: String,
    /// First intermediary, where tracing starts
    pub via: String,
    /// Nodes on the longest simple path from `via`
    pub chain_length: usize,
    /// Distinct destinations of `via`
    pub branching_factor: usize,
}

impl LayeringChain {
    fn contribution(&self, multiplier: u32) -> f64 {
        (self.chain_length * self.branching_factor) as f64 * f64::from(multiplier)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayeringDetector {
    config: LayeringConfig,
}

impl LayeringDetector {
    pub fn new(config: LayeringConfig) -> Self {
        Self { config }
    }

    /// Every chain in `graph`, ordered by source then intermediary
    pub fn chains(&self, graph: &TransactionGraph) -> Vec<LayeringChain> {
        let mut chains = Vec::new();

        for source in graph.sources() {
            if graph.out_degree(source) < self.config.min_fan_out {
                continue;
            }
            for via in graph.successors(source) {
                let branching_factor = graph.out_degree(via);
                if branching_factor == 0 {
                    continue;
                }
                chains.push(LayeringChain {
                    source: source.to_string(),
                    via: via.to_string(),
                    chain_length: graph.longest_path_from(via, self.config.max_depth),
                    branching_factor,
                });
            }
        }

        chains
    }
}

impl Analyzer for LayeringDetector {
    type Output = LayeringFindings;
    const NAME: &'static str = "layering";

    fn analyze(&self, batch: &[Transaction]) -> PatternResult<LayeringFindings> {
        let graph = TransactionGraph::from_transactions(batch);
        let chains = self.chains(&graph);

        if chains.is_empty() {
            return Ok(LayeringFindings::default());
        }

        let total: f64 = chains
            .iter()
            .map(|chain| chain.contribution(self.config.chain_multiplier))
            .sum();

        Ok(LayeringFindings {
            complexity: stats::capped(total / chains.len() as f64),
            chain_count: chains.len(),
        })
    }
}
