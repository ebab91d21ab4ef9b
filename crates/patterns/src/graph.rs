//! Directed account graph of a batch
//!
//! Nodes are accounts, edges are `from -> to` with the number of transfers
//! and their total amount. Parallel transfers fold into one edge, so the
//! neighbours of a node are its distinct counterparties. Neighbours are
//! visited in account-id order to keep traversal stable between runs.

use std::collections::{HashMap, HashSet};

use amlwatch_core::Transaction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction::Outgoing;

/// Aggregate of all transfers along one edge
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeStats {
    pub count: usize,
    pub total_amount: f64,
}

/// Account node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountNode {
    pub account_id: String,
    /// Number of transactions the account takes part in
    pub degree: usize,
}

/// Graph of accounts and transfers, built fresh for each run
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    graph: DiGraph<AccountNode, EdgeStats>,
    accounts: HashMap<String, NodeIndex>,
}

impl TransactionGraph {
    pub fn from_transactions(batch: &[Transaction]) -> Self {
        let mut graph = Self::default();
        for tx in batch {
            graph.add(tx);
        }
        graph
    }

    fn node(&mut self, account_id: &str) -> NodeIndex {
        if let Some(index) = self.accounts.get(account_id) {
            return *index;
        }
        let index = self.graph.add_node(AccountNode {
            account_id: account_id.to_string(),
            degree: 0,
        });
        self.accounts.insert(account_id.to_string(), index);
        index
    }

    fn add(&mut self, tx: &Transaction) {
        let from = self.node(&tx.from_account_id);
        let to = self.node(&tx.to_account_id);

        let edge = match self.graph.find_edge(from, to) {
            Some(edge) => edge,
            None => self.graph.add_edge(from, to, EdgeStats::default()),
        };
        if let Some(stats) = self.graph.edge_weight_mut(edge) {
            stats.count += 1;
            stats.total_amount += tx.amount.as_f64();
        }

        // A self-transfer is one transaction, so one degree.
        self.graph[from].degree += 1;
        if to != from {
            self.graph[to].degree += 1;
        }
    }

    fn index(&self, account_id: &str) -> Option<NodeIndex> {
        self.accounts.get(account_id).copied()
    }

    fn account(&self, index: NodeIndex) -> &str {
        &self.graph[index].account_id
    }

    /// Outgoing neighbours of `index`, ordered by account id
    fn successor_indices(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self.graph.neighbors_directed(index, Outgoing).collect();
        next.sort_by(|a, b| self.account(*a).cmp(self.account(*b)));
        next.dedup();
        next
    }

    /// Number of distinct accounts
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Distinct destinations of `account`, ordered by account id
    pub fn successors(&self, account: &str) -> Vec<&str> {
        self.index(account)
            .map(|index| {
                self.successor_indices(index)
                    .into_iter()
                    .map(|next| self.account(next))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of distinct destinations of `account`
    pub fn out_degree(&self, account: &str) -> usize {
        self.index(account)
            .map_or(0, |index| self.graph.edges_directed(index, Outgoing).count())
    }

    /// Accounts with at least one outgoing transfer, ordered by account id
    pub fn sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self
            .graph
            .node_indices()
            .filter(|index| self.graph.edges_directed(*index, Outgoing).next().is_some())
            .map(|index| self.account(index))
            .collect();
        sources.sort_unstable();
        sources
    }

    /// Number of transactions `account` takes part in
    pub fn degree(&self, account: &str) -> usize {
        self.index(account).map_or(0, |index| self.graph[index].degree)
    }

    pub fn degrees(&self) -> impl Iterator<Item = (&str, usize)> {
        self.graph.node_indices().map(|index| {
            let node = &self.graph[index];
            (node.account_id.as_str(), node.degree)
        })
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<EdgeStats> {
        let from = self.index(from)?;
        let to = self.index(to)?;
        self.graph
            .edges_directed(from, Outgoing)
            .find(|edge| edge.target() == to)
            .map(|edge| *edge.weight())
    }

    /// Node count of the longest simple path starting at `start`, capped at
    /// `max_nodes`.
    ///
    /// Iterative depth-first search; the visited set holds only the nodes
    /// on the current path, so diamonds are explored along every branch
    /// and cycles terminate.
    pub fn longest_path_from(&self, start: &str, max_nodes: usize) -> usize {
        if max_nodes == 0 {
            return 0;
        }
        let Some(start) = self.index(start) else {
            return 1;
        };

        let mut path: Vec<NodeIndex> = vec![start];
        let mut on_path: HashSet<NodeIndex> = HashSet::from([start]);
        let mut stack = vec![self.successor_indices(start).into_iter()];
        let mut longest = 1;

        while let Some(frame) = stack.last_mut() {
            if path.len() >= max_nodes {
                stack.pop();
                if let Some(node) = path.pop() {
                    on_path.remove(&node);
                }
                continue;
            }

            match frame.next() {
                Some(next) if !on_path.contains(&next) => {
                    path.push(next);
                    on_path.insert(next);
                    longest = longest.max(path.len());
                    stack.push(self.successor_indices(next).into_iter());
                }
                Some(_) => {}
                None => {
                    stack.pop();
                    if let Some(node) = path.pop() {
                        on_path.remove(&node);
                    }
                }
            }
        }

        longest
    }
}
