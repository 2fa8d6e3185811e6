// src/services/forest.rs
//
// Bagged CART regression trees. Each tree is fit on a bootstrap sample of the
// training rows and considers every feature at every split; the forest
// prediction is the mean of the tree predictions.
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::models::FeatureVector;

pub type Sample = [f64; FeatureVector::LEN];

#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub n_trees: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        ForestParams {
            n_trees: 100,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Nodes live in a flat arena indexed by position; the root is node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

fn mean(indices: &[usize], y: &[f64]) -> f64 {
    indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
}

fn best_split(indices: &[usize], x: &[Sample], y: &[f64]) -> Option<SplitCandidate> {
    let n = indices.len();
    let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();

    let mut best: Option<SplitCandidate> = None;
    let mut sorted = indices.to_vec();

    for feature in 0..FeatureVector::LEN {
        sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for pos in 0..n - 1 {
            let yi = y[sorted[pos]];
            left_sum += yi;
            left_sq += yi * yi;

            let here = x[sorted[pos]][feature];
            let next = x[sorted[pos + 1]][feature];
            let threshold = here + (next - here) / 2.0;
            if here == next || !threshold.is_finite() {
                continue;
            }

            let left_n = (pos + 1) as f64;
            let right_n = (n - pos - 1) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);

            if best.as_ref().map_or(true, |b| sse < b.sse) {
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    sse,
                });
            }
        }
    }

    best
}

impl RegressionTree {
    /// Grow a tree over the rows named by `sample` until every leaf is pure
    /// or cannot be split further.
    fn fit(x: &[Sample], y: &[f64], sample: Vec<usize>) -> Self {
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut pending = vec![(0usize, sample)];

        while let Some((slot, indices)) = pending.pop() {
            let value = mean(&indices, y);
            let pure = indices.iter().all(|&i| y[i] == y[indices[0]]);
            if indices.len() < 2 || pure {
                nodes[slot] = Node::Leaf { value };
                continue;
            }

            let Some(split) = best_split(&indices, x, y) else {
                nodes[slot] = Node::Leaf { value };
                continue;
            };

            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| x[i][split.feature] <= split.threshold);
            if left_rows.is_empty() || right_rows.is_empty() {
                nodes[slot] = Node::Leaf { value };
                continue;
            }

            let left = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });
            let right = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });
            nodes[slot] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            pending.push((left, left_rows));
            pending.push((right, right_rows));
        }

        RegressionTree { nodes }
    }

    pub fn predict(&self, features: &Sample) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    pub fn fit(x: &[Sample], y: &[f64], params: &ForestParams) -> Result<Self> {
        if x.is_empty() {
            return Err(ForecastError::Configuration("training set is empty".to_string()));
        }
        if x.len() != y.len() {
            return Err(ForecastError::Configuration(format!(
                "feature rows ({}) and targets ({}) differ in length",
                x.len(),
                y.len()
            )));
        }
        if x.iter().flatten().chain(y).any(|v| !v.is_finite()) {
            return Err(ForecastError::Data(
                "training data contains non-finite values".to_string(),
            ));
        }
        if params.n_trees == 0 {
            return Err(ForecastError::Configuration(
                "forest needs at least one tree".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let n = x.len();
        let trees: Vec<RegressionTree> = (0..params.n_trees)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, sample)
            })
            .collect();

        debug!(
            "Fitted forest of {} trees over {} rows ({} nodes total)",
            trees.len(),
            n,
            trees.iter().map(RegressionTree::node_count).sum::<usize>()
        );
        Ok(RandomForestRegressor { trees })
    }

    pub fn predict_sample(&self, features: &Sample) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        total / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
