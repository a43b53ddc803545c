// Forest module - seeded random forest over standardized feature rows
//
// Trees are fully grown CART trees with Gini impurity splits. Each tree draws
// a bootstrap sample and a random feature subset per node from its own StdRng,
// seeded from the forest seed plus the tree index, so training is
// reproducible for a fixed seed and input.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::analysis::features::FEATURE_DIM;

/// Class index used for NATURAL rows
pub const NATURAL_CLASS: u8 = 1;

/// Class index used for ABNORMAL rows
pub const ABNORMAL_CLASS: u8 = 0;

/// Hyperparameters for forest fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum tree depth (None = grow until pure)
    pub max_depth: Option<usize>,
    /// Minimum rows required to attempt a split
    pub min_samples_split: usize,
    /// Features examined per split (None = floor(sqrt(FEATURE_DIM)))
    pub max_features: Option<usize>,
    /// Base RNG seed
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn features_per_split(&self) -> usize {
        self.max_features
            .unwrap_or_else(|| (FEATURE_DIM as f64).sqrt() as usize)
            .clamp(1, FEATURE_DIM)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        natural_probability: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Single decision tree stored as a flat node list (root at index 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Fraction of NATURAL rows in the leaf reached by `row`
    pub fn predict_proba(&self, row: &[f64; FEATURE_DIM]) -> f64 {
        let mut index = 0;
        // Child indices always increase, so a walk visits at most nodes.len() nodes
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(Node::Leaf {
                    natural_probability,
                }) => return *natural_probability,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => break,
            }
        }
        0.5
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf {
                    natural_probability,
                } => {
                    if !(0.0..=1.0).contains(natural_probability) {
                        return Err(format!(
                            "leaf {} probability {} outside [0, 1]",
                            index, natural_probability
                        ));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_DIM {
                        return Err(format!("node {} splits on unknown feature {}", index, feature));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", index));
                    }
                    for child in [left, right] {
                        if *child <= index || *child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", index, child));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Ensemble of decision trees; predictions average the tree probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit a forest on standardized rows.
    ///
    /// # Arguments
    /// * `rows` - Standardized feature rows
    /// * `labels` - Class per row (`NATURAL_CLASS` or `ABNORMAL_CLASS`)
    /// * `params` - Forest hyperparameters
    ///
    /// # Returns
    /// `None` when there are no rows or the label count does not match
    pub fn fit(rows: &[[f64; FEATURE_DIM]], labels: &[u8], params: &ForestParams) -> Option<Self> {
        if rows.is_empty() || rows.len() != labels.len() {
            return None;
        }

        let tree_count = params.n_estimators.max(1);
        let trees = (0..tree_count)
            .map(|tree_index| {
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(tree_index as u64));
                let sample: Vec<usize> = (0..rows.len())
                    .map(|_| rng.gen_range(0..rows.len()))
                    .collect();

                let mut builder = TreeBuilder {
                    rows,
                    labels,
                    params,
                    features_per_split: params.features_per_split(),
                    rng,
                    nodes: Vec::new(),
                };
                builder.grow(sample, 0);
                DecisionTree {
                    nodes: builder.nodes,
                }
            })
            .collect();

        Some(Self { trees })
    }

    /// Mean NATURAL probability over all trees (0.5 for an empty forest)
    pub fn predict_proba(&self, row: &[f64; FEATURE_DIM]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        let total: f64 = self.trees.iter().map(|t| t.predict_proba(row)).sum();
        total / self.trees.len() as f64
    }

    /// Predicted class: NATURAL iff probability > 0.5
    pub fn predict(&self, row: &[f64; FEATURE_DIM]) -> u8 {
        if self.predict_proba(row) > 0.5 {
            NATURAL_CLASS
        } else {
            ABNORMAL_CLASS
        }
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Structural validation used when loading persisted forests
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| format!("tree {}: {}", index, e))?;
        }
        Ok(())
    }
}

struct SplitCandidate {
    impurity: f64,
    feature: usize,
    threshold: f64,
}

struct TreeBuilder<'a> {
    rows: &'a [[f64; FEATURE_DIM]],
    labels: &'a [u8],
    params: &'a ForestParams,
    features_per_split: usize,
    rng: StdRng,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grow the subtree for `indices`, returning its node index
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let id = self.nodes.len();
        if indices.is_empty() {
            self.nodes.push(Node::Leaf {
                natural_probability: 0.5,
            });
            return id;
        }

        let naturals = indices
            .iter()
            .filter(|&&i| self.labels[i] == NATURAL_CLASS)
            .count();
        self.nodes.push(Node::Leaf {
            natural_probability: naturals as f64 / indices.len() as f64,
        });

        let pure = naturals == 0 || naturals == indices.len();
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if pure || depth_reached || indices.len() < self.params.min_samples_split.max(2) {
            return id;
        }

        let Some(split) = self.best_split(&indices) else {
            return id;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.rows[i][split.feature] <= split.threshold);

        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    /// Best Gini split over a random feature subset.
    ///
    /// Examines `features_per_split` features; if none of them can separate
    /// the rows, keeps drawing from the remaining features.
    fn best_split(&mut self, indices: &[usize]) -> Option<SplitCandidate> {
        let mut features: Vec<usize> = (0..FEATURE_DIM).collect();
        features.shuffle(&mut self.rng);

        let mut best: Option<SplitCandidate> = None;
        for (visited, &feature) in features.iter().enumerate() {
            if visited >= self.features_per_split && best.is_some() {
                break;
            }
            if let Some((impurity, threshold)) = self.best_threshold(indices, feature) {
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(SplitCandidate {
                        impurity,
                        feature,
                        threshold,
                    });
                }
            }
        }
        best
    }

    /// Lowest weighted Gini impurity threshold for one feature
    fn best_threshold(&self, indices: &[usize], feature: usize) -> Option<(f64, f64)> {
        let mut values: Vec<(f64, bool)> = indices
            .iter()
            .map(|&i| (self.rows[i][feature], self.labels[i] == NATURAL_CLASS))
            .collect();
        values.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total = values.len();
        let total_natural = values.iter().filter(|(_, natural)| *natural).count();

        let mut left_natural = 0;
        let mut best: Option<(f64, f64)> = None;
        for i in 0..total - 1 {
            if values[i].1 {
                left_natural += 1;
            }
            let (current, next) = (values[i].0, values[i + 1].0);
            if current >= next {
                continue;
            }

            let left_count = i + 1;
            let right_count = total - left_count;
            let right_natural = total_natural - left_natural;
            let impurity = (left_count as f64 * gini(left_natural, left_count)
                + right_count as f64 * gini(right_natural, right_count))
                / total as f64;

            if best.map_or(true, |(b, _)| impurity < b) {
                let midpoint = current + (next - current) / 2.0;
                let threshold = if midpoint < next { midpoint } else { current };
                best = Some((impurity, threshold));
            }
        }
        best
    }
}

fn gini(natural: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let p = natural as f64 / count as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}
