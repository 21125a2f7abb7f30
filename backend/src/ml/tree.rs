//! Tree-ensemble regressor
//!
//! Trees use the scikit-learn split convention: a sample goes to the left
//! child when `x[feature] <= threshold`. Node covers (training sample
//! weight reaching the node) are kept for attribution.

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Relative tolerance when checking that child covers add up to the parent
const COVER_TOLERANCE: f64 = 1e-6;

/// A decision tree node (internal or leaf)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Transformed-feature index to compare (internal nodes)
    #[serde(default)]
    pub feature: usize,
    /// Split threshold (internal nodes)
    #[serde(default)]
    pub threshold: f64,
    /// Index of left child node
    #[serde(default)]
    pub left: usize,
    /// Index of right child node
    #[serde(default)]
    pub right: usize,
    /// Leaf value (None for internal nodes, Some for leaves)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Training weight that reached this node
    pub cover: f64,
}

impl Node {
    pub fn leaf(value: f64, cover: f64) -> Self {
        Self {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
            value: Some(value),
            cover,
        }
    }

    pub fn split(feature: usize, threshold: f64, left: usize, right: usize, cover: f64) -> Self {
        Self {
            feature,
            threshold,
            left,
            right,
            value: None,
            cover,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }

    /// Child a sample follows
    pub fn next(&self, features: &[f64]) -> usize {
        if features[self.feature] <= self.threshold {
            self.left
        } else {
            self.right
        }
    }
}

/// A single decision tree, root at index 0
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Leaf value reached by `features`
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if let Some(value) = node.value {
                return value;
            }
            idx = node.next(features);
        }
    }

    /// Cover-weighted mean of the leaves: the tree's output when no feature
    /// is known
    pub fn expected_value(&self) -> f64 {
        self.expected_from(0)
    }

    fn expected_from(&self, idx: usize) -> f64 {
        let node = &self.nodes[idx];
        match node.value {
            Some(value) => value,
            None => {
                let left = &self.nodes[node.left];
                let right = &self.nodes[node.right];
                (left.cover * self.expected_from(node.left)
                    + right.cover * self.expected_from(node.right))
                    / node.cover
            }
        }
    }

    /// Check structure against a transformed feature width.
    ///
    /// Children must come after their parent, which guarantees every walk
    /// terminates.
    pub fn validate(&self, tree: usize, width: usize) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::InvalidTree { tree, reason };

        if self.nodes.is_empty() {
            return Err(invalid("tree has no nodes".to_string()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            if !(node.cover.is_finite() && node.cover >= 0.0) {
                return Err(invalid(format!("node {} has invalid cover {}", idx, node.cover)));
            }

            if let Some(value) = node.value {
                if !value.is_finite() {
                    return Err(invalid(format!("leaf {} has non-finite value", idx)));
                }
                continue;
            }

            for child in [node.left, node.right] {
                if child <= idx || child >= self.nodes.len() {
                    return Err(invalid(format!(
                        "node {} has out-of-order child {}",
                        idx, child
                    )));
                }
            }
            if node.feature >= width {
                return Err(invalid(format!(
                    "node {} splits on feature {} but only {} features exist",
                    idx, node.feature, width
                )));
            }
            if node.threshold.is_nan() {
                return Err(invalid(format!("node {} has NaN threshold", idx)));
            }
            if node.cover <= 0.0 {
                return Err(invalid(format!("internal node {} has zero cover", idx)));
            }
            let children = self.nodes[node.left].cover + self.nodes[node.right].cover;
            if (children - node.cover).abs() > COVER_TOLERANCE * node.cover {
                return Err(invalid(format!(
                    "node {} cover {} differs from children total {}",
                    idx, node.cover, children
                )));
            }
        }

        Ok(())
    }
}

/// How tree outputs are combined
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Gradient boosting: outputs are added
    #[default]
    Sum,
    /// Random forest: outputs are averaged
    Mean,
}

/// Complete tree-ensemble regressor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeEnsemble {
    /// Intercept added to the combined tree output
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Weight applied to each tree's output
    pub fn tree_weight(&self) -> f64 {
        match self.aggregation {
            Aggregation::Sum => 1.0,
            Aggregation::Mean => 1.0 / self.trees.len() as f64,
        }
    }

    /// Evaluate the ensemble on a transformed feature vector
    pub fn predict(&self, features: &[f64]) -> f64 {
        let weight = self.tree_weight();
        self.base_score
            + self
                .trees
                .iter()
                .map(|tree| tree.predict(features) * weight)
                .sum::<f64>()
    }

    /// Mean prediction over the training distribution
    pub fn expected_value(&self) -> f64 {
        let weight = self.tree_weight();
        self.base_score
            + self
                .trees
                .iter()
                .map(|tree| tree.expected_value() * weight)
                .sum::<f64>()
    }

    pub fn validate(&self, width: usize) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::InvalidTree {
                tree: 0,
                reason: "ensemble has no trees".to_string(),
            });
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::InvalidTree {
                tree: 0,
                reason: "base score is not finite".to_string(),
            });
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(idx, tree)| tree.validate(idx, width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_simple_tree() -> Tree {
        Tree {
            nodes: vec![
                // Root: if feature[0] <= 50 go left, else right
                Node::split(0, 50.0, 1, 2, 10.0),
                Node::leaf(10.0, 6.0),
                Node::leaf(20.0, 4.0),
            ],
        }
    }

    #[test]
    fn test_tree_left_branch() {
        assert_eq!(create_simple_tree().predict(&[30.0]), 10.0);
    }

    #[test]
    fn test_tree_right_branch() {
        assert_eq!(create_simple_tree().predict(&[60.0]), 20.0);
    }

    #[test]
    fn test_tree_threshold_boundary() {
        // <= 50 goes left
        assert_eq!(create_simple_tree().predict(&[50.0]), 10.0);
    }

    #[test]
    fn test_tree_expected_value() {
        // 0.6 * 10 + 0.4 * 20
        assert!((create_simple_tree().expected_value() - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_ensemble_sum_with_base() {
        let model = TreeEnsemble {
            base_score: 5.0,
            aggregation: Aggregation::Sum,
            trees: vec![create_simple_tree(), create_simple_tree()],
        };
        assert_eq!(model.predict(&[30.0]), 25.0);
        assert_eq!(model.predict(&[60.0]), 45.0);
    }

    #[test]
    fn test_ensemble_mean() {
        let constant = Tree {
            nodes: vec![Node::leaf(40.0, 10.0)],
        };
        let model = TreeEnsemble {
            base_score: 0.0,
            aggregation: Aggregation::Mean,
            trees: vec![create_simple_tree(), constant],
        };
        assert_eq!(model.predict(&[30.0]), 25.0);
        assert!((model.expected_value() - 27.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_accepts_simple_tree() {
        assert!(create_simple_tree().validate(0, 1).is_ok());
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let tree = Tree {
            nodes: vec![Node::split(0, 1.0, 0, 1, 2.0), Node::leaf(1.0, 2.0)],
        };
        assert!(matches!(tree.validate(3, 1), Err(ModelError::InvalidTree { tree: 3, .. })));
    }

    #[test]
    fn test_validate_rejects_feature_out_of_range() {
        assert!(create_simple_tree().validate(0, 0).is_err());
    }

    #[test]
    fn test_validate_rejects_inconsistent_cover() {
        let tree = Tree {
            nodes: vec![
                Node::split(0, 1.0, 1, 2, 10.0),
                Node::leaf(1.0, 3.0),
                Node::leaf(2.0, 3.0),
            ],
        };
        assert!(tree.validate(0, 1).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_ensemble() {
        let model = TreeEnsemble {
            base_score: 0.0,
            aggregation: Aggregation::Sum,
            trees: vec![],
        };
        assert!(model.validate(1).is_err());
    }

    #[test]
    fn test_node_json_shape() {
        let leaf: Node = serde_json::from_str(r#"{"value": 3.5, "cover": 12}"#).unwrap();
        assert!(leaf.is_leaf());
        let split: Node = serde_json::from_str(
            r#"{"feature": 2, "threshold": 0.5, "left": 1, "right": 2, "cover": 12}"#,
        )
        .unwrap();
        assert!(!split.is_leaf());
        assert_eq!(split.feature, 2);
    }
}
