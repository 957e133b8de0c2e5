//! Regression tree ensemble oracle.
//!
//! Nodes are stored flat per tree with the root at index 0. A split sends
//! `x[feature] <= threshold` left, everything else (including NaN) right.
//! Children always point forward, so traversal terminates.

use serde::{Deserialize, Serialize};

use super::oracle::{check_finite, check_width, ModelOracle};
use crate::error::{ArtifactLoadError, OracleError};
use crate::logic::features::FeatureVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// How per-tree outputs combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Random forest: average of trees
    #[default]
    Mean,
    /// Boosting: learning_rate * sum of trees
    Sum,
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleParams {
    pub n_features: usize,
    pub trees: Vec<Vec<TreeNode>>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct TreeEnsembleOracle {
    n_features: usize,
    trees: Vec<Vec<TreeNode>>,
    aggregation: Aggregation,
    base_score: f64,
    learning_rate: f64,
}

impl TreeEnsembleOracle {
    pub fn from_params(params: TreeEnsembleParams) -> Result<Self, ArtifactLoadError> {
        if params.trees.is_empty() {
            return Err(invalid("tree ensemble has no trees".to_string()));
        }
        if !params.base_score.is_finite() || !params.learning_rate.is_finite() {
            return Err(invalid("tree ensemble has non-finite parameters".to_string()));
        }
        for (t, nodes) in params.trees.iter().enumerate() {
            validate_tree(t, nodes, params.n_features)?;
        }

        Ok(Self {
            n_features: params.n_features,
            trees: params.trees,
            aggregation: params.aggregation,
            base_score: params.base_score,
            learning_rate: params.learning_rate,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn invalid(reason: String) -> ArtifactLoadError {
    ArtifactLoadError::InvalidModel(reason)
}

fn validate_tree(t: usize, nodes: &[TreeNode], n_features: usize) -> Result<(), ArtifactLoadError> {
    if nodes.is_empty() {
        return Err(invalid(format!("tree {} is empty", t)));
    }

    for (i, node) in nodes.iter().enumerate() {
        match *node {
            TreeNode::Split { feature, threshold, left, right } => {
                if feature >= n_features {
                    return Err(invalid(format!(
                        "tree {} node {} splits on feature {} of {}",
                        t, i, feature, n_features
                    )));
                }
                if !threshold.is_finite() {
                    return Err(invalid(format!("tree {} node {} has non-finite threshold", t, i)));
                }
                for child in [left, right] {
                    if child <= i || child >= nodes.len() {
                        return Err(invalid(format!(
                            "tree {} node {} has invalid child {}",
                            t, i, child
                        )));
                    }
                }
            }
            TreeNode::Leaf { value } => {
                if !value.is_finite() {
                    return Err(invalid(format!("tree {} leaf {} is non-finite", t, i)));
                }
            }
        }
    }

    Ok(())
}

fn traverse(nodes: &[TreeNode], x: &[f64]) -> f64 {
    let mut idx = 0;
    loop {
        match nodes[idx] {
            TreeNode::Leaf { value } => return value,
            TreeNode::Split { feature, threshold, left, right } => {
                idx = if x[feature] <= threshold { left } else { right };
            }
        }
    }
}

impl ModelOracle for TreeEnsembleOracle {
    fn predict(&self, features: &FeatureVector) -> Result<f64, OracleError> {
        check_width(self.n_features, features)?;

        let x = features.as_slice();
        let total: f64 = self.trees.iter().map(|nodes| traverse(nodes, x)).sum();

        let combined = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => self.learning_rate * total,
        };

        check_finite(self.base_score + combined)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        match self.aggregation {
            Aggregation::Mean => "random_forest",
            Aggregation::Sum => "gradient_boosting",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::TrainingSchema;

    fn stump(feature: usize, low: f64, high: f64) -> Vec<TreeNode> {
        vec![
            TreeNode::Split { feature, threshold: 0.5, left: 1, right: 2 },
            TreeNode::Leaf { value: low },
            TreeNode::Leaf { value: high },
        ]
    }

    fn vector(values: Vec<f64>) -> FeatureVector {
        let names: Vec<String> = (0..values.len()).map(|i| format!("f{}", i)).collect();
        let mut v = FeatureVector::zeros(&TrainingSchema::from_columns(names).unwrap());
        v.values = values;
        v
    }

    fn params(trees: Vec<Vec<TreeNode>>, aggregation: Aggregation) -> TreeEnsembleParams {
        TreeEnsembleParams {
            n_features: 2,
            trees,
            aggregation,
            base_score: 0.0,
            learning_rate: 1.0,
            feature_names: None,
        }
    }

    #[test]
    fn test_forest_averages_trees() {
        let oracle = TreeEnsembleOracle::from_params(params(
            vec![stump(0, 80.0, 30.0), stump(1, 60.0, 20.0)],
            Aggregation::Mean,
        ))
        .unwrap();

        // feature 0 set (fog), feature 1 unset
        assert_eq!(oracle.predict(&vector(vec![1.0, 0.0])), Ok(45.0));
        assert_eq!(oracle.predict(&vector(vec![0.0, 0.0])), Ok(70.0));
        assert_eq!(oracle.name(), "random_forest");
    }

    #[test]
    fn test_boosting_sums_with_learning_rate() {
        let mut p = params(vec![stump(0, 10.0, -10.0), stump(1, 4.0, -4.0)], Aggregation::Sum);
        p.base_score = 50.0;
        p.learning_rate = 0.5;
        let oracle = TreeEnsembleOracle::from_params(p).unwrap();

        assert_eq!(oracle.predict(&vector(vec![0.0, 1.0])), Ok(53.0));
    }

    #[test]
    fn test_nodes_parse_from_json() {
        let json = r#"[{"feature":0,"threshold":0.5,"left":1,"right":2},{"value":1.0},{"value":2.0}]"#;
        let nodes: Vec<TreeNode> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes, stump(0, 1.0, 2.0));
    }

    #[test]
    fn test_backward_child_rejected() {
        let cyclic = vec![
            TreeNode::Split { feature: 0, threshold: 0.5, left: 0, right: 1 },
            TreeNode::Leaf { value: 1.0 },
        ];
        assert!(TreeEnsembleOracle::from_params(params(vec![cyclic], Aggregation::Mean)).is_err());
    }

    #[test]
    fn test_feature_out_of_range_rejected() {
        assert!(TreeEnsembleOracle::from_params(params(vec![stump(7, 1.0, 2.0)], Aggregation::Mean)).is_err());
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        assert!(TreeEnsembleOracle::from_params(params(vec![], Aggregation::Mean)).is_err());
        assert!(TreeEnsembleOracle::from_params(params(vec![vec![]], Aggregation::Mean)).is_err());
    }
}
