//! Decision-forest classifier
//!
//! Evaluates an exported tree ensemble. Each tree is stored as parallel node
//! arrays; a node is a leaf when its left child is `-1`. Samples go left when
//! `x[feature] <= threshold`.
//!
//! Prediction (soft voting):
//! 1. Walk every tree to a leaf
//! 2. Normalise the leaf's class weights to a distribution
//! 3. Average the distributions and return the class with the highest mean
//!    (first one wins on ties)

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{check_dimension, load_json, Classifier, ModelError};

const LEAF: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights, `value[node][class]`
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionForest {
    pub n_features: usize,
    /// Class labels, in the column order of `value`
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
}

impl DecisionForest {
    pub fn new(
        n_features: usize,
        classes: Vec<i64>,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, ModelError> {
        let forest = Self { n_features, classes, trees };
        forest.check()?;
        Ok(forest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let forest: Self = load_json(path)?;
        forest.check()?;
        Ok(forest)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::Malformed("forest has no classes".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Malformed("forest has no trees".to_string()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features, self.classes.len())
                .map_err(|e| ModelError::Malformed(format!("tree {}: {}", idx, e)))?;
        }
        Ok(())
    }
}

impl DecisionTree {
    fn check(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("node arrays differ in length".to_string());
        }

        let in_range = |child: i64| child >= 0 && (child as usize) < n;
        for node in 0..n {
            if self.value[node].len() != n_classes {
                return Err(format!("node {} has {} class weights", node, self.value[node].len()));
            }
            if self.children_left[node] == LEAF {
                continue;
            }
            if !in_range(self.children_left[node]) || !in_range(self.children_right[node]) {
                return Err(format!("node {} has a child out of range", node));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on feature {}", node, feature));
            }
        }
        Ok(())
    }

    /// Class weights of the leaf reached by `features`
    fn leaf_value(&self, features: &[f64]) -> Result<&[f64], ModelError> {
        let mut node = 0usize;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..self.children_left.len() {
            if self.children_left[node] == LEAF {
                return Ok(&self.value[node]);
            }
            let x = features[self.feature[node] as usize];
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        Err(ModelError::Malformed("tree contains a cycle".to_string()))
    }
}

impl Classifier for DecisionForest {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        check_dimension(self.n_features, features.len())?;

        let mut votes = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf_value(features)?;
            let total: f64 = leaf.iter().sum();
            if total <= 0.0 {
                continue;
            }
            for (vote, weight) in votes.iter_mut().zip(leaf) {
                *vote += weight / total;
            }
        }

        let mut best = 0;
        for (idx, vote) in votes.iter().enumerate() {
            if *vote > votes[best] {
                best = idx;
            }
        }
        Ok(self.classes[best])
    }
}
