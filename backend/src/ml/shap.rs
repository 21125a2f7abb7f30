//! Exact Shapley attributions for tree ensembles
//!
//! Path-dependent TreeSHAP: one walk per tree tracks, for every feature on
//! the current root-to-node path, the share of permutations in which that
//! feature is known. Background expectations come from node covers, so no
//! reference dataset is needed at inference time.
//!
//! For any input the attributions satisfy
//! `expected_value + sum(values) == prediction` up to float error.

use super::tree::{Tree, TreeEnsemble};

/// One feature on the unique path from the root
#[derive(Debug, Clone, Copy)]
struct PathElement {
    /// Split feature (None for the root placeholder)
    feature: Option<usize>,
    /// Fraction of paths flowing through when the feature is unknown
    zero_fraction: f64,
    /// Fraction of paths flowing through when the feature is known
    one_fraction: f64,
    /// Permutation weight
    weight: f64,
}

fn extend_path(path: &mut Vec<PathElement>, zero_fraction: f64, one_fraction: f64, feature: Option<usize>) {
    let depth = path.len();
    path.push(PathElement {
        feature,
        zero_fraction,
        one_fraction,
        weight: if depth == 0 { 1.0 } else { 0.0 },
    });

    let denom = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].weight += one_fraction * path[i].weight * (i + 1) as f64 / denom;
        path[i].weight = zero_fraction * path[i].weight * (depth - i) as f64 / denom;
    }
}

/// Undo the extension that added `path[index]`
fn unwind_path(path: &mut Vec<PathElement>, index: usize) {
    let depth = path.len() - 1;
    let PathElement {
        zero_fraction,
        one_fraction,
        ..
    } = path[index];
    let denom = (depth + 1) as f64;
    let mut next_one_portion = path[depth].weight;

    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let tmp = path[i].weight;
            path[i].weight = next_one_portion * denom / ((i + 1) as f64 * one_fraction);
            next_one_portion = tmp - path[i].weight * zero_fraction * (depth - i) as f64 / denom;
        } else {
            path[i].weight = path[i].weight * denom / (zero_fraction * (depth - i) as f64);
        }
    }

    for i in index..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
    path.pop();
}

/// Total permutation weight of the path with `path[index]` removed
fn unwound_path_sum(path: &[PathElement], index: usize) -> f64 {
    let depth = path.len() - 1;
    let PathElement {
        zero_fraction,
        one_fraction,
        ..
    } = path[index];
    let mut total = 0.0;

    if one_fraction != 0.0 {
        let mut next_one_portion = path[depth].weight;
        for i in (0..depth).rev() {
            let tmp = next_one_portion / ((i + 1) as f64 * one_fraction);
            total += tmp;
            next_one_portion = path[i].weight - tmp * zero_fraction * (depth - i) as f64;
        }
    } else {
        for i in (0..depth).rev() {
            total += path[i].weight / (zero_fraction * (depth - i) as f64);
        }
    }

    total * (depth + 1) as f64
}

struct Walk<'a> {
    tree: &'a Tree,
    features: &'a [f64],
    phi: &'a mut [f64],
    scale: f64,
}

impl Walk<'_> {
    fn recurse(
        &mut self,
        node_idx: usize,
        parent: &[PathElement],
        zero_fraction: f64,
        one_fraction: f64,
        feature: Option<usize>,
    ) {
        let mut path = parent.to_vec();
        extend_path(&mut path, zero_fraction, one_fraction, feature);

        let tree = self.tree;
        let node = &tree.nodes[node_idx];
        if let Some(value) = node.value {
            for i in 1..path.len() {
                let weight = unwound_path_sum(&path, i);
                let element = path[i];
                if let Some(f) = element.feature {
                    self.phi[f] += weight
                        * (element.one_fraction - element.zero_fraction)
                        * value
                        * self.scale;
                }
            }
            return;
        }

        let hot = node.next(self.features);
        let cold = if hot == node.left { node.right } else { node.left };
        let hot_zero = tree.nodes[hot].cover / node.cover;
        let cold_zero = tree.nodes[cold].cover / node.cover;

        // A feature already on the path is folded into the new split
        let mut incoming_zero = 1.0;
        let mut incoming_one = 1.0;
        if let Some(k) = path.iter().position(|e| e.feature == Some(node.feature)) {
            incoming_zero = path[k].zero_fraction;
            incoming_one = path[k].one_fraction;
            unwind_path(&mut path, k);
        }

        let split = Some(node.feature);
        for (child, zero, one) in [
            (hot, hot_zero * incoming_zero, incoming_one),
            (cold, cold_zero * incoming_zero, 0.0),
        ] {
            // Unreachable either way: contributes nothing
            if zero == 0.0 && one == 0.0 {
                continue;
            }
            self.recurse(child, &path, zero, one, split);
        }
    }
}

/// Add one tree's attributions for `features`, multiplied by `scale`, to `phi`
pub fn tree_shap(tree: &Tree, features: &[f64], phi: &mut [f64], scale: f64) {
    let mut walk = Walk {
        tree,
        features,
        phi,
        scale,
    };
    walk.recurse(0, &[], 1.0, 1.0, None);
}

/// Attributions for one prediction
#[derive(Debug, Clone, PartialEq)]
pub struct ShapValues {
    /// One value per transformed feature
    pub values: Vec<f64>,
    /// Model output with no features known
    pub expected_value: f64,
}

impl ShapValues {
    /// Attribute an ensemble's prediction on a transformed feature vector
    pub fn compute(ensemble: &TreeEnsemble, features: &[f64]) -> Self {
        let mut values = vec![0.0; features.len()];
        let weight = ensemble.tree_weight();
        for tree in &ensemble.trees {
            tree_shap(tree, features, &mut values, weight);
        }
        Self {
            values,
            expected_value: ensemble.expected_value(),
        }
    }

    /// Reconstructed prediction
    pub fn total(&self) -> f64 {
        self.expected_value + self.values.iter().sum::<f64>()
    }
}
