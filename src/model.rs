// ActiSense — Model Artifacts & Inference
//
// A model artifact is a JSON document carrying pretrained parameters plus a
// declared kind. Two kinds exist:
//   * classical — a decision forest voted over summary features; outputs a
//     bare label index, no confidence;
//   * sequence — a dense softmax layer over the flattened scaled window,
//     with the fitted scaler embedded in the artifact; outputs a
//     probability distribution, reported as argmax + percentage.
//
// A shape mismatch between artifact and feature vector means the model and
// pipeline were trained for different layouts. That is an integrity error:
// it surfaces immediately and is never retried.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::{CHANNEL_COUNT, LABEL_COUNT, LABEL_NAMES};
use crate::error::ModelError;
use crate::events::{Prediction, Sample};
use crate::features::{summary_features, FeatureVector, Scaler};

// ---------------------------------------------------------------------------
// Artifact format
// ---------------------------------------------------------------------------

/// One node of a decision tree. Children are indices into the tree's node
/// array; evaluation starts at node 0 and goes left when
/// `features[feature] <= threshold`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: usize,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Dense softmax layer: `logits = weights · x + bias`, one row per label.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Artifact {
    Classical { trees: Vec<Tree> },
    Sequence { scaler: Scaler, dense: DenseLayer },
}

#[derive(Debug, Clone, Deserialize)]
struct ArtifactFile {
    display_name: String,
    #[serde(flatten)]
    artifact: Artifact,
}

// ---------------------------------------------------------------------------
// Model handle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Classical,
    Sequence,
}

/// A loaded, immutable inference artifact. Owned by the classification loop
/// for the duration of a run.
pub struct ModelHandle {
    display_name: String,
    artifact: Artifact,
}

impl ModelHandle {
    /// Load an artifact from disk. Missing files and corrupt documents fail
    /// here, before the loop starts; shape problems surface at first
    /// inference.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = fs::read_to_string(path).map_err(|e| ModelError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text).map_err(|e| match e {
            ModelError::Load { reason, .. } => ModelError::Load {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let file: ArtifactFile = serde_json::from_str(text).map_err(|e| ModelError::Load {
            path: String::new(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            display_name: file.display_name,
            artifact: file.artifact,
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> ModelKind {
        match self.artifact {
            Artifact::Classical { .. } => ModelKind::Classical,
            Artifact::Sequence { .. } => ModelKind::Sequence,
        }
    }

    /// Run the pre-processing strategy matching this model's kind.
    pub fn extract(&self, window: &[Sample]) -> FeatureVector {
        match &self.artifact {
            Artifact::Classical { .. } => FeatureVector::Summary(summary_features(window)),
            Artifact::Sequence { scaler, .. } => FeatureVector::Scaled(scaler.transform(window)),
        }
    }

    /// Uniform inference contract over both model kinds.
    pub fn infer(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        match (&self.artifact, features) {
            (Artifact::Classical { trees }, FeatureVector::Summary(values)) => {
                let label = forest_vote(trees, values)?;
                Ok(Prediction {
                    label: label_name(label)?,
                    confidence: None,
                })
            }
            (Artifact::Sequence { dense, .. }, FeatureVector::Scaled(rows)) => {
                let probs = dense_softmax(dense, rows)?;
                let (label, best) = argmax(&probs);
                Ok(Prediction {
                    label: label_name(label)?,
                    confidence: Some(best * 100.0),
                })
            }
            _ => Err(ModelError::ShapeMismatch(
                "feature vector variant does not match model kind".into(),
            )),
        }
    }
}

fn label_name(index: usize) -> Result<String, ModelError> {
    LABEL_NAMES
        .get(index)
        .map(|name| name.to_string())
        .ok_or(ModelError::LabelOutOfRange {
            index,
            count: LABEL_COUNT,
        })
}

// ---------------------------------------------------------------------------
// Classical back-end — decision forest majority vote
// ---------------------------------------------------------------------------

fn forest_vote(trees: &[Tree], features: &[f64]) -> Result<usize, ModelError> {
    if trees.is_empty() {
        return Err(ModelError::ShapeMismatch("forest has no trees".into()));
    }

    let mut votes = [0usize; LABEL_COUNT];
    for tree in trees {
        let label = eval_tree(tree, features)?;
        if label >= LABEL_COUNT {
            return Err(ModelError::LabelOutOfRange {
                index: label,
                count: LABEL_COUNT,
            });
        }
        votes[label] += 1;
    }

    let (winner, _) = votes
        .iter()
        .enumerate()
        .max_by_key(|&(_, count)| count)
        .unwrap_or((0, &0));
    Ok(winner)
}

fn eval_tree(tree: &Tree, features: &[f64]) -> Result<usize, ModelError> {
    let mut index = 0usize;
    // A well-formed tree terminates in at most `nodes.len()` hops; more
    // means a cycle in the artifact.
    for _ in 0..=tree.nodes.len() {
        match tree.nodes.get(index) {
            Some(TreeNode::Leaf { label }) => return Ok(*label),
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let value = *features.get(*feature).ok_or_else(|| {
                    ModelError::ShapeMismatch(format!(
                        "split references feature {} but the vector has {} values",
                        feature,
                        features.len()
                    ))
                })?;
                index = if value <= *threshold { *left } else { *right };
            }
            None => {
                return Err(ModelError::ShapeMismatch(format!(
                    "tree child index {} out of range",
                    index
                )))
            }
        }
    }
    Err(ModelError::ShapeMismatch("tree does not terminate".into()))
}

// ---------------------------------------------------------------------------
// Sequence back-end — dense layer + softmax
// ---------------------------------------------------------------------------

fn dense_softmax(
    dense: &DenseLayer,
    rows: &[[f64; CHANNEL_COUNT]],
) -> Result<Vec<f64>, ModelError> {
    let input_len = rows.len() * CHANNEL_COUNT;
    if dense.weights.len() != LABEL_COUNT || dense.bias.len() != LABEL_COUNT {
        return Err(ModelError::ShapeMismatch(format!(
            "dense layer has {} outputs, label set has {}",
            dense.weights.len().max(dense.bias.len()),
            LABEL_COUNT
        )));
    }

    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    let mut logits = Vec::with_capacity(LABEL_COUNT);
    for (row, bias) in dense.weights.iter().zip(&dense.bias) {
        if row.len() != input_len {
            return Err(ModelError::ShapeMismatch(format!(
                "weight row has {} inputs, scaled window flattens to {}",
                row.len(),
                input_len
            )));
        }
        let dot: f64 = row.iter().zip(&flat).map(|(w, x)| w * x).sum();
        logits.push(dot + bias);
    }

    // Max-shifted softmax keeps the exponentials in range.
    let max_logit = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max_logit).exp()).collect();
    let sum: f64 = exps.iter().sum();
    Ok(exps.into_iter().map(|e| e / sum).collect())
}

fn argmax(probs: &[f64]) -> (usize, f64) {
    let mut best_index = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (index, &value) in probs.iter().enumerate() {
        if value > best_value {
            best_index = index;
            best_value = value;
        }
    }
    (best_index, best_value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WINDOW_SIZE;

    /// A forest whose every tree is a single leaf — a constant classifier.
    fn constant_classical(label: usize) -> ModelHandle {
        ModelHandle {
            display_name: "Stub Forest".into(),
            artifact: Artifact::Classical {
                trees: vec![Tree {
                    nodes: vec![TreeNode::Leaf { label }],
                }],
            },
        }
    }

    fn identity_scaler() -> Scaler {
        Scaler {
            mean: [0.0; CHANNEL_COUNT],
            scale: [1.0; CHANNEL_COUNT],
        }
    }

    fn sequence_model(weights: Vec<Vec<f64>>, bias: Vec<f64>) -> ModelHandle {
        ModelHandle {
            display_name: "Stub Dense".into(),
            artifact: Artifact::Sequence {
                scaler: identity_scaler(),
                dense: DenseLayer { weights, bias },
            },
        }
    }

    #[test]
    fn forest_majority_vote_wins() {
        let trees: Vec<Tree> = [0, 1, 1, 1, 2]
            .iter()
            .map(|&label| Tree {
                nodes: vec![TreeNode::Leaf { label }],
            })
            .collect();
        assert_eq!(forest_vote(&trees, &[0.0; 24]).unwrap(), 1);
    }

    #[test]
    fn split_routes_on_threshold() {
        let tree = Tree {
            nodes: vec![
                TreeNode::Split {
                    feature: 3,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { label: 0 },
                TreeNode::Leaf { label: 5 },
            ],
        };
        let mut features = vec![0.0; 24];
        assert_eq!(eval_tree(&tree, &features).unwrap(), 0);
        features[3] = 0.9;
        assert_eq!(eval_tree(&tree, &features).unwrap(), 5);
    }

    #[test]
    fn split_past_feature_vector_is_shape_mismatch() {
        let tree = Tree {
            nodes: vec![TreeNode::Split {
                feature: 24,
                threshold: 0.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(matches!(
            eval_tree(&tree, &[0.0; 24]),
            Err(ModelError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn leaf_label_outside_label_set_is_fatal() {
        let model = constant_classical(6);
        let features = FeatureVector::Summary(vec![0.0; 24]);
        assert!(matches!(
            model.infer(&features),
            Err(ModelError::LabelOutOfRange { index: 6, .. })
        ));
    }

    #[test]
    fn classical_prediction_has_no_confidence() {
        let model = constant_classical(4);
        let prediction = model
            .infer(&FeatureVector::Summary(vec![0.0; 24]))
            .unwrap();
        assert_eq!(prediction.label, "Sitting");
        assert_eq!(prediction.confidence, None);
    }

    #[test]
    fn dense_softmax_reports_argmax_percentage() {
        let input_len = WINDOW_SIZE * CHANNEL_COUNT;
        // Zero weights: probabilities come from the bias alone.
        let weights = vec![vec![0.0; input_len]; LABEL_COUNT];
        let bias = vec![0.0, 0.0, 0.0, 0.0, 0.0, 3.0];
        let model = sequence_model(weights, bias);

        let rows = vec![[0.0; CHANNEL_COUNT]; WINDOW_SIZE];
        let prediction = model.infer(&FeatureVector::Scaled(rows)).unwrap();
        assert_eq!(prediction.label, "Walking");

        let confidence = prediction.confidence.unwrap();
        let expected = 100.0 * 3.0f64.exp() / (5.0 + 3.0f64.exp());
        assert!((confidence - expected).abs() < 1e-9);
    }

    #[test]
    fn softmax_distribution_sums_to_one() {
        let dense = DenseLayer {
            weights: vec![vec![0.1; CHANNEL_COUNT]; LABEL_COUNT],
            bias: vec![0.5, -0.5, 1.0, 0.0, 2.0, -1.0],
        };
        let rows = vec![[1.0; CHANNEL_COUNT]; 1];
        let probs = dense_softmax(&dense, &rows).unwrap();
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn wrong_weight_row_length_is_shape_mismatch() {
        let model = sequence_model(vec![vec![0.0; 10]; LABEL_COUNT], vec![0.0; LABEL_COUNT]);
        let rows = vec![[0.0; CHANNEL_COUNT]; WINDOW_SIZE];
        assert!(matches!(
            model.infer(&FeatureVector::Scaled(rows)),
            Err(ModelError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn wrong_output_cardinality_is_shape_mismatch() {
        let model = sequence_model(vec![vec![0.0; CHANNEL_COUNT]; 2], vec![0.0; 2]);
        let rows = vec![[0.0; CHANNEL_COUNT]; 1];
        assert!(matches!(
            model.infer(&FeatureVector::Scaled(rows)),
            Err(ModelError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn mismatched_feature_variant_is_shape_mismatch() {
        let model = constant_classical(0);
        let rows = vec![[0.0; CHANNEL_COUNT]; WINDOW_SIZE];
        assert!(matches!(
            model.infer(&FeatureVector::Scaled(rows)),
            Err(ModelError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn artifact_json_round_trips_both_kinds() {
        let classical = r#"{
            "display_name": "Random Forest",
            "kind": "classical",
            "trees": [ { "nodes": [ { "leaf": { "label": 4 } } ] } ]
        }"#;
        let model = ModelHandle::from_json(classical).unwrap();
        assert_eq!(model.display_name(), "Random Forest");
        assert_eq!(model.kind(), ModelKind::Classical);

        let sequence = r#"{
            "display_name": "CNN",
            "kind": "sequence",
            "scaler": { "mean": [0,0,0,0,0,0], "scale": [1,1,1,1,1,1] },
            "dense": { "weights": [[0],[0],[0],[0],[0],[0]], "bias": [0,0,0,0,0,1] }
        }"#;
        let model = ModelHandle::from_json(sequence).unwrap();
        assert_eq!(model.kind(), ModelKind::Sequence);
    }

    #[test]
    fn corrupt_artifact_is_a_load_error() {
        assert!(matches!(
            ModelHandle::from_json("{ not json"),
            Err(ModelError::Load { .. })
        ));
        assert!(matches!(
            ModelHandle::from_json(r#"{ "display_name": "X", "kind": "quantum" }"#),
            Err(ModelError::Load { .. })
        ));
    }

    #[test]
    fn extract_selects_strategy_by_kind() {
        let window = vec![Sample::new([1.0; CHANNEL_COUNT]); 4];
        assert!(matches!(
            constant_classical(0).extract(&window),
            FeatureVector::Summary(_)
        ));
        let model = sequence_model(
            vec![vec![0.0; 4 * CHANNEL_COUNT]; LABEL_COUNT],
            vec![0.0; LABEL_COUNT],
        );
        assert!(matches!(model.extract(&window), FeatureVector::Scaled(_)));
    }
}
