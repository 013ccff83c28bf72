//! Landing-success classifier: feature preparation, training and the persisted bundle.
//!
//! The model is a standardized logistic regression fitted by batch gradient
//! descent. Training is deterministic so that re-running `train-model` on the
//! same dataset reproduces the same bundle.

use crate::core::dataset::Table;
use crate::core::history::{parse_label, CLASS_COLUMN, SUCCESS_COLUMN};
use crate::core::{Classifier, Storage};
use crate::utils::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Columns never used as model inputs.
pub const DROPPED_COLUMNS: [&str; 6] = [
    CLASS_COLUMN,
    "Date",
    "Time",
    "FlightNumber",
    "Unnamed: 0",
    SUCCESS_COLUMN,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl LogisticModel {
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn standardize(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }

    fn logit(&self, standardized: &[f64]) -> f64 {
        self.bias
            + standardized
                .iter()
                .zip(&self.weights)
                .map(|(x, w)| x * w)
                .sum::<f64>()
    }
}

impl Classifier for LogisticModel {
    fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features()
            || self.means.len() != self.n_features()
            || self.scales.len() != self.n_features()
        {
            return Err(ForecastError::scoring(format!(
                "feature length mismatch: got {}, model expects {}",
                row.len(),
                self.n_features()
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::scoring("feature row contains non-finite values"));
        }

        let p = sigmoid(self.logit(&self.standardize(row)));
        if !p.is_finite() {
            return Err(ForecastError::scoring("model produced a non-finite probability"));
        }
        Ok(p)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// What `train-model` writes and the service loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierBundle {
    pub model: LogisticModel,
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub accuracy: f64,
}

impl ClassifierBundle {
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let bytes = storage.read_file(path).await?;
        let bundle: Self = serde_json::from_slice(&bytes)?;
        Ok(bundle)
    }

    pub async fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        storage.write_file(path, &json).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2: f64,
    pub test_fraction: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epochs: 2000,
            learning_rate: 0.1,
            l2: 0.01,
            test_fraction: 0.2,
        }
    }
}

/// Numeric design matrix built from the raw dataset.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<bool>,
}

enum ColumnEncoding {
    Numeric,
    Labels(Vec<String>),
}

pub fn prepare_training_set(table: &Table) -> Result<TrainingSet> {
    let class_idx = table.column_index(CLASS_COLUMN).ok_or_else(|| {
        ForecastError::dataset(format!("Dataset has no {} column", CLASS_COLUMN))
    })?;

    let feature_columns: Vec<usize> = (0..table.headers.len())
        .filter(|&idx| !DROPPED_COLUMNS.contains(&table.headers[idx].as_str()))
        .collect();
    if feature_columns.is_empty() {
        return Err(ForecastError::dataset("Dataset has no feature columns"));
    }

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for (line, row) in table.rows.iter().enumerate() {
        match table.cell(row, Some(class_idx)).and_then(parse_label) {
            Some(label) => {
                rows.push(row);
                labels.push(label);
            }
            None => tracing::warn!("Skipping row {}: no usable {} label", line + 1, CLASS_COLUMN),
        }
    }
    if rows.is_empty() {
        return Err(ForecastError::dataset("Dataset has no labelled rows"));
    }

    let mut features = vec![Vec::with_capacity(feature_columns.len()); rows.len()];
    for &col in &feature_columns {
        let cells: Vec<Option<&str>> = rows.iter().map(|row| table.cell(row, Some(col))).collect();
        let column = encode_column(&cells);
        for (target, value) in features.iter_mut().zip(column) {
            target.push(value);
        }
    }

    let feature_names = feature_columns
        .iter()
        .map(|&idx| table.headers[idx].clone())
        .collect();

    Ok(TrainingSet {
        feature_names,
        features,
        labels,
    })
}

fn encode_column(cells: &[Option<&str>]) -> Vec<f64> {
    let encoding = if cells.iter().flatten().all(|v| v.parse::<f64>().is_ok()) {
        ColumnEncoding::Numeric
    } else {
        let distinct: BTreeSet<&str> = cells.iter().map(|c| c.unwrap_or("")).collect();
        ColumnEncoding::Labels(distinct.into_iter().map(str::to_string).collect())
    };

    match encoding {
        ColumnEncoding::Numeric => {
            let parsed: Vec<Option<f64>> = cells
                .iter()
                .map(|c| c.and_then(|v| v.parse::<f64>().ok()).filter(|v| v.is_finite()))
                .collect();
            let present: Vec<f64> = parsed.iter().flatten().copied().collect();
            let mean = if present.is_empty() {
                0.0
            } else {
                present.iter().sum::<f64>() / present.len() as f64
            };
            parsed.into_iter().map(|v| v.unwrap_or(mean)).collect()
        }
        // missing categorical cells encode as their own (empty) label
        ColumnEncoding::Labels(labels) => cells
            .iter()
            .map(|c| {
                let value = c.unwrap_or("");
                labels.iter().position(|l| l == value).unwrap_or(0) as f64
            })
            .collect(),
    }
}

/// Deterministic stratified split; returns (train, test) row indices.
pub fn stratified_split(labels: &[bool], test_fraction: f64) -> (Vec<usize>, Vec<usize>) {
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [false, true] {
        let members = labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == class)
            .map(|(idx, _)| idx);
        for (position, idx) in members.enumerate() {
            let before = (position as f64 * test_fraction).floor();
            let after = ((position + 1) as f64 * test_fraction).floor();
            if after > before {
                test.push(idx);
            } else {
                train.push(idx);
            }
        }
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

pub fn fit(features: &[Vec<f64>], labels: &[bool], options: &TrainOptions) -> Result<LogisticModel> {
    if features.is_empty() || features.len() != labels.len() {
        return Err(ForecastError::dataset(format!(
            "Cannot fit {} rows against {} labels",
            features.len(),
            labels.len()
        )));
    }
    let n_features = features[0].len();
    if features.iter().any(|row| row.len() != n_features) {
        return Err(ForecastError::dataset("Ragged feature matrix"));
    }

    let n = features.len() as f64;
    let mut means = vec![0.0; n_features];
    for row in features {
        for (m, x) in means.iter_mut().zip(row) {
            *m += x / n;
        }
    }
    let mut scales = vec![0.0; n_features];
    for row in features {
        for ((s, x), m) in scales.iter_mut().zip(row).zip(&means) {
            *s += (x - m).powi(2) / n;
        }
    }
    // constant columns keep a unit scale so they standardize to zero
    for s in scales.iter_mut() {
        *s = if *s > 0.0 { s.sqrt() } else { 1.0 };
    }

    let mut model = LogisticModel {
        weights: vec![0.0; n_features],
        bias: 0.0,
        means,
        scales,
    };
    let standardized: Vec<Vec<f64>> = features.iter().map(|row| model.standardize(row)).collect();
    let targets: Vec<f64> = labels.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect();

    for _ in 0..options.epochs {
        let mut grad_w = vec![0.0; n_features];
        let mut grad_b = 0.0;
        for (x, y) in standardized.iter().zip(&targets) {
            let err = sigmoid(model.logit(x)) - y;
            for (g, xi) in grad_w.iter_mut().zip(x) {
                *g += err * xi;
            }
            grad_b += err;
        }
        for (w, g) in model.weights.iter_mut().zip(&grad_w) {
            *w -= options.learning_rate * (g / n + options.l2 * *w);
        }
        model.bias -= options.learning_rate * grad_b / n;
    }

    if model.weights.iter().any(|w| !w.is_finite()) || !model.bias.is_finite() {
        return Err(ForecastError::scoring("training diverged; lower model.learning_rate"));
    }
    Ok(model)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub label: u8,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
}

pub fn evaluate(model: &LogisticModel, features: &[Vec<f64>], labels: &[bool]) -> Result<Evaluation> {
    let mut predictions = Vec::with_capacity(features.len());
    for row in features {
        predictions.push(model.predict_proba(row)? >= 0.5);
    }

    let correct = predictions.iter().zip(labels).filter(|(p, l)| p == l).count();
    let accuracy = if labels.is_empty() {
        0.0
    } else {
        correct as f64 / labels.len() as f64
    };

    let classes = [false, true]
        .into_iter()
        .map(|class| {
            let tp = predictions
                .iter()
                .zip(labels)
                .filter(|(&p, &l)| p == class && l == class)
                .count() as f64;
            let predicted = predictions.iter().filter(|&&p| p == class).count() as f64;
            let support = labels.iter().filter(|&&l| l == class).count();
            let precision = if predicted > 0.0 { tp / predicted } else { 0.0 };
            let recall = if support > 0 { tp / support as f64 } else { 0.0 };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                label: class as u8,
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    Ok(Evaluation { accuracy, classes })
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>8} {:>10} {:>10} {:>10} {:>10}", "class", "precision", "recall", "f1-score", "support")?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>8} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        write!(f, "accuracy {:.2}%", self.accuracy * 100.0)
    }
}

/// Prepares, splits, fits and scores; the bundle's accuracy is measured on the held-out rows.
pub fn train(table: &Table, options: &TrainOptions) -> Result<(ClassifierBundle, Evaluation)> {
    let set = prepare_training_set(table)?;
    tracing::info!(
        "Training on {} rows x {} features: {:?}",
        set.features.len(),
        set.feature_names.len(),
        set.feature_names
    );

    let (train_idx, test_idx) = stratified_split(&set.labels, options.test_fraction);
    if train_idx.is_empty() || test_idx.is_empty() {
        return Err(ForecastError::dataset(format!(
            "Not enough labelled rows to split ({} train, {} test)",
            train_idx.len(),
            test_idx.len()
        )));
    }
    let pick = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<bool>) {
        (
            idx.iter().map(|&i| set.features[i].clone()).collect(),
            idx.iter().map(|&i| set.labels[i]).collect(),
        )
    };
    let (x_train, y_train) = pick(&train_idx);
    let (x_test, y_test) = pick(&test_idx);

    let model = fit(&x_train, &y_train, options)?;
    let evaluation = evaluate(&model, &x_test, &y_test)?;

    Ok((
        ClassifierBundle {
            model,
            feature_names: set.feature_names,
            accuracy: evaluation.accuracy,
        },
        evaluation,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_table() -> Table {
        let mut csv = String::from("FlightNumber,Date,PayloadMass,Orbit,GridFins,Class\n");
        for i in 0..20 {
            let landed = i % 2 == 0;
            let payload = if landed { 3000 + i * 10 } else { 12000 + i * 10 };
            let orbit = if landed { "LEO" } else { "GTO" };
            csv.push_str(&format!(
                "{},2015-01-01,{},{},{},{}\n",
                i + 1,
                payload,
                orbit,
                if landed { "True" } else { "False" },
                landed as u8
            ));
        }
        Table::from_csv_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_prepare_drops_and_encodes_columns() {
        let set = prepare_training_set(&separable_table()).unwrap();
        assert_eq!(set.feature_names, vec!["PayloadMass", "Orbit", "GridFins"]);
        assert_eq!(set.features.len(), 20);
        // GTO sorts before LEO, False before True
        assert_eq!(set.features[0], vec![3000.0, 1.0, 1.0]);
        assert_eq!(set.features[1], vec![12010.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_numeric_cells_use_column_mean() {
        let table = Table::from_csv_bytes(b"PayloadMass,Class\n100,1\n,0\n300,1\n").unwrap();
        let set = prepare_training_set(&table).unwrap();
        assert_eq!(set.features[1], vec![200.0]);
    }

    #[test]
    fn test_rows_without_label_are_skipped() {
        let table = Table::from_csv_bytes(b"PayloadMass,Class\n100,1\n200,\n300,0\n").unwrap();
        let set = prepare_training_set(&table).unwrap();
        assert_eq!(set.labels, vec![true, false]);
    }

    #[test]
    fn test_missing_class_column_is_error() {
        let table = Table::from_csv_bytes(b"PayloadMass\n100\n").unwrap();
        assert!(prepare_training_set(&table).is_err());
    }

    #[test]
    fn test_stratified_split_every_fifth_per_class() {
        let labels: Vec<bool> = (0..20).map(|i| i % 2 == 0).collect();
        let (train, test) = stratified_split(&labels, 0.2);
        assert_eq!(train.len(), 16);
        assert_eq!(test.len(), 4);
        assert_eq!(test.iter().filter(|&&i| labels[i]).count(), 2);
        assert_eq!(test, vec![8, 9, 18, 19]);
    }

    #[test]
    fn test_fit_separates_classes() {
        let (bundle, evaluation) = train(&separable_table(), &TrainOptions::default()).unwrap();
        assert_eq!(evaluation.accuracy, 1.0);
        assert_eq!(bundle.accuracy, 1.0);

        let light = bundle.model.predict_proba(&[3500.0, 1.0, 1.0]).unwrap();
        let heavy = bundle.model.predict_proba(&[12500.0, 0.0, 0.0]).unwrap();
        assert!(light > 0.5, "light payload p={}", light);
        assert!(heavy < 0.5, "heavy payload p={}", heavy);
    }

    #[test]
    fn test_predict_rejects_wrong_shape() {
        let model = LogisticModel {
            weights: vec![0.5, -0.5],
            bias: 0.0,
            means: vec![0.0, 0.0],
            scales: vec![1.0, 1.0],
        };
        assert!(matches!(
            model.predict_proba(&[1.0]),
            Err(ForecastError::ScoringFailure { .. })
        ));
        assert!(model.predict_proba(&[1.0, f64::NAN]).is_err());
        assert!((model.predict_proba(&[0.0, 0.0]).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bundle_without_feature_names_deserializes() {
        let json = r#"{"model":{"weights":[1.0],"bias":0.0,"means":[0.0],"scales":[1.0]},"accuracy":0.9}"#;
        let bundle: ClassifierBundle = serde_json::from_str(json).unwrap();
        assert!(bundle.feature_names.is_empty());
    }

    #[test]
    fn test_evaluation_report_lists_both_classes() {
        let (_, evaluation) = train(&separable_table(), &TrainOptions::default()).unwrap();
        let report = evaluation.to_string();
        assert!(report.contains("precision"));
        assert!(report.contains("accuracy 100.00%"));
        assert_eq!(evaluation.classes.len(), 2);
        assert_eq!(evaluation.classes[1].support, 2);
    }
}
