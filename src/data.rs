//! Training examples, label representations and the CSV dataset loader.

use crate::error::{Error, Result};
use crate::Float;

use anyhow::Context;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// The expected output of an example.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Label {
    /// Index of the correct class.
    ClassIndex(usize),
    /// A vector with one entry per output neuron.
    OneHot(Array1<Float>),
}

impl Label {
    /// Index of the class this label points at. One-hot labels are converted through argmax.
    pub fn class_index(&self) -> usize {
        match self {
            Label::ClassIndex(i) => *i,
            Label::OneHot(v) => argmax(v.view()),
        }
    }

    /// The label as a target vector of length `n_classes`.
    pub fn to_one_hot(&self, n_classes: usize) -> Result<Array1<Float>> {
        match self {
            Label::ClassIndex(i) => one_hot(*i, n_classes),
            Label::OneHot(v) => {
                Error::check_dim("one-hot label", n_classes, v.len())?;
                Ok(v.clone())
            }
        }
    }

    pub fn is_one_hot(&self) -> bool {
        matches!(self, Label::OneHot(_))
    }
}

/// An input vector together with its label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: Array1<Float>,
    pub label: Label,
}

impl Example {
    pub fn new<I: Into<Array1<Float>>>(input: I, label: Label) -> Self {
        Self {
            input: input.into(),
            label,
        }
    }

    /// Shorthand for an example labelled with a class index.
    pub fn class<I: Into<Array1<Float>>>(input: I, class: usize) -> Self {
        Self::new(input, Label::ClassIndex(class))
    }
}

/// A vector of length `n_classes` with a single one at `index`.
pub fn one_hot(index: usize, n_classes: usize) -> Result<Array1<Float>> {
    // `expected` is the class count, any index at or above it has no output neuron
    if index >= n_classes {
        return Err(Error::DimensionMismatch {
            what: "class index",
            expected: n_classes,
            found: index,
        });
    }
    let mut v = Array1::zeros(n_classes);
    v[index] = 1.;
    Ok(v)
}

/// Index of the largest element, the first one on ties. Returns 0 for an empty vector.
pub fn argmax(v: ArrayView1<Float>) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate() {
        if *x > v[best] {
            best = i;
        }
    }
    best
}

/// Replaces every label with its one-hot encoding.
pub fn into_one_hot(data: Vec<Example>, n_classes: usize) -> Result<Vec<Example>> {
    data.into_iter()
        .map(|e| {
            let label = Label::OneHot(e.label.to_one_hot(n_classes)?);
            Ok(Example::new(e.input, label))
        })
        .collect()
}

/// Loads a header-less CSV file where every row is `label,x1,x2,...`.
/// The label is parsed as a class index and every feature is divided by `scale`.
pub fn load_csv<P: AsRef<Path>>(path: P, scale: Float) -> anyhow::Result<Vec<Example>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    // rows of unequal length are rejected by the reader
    let mut data = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", row))?;
        let mut fields = record.iter();

        let label = fields
            .next()
            .filter(|f| !f.is_empty())
            .with_context(|| format!("Row {} is empty", row))?;
        let label: usize = label
            .parse()
            .with_context(|| format!("Invalid label '{}' in row {}", label, row))?;

        let input = fields
            .map(|f| {
                f.parse::<Float>()
                    .map(|x| x / scale)
                    .with_context(|| format!("Invalid feature '{}' in row {}", f, row))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        data.push(Example::class(input, label));
    }

    tracing::debug!(rows = data.len(), path = %path.display(), "loaded dataset");
    Ok(data)
}
