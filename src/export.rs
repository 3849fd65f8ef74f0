//! Trained parameters in the form an embedded classifier consumes.
//!
//! The text form is a block of C constant definitions:
//!
//! ```text
//! const double {prefix}_w[D] = {w0, w1, ...};
//! const double {prefix}_b = b;
//! const double {prefix}_mean[D] = {m0, m1, ...};
//! const double {prefix}_std[D] = {s0, s1, ...};
//! ```
//!
//! Arrays are written with 8 decimals, the bias with 16.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::model::{Fitted, LogisticModel};
use crate::preprocessing::FittedStandardScaler;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_PREFIX: &str = "logistic_regression";

/// Weights, bias and the normalization statistics they were trained under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportedModel {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

fn format_array(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.8}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExportedModel {
    pub fn new(weights: Vec<f64>, bias: f64, mean: Vec<f64>, std: Vec<f64>) -> Result<Self> {
        let exported = Self {
            weights,
            bias,
            mean,
            std,
        };
        exported.check_lengths()?;
        Ok(exported)
    }

    pub fn from_fitted<B: Backend>(
        model: &LogisticModel<B, Fitted>,
        scaler: &FittedStandardScaler<B>,
    ) -> Result<Self> {
        Self::new(
            model.weights().to_vec(),
            model.bias(),
            scaler.mean().to_vec(),
            scaler.std().to_vec(),
        )
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn check_lengths(&self) -> Result<()> {
        let d = self.weights.len();
        if self.mean.len() != d || self.std.len() != d {
            return Err(Error::InvalidInput(format!(
                "export needs {d} means and standard deviations, got {} and {}",
                self.mean.len(),
                self.std.len()
            )));
        }
        Ok(())
    }

    /// Renders the four constant definitions, one per line.
    ///
    /// ```
    /// use logistic_trainer::export::ExportedModel;
    ///
    /// let m = ExportedModel::new(vec![1.5, -2.0], 0.25, vec![10.0, 20.0], vec![2.0, 4.0]).unwrap();
    /// let text = m.to_text("clf");
    /// assert!(text.starts_with("const double clf_w[2] = {1.50000000, -2.00000000};\n"));
    /// assert!(text.contains("const double clf_b = 0.2500000000000000;\n"));
    /// ```
    pub fn to_text(&self, prefix: &str) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "const double {prefix}_w[{}] = {{{}}};",
            self.weights.len(),
            format_array(&self.weights)
        );
        let _ = writeln!(out, "const double {prefix}_b = {:.16};", self.bias);
        let _ = writeln!(
            out,
            "const double {prefix}_mean[{}] = {{{}}};",
            self.mean.len(),
            format_array(&self.mean)
        );
        let _ = writeln!(
            out,
            "const double {prefix}_std[{}] = {{{}}};",
            self.std.len(),
            format_array(&self.std)
        );
        out
    }

    /// Reads back a block written by [`to_text`](Self::to_text) with the
    /// same prefix. Other lines are ignored.
    pub fn parse_text(prefix: &str, text: &str) -> Result<Self> {
        let weights = parse_array(text, prefix, "w")?;
        let bias = parse_scalar(text, prefix, "b")?;
        let mean = parse_array(text, prefix, "mean")?;
        let std = parse_array(text, prefix, "std")?;
        Self::new(weights, bias, mean, std)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let exported = Self::from_bytes(&std::fs::read(path)?)?;
        exported.check_lengths()?;
        Ok(exported)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let exported: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        exported.check_lengths()?;
        Ok(exported)
    }
}

/// Right-hand side of `const double {prefix}_{name}... = ...;`.
fn definition<'a>(text: &'a str, prefix: &str, name: &str) -> Result<(&'a str, &'a str)> {
    let head = format!("const double {prefix}_{name}");
    for line in text.lines().map(str::trim) {
        let Some(rest) = line.strip_prefix(&head) else {
            continue;
        };
        // `_w` must not match `_weights`
        if !(rest.starts_with('[') || rest.trim_start().starts_with('=')) {
            continue;
        }
        let (decl, value) = rest
            .split_once('=')
            .ok_or_else(|| Error::Parse(format!("missing `=` in `{line}`")))?;
        let value = value
            .trim()
            .strip_suffix(';')
            .ok_or_else(|| Error::Parse(format!("missing `;` in `{line}`")))?;
        return Ok((decl.trim(), value.trim()));
    }
    Err(Error::Parse(format!("no definition of `{prefix}_{name}`")))
}

fn parse_number(s: &str) -> Result<f64> {
    s.trim()
        .parse()
        .map_err(|_| Error::Parse(format!("`{}` is not a number", s.trim())))
}

fn parse_scalar(text: &str, prefix: &str, name: &str) -> Result<f64> {
    let (_, value) = definition(text, prefix, name)?;
    parse_number(value)
}

fn parse_array(text: &str, prefix: &str, name: &str) -> Result<Vec<f64>> {
    let (decl, value) = definition(text, prefix, name)?;
    let len: usize = decl
        .strip_prefix('[')
        .and_then(|d| d.strip_suffix(']'))
        .and_then(|d| d.trim().parse().ok())
        .ok_or_else(|| Error::Parse(format!("bad array length `{decl}` for `{prefix}_{name}`")))?;
    let body = value
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
        .ok_or_else(|| Error::Parse(format!("`{prefix}_{name}` is not a braced list")))?;
    let values = if body.trim().is_empty() {
        Vec::new()
    } else {
        body.split(',').map(parse_number).collect::<Result<Vec<_>>>()?
    };
    if values.len() != len {
        return Err(Error::Parse(format!(
            "`{prefix}_{name}` declares {len} values but lists {}",
            values.len()
        )));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor2D};
    use crate::model::{InferenceModel, SerializableLinearParams};
    use crate::preprocessing::{StandardScaler, Transformer};
    use approx::assert_abs_diff_eq;

    fn sample() -> ExportedModel {
        ExportedModel::new(
            vec![0.123456789, -4.5, 1e-9],
            -0.1234567890123456789,
            vec![120.0, 80.5, 33.25],
            vec![10.0, 2.5, 0.75],
        )
        .unwrap()
    }

    #[test]
    fn test_text_layout() {
        let text = sample().to_text("ColorSensor::logistic_regression");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "const double ColorSensor::logistic_regression_w[3] = {0.12345679, -4.50000000, 0.00000000};"
        );
        assert_eq!(
            lines[1],
            "const double ColorSensor::logistic_regression_b = -0.1234567890123457;"
        );
        assert_eq!(
            lines[3],
            "const double ColorSensor::logistic_regression_std[3] = {10.00000000, 2.50000000, 0.75000000};"
        );
    }

    #[test]
    fn test_parse_recovers_printed_precision() {
        let original = sample();
        let parsed = ExportedModel::parse_text(DEFAULT_PREFIX, &original.to_text(DEFAULT_PREFIX))
            .unwrap();
        for (a, b) in parsed.weights.iter().zip(&original.weights) {
            assert_abs_diff_eq!(*a, *b, epsilon = 5e-9);
        }
        assert_abs_diff_eq!(parsed.bias, original.bias, epsilon = 1e-16);
        assert_eq!(parsed.mean, original.mean);
        assert_eq!(parsed.std, original.std);
    }

    #[test]
    fn test_parse_ignores_surrounding_lines_and_other_prefixes() {
        let text = format!(
            "// generated\n{}{}",
            sample().to_text("other"),
            sample().to_text("mine")
        );
        let parsed = ExportedModel::parse_text("mine", &text).unwrap();
        assert_eq!(parsed.n_features(), 3);
        assert!(ExportedModel::parse_text("missing", &text).is_err());
    }

    #[test]
    fn test_parse_rejects_length_mismatch() {
        let text = sample()
            .to_text("p")
            .replace("p_mean[3]", "p_mean[4]");
        assert!(matches!(ExportedModel::parse_text("p", &text), Err(Error::Parse(_))));

        let text = sample().to_text("p").replace("-4.50000000", "oops");
        assert!(matches!(ExportedModel::parse_text("p", &text), Err(Error::Parse(_))));
    }

    #[test]
    fn test_mismatched_statistics_rejected() {
        assert!(ExportedModel::new(vec![1.0], 0.0, vec![], vec![1.0]).is_err());
    }

    #[test]
    fn test_from_fitted() {
        let x = Tensor2D::<CpuBackend>::new(vec![1.0, 10.0, 3.0, 30.0], 2, 2);
        let scaler = StandardScaler::<CpuBackend>::new().fit(&x).unwrap();
        let model = LogisticModel::<CpuBackend, Fitted>::from_params(SerializableLinearParams {
            weights: vec![0.5, -0.5],
            bias: 1.0,
        })
        .unwrap();
        let exported = ExportedModel::from_fitted(&model, &scaler).unwrap();
        assert_eq!(exported.mean, vec![2.0, 20.0]);
        assert_eq!(exported.std, vec![1.0, 10.0]);
        assert_eq!(exported.weights, vec![0.5, -0.5]);
    }

    #[test]
    fn test_binary_and_json_files() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = tmp.path().join("model.bin");
        let json = tmp.path().join("model.json");

        sample().save_to_file(&bin).unwrap();
        sample().save_json(&json).unwrap();
        assert_eq!(ExportedModel::load_from_file(&bin).unwrap(), sample());
        assert_eq!(ExportedModel::load_json(&json).unwrap(), sample());
    }
}
