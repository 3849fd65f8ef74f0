//! Label encoding for the target column.
//!
//! Encoding is an explicit two-pass step: [`LabelEncoder::fit`] scans the full
//! column once to collect the class domain and build the [`LabelMap`], then
//! [`LabelMap::transform`] encodes each row.

use crate::dataset::Column;
use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Label encoder for a categorical or numeric target column.
///
/// Classes are ordered deterministically: numeric columns numerically, text
/// columns lexicographically. Codes are positions in that order.
///
/// # Example
/// ```
/// use logistic_trainer::dataset::Column;
/// use logistic_trainer::preprocessing::LabelEncoder;
///
/// let column = Column::from(vec!["raspberry", "leaf", "raspberry"]);
/// let map = LabelEncoder::new().fit(&column)?;
///
/// assert_eq!(map.classes(), &["leaf".to_string(), "raspberry".to_string()]);
/// assert_eq!(map.transform(&column)?, vec![1, 0, 1]);
/// # Ok::<(), logistic_trainer::preprocessing::PreprocessingError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct LabelEncoder;

impl LabelEncoder {
    pub fn new() -> Self {
        Self
    }

    /// First pass: collect the class domain of the whole column.
    pub fn fit(&self, labels: &Column) -> Result<LabelMap, PreprocessingError> {
        if labels.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit LabelEncoder on empty data".to_string(),
            ));
        }

        let classes: Vec<String> = match labels {
            Column::Numeric(values) => {
                if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                    return Err(PreprocessingError::NonFinite(format!(
                        "LabelEncoder expects finite values, got {bad}"
                    )));
                }
                // `+ 0.0` folds -0.0 into 0.0, matching `Column::key`
                let mut sorted: Vec<f64> = values.iter().map(|v| v + 0.0).collect();
                sorted.sort_by(f64::total_cmp);
                sorted.dedup();
                sorted.iter().map(f64::to_string).collect()
            }
            Column::Categorical(values) => values
                .iter()
                .cloned()
                .collect::<BTreeSet<String>>()
                .into_iter()
                .collect(),
        };

        Ok(LabelMap::from_classes(classes))
    }

    /// Both passes in one call.
    pub fn fit_transform(
        &self,
        labels: &Column,
    ) -> Result<(LabelMap, Vec<usize>), PreprocessingError> {
        let map = self.fit(labels)?;
        let codes = map.transform(labels)?;
        Ok((map, codes))
    }
}

/// Serializable parameters for a [`LabelMap`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelMapParams {
    /// Class names in code order.
    pub classes: Vec<String>,
}

/// Bijection between integer class codes and the original label names.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelMap {
    classes: Vec<String>,
    class_to_idx: HashMap<String, usize>,
}

impl LabelMap {
    fn from_classes(classes: Vec<String>) -> Self {
        let class_to_idx = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx))
            .collect();
        Self {
            classes,
            class_to_idx,
        }
    }

    /// Class names in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Code of a class name.
    pub fn code(&self, class: &str) -> Option<usize> {
        self.class_to_idx.get(class).copied()
    }

    /// Class name of a code.
    pub fn label(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// `(code, name)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.classes.iter().map(String::as_str).enumerate()
    }

    /// Second pass: encode every row of the column.
    ///
    /// # Errors
    /// [`PreprocessingError::UnknownLabel`] for a value outside the fitted domain.
    pub fn transform(&self, labels: &Column) -> Result<Vec<usize>, PreprocessingError> {
        (0..labels.len())
            .map(|i| {
                let key = labels.key(i).unwrap_or_default();
                self.code(&key)
                    .ok_or(PreprocessingError::UnknownLabel(key))
            })
            .collect()
    }

    /// Decode codes back to class names.
    pub fn inverse_transform(&self, codes: &[usize]) -> Result<Vec<String>, PreprocessingError> {
        codes
            .iter()
            .map(|&code| {
                self.label(code).map(str::to_string).ok_or_else(|| {
                    PreprocessingError::InvalidParameter(format!(
                        "Code {} out of bounds ({} classes)",
                        code,
                        self.n_classes()
                    ))
                })
            })
            .collect()
    }

    pub fn extract_params(&self) -> LabelMapParams {
        LabelMapParams {
            classes: self.classes.clone(),
        }
    }

    /// Rebuilds the map, rejecting duplicate class names.
    pub fn from_params(params: LabelMapParams) -> Result<Self, PreprocessingError> {
        let map = Self::from_classes(params.classes);
        if map.class_to_idx.len() != map.classes.len() {
            return Err(PreprocessingError::InvalidParameter(
                "LabelMap classes must be unique".to_string(),
            ));
        }
        Ok(map)
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self.extract_params().to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError> {
        let bytes = std::fs::read(path)?;
        Self::from_params(LabelMapParams::from_bytes(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_classes_sorted_lexicographically() {
        let column = Column::from(vec!["yes", "no", "maybe", "no"]);
        let map = LabelEncoder::new().fit(&column).unwrap();
        assert_eq!(map.classes(), &["maybe", "no", "yes"]);
        assert_eq!(map.transform(&column).unwrap(), vec![2, 1, 0, 1]);
    }

    #[test]
    fn test_numeric_classes_sorted_numerically() {
        // lexicographic order would put "10" before "2"
        let column = Column::Numeric(vec![10.0, 2.0, 10.0, 2.0]);
        let map = LabelEncoder::new().fit(&column).unwrap();
        assert_eq!(map.classes(), &["2", "10"]);
        assert_eq!(map.transform(&column).unwrap(), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_signed_zeros_are_one_class() {
        let column = Column::Numeric(vec![-0.0, 0.0, 1.0, 1.0]);
        let (map, codes) = LabelEncoder::new().fit_transform(&column).unwrap();
        assert_eq!(map.classes(), &["0", "1"]);
        assert_eq!(codes, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_codes_stable_for_subset_missing_a_class() {
        let full = Column::from(vec!["a", "b", "c"]);
        let map = LabelEncoder::new().fit(&full).unwrap();
        let only_c = Column::from(vec!["c", "c"]);
        assert_eq!(map.transform(&only_c).unwrap(), vec![2, 2]);
    }

    #[test]
    fn test_unknown_label() {
        let map = LabelEncoder::new().fit(&Column::from(vec!["a"])).unwrap();
        let err = map.transform(&Column::from(vec!["z"])).unwrap_err();
        assert!(matches!(err, PreprocessingError::UnknownLabel(ref l) if l == "z"));
    }

    #[test]
    fn test_inverse_transform() {
        let (map, codes) = LabelEncoder::new()
            .fit_transform(&Column::from(vec!["leaf", "raspberry"]))
            .unwrap();
        assert_eq!(
            map.inverse_transform(&codes).unwrap(),
            vec!["leaf".to_string(), "raspberry".to_string()]
        );
        assert!(map.inverse_transform(&[5]).is_err());
    }

    #[test]
    fn test_empty_and_non_finite() {
        assert!(matches!(
            LabelEncoder::new().fit(&Column::Numeric(vec![])),
            Err(PreprocessingError::EmptyData(_))
        ));
        assert!(matches!(
            LabelEncoder::new().fit(&Column::Numeric(vec![1.0, f64::NAN])),
            Err(PreprocessingError::NonFinite(_))
        ));
    }

    #[test]
    fn test_from_params_rejects_duplicates() {
        let params = LabelMapParams {
            classes: vec!["a".into(), "a".into()],
        };
        assert!(LabelMap::from_params(params).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let map = LabelEncoder::new()
            .fit(&Column::from(vec!["leaf", "raspberry"]))
            .unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        map.save_to_file(file.path()).unwrap();
        assert_eq!(LabelMap::load_from_file(file.path()).unwrap(), map);
    }
}
