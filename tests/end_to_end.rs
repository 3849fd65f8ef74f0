use logistic_trainer::backend::{CpuBackend, Tensor1D, Tensor2D};
use logistic_trainer::config::PipelineConfig;
use logistic_trainer::dataset::{read_csv, Table};
use logistic_trainer::export::ExportedModel;
use logistic_trainer::metrics::accuracy;
use logistic_trainer::preprocessing::{
    preprocess_data, FittedTransformer, PreprocessingError, StandardScaler, Transformer,
};
use logistic_trainer::trainer::train_logistic_regression;
use logistic_trainer::validation::{find_regularization_param, lambda_candidates};
use logistic_trainer::Error;
use std::io::Write;

type B = CpuBackend;

/// Two color clusters, "leaf" dark and "ripe" bright, with an ambient column.
fn write_colors_csv(path: &std::path::Path) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "red,green,blue,ambient,label").unwrap();
    for i in 0..30 {
        let jitter = ((i * 7) % 11) as f64;
        if i % 2 == 0 {
            let (red, green, blue) = (40.0 + jitter, 90.0 - jitter, 30.0);
            writeln!(file, "{red},{green},{blue},{},leaf", 5.0 + jitter).unwrap();
        } else {
            let (red, green, blue) = (160.0 - jitter, 40.0 + jitter, 50.0);
            writeln!(file, "{red},{green},{blue},{},ripe", 5.0 + jitter).unwrap();
        }
    }
}

#[test]
fn test_csv_to_export_pipeline() {
    let tmp = tempfile::tempdir().unwrap();
    let csv_path = tmp.path().join("colors.csv");
    write_colors_csv(&csv_path);

    let table = read_csv(&csv_path, Some(&["red", "green", "blue", "label"][..])).unwrap();
    let config = PipelineConfig::default();
    let data = preprocess_data::<B>(&table, &config.label, config.train_size, config.seed).unwrap();
    assert_eq!(data.x_train.rows(), 21);
    assert_eq!(data.x_test.rows(), 9);
    assert_eq!(data.feature_names, vec!["red", "green", "blue"]);
    assert_eq!(data.label_map.label(0), Some("leaf"));
    assert_eq!(data.label_map.label(1), Some("ripe"));

    let scaler = data.fit_scaler().unwrap();
    let x_train = scaler.transform(&data.x_train).unwrap();
    let x_test = scaler.transform(&data.x_test).unwrap();

    let outcome = config.train.trainer::<B>(0.0).fit(&x_train, &data.y_train).unwrap();
    assert_eq!(accuracy(&data.y_train, &outcome.model.classify(&x_train)), 1.0);
    assert_eq!(accuracy(&data.y_test, &outcome.model.classify(&x_test)), 1.0);

    let exported = ExportedModel::from_fitted(&outcome.model, &scaler).unwrap();
    let text = exported.to_text("ColorSensor::logistic_regression");
    let parsed = ExportedModel::parse_text("ColorSensor::logistic_regression", &text).unwrap();
    assert_eq!(parsed.n_features(), 3);

    // Classifying raw rows with the parsed block reproduces the model.
    let raw_test = data.x_test.to_rows();
    let predicted: Vec<f64> = raw_test
        .iter()
        .map(|row| {
            let z: f64 = row
                .iter()
                .enumerate()
                .map(|(j, v)| parsed.weights[j] * (v - parsed.mean[j]) / parsed.std[j])
                .sum::<f64>()
                + parsed.bias;
            if z > 0.0 {
                1.0
            } else {
                0.0
            }
        })
        .collect();
    assert_eq!(predicted, outcome.model.classify(&x_test).to_vec());
}

#[test]
fn test_pipeline_is_reproducible() {
    let tmp = tempfile::tempdir().unwrap();
    let csv_path = tmp.path().join("colors.csv");
    write_colors_csv(&csv_path);

    let run = || {
        let table = read_csv(&csv_path, None).unwrap();
        let data = preprocess_data::<B>(&table, "label", 0.7, Some(12)).unwrap();
        let scaler = data.fit_scaler().unwrap();
        let x = scaler.transform(&data.x_train).unwrap();
        let outcome = train_logistic_regression(&x, &data.y_train, 101, 0.5, 0).unwrap();
        (
            data.train_rows,
            ExportedModel::from_fitted(&outcome.model, &scaler).unwrap(),
            outcome.log,
        )
    };
    let (rows_a, export_a, log_a) = run();
    let (rows_b, export_b, log_b) = run();
    assert_eq!(rows_a, rows_b);
    assert_eq!(export_a, export_b);
    assert_eq!(log_a, log_b);
}

/// One informative feature plus an exact copy of it, with a few flipped labels.
fn redundant_column_data() -> (Tensor2D<B>, Tensor1D<B>) {
    let mut x = Vec::new();
    let mut y = Vec::new();
    for i in 0..40 {
        let v = ((i * 7) % 40) as f64 / 4.0 - 5.0;
        let mut label = if v > 0.0 { 1.0 } else { 0.0 };
        if i % 9 == 4 {
            label = 1.0 - label;
        }
        x.extend([v, v]);
        y.push(label);
    }
    let x = Tensor2D::<B>::new(x, 40, 2);
    let scaled = StandardScaler::<B>::new().fit_transform(&x).unwrap();
    (scaled, Tensor1D::new(y))
}

#[test]
fn test_search_prefers_penalty_on_redundant_columns() {
    let (x, y) = redundant_column_data();
    let result = find_regularization_param(&x, &y, 3).unwrap();

    assert_eq!(result.scores.len(), lambda_candidates(3).len());
    let unpenalized = &result.scores[0];
    assert_eq!(unpenalized.lambda, 0.0);
    assert!(result.best_lambda > 0.0);
    assert!(result.best_accuracy >= unpenalized.mean_accuracy);
    assert!(result
        .scores
        .iter()
        .all(|r| r.mean_accuracy <= result.best_accuracy));
}

#[test]
fn test_preprocessing_errors_surface_as_crate_errors() {
    let table = Table::new()
        .with_column("red", vec![1.0, 2.0, 3.0])
        .unwrap()
        .with_column("label", vec!["a", "b", "c"])
        .unwrap();
    let err: Error = preprocess_data::<B>(&table, "label", 0.7, Some(1))
        .unwrap_err()
        .into();
    assert!(matches!(
        err,
        Error::Preprocessing(PreprocessingError::NotBinary { .. })
    ));

    let constant = Table::new()
        .with_column("red", vec![1.0, 1.0, 1.0, 1.0])
        .unwrap()
        .with_column("label", vec!["a", "b", "a", "b"])
        .unwrap();
    let data = preprocess_data::<B>(&constant, "label", 1.0, Some(1)).unwrap();
    assert!(matches!(
        data.fit_scaler(),
        Err(PreprocessingError::ZeroVariance { ref name, .. }) if name == "red"
    ));
}

#[cfg(feature = "ndarray")]
#[test]
fn test_ndarray_backend_matches_cpu() {
    use logistic_trainer::backend::NdarrayBackend;

    let xs = vec![0.0, 1.0, 2.0, 3.0];
    let ys = vec![0.0, 0.0, 1.0, 1.0];
    let cpu = train_logistic_regression(
        &Tensor2D::<CpuBackend>::new(xs.clone(), 4, 1),
        &Tensor1D::<CpuBackend>::new(ys.clone()),
        200,
        0.5,
        0,
    )
    .unwrap();
    let nd = train_logistic_regression(
        &Tensor2D::<NdarrayBackend>::new(xs, 4, 1),
        &Tensor1D::<NdarrayBackend>::new(ys),
        200,
        0.5,
        0,
    )
    .unwrap();
    for (a, b) in cpu.log.losses().iter().zip(nd.log.losses()) {
        assert!((a - b).abs() < 1e-12);
    }
}
