//! End-to-end behaviour of the classifier, the fitter, and the detect pipeline.

use approx::assert_relative_eq;
use margin_curve::app::pipeline::run_detect;
use margin_curve::data::{SynthConfig, generate_preparation};
use margin_curve::domain::RunConfig;
use margin_curve::error::InputKind;
use margin_curve::io::{curve_file, read_curve_json, write_curve_json, write_points_csv};
use margin_curve::math::linspace;
use margin_curve::{MarginError, MarginParams, classify, fit, run_pipeline};
use nalgebra::Point3;

// =============================================================================
// Fitting scenarios
// =============================================================================

#[test]
fn parabola_coefficients_are_recovered() {
    let points: Vec<Point3<f64>> = linspace(-1.0, 1.0, 200)
        .into_iter()
        .map(|x| Point3::new(x, x * x, 0.0))
        .collect();

    let model = fit(&points, 2).unwrap();
    for (got, want) in model.coefficients.iter().zip([1.0, 0.0, 0.0]) {
        assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
    }
}

#[test]
fn degree_many_points_is_one_short() {
    let points: Vec<Point3<f64>> = (0..5).map(|i| Point3::new(i as f64, 1.0, 0.0)).collect();
    assert_eq!(
        fit(&points, 5).unwrap_err(),
        MarginError::InsufficientInput {
            kind: InputKind::EdgeCandidates,
            required: 6,
            actual: 5,
        }
    );
}

#[test]
fn identical_x_coordinates_are_degenerate() {
    let points: Vec<Point3<f64>> = (0..12)
        .map(|i| Point3::new(-2.5, i as f64 * 0.3, i as f64))
        .collect();
    assert!(matches!(
        fit(&points, 5),
        Err(MarginError::DegenerateFit { degree: 5, .. })
    ));
}

#[test]
fn fitting_twice_gives_the_same_coefficients() {
    let points: Vec<Point3<f64>> = linspace(-3.0, 4.0, 80)
        .into_iter()
        .map(|x| Point3::new(x, (0.7 * x).sin() * 2.0, 0.1 * x))
        .collect();
    let a = fit(&points, 5).unwrap();
    let b = fit(&points, 5).unwrap();
    for (x, y) in a.coefficients.iter().zip(b.coefficients.iter()) {
        assert_relative_eq!(*x, *y, max_relative = 1e-9);
    }
}

// =============================================================================
// Classification scenarios
// =============================================================================

#[test]
fn k_coincident_points_are_all_edge_candidates() {
    let points = vec![Point3::new(3.0, -1.0, 7.5); 10];
    for threshold in [1e-15, 0.01, 100.0] {
        let edges = classify(&points, 10, threshold).unwrap();
        assert_eq!(edges.len(), 10);
    }
}

#[test]
fn exact_grid_with_repeated_coordinates_is_classified() {
    // 20 x 20 grid on z = 0: far more shared coordinate values than a k-d tree
    // bucket holds.
    let points: Vec<Point3<f64>> = (0..20)
        .flat_map(|i| (0..20).map(move |j| Point3::new(i as f64 * 0.1, j as f64 * 0.1, 0.0)))
        .collect();
    let edges = classify(&points, 10, 1e-6).unwrap();
    assert_eq!(edges.len(), points.len());
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn synthetic_preparation_yields_a_margin_curve() {
    let points = generate_preparation(&SynthConfig {
        count: 3000,
        seed: 11,
        noise: 0.01,
    })
    .unwrap();

    let output = run_pipeline(&points, &MarginParams::default()).unwrap();
    assert!(!output.edges.is_empty());
    assert!(output.edges.len() <= points.len());
    assert_eq!(output.fit.model.degree, 5);
    assert_eq!(output.fit.model.coefficients.len(), 6);
    assert!(output.fit.x_min < output.fit.x_max);
    assert!(output.fit.quality.rmse.is_finite());
    assert_eq!(output.stats.n_points, 3000);
}

#[test]
fn detect_run_from_csv_exports_a_readable_curve() {
    let dir = tempfile::tempdir().unwrap();
    let cloud_path = dir.path().join("prep.csv");
    let curve_path = dir.path().join("curve.json");

    let points = generate_preparation(&SynthConfig {
        count: 2000,
        seed: 3,
        noise: 0.01,
    })
    .unwrap();
    write_points_csv(&cloud_path, &points).unwrap();

    let config = RunConfig {
        input: cloud_path,
        params: MarginParams::default(),
        grid_points: 500,
        export_edges: None,
        export_curve: Some(curve_path.clone()),
    };
    let run = run_detect(&config).unwrap();
    assert_eq!(run.cloud.points.len(), 2000);
    assert!(run.cloud.row_errors.is_empty());

    let curve = curve_file(&run.output, &config.params, config.grid_points);
    write_curve_json(&curve_path, &curve).unwrap();
    let loaded = read_curve_json(&curve_path).unwrap();

    assert_eq!(loaded.grid.x.len(), 500);
    assert_eq!(loaded.n_edges, run.output.edges.len());
    let mid = loaded.grid.x[250];
    assert_relative_eq!(
        loaded.fit.model.evaluate(mid),
        run.output.fit.model.evaluate(mid),
        max_relative = 1e-9
    );
}

#[test]
fn missing_input_file_is_an_io_error() {
    let config = RunConfig {
        input: "/nonexistent/cloud.csv".into(),
        params: MarginParams::default(),
        grid_points: 500,
        export_edges: None,
        export_curve: None,
    };
    assert_eq!(run_detect(&config).unwrap_err().exit_code(), 2);
}
