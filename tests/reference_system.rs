//! Reference scenario: 11 dated observations (one with zero weight), seven
//! regressors and two constraints, giving a 9x9 augmented system. Expected
//! values were computed independently in exact rational arithmetic.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::NaiveDate;
use conreg::{
    Constraint, DataFrame, RegressionError, RegressionModel, RegressionOptions, RegressionSystem,
    SingularBlock, TableSource, regress, solve,
};
use nalgebra::{DMatrix, DVector};

const REGRESSORS: [&str; 7] = ["Level", "Momentum", "Value", "Size", "Energy", "Tech", "Utility"];

fn dates() -> Vec<NaiveDate> {
    (1..=11)
        .map(|day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap())
        .collect()
}

fn frame() -> DataFrame<NaiveDate, String> {
    let sectors = ['E', 'T', 'U', 'T', 'E', 'E', 'T', 'T', 'E', 'T', 'U'];
    let dummy = |s: char| -> Vec<f64> { sectors.iter().map(|&c| if c == s { 1.0 } else { 0.0 }).collect() };

    DataFrame::from_columns(
        dates(),
        [
            (
                "Return".to_string(),
                vec![
                    41.2031, 47.8850, 38.6412, 55.1207, 49.0000, 44.3318, 36.9051, 52.7764, 46.0135,
                    43.5529, 34.3132,
                ],
            ),
            (
                "Weight".to_string(),
                vec![1.0, 2.0, 3.0, 4.0, 0.0, 1.0, 2.0, 3.0, 1.0, 2.0, 1.0],
            ),
            (
                "Level".to_string(),
                vec![3.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            ),
            (
                "Momentum".to_string(),
                vec![2.0, -1.0, 3.0, 4.0, 2.0, 1.0, -2.0, 5.0, 0.0, 3.0, 4.0],
            ),
            (
                "Value".to_string(),
                vec![5.0, -3.0, 8.0, 2.0, 1.0, -6.0, 4.0, 1.0, 7.0, -2.0, 3.0],
            ),
            (
                "Size".to_string(),
                vec![
                    110.0, 85.0, -40.0, 150.0, 75.0, 61.0, -70.0, 95.0, 120.0, 48.0, 320.0,
                ],
            ),
            ("Energy".to_string(), dummy('E')),
            ("Tech".to_string(), dummy('T')),
            ("Utility".to_string(), dummy('U')),
        ],
    )
    .unwrap()
}

fn builder() -> conreg::ModelBuilder<String> {
    RegressionModel::builder("Return".to_string())
        .regressors(REGRESSORS.iter().map(|s| s.to_string()))
        .weight("Weight".to_string())
        .constraint(
            Constraint::new("momentum_value", 3.0)
                .term("Momentum".to_string(), 1.0)
                .term("Value".to_string(), 2.0),
        )
        .constraint(
            Constraint::new("sectors", 0.0)
                .term("Energy".to_string(), 1.0)
                .term("Tech".to_string(), 1.0)
                .term("Utility".to_string(), 1.0),
        )
}

fn model() -> RegressionModel<String> {
    builder().build().unwrap()
}

fn system() -> RegressionSystem<NaiveDate, String> {
    RegressionSystem::build(&model(), &frame(), &RegressionOptions::default()).unwrap()
}

#[test]
fn augmented_matrix_matches_reference() {
    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(9, 9, &[
          20.0,   33.5,   30.0,   1161.0,   2.5,   8.5,   2.0, 0.0, 0.0,
          33.5,  107.5,   56.5,   2712.0,   1.5,  15.5,   6.5, 1.0, 0.0,
          30.0,   56.5,  194.0,    623.5,   3.0,   4.5,  13.5, 2.0, 0.0,
        1161.0, 2712.0,  623.5, 141677.0, 145.5, 505.5, 100.0, 0.0, 0.0,
           2.5,    1.5,    3.0,    145.5,   1.5,   0.0,   0.0, 0.0, 1.0,
           8.5,   15.5,    4.5,    505.5,   0.0,   6.5,   0.0, 0.0, 1.0,
           2.0,    6.5,   13.5,    100.0,   0.0,   0.0,   2.0, 0.0, 1.0,
           0.0,    1.0,    2.0,      0.0,   0.0,   0.0,   0.0, 0.0, 0.0,
           0.0,    0.0,    0.0,      0.0,   1.0,   1.0,   1.0, 0.0, 0.0,
    ]);

    let system = system();
    let actual = system.augmented_matrix();
    assert_eq!(actual.shape(), (9, 9));
    assert_eq!(actual, &actual.transpose());
    assert_abs_diff_eq!(*actual, expected, epsilon = 1e-12);

    assert_abs_diff_eq!(actual[(0, 0)], 20.0, epsilon = 1e-12);
    assert_abs_diff_eq!(actual[(1, 3)], 2712.0, epsilon = 1e-12);
    assert_abs_diff_eq!(actual[(4, 8)], 1.0, epsilon = 1e-12);
}

#[test]
fn augmented_vector_matches_reference() {
    let expected = DVector::from_row_slice(&[
        610.0861, 1151.6329, 862.7308, 37184.9946, 65.7742, 317.749, 75.1184, 3.0, 0.0,
    ]);
    let system = system();
    let actual = system.augmented_vector();
    assert_eq!(actual.len(), 9);
    assert_abs_diff_eq!(actual[0], 610.0861, epsilon = 1e-4);
    assert_relative_eq!(*actual, expected, epsilon = 1e-9, max_relative = 1e-12);
}

#[test]
fn zero_weight_row_is_not_selected() {
    let system = system();
    let selection = system.selection();
    assert_eq!(selection.rows_scanned, 11);
    assert_eq!(selection.dropped_by_weight, 1);
    assert_eq!(selection.dropped_incomplete, 0);
    assert_eq!(system.observation_count(), 10);

    let skipped = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert!(!system.observation_rows().contains(&skipped));
}

#[test]
fn weight_vector_is_rescaled_to_selected_count() {
    let system = system();
    let w = system.weight_vector();
    let expected = DVector::from_row_slice(&[0.5, 1.0, 1.5, 2.0, 0.5, 1.0, 1.5, 0.5, 1.0, 0.5]);
    assert_abs_diff_eq!(w.sum(), 10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(*w, expected, epsilon = 1e-12);
}

#[test]
fn design_and_regressand_reproduce_source_cells() {
    let frame = frame();
    let system = system();
    let x = system.design_matrix();
    let y = system.regressand_vector();
    assert_eq!(x.shape(), (10, 7));

    for (i, row) in system.observation_rows().iter().enumerate() {
        for (j, key) in REGRESSORS.iter().enumerate() {
            assert_eq!(x[(i, j)], frame.value(row, &key.to_string()).unwrap());
        }
        assert_eq!(y[i], frame.value(row, &"Return".to_string()).unwrap());
    }
}

#[test]
fn solution_matches_reference_and_satisfies_constraints() {
    let result = solve(system()).unwrap();

    let expected = [
        22.42389633000586,
        1.926660364464865,
        0.5366698177675674,
        0.0094826460111325,
        -8.141907494219891,
        11.38870129007197,
        -3.24679379585208,
        -5.93024600297557,
        16.04759542169539,
    ];
    for (actual, expected) in result.solution().iter().zip(expected) {
        assert_relative_eq!(*actual, expected, max_relative = 1e-8);
    }

    assert_eq!(result.coefficients().len(), 7);
    assert_eq!(result.multipliers().len(), 2);
    assert_relative_eq!(
        result.coefficient(&"Size".to_string()).unwrap(),
        0.0094826460111325,
        max_relative = 1e-8
    );
    assert_relative_eq!(result.multiplier("sectors").unwrap(), 16.04759542169539, max_relative = 1e-8);

    let beta = result.coefficients();
    assert_abs_diff_eq!(beta[1] + 2.0 * beta[2], 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(beta[4] + beta[5] + beta[6], 0.0, epsilon = 1e-9);
    assert!(result.constraint_violation() < 1e-9);
}

#[test]
fn fitted_values_and_residuals_match_reference() {
    let result = regress(&model(), &frame(), &RegressionOptions::default()).unwrap();

    let first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let (row, fitted) = result.fitted_by_row().next().unwrap();
    assert_eq!(*row, first);
    assert_relative_eq!(fitted, 66.70954237478985, max_relative = 1e-8);
    assert_relative_eq!(result.residuals()[9], 2.784999831121652, max_relative = 1e-6);
    assert_relative_eq!(result.weighted_sse(), 1988.491931883039, max_relative = 1e-8);

    let y = result.system().regressand_vector();
    assert_abs_diff_eq!(result.fitted_values() + result.residuals(), y.clone(), epsilon = 1e-9);
}

#[test]
fn rerun_is_bit_identical() {
    let first = regress(&model(), &frame(), &RegressionOptions::default()).unwrap();
    let second = regress(&model(), &frame(), &RegressionOptions::default()).unwrap();
    assert_eq!(first.system().augmented_matrix(), second.system().augmented_matrix());
    assert_eq!(first.system().augmented_vector(), second.system().augmented_vector());
    assert_eq!(first.solution(), second.solution());
}

#[test]
fn chunked_accumulation_agrees_with_sequential() {
    let parallel = RegressionOptions {
        parallel_min_rows: 1,
        chunk_rows: 3,
        ..RegressionOptions::default()
    };
    let a = regress(&model(), &frame(), &RegressionOptions::sequential()).unwrap();
    let b = regress(&model(), &frame(), &parallel).unwrap();
    assert_eq!(b.system().augmented_matrix(), &b.system().augmented_matrix().transpose());
    assert_relative_eq!(*a.solution(), *b.solution(), max_relative = 1e-9);
}

#[test]
fn redundant_constraint_is_reported_singular() {
    let model = builder()
        .constraint(
            Constraint::new("momentum_value_scaled", 6.0)
                .term("Momentum".to_string(), 2.0)
                .term("Value".to_string(), 4.0),
        )
        .build()
        .unwrap();

    match regress(&model, &frame(), &RegressionOptions::default()) {
        Err(RegressionError::SingularSystem {
            dimension,
            regressors,
            constraints,
            block,
            ..
        }) => {
            assert_eq!((dimension, regressors, constraints), (10, 7, 3));
            assert_eq!(block, SingularBlock::Constraints);
        }
        other => panic!("expected a singular system, got {other:?}"),
    }
}
