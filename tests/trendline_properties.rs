//! Behavioural checks for the least-squares trendline.

use deliverydash::trendline::{fit_line, trendline, TrendlineError};

const EPS: f64 = 1e-9;

#[test]
fn recovers_slope_and_intercept_of_exact_line() {
    let x = [-3.0, -1.0, 0.0, 2.5, 7.0, 11.0];
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
    let fit = fit_line(&x, &y).unwrap();
    assert!((fit.slope - 2.0).abs() < EPS);
    assert!((fit.intercept - 1.0).abs() < EPS);
}

#[test]
fn doubling_series_gives_documented_endpoints() {
    let line = trendline(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
    assert!((line.fit.slope - 2.0).abs() < EPS);
    assert!(line.fit.intercept.abs() < EPS);
    assert_eq!(line.start.x, 1.0);
    assert!((line.start.y - 2.0).abs() < EPS);
    assert_eq!(line.end.x, 4.0);
    assert!((line.end.y - 8.0).abs() < EPS);
}

#[test]
fn repeated_fits_are_identical() {
    let x: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin() * 1000.0).collect();
    let y: Vec<f64> = x.iter().enumerate().map(|(i, v)| v * 0.01 + (i % 7) as f64).collect();
    let a = trendline(&x, &y).unwrap();
    let b = trendline(&x, &y).unwrap();
    assert_eq!(a, b);
}

#[test]
fn noisy_data_matches_least_squares_reference() {
    // Reference values from the normal equations worked by hand.
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y = [2.0, 4.0, 5.0, 4.0, 5.0];
    let fit = fit_line(&x, &y).unwrap();
    assert!((fit.slope - 0.6).abs() < EPS);
    assert!((fit.intercept - 2.2).abs() < EPS);
}

#[test]
fn error_taxonomy() {
    assert!(matches!(
        trendline(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]),
        Err(TrendlineError::DegenerateInput(_))
    ));
    assert_eq!(trendline(&[], &[]), Err(TrendlineError::EmptyInput));
    assert_eq!(
        trendline(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
        Err(TrendlineError::LengthMismatch { x_len: 3, y_len: 2 })
    );
}

#[test]
fn errors_render_readable_messages() {
    let msg = TrendlineError::LengthMismatch { x_len: 3, y_len: 2 }.to_string();
    assert!(msg.contains('3') && msg.contains('2'));
    let err: anyhow::Error = TrendlineError::EmptyInput.into();
    assert_eq!(err.to_string(), "trendline input is empty");
}

#[test]
fn identical_x_values_are_degenerate_despite_rounding() {
    let y: Vec<f64> = (0..7).map(|i| i as f64).collect();
    assert!(matches!(
        trendline(&[1.1; 7], &y),
        Err(TrendlineError::DegenerateInput(_))
    ));

    for (value, n) in [(5.0, 3), (0.3, 10), (3.3, 10), (123.456, 9), (1.1, 7)] {
        let x = vec![value; n];
        let y: Vec<f64> = (0..n).map(|i| i as f64).collect();
        assert!(
            matches!(fit_line(&x, &y), Err(TrendlineError::DegenerateInput(_))),
            "x = [{value}; {n}] should be degenerate"
        );
    }
}
