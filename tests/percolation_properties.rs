use percolation::config::{Params, Sampling};
use percolation::{Percolation, PercolationError, PercolationStats};

fn snapshot(p: &Percolation) -> (usize, bool, Vec<bool>, Vec<bool>) {
    let n = p.size();
    let mut open = Vec::new();
    let mut full = Vec::new();
    for row in 1..=n {
        for col in 1..=n {
            open.push(p.is_open(row, col).unwrap());
            full.push(p.is_full(row, col).unwrap());
        }
    }
    (p.number_of_open_sites(), p.percolates(), open, full)
}

#[test]
fn fresh_grid_is_empty_and_blocked() {
    for n in [1, 2, 5, 17] {
        let p = Percolation::new(n).unwrap();
        assert_eq!(p.number_of_open_sites(), 0);
        assert!(!p.percolates());
        assert!(!p.is_open(1, 1).unwrap());
        assert!(!p.is_full(n, n).unwrap());
    }
}

#[test]
fn opening_twice_equals_opening_once() {
    let mut once = Percolation::new(4).unwrap();
    let mut twice = Percolation::new(4).unwrap();
    for &(r, c) in &[(1, 2), (2, 2), (4, 4)] {
        once.open(r, c).unwrap();
        twice.open(r, c).unwrap();
        twice.open(r, c).unwrap();
    }
    assert_eq!(snapshot(&once), snapshot(&twice));
}

#[test]
fn open_count_never_decreases() {
    let mut p = Percolation::new(5).unwrap();
    let mut last = 0;
    for i in 0..40 {
        let r = i % 5 + 1;
        let c = (i * 3) % 5 + 1;
        p.open(r, c).unwrap();
        let now = p.number_of_open_sites();
        assert!(now >= last);
        last = now;
    }
}

#[test]
fn bottom_row_does_not_backwash() {
    let mut p = Percolation::new(2).unwrap();
    p.open(2, 1).unwrap();
    p.open(2, 2).unwrap();
    assert!(!p.percolates());
    assert!(!p.is_full(2, 2).unwrap());

    p.open(1, 1).unwrap();
    assert!(p.percolates());
    assert!(p.is_full(2, 1).unwrap());
    assert!(p.is_full(2, 2).unwrap());
}

#[test]
fn isolated_bottom_site_stays_empty_after_percolation() {
    // Column 1 percolates; (3, 3) touches only the bottom.
    let mut p = Percolation::new(3).unwrap();
    for row in 1..=3 {
        p.open(row, 1).unwrap();
    }
    p.open(3, 3).unwrap();
    assert!(p.percolates());
    assert!(p.is_open(3, 3).unwrap());
    assert!(!p.is_full(3, 3).unwrap());
    assert!(p.is_full(3, 1).unwrap());
}

#[test]
fn what_if_query_leaves_state_untouched() {
    let mut p = Percolation::new(4).unwrap();
    p.open(1, 1).unwrap();
    p.open(2, 1).unwrap();
    p.open(4, 1).unwrap();
    let before = snapshot(&p);

    for _ in 0..3 {
        for row in 1..=4 {
            for col in 1..=4 {
                let _ = p.would_percolate_if_opened(row, col).unwrap();
            }
        }
    }
    assert!(p.would_percolate_if_opened(3, 1).unwrap());
    assert_eq!(snapshot(&p), before);

    p.open(3, 1).unwrap();
    assert!(p.percolates());
}

#[test]
fn what_if_on_single_site_grid() {
    let mut p = Percolation::new(1).unwrap();
    assert!(p.would_percolate_if_opened(1, 1).unwrap());
    assert!(!p.percolates());
    p.open(1, 1).unwrap();
    assert!(p.percolates());
    assert!(p.is_full(1, 1).unwrap());
}

#[test]
fn what_if_is_false_for_open_sites() {
    let mut p = Percolation::new(1).unwrap();
    p.open(1, 1).unwrap();
    assert!(!p.would_percolate_if_opened(1, 1).unwrap());

    let mut q = Percolation::new(3).unwrap();
    q.open(2, 2).unwrap();
    assert!(!q.would_percolate_if_opened(2, 2).unwrap());
}

#[test]
fn out_of_range_coordinates_are_rejected() {
    for n in [1, 3, 8] {
        let mut p = Percolation::new(n).unwrap();
        for &(r, c) in &[(0, 1), (1, 0), (n + 1, 1), (1, n + 1), (0, 0)] {
            assert!(matches!(p.open(r, c), Err(PercolationError::OutOfRange { .. })));
            assert!(matches!(p.is_open(r, c), Err(PercolationError::OutOfRange { .. })));
            assert!(matches!(p.is_full(r, c), Err(PercolationError::OutOfRange { .. })));
            assert!(matches!(
                p.would_percolate_if_opened(r, c),
                Err(PercolationError::OutOfRange { .. })
            ));
        }
        assert_eq!(p.number_of_open_sites(), 0);
    }
}

#[test]
fn zero_size_grid_is_rejected() {
    assert!(matches!(
        Percolation::new(0),
        Err(PercolationError::InvalidGridSize { n: 0 })
    ));
}

#[test]
fn single_site_threshold_is_exactly_one() {
    let mut stats = PercolationStats::new(1, 100).unwrap();
    stats.run_experiments().unwrap();
    assert_eq!(stats.thresholds().len(), 100);
    assert!(stats.thresholds().iter().all(|&t| t == 1.0));
    assert_eq!(stats.mean(), 1.0);
    assert_eq!(stats.stddev(), 0.0);
}

#[test]
fn threshold_statistics_are_sane() {
    for sampling in [Sampling::Rejection, Sampling::BlockedSet] {
        for parallel in [true, false] {
            let params = Params {
                grid_size: 20,
                trials: 40,
                seed: 7,
                sampling,
                parallel,
            };
            let mut stats = PercolationStats::with_params(&params).unwrap();
            stats.run_experiments().unwrap();

            let mean = stats.mean();
            assert!(mean > 0.0 && mean < 1.0, "mean {mean}");
            let (lo, hi) = stats.confidence95();
            assert!(lo <= mean && mean <= hi);
            assert!(stats.stddev() > 0.0);
        }
    }
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let base = Params {
        grid_size: 12,
        trials: 32,
        seed: 99,
        ..Params::default()
    };
    let mut par = PercolationStats::with_params(&Params { parallel: true, ..base.clone() }).unwrap();
    let mut seq = PercolationStats::with_params(&Params { parallel: false, ..base }).unwrap();
    par.run_experiments().unwrap();
    seq.run_experiments().unwrap();
    assert_eq!(par.thresholds(), seq.thresholds());
}

#[test]
fn estimate_reports_timings_and_json_summary() {
    let params = Params {
        grid_size: 10,
        trials: 30,
        ..Params::default()
    };
    let (stats, timings) = percolation::estimate(&params).unwrap();
    assert_eq!(timings.last().map(|t| t.name), Some("TOTAL"));

    let json = serde_json::to_value(stats.summary()).unwrap();
    assert_eq!(json["n"], 10);
    assert_eq!(json["trials"], 30);
    assert!(json["mean"].as_f64().unwrap() > 0.0);
    assert!(json["confidence_lo"].as_f64().unwrap() <= json["confidence_hi"].as_f64().unwrap());
}
