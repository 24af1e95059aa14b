//! Integration tests for the windowed load engine
//!
//! Exercises the public API end to end: CSV input, window planning, the
//! multi-threaded computation, and the output formats.

use cpuload::csv_output::CsvLoadOutput;
use cpuload::interval_input::IntervalSet;
use cpuload::json_output::JsonLoadReport;
use cpuload::load::{
    compute, compute_columns, CapPolicy, EngineConfig, Interval, LoadEngine, LoadMatrix,
    TraceParameters, ValidationError,
};
use cpuload::summary::LoadSummary;
use cpuload::window_plan::WindowPlan;

/// Eight CPUs, each busy for the first half of every 1ms period, over 100ms
fn half_busy_trace() -> Vec<Interval> {
    let mut intervals = Vec::new();
    for cpu in 0..8 {
        for period in 0..100 {
            let start = period * 1_000_000;
            intervals.push(Interval::new(start, start + 500_000, cpu));
        }
    }
    intervals
}

#[test]
fn test_half_busy_trace_is_fifty_percent_everywhere() {
    // 10ms windows, 5ms step: every window holds ten whole periods
    let m = compute(
        &half_busy_trace(),
        TraceParameters::new(100_000_000, 10_000_000, 5_000_000),
    )
    .unwrap();

    assert_eq!(m.num_cpus(), 8);
    assert_eq!(m.num_windows(), 19);
    for row in m.cpu_rows() {
        assert!(row.iter().all(|&v| v == 50.0), "row: {:?}", row);
    }
    assert!(m.overall().iter().all(|&v| v == 50.0));
}

#[test]
fn test_row_layout_cpu_overall_timestamp() {
    let m = compute_columns(
        &[0, 0],
        &[100, 100],
        &[0, 2],
        TraceParameters::new(300, 100, 100),
    )
    .unwrap();

    let rows = m.clone().into_rows();
    assert_eq!(rows.len(), 3 + 2);
    assert_eq!(rows[0], vec![100.0, 0.0, 0.0]);
    assert_eq!(rows[1], vec![0.0, 0.0, 0.0]);
    assert_eq!(rows[2], vec![100.0, 0.0, 0.0]);
    // overall: 200ns of 300ns capacity in window 0
    assert_eq!(rows[3][1], 0.0);
    assert!((rows[3][0] - 200.0 / 3.0).abs() < 1e-12);
    assert_eq!(rows[4], vec![0.0, 100.0, 200.0]);
}

#[test]
fn test_overlapping_windows_count_interval_twice() {
    // size 100, step 50: [60, 90) lies in windows [0,100) and [50,150)
    let m = compute(
        &[Interval::new(60, 90, 0)],
        TraceParameters::new(200, 100, 50),
    )
    .unwrap();
    assert_eq!(m.cpu_row(0).unwrap(), &[30.0, 30.0, 0.0]);
}

#[test]
fn test_validation_never_returns_partial_matrix() {
    let cases: Vec<(Vec<i64>, Vec<i64>, Vec<i64>, TraceParameters)> = vec![
        (vec![0], vec![1, 2], vec![0], TraceParameters::new(10, 5, 5)),
        (vec![0], vec![1], vec![33], TraceParameters::new(10, 5, 5)),
        (vec![0], vec![1], vec![0], TraceParameters::new(10, 5, 0)),
        (vec![0], vec![1], vec![0], TraceParameters::new(10, -5, 5)),
        (vec![0], vec![1], vec![0], TraceParameters::new(-10, 5, 5)),
        (vec![], vec![], vec![], TraceParameters::new(10, 5, 5)),
    ];

    for (starts, ends, cpus, params) in cases {
        let result = compute_columns(&starts, &ends, &cpus, params);
        assert!(result.is_err(), "expected rejection for {:?}", params);
    }
}

#[test]
fn test_cpu_id_limit_is_inclusive() {
    let ok = compute(&[Interval::new(0, 5, 32)], TraceParameters::new(10, 10, 10)).unwrap();
    assert_eq!(ok.num_cpus(), 33);

    let err = compute(&[Interval::new(0, 5, 33)], TraceParameters::new(10, 10, 10));
    assert_eq!(err, Err(ValidationError::CpuIdTooLarge { cpu_id: 33, max: 32 }));
}

#[test]
fn test_capacity_cap_with_double_booked_cpus() {
    let intervals = vec![
        Interval::new(0, 1_000, 0),
        Interval::new(0, 1_000, 0),
        Interval::new(0, 1_000, 1),
        Interval::new(500, 1_000, 1),
    ];
    let params = TraceParameters::new(1_000, 1_000, 1_000);

    let raw = compute(&intervals, params).unwrap();
    assert_eq!(raw.cpu_row(0).unwrap(), &[200.0]);
    assert_eq!(raw.cpu_row(1).unwrap(), &[150.0]);
    assert_eq!(raw.overall(), &[100.0]);

    let capped = LoadEngine::new(EngineConfig::per_cpu_capped())
        .unwrap()
        .compute(&intervals, params)
        .unwrap();
    assert_eq!(capped.cpu_row(0).unwrap(), &[100.0]);
    assert_eq!(capped.cpu_row(1).unwrap(), &[100.0]);
    assert_eq!(capped.overall(), &[100.0]);
}

#[test]
fn test_csv_to_matrix_pipeline() {
    let csv = "ts_ns,ts_end_ns,ucpu\n0,110,0\n88,180,1\n112,200,2\n150,180,3\n";
    let set = IntervalSet::read_csv(csv.as_bytes()).unwrap();
    let duration = set.trace_duration_ns().unwrap();
    assert_eq!(duration, 200);

    let m: LoadMatrix = set
        .compute(&LoadEngine::default(), TraceParameters::new(duration, 100, 10))
        .unwrap();
    assert_eq!(m.num_windows(), 11);
    assert_eq!(m.overall()[10], 52.0);

    let overall_csv = CsvLoadOutput::new(&m).overall_csv();
    assert!(overall_csv.ends_with("100,52\n"));
}

#[test]
fn test_dynamic_plan_feeds_engine() {
    let intervals = half_busy_trace();
    let duration = intervals.iter().map(|iv| iv.end_ns).max().unwrap();

    let resolved = WindowPlan::default().resolve(duration).unwrap();
    assert!(resolved.dynamic);

    let m = compute(&intervals, resolved.params).unwrap();
    assert_eq!(m.num_windows(), resolved.num_windows);
    assert!(m.overall().iter().all(|&v| (0.0..=100.0).contains(&v)));
}

#[test]
fn test_json_report_matches_matrix() {
    let m = compute(&half_busy_trace(), TraceParameters::new(100_000_000, 50_000_000, 50_000_000))
        .unwrap();
    let report = JsonLoadReport::from_matrix(&m, CapPolicy::AggregateOnly)
        .with_summary(LoadSummary::from_matrix(&m));

    assert_eq!(report.per_cpu.len(), 8);
    assert_eq!(report.timestamps_ns, vec![0, 50_000_000]);
    let summary = report.summary.unwrap();
    assert_eq!(summary.overall.mean, 50.0);
    assert!(summary.over_capacity_cpus().is_empty());
}
