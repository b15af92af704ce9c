//! End-to-end pipeline scenarios over in-memory inputs.

use metastacker_core::pipeline::SUCCESS_PATH;
use metastacker_core::{
    run_pipeline, EventLog, InMemorySource, MetricsRecord, PipelineError, RawTable, RunStatus,
    Stage,
};
use serde_json::{json, Value};

// ── Helpers ──────────────────────────────────────────────────────────

fn config(window: i64) -> Value {
    json!({"seed": 42, "window": window, "version": "v1"})
}

fn ohlcv_table(closes: &[f64]) -> RawTable {
    let headers = [
        "timestamp",
        "open",
        "high",
        "low",
        "close",
        "volume_btc",
        "volume_usd",
    ];
    let records = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            vec![
                format!("2024-01-01 00:{i:02}:00"),
                format!("{close}"),
                format!("{}", close + 1.0),
                format!("{}", close - 1.0),
                format!("{close}"),
                "1.0".to_string(),
                format!("{close}"),
            ]
        })
        .collect();
    RawTable::new(headers.iter().map(|h| h.to_string()).collect(), records)
}

fn run_with(config: Value, table: RawTable) -> (metastacker_core::PipelineRun, EventLog) {
    let mut log = EventLog::new();
    let run = run_pipeline(&InMemorySource::new(config, table), &mut log);
    (run, log)
}

fn success(record: &MetricsRecord) -> &metastacker_core::metrics::SuccessRecord {
    match record {
        MetricsRecord::Success(r) => r,
        MetricsRecord::Error(e) => panic!("expected success, got error: {}", e.error_message),
    }
}

fn error_message(record: &MetricsRecord) -> &str {
    match record {
        MetricsRecord::Error(e) => &e.error_message,
        MetricsRecord::Success(_) => panic!("expected error record"),
    }
}

// ── Success scenarios ────────────────────────────────────────────────

#[test]
fn ten_rising_closes_window_five() {
    let closes: Vec<f64> = (1..=10).map(f64::from).collect();
    let (run, _) = run_with(config(5), ohlcv_table(&closes));

    let record = success(&run.record);
    assert_eq!(record.rows_processed, 10);
    assert_eq!(record.metric, "signal_rate");
    assert_eq!(record.value, 0.6);
    assert_eq!(record.seed.as_i64(), Some(42));
    assert_eq!(record.version, "v1");
    assert_eq!(record.status, RunStatus::Success);
    assert_eq!(run.exit_code(), 0);
    assert_eq!(run.stages, SUCCESS_PATH.to_vec());
}

#[test]
fn window_one_yields_zero_rate() {
    let closes = [5.0, 3.0, 8.0, 13.0, 2.0, 21.0];
    let (run, _) = run_with(config(1), ohlcv_table(&closes));
    assert_eq!(success(&run.record).value, 0.0);
}

#[test]
fn window_longer_than_data_is_success_with_zero_rate() {
    let closes = [1.0, 2.0, 3.0];
    let (run, log) = run_with(config(50), ohlcv_table(&closes));

    let record = success(&run.record);
    assert_eq!(record.value, 0.0);
    assert_eq!(record.rows_processed, 3);
    assert_eq!(run.final_stage(), Stage::Done);
    assert!(log.messages().any(|m| m.contains("every signal is hold")));
}

#[test]
fn flat_closes_never_buy() {
    for price in [0.7, 1.1, 1.7, 2.675, 33.33] {
        let closes = [price; 10];
        for window in 1..=10 {
            let (run, _) = run_with(config(window), ohlcv_table(&closes));
            assert_eq!(
                success(&run.record).value,
                0.0,
                "price={price} window={window}"
            );
        }
    }
}

#[test]
fn plateau_after_rise_holds_once_window_is_flat() {
    let closes = [1.0, 2.0, 3.0, 33.33, 33.33, 33.33, 33.33, 33.33];
    let (run, _) = run_with(config(3), ohlcv_table(&closes));
    // Indices 2..=4 sit above a rising mean; from index 5 the window is flat.
    assert_eq!(success(&run.record).value, 0.375);
}

#[test]
fn large_seed_is_carried_into_the_record() {
    let (run, log) = run_with(
        json!({"seed": u64::MAX, "window": 2, "version": "v1"}),
        ohlcv_table(&[1.0, 2.0, 3.0]),
    );
    let json: Value = serde_json::to_value(&run.record).unwrap();
    assert_eq!(json["seed"], json!(u64::MAX));
    assert_eq!(json["status"], "success");
    assert!(log
        .messages()
        .any(|m| m == "Config loaded: seed=18446744073709551615, window=2, version=v1"));
}

#[test]
fn seed_does_not_change_the_result() {
    let closes = [3.0, 4.0, 2.0, 6.0, 7.0, 1.0, 9.0];
    let (a, _) = run_with(
        json!({"seed": 1, "window": 3, "version": "v1"}),
        ohlcv_table(&closes),
    );
    let (b, _) = run_with(
        json!({"seed": 999_999, "window": 3, "version": "v1"}),
        ohlcv_table(&closes),
    );
    assert_eq!(success(&a.record).value, success(&b.record).value);
    assert_eq!(success(&b.record).seed.as_i64(), Some(999_999));
}

#[test]
fn success_log_covers_every_stage_in_order() {
    let closes: Vec<f64> = (1..=10).map(f64::from).collect();
    let (_, log) = run_with(config(5), ohlcv_table(&closes));

    let messages: Vec<&str> = log
        .events()
        .iter()
        .filter(|e| e.level <= tracing::Level::INFO)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Job started",
            "Config loaded: seed=42, window=5, version=v1",
            "Data loaded: 10 rows",
            "Rolling mean calculated with window=5",
            "Signals generated",
            "Metrics: signal_rate=0.6000, rows_processed=10",
        ]
    );
}

// ── Error scenarios ──────────────────────────────────────────────────

#[test]
fn missing_close_column_is_error_record() {
    let table = RawTable::from_rows(&["timestamp", "open"], &[&["t0", "1.0"]]);
    let (run, log) = run_with(config(5), table);

    assert_eq!(run.exit_code(), 1);
    assert!(error_message(&run.record).contains("'close'"));
    assert_eq!(run.failed_after(), Some(Stage::ConfigLoaded));

    let json: Value = serde_json::to_value(&run.record).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json.get("rows_processed").is_none());
    assert!(json.get("value").is_none());
    assert!(log.messages().any(|m| m.starts_with("Data error: ")));
}

#[test]
fn empty_input_message_differs_from_missing_column() {
    let (empty, _) = run_with(config(5), ohlcv_table(&[]));
    let (no_close, _) = run_with(
        config(5),
        RawTable::from_rows(&["open"], &[&["1.0"]]),
    );

    assert_eq!(error_message(&empty.record), "Input CSV file is empty");
    assert_ne!(
        error_message(&empty.record),
        error_message(&no_close.record)
    );
}

#[test]
fn non_numeric_close_rejects_the_whole_dataset() {
    let table = RawTable::from_rows(&["close"], &[&["1"], &["2"], &["oops"], &["4"]]);
    let (run, _) = run_with(config(2), table);
    assert_eq!(
        error_message(&run.record),
        "Non-numeric value 'oops' in column 'close' at row 3"
    );
    assert!(matches!(run.error, Some(PipelineError::Data(_))));
}

#[test]
fn config_failure_uses_default_version_and_skips_data() {
    let closes = [1.0, 2.0];
    let (run, log) = run_with(json!({"seed": 1, "window": 0, "version": "v3"}), ohlcv_table(&closes));

    assert_eq!(run.record.version(), "v1");
    assert_eq!(run.stages, vec![Stage::Start, Stage::Error]);
    assert!(matches!(run.error, Some(PipelineError::Config(_))));
    assert!(!log.messages().any(|m| m.starts_with("Data loaded")));
}

#[test]
fn data_failure_keeps_loaded_version() {
    let (run, _) = run_with(
        json!({"seed": 1, "window": 2, "version": "release-7"}),
        ohlcv_table(&[]),
    );
    assert_eq!(run.record.version(), "release-7");
}

#[test]
fn missing_config_keys_are_listed() {
    let (run, log) = run_with(json!({"window": 3}), ohlcv_table(&[1.0]));
    assert_eq!(
        error_message(&run.record),
        "Missing required configuration keys: [seed, version]"
    );
    assert!(log
        .messages()
        .any(|m| m == "Config error: Missing required configuration keys: [seed, version]"));
}

// ── Idempotence ──────────────────────────────────────────────────────

#[test]
fn identical_inputs_give_identical_records_modulo_latency() {
    let closes = [10.0, 10.5, 10.2, 10.9, 11.4, 11.1, 11.8, 12.0, 11.7, 12.3];
    let (a, _) = run_with(config(3), ohlcv_table(&closes));
    let (b, _) = run_with(config(3), ohlcv_table(&closes));

    let (ra, rb) = (success(&a.record), success(&b.record));
    assert_eq!(ra.rows_processed, rb.rows_processed);
    assert_eq!(ra.metric, rb.metric);
    assert_eq!(ra.value, rb.value);
    assert_eq!(ra.seed, rb.seed);
    assert_eq!(ra.version, rb.version);
    assert_eq!(ra.status, rb.status);
}
