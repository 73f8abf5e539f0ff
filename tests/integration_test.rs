//! Integration tests for the screening pipeline.
//!
//! Tests cover:
//! - Qualifying and non-qualifying symbols with a mock data port
//! - Empty results versus non-empty results
//! - Fetch failures: one warning per failing symbol, the rest still screened
//! - Short histories skipped without warnings
//! - Ranking order and stable ties
//! - CSV data adapter feeding the screener end to end

mod common;

use common::*;
use momentum_screener::adapters::csv_adapter::CsvAdapter;
use momentum_screener::adapters::csv_report_adapter::CsvReportAdapter;
use momentum_screener::adapters::table_report_adapter::{TableReportAdapter, NO_MATCHES};
use momentum_screener::domain::indicator::rsi::calculate_rsi;
use momentum_screener::domain::indicator::sma::calculate_sma;
use momentum_screener::domain::screener::{self, ScreenReport, ScreenerConfig, ScreeningResult};
use momentum_screener::ports::report_port::ReportPort;
use tempfile::TempDir;

mod indicators {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn qualifying_series_has_expected_readings() {
        let bars = bars_from_closes("A", &QUALIFYING_CLOSES);

        let rsi = calculate_rsi(&bars, 14);
        let sma = calculate_sma(&bars, 10);

        assert_relative_eq!(rsi.latest().unwrap(), 70.0, epsilon = 1e-9);
        assert_relative_eq!(sma.latest().unwrap(), 100.0, epsilon = 1e-9);
        assert_eq!(rsi.values.iter().filter(|p| p.is_valid()).count(), 6);
        assert_eq!(sma.values.iter().filter(|p| p.is_valid()).count(), 11);
    }

    #[test]
    fn choppy_series_sits_at_fifty() {
        let bars = choppy_bars("B", 20);
        assert_relative_eq!(calculate_rsi(&bars, 14).latest().unwrap(), 50.0, epsilon = 1e-9);
    }
}

mod screening {
    use super::*;

    #[test]
    fn qualifying_symbol_reported_with_score_80() {
        let port = MockDataPort::new()
            .with_bars("A", bars_from_closes("A", &QUALIFYING_CLOSES))
            .with_bars("B", choppy_bars("B", 20));

        let report = screener::run(&port, &symbols(&["A", "B"]), &screener_config());

        assert!(report.has_matches());
        assert_eq!(report.screened, 2);
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.results,
            vec![ScreeningResult {
                symbol: "A".into(),
                rsi: 70.0,
                sma: 100.0,
                close: 110.0,
                score: 80.0,
            }]
        );
    }

    #[test]
    fn nothing_qualifies_gives_empty_result_without_warnings() {
        let port = MockDataPort::new()
            .with_bars("B", choppy_bars("B", 20))
            .with_bars("C", choppy_bars("C", 25));

        let report = screener::run(&port, &symbols(&["B", "C"]), &screener_config());

        assert!(!report.has_matches());
        assert!(report.results.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn fetch_error_emits_exactly_one_warning() {
        let port = MockDataPort::new()
            .with_bars("A", bars_from_closes("A", &QUALIFYING_CLOSES))
            .with_error("C", "connection reset");

        let report = screener::run(&port, &symbols(&["C", "A"]), &screener_config());

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].symbol, "C");
        assert!(report.warnings[0].message.contains("connection reset"));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].symbol, "A");
        assert_eq!(port.request_count("C"), 1);
    }

    #[test]
    fn short_history_skipped_silently() {
        let port = MockDataPort::new()
            .with_bars("SHORT", generate_bars("SHORT", 19, 100.0))
            .with_bars("EMPTY", Vec::new());

        let report = screener::run(&port, &symbols(&["SHORT", "EMPTY"]), &screener_config());

        assert!(report.results.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].symbol, "SHORT");
        assert_eq!(report.skipped[0].bars, 19);
        assert_eq!(report.skipped[1].bars, 0);
    }

    #[test]
    fn exactly_min_bars_is_screened() {
        let port = MockDataPort::new().with_bars("UP", generate_bars("UP", 20, 100.0));
        let report = screener::run(&port, &symbols(&["UP"]), &screener_config());
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].score, 104.5);
    }

    #[test]
    fn results_sorted_by_score_descending() {
        let port = MockDataPort::new()
            .with_bars("A", bars_from_closes("A", &QUALIFYING_CLOSES))
            .with_bars("UP", generate_bars("UP", 20, 100.0))
            .with_bars("B", choppy_bars("B", 20));

        let report = screener::run(&port, &symbols(&["A", "B", "UP"]), &screener_config());

        let order: Vec<&str> = report.results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["UP", "A"]);
        assert!(report
            .results
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let port = MockDataPort::new()
            .with_bars("X", generate_bars("X", 20, 100.0))
            .with_bars("Y", generate_bars("Y", 20, 100.0))
            .with_bars("Z", generate_bars("Z", 20, 100.0));

        let report = screener::run(&port, &symbols(&["Z", "X", "Y"]), &screener_config());

        let order: Vec<&str> = report.results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["Z", "X", "Y"]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let port = MockDataPort::new()
            .with_bars("A", bars_from_closes("A", &QUALIFYING_CLOSES))
            .with_bars("UP", generate_bars("UP", 20, 100.0))
            .with_error("C", "timeout");
        let list = symbols(&["A", "C", "UP"]);

        let first = screener::run(&port, &list, &screener_config());
        let second = screener::run(&port, &list, &screener_config());

        assert_eq!(first, second);
    }

    #[test]
    fn each_symbol_fetched_once() {
        let port = MockDataPort::new()
            .with_bars("A", bars_from_closes("A", &QUALIFYING_CLOSES))
            .with_bars("B", choppy_bars("B", 20));

        screener::run(&port, &symbols(&["A", "B"]), &screener_config());

        assert_eq!(port.request_count("A"), 1);
        assert_eq!(port.request_count("B"), 1);
    }

    #[test]
    fn raised_threshold_excludes_symbol() {
        let port = MockDataPort::new().with_bars("A", bars_from_closes("A", &QUALIFYING_CLOSES));
        let mut config = screener_config();
        config.rsi_threshold = 75.0;

        let report = screener::run(&port, &symbols(&["A"]), &config);

        assert!(!report.has_matches());
    }
}

mod rendering {
    use super::*;

    fn report_for(port: &MockDataPort, list: &[&str]) -> ScreenReport {
        screener::run(port, &symbols(list), &screener_config())
    }

    #[test]
    fn csv_output_has_fixed_columns() {
        let port = MockDataPort::new()
            .with_bars("A", bars_from_closes("A", &QUALIFYING_CLOSES))
            .with_bars("UP", generate_bars("UP", 20, 100.0));

        let csv = CsvReportAdapter::default()
            .render(&report_for(&port, &["A", "UP"]))
            .unwrap();

        assert_eq!(
            csv,
            "Stock,RSI,SMA_10,Close,Score\n\
             UP,100.00,114.50,119.00,104.50\n\
             A,70.00,100.00,110.00,80.00\n"
        );
    }

    #[test]
    fn table_reports_no_matches() {
        let port = MockDataPort::new().with_bars("B", choppy_bars("B", 20));
        let text = TableReportAdapter::default()
            .render(&report_for(&port, &["B"]))
            .unwrap();
        assert_eq!(text.trim_end(), NO_MATCHES);
    }
}

mod csv_data_source {
    use super::*;

    #[test]
    fn screens_symbols_from_csv_directory() {
        let dir = TempDir::new().unwrap();
        write_csv_bars(dir.path(), "A", &bars_from_closes("A", &QUALIFYING_CLOSES));
        write_csv_bars(dir.path(), "B", &choppy_bars("B", 20));
        let port = CsvAdapter::new(dir.path().to_path_buf());

        let report = screener::run(&port, &symbols(&["A", "B", "MISSING"]), &screener_config());

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].symbol, "A");
        assert_eq!(report.results[0].score, 80.0);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].symbol, "MISSING");
    }

    #[test]
    fn bars_outside_window_are_ignored() {
        let dir = TempDir::new().unwrap();
        write_csv_bars(dir.path(), "UP", &generate_bars("UP", 20, 100.0));
        let port = CsvAdapter::new(dir.path().to_path_buf());

        // Window 2024-05-19..=2024-06-19 keeps only 19 of the 20 bars.
        let config = ScreenerConfig::as_of(date(2024, 6, 19));
        let report = screener::run(&port, &symbols(&["UP"]), &config);

        assert!(report.results.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.skipped[0].bars, 19);
    }
}
