//! # Contract Logging
//!
//! The contract only emits events. These flows capture them with a scoped
//! subscriber built the way `pharma-telemetry` builds the global one.

use std::io;
use std::sync::{Arc, Mutex};

/// In-memory log sink shared between a subscriber and the test reading it.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut buf) => buf.extend_from_slice(data),
            Err(poisoned) => poisoned.into_inner().extend_from_slice(data),
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ids, PackShape, Scenario};
    use pharma_ledger::prelude::*;
    use pharma_telemetry::TelemetryConfig;
    use serde_json::Value;
    use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

    /// Run `body` with JSON events at `level` written to the returned sink.
    fn capture<T>(level: &str, body: impl FnOnce() -> T) -> (T, CapturedLogs) {
        let logs = CapturedLogs::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(move || sink.clone()),
            );
        let out = tracing::subscriber::with_default(subscriber, body);
        (out, logs)
    }

    fn events(logs: &CapturedLogs) -> Vec<Value> {
        logs.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    fn messages_at(logs: &CapturedLogs, level: &str) -> Vec<String> {
        events(logs)
            .iter()
            .filter(|e| e["level"] == level)
            .filter_map(|e| e["fields"]["message"].as_str().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_seal_logs_at_info() {
        let mut scenario = Scenario::new();
        scenario.create_strips(&ids(&["S1", "S2"])).unwrap();

        let (sealed, logs) = capture("info", || {
            scenario.run(|c, stub| c.seal_box(stub, "B1", &ids(&["S1", "S2"])))
        });
        assert!(sealed.is_ok());

        let info = events(&logs)
            .into_iter()
            .filter(|e| e["level"] == "INFO")
            .collect::<Vec<_>>();
        assert!(!info.is_empty());
        assert!(info
            .iter()
            .all(|e| e["target"].as_str().unwrap_or_default().starts_with("pharma_ledger")));
        assert!(logs.contents().contains("B1"));
    }

    #[test]
    fn test_legacy_scan_logs_a_warning() {
        let mut scenario = Scenario::new();
        scenario.pack_shipment("SH1", PackShape::new(1, 1, 2)).unwrap();

        let (result, logs) = capture("warn", || {
            scenario
                .contract
                .find_by_creation_tx(&scenario.view(), "tx-never-ran")
        });
        assert!(matches!(result, Err(ContractError::NotFound { .. })));
        assert_eq!(messages_at(&logs, "WARN").len(), 1);
    }

    #[test]
    fn test_primary_lookup_does_not_warn() {
        let mut scenario = Scenario::new();
        scenario.pack_shipment("SH1", PackShape::new(1, 1, 2)).unwrap();
        let seal_tx = scenario.last_tx_id();

        let (result, logs) = capture("warn", || {
            scenario.contract.find_by_creation_tx(&scenario.view(), &seal_tx)
        });
        assert_eq!(result.unwrap().transaction_info.item_id, "SH1");
        assert!(messages_at(&logs, "WARN").is_empty());
    }

    #[test]
    fn test_index_outage_is_logged_and_survived() {
        let index = Arc::new(InMemoryIndex::new());
        let contract = PharmaContract::default().with_index(Arc::clone(&index));
        let mut scenario = Scenario::with_contract(contract);
        scenario.create_strips(&ids(&["S1", "S2", "S3"])).unwrap();
        index.sync_from(&scenario.ledger).unwrap();
        index.set_available(false);

        let (available, logs) = capture("warn", || {
            scenario.contract.get_available_strips(&scenario.view())
        });
        assert_eq!(available.unwrap().len(), 3);
        assert_eq!(messages_at(&logs, "WARN").len(), 1);
    }

    #[test]
    fn test_filter_hides_debug_events() {
        let mut scenario = Scenario::new();
        scenario.pack_shipment("SH1", PackShape::new(1, 1, 1)).unwrap();

        let (_, quiet) = capture("info", || scenario.contract.scan(&scenario.view(), "SH1"));
        let (_, verbose) = capture("pharma_ledger=debug", || {
            scenario.contract.scan(&scenario.view(), "SH1")
        });
        assert!(messages_at(&quiet, "DEBUG").is_empty());
        assert!(!messages_at(&verbose, "DEBUG").is_empty());
    }

    #[test]
    fn test_telemetry_defaults_match_host_expectations() {
        let config = TelemetryConfig::from_lookup(|key| match key {
            "RUST_LOG" => Some("pharma_ledger=debug".to_string()),
            _ => None,
        });
        assert_eq!(config.service_name, "pharma-trace");
        assert_eq!(config.log_level, "pharma_ledger=debug");
        assert!(!config.json_logs);
    }
}
