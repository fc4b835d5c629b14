use std::sync::{Arc, Mutex};

/// A record written to a [`CapturingLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub level: log::Level,
    pub target: String,
    pub text: String,
    pub method: Option<String>,
    pub error_type: Option<String>,
}

/// A logger with an arbitrary set of enabled levels that keeps every record it gets.
#[derive(Debug, Clone, Default)]
pub struct CapturingLogger {
    enabled: Vec<log::Level>,
    records: Arc<Mutex<Vec<Captured>>>,
}

impl CapturingLogger {
    pub fn with_levels(levels: &[log::Level]) -> Self {
        Self {
            enabled: levels.to_vec(),
            records: Arc::default(),
        }
    }

    pub fn records(&self) -> Vec<Captured> {
        self.records.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<(log::Level, String)> {
        self.records()
            .into_iter()
            .map(|record| (record.level, record.text))
            .collect()
    }
}

impl log::Log for CapturingLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.enabled.contains(&metadata.level())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let kv = record.key_values();
        let get = |key: &str| {
            kv.get(log::kv::Key::from_str(key))
                .map(|value| value.to_string())
        };
        self.records.lock().unwrap().push(Captured {
            level: record.level(),
            target: record.target().to_owned(),
            text: record.args().to_string(),
            method: get("method"),
            error_type: get("error_type"),
        });
    }

    fn flush(&self) {}
}
