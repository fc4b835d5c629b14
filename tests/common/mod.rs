use std::sync::{Mutex, OnceLock};

use log::{LevelFilter, Record, kv::Key};

/// A record seen by the global logger.
#[derive(Debug, Clone)]
pub struct Line {
    pub level: log::Level,
    pub target: String,
    pub text: String,
    pub method: Option<serde_json::Value>,
}

pub trait RecordExt {
    fn get_record(&self, key: &str) -> Option<serde_json::Value>;
}

impl RecordExt for Record<'_> {
    fn get_record(&self, key: &str) -> Option<serde_json::Value> {
        let key = Key::from_str(key);
        let val = self.key_values().get(key)?;
        serde_json::to_value(val).ok()
    }
}

static LINES: Mutex<Vec<Line>> = Mutex::new(Vec::new());

/// Installs a global `env_logger` that keeps every record, once per test binary.
pub fn init_logger() {
    static INIT: OnceLock<()> = OnceLock::new();

    INIT.get_or_init(|| {
        let level_filter = LevelFilter::Trace;
        env_logger::Builder::new()
            .filter_level(level_filter)
            .format(|_fmt, record| {
                let line = Line {
                    level: record.level(),
                    target: record.target().to_owned(),
                    text: record.args().to_string(),
                    method: record.get_record("method"),
                };
                LINES.lock().unwrap().push(line);
                Ok(())
            })
            .init();
    });
}

/// Records written for the given target so far.
pub fn lines_for(target: &str) -> Vec<Line> {
    LINES
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.target == target)
        .cloned()
        .collect()
}
