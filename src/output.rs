//! Output rendering
//!
//! - human mode: text and tables on stdout, logs on stderr
//! - `--json` mode: JSON Lines on stdout, every event carries the schema version (v: 1)

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::FastlyError;

const SCHEMA_VERSION: u8 = 1;

/// Event wrapper with schema version
#[derive(Serialize)]
struct Event<T: Serialize> {
    v: u8,
    #[serde(rename = "type")]
    event_type: String,
    payload: T,
}

fn emit<T: Serialize>(event_type: &str, payload: T) {
    let event = Event {
        v: SCHEMA_VERSION,
        event_type: event_type.to_string(),
        payload,
    };
    match serde_json::to_string(&event) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("[ERROR] failed to encode {} event: {}", event_type, e),
    }
}

/// Output handler
pub struct Output {
    json_mode: bool,
    verbose: bool,
}

impl Output {
    pub fn new(json_mode: bool, verbose: bool) -> Self {
        Self { json_mode, verbose }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Log message (stderr for human, JSON Lines for machine)
    pub fn log(&self, level: &str, message: &str) {
        if self.json_mode {
            emit("log", json!({"level": level, "message": message}));
        } else {
            eprintln!("[{}] {}", level.to_uppercase(), message);
        }
    }

    /// Mutation outcome: `SUCCESS: ...` for humans
    pub fn success<T: Serialize>(&self, message: &str, data: T) {
        if self.json_mode {
            emit("result", data);
        } else {
            println!("SUCCESS: {}", message);
        }
    }

    /// Listing: an aligned table for humans
    pub fn table<T: Serialize>(&self, headers: &[&str], rows: Vec<Vec<String>>, data: T) {
        if self.json_mode {
            emit("result", data);
        } else {
            println!("{}", render_table(headers, rows));
        }
    }

    /// Single record: `Key: value` lines for humans
    pub fn fields<T: Serialize>(&self, fields: &[(&str, String)], data: T) {
        if self.json_mode {
            emit("result", data);
        } else {
            for (key, value) in fields {
                println!("{}: {}", key, value);
            }
        }
    }

    /// Error output; exits the process
    pub fn error(&self, err: ErrorReport) -> ! {
        if self.json_mode {
            emit("error", &err);
        } else {
            eprintln!("Error [{}][{}]: {}", err.cat, err.code, err.message.as_deref().unwrap_or(""));
            if !err.fix.is_empty() {
                eprintln!("  Fix: {}", err.fix.join(", "));
            }
        }
        std::process::exit(err.exit_code());
    }
}

fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> comfy_table::Table {
    let mut table = comfy_table::Table::new();
    table.set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table
}

/// Error report
#[derive(Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub cat: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    pub fix: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorReport {
    pub fn from_error(err: &FastlyError) -> Self {
        Self {
            code: err.code().into(),
            cat: err.category().into(),
            op: None,
            fix: err.fix().into_iter().map(String::from).collect(),
            message: Some(err.to_string()),
            details: error_details(err),
        }
    }

    /// System error
    pub fn sys(code: &str, message: &str) -> Self {
        Self {
            code: code.into(),
            cat: "sys".into(),
            op: None,
            fix: vec!["report".into()],
            message: Some(message.into()),
            details: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: &str) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Get exit code based on category
    pub fn exit_code(&self) -> i32 {
        match self.cat.as_str() {
            "in" => 1,
            "auth" => 3,
            _ => 2,
        }
    }
}

fn error_details(err: &FastlyError) -> Option<Value> {
    match err {
        FastlyError::VersionNotEditable { service_id, version, state } => {
            Some(json!({"service_id": service_id, "version": version, "state": state}))
        }
        FastlyError::VersionNotFound { service_id, version } => {
            Some(json!({"service_id": service_id, "version": version}))
        }
        FastlyError::NoVersions { service_id } | FastlyError::NoActiveVersion { service_id } => {
            Some(json!({"service_id": service_id}))
        }
        FastlyError::Api { status, .. } => Some(json!({"status": status})),
        FastlyError::Pagination { pages_remaining, source } => {
            Some(json!({"pages_remaining": pages_remaining, "source": error_details(source)}))
        }
        _ => None,
    }
}
