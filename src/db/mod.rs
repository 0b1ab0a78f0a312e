use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::models::{FormInputs, DEFAULT_AMOUNT, DEFAULT_MONTHS, DEFAULT_RATE};
use crate::utils::now_rfc3339;

pub const FORM_INPUTS_KEY: &str = "creditsim.form.inputs";

// `load` falls back to the defaults for anything missing or unreadable.
pub trait FormStore: Send {
    fn load(&self) -> FormInputs;
    fn save(&self, inputs: &FormInputs) -> Result<(), StoreError>;
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(db_path: PathBuf) -> SqlResult<Self> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> SqlResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> SqlResult<Self> {
        let mut db = Database { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&mut self) -> SqlResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL
            );",
        )?;

        let migrations = vec![(
            "001_create_settings.sql",
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/migrations/001_create_settings.sql"
            )),
        )];

        for (name, sql) in migrations {
            let applied: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM schema_migrations WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;

            if applied.is_none() {
                let tx = self.conn.transaction()?;
                tx.execute_batch(sql)?;
                tx.execute(
                    "INSERT INTO schema_migrations (name, applied_at) VALUES (?1, datetime('now'))",
                    params![name],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    }

    pub fn set_setting(&self, key: &str, value: &str) -> SqlResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> SqlResult<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
        stmt.query_row(params![key], |row| row.get(0)).optional()
    }
}

impl FormStore for Database {
    fn load(&self) -> FormInputs {
        match self.get_setting(FORM_INPUTS_KEY) {
            Ok(Some(raw)) => parse_form_inputs(&raw),
            Ok(None) => FormInputs::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored form inputs");
                FormInputs::default()
            }
        }
    }

    fn save(&self, inputs: &FormInputs) -> Result<(), StoreError> {
        let raw = serde_json::to_string(inputs)?;
        self.set_setting(FORM_INPUTS_KEY, &raw)?;
        Ok(())
    }
}

fn parse_form_inputs(raw: &str) -> FormInputs {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "stored form inputs are not valid JSON");
            return FormInputs::default();
        }
    };
    FormInputs {
        amount: field_or(&value, "amount", DEFAULT_AMOUNT),
        rate: field_or(&value, "rate", DEFAULT_RATE),
        months: field_or(&value, "months", DEFAULT_MONTHS),
    }
}

fn field_or(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => default.to_string(),
    }
}
