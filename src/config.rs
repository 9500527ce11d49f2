//! Runtime configuration from environment variables.
//!
//! The legacy deployment carried the column/status/datetime roles as
//! positional comma-separated lists; a list of the wrong length surfaced as
//! an index panic deep inside query building. Here the lists are parsed
//! eagerly into named structs and an arity mismatch is a descriptive
//! configuration error before anything else runs.
//!
//! Environment variables:
//! - `CARDREPORT_PEER_HOST` / `CARDREPORT_PEER_PORT` - mated (active) node
//!   probed by the standby guard
//! - `CARDREPORT_LOCAL_HOST` / `CARDREPORT_DB_PORT` - informational only,
//!   logged at startup
//! - `CARDREPORT_PROBE_TIMEOUT_MS` (default: 3000)
//! - `CARDREPORT_SOURCE_TABLES` - ordered, comma-separated; the first entry
//!   is the primary table rendered in descending category order
//! - `CARDREPORT_DB_PATH` - database file
//! - `CARDREPORT_DB_USER` / `CARDREPORT_DB_PASSWORD_OBF` - credentials, the
//!   password in obfuscated form (see the `cipher` module)
//! - `CARDREPORT_OUTPUT_DIR` (default: current directory)
//! - `CARDREPORT_COLUMN_ROLES` - category,status,anchor columns (3 entries)
//! - `CARDREPORT_STATUS_LITERALS` - activated,used,expired,bookedin,
//!   deactivated,new (6 entries, in that order)
//! - `CARDREPORT_DATETIME_ROLES` - used-time column, current-day
//!   expression, expiry column, generated-time column (4 entries)

use std::env;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The three column roles every count query is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    /// Grouping key, one output row per distinct value.
    pub category: String,
    /// Column holding the status literals.
    pub status: String,
    /// Not-null filter establishing row eligibility.
    pub anchor: String,
}

impl ColumnRoles {
    pub fn from_list(key: &str, entries: &[String]) -> Result<Self, ConfigError> {
        if entries.len() != 3 {
            return Err(ConfigError::InvalidValue(format!(
                "{} expects 3 entries (category,status,anchor columns), got {}",
                key,
                entries.len()
            )));
        }
        Ok(Self {
            category: entries[0].clone(),
            status: entries[1].clone(),
            anchor: entries[2].clone(),
        })
    }
}

/// Status literal per counted category. Positional order in the config is
/// activated, used, expired, bookedin, deactivated, new.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLiterals {
    pub activated: String,
    pub used: String,
    pub expired: String,
    pub booked_in: String,
    pub deactivated: String,
    /// Literal for cards generated but not yet booked in ("new").
    pub newly_generated: String,
}

impl StatusLiterals {
    pub fn from_list(key: &str, entries: &[String]) -> Result<Self, ConfigError> {
        if entries.len() != 6 {
            return Err(ConfigError::InvalidValue(format!(
                "{} expects 6 entries (activated,used,expired,bookedin,deactivated,new), got {}",
                key,
                entries.len()
            )));
        }
        Ok(Self {
            activated: entries[0].clone(),
            used: entries[1].clone(),
            expired: entries[2].clone(),
            booked_in: entries[3].clone(),
            deactivated: entries[4].clone(),
            newly_generated: entries[5].clone(),
        })
    }
}

/// Timestamp columns plus the SQL expression for the start of the current
/// day. The "used", "expired" and "new" categories only count rows whose
/// timestamp precedes that expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatetimeRoles {
    pub used_time: String,
    /// Day-start reference, e.g. `date('now')`.
    pub now_expr: String,
    pub expiry_time: String,
    pub generated_time: String,
}

impl DatetimeRoles {
    pub fn from_list(key: &str, entries: &[String]) -> Result<Self, ConfigError> {
        if entries.len() != 4 {
            return Err(ConfigError::InvalidValue(format!(
                "{} expects 4 entries (used-time,current-day-expr,expiry,generated-time), got {}",
                key,
                entries.len()
            )));
        }
        Ok(Self {
            used_time: entries[0].clone(),
            now_expr: entries[1].clone(),
            expiry_time: entries[2].clone(),
            generated_time: entries[3].clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub peer_host: String,
    pub peer_port: u16,
    /// Informational, read and logged but unused by the guard.
    pub local_host: Option<String>,
    /// Informational, read and logged but unused by the guard.
    pub db_port: Option<String>,
    pub probe_timeout_ms: u64,
    pub source_tables: Vec<String>,
    pub db_path: String,
    pub db_user: String,
    pub db_password_obf: String,
    pub output_dir: PathBuf,
    pub column_roles: ColumnRoles,
    pub status_literals: StatusLiterals,
    pub datetime_roles: DatetimeRoles,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let peer_host = required("CARDREPORT_PEER_HOST")?;
        let peer_port = parse_port("CARDREPORT_PEER_PORT", &required("CARDREPORT_PEER_PORT")?)?;

        let probe_timeout_ms = env::var("CARDREPORT_PROBE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3_000);

        let source_tables = split_list(&required("CARDREPORT_SOURCE_TABLES")?);
        if source_tables.is_empty() {
            return Err(ConfigError::InvalidValue(
                "CARDREPORT_SOURCE_TABLES must name at least one table".to_string(),
            ));
        }

        let column_roles = ColumnRoles::from_list(
            "CARDREPORT_COLUMN_ROLES",
            &split_list(&required("CARDREPORT_COLUMN_ROLES")?),
        )?;
        let status_literals = StatusLiterals::from_list(
            "CARDREPORT_STATUS_LITERALS",
            &split_list(&required("CARDREPORT_STATUS_LITERALS")?),
        )?;
        let datetime_roles = DatetimeRoles::from_list(
            "CARDREPORT_DATETIME_ROLES",
            &split_list(&required("CARDREPORT_DATETIME_ROLES")?),
        )?;

        Ok(Self {
            peer_host,
            peer_port,
            local_host: env::var("CARDREPORT_LOCAL_HOST").ok(),
            db_port: env::var("CARDREPORT_DB_PORT").ok(),
            probe_timeout_ms,
            source_tables,
            db_path: required("CARDREPORT_DB_PATH")?,
            db_user: required("CARDREPORT_DB_USER")?,
            db_password_obf: required("CARDREPORT_DB_PASSWORD_OBF")?,
            output_dir: env::var("CARDREPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            column_roles,
            status_literals,
            datetime_roles,
        })
    }

    /// The table rendered in descending category order by the emitter.
    pub fn primary_table(&self) -> &str {
        &self.source_tables[0]
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVariable(name.to_string()))
}

fn parse_port(name: &str, raw: &str) -> Result<u16, ConfigError> {
    raw.parse::<u16>().map_err(|_| {
        ConfigError::InvalidValue(format!("{} must be a TCP port, got '{}'", name, raw))
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn column_roles_require_exactly_three_entries() {
        let err = ColumnRoles::from_list("CARDREPORT_COLUMN_ROLES", &owned(&["CARD_TYPE", "CARD_STATUS"]))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("CARDREPORT_COLUMN_ROLES"), "{}", msg);
        assert!(msg.contains("expects 3"), "{}", msg);
        assert!(msg.contains("got 2"), "{}", msg);
    }

    #[test]
    fn status_literals_require_exactly_six_entries() {
        let err = StatusLiterals::from_list(
            "CARDREPORT_STATUS_LITERALS",
            &owned(&["activated", "used", "expired"]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("expects 6"));
    }

    #[test]
    fn datetime_roles_require_exactly_four_entries() {
        let err = DatetimeRoles::from_list(
            "CARDREPORT_DATETIME_ROLES",
            &owned(&["USED_TIME", "date('now')", "EXPIRY_DATE", "GENERATED_TIME", "extra"]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("expects 4"));
    }

    #[test]
    fn positional_lists_map_to_named_fields() {
        let statuses = StatusLiterals::from_list(
            "CARDREPORT_STATUS_LITERALS",
            &owned(&["activated", "used", "expired", "bookedin", "deactivated", "new"]),
        )
        .unwrap();
        assert_eq!(statuses.booked_in, "bookedin");
        assert_eq!(statuses.newly_generated, "new");

        let times = DatetimeRoles::from_list(
            "CARDREPORT_DATETIME_ROLES",
            &owned(&["USED_TIME", "date('now')", "EXPIRY_DATE", "GENERATED_TIME"]),
        )
        .unwrap();
        assert_eq!(times.now_expr, "date('now')");
    }

    #[test]
    fn split_list_trims_and_drops_empty_entries() {
        assert_eq!(
            split_list(" UCMS_CARDS , Imported_Cards ,"),
            vec!["UCMS_CARDS".to_string(), "Imported_Cards".to_string()]
        );
    }

    #[test]
    fn from_env_reads_the_full_bundle() {
        // Single env-mutating test so parallel tests don't race on the vars.
        env::set_var("CARDREPORT_PEER_HOST", "10.0.0.2");
        env::set_var("CARDREPORT_PEER_PORT", "1521");
        env::set_var("CARDREPORT_SOURCE_TABLES", "UCMS_CARDS,Imported_Cards");
        env::set_var("CARDREPORT_DB_PATH", "/tmp/cards.db");
        env::set_var("CARDREPORT_DB_USER", "report");
        env::set_var("CARDREPORT_DB_PASSWORD_OBF", "obfuscated");
        env::set_var("CARDREPORT_COLUMN_ROLES", "CARD_TYPE,CARD_STATUS,SERIAL_NO");
        env::set_var(
            "CARDREPORT_STATUS_LITERALS",
            "activated,used,expired,bookedin,deactivated,new",
        );
        env::set_var(
            "CARDREPORT_DATETIME_ROLES",
            "USED_TIME,date('now'),EXPIRY_DATE,GENERATED_TIME",
        );

        let config = ReportConfig::from_env().unwrap();

        assert_eq!(config.peer_host, "10.0.0.2");
        assert_eq!(config.peer_port, 1521);
        assert_eq!(config.primary_table(), "UCMS_CARDS");
        assert_eq!(config.probe_timeout_ms, 3_000);
        assert_eq!(config.column_roles.anchor, "SERIAL_NO");
        assert_eq!(config.status_literals.used, "used");
        assert_eq!(config.datetime_roles.expiry_time, "EXPIRY_DATE");
        assert_eq!(config.output_dir, PathBuf::from("."));

        for var in [
            "CARDREPORT_PEER_HOST",
            "CARDREPORT_PEER_PORT",
            "CARDREPORT_SOURCE_TABLES",
            "CARDREPORT_DB_PATH",
            "CARDREPORT_DB_USER",
            "CARDREPORT_DB_PASSWORD_OBF",
            "CARDREPORT_COLUMN_ROLES",
            "CARDREPORT_STATUS_LITERALS",
            "CARDREPORT_DATETIME_ROLES",
        ] {
            env::remove_var(var);
        }
    }
}
