//! Report Runtime - production entry point for the card status report.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin report_runtime
//! ```
//!
//! Configuration comes from the environment (see `config.rs`); a `.env`
//! file next to the binary is honored. Each run creates a timestamped
//! directory holding the run log and the per-table report files.
//!
//! Exit codes: 0 complete report, 1 fatal (configuration, standby check,
//! connection, all tables failed), 2 partial report (some tables failed).

use cardreport::cipher;
use cardreport::config::ReportConfig;
use cardreport::report_core::{
    AggregationRunner, DbCredentials, ReportEmitter, RunStatus, SqliteCountSource,
};
use cardreport::standby::StandbyGuard;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    match run() {
        Ok(RunStatus::Complete) => ExitCode::SUCCESS,
        Ok(RunStatus::Partial) => {
            eprintln!("cardreport: completed with per-table failures; see the run log");
            ExitCode::from(2)
        }
        Ok(RunStatus::Failed) => {
            eprintln!("cardreport: every table failed; see the run log");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("cardreport: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<RunStatus, Box<dyn std::error::Error>> {
    let config = ReportConfig::from_env()?;

    let now = Local::now();
    let run_dir = config
        .output_dir
        .join(now.format("cardReporting_%d%m%Y%H%M").to_string());
    fs::create_dir_all(&run_dir)?;
    init_logging(&run_dir, &now)?;

    log::info!("🚀 Starting card status report run");
    log::info!("   Source tables: {:?}", config.source_tables);
    log::info!("   Database: {}", config.db_path);
    log::info!("Run directory is at path {}", run_dir.display());
    if let Some(host) = &config.local_host {
        log::info!("Local host (informational): {}", host);
    }
    if let Some(port) = &config.db_port {
        log::info!("Database port (informational): {}", port);
    }

    let guard = StandbyGuard::new(
        config.peer_host.clone(),
        config.peer_port,
        Duration::from_millis(config.probe_timeout_ms),
    );
    if !guard.is_standby() {
        log::error!(
            "Mated node {}:{} is unreachable; this host may be the active node. \
             Execute the report on the standby system.",
            config.peer_host,
            config.peer_port
        );
        return Err("standby check failed: refusing to run on a non-standby node".into());
    }

    let password = cipher::deobfuscate(cipher::OBFUSCATION_PASSPHRASE, &config.db_password_obf)?;
    let credentials = DbCredentials {
        user: config.db_user.clone(),
        password,
    };

    let source = SqliteCountSource::open(&config.db_path, &credentials)?;
    let runner = AggregationRunner::new(
        &source,
        &config.column_roles,
        &config.status_literals,
        &config.datetime_roles,
    );

    log::info!("Starting the select query, count and its result analysis");
    let outcome = runner.run(&config.source_tables);

    let emitter = ReportEmitter::new(&run_dir, &now)?;
    emitter.emit_all(&outcome.reports, config.primary_table())?;

    let status = outcome.status();
    match status {
        RunStatus::Complete => log::info!("Tool execution ended"),
        RunStatus::Partial => log::warn!(
            "Tool execution ended with {} failed table(s); report is partial",
            outcome.failures.len()
        ),
        RunStatus::Failed => log::error!("Tool execution ended: every table failed"),
    }

    Ok(status)
}

fn init_logging(run_dir: &Path, now: &DateTime<Local>) -> Result<(), std::io::Error> {
    let log_path = run_dir.join(now.format("cardReportingTool_%d%m%Y_%H%M.log").to_string());
    let log_file = File::create(&log_path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    Ok(())
}
