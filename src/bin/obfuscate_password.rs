//! One-off helper that obfuscates a database password for the config.
//!
//! Reads the plaintext from stdin and prints the obfuscated form to place
//! in `CARDREPORT_DB_PASSWORD_OBF`.

use cardreport::cipher::{self, OBFUSCATION_PASSPHRASE};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    print!("Please enter the database password to be obfuscated: ");
    if io::stdout().flush().is_err() {
        return ExitCode::from(1);
    }

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        eprintln!("cardreport: could not read the password from stdin");
        return ExitCode::from(1);
    }
    let password = line.trim_end_matches(&['\r', '\n'][..]);

    if password.is_empty() {
        eprintln!("Please provide a non-empty password as input.");
        return ExitCode::from(1);
    }

    match cipher::obfuscate(OBFUSCATION_PASSPHRASE, password) {
        Ok(obfuscated) => {
            println!("Password to be obfuscated: {}", password);
            println!("Obfuscated: {}", obfuscated);
            println!("Keep this value in CARDREPORT_DB_PASSWORD_OBF, special characters included.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("cardreport: {}", e);
            ExitCode::from(1)
        }
    }
}
