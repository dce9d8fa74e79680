//! HTTP Date Parser
//!
//! Reads an HTTP-style date from stdin and prints its fields.
//!
//! Key concepts:
//! - Alternatives: RFC 1123, RFC 850 and asctime are tried in order
//! - Transition arguments: each callback learns which field it fills
//!
//! Run with: echo 'Sun, 06 Nov 1994 08:49:37 GMT' | cargo run --example http_date

use std::io::{self, Read};
use std::process::ExitCode;
use tablefsm::grammars::http_date::parse;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut input = Vec::new();
    if let Err(error) = io::stdin().read_to_end(&mut input) {
        eprintln!("Unable to read stdin: {error}");
        return ExitCode::FAILURE;
    }

    println!("=== HTTP Date Parser ===\n");
    println!("Processing {} byte input...", input.len());

    match parse(&input) {
        Ok(date) => {
            println!("Format:  {}", date.format);
            println!("Weekday: {}", date.weekday);
            println!("Date:    {}", date.date);
            println!("Time:    {}", date.time);
            println!("UTC:     {}", date.to_utc().to_rfc3339());
            if !date.weekday_matches() {
                println!("Note: {} is not a {}", date.date, date.weekday);
            }
            println!("\nDone - processed {} bytes.", date.consumed);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Unable to parse date: {error}");
            ExitCode::FAILURE
        }
    }
}
