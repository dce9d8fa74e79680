//! Bencode Decoder
//!
//! Reads bencoded data from stdin and prints the decoded value.
//!
//! Key concepts:
//! - Recursive tables: lists and dictionaries nest any value
//! - Function guards: byte strings read exactly as many bytes as announced
//! - Context isolation: failed alternatives never leave partial values
//!
//! Run with: echo 'd3:cow3:moo4:spaml1:a1:bee' | cargo run --example bencode
//! Add `--trace` to print the accepted path as JSON; set RUST_LOG=trace
//! to follow every transition.

use std::io::{self, Read};
use std::process::ExitCode;
use tablefsm::grammars::bencode::{Decoder, VALUE};
use tablefsm::{Cursor, Engine};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let trace = std::env::args().any(|arg| arg == "--trace");
    let mut input = Vec::new();
    if let Err(error) = io::stdin().read_to_end(&mut input) {
        eprintln!("Unable to read stdin: {error}");
        return ExitCode::FAILURE;
    }

    println!("=== Bencode Decoder ===\n");
    println!("Processing {} byte input...", input.len());

    let engine = Engine::cloning();
    let mut cursor = Cursor::new(&input);
    let mut decoder = Decoder::new();

    let outcome = if trace {
        engine
            .trace(&VALUE, &mut cursor, &mut decoder)
            .map(|report| {
                match report.to_json() {
                    Ok(json) => println!("{json}"),
                    Err(error) => eprintln!("Unable to render trace: {error}"),
                }
                report.consumed
            })
    } else {
        engine.run(&VALUE, &mut cursor, &mut decoder)
    };

    match (outcome, decoder.into_value()) {
        (Ok(consumed), Some(value)) => {
            println!("{value}");
            println!("\nDone - processed {consumed} bytes.");
            ExitCode::SUCCESS
        }
        (Ok(consumed), None) => {
            eprintln!("Accepted {consumed} bytes but produced no value");
            ExitCode::FAILURE
        }
        (Err(error), _) => {
            eprintln!("Unable to decode input: {error}");
            ExitCode::FAILURE
        }
    }
}
