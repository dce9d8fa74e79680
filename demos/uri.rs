//! URI Parser
//!
//! Reads one line from stdin and prints the components of the RFC 3986
//! URI reference it starts with.
//!
//! Run with: echo 'http://user@[::1]:8080/a/b?q=1#top' | cargo run --example uri

use std::io;
use std::process::ExitCode;
use tablefsm::grammars::uri::parse;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut line = String::new();
    if let Err(error) = io::stdin().read_line(&mut line) {
        eprintln!("Unable to read stdin: {error}");
        return ExitCode::FAILURE;
    }
    let line = line.trim_end_matches(['\r', '\n']);

    println!("=== URI Parser ===\n");
    println!("Processing {} byte input...", line.len());

    let uri = match parse(line) {
        Ok(uri) => uri,
        Err(error) => {
            eprintln!("Unable to parse URI: {error}");
            return ExitCode::FAILURE;
        }
    };

    let show = |name: &str, part: Option<&str>| {
        if let Some(part) = part {
            println!("{name:<9} {part}");
        }
    };
    show("scheme", uri.scheme);
    show("userinfo", uri.userinfo);
    show("host", uri.host);
    if let Some(kind) = uri.host_kind {
        println!("{:<9} {kind:?}", "host kind");
    }
    show("port", uri.port);
    println!("{:<9} {}", "path", uri.path);
    show("query", uri.query);
    show("fragment", uri.fragment);

    if uri.consumed < line.len() {
        println!("\nStopped at byte {}: {:?}", uri.consumed, &line[uri.consumed..]);
    }
    println!("\nDone - processed {} bytes.", uri.consumed);
    ExitCode::SUCCESS
}
