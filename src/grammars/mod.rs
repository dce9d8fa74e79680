//! Reference grammars built on the public table API.
//!
//! Each grammar is a set of static tables plus the guard and callback
//! functions they name, and a `decode`/`parse` entry point that runs the
//! top-level table with a cloning engine.

pub mod bencode;
pub mod http_date;
pub mod uri;
