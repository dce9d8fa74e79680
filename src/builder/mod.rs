//! Builder API for tables and engines.
//!
//! Static tables are declared with the [`table!`](crate::table) macro or
//! with `Transition::on(..)` rows directly. [`TableBuilder`] assembles
//! tables at runtime, and [`EngineBuilder`] configures how an engine
//! isolates attempts from the caller's context.
//!
//! # Example
//!
//! ```
//! use tablefsm::builder::EngineBuilder;
//! use tablefsm::{table, Cursor, Table};
//!
//! table! {
//!     static SIGN: Table<Vec<u8>> = "sign" {
//!         0 => one_of(b"+-").accept().then(keep),
//!     };
//! }
//!
//! fn keep(cursor: Cursor<'_>, len: usize, seen: &mut Vec<u8>, _: Option<&'static ()>) {
//!     seen.extend_from_slice(&cursor.rest()[..len]);
//! }
//!
//! let engine = EngineBuilder::<Vec<u8>>::new().cloning().check_tables(true).build();
//! let mut seen = Vec::new();
//!
//! assert_eq!(engine.run(&SIGN, &mut Cursor::new(b"-1"), &mut seen), Ok(1));
//! assert_eq!(seen, b"-");
//! ```

pub mod engine;
pub mod error;
pub mod macros;
pub mod table;

pub use engine::EngineBuilder;
pub use error::BuildError;
pub use table::TableBuilder;
