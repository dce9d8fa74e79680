//! End-to-end scenarios exercising the engine through its public API.

use chrono::{Month, NaiveDate, NaiveTime, Weekday};
use pretty_assertions::assert_eq;
use tablefsm::builder::EngineBuilder;
use tablefsm::grammars::bencode::{self, Decoder, Value};
use tablefsm::grammars::http_date::{self, Format};
use tablefsm::{recognize, Class, Cursor, Engine, RunError, Table, Transition};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

static DIGIT: Table<()> = Table {
    name: "digit",
    transitions: &[Transition::on(0).one_of(b"0123456789").accept().label("digit")],
};

static GUARDED: Table<()> = Table {
    name: "guarded",
    transitions: &[
        Transition::on(0).exact(b"a").to(1),
        Transition::on(1).exact(b"b").reject().label("b after a"),
        Transition::on(1).exact(b"bc").accept(),
    ],
};

static ALTERNATIVES: Table<()> = Table {
    name: "alternatives",
    transitions: &[
        Transition::on(0).automaton(&GUARDED).accept(),
        Transition::on(0).exact(b"abc").accept().label("plain abc"),
    ],
};

#[test]
fn scenario_a_negative_integer() {
    init_logging();
    let engine = Engine::cloning();
    let mut cursor = Cursor::new(b"i-42e");
    let mut decoder = Decoder::new();

    let consumed = engine.run(&bencode::VALUE, &mut cursor, &mut decoder);

    assert_eq!(consumed, Ok(5));
    assert_eq!(cursor.offset(), 5);
    assert_eq!(decoder.into_value(), Some(Value::Integer(-42)));
}

#[test]
fn scenario_b_sign_without_digits_fails_cleanly() {
    init_logging();
    let engine = Engine::cloning();
    let mut cursor = Cursor::new(b"i-e");
    let mut decoder = Decoder::new();

    let result = engine.run(&bencode::VALUE, &mut cursor, &mut decoder);

    assert!(result.is_err());
    assert_eq!(cursor.offset(), 0);
    assert_eq!(decoder, Decoder::new());
}

#[test]
fn scenario_c_rfc1123_date() {
    init_logging();
    let input = b"Mon, 01 Jan 2010 12:34:56 GMT";

    let date = http_date::parse(input).unwrap();

    assert_eq!(date.consumed, input.len());
    assert_eq!(date.weekday, Weekday::Mon);
    assert_eq!(date.month(), Month::January);
    assert_eq!(date.date, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
    assert_eq!(date.time, NaiveTime::from_hms_opt(12, 34, 56).unwrap());
    assert_eq!(date.format, Format::Rfc1123);
}

#[test]
fn scenario_d_single_character_set() {
    init_logging();
    let mut cursor = Cursor::new(b"7x");

    let report = Engine::shared().trace(&DIGIT, &mut cursor, &mut ()).unwrap();

    assert_eq!(report.consumed, 1);
    assert_eq!(report.path(), vec![Some(0), None]);
    assert_eq!(report.steps()[0].class, Class::Accept);
    assert_eq!(cursor.rest(), b"x");
}

#[test]
fn scenario_e_reject_beats_later_match() {
    init_logging();
    let mut cursor = Cursor::new(b"abc");

    let result = Engine::shared().run(&GUARDED, &mut cursor, &mut ());

    assert_eq!(
        result,
        Err(RunError::Rejected {
            table: "guarded",
            state: 1,
            offset: 1,
            label: Some("b after a"),
        })
    );
    assert_eq!(cursor.offset(), 0);
}

#[test]
fn reject_propagates_past_enclosing_alternatives() {
    init_logging();

    let result = recognize(&ALTERNATIVES, b"abc");

    assert!(matches!(result, Err(RunError::Rejected { table: "guarded", .. })));
}

#[test]
fn trace_lists_nested_steps_before_their_parent() {
    init_logging();
    let engine = Engine::cloning();
    let mut decoder = Decoder::new();

    let report = engine
        .trace(&bencode::VALUE, &mut Cursor::new(b"li7ee"), &mut decoder)
        .unwrap();

    let last = report.steps().last().unwrap();
    assert_eq!(report.consumed, 5);
    assert_eq!(last.depth, 0);
    assert_eq!(last.table, "bencode-value");
    assert_eq!(last.label.as_deref(), Some("list"));
    assert!(report.max_depth() >= 3);
    assert_eq!(report.path(), vec![Some(0), None]);
}

#[test]
fn checked_engine_refuses_broken_tables() {
    static BROKEN: Table<()> = Table {
        name: "broken",
        transitions: &[
            Transition::on(0).one_of(b"").to(7),
            Transition::END,
            Transition::on(0).exact(b"x").accept(),
        ],
    };
    let engine = EngineBuilder::<()>::new().check_tables(true).build();

    let result = engine.run(&BROKEN, &mut Cursor::new(b"x"), &mut ());

    match result {
        Err(RunError::InvalidTable { table, issues }) => {
            assert_eq!(table, "broken");
            assert_eq!(issues.len(), 4);
        }
        other => panic!("Expected InvalidTable, got {other:?}"),
    }
}

#[test]
fn sentinel_ends_scanning() {
    static TRUNCATED: Table<()> = Table {
        name: "truncated",
        transitions: &[
            Transition::on(0).exact(b"a").accept(),
            Transition::END,
            Transition::on(0).exact(b"b").accept(),
        ],
    };

    assert_eq!(recognize(&TRUNCATED, b"a"), Ok(1));
    assert!(recognize(&TRUNCATED, b"b").is_err());
}
