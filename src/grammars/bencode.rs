//! Bencode values: integers, byte strings, lists and dictionaries.
//!
//! The tables only recognize structure. Values are assembled by callbacks
//! on a [`Decoder`] stack, and because the engine isolates every nested
//! table behind a cloned decoder, abandoned alternatives leave nothing
//! half-built behind.

use crate::core::{Cursor, Table};
use crate::engine::{Engine, RunError};
use crate::table;
use std::collections::BTreeMap;
use std::fmt;

const DIGITS: &[u8] = b"0123456789";
const NONZERO: &[u8] = b"123456789";

/// A decoded bencode value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Dict(BTreeMap<Vec<u8>, Value>),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Look up `key` in a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        match self {
            Self::Dict(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Canonical encoding of the value.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::Integer(n) => {
                out.push(b'i');
                out.extend_from_slice(n.to_string().as_bytes());
                out.push(b'e');
            }
            Self::Bytes(bytes) => encode_bytes(bytes, out),
            Self::List(items) => {
                out.push(b'l');
                for item in items {
                    item.encode_into(out);
                }
                out.push(b'e');
            }
            Self::Dict(entries) => {
                out.push(b'd');
                for (key, value) in entries {
                    encode_bytes(key, out);
                    value.encode_into(out);
                }
                out.push(b'e');
            }
        }
    }
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Bytes(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {value}", String::from_utf8_lossy(key))?;
                }
                f.write_str("}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Frame {
    List(Vec<Value>),
    Dict {
        entries: BTreeMap<Vec<u8>, Value>,
        key: Option<Vec<u8>>,
    },
}

/// Parse context for the bencode tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoder {
    negative: bool,
    number: u64,
    overflowed: bool,
    stack: Vec<Frame>,
    value: Option<Value>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The completed top-level value, if any.
    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    fn push_digit(&mut self, digit: u8) {
        match self
            .number
            .checked_mul(10)
            .and_then(|n| n.checked_add(u64::from(digit)))
        {
            Some(n) => self.number = n,
            None => self.overflowed = true,
        }
    }

    fn reset_number(&mut self) {
        self.negative = false;
        self.number = 0;
        self.overflowed = false;
    }

    fn take_integer(&mut self) -> Option<i64> {
        let (negative, number, overflowed) = (self.negative, self.number, self.overflowed);
        self.reset_number();
        if overflowed {
            return None;
        }
        let wide = i128::from(number);
        i64::try_from(if negative { -wide } else { wide }).ok()
    }

    fn take_length(&mut self) -> Option<usize> {
        let (number, overflowed) = (self.number, self.overflowed);
        self.reset_number();
        if overflowed {
            return None;
        }
        usize::try_from(number).ok()
    }

    /// Place a finished value into the innermost open container.
    fn emit(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.value = Some(value),
            Some(Frame::List(items)) => items.push(value),
            Some(Frame::Dict { entries, key }) => match key.take() {
                Some(key) => {
                    entries.insert(key, value);
                }
                None => {
                    // Keys only ever come from the string table.
                    if let Value::Bytes(bytes) = value {
                        *key = Some(bytes);
                    }
                }
            },
        }
    }

    fn close(&mut self) {
        let value = match self.stack.pop() {
            Some(Frame::List(items)) => Value::List(items),
            Some(Frame::Dict { entries, .. }) => Value::Dict(entries),
            None => return,
        };
        self.emit(value);
    }
}

fn negate(_: Cursor<'_>, _: usize, decoder: &mut Decoder, _: Option<&'static ()>) {
    decoder.negative = true;
}

fn digit(cursor: Cursor<'_>, _: usize, decoder: &mut Decoder, _: Option<&'static ()>) {
    if let Some(byte) = cursor.peek() {
        decoder.push_digit(byte - b'0');
    }
}

fn open_list(_: Cursor<'_>, _: usize, decoder: &mut Decoder, _: Option<&'static ()>) {
    decoder.stack.push(Frame::List(Vec::new()));
}

fn open_dict(_: Cursor<'_>, _: usize, decoder: &mut Decoder, _: Option<&'static ()>) {
    decoder.stack.push(Frame::Dict {
        entries: BTreeMap::new(),
        key: None,
    });
}

fn close(_: Cursor<'_>, _: usize, decoder: &mut Decoder, _: Option<&'static ()>) {
    decoder.close();
}

/// Matches the closing `e` of an integer. Fails on overflow.
fn finish_integer(cursor: Cursor<'_>, decoder: &mut Decoder, _: Option<&'static ()>) -> Option<usize> {
    if cursor.peek() != Some(b'e') {
        return None;
    }
    let value = decoder.take_integer()?;
    decoder.emit(Value::Integer(value));
    Some(1)
}

/// Consumes as many bytes as the length prefix announced.
fn read_string(cursor: Cursor<'_>, decoder: &mut Decoder, _: Option<&'static ()>) -> Option<usize> {
    let length = decoder.take_length()?;
    let bytes = cursor.take(length)?;
    decoder.emit(Value::Bytes(bytes.to_vec()));
    Some(length)
}

table! {
    /// `i` then an optional `-`, digits without leading zeros, and `e`.
    /// Negative zero is rejected.
    pub static INTEGER: Table<Decoder> = "bencode-integer" {
        0 => exact(b"i").to(1),
        1 => exact(b"-").to(2).then(negate),
        1 => exact(b"0").to(3),
        1 => one_of(NONZERO).to(4).then(digit),
        2 => one_of(NONZERO).to(4).then(digit),
        3 => function(finish_integer).accept().label("integer"),
        4 => one_of(DIGITS).to(4).then(digit),
        4 => function(finish_integer).accept().label("integer"),
    };

    /// A decimal length, `:`, and that many raw bytes.
    pub static STRING: Table<Decoder> = "bencode-string" {
        0 => exact(b"0").to(1),
        0 => one_of(NONZERO).to(2).then(digit),
        1 => exact(b":").to(3),
        2 => one_of(DIGITS).to(2).then(digit),
        2 => exact(b":").to(3),
        3 => function(read_string).accept().label("string"),
    };

    pub static LIST: Table<Decoder> = "bencode-list" {
        0 => exact(b"l").to(1).then(open_list),
        1 => exact(b"e").accept().then(close).label("end of list"),
        1 => automaton(&VALUE).to(1).label("list element"),
    };

    pub static DICT: Table<Decoder> = "bencode-dict" {
        0 => exact(b"d").to(1).then(open_dict),
        1 => exact(b"e").accept().then(close).label("end of dictionary"),
        1 => automaton(&STRING).to(2).label("key"),
        2 => automaton(&VALUE).to(1).label("value"),
    };

    /// Any single bencode value.
    pub static VALUE: Table<Decoder> = "bencode-value" {
        0 => automaton(&INTEGER).accept().label("integer"),
        0 => automaton(&STRING).accept().label("string"),
        0 => automaton(&LIST).accept().label("list"),
        0 => automaton(&DICT).accept().label("dictionary"),
    };
}

/// Decode one value from the start of `input`.
///
/// Returns the value and the number of bytes it occupied; anything after
/// it is left alone.
///
/// # Example
///
/// ```rust
/// use tablefsm::grammars::bencode::{decode, Value};
///
/// let (value, consumed) = decode(b"l4:spami42ee").unwrap();
/// assert_eq!(consumed, 12);
/// assert_eq!(
///     value,
///     Value::List(vec![Value::Bytes(b"spam".to_vec()), Value::Integer(42)])
/// );
/// ```
pub fn decode(input: &[u8]) -> Result<(Value, usize), RunError> {
    let mut decoder = Decoder::new();
    let consumed = Engine::cloning().run(&VALUE, &mut Cursor::new(input), &mut decoder)?;
    match decoder.into_value() {
        Some(value) => Ok((value, consumed)),
        None => Err(RunError::NotAccepted {
            table: VALUE.name,
            state: 0,
            offset: consumed,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{collect_issues, validate_reachable};

    fn bytes(s: &str) -> Value {
        Value::Bytes(s.as_bytes().to_vec())
    }

    #[test]
    fn tables_are_well_formed() {
        assert_eq!(collect_issues(&validate_reachable(&VALUE)), vec![]);
    }

    #[test]
    fn decodes_negative_integer() {
        assert_eq!(decode(b"i-42e"), Ok((Value::Integer(-42), 5)));
    }

    #[test]
    fn decodes_zero_and_extremes() {
        assert_eq!(decode(b"i0e"), Ok((Value::Integer(0), 3)));
        assert_eq!(
            decode(b"i9223372036854775807e").map(|(v, _)| v),
            Ok(Value::Integer(i64::MAX))
        );
        assert_eq!(
            decode(b"i-9223372036854775808e").map(|(v, _)| v),
            Ok(Value::Integer(i64::MIN))
        );
    }

    #[test]
    fn rejects_malformed_integers() {
        for input in ["i-e", "ie", "i03e", "i-0e", "i12", "i1x2e"] {
            assert!(decode(input.as_bytes()).is_err(), "{input}");
        }
    }

    #[test]
    fn integer_overflow_is_a_mismatch() {
        assert!(decode(b"i9223372036854775808e").is_err());
        assert!(decode(b"i99999999999999999999999e").is_err());
    }

    #[test]
    fn decodes_strings() {
        assert_eq!(decode(b"4:spam"), Ok((bytes("spam"), 6)));
        assert_eq!(decode(b"0:"), Ok((Value::Bytes(Vec::new()), 2)));
        assert_eq!(decode(b"3:a:b"), Ok((bytes("a:b"), 5)));
    }

    #[test]
    fn truncated_string_fails() {
        assert!(decode(b"5:spam").is_err());
        assert!(decode(b"04:spam").is_err());
    }

    #[test]
    fn decodes_nested_containers() {
        let (value, consumed) = decode(b"d3:cow3:moo4:spaml1:a1:bee").unwrap();

        assert_eq!(consumed, 26);
        assert_eq!(value.get(b"cow"), Some(&bytes("moo")));
        assert_eq!(
            value.get(b"spam").and_then(Value::as_list),
            Some(&[bytes("a"), bytes("b")][..])
        );
    }

    #[test]
    fn decodes_empty_containers() {
        assert_eq!(decode(b"le"), Ok((Value::List(vec![]), 2)));
        assert_eq!(decode(b"de"), Ok((Value::Dict(BTreeMap::new()), 2)));
        assert_eq!(
            decode(b"lledee"),
            Ok((
                Value::List(vec![Value::List(vec![]), Value::Dict(BTreeMap::new())]),
                6
            ))
        );
    }

    #[test]
    fn stops_after_one_value() {
        assert_eq!(decode(b"i1ei2e"), Ok((Value::Integer(1), 3)));
    }

    #[test]
    fn unterminated_containers_fail() {
        assert!(decode(b"li1e").is_err());
        assert!(decode(b"d3:key").is_err());
        assert!(decode(b"di1ei2ee").is_err());
    }

    #[test]
    fn encode_produces_canonical_form() {
        let input = b"d4:listli-1e0:e3:numi7ee";
        let (value, _) = decode(input).unwrap();
        assert_eq!(value.encode(), input.to_vec());
    }

    #[test]
    fn display_is_readable() {
        let (value, _) = decode(b"d1:ali1ei2eee").unwrap();
        assert_eq!(value.to_string(), r#"{"a": [1, 2]}"#);
    }

    #[test]
    fn accessors_check_the_variant() {
        assert_eq!(Value::Integer(3).as_integer(), Some(3));
        assert_eq!(Value::Integer(3).as_bytes(), None);
        assert_eq!(bytes("x").as_bytes(), Some(&b"x"[..]));
        assert_eq!(bytes("x").get(b"x"), None);
    }
}
