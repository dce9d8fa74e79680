//! Transition records: one row of an automaton table.
//!
//! A transition names the state it leaves, the guard that must match,
//! where to go on success (and optionally on failure), how the move is
//! classified, and an optional callback that observes the matched bytes.

use super::cursor::Cursor;
use super::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a state within one table. The initial state is always `0`.
pub type StateId = u32;

/// Function guard: inspects the input (and the context) and reports how
/// many bytes it consumed, or `None` when it does not match.
///
/// The context passed in is attempt-scoped: mutations are kept only if
/// the guard succeeds.
pub type GuardFn<C, A> = fn(Cursor<'_>, &mut C, Option<&'static A>) -> Option<usize>;

/// Post-callback: runs after a guard succeeded, with the cursor positioned
/// at the start of the matched bytes and the number of bytes matched.
pub type Callback<C, A> = fn(Cursor<'_>, usize, &mut C, Option<&'static A>);

/// Condition evaluated to decide whether a transition fires.
pub enum Guard<C, A>
where
    C: 'static,
    A: 'static,
{
    /// The next bytes equal the literal. An empty literal always matches.
    Exact(&'static [u8]),
    /// The next byte is a member of the set.
    OneOf(&'static [u8]),
    /// A nested automaton accepts at the current position.
    Automaton(&'static Table<C, A>),
    /// A caller-supplied function reports the bytes it consumed.
    Function(GuardFn<C, A>),
    /// Always matches, consuming nothing.
    Epsilon,
}

impl<C: 'static, A: 'static> Guard<C, A> {
    /// Whether evaluating this guard involves the context manager.
    pub fn touches_context(&self) -> bool {
        matches!(self, Self::Automaton(_) | Self::Function(_))
    }
}

impl<C: 'static, A: 'static> Clone for Guard<C, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: 'static, A: 'static> Copy for Guard<C, A> {}

impl<C: 'static, A: 'static> fmt::Debug for Guard<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => write!(f, "Exact({:?})", String::from_utf8_lossy(s)),
            Self::OneOf(s) => write!(f, "OneOf({:?})", String::from_utf8_lossy(s)),
            Self::Automaton(table) => write!(f, "Automaton({})", table.name),
            Self::Function(_) => f.write_str("Function"),
            Self::Epsilon => f.write_str("Epsilon"),
        }
    }
}

/// How a taken transition affects the outcome of the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    /// Clears the accept flag.
    #[default]
    Normal,
    /// Sets the accept flag.
    Accept,
    /// Fails the run immediately.
    Reject,
}

/// Where a successful transition leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Next {
    State(StateId),
    Halt,
}

impl Next {
    pub fn state(self) -> Option<StateId> {
        match self {
            Self::State(id) => Some(id),
            Self::Halt => None,
        }
    }
}

/// One row of an automaton table.
///
/// Rows are built with `const` chained constructors so tables can live in
/// `static` items:
///
/// ```rust
/// use tablefsm::{Class, Next, Transition};
///
/// let row: Transition<()> = Transition::on(0).one_of(b"0123456789").to(1).accept();
/// assert_eq!(row.source, Some(0));
/// assert_eq!(row.on_success, Next::State(1));
/// assert_eq!(row.class, Class::Accept);
/// ```
pub struct Transition<C, A = ()>
where
    C: 'static,
    A: 'static,
{
    /// State this transition leaves; `None` marks the table sentinel.
    pub source: Option<StateId>,
    pub guard: Guard<C, A>,
    pub on_success: Next,
    /// State to jump to when the guard fails; `None` keeps scanning.
    pub on_failure: Option<StateId>,
    pub class: Class,
    pub callback: Option<Callback<C, A>>,
    pub arg: Option<&'static A>,
    pub label: Option<&'static str>,
}

impl<C: 'static, A: 'static> Transition<C, A> {
    /// Sentinel record. Scanning stops here even if more rows follow.
    pub const END: Self = Self {
        source: None,
        guard: Guard::Epsilon,
        on_success: Next::Halt,
        on_failure: None,
        class: Class::Normal,
        callback: None,
        arg: None,
        label: None,
    };

    /// Start a transition leaving `state`. Defaults to an epsilon guard
    /// that halts without accepting.
    pub const fn on(state: StateId) -> Self {
        Self {
            source: Some(state),
            ..Self::END
        }
    }

    pub const fn exact(self, literal: &'static [u8]) -> Self {
        Self {
            guard: Guard::Exact(literal),
            ..self
        }
    }

    pub const fn one_of(self, set: &'static [u8]) -> Self {
        Self {
            guard: Guard::OneOf(set),
            ..self
        }
    }

    pub const fn automaton(self, table: &'static Table<C, A>) -> Self {
        Self {
            guard: Guard::Automaton(table),
            ..self
        }
    }

    pub const fn function(self, guard: GuardFn<C, A>) -> Self {
        Self {
            guard: Guard::Function(guard),
            ..self
        }
    }

    pub const fn epsilon(self) -> Self {
        Self {
            guard: Guard::Epsilon,
            ..self
        }
    }

    pub const fn to(self, state: StateId) -> Self {
        Self {
            on_success: Next::State(state),
            ..self
        }
    }

    pub const fn halt(self) -> Self {
        Self {
            on_success: Next::Halt,
            ..self
        }
    }

    /// Jump to `state` if the guard fails instead of scanning on.
    pub const fn or_else(self, state: StateId) -> Self {
        Self {
            on_failure: Some(state),
            ..self
        }
    }

    pub const fn accept(self) -> Self {
        Self {
            class: Class::Accept,
            ..self
        }
    }

    pub const fn reject(self) -> Self {
        Self {
            class: Class::Reject,
            ..self
        }
    }

    pub const fn then(self, callback: Callback<C, A>) -> Self {
        Self {
            callback: Some(callback),
            ..self
        }
    }

    pub const fn arg(self, arg: &'static A) -> Self {
        Self {
            arg: Some(arg),
            ..self
        }
    }

    pub const fn label(self, label: &'static str) -> Self {
        Self {
            label: Some(label),
            ..self
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.source.is_none()
    }
}

impl<C: 'static, A: 'static> Clone for Transition<C, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: 'static, A: 'static> Copy for Transition<C, A> {}

impl<C: 'static, A: 'static> fmt::Debug for Transition<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("guard", &self.guard)
            .field("on_success", &self.on_success)
            .field("on_failure", &self.on_failure)
            .field("class", &self.class)
            .field("callback", &self.callback.is_some())
            .field("label", &self.label)
            .finish()
    }
}
