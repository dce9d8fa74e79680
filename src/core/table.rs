//! Immutable transition tables.

use super::transition::{StateId, Transition};
use std::collections::BTreeSet;
use std::fmt;

/// An ordered set of transition records defining one grammar rule.
///
/// Tables are plain data, usually declared as `static` items (see the
/// [`table!`](crate::table) macro) so that they can reference each other,
/// including recursively. Scanning stops at the end of `transitions` or at
/// the first [`Transition::END`] record, whichever comes first.
///
/// # Example
///
/// ```rust
/// use tablefsm::{Table, Transition};
///
/// static DIGITS: Table<()> = Table {
///     name: "digits",
///     transitions: &[
///         Transition::on(0).one_of(b"0123456789").to(0).accept(),
///         Transition::END,
///     ],
/// };
///
/// assert_eq!(DIGITS.len(), 1);
/// assert_eq!(DIGITS.from_state(0).count(), 1);
/// ```
pub struct Table<C, A = ()>
where
    C: 'static,
    A: 'static,
{
    pub name: &'static str,
    pub transitions: &'static [Transition<C, A>],
}

impl<C: 'static, A: 'static> Table<C, A> {
    /// Records up to (not including) the sentinel.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition<C, A>> + '_ {
        live(self.transitions)
    }

    /// Records leaving `state`, in declaration order.
    pub fn from_state(&self, state: StateId) -> impl Iterator<Item = &Transition<C, A>> + '_ {
        self.transitions()
            .filter(move |t| t.source == Some(state))
    }

    /// Every state that has at least one outgoing record.
    pub fn states(&self) -> BTreeSet<StateId> {
        states(self.transitions)
    }

    /// Number of live records (before the sentinel).
    pub fn len(&self) -> usize {
        self.transitions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records declared after the first sentinel; they are never scanned.
    pub(crate) fn trailing(&self) -> usize {
        trailing(self.transitions)
    }

    /// Identity of a table, used to visit each table once when walking
    /// a grammar.
    pub(crate) fn id(&self) -> usize {
        self as *const Self as usize
    }
}

pub(crate) fn live<C: 'static, A: 'static>(
    rows: &[Transition<C, A>],
) -> impl Iterator<Item = &Transition<C, A>> + '_ {
    rows.iter().take_while(|t| !t.is_sentinel())
}

pub(crate) fn states<C: 'static, A: 'static>(rows: &[Transition<C, A>]) -> BTreeSet<StateId> {
    live(rows).filter_map(|t| t.source).collect()
}

pub(crate) fn trailing<C: 'static, A: 'static>(rows: &[Transition<C, A>]) -> usize {
    match rows.iter().position(|t| t.is_sentinel()) {
        Some(end) => rows[end + 1..].iter().filter(|t| !t.is_sentinel()).count(),
        None => 0,
    }
}

impl<C: 'static, A: 'static> fmt::Debug for Table<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("transitions", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SAMPLE: Table<()> = Table {
        name: "sample",
        transitions: &[
            Transition::on(0).exact(b"a").to(1),
            Transition::on(0).exact(b"b").to(2),
            Transition::on(1).exact(b"c").accept(),
            Transition::END,
            Transition::on(2).exact(b"never"),
        ],
    };

    static RECURSIVE: Table<()> = Table {
        name: "recursive",
        transitions: &[
            Transition::on(0).exact(b"(").to(1),
            Transition::on(1).automaton(&RECURSIVE).to(2),
            Transition::on(1).exact(b")").accept(),
            Transition::on(2).exact(b")").accept(),
        ],
    };

    #[test]
    fn scanning_stops_at_sentinel() {
        assert_eq!(SAMPLE.len(), 3);
        assert_eq!(SAMPLE.trailing(), 1);
        assert!(!SAMPLE.is_empty());
    }

    #[test]
    fn from_state_preserves_declaration_order() {
        let rows: Vec<_> = SAMPLE.from_state(0).collect();
        assert_eq!(rows.len(), 2);
        assert!(matches!(rows[0].guard, crate::core::Guard::Exact(b"a")));
        assert!(matches!(rows[1].guard, crate::core::Guard::Exact(b"b")));
    }

    #[test]
    fn states_lists_sources() {
        let states: Vec<_> = SAMPLE.states().into_iter().collect();
        assert_eq!(states, vec![0, 1]);
    }

    #[test]
    fn tables_may_reference_themselves() {
        let nested = RECURSIVE
            .transitions()
            .find_map(|t| match t.guard {
                crate::core::Guard::Automaton(table) => Some(table),
                _ => None,
            })
            .unwrap();
        assert_eq!(nested.id(), RECURSIVE.id());
        assert_eq!(RECURSIVE.trailing(), 0);
    }
}
