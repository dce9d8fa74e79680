//! Automaton executor: walks a table over the input.

use crate::builder::EngineBuilder;
use crate::context::ContextManager;
use crate::core::matcher::{match_exact, match_one_of};
use crate::core::{Class, Cursor, Guard, Next, StateId, Table, Transition};
use crate::engine::error::RunError;
use crate::engine::report::{Report, Step};
use crate::validate::{collect_issues, validate_reachable};
use chrono::Utc;
use std::fmt;
use tracing::{debug, trace, trace_span, warn};

/// Steps collected along the path being explored.
///
/// Nested attempts record into a fork that is joined only when the attempt
/// commits, so abandoned alternatives never show up in a report.
struct Trail(Option<Vec<Step>>);

impl Trail {
    fn off() -> Self {
        Self(None)
    }

    fn on() -> Self {
        Self(Some(Vec::new()))
    }

    fn fork(&self) -> Self {
        Self(self.0.as_ref().map(|_| Vec::new()))
    }

    fn join(&mut self, nested: Trail) {
        if let (Some(steps), Some(more)) = (&mut self.0, nested.0) {
            steps.extend(more);
        }
    }

    fn record(&mut self, step: impl FnOnce() -> Step) {
        if let Some(steps) = &mut self.0 {
            steps.push(step());
        }
    }

    fn into_steps(self) -> Vec<Step> {
        self.0.unwrap_or_default()
    }
}

/// Table-driven automaton executor.
///
/// An engine holds the policy for isolating attempts from the caller's
/// context; tables and contexts are supplied per run. Runs are
/// synchronous and depth-first: each nested automaton is a recursive call
/// on the same input position.
///
/// # Example
///
/// ```rust
/// use tablefsm::{Cursor, Engine, Table, Transition};
///
/// static DIGITS: Table<Vec<u8>> = Table {
///     name: "digits",
///     transitions: &[Transition::on(0).one_of(b"0123456789").to(0).accept().then(push)],
/// };
///
/// fn push(cursor: Cursor<'_>, _: usize, digits: &mut Vec<u8>, _: Option<&'static ()>) {
///     digits.extend(cursor.peek());
/// }
///
/// let engine = Engine::cloning();
/// let mut cursor = Cursor::new(b"2010 GMT");
/// let mut digits = Vec::new();
///
/// assert_eq!(engine.run(&DIGITS, &mut cursor, &mut digits), Ok(4));
/// assert_eq!(digits, b"2010");
/// assert_eq!(cursor.offset(), 4);
/// ```
pub struct Engine<C> {
    contexts: ContextManager<C>,
    check_tables: bool,
}

impl<C: 'static> Engine<C> {
    /// Create an engine with the given context policy.
    pub fn new(contexts: ContextManager<C>) -> Self {
        Self {
            contexts,
            check_tables: false,
        }
    }

    pub(crate) fn configured(contexts: ContextManager<C>, check_tables: bool) -> Self {
        Self {
            contexts,
            check_tables,
        }
    }

    /// Engine that isolates attempts by cloning the context.
    pub fn cloning() -> Self
    where
        C: Clone,
    {
        Self::new(ContextManager::cloning())
    }

    /// Engine that shares the live context with every attempt.
    ///
    /// See [`ContextManager::shared`] for what this gives up.
    pub fn shared() -> Self {
        Self::new(ContextManager::shared())
    }

    pub fn builder() -> EngineBuilder<C> {
        EngineBuilder::new()
    }

    pub fn contexts(&self) -> &ContextManager<C> {
        &self.contexts
    }

    pub fn checks_tables(&self) -> bool {
        self.check_tables
    }

    /// Run `table` from the cursor.
    ///
    /// On success the cursor is advanced by, and the result holds, the
    /// number of bytes consumed. On failure the cursor is untouched, and so
    /// is the context when the context manager is transactional.
    pub fn run<A: 'static>(
        &self,
        table: &Table<C, A>,
        cursor: &mut Cursor<'_>,
        context: &mut C,
    ) -> Result<usize, RunError> {
        self.execute(table, cursor, context, &mut Trail::off())
    }

    /// Like [`run`](Engine::run), returning the committed path.
    pub fn trace<A: 'static>(
        &self,
        table: &Table<C, A>,
        cursor: &mut Cursor<'_>,
        context: &mut C,
    ) -> Result<Report, RunError> {
        let started_at = Utc::now();
        let mut trail = Trail::on();
        let consumed = self.execute(table, cursor, context, &mut trail)?;
        Ok(Report::new(
            consumed,
            started_at,
            Utc::now(),
            trail.into_steps(),
        ))
    }

    fn execute<A: 'static>(
        &self,
        table: &Table<C, A>,
        cursor: &mut Cursor<'_>,
        context: &mut C,
        trail: &mut Trail,
    ) -> Result<usize, RunError> {
        if self.check_tables {
            let validation = validate_reachable(table);
            if validation.is_failure() {
                return Err(RunError::InvalidTable {
                    table: table.name,
                    issues: collect_issues(&validation),
                });
            }
        }

        let mut attempt = self.contexts.begin(context)?;
        match self.walk(table, *cursor, attempt.context(), 0, trail) {
            Ok(consumed) => {
                attempt.commit();
                cursor.advance(consumed);
                Ok(consumed)
            }
            Err(error) => {
                debug!(table = table.name, %error, "run failed");
                attempt.rollback();
                Err(error)
            }
        }
    }

    /// Drive one table from state 0 until it halts.
    fn walk<A: 'static>(
        &self,
        table: &Table<C, A>,
        start: Cursor<'_>,
        context: &mut C,
        depth: usize,
        trail: &mut Trail,
    ) -> Result<usize, RunError> {
        let _span = trace_span!("automaton", table = table.name, depth).entered();
        let mut cursor = start;
        let mut state: StateId = 0;
        let mut accepted = false;

        'states: loop {
            for transition in table.from_state(state) {
                let Some(matched) = self.evaluate(transition, cursor, context, depth, trail)? else {
                    if let Some(redirect) = transition.on_failure {
                        trace!(depth, from = state, to = redirect, "guard failed, redirecting");
                        state = redirect;
                        continue 'states;
                    }
                    continue;
                };

                if transition.class == Class::Reject {
                    debug!(
                        table = table.name,
                        state,
                        offset = cursor.offset(),
                        label = transition.label.unwrap_or_default(),
                        "reject transition taken"
                    );
                    return Err(RunError::Rejected {
                        table: table.name,
                        state,
                        offset: cursor.offset(),
                        label: transition.label,
                    });
                }

                if let Some(callback) = transition.callback {
                    callback(cursor, matched, context, transition.arg);
                }

                trail.record(|| Step {
                    depth,
                    table: table.name.to_string(),
                    from: state,
                    to: transition.on_success.state(),
                    offset: cursor.offset(),
                    consumed: matched,
                    class: transition.class,
                    label: transition.label.map(str::to_string),
                });
                trace!(
                    depth,
                    from = state,
                    to = ?transition.on_success,
                    offset = cursor.offset(),
                    consumed = matched,
                    label = transition.label.unwrap_or_default(),
                    "transition taken"
                );

                cursor.advance(matched);
                accepted = transition.class == Class::Accept;

                match transition.on_success {
                    Next::State(next) => {
                        state = next;
                        continue 'states;
                    }
                    Next::Halt if accepted => return Ok(cursor.offset() - start.offset()),
                    Next::Halt => {
                        return Err(RunError::NotAccepted {
                            table: table.name,
                            state,
                            offset: cursor.offset(),
                        })
                    }
                }
            }

            // No transition from this state matched.
            return if accepted {
                Ok(cursor.offset() - start.offset())
            } else {
                Err(RunError::NoTransition {
                    table: table.name,
                    state,
                    offset: cursor.offset(),
                })
            };
        }
    }

    /// Evaluate one guard at the cursor, reporting the bytes it consumed.
    ///
    /// `Err` is returned only for failures that must abort every enclosing
    /// run; an ordinary mismatch is `Ok(None)`.
    fn evaluate<A: 'static>(
        &self,
        transition: &Transition<C, A>,
        cursor: Cursor<'_>,
        context: &mut C,
        depth: usize,
        trail: &mut Trail,
    ) -> Result<Option<usize>, RunError> {
        match transition.guard {
            Guard::Exact(literal) => Ok(match_exact(cursor, literal)),
            Guard::OneOf(set) => Ok(match_one_of(cursor, set)),
            Guard::Epsilon => Ok(Some(0)),
            Guard::Automaton(inner) => self.isolated(context, trail, |context, nested| {
                match self.walk(inner, cursor, context, depth + 1, nested) {
                    Ok(consumed) => Ok(Some(consumed)),
                    Err(error) if error.is_fatal() => Err(error),
                    Err(error) => {
                        trace!(depth, %error, "nested automaton did not accept");
                        Ok(None)
                    }
                }
            }),
            Guard::Function(guard) => self.isolated(context, trail, |context, _| {
                Ok(guard(cursor, context, transition.arg).filter(|&consumed| {
                    let fits = consumed <= cursor.remaining();
                    if !fits {
                        warn!(
                            consumed,
                            remaining = cursor.remaining(),
                            label = transition.label.unwrap_or_default(),
                            "function guard reported more bytes than remain"
                        );
                    }
                    fits
                }))
            }),
        }
    }

    /// Run `guard` inside a context attempt, committing only on a match.
    fn isolated<F>(&self, context: &mut C, trail: &mut Trail, guard: F) -> Result<Option<usize>, RunError>
    where
        F: FnOnce(&mut C, &mut Trail) -> Result<Option<usize>, RunError>,
    {
        // Duplication failures were already logged; they count as a mismatch.
        let Ok(mut attempt) = self.contexts.begin(context) else {
            return Ok(None);
        };

        let mut nested = trail.fork();
        match guard(attempt.context(), &mut nested) {
            Ok(Some(consumed)) => {
                attempt.commit();
                trail.join(nested);
                Ok(Some(consumed))
            }
            Ok(None) => {
                attempt.rollback();
                Ok(None)
            }
            Err(error) => {
                attempt.rollback();
                Err(error)
            }
        }
    }
}

impl<C: Clone + 'static> Default for Engine<C> {
    fn default() -> Self {
        Self::cloning()
    }
}

impl<C> fmt::Debug for Engine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("contexts", &self.contexts)
            .field("check_tables", &self.check_tables)
            .finish()
    }
}
