//! Table checks using Validation.

use crate::core::table;
use crate::core::{Class, Guard, Next, Table, Transition};
use crate::validate::issues::TableIssue;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of validating one or more tables.
pub type TableValidation = Validation<(), NonEmptyVec<TableIssue>>;

fn check(ok: bool, issue: impl FnOnce() -> TableIssue) -> TableValidation {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(issue())
    }
}

/// Validate a single table, accumulating ALL issues.
pub fn validate<C: 'static, A: 'static>(table: &Table<C, A>) -> TableValidation {
    validate_rows(table.name, table.transitions)
}

/// Validate rows that are not yet part of a table.
pub(crate) fn validate_rows<C: 'static, A: 'static>(
    name: &'static str,
    rows: &[Transition<C, A>],
) -> TableValidation {
    let states = table::states(rows);
    let mut checks: Vec<TableValidation> = Vec::new();

    checks.push(check(states.contains(&0), || {
        TableIssue::MissingInitialState { table: name }
    }));

    checks.push(check(
        table::live(rows).any(|t| t.class == Class::Accept),
        || TableIssue::NoAcceptingTransition { table: name },
    ));

    let trailing = table::trailing(rows);
    checks.push(check(trailing == 0, || {
        TableIssue::UnreachableAfterSentinel {
            table: name,
            count: trailing,
        }
    }));

    for (index, transition) in table::live(rows).enumerate() {
        if let Guard::OneOf(set) = transition.guard {
            checks.push(check(!set.is_empty(), || TableIssue::EmptyCharacterSet {
                table: name,
                index,
            }));
        }

        if transition.class != Class::Normal {
            continue;
        }

        checks.push(match transition.on_success {
            Next::Halt => Validation::fail(TableIssue::HaltWithoutAccept { table: name, index }),
            Next::State(state) => check(states.contains(&state), || TableIssue::DeadEnd {
                table: name,
                index,
                state,
            }),
        });
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Validate `table` and every table it reaches through nested automata.
pub fn validate_reachable<C: 'static, A: 'static>(table: &Table<C, A>) -> TableValidation {
    let mut seen = HashSet::new();
    let mut checks = Vec::new();
    walk(table, &mut seen, &mut checks);
    Validation::all_vec(checks).map(|_| ())
}

fn walk<C: 'static, A: 'static>(table: &Table<C, A>, seen: &mut HashSet<usize>, checks: &mut Vec<TableValidation>) {
    if !seen.insert(table.id()) {
        return;
    }
    checks.push(validate(table));

    for transition in table.transitions() {
        if let Guard::Automaton(inner) = transition.guard {
            walk(inner, seen, checks);
        }
    }
}

/// Flatten a validation outcome into the list of issues it carries.
pub fn collect_issues(validation: &TableValidation) -> Vec<TableIssue> {
    match validation {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
