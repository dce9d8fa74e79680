//! Builder for tables assembled at runtime.

use crate::builder::error::BuildError;
use crate::core::{Table, Transition};
use crate::validate::collect_issues;
use crate::validate::rules::validate_rows;

/// Builder for constructing tables with a fluent API.
///
/// Static tables are best declared with [`table!`](crate::table). This
/// builder covers tables whose rows are only known at startup, such as
/// keyword sets loaded from configuration. Built tables are validated and
/// then live for the rest of the process, like static ones.
///
/// # Example
///
/// ```rust
/// use tablefsm::builder::TableBuilder;
/// use tablefsm::{recognize, Transition};
///
/// let keywords: [&'static str; 3] = ["GET", "PUT", "POST"];
/// let table = keywords
///     .into_iter()
///     .fold(TableBuilder::<()>::new("method"), |builder, keyword| {
///         builder.transition(Transition::on(0).exact(keyword.as_bytes()).accept())
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(recognize(table, b"POST /"), Ok(4));
/// ```
pub struct TableBuilder<C, A = ()>
where
    C: 'static,
    A: 'static,
{
    name: &'static str,
    transitions: Vec<Transition<C, A>>,
    validate: bool,
}

impl<C: 'static, A: 'static> TableBuilder<C, A> {
    /// Create a new builder for a table called `name`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            transitions: Vec::new(),
            validate: true,
        }
    }

    /// Append a transition.
    pub fn transition(mut self, transition: Transition<C, A>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Append several transitions in order.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition<C, A>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Skip validation on build (optional).
    pub fn unchecked(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Build the table.
    /// Returns an error if the table is empty or fails validation.
    pub fn build(self) -> Result<&'static Table<C, A>, BuildError> {
        if self.transitions.is_empty() {
            return Err(BuildError::NoTransitions(self.name));
        }

        if self.validate {
            let issues = collect_issues(&validate_rows(self.name, &self.transitions));
            if !issues.is_empty() {
                return Err(BuildError::Invalid {
                    table: self.name,
                    issues,
                });
            }
        }

        let table = Table {
            name: self.name,
            transitions: Box::leak(self.transitions.into_boxed_slice()),
        };
        Ok(Box::leak(Box::new(table)))
    }
}
