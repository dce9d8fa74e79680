//! Macros for ergonomic table declaration.

/// Declare one or more static transition tables.
///
/// Each row reads `state => guard(..).modifier(..)...`, using the same
/// const constructors as [`Transition::on`](crate::Transition::on). Tables
/// declared in one invocation may refer to each other and to themselves.
///
/// # Example
///
/// ```
/// use tablefsm::{recognize, table};
///
/// table! {
///     /// One or more decimal digits.
///     pub static DIGITS: tablefsm::Table<()> = "digits" {
///         0 => one_of(b"0123456789").to(0).accept(),
///     };
///
///     static DECIMAL: tablefsm::Table<()> = "decimal" {
///         0 => automaton(&DIGITS).to(1),
///         1 => exact(b".").to(2),
///         1 => epsilon().accept(),
///         2 => automaton(&DIGITS).accept(),
///     };
/// }
///
/// assert_eq!(recognize(&DECIMAL, b"3.14 rad"), Ok(4));
/// assert_eq!(recognize(&DECIMAL, b"42;"), Ok(2));
/// ```
#[macro_export]
macro_rules! table {
    (
        $(
            $(#[$meta:meta])*
            $vis:vis static $table:ident : $ty:ty = $name:literal {
                $(
                    $source:literal => $guard:ident ( $($guard_arg:tt)* )
                    $( . $modifier:ident ( $($modifier_arg:tt)* ) )*
                ),* $(,)?
            };
        )+
    ) => {
        $(
            $(#[$meta])*
            $vis static $table: $ty = $crate::Table {
                name: $name,
                transitions: &[
                    $(
                        $crate::Transition::on($source)
                            .$guard($($guard_arg)*)
                            $( .$modifier($($modifier_arg)*) )*
                    ),*
                ],
            };
        )+
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Class, Cursor, Guard, Next, Table};
    use crate::engine::{recognize, run, RunError};

    table! {
        static LETTERS: Table<()> = "letters" {
            0 => one_of(b"abcdefghijklmnopqrstuvwxyz").to(0).accept(),
        };

        static NESTED: Table<()> = "nested" {
            0 => exact(b"(").to(1),
            0 => automaton(&LETTERS).accept(),
            1 => automaton(&NESTED).to(2),
            2 => exact(b")").accept().label("close"),
        };

        static COUNTING: Table<usize> = "counting" {
            0 => exact(b"x").to(0).accept().then(count),
        };
    }

    fn count(_: Cursor<'_>, _: usize, seen: &mut usize, _: Option<&'static ()>) {
        *seen += 1;
    }

    #[test]
    fn macro_rows_keep_declaration_order() {
        let rows: Vec<_> = NESTED.transitions().collect();

        assert_eq!(NESTED.name, "nested");
        assert_eq!(rows.len(), 4);
        assert!(matches!(rows[0].guard, Guard::Exact(b"(")));
        assert_eq!(rows[0].on_success, Next::State(1));
        assert!(matches!(rows[1].guard, Guard::Automaton(_)));
        assert_eq!(rows[3].class, Class::Accept);
        assert_eq!(rows[3].label, Some("close"));
    }

    #[test]
    fn macro_tables_may_recurse() {
        assert_eq!(recognize(&NESTED, b"((abc))!"), Ok(7));
        assert!(matches!(
            recognize(&NESTED, b"((abc)"),
            Err(RunError::NoTransition { .. })
        ));
    }

    #[test]
    fn macro_supports_callbacks_and_context() {
        let mut cursor = Cursor::new(b"xxxy");
        let mut seen = 0;

        assert_eq!(run(&COUNTING, &mut cursor, &mut seen), Ok(3));
        assert_eq!(seen, 3);
        assert_eq!(cursor.rest(), b"y");
    }
}
