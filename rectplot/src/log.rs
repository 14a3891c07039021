//! Debug logging macro.
//!
//! Output goes to stderr so that it never mixes with data written to stdout.

#[macro_export]
macro_rules! log {
    ($($t:tt)*) => (eprintln!($($t)*))
}
