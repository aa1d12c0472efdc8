//! Command implementations.

pub mod categories;
pub mod run;

pub use self::categories::execute_categories;
pub use self::run::execute_run;
