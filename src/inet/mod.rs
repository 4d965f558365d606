// Implements an interaction net of Delta, Gamma and Epsilon combinators on a fixed-capacity
// arena, reduced under a gas budget.

mod core;
mod redex;
mod reduce;
mod rules;
mod show;

pub use self::core::*;
pub use self::redex::*;
pub use self::reduce::*;
pub use self::rules::*;
pub use self::show::*;
