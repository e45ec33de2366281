mod error;
pub use error::*;

mod parsing;
pub use parsing::*;

mod termination;
pub use termination::*;

mod turn;
pub use turn::*;

mod turn_output;
pub use turn_output::*;
