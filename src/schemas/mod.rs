//! Structured replies used by the demo agents, each with its field schema

mod onboarding;
pub use onboarding::*;

mod research;
pub use research::*;

mod sentiment;
pub use sentiment::*;

mod stock;
pub use stock::*;
