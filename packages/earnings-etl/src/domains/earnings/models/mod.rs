pub mod earnings_event;

pub use earnings_event::*;
