pub mod ticks;
pub use ticks::Ticks;

pub mod convert;
pub use convert::{abs_to_delta, delta_to_abs};
