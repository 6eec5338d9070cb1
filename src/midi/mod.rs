pub mod messages;
pub use messages::{Event, EventKind};

pub mod sink;
pub use sink::{EventSink, SinkAddress, SinkRegistry, VecSink};

pub mod types;
