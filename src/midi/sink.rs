use std::collections::HashMap;

use uuid::Uuid;

use crate::midi::messages::Event;

///! Receiving end of the output pump. Returning `false` rejects the
///! event and halts the pump at the current position (backpressure);
///! the event is offered again on the next pump.
pub trait EventSink {
  fn accept(&mut self, event: &Event) -> bool;
}

pub struct VecSink {
  events: Vec<Event>,
}

impl VecSink {
  pub fn new() -> VecSink {
    VecSink { events: Vec::new() }
  }

  pub fn events(&self) -> &[Event] {
    &self.events
  }

  pub fn take_events(&mut self) -> Vec<Event> {
    std::mem::replace(&mut self.events, Vec::new())
  }
}

impl EventSink for VecSink {
  fn accept(&mut self, event: &Event) -> bool {
    self.events.push(event.clone());
    true
  }
}

impl Default for VecSink {
  fn default() -> VecSink {
    VecSink::new()
  }
}

///! Non-owning handle to a registered sink. Tracks keep these for
///! bookkeeping only; the registry owns the sinks.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct SinkAddress(Uuid);

impl SinkAddress {
  pub fn new() -> SinkAddress {
    SinkAddress(Uuid::new_v4())
  }
}

impl Default for SinkAddress {
  fn default() -> SinkAddress {
    SinkAddress::new()
  }
}

pub struct SinkRegistry {
  sinks: HashMap<SinkAddress, Box<dyn EventSink>>,
}

impl SinkRegistry {
  pub fn new() -> SinkRegistry {
    SinkRegistry {
      sinks: HashMap::new(),
    }
  }

  pub fn add_sink(&mut self, sink: Box<dyn EventSink>) -> SinkAddress {
    let addr = SinkAddress::new();
    self.sinks.insert(addr, sink);
    addr
  }

  pub fn get_sink_mut(&mut self, addr: &SinkAddress) -> Option<&mut Box<dyn EventSink>> {
    self.sinks.get_mut(addr)
  }

  pub fn remove_sink(&mut self, addr: &SinkAddress) -> Option<Box<dyn EventSink>> {
    self.sinks.remove(addr)
  }

  pub fn len(&self) -> usize {
    self.sinks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sinks.is_empty()
  }
}

impl Default for SinkRegistry {
  fn default() -> SinkRegistry {
    SinkRegistry::new()
  }
}

#[cfg(test)]
mod test {

  use super::*;
  use crate::time::Ticks;

  #[test]
  pub fn addresses_are_unique() {
    assert_ne!(SinkAddress::new(), SinkAddress::new());
  }

  #[test]
  pub fn vec_sink_buffers_events() {
    let mut sink = VecSink::new();
    let event = Event::note_on(Ticks::zero(), 0, 60, 100);
    assert!(sink.accept(&event));
    assert_eq!(sink.events(), &[event][..]);
    assert_eq!(sink.take_events().len(), 1);
    assert!(sink.events().is_empty());
  }

  #[test]
  pub fn register_and_dispatch() {
    let mut registry = SinkRegistry::new();
    let addr = registry.add_sink(Box::new(VecSink::new()));
    assert_eq!(registry.len(), 1);

    let event = Event::note_on(Ticks::zero(), 0, 60, 100);
    let sink = registry.get_sink_mut(&addr).unwrap();
    assert!(sink.accept(&event));
  }

  #[test]
  pub fn remove_sink() {
    let mut registry = SinkRegistry::new();
    let addr = registry.add_sink(Box::new(VecSink::new()));
    assert!(registry.remove_sink(&addr).is_some());
    assert!(registry.is_empty());
    assert!(registry.get_sink_mut(&addr).is_none());
  }
}
