use std::cmp::min;

use crate::config;
use crate::midi::messages::Event;
use crate::midi::sink::SinkAddress;
use crate::time::{delta_to_abs, Ticks};

///! Ordered, growable buffer of delta-timed events with a read cursor.
///!
///! Events at `[out_ptr, len)` are pending. Reading and recording are
///! mutually exclusive; a muted track reads as empty. The buffer grows
///! by a fixed number of events whenever an insert finds it full.
pub struct Track {
  name: String,
  events: Vec<Event>,
  out_ptr: usize,
  mute: bool,
  record: bool,
  grow_events: usize,

  // non-owning bookkeeping handles, never dereferenced here
  file: Option<SinkAddress>,
  output: Option<SinkAddress>,
  input: Option<SinkAddress>,
}

impl Track {
  pub fn new() -> Track {
    Track::with_config(&config::Track::default())
  }

  pub fn with_config(config: &config::Track) -> Track {
    Track {
      name: String::new(),
      events: Vec::with_capacity(config.initial_events),
      out_ptr: 0,
      mute: false,
      record: false,
      grow_events: config.grow_events.max(1),
      file: None,
      output: None,
      input: None,
    }
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn name(&self) -> &str {
    self.name.as_str()
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }

  pub fn pending(&self) -> usize {
    self.events.len() - self.out_ptr
  }

  pub fn capacity(&self) -> usize {
    self.events.capacity()
  }

  pub fn mute(&self) -> bool {
    self.mute
  }

  pub fn set_mute(&mut self, mute: bool) {
    self.mute = mute;
  }

  pub fn is_recording(&self) -> bool {
    self.record
  }

  pub fn set_recording(&mut self, record: bool) {
    self.record = record;
  }

  pub fn insert(&mut self, event: Event, before: Option<usize>) {
    if self.events.len() == self.events.capacity() {
      self.events.reserve(self.grow_events);
    }
    match before {
      Some(index) if index < self.events.len() => self.events.insert(index, event),
      _ => self.events.push(event),
    }
  }

  pub fn delete(&mut self, index: usize) {
    if index < self.events.len() {
      self.events.remove(index);
      self.out_ptr = min(self.out_ptr, self.events.len());
    }
  }

  pub fn get(&self, index: usize) -> Option<&Event> {
    self.events.get(index)
  }

  pub fn iter(&self) -> std::slice::Iter<Event> {
    self.events.iter()
  }

  pub fn set(&mut self, event: Event, index: usize) {
    if index < self.events.len() {
      self.events[index] = event;
    }
  }

  pub fn time(&self, index: usize) -> Ticks {
    self
      .events
      .get(index)
      .map(|event| event.time)
      .unwrap_or_else(Ticks::zero)
  }

  ///! Absolute time of one event: the cumulative deltas through `index`.
  pub fn abs_now(&self, index: usize) -> Ticks {
    if index >= self.events.len() {
      return Ticks::zero();
    }
    let mut total = Ticks::zero();
    for event in &self.events[..=index] {
      total += event.time;
    }
    total
  }

  ///! Pop the next pending event. Yields nothing while the track is
  ///! exhausted, muted, or recording.
  pub fn read(&mut self) -> Option<Event> {
    if self.out_ptr == self.events.len() || self.mute || self.record {
      return None;
    }
    let event = self.events[self.out_ptr].clone();
    self.out_ptr += 1;
    Some(event)
  }

  pub fn write(&mut self, event: Event) {
    if self.record {
      self.insert(event, None);
    }
  }

  pub fn rewind(&mut self) {
    self.out_ptr = 0;
  }

  pub fn flush(&mut self) {
    self.events.clear();
    self.out_ptr = 0;
  }

  pub fn slide(&mut self, index: usize, offset: i64) {
    if let Some(event) = self.events.get_mut(index) {
      event.time = event.time.offset(offset);
    }
  }

  ///! Up to `max` events starting at `start`, copied out with their times
  ///! converted to absolute. Empty while muted or recording. The window
  ///! is a detached copy; later edits to the track do not affect it.
  pub fn absolute_window(&self, start: usize, max: usize) -> Vec<Event> {
    if start >= self.events.len() || self.mute || self.record {
      return Vec::new();
    }
    let count = min(self.events.len() - start, max);
    let mut window = self.events[start..start + count].to_vec();
    delta_to_abs(&mut window, self.abs_now(start));
    window
  }

  pub fn attach_file(&mut self, addr: SinkAddress) {
    self.file = Some(addr);
  }

  pub fn attach_output(&mut self, addr: SinkAddress) {
    self.output = Some(addr);
  }

  pub fn attach_input(&mut self, addr: SinkAddress) {
    self.input = Some(addr);
  }

  pub fn file(&self) -> Option<SinkAddress> {
    self.file
  }

  pub fn output(&self) -> Option<SinkAddress> {
    self.output
  }

  pub fn input(&self) -> Option<SinkAddress> {
    self.input
  }

  pub fn detach(&mut self) {
    self.file = None;
    self.output = None;
    self.input = None;
    self.record = false;
  }
}

impl Default for Track {
  fn default() -> Track {
    Track::new()
  }
}
