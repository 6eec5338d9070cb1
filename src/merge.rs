use log::debug;

use crate::config;
use crate::midi::messages::Event;
use crate::midi::sink::EventSink;
use crate::time::{abs_to_delta, Ticks};
use crate::track::Track;

///! Per-track merge state: a detached absolute-time window into the
///! track, the cursor within it, and how many events were consumed
///! before the window was captured.
struct MergeState {
  window: Vec<Event>,
  cursor: usize,
  consumed: usize,
  in_sysex: bool,
}

impl MergeState {
  fn new() -> MergeState {
    MergeState {
      window: Vec::new(),
      cursor: 0,
      consumed: 0,
      in_sysex: false,
    }
  }

  fn exhausted(&self) -> bool {
    self.cursor >= self.window.len()
  }

  fn next_time(&self) -> Option<Ticks> {
    self.window.get(self.cursor).map(|event| event.time)
  }
}

///! Merges the pending events of N tracks into one time-ordered,
///! delta-encoded stream, one bounded block at a time.
///!
///! Events inside an exclusive dump are never interleaved with another
///! track's: once a track opens a dump, only that track's events are
///! eligible until it sends the End-of-Exclusive terminator. Ties on
///! absolute time go to the lowest track index.
pub struct Merger {
  states: Vec<MergeState>,
  last_abs: Ticks,
  window_events: usize,
  block_events: usize,
  block: Vec<Event>,
  out_ptr: usize,
}

impl Merger {
  pub fn new(num_tracks: usize) -> Merger {
    Merger::with_config(num_tracks, &config::Merge::default())
  }

  pub fn with_config(num_tracks: usize, config: &config::Merge) -> Merger {
    Merger {
      states: (0..num_tracks).map(|_| MergeState::new()).collect(),
      last_abs: Ticks::zero(),
      window_events: config.window_events.max(1),
      block_events: config.block_events.max(1),
      block: Vec::with_capacity(config.block_events),
      out_ptr: 0,
    }
  }

  pub fn num_tracks(&self) -> usize {
    self.states.len()
  }

  pub fn merge_block(&mut self, tracks: &[Track]) -> &[Event] {
    self.fill_block(tracks);
    &self.block[..]
  }

  ///! Offer pending merged events to the sink, refilling the block at
  ///! most once. A rejected event halts the pump; the next call resumes
  ///! with that same event. Returns the number of accepted events.
  pub fn pump(&mut self, tracks: &[Track], sink: &mut dyn EventSink) -> usize {
    if self.out_ptr >= self.block.len() {
      self.fill_block(tracks);
    }
    let mut accepted = 0;
    while self.out_ptr < self.block.len() {
      if !sink.accept(&self.block[self.out_ptr]) {
        break;
      }
      self.out_ptr += 1;
      accepted += 1;
    }
    accepted
  }

  ///! True once every pumped block is drained and no track has events
  ///! left to refill a window from.
  pub fn is_done(&self, tracks: &[Track]) -> bool {
    self.out_ptr >= self.block.len()
      && self.states.iter().zip(tracks.iter()).all(|(state, track)| {
        state.exhausted() && !Merger::refillable(state, track)
      })
  }

  fn refillable(state: &MergeState, track: &Track) -> bool {
    state.consumed + state.cursor < track.len() && !track.mute() && !track.is_recording()
  }

  fn fill_block(&mut self, tracks: &[Track]) {
    debug_assert_eq!(self.states.len(), tracks.len());

    self.block.clear();
    self.out_ptr = 0;

    for (index, state) in self.states.iter_mut().enumerate() {
      if state.exhausted() {
        state.consumed += state.cursor;
        state.window = tracks[index].absolute_window(state.consumed, self.window_events);
        state.cursor = 0;
        if !state.window.is_empty() {
          debug!(
            "track {}: refilled window with {} events from {}",
            index,
            state.window.len(),
            state.consumed
          );
        }
      }
    }

    while self.block.len() < self.block_events {
      let sysex_owner = self.states.iter().position(|state| state.in_sysex);

      let mut candidate: Option<(usize, Ticks)> = None;
      for (index, state) in self.states.iter().enumerate() {
        if let Some(owner) = sysex_owner {
          if owner != index {
            continue;
          }
        }
        if let Some(time) = state.next_time() {
          let better = match candidate {
            Some((_, best_time)) => time < best_time,
            None => true,
          };
          if better {
            candidate = Some((index, time));
          }
        }
      }

      let index = match candidate {
        Some((index, _)) => index,
        None => break,
      };

      let state = &mut self.states[index];
      let event = state.window[state.cursor].clone();
      state.cursor += 1;

      if event.ends_exclusive() {
        state.in_sysex = false;
      } else if event.opens_exclusive() {
        state.in_sysex = true;
      }

      self.block.push(event);
    }

    if let Some(last) = self.block.last() {
      let block_end = last.time;
      abs_to_delta(&mut self.block, self.last_abs);
      self.last_abs = block_end;
    }
  }
}
