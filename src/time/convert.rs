use crate::midi::messages::Event;
use crate::time::Ticks;

///! In-place conversion from delta times to absolute times. The first
///! event's time becomes `start`, each following one the previous
///! absolute time plus its stored delta.
pub fn delta_to_abs(events: &mut [Event], start: Ticks) {
  let mut now = start;
  for (index, event) in events.iter_mut().enumerate() {
    if index > 0 {
      now += event.time;
    }
    event.time = now;
  }
}

///! In-place conversion from absolute times back to delta times. The
///! first event's delta is taken against `preceding`. A delta that would
///! come out negative (out-of-order absolute times) saturates at zero.
pub fn abs_to_delta(events: &mut [Event], preceding: Ticks) {
  let mut last = preceding;
  for event in events.iter_mut() {
    let now = event.time;
    event.time = now - last;
    last = now;
  }
}
