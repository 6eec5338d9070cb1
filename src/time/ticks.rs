use std::{
  cmp::{min, Ordering},
  ops::{Add, AddAssign, Sub, SubAssign},
};

///! Musical time in ticks. A stored event time is a non-negative delta
///! from the previous event in the same track; inside a merge window the
///! same type carries absolute time from the start of the track.
#[derive(Debug, Eq, Copy, Clone)]
pub struct Ticks(u32);

impl Ticks {
  pub fn new(ticks: u32) -> Ticks {
    Ticks(ticks)
  }

  pub fn zero() -> Ticks {
    Ticks(0)
  }

  pub fn offset(self, delta: i64) -> Ticks {
    let shifted = i64::from(self.0) + delta;
    Ticks(shifted.max(0) as u32)
  }
}

impl Ord for Ticks {
  fn cmp(&self, other: &Ticks) -> Ordering {
    self.0.cmp(&other.0)
  }
}

impl PartialOrd for Ticks {
  fn partial_cmp(&self, other: &Ticks) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for Ticks {
  fn eq(&self, other: &Ticks) -> bool {
    self.0 == other.0
  }
}

impl Add for Ticks {
  type Output = Ticks;
  fn add(self, rhs: Ticks) -> Self {
    Ticks::new(self.0 + rhs.0)
  }
}

impl AddAssign for Ticks {
  fn add_assign(&mut self, rhs: Ticks) {
    *self = *self + rhs;
  }
}

impl Sub for Ticks {
  type Output = Ticks;
  fn sub(self, rhs: Ticks) -> Self {
    // saturates at zero: deltas are never negative
    Ticks::new(self.0 - min(self.0, rhs.0))
  }
}

impl SubAssign for Ticks {
  fn sub_assign(&mut self, rhs: Ticks) {
    *self = *self - rhs;
  }
}

impl From<u32> for Ticks {
  fn from(item: u32) -> Self {
    Ticks(item)
  }
}

impl From<Ticks> for u32 {
  fn from(item: Ticks) -> Self {
    item.0
  }
}

impl From<Ticks> for u64 {
  fn from(item: Ticks) -> Self {
    u64::from(item.0)
  }
}
