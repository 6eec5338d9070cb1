use crate::midi::types::{clamp7, clamp_channel, u14_lsb, u14_msb, U14, U4, U7};
use crate::time::Ticks;

pub const SYSEX: u8 = 0xf0;
pub const EOX: u8 = 0xf7;
pub const META: u8 = 0xff;

pub const META_END_OF_TRACK: u8 = 0x2f;
pub const META_SET_TEMPO: u8 = 0x51;
pub const META_TIME_SIGNATURE: u8 = 0x58;
pub const META_KEY_SIGNATURE: u8 = 0x59;

const MICROS_PER_MINUTE: u32 = 60_000_000;

// Time-Signature payload: MIDI clocks per metronome click and
// 32nd notes per quarter note
const CLOCKS_PER_CLICK: u8 = 24;
const THIRTY_SECONDS_PER_QUARTER: u8 = 8;

#[inline]
pub fn is_channel_status(status: u8) -> bool {
  status >= 0x80 && status <= 0xef
}

#[inline]
pub fn is_system_common_status(status: u8) -> bool {
  status >= 0xf1 && status <= 0xf6
}

#[inline]
pub fn is_realtime_status(status: u8) -> bool {
  status >= 0xf8
}

#[inline]
pub fn channel_of(status: u8) -> U4 {
  status & 0x0f
}

///! Number of data bytes that follow a status byte on the wire.
///! Program-Change and Channel-Pressure take one, the other channel
///! voice classes two; system real-time messages take none.
pub fn data_size(status: u8) -> usize {
  match status & 0xf0 {
    0xc0 | 0xd0 => 1,
    0x80 | 0x90 | 0xa0 | 0xb0 | 0xe0 => 2,
    _ => match status {
      0xf1 | 0xf3 => 1,
      0xf2 => 2,
      _ => 0,
    },
  }
}

pub fn bpm_to_micros(bpm: u16) -> u32 {
  if bpm == 0 {
    MICROS_PER_MINUTE / 120
  } else {
    MICROS_PER_MINUTE / u32::from(bpm)
  }
}

pub fn micros_to_bpm(micros: u32) -> u16 {
  if micros == 0 {
    120
  } else {
    (MICROS_PER_MINUTE / micros) as u16
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
  Channel,
  Meta(u8),
  SysEx,
}

///! One timed MIDI occurrence. `time` is the delta from the previous
///! event in the same track, except inside a merge window where it
///! carries the absolute time instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
  pub time: Ticks,
  pub kind: EventKind,
  pub status: u8,
  pub data: Vec<u8>,
}

impl Event {
  pub fn channel_message(time: Ticks, status: u8, data: Vec<u8>) -> Event {
    Event {
      time,
      kind: EventKind::Channel,
      status,
      data,
    }
  }

  pub fn meta(time: Ticks, meta_type: u8, data: Vec<u8>) -> Event {
    Event {
      time,
      kind: EventKind::Meta(meta_type),
      status: META,
      data,
    }
  }

  fn exclusive(time: Ticks, status: u8, data: Vec<u8>) -> Event {
    Event {
      time,
      kind: EventKind::SysEx,
      status,
      data,
    }
  }

  pub fn note_on(time: Ticks, channel: U4, key: U7, velocity: U7) -> Event {
    Event::channel_message(
      time,
      0x90 | clamp_channel(channel),
      vec![clamp7(key), clamp7(velocity)],
    )
  }

  pub fn note_off(time: Ticks, channel: U4, key: U7, velocity: U7) -> Event {
    Event::channel_message(
      time,
      0x80 | clamp_channel(channel),
      vec![clamp7(key), clamp7(velocity)],
    )
  }

  pub fn poly_aftertouch(time: Ticks, channel: U4, key: U7, pressure: U7) -> Event {
    Event::channel_message(
      time,
      0xa0 | clamp_channel(channel),
      vec![clamp7(key), clamp7(pressure)],
    )
  }

  pub fn control_change(time: Ticks, channel: U4, controller: U7, value: U7) -> Event {
    Event::channel_message(
      time,
      0xb0 | clamp_channel(channel),
      vec![clamp7(controller), clamp7(value)],
    )
  }

  pub fn program_change(time: Ticks, channel: U4, program: U7) -> Event {
    Event::channel_message(time, 0xc0 | clamp_channel(channel), vec![clamp7(program)])
  }

  pub fn channel_aftertouch(time: Ticks, channel: U4, pressure: U7) -> Event {
    Event::channel_message(time, 0xd0 | clamp_channel(channel), vec![clamp7(pressure)])
  }

  pub fn pitch_bend(time: Ticks, channel: U4, value: U14) -> Event {
    Event::channel_message(
      time,
      0xe0 | clamp_channel(channel),
      vec![u14_lsb(value), u14_msb(value)],
    )
  }

  ///! A complete single-packet exclusive message; the End-of-Exclusive
  ///! marker is appended to the payload.
  pub fn sysex(time: Ticks, payload: &[U7]) -> Event {
    let mut data: Vec<u8> = payload.iter().map(|byte| clamp7(*byte)).collect();
    data.push(EOX);
    Event::exclusive(time, SYSEX, data)
  }

  ///! The opening packet of a multi-packet exclusive dump (no terminator).
  pub fn sysex_start(time: Ticks, payload: &[U7]) -> Event {
    let data = payload.iter().map(|byte| clamp7(*byte)).collect();
    Event::exclusive(time, SYSEX, data)
  }

  ///! A middle packet of a multi-packet exclusive dump.
  pub fn sysex_continuation(time: Ticks, payload: &[U7]) -> Event {
    let data = payload.iter().map(|byte| clamp7(*byte)).collect();
    Event::exclusive(time, EOX, data)
  }

  ///! The final packet of a multi-packet exclusive dump.
  pub fn sysex_end(time: Ticks, payload: &[U7]) -> Event {
    let mut data: Vec<u8> = payload.iter().map(|byte| clamp7(*byte)).collect();
    data.push(EOX);
    Event::exclusive(time, EOX, data)
  }

  pub fn tempo(time: Ticks, bpm: u16) -> Event {
    let micros = bpm_to_micros(bpm);
    let data = vec![
      ((micros >> 16) & 0xff) as u8,
      ((micros >> 8) & 0xff) as u8,
      (micros & 0xff) as u8,
    ];
    Event::meta(time, META_SET_TEMPO, data)
  }

  pub fn time_signature(time: Ticks, numerator: u8, denominator: u8) -> Event {
    let log2_denominator = if denominator == 0 {
      0
    } else {
      7 - denominator.leading_zeros() as u8
    };
    Event::meta(
      time,
      META_TIME_SIGNATURE,
      vec![
        numerator,
        log2_denominator,
        CLOCKS_PER_CLICK,
        THIRTY_SECONDS_PER_QUARTER,
      ],
    )
  }

  pub fn key_signature(time: Ticks, sharps_flats: i8, minor: bool) -> Event {
    Event::meta(
      time,
      META_KEY_SIGNATURE,
      vec![sharps_flats as u8, minor as u8],
    )
  }

  pub fn end_of_track(time: Ticks) -> Event {
    Event::meta(time, META_END_OF_TRACK, Vec::new())
  }

  pub fn channel(&self) -> Option<U4> {
    match self.kind {
      EventKind::Channel if is_channel_status(self.status) => Some(channel_of(self.status)),
      _ => None,
    }
  }

  pub fn is_end_of_track(&self) -> bool {
    self.kind == EventKind::Meta(META_END_OF_TRACK)
  }

  ///! Whether this event carries the End-of-Exclusive terminator.
  pub fn ends_exclusive(&self) -> bool {
    match self.kind {
      EventKind::SysEx => self.data.last() == Some(&EOX),
      _ => false,
    }
  }

  ///! Whether this event opens an exclusive dump that later packets
  ///! must finish.
  pub fn opens_exclusive(&self) -> bool {
    self.status == SYSEX && !self.ends_exclusive()
  }

  pub fn with_time(&self, time: Ticks) -> Event {
    Event {
      time,
      ..self.clone()
    }
  }
}
