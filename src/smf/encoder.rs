use crate::midi::messages::{Event, EventKind, META, META_END_OF_TRACK};
use crate::smf::varlen;
use crate::smf::{MidiFile, HEADER_MAGIC, TRACK_MAGIC};
use crate::track::Track;

const HEADER_LENGTH: u32 = 6;

fn push_u32(value: u32, out: &mut Vec<u8>) {
  out.extend_from_slice(&value.to_be_bytes());
}

fn push_u16(value: u16, out: &mut Vec<u8>) {
  out.extend_from_slice(&value.to_be_bytes());
}

pub fn write_file(file: &MidiFile) -> Vec<u8> {
  let mut out = Vec::new();

  out.extend_from_slice(HEADER_MAGIC);
  push_u32(HEADER_LENGTH, &mut out);
  push_u16(file.format, &mut out);
  push_u16(file.tracks.len() as u16, &mut out);
  push_u16(file.division, &mut out);

  for track in file.tracks.iter() {
    write_track(track, &mut out);
  }

  out
}

pub fn write_track(track: &Track, out: &mut Vec<u8>) {
  let mut body = Vec::new();

  for event in track.iter() {
    write_event(event, &mut body);
  }

  // mandatory End-of-Track trailer, unless the caller stored one
  let terminated = track
    .iter()
    .last()
    .map(Event::is_end_of_track)
    .unwrap_or(false);
  if !terminated {
    varlen::encode(0, &mut body);
    body.push(META);
    body.push(META_END_OF_TRACK);
    varlen::encode(0, &mut body);
  }

  out.extend_from_slice(TRACK_MAGIC);
  push_u32(body.len() as u32, out);
  out.extend_from_slice(&body);
}

fn write_event(event: &Event, body: &mut Vec<u8>) {
  varlen::encode(u32::from(event.time), body);
  match event.kind {
    EventKind::Meta(meta_type) => {
      body.push(META);
      body.push(meta_type);
      varlen::encode(event.data.len() as u32, body);
      body.extend_from_slice(&event.data);
    }
    EventKind::Channel | EventKind::SysEx => {
      body.push(event.status);
      body.extend_from_slice(&event.data);
    }
  }
}

#[cfg(test)]
mod test {

  use super::{write_file, write_track};
  use crate::midi::messages::Event;
  use crate::smf::MidiFile;
  use crate::time::Ticks;
  use crate::track::Track;

  #[test]
  pub fn header_bytes() {
    let mut file = MidiFile::new(1);
    file.add_track();
    let bytes = write_file(&file);
    // "MThd", length 6, format 1, one track, 480 ticks per quarter
    assert_eq!(
      &bytes[..14],
      &[
        0x4d, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x01, 0x01, 0xe0
      ]
    );
  }

  #[test]
  pub fn empty_track_is_just_the_trailer() {
    let track = Track::new();
    let mut out = Vec::new();
    write_track(&track, &mut out);
    assert_eq!(
      out,
      vec![0x4d, 0x54, 0x72, 0x6b, 0x00, 0x00, 0x00, 0x04, 0x00, 0xff, 0x2f, 0x00]
    );
  }

  #[test]
  pub fn note_pair_track_bytes() {
    let mut track = Track::new();
    track.insert(Event::note_on(Ticks::zero(), 0, 60, 100), None);
    track.insert(Event::note_off(Ticks::new(96), 0, 60, 0), None);

    let mut out = Vec::new();
    write_track(&track, &mut out);
    assert_eq!(
      out,
      vec![
        0x4d, 0x54, 0x72, 0x6b, // MTrk
        0x00, 0x00, 0x00, 0x0c, // body length 12
        0x00, 0x90, 0x3c, 0x64, // delta 0, note on C4
        0x60, 0x80, 0x3c, 0x00, // delta 96, note off C4
        0x00, 0xff, 0x2f, 0x00, // End-of-Track
      ]
    );
  }

  #[test]
  pub fn tempo_meta_bytes() {
    let mut track = Track::new();
    track.insert(Event::tempo(Ticks::zero(), 120), None);

    let mut out = Vec::new();
    write_track(&track, &mut out);
    assert_eq!(
      out,
      vec![
        0x4d, 0x54, 0x72, 0x6b, 0x00, 0x00, 0x00, 0x0b, //
        0x00, 0xff, 0x51, 0x03, 0x07, 0xa1, 0x20, // Set-Tempo 500000
        0x00, 0xff, 0x2f, 0x00, // End-of-Track
      ]
    );
  }

  #[test]
  pub fn explicit_end_of_track_is_not_doubled() {
    let mut track = Track::new();
    track.insert(Event::note_on(Ticks::zero(), 0, 60, 100), None);
    track.insert(Event::end_of_track(Ticks::zero()), None);

    let mut out = Vec::new();
    write_track(&track, &mut out);
    // 4 bytes note on + 4 bytes End-of-Track
    assert_eq!(out[7], 0x08);
    assert_eq!(&out[out.len() - 4..], &[0x00, 0xff, 0x2f, 0x00]);
  }

  #[test]
  pub fn sysex_payload_written_raw() {
    let mut track = Track::new();
    track.insert(Event::sysex(Ticks::new(5), &[0x41, 0x10, 0x42]), None);

    let mut out = Vec::new();
    write_track(&track, &mut out);
    let body = &out[8..];
    assert_eq!(&body[..6], &[0x05, 0xf0, 0x41, 0x10, 0x42, 0xf7]);
  }

  #[test]
  pub fn large_delta_uses_multi_byte_varlen() {
    let mut track = Track::new();
    track.insert(Event::note_on(Ticks::new(128), 0, 60, 100), None);

    let mut out = Vec::new();
    write_track(&track, &mut out);
    let body = &out[8..];
    assert_eq!(&body[..5], &[0x81, 0x00, 0x90, 0x3c, 0x64]);
  }
}
