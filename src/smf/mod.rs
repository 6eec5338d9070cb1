use failure::{Error, Fail};

use log::{debug, info};

use std::fs::File;
use std::io::{Read, Write};

use crate::config;
use crate::track::Track;

pub mod varlen;

pub mod decoder;
pub mod encoder;

pub const HEADER_MAGIC: &[u8; 4] = b"MThd";
pub const TRACK_MAGIC: &[u8; 4] = b"MTrk";

#[derive(Debug, Fail)]
pub enum SmfError {
  #[fail(display = "not a standard MIDI file: {}", reason)]
  Format { reason: String },

  #[fail(display = "file data ends before the declared chunk length")]
  TruncatedData,

  #[fail(display = "variable-length quantity without a terminator within {} bytes", max_bytes)]
  Decode { max_bytes: usize },
}

///! An in-memory standard MIDI file: a format, a time division in
///! ticks per quarter note, and one event store per track chunk.
pub struct MidiFile {
  pub format: u16,
  pub division: u16,
  pub tracks: Vec<Track>,
}

impl MidiFile {
  pub fn new(format: u16) -> MidiFile {
    MidiFile::with_config(format, &config::Smf::default())
  }

  pub fn with_config(format: u16, config: &config::Smf) -> MidiFile {
    MidiFile {
      format,
      division: config.division,
      tracks: Vec::new(),
    }
  }

  pub fn add_track(&mut self) -> &mut Track {
    self.tracks.push(Track::new());
    self.tracks.last_mut().unwrap()
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    encoder::write_file(self)
  }

  pub fn from_bytes(data: &[u8]) -> Result<MidiFile, SmfError> {
    decoder::Decoder::new(data).decode_file()
  }

  pub fn save<'a, T>(&self, path: T) -> Result<(), Error>
  where
    T: Into<&'a str>,
  {
    let path_str = path.into();
    info!("Saving {} tracks to {} ...", self.tracks.len(), path_str);
    let bytes = self.to_bytes();
    let mut file = File::create(path_str)?;
    file.write_all(&bytes)?;
    debug!("Wrote {} bytes", bytes.len());
    Ok(())
  }

  pub fn load<'a, T>(path: T) -> Result<MidiFile, Error>
  where
    T: Into<&'a str>,
  {
    let path_str = path.into();
    info!("Loading standard MIDI file from {} ...", path_str);
    let mut content = Vec::new();
    let mut file = File::open(path_str)?;
    file.read_to_end(&mut content)?;
    let midi_file = MidiFile::from_bytes(&content)?;
    debug!(
      "Loaded format {} with {} tracks at {} ticks per quarter",
      midi_file.format,
      midi_file.tracks.len(),
      midi_file.division
    );
    Ok(midi_file)
  }
}

#[cfg(test)]
mod test {

  use super::MidiFile;
  use crate::midi::messages::Event;
  use crate::time::Ticks;

  #[test]
  pub fn save_and_load_through_disk() {
    let mut file = MidiFile::new(0);
    {
      let track = file.add_track();
      track.insert(Event::tempo(Ticks::zero(), 120), None);
      track.insert(Event::note_on(Ticks::zero(), 0, 60, 100), None);
      track.insert(Event::note_off(Ticks::new(480), 0, 60, 0), None);
    }

    let mut path = std::env::temp_dir();
    path.push("forte-midi-core-roundtrip.mid");
    let path_str = path.to_str().unwrap();

    file.save(path_str).unwrap();
    let loaded = MidiFile::load(path_str).unwrap();
    std::fs::remove_file(path_str).unwrap();

    assert_eq!(loaded.format, 0);
    assert_eq!(loaded.division, file.division);
    assert_eq!(loaded.tracks.len(), 1);
    // the End-of-Track trailer materializes as a stored event
    assert_eq!(loaded.tracks[0].len(), file.tracks[0].len() + 1);
  }

  #[test]
  pub fn load_missing_file_fails() {
    assert!(MidiFile::load("/nonexistent/forte-midi.mid").is_err());
  }

  #[test]
  pub fn merge_then_save_then_load_round_trip() {
    use crate::merge::Merger;
    use crate::track::Track;

    let mut track_a = Track::new();
    track_a.insert(Event::note_on(Ticks::new(0), 0, 60, 100), None);
    track_a.insert(Event::note_off(Ticks::new(100), 0, 60, 0), None);

    let mut track_b = Track::new();
    track_b.insert(Event::note_on(Ticks::new(50), 0, 64, 100), None);
    track_b.insert(Event::note_off(Ticks::new(100), 0, 64, 0), None);

    let tracks = vec![track_a, track_b];
    let mut merger = Merger::new(tracks.len());

    let mut file = MidiFile::new(0);
    {
      let merged = file.add_track();
      loop {
        let block = merger.merge_block(&tracks);
        if block.is_empty() {
          break;
        }
        for event in block.to_vec() {
          merged.insert(event, None);
        }
      }
    }

    let bytes = file.to_bytes();
    let loaded = MidiFile::from_bytes(&bytes).unwrap();
    let track = &loaded.tracks[0];

    let deltas: Vec<u32> = track.iter().map(|event| u32::from(event.time)).collect();
    assert_eq!(deltas, vec![0, 50, 50, 50, 0]);

    let statuses: Vec<u8> = track.iter().map(|event| event.status).collect();
    assert_eq!(statuses, vec![0x90, 0x90, 0x80, 0x80, 0xff]);

    let keys: Vec<u8> = track
      .iter()
      .take(4)
      .map(|event| event.data[0])
      .collect();
    assert_eq!(keys, vec![60, 64, 60, 64]);
    assert!(track.get(4).unwrap().is_end_of_track());
  }
}
