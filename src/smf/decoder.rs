use log::debug;

use crate::midi::messages::{self, Event, EventKind, EOX, META, SYSEX};
use crate::smf::varlen;
use crate::smf::{MidiFile, SmfError, HEADER_MAGIC, TRACK_MAGIC};
use crate::time::Ticks;
use crate::track::Track;

pub struct Decoder<'a> {
  pos: usize,
  data: &'a [u8],
}

impl<'a> Decoder<'a> {
  pub fn new(data: &'a [u8]) -> Decoder<'a> {
    Decoder { pos: 0, data }
  }

  fn next_u8(&mut self) -> Result<u8, SmfError> {
    let byte = *self.data.get(self.pos).ok_or(SmfError::TruncatedData)?;
    self.pos += 1;
    Ok(byte)
  }

  fn peek_u8(&self) -> Result<u8, SmfError> {
    self.data.get(self.pos).copied().ok_or(SmfError::TruncatedData)
  }

  fn next_u16(&mut self) -> Result<u16, SmfError> {
    Ok((u16::from(self.next_u8()?) << 8) | u16::from(self.next_u8()?))
  }

  fn next_u32(&mut self) -> Result<u32, SmfError> {
    Ok((u32::from(self.next_u16()?) << 16) | u32::from(self.next_u16()?))
  }

  fn take(&mut self, count: usize) -> Result<&'a [u8], SmfError> {
    let end = self.pos.checked_add(count).ok_or(SmfError::TruncatedData)?;
    if end > self.data.len() {
      return Err(SmfError::TruncatedData);
    }
    let bytes = &self.data[self.pos..end];
    self.pos = end;
    Ok(bytes)
  }

  fn expect_magic(&mut self, magic: &[u8; 4], what: &str) -> Result<(), SmfError> {
    let bytes = self.take(4).map_err(|_| SmfError::Format {
      reason: format!("missing {} chunk", what),
    })?;
    if bytes != magic {
      return Err(SmfError::Format {
        reason: format!("missing {} chunk", what),
      });
    }
    Ok(())
  }

  pub fn decode_file(mut self) -> Result<MidiFile, SmfError> {
    self.expect_magic(HEADER_MAGIC, "MThd")?;

    let header_length = self.next_u32()?;
    if header_length != 6 {
      return Err(SmfError::Format {
        reason: format!("unexpected header length {}", header_length),
      });
    }

    let format = self.next_u16()?;
    if format > 1 {
      return Err(SmfError::Format {
        reason: format!("unsupported format {}", format),
      });
    }

    let num_tracks = self.next_u16()?;
    let division = self.next_u16()?;

    let mut file = MidiFile {
      format,
      division,
      tracks: Vec::new(),
    };

    for index in 0..num_tracks {
      let track = self.decode_track()?;
      debug!("track {}: decoded {} events", index, track.len());
      file.tracks.push(track);
    }

    Ok(file)
  }

  fn decode_track(&mut self) -> Result<Track, SmfError> {
    self.expect_magic(TRACK_MAGIC, "MTrk")?;

    let length = self.next_u32()? as usize;
    let end = self.pos.checked_add(length).ok_or(SmfError::TruncatedData)?;
    if end > self.data.len() {
      return Err(SmfError::TruncatedData);
    }

    let mut track = Track::new();
    let mut running_status: Option<u8> = None;

    while self.pos < end {
      let delta = varlen::decode(self.data, &mut self.pos)?;

      let first = self.peek_u8()?;
      let status = if first & 0x80 != 0 {
        self.pos += 1;
        running_status = Some(first);
        first
      } else {
        // running status: the byte just seen is the first data byte
        running_status.ok_or_else(|| SmfError::Format {
          reason: "data byte with no running status".to_string(),
        })?
      };

      let event = if status == META {
        let meta_type = self.next_u8()?;
        let size = varlen::decode(self.data, &mut self.pos)? as usize;
        let payload = self.take(size)?.to_vec();
        Event::meta(Ticks::new(delta), meta_type, payload)
      } else if status == SYSEX || status == EOX {
        let payload = self.take_through_eox(end)?;
        Event {
          time: Ticks::new(delta),
          kind: EventKind::SysEx,
          status,
          data: payload,
        }
      } else {
        let size = messages::data_size(status);
        let payload = self.take(size)?.to_vec();
        Event::channel_message(Ticks::new(delta), status, payload)
      };

      track.insert(event, None);
    }

    if self.pos != end {
      return Err(SmfError::Format {
        reason: "track events overrun the declared chunk length".to_string(),
      });
    }

    Ok(track)
  }

  ///! Exclusive payload bytes up to and including the End-of-Exclusive
  ///! marker, bounded by the current chunk.
  fn take_through_eox(&mut self, chunk_end: usize) -> Result<Vec<u8>, SmfError> {
    let span = &self.data[self.pos..chunk_end];
    match span.iter().position(|byte| *byte == EOX) {
      Some(index) => {
        let payload = span[..=index].to_vec();
        self.pos += index + 1;
        Ok(payload)
      }
      None => Err(SmfError::TruncatedData),
    }
  }
}
