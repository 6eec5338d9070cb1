pub type U4 = u8;
pub type U7 = u8;
pub type U14 = u16;

#[inline]
pub fn clamp_channel(channel: U4) -> u8 {
  channel & 0x0f
}

#[inline]
pub fn clamp7(value: U7) -> u8 {
  value & 0x7f
}

#[inline]
pub fn u14_msb(value: U14) -> u8 {
  ((value >> 7) & 0x7f) as u8
}

#[inline]
pub fn u14_lsb(value: U14) -> u8 {
  (value & 0x7f) as u8
}
