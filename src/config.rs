use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Track {
  pub initial_events: usize,
  pub grow_events: usize,
}

impl Default for Track {
  fn default() -> Track {
    Track {
      initial_events: 8192,
      grow_events: 8192,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Merge {
  pub window_events: usize,
  pub block_events: usize,
}

impl Default for Merge {
  fn default() -> Merge {
    Merge {
      window_events: 512,
      block_events: 512,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Smf {
  pub division: u16,
}

impl Default for Smf {
  fn default() -> Smf {
    Smf { division: 480 }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
  pub track: Track,
  pub merge: Merge,
  pub smf: Smf,
}

impl Default for Config {
  fn default() -> Config {
    Config {
      track: Track::default(),
      merge: Merge::default(),
      smf: Smf::default(),
    }
  }
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}

#[cfg(test)]
mod test {

  use super::Config;

  #[test]
  pub fn defaults() {
    let config = Config::default();
    assert_eq!(config.track.initial_events, 8192);
    assert_eq!(config.track.grow_events, 8192);
    assert_eq!(config.merge.window_events, 512);
    assert_eq!(config.merge.block_events, 512);
    assert_eq!(config.smf.division, 480);
  }

  #[test]
  pub fn from_str_partial() {
    let config = Config::from_str(
      r#"
        [merge]
        block_events = 64

        [smf]
        division = 96
      "#,
    )
    .unwrap();
    assert_eq!(config.merge.block_events, 64);
    assert_eq!(config.merge.window_events, 512);
    assert_eq!(config.smf.division, 96);
    assert_eq!(config.track.initial_events, 8192);
  }

  #[test]
  pub fn from_str_invalid() {
    assert!(Config::from_str("not toml at all [").is_err());
  }
}
