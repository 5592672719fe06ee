use {
  crate::progress::CelebrationPolicy,
  std::time::Duration,
  thiserror::Error,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("{0} must be greater than zero")]
  Zero(&'static str),
}

/// Engine wide configuration.
#[derive(Debug, Clone)]
pub struct Config {
  /// How often the data source is polled.
  pub poll_interval: Duration,

  /// How often one visible donation is swapped for an unseen one.
  /// Independent of the poll interval.
  pub rotation_interval: Duration,

  /// Number of donation slots on screen, split across both sides.
  pub max_visible: usize,

  /// Time it takes the raised amount to count up to a new value.
  pub counter_duration: Duration,

  /// Pace of animation frames while the counter is moving.
  pub frame_interval: Duration,

  /// Separator between groups of thousands in amount texts.
  pub thousands_separator: char,

  /// When to fire the completion celebration.
  pub celebration: CelebrationPolicy,
}

impl Config {
  pub fn validate(&self) -> Result<(), Error> {
    if self.poll_interval.is_zero() {
      return Err(Error::Zero("poll_interval"));
    }

    if self.rotation_interval.is_zero() {
      return Err(Error::Zero("rotation_interval"));
    }

    if self.frame_interval.is_zero() {
      return Err(Error::Zero("frame_interval"));
    }

    if self.max_visible == 0 {
      return Err(Error::Zero("max_visible"));
    }

    Ok(())
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      poll_interval: Duration::from_secs(10),
      rotation_interval: Duration::from_secs(8),
      max_visible: 8,
      counter_duration: Duration::from_millis(1000),
      frame_interval: Duration::from_millis(16), // ~60fps
      thousands_separator: '.',
      celebration: CelebrationPolicy::EveryUpdate,
    }
  }
}
