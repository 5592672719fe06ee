use {
  clap::Parser,
  humantime::Duration,
  kiosk_engine::{CelebrationPolicy, Config},
};

/// Campaign Kiosk
///
/// Polls a campaign data source and keeps a terminal display of the
/// raised amount, the progress towards the target and a rotating
/// selection of donations up to date.
#[derive(Debug, Parser)]
pub struct CliOptions {
  /// Campaign data source endpoint
  #[clap(long, short,
    default_value = "http://localhost:3000/api",
    value_name = "URL")]
  source: String,

  /// How often the data source is polled
  #[clap(long, short,
    default_value = "10s",
    value_name = "DURATION")]
  poll_interval: Duration,

  /// How often one visible donation is swapped for an unseen one
  #[clap(long, short,
    default_value = "8s",
    value_name = "DURATION")]
  rotation_interval: Duration,

  /// Give up on a single poll after this long
  #[clap(long,
    default_value = "5s",
    value_name = "DURATION")]
  request_timeout: Duration,

  /// Number of donation cards on screen, split over two columns
  #[clap(long, short,
    default_value = "8",
    value_name = "COUNT")]
  max_visible: usize,

  /// Time it takes the raised amount to count up to a new value
  #[clap(long,
    default_value = "1s",
    value_name = "DURATION")]
  counter_duration: Duration,

  /// Separator between groups of thousands
  #[clap(long, default_value = ".", value_name = "CHAR")]
  thousands_separator: char,

  /// Celebrate reaching the target only once instead of on every update
  #[clap(long)]
  celebrate_once: bool,
}

impl CliOptions {
  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn request_timeout(&self) -> std::time::Duration {
    self.request_timeout.into()
  }

  pub fn thousands_separator(&self) -> char {
    self.thousands_separator
  }

  pub fn engine_config(&self) -> Config {
    Config {
      poll_interval: self.poll_interval.into(),
      rotation_interval: self.rotation_interval.into(),
      max_visible: self.max_visible,
      counter_duration: self.counter_duration.into(),
      thousands_separator: self.thousands_separator,
      celebration: if self.celebrate_once {
        CelebrationPolicy::OnCrossing
      } else {
        CelebrationPolicy::EveryUpdate
      },
      ..Default::default()
    }
  }
}
