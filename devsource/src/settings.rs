use {
  clap::Parser,
  humantime::Duration,
  std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
  },
};

/// Kiosk Development Data Source
///
/// Serves a campaign snapshot over HTTP in the format the kiosk
/// polls, either from a JSON fixture or from a synthetic campaign
/// that keeps receiving donations, for local dev and test scenarios.
#[derive(Debug, Parser)]
pub struct SystemSettings {
  /// IP address for accepting HTTP requests
  #[clap(long, short,
    value_name = "ADDRESS",
    default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
  ip: IpAddr,

  /// TCP port for accepting HTTP requests
  #[clap(long, short,
    default_value = "3000",
    value_name = "PORT")]
  port: u16,

  /// Serve the campaign stored in this JSON file instead of a
  /// synthetic one
  #[clap(long, short, value_name = "PATH")]
  fixture: Option<PathBuf>,

  /// Fundraising target of the synthetic campaign
  #[clap(long, short,
    default_value = "25000",
    value_name = "AMOUNT")]
  target: u64,

  /// Number of donations the synthetic campaign starts with
  #[clap(long,
    default_value = "12",
    value_name = "COUNT")]
  initial_donations: usize,

  /// A new donation arrives this often, zero freezes the campaign
  #[clap(long, short = 'd',
    value_name = "DURATION",
    default_value = "5s")]
  donation_interval: Duration,

  /// Fraction of requests answered with an injected server error
  #[clap(long,
    default_value = "0",
    value_name = "RATE")]
  failure_rate: f64,
}

impl SystemSettings {
  pub fn http_addr(&self) -> SocketAddr {
    SocketAddr::new(self.ip, self.port)
  }

  pub fn fixture(&self) -> Option<&PathBuf> {
    self.fixture.as_ref()
  }

  pub fn target(&self) -> u64 {
    self.target
  }

  pub fn initial_donations(&self) -> usize {
    self.initial_donations
  }

  /// `None` when the campaign should not grow.
  pub fn donation_interval(&self) -> Option<std::time::Duration> {
    let interval: std::time::Duration = self.donation_interval.into();
    (!interval.is_zero()).then_some(interval)
  }

  pub fn failure_rate(&self) -> anyhow::Result<f64> {
    anyhow::ensure!(
      (0.0..=1.0).contains(&self.failure_rate),
      "failure rate must be between 0 and 1, got {}",
      self.failure_rate
    );
    Ok(self.failure_rate)
  }
}
