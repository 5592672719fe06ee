use {
  crate::config::Error,
  std::{future::pending, time::Duration},
  tokio::time::{interval_at, Instant, Interval, MissedTickBehavior},
};

/// A cancelable repeating timer handle.
///
/// Starting the timer always drops the previous schedule first, so there
/// is never more than one live schedule per handle. A cancelled timer
/// never fires; awaiting [`RepeatingTimer::tick`] on it pends forever,
/// which makes it safe to use as a `tokio::select!` branch.
#[derive(Debug)]
pub struct RepeatingTimer {
  period: Duration,
  interval: Option<Interval>,
}

impl RepeatingTimer {
  /// Fails on a zero period, tokio intervals cannot fire that often.
  pub fn new(period: Duration) -> Result<Self, Error> {
    if period.is_zero() {
      return Err(Error::Zero("timer period"));
    }

    Ok(Self {
      period,
      interval: None,
    })
  }

  pub fn is_running(&self) -> bool {
    self.interval.is_some()
  }

  /// (Re)starts the timer, first firing one period from now.
  pub fn start(&mut self) {
    self.start_at(Instant::now() + self.period);
  }

  /// (Re)starts the timer, firing on the next poll.
  pub fn start_now(&mut self) {
    self.start_at(Instant::now());
  }

  fn start_at(&mut self, first: Instant) {
    self.cancel();
    let mut interval = interval_at(first, self.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    self.interval = Some(interval);
  }

  /// Invalidates the current schedule, returns true if it was running.
  pub fn cancel(&mut self) -> bool {
    self.interval.take().is_some()
  }

  /// Completes when the timer fires.
  pub async fn tick(&mut self) -> Instant {
    match self.interval {
      Some(ref mut interval) => interval.tick().await,
      None => pending().await,
    }
  }
}
