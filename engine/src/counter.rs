use {std::time::Duration, tokio::time::Instant};

/// Result of driving one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
  /// The frame belongs to a superseded or finished animation.
  /// Nothing is emitted and the frame callback must not reschedule.
  Stale,

  /// Intermediate value, another frame is needed.
  Tick(u64),

  /// Final value. Always exactly the animation target.
  Done(u64),
}

#[derive(Debug)]
struct Animation {
  from: u64,
  to: u64,
  started: Instant,
  duration: Duration,
}

/// Smoothly counts a displayed number from one value to another.
///
/// Every call to [`AnimatedCounter::animate`] opens a new generation.
/// Frames are requested with the generation they were scheduled for and
/// only frames of the latest generation emit values, so a superseded
/// animation goes quiet immediately instead of fighting the new one.
#[derive(Debug, Default)]
pub struct AnimatedCounter {
  generation: u64,
  displayed: u64,
  active: Option<Animation>,
}

impl AnimatedCounter {
  pub fn new(displayed: u64) -> Self {
    Self {
      generation: 0,
      displayed,
      active: None,
    }
  }

  /// The value most recently emitted.
  pub fn displayed(&self) -> u64 {
    self.displayed
  }

  pub fn is_animating(&self) -> bool {
    self.active.is_some()
  }

  /// Starts counting from `from` to `to` over `duration`.
  ///
  /// If an animation is in flight it is superseded and the new one
  /// starts from whatever is on screen right now, not from `from`.
  /// Returns the generation frames must be requested with.
  pub fn animate(
    &mut self,
    from: u64,
    to: u64,
    duration: Duration,
    now: Instant,
  ) -> u64 {
    let from = match self.active {
      Some(_) => self.displayed,
      None => from,
    };

    self.generation += 1;
    self.active = Some(Animation {
      from,
      to,
      started: now,
      duration,
    });
    self.generation
  }

  /// Computes the value for a frame of `generation` at time `now`.
  pub fn frame(&mut self, generation: u64, now: Instant) -> Frame {
    if generation != self.generation {
      return Frame::Stale;
    }

    let Some(animation) = &self.active else {
      return Frame::Stale;
    };

    let elapsed = now.saturating_duration_since(animation.started);
    let progress = if animation.duration.is_zero() {
      1.0
    } else {
      (elapsed.as_secs_f64() / animation.duration.as_secs_f64()).min(1.0)
    };

    if progress >= 1.0 {
      let to = animation.to;
      self.displayed = to;
      self.active = None;
      return Frame::Done(to);
    }

    let value = interpolate(animation.from, animation.to, progress);
    self.displayed = value;
    Frame::Tick(value)
  }
}

/// Quartic ease-out between `from` and `to`, floored.
fn interpolate(from: u64, to: u64, progress: f64) -> u64 {
  let eased = 1.0 - (1.0 - progress).powi(4);
  let delta = to as f64 - from as f64;
  (from as f64 + delta * eased).floor().max(0.0) as u64
}
