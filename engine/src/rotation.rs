use {
  crate::{
    config::Error,
    model::{Donation, Side, VisibleSlot},
    timer::RepeatingTimer,
  },
  rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng},
  std::{collections::HashSet, time::Duration},
  tracing::{debug, trace},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  /// No pool has been seen yet.
  Uninitialized,

  /// The pool is empty, the empty-state marker is shown.
  Empty,

  /// The whole pool fits on screen, nothing rotates.
  Static,

  /// The pool exceeds the number of slots and the rotation
  /// timer swaps occupants.
  Rotating,
}

/// Outcome of handing a new pool to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reseed {
  /// Same pool as before, slots and timer are untouched.
  Unchanged,

  /// Slots were rebuilt from scratch. `vacated` lists the slot
  /// identities of the previous layout that no longer exist.
  Rebuilt { vacated: Vec<(Side, usize)> },
}

#[derive(Debug, Clone, Copy)]
struct Slot {
  side: Side,
  position: usize,

  /// Index of the occupant in the pool.
  member: usize,
}

/// Keeps a bounded number of screen slots filled from a larger
/// ranked pool of donations.
///
/// Slots are seeded with the top of the pool, alternating sides by
/// rank. When the pool is larger than the number of slots, every
/// rotation tick replaces the occupant of one random slot with a
/// random pool member that is not on screen. Slot identities never
/// move, only their occupants change.
pub struct RotationEngine<R = StdRng> {
  capacity: usize,
  pool: Vec<Donation>,
  slots: Vec<Slot>,
  phase: Phase,
  timer: RepeatingTimer,
  paused: bool,
  rng: R,
}

impl RotationEngine<StdRng> {
  pub fn new(capacity: usize, interval: Duration) -> Result<Self, Error> {
    Self::with_rng(capacity, interval, StdRng::from_entropy())
  }
}

impl<R: Rng> RotationEngine<R> {
  /// Creates an engine drawing its rotation choices from `rng`.
  ///
  /// Both the number of slots and the rotation interval must be
  /// greater than zero.
  pub fn with_rng(
    capacity: usize,
    interval: Duration,
    rng: R,
  ) -> Result<Self, Error> {
    if capacity == 0 {
      return Err(Error::Zero("max_visible"));
    }

    if interval.is_zero() {
      return Err(Error::Zero("rotation_interval"));
    }

    Ok(Self {
      capacity,
      pool: Vec::new(),
      slots: Vec::new(),
      phase: Phase::Uninitialized,
      timer: RepeatingTimer::new(interval)?,
      paused: false,
      rng,
    })
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn pool(&self) -> &[Donation] {
    &self.pool
  }

  pub fn is_rotating(&self) -> bool {
    self.timer.is_running()
  }

  /// All occupied slots, in the order they were seeded.
  pub fn slots(&self) -> Vec<VisibleSlot> {
    (0..self.slots.len()).map(|i| self.visible(i)).collect()
  }

  /// Number of pool members not currently on screen.
  pub fn available(&self) -> usize {
    self.pool.len() - self.slots.len()
  }

  /// Hands a freshly ranked pool to the engine.
  ///
  /// A pool that differs from the current one in any way rebuilds
  /// the slot layout from scratch, an identical one keeps the current
  /// layout and rotation schedule.
  pub fn reseed(&mut self, pool: Vec<Donation>) -> Reseed {
    if self.phase != Phase::Uninitialized && pool == self.pool {
      return Reseed::Unchanged;
    }

    let previous: Vec<_> =
      self.slots.iter().map(|s| (s.side, s.position)).collect();

    self.pool = pool;
    self.slots = (0..self.pool.len().min(self.capacity))
      .map(|rank| Slot {
        side: Side::for_rank(rank),
        position: rank / 2,
        member: rank,
      })
      .collect();

    self.phase = match self.pool.len() {
      0 => Phase::Empty,
      n if n <= self.capacity => Phase::Static,
      _ => Phase::Rotating,
    };

    if self.phase == Phase::Rotating && !self.paused {
      self.timer.start();
    } else if self.phase != Phase::Rotating {
      self.timer.cancel();
    }

    debug!(
      "rotation reseeded: {:?} with {} of {} donations visible",
      self.phase,
      self.slots.len(),
      self.pool.len()
    );

    // slots fill in rank order, so the new layout is a prefix
    // of the previous one or the other way around.
    let vacated = previous.into_iter().skip(self.slots.len()).collect();
    Reseed::Rebuilt { vacated }
  }

  /// Replaces the occupant of one random slot with a random donation
  /// that is not on screen.
  ///
  /// Returns the repainted slot, or `None` when nothing changed. That
  /// happens outside of the rotating phase and when every pool member
  /// is already visible.
  pub fn rotate(&mut self) -> Option<VisibleSlot> {
    if self.phase != Phase::Rotating {
      trace!("rotation tick ignored in {:?} phase", self.phase);
      return None;
    }

    let occupied: HashSet<_> = self.slots.iter().map(|s| s.member).collect();
    let available: Vec<usize> = (0..self.pool.len())
      .filter(|member| !occupied.contains(member))
      .collect();

    let Some(&member) = available.choose(&mut self.rng) else {
      trace!("rotation exhausted, every donation is visible");
      return None;
    };

    let index = self.rng.gen_range(0..self.slots.len());
    self.slots[index].member = member;
    Some(self.visible(index))
  }

  /// Stops the rotation timer until [`RotationEngine::resume`].
  pub fn pause(&mut self) {
    self.paused = true;
    if self.timer.cancel() {
      debug!("rotation paused");
    }
  }

  /// Restarts the rotation timer if the pool still exceeds capacity.
  pub fn resume(&mut self) {
    self.paused = false;
    if self.phase == Phase::Rotating {
      self.timer.start();
      debug!("rotation resumed");
    }
  }

  /// Completes on the next rotation timer tick. Pends forever while
  /// the timer is not running.
  pub async fn next_tick(&mut self) {
    self.timer.tick().await;
  }

  fn visible(&self, index: usize) -> VisibleSlot {
    let slot = &self.slots[index];
    VisibleSlot {
      side: slot.side,
      position: slot.position,
      donation: self.pool[slot.member].clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use {
    super::{Phase, Reseed, RotationEngine},
    crate::{
      config::Error,
      model::{Donation, Side},
    },
    rand::{rngs::StdRng, SeedableRng},
    std::{collections::HashSet, time::Duration},
  };

  fn pool(size: usize) -> Vec<Donation> {
    (0..size)
      .map(|i| {
        Donation::new(Some(&format!("donor-{i}")), None, 1000 - i as u64)
      })
      .collect()
  }

  fn engine(capacity: usize) -> RotationEngine<StdRng> {
    RotationEngine::with_rng(
      capacity,
      Duration::from_secs(8),
      StdRng::seed_from_u64(7),
    )
    .unwrap()
  }

  fn assert_invariants(engine: &RotationEngine<StdRng>) {
    assert!(engine.slots.len() <= engine.capacity);

    let members: HashSet<_> = engine.slots.iter().map(|s| s.member).collect();
    assert_eq!(members.len(), engine.slots.len(), "donation in two slots");
    assert!(members.iter().all(|m| *m < engine.pool.len()));

    let ids: HashSet<_> =
      engine.slots.iter().map(|s| (s.side, s.position)).collect();
    assert_eq!(ids.len(), engine.slots.len(), "slot identity reused");
  }

  #[tokio::test]
  async fn small_pool_is_static() {
    let mut engine = engine(8);
    assert_eq!(engine.phase(), Phase::Uninitialized);

    engine.reseed(pool(3));
    assert_eq!(engine.phase(), Phase::Static);
    assert!(!engine.is_rotating());
    assert_eq!(engine.available(), 0);

    let before = engine.slots();
    assert_eq!(engine.rotate(), None);
    assert_eq!(engine.slots(), before);

    let layout: Vec<_> = before.iter().map(|s| (s.side, s.position)).collect();
    assert_eq!(layout, [(Side::Left, 0), (Side::Right, 0), (Side::Left, 1)]);
    assert_invariants(&engine);
  }

  #[tokio::test]
  async fn large_pool_rotates_one_slot_per_tick() {
    let mut engine = engine(8);
    engine.reseed(pool(10));
    assert_eq!(engine.phase(), Phase::Rotating);
    assert!(engine.is_rotating());
    assert_eq!(engine.slots().len(), 8);
    assert_eq!(engine.available(), 2);

    let unseen: Vec<_> = engine.pool()[8..].to_vec();
    let before = engine.slots();
    let swapped = engine.rotate().expect("pool exceeds capacity");
    let after = engine.slots();

    assert!(unseen.contains(&swapped.donation));
    let changed: Vec<_> = before
      .iter()
      .zip(after.iter())
      .filter(|(b, a)| b.donation != a.donation)
      .collect();
    assert_eq!(changed.len(), 1);

    let (b, a) = changed[0];
    assert_eq!((b.side, b.position), (a.side, a.position));
    assert_eq!((a.side, a.position), (swapped.side, swapped.position));

    assert_eq!(after.len(), 8);
    assert_eq!(engine.available(), 2);
    assert_invariants(&engine);
  }

  #[tokio::test]
  async fn invariants_hold_over_many_ticks() {
    let mut engine = engine(8);
    engine.reseed(pool(23));
    for _ in 0..500 {
      assert!(engine.rotate().is_some());
      assert_invariants(&engine);
    }
  }

  #[tokio::test]
  async fn duplicate_records_are_distinct_donations() {
    let twin = Donation::new(Some("twin"), None, 10);
    let mut engine = engine(2);
    engine.reseed(vec![twin.clone(), twin.clone(), twin]);

    for _ in 0..50 {
      engine.rotate();
      assert_invariants(&engine);
    }
  }

  #[tokio::test]
  async fn identical_pool_keeps_layout() {
    let mut engine = engine(8);
    engine.reseed(pool(12));
    engine.rotate();
    let layout = engine.slots();

    assert_eq!(engine.reseed(pool(12)), Reseed::Unchanged);
    assert_eq!(engine.slots(), layout);
  }

  #[tokio::test]
  async fn changed_pool_rebuilds_and_vacates() {
    let mut engine = engine(8);
    engine.reseed(pool(12));
    assert!(engine.is_rotating());

    let Reseed::Rebuilt { vacated } = engine.reseed(pool(5)) else {
      panic!("pool changed");
    };
    assert_eq!(engine.phase(), Phase::Static);
    assert!(!engine.is_rotating());
    assert_eq!(vacated, [
      (Side::Right, 2),
      (Side::Left, 3),
      (Side::Right, 3)
    ]);

    let Reseed::Rebuilt { vacated } = engine.reseed(vec![]) else {
      panic!("pool changed");
    };
    assert_eq!(engine.phase(), Phase::Empty);
    assert_eq!(vacated.len(), 5);
    assert!(engine.slots().is_empty());
  }

  #[tokio::test]
  async fn first_empty_pool_enters_empty_phase() {
    let mut engine = engine(8);
    assert_eq!(engine.reseed(vec![]), Reseed::Rebuilt { vacated: vec![] });
    assert_eq!(engine.phase(), Phase::Empty);
    assert_eq!(engine.rotate(), None);
  }

  #[tokio::test]
  async fn pause_and_resume() {
    let mut engine = engine(8);
    engine.reseed(pool(10));
    engine.pause();
    assert!(!engine.is_rotating());

    // pools arriving while paused do not restart the timer
    engine.reseed(pool(11));
    assert_eq!(engine.phase(), Phase::Rotating);
    assert!(!engine.is_rotating());

    engine.resume();
    assert!(engine.is_rotating());

    engine.reseed(pool(4));
    engine.pause();
    engine.resume();
    assert!(!engine.is_rotating());
  }

  #[tokio::test(start_paused = true)]
  async fn timer_drives_ticks() {
    let mut engine = engine(2);
    engine.reseed(pool(5));

    let started = tokio::time::Instant::now();
    engine.next_tick().await;
    assert_eq!(started.elapsed(), Duration::from_secs(8));
  }

  #[test]
  fn rejects_zero_capacity_and_interval() {
    assert_eq!(
      RotationEngine::new(0, Duration::from_secs(1)).err(),
      Some(Error::Zero("max_visible"))
    );
    assert_eq!(
      RotationEngine::new(8, Duration::ZERO).err(),
      Some(Error::Zero("rotation_interval"))
    );
  }
}
