use serde::{Deserialize, Serialize};

/// Campaign progress towards its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
  /// Unrounded, clamped to `0..=100`. Drives the width of the bar.
  pub percentage: f64,

  /// True once the target has been reached.
  pub is_complete: bool,
}

impl Progress {
  /// Computes progress of `amount` towards `target`.
  ///
  /// Any amount raised towards a zero target completes it, nothing
  /// raised towards nothing is 0%.
  pub fn compute(amount: u64, target: u64) -> Self {
    let percentage = if target == 0 {
      if amount > 0 {
        100.0
      } else {
        0.0
      }
    } else {
      (amount as f64 / target as f64 * 100.0).clamp(0.0, 100.0)
    };

    Self {
      percentage,
      is_complete: percentage >= 100.0,
    }
  }

  /// Text label, rounded half-up to a whole percent.
  pub fn label(&self) -> String {
    format!("{}%", (self.percentage + 0.5).floor() as u64)
  }
}

/// When the completion celebration fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CelebrationPolicy {
  /// On every update while the campaign is complete.
  #[default]
  EveryUpdate,

  /// Only on the update that crosses into complete.
  OnCrossing,
}

/// Tracks progress across updates to decide when to celebrate.
#[derive(Debug, Default)]
pub struct ProgressTracker {
  policy: CelebrationPolicy,
  was_complete: bool,
}

impl ProgressTracker {
  pub fn new(policy: CelebrationPolicy) -> Self {
    Self {
      policy,
      was_complete: false,
    }
  }

  /// Computes progress for a new snapshot and whether the
  /// celebration cue should be requested for it.
  pub fn update(&mut self, amount: u64, target: u64) -> (Progress, bool) {
    let progress = Progress::compute(amount, target);
    let celebrate = match self.policy {
      CelebrationPolicy::EveryUpdate => progress.is_complete,
      CelebrationPolicy::OnCrossing => {
        progress.is_complete && !self.was_complete
      }
    };
    self.was_complete = progress.is_complete;
    (progress, celebrate)
  }
}
