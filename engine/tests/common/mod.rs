#![allow(dead_code)]

use {
  futures::{future::BoxFuture, FutureExt},
  kiosk_engine::{
    CampaignSnapshot,
    Config,
    DataSource,
    Donation,
    Renderer,
    Side,
    SourceError,
  },
  parking_lot::Mutex,
  reqwest::StatusCode,
  std::{
    collections::{BTreeMap, VecDeque},
    sync::{
      atomic::{AtomicUsize, Ordering},
      Arc,
    },
    time::Duration,
  },
};

/// Everything the engine asked the renderer to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
  Target(String),
  Amount(String),
  Progress(f64, String),
  Celebration,
  Slot(Side, usize, Option<Donation>),
  Empty(Side),
  Error,
}

/// What a screen looks like after replaying all paints.
#[derive(Debug, Default)]
pub struct Screen {
  pub target: Option<String>,
  pub amount: Option<String>,
  pub progress: Option<String>,
  pub slots: BTreeMap<(Side, usize), Donation>,
  pub empty: bool,
  pub error: bool,
}

/// Renderer that records paints into shared memory, so tests can
/// look at the screen while the engine keeps running.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
  paints: Arc<Mutex<Vec<Paint>>>,
}

impl RecordingRenderer {
  pub fn paints(&self) -> Vec<Paint> {
    self.paints.lock().clone()
  }

  /// Returns and forgets everything painted so far.
  pub fn take(&self) -> Vec<Paint> {
    std::mem::take(&mut *self.paints.lock())
  }

  pub fn screen(&self) -> Screen {
    let mut screen = Screen::default();
    for paint in self.paints.lock().iter() {
      match paint {
        Paint::Target(text) => screen.target = Some(text.clone()),
        Paint::Amount(text) => screen.amount = Some(text.clone()),
        Paint::Progress(_, label) => screen.progress = Some(label.clone()),
        Paint::Celebration => {}
        Paint::Slot(side, position, Some(donation)) => {
          screen.slots.insert((*side, *position), donation.clone());
          screen.empty = false;
          screen.error = false;
        }
        Paint::Slot(side, position, None) => {
          screen.slots.remove(&(*side, *position));
        }
        Paint::Empty(_) => {
          screen.empty = true;
          screen.error = false;
        }
        Paint::Error => screen.error = true,
      }
    }
    screen
  }

  fn push(&self, paint: Paint) {
    self.paints.lock().push(paint);
  }
}

impl Renderer for RecordingRenderer {
  fn set_target_text(&mut self, text: &str) {
    self.push(Paint::Target(text.to_owned()));
  }

  fn set_amount_text(&mut self, text: &str) {
    self.push(Paint::Amount(text.to_owned()));
  }

  fn set_progress(&mut self, percentage: f64, label: &str) {
    self.push(Paint::Progress(percentage, label.to_owned()));
  }

  fn trigger_celebration(&mut self) {
    self.push(Paint::Celebration);
  }

  fn render_slot(
    &mut self,
    side: Side,
    position: usize,
    donation: Option<&Donation>,
  ) {
    self.push(Paint::Slot(side, position, donation.cloned()));
  }

  fn show_empty_state(&mut self, side: Side) {
    self.push(Paint::Empty(side));
  }

  fn show_error_state(&mut self) {
    self.push(Paint::Error);
  }
}

/// A single scripted answer of the data source.
#[derive(Debug, Clone)]
pub enum Outcome {
  Ok(CampaignSnapshot),
  Status(u16),
  Malformed,
  Delayed(Duration, Box<Outcome>),
}

/// Data source that plays back a script of outcomes, one per poll.
/// The last outcome repeats once the script runs out.
#[derive(Clone)]
pub struct ScriptedSource {
  script: Arc<Mutex<VecDeque<Outcome>>>,
  calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
  pub fn new(script: impl IntoIterator<Item = Outcome>) -> Self {
    Self {
      script: Arc::new(Mutex::new(script.into_iter().collect())),
      calls: Arc::new(AtomicUsize::new(0)),
    }
  }

  /// Number of polls performed so far.
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  fn next(&self) -> Outcome {
    let mut script = self.script.lock();
    match script.len() {
      0 => panic!("empty script"),
      1 => script[0].clone(),
      _ => script.pop_front().expect("checked length"),
    }
  }
}

fn resolve(
  outcome: Outcome,
) -> BoxFuture<'static, Result<CampaignSnapshot, SourceError>> {
  async move {
    match outcome {
      Outcome::Ok(snapshot) => Ok(snapshot),
      Outcome::Status(code) => Err(SourceError::Status(
        StatusCode::from_u16(code).expect("valid status code"),
      )),
      Outcome::Malformed => Err(SourceError::Malformed(
        serde_json::from_str::<CampaignSnapshot>("{}").unwrap_err(),
      )),
      Outcome::Delayed(delay, outcome) => {
        tokio::time::sleep(delay).await;
        resolve(*outcome).await
      }
    }
  }
  .boxed()
}

impl DataSource for ScriptedSource {
  fn fetch(&self) -> BoxFuture<'_, Result<CampaignSnapshot, SourceError>> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    resolve(self.next())
  }
}

/// `count` named donations with distinct, descending amounts.
pub fn donations(count: usize) -> Vec<Donation> {
  (0..count)
    .map(|i| {
      Donation::new(
        Some(&format!("donor-{i}")),
        Some("Zet 'm op!"),
        (count - i) as u64 * 10,
      )
    })
    .collect()
}

pub fn snapshot(amount: i64, target: u64, count: usize) -> CampaignSnapshot {
  CampaignSnapshot {
    amount,
    target,
    donations: donations(count),
  }
}

pub fn config() -> Config {
  Config {
    poll_interval: Duration::from_secs(10),
    rotation_interval: Duration::from_secs(3),
    max_visible: 8,
    counter_duration: Duration::from_secs(1),
    frame_interval: Duration::from_millis(16),
    ..Default::default()
  }
}
