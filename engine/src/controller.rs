use {
  crate::{
    config::{self, Config},
    counter::{AnimatedCounter, Frame},
    format::group_thousands,
    model::{CampaignSnapshot, Side},
    progress::ProgressTracker,
    rank::rank,
    render::Renderer,
    rotation::{Phase, Reseed, RotationEngine},
    source::{self, DataSource},
    timer::RepeatingTimer,
  },
  rand::{rngs::StdRng, Rng, SeedableRng},
  std::sync::Arc,
  tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    task::{JoinError, JoinHandle},
    time::Instant,
  },
  tracing::{debug, info, warn},
};

/// Host commands, sent to the runloop through [`SyncHandle`].
#[derive(Debug)]
enum Command {
  /// Resume polling after [`Command::Stop`].
  Start,

  /// Halt polling and rotation. Fetches already in flight
  /// still get applied when they complete.
  Stop,

  /// The display became visible: poll now and resume rotation.
  Visible,

  /// The display got hidden: pause rotation, keep polling.
  Hidden,

  /// Terminate the runloop and hand back the renderer.
  Dispose,
}

/// A completed poll, sent back by the detached task that ran it.
struct Fetched {
  seq: u64,
  result: Result<CampaignSnapshot, source::Error>,
}

/// Keeps a kiosk display in sync with a campaign data source.
///
/// Owns all mutable display state: the last rendered amount and texts,
/// the donation rotation, the amount animation and every timer. All of
/// it is driven from a single runloop task, so none of it needs locks.
pub struct SyncController<S, R, G = StdRng> {
  config: Config,
  source: Arc<S>,
  renderer: R,

  progress: ProgressTracker,
  counter: AnimatedCounter,
  rotation: RotationEngine<G>,

  poll_timer: RepeatingTimer,
  frame_timer: RepeatingTimer,

  /// Animation generation the next frame is scheduled for.
  pending_frame: Option<u64>,

  /// Amount of the most recently applied snapshot.
  previous_amount: u64,
  target_text: Option<String>,
  amount_text: Option<String>,

  /// True once any snapshot has been painted. Failures after that
  /// keep the stale display instead of showing an error.
  ever_rendered: bool,
  showing_error: bool,

  polling: bool,
  visible: bool,

  /// Sequence number of the most recently issued poll.
  issued: u64,

  /// Highest sequence number of a completed poll.
  completed: u64,

  fetchtx: UnboundedSender<Fetched>,
  fetchrx: UnboundedReceiver<Fetched>,
}

impl<S, R> SyncController<S, R, StdRng>
where
  S: DataSource,
  R: Renderer,
{
  pub fn new(
    config: Config,
    source: S,
    renderer: R,
  ) -> Result<Self, config::Error> {
    Self::with_rng(config, source, renderer, StdRng::from_entropy())
  }
}

impl<S, R, G> SyncController<S, R, G>
where
  S: DataSource,
  R: Renderer,
  G: Rng + Send + 'static,
{
  /// Creates a controller whose donation rotation draws from `rng`.
  pub fn with_rng(
    config: Config,
    source: S,
    renderer: R,
    rng: G,
  ) -> Result<Self, config::Error> {
    config.validate()?;
    let (fetchtx, fetchrx) = unbounded_channel();

    Ok(Self {
      progress: ProgressTracker::new(config.celebration),
      counter: AnimatedCounter::new(0),
      rotation: RotationEngine::with_rng(
        config.max_visible,
        config.rotation_interval,
        rng,
      )?,
      poll_timer: RepeatingTimer::new(config.poll_interval)?,
      frame_timer: RepeatingTimer::new(config.frame_interval)?,
      pending_frame: None,
      previous_amount: 0,
      target_text: None,
      amount_text: None,
      ever_rendered: false,
      showing_error: false,
      polling: false,
      visible: true,
      issued: 0,
      completed: 0,
      source: Arc::new(source),
      renderer,
      config,
      fetchtx,
      fetchrx,
    })
  }

  /// Moves the controller onto its own runloop task and begins
  /// polling right away.
  ///
  /// The runloop ends on [`SyncHandle::dispose`] or once the handle
  /// is dropped. Must be called from within a tokio runtime.
  pub fn start(mut self) -> SyncHandle<R> {
    let (cmdtx, cmdrx) = unbounded_channel();
    self.start_polling();
    SyncHandle {
      cmdtx,
      runloop: tokio::spawn(self.runloop(cmdrx)),
    }
  }

  async fn runloop(mut self, mut cmdrx: UnboundedReceiver<Command>) -> R {
    info!(
      "sync controller started: polling every {:?}, rotating every {:?}",
      self.config.poll_interval, self.config.rotation_interval
    );

    loop {
      tokio::select! {
        _ = self.poll_timer.tick() => self.poll(),
        _ = self.rotation.next_tick() => self.rotate(),
        _ = self.frame_timer.tick() => self.frame(),
        Some(Fetched { seq, result }) = self.fetchrx.recv() => {
          self.complete_poll(seq, result);
        }
        command = cmdrx.recv() => match command {
          Some(command) => {
            if !self.handle(command) {
              break;
            }
          }
          None => {
            info!("sync handle dropped without dispose");
            break;
          }
        }
      }
    }

    self.poll_timer.cancel();
    self.frame_timer.cancel();
    self.rotation.pause();
    info!("sync controller disposed");
    self.renderer
  }

  /// Applies a runloop command, returns false once the
  /// runloop should terminate.
  fn handle(&mut self, command: Command) -> bool {
    match command {
      Command::Start => {
        if !self.polling {
          info!("polling resumed");
          self.start_polling();
        }
      }
      Command::Stop => {
        info!("polling stopped");
        self.polling = false;
        self.poll_timer.cancel();
        self.rotation.pause();
      }
      Command::Visible => {
        self.visible = true;
        if self.polling {
          debug!("display visible, fetching fresh data");
          // restarting the schedule fires an immediate poll
          self.poll_timer.start_now();
          self.rotation.resume();
        }
      }
      Command::Hidden => {
        debug!("display hidden, pausing rotation");
        self.visible = false;
        self.rotation.pause();
      }
      Command::Dispose => return false,
    }
    true
  }

  fn start_polling(&mut self) {
    self.polling = true;
    self.poll_timer.start_now();
    if self.visible {
      self.rotation.resume();
    }
  }

  /// Issues one request to the data source on a detached task.
  ///
  /// The runloop never awaits the request, its result comes back
  /// through the fetch channel whenever it completes.
  fn poll(&mut self) {
    self.issued += 1;
    let seq = self.issued;
    let source = Arc::clone(&self.source);
    let fetchtx = self.fetchtx.clone();

    debug!("poll #{seq} issued");
    tokio::spawn(async move {
      let result = source.fetch().await;
      // the controller may have been disposed in the meantime
      let _ = fetchtx.send(Fetched { seq, result });
    });
  }

  fn complete_poll(
    &mut self,
    seq: u64,
    result: Result<CampaignSnapshot, source::Error>,
  ) {
    // responses are applied in arrival order, even when a newer
    // poll has already completed.
    if seq < self.completed {
      warn!(
        "poll #{seq} completed after poll #{}, applying anyway",
        self.completed
      );
    }
    self.completed = self.completed.max(seq);

    match result {
      Ok(snapshot) => self.apply(snapshot),
      Err(error) => self.fail(error),
    }
  }

  fn apply(&mut self, snapshot: CampaignSnapshot) {
    info!(
      "campaign updated: amount {}, target {}, {} donations",
      snapshot.amount,
      snapshot.target,
      snapshot.donations.len()
    );

    let target_text =
      group_thousands(snapshot.target, self.config.thousands_separator);
    if self.target_text.as_ref() != Some(&target_text) {
      self.renderer.set_target_text(&target_text);
      self.target_text = Some(target_text);
    }

    if snapshot.amount < 0 {
      warn!("campaign amount {} is negative, showing 0", snapshot.amount);
    }

    let raised = snapshot.raised();
    if raised != self.previous_amount {
      let generation = self.counter.animate(
        self.previous_amount,
        raised,
        self.config.counter_duration,
        Instant::now(),
      );
      self.previous_amount = raised;
      self.pending_frame = Some(generation);
      self.frame_timer.start_now();
    } else if self.amount_text.is_none() {
      self.paint_amount(raised);
    }

    let (progress, celebrate) = self.progress.update(raised, snapshot.target);
    self.renderer.set_progress(progress.percentage, &progress.label());
    if celebrate {
      self.renderer.trigger_celebration();
    }

    if let Reseed::Rebuilt { vacated } =
      self.rotation.reseed(rank(&snapshot.donations))
    {
      for (side, position) in vacated {
        self.renderer.render_slot(side, position, None);
      }

      if self.rotation.phase() == Phase::Empty {
        for side in Side::BOTH {
          self.renderer.show_empty_state(side);
        }
      } else {
        for slot in self.rotation.slots() {
          self
            .renderer
            .render_slot(slot.side, slot.position, Some(&slot.donation));
        }
      }
    }

    self.ever_rendered = true;
    self.showing_error = false;
  }

  fn fail(&mut self, error: source::Error) {
    if error.is_malformed() {
      warn!("rejected campaign payload: {error}");
    } else {
      warn!("poll failed: {error}");
    }

    if !self.ever_rendered && !self.showing_error {
      self.renderer.show_error_state();
      self.showing_error = true;
    }
  }

  fn rotate(&mut self) {
    if let Some(slot) = self.rotation.rotate() {
      debug!(
        "rotated {} {} to {}",
        slot.side, slot.position, slot.donation.name
      );
      self
        .renderer
        .render_slot(slot.side, slot.position, Some(&slot.donation));
    }
  }

  fn frame(&mut self) {
    let frame = match self.pending_frame {
      Some(generation) => self.counter.frame(generation, Instant::now()),
      None => Frame::Stale,
    };

    match frame {
      Frame::Tick(value) => self.paint_amount(value),
      Frame::Done(value) => {
        self.paint_amount(value);
        self.pending_frame = None;
        self.frame_timer.cancel();
      }
      Frame::Stale => {
        self.pending_frame = None;
        self.frame_timer.cancel();
      }
    }
  }

  fn paint_amount(&mut self, value: u64) {
    let text = group_thousands(value, self.config.thousands_separator);
    if self.amount_text.as_ref() != Some(&text) {
      self.renderer.set_amount_text(&text);
      self.amount_text = Some(text);
    }
  }
}

/// Host side of a running [`SyncController`].
///
/// Commands are queued to the runloop and take effect in order.
/// Commands sent after the runloop ended are dropped.
pub struct SyncHandle<R> {
  cmdtx: UnboundedSender<Command>,
  runloop: JoinHandle<R>,
}

impl<R> SyncHandle<R> {
  /// Resumes periodic polling after [`SyncHandle::stop`].
  pub fn start(&self) {
    self.send(Command::Start);
  }

  /// Halts polling and rotation.
  pub fn stop(&self) {
    self.send(Command::Stop);
  }

  /// Forces an immediate poll and resumes a paused rotation.
  pub fn on_visible(&self) {
    self.send(Command::Visible);
  }

  /// Pauses rotation, polling continues.
  pub fn on_hidden(&self) {
    self.send(Command::Hidden);
  }

  /// Ends the runloop and returns the renderer.
  pub async fn dispose(self) -> Result<R, JoinError> {
    self.send(Command::Dispose);
    self.runloop.await
  }

  fn send(&self, command: Command) {
    if self.cmdtx.send(command).is_err() {
      warn!("sync controller runloop is gone, command dropped");
    }
  }
}
