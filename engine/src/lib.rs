mod config;
mod controller;
mod counter;
mod format;
mod model;
mod progress;
mod rank;
mod render;
mod rotation;
mod source;
mod timer;

pub use {
  config::{Config, Error as ConfigError},
  controller::{SyncController, SyncHandle},
  counter::{AnimatedCounter, Frame},
  format::group_thousands,
  model::{
    CampaignSnapshot,
    Donation,
    Error as ModelError,
    Side,
    VisibleSlot,
    ANONYMOUS,
  },
  progress::{CelebrationPolicy, Progress, ProgressTracker},
  rank::{is_uninformative, rank},
  render::Renderer,
  rotation::{Phase, Reseed, RotationEngine},
  source::{DataSource, Error as SourceError, HttpSource},
  timer::RepeatingTimer,
};
