//! Campaign data as received from the data source and as placed on screen.

use {
  serde::{Deserialize, Serialize},
  thiserror::Error,
};

/// Name shown for donors that did not leave one.
pub const ANONYMOUS: &str = "Anonymous";

/// Names that mean "no name given". The upstream feed fills in its own
/// localized placeholder before the payload reaches us.
pub const ANONYMOUS_SENTINELS: &[&str] = &[ANONYMOUS, "Anoniem"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("field `{0}` must be a non-negative integer")]
  InvalidAmount(&'static str),

  #[error("field `{0}` must be an integer")]
  NotAnInteger(&'static str),
}

/// A single contribution to the campaign.
///
/// Donations are immutable once received. Two donations with identical
/// contents are still distinct records, the rotation engine tells them
/// apart by their rank in the pool and never by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireDonation")]
pub struct Donation {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  pub amount: u64,
}

impl Donation {
  pub fn new(
    name: Option<&str>,
    message: Option<&str>,
    amount: u64,
  ) -> Self {
    let name = match name.map(str::trim) {
      Some(name) if !name.is_empty() => name.to_owned(),
      _ => ANONYMOUS.to_owned(),
    };

    Self {
      name,
      message: message.map(ToOwned::to_owned),
      amount,
    }
  }

  /// True when the donor did not leave a name.
  pub fn is_anonymous(&self) -> bool {
    let name = self.name.trim();
    name.is_empty() || ANONYMOUS_SENTINELS.contains(&name)
  }

  /// The message, if there is one with any visible content.
  pub fn message(&self) -> Option<&str> {
    self
      .message
      .as_deref()
      .map(str::trim)
      .filter(|m| !m.is_empty())
  }
}

/// The complete campaign state returned by one successful poll.
///
/// A snapshot replaces its predecessor wholesale, nothing is merged
/// between consecutive polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireSnapshot")]
pub struct CampaignSnapshot {
  /// Raised so far. The feed may report corrections below zero.
  pub amount: i64,
  pub target: u64,
  pub donations: Vec<Donation>,
}

impl CampaignSnapshot {
  /// The raised amount as displayed, negative amounts count as zero.
  pub fn raised(&self) -> u64 {
    u64::try_from(self.amount).unwrap_or(0)
  }
}

/// One of the two columns of donation cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
  Left,
  Right,
}

impl Side {
  pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

  /// Ranked donations alternate between columns, starting on the left.
  pub fn for_rank(rank: usize) -> Self {
    if rank % 2 == 0 {
      Side::Left
    } else {
      Side::Right
    }
  }
}

impl std::fmt::Display for Side {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Side::Left => write!(f, "left"),
      Side::Right => write!(f, "right"),
    }
  }
}

/// A stable on-screen position holding one donation.
///
/// `(side, position)` is the visual identity of the slot. The occupant
/// changes over time, the identity never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSlot {
  pub side: Side,
  pub position: usize,
  pub donation: Donation,
}

/// JSON numbers arrive as floats, the campaign amount only has to
/// be a whole number.
fn whole_number(value: f64, field: &'static str) -> Result<i64, Error> {
  if value.is_finite()
    && value.fract() == 0.0
    && value >= i64::MIN as f64
    && value <= i64::MAX as f64
  {
    Ok(value as i64)
  } else {
    Err(Error::NotAnInteger(field))
  }
}

/// Donation amounts and the target must be whole and non-negative.
fn whole_amount(value: f64, field: &'static str) -> Result<u64, Error> {
  if value.is_finite()
    && value >= 0.0
    && value.fract() == 0.0
    && value <= u64::MAX as f64
  {
    Ok(value as u64)
  } else {
    Err(Error::InvalidAmount(field))
  }
}

#[derive(Deserialize)]
struct WireDonation {
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  message: Option<String>,
  amount: f64,
}

impl TryFrom<WireDonation> for Donation {
  type Error = Error;

  fn try_from(wire: WireDonation) -> Result<Self, Self::Error> {
    Ok(Donation::new(
      wire.name.as_deref(),
      wire.message.as_deref(),
      whole_amount(wire.amount, "donations[].amount")?,
    ))
  }
}

#[derive(Deserialize)]
struct WireSnapshot {
  amount: f64,
  target: f64,
  donations: Vec<Donation>,
}

impl TryFrom<WireSnapshot> for CampaignSnapshot {
  type Error = Error;

  fn try_from(wire: WireSnapshot) -> Result<Self, Self::Error> {
    Ok(CampaignSnapshot {
      amount: whole_number(wire.amount, "amount")?,
      target: whole_amount(wire.target, "target")?,
      donations: wire.donations,
    })
  }
}
