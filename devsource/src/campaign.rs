use {
  kiosk_engine::{CampaignSnapshot, Donation},
  rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng},
  std::path::Path,
};

const NAMES: &[&str] = &[
  "Sanne", "Bram", "Fleur", "Daan", "Lotte", "Jesse", "Noor", "Sem",
  "Familie de Vries", "Team Maasland", "Basisschool De Regenboog",
  "Voetbalclub VVM", "Oma Riet", "De Buurtsuper",
];

const MESSAGES: &[&str] = &[
  "Zet 'm op!",
  "Voor het goede doel",
  "Succes allemaal!",
  "Mooi initiatief",
  "Namens de hele klas",
  "Loop ze!",
];

/// Name the upstream feed uses for donors that stay anonymous.
const ANONYMOUS: &str = "Anoniem";

/// An in-memory campaign that can grow by random donations.
pub struct Campaign {
  target: u64,
  amount: u64,
  donations: Vec<Donation>,
  rng: StdRng,
}

impl Campaign {
  /// A campaign with `initial` random donations already received.
  pub fn synthetic(target: u64, initial: usize, rng: StdRng) -> Self {
    let mut campaign = Self {
      target,
      amount: 0,
      donations: Vec::with_capacity(initial),
      rng,
    };
    for _ in 0..initial {
      campaign.donate();
    }
    campaign
  }

  /// A campaign that starts from a previously captured snapshot.
  pub fn from_snapshot(snapshot: CampaignSnapshot, rng: StdRng) -> Self {
    Self {
      target: snapshot.target,
      amount: snapshot.raised(),
      donations: snapshot.donations,
      rng,
    }
  }

  pub fn from_fixture(path: &Path) -> anyhow::Result<Self> {
    let contents = std::fs::read_to_string(path)?;
    let snapshot = serde_json::from_str(&contents)?;
    Ok(Self::from_snapshot(snapshot, StdRng::from_entropy()))
  }

  /// Receives one random donation, newest first like the upstream
  /// feed lists them.
  pub fn donate(&mut self) -> &Donation {
    let amount = self.rng.gen_range(5..=250);
    let name = if self.rng.gen_bool(0.25) {
      ANONYMOUS
    } else {
      NAMES.choose(&mut self.rng).copied().unwrap_or(ANONYMOUS)
    };
    let message = if self.rng.gen_bool(0.6) {
      MESSAGES.choose(&mut self.rng).copied()
    } else {
      None
    };

    self.amount += amount;
    self.donations.insert(0, Donation::new(Some(name), message, amount));
    &self.donations[0]
  }

  pub fn amount(&self) -> u64 {
    self.amount
  }

  pub fn snapshot(&self) -> CampaignSnapshot {
    CampaignSnapshot {
      amount: i64::try_from(self.amount).unwrap_or(i64::MAX),
      target: self.target,
      donations: self.donations.clone(),
    }
  }
}
