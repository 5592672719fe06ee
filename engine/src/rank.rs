use crate::model::Donation;

/// True when a donation carries nothing worth showing: no donor
/// name and no message.
pub fn is_uninformative(donation: &Donation) -> bool {
  donation.is_anonymous() && donation.message().is_none()
}

/// Builds the pool of donations eligible for display.
///
/// Uninformative donations are dropped and the rest is ordered by
/// amount, largest first. The sort is stable so equal amounts keep
/// the order in which the feed listed them.
pub fn rank(donations: &[Donation]) -> Vec<Donation> {
  let mut pool: Vec<Donation> = donations
    .iter()
    .filter(|d| !is_uninformative(d))
    .cloned()
    .collect();
  pool.sort_by(|a, b| b.amount.cmp(&a.amount));
  pool
}
