use crate::model::{Donation, Side};

/// The display surface the engine paints on.
///
/// The engine decides *what* changes and *when*; implementations decide
/// how it looks. Calls arrive sequentially from the engine runloop.
pub trait Renderer: Send + 'static {
  /// Campaign target text. Only called when the text changed.
  fn set_target_text(&mut self, text: &str);

  /// Raised amount text, called on every animation frame that
  /// produced a different text.
  fn set_amount_text(&mut self, text: &str);

  /// Fill of the progress bar (unrounded, `0..=100`) and its label.
  fn set_progress(&mut self, percentage: f64, label: &str);

  /// One-shot cue that the target was reached.
  fn trigger_celebration(&mut self);

  /// Creates, replaces or clears (`None`) the card at a slot.
  fn render_slot(
    &mut self,
    side: Side,
    position: usize,
    donation: Option<&Donation>,
  );

  /// Marker shown on a side when there are no donations to display.
  fn show_empty_state(&mut self, side: Side);

  /// Marker shown in place of the donations when the very first
  /// data load failed.
  fn show_error_state(&mut self);
}
