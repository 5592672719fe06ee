use {
  kiosk_engine::{group_thousands, Donation, Renderer, Side},
  std::{collections::BTreeMap, io::Write},
  tracing::warn,
};

const COLUMN_WIDTH: usize = 38;
const BAR_WIDTH: usize = 40;

/// Renders the kiosk board as plain text, redrawing the whole
/// board on every change.
pub struct TerminalRenderer<W> {
  out: W,
  ansi: bool,
  separator: char,
  target: String,
  amount: String,
  percentage: f64,
  label: String,
  celebrating: bool,
  slots: BTreeMap<(Side, usize), Donation>,
  empty: bool,
  error: bool,
}

impl<W: Write> TerminalRenderer<W> {
  /// `ansi` clears the terminal before each redraw, turn it off
  /// when the output is not a terminal.
  pub fn new(out: W, ansi: bool, separator: char) -> Self {
    Self {
      out,
      ansi,
      separator,
      target: "-".into(),
      amount: "0".into(),
      percentage: 0.0,
      label: "0%".into(),
      celebrating: false,
      slots: BTreeMap::new(),
      empty: false,
      error: false,
    }
  }

  fn card(&self, donation: &Donation) -> [String; 2] {
    let amount = format!(
      "€ {}",
      group_thousands(donation.amount, self.separator)
    );
    let name_width = COLUMN_WIDTH.saturating_sub(amount.chars().count() + 1);
    let header = format!(
      "{:<name_width$} {amount}",
      truncate(&donation.name, name_width)
    );
    let message = match donation.message() {
      Some(message) => {
        truncate(&format!("\"{message}\""), COLUMN_WIDTH)
      }
      None => String::new(),
    };
    [header, message]
  }

  fn board(&self) -> String {
    let mut board = String::new();
    board.push_str(&format!(
      "  Raised € {} of € {}\n",
      self.amount, self.target
    ));

    let filled = (self.percentage / 100.0 * BAR_WIDTH as f64).round() as usize;
    board.push_str(&format!(
      "  [{}{}] {}\n",
      "#".repeat(filled),
      "-".repeat(BAR_WIDTH - filled),
      self.label
    ));

    if self.celebrating {
      board.push_str("  *** TARGET REACHED, THANK YOU! ***\n");
    }
    board.push('\n');

    if self.error {
      board.push_str("  Failed to load data, retrying...\n");
      return board;
    }

    if self.empty {
      board.push_str("  No donations yet\n");
      return board;
    }

    let rows = self
      .slots
      .keys()
      .map(|(_, position)| position + 1)
      .max()
      .unwrap_or(0);

    for position in 0..rows {
      let card = |side| self.slots.get(&(side, position)).map(|d| self.card(d));
      let (left, right) = (card(Side::Left), card(Side::Right));
      for line in 0..2 {
        let l = left.as_ref().map(|c| c[line].as_str()).unwrap_or("");
        let r = right.as_ref().map(|c| c[line].as_str()).unwrap_or("");
        board.push_str(&format!("  {l:<COLUMN_WIDTH$} | {r}\n"));
      }
      board.push('\n');
    }
    board
  }

  fn redraw(&mut self) {
    let board = self.board();
    let clear = if self.ansi { "\x1b[2J\x1b[H" } else { "" };
    let drawn = write!(self.out, "{clear}{board}");
    if let Err(e) = drawn.and_then(|_| self.out.flush()) {
      warn!("failed to draw board: {e}");
    }
  }
}

fn truncate(text: &str, width: usize) -> String {
  if text.chars().count() <= width {
    return text.to_owned();
  }
  let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
  out.push('…');
  out
}

impl<W: Write + Send + 'static> Renderer for TerminalRenderer<W> {
  fn set_target_text(&mut self, text: &str) {
    self.target = text.to_owned();
    self.redraw();
  }

  fn set_amount_text(&mut self, text: &str) {
    self.amount = text.to_owned();
    self.redraw();
  }

  fn set_progress(&mut self, percentage: f64, label: &str) {
    self.percentage = percentage;
    self.label = label.to_owned();
    self.celebrating = false;
    self.redraw();
  }

  fn trigger_celebration(&mut self) {
    self.celebrating = true;
    self.redraw();
  }

  fn render_slot(
    &mut self,
    side: Side,
    position: usize,
    donation: Option<&Donation>,
  ) {
    match donation {
      Some(donation) => {
        self.slots.insert((side, position), donation.clone());
        self.empty = false;
        self.error = false;
      }
      None => {
        self.slots.remove(&(side, position));
      }
    }
    self.redraw();
  }

  fn show_empty_state(&mut self, _: Side) {
    self.empty = true;
    self.error = false;
    self.redraw();
  }

  fn show_error_state(&mut self) {
    self.error = true;
    self.redraw();
  }
}
