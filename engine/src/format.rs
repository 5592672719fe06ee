/// Formats a whole amount with a thousands separator, `1234567`
/// becomes `1.234.567` with `.` as the separator.
pub fn group_thousands(value: u64, separator: char) -> String {
  let digits = value.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, digit) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(separator);
    }
    out.push(digit);
  }
  out
}
