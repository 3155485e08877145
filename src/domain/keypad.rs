use super::errors::parse_amount;

/// Longest digit string the keypad accepts. Keeps amounts well inside the
/// range f64 represents exactly.
pub const MAX_KEYPAD_DIGITS: usize = 15;

/// Smallest amount with more than `MAX_KEYPAD_DIGITS` digits.
const KEYPAD_LIMIT: f64 = 1e15;

/// Input buffer behind the on-screen numeric keypad.
///
/// Holds whole-number digits only; bill amounts are entered in đồng.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keypad {
    digits: String,
}

impl Keypad {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `value` can be shown and edited on the keypad without losing
    /// anything: a whole, non-negative amount of at most `MAX_KEYPAD_DIGITS`
    /// digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use hoahong::domain::Keypad;
    ///
    /// assert!(Keypad::can_load(250_000.0));
    /// assert!(!Keypad::can_load(9.5));
    /// assert!(!Keypad::can_load(1e16));
    /// ```
    pub fn can_load(value: f64) -> bool {
        value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < KEYPAD_LIMIT
    }

    /// Seeds the buffer from an existing amount. Zero gives an empty buffer.
    ///
    /// Returns `false` and leaves the buffer empty when `can_load` rejects
    /// the value; the amount is never truncated.
    pub fn load(&mut self, value: f64) -> bool {
        self.digits.clear();
        if !Self::can_load(value) {
            return false;
        }
        if value >= 1.0 {
            self.digits = format!("{:.0}", value);
        }
        true
    }

    /// Digits typed so far, without grouping.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// True when nothing has been typed, which stands for zero.
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Appends one digit. Returns `false` if the press was ignored.
    pub fn push_digit(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() || self.digits.len() >= MAX_KEYPAD_DIGITS {
            return false;
        }
        if digit == '0' && self.digits.is_empty() {
            return false;
        }
        self.digits.push(digit);
        true
    }

    /// The "000" key. Only meaningful after a leading non-zero digit.
    pub fn push_triple_zero(&mut self) -> bool {
        if self.digits.is_empty() || self.digits.len() + 3 > MAX_KEYPAD_DIGITS {
            return false;
        }
        self.digits.push_str("000");
        true
    }

    /// Drops the last digit. Returns `false` on an empty buffer.
    pub fn backspace(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    /// Empties the buffer, reporting whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.digits.is_empty();
        self.digits.clear();
        changed
    }

    /// The amount the buffer represents. Empty reads as zero.
    pub fn value(&self) -> f64 {
        if self.digits.is_empty() {
            0.0
        } else {
            parse_amount(&self.digits).unwrap_or(0.0)
        }
    }
}
