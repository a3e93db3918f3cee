//! # Cost Codec
//!
//! Turns the letter-coded cost printed on a product into its real numeric
//! cost.
//!
//! ## How Decoding Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Encoded cost on the label: "hub"                                      │
//! │       │                                                                 │
//! │       ▼  uppercase + trim                                               │
//! │  "HUB"                                                                  │
//! │       │                                                                 │
//! │       ▼  letter → digit (HUB table: H=0, U=1, B=2)                     │
//! │  "0" "1" "2"   (unknown characters are skipped, never rejected)        │
//! │       │                                                                 │
//! │       ▼  concatenate in order, parse base-10                           │
//! │  12                                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concatenation is positional: `"HU"` is 1, `"UH"` is 10.
//!
//! ## Two Strictness Levels
//! - [`CostCodec::decode`] is lenient: anything it cannot read becomes 0.
//! - [`CostCodec::is_valid_encoding`] is strict: empty or foreign characters
//!   fail. The form layer gates input with it before trusting `decode`.

use std::fmt;

// =============================================================================
// Substitution Table
// =============================================================================

/// A fixed letter → digit mapping.
///
/// Tables are `'static` constants and are never built at runtime. A process
/// picks exactly one (see [`crate::config::CodecConfig`]) so that codes from
/// two incompatible tables are never mixed in one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionTable {
    name: &'static str,
    entries: &'static [(char, char)],
}

impl SubstitutionTable {
    /// Full A–Z table: A..I → 1..9, J → 0, and the cycle repeats from K.
    pub const CLASSIC: SubstitutionTable = SubstitutionTable {
        name: "classic",
        entries: &[
            ('A', '1'),
            ('B', '2'),
            ('C', '3'),
            ('D', '4'),
            ('E', '5'),
            ('F', '6'),
            ('G', '7'),
            ('H', '8'),
            ('I', '9'),
            ('J', '0'),
            ('K', '1'),
            ('L', '2'),
            ('M', '3'),
            ('N', '4'),
            ('O', '5'),
            ('P', '6'),
            ('Q', '7'),
            ('R', '8'),
            ('S', '9'),
            ('T', '0'),
            ('U', '1'),
            ('V', '2'),
            ('W', '3'),
            ('X', '4'),
            ('Y', '5'),
            ('Z', '6'),
        ],
    };

    /// Ten-letter key word `HUBLOTERAS`, each letter worth its position.
    pub const HUB: SubstitutionTable = SubstitutionTable {
        name: "hub",
        entries: &[
            ('H', '0'),
            ('U', '1'),
            ('B', '2'),
            ('L', '3'),
            ('O', '4'),
            ('T', '5'),
            ('E', '6'),
            ('R', '7'),
            ('A', '8'),
            ('S', '9'),
        ],
    };

    /// Short identifier used in configuration (`classic`, `hub`).
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the digit mapped to `letter`, if the letter is in the alphabet.
    ///
    /// Lookup is case-sensitive; callers uppercase first.
    pub fn digit_for(&self, letter: char) -> Option<char> {
        self.entries
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, d)| *d)
    }

    /// Checks whether `letter` belongs to the table's alphabet.
    #[inline]
    pub fn contains(&self, letter: char) -> bool {
        self.digit_for(letter).is_some()
    }

    /// The alphabet, in table order.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().map(|(l, _)| *l)
    }

    /// All `(letter, digit)` pairs.
    #[inline]
    pub const fn entries(&self) -> &'static [(char, char)] {
        self.entries
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        SubstitutionTable::HUB
    }
}

impl fmt::Display for SubstitutionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// =============================================================================
// Cost Codec
// =============================================================================

/// Decodes and validates encoded costs against one [`SubstitutionTable`].
///
/// ## Usage
/// ```rust
/// use inventario_core::cost::{CostCodec, SubstitutionTable};
///
/// let codec = CostCodec::new(SubstitutionTable::HUB);
/// assert_eq!(codec.decode("hub"), 12);
/// assert!(codec.is_valid_encoding("HUB"));
/// assert!(!codec.is_valid_encoding("HUB7"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CostCodec {
    table: SubstitutionTable,
}

impl CostCodec {
    /// Creates a codec bound to `table`.
    #[inline]
    pub const fn new(table: SubstitutionTable) -> Self {
        CostCodec { table }
    }

    /// The table this codec decodes with.
    #[inline]
    pub const fn table(&self) -> &SubstitutionTable {
        &self.table
    }

    /// Decodes an encoded cost into its numeric value.
    ///
    /// ## Rules
    /// - Uppercases and trims the input
    /// - Characters outside the alphabet are skipped
    /// - Mapped digits are concatenated in input order
    /// - Empty or unparseable (e.g. overflowing) results are 0
    ///
    /// Never fails.
    pub fn decode(&self, input: &str) -> u64 {
        let digits: String = input
            .trim()
            .to_uppercase()
            .chars()
            .filter_map(|c| self.table.digit_for(c))
            .collect();

        digits.parse().unwrap_or(0)
    }

    /// Same as [`decode`](Self::decode), with a missing value decoding to 0.
    pub fn decode_opt(&self, input: Option<&str>) -> u64 {
        input.map_or(0, |s| self.decode(s))
    }

    /// Checks that `input` is non-empty and made only of table letters.
    ///
    /// ## Example
    /// ```rust
    /// use inventario_core::cost::CostCodec;
    ///
    /// let codec = CostCodec::default();
    /// assert!(!codec.is_valid_encoding(""));
    /// assert!(codec.is_valid_encoding(" hub "));
    /// ```
    pub fn is_valid_encoding(&self, input: &str) -> bool {
        let normalized = input.trim().to_uppercase();
        !normalized.is_empty() && normalized.chars().all(|c| self.table.contains(c))
    }
}

// =============================================================================
// Display Formatting
// =============================================================================

/// Formats a decoded cost as pesos: `.` between thousands, `,00` decimals.
///
/// ## Example
/// ```rust
/// use inventario_core::cost::format_real_cost;
///
/// assert_eq!(format_real_cost(1234567), "1.234.567,00");
/// assert_eq!(format_real_cost(12), "12,00");
/// ```
pub fn format_real_cost(cost: u64) -> String {
    let digits = cost.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }

    out.push_str(",00");
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
