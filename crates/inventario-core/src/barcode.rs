//! # Barcode Generator
//!
//! Builds the printable barcode assigned to every product at creation time
//! and keeps it unique against the product store.
//!
//! ## Layouts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input: code "103", cost "hub"                                          │
//! │                                                                         │
//! │  Layout A:  KXRTPM     103        HUB                                   │
//! │             6 letters  code       cost letters                          │
//! │             (variable length)                                           │
//! │                                                                         │
//! │  Layout B:  KXRTP      00103                                            │
//! │             5 letters  last 5 code digits (random if none)              │
//! │             (always 10 characters)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Letters come from [`BARCODE_ALPHABET`], which leaves out `I` and `O` so
//! codes can be typed back without confusing them with `1` and `0`.
//!
//! ## Uniqueness
//! ```text
//! render ──► exists? ──no──► return candidate
//!   ▲           │
//!   └───yes─────┘   (at most MAX_ATTEMPTS checks)
//!
//! all collided ──► last candidate, final 3 chars = last 3 digits of
//!                  Unix time in ms (returned without another check)
//! ```
//!
//! The randomness is `rand`'s thread RNG. Collisions are handled by the
//! retry loop, not by entropy.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

// =============================================================================
// Constants
// =============================================================================

/// Letters drawn for the random prefix (Latin alphabet minus `I` and `O`).
pub const BARCODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Existence checks performed before falling back to the timestamp suffix.
pub const MAX_ATTEMPTS: usize = 10;

/// Characters overwritten by the timestamp fallback.
pub const FALLBACK_SUFFIX_LEN: usize = 3;

const LAYOUT_B_LEN: usize = 10;
const LAYOUT_B_CODE_DIGITS: usize = 5;

// =============================================================================
// Layout
// =============================================================================

/// Barcode layout used by a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarcodeLayout {
    /// `<6 letters><code digits><cost letters>`
    A,
    /// `<5 letters><5 code digits>`, exactly 10 characters.
    #[default]
    B,
}

impl BarcodeLayout {
    /// Number of random letters at the start of every candidate.
    pub const fn prefix_len(&self) -> usize {
        match self {
            BarcodeLayout::A => 6,
            BarcodeLayout::B => 5,
        }
    }

    /// Total length, when the layout has a fixed one.
    pub const fn fixed_len(&self) -> Option<usize> {
        match self {
            BarcodeLayout::A => None,
            BarcodeLayout::B => Some(LAYOUT_B_LEN),
        }
    }

    /// Checks that `barcode` has this layout's structural shape.
    ///
    /// The timestamp fallback keeps the shape of both layouts except for a
    /// Layout A barcode shorter than the prefix plus the suffix, which never
    /// occurs because the prefix alone is 6 characters.
    pub fn matches_shape(&self, barcode: &str) -> bool {
        if let Some(len) = self.fixed_len() {
            if barcode.len() != len {
                return false;
            }
        }

        let prefix_len = self.prefix_len();
        if barcode.len() < prefix_len || !barcode.is_ascii() {
            return false;
        }

        let (prefix, rest) = barcode.split_at(prefix_len);
        if !prefix.bytes().all(|b| BARCODE_ALPHABET.contains(&b)) {
            return false;
        }

        match self {
            BarcodeLayout::A => rest.bytes().all(|b| b.is_ascii_alphanumeric()),
            BarcodeLayout::B => rest.bytes().all(|b| b.is_ascii_digit()),
        }
    }
}

impl fmt::Display for BarcodeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarcodeLayout::A => f.write_str("a"),
            BarcodeLayout::B => f.write_str("b"),
        }
    }
}

impl FromStr for BarcodeLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(BarcodeLayout::A),
            "b" => Ok(BarcodeLayout::B),
            other => Err(format!("unknown barcode layout '{other}'")),
        }
    }
}

// =============================================================================
// Lookup Port
// =============================================================================

/// Answers "is this barcode already taken?" against the product store.
///
/// Implementations must be pure existence checks: no writes, safe to call
/// repeatedly for one generation.
#[async_trait]
pub trait BarcodeLookup: Send + Sync {
    /// Error raised by the underlying store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns `true` when a product already carries `candidate`.
    async fn exists(&self, candidate: &str) -> Result<bool, Self::Error>;
}

// =============================================================================
// Generator
// =============================================================================

/// Renders barcode candidates and resolves collisions.
///
/// ## Usage
/// ```rust
/// use inventario_core::barcode::{BarcodeGenerator, BarcodeLayout};
///
/// let generator = BarcodeGenerator::new(BarcodeLayout::B);
/// let barcode = generator.generate_unique("103", "HUB", |_| false);
/// assert_eq!(barcode.len(), 10);
/// assert!(barcode.ends_with("00103"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarcodeGenerator {
    layout: BarcodeLayout,
    max_attempts: usize,
}

impl Default for BarcodeGenerator {
    fn default() -> Self {
        BarcodeGenerator::new(BarcodeLayout::default())
    }
}

impl BarcodeGenerator {
    /// Creates a generator for `layout` with [`MAX_ATTEMPTS`] checks.
    pub const fn new(layout: BarcodeLayout) -> Self {
        BarcodeGenerator {
            layout,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of existence checks (at least 1).
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[inline]
    pub const fn layout(&self) -> BarcodeLayout {
        self.layout
    }

    #[inline]
    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Renders one candidate using the thread RNG.
    pub fn render_candidate(&self, product_code: &str, encoded_cost: &str) -> String {
        self.render_with(&mut rand::rng(), product_code, encoded_cost)
    }

    /// Renders one candidate drawing from `rng`.
    pub fn render_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        product_code: &str,
        encoded_cost: &str,
    ) -> String {
        let mut barcode = random_letters(rng, self.layout.prefix_len());
        let digits: String = product_code.chars().filter(|c| c.is_ascii_digit()).collect();

        match self.layout {
            BarcodeLayout::A => {
                barcode.push_str(&digits);
                barcode.extend(
                    encoded_cost
                        .to_uppercase()
                        .chars()
                        .filter(|c| c.is_ascii_uppercase()),
                );
            }
            BarcodeLayout::B => {
                if digits.is_empty() {
                    barcode.push_str(&random_digits(rng, LAYOUT_B_CODE_DIGITS));
                } else {
                    let tail = &digits[digits.len().saturating_sub(LAYOUT_B_CODE_DIGITS)..];
                    barcode.push_str(&format!("{:0>width$}", tail, width = LAYOUT_B_CODE_DIGITS));
                }
                fit_to_len(&mut barcode, LAYOUT_B_LEN);
            }
        }

        barcode
    }

    /// Generates a barcode that `exists` reports as free.
    ///
    /// ## Behavior
    /// - Returns the first candidate for which `exists` answers `false`
    /// - Calls `exists` at most `max_attempts` times
    /// - When every candidate collides, returns the last one with its final
    ///   [`FALLBACK_SUFFIX_LEN`] characters replaced by the last digits of
    ///   the current Unix time in milliseconds, without checking it again
    ///
    /// Never fails.
    pub fn generate_unique<F>(&self, product_code: &str, encoded_cost: &str, mut exists: F) -> String
    where
        F: FnMut(&str) -> bool,
    {
        let mut candidate = String::new();

        for attempt in 1..=self.max_attempts {
            candidate = self.render_candidate(product_code, encoded_cost);
            if !exists(&candidate) {
                debug!(attempt, barcode = %candidate, "Barcode candidate accepted");
                return candidate;
            }
            debug!(attempt, barcode = %candidate, "Barcode candidate collided");
        }

        self.fallback(&candidate)
    }

    /// Async form of [`generate_unique`](Self::generate_unique) over a
    /// [`BarcodeLookup`].
    ///
    /// Attempts run one after another; a lookup error aborts generation and
    /// is returned to the caller.
    pub async fn generate_unique_async<L>(
        &self,
        product_code: &str,
        encoded_cost: &str,
        lookup: &L,
    ) -> Result<String, L::Error>
    where
        L: BarcodeLookup + ?Sized,
    {
        let mut candidate = String::new();

        for attempt in 1..=self.max_attempts {
            candidate = self.render_candidate(product_code, encoded_cost);
            if !lookup.exists(&candidate).await? {
                debug!(attempt, barcode = %candidate, "Barcode candidate accepted");
                return Ok(candidate);
            }
            debug!(attempt, barcode = %candidate, "Barcode candidate collided");
        }

        Ok(self.fallback(&candidate))
    }

    fn fallback(&self, last_candidate: &str) -> String {
        let barcode = with_timestamp_suffix(last_candidate, Utc::now().timestamp_millis());
        warn!(
            attempts = self.max_attempts,
            barcode = %barcode,
            "Barcode retries exhausted, using timestamp suffix"
        );
        barcode
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn random_letters<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BARCODE_ALPHABET[rng.random_range(0..BARCODE_ALPHABET.len())] as char)
        .collect()
}

fn random_digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Truncates or right-pads with `0` to exactly `len` ASCII characters.
fn fit_to_len(barcode: &mut String, len: usize) {
    barcode.truncate(len);
    while barcode.len() < len {
        barcode.push('0');
    }
}

/// Replaces the last [`FALLBACK_SUFFIX_LEN`] characters of `barcode` with
/// the last three decimal digits of `millis`.
///
/// Works on characters, not bytes; a barcode shorter than the suffix is
/// replaced entirely.
pub fn with_timestamp_suffix(barcode: &str, millis: i64) -> String {
    let keep = barcode
        .char_indices()
        .rev()
        .nth(FALLBACK_SUFFIX_LEN - 1)
        .map_or(0, |(i, _)| i);
    format!("{}{:03}", &barcode[..keep], millis.rem_euclid(1000))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn is_alphabet(b: u8) -> bool {
        BARCODE_ALPHABET.contains(&b)
    }

    #[test]
    fn test_alphabet_excludes_ambiguous_letters() {
        assert_eq!(BARCODE_ALPHABET.len(), 24);
        assert!(!BARCODE_ALPHABET.contains(&b'I'));
        assert!(!BARCODE_ALPHABET.contains(&b'O'));
    }

    #[test]
    fn test_layout_a_shape() {
        let generator = BarcodeGenerator::new(BarcodeLayout::A);
        let mut rng = StdRng::seed_from_u64(7);
        let barcode = generator.render_with(&mut rng, "1-0-3", "hub");

        assert_eq!(barcode.len(), 6 + 3 + 3);
        assert!(barcode[..6].bytes().all(is_alphabet));
        assert!(barcode.ends_with("103HUB"));
        assert!(BarcodeLayout::A.matches_shape(&barcode));
    }

    #[test]
    fn test_layout_a_drops_non_letters_from_cost() {
        let generator = BarcodeGenerator::new(BarcodeLayout::A);
        let barcode = generator.render_candidate("", "h7u b");
        assert_eq!(&barcode[6..], "HUB");
    }

    #[test]
    fn test_layout_b_pads_short_codes() {
        let generator = BarcodeGenerator::new(BarcodeLayout::B);
        let barcode = generator.render_candidate("103", "HUB");

        assert_eq!(barcode.len(), 10);
        assert!(barcode[..5].bytes().all(is_alphabet));
        assert_eq!(&barcode[5..], "00103");
        assert!(BarcodeLayout::B.matches_shape(&barcode));
    }

    #[test]
    fn test_layout_b_keeps_last_five_digits() {
        let generator = BarcodeGenerator::new(BarcodeLayout::B);
        let barcode = generator.render_candidate("REF-123456789", "HUB");
        assert_eq!(&barcode[5..], "56789");
    }

    #[test]
    fn test_layout_b_random_digits_without_code() {
        let generator = BarcodeGenerator::new(BarcodeLayout::B);
        let barcode = generator.render_candidate("sin codigo", "HUB");

        assert_eq!(barcode.len(), 10);
        assert!(barcode[5..].bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_same_seed_same_candidate() {
        let generator = BarcodeGenerator::new(BarcodeLayout::B);
        let a = generator.render_with(&mut StdRng::seed_from_u64(42), "103", "HUB");
        let b = generator.render_with(&mut StdRng::seed_from_u64(42), "103", "HUB");
        assert_eq!(a, b);
    }

    #[test]
    fn test_returns_on_first_free_candidate() {
        let generator = BarcodeGenerator::new(BarcodeLayout::B);
        let mut calls = 0;
        let barcode = generator.generate_unique("103", "HUB", |_| {
            calls += 1;
            calls < 3
        });

        assert_eq!(calls, 3);
        assert!(BarcodeLayout::B.matches_shape(&barcode));
    }

    #[test]
    fn test_free_on_first_check_calls_exists_once() {
        let generator = BarcodeGenerator::new(BarcodeLayout::A);
        let mut seen = Vec::new();
        let barcode = generator.generate_unique("103", "HUB", |c| {
            seen.push(c.to_string());
            false
        });

        assert_eq!(seen, vec![barcode]);
    }

    #[test]
    fn test_fallback_after_max_attempts() {
        let generator = BarcodeGenerator::new(BarcodeLayout::B);
        let mut seen = Vec::new();
        let barcode = generator.generate_unique("103", "HUB", |c| {
            seen.push(c.to_string());
            true
        });

        assert_eq!(seen.len(), MAX_ATTEMPTS);
        assert_eq!(barcode.len(), 10);
        assert!(barcode[7..].bytes().all(|b| b.is_ascii_digit()));

        // Prefix of the last rendered candidate is kept
        let last = seen.last().unwrap();
        assert_eq!(&barcode[..7], &last[..7]);
    }

    #[test]
    fn test_custom_attempt_bound() {
        let generator = BarcodeGenerator::new(BarcodeLayout::A).with_max_attempts(3);
        let mut calls = 0;
        let barcode = generator.generate_unique("", "", |_| {
            calls += 1;
            true
        });

        assert_eq!(calls, 3);
        assert_eq!(barcode.len(), 6);
        assert!(barcode[3..].bytes().all(|b| b.is_ascii_digit()));

        assert_eq!(BarcodeGenerator::default().with_max_attempts(0).max_attempts(), 1);
    }

    #[test]
    fn test_with_timestamp_suffix() {
        assert_eq!(with_timestamp_suffix("ABCDE00103", 1_700_000_000_042), "ABCDE00042");
        assert_eq!(with_timestamp_suffix("ABCDEF", 999), "ABC999");
        assert_eq!(with_timestamp_suffix("AB", 5), "005");
        assert_eq!(with_timestamp_suffix("", -1), "999");
    }

    #[test]
    fn test_timestamp_suffix_respects_char_boundaries() {
        assert_eq!(with_timestamp_suffix("ÑÑ", 5), "005");
        assert_eq!(with_timestamp_suffix("AÑÑÑ", 42), "A042");
        assert_eq!(with_timestamp_suffix("ÑABCD", 7), "ÑA007");
    }

    #[test]
    fn test_layout_parsing() {
        assert_eq!("a".parse::<BarcodeLayout>(), Ok(BarcodeLayout::A));
        assert_eq!(" B ".parse::<BarcodeLayout>(), Ok(BarcodeLayout::B));
        assert!("c".parse::<BarcodeLayout>().is_err());
        assert_eq!(BarcodeLayout::default(), BarcodeLayout::B);
        assert_eq!(BarcodeLayout::A.to_string(), "a");
    }

    #[test]
    fn test_matches_shape_rejects_malformed() {
        assert!(!BarcodeLayout::B.matches_shape("ABCDE0010"));
        assert!(!BarcodeLayout::B.matches_shape("ABCDI00103"));
        assert!(!BarcodeLayout::B.matches_shape("ABCDE0010X"));
        assert!(!BarcodeLayout::A.matches_shape("ABC"));
        assert!(BarcodeLayout::A.matches_shape("ABCDEF"));
    }

    struct TakenSet {
        taken: HashSet<String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BarcodeLookup for TakenSet {
        type Error = Infallible;

        async fn exists(&self, candidate: &str) -> Result<bool, Infallible> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.taken.contains(candidate))
        }
    }

    struct AlwaysTaken;

    #[async_trait]
    impl BarcodeLookup for AlwaysTaken {
        type Error = Infallible;

        async fn exists(&self, _candidate: &str) -> Result<bool, Infallible> {
            Ok(true)
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("store offline")]
    struct Offline;

    struct BrokenStore;

    #[async_trait]
    impl BarcodeLookup for BrokenStore {
        type Error = Offline;

        async fn exists(&self, _candidate: &str) -> Result<bool, Offline> {
            Err(Offline)
        }
    }

    #[tokio::test]
    async fn test_async_generation_accepts_free_candidate() {
        let store = TakenSet {
            taken: HashSet::new(),
            calls: AtomicUsize::new(0),
        };
        let generator = BarcodeGenerator::new(BarcodeLayout::B);

        let barcode = generator
            .generate_unique_async("103", "HUB", &store)
            .await
            .unwrap();

        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert!(barcode.ends_with("103"));
        assert_eq!(barcode.len(), 10);
    }

    #[tokio::test]
    async fn test_async_generation_falls_back() {
        let generator = BarcodeGenerator::new(BarcodeLayout::A);
        let barcode = generator
            .generate_unique_async("103", "HUB", &AlwaysTaken)
            .await
            .unwrap();

        assert_eq!(barcode.len(), 12);
        assert!(barcode[9..].bytes().all(|b| b.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_async_generation_propagates_lookup_errors() {
        let generator = BarcodeGenerator::default();
        let result = generator
            .generate_unique_async("103", "HUB", &BrokenStore)
            .await;

        assert!(result.is_err());
    }
}
