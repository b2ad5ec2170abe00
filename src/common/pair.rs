//! Canonical `BASE/QUOTE` trading pairs.
//!
//! Every exchange spells its markets differently (`BTCUSDT`, `BTC_USDT`,
//! `btc-usdt`). [`PairNormalizer`] folds all of them into one [`Pair`] so
//! pair sets from different venues can be intersected directly.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Quote currencies tried, in order, when a symbol carries no separator.
pub const DEFAULT_QUOTE_CURRENCIES: &[&str] = &[
    "USDT", "USDC", "FDUSD", "TUSD", "BUSD", "BTC", "ETH", "BNB", "EUR", "GBP", "JPY", "TRY",
    "BRL", "UAH", "AUD", "RUB",
];

const SEPARATOR: char = '/';

/// Canonical trading pair: uppercase, one `/`, both sides non-empty.
///
/// Only [`PairNormalizer`] creates these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Pair(String);

impl Pair {
    fn from_parts(base: &str, quote: &str) -> Self {
        Pair(format!("{}{}{}", base, SEPARATOR, quote))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn base(&self) -> &str {
        self.0.split_once(SEPARATOR).map(|(b, _)| b).unwrap_or("")
    }

    pub fn quote(&self) -> &str {
        self.0.split_once(SEPARATOR).map(|(_, q)| q).unwrap_or("")
    }

    /// Exchange-native market name, e.g. `BTC_USDT` for `sep = "_"`.
    pub fn to_market(&self, sep: &str) -> String {
        format!("{}{}{}", self.base(), sep, self.quote())
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Pair {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Pair {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Folds exchange-native or user-typed symbols into [`Pair`]s.
#[derive(Debug, Clone)]
pub struct PairNormalizer {
    quote_currencies: Vec<String>,
}

impl PairNormalizer {
    /// `quote_currencies` is the ordered suffix list; put longer / more
    /// specific entries first (`FDUSD` before `USD`).
    pub fn new<I, S>(quote_currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = Vec::new();
        for q in quote_currencies {
            let q = q.as_ref().trim().to_ascii_uppercase();
            if !q.is_empty() && !seen.contains(&q) {
                seen.push(q);
            }
        }
        Self {
            quote_currencies: seen,
        }
    }

    pub fn quote_currencies(&self) -> &[String] {
        &self.quote_currencies
    }

    /// Returns `None` when the symbol cannot be split; callers drop it.
    pub fn normalize(&self, symbol: &str) -> Option<Pair> {
        let symbol: String = symbol
            .trim()
            .to_ascii_uppercase()
            .chars()
            .map(|c| match c {
                '-' | '_' | ' ' => SEPARATOR,
                other => other,
            })
            .collect();

        if symbol.contains(SEPARATOR) {
            // Extra segments (`A/B/C`) are dropped.
            let mut parts = symbol.split(SEPARATOR).filter(|s| !s.is_empty());
            let base = parts.next()?;
            let quote = parts.next()?;
            return Some(Pair::from_parts(base, quote));
        }

        self.quote_currencies.iter().find_map(|quote| {
            symbol
                .strip_suffix(quote.as_str())
                .filter(|base| !base.is_empty())
                .map(|base| Pair::from_parts(base, quote))
        })
    }

    /// Normalizes, drops unmatched symbols, deduplicates and sorts.
    pub fn normalize_all<I, S>(&self, symbols: I) -> Vec<Pair>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pairs: Vec<Pair> = symbols
            .into_iter()
            .filter_map(|s| self.normalize(s.as_ref()))
            .collect();
        pairs.sort();
        pairs.dedup();
        pairs
    }
}

impl Default for PairNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTE_CURRENCIES)
    }
}
