use crate::common::pair::Pair;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top of book as reported by one exchange for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BidAsk {
    pub bid: f64,
    pub ask: f64,
}

impl BidAsk {
    pub fn new(bid: f64, ask: f64) -> Self {
        Self { bid, ask }
    }

    /// Both sides finite and positive.
    pub fn is_valid(&self) -> bool {
        is_price(self.bid) && is_price(self.ask)
    }
}

/// Finite and above zero.
pub fn is_price(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Pair → last price. A missing key means "no price available".
pub type PriceMap = HashMap<Pair, f64>;

/// Pair → best bid/ask. A missing key means "no quote available".
pub type QuoteMap = HashMap<Pair, BidAsk>;
