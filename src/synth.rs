//! Order-flow synthesis: a bounded random walk of prices around an anchor,
//! stamped with timestamps that step backward from the start instant.
//!
//! Events are produced lazily so a batch can stream them straight into the
//! sink without holding a ticker's full sequence in memory.

use chrono::{Duration, Local, NaiveDateTime, SubsecRound};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::OrderFlowConfig;
use crate::model::order_flow::{round_price, OrderAction, OrderFlowEvent};

/// Smallest price an event may carry; sub-cent anchors would otherwise round to zero.
pub const MIN_TICK_PRICE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Relative perturbation bound; prices fall in `anchor * (1 ± max_price_deviation)`.
    pub max_price_deviation: f64,
    pub min_volume: u32,
    pub max_volume: u32,
    /// Upper bound of the backward time step; the lower bound is one second.
    pub max_step_secs: u32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            max_price_deviation: 0.05,
            min_volume: 1,
            max_volume: 10_000,
            max_step_secs: 60,
        }
    }
}

impl From<&OrderFlowConfig> for SynthParams {
    fn from(cfg: &OrderFlowConfig) -> Self {
        Self {
            max_price_deviation: cfg.max_price_deviation,
            min_volume: cfg.min_volume,
            max_volume: cfg.max_volume,
            max_step_secs: cfg.max_step_secs,
        }
    }
}

pub struct OrderFlowSynthesizer<R: Rng> {
    params: SynthParams,
    rng: R,
}

impl OrderFlowSynthesizer<ChaCha8Rng> {
    /// Seeded synthesizers are reproducible; `None` draws the seed from OS entropy.
    pub fn with_seed(params: SynthParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::new(params, rng)
    }
}

impl<R: Rng> OrderFlowSynthesizer<R> {
    pub fn new(params: SynthParams, rng: R) -> Self {
        Self { params, rng }
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    /// Synthesize `count` events starting at the current local wall-clock second.
    pub fn synthesize<'a>(
        &'a mut self,
        ticker: &'a str,
        anchor_price: f64,
        count: usize,
    ) -> OrderFlowStream<'a, R> {
        let start = Local::now().naive_local().trunc_subsecs(0);
        self.synthesize_from(ticker, anchor_price, count, start)
    }

    pub fn synthesize_from<'a>(
        &'a mut self,
        ticker: &'a str,
        anchor_price: f64,
        count: usize,
        start: NaiveDateTime,
    ) -> OrderFlowStream<'a, R> {
        OrderFlowStream {
            rng: &mut self.rng,
            params: self.params,
            ticker,
            anchor_price,
            remaining: count,
            cursor: start,
        }
    }
}

/// Lazy event sequence for one ticker; newest event first.
pub struct OrderFlowStream<'a, R: Rng> {
    rng: &'a mut R,
    params: SynthParams,
    ticker: &'a str,
    anchor_price: f64,
    remaining: usize,
    cursor: NaiveDateTime,
}

impl<R: Rng> Iterator for OrderFlowStream<'_, R> {
    type Item = OrderFlowEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let dev = self.params.max_price_deviation;
        let delta: f64 = self.rng.gen_range(-dev..=dev);
        let price = round_price(self.anchor_price * (1.0 + delta)).max(MIN_TICK_PRICE);
        let volume = self
            .rng
            .gen_range(self.params.min_volume..=self.params.max_volume);
        let action = if self.rng.gen_bool(0.5) {
            OrderAction::Buy
        } else {
            OrderAction::Sell
        };

        let event = OrderFlowEvent {
            ticker: self.ticker.to_string(),
            timestamp: self.cursor,
            price,
            volume,
            action,
        };

        let step = self.rng.gen_range(1..=self.params.max_step_secs.max(1));
        self.cursor -= Duration::seconds(i64::from(step));
        Some(event)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Rng> ExactSizeIterator for OrderFlowStream<'_, R> {}
