use crate::types::TickSize;

/// Resolution policy for a per-market order parameter.
#[non_exhaustive]
#[derive(Clone, Copy, Debug)]
pub enum FixedOrFetch<T> {
    /// Use the given value, no network traffic.
    Fixed(T),
    /// Resolve via the public market endpoints, memoized per token.
    FetchAndCache,
}

/// Clock used for auth-header timestamps.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default)]
pub enum TimePolicy {
    /// Local unix clock, no `/time` call.
    #[default]
    Local,
    /// Server clock via `GET /time`; the offset is cached after the
    /// first call.
    Server,
}

/// Parameter resolution defaults for the order flow.
#[derive(Clone, Copy, Debug)]
pub struct Policies {
    pub tick_size: FixedOrFetch<TickSize>,
    pub neg_risk: FixedOrFetch<bool>,
    pub fee_rate_bps: u32,
    pub time: TimePolicy,
}

impl Default for Policies {
    /// Deterministic defaults: fixed hundredth tick, the standard
    /// exchange, zero fee, local clock.
    fn default() -> Self {
        Self {
            tick_size: FixedOrFetch::Fixed(TickSize::Hundredth),
            neg_risk: FixedOrFetch::Fixed(false),
            fee_rate_bps: 0,
            time: TimePolicy::Local,
        }
    }
}
