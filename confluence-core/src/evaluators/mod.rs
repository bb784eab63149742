//! Signal evaluators: independent weighted rules over one asset's context.
//!
//! Each evaluator sees only the asset's own [`AssetContext`] and the
//! scan-wide [`ExternalSignals`]. Evaluators never share state, so their
//! contributions are independent: the order of [`CANONICAL_EVALUATORS`]
//! only decides the order of the resulting triggers.
//!
//! Weights, labels and thresholds are fixed constants; changing one changes
//! what every stored selection means.

pub mod context;
pub mod pattern;
pub mod trend;
pub mod volatility;

pub use context::{ExtremeFear, ShortSqueeze, SocialBuzz, WhaleActivity};
pub use pattern::{GapperContinuation, HigherLows, RoundingBottom, UnitBias};
pub use trend::{EmaCross, PsarFlip};
pub use volatility::{MeanReversion, VolatilitySqueeze, VwapBounce};

use crate::domain::{AssetContext, ExternalSignals, Trigger};

/// A weighted boolean rule.
///
/// # Contract
/// `evaluate` is total: missing history or an unavailable external lookup
/// means "did not fire" (`None`), never an error.
pub trait Evaluator: Send + Sync {
    /// Trigger label (e.g., "EMA Cross").
    fn name(&self) -> &'static str;

    /// Points contributed when the rule fires.
    fn weight(&self) -> u32;

    fn evaluate(&self, ctx: &AssetContext, signals: &ExternalSignals) -> Option<Trigger>;

    /// The trigger this evaluator emits when it fires.
    fn fired(&self) -> Trigger {
        Trigger::new(self.name(), self.weight())
    }
}

/// The fixed evaluator set, in evaluation order.
pub static CANONICAL_EVALUATORS: &[&dyn Evaluator] = &[
    &RoundingBottom,
    &HigherLows,
    &PsarFlip,
    &EmaCross,
    &VolatilitySqueeze,
    &GapperContinuation,
    &MeanReversion,
    &VwapBounce,
    &UnitBias,
    &SocialBuzz,
    &WhaleActivity,
    &ShortSqueeze,
    &ExtremeFear,
];
