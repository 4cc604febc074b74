use fugit::HertzU32;

use crate::sequencer::PollLimit;

/// Highest SYSCLK the STM32F105/107 is rated for.
pub const MAX_SYSCLK: HertzU32 = HertzU32::MHz(72);

/// Clock tree configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub(crate) hse: HertzU32,
    pub(crate) sysclk: HertzU32,
    pub(crate) poll_limit: PollLimit,
}

impl Config {
    /// Run from a crystal of the given frequency, as fast as the part allows
    pub fn hse(crystal: HertzU32) -> Self {
        Self {
            hse: crystal,
            sysclk: MAX_SYSCLK,
            poll_limit: PollLimit::default(),
        }
    }

    /// Requested SYSCLK. The achieved one may be lower.
    pub fn sysclk(self, sysclk: HertzU32) -> Self {
        Self { sysclk, ..self }
    }

    pub fn poll_limit(self, poll_limit: PollLimit) -> Self {
        Self { poll_limit, ..self }
    }
}
