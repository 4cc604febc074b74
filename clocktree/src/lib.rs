//! Clock bring-up for the STM32F105/107 (connectivity line).
//!
//! SYSCLK is taken from PLL1, which is fed by PLL2, which is fed by the external crystal.
//! [`plan`] finds the PLL settings, [`ClockSequencer`] writes them to the hardware through a
//! [`ClockRegisters`] implementation supplied by the platform, and [`freeze`] does both.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
mod error;
pub mod flash;
pub mod plan;
pub mod registers;
pub mod sequencer;
#[cfg(test)]
mod sim;

use fugit::HertzU32;
use rtt_target::debug_rprintln;

pub use config::Config;
pub use error::Error;
pub use flash::FlashLatency;
pub use plan::{plan, ClockPlan};
pub use registers::ClockRegisters;
pub use sequencer::{ClockSequencer, PollLimit, SequencerState};

/// Switches SYSCLK to the fastest PLL setting allowed by `config` and returns its frequency.
///
/// Nothing is written to `regs` if no PLL setting fits.
pub fn freeze<R: ClockRegisters>(regs: &mut R, config: Config) -> Result<HertzU32, Error> {
    // Latency follows the requested frequency, which is never below the achieved one.
    let latency = FlashLatency::for_sysclk(config.sysclk);
    let plan = plan(config.hse, config.sysclk)?;

    debug_rprintln!(
        "clock plan: PREDIV2 {} PLL2MUL {} PREDIV1 {} PLLMUL {:?}, {} Hz",
        plan.prediv2().divisor(),
        plan.pll2mul().multiplier(),
        plan.prediv1().divisor(),
        plan.pll1mul(),
        plan.sysclk().raw()
    );

    ClockSequencer::new(regs, plan, latency)
        .with_poll_limit(config.poll_limit)
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_SYSCLK;
    use crate::registers::Register;
    use crate::sequencer::DEFAULT_POLL_ATTEMPTS;
    use crate::sim::SimRegisters;

    #[test]
    fn freeze_reaches_72mhz_from_25mhz() {
        let mut regs = SimRegisters::new().ready_after(5);
        let sysclk = freeze(&mut regs, Config::hse(HertzU32::MHz(25))).unwrap();
        assert_eq!(sysclk, HertzU32::MHz(72));
        assert_eq!(regs.register(Register::FlashAcr), 0b010);
    }

    #[test]
    fn freeze_uses_latency_of_requested_frequency() {
        let mut regs = SimRegisters::new();
        let config = Config::hse(HertzU32::MHz(25)).sysclk(HertzU32::MHz(30));
        let sysclk = freeze(&mut regs, config).unwrap();
        assert!(sysclk <= HertzU32::MHz(30));
        assert_eq!(regs.register(Register::FlashAcr), 0b001);
    }

    #[test]
    fn failed_plan_leaves_hardware_alone() {
        let mut regs = SimRegisters::new();
        let config = Config::hse(HertzU32::MHz(25)).sysclk(HertzU32::MHz(10));
        assert_eq!(
            freeze(&mut regs, config),
            Err(Error::NoSolutionFound {
                crystal_hz: 25_000_000,
                target_hz: 10_000_000
            })
        );
        assert!(regs.accesses().is_empty());
    }

    #[test]
    fn freeze_honours_poll_limit() {
        let mut regs = SimRegisters::new().ready_after(100);
        let config = Config::hse(HertzU32::MHz(25)).poll_limit(PollLimit::Attempts(10));
        assert_eq!(
            freeze(&mut regs, config),
            Err(Error::HardwareNotReady(SequencerState::HseReady))
        );
    }

    #[test]
    fn config_defaults() {
        let config = Config::hse(HertzU32::MHz(8));
        assert_eq!(config.sysclk, MAX_SYSCLK);
        assert_eq!(config.poll_limit, PollLimit::Attempts(DEFAULT_POLL_ATTEMPTS));
    }
}
