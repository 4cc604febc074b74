//! Applies a [`ClockPlan`] to the hardware, one stage at a time.
//!
//! The stages form a straight line from [`SequencerState::Reset`] to
//! [`SequencerState::SwitchConfirmed`]. Flash latency is raised before any PLL runs, PLL1 is
//! only configured once PLL2 (its reference) has locked, and SYSCLK is switched only after
//! PLL1 has locked.

use fugit::HertzU32;
use rtt_target::debug_rprintln;

use crate::error::Error;
use crate::flash::FlashLatency;
use crate::plan::ClockPlan;
use crate::registers::{fields, ApbPrescaler, ClockRegisters, Field, SysClockSource};

/// APB1 runs at most at 36 MHz, it is always fed SYSCLK / 2.
pub const APB1_PRESCALER: ApbPrescaler = ApbPrescaler::Div2;

/// Status reads allowed per stage unless configured otherwise.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollLimit {
    /// Spin until the hardware responds.
    Unbounded,
    /// Give up after this many reads.
    Attempts(u32),
}

impl Default for PollLimit {
    fn default() -> Self {
        PollLimit::Attempts(DEFAULT_POLL_ATTEMPTS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SequencerState {
    Reset,
    HseEnabled,
    HseReady,
    FlashConfigured,
    Pll2Configured,
    Pll2Enabled,
    Pll2Ready,
    Pll1Configured,
    Pll1Enabled,
    Pll1Ready,
    SwitchRequested,
    SwitchConfirmed,
}

impl SequencerState {
    pub fn next(self) -> Self {
        use SequencerState::*;
        match self {
            Reset => HseEnabled,
            HseEnabled => HseReady,
            HseReady => FlashConfigured,
            FlashConfigured => Pll2Configured,
            Pll2Configured => Pll2Enabled,
            Pll2Enabled => Pll2Ready,
            Pll2Ready => Pll1Configured,
            Pll1Configured => Pll1Enabled,
            Pll1Enabled => Pll1Ready,
            Pll1Ready => SwitchRequested,
            SwitchRequested => SwitchConfirmed,
            SwitchConfirmed => SwitchConfirmed,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == SequencerState::SwitchConfirmed
    }
}

pub struct ClockSequencer<'a, R> {
    regs: &'a mut R,
    plan: ClockPlan,
    latency: FlashLatency,
    poll_limit: PollLimit,
    state: SequencerState,
}

impl<'a, R: ClockRegisters> ClockSequencer<'a, R> {
    pub fn new(regs: &'a mut R, plan: ClockPlan, latency: FlashLatency) -> Self {
        Self {
            regs,
            plan,
            latency,
            poll_limit: PollLimit::default(),
            state: SequencerState::Reset,
        }
    }

    pub fn with_poll_limit(self, poll_limit: PollLimit) -> Self {
        Self { poll_limit, ..self }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Performs the transition out of the current state.
    ///
    /// On error the state stays at the last completed stage. Stepping the terminal state
    /// does nothing.
    pub fn step(&mut self) -> Result<SequencerState, Error> {
        use SequencerState::*;

        if self.state.is_terminal() {
            return Ok(self.state);
        }

        let next = self.state.next();
        match next {
            HseEnabled => {
                // Nothing has been touched yet, refuse a plan that would be mis-encoded.
                self.plan.check_encoding()?;
                self.regs.write_field(fields::HSEON, 1);
            }
            HseReady => self.poll(fields::HSERDY, 1, next)?,
            FlashConfigured => self.latency.apply(&mut *self.regs)?,
            Pll2Configured => {
                // PREDIV1 is fed from PLL2. It lives in CFGR2 so it is written here as well.
                self.regs.write_field(fields::PREDIV1SRC, 1);
                self.regs
                    .write_field(fields::PLL2MUL, self.plan.pll2mul().bits());
                self.regs
                    .write_field(fields::PREDIV2, self.plan.prediv2().bits());
                self.regs
                    .write_field(fields::PREDIV1, self.plan.prediv1().bits());
            }
            Pll2Enabled => self.regs.write_field(fields::PLL2ON, 1),
            Pll2Ready => self.poll(fields::PLL2RDY, 1, next)?,
            Pll1Configured => {
                self.regs
                    .write_field(fields::PLLMUL, self.plan.pll1mul().bits());
                // PLL1 input is PREDIV1, not HSI / 2.
                self.regs.write_field(fields::PLLSRC, 1);
                self.regs
                    .write_field(fields::PPRE1, APB1_PRESCALER as u32);
            }
            Pll1Enabled => self.regs.write_field(fields::PLLON, 1),
            Pll1Ready => self.poll(fields::PLLRDY, 1, next)?,
            SwitchRequested => self
                .regs
                .write_field(fields::SW, SysClockSource::Pll as u32),
            SwitchConfirmed => self.poll(fields::SWS, SysClockSource::Pll as u32, next)?,
            Reset => unreachable!(),
        }

        debug_rprintln!("clock sequencer: {:?}", next);
        self.state = next;

        Ok(next)
    }

    /// Steps until SYSCLK runs from PLL1 and returns its frequency.
    pub fn run(mut self) -> Result<HertzU32, Error> {
        while !self.state.is_terminal() {
            self.step()?;
        }

        Ok(self.plan.sysclk())
    }

    fn poll(&self, field: Field, expected: u32, waiting_for: SequencerState) -> Result<(), Error> {
        match self.poll_limit {
            PollLimit::Unbounded => {
                while self.regs.read_field(field) != expected {}
                Ok(())
            }
            PollLimit::Attempts(attempts) => {
                for _ in 0..attempts {
                    if self.regs.read_field(field) == expected {
                        return Ok(());
                    }
                }

                debug_rprintln!("clock sequencer: timed out waiting for {:?}", waiting_for);
                Err(Error::HardwareNotReady(waiting_for))
            }
        }
    }
}
