//! PLL parameter search for the connectivity line clock tree.
//!
//! ```text
//! HSE ── PREDIV2 ── PLL2MUL ── PREDIV1 ── PLLMUL ── SYSCLK
//!                   (PLL2)                (PLL1)
//! ```
//!
//! Every combination of the four fields is tried. PLL2 output has to stay within
//! 18..=72 MHz, PLL1 output at or above 18 MHz and not above the requested SYSCLK. The
//! fastest surviving combination wins; on ties the first one found is kept.

use fugit::HertzU32;

use crate::error::Error;
use crate::registers::{fields, Field};
use crate::sequencer::APB1_PRESCALER;

/// Lowest output frequency of either PLL.
pub const PLL_MIN: HertzU32 = HertzU32::MHz(18);
/// Highest PLL2 output frequency.
pub const PLL2_MAX: HertzU32 = HertzU32::MHz(72);

/// PREDIV1 or PREDIV2 divisor, 1..=16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Prediv(u8);

impl Prediv {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 16;

    pub fn new(divisor: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&divisor).then_some(Self(divisor))
    }

    pub fn divisor(self) -> u32 {
        self.0 as u32
    }

    pub fn bits(self) -> u32 {
        self.divisor() - 1
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        u8::try_from(bits)
            .ok()
            .and_then(|bits| bits.checked_add(1))
            .and_then(Self::new)
    }

    fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

/// PLL2 multiplier. 15, 17, 18 and 19 are not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Pll2Mul {
    Mul8 = 8,
    Mul9 = 9,
    Mul10 = 10,
    Mul11 = 11,
    Mul12 = 12,
    Mul13 = 13,
    Mul14 = 14,
    Mul16 = 16,
    Mul20 = 20,
}

impl Pll2Mul {
    pub const ALL: [Pll2Mul; 9] = [
        Pll2Mul::Mul8,
        Pll2Mul::Mul9,
        Pll2Mul::Mul10,
        Pll2Mul::Mul11,
        Pll2Mul::Mul12,
        Pll2Mul::Mul13,
        Pll2Mul::Mul14,
        Pll2Mul::Mul16,
        Pll2Mul::Mul20,
    ];

    pub fn multiplier(self) -> u32 {
        self as u32
    }

    pub fn bits(self) -> u32 {
        match self {
            Pll2Mul::Mul20 => 0b1111,
            other => other.multiplier() - 2,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|mul| mul.bits() == bits)
    }
}

/// PLL1 multiplier. 6.5 is a separate setting, not part of the integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pll1Mul {
    Mul4,
    Mul5,
    Mul6,
    Mul7,
    Mul8,
    Mul9,
    Mul6_5,
}

impl Pll1Mul {
    /// Search order; 6.5 comes last.
    pub const ALL: [Pll1Mul; 7] = [
        Pll1Mul::Mul4,
        Pll1Mul::Mul5,
        Pll1Mul::Mul6,
        Pll1Mul::Mul7,
        Pll1Mul::Mul8,
        Pll1Mul::Mul9,
        Pll1Mul::Mul6_5,
    ];

    /// Multiplier as numerator and denominator.
    pub fn ratio(self) -> (u32, u32) {
        match self {
            Pll1Mul::Mul4 => (4, 1),
            Pll1Mul::Mul5 => (5, 1),
            Pll1Mul::Mul6 => (6, 1),
            Pll1Mul::Mul7 => (7, 1),
            Pll1Mul::Mul8 => (8, 1),
            Pll1Mul::Mul9 => (9, 1),
            Pll1Mul::Mul6_5 => (13, 2),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Pll1Mul::Mul6_5 => 0b1101,
            other => other.ratio().0 - 2,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|mul| mul.bits() == bits)
    }
}

fn pll2_output(crystal_hz: u64, prediv2: Prediv, pll2mul: Pll2Mul) -> u64 {
    crystal_hz / u64::from(prediv2.divisor()) * u64::from(pll2mul.multiplier())
}

fn pll1_output(pll2_hz: u64, prediv1: Prediv, pll1mul: Pll1Mul) -> u64 {
    let (numerator, denominator) = pll1mul.ratio();
    pll2_hz / u64::from(prediv1.divisor()) * u64::from(numerator) / u64::from(denominator)
}

/// PLL settings selected by [`plan`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockPlan {
    prediv2: Prediv,
    pll2mul: Pll2Mul,
    prediv1: Prediv,
    pll1mul: Pll1Mul,
    pll2: HertzU32,
    sysclk: HertzU32,
}

impl ClockPlan {
    pub fn prediv2(&self) -> Prediv {
        self.prediv2
    }

    pub fn pll2mul(&self) -> Pll2Mul {
        self.pll2mul
    }

    pub fn prediv1(&self) -> Prediv {
        self.prediv1
    }

    pub fn pll1mul(&self) -> Pll1Mul {
        self.pll1mul
    }

    /// PLL2 output, the PREDIV1 input.
    pub fn pll2(&self) -> HertzU32 {
        self.pll2
    }

    /// PLL1 output, the SYSCLK once the switch is done.
    pub fn sysclk(&self) -> HertzU32 {
        self.sysclk
    }

    pub fn pclk1(&self) -> HertzU32 {
        self.sysclk / APB1_PRESCALER.divisor()
    }

    /// Checks that every encoded field decodes back to the planned value.
    pub fn check_encoding(&self) -> Result<(), Error> {
        fn check<T: PartialEq>(
            field: Field,
            value: T,
            bits: u32,
            decode: impl Fn(u32) -> Option<T>,
        ) -> Result<(), Error> {
            if decode(bits) == Some(value) {
                Ok(())
            } else {
                Err(Error::InvalidFieldEncoding { field, bits })
            }
        }

        check(fields::PREDIV2, self.prediv2, self.prediv2.bits(), Prediv::from_bits)?;
        check(fields::PLL2MUL, self.pll2mul, self.pll2mul.bits(), Pll2Mul::from_bits)?;
        check(fields::PREDIV1, self.prediv1, self.prediv1.bits(), Prediv::from_bits)?;
        check(fields::PLLMUL, self.pll1mul, self.pll1mul.bits(), Pll1Mul::from_bits)
    }
}

/// Finds the fastest SYSCLK not above `target` that `crystal` can be multiplied to.
pub fn plan(crystal: HertzU32, target: HertzU32) -> Result<ClockPlan, Error> {
    let crystal_hz = u64::from(crystal.raw());
    let target_hz = u64::from(target.raw());
    let pll_min_hz = u64::from(PLL_MIN.raw());
    let pll2_max_hz = u64::from(PLL2_MAX.raw());

    let mut best: Option<(u64, ClockPlan)> = None;

    for prediv2 in Prediv::all() {
        for pll2mul in Pll2Mul::ALL {
            let pll2_hz = pll2_output(crystal_hz, prediv2, pll2mul);
            if !(pll_min_hz..=pll2_max_hz).contains(&pll2_hz) {
                continue;
            }

            for prediv1 in Prediv::all() {
                for pll1mul in Pll1Mul::ALL {
                    let pll1_hz = pll1_output(pll2_hz, prediv1, pll1mul);
                    if pll1_hz < pll_min_hz || pll1_hz > target_hz {
                        continue;
                    }

                    if best.map_or(true, |(best_hz, _)| pll1_hz > best_hz) {
                        // Both fit: pll2 is at most 72 MHz and pll1 at most `target`.
                        let plan = ClockPlan {
                            prediv2,
                            pll2mul,
                            prediv1,
                            pll1mul,
                            pll2: HertzU32::from_raw(pll2_hz as u32),
                            sysclk: HertzU32::from_raw(pll1_hz as u32),
                        };
                        best = Some((pll1_hz, plan));
                    }
                }
            }
        }
    }

    best.map(|(_, plan)| plan).ok_or(Error::NoSolutionFound {
        crystal_hz: crystal.raw(),
        target_hz: target.raw(),
    })
}
