use clocktree::sequencer::APB1_PRESCALER;
use clocktree::Config;
use fugit::HertzU32;
use rtt_target::debug_rprintln;

use crate::error::Error;
use crate::microhal::gpio::{Led, OutputSpeed};
use crate::microhal::pac::{self, GPIOA, GPIOB, GPIOC, GPIOD, GPIOE};
use crate::microhal::rcc::{RccExt, ResetEnable};

/// Crystal connected to OSC_IN/OSC_OUT.
pub const CRYSTAL: HertzU32 = HertzU32::MHz(25);

/// Requested core frequency.
pub const SYSCLK: HertzU32 = HertzU32::MHz(72);

pub struct Board {
    pub sysclk: HertzU32,
    pub led: Led,
}

impl Board {
    pub fn new() -> Result<Self, Error> {
        let _cp = pac::CorePeripherals::take().ok_or(Error::AlreadyTaken)?;
        let dp = pac::Peripherals::take().ok_or(Error::AlreadyTaken)?;

        let mut rcc = dp.RCC.constrain(dp.FLASH);

        GPIOA::enable(&rcc);
        GPIOB::enable(&rcc);
        GPIOC::enable(&rcc);
        GPIOD::enable(&rcc);
        GPIOE::enable(&rcc);

        debug_rprintln!("running from HSI, {} Hz", rcc.sysclk().raw());
        rcc.freeze(Config::hse(CRYSTAL).sysclk(SYSCLK))?;

        let sysclk = rcc.sysclk();
        debug_rprintln!(
            "running from PLL, SYSCLK {} Hz, APB1 {} Hz",
            sysclk.raw(),
            (sysclk / APB1_PRESCALER.divisor()).raw()
        );

        Ok(Self {
            sysclk,
            led: Led::new(dp.GPIOE, OutputSpeed::MHz10),
        })
    }
}
