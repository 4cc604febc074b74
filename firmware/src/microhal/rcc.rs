mod reset_enable;

use clocktree::registers::{ClockRegisters, Field, Register};
use clocktree::Config;
use fugit::HertzU32;

use super::pac::{FLASH, RCC};

/// HSI frequency, SYSCLK after reset
pub const HSI_FREQ: HertzU32 = HertzU32::MHz(8);

/// Extension trait for RCC
pub trait RccExt {
    /// Take ownership of the clock tree. FLASH comes along for its latency setting.
    fn constrain(self, flash: FLASH) -> Rcc;
}

impl RccExt for RCC {
    fn constrain(self, flash: FLASH) -> Rcc {
        Rcc {
            rcc: self,
            flash,
            sysclk: HSI_FREQ,
        }
    }
}

/// Constrained RCC peripheral
pub struct Rcc {
    rcc: RCC,
    flash: FLASH,
    sysclk: HertzU32,
}

impl Rcc {
    /// Switch SYSCLK to the PLL. Blocks until the hardware confirms the switch.
    pub fn freeze(&mut self, config: Config) -> Result<HertzU32, clocktree::Error> {
        self.sysclk = clocktree::freeze(self, config)?;
        Ok(self.sysclk)
    }

    pub fn sysclk(&self) -> HertzU32 {
        self.sysclk
    }
}

// The PAC only offers whole-register writes for fields chosen at run time.
#[allow(unsafe_code)]
impl ClockRegisters for Rcc {
    fn write_field(&mut self, field: Field, value: u32) {
        match field.register {
            Register::RccCr => self
                .rcc
                .cr
                .modify(|r, w| unsafe { w.bits(field.insert(r.bits(), value)) }),
            Register::RccCfgr => self
                .rcc
                .cfgr
                .modify(|r, w| unsafe { w.bits(field.insert(r.bits(), value)) }),
            Register::RccCfgr2 => self
                .rcc
                .cfgr2
                .modify(|r, w| unsafe { w.bits(field.insert(r.bits(), value)) }),
            Register::FlashAcr => self
                .flash
                .acr
                .modify(|r, w| unsafe { w.bits(field.insert(r.bits(), value)) }),
        }
    }

    fn read_field(&self, field: Field) -> u32 {
        let bits = match field.register {
            Register::RccCr => self.rcc.cr.read().bits(),
            Register::RccCfgr => self.rcc.cfgr.read().bits(),
            Register::RccCfgr2 => self.rcc.cfgr2.read().bits(),
            Register::FlashAcr => self.flash.acr.read().bits(),
        };
        field.extract(bits)
    }
}

pub trait ResetEnable {
    fn enable(rcc: &Rcc);
}
