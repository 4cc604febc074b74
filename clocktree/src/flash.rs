//! Flash wait states for a given SYSCLK, RM0008 3.3.3.

use fugit::HertzU32;

use crate::error::Error;
use crate::registers::{fields, ClockRegisters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FlashLatency {
    /// 0 < SYSCLK < 24 MHz
    Ws0 = 0b000,
    /// 24 MHz <= SYSCLK < 48 MHz
    Ws1 = 0b001,
    /// 48 MHz <= SYSCLK <= 72 MHz
    Ws2 = 0b010,
}

impl FlashLatency {
    pub fn for_sysclk(sysclk: HertzU32) -> Self {
        if sysclk < HertzU32::MHz(24) {
            FlashLatency::Ws0
        } else if sysclk < HertzU32::MHz(48) {
            FlashLatency::Ws1
        } else {
            FlashLatency::Ws2
        }
    }

    pub fn wait_states(self) -> u32 {
        self as u32
    }

    /// Sets LATENCY and reads it back.
    ///
    /// The field is replaced, not OR-ed into: merging 1 into a field already holding 2
    /// would produce the undefined value 3.
    pub fn apply<R: ClockRegisters>(self, regs: &mut R) -> Result<(), Error> {
        regs.write_field(fields::LATENCY, self.wait_states());

        let bits = regs.read_field(fields::LATENCY);
        match FlashLatency::try_from(bits) {
            Ok(latency) if latency == self => Ok(()),
            _ => Err(Error::InvalidFieldEncoding {
                field: fields::LATENCY,
                bits,
            }),
        }
    }
}

impl TryFrom<u32> for FlashLatency {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            0 => Ok(FlashLatency::Ws0),
            1 => Ok(FlashLatency::Ws1),
            2 => Ok(FlashLatency::Ws2),
            _ => Err(Error::InvalidFieldEncoding {
                field: fields::LATENCY,
                bits,
            }),
        }
    }
}
