//! Register fields of the STM32F105/107 clock tree and the access trait the platform implements.

/// Registers touched while bringing up the clock tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// RCC_CR, clock control
    RccCr,
    /// RCC_CFGR, clock configuration
    RccCfgr,
    /// RCC_CFGR2, PLL2/PLL3 and prescaler configuration (connectivity line only)
    RccCfgr2,
    /// FLASH_ACR, flash access control
    FlashAcr,
}

/// A bit field inside one register. Single status and control bits are fields of width 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub register: Register,
    pub offset: u8,
    pub width: u8,
}

impl Field {
    pub const fn new(register: Register, offset: u8, width: u8) -> Self {
        Self {
            register,
            offset,
            width,
        }
    }

    pub const fn bit(register: Register, offset: u8) -> Self {
        Self::new(register, offset, 1)
    }

    /// Bits covered by the field, in register position.
    pub const fn mask(self) -> u32 {
        (((1u64 << self.width) - 1) as u32) << self.offset
    }

    /// Replaces the field inside `register_bits` with `value`. Excess bits of `value` are dropped.
    pub const fn insert(self, register_bits: u32, value: u32) -> u32 {
        (register_bits & !self.mask()) | ((value << self.offset) & self.mask())
    }

    pub const fn extract(self, register_bits: u32) -> u32 {
        (register_bits & self.mask()) >> self.offset
    }
}

/// Field map, RM0008 7.3 (connectivity line devices).
pub mod fields {
    use super::{Field, Register};

    pub const HSEON: Field = Field::bit(Register::RccCr, 16);
    pub const HSERDY: Field = Field::bit(Register::RccCr, 17);
    pub const PLLON: Field = Field::bit(Register::RccCr, 24);
    pub const PLLRDY: Field = Field::bit(Register::RccCr, 25);
    pub const PLL2ON: Field = Field::bit(Register::RccCr, 26);
    pub const PLL2RDY: Field = Field::bit(Register::RccCr, 27);

    pub const SW: Field = Field::new(Register::RccCfgr, 0, 2);
    pub const SWS: Field = Field::new(Register::RccCfgr, 2, 2);
    pub const PPRE1: Field = Field::new(Register::RccCfgr, 8, 3);
    pub const PLLSRC: Field = Field::bit(Register::RccCfgr, 16);
    pub const PLLMUL: Field = Field::new(Register::RccCfgr, 18, 4);

    pub const PREDIV1: Field = Field::new(Register::RccCfgr2, 0, 4);
    pub const PREDIV2: Field = Field::new(Register::RccCfgr2, 4, 4);
    pub const PLL2MUL: Field = Field::new(Register::RccCfgr2, 8, 4);
    pub const PREDIV1SRC: Field = Field::bit(Register::RccCfgr2, 16);

    pub const LATENCY: Field = Field::new(Register::FlashAcr, 0, 3);
}

/// SYSCLK source, as written to SW and reported by SWS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SysClockSource {
    Hsi = 0b00,
    Hse = 0b01,
    Pll = 0b10,
}

/// APB prescaler, PPRE1/PPRE2 encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ApbPrescaler {
    NotDivided = 0b000,
    Div2 = 0b100,
    Div4 = 0b101,
    Div8 = 0b110,
    Div16 = 0b111,
}

impl ApbPrescaler {
    pub fn divisor(self) -> u32 {
        match self {
            ApbPrescaler::NotDivided => 1,
            ApbPrescaler::Div2 => 2,
            ApbPrescaler::Div4 => 4,
            ApbPrescaler::Div8 => 8,
            ApbPrescaler::Div16 => 16,
        }
    }
}

/// Access to the clock tree registers, implemented by the platform.
///
/// Implementations own the registers for as long as the bring-up runs.
pub trait ClockRegisters {
    /// Sets `field` to `value`, leaving the other bits of the register untouched.
    fn write_field(&mut self, field: Field, value: u32);

    fn read_field(&self, field: Field) -> u32;

    fn read_bit(&self, field: Field) -> bool {
        self.read_field(field) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::fields::*;
    use super::*;

    #[test]
    fn masks_match_reference_manual() {
        assert_eq!(HSEON.mask(), 0x0001_0000);
        assert_eq!(PLL2RDY.mask(), 0x0800_0000);
        assert_eq!(SWS.mask(), 0x0000_000c);
        assert_eq!(PPRE1.mask(), 0x0000_0700);
        assert_eq!(PLLMUL.mask(), 0x003c_0000);
        assert_eq!(PLL2MUL.mask(), 0x0000_0f00);
        assert_eq!(LATENCY.mask(), 0x0000_0007);
    }

    #[test]
    fn insert_replaces_only_the_field() {
        let bits = 0xffff_ffff;
        assert_eq!(PREDIV2.insert(bits, 4), 0xffff_ff4f);
        assert_eq!(PREDIV2.insert(0, 0x1f), 0x0000_00f0);
        assert_eq!(LATENCY.insert(0b001, 0b010), 0b010);
    }

    #[test]
    fn extract_reads_back_inserted_value() {
        let bits = PLLMUL.insert(PLLSRC.insert(0, 1), 13);
        assert_eq!(PLLMUL.extract(bits), 13);
        assert_eq!(PLLSRC.extract(bits), 1);
        assert_eq!(SW.extract(bits), 0);
    }

    #[test]
    fn full_width_field() {
        let field = Field::new(Register::RccCr, 0, 32);
        assert_eq!(field.mask(), u32::MAX);
        assert_eq!(field.insert(0x1234, 0xdead_beef), 0xdead_beef);
    }
}
