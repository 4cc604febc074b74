use super::pac::GPIOE;

/// Output speed, MODEy encoding
#[allow(unused)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSpeed {
    MHz10 = 0b01,
    MHz2 = 0b10,
    MHz50 = 0b11,
}

/// Push-pull output on PE14, the LED of the board. The port clock must be enabled.
pub struct Led {
    port: GPIOE,
    lit: bool,
}

impl Led {
    const PIN: u32 = 14;

    #[allow(unsafe_code)]
    pub fn new(port: GPIOE, speed: OutputSpeed) -> Self {
        // CRH configures pins 8..=15 with four bits each: MODE in the low two, CNF above.
        // CNF = 0b00 is general purpose push-pull.
        let shift = (Self::PIN - 8) * 4;
        port.crh.modify(|r, w| unsafe {
            w.bits((r.bits() & !(0b1111 << shift)) | ((speed as u32) << shift))
        });

        let mut led = Self { port, lit: true };
        led.set(false);
        led
    }

    pub fn set(&mut self, lit: bool) {
        if lit {
            self.port.bsrr.write(|w| w.bs14().set_bit());
        } else {
            self.port.bsrr.write(|w| w.br14().set_bit());
        }
        self.lit = lit;
    }

    pub fn toggle(&mut self) {
        self.set(!self.lit);
    }
}
