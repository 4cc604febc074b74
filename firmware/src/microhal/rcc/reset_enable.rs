use stm32f1::stm32f107::{GPIOA, GPIOB, GPIOC, GPIOD, GPIOE};

use super::{Rcc, ResetEnable};

macro_rules! reset_enable {
    ($dev:ident, $enable:ident) => {
        impl ResetEnable for $dev {
            fn enable(rcc: &Rcc) {
                rcc.rcc.apb2enr.modify(|_, w| w.$enable().set_bit());
            }
        }
    };
}

// APB2 devices
reset_enable!(GPIOA, iopaen); // 2
reset_enable!(GPIOB, iopben); // 3
reset_enable!(GPIOC, iopcen); // 4
reset_enable!(GPIOD, iopden); // 5
reset_enable!(GPIOE, iopeen); // 6
