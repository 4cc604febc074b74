#![no_std]
#![no_main]
#![deny(unsafe_code)]

mod board;
mod error;
mod microhal;

use core::panic::PanicInfo;

use cortex_m_rt::entry;
use rtt_target::debug_rprintln;
#[cfg(debug_assertions)]
use rtt_target::rtt_init_print;

use crate::error::Error;

/// LED state changes per second.
const TOGGLES_PER_SECOND: u32 = 4;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    debug_rprintln!("{}", info);

    cortex_m::asm::bkpt();
    cortex_m::asm::udf();
}

#[entry]
fn main() -> ! {
    move || -> Result<(), Error> {
        #[cfg(debug_assertions)]
        rtt_init_print!(rtt_target::ChannelMode::NoBlockSkip, 1024);

        debug_rprintln!("starting");

        let mut board = board::Board::new()?;

        // Busy-wait, the delay scales with whatever frequency the PLL ended up at.
        let cycles = board.sysclk.raw() / TOGGLES_PER_SECOND;
        loop {
            cortex_m::asm::delay(cycles);
            board.led.toggle();
        }
    }()
    .expect("error in main");

    unreachable!();
}
