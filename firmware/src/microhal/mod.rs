#![deny(unsafe_code)]

pub mod gpio;
pub mod rcc;

pub use stm32f1::stm32f107 as pac;
