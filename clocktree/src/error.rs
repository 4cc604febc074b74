use thiserror::Error;

use crate::registers::Field;
use crate::sequencer::SequencerState;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum Error {
    #[error("no PLL setting reaches {target_hz} Hz from a {crystal_hz} Hz crystal")]
    NoSolutionFound { crystal_hz: u32, target_hz: u32 },
    #[error("hardware never reached {0:?}")]
    HardwareNotReady(SequencerState),
    #[error("invalid encoding {bits:#x} for {field:?}")]
    InvalidFieldEncoding { field: Field, bits: u32 },
}
