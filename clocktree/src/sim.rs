//! Simulated RCC and FLASH registers for host tests.

use core::cell::{Cell, RefCell};

use crate::registers::{fields, ClockRegisters, Field, Register};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Write(Field, u32),
    Read(Field, u32),
}

/// Status fields and the control fields they follow once the hardware has settled.
const FOLLOWS: [(Field, Field); 4] = [
    (fields::HSERDY, fields::HSEON),
    (fields::PLL2RDY, fields::PLL2ON),
    (fields::PLLRDY, fields::PLLON),
    (fields::SWS, fields::SW),
];

pub struct SimRegisters {
    cr: Cell<u32>,
    cfgr: Cell<u32>,
    cfgr2: Cell<u32>,
    acr: Cell<u32>,
    ready_after: u32,
    pending_reads: Cell<u32>,
    stuck: Option<Field>,
    accesses: RefCell<Vec<Access>>,
}

impl SimRegisters {
    /// Registers in their reset state; status fields settle on the first read.
    pub fn new() -> Self {
        Self {
            cr: Cell::new(0),
            cfgr: Cell::new(0),
            cfgr2: Cell::new(0),
            acr: Cell::new(0),
            ready_after: 0,
            pending_reads: Cell::new(0),
            stuck: None,
            accesses: RefCell::new(Vec::new()),
        }
    }

    /// Status fields report the old value for `reads` reads after their control field changed.
    pub fn ready_after(self, reads: u32) -> Self {
        Self {
            ready_after: reads,
            ..self
        }
    }

    /// `field` ignores writes and never settles.
    pub fn stuck(self, field: Field) -> Self {
        Self {
            stuck: Some(field),
            ..self
        }
    }

    pub fn preset(self, register: Register, bits: u32) -> Self {
        self.cell(register).set(bits);
        self
    }

    pub fn register(&self, register: Register) -> u32 {
        self.cell(register).get()
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.accesses.borrow().clone()
    }

    pub fn reads_of(&self, field: Field) -> usize {
        self.accesses
            .borrow()
            .iter()
            .filter(|access| matches!(access, Access::Read(f, _) if *f == field))
            .count()
    }

    fn cell(&self, register: Register) -> &Cell<u32> {
        match register {
            Register::RccCr => &self.cr,
            Register::RccCfgr => &self.cfgr,
            Register::RccCfgr2 => &self.cfgr2,
            Register::FlashAcr => &self.acr,
        }
    }

    fn get(&self, field: Field) -> u32 {
        field.extract(self.cell(field.register).get())
    }

    fn set(&self, field: Field, value: u32) {
        let cell = self.cell(field.register);
        cell.set(field.insert(cell.get(), value));
    }

    fn settle(&self, status: Field) {
        if self.stuck == Some(status) {
            return;
        }
        let Some(&(_, control)) = FOLLOWS.iter().find(|(s, _)| *s == status) else {
            return;
        };
        if self.get(status) == self.get(control) {
            return;
        }

        let reads = self.pending_reads.get() + 1;
        if reads > self.ready_after {
            self.set(status, self.get(control));
            self.pending_reads.set(0);
        } else {
            self.pending_reads.set(reads);
        }
    }
}

impl ClockRegisters for SimRegisters {
    fn write_field(&mut self, field: Field, value: u32) {
        self.accesses.borrow_mut().push(Access::Write(field, value));
        if self.stuck != Some(field) {
            self.set(field, value);
        }
    }

    fn read_field(&self, field: Field) -> u32 {
        self.settle(field);
        let value = self.get(field);
        self.accesses.borrow_mut().push(Access::Read(field, value));
        value
    }
}
