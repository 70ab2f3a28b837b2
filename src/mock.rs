//! Recording `embedded-hal` doubles for unit tests

use std::{
    cell::{Cell, RefCell},
    convert::Infallible,
    rc::Rc,
};

use embedded_hal::{
    blocking::{delay::DelayUs, spi::Write},
    digital::v2::{InputPin, OutputPin},
};


#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinId {
    Ce,
    Le,
    Clk,
    Data,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    Set(PinId, bool),
    Delay(u16),
}

/// Shared recorder all doubles write into
#[derive(Clone, Default)]
pub struct Bus {
    events: Rc<RefCell<Vec<Event>>>,
    spi: Rc<RefCell<Vec<u8>>>,
    lock: Rc<Cell<bool>>,
}

impl Bus {
    pub fn new() -> Self {
        Bus::default()
    }

    pub fn pin(&self, id: PinId) -> Pin {
        Pin { id, events: self.events.clone() }
    }

    pub fn failing_pin(&self) -> FailingPin {
        FailingPin
    }

    pub fn delay(&self) -> Delay {
        Delay { events: self.events.clone() }
    }

    pub fn spi(&self) -> Spi {
        Spi { bytes: self.spi.clone() }
    }

    pub fn lock_detect(&self) -> LockDetect {
        LockDetect { level: self.lock.clone() }
    }

    pub fn set_lock(&self, locked: bool) {
        self.lock.set(locked);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
        self.spi.borrow_mut().clear();
    }

    pub fn spi_bytes(&self) -> Vec<u8> {
        self.spi.borrow().clone()
    }

    /// Last level driven on a pin
    pub fn level(&self, id: PinId) -> Option<bool> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            Event::Set(p, l) if *p == id => Some(*l),
            _ => None,
        })
    }

    /// Low to high transitions, pins start out low
    pub fn rising_edges(&self, id: PinId) -> usize {
        let mut prev = false;
        let mut n = 0;
        for e in self.events.borrow().iter() {
            if let Event::Set(p, l) = e {
                if *p == id {
                    if *l && !prev {
                        n += 1;
                    }
                    prev = *l;
                }
            }
        }
        n
    }

    pub fn elapsed_us(&self) -> u32 {
        self.events.borrow().iter().map(|e| match e {
            Event::Delay(us) => *us as u32,
            _ => 0,
        }).sum()
    }

    /// Words as the device sees them: DATA sampled on CLK rising edges,
    /// shift register latched on LE rising edges.
    pub fn latched_words(&self) -> Vec<u32> {
        let mut words = Vec::new();
        let (mut data, mut clk, mut le) = (false, false, false);
        let mut shift = 0u32;
        for e in self.events.borrow().iter() {
            match e {
                Event::Set(PinId::Data, l) => data = *l,
                Event::Set(PinId::Clk, l) => {
                    if *l && !clk {
                        shift = (shift << 1) | data as u32;
                    }
                    clk = *l;
                }
                Event::Set(PinId::Le, l) => {
                    if *l && !le {
                        words.push(shift);
                    }
                    le = *l;
                }
                _ => {}
            }
        }
        words
    }
}


pub struct Pin {
    id: PinId,
    events: Rc<RefCell<Vec<Event>>>,
}

impl OutputPin for Pin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(Event::Set(self.id, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(Event::Set(self.id, true));
        Ok(())
    }
}

pub struct FailingPin;

impl OutputPin for FailingPin {
    type Error = ();

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(())
    }
}

pub struct LockDetect {
    level: Rc<Cell<bool>>,
}

impl InputPin for LockDetect {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

pub struct Delay {
    events: Rc<RefCell<Vec<Event>>>,
}

impl DelayUs<u16> for Delay {
    fn delay_us(&mut self, us: u16) {
        self.events.borrow_mut().push(Event::Delay(us));
    }
}

pub struct Spi {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl Write<u8> for Spi {
    type Error = Infallible;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.bytes.borrow_mut().extend_from_slice(words);
        Ok(())
    }
}
