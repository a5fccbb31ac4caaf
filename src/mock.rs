//! Test doubles for the bus, reset line, delay and the host pointer-input
//! framework.

extern crate std;

use core::cell::RefCell;
use core::convert::Infallible;
use std::vec::Vec;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};

use crate::{PointerDevice, PointerInput, Reg, I2C_ADDR};

/// In-memory CST816S register file with auto-incrementing register pointer.
pub(crate) struct MockBus {
  regs: [u8; 256],
  pointer: u8,
  /// No device answers on the bus at all.
  pub absent: bool,
  pub fail_reads: bool,
  pub fail_writes: bool,
  pub transactions: usize,
  pub reads: usize,
  pub writes: usize,
}

impl MockBus {
  pub fn new() -> Self {
    Self {
      regs: [0; 256],
      pointer: 0,
      absent: false,
      fail_reads: false,
      fail_writes: false,
      transactions: 0,
      reads: 0,
      writes: 0,
    }
  }

  /// A bus with a responsive controller reporting `chip_id`.
  pub fn with_chip(chip_id: u8) -> Self {
    let mut bus = Self::new();
    bus.set(Reg::ChipId, chip_id);
    bus.set(Reg::FirmwareVersion, 2);
    bus
  }

  pub fn set(&mut self, reg: Reg, value: u8) {
    self.regs[reg as usize] = value;
  }

  pub fn get(&self, reg: Reg) -> u8 {
    self.regs[reg as usize]
  }

  pub fn load(&mut self, reg: Reg, values: &[u8]) {
    let start = reg as usize;
    self.regs[start..start + values.len()].copy_from_slice(values);
  }
}

impl ErrorType for MockBus {
  type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for MockBus {
  async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
    self.transactions += 1;
    if self.absent || address != I2C_ADDR {
      return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
    }

    for op in operations.iter_mut() {
      match op {
        Operation::Write(bytes) => {
          let Some((&cmd, data)) = bytes.split_first() else { continue };
          if !data.is_empty() && self.fail_writes {
            return Err(ErrorKind::Other);
          }
          self.pointer = cmd;
          if !data.is_empty() {
            self.writes += 1;
          }
          for &b in data {
            self.regs[self.pointer as usize] = b;
            self.pointer = self.pointer.wrapping_add(1);
          }
        }
        Operation::Read(buf) => {
          if self.fail_reads {
            return Err(ErrorKind::Other);
          }
          self.reads += 1;
          for b in buf.iter_mut() {
            *b = self.regs[self.pointer as usize];
            self.pointer = self.pointer.wrapping_add(1);
          }
        }
      }
    }
    Ok(())
  }
}

/// Host framework stand-in that hands out slot-sized numeric handles.
pub(crate) struct MockHost<'a> {
  pub devices: [Option<PointerDevice<'a>>; 4],
  pub reject: bool,
  pub unregistered: usize,
}

impl<'a> MockHost<'a> {
  pub fn new() -> Self {
    Self { devices: [None; 4], reject: false, unregistered: 0 }
  }

  pub fn registered(&self) -> usize {
    self.devices.iter().filter(|d| d.is_some()).count()
  }
}

impl<'a> PointerInput<'a> for MockHost<'a> {
  type Handle = u8;

  fn register(&mut self, device: PointerDevice<'a>) -> Option<u8> {
    if self.reject {
      return None;
    }
    let free = self.devices.iter().position(Option::is_none)?;
    self.devices[free] = Some(device);
    Some(free as u8)
  }

  fn unregister(&mut self, handle: u8) {
    self.devices[handle as usize] = None;
    self.unregistered += 1;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
  Low,
  High,
  DelayMs(u32),
  DelayNs(u32),
}

/// Ordered record of what the reset pin and the delay saw.
pub(crate) struct Trace(RefCell<Vec<Step>>);

impl Trace {
  pub fn new() -> Self {
    Self(RefCell::new(Vec::new()))
  }

  pub fn steps(&self) -> Vec<Step> {
    self.0.borrow().clone()
  }

  fn push(&self, step: Step) {
    self.0.borrow_mut().push(step);
  }
}

pub(crate) struct MockPin<'t>(&'t Trace);

impl<'t> MockPin<'t> {
  pub fn new(trace: &'t Trace) -> Self {
    Self(trace)
  }
}

impl digital::ErrorType for MockPin<'_> {
  type Error = Infallible;
}

impl OutputPin for MockPin<'_> {
  fn set_low(&mut self) -> Result<(), Self::Error> {
    self.0.push(Step::Low);
    Ok(())
  }

  fn set_high(&mut self) -> Result<(), Self::Error> {
    self.0.push(Step::High);
    Ok(())
  }
}

pub(crate) struct MockDelay<'t>(&'t Trace);

impl<'t> MockDelay<'t> {
  pub fn new(trace: &'t Trace) -> Self {
    Self(trace)
  }
}

impl DelayNs for MockDelay<'_> {
  async fn delay_ns(&mut self, ns: u32) {
    self.0.push(Step::DelayNs(ns));
  }

  async fn delay_ms(&mut self, ms: u32) {
    self.0.push(Step::DelayMs(ms));
  }
}

/// Records every `log` call made on the current test thread.
#[cfg(feature = "log")]
pub(crate) mod logs {
  use std::format;
  use std::string::String;
  use std::sync::Mutex;
  use std::thread::{self, ThreadId};
  use std::vec::Vec;

  use log::{Level, LevelFilter, Log, Metadata, Record};

  static RECORDS: Mutex<Vec<(ThreadId, Level, String)>> = Mutex::new(Vec::new());

  struct Capture;

  impl Log for Capture {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
      true
    }

    fn log(&self, record: &Record<'_>) {
      let line = format!("{}", record.args());
      if let Ok(mut records) = RECORDS.lock() {
        records.push((thread::current().id(), record.level(), line));
      }
    }

    fn flush(&self) {}
  }

  static CAPTURE: Capture = Capture;

  /// Route `log` into the capture. Safe to call from every test.
  pub fn capture() {
    _ = log::set_logger(&CAPTURE);
    log::set_max_level(LevelFilter::Trace);
  }

  /// Whether this thread logged a `level` record containing `needle`.
  pub fn logged(level: Level, needle: &str) -> bool {
    let me = thread::current().id();
    RECORDS.lock().unwrap().iter().any(|(id, l, line)| *id == me && *l == level && line.contains(needle))
  }
}
