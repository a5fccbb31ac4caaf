#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async, `no_std` driver for the Hynitron CST816S capacitive touch
//! controller, built for boards that wire several controllers (one per I²C
//! bus) to a single shared interrupt line.
//!
//! The crate is split along the execution contexts it has to serve:
//!
//! - a register protocol layer on top of `embedded-hal-async` 1.0 I²C
//! - a fixed-capacity [`Registry`] of live controllers, locked with a
//!   blocking guard from tasks and a try-only guard from the interrupt
//! - a [`Dispatcher`] that turns one platform interrupt callback into a wake
//!   of every live controller's poll task
//! - a poll loop ([`Cst816s::run`]) that burst-reads the coordinates and
//!   publishes them lock-free
//! - a [`PointerDevice`] bridge polled by the host UI framework
//!
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex as Cs;
//! use embedded_hal_async::i2c::{I2c, SevenBitAddress};
//! use cst816s::{attach, Config, Dispatcher, Instance, PointerInput, Registry};
//!
//! static TOUCH: [Instance<Cs>; 2] = [Instance::new(), Instance::new()];
//! static REGISTRY: Registry<'static, Cs, u8, 2> = Registry::new();
//! // Installed exactly once as the GPIO callback for pin 17:
//! //   fn on_gpio(pin: u8) { DISPATCHER.on_edge(pin); }
//! static DISPATCHER: Dispatcher<'static, 'static, Cs, u8, 2> = Dispatcher::new(&REGISTRY, 17);
//!
//! async fn bring_up<I, E, H>(i2c: I, host: &mut H) -> !
//! where
//!   I: I2c<SevenBitAddress, Error = E>,
//!   H: PointerInput<'static, Handle = u8>,
//! {
//!   match attach(i2c, &TOUCH[0], &REGISTRY, host, &Config::default()).await {
//!     Some(mut touch) => touch.run().await,
//!     None => core::future::pending().await,
//!   }
//! }
//! ```
mod fmt;

mod config;
mod dispatch;
mod event;
mod init;
mod instance;
mod poll;
mod pointer;
mod reg;
mod registry;
mod rw;
mod setup;

#[cfg(test)]
mod mock;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

pub use config::*;
pub use dispatch::{Dispatch, Dispatcher};
pub use event::{Point, TouchPhase, TouchState};
pub use instance::Instance;
pub use pointer::{PointerDevice, PointerInput, PointerReading};
pub use reg::IrqControl;
use reg::*;
pub use registry::{IsrGuard, Registry, RegistryError, SlotId, TaskGuard};
use rw::Stop;
pub use setup::{attach, detach, reset_all};

/// Errors that can occur while talking to a controller.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I²C bus transaction failed with the underlying driver error.
  I2c(E),
  /// Nothing answered the chip-id read; the bus has no controller fitted.
  NotPresent,
  /// The device reported an identity byte outside the known CST816S set.
  InvalidChipId(u8),
  /// A register held a value that does not decode into its typed layout.
  Malformed(u8),
}

impl<E> Error<E> {
  /// `true` when the error only means "no usable controller on this bus",
  /// which boards treat as a valid configuration rather than a fault.
  pub fn is_absence(&self) -> bool {
    matches!(self, Error::NotPresent | Error::InvalidChipId(_))
  }
}

/// A probed CST816S controller.
///
/// The driver owns its I²C bus and borrows the [`Instance`] that the
/// [`Registry`], the [`Dispatcher`] and the host's [`PointerDevice`] share
/// with it. Create one with [`Cst816s::probe`] (or [`attach`], which also
/// claims a registry slot) and then drive [`Cst816s::run`] from its own task.
pub struct Cst816s<'a, I, M: RawMutex> {
  i2c: I,
  instance: &'a Instance<M>,
}

impl<'a, I, E, M> Cst816s<'a, I, M>
where
  I: I2c<SevenBitAddress, Error = E>,
  M: RawMutex,
{
  pub(crate) fn new(i2c: I, instance: &'a Instance<M>) -> Self {
    Self { i2c, instance }
  }

  /// Shared state this controller publishes into.
  pub fn instance(&self) -> &'a Instance<M> {
    self.instance
  }

  /// Give the bus back, e.g. after [`detach`].
  pub fn release(self) -> I {
    self.i2c
  }
}
