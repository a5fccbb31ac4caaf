use crate::IrqControl;

/// Timing of the shared reset pulse, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetTiming {
  /// How long the line is held low.
  pub hold_ms: u32,
  /// How long to wait after release before the first bus access.
  pub settle_ms: u32,
}

impl ResetTiming {
  pub const fn new(hold_ms: u32, settle_ms: u32) -> Self {
    Self { hold_ms, settle_ms }
  }
}

impl Default for ResetTiming {
  fn default() -> Self {
    Self::new(5, 50)
  }
}

/// Board-level settings applied while bringing controllers up.
///
/// The bus address and accepted chip ids are fixed by the part and are not
/// configurable.
///
/// # Example
/// ```no_run
/// use cst816s::{Config, IrqControl, ResetTiming};
///
/// let config = Config::default()
///   .with_irq(IrqControl { motion: true, ..IrqControl::touch_and_change() })
///   .with_reset(ResetTiming::new(10, 100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  /// Interrupt sources switched on at probe. Bits left clear here are not
  /// touched on the device.
  pub irq: IrqControl,
  pub reset: ResetTiming,
}

impl Config {
  pub const fn new(irq: IrqControl, reset: ResetTiming) -> Self {
    Self { irq, reset }
  }

  pub const fn with_irq(mut self, irq: IrqControl) -> Self {
    self.irq = irq;
    self
  }

  pub const fn with_reset(mut self, reset: ResetTiming) -> Self {
    self.reset = reset;
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new(IrqControl::touch_and_change(), ResetTiming::default())
  }
}
