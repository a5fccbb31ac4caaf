/******************************************************************************
 * Register map as published for the Hynitron CST816S and mirrored by the     *
 * Zephyr `kscan_cst816s` driver.                                             *
 * ========================================================================== *
 *                       CST816S - Registers & Memory Map                     *
*******************************************************************************/

/// Every controller answers on the same 7-bit address; instances are told
/// apart by the bus they sit on.
pub(crate) const I2C_ADDR: u8 = 0x15;

/// Identity bytes accepted in [`Reg::ChipId`] during probe.
pub(crate) const KNOWN_CHIP_IDS: [u8; 2] = [0xB4, 0xB5];

#[allow(dead_code)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reg {
  // Touch report (0x00..0x06)
  Data = 0x00,
  GestureId = 0x01,
  FingerNum = 0x02,
  XPosH = 0x03,
  XPosL = 0x04,
  YPosH = 0x05,
  YPosL = 0x06,

  // Raw channel diagnostics (0xB0..0xB3)
  Bpc0H = 0xB0,
  Bpc0L = 0xB1,
  Bpc1H = 0xB2,
  Bpc1L = 0xB3,

  // Identity & power (0xA5..0xA9)
  PowerMode = 0xA5,
  ChipId = 0xA7,
  ProjectId = 0xA8,
  FirmwareVersion = 0xA9,

  // Motion tuning (0xEC..0xEF)
  MotionMask = 0xEC,
  IrqPulseWidth = 0xED,
  NorScanPer = 0xEE,
  MotionS1Angle = 0xEF,

  // Low-power scan tuning (0xF0..0xF9)
  LpScanRaw1H = 0xF0,
  LpScanRaw1L = 0xF1,
  LpScanRaw2H = 0xF2,
  LpScanRaw2L = 0xF3,
  LpAutoWakeupTime = 0xF4,
  LpScanTh = 0xF5,
  LpScanWin = 0xF6,
  LpScanFreq = 0xF7,
  LpScanIDac = 0xF8,
  AutosleepTime = 0xF9,

  // Interrupt & misc control (0xFA..0xFE)
  IrqCtl = 0xFA,
  DebounceTime = 0xFB,
  LongPressTime = 0xFC,
  IoCtl = 0xFD,
  DisableAutoSleep = 0xFE,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

/// Interrupt sources selectable through [`Reg::IrqCtl`].
///
/// Bits 1..4 are reserved and are never touched by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(u8)]
pub struct IrqControl {
  /// Wake on the first press only.
  pub once_wlp: bool,
  #[skip(3)]
  pub motion: bool,
  pub change: bool,
  pub touch: bool,
  /// Periodic test interrupts.
  pub test: bool,
}

impl IrqControl {
  /// Touch and change reporting, the sources the poll task relies on.
  pub const fn touch_and_change() -> Self {
    Self { once_wlp: false, motion: false, change: true, touch: true, test: false }
  }
}
