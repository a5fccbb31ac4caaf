use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Config, Cst816s, Error, Instance, IrqControl, Reg, KNOWN_CHIP_IDS};

impl<'a, I, E, M> Cst816s<'a, I, M>
where
  I: I2c<SevenBitAddress, Error = E>,
  M: RawMutex,
{
  /// Look for a controller on `i2c` and prepare it for interrupt-driven
  /// reporting.
  ///
  /// Fails with [`Error::NotPresent`] when nothing answers the chip-id read
  /// and with [`Error::InvalidChipId`] for foreign hardware; both mean "no
  /// controller on this bus" (see [`Error::is_absence`]). A failed firmware
  /// revision read is only logged. Failing to enable the configured
  /// interrupt sources aborts with [`Error::I2c`].
  ///
  /// `i2c` is consumed either way; boards that probe other parts on the same
  /// bus should pass a shared-bus device handle.
  pub async fn probe(i2c: I, instance: &'a Instance<M>, config: &Config) -> Result<Self, Error<E>> {
    let mut dev = Self::new(i2c, instance);
    dev.init(config).await?;
    Ok(dev)
  }

  async fn init(&mut self, config: &Config) -> Result<(), Error<E>> {
    let Ok(id) = self.chip_id().await else {
      debug!("CST816S - nothing on the bus");
      return Err(Error::NotPresent);
    };

    if !KNOWN_CHIP_IDS.contains(&id) {
      warn!("CST816S - unrecognised chip ID {:#x}", id);
      return Err(Error::InvalidChipId(id));
    }

    match self.firmware_version().await {
      Ok(rev) => info!("CST816S - revision {}", rev),
      Err(_) => warn!("CST816S - failed to read FW revision"),
    }

    let irq = u8::from(config.irq);
    if let Err(e) = self.write_masked(Reg::IrqCtl, irq, irq).await {
      error!("CST816S - failed to change IRQ mode");
      return Err(e);
    }

    Ok(())
  }

  /// Identity byte, `0xB4` or `0xB5` for supported parts.
  pub async fn chip_id(&mut self) -> Result<u8, Error<E>> {
    self.read_u8(Reg::ChipId).await
  }

  pub async fn firmware_version(&mut self) -> Result<u8, Error<E>> {
    self.read_u8(Reg::FirmwareVersion).await
  }

  /// Interrupt sources currently enabled on the device.
  pub async fn irq_control(&mut self) -> Result<IrqControl, Error<E>> {
    let b = self.read_u8(Reg::IrqCtl).await?;
    IrqControl::try_from(b).map_err(|_| Error::Malformed(u8::from(Reg::IrqCtl)))
  }
}
