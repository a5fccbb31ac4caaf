use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Cst816s, Error, Reg, I2C_ADDR};

/// How a register read ends on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stop {
  /// Command and payload travel as two transactions, each with its own STOP.
  Release,
  /// Command and payload share one transaction (repeated START), so nothing
  /// else can slip in ahead of an immediately following write.
  Hold,
}

impl<I, E, M> Cst816s<'_, I, M>
where
  I: I2c<SevenBitAddress, Error = E>,
  M: RawMutex,
{
  /// Read `N` consecutive registers starting at `reg`.
  pub(crate) async fn read<const N: usize>(&mut self, reg: Reg, stop: Stop) -> Result<[u8; N], Error<E>> {
    let mut buf = [0u8; N];
    self.read_bytes(reg, &mut buf, stop).await?;
    Ok(buf)
  }

  pub(crate) async fn read_u8(&mut self, reg: Reg) -> Result<u8, Error<E>> {
    let [b] = self.read::<1>(reg, Stop::Release).await?;
    Ok(b)
  }

  pub(crate) async fn read_bytes(&mut self, reg: Reg, buf: &mut [u8], stop: Stop) -> Result<(), Error<E>> {
    let cmd = [u8::from(reg)];
    match stop {
      Stop::Release => {
        self.i2c.write(I2C_ADDR, &cmd).await.map_err(Error::I2c)?;
        self.i2c.read(I2C_ADDR, buf).await.map_err(Error::I2c)
      }
      Stop::Hold => self.i2c.write_read(I2C_ADDR, &cmd, buf).await.map_err(Error::I2c),
    }
  }

  /// Command and value in a single write.
  pub(crate) async fn write(&mut self, reg: Reg, value: u8) -> Result<(), Error<E>> {
    self.i2c.write(I2C_ADDR, &[u8::from(reg), value]).await.map_err(Error::I2c)
  }

  /// Update only the bits of `reg` selected by `mask`, returning the byte
  /// that was written. A full mask skips the read.
  pub(crate) async fn write_masked(&mut self, reg: Reg, value: u8, mask: u8) -> Result<u8, Error<E>> {
    let value = if mask == 0xFF {
      value
    } else {
      let current = match self.read::<1>(reg, Stop::Hold).await {
        Ok([b]) => b,
        Err(e) => {
          error!("CST816S - failed to read current value of {:#x}", u8::from(reg));
          return Err(e);
        }
      };
      merge(value, current, mask)
    };

    if let Err(e) = self.write(reg, value).await {
      error!("CST816S - failed to write {:#x} to {:#x}", value, u8::from(reg));
      return Err(e);
    }

    Ok(value)
  }
}

/// Bits selected by `mask` come from `value`, the rest from `current`.
pub(crate) const fn merge(value: u8, current: u8, mask: u8) -> u8 {
  (value & mask) | (current & !mask)
}
