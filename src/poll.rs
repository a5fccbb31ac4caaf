use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Cst816s, Error, Reg, Stop, TouchState};

impl<I, E, M> Cst816s<'_, I, M>
where
  I: I2c<SevenBitAddress, Error = E>,
  M: RawMutex,
{
  /// Poll task body. Spawn one per controller; it sleeps until the
  /// [`crate::Dispatcher`] wakes it and never returns.
  pub async fn run(&mut self) -> ! {
    loop {
      _ = self.poll().await;
    }
  }

  /// Wait, without timeout, for the next wake and then refresh the touch
  /// state.
  pub async fn poll(&mut self) -> Result<TouchState, Error<E>> {
    self.instance.wait().await;
    self.refresh().await
  }

  /// Read both coordinates in one burst and publish the decoded state.
  ///
  /// On a bus error the published state is left exactly as it was.
  pub async fn refresh(&mut self) -> Result<TouchState, Error<E>> {
    let frame = match self.read::<4>(Reg::XPosH, Stop::Release).await {
      Ok(frame) => frame,
      Err(e) => {
        error!("CST816S - failed to read state");
        return Err(e);
      }
    };

    let state = TouchState::from_frame(frame);
    self.instance.publish(state);
    Ok(state)
  }
}
