use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Config, Cst816s, Instance, PointerInput, Registry, RegistryError, ResetTiming};

/// Pulse the reset line shared by every controller on the board.
///
/// Must finish before the first [`attach`]; the line is active low.
pub async fn reset_all<P, D>(reset: &mut P, delay: &mut D, timing: ResetTiming) -> Result<(), P::Error>
where
  P: OutputPin,
  D: DelayNs,
{
  reset.set_low()?;
  delay.delay_ms(timing.hold_ms).await;
  reset.set_high()?;
  delay.delay_ms(timing.settle_ms).await;
  Ok(())
}

/// Bring up the controller on one bus.
///
/// Probes `i2c`, claims a registry slot for `instance` and registers its
/// pointer device with `host`. A bus without a usable controller yields
/// `None`; so does a host that refuses the device. The returned driver's
/// [`Cst816s::run`] should then be spawned as that controller's poll task.
///
/// # Panics
///
/// If every registry slot is taken or `instance` is already attached. Both
/// mean the board wires up more controllers than the registry was sized for.
pub async fn attach<'a, I, E, M, H, P, const N: usize>(
  i2c: I,
  instance: &'a Instance<M>,
  registry: &Registry<'a, M, H, N>,
  host: &mut P,
  config: &Config,
) -> Option<Cst816s<'a, I, M>>
where
  I: I2c<SevenBitAddress, Error = E>,
  M: RawMutex,
  P: PointerInput<'a, Handle = H>,
{
  let dev = Cst816s::probe(i2c, instance, config).await.ok()?;

  match registry.attach(instance, host).await {
    Ok(slot) => {
      info!("CST816S - attached to slot {}", slot.index());
      Some(dev)
    }
    Err(RegistryError::InputRejected) => {
      error!("CST816S - failed to create input device");
      None
    }
    Err(e) => panic!("unable to register CST816S: {:?}", e),
  }
}

/// Tear down a controller brought up with [`attach`], handing back its bus.
///
/// Stop the controller's poll task before calling this.
pub async fn detach<'a, I, E, M, H, P, const N: usize>(
  dev: Cst816s<'a, I, M>,
  registry: &Registry<'a, M, H, N>,
  host: &mut P,
) -> I
where
  I: I2c<SevenBitAddress, Error = E>,
  M: RawMutex,
  P: PointerInput<'a, Handle = H>,
{
  if registry.detach(dev.instance(), host).await.is_none() {
    warn!("CST816S - controller held no registry slot");
  }
  dev.release()
}
