use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

use crate::{Instance, PointerInput};

/// Index of a registry slot; one slot per supported bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotId(usize);

impl SlotId {
  pub const fn index(self) -> usize {
    self.0
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
  /// Every slot holds a live controller.
  Full,
  /// The instance already owns the given slot.
  AlreadyAttached(SlotId),
  /// The host pointer-input framework refused the device.
  InputRejected,
}

// A claimed slot always carries both the instance and its input handle, so
// one cannot exist without the other.
struct Slot<'a, M: RawMutex, H> {
  instance: &'a Instance<M>,
  input: H,
}

type Slots<'a, M, H, const N: usize> = [Option<Slot<'a, M, H>>; N];

/// Fixed-capacity table of live controllers.
///
/// Two ways in, one per execution context:
///
/// - [`Registry::lock`] waits for the lock and hands out a [`TaskGuard`]
///   that can claim and release slots. It is `async`, so it can only be
///   reached from a task, never from an interrupt handler.
/// - [`Registry::try_lock_from_isr`] never waits; it either returns an
///   [`IsrGuard`] that can only wake the live controllers, or nothing.
///
/// Both guards release the lock when dropped, so membership changes never
/// overlap a wake pass. When the dispatcher runs in an interrupt handler `M`
/// must be interrupt-safe, e.g. `CriticalSectionRawMutex`.
pub struct Registry<'a, M: RawMutex, H, const N: usize> {
  slots: Mutex<M, Slots<'a, M, H, N>>,
}

impl<'a, M: RawMutex, H, const N: usize> Registry<'a, M, H, N> {
  const VACANT: Option<Slot<'a, M, H>> = None;

  pub const fn new() -> Self {
    Self { slots: Mutex::new([Self::VACANT; N]) }
  }

  /// Wait (without bound) for the registry lock. Task context only.
  pub async fn lock(&self) -> TaskGuard<'_, 'a, M, H, N> {
    TaskGuard { slots: self.slots.lock().await }
  }

  /// Take the registry lock if it is free, without waiting.
  pub fn try_lock_from_isr(&self) -> Option<IsrGuard<'_, 'a, M, H, N>> {
    self.slots.try_lock().ok().map(|slots| IsrGuard { slots })
  }

  /// Claim the first vacant slot for `instance` and register its pointer
  /// device with `host`.
  pub async fn attach<P>(&self, instance: &'a Instance<M>, host: &mut P) -> Result<SlotId, RegistryError>
  where
    P: PointerInput<'a, Handle = H>,
  {
    self.lock().await.claim(instance, host)
  }

  /// Release the slot held by `instance`, unregistering its pointer device.
  pub async fn detach<P>(&self, instance: &'a Instance<M>, host: &mut P) -> Option<SlotId>
  where
    P: PointerInput<'a, Handle = H>,
  {
    self.lock().await.release(instance, host)
  }

  pub async fn slot_of(&self, instance: &Instance<M>) -> Option<SlotId> {
    self.lock().await.find(instance)
  }

  /// Number of live controllers.
  pub async fn live(&self) -> usize {
    self.lock().await.live()
  }
}

impl<M: RawMutex, H, const N: usize> Default for Registry<'_, M, H, N> {
  fn default() -> Self {
    Self::new()
  }
}

/// Registry access for task context: lookup, claim and release.
pub struct TaskGuard<'r, 'a, M: RawMutex, H, const N: usize> {
  slots: MutexGuard<'r, M, Slots<'a, M, H, N>>,
}

impl<'a, M: RawMutex, H, const N: usize> TaskGuard<'_, 'a, M, H, N> {
  /// Slot currently held by `instance`.
  pub fn find(&self, instance: &Instance<M>) -> Option<SlotId> {
    self
      .slots
      .iter()
      .position(|slot| slot.as_ref().is_some_and(|s| core::ptr::eq(s.instance, instance)))
      .map(SlotId)
  }

  pub fn first_vacant(&self) -> Option<SlotId> {
    self.slots.iter().position(Option::is_none).map(SlotId)
  }

  pub fn instance(&self, id: SlotId) -> Option<&'a Instance<M>> {
    self.slots.get(id.0)?.as_ref().map(|s| s.instance)
  }

  pub fn input(&self, id: SlotId) -> Option<&H> {
    self.slots.get(id.0)?.as_ref().map(|s| &s.input)
  }

  pub fn live(&self) -> usize {
    self.slots.iter().flatten().count()
  }

  pub fn claim<P>(&mut self, instance: &'a Instance<M>, host: &mut P) -> Result<SlotId, RegistryError>
  where
    P: PointerInput<'a, Handle = H>,
  {
    if let Some(id) = self.find(instance) {
      return Err(RegistryError::AlreadyAttached(id));
    }
    let id = self.first_vacant().ok_or(RegistryError::Full)?;
    let input = host.register(instance.pointer()).ok_or(RegistryError::InputRejected)?;
    self.slots[id.0] = Some(Slot { instance, input });
    Ok(id)
  }

  pub fn release<P>(&mut self, instance: &Instance<M>, host: &mut P) -> Option<SlotId>
  where
    P: PointerInput<'a, Handle = H>,
  {
    let id = self.find(instance)?;
    let slot = self.slots[id.0].take()?;
    host.unregister(slot.input);
    Some(id)
  }
}

/// Registry access for interrupt context: wake every live controller.
pub struct IsrGuard<'r, 'a, M: RawMutex, H, const N: usize> {
  slots: MutexGuard<'r, M, Slots<'a, M, H, N>>,
}

impl<M: RawMutex, H, const N: usize> IsrGuard<'_, '_, M, H, N> {
  /// Post a wake to each live controller's poll task, returning how many
  /// were posted.
  pub fn wake_all(&self) -> usize {
    let mut woken = 0;
    for slot in self.slots.iter().flatten() {
      slot.instance.wake();
      woken += 1;
    }
    woken
  }
}
