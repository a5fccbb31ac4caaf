use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use crate::event::TouchWord;
use crate::{PointerDevice, TouchState};

/// State shared between one controller's poll task, the interrupt
/// dispatcher and the host UI poll.
///
/// The wake signal is the task notification: the dispatcher raises it from
/// interrupt context, the poll task waits on it. The touch state has a single
/// writer (the poll task) and is replaced whole through one atomic word, so
/// the UI side never needs a lock and never sees half an update.
///
/// Instances are meant to live in `static`s next to the [`crate::Registry`]
/// that refers to them.
pub struct Instance<M: RawMutex> {
  wake: Signal<M, ()>,
  touch: TouchCell,
}

impl<M: RawMutex> Instance<M> {
  pub const fn new() -> Self {
    Self { wake: Signal::new(), touch: TouchCell::new() }
  }

  /// Most recent touch report; released at the origin until the first one.
  pub fn touch(&self) -> TouchState {
    self.touch.load()
  }

  /// Descriptor handed to the host pointer-input framework.
  pub fn pointer(&self) -> PointerDevice<'_> {
    PointerDevice::new(&self.touch)
  }

  /// `true` while a wake is posted that the poll task has not consumed yet.
  pub fn is_woken(&self) -> bool {
    self.wake.signaled()
  }

  /// Post a wake. Never blocks; safe from interrupt context.
  pub(crate) fn wake(&self) {
    self.wake.signal(());
  }

  pub(crate) async fn wait(&self) {
    self.wake.wait().await
  }

  pub(crate) fn publish(&self, state: TouchState) {
    self.touch.store(state);
  }
}

impl<M: RawMutex> Default for Instance<M> {
  fn default() -> Self {
    Self::new()
  }
}

pub(crate) struct TouchCell(AtomicU32);

impl TouchCell {
  const fn new() -> Self {
    Self(AtomicU32::new(TouchWord::RELEASED))
  }

  pub(crate) fn load(&self) -> TouchState {
    TouchWord::try_from(self.0.load(Ordering::Relaxed)).map(TouchState::from).unwrap_or(TouchState::RELEASED)
  }

  fn store(&self, state: TouchState) {
    self.0.store(u32::from(TouchWord::from(state)), Ordering::Relaxed)
  }
}
