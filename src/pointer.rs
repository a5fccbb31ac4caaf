use crate::instance::TouchCell;
use crate::Point;

/// Registration side of the host UI framework's pointer-input layer.
///
/// The host keeps the [`PointerDevice`] it is given and calls
/// [`PointerDevice::read`] on its own input-poll cadence. Registration and
/// unregistration happen from task context while the [`crate::Registry`] is
/// locked.
pub trait PointerInput<'a> {
  /// Opaque handle identifying a registered device.
  type Handle;

  /// Register a single-point pointer device. `None` means the host refused.
  fn register(&mut self, device: PointerDevice<'a>) -> Option<Self::Handle>;

  fn unregister(&mut self, handle: Self::Handle);
}

/// What the host sees on each input poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerReading {
  pub point: Point,
  pub pressed: bool,
}

/// Pointer-input descriptor bound to one controller's touch state.
///
/// Reads take no lock. The poll task replaces the state as a single word,
/// so a read returns either the previous report or the new one, never a mix.
#[derive(Clone, Copy)]
pub struct PointerDevice<'a> {
  touch: &'a TouchCell,
}

impl<'a> PointerDevice<'a> {
  pub(crate) fn new(touch: &'a TouchCell) -> Self {
    Self { touch }
  }

  pub fn read(&self) -> PointerReading {
    let state = self.touch.load();
    PointerReading { point: state.point(), pressed: state.phase.is_pressed() }
  }
}

impl core::fmt::Debug for PointerDevice<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PointerDevice").field("reading", &self.read()).finish()
  }
}
