use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::Registry;

/// Outcome of one interrupt edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
  /// The registry was locked by a task; the edge was dropped.
  Contended,
  /// Wakes were posted to this many poll tasks.
  Woken(usize),
}

impl Dispatch {
  /// Whether the handler should request a context switch on exit.
  pub const fn should_yield(self) -> bool {
    matches!(self, Dispatch::Woken(n) if n > 0)
  }
}

/// The one interrupt callback shared by every controller on the board.
///
/// The platform GPIO layer accepts a single callback for the touch interrupt
/// line, carries no user data, and may run it on any core. The dispatcher
/// bridges that to N controllers by waking each live poll task.
///
/// Contract for [`Dispatcher::on_edge`]:
///
/// - install it exactly once; installing it again is an integration bug
/// - it is not reentrant and must not block
/// - it only ever *tries* the registry lock; if a task holds it the edge is
///   dropped, the next edge picks the state up
pub struct Dispatcher<'r, 'a, M: RawMutex, H, const N: usize> {
  registry: &'r Registry<'a, M, H, N>,
  line: u8,
}

impl<'r, 'a, M: RawMutex, H, const N: usize> Dispatcher<'r, 'a, M, H, N> {
  /// Bind the dispatcher to `registry` and the GPIO number of the touch
  /// interrupt line.
  pub const fn new(registry: &'r Registry<'a, M, H, N>, line: u8) -> Self {
    Self { registry, line }
  }

  /// Handle an edge on GPIO `line`. Call from the interrupt handler.
  ///
  /// # Panics
  ///
  /// If `line` is not the touch interrupt line the callback was wired to the
  /// wrong pin.
  pub fn on_edge(&self, line: u8) -> Dispatch {
    assert_eq!(line, self.line, "touch dispatcher invoked for the wrong interrupt line");

    let Some(guard) = self.registry.try_lock_from_isr() else {
      trace!("CST816S - registry busy, dropping edge");
      return Dispatch::Contended;
    };
    Dispatch::Woken(guard.wake_all())
  }
}
