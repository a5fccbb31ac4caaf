/// Sensor resolution ceiling; coordinates never exceed 12 bits.
const COORD_MASK: u16 = 0x0FFF;

/// Event code in the top two bits of `XPOS_H` that releases the pointer.
///
/// The controller's own table reads `00` press, `01` lift-up, `10` contact and
/// `11` no event. Boards fitted with this part report `01` while a finger is
/// held (an `XPOS_H` of `0x4F` is a press), so `01` cannot mean release here.
/// `10` stays a press too, because the chip sends it for every sample of a
/// drag. Only `11` is left to end a touch.
const EVENT_LIFT_UP: u8 = 0b11;

#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
  pub x: u16,
  pub y: u16,
}

impl Point {
  pub const fn new(x: u16, y: u16) -> Self {
    Self { x, y }
  }
}

impl core::fmt::Debug for Point {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// Contact phase of the single tracked point.
///
/// Only the `11` event code releases the pointer; the other three all count
/// as a finger on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchPhase {
  Down,
  #[default]
  Up,
}

impl TouchPhase {
  pub const fn from_event(code: u8) -> Self {
    if code & 0b11 == EVENT_LIFT_UP {
      TouchPhase::Up
    } else {
      TouchPhase::Down
    }
  }

  pub const fn is_pressed(self) -> bool {
    matches!(self, TouchPhase::Down)
  }
}

/// Last decoded touch report of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchState {
  pub x: u16,
  pub y: u16,
  pub phase: TouchPhase,
}

impl TouchState {
  pub(crate) const RELEASED: Self = Self { x: 0, y: 0, phase: TouchPhase::Up };

  /// Decode a burst read of `XPOS_H, XPOS_L, YPOS_H, YPOS_L`.
  ///
  /// The controller sends each coordinate high byte first; the event code
  /// rides in the top two bits of `XPOS_H` and is stripped by the mask.
  pub const fn from_frame(frame: [u8; 4]) -> Self {
    let [xh, xl, yh, yl] = frame;
    Self {
      x: u16::from_be_bytes([xh, xl]) & COORD_MASK,
      y: u16::from_be_bytes([yh, yl]) & COORD_MASK,
      phase: TouchPhase::from_event(xh >> 6),
    }
  }

  pub const fn point(&self) -> Point {
    Point::new(self.x, self.y)
  }
}

/// Single-word layout of a [`TouchState`], swapped whole by the instance's
/// atomic cell. The all-zero word is the released state at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[packbits::pack(u32)]
pub(crate) struct TouchWord {
  #[bits(12)]
  x: u16,
  #[bits(12)]
  y: u16,
  pressed: bool,
}

impl TouchWord {
  pub(crate) const RELEASED: u32 = 0;
}

impl From<TouchState> for TouchWord {
  fn from(state: TouchState) -> Self {
    Self { x: state.x & COORD_MASK, y: state.y & COORD_MASK, pressed: state.phase.is_pressed() }
  }
}

impl From<TouchWord> for TouchState {
  fn from(word: TouchWord) -> Self {
    let phase = if word.pressed { TouchPhase::Down } else { TouchPhase::Up };
    Self { x: word.x, y: word.y, phase }
  }
}
