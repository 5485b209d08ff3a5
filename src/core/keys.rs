use serde::{Deserialize, Serialize};

/// A key that a channel can be bound to, injected by scan code so that
/// fullscreen DirectInput targets receive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanKey {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// Every bindable key, in UI display order.
pub const ALL_SCAN_KEYS: &[ScanKey] = &[
    ScanKey::A,
    ScanKey::B,
    ScanKey::C,
    ScanKey::D,
    ScanKey::E,
    ScanKey::F,
    ScanKey::G,
    ScanKey::H,
    ScanKey::I,
    ScanKey::J,
    ScanKey::K,
    ScanKey::L,
    ScanKey::M,
    ScanKey::N,
    ScanKey::O,
    ScanKey::P,
    ScanKey::Q,
    ScanKey::R,
    ScanKey::S,
    ScanKey::T,
    ScanKey::U,
    ScanKey::V,
    ScanKey::W,
    ScanKey::X,
    ScanKey::Y,
    ScanKey::Z,
    ScanKey::Digit0,
    ScanKey::Digit1,
    ScanKey::Digit2,
    ScanKey::Digit3,
    ScanKey::Digit4,
    ScanKey::Digit5,
    ScanKey::Digit6,
    ScanKey::Digit7,
    ScanKey::Digit8,
    ScanKey::Digit9,
    ScanKey::Space,
    ScanKey::ArrowUp,
    ScanKey::ArrowDown,
    ScanKey::ArrowLeft,
    ScanKey::ArrowRight,
];

impl ScanKey {
    /// Scan code set 1 make code (without the 0xE0 prefix for extended keys).
    pub fn scan_code(self) -> u16 {
        match self {
            ScanKey::A => 0x1E,
            ScanKey::B => 0x30,
            ScanKey::C => 0x2E,
            ScanKey::D => 0x20,
            ScanKey::E => 0x12,
            ScanKey::F => 0x21,
            ScanKey::G => 0x22,
            ScanKey::H => 0x23,
            ScanKey::I => 0x17,
            ScanKey::J => 0x24,
            ScanKey::K => 0x25,
            ScanKey::L => 0x26,
            ScanKey::M => 0x32,
            ScanKey::N => 0x31,
            ScanKey::O => 0x18,
            ScanKey::P => 0x19,
            ScanKey::Q => 0x10,
            ScanKey::R => 0x13,
            ScanKey::S => 0x1F,
            ScanKey::T => 0x14,
            ScanKey::U => 0x16,
            ScanKey::V => 0x2F,
            ScanKey::W => 0x11,
            ScanKey::X => 0x2D,
            ScanKey::Y => 0x15,
            ScanKey::Z => 0x2C,
            ScanKey::Digit0 => 0x0B,
            ScanKey::Digit1 => 0x02,
            ScanKey::Digit2 => 0x03,
            ScanKey::Digit3 => 0x04,
            ScanKey::Digit4 => 0x05,
            ScanKey::Digit5 => 0x06,
            ScanKey::Digit6 => 0x07,
            ScanKey::Digit7 => 0x08,
            ScanKey::Digit8 => 0x09,
            ScanKey::Digit9 => 0x0A,
            ScanKey::Space => 0x39,
            ScanKey::ArrowUp => 0x48,
            ScanKey::ArrowDown => 0x50,
            ScanKey::ArrowLeft => 0x4B,
            ScanKey::ArrowRight => 0x4D,
        }
    }

    /// Arrow keys carry the 0xE0 prefix and need the extended-key flag.
    pub fn is_extended(self) -> bool {
        matches!(
            self,
            ScanKey::ArrowUp | ScanKey::ArrowDown | ScanKey::ArrowLeft | ScanKey::ArrowRight
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            ScanKey::A => "A",
            ScanKey::B => "B",
            ScanKey::C => "C",
            ScanKey::D => "D",
            ScanKey::E => "E",
            ScanKey::F => "F",
            ScanKey::G => "G",
            ScanKey::H => "H",
            ScanKey::I => "I",
            ScanKey::J => "J",
            ScanKey::K => "K",
            ScanKey::L => "L",
            ScanKey::M => "M",
            ScanKey::N => "N",
            ScanKey::O => "O",
            ScanKey::P => "P",
            ScanKey::Q => "Q",
            ScanKey::R => "R",
            ScanKey::S => "S",
            ScanKey::T => "T",
            ScanKey::U => "U",
            ScanKey::V => "V",
            ScanKey::W => "W",
            ScanKey::X => "X",
            ScanKey::Y => "Y",
            ScanKey::Z => "Z",
            ScanKey::Digit0 => "0",
            ScanKey::Digit1 => "1",
            ScanKey::Digit2 => "2",
            ScanKey::Digit3 => "3",
            ScanKey::Digit4 => "4",
            ScanKey::Digit5 => "5",
            ScanKey::Digit6 => "6",
            ScanKey::Digit7 => "7",
            ScanKey::Digit8 => "8",
            ScanKey::Digit9 => "9",
            ScanKey::Space => "Space",
            ScanKey::ArrowUp => "Up",
            ScanKey::ArrowDown => "Down",
            ScanKey::ArrowLeft => "Left",
            ScanKey::ArrowRight => "Right",
        }
    }
}
