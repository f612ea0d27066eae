use serde::{Deserialize, Serialize};

macro_rules! key_codes {
    ($($name:ident = $code:literal),+ $(,)?) => {
        /// Library key code, independent of any windowing backend.
        ///
        /// The numeric values are stable and form the library's own code table.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum KeyCode {
            $($name = $code),+
        }

        impl KeyCode {
            pub const ALL: &'static [KeyCode] = &[$(KeyCode::$name),+];

            /// Stable numeric code of this key.
            pub fn code(self) -> u16 {
                self as u16
            }

            /// Inverse of [`code`](Self::code).
            pub fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(KeyCode::$name),)+
                    _ => None,
                }
            }
        }
    };
}

key_codes! {
    Key1 = 0,
    Key2 = 1,
    Key3 = 2,
    Key4 = 3,
    Key5 = 4,
    Key6 = 5,
    Key7 = 6,
    Key8 = 7,
    Key9 = 8,
    Key0 = 9,
    Hyphen = 10,
    EqualsSign = 11,
    Backspace = 12,
    Tab = 13,
    Q = 14,
    Tilde = 15,
    Escape = 16,
    F1 = 17,
    F2 = 18,
    F3 = 19,
    F4 = 20,
    F5 = 21,
    F6 = 22,
    F7 = 23,
    F8 = 24,
    F9 = 25,
    F10 = 26,
    F11 = 27,
    F12 = 28,
    Insert = 29,
    Delete = 30,
    CapsLock = 31,
    A = 32,
    S = 33,
    D = 34,
    F = 35,
    G = 36,
    H = 37,
    J = 38,
    K = 39,
    L = 40,
    Semicolon = 41,
    Apostrophe = 42,
    Enter = 43,
    W = 44,
    E = 45,
    R = 46,
    T = 47,
    Y = 48,
    U = 49,
    I = 50,
    O = 51,
    P = 52,
    LeftSquareBracket = 53,
    RightSquareBracket = 54,
    BackSlash = 55,
    LeftShift = 56,
    Z = 57,
    X = 58,
    C = 59,
    V = 60,
    B = 61,
    N = 62,
    M = 63,
    Comma = 64,
    Period = 65,
    ForwardSlash = 66,
    RightShift = 67,
    LeftControl = 68,
    Alt = 69,
    Space = 70,
    RightControl = 71,
    Up = 72,
    Down = 73,
    Left = 74,
    Right = 75,
    PageUp = 76,
    PageDown = 77,
    End = 78,
    NumLock = 79,
    NumpadAsterisk = 80,
    NumpadHyphen = 81,
    Numpad7 = 82,
    Numpad8 = 83,
    Numpad9 = 84,
    Numpad4 = 85,
    Numpad5 = 86,
    Numpad6 = 87,
    Numpad1 = 88,
    Numpad2 = 89,
    Numpad3 = 90,
    Numpad0 = 91,
    NumpadPeriod = 92,
    NumpadEnter = 93,
    NumpadPlus = 94,
    Pause = 95,
    PrintScreen = 96,
    Home = 97,
}

/// A mouse button as reported to game states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    /// Zero-based button index: left 0, right 1, middle 2, then `Other`.
    pub fn index(self) -> u16 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
            Self::Other(n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_every_key() {
        for key in KeyCode::ALL {
            assert_eq!(KeyCode::from_code(key.code()), Some(*key));
        }
    }

    #[test]
    fn code_table_is_dense() {
        assert_eq!(KeyCode::ALL.len(), 98);
        assert_eq!(KeyCode::Home.code(), 97);
        assert_eq!(KeyCode::from_code(98), None);
    }

    #[test]
    fn mouse_button_indices() {
        assert_eq!(MouseButton::Left.index(), 0);
        assert_eq!(MouseButton::Middle.index(), 2);
        assert_eq!(MouseButton::Other(7).index(), 7);
    }
}
