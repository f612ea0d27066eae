//! Translation from winit input to library codes.

use crate::key::{KeyCode, MouseButton};
use ::winit::event::MouseButton as WinitButton;
use ::winit::keyboard::{KeyCode as WinitKey, PhysicalKey};

/// Map a winit physical key to a library key code.
///
/// Keys outside the library's code table map to `None`.
pub fn key_code(key: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let mapped = match code {
        WinitKey::Digit1 => KeyCode::Key1,
        WinitKey::Digit2 => KeyCode::Key2,
        WinitKey::Digit3 => KeyCode::Key3,
        WinitKey::Digit4 => KeyCode::Key4,
        WinitKey::Digit5 => KeyCode::Key5,
        WinitKey::Digit6 => KeyCode::Key6,
        WinitKey::Digit7 => KeyCode::Key7,
        WinitKey::Digit8 => KeyCode::Key8,
        WinitKey::Digit9 => KeyCode::Key9,
        WinitKey::Digit0 => KeyCode::Key0,
        WinitKey::Minus => KeyCode::Hyphen,
        WinitKey::Equal => KeyCode::EqualsSign,
        WinitKey::Backspace => KeyCode::Backspace,
        WinitKey::Tab => KeyCode::Tab,
        WinitKey::Backquote => KeyCode::Tilde,
        WinitKey::Escape => KeyCode::Escape,
        WinitKey::F1 => KeyCode::F1,
        WinitKey::F2 => KeyCode::F2,
        WinitKey::F3 => KeyCode::F3,
        WinitKey::F4 => KeyCode::F4,
        WinitKey::F5 => KeyCode::F5,
        WinitKey::F6 => KeyCode::F6,
        WinitKey::F7 => KeyCode::F7,
        WinitKey::F8 => KeyCode::F8,
        WinitKey::F9 => KeyCode::F9,
        WinitKey::F10 => KeyCode::F10,
        WinitKey::F11 => KeyCode::F11,
        WinitKey::F12 => KeyCode::F12,
        WinitKey::Insert => KeyCode::Insert,
        WinitKey::Delete => KeyCode::Delete,
        WinitKey::CapsLock => KeyCode::CapsLock,
        WinitKey::KeyQ => KeyCode::Q,
        WinitKey::KeyW => KeyCode::W,
        WinitKey::KeyE => KeyCode::E,
        WinitKey::KeyR => KeyCode::R,
        WinitKey::KeyT => KeyCode::T,
        WinitKey::KeyY => KeyCode::Y,
        WinitKey::KeyU => KeyCode::U,
        WinitKey::KeyI => KeyCode::I,
        WinitKey::KeyO => KeyCode::O,
        WinitKey::KeyP => KeyCode::P,
        WinitKey::KeyA => KeyCode::A,
        WinitKey::KeyS => KeyCode::S,
        WinitKey::KeyD => KeyCode::D,
        WinitKey::KeyF => KeyCode::F,
        WinitKey::KeyG => KeyCode::G,
        WinitKey::KeyH => KeyCode::H,
        WinitKey::KeyJ => KeyCode::J,
        WinitKey::KeyK => KeyCode::K,
        WinitKey::KeyL => KeyCode::L,
        WinitKey::KeyZ => KeyCode::Z,
        WinitKey::KeyX => KeyCode::X,
        WinitKey::KeyC => KeyCode::C,
        WinitKey::KeyV => KeyCode::V,
        WinitKey::KeyB => KeyCode::B,
        WinitKey::KeyN => KeyCode::N,
        WinitKey::KeyM => KeyCode::M,
        WinitKey::Semicolon => KeyCode::Semicolon,
        WinitKey::Quote => KeyCode::Apostrophe,
        WinitKey::Enter => KeyCode::Enter,
        WinitKey::BracketLeft => KeyCode::LeftSquareBracket,
        WinitKey::BracketRight => KeyCode::RightSquareBracket,
        WinitKey::Backslash => KeyCode::BackSlash,
        WinitKey::ShiftLeft => KeyCode::LeftShift,
        WinitKey::ShiftRight => KeyCode::RightShift,
        WinitKey::ControlLeft => KeyCode::LeftControl,
        WinitKey::ControlRight => KeyCode::RightControl,
        WinitKey::AltLeft | WinitKey::AltRight => KeyCode::Alt,
        WinitKey::Comma => KeyCode::Comma,
        WinitKey::Period => KeyCode::Period,
        WinitKey::Slash => KeyCode::ForwardSlash,
        WinitKey::Space => KeyCode::Space,
        WinitKey::ArrowUp => KeyCode::Up,
        WinitKey::ArrowDown => KeyCode::Down,
        WinitKey::ArrowLeft => KeyCode::Left,
        WinitKey::ArrowRight => KeyCode::Right,
        WinitKey::PageUp => KeyCode::PageUp,
        WinitKey::PageDown => KeyCode::PageDown,
        WinitKey::Home => KeyCode::Home,
        WinitKey::End => KeyCode::End,
        WinitKey::NumLock => KeyCode::NumLock,
        WinitKey::NumpadMultiply => KeyCode::NumpadAsterisk,
        WinitKey::NumpadSubtract => KeyCode::NumpadHyphen,
        WinitKey::NumpadAdd => KeyCode::NumpadPlus,
        WinitKey::NumpadDecimal => KeyCode::NumpadPeriod,
        WinitKey::NumpadEnter => KeyCode::NumpadEnter,
        WinitKey::Numpad0 => KeyCode::Numpad0,
        WinitKey::Numpad1 => KeyCode::Numpad1,
        WinitKey::Numpad2 => KeyCode::Numpad2,
        WinitKey::Numpad3 => KeyCode::Numpad3,
        WinitKey::Numpad4 => KeyCode::Numpad4,
        WinitKey::Numpad5 => KeyCode::Numpad5,
        WinitKey::Numpad6 => KeyCode::Numpad6,
        WinitKey::Numpad7 => KeyCode::Numpad7,
        WinitKey::Numpad8 => KeyCode::Numpad8,
        WinitKey::Numpad9 => KeyCode::Numpad9,
        WinitKey::Pause => KeyCode::Pause,
        WinitKey::PrintScreen => KeyCode::PrintScreen,
        other => {
            tracing::trace!(?other, "unmapped key");
            return None;
        }
    };
    Some(mapped)
}

pub fn mouse_button(button: WinitButton) -> MouseButton {
    match button {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        WinitButton::Back => MouseButton::Other(3),
        WinitButton::Forward => MouseButton::Other(4),
        WinitButton::Other(n) => MouseButton::Other(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::winit::keyboard::NativeKeyCode;

    #[test]
    fn letters_and_arrows_translate() {
        assert_eq!(key_code(PhysicalKey::Code(WinitKey::KeyW)), Some(KeyCode::W));
        assert_eq!(
            key_code(PhysicalKey::Code(WinitKey::ArrowLeft)),
            Some(KeyCode::Left)
        );
        assert_eq!(
            key_code(PhysicalKey::Code(WinitKey::Backquote)),
            Some(KeyCode::Tilde)
        );
    }

    #[test]
    fn both_alt_keys_share_a_code() {
        assert_eq!(key_code(PhysicalKey::Code(WinitKey::AltLeft)), Some(KeyCode::Alt));
        assert_eq!(key_code(PhysicalKey::Code(WinitKey::AltRight)), Some(KeyCode::Alt));
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        assert_eq!(key_code(PhysicalKey::Code(WinitKey::F24)), None);
        assert_eq!(key_code(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)), None);
    }

    #[test]
    fn mouse_buttons_translate() {
        assert_eq!(mouse_button(WinitButton::Left), MouseButton::Left);
        assert_eq!(mouse_button(WinitButton::Back), MouseButton::Other(3));
        assert_eq!(mouse_button(WinitButton::Other(9)), MouseButton::Other(9));
    }
}
