//! Translation from GLFW key and button codes

use glfw::Key;

use crate::input::{KeyCode, MouseButton};

/// Map a GLFW key to a tracked key, `None` for keys the sandbox ignores
pub const fn key_code(key: Key) -> Option<KeyCode> {
    let code = match key {
        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,
        Key::Num0 => KeyCode::Num0,
        Key::Num1 => KeyCode::Num1,
        Key::Num2 => KeyCode::Num2,
        Key::Num3 => KeyCode::Num3,
        Key::Num4 => KeyCode::Num4,
        Key::Num5 => KeyCode::Num5,
        Key::Num6 => KeyCode::Num6,
        Key::Num7 => KeyCode::Num7,
        Key::Num8 => KeyCode::Num8,
        Key::Num9 => KeyCode::Num9,
        Key::Space => KeyCode::Space,
        Key::Enter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Tab => KeyCode::Tab,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        Key::LeftShift => KeyCode::LeftShift,
        Key::RightShift => KeyCode::RightShift,
        Key::LeftControl => KeyCode::LeftControl,
        Key::RightControl => KeyCode::RightControl,
        Key::Home => KeyCode::Home,
        Key::End => KeyCode::End,
        _ => return None,
    };
    Some(code)
}

/// Map a GLFW mouse button to a tracked button
pub const fn mouse_button(button: glfw::MouseButton) -> Option<MouseButton> {
    match button {
        glfw::MouseButton::Button1 => Some(MouseButton::Left),
        glfw::MouseButton::Button2 => Some(MouseButton::Right),
        glfw::MouseButton::Button3 => Some(MouseButton::Middle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_movement_keys_map() {
        assert_eq!(key_code(Key::W), Some(KeyCode::W));
        assert_eq!(key_code(Key::LeftShift), Some(KeyCode::LeftShift));
        assert_eq!(key_code(Key::Home), Some(KeyCode::Home));
        assert_eq!(key_code(Key::Num7), Some(KeyCode::Num7));
        assert_eq!(key_code(Key::F1), None);
    }

    #[test]
    fn test_every_tracked_key_is_reachable() {
        let mapped: HashSet<KeyCode> = [
            Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
            Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
            Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
            Key::Num0, Key::Num1, Key::Num2, Key::Num3, Key::Num4, Key::Num5,
            Key::Num6, Key::Num7, Key::Num8, Key::Num9, Key::Space, Key::Enter,
            Key::Escape, Key::Tab, Key::Up, Key::Down, Key::Left, Key::Right,
            Key::LeftShift, Key::RightShift, Key::LeftControl, Key::RightControl,
            Key::Home, Key::End,
        ]
        .into_iter()
        .filter_map(key_code)
        .collect();

        assert_eq!(mapped.len(), KeyCode::COUNT);
    }

    #[test]
    fn test_mouse_buttons_map() {
        assert_eq!(mouse_button(glfw::MouseButton::Button1), Some(MouseButton::Left));
        assert_eq!(mouse_button(glfw::MouseButton::Button2), Some(MouseButton::Right));
        assert_eq!(mouse_button(glfw::MouseButton::Button3), Some(MouseButton::Middle));
        assert_eq!(mouse_button(glfw::MouseButton::Button4), None);
    }
}
