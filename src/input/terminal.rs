//! Maps terminal key and mouse events to control paths so the rebind
//! controller can capture them.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

fn keyboard(control: &str) -> Option<String> {
    Some(format!("<Keyboard>/{}", control))
}

pub fn key_control_path(key: &KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(' ') => keyboard("space"),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => {
            keyboard(&c.to_ascii_lowercase().to_string())
        }
        KeyCode::Char(c) => {
            let name = match c {
                ',' | '<' => "comma",
                '.' | '>' => "period",
                '/' | '?' => "slash",
                ';' | ':' => "semicolon",
                '\'' | '"' => "quote",
                '[' | '{' => "leftBracket",
                ']' | '}' => "rightBracket",
                '-' | '_' => "minus",
                '=' | '+' => "equals",
                '`' | '~' => "backquote",
                '\\' | '|' => "backslash",
                _ => return None,
            };
            keyboard(name)
        }
        KeyCode::Enter => keyboard("enter"),
        KeyCode::Esc => keyboard("escape"),
        KeyCode::Tab | KeyCode::BackTab => keyboard("tab"),
        KeyCode::Backspace => keyboard("backspace"),
        KeyCode::Delete => keyboard("delete"),
        KeyCode::Insert => keyboard("insert"),
        KeyCode::Home => keyboard("home"),
        KeyCode::End => keyboard("end"),
        KeyCode::PageUp => keyboard("pageUp"),
        KeyCode::PageDown => keyboard("pageDown"),
        KeyCode::Up => keyboard("upArrow"),
        KeyCode::Down => keyboard("downArrow"),
        KeyCode::Left => keyboard("leftArrow"),
        KeyCode::Right => keyboard("rightArrow"),
        KeyCode::F(n) => keyboard(&format!("f{}", n)),
        _ => None,
    }
}

pub fn mouse_control_path(mouse: &MouseEvent) -> Option<String> {
    let control = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => "leftButton",
        MouseEventKind::Down(MouseButton::Right) => "rightButton",
        MouseEventKind::Down(MouseButton::Middle) => "middleButton",
        MouseEventKind::Moved | MouseEventKind::Drag(_) => "position",
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => "scroll",
        _ => return None,
    };
    Some(format!("<Mouse>/{}", control))
}
