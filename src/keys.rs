/// Map a key symbol such as `space`, `w`, `f5` or `ctrl` to its Windows
/// virtual-key code. Matching is case-insensitive.
pub fn virtual_key_from_string(key: &str) -> Option<u16> {
    let upper = key.trim().to_ascii_uppercase();

    if upper.len() == 1 {
        let ch = upper.chars().next()?;
        if ch.is_ascii_alphabetic() || ch.is_ascii_digit() {
            return Some(ch as u16);
        }
    }

    // function keys: F1..F24
    if upper.len() >= 2 && upper.starts_with('F') {
        if let Ok(n) = upper[1..].parse::<u16>() {
            if (1..=24).contains(&n) {
                return Some(0x6F + n); // VK_F1=0x70
            }
        }
    }

    // numpad digits
    if let Some(rest) = upper.strip_prefix("NUMPAD").or_else(|| upper.strip_prefix("NUM")) {
        if rest.len() == 1 {
            if let Some(d) = rest.chars().next().and_then(|c| c.to_digit(10)) {
                return Some(0x60 + d as u16);
            }
        }
    }

    match upper.as_str() {
        "UP" => Some(0x26),
        "DOWN" => Some(0x28),
        "LEFT" => Some(0x25),
        "RIGHT" => Some(0x27),

        "BACKSPACE" => Some(0x08),
        "TAB" => Some(0x09),
        "ENTER" | "RETURN" => Some(0x0D),
        "SHIFT" => Some(0x10),
        "CTRL" | "CONTROL" => Some(0x11),
        "ALT" => Some(0x12),
        "PAUSE" => Some(0x13),
        "CAPSLOCK" => Some(0x14),
        "ESC" | "ESCAPE" => Some(0x1B),
        "SPACE" => Some(0x20),
        "PAGEUP" | "PGUP" => Some(0x21),
        "PAGEDOWN" | "PGDN" => Some(0x22),
        "END" => Some(0x23),
        "HOME" => Some(0x24),
        "PRINTSCREEN" => Some(0x2C),
        "INSERT" => Some(0x2D),
        "DELETE" | "DEL" => Some(0x2E),
        "WIN" | "WINLEFT" | "LWIN" => Some(0x5B),
        "WINRIGHT" | "RWIN" => Some(0x5C),
        "APPS" => Some(0x5D),

        "MULTIPLY" => Some(0x6A),
        "ADD" => Some(0x6B),
        "SEPARATOR" => Some(0x6C),
        "SUBTRACT" => Some(0x6D),
        "DECIMAL" => Some(0x6E),
        "DIVIDE" => Some(0x6F),

        "NUMLOCK" => Some(0x90),
        "SCROLLLOCK" => Some(0x91),
        "SHIFTLEFT" | "LEFTSHIFT" => Some(0xA0),
        "SHIFTRIGHT" | "RIGHTSHIFT" => Some(0xA1),
        "CTRLLEFT" | "LEFTCTRL" => Some(0xA2),
        "CTRLRIGHT" | "RIGHTCTRL" => Some(0xA3),
        "ALTLEFT" | "LEFTALT" => Some(0xA4),
        "ALTRIGHT" | "RIGHTALT" => Some(0xA5),

        "VOLUMEMUTE" => Some(0xAD),
        "VOLUMEDOWN" => Some(0xAE),
        "VOLUMEUP" => Some(0xAF),
        "NEXTTRACK" => Some(0xB0),
        "PREVTRACK" => Some(0xB1),
        "PLAYPAUSE" => Some(0xB3),

        ";" => Some(0xBA),
        "=" => Some(0xBB),
        "," => Some(0xBC),
        "-" => Some(0xBD),
        "." => Some(0xBE),
        "/" => Some(0xBF),
        "`" => Some(0xC0),
        "[" => Some(0xDB),
        "\\" => Some(0xDC),
        "]" => Some(0xDD),
        "'" => Some(0xDE),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::virtual_key_from_string;

    #[test]
    fn letters_digits_and_named_keys() {
        assert_eq!(virtual_key_from_string("w"), Some(0x57));
        assert_eq!(virtual_key_from_string("7"), Some(0x37));
        assert_eq!(virtual_key_from_string("Space"), Some(0x20));
        assert_eq!(virtual_key_from_string("ctrlleft"), Some(0xA2));
        assert_eq!(virtual_key_from_string("num4"), Some(0x64));
    }

    #[test]
    fn function_keys_cover_f1_to_f24() {
        assert_eq!(virtual_key_from_string("f1"), Some(0x70));
        assert_eq!(virtual_key_from_string("F24"), Some(0x87));
        assert_eq!(virtual_key_from_string("f25"), None);
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert_eq!(virtual_key_from_string("hyper"), None);
        assert_eq!(virtual_key_from_string(""), None);
    }
}
