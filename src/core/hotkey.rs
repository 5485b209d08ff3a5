use global_hotkey::hotkey::{Code, HotKey, Modifiers};

use crate::settings::{HotkeyBinding, HotkeyKey, HotkeyModifiers};

/// Human-readable form, e.g. "Ctrl+F8".
pub fn binding_label(binding: &HotkeyBinding) -> String {
    let Some(key) = binding.key else {
        return "Disabled".to_string();
    };

    let mut parts: Vec<&'static str> = Vec::new();
    if binding.modifiers.ctrl {
        parts.push("Ctrl");
    }
    if binding.modifiers.alt {
        parts.push("Alt");
    }
    if binding.modifiers.shift {
        parts.push("Shift");
    }
    parts.push(key_label(key));
    parts.join("+")
}

pub fn hotkey_from_binding(binding: &HotkeyBinding) -> Option<HotKey> {
    let key = binding.key?;
    let modifiers = modifiers_to_code(binding.modifiers);
    if modifiers.is_empty() {
        Some(HotKey::new(None, key_to_code(key)))
    } else {
        Some(HotKey::new(Some(modifiers), key_to_code(key)))
    }
}

pub fn key_label(key: HotkeyKey) -> &'static str {
    match key {
        HotkeyKey::F1 => "F1",
        HotkeyKey::F2 => "F2",
        HotkeyKey::F3 => "F3",
        HotkeyKey::F4 => "F4",
        HotkeyKey::F5 => "F5",
        HotkeyKey::F6 => "F6",
        HotkeyKey::F7 => "F7",
        HotkeyKey::F8 => "F8",
        HotkeyKey::F9 => "F9",
        HotkeyKey::F10 => "F10",
        HotkeyKey::F11 => "F11",
        HotkeyKey::F12 => "F12",
    }
}

fn key_to_code(key: HotkeyKey) -> Code {
    match key {
        HotkeyKey::F1 => Code::F1,
        HotkeyKey::F2 => Code::F2,
        HotkeyKey::F3 => Code::F3,
        HotkeyKey::F4 => Code::F4,
        HotkeyKey::F5 => Code::F5,
        HotkeyKey::F6 => Code::F6,
        HotkeyKey::F7 => Code::F7,
        HotkeyKey::F8 => Code::F8,
        HotkeyKey::F9 => Code::F9,
        HotkeyKey::F10 => Code::F10,
        HotkeyKey::F11 => Code::F11,
        HotkeyKey::F12 => Code::F12,
    }
}

fn modifiers_to_code(modifiers: HotkeyModifiers) -> Modifiers {
    let mut mods = Modifiers::empty();
    if modifiers.ctrl {
        mods |= Modifiers::CONTROL;
    }
    if modifiers.alt {
        mods |= Modifiers::ALT;
    }
    if modifiers.shift {
        mods |= Modifiers::SHIFT;
    }
    mods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_label() {
        let binding = HotkeyBinding::default();
        assert_eq!(binding_label(&binding), "F8");

        let binding = HotkeyBinding {
            key: Some(HotkeyKey::F2),
            modifiers: HotkeyModifiers {
                ctrl: true,
                alt: false,
                shift: true,
            },
        };
        assert_eq!(binding_label(&binding), "Ctrl+Shift+F2");

        let binding = HotkeyBinding {
            key: None,
            modifiers: HotkeyModifiers::default(),
        };
        assert_eq!(binding_label(&binding), "Disabled");
    }

    #[test]
    fn test_disabled_binding_has_no_hotkey() {
        let binding = HotkeyBinding {
            key: None,
            modifiers: HotkeyModifiers::default(),
        };
        assert!(hotkey_from_binding(&binding).is_none());
        assert!(hotkey_from_binding(&HotkeyBinding::default()).is_some());
    }
}
