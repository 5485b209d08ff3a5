use crate::core::keys::ScanKey;

/// OS key-injection seam consumed by the actuation worker. Calls may be
/// slow; releasing a key that is already up must be harmless.
pub trait KeyActuator: Send {
    fn press(&mut self, key: ScanKey) -> Result<(), String>;
    fn release(&mut self, key: ScanKey) -> Result<(), String>;
}

/// Injects hardware-level scan code events via SendInput, which is what
/// fullscreen DirectInput games actually read (virtual-key events are
/// ignored by most of them).
#[cfg(windows)]
pub struct SendInputActuator;

#[cfg(windows)]
impl KeyActuator for SendInputActuator {
    fn press(&mut self, key: ScanKey) -> Result<(), String> {
        send_scan_event(key, false)
    }

    fn release(&mut self, key: ScanKey) -> Result<(), String> {
        send_scan_event(key, true)
    }
}

#[cfg(windows)]
fn send_scan_event(key: ScanKey, key_up: bool) -> Result<(), String> {
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_EXTENDEDKEY,
        KEYEVENTF_KEYUP, KEYEVENTF_SCANCODE, VIRTUAL_KEY,
    };

    let mut flags = KEYEVENTF_SCANCODE;
    if key.is_extended() {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }

    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: key.scan_code(),
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };

    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent == 1 {
        Ok(())
    } else {
        Err(format!(
            "SendInput rejected the {} {} event",
            key.label(),
            if key_up { "up" } else { "down" }
        ))
    }
}
