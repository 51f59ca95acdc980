//! Paste-shortcut simulation backed by the `enigo` crate.
//!
//! | Platform        | Shortcut |
//! |-----------------|----------|
//! | macOS           | ⌘V       |
//! | Windows / Linux | Ctrl+V   |

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::InjectError;

#[cfg(target_os = "macos")]
const PASTE_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const PASTE_MODIFIER: Key = Key::Control;

/// Send the platform paste shortcut to the focused window.
///
/// The modifier is released even if the `V` click fails.
pub fn send_paste_shortcut() -> Result<(), InjectError> {
    let mut enigo =
        Enigo::new(&Settings::default()).map_err(|e| InjectError::KeySimulation(e.to_string()))?;

    press(&mut enigo, PASTE_MODIFIER, Direction::Press)?;
    let clicked = press(&mut enigo, Key::Unicode('v'), Direction::Click);
    press(&mut enigo, PASTE_MODIFIER, Direction::Release)?;
    clicked
}

fn press(enigo: &mut Enigo, key: Key, direction: Direction) -> Result<(), InjectError> {
    let label = format!("{key:?} {direction:?}");
    enigo
        .key(key, direction)
        .map_err(|e| InjectError::KeySimulation(format!("{label}: {e}")))
}
