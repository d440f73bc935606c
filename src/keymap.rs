//! Bidirectional translation between portable and native key codes.
//!
//! Each platform contributes one hand-authored, ordered list of
//! `(KeyCode, NativeKeyCode)` pairs (see `platform::*::keycodes`). The table
//! built from that list is process-wide, immutable, and initialized exactly
//! once on first use; initialization happens-before every lookup.
//!
//! A later pair for the same portable code overwrites an earlier one
//! (last-wins), which is how native aliases are resolved: alias pairs are
//! listed before the canonical pair, so the canonical native code wins the
//! forward direction while every alias still resolves back to the portable
//! code.

use std::sync::OnceLock;

use crate::keycode::KeyCode;
use crate::platform;

/// The platform's native key code representation: Win32 virtual-key code,
/// macOS `CGKeyCode`, or X11 `KeyCode`, widened to `u16`. A native code is
/// meaningless outside the platform that produced it.
pub type NativeKeyCode = u16;

/// Sentinel returned by [`convert_to_native`] for [`KeyCode::Invalid`] and
/// portable codes absent from the platform table. The injection path treats
/// it as "do not inject". No virtual-key code is assigned zero.
#[cfg(target_os = "windows")]
pub const NATIVE_FALLBACK: NativeKeyCode = 0x0000;

/// Sentinel returned by [`convert_to_native`] for [`KeyCode::Invalid`] and
/// portable codes absent from the platform table. The injection path treats
/// it as "do not inject". Outside the `CGKeyCode` range.
#[cfg(target_os = "macos")]
pub const NATIVE_FALLBACK: NativeKeyCode = 0xFFFF;

/// Sentinel returned by [`convert_to_native`] for [`KeyCode::Invalid`] and
/// portable codes absent from the platform table. The injection path treats
/// it as "do not inject". X11 keycodes start at 8.
#[cfg(target_os = "linux")]
pub const NATIVE_FALLBACK: NativeKeyCode = 0x0000;

/// Immutable two-way lookup table between portable and native codes.
///
/// Native codes at or above 256 are outside every supported platform's key
/// space and always resolve to [`KeyCode::Invalid`].
struct KeyCodeTable {
    to_native: [NativeKeyCode; 256],
    to_portable: [KeyCode; 256],
}

impl KeyCodeTable {
    fn build(pairs: &[(KeyCode, NativeKeyCode)]) -> Self {
        let mut to_native = [NATIVE_FALLBACK; 256];
        let mut to_portable = [KeyCode::Invalid; 256];
        for &(key, native) in pairs {
            to_native[key.as_u8() as usize] = native;
            if (native as usize) < to_portable.len() {
                to_portable[native as usize] = key;
            }
        }
        Self {
            to_native,
            to_portable,
        }
    }
}

fn table() -> &'static KeyCodeTable {
    static TABLE: OnceLock<KeyCodeTable> = OnceLock::new();
    TABLE.get_or_init(|| KeyCodeTable::build(platform::NATIVE_PAIRS))
}

/// Convert a portable key code to this platform's native code.
///
/// Pure and total: [`KeyCode::Invalid`] and portable codes absent from the
/// platform table yield [`NATIVE_FALLBACK`], which the injection path treats
/// as "do not inject".
pub fn convert_to_native(key: KeyCode) -> NativeKeyCode {
    table().to_native[key.as_u8() as usize]
}

/// Convert a native code to its portable key code.
///
/// Pure and total over the whole native range: codes with no declared
/// mapping (vendor/OEM codes included) yield [`KeyCode::Invalid`].
pub fn convert_to_keycode(native: NativeKeyCode) -> KeyCode {
    let table = table();
    if (native as usize) < table.to_portable.len() {
        table.to_portable[native as usize]
    } else {
        KeyCode::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{COLLAPSED_ALIASES, NATIVE_PAIRS};

    #[test]
    fn test_round_trip_holds_for_every_declared_portable_code() {
        for &(key, _) in NATIVE_PAIRS {
            let back = convert_to_keycode(convert_to_native(key));
            let collapsed = COLLAPSED_ALIASES
                .iter()
                .any(|&(from, to)| from == key && to == back);
            assert!(
                back == key || collapsed,
                "{key:?} round-tripped to {back:?}"
            );
        }
    }

    #[test]
    fn test_invalid_converts_to_fallback() {
        assert_eq!(convert_to_native(KeyCode::Invalid), NATIVE_FALLBACK);
    }

    #[test]
    fn test_fallback_has_no_portable_mapping() {
        assert_eq!(convert_to_keycode(NATIVE_FALLBACK), KeyCode::Invalid);
    }

    #[test]
    fn test_unmapped_native_codes_convert_to_invalid() {
        let declared: Vec<NativeKeyCode> = NATIVE_PAIRS.iter().map(|&(_, n)| n).collect();
        for native in 0..=u8::MAX as NativeKeyCode {
            if !declared.contains(&native) {
                assert_eq!(
                    convert_to_keycode(native),
                    KeyCode::Invalid,
                    "native code {native} has no declared mapping"
                );
            }
        }
        // Everything past the 8-bit key space is out of range by contract.
        assert_eq!(convert_to_keycode(0x1234), KeyCode::Invalid);
        assert_eq!(convert_to_keycode(NativeKeyCode::MAX), KeyCode::Invalid);
    }

    #[test]
    fn test_declared_aliases_resolve_to_their_canonical_key() {
        for &(from, to) in COLLAPSED_ALIASES {
            assert_eq!(convert_to_keycode(convert_to_native(from)), to);
        }
    }

    #[test]
    fn test_conversion_is_deterministic() {
        for &(key, _) in NATIVE_PAIRS {
            assert_eq!(convert_to_native(key), convert_to_native(key));
        }
    }
}
