use crate::error::RenameError;

const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Rejects a final file name the host filesystem can never accept.
pub fn check_file_name(name: &str) -> Result<(), RenameError> {
    check_file_name_for(name, cfg!(windows))
}

fn check_file_name_for(name: &str, windows: bool) -> Result<(), RenameError> {
    let reject = |reason: &str| Err(RenameError::InvalidArgument(format!("{name:?}: {reason}")));

    if name.trim().is_empty() {
        return reject("name is blank");
    }
    if name == "." || name == ".." {
        return reject("name is a relative path component");
    }
    if name.contains('/') || name.contains('\0') {
        return reject("name contains a path separator or NUL");
    }

    if windows {
        if name.chars().any(is_disallowed_char) {
            return reject("name contains a character Windows does not allow");
        }
        if name.ends_with([' ', '.']) {
            return reject("name ends with a space or dot");
        }
        if is_windows_reserved(name) {
            return reject("name is a reserved device name");
        }
    }

    Ok(())
}

fn is_disallowed_char(ch: char) -> bool {
    matches!(ch, '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || ch.is_control()
}

fn is_windows_reserved(value: &str) -> bool {
    let stem = value
        .split('.')
        .next()
        .unwrap_or(value)
        .trim_end()
        .to_ascii_uppercase();
    WINDOWS_RESERVED_NAMES
        .iter()
        .any(|reserved| reserved == &stem)
}
