//! Helpers for `"<Device>/control"` paths.

use crate::constants::EXCLUDED_CONTROLS;

/// The device layout named between the angle brackets, if any.
pub fn device(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('<')?;
    let end = rest.find('>')?;
    Some(&rest[..end])
}

/// Everything after the device, without the leading slash.
pub fn control(path: &str) -> &str {
    match path.find('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Human-readable label for a control path, e.g. `"<Keyboard>/leftShift"` -> `"Left Shift"`.
pub fn display_name(path: &str) -> String {
    let control = control(path);
    if control.is_empty() {
        return "Unbound".to_string();
    }

    // nested controls such as "dpad/up" read as one label per segment
    let mut words: Vec<String> = Vec::new();
    for segment in control.split('/').filter(|s| !s.is_empty()) {
        let mut current = String::new();
        for c in segment.chars() {
            if c.is_uppercase() && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Noise inputs that must never be captured as a new binding.
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_CONTROLS.contains(&path)
}

/// True when `groups` (`;`-separated schemes, `&` joining devices within one)
/// allows a control on the path's device. An empty group list allows anything.
pub fn group_accepts(groups: &str, path: &str) -> bool {
    if groups.trim().is_empty() {
        return true;
    }
    let Some(device) = device(path) else {
        return false;
    };
    groups
        .split(';')
        .flat_map(|scheme| scheme.split('&'))
        .any(|d| d.trim().eq_ignore_ascii_case(device))
}

/// True when the binding's groups list `scheme` among its schemes.
pub fn in_scheme(groups: &str, scheme: &str) -> bool {
    groups.split(';').any(|g| g.trim() == scheme)
}
