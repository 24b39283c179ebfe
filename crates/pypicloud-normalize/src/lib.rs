pub use package_name::PackageName;

mod package_name;

/// Normalize a package name.
///
/// Every maximal run of `-`, `_`, and `.` is replaced by a single `-`, and the result is
/// lowercased. Unlike a strict name parser, this never fails: any string has a normalized form.
///
/// See: <https://peps.python.org/pep-0503/#normalized-names>
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());

    let mut in_separator = false;
    for char in name.chars() {
        match char {
            '-' | '_' | '.' => {
                if !in_separator {
                    normalized.push('-');
                }
                in_separator = true;
            }
            _ => {
                normalized.extend(char.to_lowercase());
                in_separator = false;
            }
        }
    }

    normalized
}

/// Returns `true` if the name is already normalized.
pub(crate) fn is_normalized(name: &str) -> bool {
    let mut last = None;
    for char in name.chars() {
        match char {
            '_' | '.' => return false,
            '-' => {
                // Runs of `-` are normalized to a single `-`.
                if last == Some('-') {
                    return false;
                }
            }
            _ => {
                if char.to_lowercase().ne(std::iter::once(char)) {
                    return false;
                }
            }
        }
        last = Some(char);
    }
    true
}
