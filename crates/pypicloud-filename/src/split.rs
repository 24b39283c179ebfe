use std::sync::LazyLock;

use regex::Regex;

/// A project name and version recovered from a distribution filename stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFilename {
    /// The project name, exactly as spelled in the filename.
    pub name: String,
    pub version: String,
    /// The Python version marker (e.g., `2.7` from `-py2.7`), if any.
    pub python_version: Option<String>,
}

static PROJECT_NAME_AND_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z0-9_]+([.-][a-z_][a-z0-9_]*)*)-([a-z0-9_.+-]+)").unwrap()
});

static PYTHON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-py(\d\.?\d?)").unwrap());

/// Split a filename stem (the filename without its extension) into a project name and version.
///
/// If `project_name` is provided and the stem starts with it (at a word boundary), the split
/// happens right after it. Otherwise, the name is taken to be the longest leading run of
/// dash- or dot-separated components that don't start with a digit.
///
/// Returns `None` if the stem can't be split.
pub fn split_filename(stem: &str, project_name: Option<&str>) -> Option<SplitFilename> {
    let decoded = percent_encoding::percent_decode_str(stem).decode_utf8_lossy();
    let mut stem = decoded.replace(' ', "-");

    let mut python_version = None;
    if let Some(captures) = PYTHON_VERSION.captures(&stem) {
        python_version = Some(captures[1].to_string());
        let start = captures.get(0).map_or(stem.len(), |m| m.start());
        stem.truncate(start);
    }

    if let Some(project_name) = project_name.filter(|name| !name.is_empty()) {
        if stem.chars().count() > project_name.chars().count() + 1 {
            if let Some(rest) = stem.strip_prefix(project_name) {
                let previous = project_name.chars().next_back();
                let next = rest.chars().next();
                if is_word_boundary(previous, next) {
                    // Skip the separator between the name and the version.
                    let mut version = rest.chars();
                    version.next();
                    return Some(SplitFilename {
                        name: project_name.to_string(),
                        version: version.as_str().to_string(),
                        python_version,
                    });
                }
            }
        }
    }

    let captures = PROJECT_NAME_AND_VERSION.captures(&stem)?;
    Some(SplitFilename {
        name: captures[1].to_string(),
        version: captures[3].to_string(),
        python_version,
    })
}

/// Returns `true` if there is a word boundary between the two characters, with `None`
/// representing the start or end of the string.
fn is_word_boundary(previous: Option<char>, next: Option<char>) -> bool {
    fn is_word(char: Option<char>) -> bool {
        char.is_some_and(|char| char.is_alphanumeric() || char == '_')
    }
    is_word(previous) != is_word(next)
}
