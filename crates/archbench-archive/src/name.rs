use crate::Error;

/// Normalize an entry name to `/` separators and check that it is a plain relative path.
///
/// `\` is a path separator on Windows only, elsewhere it is an ordinary file name character.
pub(crate) fn normalize_entry_name(name: &str) -> Result<String, Error> {
    let invalid = |reason| Error::InvalidEntryName {
        name: name.to_string(),
        reason,
    };

    #[cfg(windows)]
    let normalized = name.replace('\\', "/");
    #[cfg(not(windows))]
    let normalized = name.to_string();
    if normalized.is_empty() {
        return Err(invalid("the name is empty"));
    }
    if normalized.starts_with('/') {
        return Err(invalid("the name must be a relative path"));
    }
    if normalized
        .split('/')
        .any(|component| matches!(component, "" | "." | ".."))
    {
        return Err(invalid("the name must not contain empty, `.` or `..` components"));
    }
    Ok(normalized)
}
