//! Splitting of diagnostic file paths into trie segments.

/// Marker attached to the first segment of an absolute path.
pub const ABSOLUTE_MARKER: &str = "/";

/// Marker attached to the first segment of a UNC path.
pub const UNC_MARKER: &str = "//";

/// Separator used when joining segments back into a display name.
pub const SEPARATOR: char = '/';

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Splits a path on both `/` and `\` into its non-empty segments.
///
/// A leading double separator (UNC, `\\server\share`) or single separator
/// (absolute, `/usr/src`) is kept by prefixing the first segment with `//` or
/// `/`, so `\\srv\a` and `//srv/a` both become `["//srv", "a"]`. Empty
/// segments from repeated or trailing separators are dropped. Returns an empty
/// list when the path has no segment at all.
///
/// # Examples
///
/// ```
/// use errlist_core::split_path;
///
/// assert_eq!(split_path("/a/b/x.ts"), vec!["/a", "b", "x.ts"]);
/// assert_eq!(split_path(r"C:\src\main.c"), vec!["C:", "src", "main.c"]);
/// assert!(split_path("//").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    let leading = path.chars().take_while(|c| is_separator(*c)).count();
    let marker = match leading {
        0 => "",
        1 => ABSOLUTE_MARKER,
        _ => UNC_MARKER,
    };

    let mut segments: Vec<String> = path
        .split(is_separator)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(first) = segments.first_mut() {
        if !marker.is_empty() {
            first.insert_str(0, marker);
        }
    }

    segments
}

/// Joins two segment names for a compacted directory.
pub fn join_segments(parent: &str, child: &str) -> String {
    let mut joined = String::with_capacity(parent.len() + child.len() + 1);
    joined.push_str(parent);
    joined.push(SEPARATOR);
    joined.push_str(child);
    joined
}
