//! Human-readable step names derived from Rust type names.

/// Derive a display name from the type name of a step callable.
///
/// The path is split on `::` outside generic brackets, trailing closure
/// segments are dropped so a closure is named after the function defining it,
/// generic arguments are removed and underscores become spaces.
///
/// ```text
/// my_tests::a_user_logs_in                 -> "a user logs in"
/// my_tests::checkout::{{closure}}          -> "checkout"
/// my_tests::load<alloc::string::String>   -> "load"
/// ```
pub(crate) fn display_name(type_name: &str) -> String {
    let segments = split_path(type_name);
    let last = segments
        .iter()
        .rev()
        .find(|segment| !segment.starts_with('{'))
        .or_else(|| segments.last())
        .copied()
        .unwrap_or(type_name);
    let base = last.split('<').next().unwrap_or(last);
    base.replace('_', " ")
}

fn split_path(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}
