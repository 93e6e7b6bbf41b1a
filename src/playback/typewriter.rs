/// Returns the first `visible` characters of `title`, cut on a char boundary.
pub fn typewriter_prefix(title: &str, visible: usize) -> &str {
    match title.char_indices().nth(visible) {
        Some((byte_idx, _)) => &title[..byte_idx],
        None => title,
    }
}

/// Number of ticks needed to reveal the whole title.
pub fn typewriter_len(title: &str) -> usize {
    title.chars().count()
}
