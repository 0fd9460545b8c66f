use pagebench_common::Window;

/// Characters `[window.start, window.end)` of `body`.
///
/// Never panics: a window past the end of the body yields a shorter or empty
/// string. Counts Unicode scalar values, so multi-byte text is never split.
pub fn extract(body: &str, window: Window) -> String {
    body.chars()
        .skip(window.start)
        .take(window.end.saturating_sub(window.start))
        .collect()
}

pub fn extract_value(body: &str) -> String {
    extract(body, Window::default())
}
