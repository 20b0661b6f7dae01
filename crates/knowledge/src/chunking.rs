//! Splitting documents into storable fragments.

/// Split `text` into paragraphs separated by blank lines.
///
/// Lines inside a paragraph are joined with `\n`; surrounding whitespace is
/// trimmed and empty paragraphs are dropped.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut current, &mut paragraphs);
        } else {
            current.push(line.trim_end());
        }
    }
    flush(&mut current, &mut paragraphs);

    paragraphs
}

fn flush(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if !current.is_empty() {
        paragraphs.push(current.join("\n").trim().to_string());
        current.clear();
    }
}
