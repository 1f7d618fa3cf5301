/// Split `text` into chunks of at most `limit` UTF-16 code units.
///
/// Telegram measures message length in UTF-16 units, so an emoji counts as
/// two. Cuts at the last newline inside the window when there is one,
/// otherwise at the limit; a character is never split. Whitespace-only chunks
/// are dropped, so blank text yields no chunks at all.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(2);
    let mut out = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some(hard) = window_end(rest, limit) else {
            push_chunk(&mut out, rest);
            break;
        };

        let cut = match rest[..hard].rfind('\n') {
            Some(nl) if nl > 0 => nl,
            _ => hard,
        };
        push_chunk(&mut out, &rest[..cut]);
        rest = &rest[cut..];
        rest = rest.strip_prefix('\n').unwrap_or(rest);
    }

    out
}

/// Byte offset where the first `limit` UTF-16 units of `text` end, or `None`
/// when the whole of `text` fits.
fn window_end(text: &str, limit: usize) -> Option<usize> {
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > limit {
            return Some(idx);
        }
    }
    None
}

fn push_chunk(out: &mut Vec<String>, chunk: &str) {
    if !chunk.trim().is_empty() {
        out.push(chunk.to_string());
    }
}
