// Plain string helpers for pulling table cells out of a stats page.
// Tag matching is ASCII case-insensitive; byte offsets line up because only
// ASCII characters are lowercased.

/// HTML inside the first `open_pat ... close_pat` pair, exclusive of both tags.
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lowercase_fast(s);
    let open_idx = find_tag_ci(&lc, &to_lowercase_fast(open_pat), 0)?;
    let after_open = s[open_idx..].find('>')? + open_idx + 1;
    let close_idx_rel = lc[after_open..].find(&to_lowercase_fast(close_pat))?;
    Some(&s[after_open..after_open + close_idx_rel])
}

/// Every complete `<tag ...>...</tag>` block in `s`, in document order.
pub fn tag_blocks_ci<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lowercase_fast(s);
    let open_lc = format!("<{}", to_lowercase_fast(tag));
    let close_lc = format!("</{}>", to_lowercase_fast(tag));

    let mut out = Vec::new();
    let mut from = 0;
    while let Some(start) = find_tag_ci(&lc, &open_lc, from) {
        let Some(open_end) = s[start..].find('>').map(|i| start + i + 1) else {
            break;
        };
        let Some(end_rel) = lc[open_end..].find(&close_lc) else {
            break;
        };
        let end = open_end + end_rel + close_lc.len();
        out.push(&s[start..end]);
        from = end;
    }
    out
}

/// `<td class=x>INNER</td>` -> `INNER` (nested tags kept).
pub fn inner_after_open_tag(block: &str) -> &str {
    if let (Some(open_end), Some(close_start)) = (block.find('>'), block.rfind('<')) {
        if close_start > open_end {
            return &block[open_end + 1..close_start];
        }
    }
    ""
}

/// Visible text of an HTML fragment: tags dropped, entities decoded, whitespace collapsed.
pub fn cell_text(fragment: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(fragment)))
}

pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Collapse whitespace runs into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

pub fn to_lowercase_fast(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

// `<th` must not match `<thead`, so the name has to end at whitespace, `>` or `/`.
fn find_tag_ci(lc: &str, open_lc: &str, from: usize) -> Option<usize> {
    let mut from = from;
    loop {
        let idx = lc.get(from..)?.find(open_lc)? + from;
        let next = lc.as_bytes().get(idx + open_lc.len()).copied();
        match next {
            Some(b) if b == b'>' || b == b'/' || b.is_ascii_whitespace() => return Some(idx),
            None => return None,
            _ => from = idx + open_lc.len(),
        }
    }
}
