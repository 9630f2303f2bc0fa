// src/core/html.rs
//
// Tolerant, allocation-light HTML scanning. The room site is old table-soup
// markup (unquoted attributes, missing end tags, upper-case names), so nothing
// here builds a DOM; callers slice the document by tag offsets instead.

use super::sanitize::{normalize_entities, normalize_ws};

/// One tag token: `<name …>` or `</name>`. Offsets are byte offsets into the
/// scanned string; `end` is one past the `>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub closing: bool,
    pub start: usize,
    pub end: usize,
}

/// Position of the `>` closing a tag opened before `from`, skipping quoted
/// attribute values.
fn find_tag_end(b: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (k, &c) in b.get(from..)?.iter().enumerate() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == b'"' || c == b'\'' => quote = Some(c),
            None if c == b'>' => return Some(from + k),
            None => {}
        }
    }
    None
}

/// All tags in `s` in document order. Comments are skipped; names are
/// lower-cased.
pub fn scan_tags(s: &str) -> Vec<Tag> {
    let b = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;

    while let Some(off) = b.get(i..).and_then(|rest| rest.iter().position(|&c| c == b'<')) {
        let lt = i + off;
        if s[lt..].starts_with("<!--") {
            i = s[lt + 4..].find("-->").map_or(b.len(), |e| lt + 4 + e + 3);
            continue;
        }
        let Some(gt) = find_tag_end(b, lt + 1) else { break };
        let closing = b.get(lt + 1) == Some(&b'/');
        let name_from = if closing { lt + 2 } else { lt + 1 };
        let name: String = s[name_from.min(gt)..gt]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if !name.is_empty() {
            out.push(Tag { name, closing, start: lt, end: gt + 1 });
        }
        i = gt + 1;
    }
    out
}

/// End offset of the element opened by `tags[idx]`: its balanced closing tag,
/// or the end of `s` when the markup never closes it.
fn balanced_end(s: &str, tags: &[Tag], idx: usize) -> usize {
    let name = &tags[idx].name;
    let mut depth = 0usize;
    for t in &tags[idx..] {
        if &t.name != name { continue; }
        if t.closing {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return t.end;
            }
        } else {
            depth += 1;
        }
    }
    s.len()
}

/// The `n`th `<name>` element of `s` in document order (nested ones count).
pub fn nth_element<'a>(s: &'a str, name: &str, n: usize) -> Option<&'a str> {
    let tags = scan_tags(s);
    let idx = tags
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.closing && t.name == name)
        .nth(n)
        .map(|(i, _)| i)?;
    Some(&s[tags[idx].start..balanced_end(s, &tags, idx)])
}

/// The last `<name>` element of `s` in document order.
pub fn last_element<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let tags = scan_tags(s);
    let idx = tags.iter().rposition(|t| !t.closing && t.name == name)?;
    Some(&s[tags[idx].start..balanced_end(s, &tags, idx)])
}

/// Elements named in `names` that sit directly in `s`, ignoring anything
/// inside a nested `<table>`. An element ends at its closing tag, at the next
/// sibling opener (legacy markup drops `</td>` and `</tr>`), or at the end of
/// `s`.
pub fn child_blocks<'a>(s: &'a str, names: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut nested = 0usize;
    let mut open: Option<usize> = None;

    for t in scan_tags(s) {
        if t.name == "table" {
            if t.closing { nested = nested.saturating_sub(1); } else { nested += 1; }
            continue;
        }
        if nested > 0 || !names.contains(&t.name.as_str()) {
            continue;
        }
        if t.closing {
            if let Some(st) = open.take() {
                out.push(&s[st..t.end]);
            }
        } else if let Some(st) = open.replace(t.start) {
            out.push(&s[st..t.start]);
        }
    }
    if let Some(st) = open {
        out.push(&s[st..]);
    }
    out
}

/// The opening tag of an element block, `<td bgcolor=#cccccc>` for
/// `<td bgcolor=#cccccc>…</td>`.
pub fn opener(block: &str) -> &str {
    match find_tag_end(block.as_bytes(), 0) {
        Some(e) => &block[..=e],
        None => block,
    }
}

/// Content of an element block without its own opening and closing tags.
pub fn inner(block: &str) -> &str {
    let tags = scan_tags(block);
    let Some(first) = tags.first() else { return block };
    match tags.last() {
        Some(last) if tags.len() > 1 && last.closing && last.name == first.name && last.end == block.len() => {
            &block[first.end..last.start]
        }
        _ => &block[first.end..],
    }
}

/// Value of attribute `name` on an opening tag. Names compare ASCII
/// case-insensitively; values may be double-, single- or unquoted. A bare
/// attribute (`nowrap`) yields an empty string.
pub fn attr(open_tag: &str, name: &str) -> Option<String> {
    let b = open_tag.as_bytes();
    let n = b.len();
    let mut i = open_tag.find(|c: char| c.is_ascii_whitespace())?;

    while i < n {
        while i < n && (b[i].is_ascii_whitespace() || b[i] == b'/') { i += 1; }
        if i >= n || b[i] == b'>' { break; }

        let ks = i;
        while i < n && !b[i].is_ascii_whitespace() && !matches!(b[i], b'=' | b'>' | b'/') { i += 1; }
        let key = &open_tag[ks..i];
        while i < n && b[i].is_ascii_whitespace() { i += 1; }

        let mut value = s!();
        if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() { i += 1; }
            match b.get(i) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let vs = i + 1;
                    let ve = open_tag[vs..].find(q as char).map_or(n, |e| vs + e);
                    value = s!(&open_tag[vs..ve]);
                    i = (ve + 1).min(n);
                }
                _ => {
                    let vs = i;
                    while i < n && !b[i].is_ascii_whitespace() && b[i] != b'>' { i += 1; }
                    value = s!(&open_tag[vs..i]);
                }
            }
        }
        if key.eq_ignore_ascii_case(name) {
            return Some(value);
        }
    }
    None
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

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

/// Visible text of an element block: tags dropped, entities decoded,
/// whitespace collapsed.
pub fn text(block: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(inner(block))))
}

/// Text of the first element in `s` carrying `key="value"` (value compared
/// ASCII case-insensitively), e.g. the `<font color="#ffffff">` title span.
pub fn text_by_attr(s: &str, key: &str, value: &str) -> Option<String> {
    let tags = scan_tags(s);
    let idx = tags.iter().position(|t| {
        !t.closing
            && attr(&s[t.start..t.end], key).is_some_and(|v| v.trim().eq_ignore_ascii_case(value))
    })?;
    Some(text(&s[tags[idx].start..balanced_end(s, &tags, idx)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_skips_comments_and_quoted_gt() {
        let tags = scan_tags(r#"<!-- <td> --><A HREF="x>y">t</a>"#);
        let names: Vec<_> = tags.iter().map(|t| (t.name.as_str(), t.closing)).collect();
        assert_eq!(names, vec![("a", false), ("a", true)]);
    }

    #[test]
    fn attr_variants() {
        let tag = r#"<td ROWSPAN=4 colspan="2" bgcolor='#99CC99' nowrap>"#;
        assert_eq!(attr(tag, "rowspan").as_deref(), Some("4"));
        assert_eq!(attr(tag, "colspan").as_deref(), Some("2"));
        assert_eq!(attr(tag, "bgcolor").as_deref(), Some("#99CC99"));
        assert_eq!(attr(tag, "nowrap").as_deref(), Some(""));
        assert_eq!(attr(tag, "width"), None);
        assert_eq!(attr("<td>", "bgcolor"), None);
    }

    #[test]
    fn child_blocks_tolerate_missing_end_tags_and_nested_tables() {
        let row = r#"<td>a<td>b<table><tr><td>x</td></tr></table></td><th>c</th>"#;
        let cells = child_blocks(row, &["td", "th"]);
        assert_eq!(cells.len(), 3);
        assert_eq!(text(cells[0]), "a");
        assert_eq!(text(cells[1]), "bx");
        assert_eq!(text(cells[2]), "c");
    }

    #[test]
    fn nth_and_last_element_are_balanced() {
        let doc = "<table id=1><tr><td><table id=2></table></td></tr></table><table id=3></table>";
        assert!(nth_element(doc, "table", 0).unwrap().ends_with("</td></tr></table>"));
        assert_eq!(nth_element(doc, "table", 1), Some("<table id=2></table>"));
        assert_eq!(last_element(doc, "table"), Some("<table id=3></table>"));
        assert_eq!(nth_element(doc, "table", 3), None);
    }

    #[test]
    fn inner_handles_unclosed_blocks() {
        assert_eq!(inner("<td>x <b>y</b></td>"), "x <b>y</b>");
        assert_eq!(inner("<td>x <b>y</b>"), "x <b>y</b>");
    }

    #[test]
    fn text_by_attr_finds_marker_span() {
        let cell = r##"<td bgcolor=#006799><font color="#FFFFFF"> Analysis&nbsp;I </font><br><font color=#dddddd>D-MATH</font></td>"##;
        assert_eq!(text_by_attr(cell, "color", "#ffffff").as_deref(), Some("Analysis I"));
        assert_eq!(text_by_attr(cell, "color", "#dddddd").as_deref(), Some("D-MATH"));
        assert_eq!(text_by_attr(cell, "color", "#000000"), None);
    }
}
