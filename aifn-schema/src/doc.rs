//! Documentation string cleanup.

const TAB_WIDTH: usize = 8;

/// Cleans up a documentation string for use as a schema description.
///
/// Tabs are expanded, the first line loses its leading whitespace, the
/// indentation shared by the remaining lines is removed, and blank lines at
/// either end are dropped. Returns `None` when nothing is left.
#[must_use]
pub fn normalize_doc(raw: &str) -> Option<String> {
    let lines: Vec<String> = raw.lines().map(expand_tabs).collect();
    let (first, rest) = lines.split_first()?;

    let margin = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    cleaned.push(first.trim_start());
    cleaned.extend(rest.iter().map(|line| strip_indent(line, margin)));

    let start = cleaned.iter().position(|line| !line.trim().is_empty())?;
    let end = cleaned.iter().rposition(|line| !line.trim().is_empty())?;
    Some(cleaned[start..=end].join("\n"))
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

fn strip_indent(line: &str, width: usize) -> &str {
    let offset = line
        .char_indices()
        .take(width)
        .take_while(|(_, c)| c.is_whitespace())
        .last()
        .map_or(0, |(idx, c)| idx + c.len_utf8());
    &line[offset..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_is_trimmed() {
        assert_eq!(
            normalize_doc("  Adds 1 to x.  ").as_deref(),
            Some("Adds 1 to x.  ")
        );
    }

    #[test]
    fn common_indentation_is_removed() {
        let raw = "Summary line.\n\n    Details here.\n      Nested.\n    ";
        assert_eq!(
            normalize_doc(raw).as_deref(),
            Some("Summary line.\n\nDetails here.\n  Nested.")
        );
    }

    #[test]
    fn leading_blank_lines_are_dropped() {
        let raw = "\n\tIndented summary.\n";
        assert_eq!(normalize_doc(raw).as_deref(), Some("Indented summary."));
    }

    #[test]
    fn blank_docs_are_rejected() {
        assert_eq!(normalize_doc(""), None);
        assert_eq!(normalize_doc("   \n \t \n"), None);
    }
}
