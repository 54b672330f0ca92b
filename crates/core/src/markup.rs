//! Pure functions for markup dialect conversion.
//!
//! This module translates issue text between the tracker's wiki dialect
//! (`h1.` headers, `*bold*`, `{{inline}}`, `{code}`/`{noformat}` blocks) and
//! Markdown. Conversion is a fixed pipeline of regex substitutions over an
//! immutable buffer; fenced and preformatted blocks are lifted out into a
//! positional block list first so the line-oriented rewrites cannot touch
//! their contents, then restored at the end.
//!
//! Both directions are best-effort: unmatched or partially-matched tags pass
//! through as literal text and no input can make these functions fail. A
//! round trip `to_tracker(to_markdown(x)) == x` holds for documents built
//! from the constructs the pipeline understands.

use regex::{Captures, Regex};

/// Placeholder token for an extracted block. NUL delimiters keep the token
/// disjoint from anything the surrounding rewrites can produce.
fn placeholder(index: usize) -> String {
    format!("\u{0}{}\u{0}", index)
}

/// Replaces every match of `pattern` with a positional placeholder and
/// appends the matched text to `blocks`, returning the stripped text and the
/// grown block list as a value pair.
fn extract_blocks(text: &str, pattern: &Regex, mut blocks: Vec<String>) -> (String, Vec<String>) {
    let mut stripped = String::with_capacity(text.len());
    let mut last = 0;
    for found in pattern.find_iter(text) {
        stripped.push_str(&text[last..found.start()]);
        stripped.push_str(&placeholder(blocks.len()));
        blocks.push(found.as_str().to_string());
        last = found.end();
    }
    stripped.push_str(&text[last..]);
    (stripped, blocks)
}

/// Substitutes each placeholder with its recorded block. Placeholders with
/// no recorded block are left as-is.
fn restore_blocks(text: &str, blocks: &[String]) -> String {
    let marker = Regex::new("\u{0}(\\d+)\u{0}").unwrap();
    marker
        .replace_all(text, |caps: &Captures| {
            let index = caps[1].parse::<usize>().unwrap_or(usize::MAX);
            blocks
                .get(index)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

/// Renders a `{noformat}` block as a Markdown block quote, one `> ` line per
/// interior line with a bare `>` for empty lines. Returns `None` when the
/// block is not a `{noformat}` pair.
fn reformat_noformat(block: &str) -> Option<String> {
    let interior = block
        .strip_prefix("{noformat}")?
        .strip_suffix("{noformat}")?;
    let interior = interior.strip_prefix('\n').unwrap_or(interior);
    let interior = interior.strip_suffix('\n').unwrap_or(interior);
    let quoted = interior
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(quoted)
}

/// Renders a `{code}` or `{code:lang}` block as a fenced Markdown block,
/// carrying the language annotation onto the opening fence. Non-code blocks
/// are returned unchanged.
fn reformat_code(block: &str) -> String {
    let pattern = Regex::new(r"(?s)^\{code(?::([^}]*))?\}(.*)\{code\}$").unwrap();
    match pattern.captures(block) {
        Some(caps) => {
            let lang = caps.get(1).map_or("", |m| m.as_str());
            let interior = caps.get(2).map_or("", |m| m.as_str());
            format!("```{}{}\n```", lang, interior)
        }
        None => block.to_string(),
    }
}

fn reformat_block(block: &str) -> String {
    reformat_noformat(block).unwrap_or_else(|| reformat_code(block))
}

/// Collapses consecutive `>`-quoted lines into a `{noformat}` block,
/// stripping the quote marker and at most one following space from each.
fn quotes_to_noformat(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut run: Vec<String> = Vec::new();
    for line in text.split('\n') {
        if let Some(rest) = line.strip_prefix('>') {
            run.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        } else {
            if !run.is_empty() {
                out.push(format!("{{noformat}}\n{}\n{{noformat}}", run.join("\n")));
                run.clear();
            }
            out.push(line.to_string());
        }
    }
    if !run.is_empty() {
        out.push(format!("{{noformat}}\n{}\n{{noformat}}", run.join("\n")));
    }
    out.join("\n")
}

/// Rewrites fenced Markdown blocks as `{code}` blocks, keeping any language
/// annotation from the opening fence.
fn fences_to_code(text: &str) -> String {
    let fence = Regex::new(r"(?s)```(\w*)\n(.*?)\n```").unwrap();
    fence
        .replace_all(text, |caps: &Captures| {
            let lang = &caps[1];
            let body = &caps[2];
            if lang.is_empty() {
                format!("{{code}}\n{}{{code}}", body)
            } else {
                format!("{{code:{}}}\n{}{{code}}", lang, body)
            }
        })
        .to_string()
}

/// Converts tracker wiki markup to Markdown.
///
/// `{noformat}` and `{code}` blocks are extracted first, the line-oriented
/// substitutions run over the remainder, and each block is then restored as
/// a block quote or fenced code block.
pub fn to_markdown(text: &str) -> String {
    let noformat = Regex::new(r"(?s)\{noformat\}.*?\{noformat\}").unwrap();
    let code = Regex::new(r"(?s)\{code(?::[^}]*)?\}.*?\{code\}").unwrap();

    let (text, blocks) = extract_blocks(text, &noformat, Vec::new());
    let (text, blocks) = extract_blocks(&text, &code, blocks);

    // List markers convert before headers so a rewritten `h1.` leader is not
    // re-read as a numbered-list leader.
    let text = Regex::new(r"(?m)^\* ")
        .unwrap()
        .replace_all(&text, "- ")
        .to_string();
    let text = Regex::new(r"(?m)^# ")
        .unwrap()
        .replace_all(&text, "1. ")
        .to_string();
    let text = Regex::new(r"(?m)^h([1-6])\. ")
        .unwrap()
        .replace_all(&text, |caps: &Captures| {
            let level = caps[1].parse::<usize>().unwrap_or(1);
            format!("{} ", "#".repeat(level))
        })
        .to_string();
    // Bold before italic: the italic output `*x*` must not be produced until
    // every single-asterisk span has already been widened.
    let text = Regex::new(r"\*([^*\n]+)\*")
        .unwrap()
        .replace_all(&text, "**$1**")
        .to_string();
    let text = Regex::new(r"_([^_\n]+)_")
        .unwrap()
        .replace_all(&text, "*$1*")
        .to_string();
    let text = Regex::new(r"\{\{(.*?)\}\}")
        .unwrap()
        .replace_all(&text, "`$1`")
        .to_string();
    let text = Regex::new(r"\[([^|\]]*)\|(\w+://[^\]]*)\]")
        .unwrap()
        .replace_all(&text, "[$1]($2)")
        .to_string();

    let rendered: Vec<String> = blocks.iter().map(|block| reformat_block(block)).collect();
    restore_blocks(&text, &rendered)
}

/// Converts Markdown to tracker wiki markup.
///
/// Quote runs and fences are rewritten into their tracker envelopes first,
/// then extracted so the remaining substitutions skip their contents, and
/// finally restored verbatim.
pub fn to_tracker(text: &str) -> String {
    let text = quotes_to_noformat(text);
    let text = fences_to_code(&text);
    let text = Regex::new(r"\[([^\]]*)\]\((\w+://[^)\s]*)\)")
        .unwrap()
        .replace_all(&text, "[$1|$2]")
        .to_string();

    let noformat = Regex::new(r"(?s)\{noformat\}.*?\{noformat\}").unwrap();
    let code = Regex::new(r"(?s)\{code(?::[^}]*)?\}.*?\{code\}").unwrap();
    let (text, blocks) = extract_blocks(&text, &noformat, Vec::new());
    let (text, blocks) = extract_blocks(&text, &code, blocks);

    let text = Regex::new(r"(?m)^(#{1,6}) ")
        .unwrap()
        .replace_all(&text, |caps: &Captures| format!("h{}. ", caps[1].len()))
        .to_string();
    // Single pass over both emphasis forms. Trying the double-asterisk arm
    // first keeps `**bold**` from collapsing straight through to `_bold_`.
    let text = Regex::new(r"\*\*([^*\n]+)\*\*|\*([^*\n]+)\*")
        .unwrap()
        .replace_all(&text, |caps: &Captures| match caps.get(1) {
            Some(bold) => format!("*{}*", bold.as_str()),
            None => format!("_{}_", &caps[2]),
        })
        .to_string();
    let text = Regex::new(r"`([^`\n]*)`")
        .unwrap()
        .replace_all(&text, "{{$1}}")
        .to_string();
    let text = Regex::new(r"(?m)^- ")
        .unwrap()
        .replace_all(&text, "* ")
        .to_string();
    let text = Regex::new(r"(?m)^\d+\. ")
        .unwrap()
        .replace_all(&text, "# ")
        .to_string();

    restore_blocks(&text, &blocks)
}

/// Rewrites tracker comment permalinks (`[label|https://…/browse/KEY-1?focusedId=2…]`)
/// as compact Markdown references of the form `[label](KEY-1#2)`.
///
/// Runs before [`to_markdown`] because the permalink would otherwise be
/// picked up by the generic hyperlink rewrite.
pub fn comment_refs_to_markdown(text: &str) -> String {
    let permalink =
        Regex::new(r"\[(.*?)\|(https?://.*?/browse/([A-Z]+-\d+)\?focusedId=(\d+).*?)\]").unwrap();
    permalink.replace_all(text, "[$1]($3#$4)").to_string()
}

/// Expands compact comment references (`[label](KEY-1#2)`) back into full
/// tracker permalinks rooted at `server_url`.
///
/// Runs before [`to_tracker`] for the same reason [`comment_refs_to_markdown`]
/// runs before [`to_markdown`].
pub fn comment_refs_to_tracker(text: &str, server_url: &str) -> String {
    let server = if server_url.ends_with('/') {
        server_url.to_string()
    } else {
        format!("{}/", server_url)
    };
    let reference = Regex::new(r"\[(.*?)\]\(([A-Z]+-\d+)#(\d+)\)").unwrap();
    reference
        .replace_all(text, |caps: &Captures| {
            format!(
                "[{}|{}browse/{}?focusedId={}&page=com.atlassian.jira.plugin.system.issuetabpanels:comment-tabpanel#comment-{}]",
                &caps[1], server, &caps[2], &caps[3], &caps[3]
            )
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKER_DOC: &str = r#"
As noted in [the earlier comment|https://jira.example.com/browse/NET-4312?focusedId=10452&page=com.atlassian.jira.plugin.system.issuetabpanels:comment-tabpanel#comment-10452], the retry loop never backs off.
h1. Steps to reproduce:
* Start the collector with the default profile.
* Kill the upstream endpoint.
* Watch [~oncall@example.com] drown in duplicate pages.
The trace we captured reads:
{noformat}
retry scheduled in 0ms (attempt 4117)

retry scheduled in 0ms (attempt 4118)
{noformat}
The guilty branch is:
{code:java}
if (retryable)
    schedule(0);
{code}
Every path that lands here skips the backoff computation entirely. The *impact* spans every collector because the {{maxBackoff}} knob is _silently_ ignored.
Full log at [here|https://logs.example.com/collector/2025/06/outage.txt] and the capture at [here|ftp://archive.example.com/pcap/outage.pcap]
"#;

    const MARKDOWN_DOC: &str = r#"
As noted in [the earlier comment](NET-4312#10452), the retry loop never backs off.
# Steps to reproduce:
- Start the collector with the default profile.
- Kill the upstream endpoint.
- Watch [~oncall@example.com] drown in duplicate pages.
The trace we captured reads:
> retry scheduled in 0ms (attempt 4117)
>
> retry scheduled in 0ms (attempt 4118)
The guilty branch is:
```java
if (retryable)
    schedule(0);

```
Every path that lands here skips the backoff computation entirely. The **impact** spans every collector because the `maxBackoff` knob is *silently* ignored.
Full log at [here](https://logs.example.com/collector/2025/06/outage.txt) and the capture at [here](ftp://archive.example.com/pcap/outage.pcap)
"#;

    #[test]
    fn test_round_trip_through_markdown() {
        let markdown = to_markdown(&comment_refs_to_markdown(TRACKER_DOC));
        assert_eq!(markdown, MARKDOWN_DOC);

        let tracker = to_tracker(&comment_refs_to_tracker(&markdown, "https://jira.example.com"));
        assert_eq!(tracker, TRACKER_DOC);
    }

    #[test]
    fn test_extraction_restores_blocks_verbatim() {
        let noformat = Regex::new(r"(?s)\{noformat\}.*?\{noformat\}").unwrap();
        let code = Regex::new(r"(?s)\{code(?::[^}]*)?\}.*?\{code\}").unwrap();
        let original = "keep\n{noformat}\nraw\n{noformat}\nmid\n{code:rust}\nlet x = 1;\n{code}\ntail";

        let (stripped, blocks) = extract_blocks(original, &noformat, Vec::new());
        let (stripped, blocks) = extract_blocks(&stripped, &code, blocks);

        assert_eq!(blocks.len(), 2);
        assert!(!stripped.contains("{noformat}"));
        assert!(!stripped.contains("{code"));
        assert_eq!(restore_blocks(&stripped, &blocks), original);
    }

    #[test]
    fn test_bold_never_degrades_to_italic() {
        assert_eq!(to_tracker("**important**"), "*important*");
        assert_eq!(to_tracker("**bold** then *italic*"), "*bold* then _italic_");
        assert_eq!(to_markdown("*bold* then _italic_"), "**bold** then *italic*");
    }

    #[test]
    fn test_header_levels() {
        assert_eq!(to_markdown("h2. Sub"), "## Sub");
        assert_eq!(to_markdown("h3. Deep"), "### Deep");
        assert_eq!(to_tracker("## Sub"), "h2. Sub");
    }

    #[test]
    fn test_header_and_numbered_list_do_not_interfere() {
        assert_eq!(to_markdown("h1. Title\n# numbered"), "# Title\n1. numbered");
        assert_eq!(to_tracker("# Title\n1. numbered"), "h1. Title\n# numbered");
    }

    #[test]
    fn test_numbered_list_markers_collapse() {
        assert_eq!(to_markdown("# first\n# second\n"), "1. first\n1. second\n");
        assert_eq!(to_tracker("1. first\n2. second\n"), "# first\n# second\n");
    }

    #[test]
    fn test_inline_code_spans() {
        assert_eq!(to_markdown("run {{make check}} first"), "run `make check` first");
        assert_eq!(to_tracker("run `make check` first"), "run {{make check}} first");
    }

    #[test]
    fn test_code_block_without_language() {
        assert_eq!(to_markdown("{code}\nx = 1\n{code}"), "```\nx = 1\n\n```");
        assert_eq!(to_tracker("```\nx = 1\n\n```"), "{code}\nx = 1\n{code}");
    }

    #[test]
    fn test_quoted_blank_lines_use_bare_marker() {
        let tracker = "{noformat}\nfirst\n\nsecond\n{noformat}";
        assert_eq!(to_markdown(tracker), "> first\n>\n> second");
        assert_eq!(to_tracker("> first\n>\n> second"), tracker);
        // A quoted blank written as "> " collapses to the same block.
        assert_eq!(to_tracker("> first\n> \n> second"), tracker);
    }

    #[test]
    fn test_unmatched_tags_pass_through() {
        let dangling = "text with {noformat}\nnever closed";
        assert_eq!(to_markdown(dangling), dangling);

        let half_code = "{code:c}\nint x;\n";
        assert_eq!(to_markdown(half_code), half_code);
    }

    #[test]
    fn test_user_mentions_untouched() {
        assert_eq!(to_markdown("ping [~dev@example.com]"), "ping [~dev@example.com]");
        assert_eq!(to_tracker("ping [~dev@example.com]"), "ping [~dev@example.com]");
    }

    #[test]
    fn test_comment_permalink_to_reference() {
        let text = "see [older note|https://jira.example.com/browse/ABC-9?focusedId=77&page=com.atlassian.jira.plugin.system.issuetabpanels:comment-tabpanel#comment-77] for details";
        assert_eq!(
            comment_refs_to_markdown(text),
            "see [older note](ABC-9#77) for details"
        );
    }

    #[test]
    fn test_comment_reference_to_permalink() {
        let text = "see [older note](ABC-9#77) for details";
        let expected = "see [older note|https://jira.example.com/browse/ABC-9?focusedId=77&page=com.atlassian.jira.plugin.system.issuetabpanels:comment-tabpanel#comment-77] for details";
        assert_eq!(comment_refs_to_tracker(text, "https://jira.example.com"), expected);
        assert_eq!(comment_refs_to_tracker(text, "https://jira.example.com/"), expected);
    }
}
