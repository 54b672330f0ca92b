//! Issue-buffer decomposition.
//!
//! After an editor session (or when loading a git patch file) the tool holds
//! one free-form text buffer. This module splits that buffer into the three
//! parts an issue submission needs: a summary line, a description body, and
//! the `#`-prefixed directive lines that carry field assignments.
//!
//! Parsing is best-effort throughout. A patch buffer with no `Subject:` line
//! yields an empty summary rather than an error, since the buffer came from
//! a human editor and will be re-edited if the result looks wrong.

use regex::Regex;

/// The decomposed parts of one issue text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueText {
    /// Single logical summary line.
    pub summary: String,
    /// Free-text body, trimmed of surrounding whitespace.
    pub description: String,
    /// Directive lines in their original order, marker included.
    pub directives: Vec<String>,
}

/// A parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `# set-field: [--forced] "<field>" <value>`
    SetField {
        field: String,
        value: String,
        forced: bool,
    },
    /// `# set-project: <project>`
    SetProject(String),
    /// `# issue-type: <type>`
    IssueType(String),
}

/// Parser state while walking a git-patch-style buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatchState {
    /// Discarding preamble lines until the `Subject:` header.
    SeekingSubject,
    /// Inside the subject, gathering folded continuation lines.
    InSubject,
    /// Accumulating the commit message body.
    Body,
    /// Past the `---` cutline, watching for the start of the diff.
    PostCutline,
}

/// Diffstat and diff-header lines that terminate patch parsing.
fn looks_like_diff(line: &str) -> bool {
    line.starts_with("diff --git")
        || line.contains('|')
        || line.contains("changed")
        || line.contains("created mode")
}

/// Splits a text buffer into `(summary, description, directives)`.
///
/// Two dialects are recognized. A buffer that starts with an email `From `
/// envelope line and contains a `---` cutline is treated as a git patch
/// export: the summary comes from the `Subject:` header (with the leading
/// `[...]` tag stripped and tab-folded continuations joined), the body runs
/// until the cutline, and everything from the diffstat on is discarded.
/// Any other buffer is freeform: the first blank line ends the summary and
/// the rest is description.
///
/// In both dialects a line starting with `#` is captured as a directive and
/// excluded from the summary and description.
pub fn extract(buffer: &str) -> IssueText {
    let patch_style = buffer.starts_with("From ") && buffer.contains("\n---\n");

    let mut summary = String::new();
    let mut description = String::new();
    let mut directives = Vec::new();

    let mut state = PatchState::SeekingSubject;
    let mut parsing_summary = true;

    for raw in buffer.split('\n') {
        let tabbed = raw.starts_with('\t');
        let line = raw.trim();

        if line.is_empty() && parsing_summary {
            parsing_summary = false;
            continue;
        }

        if patch_style {
            if state == PatchState::SeekingSubject {
                if line.starts_with("Subject:") {
                    let subject = match line.find(']') {
                        Some(pos) => &line[pos + 1..],
                        None => line,
                    };
                    summary.push_str(subject);
                    state = PatchState::InSubject;
                }
                continue;
            }

            if state == PatchState::InSubject {
                if parsing_summary {
                    // Only tab-folded header continuations belong to the
                    // subject; other headers are discarded.
                    if !tabbed {
                        continue;
                    }
                    summary.push(' ');
                    summary.push_str(line);
                    continue;
                }
                state = PatchState::Body;
            }

            if state == PatchState::Body && line == "---" {
                state = PatchState::PostCutline;
                continue;
            }

            if state == PatchState::PostCutline && looks_like_diff(line) {
                break;
            }
        }

        if line.starts_with('#') {
            directives.push(line.to_string());
            continue;
        }

        if parsing_summary {
            summary.push_str(line);
        } else {
            description.push_str(line);
            description.push('\n');
        }
    }

    IssueText {
        summary: summary.trim().to_string(),
        description: description.trim().to_string(),
        directives,
    }
}

/// Parses one directive line. Unrecognized lines (including the inert
/// `## set-field:` hints seeded into templates) yield `None`.
pub fn parse_directive(line: &str) -> Option<Directive> {
    if line.starts_with("# set-field:") {
        let pattern = Regex::new(r#"# set-field:\s*(--forced)?\s*"(.*)" (.*)"#).unwrap();
        let caps = pattern.captures(line)?;
        return Some(Directive::SetField {
            field: caps[2].to_string(),
            value: caps[3].to_string(),
            forced: caps.get(1).is_some(),
        });
    }
    if let Some(value) = line.strip_prefix("# set-project: ") {
        return Some(Directive::SetProject(value.to_string()));
    }
    if let Some(value) = line.strip_prefix("# issue-type: ") {
        return Some(Directive::IssueType(value.to_string()));
    }
    None
}

/// The directive block seeded into a fresh issue template.
pub fn default_directives(project: &str, issue_type: &str) -> String {
    format!(
        "# set-project: {}\n\
         # issue-type: {}\n\
         # NOTE: you can use a line '# set-field: \"foo\" bar' to set field 'foo'\n\
         #       to value 'bar'.  The 'set-field' directive requires\n\
         #       field to be quoted as \"Some Foo\".",
        project, issue_type
    )
}

/// Appends command-line field assignments and assignable-field hints to a
/// directive block. Hint lines use a doubled marker so they parse as inert
/// until the author removes one `#`.
pub fn append_field_directives(
    base: &str,
    set_fields: &[(String, String)],
    assignable: &[String],
    show_assignable: bool,
) -> String {
    let mut block = base.to_string();
    if show_assignable {
        block.push_str("\n# Assignable fields below:\n");
    }
    block.push_str("#\n");
    for (field, value) in set_fields {
        let field = if field.starts_with('"') {
            field.clone()
        } else {
            format!("\"{}\"", field)
        };
        block.push_str(&format!("# set-field: {} {}\n", field, value));
    }
    for field in assignable {
        block.push_str(&format!("## set-field: \"{}\" value\n", field));
    }
    block
}

/// Assembles the buffer handed to the editor for a create or update session.
pub fn create_template(summary: &str, description: &str, directives: &str) -> String {
    format!("{}\n\n{}\n\n{}", summary, description, directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_freeform_buffer() {
        let buffer = "Summary line\n\nBody para 1\nBody para 2\n# directive1\n";

        let parsed = extract(buffer);

        assert_eq!(parsed.summary, "Summary line");
        assert_eq!(parsed.description, "Body para 1\nBody para 2");
        assert_eq!(parsed.directives, vec!["# directive1".to_string()]);
    }

    #[test]
    fn test_extract_patch_buffer() {
        let buffer = "From abc\nSubject: [PATCH] Fix the thing\n\nBody\n---\ndiff --git a/x b/x\n+++ b/x\n";

        let parsed = extract(buffer);

        assert_eq!(parsed.summary, "Fix the thing");
        assert_eq!(parsed.description, "Body");
        assert!(parsed.directives.is_empty());
    }

    #[test]
    fn test_extract_patch_folded_subject() {
        let buffer = "From deadbeef Mon Sep 17 00:00:00 2001\n\
                      Subject: [PATCH v2] Start of summary\n\
                      \tcontinued here\n\
                      Date: Tue, 1 Apr 2025 09:00:00 -0400\n\
                      \n\
                      Body text\n\
                      ---\n\
                      \x20x.c | 2 +-\n\
                      \x201 file changed, 1 insertion(+), 1 deletion(-)\n";

        let parsed = extract(buffer);

        assert_eq!(parsed.summary, "Start of summary continued here");
        assert_eq!(parsed.description, "Body text");
    }

    #[test]
    fn test_extract_patch_keeps_notes_after_cutline() {
        let buffer = "From abc\nSubject: [PATCH] S\n\nB\n---\nnote to reviewers\n2 files changed\nrest";

        let parsed = extract(buffer);

        assert_eq!(parsed.summary, "S");
        assert_eq!(parsed.description, "B\nnote to reviewers");
    }

    #[test]
    fn test_extract_patch_without_subject() {
        let buffer = "From abc\nno subject here\n\nbody\n---\ndiff --git a b\n";

        let parsed = extract(buffer);

        assert_eq!(parsed.summary, "");
    }

    #[test]
    fn test_extract_directives_in_description() {
        let buffer = "S\n\nkeep this\n# set-project: NET\n# issue-type: Bug\nand this\n";

        let parsed = extract(buffer);

        assert_eq!(parsed.description, "keep this\nand this");
        assert_eq!(
            parsed.directives,
            vec!["# set-project: NET".to_string(), "# issue-type: Bug".to_string()]
        );
    }

    #[test]
    fn test_parse_directive_set_field() {
        let parsed = parse_directive("# set-field: \"Story Points\" 3");

        assert_eq!(
            parsed,
            Some(Directive::SetField {
                field: "Story Points".to_string(),
                value: "3".to_string(),
                forced: false,
            })
        );
    }

    #[test]
    fn test_parse_directive_set_field_forced() {
        let parsed = parse_directive("# set-field: --forced \"Labels\" [\"triaged\"]");

        assert_eq!(
            parsed,
            Some(Directive::SetField {
                field: "Labels".to_string(),
                value: "[\"triaged\"]".to_string(),
                forced: true,
            })
        );
    }

    #[test]
    fn test_parse_directive_project_and_type() {
        assert_eq!(
            parse_directive("# set-project: NET"),
            Some(Directive::SetProject("NET".to_string()))
        );
        assert_eq!(
            parse_directive("# issue-type: Story"),
            Some(Directive::IssueType("Story".to_string()))
        );
    }

    #[test]
    fn test_parse_directive_ignores_hints_and_notes() {
        assert_eq!(parse_directive("## set-field: \"Foo\" value"), None);
        assert_eq!(parse_directive("# NOTE: nothing to see"), None);
        assert_eq!(parse_directive("plain text"), None);
    }

    #[test]
    fn test_template_assembly() {
        let directives = default_directives("NET", "Bug");
        let template = create_template("A summary", "A description", &directives);

        assert!(template.starts_with("A summary\n\nA description\n\n# set-project: NET\n"));
        assert!(template.contains("# issue-type: Bug\n"));
        assert!(template.contains("field to be quoted as \"Some Foo\"."));
    }

    #[test]
    fn test_append_field_directives() {
        let base = default_directives("NET", "Bug");
        let fields = vec![("Story Points".to_string(), "5".to_string())];
        let assignable = vec!["Severity".to_string()];

        let block = append_field_directives(&base, &fields, &assignable, true);

        assert!(block.contains("# Assignable fields below:\n"));
        assert!(block.contains("#\n# set-field: \"Story Points\" 5\n"));
        assert!(block.ends_with("## set-field: \"Severity\" value\n"));
    }
}
