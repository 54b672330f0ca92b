//! JQL query assembly.
//!
//! Search commands collect their criteria into an [`IssueCriteria`] and the
//! functions here render it as a JQL string. Nothing in this module talks to
//! the service; resolving `me` to an account name and fetching the terminal
//! state list both happen in the caller.

use crate::fields::{resolve_field_id, FieldInfo};

/// Error type for query assembly.
#[derive(Debug)]
pub enum JqlError {
    InvalidOrder(String),
}

impl std::fmt::Display for JqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JqlError::InvalidOrder(order) => write!(f, "Invalid order string '{}'", order),
        }
    }
}

impl std::error::Error for JqlError {}

/// One `field <operator> value` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FieldMatch {
    pub fn new(field: &str, operator: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        }
    }

    pub fn equals(field: &str, value: &str) -> Self {
        Self::new(field, "=", value)
    }
}

/// Criteria for an issue search.
#[derive(Debug, Clone, Default)]
pub struct IssueCriteria {
    /// Already-resolved assignee name; `None` leaves assignee unconstrained.
    pub assignee: Option<String>,
    pub project: Option<String>,
    /// When false, a `status not in (...)` clause excludes terminal states.
    pub include_closed: bool,
    pub matchers: Vec<FieldMatch>,
    pub order_by: Option<String>,
}

fn order_clause(order: &str) -> Result<String, JqlError> {
    let order = if order.is_empty() { "none" } else { order };

    let aliases = [
        ("none", ""),
        ("prio-asc", "priority asc"),
        ("prio-desc", "priority desc"),
    ];
    for (alias, clause) in aliases {
        if alias == order {
            return Ok(clause.to_string());
        }
    }

    if !order.contains('-') && !order.contains(' ') {
        return Err(JqlError::InvalidOrder(order.to_string()));
    }
    if order.contains(' ') {
        return Ok(order.to_string());
    }

    let parts: Vec<&str> = order.split('-').collect();
    Ok(format!("{} {}", parts[0], parts[1]))
}

/// Renders an ordering selector (`prio-asc`, `created-desc`, `created desc`,
/// or a full `ORDER BY ...` clause) as the suffix to append to a query.
/// The rendered suffix carries its own leading space; `none` renders empty.
pub fn order_by_from_string(order: &str) -> Result<String, JqlError> {
    let clause = order_clause(order)?;
    if clause.is_empty() {
        return Ok(String::new());
    }
    if clause.contains("ORDER BY") {
        Ok(format!(" {}", clause))
    } else {
        Ok(format!(" ORDER BY {}", clause))
    }
}

/// Renders the JQL for an issue search.
///
/// Assignee and project are quoted; matcher values are passed through
/// verbatim so callers can express operators like `~` or `in (...)`.
/// Matcher field names resolve through the custom-field catalog.
pub fn build_issues_query(
    criteria: &IssueCriteria,
    terminal_states: &[String],
    catalog: &[FieldInfo],
) -> Result<String, JqlError> {
    let mut parts = Vec::new();

    if let Some(assignee) = &criteria.assignee {
        parts.push(format!("assignee = \"{}\"", assignee));
    }
    if let Some(project) = &criteria.project {
        parts.push(format!("project = \"{}\"", project));
    }
    if !criteria.include_closed {
        let quoted: Vec<String> = terminal_states
            .iter()
            .map(|state| format!("\"{}\"", state))
            .collect();
        parts.push(format!("status not in ({})", quoted.join(",")));
    }
    for matcher in &criteria.matchers {
        let field = resolve_field_id(catalog, &matcher.field);
        parts.push(format!("{} {} {}", field, matcher.operator, matcher.value));
    }

    let order = match &criteria.order_by {
        Some(order) => order_by_from_string(order)?,
        None => String::new(),
    };

    Ok(format!("{}{}", parts.join(" AND "), order))
}

/// Query for the issues of one named sprint, narrowed by the board's saved
/// filter when the board has one.
pub fn sprint_issues_query(sprint_name: &str, base_filter: &str) -> String {
    if base_filter.is_empty() {
        format!("sprint = \"{}\"", sprint_name)
    } else {
        format!("sprint = \"{}\" and {}", sprint_name, base_filter)
    }
}

/// Query for the backlog of a board: the board's saved filter, restricted to
/// non-terminal states unless the filter already constrains status. An
/// `ORDER BY` suffix in the filter stays outside the added parentheses.
pub fn board_issues_query(filter_jql: &str, terminal_states: &[String]) -> String {
    let quoted: Vec<String> = terminal_states
        .iter()
        .map(|state| format!("\"{}\"", state))
        .collect();

    if filter_jql.is_empty() {
        return format!("status not in ({})", quoted.join(","));
    }
    if filter_jql.contains("status") {
        return filter_jql.to_string();
    }

    let spliced = if filter_jql.to_lowercase().contains(" order ") {
        crate::text::ireplace("order", ") order", filter_jql)
    } else {
        format!("{})", filter_jql)
    };
    format!("status not in ({}) AND ({}", quoted.join(","), spliced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldSchema;

    fn catalog() -> Vec<FieldInfo> {
        vec![FieldInfo {
            id: "customfield_10012".to_string(),
            name: "Story Points".to_string(),
            custom: true,
            schema: Some(FieldSchema {
                kind: "number".to_string(),
            }),
        }]
    }

    fn terminal() -> Vec<String> {
        vec!["Closed".to_string(), "Done".to_string()]
    }

    #[test]
    fn test_order_by_aliases() {
        assert_eq!(order_by_from_string("").unwrap(), "");
        assert_eq!(order_by_from_string("none").unwrap(), "");
        assert_eq!(order_by_from_string("prio-asc").unwrap(), " ORDER BY priority asc");
        assert_eq!(order_by_from_string("prio-desc").unwrap(), " ORDER BY priority desc");
    }

    #[test]
    fn test_order_by_custom_fields() {
        assert_eq!(order_by_from_string("created-desc").unwrap(), " ORDER BY created desc");
        assert_eq!(order_by_from_string("created desc").unwrap(), " ORDER BY created desc");
        assert_eq!(
            order_by_from_string("ORDER BY created desc").unwrap(),
            " ORDER BY created desc"
        );
    }

    #[test]
    fn test_order_by_rejects_bare_words() {
        assert!(order_by_from_string("created").is_err());
    }

    #[test]
    fn test_default_query_excludes_terminal_states() {
        let criteria = IssueCriteria {
            assignee: Some("dev@example.com".to_string()),
            ..Default::default()
        };

        let jql = build_issues_query(&criteria, &terminal(), &catalog()).unwrap();

        assert_eq!(
            jql,
            "assignee = \"dev@example.com\" AND status not in (\"Closed\",\"Done\")"
        );
    }

    #[test]
    fn test_closed_query_drops_status_clause() {
        let criteria = IssueCriteria {
            project: Some("NET".to_string()),
            include_closed: true,
            ..Default::default()
        };

        let jql = build_issues_query(&criteria, &terminal(), &catalog()).unwrap();

        assert_eq!(jql, "project = \"NET\"");
    }

    #[test]
    fn test_matchers_resolve_custom_fields() {
        let criteria = IssueCriteria {
            include_closed: true,
            matchers: vec![
                FieldMatch::new("Story Points", ">", "3"),
                FieldMatch::equals("status", "Open"),
            ],
            ..Default::default()
        };

        let jql = build_issues_query(&criteria, &terminal(), &catalog()).unwrap();

        assert_eq!(jql, "customfield_10012 > 3 AND status = Open");
    }

    #[test]
    fn test_query_with_ordering() {
        let criteria = IssueCriteria {
            assignee: Some("dev@example.com".to_string()),
            include_closed: true,
            order_by: Some("prio-desc".to_string()),
            ..Default::default()
        };

        let jql = build_issues_query(&criteria, &terminal(), &catalog()).unwrap();

        assert_eq!(
            jql,
            "assignee = \"dev@example.com\" ORDER BY priority desc"
        );
    }

    #[test]
    fn test_sprint_issues_query() {
        assert_eq!(sprint_issues_query("Iteration 9", ""), "sprint = \"Iteration 9\"");
        assert_eq!(
            sprint_issues_query("Iteration 9", "project = \"NET\""),
            "sprint = \"Iteration 9\" and project = \"NET\""
        );
    }

    #[test]
    fn test_board_issues_query_wraps_filter() {
        assert_eq!(
            board_issues_query("project = NET", &terminal()),
            "status not in (\"Closed\",\"Done\") AND (project = NET)"
        );
    }

    #[test]
    fn test_board_issues_query_keeps_ordering_outside() {
        assert_eq!(
            board_issues_query("project = NET ORDER BY Rank ASC", &terminal()),
            "status not in (\"Closed\",\"Done\") AND (project = NET ) order BY Rank ASC"
        );
    }

    #[test]
    fn test_board_issues_query_defers_to_status_filters() {
        assert_eq!(
            board_issues_query("status = Open", &terminal()),
            "status = Open"
        );
        assert_eq!(
            board_issues_query("", &terminal()),
            "status not in (\"Closed\",\"Done\")"
        );
    }
}
