//! Typed views of the tracker's REST payloads.
//!
//! The HTTP layer deserializes into these shapes; the helpers alongside them
//! are the pure parts of display and selection logic, so they can be tested
//! against JSON fixtures without a server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An issue as returned by the search and issue endpoints. `fields` stays a
/// raw map so custom fields keep their wire names.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Issue {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, Value>,
    #[serde(rename = "renderedFields", default, skip_serializing_if = "Option::is_none")]
    pub rendered_fields: Option<serde_json::Map<String, Value>>,
}

impl Issue {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Payload of the paged issue search endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(rename = "startAt", default)]
    pub start_at: Option<u64>,
    #[serde(rename = "maxResults", default)]
    pub max_results: Option<u64>,
}

/// A tracker account. Self-hosted instances key users by `name`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress", default)]
    pub email_address: Option<String>,
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<User: displayName='{}', name='{}'>",
            self.display_name.as_deref().unwrap_or(""),
            self.name.as_deref().unwrap_or("")
        )
    }
}

/// Group or role restriction on a comment.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CommentVisibility {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub value: String,
}

/// One comment on an issue.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<CommentVisibility>,
}

impl Comment {
    /// Visibility label for display; unrestricted comments read `all`.
    pub fn visibility_label(&self) -> String {
        self.visibility
            .as_ref()
            .map(|v| v.value.clone())
            .unwrap_or_else(|| "all".to_string())
    }

    pub fn author_display_name(&self) -> String {
        self.author
            .as_ref()
            .and_then(|a| a.display_name.clone())
            .unwrap_or_default()
    }

    pub fn author_account(&self) -> String {
        self.author
            .as_ref()
            .and_then(|a| a.name.clone())
            .unwrap_or_default()
    }
}

/// Payload of the issue comment listing endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A file attached to an issue.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Attachment {
    pub fn creator(&self) -> String {
        self.author
            .as_ref()
            .and_then(|a| a.display_name.clone())
            .unwrap_or_default()
    }
}

/// Category marker on a workflow status; `done` means terminal.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StatusCategory {
    pub key: String,
}

/// A workflow status known to the server.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Status {
    pub id: String,
    pub name: String,
    #[serde(rename = "statusCategory", default)]
    pub category: Option<StatusCategory>,
}

/// Names of every status whose category marks it as a final state.
pub fn terminal_state_names(statuses: &[Status]) -> Vec<String> {
    statuses
        .iter()
        .filter(|status| {
            status
                .category
                .as_ref()
                .map(|category| category.key == "done")
                .unwrap_or(false)
        })
        .map(|status| status.name.clone())
        .collect()
}

/// Looks a status up by id or name.
pub fn find_status<'a>(statuses: &'a [Status], id_or_name: &str) -> Option<&'a Status> {
    statuses
        .iter()
        .find(|status| status.id == id_or_name || status.name == id_or_name)
}

/// A state transition available on an issue.
#[derive(Debug, Deserialize, Clone)]
pub struct Transition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub to: Option<Status>,
}

/// Payload of the issue transitions endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// Names of the states an issue can move to.
pub fn transition_target_names(transitions: &[Transition]) -> Vec<String> {
    transitions
        .iter()
        .filter_map(|t| t.to.as_ref().map(|to| to.name.clone()))
        .collect()
}

/// Finds the transition matching a requested status, by id or name.
pub fn find_transition<'a>(transitions: &'a [Transition], status: &str) -> Option<&'a Transition> {
    transitions
        .iter()
        .find(|t| t.id == status || t.name.eq_ignore_ascii_case(status))
}

/// An agile board.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Board {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Paged listing from the agile board endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct BoardsResponse {
    #[serde(default)]
    pub values: Vec<Board>,
    #[serde(rename = "isLast", default)]
    pub is_last: Option<bool>,
}

/// A sprint on a board.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
}

impl Sprint {
    /// Start and end timestamps, with a zero placeholder when the server
    /// omits them.
    pub fn window(&self) -> (String, String) {
        let missing = "0000-00-00T00:00:00.000Z";
        (
            self.start_date.clone().unwrap_or_else(|| missing.to_string()),
            self.end_date.clone().unwrap_or_else(|| missing.to_string()),
        )
    }
}

/// Paged listing from the board sprints endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct SprintsResponse {
    #[serde(default)]
    pub values: Vec<Sprint>,
    #[serde(rename = "isLast", default)]
    pub is_last: Option<bool>,
}

/// A saved quickfilter on a board.
#[derive(Debug, Deserialize, Clone)]
pub struct Quickfilter {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuickfilterConfig {
    #[serde(rename = "quickFilters", default)]
    pub quick_filters: Vec<Quickfilter>,
}

/// The slice of the board edit model that carries quickfilters.
#[derive(Debug, Deserialize, Clone)]
pub struct RapidViewEditModel {
    #[serde(rename = "quickFilterConfig", default)]
    pub quick_filter_config: Option<QuickfilterConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilterRef {
    pub id: String,
}

/// The saved filter behind a board, with its query text.
#[derive(Debug, Deserialize, Clone)]
pub struct FilterDetails {
    #[serde(default)]
    pub jql: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatusRef {
    pub id: String,
}

/// One column of a board, naming the statuses it collects.
#[derive(Debug, Deserialize, Clone)]
pub struct BoardColumn {
    pub name: String,
    #[serde(default)]
    pub statuses: Vec<StatusRef>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ColumnConfig {
    #[serde(default)]
    pub columns: Vec<BoardColumn>,
}

/// Payload of the board configuration endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    #[serde(default)]
    pub filter: Option<FilterRef>,
    #[serde(rename = "columnConfig", default)]
    pub column_config: ColumnConfig,
}

/// Resolves a board's column layout against the server's status list. Status
/// references the server no longer knows are dropped.
pub fn column_statuses(config: &BoardConfig, statuses: &[Status]) -> Vec<(String, Vec<Status>)> {
    config
        .column_config
        .columns
        .iter()
        .map(|column| {
            let resolved = column
                .statuses
                .iter()
                .filter_map(|status| find_status(statuses, &status.id).cloned())
                .collect();
            (column.name.clone(), resolved)
        })
        .collect()
}

/// A typed link between two issues.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IssueLink {
    #[serde(rename = "type", default)]
    pub kind: Option<LinkType>,
    #[serde(rename = "outwardIssue", default)]
    pub outward_issue: Option<LinkedIssue>,
    #[serde(rename = "inwardIssue", default)]
    pub inward_issue: Option<LinkedIssue>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LinkedIssue {
    pub key: String,
}

/// A link relationship the server supports.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LinkType {
    pub name: String,
    #[serde(default)]
    pub inward: String,
    #[serde(default)]
    pub outward: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LinkTypesResponse {
    #[serde(rename = "issueLinkTypes", default)]
    pub issue_link_types: Vec<LinkType>,
}

/// A link from an issue to an external URL.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteLink {
    #[serde(default)]
    pub object: Option<RemoteLinkObject>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteLinkObject {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Column order for issue tables.
pub const ISSUE_COLUMNS: [&str; 6] = [
    "key",
    "project",
    "priority",
    "summary",
    "status",
    "assignee",
];

/// Column order for board tables.
pub const BOARD_COLUMNS: [&str; 2] = ["name", "type"];

fn field_path<'a>(issue: &'a Issue, path: &[&str]) -> Option<&'a Value> {
    let mut value = issue.fields.get(path[0])?;
    for step in &path[1..] {
        value = value.get(step)?;
    }
    Some(value)
}

fn path_cell(issue: &Issue, path: &[&str]) -> String {
    match field_path(issue, path) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => "--".to_string(),
        Some(other) => other.to_string(),
    }
}

/// One table row per issue; anything that fails to resolve renders as `--`.
pub fn issue_row(issue: &Issue) -> Vec<String> {
    vec![
        issue.key.clone(),
        path_cell(issue, &["project", "name"]),
        path_cell(issue, &["priority", "name"]),
        path_cell(issue, &["summary"]),
        path_cell(issue, &["status", "name"]),
        path_cell(issue, &["assignee", "name"]),
    ]
}

pub fn board_row(board: &Board) -> Vec<String> {
    vec![board.name.clone(), board.kind.clone()]
}

/// One card on a board, normalized from either the JQL search or the
/// quickfilter work endpoint (which reports a bare `statusId`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCard {
    pub key: String,
    pub summary: String,
    pub status_name: Option<String>,
    pub status_id: Option<String>,
    pub assignees: Vec<String>,
}

impl BoardCard {
    pub fn from_issue(issue: &Issue) -> Self {
        let status_name = field_path(issue, &["status", "name"])
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let status_id = field_path(issue, &["status", "id"])
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let summary = field_path(issue, &["summary"])
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let mut assignees = Vec::new();
        for step in ["name", "displayName"] {
            if let Some(who) = field_path(issue, &["assignee", step]).and_then(|v| v.as_str()) {
                assignees.push(who.to_string());
            }
        }

        Self {
            key: issue.key.clone(),
            summary,
            status_name,
            status_id,
            assignees,
        }
    }

    /// Normalizes one entry of the quickfilter work payload, which carries
    /// the card's fields at the top level and a bare `statusId`.
    pub fn from_work_item(item: &Value) -> Option<Self> {
        let key = item.get("key")?.as_str()?.to_string();
        let summary = item
            .get("summary")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let status_id = match item.get("statusId") {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        let mut assignees = Vec::new();
        for step in ["assignee", "assigneeName"] {
            if let Some(who) = item.get(step).and_then(|v| v.as_str()) {
                assignees.push(who.to_string());
            }
        }

        Some(Self {
            key,
            summary,
            status_name: None,
            status_id,
            assignees,
        })
    }

    /// Whether this card belongs in a column collecting the given statuses.
    pub fn in_column(&self, column: &[Status]) -> bool {
        column.iter().any(|status| {
            self.status_name.as_deref() == Some(status.name.as_str())
                || self.status_id.as_deref() == Some(status.id.as_str())
        })
    }

    pub fn assigned_to(&self, assignee: &str) -> bool {
        self.assignees
            .iter()
            .any(|who| who.eq_ignore_ascii_case(assignee))
    }
}

/// Default lead-in for quoted comment replies.
pub const REPLY_HEADER_TEMPLATE: &str = "On {{date}}, {{author_name}} writes:";

/// Renders the reply lead-in from a template. `{{date}}` takes the comment's
/// last-updated timestamp; a trailing newline is guaranteed.
pub fn in_reply_to_header(template: &str, comment: &Comment) -> String {
    let mut header = template
        .replace("{{date}}", &comment.updated)
        .replace("{{author_name}}", &comment.author_display_name())
        .replace("{{author_id}}", &comment.author_account())
        .replace("{{comment_id}}", &comment.id);

    if !header.ends_with('\n') {
        header.push('\n');
    }
    header
}

/// The editor seed for a reply: the lead-in followed by the comment body
/// quoted one `> ` line at a time.
pub fn quoted_reply_seed(template: &str, comment: &Comment) -> String {
    let mut seed = in_reply_to_header(template, comment);
    for line in comment.body.split('\n') {
        seed.push_str("> ");
        seed.push_str(line.trim());
        seed.push('\n');
    }
    seed
}

/// JSON document for machine consumption: issue count, raw issues, and the
/// custom-field name map.
pub fn issues_json_payload(
    issues: &[Issue],
    field_maps: &Value,
) -> Result<String, serde_json::Error> {
    let mut rendered = Vec::with_capacity(issues.len());
    for issue in issues {
        rendered.push(serde_json::to_string(issue)?);
    }
    Ok(format!(
        "{{\"issues_count\":{},\n\"issues\":[{}],\n\"field_maps\":{}\n}}",
        issues.len(),
        rendered.join(","),
        field_maps
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_issue() -> Issue {
        serde_json::from_value(json!({
            "id": "184512",
            "key": "NET-4312",
            "fields": {
                "summary": "Retry loop hammers the backend",
                "project": {"key": "NET", "name": "Networking"},
                "priority": {"name": "High"},
                "status": {"id": "3", "name": "In Progress",
                           "statusCategory": {"key": "indeterminate"}},
                "assignee": {"name": "oncall@example.com",
                             "displayName": "On-Call Rotation"}
            }
        }))
        .unwrap()
    }

    fn bare_issue() -> Issue {
        serde_json::from_value(json!({
            "id": "184513",
            "key": "NET-4313",
            "fields": {
                "summary": "Follow-up",
                "status": {"id": "1", "name": "Open"},
                "assignee": null
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_issue_row_extracts_columns() {
        let row = issue_row(&sample_issue());

        assert_eq!(
            row,
            vec![
                "NET-4312",
                "Networking",
                "High",
                "Retry loop hammers the backend",
                "In Progress",
                "oncall@example.com"
            ]
        );
    }

    #[test]
    fn test_issue_row_marks_unresolved_fields() {
        let row = issue_row(&bare_issue());

        assert_eq!(row[1], "--");
        assert_eq!(row[2], "--");
        assert_eq!(row[5], "--");
    }

    #[test]
    fn test_search_response_round_trips_raw_fields() {
        let issue = sample_issue();
        let reparsed: Issue =
            serde_json::from_str(&serde_json::to_string(&issue).unwrap()).unwrap();

        assert_eq!(reparsed.key, "NET-4312");
        assert_eq!(
            reparsed.field("project").and_then(|p| p.get("name")),
            Some(&json!("Networking"))
        );
    }

    #[test]
    fn test_terminal_state_names() {
        let statuses: Vec<Status> = serde_json::from_value(json!([
            {"id": "1", "name": "Open", "statusCategory": {"key": "new"}},
            {"id": "3", "name": "In Progress", "statusCategory": {"key": "indeterminate"}},
            {"id": "6", "name": "Closed", "statusCategory": {"key": "done"}},
            {"id": "10001", "name": "Done", "statusCategory": {"key": "done"}},
            {"id": "9000", "name": "Unsorted"}
        ]))
        .unwrap();

        assert_eq!(terminal_state_names(&statuses), vec!["Closed", "Done"]);
    }

    #[test]
    fn test_find_status_by_id_or_name() {
        let statuses = vec![
            Status {
                id: "3".to_string(),
                name: "In Progress".to_string(),
                category: None,
            },
            Status {
                id: "6".to_string(),
                name: "Closed".to_string(),
                category: None,
            },
        ];

        assert_eq!(find_status(&statuses, "6").map(|s| s.name.as_str()), Some("Closed"));
        assert_eq!(find_status(&statuses, "In Progress").map(|s| s.id.as_str()), Some("3"));
        assert!(find_status(&statuses, "Resolved").is_none());
    }

    #[test]
    fn test_transition_targets_and_lookup() {
        let response: TransitionsResponse = serde_json::from_value(json!({
            "transitions": [
                {"id": "11", "name": "Start Progress",
                 "to": {"id": "3", "name": "In Progress"}},
                {"id": "21", "name": "Close",
                 "to": {"id": "6", "name": "Closed"}}
            ]
        }))
        .unwrap();

        assert_eq!(
            transition_target_names(&response.transitions),
            vec!["In Progress", "Closed"]
        );
        assert_eq!(
            find_transition(&response.transitions, "close").map(|t| t.id.as_str()),
            Some("21")
        );
        assert_eq!(
            find_transition(&response.transitions, "11").map(|t| t.name.as_str()),
            Some("Start Progress")
        );
    }

    #[test]
    fn test_sprint_window_placeholders() {
        let sprint: Sprint = serde_json::from_value(json!({
            "id": 88, "name": "Iteration 9", "state": "future"
        }))
        .unwrap();

        let (start, end) = sprint.window();
        assert_eq!(start, "0000-00-00T00:00:00.000Z");
        assert_eq!(end, "0000-00-00T00:00:00.000Z");

        let sprint: Sprint = serde_json::from_value(json!({
            "id": 87, "name": "Iteration 8", "state": "active",
            "startDate": "2024-03-04T09:00:00.000Z",
            "endDate": "2024-03-18T17:00:00.000Z"
        }))
        .unwrap();

        let (start, end) = sprint.window();
        assert_eq!(start, "2024-03-04T09:00:00.000Z");
        assert_eq!(end, "2024-03-18T17:00:00.000Z");
    }

    #[test]
    fn test_quickfilter_config_parses_edit_model() {
        let model: RapidViewEditModel = serde_json::from_value(json!({
            "quickFilterConfig": {
                "quickFilters": [
                    {"id": 41, "name": "Mine", "query": "assignee = currentUser()"}
                ]
            },
            "otherConfig": {"ignored": true}
        }))
        .unwrap();

        let filters = model.quick_filter_config.unwrap().quick_filters;
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].name, "Mine");
        assert_eq!(filters[0].query, "assignee = currentUser()");
    }

    #[test]
    fn test_board_config_columns() {
        let config: BoardConfig = serde_json::from_value(json!({
            "filter": {"id": "10400"},
            "columnConfig": {
                "columns": [
                    {"name": "To Do", "statuses": [{"id": "1"}]},
                    {"name": "In Progress", "statuses": [{"id": "3"}]},
                    {"name": "Done", "statuses": [{"id": "6"}, {"id": "10001"}]}
                ]
            }
        }))
        .unwrap();

        assert_eq!(config.filter.unwrap().id, "10400");
        let columns = config.column_config.columns;
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[2].statuses.len(), 2);
    }

    #[test]
    fn test_column_statuses_resolves_ids() {
        let config: BoardConfig = serde_json::from_value(json!({
            "columnConfig": {
                "columns": [
                    {"name": "To Do", "statuses": [{"id": "1"}, {"id": "404"}]},
                    {"name": "Done", "statuses": [{"id": "6"}]}
                ]
            }
        }))
        .unwrap();
        let statuses: Vec<Status> = serde_json::from_value(json!([
            {"id": "1", "name": "Open"},
            {"id": "6", "name": "Closed"}
        ]))
        .unwrap();

        let columns = column_statuses(&config, &statuses);

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].0, "To Do");
        assert_eq!(columns[0].1.len(), 1);
        assert_eq!(columns[0].1[0].name, "Open");
        assert_eq!(columns[1].1[0].name, "Closed");
    }

    #[test]
    fn test_board_card_from_work_item() {
        let card = BoardCard::from_work_item(&json!({
            "key": "NET-77",
            "summary": "Quickfiltered card",
            "statusId": 3,
            "assignee": "oncall@example.com",
            "assigneeName": "On-Call Rotation"
        }))
        .unwrap();

        assert_eq!(card.key, "NET-77");
        assert_eq!(card.status_id.as_deref(), Some("3"));
        assert!(card.assigned_to("On-Call Rotation"));

        assert!(BoardCard::from_work_item(&json!({"summary": "keyless"})).is_none());
    }

    #[test]
    fn test_board_card_column_membership() {
        let card = BoardCard::from_issue(&sample_issue());
        let column = vec![Status {
            id: "3".to_string(),
            name: "In Progress".to_string(),
            category: None,
        }];
        let other = vec![Status {
            id: "6".to_string(),
            name: "Closed".to_string(),
            category: None,
        }];

        assert!(card.in_column(&column));
        assert!(!card.in_column(&other));

        let by_id = BoardCard {
            key: "NET-9".to_string(),
            summary: String::new(),
            status_name: None,
            status_id: Some("3".to_string()),
            assignees: vec![],
        };
        assert!(by_id.in_column(&column));
    }

    #[test]
    fn test_board_card_assignee_matching() {
        let card = BoardCard::from_issue(&sample_issue());

        assert!(card.assigned_to("oncall@example.com"));
        assert!(card.assigned_to("ON-CALL ROTATION"));
        assert!(!card.assigned_to("someone-else"));
    }

    fn sample_comment() -> Comment {
        serde_json::from_value(json!({
            "id": "10452",
            "body": "The retry timer never backs off.\n\nLogs attached.",
            "created": "2024-03-05T10:11:12.000+0000",
            "updated": "2024-03-06T08:00:00.000+0000",
            "author": {"name": "oncall@example.com", "displayName": "On-Call Rotation"}
        }))
        .unwrap()
    }

    #[test]
    fn test_reply_header_substitutions() {
        let header = in_reply_to_header(REPLY_HEADER_TEMPLATE, &sample_comment());

        assert_eq!(
            header,
            "On 2024-03-06T08:00:00.000+0000, On-Call Rotation writes:\n"
        );
    }

    #[test]
    fn test_reply_header_custom_template() {
        let header = in_reply_to_header(
            "{{author_id}} said in comment {{comment_id}}:",
            &sample_comment(),
        );

        assert_eq!(header, "oncall@example.com said in comment 10452:\n");
    }

    #[test]
    fn test_quoted_reply_seed() {
        let seed = quoted_reply_seed(REPLY_HEADER_TEMPLATE, &sample_comment());

        assert_eq!(
            seed,
            "On 2024-03-06T08:00:00.000+0000, On-Call Rotation writes:\n\
             > The retry timer never backs off.\n\
             > \n\
             > Logs attached.\n"
        );
    }

    #[test]
    fn test_comment_visibility_label() {
        let restricted: Comment = serde_json::from_value(json!({
            "id": "7", "body": "internal", "created": "", "updated": "",
            "visibility": {"type": "group", "value": "staff"}
        }))
        .unwrap();

        assert_eq!(restricted.visibility_label(), "staff");
        assert_eq!(sample_comment().visibility_label(), "all");
    }

    #[test]
    fn test_issues_json_payload_shape() {
        let issues = vec![bare_issue()];
        let field_maps = json!({"customfield_10012": "Story Points"});

        let payload = issues_json_payload(&issues, &field_maps).unwrap();

        assert!(payload.starts_with("{\"issues_count\":1,\n\"issues\":["));
        assert!(payload.ends_with("}"));
        assert!(payload.contains("\"field_maps\":{\"customfield_10012\":\"Story Points\"}"));

        let parsed: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed["issues_count"], json!(1));
        assert_eq!(parsed["issues"][0]["key"], json!("NET-4313"));
    }

    #[test]
    fn test_attachment_creator() {
        let attachment: Attachment = serde_json::from_value(json!({
            "id": "3001",
            "filename": "retry-trace.log",
            "created": "2024-03-05T10:12:00.000+0000",
            "size": 5120,
            "author": {"name": "oncall@example.com", "displayName": "On-Call Rotation"}
        }))
        .unwrap();

        assert_eq!(attachment.creator(), "On-Call Rotation");
        assert_eq!(attachment.size, 5120);
    }
}
