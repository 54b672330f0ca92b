//! Authenticated HTTP client for the Jira REST surface.
//!
//! One [`JiraClient`] is built per command invocation from the yaml config.
//! Every call goes through the rate limiter, and responses are checked with
//! a shared helper so failures surface as `context [status]: body` errors
//! instead of panics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use base64::Engine;
use log::{debug, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::{Auth, Config};
use crate::prelude::*;
use jtools_core::fields::FieldInfo;
use jtools_core::tracker::{
    Board, BoardConfig, BoardsResponse, Comment, CommentsResponse, FilterDetails, Issue, LinkType,
    LinkTypesResponse, Quickfilter, RapidViewEditModel, RemoteLink, SearchResponse, Sprint,
    SprintsResponse, Status, Transition, TransitionsResponse, User,
};

/// Key of a freshly created issue.
#[derive(Debug, Deserialize)]
pub struct CreatedIssue {
    pub key: String,
}

pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    auth_header: String,
    call_interval: u64,
    wait_time: u64,
    eausm: AtomicBool,
    last_call: Mutex<Option<Instant>>,
}

/// Check that an HTTP response was successful, returning a descriptive error otherwise.
async fn check_response(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(eyre!("{context} [{status}]: {body}"))
}

fn auth_header_value(auth: &Auth) -> String {
    match auth {
        Auth::Api {
            token, pat: true, ..
        } => f!("Bearer {}", token),
        Auth::Api {
            username,
            token,
            pat: false,
        } => {
            let encoded =
                base64::engine::general_purpose::STANDARD.encode(f!("{}:{}", username, token));
            f!("Basic {}", encoded)
        }
        Auth::Basic { username, password } => {
            let encoded =
                base64::engine::general_purpose::STANDARD.encode(f!("{}:{}", username, password));
            f!("Basic {}", encoded)
        }
    }
}

/// Issue lookups by numeric id skip the field selector; key lookups ask for
/// everything so comments and attachments come along.
fn issue_path(identifier: &str) -> String {
    if !identifier.is_empty() && identifier.chars().all(|c| c.is_ascii_digit()) {
        f!("/rest/api/2/issue/{}", identifier)
    } else {
        f!("/rest/api/2/issue/{}?fields=*all", urlencoding::encode(identifier))
    }
}

fn mime_from_extension(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "json" => "application/json",
        "csv" => "text/csv",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        _ => "application/octet-stream",
    }
}

impl JiraClient {
    /// Builds an authenticated client from the config. No network traffic
    /// happens here; `myself()` is the usual connectivity probe.
    pub fn login(config: &Config) -> Result<Self> {
        use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

        let base_url = config.server()?.trim_end_matches('/').to_string();
        let auth_header = auth_header_value(&config.auth()?);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_header).map_err(|e| eyre!("Invalid auth header: {e}"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            http,
            base_url,
            auth_header,
            call_interval: config.call_interval(),
            wait_time: config.wait_time(),
            eausm: AtomicBool::new(config.eausm_enabled()),
            last_call: Mutex::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn issue_url(&self, issue_key: &str) -> String {
        f!("{}/browse/{}", self.base_url, issue_key)
    }

    fn url(&self, path: &str) -> String {
        f!("{}{}", self.base_url, path)
    }

    /// Sleeps when a call lands inside the configured interval since the
    /// last one. An interval of 0 disables the limiter.
    async fn ratelimit(&self) {
        if self.call_interval == 0 {
            return;
        }
        let mut last = self.last_call.lock().await;
        if let Some(at) = *last {
            if at.elapsed() < Duration::from_millis(self.call_interval) {
                tokio::time::sleep(Duration::from_millis(self.wait_time)).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, context: &str) -> Result<T> {
        self.ratelimit().await;
        let url = self.url(path);
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| eyre!("{context}: {e}"))?;
        let response = check_response(response, context).await?;

        response
            .json()
            .await
            .map_err(|e| eyre!("{context}: bad response: {e}"))
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        payload: &Value,
        context: &str,
    ) -> Result<reqwest::Response> {
        self.ratelimit().await;
        let url = self.url(path);
        debug!("{method} {url}");

        let response = self
            .http
            .request(method, &url)
            .json(payload)
            .send()
            .await
            .map_err(|e| eyre!("{context}: {e}"))?;
        check_response(response, context).await
    }

    async fn delete(&self, path: &str, context: &str) -> Result<()> {
        self.ratelimit().await;
        let url = self.url(path);
        debug!("DELETE {url}");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| eyre!("{context}: {e}"))?;
        check_response(response, context).await?;
        Ok(())
    }

    // --- Accounts and server introspection ---

    pub async fn myself(&self) -> Result<User> {
        self.get_json("/rest/api/2/myself", "Failed to fetch the logged-in user")
            .await
    }

    pub async fn server_info(&self) -> Result<Value> {
        self.get_json("/rest/api/2/serverInfo", "Failed to fetch server info")
            .await
    }

    pub async fn groups(&self) -> Result<Value> {
        self.get_json("/rest/api/2/groups/picker", "Failed to fetch groups")
            .await
    }

    pub async fn components(&self, project: &str) -> Result<Value> {
        let path = f!(
            "/rest/api/2/project/{}/components",
            urlencoding::encode(project)
        );
        self.get_json(&path, "Failed to fetch components").await
    }

    pub async fn project_versions(&self, project: &str) -> Result<Value> {
        let path = f!(
            "/rest/api/2/project/{}/versions",
            urlencoding::encode(project)
        );
        self.get_json(&path, "Failed to fetch project versions").await
    }

    pub async fn statuses(&self) -> Result<Vec<Status>> {
        self.get_json("/rest/api/2/status", "Failed to fetch statuses")
            .await
    }

    /// The field catalog: system and custom fields with their schemas.
    pub async fn fields(&self) -> Result<Vec<FieldInfo>> {
        self.get_json("/rest/api/2/field", "Failed to fetch the field catalog")
            .await
    }

    pub async fn link_types(&self) -> Result<Vec<LinkType>> {
        let response: LinkTypesResponse = self
            .get_json("/rest/api/2/issueLinkType", "Failed to fetch link types")
            .await?;
        Ok(response.issue_link_types)
    }

    pub async fn user_search(&self, query: &str) -> Result<Vec<User>> {
        const MAX_RESULTS: usize = 50;

        let mut users: Vec<User> = Vec::new();
        let mut start_at = 0;
        loop {
            let path = f!(
                "/rest/api/2/user/search?query={}&startAt={}&maxResults={}",
                urlencoding::encode(query),
                start_at,
                MAX_RESULTS
            );
            let page: Vec<User> = self.get_json(&path, "Failed to search users").await?;
            let count = page.len();
            users.extend(page);
            if count < MAX_RESULTS {
                break;
            }
            start_at += MAX_RESULTS;
        }
        Ok(users)
    }

    /// Direct lookup for accounts the search endpoint does not index.
    pub async fn user_by_key(&self, key: &str) -> Result<User> {
        let path = f!("/rest/api/2/user?key={}", urlencoding::encode(key));
        self.get_json(&path, "Failed to fetch the user").await
    }

    // --- Issues ---

    pub async fn search_issues(
        &self,
        jql: &str,
        start_at: u64,
        max_results: u64,
    ) -> Result<Vec<Issue>> {
        let path = f!(
            "/rest/api/2/search?jql={}&startAt={}&maxResults={}",
            urlencoding::encode(jql),
            start_at,
            max_results
        );
        let response: SearchResponse = self.get_json(&path, "Jira search error").await?;
        Ok(response.issues)
    }

    /// Fetches one issue by key or numeric id. When the planning-poker
    /// extension answers, its votes are merged in as an `eausm` field; the
    /// first failure turns the extension off for the rest of the run.
    pub async fn get_issue(&self, identifier: &str) -> Result<Issue> {
        let mut issue: Issue = self
            .get_json(
                &issue_path(identifier),
                &f!("Failed to fetch issue {}", identifier),
            )
            .await?;

        if self.eausm.load(Ordering::Relaxed) {
            let path = f!("/rest/eausm/latest/planningPoker/{}", issue.id);
            match self.get_json::<Value>(&path, "Failed to fetch planning poker votes").await {
                Ok(poker) => {
                    issue.fields.insert("eausm".to_string(), poker);
                }
                Err(err) => {
                    debug!("Planning poker extension unavailable: {err}");
                    self.eausm.store(false, Ordering::Relaxed);
                }
            }
        }

        Ok(issue)
    }

    pub async fn planning_poker_vote(&self, issue_id: &str, vote: i64) -> Result<()> {
        let payload = serde_json::json!({ "issueId": issue_id, "vote": vote });
        self.send_json(
            reqwest::Method::PUT,
            "/rest/eausm/latest/planningPoker/vote",
            &payload,
            "Failed to cast vote",
        )
        .await?;
        Ok(())
    }

    pub async fn create_issue(&self, fields: &Value) -> Result<CreatedIssue> {
        let payload = serde_json::json!({ "fields": fields });
        let response = self
            .send_json(
                reqwest::Method::POST,
                "/rest/api/2/issue",
                &payload,
                "Failed to create issue",
            )
            .await?;
        response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse create response: {e}"))
    }

    pub async fn update_issue_fields(&self, issue_key: &str, fields: &Value) -> Result<()> {
        let payload = serde_json::json!({ "fields": fields });
        self.send_json(
            reqwest::Method::PUT,
            &f!("/rest/api/2/issue/{}", issue_key),
            &payload,
            &f!("Failed to update {}", issue_key),
        )
        .await?;
        Ok(())
    }

    /// Edit metadata for an issue, including per-field allowed values.
    pub async fn editmeta(&self, issue_key: &str) -> Result<Value> {
        self.get_json(
            &f!("/rest/api/2/issue/{}/editmeta", issue_key),
            "Failed to fetch edit metadata",
        )
        .await
    }

    /// Names of the fields that can be set when creating an issue of the
    /// given type in the given project.
    pub async fn createmeta_field_names(
        &self,
        project: &str,
        issue_type: &str,
    ) -> Result<Vec<String>> {
        let path = f!(
            "/rest/api/2/issue/createmeta?projectKeys={}&issuetypeNames={}&expand=projects.issuetypes.fields",
            urlencoding::encode(project),
            urlencoding::encode(issue_type)
        );
        let meta: Value = self.get_json(&path, "Failed to fetch create metadata").await?;

        let mut names = Vec::new();
        if let Some(fields) = meta
            .pointer("/projects/0/issuetypes/0/fields")
            .and_then(|v| v.as_object())
        {
            for field in fields.values() {
                if let Some(name) = field.get("name").and_then(|v| v.as_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    // --- Transitions ---

    pub async fn transitions(&self, issue_key: &str) -> Result<Vec<Transition>> {
        let response: TransitionsResponse = self
            .get_json(
                &f!("/rest/api/2/issue/{}/transitions", issue_key),
                "Failed to fetch transitions",
            )
            .await?;
        Ok(response.transitions)
    }

    pub async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<()> {
        let payload = serde_json::json!({ "transition": { "id": transition_id } });
        self.send_json(
            reqwest::Method::POST,
            &f!("/rest/api/2/issue/{}/transitions", issue_key),
            &payload,
            &f!("Failed to transition {}", issue_key),
        )
        .await?;
        Ok(())
    }

    // --- Comments ---

    pub async fn comments(&self, issue_key: &str) -> Result<Vec<Comment>> {
        let response: CommentsResponse = self
            .get_json(
                &f!("/rest/api/2/issue/{}/comment", issue_key),
                "Failed to fetch comments",
            )
            .await?;
        Ok(response.comments)
    }

    /// Looks up a comment by id, or the most recent one for `last`.
    /// A missing comment is `None`; other failures are errors.
    pub async fn find_comment(
        &self,
        issue_key: &str,
        comment_id: &str,
    ) -> Result<Option<Comment>> {
        if comment_id == "last" {
            return Ok(self.comments(issue_key).await?.into_iter().last());
        }

        self.ratelimit().await;
        let url = self.url(&f!("/rest/api/2/issue/{}/comment/{}", issue_key, comment_id));
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| eyre!("Failed to fetch comment: {e}"))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_response(response, "Failed to fetch comment").await?;
        let comment = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse comment: {e}"))?;
        Ok(Some(comment))
    }

    pub async fn get_comment(&self, issue_key: &str, comment_id: &str) -> Result<Comment> {
        self.find_comment(issue_key, comment_id)
            .await?
            .ok_or_else(|| eyre!("Comment {} for issue {} not found", comment_id, issue_key))
    }

    /// Adds a comment; a visibility other than `all` restricts it to that
    /// group.
    pub async fn add_comment(
        &self,
        issue_key: &str,
        body: &str,
        visibility: &str,
    ) -> Result<()> {
        let mut payload = serde_json::json!({ "body": body });
        if visibility != "all" {
            payload["visibility"] = serde_json::json!({ "type": "group", "value": visibility });
        }
        self.send_json(
            reqwest::Method::POST,
            &f!("/rest/api/2/issue/{}/comment", issue_key),
            &payload,
            "Failed to add comment",
        )
        .await?;
        Ok(())
    }

    pub async fn update_comment(
        &self,
        issue_key: &str,
        comment_id: &str,
        update: &Value,
    ) -> Result<()> {
        self.send_json(
            reqwest::Method::PUT,
            &f!("/rest/api/2/issue/{}/comment/{}", issue_key, comment_id),
            update,
            "Failed to update comment",
        )
        .await?;
        Ok(())
    }

    pub async fn delete_comment(&self, issue_key: &str, comment_id: &str) -> Result<()> {
        self.delete(
            &f!("/rest/api/2/issue/{}/comment/{}", issue_key, comment_id),
            "Failed to delete comment",
        )
        .await
    }

    // --- Watchers ---

    pub async fn add_watcher(&self, issue_key: &str, watcher: &str) -> Result<()> {
        self.send_json(
            reqwest::Method::POST,
            &f!("/rest/api/2/issue/{}/watchers", issue_key),
            &Value::String(watcher.to_string()),
            "Failed to add watcher",
        )
        .await?;
        Ok(())
    }

    pub async fn remove_watcher(&self, issue_key: &str, watcher: &str) -> Result<()> {
        self.delete(
            &f!(
                "/rest/api/2/issue/{}/watchers?username={}",
                issue_key,
                urlencoding::encode(watcher)
            ),
            "Failed to remove watcher",
        )
        .await
    }

    // --- Links ---

    pub async fn remote_links(&self, issue_key: &str) -> Result<Vec<RemoteLink>> {
        self.get_json(
            &f!("/rest/api/2/issue/{}/remotelink", issue_key),
            "Failed to fetch remote links",
        )
        .await
    }

    pub async fn add_remote_link(&self, issue_key: &str, url: &str, title: &str) -> Result<()> {
        let payload = serde_json::json!({ "object": { "url": url, "title": title } });
        self.send_json(
            reqwest::Method::POST,
            &f!("/rest/api/2/issue/{}/remotelink", issue_key),
            &payload,
            "Failed to add remote link",
        )
        .await?;
        Ok(())
    }

    pub async fn add_issue_link(
        &self,
        link_type: &str,
        inward_key: &str,
        outward_key: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        let mut payload = serde_json::json!({
            "type": { "name": link_type },
            "inwardIssue": { "key": inward_key },
            "outwardIssue": { "key": outward_key },
        });
        if let Some(comment) = comment {
            payload["comment"] = serde_json::json!({ "body": comment });
        }
        self.send_json(
            reqwest::Method::POST,
            "/rest/api/2/issueLink",
            &payload,
            "Failed to link issues",
        )
        .await?;
        Ok(())
    }

    // --- Attachments ---

    pub async fn download(&self, content_url: &str) -> Result<Vec<u8>> {
        self.ratelimit().await;
        debug!("GET {content_url}");

        let response = self
            .http
            .get(content_url)
            .send()
            .await
            .map_err(|e| eyre!("Failed to download attachment: {e}"))?;
        let response = check_response(response, "Failed to download attachment").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| eyre!("Failed to read attachment content: {e}"))?;
        Ok(bytes.to_vec())
    }

    /// Uploads one file as an attachment. Multipart needs a client without
    /// the json content type, and the no-check header to bypass XSRF
    /// protection.
    pub async fn upload_attachment(&self, issue_key: &str, path: &std::path::Path) -> Result<()> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};

        if !path.is_file() {
            return Err(eyre!("File not found: {}", path.display()));
        }

        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let mime = mime_from_extension(&filename);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| eyre!("Failed to read {}: {e}", path.display()))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime)
            .map_err(|e| eyre!("Invalid MIME type: {e}"))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.auth_header)
                .map_err(|e| eyre!("Invalid auth header: {e}"))?,
        );
        headers.insert(
            HeaderName::from_static("x-atlassian-token"),
            HeaderValue::from_static("no-check"),
        );
        let upload_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| eyre!("Failed to build upload client: {e}"))?;

        self.ratelimit().await;
        let url = self.url(&f!("/rest/api/2/issue/{}/attachments", issue_key));
        debug!("POST {url}");

        let response = upload_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| eyre!("Failed to upload attachment: {e}"))?;
        check_response(response, "Failed to upload attachment").await?;
        Ok(())
    }

    // --- Boards and sprints ---

    /// Lists boards, optionally filtered by name. A limit of 0 pages
    /// through everything.
    pub async fn boards(&self, limit: u64, name: Option<&str>) -> Result<Vec<Board>> {
        let mut boards: Vec<Board> = Vec::new();
        let mut start_at = 0u64;
        loop {
            let page_size = if limit > 0 {
                std::cmp::min(limit - boards.len() as u64, 50)
            } else {
                50
            };
            if page_size == 0 {
                break;
            }
            let mut path = f!(
                "/rest/agile/1.0/board?startAt={}&maxResults={}",
                start_at,
                page_size
            );
            if let Some(name) = name {
                path.push_str(&f!("&name={}", urlencoding::encode(name)));
            }
            let response: BoardsResponse = self.get_json(&path, "Failed to list boards").await?;
            let count = response.values.len() as u64;
            boards.extend(response.values);
            if response.is_last.unwrap_or(true) || count == 0 {
                break;
            }
            start_at += count;
        }
        Ok(boards)
    }

    pub async fn board_by_name(&self, name: &str) -> Result<Board> {
        let mut matches = self.boards(0, Some(name)).await?;
        if matches.len() == 1 {
            return Ok(matches.remove(0));
        }
        matches
            .into_iter()
            .find(|board| board.name == name)
            .ok_or_else(|| eyre!("Invalid results for {} - ambiguous board name?", name))
    }

    /// Sprints on a board, eldest first. Boards that do not support sprints
    /// answer with an error; that reads as "no sprints" here.
    pub async fn sprints(&self, board_id: u64) -> Result<Vec<Sprint>> {
        let mut sprints: Vec<Sprint> = Vec::new();
        let mut start_at = 0u64;
        loop {
            let path = f!(
                "/rest/agile/1.0/board/{}/sprint?startAt={}&maxResults=50",
                board_id,
                start_at
            );
            let response: SprintsResponse = match self
                .get_json(&path, "Failed to fetch sprints")
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    warn!("Board {board_id} does not support sprints: {err}");
                    return Ok(sprints);
                }
            };
            let count = response.values.len() as u64;
            sprints.extend(response.values);
            if response.is_last.unwrap_or(true) || count == 0 {
                break;
            }
            start_at += count;
        }
        Ok(sprints)
    }

    pub async fn board_configuration(&self, board_id: u64) -> Result<BoardConfig> {
        self.get_json(
            &f!("/rest/agile/1.0/board/{}/configuration", board_id),
            "Failed to fetch board configuration",
        )
        .await
    }

    pub async fn filter_jql(&self, filter_id: &str) -> Result<String> {
        let details: FilterDetails = self
            .get_json(
                &f!("/rest/api/2/filter/{}", filter_id),
                "Failed to fetch board filter",
            )
            .await?;
        Ok(details.jql)
    }

    /// The saved quickfilters of a board, from the legacy edit model.
    pub async fn board_quickfilters(&self, board_id: u64) -> Result<Vec<Quickfilter>> {
        let path = f!(
            "/rest/greenhopper/1.0/rapidviewconfig/editmodel.json?rapidViewId={}",
            board_id
        );
        let model: RapidViewEditModel = self
            .get_json(&path, "Failed to fetch board quickfilters")
            .await?;
        Ok(model
            .quick_filter_config
            .map(|config| config.quick_filters)
            .unwrap_or_default())
    }

    /// Work items currently on the board with one quickfilter active.
    pub async fn board_work_items(
        &self,
        board_id: u64,
        quickfilter_id: u64,
    ) -> Result<Vec<Value>> {
        let path = f!(
            "/rest/greenhopper/1.0/xboard/work/allData.json?rapidViewId={}&activeQuickFilters={}",
            board_id,
            quickfilter_id
        );
        let data: Value = self.get_json(&path, "Failed to fetch board issues").await?;
        Ok(data
            .pointer("/issuesData/issues")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_header_for_pat_tokens() {
        let auth = Auth::Api {
            username: String::new(),
            token: "secret-pat".to_string(),
            pat: true,
        };

        assert_eq!(auth_header_value(&auth), "Bearer secret-pat");
    }

    #[test]
    fn test_auth_header_for_api_tokens() {
        let auth = Auth::Api {
            username: "dev@example.com".to_string(),
            token: "tok".to_string(),
            pat: false,
        };

        // base64("dev@example.com:tok")
        assert_eq!(
            auth_header_value(&auth),
            "Basic ZGV2QGV4YW1wbGUuY29tOnRvaw=="
        );
    }

    #[test]
    fn test_auth_header_for_basic_auth() {
        let auth = Auth::Basic {
            username: "user".to_string(),
            password: "pass".to_string(),
        };

        assert_eq!(auth_header_value(&auth), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_issue_path_for_keys_and_ids() {
        assert_eq!(issue_path("184512"), "/rest/api/2/issue/184512");
        assert_eq!(
            issue_path("NET-4312"),
            "/rest/api/2/issue/NET-4312?fields=*all"
        );
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension("trace.log"), "text/plain");
        assert_eq!(mime_from_extension("shot.PNG"), "image/png");
        assert_eq!(mime_from_extension("core.bin"), "application/octet-stream");
    }
}
