//! Live GitHub activity for the "what I'm working on" panel.
//!
//! Fetches recent public push events and the most recently updated
//! repositories for one handle, and normalizes them into an
//! [`ActivitySummary`]. Any failure yields `None`: callers show the panel as
//! unavailable and carry on.

use crate::cache::{cached_activity, store_activity};
use crate::config::{
    SiteConfig, ACTIVITY_CACHE_TTL_MS, ACTIVITY_EVENT_PAGE, ACTIVITY_MAX_PUSHES,
    ACTIVITY_MAX_REPOS,
};
use crate::error::{Result, SiteError};
use crate::utils::{first_line_truncated, parse_timestamp};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const COMMIT_MESSAGE_CHARS: usize = 72;

#[derive(Debug, Clone, Deserialize)]
pub struct GhEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: GhEventRepo,
    #[serde(default)]
    pub payload: GhPayload,
    /// RFC 3339; [`summarize`] turns an unparseable value into `None`.
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhEventRepo {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GhPayload {
    /// Distinct commit count; the `commits` list is capped at 20.
    pub size: Option<u32>,
    #[serde(default)]
    pub commits: Vec<GhCommit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhCommit {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhRepo {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    pub html_url: String,
    pub updated_at: String,
    #[serde(default)]
    pub fork: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushSummary {
    /// Repository name without the owner prefix
    pub repo: String,
    pub commits: u32,
    pub latest_message: String,
    /// `None` if the API sent an unparseable timestamp
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: String,
    pub language: Option<String>,
    pub stars: u32,
    pub url: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub user: String,
    pub pushes: Vec<PushSummary>,
    pub repos: Vec<RepoSummary>,
    /// Commits across all push events in the fetched page
    pub total_commits: u32,
    pub last_push_at: Option<DateTime<Utc>>,
}

impl ActivitySummary {
    pub fn is_empty(&self) -> bool {
        self.pushes.is_empty() && self.repos.is_empty()
    }
}

fn short_repo_name(full: &str) -> &str {
    full.rsplit_once('/').map_or(full, |(_, name)| name)
}

/// Normalize raw API payloads. Non-push events and forks are dropped.
pub fn summarize(user: &str, events: &[GhEvent], repos: &[GhRepo]) -> ActivitySummary {
    let push_events: Vec<&GhEvent> = events.iter().filter(|e| e.kind == "PushEvent").collect();

    let total_commits: u32 = push_events
        .iter()
        .map(|e| e.payload.size.unwrap_or(e.payload.commits.len() as u32))
        .sum();

    let pushes: Vec<PushSummary> = push_events
        .iter()
        .take(ACTIVITY_MAX_PUSHES)
        .map(|e| PushSummary {
            repo: short_repo_name(&e.repo.name).to_string(),
            commits: e.payload.size.unwrap_or(e.payload.commits.len() as u32),
            // Commits are listed oldest first.
            latest_message: e
                .payload
                .commits
                .last()
                .map(|c| first_line_truncated(&c.message, COMMIT_MESSAGE_CHARS))
                .unwrap_or_default(),
            at: parse_timestamp(&e.created_at).ok(),
        })
        .collect();

    let repos = repos
        .iter()
        .filter(|r| !r.fork)
        .take(ACTIVITY_MAX_REPOS)
        .map(|r| RepoSummary {
            name: r.name.clone(),
            description: r.description.clone().unwrap_or_default(),
            language: r.language.clone(),
            stars: r.stargazers_count,
            url: r.html_url.clone(),
            updated_at: parse_timestamp(&r.updated_at).ok(),
        })
        .collect();

    ActivitySummary {
        user: user.to_string(),
        last_push_at: pushes.iter().filter_map(|p| p.at).max(),
        pushes,
        repos,
        total_commits,
    }
}

async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let response = client
        .get(url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(SiteError::Status {
            status: status.as_u16(),
            text,
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn fetch_summary(config: &SiteConfig) -> Result<ActivitySummary> {
    let user = config.github_user.trim();
    if user.is_empty() {
        return Err(SiteError::InvalidInput("GitHub user is not configured".into()));
    }

    let client = reqwest::Client::new();
    let events_url = format!(
        "{}/users/{}/events/public?per_page={}",
        config.github_api_base, user, ACTIVITY_EVENT_PAGE
    );
    let repos_url = format!(
        "{}/users/{}/repos?sort=updated&per_page={}",
        config.github_api_base,
        user,
        ACTIVITY_MAX_REPOS * 2
    );

    let (events, repos) = futures::join!(
        get_json::<Vec<GhEvent>>(&client, &events_url),
        get_json::<Vec<GhRepo>>(&client, &repos_url)
    );
    Ok(summarize(user, &events?, &repos?))
}

/// Fetch the activity summary, served from the session cache when fresh.
/// `None` means "data unavailable".
pub async fn fetch_activity(config: &SiteConfig) -> Option<ActivitySummary> {
    let now = js_sys::Date::now();
    if let Some(summary) = cached_activity(now, ACTIVITY_CACHE_TTL_MS) {
        debug!("Activity served from cache");
        return Some(summary);
    }

    match fetch_summary(config).await {
        Ok(summary) => {
            debug!(
                "Fetched activity: {} pushes, {} repos",
                summary.pushes.len(),
                summary.repos.len()
            );
            store_activity(now, summary.clone());
            Some(summary)
        }
        Err(e) => {
            warn!("Live activity unavailable: {}", e);
            None
        }
    }
}
