//! Notes service HTTP client.
//!
//! Stats and journal pages live in two databases of the notes service, each row keyed
//! by a `date` property. Journal content is read block by block and folded into the
//! nested [`JournalNode`] tree the section search works on.

use crate::config::NotionSettings;
use crate::constants::{DATE_FORMAT_ISO, ENV_VAR_NOTION_AUTH};
use crate::data::{JournalNode, PersonalStats};
use crate::errors::{AppResult, ServiceError};
use crate::services::{ensure_success, unreachable, NotesService};
use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

const SERVICE: &str = "notion";
const NOTION_VERSION_HEADER: &str = "Notion-Version";
const NOTION_VERSION: &str = "2022-06-28";
const DATE_PROPERTY: &str = "date";
const TITLE_PROPERTY: &str = "title";
const STATS_WORK_PROPERTY: &str = "work_time";
const STATS_FOCUS_PROPERTY: &str = "focus_time";
const STATS_SLEEP_PROPERTY: &str = "sleep_time";
const STATS_LEISURE_PROPERTY: &str = "leisure_time";
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<PageObject>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageObject {
    id: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    properties: Value,
}

#[derive(Debug, Deserialize)]
struct BlockChildren {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedPage {
    #[serde(default)]
    url: String,
}

/// Client for the notes service.
pub struct NotionClient {
    base_url: String,
    client: Client,
    token: String,
    stats_database_id: Option<String>,
    journal_database_id: Option<String>,
    notes_database_id: Option<String>,
}

impl NotionClient {
    /// Creates a client from settings.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::MissingCredentials` when `NT_AUTH` is not set.
    pub fn new(settings: &NotionSettings) -> AppResult<Self> {
        let token = settings.token.clone().ok_or(ServiceError::MissingCredentials {
            service: SERVICE,
            variable: ENV_VAR_NOTION_AUTH,
        })?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            client: Client::new(),
            token,
            stats_database_id: settings.stats_database_id.clone(),
            journal_database_id: settings.journal_database_id.clone(),
            notes_database_id: settings.notes_database_id.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(NOTION_VERSION_HEADER, NOTION_VERSION)
    }

    fn database<'a>(&self, id: &'a Option<String>, variable: &str) -> AppResult<&'a str> {
        id.as_deref().ok_or_else(|| {
            ServiceError::NotConfigured {
                service: SERVICE,
                message: format!("set {} to the database id", variable),
            }
            .into()
        })
    }

    /// Runs a database query, following pagination.
    fn query(&self, database_id: &str, filter: Value) -> AppResult<Vec<PageObject>> {
        let url = format!("{}/v1/databases/{}/query", self.base_url, database_id);
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "filter": &filter, "page_size": PAGE_SIZE });
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }

            let response = self
                .authorized(self.client.post(&url))
                .json(&body)
                .send()
                .map_err(unreachable(SERVICE))?;
            let response = ensure_success(SERVICE, response)?;
            let batch: QueryResponse = response.json().map_err(|e| invalid(format!(
                "Failed to parse database query: {}",
                e
            )))?;

            pages.extend(batch.results);
            match (batch.has_more, batch.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        debug!("Database query returned {} pages", pages.len());
        Ok(pages)
    }

    fn journal_page(&self, date: NaiveDate) -> AppResult<Option<PageObject>> {
        let database_id =
            self.database(&self.journal_database_id, "BITACORA_NOTION_JOURNAL_DB")?;
        let filter = json!({
            "property": DATE_PROPERTY,
            "date": { "equals": date.format(DATE_FORMAT_ISO).to_string() },
        });
        Ok(self.query(database_id, filter)?.into_iter().next())
    }

    fn block_children(&self, block_id: &str) -> AppResult<Vec<Value>> {
        let url = format!("{}/v1/blocks/{}/children", self.base_url, block_id);
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .authorized(self.client.get(&url))
                .query(&[("page_size", PAGE_SIZE.to_string())]);
            if let Some(cursor) = &cursor {
                request = request.query(&[("start_cursor", cursor)]);
            }

            let response = request.send().map_err(unreachable(SERVICE))?;
            let response = ensure_success(SERVICE, response)?;
            let batch: BlockChildren = response
                .json()
                .map_err(|e| invalid(format!("Failed to parse block children: {}", e)))?;

            blocks.extend(batch.results);
            match (batch.has_more, batch.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(blocks)
    }

    /// Reads the children of `block_id` as journal nodes, descending into nested blocks.
    fn journal_tree(&self, block_id: &str) -> AppResult<Vec<JournalNode>> {
        let mut nodes = Vec::new();
        for block in self.block_children(block_id)? {
            let text = block_text(&block);
            let has_children = block["has_children"].as_bool().unwrap_or(false);

            match (has_children, block["id"].as_str()) {
                (true, Some(child_id)) => {
                    let children = self.journal_tree(child_id)?;
                    nodes.push(JournalNode::List(vec![
                        JournalNode::Text(text),
                        JournalNode::List(children),
                    ]));
                }
                _ => nodes.push(JournalNode::Text(text)),
            }
        }
        Ok(nodes)
    }
}

impl NotesService for NotionClient {
    fn stats_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<PersonalStats>> {
        let database_id = self.database(&self.stats_database_id, "BITACORA_NOTION_STATS_DB")?;
        info!("Querying stats between {} and {}", start, end);

        let filter = json!({
            "and": [
                {
                    "property": DATE_PROPERTY,
                    "date": { "on_or_after": start.format(DATE_FORMAT_ISO).to_string() },
                },
                {
                    "property": DATE_PROPERTY,
                    "date": { "on_or_before": end.format(DATE_FORMAT_ISO).to_string() },
                },
            ]
        });

        let mut stats = self
            .query(database_id, filter)?
            .iter()
            .map(parse_stats)
            .collect::<AppResult<Vec<_>>>()?;
        stats.sort_by_key(|row| row.date);
        Ok(stats)
    }

    fn journal_url(&self, date: NaiveDate) -> AppResult<String> {
        Ok(self
            .journal_page(date)?
            .map(|page| page.url)
            .unwrap_or_default())
    }

    fn journal_content(&self, date: NaiveDate) -> AppResult<Vec<JournalNode>> {
        match self.journal_page(date)? {
            Some(page) => self.journal_tree(&page.id),
            None => Ok(Vec::new()),
        }
    }

    fn create_note_page(&self, title: &str, paragraphs: &[String]) -> AppResult<String> {
        let database_id = self.database(&self.notes_database_id, "BITACORA_NOTION_NOTES_DB")?;
        info!("Creating note page '{}'", title);

        let children: Vec<Value> = paragraphs
            .iter()
            .map(|paragraph| {
                json!({
                    "object": "block",
                    "type": "paragraph",
                    "paragraph": {
                        "rich_text": [{ "type": "text", "text": { "content": paragraph } }]
                    }
                })
            })
            .collect();
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": {
                TITLE_PROPERTY: { "title": [{ "text": { "content": title } }] }
            },
            "children": children,
        });

        let url = format!("{}/v1/pages", self.base_url);
        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .map_err(unreachable(SERVICE))?;
        let response = ensure_success(SERVICE, response)?;
        let page: CreatedPage = response
            .json()
            .map_err(|e| invalid(format!("Failed to parse created page: {}", e)))?;
        Ok(page.url)
    }
}

fn invalid(message: String) -> ServiceError {
    ServiceError::InvalidResponse {
        service: SERVICE,
        message,
    }
}

/// Concatenated plain text of a block's rich text, whatever the block type.
fn block_text(block: &Value) -> String {
    let Some(kind) = block["type"].as_str() else {
        return String::new();
    };

    block[kind]["rich_text"]
        .as_array()
        .map(|spans| {
            spans
                .iter()
                .filter_map(|span| span["plain_text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn number_property(properties: &Value, name: &str) -> f64 {
    properties[name]["number"].as_f64().unwrap_or(0.0)
}

fn parse_stats(page: &PageObject) -> AppResult<PersonalStats> {
    let raw_date = page.properties[DATE_PROPERTY]["date"]["start"]
        .as_str()
        .ok_or_else(|| invalid(format!("Stats row {} has no date", page.id)))?;
    // Date properties may carry a time part; only the day matters here.
    let day = raw_date.get(..10).unwrap_or(raw_date);
    let date = NaiveDate::parse_from_str(day, DATE_FORMAT_ISO)
        .map_err(|e| invalid(format!("Stats row {} has a bad date '{}': {}", page.id, raw_date, e)))?;

    Ok(PersonalStats {
        date,
        work_time: number_property(&page.properties, STATS_WORK_PROPERTY),
        focus_time: number_property(&page.properties, STATS_FOCUS_PROPERTY),
        sleep_time: number_property(&page.properties, STATS_SLEEP_PROPERTY),
        leisure_time: number_property(&page.properties, STATS_LEISURE_PROPERTY),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_text_joins_spans() {
        let block = json!({
            "type": "bulleted_list_item",
            "bulleted_list_item": {
                "rich_text": [{ "plain_text": "Night " }, { "plain_text": "Reflection" }]
            }
        });
        assert_eq!(block_text(&block), "Night Reflection");
    }

    #[test]
    fn test_block_text_without_rich_text() {
        let divider = json!({ "type": "divider", "divider": {} });
        assert_eq!(block_text(&divider), "");
        assert_eq!(block_text(&json!({})), "");
    }

    #[test]
    fn test_parse_stats_reads_numbers() {
        let page = PageObject {
            id: "row".to_string(),
            url: String::new(),
            properties: json!({
                "date": { "date": { "start": "2024-04-15" } },
                "work_time": { "number": 6.25 },
                "focus_time": { "number": 3.5 },
                "sleep_time": { "number": null },
            }),
        };
        let stats = parse_stats(&page).unwrap();
        assert_eq!(stats.date, NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());
        assert_eq!(stats.work_time, 6.25);
        assert_eq!(stats.focus_time, 3.5);
        assert_eq!(stats.sleep_time, 0.0);
        assert_eq!(stats.leisure_time, 0.0);
    }

    #[test]
    fn test_parse_stats_accepts_datetime_start() {
        let page = PageObject {
            id: "row".to_string(),
            url: String::new(),
            properties: json!({ "date": { "date": { "start": "2024-04-15T08:00:00.000-05:00" } } }),
        };
        assert_eq!(
            parse_stats(&page).unwrap().date,
            NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_stats_without_date_is_invalid() {
        let page = PageObject {
            id: "row".to_string(),
            url: String::new(),
            properties: json!({}),
        };
        assert!(parse_stats(&page).is_err());
    }

    #[test]
    fn test_new_requires_token() {
        let settings = NotionSettings {
            base_url: "http://localhost".to_string(),
            token: None,
            stats_database_id: None,
            journal_database_id: None,
            notes_database_id: None,
        };
        assert!(NotionClient::new(&settings).is_err());
    }
}
