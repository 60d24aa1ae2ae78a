use bitacora::ai::{ChatModel, Message, OpenAIClient};
use bitacora::config::{NotionSettings, OpenAISettings, TickTickSettings, WeatherSettings};
use bitacora::data::{DataProcessor, FormatProfile, JournalNode};
use bitacora::errors::{AIError, AppError, ServiceError};
use bitacora::services::{
    NotesService, NotionClient, TaskService, TickTickClient, WeatherClient, WeatherKind,
};
use chrono::NaiveDate;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
}

fn ticktick_settings(server: &ServerGuard) -> TickTickSettings {
    TickTickSettings {
        base_url: server.url(),
        username: Some("me@example.com".to_string()),
        password: Some("secret".to_string()),
        logs_project_id: Some("logs".to_string()),
    }
}

fn notion_settings(server: &ServerGuard) -> NotionSettings {
    NotionSettings {
        base_url: server.url(),
        token: Some("secret_token".to_string()),
        stats_database_id: Some("stats-db".to_string()),
        journal_database_id: Some("journal-db".to_string()),
        notes_database_id: Some("notes-db".to_string()),
    }
}

fn mock_sign_on(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/api/v2/user/signon")
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(json!({
            "username": "me@example.com",
            "password": "secret"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token": "session-token"}"#)
        .create()
}

fn mock_batch_check(server: &mut ServerGuard) -> mockito::Mock {
    let body = json!({
        "syncTaskBean": {
            "update": [
                {
                    "id": "t1",
                    "projectId": "inbox",
                    "title": "Dentist",
                    "dueDate": "2024-04-15T14:30:00.000+0000",
                    "createdTime": "2024-04-10T12:00:00.000+0000",
                    "tags": ["reminder"],
                    "timeZone": "America/Bogota",
                    "status": 0
                },
                {
                    "id": "t2",
                    "projectId": "inbox",
                    "title": "Already done",
                    "dueDate": "2024-04-15T15:00:00.000+0000",
                    "createdTime": "2024-04-10T12:00:00.000+0000",
                    "status": 2
                },
                {
                    "id": "l2",
                    "projectId": "logs",
                    "title": "Lunch",
                    "createdTime": "2024-04-15T17:30:00.000+0000",
                    "timeZone": "America/Bogota",
                    "status": 0
                },
                {
                    "id": "l1",
                    "projectId": "logs",
                    "title": "Gym",
                    "createdTime": "2024-04-15T13:00:00.000+0000",
                    "tags": ["highlight"],
                    "timeZone": "America/Bogota",
                    "status": 0
                }
            ]
        }
    });

    server
        .mock("GET", "/api/v2/batch/check/0")
        .match_header("cookie", "t=session-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create()
}

#[test]
fn test_ticktick_splits_tasks_and_logs() {
    let mut server = Server::new();
    let _sign_on = mock_sign_on(&mut server);
    let _check = mock_batch_check(&mut server);

    let client = TickTickClient::login(&ticktick_settings(&server), chrono_tz::UTC).unwrap();

    let active = client.active_tasks().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "Dentist");
    let due = active[0].due_date.unwrap();
    assert_eq!(due.format("%Y-%m-%d %H:%M").to_string(), "2024-04-15 09:30");

    let logs = client.logs().unwrap();
    let titles: Vec<&str> = logs.iter().map(|log| log.title.as_str()).collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"Gym"));
    assert!(titles.contains(&"Lunch"));
}

#[test]
fn test_ticktick_rejected_credentials() {
    let mut server = Server::new();
    let _sign_on = server
        .mock("POST", "/api/v2/user/signon")
        .match_query(Matcher::Any)
        .with_status(401)
        .create();

    let result = TickTickClient::login(&ticktick_settings(&server), chrono_tz::UTC);
    assert!(matches!(
        result,
        Err(AppError::Service(ServiceError::Unauthorized { status: 401, .. }))
    ));
}

#[test]
fn test_ticktick_requires_credentials_before_any_request() {
    let mut server = Server::new();
    let sign_on = server
        .mock("POST", "/api/v2/user/signon")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let settings = TickTickSettings {
        username: None,
        ..ticktick_settings(&server)
    };
    match TickTickClient::login(&settings, chrono_tz::UTC) {
        Err(AppError::Service(ServiceError::MissingCredentials { variable, .. })) => {
            assert_eq!(variable, "TT_USER")
        }
        _ => panic!("Expected MissingCredentials for TT_USER"),
    }
    sign_on.assert();
}

#[test]
fn test_ticktick_adds_highlight_log() {
    let mut server = Server::new();
    let _sign_on = mock_sign_on(&mut server);
    let add = server
        .mock("POST", "/api/v2/batch/task")
        .match_header("cookie", "t=session-token")
        .match_body(Matcher::Json(json!({
            "add": [{ "title": "Shipped the release", "projectId": "logs", "tags": ["highlight"] }]
        })))
        .with_status(200)
        .with_body("{}")
        .create();

    let client = TickTickClient::login(&ticktick_settings(&server), chrono_tz::UTC).unwrap();
    client.add_highlight_log("Shipped the release").unwrap();
    add.assert();
}

#[test]
fn test_ticktick_logs_need_a_project() {
    let mut server = Server::new();
    let _sign_on = mock_sign_on(&mut server);

    let settings = TickTickSettings {
        logs_project_id: None,
        ..ticktick_settings(&server)
    };
    let client = TickTickClient::login(&settings, chrono_tz::UTC).unwrap();
    assert!(matches!(
        client.logs(),
        Err(AppError::Service(ServiceError::NotConfigured { .. }))
    ));
}

// Mocks are removed from the server when dropped, so they are handed back to the test
fn mock_journal(server: &mut ServerGuard) -> Vec<mockito::Mock> {
    let query = server
        .mock("POST", "/v1/databases/journal-db/query")
        .match_header("authorization", "Bearer secret_token")
        .match_header("notion-version", "2022-06-28")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "results": [{ "id": "page-1", "url": "https://notes.example/page-1", "properties": {} }],
                "has_more": false,
                "next_cursor": null
            })
            .to_string(),
        )
        .create();

    let page = server
        .mock("GET", "/v1/blocks/page-1/children")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "results": [
                    {
                        "id": "b1",
                        "type": "heading_2",
                        "has_children": true,
                        "heading_2": { "rich_text": [{ "plain_text": "Day logs" }] }
                    },
                    {
                        "id": "b2",
                        "type": "paragraph",
                        "has_children": false,
                        "paragraph": { "rich_text": [{ "plain_text": "Closing note" }] }
                    }
                ],
                "has_more": false
            })
            .to_string(),
        )
        .create();

    let heading = server
        .mock("GET", "/v1/blocks/b1/children")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "results": [
                    {
                        "id": "b3",
                        "type": "bulleted_list_item",
                        "has_children": false,
                        "bulleted_list_item": { "rich_text": [{ "plain_text": "Ran 5k" }] }
                    }
                ],
                "has_more": false
            })
            .to_string(),
        )
        .create();

    vec![query, page, heading]
}

#[test]
fn test_notion_journal_tree_and_url() {
    let mut server = Server::new();
    let _journal = mock_journal(&mut server);

    let client = NotionClient::new(&notion_settings(&server)).unwrap();
    assert_eq!(client.journal_url(day(15)).unwrap(), "https://notes.example/page-1");
    assert_eq!(
        client.journal_content(day(15)).unwrap(),
        vec![
            JournalNode::List(vec![
                JournalNode::text("Day logs"),
                JournalNode::List(vec![JournalNode::text("Ran 5k")]),
            ]),
            JournalNode::text("Closing note"),
        ]
    );
}

#[test]
fn test_notion_stats_follow_pagination() {
    let mut server = Server::new();
    let page = |id: &str, date: &str, work: f64| {
        json!({
            "id": id,
            "url": "",
            "properties": {
                "date": { "date": { "start": date } },
                "work_time": { "number": work },
                "sleep_time": { "number": 7.5 }
            }
        })
    };

    let _second = server
        .mock("POST", "/v1/databases/stats-db/query")
        .match_body(Matcher::PartialJson(json!({ "start_cursor": "cursor-2" })))
        .expect(1)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "results": [page("r1", "2024-04-14", 4.0)], "has_more": false }).to_string(),
        )
        .create();
    let _first = server
        .mock("POST", "/v1/databases/stats-db/query")
        .match_body(Matcher::PartialJson(json!({ "page_size": 100 })))
        .expect(1)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "results": [page("r2", "2024-04-15", 6.5)],
                "has_more": true,
                "next_cursor": "cursor-2"
            })
            .to_string(),
        )
        .create();

    let client = NotionClient::new(&notion_settings(&server)).unwrap();
    let stats = client.stats_between(day(14), day(15)).unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].date, day(14));
    assert_eq!(stats[1].work_time, 6.5);
    assert_eq!(stats[1].sleep_time, 7.5);
    assert_eq!(stats[1].focus_time, 0.0);
}

#[test]
fn test_notion_creates_note_page() {
    let mut server = Server::new();
    let create = server
        .mock("POST", "/v1/pages")
        .match_body(Matcher::PartialJson(json!({
            "parent": { "database_id": "notes-db" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"url": "https://notes.example/recap"}"#)
        .create();

    let client = NotionClient::new(&notion_settings(&server)).unwrap();
    let url = client
        .create_note_page("Recap 2024-04-15", &["First.".to_string(), "Second.".to_string()])
        .unwrap();
    assert_eq!(url, "https://notes.example/recap");
    create.assert();
}

#[test]
fn test_processor_against_live_clients() {
    let mut server = Server::new();
    let _sign_on = mock_sign_on(&mut server);
    let _check = mock_batch_check(&mut server);
    let _journal = mock_journal(&mut server);

    let tasks = TickTickClient::login(&ticktick_settings(&server), chrono_tz::UTC).unwrap();
    let notes = NotionClient::new(&notion_settings(&server)).unwrap();
    let data = DataProcessor::new(&tasks, &notes, None, FormatProfile::default());

    let active = data.get_day_active_tasks(day(15)).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "Dentist");
    assert_eq!(active[0].date, "09:30am");

    let logs = data.get_day_logs(day(15)).unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].ends_with("08:00 am Gym"));
    assert!(logs[0].starts_with(bitacora::constants::HIGHLIGHT_GLYPH));
    assert_eq!(logs[1], "12:30 pm Lunch");

    assert_eq!(data.get_day_recap(day(15)).unwrap(), vec!["Ran 5k"]);
    assert!(matches!(
        data.generate_recap_summary(&["Ran 5k".to_string()]),
        Err(AppError::AI(AIError::MissingApiKey))
    ));
}

fn weather_settings(base_url: String) -> WeatherSettings {
    WeatherSettings {
        base_url,
        location: "Bogota".to_string(),
        timeout: Duration::from_secs(2),
    }
}

#[test]
fn test_weather_forecast_for_matching_day() {
    let mut server = Server::new();
    let hourly = |time: &str, temp: &str, code: &str| {
        json!({ "time": time, "tempC": temp, "FeelsLikeC": temp, "weatherCode": code })
    };
    let _forecast = server
        .mock("GET", "/Bogota")
        .match_query(Matcher::UrlEncoded("format".into(), "j1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "weather": [
                    { "date": "2024-04-14", "hourly": [hourly("600", "9", "113")] },
                    {
                        "date": "2024-04-15",
                        "hourly": [hourly("600", "11", "116"), hourly("2100", "-2", "338")]
                    }
                ]
            })
            .to_string(),
        )
        .create();

    let client = WeatherClient::new(&weather_settings(server.url())).unwrap();
    let forecast = client.forecast(day(15)).unwrap();

    assert_eq!(forecast.hourly.len(), 2);
    assert_eq!(forecast.at_hour(6).unwrap().temperature, 11);
    assert_eq!(forecast.at_hour(6).unwrap().kind, WeatherKind::PartlyCloudy);
    assert_eq!(forecast.at_hour(21).unwrap().kind, WeatherKind::HeavySnow);
    assert!(client.forecast(day(20)).is_none());
}

#[test]
fn test_weather_failures_are_swallowed() {
    let mut server = Server::new();
    let _failing = server
        .mock("GET", "/Bogota")
        .match_query(Matcher::Any)
        .with_status(503)
        .create();

    let client = WeatherClient::new(&weather_settings(server.url())).unwrap();
    assert!(client.forecast(day(15)).is_none());

    let offline = WeatherClient::new(&weather_settings("http://127.0.0.1:9".to_string())).unwrap();
    assert!(offline.forecast(day(15)).is_none());
}

#[test]
fn test_weather_gives_up_after_timeout() {
    // Accepts the connection and never answers
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    let silent = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(3));
        drop(stream);
    });

    let settings = WeatherSettings {
        timeout: Duration::from_millis(300),
        ..weather_settings(format!("http://{}", address))
    };
    let client = WeatherClient::new(&settings).unwrap();

    let started = Instant::now();
    assert!(client.forecast(day(15)).is_none());
    assert!(started.elapsed() < Duration::from_secs(2));

    silent.join().unwrap();
}

fn openai_settings(server: &ServerGuard) -> OpenAISettings {
    OpenAISettings {
        base_url: server.url(),
        api_key: Some("sk-test".to_string()),
        model: "gpt-4".to_string(),
    }
}

#[test]
fn test_openai_completion() {
    let mut server = Server::new();
    let completion = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({ "model": "gpt-4", "max_tokens": 400 })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{ "message": { "role": "assistant", "content": "I ran 5k." } }]
            })
            .to_string(),
        )
        .create();

    let client = OpenAIClient::new(&openai_settings(&server)).unwrap();
    let answer = client.complete(&[Message::user("Ran 5k")]).unwrap();
    assert_eq!(answer, "I ran 5k.");
    completion.assert();
}

#[test]
fn test_openai_unknown_model() {
    let mut server = Server::new();
    let _missing = server
        .mock("POST", "/v1/chat/completions")
        .with_status(404)
        .create();

    let client = OpenAIClient::new(&openai_settings(&server)).unwrap();
    match client.complete(&[Message::user("hi")]) {
        Err(AppError::AI(AIError::ModelNotFound(model))) => assert_eq!(model, "gpt-4"),
        _ => panic!("Expected ModelNotFound"),
    }
}
