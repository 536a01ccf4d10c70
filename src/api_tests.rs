//! Tests for the schedule backend client

use super::*;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

const SAMPLE: &str = r#"{
  "channels": [
    {
      "channel_id": "hbo",
      "channel_name": "HBO",
      "date": "2026-10-19",
      "shows": [
        {"id": "a1", "start_time": "7:00 PM", "title": "News", "show_type": "Series",
         "season": "Season 1", "episode": "Episode 2", "channel_id": "hbo", "date": "2026-10-19"},
        {"start_time": "9:00 PM", "title": "Heat", "show_type": "Feature Film", "year": "1995",
         "duration": 170}
      ]
    },
    {"channel_id": "fx", "channel_name": "FX"}
  ],
  "current_time": "2026-10-19T19:05:00-04:00",
  "timezone": "America/New_York"
}"#;

/// Serve one canned HTTP response on a random local port.
/// Returns the base URL and a receiver for the request line.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        // Drain headers
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        let _ = tx.send(request_line.trim().to_string());

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });

    (format!("http://{}", addr), rx)
}

fn client(base: &str) -> ScheduleClient {
    ScheduleClient::new(base, Duration::from_secs(5), Duration::from_secs(5))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn test_parse_schedule() {
    let schedule = parse_schedule(SAMPLE).unwrap();

    assert_eq!(schedule.channels.len(), 2);
    assert_eq!(schedule.channels[0].channel_name, "HBO");
    assert_eq!(schedule.channels[0].shows[1].year.as_deref(), Some("1995"));
    assert_eq!(schedule.channels[0].shows[1].duration, Some(170));
    assert!(schedule.channels[1].shows.is_empty());
    assert_eq!(schedule.timezone.as_deref(), Some("America/New_York"));
    assert_eq!(schedule.program_count(), 2);
}

#[test]
fn test_parse_schedule_rejects_garbage() {
    assert!(matches!(parse_schedule("<html>oops</html>"), Err(FetchError::Decode(_))));
    // A show without a title is not a show
    let missing_title = r#"{"channels":[{"channel_id":"x","channel_name":"X","shows":[{"start_time":"1:00 PM"}]}]}"#;
    assert!(matches!(parse_schedule(missing_title), Err(FetchError::Decode(_))));
}

#[test]
fn test_schedule_url() {
    let c = client(" http://tv.example.com/ ");
    assert_eq!(c.base_url(), "http://tv.example.com");
    assert_eq!(c.schedule_url(date()), "http://tv.example.com/api/schedule?date=2026-10-19");
    assert_eq!(c.channels_url(), "http://tv.example.com/api/channels");
}

#[test]
fn test_fetch_schedule_ok() {
    let (base, requests) = serve_once("200 OK", SAMPLE);
    let schedule = client(&base).fetch_schedule(date()).unwrap();

    assert_eq!(schedule.channels[0].shows[0].title, "News");
    assert_eq!(requests.recv().unwrap(), "GET /api/schedule?date=2026-10-19 HTTP/1.1");
}

#[test]
fn test_fetch_schedule_server_error() {
    let (base, _requests) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#);
    let err = client(&base).fetch_schedule(date()).unwrap_err();
    assert!(matches!(err, FetchError::Status(500)), "{:?}", err);
}

#[test]
fn test_fetch_schedule_bad_body() {
    let (base, _requests) = serve_once("200 OK", "not json");
    let err = client(&base).fetch_schedule(date()).unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "{:?}", err);
}

#[test]
fn test_fetch_schedule_connection_refused() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = client(&format!("http://127.0.0.1:{}", port))
        .fetch_schedule(date())
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "{:?}", err);
}

#[test]
fn test_fetch_channels() {
    let body = r#"{"channels":[{"id":"hbo","name":"HBO","url_name":"hbo"},{"id":"fx","name":"FX","url_name":"fx"}]}"#;
    let (base, requests) = serve_once("200 OK", body);
    let channels = client(&base).fetch_channels().unwrap();

    assert_eq!(channels.len(), 2);
    assert_eq!(channels[1].name, "FX");
    assert_eq!(requests.recv().unwrap(), "GET /api/channels HTTP/1.1");
}
