//! HTTP client for a running dashboard server.

use colored::*;
use eyre::{Context, Result, eyre};
use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};

use txcycle::daemon::ControlReply;
use txcycle::domain::{RunLog, RunState, RunStatus};

fn endpoint(base_url: &str, route: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), route)
}

/// POST a control route (`start` or `stop`) and return the reply
pub async fn control(base_url: &str, route: &str) -> Result<ControlReply> {
    let url = endpoint(base_url, route);
    log::debug!("POST {url}");
    let reply = reqwest::Client::new()
        .post(&url)
        .send()
        .await
        .with_context(|| format!("Failed to reach {url}"))?
        .json::<ControlReply>()
        .await
        .context("Malformed control reply")?;
    Ok(reply)
}

/// Fetch one snapshot
pub async fn status(base_url: &str) -> Result<RunState> {
    let url = endpoint(base_url, "status");
    let state = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach {url}"))?
        .json::<RunState>()
        .await
        .context("Malformed status snapshot")?;
    Ok(state)
}

/// Follow the status feed, printing new log lines, until the run ends
pub async fn watch(base_url: &str) -> Result<RunStatus> {
    let url = endpoint(base_url, "events");
    let mut source = EventSource::get(&url);
    let mut last_seen: Option<String> = None;
    let mut started_at: Option<i64> = None;

    while let Some(event) = source.next().await {
        match event {
            Ok(Event::Open) => log::debug!("Connected to {url}"),
            Ok(Event::Message(message)) => {
                let state: RunState = serde_json::from_str(&message.data).context("Malformed status event")?;

                // A new run replaces the log wholesale
                if state.start_time != started_at {
                    started_at = state.start_time;
                    last_seen = None;
                }
                for line in fresh_lines(last_seen.as_deref(), &state.logs) {
                    print_line(line);
                }
                last_seen = state.logs.last().map(String::from);

                if state.status.is_terminal() {
                    source.close();
                    return Ok(state.status);
                }
            }
            Err(e) => {
                source.close();
                return Err(eyre!("Status feed failed: {e}"));
            }
        }
    }
    Err(eyre!("Status feed closed"))
}

/// Lines of `logs` after the last one already printed
pub fn fresh_lines<'a>(last_seen: Option<&str>, logs: &'a RunLog) -> Vec<&'a str> {
    let lines: Vec<&str> = logs.iter().collect();
    let start = last_seen
        .and_then(|last| lines.iter().rposition(|line| *line == last))
        .map_or(0, |i| i + 1);
    lines[start..].to_vec()
}

fn print_line(line: &str) {
    if line.contains("Error") || line.contains("Run cancelled") {
        println!("{}", line.red());
    } else if line.contains("Success") || line.contains("Finished") {
        println!("{}", line.green());
    } else if line.contains("NoBalance") || line.contains("NoWallets") {
        println!("{}", line.yellow());
    } else {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(lines: &[&str]) -> RunLog {
        RunLog::from(lines.iter().map(|l| l.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_endpoint_trims_slash() {
        assert_eq!(endpoint("http://localhost:3000/", "start"), "http://localhost:3000/start");
        assert_eq!(endpoint("http://localhost:3000", "events"), "http://localhost:3000/events");
    }

    #[test]
    fn test_fresh_lines_from_start() {
        let logs = log_of(&["a", "b"]);
        assert_eq!(fresh_lines(None, &logs), vec!["a", "b"]);
    }

    #[test]
    fn test_fresh_lines_after_last_seen() {
        let logs = log_of(&["a", "b", "c"]);
        assert_eq!(fresh_lines(Some("b"), &logs), vec!["c"]);
        assert!(fresh_lines(Some("c"), &logs).is_empty());
    }

    #[test]
    fn test_fresh_lines_last_seen_evicted() {
        let logs = log_of(&["x", "y"]);
        assert_eq!(fresh_lines(Some("gone"), &logs), vec!["x", "y"]);
    }
}
