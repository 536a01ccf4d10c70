//! Open a web search for a show in the system browser

use std::io;
use std::process::{Command, Stdio};

const SEARCH_BASE: &str = "https://www.google.com/search?q=";

pub fn search_url(title: &str) -> String {
    format!("{}{}", SEARCH_BASE, urlencoding::encode(title))
}

fn browser_command(url: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        // Empty title argument so `start` does not treat the URL as one
        cmd.args(["/C", "start", "", url]);
        cmd
    }

    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Launch the default browser on `url` without waiting for it
pub fn open_in_browser(url: &str) -> io::Result<()> {
    browser_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

/// Search the web for a show title; failures are logged and otherwise ignored
pub fn search_show(title: &str) {
    let url = search_url(title);
    log::info!("Searching for \"{}\"", title);
    if let Err(e) = open_in_browser(&url) {
        log::warn!("Could not open browser for {}: {}", url, e);
    }
}
