use chrono::DateTime;

use crate::document::PullRequestRef;

pub const SHORT_SHA_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub text: String,
    pub html: String,
}

impl Cell {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn plain<S: AsRef<str>>(s: S) -> Self {
        let text = s.as_ref().to_owned();
        Self {
            html: html_escape(&text),
            text,
        }
    }

    pub fn link(href: &str, text: String) -> Self {
        Self {
            html: format!(
                "<a href=\"{}\">{}</a>",
                html_escape(href),
                html_escape(&text)
            ),
            text,
        }
    }
}

pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(SHORT_SHA_LEN) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}

pub fn sha_to_link(repo_url: &str, sha: &str) -> Cell {
    Cell::link(
        &format!("{}/commit/{sha}", repo_url.trim_end_matches('/')),
        short_sha(sha).to_owned(),
    )
}

pub fn pr_to_link(upstream_url: &str, pr: &PullRequestRef) -> Cell {
    Cell::link(&pr.url(upstream_url), pr.to_string())
}

pub fn utc_seconds_to_date(seconds: i64) -> String {
    match DateTime::from_timestamp(seconds, 0) {
        Some(datetime) => datetime.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha_link_is_shortened() {
        let cell = sha_to_link("https://github.com/o/r/", "abcdef1234567890");
        assert_eq!(cell.text, "abcdef1234");
        assert_eq!(
            cell.html,
            "<a href=\"https://github.com/o/r/commit/abcdef1234567890\">abcdef1234</a>"
        );
        assert_eq!(short_sha("abc"), "abc");
    }

    #[test]
    fn pr_link_shows_number() {
        let cell = pr_to_link("https://github.com/o/r", &PullRequestRef::Number(42));
        assert_eq!(cell.text, "#42");
        assert!(cell.html.contains("href=\"https://github.com/o/r/pull/42\""));
    }

    #[test]
    fn dates_have_no_time_of_day() {
        assert_eq!(utc_seconds_to_date(0), "1970-01-01");
        assert_eq!(utc_seconds_to_date(1700000000), "2023-11-14");
        assert_eq!(utc_seconds_to_date(1700000100), "2023-11-14");
    }

    #[test]
    fn plain_cells_are_escaped() {
        let cell = Cell::plain("a <b> & 'c'");
        assert_eq!(cell.text, "a <b> & 'c'");
        assert_eq!(cell.html, "a &lt;b&gt; &amp; &#39;c&#39;");
    }
}
