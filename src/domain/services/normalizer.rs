//! Canonicalization and validation of event and booking fields.
//!
//! Everything here is pure: the write path calls these functions before any
//! record reaches a repository.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use sqlx::types::Json;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::event::{Event, EventInput, EventMode};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{0}")]
    Required(&'static str),
    #[error("Title must contain at least one letter or digit")]
    EmptySlug,
    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDate,
    #[error("Invalid time format. Use HH:MM (24-hour format)")]
    InvalidTime,
    #[error("Invalid mode \"{0}\". Expected one of: online, offline, hybrid")]
    InvalidMode(String),
    #[error("{0}")]
    EmptySequence(&'static str),
    #[error("Please provide a valid email address")]
    InvalidEmail,
}

fn canonical_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"))
}

fn canonical_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid time regex"))
}

fn twelve_hour_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^([0-9]{1,2}):([0-9]{2})\s*(AM|PM)$").expect("valid 12h regex"))
}

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid slug regex"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?-u)^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex")
    })
}

/// Human date layouts accepted besides ISO/RFC forms, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%Y-%m-%d",
];

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Derives a URL-safe slug. May return an empty string; callers on the write
/// path reject that through [`derive_slug`].
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    kept.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn derive_slug(title: &str) -> Result<String, NormalizeError> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(NormalizeError::EmptySlug);
    }
    Ok(slug)
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug_re().is_match(slug)
}

/// Parses any accepted date spelling into a calendar date.
///
/// Offsets carried by date-time inputs are kept as written, so
/// `2024-03-05T23:30:00-08:00` is March 5th, not March 6th in UTC.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    if let Some(date) = DATE_FORMATS.iter().find_map(|f| NaiveDate::parse_from_str(raw, f).ok()) {
        return Some(date);
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .map(|dt| dt.date())
}

pub fn normalize_date(raw: &str) -> Result<String, NormalizeError> {
    let raw = raw.trim();

    if canonical_date_re().is_match(raw) {
        // Canonical shape still has to name a real day.
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|_| raw.to_string())
            .map_err(|_| NormalizeError::InvalidDate);
    }

    parse_date(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or(NormalizeError::InvalidDate)
}

pub fn normalize_time(raw: &str) -> Result<String, NormalizeError> {
    let raw = raw.trim();

    if canonical_time_re().is_match(raw) {
        return Ok(raw.to_string());
    }

    let caps = twelve_hour_re().captures(raw).ok_or(NormalizeError::InvalidTime)?;
    let mut hours: u32 = caps[1].parse().map_err(|_| NormalizeError::InvalidTime)?;
    let minutes: u32 = caps[2].parse().map_err(|_| NormalizeError::InvalidTime)?;

    if !(1..=12).contains(&hours) || minutes > 59 {
        return Err(NormalizeError::InvalidTime);
    }

    let is_pm = caps[3].eq_ignore_ascii_case("PM");
    if is_pm && hours != 12 {
        hours += 12;
    }
    if !is_pm && hours == 12 {
        hours = 0;
    }

    Ok(format!("{:02}:{:02}", hours, minutes))
}

pub fn normalize_mode(raw: &str) -> Result<String, NormalizeError> {
    let lowered = raw.trim().to_lowercase();
    lowered
        .parse::<EventMode>()
        .map(|mode| mode.as_str().to_string())
        .map_err(|_| NormalizeError::InvalidMode(raw.trim().to_string()))
}

/// Trims every item, drops blanks, and rejects the result if nothing is left.
pub fn require_non_empty(items: Vec<String>, message: &'static str) -> Result<Vec<String>, NormalizeError> {
    let cleaned: Vec<String> = items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if cleaned.is_empty() {
        return Err(NormalizeError::EmptySequence(message));
    }
    Ok(cleaned)
}

pub fn normalize_email(raw: &str) -> Result<String, NormalizeError> {
    let email = raw.trim().to_lowercase();
    if !email_re().is_match(&email) {
        return Err(NormalizeError::InvalidEmail);
    }
    Ok(email)
}

fn required_text(value: Option<String>, message: &'static str) -> Result<String, NormalizeError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(NormalizeError::Required(message))
}

/// `None` when the field is absent from the payload; a present but blank value
/// is an error, same as on create.
fn optional_text(value: Option<String>, message: &'static str) -> Result<Option<String>, NormalizeError> {
    value.map(|v| required_text(Some(v), message)).transpose()
}

/// Builds a fully normalized event for the create path. Every field is required.
pub fn build_event(input: EventInput) -> Result<Event, NormalizeError> {
    let title = required_text(input.title, "Title is required")?;
    let slug = derive_slug(&title)?;

    let date = normalize_date(&required_text(input.date, "Date is required")?)?;
    let time = normalize_time(&required_text(input.time, "Time is required")?)?;
    let mode = normalize_mode(&required_text(input.mode, "Mode is required")?)?;

    let agenda = input.agenda.ok_or(NormalizeError::Required("Agenda is required"))?;
    let agenda = require_non_empty(agenda, "Agenda must contain at least one item")?;
    let tags = input.tags.ok_or(NormalizeError::Required("Tags are required"))?;
    let tags = require_non_empty(tags, "At least one tag is required")?;

    let now = Utc::now();
    Ok(Event {
        id: Uuid::new_v4().to_string(),
        title,
        slug,
        description: required_text(input.description, "Description is required")?,
        overview: required_text(input.overview, "Overview is required")?,
        image: required_text(input.image, "Image is required")?,
        venue: required_text(input.venue, "Venue is required")?,
        location: required_text(input.location, "Location is required")?,
        date,
        time,
        mode,
        audience: required_text(input.audience, "Audience is required")?,
        agenda: Json(agenda),
        organizer: required_text(input.organizer, "Organizer is required")?,
        tags: Json(tags),
        created_at: now,
        updated_at: now,
    })
}

/// Applies a partial update. Only fields present in `input` are written, and
/// derived or canonicalized fields are recomputed only when their source changed.
pub fn apply_event_changes(mut event: Event, input: EventInput) -> Result<Event, NormalizeError> {
    if let Some(title) = optional_text(input.title, "Title is required")? {
        if title != event.title {
            event.slug = derive_slug(&title)?;
            event.title = title;
        }
    }

    if let Some(date) = optional_text(input.date, "Date is required")? {
        if date != event.date {
            event.date = normalize_date(&date)?;
        }
    }

    if let Some(time) = optional_text(input.time, "Time is required")? {
        if time != event.time {
            event.time = normalize_time(&time)?;
        }
    }

    if let Some(mode) = optional_text(input.mode, "Mode is required")? {
        if mode != event.mode {
            event.mode = normalize_mode(&mode)?;
        }
    }

    if let Some(agenda) = input.agenda {
        event.agenda = Json(require_non_empty(agenda, "Agenda must contain at least one item")?);
    }
    if let Some(tags) = input.tags {
        event.tags = Json(require_non_empty(tags, "At least one tag is required")?);
    }

    if let Some(v) = optional_text(input.description, "Description is required")? { event.description = v; }
    if let Some(v) = optional_text(input.overview, "Overview is required")? { event.overview = v; }
    if let Some(v) = optional_text(input.image, "Image is required")? { event.image = v; }
    if let Some(v) = optional_text(input.venue, "Venue is required")? { event.venue = v; }
    if let Some(v) = optional_text(input.location, "Location is required")? { event.location = v; }
    if let Some(v) = optional_text(input.audience, "Audience is required")? { event.audience = v; }
    if let Some(v) = optional_text(input.organizer, "Organizer is required")? { event.organizer = v; }

    event.updated_at = Utc::now();
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> EventInput {
        EventInput {
            title: Some("  RustConf 2024: The Future!  ".into()),
            description: Some("A conference".into()),
            overview: Some("Talks and workshops".into()),
            image: Some("/images/rustconf.png".into()),
            venue: Some("Convention Center".into()),
            location: Some("Montreal, Canada".into()),
            date: Some("March 5, 2024".into()),
            time: Some("2:30 PM".into()),
            mode: Some("Hybrid".into()),
            audience: Some("Developers".into()),
            agenda: Some(vec!["Keynote".into(), "  ".into(), "Lunch".into()]),
            organizer: Some("Rust Foundation".into()),
            tags: Some(vec!["rust".into(), "systems".into()]),
        }
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  RustConf 2024: The Future!  "), "rustconf-2024-the-future");
        assert_eq!(slugify("a  -  b"), "a-b");
        assert_eq!(slugify("--Leading and trailing--"), "leading-and-trailing");
        assert_eq!(slugify("snake_case_title"), "snakecasetitle");
        assert_eq!(slugify("Café Night"), "caf-night");
    }

    #[test]
    fn test_slugify_output_shape() {
        let titles = [
            "Hello World",
            "  --multiple---hyphens--  ",
            "Tabs\tand\nnewlines",
            "Ünïcödé & symbols #1",
            "!!!",
            "",
            "-",
            "2024",
        ];
        for title in titles {
            let slug = slugify(title);
            assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'), "{slug}");
            assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug}");
            assert!(!slug.contains("--"), "{slug}");
            assert_eq!(slugify(&slug), slug, "not idempotent for {title:?}");
            if !slug.is_empty() {
                assert!(is_valid_slug(&slug));
            }
        }
    }

    #[test]
    fn test_empty_slug_rejected() {
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(derive_slug("!!! ???"), Err(NormalizeError::EmptySlug));
        assert_eq!(derive_slug("Ok 1").unwrap(), "ok-1");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("my-test-event"));
        assert!(is_valid_slug("event2024"));
        assert!(!is_valid_slug("My-Event"));
        assert!(!is_valid_slug("-event"));
        assert!(!is_valid_slug("a--b"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_canonical_date_is_identity() {
        for d in ["2024-03-05", "1999-12-31", "2024-02-29"] {
            assert_eq!(normalize_date(d).unwrap(), d);
        }
    }

    #[test]
    fn test_alternative_dates_converted() {
        assert_eq!(normalize_date("March 5, 2024").unwrap(), "2024-03-05");
        assert_eq!(normalize_date("Mar 5, 2024").unwrap(), "2024-03-05");
        assert_eq!(normalize_date("5 March 2024").unwrap(), "2024-03-05");
        assert_eq!(normalize_date("2024/03/05").unwrap(), "2024-03-05");
        assert_eq!(normalize_date("03/05/2024").unwrap(), "2024-03-05");
        assert_eq!(normalize_date("2024-03-05 18:00").unwrap(), "2024-03-05");
        assert_eq!(normalize_date("Tue, 5 Mar 2024 10:00:00 +0000").unwrap(), "2024-03-05");
    }

    #[test]
    fn test_date_keeps_calendar_day_of_offset() {
        assert_eq!(normalize_date("2024-03-05T23:30:00-08:00").unwrap(), "2024-03-05");
        assert_eq!(normalize_date("2024-03-05T00:15:00+09:00").unwrap(), "2024-03-05");
    }

    #[test]
    fn test_invalid_dates_rejected() {
        for d in ["not a date", "", "2024-13-45", "2023-02-29", "32/01/2024"] {
            assert_eq!(normalize_date(d), Err(NormalizeError::InvalidDate), "{d}");
        }
    }

    #[test]
    fn test_time_conversion() {
        assert_eq!(normalize_time("2:30 PM").unwrap(), "14:30");
        assert_eq!(normalize_time("12:00 AM").unwrap(), "00:00");
        assert_eq!(normalize_time("12:00 PM").unwrap(), "12:00");
        assert_eq!(normalize_time("9:05am").unwrap(), "09:05");
        assert_eq!(normalize_time("11:59 pm").unwrap(), "23:59");
    }

    #[test]
    fn test_canonical_time_is_identity() {
        assert_eq!(normalize_time("23:59").unwrap(), "23:59");
        assert_eq!(normalize_time("00:00").unwrap(), "00:00");
        assert_eq!(normalize_time(" 08:30 ").unwrap(), "08:30");
    }

    #[test]
    fn test_invalid_times_rejected() {
        for t in ["25:00", "9:30", "13:00 PM", "0:30 AM", "10:60 AM", "noon", ""] {
            assert_eq!(normalize_time(t), Err(NormalizeError::InvalidTime), "{t}");
        }
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        for t in ["1٢:3٠", "١٢:٣٠", "٢:30 PM"] {
            assert_eq!(normalize_time(t), Err(NormalizeError::InvalidTime), "{t}");
        }
        for d in ["٢٠٢٤-٠٣-٠٥", "2024-0٣-05"] {
            assert_eq!(normalize_date(d), Err(NormalizeError::InvalidDate), "{d}");
        }
    }

    #[test]
    fn test_mode_validation() {
        assert_eq!(normalize_mode("Online").unwrap(), "online");
        assert_eq!(normalize_mode(" HYBRID ").unwrap(), "hybrid");
        assert_eq!(normalize_mode("virtual"), Err(NormalizeError::InvalidMode("virtual".into())));
    }

    #[test]
    fn test_non_empty_sequences() {
        assert!(require_non_empty(vec![], "At least one tag is required").is_err());
        assert!(require_non_empty(vec!["  ".into()], "At least one tag is required").is_err());
        assert_eq!(require_non_empty(vec![" a ".into()], "x").unwrap(), vec!["a".to_string()]);
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM ").unwrap(), "jane.doe@example.com");
        assert_eq!(normalize_email("no-at-sign.com"), Err(NormalizeError::InvalidEmail));
        assert_eq!(normalize_email("a@b"), Err(NormalizeError::InvalidEmail));
        assert_eq!(normalize_email("jösé@exämple.com"), Err(NormalizeError::InvalidEmail));
    }

    #[test]
    fn test_build_event_normalizes_everything() {
        let event = build_event(full_input()).unwrap();
        assert_eq!(event.title, "RustConf 2024: The Future!");
        assert_eq!(event.slug, "rustconf-2024-the-future");
        assert_eq!(event.date, "2024-03-05");
        assert_eq!(event.time, "14:30");
        assert_eq!(event.mode, "hybrid");
        assert_eq!(event.agenda.0, vec!["Keynote".to_string(), "Lunch".to_string()]);
        assert_eq!(event.created_at, event.updated_at);
    }

    #[test]
    fn test_build_event_requires_fields() {
        let mut input = full_input();
        input.venue = Some("   ".into());
        assert_eq!(build_event(input).unwrap_err(), NormalizeError::Required("Venue is required"));

        let mut input = full_input();
        input.tags = Some(vec![]);
        assert_eq!(build_event(input).unwrap_err(), NormalizeError::EmptySequence("At least one tag is required"));

        let mut input = full_input();
        input.agenda = None;
        assert_eq!(build_event(input).unwrap_err(), NormalizeError::Required("Agenda is required"));
    }

    #[test]
    fn test_partial_update_only_touches_written_fields() {
        let mut event = build_event(full_input()).unwrap();
        event.slug = "custom-slug".into();

        let patch = EventInput {
            description: Some("Updated".into()),
            ..Default::default()
        };
        let updated = apply_event_changes(event, patch).unwrap();
        assert_eq!(updated.slug, "custom-slug");
        assert_eq!(updated.description, "Updated");
        assert_eq!(updated.time, "14:30");
    }

    #[test]
    fn test_partial_update_same_title_keeps_slug() {
        let mut event = build_event(full_input()).unwrap();
        event.slug = "custom-slug".into();

        let patch = EventInput {
            title: Some("RustConf 2024: The Future!".into()),
            ..Default::default()
        };
        assert_eq!(apply_event_changes(event, patch).unwrap().slug, "custom-slug");
    }

    #[test]
    fn test_partial_update_rederives_and_normalizes() {
        let event = build_event(full_input()).unwrap();
        let patch = EventInput {
            title: Some("New Title".into()),
            date: Some("April 1, 2025".into()),
            time: Some("12:00 AM".into()),
            mode: Some("OFFLINE".into()),
            ..Default::default()
        };
        let updated = apply_event_changes(event, patch).unwrap();
        assert_eq!(updated.slug, "new-title");
        assert_eq!(updated.date, "2025-04-01");
        assert_eq!(updated.time, "00:00");
        assert_eq!(updated.mode, "offline");
    }

    #[test]
    fn test_partial_update_rejects_bad_values() {
        let event = build_event(full_input()).unwrap();
        let patch = EventInput { time: Some("25:00".into()), ..Default::default() };
        assert_eq!(apply_event_changes(event.clone(), patch).unwrap_err(), NormalizeError::InvalidTime);

        let patch = EventInput { agenda: Some(vec![]), ..Default::default() };
        assert!(apply_event_changes(event, patch).is_err());
    }
}
