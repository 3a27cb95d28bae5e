//! Turns the flat users/messages tables into a displayable conversation.
//!
//! Resolution is a pure function of its inputs and is rerun in full after
//! every edit. References that no longer resolve (deleted authors, quoted
//! messages that moved, unparseable timestamps) never fail the pass: the
//! affected decoration is left out and a [`ResolveIssue`] is recorded.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::ResolveIssue;
use crate::model::{HexColor, Message, Reaction, User};

/// Shown instead of the time when a timestamp cannot be parsed.
pub const TIME_PLACEHOLDER: &str = "--:--";

/// Offset-carrying layouts RFC 3339 rejects, such as `09:07Z` without seconds.
/// `%#z` takes `Z`, `+01`, `+0100` and `+01:00`.
const OFFSET_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%d %H:%M:%S%#z",
];

/// Naive layouts accepted in addition to RFC 3339, read in the display zone.
const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Everything needed to draw a user's name above a bubble.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AuthorLabel {
    pub user_id: Uuid,
    pub primary: String,
    /// "Also known as" name, only for unsaved contacts.
    pub secondary: Option<String>,
    pub color: HexColor,
    pub picture: Option<String>,
}

impl AuthorLabel {
    fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            primary: user.primary_label().to_string(),
            secondary: user.secondary_label().map(str::to_string),
            color: user.color.clone(),
            picture: user.picture.clone(),
        }
    }
}

/// The quoted excerpt shown inside a bubble that replies to another message.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MentionQuote {
    pub message_id: Uuid,
    pub position: usize,
    pub author: AuthorLabel,
    pub contents: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    pub message_id: Uuid,
    /// Position in the full messages table.
    pub position: usize,
    pub author_index: usize,
    pub author: AuthorLabel,
    /// Sent by the viewer; drawn on the opposite side.
    pub is_viewer_message: bool,
    /// First bubble of a run by the same author (extra top margin).
    pub starts_group: bool,
    /// `HH:MM`, or [`TIME_PLACEHOLDER`].
    pub time: String,
    pub contents: String,
    pub reactions: Vec<Reaction>,
    pub mention: Option<MentionQuote>,
}

/// Output of one resolution pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Thread {
    pub messages: Vec<RenderedMessage>,
    pub issues: Vec<ResolveIssue>,
}

/// Resolve the conversation using the local timezone for display times.
pub fn resolve_thread(users: &[User], messages: &[Message], viewer_index: usize) -> Thread {
    resolve_thread_in(users, messages, viewer_index, &Local)
}

/// Resolve the conversation, formatting times in `tz`.
pub fn resolve_thread_in<Tz>(
    users: &[User],
    messages: &[Message],
    viewer_index: usize,
    tz: &Tz,
) -> Thread
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut thread = Thread::default();
    let mut previous_author: Option<usize> = None;

    for (position, message) in messages.iter().enumerate() {
        // Drafts have no author yet and are never shown.
        let Some(author_index) = message.user_index else {
            continue;
        };
        let Some(author) = users.get(author_index) else {
            thread.issues.push(ResolveIssue::DanglingAuthor {
                message: message.id,
                user_index: author_index,
            });
            continue;
        };

        let starts_group = previous_author != Some(author_index);
        previous_author = Some(author_index);

        let mention = message.mention_index.and_then(|mention_index| {
            let quote = resolve_mention(users, messages, position, mention_index);
            if quote.is_none() {
                thread.issues.push(ResolveIssue::DanglingMention {
                    message: message.id,
                    mention_index,
                });
            }
            quote
        });

        let time = format_time(&message.timestamp, tz).unwrap_or_else(|| {
            thread.issues.push(ResolveIssue::MalformedTimestamp {
                message: message.id,
                raw: message.timestamp.clone(),
            });
            TIME_PLACEHOLDER.to_string()
        });

        thread.messages.push(RenderedMessage {
            message_id: message.id,
            position,
            author_index,
            author: AuthorLabel::from_user(author),
            is_viewer_message: author_index == viewer_index,
            starts_group,
            time,
            contents: message.contents.clone(),
            reactions: message.reactions.clone(),
            mention,
        });
    }

    for issue in &thread.issues {
        debug!(%issue, "degraded thread reference");
    }
    thread
}

/// Look up the quoted message by its absolute position. Only strictly
/// earlier messages with a resolvable author qualify.
fn resolve_mention(
    users: &[User],
    messages: &[Message],
    position: usize,
    mention_index: usize,
) -> Option<MentionQuote> {
    if mention_index >= position {
        return None;
    }
    let quoted = messages.get(mention_index)?;
    let author = users.get(quoted.user_index?)?;
    Some(MentionQuote {
        message_id: quoted.id,
        position: mention_index,
        author: AuthorLabel::from_user(author),
        contents: quoted.contents.clone(),
    })
}

/// Format an ISO-8601 timestamp as zero-padded 24-hour `HH:MM` in `tz`.
pub fn format_time<Tz>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let raw = raw.trim();
    let with_offset = DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|layout| DateTime::parse_from_str(raw, layout).ok())
    });
    if let Some(parsed) = with_offset {
        return Some(parsed.with_timezone(tz).format("%H:%M").to_string());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        // A bare date is midnight in the display zone.
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|local| local.format("%H:%M").to_string())
}

/// Messages a message at `index` may quote: every earlier one.
pub fn mention_targets(messages: &[Message], index: usize) -> Vec<(usize, &str)> {
    messages
        .iter()
        .take(index)
        .enumerate()
        .map(|(position, message)| (position, message.contents.as_str()))
        .collect()
}

/// Choices for a message's author picker.
pub fn author_options(users: &[User]) -> Vec<(usize, &str, &HexColor)> {
    users
        .iter()
        .enumerate()
        .map(|(position, user)| (position, user.picker_label(), &user.color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use chrono::{FixedOffset, Utc};
    use proptest::prelude::*;

    const TS: &str = "2024-03-05T09:07:00Z";

    fn pair() -> Vec<User> {
        vec![
            User::new("+1", "#25c361").with_saved_name("A"),
            User::new("+2", "#3598e5").with_original_name("B"),
        ]
    }

    #[test]
    fn test_two_user_mention_scenario() {
        let users = pair();
        let messages = vec![
            Message::new("hi", TS).by(0),
            Message::new("hey back", TS).by(1).mentioning(0),
        ];

        let thread = resolve_thread_in(&users, &messages, 1, &Utc);
        assert_eq!(thread.messages.len(), 2);
        assert!(thread.issues.is_empty());

        let first = &thread.messages[0];
        assert!(!first.is_viewer_message);
        assert!(first.starts_group);
        assert_eq!(first.author.primary, "A");

        let second = &thread.messages[1];
        assert!(second.is_viewer_message);
        assert!(second.starts_group);
        assert_eq!(second.author.primary, "+2");
        assert_eq!(second.author.secondary.as_deref(), Some("B"));
        let quote = second.mention.as_ref().unwrap();
        assert_eq!(quote.author.user_id, users[0].id);
        assert_eq!(quote.contents, "hi");
        assert_eq!(quote.position, 0);
    }

    #[test]
    fn test_consecutive_messages_continue_group() {
        let users = pair();
        let messages = vec![
            Message::new("one", TS).by(0),
            Message::new("two", TS).by(0),
            Message::new("three", TS).by(1),
        ];
        let flags: Vec<bool> = resolve_thread_in(&users, &messages, 0, &Utc)
            .messages
            .iter()
            .map(|m| m.starts_group)
            .collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_grouping_ignores_dropped_messages() {
        let users = pair();
        let messages = vec![
            Message::new("one", TS).by(0),
            Message::new("draft", TS),
            Message::new("ghost", TS).by(9),
            Message::new("two", TS).by(0),
        ];
        let thread = resolve_thread_in(&users, &messages, 1, &Utc);
        assert_eq!(thread.messages.len(), 2);
        assert!(!thread.messages[1].starts_group);
        assert_eq!(thread.messages[1].position, 3);
        assert_eq!(
            thread.issues,
            vec![ResolveIssue::DanglingAuthor {
                message: messages[2].id,
                user_index: 9
            }]
        );
    }

    #[test]
    fn test_deleted_author_drops_message() {
        let users = Collection::new(pair()).remove_at(0).unwrap();
        let users = users.remove_at(0).unwrap();
        let messages = vec![Message::new("hi", TS).by(0)];
        let thread = resolve_thread_in(users.as_slice(), &messages, 0, &Utc);
        assert!(thread.messages.is_empty());
        assert_eq!(thread.issues.len(), 1);
    }

    #[test]
    fn test_deleting_first_user_reattributes_by_position() {
        let users = Collection::new(pair()).remove_at(0).unwrap();
        let messages = vec![Message::new("hi", TS).by(0), Message::new("yo", TS).by(1)];
        let thread = resolve_thread_in(users.as_slice(), &messages, 0, &Utc);
        assert_eq!(thread.messages.len(), 1);
        assert_eq!(thread.messages[0].author.user_id, users.get(0).unwrap().id);
    }

    #[test]
    fn test_unresolvable_mentions_keep_message() {
        let users = pair();
        let messages = vec![
            Message::new("draft", TS),
            Message::new("quotes a draft", TS).by(0).mentioning(0),
            Message::new("quotes itself", TS).by(0).mentioning(2),
            Message::new("quotes the future", TS).by(1).mentioning(4),
            Message::new("quotes nothing", TS).by(1).mentioning(40),
        ];
        let thread = resolve_thread_in(&users, &messages, 0, &Utc);
        assert_eq!(thread.messages.len(), 4);
        assert!(thread.messages.iter().all(|m| m.mention.is_none()));
        assert_eq!(thread.issues.len(), 4);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(TS, &Utc).as_deref(), Some("09:07"));
        assert_eq!(
            format_time("2024-03-05T23:30:00.000Z", &FixedOffset::east_opt(3600).unwrap()).as_deref(),
            Some("00:30")
        );
        assert_eq!(format_time("2024-03-05 18:04", &Utc).as_deref(), Some("18:04"));
        assert_eq!(format_time("2024-03-05T07:05:09", &Utc).as_deref(), Some("07:05"));
        assert_eq!(format_time("yesterday", &Utc), None);
    }

    #[test]
    fn test_format_time_without_seconds_or_time() {
        let plus_one = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(format_time("2024-03-05T09:07Z", &Utc).as_deref(), Some("09:07"));
        assert_eq!(format_time("2024-03-05T09:07+01:00", &Utc).as_deref(), Some("08:07"));
        assert_eq!(format_time("2024-03-05T09:07+0100", &plus_one).as_deref(), Some("09:07"));
        assert_eq!(
            format_time("2024-03-05T09:07:30.250-02:00", &Utc).as_deref(),
            Some("11:07")
        );
        assert_eq!(format_time("2024-03-05", &Utc).as_deref(), Some("00:00"));
        assert_eq!(format_time("2024-03-05", &plus_one).as_deref(), Some("00:00"));
        assert_eq!(format_time("2024-03-05T25:00Z", &Utc), None);
    }

    #[test]
    fn test_minute_precision_timestamp_resolves_cleanly() {
        let users = pair();
        let messages = vec![Message::new("hi", "2024-03-05T09:07Z").by(0)];
        let thread = resolve_thread_in(&users, &messages, 0, &Utc);
        assert_eq!(thread.messages[0].time, "09:07");
        assert!(thread.issues.is_empty());
    }

    #[test]
    fn test_malformed_timestamp_renders_placeholder() {
        let users = pair();
        let messages = vec![Message::new("hi", "not a date").by(0)];
        let thread = resolve_thread_in(&users, &messages, 0, &Utc);
        assert_eq!(thread.messages[0].time, TIME_PLACEHOLDER);
        assert!(matches!(
            thread.issues[0],
            ResolveIssue::MalformedTimestamp { .. }
        ));
    }

    #[test]
    fn test_mention_targets_only_earlier() {
        let messages = vec![
            Message::new("a", TS).by(0),
            Message::new("b", TS).by(1),
            Message::new("c", TS).by(0),
        ];
        assert_eq!(mention_targets(&messages, 2), vec![(0, "a"), (1, "b")]);
        assert!(mention_targets(&messages, 0).is_empty());
        assert_eq!(mention_targets(&messages, 10).len(), 3);
    }

    #[test]
    fn test_author_options_labels() {
        let users = pair();
        let options = author_options(&users);
        assert_eq!(options[0].1, "A");
        assert_eq!(options[1].1, "B");
        assert_eq!(options[1].2.as_str(), "#3598e5");
    }

    fn arb_message() -> impl Strategy<Value = Message> {
        (
            proptest::option::of(0usize..6),
            proptest::option::of(0usize..10),
            prop_oneof![Just(TS), Just("garbage"), Just("2024-01-01 10:00")],
        )
            .prop_map(|(user_index, mention_index, ts)| {
                let mut message = Message::new("m", ts);
                message.user_index = user_index;
                message.mention_index = mention_index;
                message
            })
    }

    proptest! {
        #[test]
        fn prop_resolution_is_total(
            user_count in 0usize..5,
            messages in proptest::collection::vec(arb_message(), 0..12),
            viewer in 0usize..6,
        ) {
            let users: Vec<User> = (0..user_count)
                .map(|i| User::new(format!("+{i}"), "#000000"))
                .collect();
            let thread = resolve_thread_in(&users, &messages, viewer, &Utc);

            let expected = messages
                .iter()
                .filter(|m| m.user_index.is_some_and(|i| i < user_count))
                .count();
            prop_assert_eq!(thread.messages.len(), expected);

            for (i, rendered) in thread.messages.iter().enumerate() {
                let continues = i > 0 && thread.messages[i - 1].author_index == rendered.author_index;
                prop_assert_eq!(rendered.starts_group, !continues);
                prop_assert_eq!(rendered.is_viewer_message, rendered.author_index == viewer);
                if let Some(quote) = &rendered.mention {
                    prop_assert!(quote.position < rendered.position);
                }
            }
        }
    }
}
