//! The example conversation every session starts from, and the blank rows
//! appended by the "new user" / "new message" buttons.

use std::fs;
use std::path::Path;

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::error::SeedError;
use crate::model::{HexColor, Message, User};

/// Author colours offered by the editor (green, blue, pink, sand, beige, purple).
pub const PALETTE: [[u8; 3]; 6] = [
    [37, 195, 97],
    [53, 152, 229],
    [226, 106, 182],
    [203, 144, 106],
    [219, 163, 55],
    [106, 129, 242],
];

/// `[r, g, b]` to lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: [u8; 3]) -> HexColor {
    HexColor::new(format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]))
}

/// Palette entries as hex strings, in palette order.
pub fn palette_hex() -> Vec<HexColor> {
    PALETTE.iter().copied().map(rgb_to_hex).collect()
}

/// Users and messages a session is seeded with.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Seed {
    pub users: Vec<User>,
    pub messages: Vec<Message>,
}

fn now_iso() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Row added by "new user".
pub fn user_template() -> User {
    User::new("+5500123456789", "#000000")
}

/// Row added by "new message": empty, unassigned, stamped with the current time.
pub fn message_template() -> Message {
    Message::new("", now_iso())
}

/// Built-in two-person exchange where each reply quotes the message before it.
pub fn example() -> Seed {
    let now = now_iso();
    let users = vec![
        User::new("+5521987654321", rgb_to_hex(PALETTE[0]))
            .with_saved_name("Assessor de gabinete")
            .with_picture("https://br.web.img3.acsta.net/pictures/18/07/25/22/08/5179819.jpg"),
        User::new("+5521912345678", rgb_to_hex(PALETTE[1]))
            .with_original_name("Político aleatório")
            .with_picture(
                "https://br.web.img3.acsta.net/c_310_420/medias/nmedia/18/95/02/75/20372972.jpg",
            ),
    ];
    let messages = vec![
        Message::new(
            "Chefe, perdi a cópia do projeto de lei que será votado semana que vem.",
            now.as_str(),
        )
        .by(0),
        Message::new("Sabe o que significa né?", now.as_str())
            .by(1)
            .mentioning(0),
        Message::new("Não, o quê?", now.as_str()).by(0).mentioning(1),
        Message::new("Que você tem uma semana pra achar isso kkk", now.as_str())
            .by(1)
            .mentioning(2),
    ];
    Seed { users, messages }
}

/// Read a seed conversation from a JSON file (`{"users": [...], "messages": [...]}`).
pub fn load_seed(path: &Path) -> Result<Seed, SeedError> {
    let content = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_seed(&content)
}

pub fn parse_seed(content: &str) -> Result<Seed, SeedError> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reaction;
    use std::io::Write;

    #[test]
    fn test_rgb_to_hex_pads() {
        assert_eq!(rgb_to_hex([37, 195, 97]).as_str(), "#25c361");
        assert_eq!(rgb_to_hex([0, 10, 255]).as_str(), "#000aff");
    }

    #[test]
    fn test_palette_round_trips_through_hex() {
        for (hex, rgb) in palette_hex().iter().zip(PALETTE) {
            assert_eq!(hex.to_rgb(), Some(rgb));
        }
    }

    #[test]
    fn test_example_mentions_point_backwards() {
        let seed = example();
        assert_eq!(seed.users.len(), 2);
        assert_eq!(seed.messages.len(), 4);
        for (i, message) in seed.messages.iter().enumerate() {
            assert!(message.user_index.unwrap() < seed.users.len());
            if let Some(mention) = message.mention_index {
                assert_eq!(mention + 1, i);
            }
        }
    }

    #[test]
    fn test_templates() {
        assert!(message_template().is_draft());
        assert!(message_template().contents.is_empty());
        assert_eq!(user_template().color.as_str(), "#000000");
    }

    #[test]
    fn test_parse_seed_generates_missing_ids() {
        let seed = parse_seed(
            r##"{
                "users": [{"cellphone": "+1", "color": "#ffffff"}],
                "messages": [
                    {"contents": "a", "timestamp": "2024-01-01T10:00:00Z", "userIndex": 0,
                     "reactions": [{"value": "👍", "amount": 3}]},
                    {"contents": "b", "timestamp": "2024-01-01T10:01:00Z", "userIndex": -1, "mentionIndex": 0}
                ]
            }"##,
        )
        .unwrap();
        assert_eq!(seed.users.len(), 1);
        assert_ne!(seed.messages[0].id, seed.messages[1].id);
        assert!(seed.messages[1].is_draft());
        assert_eq!(seed.messages[1].mention_index, Some(0));
        assert_eq!(
            seed.messages[0].reactions,
            vec![Reaction {
                value: "👍".into(),
                amount: 3
            }]
        );
        assert!(seed.messages[1].reactions.is_empty());
    }

    #[test]
    fn test_load_seed_errors() {
        let missing = load_seed(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(SeedError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(load_seed(file.path()), Err(SeedError::Json(_))));
    }
}
