//! Conversion logic between domain entities and wire DTOs.

use charla_shared::time::timestamp_to_clock_time;

use crate::domain::{HistoryEntry, UserName};
use crate::infrastructure::dto::wire::{HistoryItem, ServerEvent};
use crate::infrastructure::framing::MAX_FRAME_LEN;

/// Ceiling for one serialized `history` frame, in bytes.
///
/// Half the codec's frame limit: a full replay of maximum-length messages
/// split at this budget always encodes, on both ends of the wire.
pub const HISTORY_FRAME_BUDGET: usize = MAX_FRAME_LEN / 2;

impl From<HistoryEntry> for HistoryItem {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            time: timestamp_to_clock_time(entry.timestamp().value()),
            from: entry.sender().to_string(),
            msg: entry.text().as_str().to_string(),
        }
    }
}

/// Render a roster snapshot as the plain string list the `users` event
/// carries
pub fn roster_to_list(names: Vec<UserName>) -> Vec<String> {
    names.into_iter().map(UserName::into_string).collect()
}

/// Serialize a history snapshot as one or more `history` frames, each kept
/// under `budget` bytes.
///
/// Items keep their order across frames. An empty snapshot still yields one
/// empty frame, so a logging-in client always receives a `history` event. A
/// single item larger than the budget gets a frame of its own.
pub fn history_to_frames(items: Vec<HistoryItem>, budget: usize) -> Vec<String> {
    let empty_frame = serialize_history(Vec::new());
    if items.is_empty() {
        return vec![empty_frame];
    }
    let envelope_len = empty_frame.len();

    let mut frames = Vec::new();
    let mut chunk: Vec<HistoryItem> = Vec::new();
    let mut payload_len = envelope_len;

    for item in items {
        // the serialized item plus its separating comma
        let item_len = serde_json::to_string(&item).unwrap().len() + 1;
        if !chunk.is_empty() && payload_len + item_len > budget {
            frames.push(serialize_history(std::mem::take(&mut chunk)));
            payload_len = envelope_len;
        }
        chunk.push(item);
        payload_len += item_len;
    }
    if !chunk.is_empty() {
        frames.push(serialize_history(chunk));
    }

    frames
}

fn serialize_history(items: Vec<HistoryItem>) -> String {
    serde_json::to_string(&ServerEvent::History { items }).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageText, Timestamp};

    #[test]
    fn test_history_entry_to_item() {
        // given: an entry stamped 2023-01-01 12:34:56 UTC
        let entry = HistoryEntry::new(
            UserName::new("Ana").unwrap(),
            MessageText::new("hola").unwrap(),
            Timestamp::new(1672576496000),
        );

        // when:
        let item: HistoryItem = entry.into();

        // then:
        assert_eq!(item.time, "12:34:56");
        assert_eq!(item.from, "Ana");
        assert_eq!(item.msg, "hola");
    }

    #[test]
    fn test_roster_to_list_preserves_order() {
        // given:
        let names = vec![
            UserName::new("Ana").unwrap(),
            UserName::new("Bo").unwrap(),
            UserName::new("Cy").unwrap(),
        ];

        // when:
        let list = roster_to_list(names);

        // then:
        assert_eq!(list, vec!["Ana", "Bo", "Cy"]);
    }

    fn item(msg: impl Into<String>) -> HistoryItem {
        HistoryItem {
            time: "12:00:00".to_string(),
            from: "Ana".to_string(),
            msg: msg.into(),
        }
    }

    /// Parse frames back and flatten the replayed message bodies, in order
    fn replayed_msgs(frames: &[String]) -> Vec<String> {
        frames
            .iter()
            .flat_map(|frame| {
                let value: serde_json::Value = serde_json::from_str(frame).unwrap();
                assert_eq!(value["cmd"], "history");
                value["items"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|item| item["msg"].as_str().unwrap().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn test_history_to_frames_empty_history_yields_one_empty_frame() {
        // given:
        let items = Vec::new();

        // when:
        let frames = history_to_frames(items, HISTORY_FRAME_BUDGET);

        // then: the login sequence still carries its history event
        assert_eq!(frames, vec![r#"{"cmd":"history","items":[]}"#.to_string()]);
    }

    #[test]
    fn test_history_to_frames_keeps_a_small_replay_in_one_frame() {
        // given:
        let items = vec![item("a1"), item("a2"), item("a3")];

        // when:
        let frames = history_to_frames(items, HISTORY_FRAME_BUDGET);

        // then:
        assert_eq!(frames.len(), 1);
        assert_eq!(replayed_msgs(&frames), vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn test_history_to_frames_splits_the_replay_at_the_budget() {
        // given: five 100-character messages against a 400-byte budget
        let bodies: Vec<String> = (1..=5).map(|i| format!("m{}{}", i, "x".repeat(98))).collect();
        let items: Vec<HistoryItem> = bodies.iter().cloned().map(item).collect();

        // when:
        let frames = history_to_frames(items, 400);

        // then: several frames, each within the budget, order intact
        assert!(frames.len() > 1, "expected a split, got {} frame(s)", frames.len());
        assert!(frames.iter().all(|frame| frame.len() <= 400));
        assert_eq!(replayed_msgs(&frames), bodies);
    }

    #[test]
    fn test_history_to_frames_worst_case_replay_fits_the_codec_ceiling() {
        // given: a full ring of maximum-length messages that double in size
        // when JSON-escaped
        let body = "\"".repeat(MessageText::MAX_LEN);
        let items: Vec<HistoryItem> = (0..100).map(|_| item(body.clone())).collect();

        // when:
        let frames = history_to_frames(items, HISTORY_FRAME_BUDGET);

        // then: every frame stays encodable and nothing is lost
        assert!(frames.len() > 1);
        assert!(frames.iter().all(|frame| frame.len() <= MAX_FRAME_LEN));
        assert_eq!(replayed_msgs(&frames).len(), 100);
    }

    #[test]
    fn test_history_to_frames_oversized_item_rides_alone() {
        // given: a budget no single item fits under
        let items = vec![item("first"), item("second")];

        // when:
        let frames = history_to_frames(items, 10);

        // then: one frame per item, order intact
        assert_eq!(frames.len(), 2);
        assert_eq!(replayed_msgs(&frames), vec!["first", "second"]);
    }
}
