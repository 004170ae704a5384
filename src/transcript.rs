//! Transcript block segmentation
//!
//! Parses a word-timed transcription payload into fixed-duration display
//! blocks aligned to playback time. A block boundary occurs only at a word
//! whose start time exceeds the current block's start by more than the block
//! duration; untimed items (punctuation) never open a new block. Words
//! matching the redaction indicator token are masked.
//!
//! The transcription pipeline emits numeric fields as JSON strings; the
//! payload types here accept either strings or numbers.

use serde::{Deserialize, Deserializer};

use crate::config::NamingConfig;
use crate::{Error, Result};

/// Whole transcription payload
#[derive(Debug, Deserialize)]
pub struct TranscriptionPayload {
    pub results: TranscriptionResults,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionResults {
    #[serde(default)]
    pub items: Vec<TranscriptionItem>,
}

/// One lexical item: a timed pronunciation or an untimed punctuation mark
#[derive(Debug, Deserialize)]
pub struct TranscriptionItem {
    /// `pronunciation` for spoken words; anything else is punctuation
    #[serde(rename = "type")]
    pub item_type: String,
    /// Ranked alternatives; the first is the best one
    #[serde(default)]
    pub alternatives: Vec<TranscriptionAlternative>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub start_time: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub end_time: Option<f64>,
}

impl TranscriptionItem {
    fn is_pronunciation(&self) -> bool {
        self.item_type == "pronunciation"
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionAlternative {
    pub content: String,
    /// 0.0 to 1.0
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub confidence: Option<f64>,
}

/// Accept `"1.23"`, `1.23`, or absent
fn de_opt_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
    })
}

/// One display word inside a block
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptWord {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub is_redacted: bool,
    /// Whether this was a spoken word rather than punctuation
    pub is_pronunciation: bool,
    /// Display text; redacted words show a fixed mask
    pub text: String,
    /// Hover text: quoted content, plus confidence for spoken words
    pub confidence_label: String,
}

/// A contiguous run of words spanning at most the block duration
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptBlock {
    /// Display timestamp, `mm:ss` below one hour, `hh:mm` above
    pub id: String,
    pub start_time: f64,
    /// End time of the last timed word in the block
    pub end_time: Option<f64>,
    pub words: Vec<TranscriptWord>,
}

/// Parse a raw transcription payload and segment it into display blocks
pub fn parse_and_segment(bytes: &[u8], naming: &NamingConfig) -> Result<Vec<TranscriptBlock>> {
    let payload: TranscriptionPayload =
        serde_json::from_slice(bytes).map_err(Error::Payload)?;
    Ok(segment(&payload, naming))
}

/// Segment an already-parsed payload.
///
/// Blocks partition the item sequence in original order. The trailing
/// in-progress block is flushed at end of input, so every word appears in
/// exactly one block.
pub fn segment(payload: &TranscriptionPayload, naming: &NamingConfig) -> Vec<TranscriptBlock> {
    let mut blocks = Vec::new();
    let mut current_words: Vec<TranscriptWord> = Vec::new();
    let mut last_start_time = 0.0_f64;

    for item in &payload.results.items {
        // Boundary check precedes the append, so the triggering word opens
        // the new block. Untimed items can never trigger a boundary.
        if let Some(start_time) = item.start_time {
            if start_time > last_start_time + naming.block_seconds {
                blocks.push(close_block(last_start_time, &mut current_words));
                last_start_time = start_time;
            }
        }
        current_words.push(project_word(item, naming));
    }

    if !current_words.is_empty() {
        blocks.push(close_block(last_start_time, &mut current_words));
    }

    blocks
}

/// Drain the accumulated words into a finished block
fn close_block(start_time: f64, words: &mut Vec<TranscriptWord>) -> TranscriptBlock {
    let words = std::mem::take(words);
    let end_time = words.iter().rev().find_map(|word| word.end_time);
    TranscriptBlock {
        id: format_block_timestamp(start_time),
        start_time,
        end_time,
        words,
    }
}

fn project_word(item: &TranscriptionItem, naming: &NamingConfig) -> TranscriptWord {
    let is_pronunciation = item.is_pronunciation();
    let (content, confidence) = match item.alternatives.first() {
        Some(alternative) => (
            alternative.content.as_str(),
            alternative.confidence.unwrap_or(0.0),
        ),
        None => ("", 0.0),
    };
    let is_redacted = content == naming.redaction_indicator;

    let confidence_label = if !is_pronunciation {
        format!("\"{}\"", content)
    } else if is_redacted {
        "Redacted".to_string()
    } else {
        format!(
            "\"{}\" Confidence: {}%",
            content,
            (confidence * 100.0).round() as i64
        )
    };

    TranscriptWord {
        start_time: item.start_time,
        end_time: item.end_time,
        is_redacted,
        is_pronunciation,
        text: if is_redacted {
            "REDACTED".to_string()
        } else {
            content.to_string()
        },
        confidence_label,
    }
}

/// Format a block start for display: `mm:ss` below one hour, `hh:mm` above
fn format_block_timestamp(seconds: f64) -> String {
    let total = ((seconds * 1000.0).round() as i64) / 1000;
    if seconds < 3600.0 {
        format!("{:02}:{:02}", total / 60, total % 60)
    } else {
        format!("{:02}:{:02}", total / 3600, (total % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pronunciation(content: &str, start: Option<f64>, confidence: f64) -> TranscriptionItem {
        TranscriptionItem {
            item_type: "pronunciation".to_string(),
            alternatives: vec![TranscriptionAlternative {
                content: content.to_string(),
                confidence: Some(confidence),
            }],
            start_time: start,
            end_time: start.map(|s| s + 0.4),
        }
    }

    fn punctuation(content: &str) -> TranscriptionItem {
        TranscriptionItem {
            item_type: "punctuation".to_string(),
            alternatives: vec![TranscriptionAlternative {
                content: content.to_string(),
                confidence: None,
            }],
            start_time: None,
            end_time: None,
        }
    }

    fn payload(items: Vec<TranscriptionItem>) -> TranscriptionPayload {
        TranscriptionPayload {
            results: TranscriptionResults { items },
        }
    }

    #[test]
    fn untimed_input_yields_a_single_block_in_order() {
        let naming = NamingConfig::default();
        let blocks = segment(
            &payload(vec![
                punctuation(","),
                punctuation("."),
                punctuation("?"),
            ]),
            &naming,
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, "00:00");
        let texts: Vec<&str> = blocks[0].words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec![",", ".", "?"]);
    }

    #[test]
    fn boundaries_compare_against_current_block_start() {
        let naming = NamingConfig::default();
        let blocks = segment(
            &payload(vec![
                pronunciation("zero", Some(0.0), 0.99),
                pronunciation("five", Some(5.0), 0.99),
                pronunciation("eleven", Some(11.0), 0.99),
                pronunciation("twentyfive", Some(25.0), 0.99),
            ]),
            &naming,
        );
        // 11 > 0 + 10 opens the second block; 25 > 11 + 10 opens the third
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].id, "00:00");
        assert_eq!(blocks[0].words.len(), 2);
        assert_eq!(blocks[1].id, "00:11");
        assert_eq!(blocks[1].words.len(), 1);
        assert_eq!(blocks[1].start_time, 11.0);
        assert_eq!(blocks[2].id, "00:25");
        assert_eq!(blocks[2].words[0].text, "twentyfive");
    }

    #[test]
    fn word_just_inside_the_window_stays_in_the_block() {
        let naming = NamingConfig::default();
        let blocks = segment(
            &payload(vec![
                pronunciation("start", Some(0.0), 0.9),
                // exactly at the threshold: not strictly greater, no boundary
                pronunciation("edge", Some(10.0), 0.9),
                pronunciation("over", Some(10.01), 0.9),
            ]),
            &naming,
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].words.len(), 2);
        assert_eq!(blocks[1].words.len(), 1);
    }

    #[test]
    fn punctuation_never_triggers_a_boundary() {
        let naming = NamingConfig::default();
        let blocks = segment(
            &payload(vec![
                pronunciation("one", Some(0.0), 0.9),
                punctuation("."),
                pronunciation("late", Some(30.0), 0.9),
                punctuation("!"),
            ]),
            &naming,
        );
        assert_eq!(blocks.len(), 2);
        // The trailing punctuation lands in the flushed final block
        assert_eq!(blocks[1].words.len(), 2);
    }

    #[test]
    fn redacted_words_are_masked() {
        let naming = NamingConfig::default();
        let blocks = segment(
            &payload(vec![pronunciation("[PII]", Some(1.0), 0.97)]),
            &naming,
        );
        let word = &blocks[0].words[0];
        assert!(word.is_redacted);
        assert_eq!(word.text, "REDACTED");
        assert_eq!(word.confidence_label, "Redacted");
    }

    #[test]
    fn confidence_labels() {
        let naming = NamingConfig::default();
        let blocks = segment(
            &payload(vec![
                pronunciation("hello", Some(0.5), 0.987),
                punctuation("."),
            ]),
            &naming,
        );
        assert_eq!(
            blocks[0].words[0].confidence_label,
            "\"hello\" Confidence: 99%"
        );
        assert_eq!(blocks[0].words[1].confidence_label, "\".\"");
    }

    #[test]
    fn block_timestamps_switch_to_hours_past_one_hour() {
        assert_eq!(format_block_timestamp(0.0), "00:00");
        assert_eq!(format_block_timestamp(65.0), "01:05");
        assert_eq!(format_block_timestamp(3599.0), "59:59");
        assert_eq!(format_block_timestamp(3725.0), "01:02");
    }

    #[test]
    fn block_end_time_comes_from_last_timed_word() {
        let naming = NamingConfig::default();
        let blocks = segment(
            &payload(vec![
                pronunciation("one", Some(0.0), 0.9),
                pronunciation("two", Some(2.0), 0.9),
                punctuation("."),
            ]),
            &naming,
        );
        assert_eq!(blocks[0].end_time, Some(2.4));
    }

    #[test]
    fn parses_stringly_typed_pipeline_output() {
        let naming = NamingConfig::default();
        let raw = br#"{
            "results": {
                "items": [
                    {
                        "type": "pronunciation",
                        "alternatives": [{"content": "hello", "confidence": "0.9512"}],
                        "start_time": "0.04",
                        "end_time": "0.53"
                    },
                    {
                        "type": "punctuation",
                        "alternatives": [{"content": "."}]
                    },
                    {
                        "type": "pronunciation",
                        "alternatives": [{"content": "[PII]", "confidence": "0.88"}],
                        "start_time": "12.1",
                        "end_time": "12.7"
                    }
                ]
            }
        }"#;
        let blocks = parse_and_segment(raw, &naming).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].words[0].text, "hello");
        assert_eq!(blocks[0].words[0].start_time, Some(0.04));
        assert_eq!(
            blocks[0].words[0].confidence_label,
            "\"hello\" Confidence: 95%"
        );
        assert_eq!(blocks[0].id, "00:00");
        assert_eq!(blocks[1].id, "00:12");
        assert!(blocks[1].words[0].is_redacted);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let naming = NamingConfig::default();
        assert!(parse_and_segment(b"not json", &naming).is_err());
    }

    #[test]
    fn empty_payload_yields_no_blocks() {
        let naming = NamingConfig::default();
        let blocks = segment(&payload(vec![]), &naming);
        assert!(blocks.is_empty());
    }
}
