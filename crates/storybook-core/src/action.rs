//! Actions consumed by the reducers.
//!
//! `Action` is the typed form the reducers match on. `RawAction` is the loose
//! wire form (JSON tagged by `type`) used by scripts; converting it validates
//! the payload so a reducer never sees a half-filled action.

use crate::model::{StoryId, Word};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SELECT_STORY_SUCCESS: &str = "SELECT_STORY_SUCCESS";
pub const MASTER_WORD_SUCCESS: &str = "MASTER_WORD_SUCCESS";
pub const SELECT_QUIZ_WORD_SUCCESS: &str = "SELECT_QUIZ_WORD_SUCCESS";
pub const CHANGE_CURRENT_SECTION: &str = "CHANGE_CURRENT_SECTION";
pub const ADVANCE_SECTION: &str = "ADVANCE_SECTION";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectStory { id: StoryId },
    MasterWord { word: Word, story_id: StoryId },
    SelectQuizWord { word: Option<Word> },
    ChangeCurrentSection { story_id: StoryId, idx: usize },
    AdvanceSection { story_id: StoryId },
    /// A kind no reducer knows; every slice passes it through untouched.
    Unrecognized { kind: String },
}

impl Action {
    pub fn kind(&self) -> &str {
        match self {
            Action::SelectStory { .. } => SELECT_STORY_SUCCESS,
            Action::MasterWord { .. } => MASTER_WORD_SUCCESS,
            Action::SelectQuizWord { .. } => SELECT_QUIZ_WORD_SUCCESS,
            Action::ChangeCurrentSection { .. } => CHANGE_CURRENT_SECTION,
            Action::AdvanceSection { .. } => ADVANCE_SECTION,
            Action::Unrecognized { kind } => kind,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("{kind} is missing required field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("{kind} field `{field}` is invalid: {reason}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        reason: String,
    },
    #[error("malformed action payload: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<Word>,
    #[serde(default, rename = "storyId", skip_serializing_if = "Option::is_none")]
    pub story_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idx: Option<i64>,
}

impl RawAction {
    pub fn parse(json: &str) -> Result<Action, ActionError> {
        let raw: RawAction =
            serde_json::from_str(json).map_err(|err| ActionError::Parse(err.to_string()))?;
        Action::try_from(raw)
    }

    /// Parse a JSON array of actions, failing on the first malformed one.
    pub fn parse_script(json: &str) -> Result<Vec<Action>, ActionError> {
        let raws: Vec<RawAction> =
            serde_json::from_str(json).map_err(|err| ActionError::Parse(err.to_string()))?;
        raws.into_iter().map(Action::try_from).collect()
    }
}

impl TryFrom<RawAction> for Action {
    type Error = ActionError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            SELECT_STORY_SUCCESS => {
                let id = require(SELECT_STORY_SUCCESS, "id", raw.id)?;
                Ok(Action::SelectStory { id: StoryId(id) })
            }
            MASTER_WORD_SUCCESS => {
                let word = require(MASTER_WORD_SUCCESS, "word", raw.word)?;
                let story_id = require(MASTER_WORD_SUCCESS, "storyId", raw.story_id)?;
                Ok(Action::MasterWord {
                    word,
                    story_id: StoryId(story_id),
                })
            }
            // A null or absent word clears the quiz selection.
            SELECT_QUIZ_WORD_SUCCESS => Ok(Action::SelectQuizWord { word: raw.word }),
            CHANGE_CURRENT_SECTION => {
                let story_id = require(CHANGE_CURRENT_SECTION, "storyId", raw.story_id)?;
                let idx = require(CHANGE_CURRENT_SECTION, "idx", raw.idx)?;
                let idx = usize::try_from(idx).map_err(|_| ActionError::InvalidField {
                    kind: CHANGE_CURRENT_SECTION,
                    field: "idx",
                    reason: format!("{idx} is negative"),
                })?;
                Ok(Action::ChangeCurrentSection {
                    story_id: StoryId(story_id),
                    idx,
                })
            }
            ADVANCE_SECTION => {
                let story_id = require(ADVANCE_SECTION, "storyId", raw.story_id)?;
                Ok(Action::AdvanceSection {
                    story_id: StoryId(story_id),
                })
            }
            _ => Ok(Action::Unrecognized { kind: raw.kind }),
        }
    }
}

fn require<T>(kind: &'static str, field: &'static str, value: Option<T>) -> Result<T, ActionError> {
    value.ok_or(ActionError::MissingField { kind, field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordId;

    #[test]
    fn parses_master_word_payload() {
        let action = RawAction::parse(
            r#"{"type":"MASTER_WORD_SUCCESS","storyId":2,"word":{"id":4,"text":"hat"}}"#,
        )
        .unwrap();
        match action {
            Action::MasterWord { word, story_id } => {
                assert_eq!(story_id, StoryId(2));
                assert_eq!(word.id, WordId(4));
                assert_eq!(word.text, "hat");
                assert!(!word.complete);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn missing_field_is_a_typed_error() {
        let err = RawAction::parse(r#"{"type":"MASTER_WORD_SUCCESS","storyId":2}"#).unwrap_err();
        assert_eq!(
            err,
            ActionError::MissingField {
                kind: MASTER_WORD_SUCCESS,
                field: "word"
            }
        );

        let err = RawAction::parse(r#"{"type":"SELECT_STORY_SUCCESS"}"#).unwrap_err();
        assert!(matches!(err, ActionError::MissingField { field: "id", .. }));
    }

    #[test]
    fn negative_section_index_is_rejected() {
        let err =
            RawAction::parse(r#"{"type":"CHANGE_CURRENT_SECTION","storyId":1,"idx":-1}"#)
                .unwrap_err();
        assert!(matches!(err, ActionError::InvalidField { field: "idx", .. }));
    }

    #[test]
    fn unknown_kind_is_kept_as_unrecognized() {
        let action = RawAction::parse(r#"{"type":"@@INIT"}"#).unwrap();
        assert_eq!(
            action,
            Action::Unrecognized {
                kind: "@@INIT".to_string()
            }
        );
        assert_eq!(action.kind(), "@@INIT");
    }

    #[test]
    fn invalid_json_reports_parse_error() {
        assert!(matches!(
            RawAction::parse("{not json"),
            Err(ActionError::Parse(_))
        ));
    }

    #[test]
    fn script_stops_at_first_malformed_action() {
        let script = r#"[
            {"type":"SELECT_STORY_SUCCESS","id":1},
            {"type":"ADVANCE_SECTION"}
        ]"#;
        assert!(matches!(
            RawAction::parse_script(script),
            Err(ActionError::MissingField {
                kind: ADVANCE_SECTION,
                field: "storyId"
            })
        ));
    }
}
