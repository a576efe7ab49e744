use crate::model::{
    AudioRef, ImagePosition, ImageRef, QuizState, RootState, Section, Story, StoryId, StoryState,
    Word, WordId, WordState, WordTiming,
};
use crate::store::Store;

pub(crate) const CAT: WordId = WordId(0);
pub(crate) const HAT: WordId = WordId(1);
pub(crate) const MAT: WordId = WordId(2);

pub(crate) fn word(id: WordId, text: &str, audio: bool) -> Word {
    Word {
        id,
        text: text.to_string(),
        audio: audio.then(|| AudioRef(format!("words/{text}.mp3"))),
        img: Some(ImageRef(format!("words/{text}.png"))),
        complete: false,
    }
}

fn timing(text: &str, start: f32, end: f32) -> WordTiming {
    WordTiming {
        text: text.to_string(),
        start,
        end,
    }
}

/// Story 1: two practice sections (the first highlighted by timing) and a
/// closing section without practice. Story 2: a single practice section.
pub(crate) fn root_state() -> RootState {
    let opening = Section {
        text: "The little".to_string(),
        audio: AudioRef("story-1/0.mp3".to_string()),
        word: None,
        img_pos: Some(ImagePosition {
            top: 120.0,
            left: 80.0,
        }),
        requires_practice: true,
        timings: vec![
            timing("The", 0.0, 0.4),
            timing("little", 0.4, 1.0),
            timing("cat", 1.2, 1.8),
        ],
        choices: vec![CAT, HAT],
    };
    let middle = Section {
        text: "sat on the".to_string(),
        audio: AudioRef("story-1/1.mp3".to_string()),
        word: None,
        img_pos: None,
        requires_practice: true,
        timings: Vec::new(),
        choices: Vec::new(),
    };
    let closing = Section {
        text: "The end.".to_string(),
        audio: AudioRef("story-1/2.mp3".to_string()),
        word: None,
        img_pos: None,
        requires_practice: false,
        timings: Vec::new(),
        choices: Vec::new(),
    };
    let first = Story {
        id: StoryId(1),
        title: "The Cat".to_string(),
        img: ImageRef("story-1/cover.png".to_string()),
        sections: vec![opening, middle, closing],
        curr_section_idx: 0,
    };
    let second = Story {
        id: StoryId(2),
        title: "The Hat".to_string(),
        img: ImageRef("story-2/cover.png".to_string()),
        sections: vec![Section {
            text: "I see a".to_string(),
            audio: AudioRef("story-2/0.mp3".to_string()),
            word: None,
            img_pos: None,
            requires_practice: true,
            timings: Vec::new(),
            choices: Vec::new(),
        }],
        curr_section_idx: 0,
    };

    RootState {
        story: StoryState::new(vec![first, second]),
        word: WordState {
            words: vec![word(CAT, "cat", true), word(HAT, "hat", true), word(MAT, "mat", false)],
        },
        quiz: QuizState::default(),
    }
}

pub(crate) fn store() -> Store {
    Store::new(root_state())
}
