use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::ids::FeatureId;

/// Short inline message produced by a session transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Notice {
    #[default]
    None,
    Restarted,
    NoActiveTarget,
    EmptyGuess,
    Correct {
        session_complete: bool,
    },
    Incorrect {
        answer: FeatureId,
        session_complete: bool,
    },
}

impl Notice {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// True when this notice reports the guess that emptied the pool.
    #[must_use]
    pub fn completes_session(&self) -> bool {
        matches!(
            self,
            Self::Correct {
                session_complete: true
            } | Self::Incorrect {
                session_complete: true,
                ..
            }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Restarted => f.write_str("Quiz restarted!"),
            Self::NoActiveTarget => f.write_str("No features remaining or quiz not started."),
            Self::EmptyGuess => f.write_str("Please choose a feature from the list!"),
            Self::Correct { session_complete } => {
                f.write_str("Correct! Loading the next feature.")?;
                complete_suffix(f, *session_complete)
            }
            Self::Incorrect {
                answer,
                session_complete,
            } => {
                write!(f, "Wrong! The correct answer was: {answer}")?;
                complete_suffix(f, *session_complete)
            }
        }
    }
}

fn complete_suffix(f: &mut fmt::Formatter<'_>, session_complete: bool) -> fmt::Result {
    if session_complete {
        f.write_str(" Quiz complete!")?;
    }
    Ok(())
}

// Presenters only ever see the rendered text.
impl Serialize for Notice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incorrect_notice_reveals_answer() {
        let notice = Notice::Incorrect {
            answer: FeatureId::new("Rhine"),
            session_complete: false,
        };
        assert_eq!(notice.to_string(), "Wrong! The correct answer was: Rhine");
    }

    #[test]
    fn final_guess_appends_completion() {
        let notice = Notice::Correct {
            session_complete: true,
        };
        assert!(notice.completes_session());
        assert_eq!(
            notice.to_string(),
            "Correct! Loading the next feature. Quiz complete!"
        );
    }

    #[test]
    fn none_renders_empty() {
        assert_eq!(Notice::None.to_string(), "");
    }
}
