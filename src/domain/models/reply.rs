//! Outbound message shapes requested by the state machine.

/// Suggested quick replies attached to a message.
///
/// These are hints: the flow works when the transport renders them as plain
/// text or drops them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Keyboard {
    /// Leave whatever the client currently shows.
    #[default]
    Unchanged,
    /// Hide any previously offered quick replies.
    Remove,
    /// Offer these rows of quick replies.
    Choices(Vec<Vec<String>>),
}

impl Keyboard {
    /// One button per row.
    pub fn column<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(labels.into_iter().map(|l| vec![l.into()]).collect())
    }

    /// Arbitrary rows of buttons.
    pub fn rows(rows: Vec<Vec<&str>>) -> Self {
        Self::Choices(
            rows.into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }
}

/// A message to send back to the user of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Unchanged,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    pub fn removing_keyboard(text: impl Into<String>) -> Self {
        Self::with_keyboard(text, Keyboard::Remove)
    }
}
