//! Command types for the conversation engine.
//!
//! [`CallbackCommand`] is the inline-button payload protocol: every button
//! this bot renders encodes one of these, and every callback press is parsed
//! back through [`CallbackCommand::parse`]. Unrecognized payloads parse to
//! `None` and the event is dropped at the boundary.
//!
//! [`ConversationCommand`] is what the state machine emits: the single
//! intent an inbound event resolved to. Machines decide, effects execute.

/// Payload delimiter between command kind and value, e.g. `select-city:kyiv`.
const PAYLOAD_DELIMITER: char = ':';

const KIND_START_FIND: &str = "start-find";
const KIND_START_SUBMIT: &str = "start-submit";
const KIND_SELECT_CITY: &str = "select-city";
const KIND_SELECT_AGE: &str = "select-age";
const KIND_SELECT_PAGE: &str = "select-page";

/// A validated inline-button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackCommand {
    StartFind,
    StartSubmit,
    SelectCity(String),
    SelectAge(i64),
    SelectPage(usize),
}

impl CallbackCommand {
    /// Parse a raw callback payload. Anything that is not a known kind with
    /// a well-formed value yields `None`; callers ignore such events.
    pub fn parse(payload: &str) -> Option<Self> {
        match payload.split_once(PAYLOAD_DELIMITER) {
            None => match payload {
                KIND_START_FIND => Some(Self::StartFind),
                KIND_START_SUBMIT => Some(Self::StartSubmit),
                _ => None,
            },
            Some((kind, value)) => match kind {
                KIND_SELECT_CITY if !value.is_empty() => Some(Self::SelectCity(value.to_string())),
                KIND_SELECT_AGE => value.parse().ok().map(Self::SelectAge),
                KIND_SELECT_PAGE => value.parse().ok().map(Self::SelectPage),
                _ => None,
            },
        }
    }

    /// Encode for `callback_data`; the exact inverse of [`parse`].
    ///
    /// [`parse`]: Self::parse
    pub fn encode(&self) -> String {
        match self {
            Self::StartFind => KIND_START_FIND.to_string(),
            Self::StartSubmit => KIND_START_SUBMIT.to_string(),
            Self::SelectCity(city) => format!("{KIND_SELECT_CITY}{PAYLOAD_DELIMITER}{city}"),
            Self::SelectAge(age) => format!("{KIND_SELECT_AGE}{PAYLOAD_DELIMITER}{age}"),
            Self::SelectPage(index) => format!("{KIND_SELECT_PAGE}{PAYLOAD_DELIMITER}{index}"),
        }
    }
}

/// Static reply keyboard to attach to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKeyboard {
    /// "/exit" only - mid-wizard prompts.
    Exit,
    /// "/skip" and "/exit" - the optional-username prompt.
    SkipExit,
    /// "/start" only - terminal replies that invite a fresh flow.
    Start,
}

/// The one intent a processed inbound event resolved to.
///
/// Pure data: all IO happens in the effects layer. Prompt texts travel as
/// static strings from [`texts`](crate::domains::conversation::texts);
/// anything data-dependent is rendered by the effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationCommand {
    /// Send the welcome message with the flow-entry inline keyboard.
    Welcome,
    /// Send a wizard prompt with a static keyboard.
    Prompt {
        text: &'static str,
        keyboard: PromptKeyboard,
    },
    /// Find flow: resolve candidate cities for the collected name/surname.
    ResolveCities,
    /// Find flow: resolve candidate ages for the collected city.
    ResolveAges,
    /// Find flow terminal: resolve texts, record the action, paginate.
    FinishFind,
    /// Submit flow terminal: run the submission pipeline on the draft.
    SubmitDraft,
    /// Re-render the result pages at the given (already clamped) index.
    ShowPage { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_flow_entry_kinds() {
        assert_eq!(
            CallbackCommand::parse("start-find"),
            Some(CallbackCommand::StartFind)
        );
        assert_eq!(
            CallbackCommand::parse("start-submit"),
            Some(CallbackCommand::StartSubmit)
        );
    }

    #[test]
    fn parses_valued_kinds() {
        assert_eq!(
            CallbackCommand::parse("select-city:moscow"),
            Some(CallbackCommand::SelectCity("moscow".to_string()))
        );
        assert_eq!(
            CallbackCommand::parse("select-age:30"),
            Some(CallbackCommand::SelectAge(30))
        );
        assert_eq!(
            CallbackCommand::parse("select-page:2"),
            Some(CallbackCommand::SelectPage(2))
        );
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert_eq!(CallbackCommand::parse(""), None);
        assert_eq!(CallbackCommand::parse("bogus"), None);
        assert_eq!(CallbackCommand::parse("bogus:3"), None);
        assert_eq!(CallbackCommand::parse("select-age:abc"), None);
        assert_eq!(CallbackCommand::parse("select-age:"), None);
        assert_eq!(CallbackCommand::parse("select-page:-1"), None);
        assert_eq!(CallbackCommand::parse("select-city:"), None);
        assert_eq!(CallbackCommand::parse("select-page"), None);
    }

    #[test]
    fn encode_round_trips_through_parse() {
        let commands = [
            CallbackCommand::StartFind,
            CallbackCommand::StartSubmit,
            CallbackCommand::SelectCity("st. petersburg".to_string()),
            CallbackCommand::SelectAge(42),
            CallbackCommand::SelectPage(0),
        ];

        for command in commands {
            assert_eq!(CallbackCommand::parse(&command.encode()), Some(command));
        }
    }
}
