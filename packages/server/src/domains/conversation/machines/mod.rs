//! Pure state machine for the find and submit wizards.
//!
//! [`decide`] interprets one inbound event against the user's session:
//! it updates the session state and emits at most one
//! [`ConversationCommand`] for the effects layer to execute. No IO happens
//! here - decisions are synchronous and fully unit-testable.
//!
//! Any (state, event) pair without a rule below is a deliberate no-op:
//! stray text while idle, button presses for steps the user is not on,
//! and similar out-of-order input are ignored rather than treated as
//! errors.

use crate::domains::conversation::commands::{
    CallbackCommand, ConversationCommand, PromptKeyboard,
};
use crate::domains::conversation::events::{Inbound, InboundEvent};
use crate::domains::conversation::models::{FindStep, Flow, Session, SubmitStep};
use crate::domains::conversation::texts;

/// Process one inbound event. Mutates the session in place and returns
/// the command to execute, if the event called for one.
pub fn decide(session: &mut Session, inbound: &Inbound) -> Option<ConversationCommand> {
    match &inbound.event {
        InboundEvent::Text(text) => decide_text(session, text.trim()),
        InboundEvent::Callback(command) => decide_callback(session, command),
    }
}

fn decide_text(session: &mut Session, text: &str) -> Option<ConversationCommand> {
    // Global commands take priority over any active wizard step.
    if text == texts::EXIT_COMMAND {
        session.reset_flow();
        return Some(ConversationCommand::Prompt {
            text: texts::RESTART_PROMPT,
            keyboard: PromptKeyboard::Start,
        });
    }
    if text == texts::START_COMMAND {
        session.reset_flow();
        return Some(ConversationCommand::Welcome);
    }

    match session.flow {
        Flow::Idle => None,
        Flow::Find(step) => decide_find_text(session, step, text),
        Flow::Submit(step) => decide_submit_text(session, step, text),
    }
}

fn decide_find_text(
    session: &mut Session,
    step: FindStep,
    text: &str,
) -> Option<ConversationCommand> {
    match step {
        FindStep::AwaitName => {
            session.criteria.name = Some(text.to_lowercase());
            session.flow = Flow::Find(FindStep::AwaitSurname);
            Some(ConversationCommand::Prompt {
                text: texts::SURNAME_PROMPT,
                keyboard: PromptKeyboard::Exit,
            })
        }
        FindStep::AwaitSurname => {
            session.criteria.surname = Some(text.to_lowercase());
            session.flow = Flow::Find(FindStep::AwaitCity);
            Some(ConversationCommand::ResolveCities)
        }
        // City and age selection come in as button payloads, not text.
        FindStep::AwaitCity | FindStep::AwaitAge => None,
    }
}

fn decide_submit_text(
    session: &mut Session,
    step: SubmitStep,
    text: &str,
) -> Option<ConversationCommand> {
    match step {
        SubmitStep::AwaitName => {
            session.draft.name = Some(text.to_lowercase());
            session.flow = Flow::Submit(SubmitStep::AwaitSurname);
            Some(ConversationCommand::Prompt {
                text: texts::SURNAME_PROMPT,
                keyboard: PromptKeyboard::Exit,
            })
        }
        SubmitStep::AwaitSurname => {
            session.draft.surname = Some(text.to_lowercase());
            session.flow = Flow::Submit(SubmitStep::AwaitUsername);
            Some(ConversationCommand::Prompt {
                text: texts::USERNAME_PROMPT,
                keyboard: PromptKeyboard::SkipExit,
            })
        }
        SubmitStep::AwaitUsername => {
            if text != texts::SKIP_COMMAND {
                session.draft.subject_username = Some(text.to_string());
            }
            session.flow = Flow::Submit(SubmitStep::AwaitAge);
            Some(ConversationCommand::Prompt {
                text: texts::AGE_PROMPT,
                keyboard: PromptKeyboard::Exit,
            })
        }
        SubmitStep::AwaitAge => match text.parse::<i64>() {
            Ok(age) => {
                session.draft.age = Some(age);
                session.flow = Flow::Submit(SubmitStep::AwaitCity);
                Some(ConversationCommand::Prompt {
                    text: texts::CITY_PROMPT,
                    keyboard: PromptKeyboard::Exit,
                })
            }
            // Re-prompt without advancing; an unparsable age would never
            // match anything downstream.
            Err(_) => Some(ConversationCommand::Prompt {
                text: texts::AGE_INVALID_PROMPT,
                keyboard: PromptKeyboard::Exit,
            }),
        },
        SubmitStep::AwaitCity => {
            session.draft.city = Some(text.to_lowercase());
            session.flow = Flow::Submit(SubmitStep::AwaitText);
            Some(ConversationCommand::Prompt {
                text: texts::RUMOR_TEXT_PROMPT,
                keyboard: PromptKeyboard::Exit,
            })
        }
        SubmitStep::AwaitText => {
            session.draft.text = Some(text.to_string());
            // The wizard is done collecting; the effect persists the draft.
            session.flow = Flow::Idle;
            Some(ConversationCommand::SubmitDraft)
        }
    }
}

fn decide_callback(
    session: &mut Session,
    command: &CallbackCommand,
) -> Option<ConversationCommand> {
    match command {
        CallbackCommand::StartFind => {
            session.enter_find();
            Some(ConversationCommand::Prompt {
                text: texts::NAME_PROMPT,
                keyboard: PromptKeyboard::Exit,
            })
        }
        CallbackCommand::StartSubmit => {
            session.enter_submit();
            Some(ConversationCommand::Prompt {
                text: texts::NAME_PROMPT,
                keyboard: PromptKeyboard::Exit,
            })
        }
        CallbackCommand::SelectCity(city) => {
            if session.flow != Flow::Find(FindStep::AwaitCity) {
                return None;
            }
            session.criteria.city = Some(city.to_lowercase());
            session.flow = Flow::Find(FindStep::AwaitAge);
            Some(ConversationCommand::ResolveAges)
        }
        CallbackCommand::SelectAge(age) => {
            if session.flow != Flow::Find(FindStep::AwaitAge) {
                return None;
            }
            session.criteria.age = Some(*age);
            // Criteria fully fixed; the effect resolves and renders.
            session.flow = Flow::Idle;
            Some(ConversationCommand::FinishFind)
        }
        CallbackCommand::SelectPage(index) => {
            if session.pages.is_empty() {
                return None;
            }
            // Controls only ever point at valid neighbors, but a stale or
            // forged payload must not index past the end.
            let index = (*index).min(session.pages.len() - 1);
            Some(ConversationCommand::ShowPage { index })
        }
    }
}
