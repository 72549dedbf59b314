//! Effects for conversation commands.
//!
//! The machine decides; this module executes. Effects own all IO
//! (messenger sends, funnel queries, the submission pipeline) plus the
//! session mutations that depend on IO results, such as storing rendered
//! pages and the id of the message they live in.

use anyhow::Result;
use tracing::warn;

use telegram::models::{
    InlineKeyboardButton, InlineKeyboardMarkup, ReplyKeyboardMarkup, ReplyMarkup,
};

use crate::domains::conversation::commands::{
    CallbackCommand, ConversationCommand, PromptKeyboard,
};
use crate::domains::conversation::events::Inbound;
use crate::domains::conversation::models::Session;
use crate::domains::conversation::{pagination, texts};
use crate::domains::rumor::actions::{funnel, submit_rumor};
use crate::domains::rumor::models::NewRumor;
use crate::domains::stats::{actions as stats, ActionKind};
use crate::kernel::ServerDeps;

/// Candidate buttons per keyboard row.
const CHOICES_PER_ROW: usize = 3;

/// Execute one command produced by the machine for this inbound event.
pub async fn execute(
    deps: &ServerDeps,
    inbound: &Inbound,
    session: &mut Session,
    command: ConversationCommand,
) -> Result<()> {
    let chat_id = inbound.chat_id;

    match command {
        ConversationCommand::Welcome => {
            deps.messenger
                .send_message(chat_id, texts::WELCOME, Some(welcome_keyboard()))
                .await?;
        }

        ConversationCommand::Prompt { text, keyboard } => {
            deps.messenger
                .send_message(chat_id, text, Some(static_keyboard(keyboard)))
                .await?;
        }

        ConversationCommand::ResolveCities => {
            let (Some(name), Some(surname)) =
                (session.criteria.name.clone(), session.criteria.surname.clone())
            else {
                warn!(user_id = session.user_id, "City resolution without criteria");
                session.reset_flow();
                return Ok(());
            };

            let cities = funnel::resolve_cities(&name, &surname, deps).await?;
            if cities.is_empty() {
                finish_without_results(deps, inbound, session, &name, &surname).await?;
                return Ok(());
            }

            let keyboard = choice_keyboard(
                cities
                    .iter()
                    .map(|city| (city.clone(), CallbackCommand::SelectCity(city.clone()))),
            );
            deps.messenger
                .send_message(
                    chat_id,
                    texts::PICK_CITY_PROMPT,
                    Some(ReplyMarkup::Inline(keyboard)),
                )
                .await?;
        }

        ConversationCommand::ResolveAges => {
            let (Some(name), Some(surname), Some(city)) = (
                session.criteria.name.clone(),
                session.criteria.surname.clone(),
                session.criteria.city.clone(),
            ) else {
                warn!(user_id = session.user_id, "Age resolution without criteria");
                session.reset_flow();
                return Ok(());
            };

            let ages = funnel::resolve_ages(&name, &surname, &city, deps).await?;
            if ages.is_empty() {
                // Unreachable when the city came from resolve_cities, but
                // the funnel must not assume that.
                finish_without_results(deps, inbound, session, &name, &surname).await?;
                return Ok(());
            }

            let keyboard = choice_keyboard(
                ages.iter()
                    .map(|age| (age.to_string(), CallbackCommand::SelectAge(*age))),
            );
            deps.messenger
                .send_message(
                    chat_id,
                    texts::PICK_AGE_PROMPT,
                    Some(ReplyMarkup::Inline(keyboard)),
                )
                .await?;
        }

        ConversationCommand::FinishFind => {
            let (Some(name), Some(surname), Some(city), Some(age)) = (
                session.criteria.name.clone(),
                session.criteria.surname.clone(),
                session.criteria.city.clone(),
                session.criteria.age,
            ) else {
                warn!(user_id = session.user_id, "Find completion without criteria");
                session.reset_flow();
                return Ok(());
            };

            let rumor_texts = funnel::resolve_texts(&name, &surname, &city, age, deps).await?;

            stats::record_action(&inbound.actor, ActionKind::Find, deps).await?;

            if rumor_texts.is_empty() {
                deps.messenger
                    .send_message(
                        chat_id,
                        &texts::no_results(&name, &surname),
                        Some(static_keyboard(PromptKeyboard::Start)),
                    )
                    .await?;
                session.reset_flow();
                return Ok(());
            }

            let pages = pagination::paginate(&rumor_texts, pagination::RUMORS_PER_PAGE);
            let (page_text, keyboard) = pagination::render(&pages, 0);
            let message_id = deps
                .messenger
                .send_message(chat_id, &page_text, Some(ReplyMarkup::Inline(keyboard)))
                .await?;

            session.reset_flow();
            session.pages = pages;
            session.page_index = 0;
            session.pages_message_id = Some(message_id);
        }

        ConversationCommand::SubmitDraft => {
            let Some(new) = draft_to_rumor(session) else {
                warn!(user_id = session.user_id, "Submit with incomplete draft");
                session.reset_flow();
                return Ok(());
            };
            let (name, surname) = (new.name.to_lowercase(), new.surname.to_lowercase());

            submit_rumor(new, &inbound.actor, deps).await?;

            deps.messenger
                .send_message(
                    chat_id,
                    &texts::submitted(&name, &surname),
                    Some(static_keyboard(PromptKeyboard::Start)),
                )
                .await?;
            session.reset_flow();
        }

        ConversationCommand::ShowPage { index } => {
            let Some(message_id) = session.pages_message_id else {
                return Ok(());
            };
            let (page_text, keyboard) = pagination::render(&session.pages, index);
            deps.messenger
                .edit_message_text(chat_id, message_id, &page_text, Some(keyboard))
                .await?;
            session.page_index = index;
        }
    }

    Ok(())
}

/// Terminal for a find flow that matched nothing: the action still counts
/// as a completed find, then the user is invited to start over.
async fn finish_without_results(
    deps: &ServerDeps,
    inbound: &Inbound,
    session: &mut Session,
    name: &str,
    surname: &str,
) -> Result<()> {
    stats::record_action(&inbound.actor, ActionKind::Find, deps).await?;
    deps.messenger
        .send_message(
            inbound.chat_id,
            &texts::no_results(name, surname),
            Some(static_keyboard(PromptKeyboard::Start)),
        )
        .await?;
    session.reset_flow();
    Ok(())
}

fn draft_to_rumor(session: &Session) -> Option<NewRumor> {
    let draft = &session.draft;
    Some(NewRumor {
        name: draft.name.clone()?,
        surname: draft.surname.clone()?,
        city: draft.city.clone()?,
        age: draft.age?,
        subject_username: draft.subject_username.clone(),
        text: draft.text.clone()?,
    })
}

fn static_keyboard(keyboard: PromptKeyboard) -> ReplyMarkup {
    let labels: &[&str] = match keyboard {
        PromptKeyboard::Exit => &[texts::EXIT_COMMAND],
        PromptKeyboard::SkipExit => &[texts::SKIP_COMMAND, texts::EXIT_COMMAND],
        PromptKeyboard::Start => &[texts::START_COMMAND],
    };
    ReplyMarkup::Keyboard(ReplyKeyboardMarkup::one_time(labels))
}

fn welcome_keyboard() -> ReplyMarkup {
    ReplyMarkup::Inline(InlineKeyboardMarkup {
        inline_keyboard: vec![vec![
            InlineKeyboardButton::new(texts::BTN_FIND, CallbackCommand::StartFind.encode()),
            InlineKeyboardButton::new(texts::BTN_SUBMIT, CallbackCommand::StartSubmit.encode()),
        ]],
    })
}

/// Inline keyboard of candidate values, a few per row.
fn choice_keyboard(
    choices: impl Iterator<Item = (String, CallbackCommand)>,
) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = choices
        .map(|(label, command)| InlineKeyboardButton::new(label, command.encode()))
        .collect();

    InlineKeyboardMarkup {
        inline_keyboard: buttons
            .chunks(CHOICES_PER_ROW)
            .map(|row| row.to_vec())
            .collect(),
    }
}
