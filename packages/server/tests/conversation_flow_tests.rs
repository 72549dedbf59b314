//! End-to-end conversation engine tests.
//!
//! Drive full wizard flows through `handle_inbound` with mock
//! collaborators and assert on what was sent, edited and persisted.

use server_core::domains::conversation::commands::CallbackCommand;
use server_core::domains::conversation::events::{Actor, Inbound, InboundEvent};
use server_core::domains::conversation::{handle_inbound, texts};
use server_core::domains::rumor::models::NewRumor;
use server_core::domains::stats::{ActionKind, NewActionEvent};
use server_core::kernel::{MockEventStore, MockRumorStore, TestDependencies};
use telegram::models::ReplyMarkup;

// ============================================================================
// Test Helpers
// ============================================================================

const USER_ID: i64 = 77;

fn actor() -> Actor {
    Actor {
        user_id: USER_ID,
        username: Some("finder".to_string()),
    }
}

fn text(message: &str) -> Inbound {
    Inbound {
        actor: actor(),
        chat_id: USER_ID,
        event: InboundEvent::Text(message.to_string()),
    }
}

fn press(command: CallbackCommand) -> Inbound {
    Inbound {
        actor: actor(),
        chat_id: USER_ID,
        event: InboundEvent::Callback(command),
    }
}

fn rumor(name: &str, surname: &str, city: &str, age: i64, text: &str) -> NewRumor {
    NewRumor {
        name: name.to_string(),
        surname: surname.to_string(),
        city: city.to_string(),
        age,
        subject_username: None,
        text: text.to_string(),
    }
}

/// Inline-keyboard callback payloads of a captured send, flattened.
fn inline_payloads(markup: &Option<ReplyMarkup>) -> Vec<String> {
    match markup {
        Some(ReplyMarkup::Inline(keyboard)) => keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.clone())
            .collect(),
        _ => Vec::new(),
    }
}

async fn run(deps: &server_core::kernel::ServerDeps, events: Vec<Inbound>) {
    for event in events {
        handle_inbound(deps, event).await.expect("event handling failed");
    }
}

// ============================================================================
// Find flow
// ============================================================================

#[tokio::test]
async fn find_flow_narrows_to_paginated_results() {
    let test_deps = TestDependencies::with_rumors(
        MockRumorStore::new()
            .with_rumor(rumor("ivan", "petrov", "moscow", 30, "feeds pigeons caviar"))
            .with_rumor(rumor("ivan", "petrov", "moscow", 30, "sings in the lift"))
            .with_rumor(rumor("ivan", "petrov", "kazan", 44, "unrelated city")),
    );
    let deps = test_deps.server_deps();

    run(
        &deps,
        vec![
            press(CallbackCommand::StartFind),
            text("Ivan"),
            text("Petrov"),
        ],
    )
    .await;

    // Name prompt, surname prompt, then the city keyboard.
    let sent = test_deps.messenger.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[2].text, texts::PICK_CITY_PROMPT);
    assert_eq!(
        inline_payloads(&sent[2].reply_markup),
        vec!["select-city:kazan", "select-city:moscow"]
    );

    run(
        &deps,
        vec![press(CallbackCommand::SelectCity("moscow".to_string()))],
    )
    .await;

    let sent = test_deps.messenger.sent();
    assert_eq!(sent[3].text, texts::PICK_AGE_PROMPT);
    assert_eq!(inline_payloads(&sent[3].reply_markup), vec!["select-age:30"]);

    run(&deps, vec![press(CallbackCommand::SelectAge(30))]).await;

    // Both matching texts on one page, in submission order, no nav
    // controls for a single page.
    let sent = test_deps.messenger.sent();
    assert_eq!(sent.len(), 5);
    assert_eq!(
        sent[4].text,
        "Word is: feeds pigeons caviar\n\nWord is: sings in the lift"
    );
    assert!(inline_payloads(&sent[4].reply_markup).is_empty());

    // One completed find action on record.
    let events = test_deps.events.rows();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "find");
    assert_eq!(events[0].user_id, USER_ID);
}

#[tokio::test]
async fn find_with_no_matches_records_the_action_and_explains() {
    let test_deps = TestDependencies::new();
    let deps = test_deps.server_deps();

    run(
        &deps,
        vec![
            press(CallbackCommand::StartFind),
            text("Nobody"),
            text("Known"),
        ],
    )
    .await;

    assert_eq!(
        test_deps.messenger.last_text().unwrap(),
        texts::no_results("nobody", "known")
    );

    let events = test_deps.events.rows();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "find");
}

#[tokio::test]
async fn page_navigation_edits_the_original_message_in_place() {
    let mut store = MockRumorStore::new();
    for i in 0..12 {
        store = store.with_rumor(rumor("ivan", "petrov", "moscow", 30, &format!("rumor {i}")));
    }
    let test_deps = TestDependencies::with_rumors(store);
    let deps = test_deps.server_deps();

    run(
        &deps,
        vec![
            press(CallbackCommand::StartFind),
            text("ivan"),
            text("petrov"),
            press(CallbackCommand::SelectCity("moscow".to_string())),
            press(CallbackCommand::SelectAge(30)),
        ],
    )
    .await;

    let page_send = test_deps.messenger.sent().last().cloned().unwrap();
    assert_eq!(inline_payloads(&page_send.reply_markup), vec!["select-page:1"]);

    run(
        &deps,
        vec![
            press(CallbackCommand::SelectPage(1)),
            press(CallbackCommand::SelectPage(2)),
        ],
    )
    .await;

    let edits = test_deps.messenger.edited();
    assert_eq!(edits.len(), 2);
    // Every navigation reuses the id of the initially sent page message.
    assert!(edits.iter().all(|e| e.message_id == page_send.message_id));
    // Middle page exposes both directions, final page only "previous".
    let nav: Vec<String> = edits[0]
        .reply_markup
        .as_ref()
        .unwrap()
        .inline_keyboard
        .iter()
        .flatten()
        .map(|b| b.callback_data.clone())
        .collect();
    assert_eq!(nav, vec!["select-page:0", "select-page:2"]);
    assert!(edits[1].text.starts_with("Word is: rumor 10"));

    // No new messages were sent for navigation.
    assert_eq!(test_deps.messenger.sent().len(), 5);
}

// ============================================================================
// Submit flow
// ============================================================================

#[tokio::test]
async fn submit_flow_persists_once_and_notifies_the_subject_once() {
    let test_deps = TestDependencies::with_events(MockEventStore::new().with_event(
        NewActionEvent {
            user_id: 555,
            username: Some("olga".to_string()),
            kind: ActionKind::Find,
            bot_identity: "rumormill_bot".to_string(),
        },
    ));
    let deps = test_deps.server_deps();

    run(
        &deps,
        vec![
            press(CallbackCommand::StartSubmit),
            text("Olga"),
            text("Orlova"),
            text("olga"),
            text("29"),
            text("Moscow"),
            text("knits tiny hats for cats"),
        ],
    )
    .await;

    let rumors = test_deps.rumors.rows();
    assert_eq!(rumors.len(), 1);
    assert_eq!(rumors[0].name, "olga");
    assert_eq!(rumors[0].city, "moscow");
    assert_eq!(rumors[0].age, 29);
    assert_eq!(rumors[0].subject_username.as_deref(), Some("olga"));

    // The seeded find event plus exactly one new submit event.
    let events = test_deps.events.rows();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, "submit");
    assert_eq!(events[1].user_id, USER_ID);

    // Exactly one notification, to the subject's recorded user id.
    let notifications = test_deps.messenger.sent_to(555);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].text, texts::SUBJECT_NOTIFICATION);

    // The submitter got the confirmation.
    assert_eq!(
        test_deps.messenger.last_text().unwrap(),
        texts::submitted("olga", "orlova")
    );
}

#[tokio::test]
async fn redelivered_submit_completion_does_not_double_persist() {
    let test_deps = TestDependencies::new();
    let deps = test_deps.server_deps();

    run(
        &deps,
        vec![
            press(CallbackCommand::StartSubmit),
            text("olga"),
            text("orlova"),
            text("/skip"),
            text("29"),
            text("moscow"),
            text("the final rumor text"),
            // Transport redelivery of the final message: the flow is idle
            // now, so this lands as a no-op.
            text("the final rumor text"),
        ],
    )
    .await;

    assert_eq!(test_deps.rumors.rows().len(), 1);
    assert_eq!(test_deps.events.rows().len(), 1);
}

#[tokio::test]
async fn exit_abandons_a_half_finished_draft() {
    let test_deps = TestDependencies::new();
    let deps = test_deps.server_deps();

    run(
        &deps,
        vec![
            press(CallbackCommand::StartSubmit),
            text("olga"),
            text("orlova"),
            text("/exit"),
        ],
    )
    .await;

    assert!(test_deps.rumors.rows().is_empty());
    assert!(test_deps.events.rows().is_empty());
    assert_eq!(
        test_deps.messenger.last_text().unwrap(),
        texts::RESTART_PROMPT
    );

    // The abandoned draft does not leak into a fresh flow.
    run(
        &deps,
        vec![
            press(CallbackCommand::StartSubmit),
            text("pyotr"),
            text("sidorov"),
            text("/skip"),
            text("31"),
            text("omsk"),
            text("entirely new rumor"),
        ],
    )
    .await;

    let rumors = test_deps.rumors.rows();
    assert_eq!(rumors.len(), 1);
    assert_eq!(rumors[0].name, "pyotr");
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn concurrent_events_for_one_user_are_serialized() {
    let test_deps = TestDependencies::new();
    let deps = test_deps.server_deps();

    // Two copies of the same name message racing after flow entry: the
    // session lock serializes them, so one is consumed by AwaitName and
    // the other by AwaitSurname - never both by the same step.
    run(&deps, vec![press(CallbackCommand::StartFind)]).await;

    let first = handle_inbound(&deps, text("ivan"));
    let second = handle_inbound(&deps, text("ivan"));
    let (a, b) = tokio::join!(first, second);
    a.unwrap();
    b.unwrap();

    // Flow advanced exactly two steps: surname prompt then city
    // resolution (which found nothing and terminated).
    let sent = test_deps.messenger.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[1].text, texts::SURNAME_PROMPT);
    assert_eq!(sent[2].text, texts::no_results("ivan", "ivan"));
}
