//! User-facing copy for prompts, keyboards and replies.
//!
//! Kept in one place so the wording can change without touching the
//! state machine or effects.

pub const EXIT_COMMAND: &str = "/exit";
pub const SKIP_COMMAND: &str = "/skip";
pub const START_COMMAND: &str = "/start";

pub const WELCOME: &str = "Hi, I'm Rumormill - a bot for starting, finding and \
spreading rumors.\n\nTwo buttons below:\n\n1. \"Find rumors\"\nTap it, then enter \
the first name, last name and city of the person you want the dirt on. If there \
is nothing - well, either they are a saint or terribly boring.\n\n2. \"Spread a \
rumor\"\nYou surely have something to tell! Tap it, then enter the first name, \
last name, age and city of the person you want anonymous gossip about.\n\nDon't \
forget to share me with your friends!";

pub const BTN_FIND: &str = "Find rumors";
pub const BTN_SUBMIT: &str = "Spread a rumor";

pub const NAME_PROMPT: &str = "Enter the first name (the full one, ideally):";
pub const SURNAME_PROMPT: &str = "Enter the last name:";
pub const USERNAME_PROMPT: &str = "Enter their messenger handle, if you know it:";
pub const AGE_PROMPT: &str = "Enter the age:";
pub const AGE_INVALID_PROMPT: &str = "That doesn't look like an age. Enter a number:";
pub const CITY_PROMPT: &str = "Enter the city:";
pub const RUMOR_TEXT_PROMPT: &str = "Write down what you know about this person:";

pub const PICK_CITY_PROMPT: &str = "Pick a city:";
pub const PICK_AGE_PROMPT: &str = "Pick an age:";

pub const RESTART_PROMPT: &str = "Start over?";
pub const SUBJECT_NOTIFICATION: &str = "Someone started a rumor about you!";

/// Fixed prefix each rumor text is rendered with on a result page.
pub const PAGE_ITEM_PREFIX: &str = "Word is: ";

pub fn no_results(name: &str, surname: &str) -> String {
    format!(
        "Looks like nobody has written anything about {} {} yet. Be the first!",
        name, surname
    )
}

pub fn submitted(name: &str, surname: &str) -> String {
    format!("The rumor about {} {} is in!", name, surname)
}
