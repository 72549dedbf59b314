//! Pagination controller for long result lists.
//!
//! Splits rumor texts into fixed-size pages and renders one page at a time
//! with previous/next inline controls. Navigation edits the originally
//! sent message in place; the session keeps that message's id.

use telegram::models::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::domains::conversation::commands::CallbackCommand;
use crate::domains::conversation::texts;

/// Rumor texts rendered per page.
pub const RUMORS_PER_PAGE: usize = 5;

/// Split items into page strings: up to `page_size` items per page, each
/// prefixed with the fixed template and separated by a blank line.
///
/// Always yields at least one page - an empty result list renders as a
/// single empty page, so callers can unconditionally index page 0.
pub fn paginate(items: &[String], page_size: usize) -> Vec<String> {
    if items.is_empty() {
        return vec![String::new()];
    }

    let page_size = page_size.max(1);
    items
        .chunks(page_size)
        .map(|chunk| {
            chunk
                .iter()
                .map(|item| format!("{}{}", texts::PAGE_ITEM_PREFIX, item))
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .collect()
}

/// Render the page at `index`: its text plus the navigation keyboard.
/// "previous" is absent on page 0 and "next" on the last page; each
/// control encodes the target page index. Out-of-range indices are
/// clamped to the last page.
pub fn render(pages: &[String], index: usize) -> (String, InlineKeyboardMarkup) {
    let last = pages.len().saturating_sub(1);
    let index = index.min(last);

    let mut controls = Vec::new();
    if index > 0 {
        controls.push(InlineKeyboardButton::new(
            "<",
            CallbackCommand::SelectPage(index - 1).encode(),
        ));
    }
    if index < last {
        controls.push(InlineKeyboardButton::new(
            ">",
            CallbackCommand::SelectPage(index + 1).encode(),
        ));
    }

    let keyboard = InlineKeyboardMarkup {
        inline_keyboard: if controls.is_empty() {
            Vec::new()
        } else {
            vec![controls]
        },
    };

    let text = pages.get(index).cloned().unwrap_or_default();
    (text, keyboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("rumor {}", i)).collect()
    }

    fn nav_targets(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
        keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.clone())
            .collect()
    }

    #[test]
    fn page_count_is_ceiling_of_items_over_page_size() {
        assert_eq!(paginate(&items(10), 5).len(), 2);
        assert_eq!(paginate(&items(11), 5).len(), 3);
        assert_eq!(paginate(&items(4), 5).len(), 1);
    }

    #[test]
    fn every_page_but_the_last_is_full() {
        let pages = paginate(&items(12), 5);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].matches(texts::PAGE_ITEM_PREFIX).count(), 5);
        assert_eq!(pages[1].matches(texts::PAGE_ITEM_PREFIX).count(), 5);
        assert_eq!(pages[2].matches(texts::PAGE_ITEM_PREFIX).count(), 2);
    }

    #[test]
    fn evenly_divisible_input_fills_the_last_page() {
        let pages = paginate(&items(10), 5);
        assert_eq!(pages[1].matches(texts::PAGE_ITEM_PREFIX).count(), 5);
    }

    #[test]
    fn empty_input_yields_one_empty_page() {
        let pages = paginate(&[], 5);
        assert_eq!(pages, vec![String::new()]);
    }

    #[test]
    fn items_are_prefixed_and_blank_line_separated() {
        let pages = paginate(&items(2), 5);
        assert_eq!(pages[0], "Word is: rumor 0\n\nWord is: rumor 1");
    }

    #[test]
    fn first_page_has_no_previous_control() {
        let pages = paginate(&items(12), 5);
        let (_, keyboard) = render(&pages, 0);
        assert_eq!(nav_targets(&keyboard), vec!["select-page:1"]);
    }

    #[test]
    fn last_page_has_no_next_control() {
        let pages = paginate(&items(12), 5);
        let (_, keyboard) = render(&pages, 2);
        assert_eq!(nav_targets(&keyboard), vec!["select-page:1"]);
    }

    #[test]
    fn middle_page_has_both_controls() {
        let pages = paginate(&items(12), 5);
        let (_, keyboard) = render(&pages, 1);
        assert_eq!(
            nav_targets(&keyboard),
            vec!["select-page:0", "select-page:2"]
        );
    }

    #[test]
    fn single_page_has_no_controls() {
        let pages = paginate(&items(3), 5);
        let (_, keyboard) = render(&pages, 0);
        assert!(keyboard.inline_keyboard.is_empty());
    }

    #[test]
    fn out_of_range_index_is_clamped_to_last_page() {
        let pages = paginate(&items(12), 5);
        let (text, keyboard) = render(&pages, 99);
        assert_eq!(text, pages[2]);
        assert_eq!(nav_targets(&keyboard), vec!["select-page:1"]);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let pages = paginate(&items(3), 0);
        assert_eq!(pages.len(), 3);
    }
}
