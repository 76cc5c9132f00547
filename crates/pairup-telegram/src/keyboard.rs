// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline keyboards for prompts.

use pairup_core::PromptOption;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// One button per row; pressing it sends the option's command back.
pub fn inline_keyboard(options: &[PromptOption]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(options.iter().map(|option| {
        [InlineKeyboardButton::callback(
            option.label.clone(),
            option.command.clone(),
        )]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn one_row_per_option() {
        let markup = inline_keyboard(&[
            PromptOption::new("Yes, sure", "/ready"),
            PromptOption::new("Skip one week", "/skip"),
        ]);
        assert_eq!(markup.inline_keyboard.len(), 2);
        let first = &markup.inline_keyboard[0][0];
        assert_eq!(first.text, "Yes, sure");
        assert!(matches!(
            &first.kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "/ready"
        ));
    }

    #[test]
    fn empty_options_give_empty_keyboard() {
        assert!(inline_keyboard(&[]).inline_keyboard.is_empty());
    }
}
