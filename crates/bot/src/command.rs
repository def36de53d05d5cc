#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Start,
    /// 1-based position in the sorted hand, as typed.
    Drop(usize),
    Check,
}

impl Command {
    /// Classifies a message by the command word it ends with. Matching is
    /// case-sensitive and the word must not be glued to a preceding word
    /// character, so mentions like `nostr:npub1... drop 3` still parse.
    pub fn parse(content: &str) -> Option<Self> {
        if ends_with_word(content, "help") {
            return Some(Command::Help);
        }
        if ends_with_word(content, "start") {
            return Some(Command::Start);
        }
        if let Some(position) = parse_drop(content) {
            return Some(Command::Drop(position));
        }
        if ends_with_word(content, "check") {
            return Some(Command::Check);
        }
        None
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Start => "start",
            Command::Drop(_) => "drop",
            Command::Check => "check",
        }
    }
}

fn parse_drop(content: &str) -> Option<usize> {
    let digits_start = content
        .char_indices()
        .rev()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(index, ch)| index + ch.len_utf8())
        .unwrap_or(0);
    let digits = &content[digits_start..];
    if digits.is_empty() || !ends_with_word(&content[..digits_start], "drop ") {
        return None;
    }
    // Only overflow can fail here; an absurd position is rejected downstream.
    Some(digits.parse().unwrap_or(usize::MAX))
}

fn ends_with_word(content: &str, word: &str) -> bool {
    let Some(head) = content.strip_suffix(word) else {
        return false;
    };
    !head.chars().next_back().is_some_and(is_word_char)
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! parse_case {
        ($name:ident, $content:expr, $expected:expr) => {
            #[test]
            fn $name() {
                assert_eq!(Command::parse($content), $expected);
            }
        };
    }

    parse_case!(bare_help, "help", Some(Command::Help));
    parse_case!(mention_help, "nostr:npub1xyz help", Some(Command::Help));
    parse_case!(glued_help, "gethelp", None);
    parse_case!(help_not_at_end, "help me", None);
    parse_case!(upper_case_ignored, "START", None);
    parse_case!(start, "#[0] start", Some(Command::Start));
    parse_case!(drop_single_digit, "drop 3", Some(Command::Drop(3)));
    parse_case!(drop_two_digits, "@bot drop 14", Some(Command::Drop(14)));
    parse_case!(drop_zero, "drop 0", Some(Command::Drop(0)));
    parse_case!(drop_without_number, "drop ", None);
    parse_case!(drop_glued, "airdrop 3", None);
    parse_case!(drop_double_space, "drop  3", None);
    parse_case!(drop_trailing_text, "drop 3 please", None);
    parse_case!(
        drop_overflow,
        "drop 99999999999999999999999999",
        Some(Command::Drop(usize::MAX))
    );
    parse_case!(check, "check", Some(Command::Check));
    parse_case!(old_judge_spelling, "judge", None);
    parse_case!(trailing_newline, "check\n", None);
    parse_case!(empty, "", None);
    parse_case!(unicode_prefix, "ツモ check", Some(Command::Check));
}
