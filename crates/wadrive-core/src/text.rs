//! Chat-name cleaning and classification.

/// Normalize a name for comparison: lowercase, all whitespace removed.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Remove `prefix` (and any whitespace after it) from the start of `name`.
///
/// Returns `None` when `name` does not start with `prefix`.
pub fn strip_name_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    name.trim_start()
        .strip_prefix(prefix)
        .map(|rest| rest.trim_start())
}

/// Length of the match of `tokens` at the start of `s`, with optional
/// spaces or tabs allowed between tokens.
fn match_tokens(s: &str, tokens: &[&str]) -> Option<usize> {
    let mut pos = 0;
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            let rest = &s[pos..];
            pos += rest.len() - rest.trim_start_matches([' ', '\t']).len();
        }
        if !s[pos..].starts_with(token) {
            return None;
        }
        pos += token.len();
    }
    Some(pos)
}

/// Remove every occurrence of `prefix` from `content`.
///
/// Whitespace inside `prefix` matches any run of spaces or tabs (including
/// none), so `"Shop 🛒"` also removes `"Shop🛒"`. Spaces or tabs right after
/// a match are dropped too; newlines are kept. Returns the cleaned text and
/// the number of occurrences removed.
pub fn remove_prefix_everywhere(content: &str, prefix: &str) -> (String, usize) {
    let tokens: Vec<&str> = prefix.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return (content.to_string(), 0);
    };

    let mut out = String::with_capacity(content.len());
    let mut removed = 0;
    let mut cursor = 0;
    while let Some(found) = content[cursor..].find(first) {
        let start = cursor + found;
        match match_tokens(&content[start..], &tokens) {
            Some(len) => {
                out.push_str(&content[cursor..start]);
                let rest = &content[start + len..];
                let trimmed = rest.trim_start_matches([' ', '\t']);
                cursor = start + len + (rest.len() - trimmed.len());
                removed += 1;
            }
            None => {
                let next = start + first.len();
                out.push_str(&content[cursor..next]);
                cursor = next;
            }
        }
    }
    out.push_str(&content[cursor..]);
    (out, removed)
}

/// Words that show up in chat-list rows but are never chat names.
const EXCLUDED_FRAGMENTS: &[&str] = &[
    ":",
    "PM",
    "AM",
    "/",
    "You're now an admin",
    "left",
    "joined",
    "WhatsApp",
    "Search",
    "New chat",
    "Chats",
    "Status",
    "Calls",
];

/// Whether a TextView read off a chat row looks like a real chat name
/// rather than a timestamp, status line, or UI chrome.
pub fn is_valid_chat_name(candidate: &str) -> bool {
    let name = candidate.trim();
    if name.chars().count() <= 1 {
        return false;
    }
    if EXCLUDED_FRAGMENTS.iter().any(|p| name.contains(p)) {
        return false;
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let stripped: String = name
        .chars()
        .filter(|c| !matches!(c, ':' | ' ' | '/'))
        .collect();
    !(!stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()))
}

const GROUP_WORDS: &[&str] = &["group", "team", "family", "friends", "class", "work"];

/// Whether a name is a bare phone number (`+`, spaces and dashes allowed).
pub fn is_phone_number(name: &str) -> bool {
    let digits: String = name
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-'))
        .collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Name-based guess whether a chat is a group.
///
/// Two or more of: at least three words, a group-ish word, not a phone number.
pub fn looks_like_group(name: &str) -> bool {
    let lower = name.to_lowercase();
    let score = [
        name.split_whitespace().count() >= 3,
        GROUP_WORDS.iter().any(|w| lower.contains(w)),
        !is_phone_number(name),
    ]
    .iter()
    .filter(|hit| **hit)
    .count();
    score >= 2
}

/// Truncate to at most `max` chars for log lines.
pub fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_name("  Ram  Bahadur "), "rambahadur");
        assert_eq!(normalize_name("ÅSA b"), "åsab");
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_name_prefix("LuckyTaj♠️ Ram", "LuckyTaj♠️"), Some("Ram"));
        assert_eq!(strip_name_prefix("Ram", "LuckyTaj♠️"), None);
        assert_eq!(strip_name_prefix("Ram", ""), None);
    }

    #[test]
    fn test_remove_prefix_everywhere() {
        let input = "NepalWin 🇳🇵Ram\nNepalWin🇳🇵 Sita\nHari NepalWin\n";
        let (out, n) = remove_prefix_everywhere(input, "NepalWin 🇳🇵");
        assert_eq!(n, 2);
        assert_eq!(out, "Ram\nSita\nHari NepalWin\n");

        let (out, n) = remove_prefix_everywhere("Shop Ram\nShop  Sita\n", "Shop");
        assert_eq!(n, 2);
        assert_eq!(out, "Ram\nSita\n");

        let (out, n) = remove_prefix_everywhere("a\nb\n", "zz");
        assert_eq!((out.as_str(), n), ("a\nb\n", 0));
    }

    #[test]
    fn test_valid_chat_names() {
        assert!(is_valid_chat_name("Family Trip"));
        assert!(!is_valid_chat_name("10:45"));
        assert!(!is_valid_chat_name("Yesterday 3 PM"));
        assert!(!is_valid_chat_name("12/01/2025"));
        assert!(!is_valid_chat_name("12345"));
        assert!(!is_valid_chat_name("x"));
        assert!(!is_valid_chat_name("Ram joined"));
        assert!(!is_valid_chat_name("Chats"));
    }

    #[test]
    fn test_group_heuristic() {
        assert!(looks_like_group("Office work crew"));
        assert!(looks_like_group("Family"));
        assert!(!looks_like_group("+977 98-1234-5678"));
        assert!(!looks_like_group("Ram"));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
