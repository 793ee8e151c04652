//! Message text normalization: emoji codes, mention placeholders and links.

use std::collections::HashMap;
use std::future::Future;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::emoji;

static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":[\w+\-]+:")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

// <@U12345> or <@U12345|bob>
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<@(\w+)(?:\|[^<>]*)?>")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

// <https://example.com|label> or <https://example.com>
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(<)(https://.*?)([|>])")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

/// Replace every known `:code:` with its Unicode emoji. Unknown codes are kept.
#[must_use]
pub fn normalize_emoji(text: &str) -> String {
    EMOJI_RE
        .replace_all(text, |caps: &Captures| {
            let code = &caps[0];
            emoji::lookup(code).map_or_else(|| code.to_string(), str::to_string)
        })
        .into_owned()
}

/// User IDs referenced by mention placeholders, in first-seen order without duplicates.
#[must_use]
pub fn mentioned_ids(text: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for caps in MENTION_RE.captures_iter(text) {
        let id = &caps[1];
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// Replace every `<@ID>` / `<@ID|name>` placeholder with `@` + the name `resolve` yields for ID.
///
/// Each distinct ID is resolved once, in order of first appearance.
pub async fn normalize_mentions<F, Fut>(text: &str, mut resolve: F) -> String
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = String>,
{
    let ids = mentioned_ids(text);
    if ids.is_empty() {
        return text.to_string();
    }

    let mut names: HashMap<String, String> = HashMap::with_capacity(ids.len());
    for id in ids {
        let name = resolve(id.clone()).await;
        names.insert(id, name);
    }

    MENTION_RE
        .replace_all(text, |caps: &Captures| match names.get(&caps[1]) {
            Some(name) => format!("@{name}"),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Pad the URL of every `<https://...>` link with spaces so renderers don't swallow it.
///
/// `"<https://example.com|click>"` becomes `"< https://example.com |click>"`.
#[must_use]
pub fn sanitize_links(text: &str) -> String {
    LINK_RE.replace_all(text, "$1 $2 $3").into_owned()
}

/// Body text pipeline: emoji first, then mentions.
pub async fn normalize_text<F, Fut>(text: &str, resolve: F) -> String
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = String>,
{
    let with_emoji = normalize_emoji(text);
    normalize_mentions(&with_emoji, resolve).await
}
