//! Merchant matching and affiliate deep links.
//!
//! A result is attributed to a partner merchant when the merchant's name
//! appears (case-insensitively) in the result's seller label. Partners with
//! a search URL get a deep link into their own site search so the
//! affiliate suffix is carried; otherwise the provider link is kept.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::ShoppingResult;

/// Words kept from a product title when building a merchant search query.
const MAX_TITLE_WORDS: usize = 6;

/// Characters that separate words in titles and become spaces.
const WORD_SEPARATORS: &[char] = &['(', ')', '[', ']', '/', '\\', ',', '-'];

/// Same set as the WHATWG `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub use impact_core::MerchantEntry;

/// Link and attribution chosen for a single result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub link: Option<String>,
    pub merchant_id: Option<i64>,
}

/// Reduces a product title to a short search phrase.
///
/// Separators become spaces, other punctuation is dropped, whitespace is
/// collapsed and only the first six words are kept.
#[must_use]
pub fn clean_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .filter_map(|c| {
            if WORD_SEPARATORS.contains(&c) {
                Some(' ')
            } else if c.is_alphanumeric() || c.is_whitespace() {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    replaced
        .split_whitespace()
        .take(MAX_TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First merchant (in slice order) whose name occurs in `source`.
///
/// Blank merchant names never match.
#[must_use]
pub fn find_merchant<'m>(source: &str, merchants: &'m [MerchantEntry]) -> Option<&'m MerchantEntry> {
    let source = source.to_lowercase();
    merchants.iter().find(|m| {
        let name = m.name.trim();
        !name.is_empty() && source.contains(&name.to_lowercase())
    })
}

/// Merchant-search deep link for `title`, or `None` when the merchant has
/// no search URL or the title cleans down to nothing.
#[must_use]
pub fn deep_link(merchant: &MerchantEntry, title: &str) -> Option<String> {
    let search_url = merchant
        .search_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())?;

    let cleaned = clean_title(title);
    if cleaned.is_empty() {
        return None;
    }

    let encoded = utf8_percent_encode(&cleaned, COMPONENT);
    let suffix = merchant.affiliate_suffix.as_deref().unwrap_or_default();
    Some(format!("{search_url}{encoded}{suffix}"))
}

/// Chooses the outbound link for a result.
///
/// A matched merchant with a usable search URL yields a deep link; any
/// other case keeps the provider's `link`, then `product_link`. The merchant
/// id is reported whenever a merchant matched.
#[must_use]
pub fn resolve_link(result: &ShoppingResult, merchants: &[MerchantEntry]) -> ResolvedLink {
    let provider_link = result
        .link
        .clone()
        .or_else(|| result.product_link.clone());

    let Some(merchant) = result
        .source
        .as_deref()
        .and_then(|source| find_merchant(source, merchants))
    else {
        return ResolvedLink {
            link: provider_link,
            merchant_id: None,
        };
    };

    ResolvedLink {
        link: deep_link(merchant, &result.title).or(provider_link),
        merchant_id: Some(merchant.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, name: &str, search_url: Option<&str>, suffix: Option<&str>) -> MerchantEntry {
        MerchantEntry {
            id,
            name: name.to_string(),
            search_url: search_url.map(str::to_string),
            affiliate_suffix: suffix.map(str::to_string),
        }
    }

    fn result(title: &str, source: Option<&str>, link: Option<&str>) -> ShoppingResult {
        ShoppingResult {
            title: title.to_string(),
            source: source.map(str::to_string),
            link: link.map(str::to_string),
            ..ShoppingResult::default()
        }
    }

    #[test]
    fn clean_title_strips_punctuation_and_separators() {
        assert_eq!(clean_title("Lego (Star Wars) Set #123"), "Lego Star Wars Set 123");
        assert_eq!(clean_title("Sony WH-1000XM5/Noir"), "Sony WH 1000XM5 Noir");
        assert_eq!(clean_title("Écouteurs sans fil, Bluetooth 5.3"), "Écouteurs sans fil Bluetooth 53");
    }

    #[test]
    fn clean_title_keeps_first_six_words() {
        assert_eq!(clean_title("a b c d e f g h"), "a b c d e f");
        assert_eq!(clean_title("   "), "");
        assert_eq!(clean_title("!!!"), "");
    }

    #[test]
    fn find_merchant_is_case_insensitive_substring() {
        let merchants = [entry(1, "Amazon", None, None), entry(2, "Best Buy", None, None)];
        assert_eq!(
            find_merchant("amazon.ca - Marketplace", &merchants).map(|m| m.id),
            Some(1)
        );
        assert_eq!(find_merchant("BEST BUY Canada", &merchants).map(|m| m.id), Some(2));
        assert!(find_merchant("eBay", &merchants).is_none());
    }

    #[test]
    fn find_merchant_prefers_first_in_order() {
        let merchants = [entry(1, "Best", None, None), entry(2, "Best Buy", None, None)];
        assert_eq!(find_merchant("Best Buy", &merchants).map(|m| m.id), Some(1));
    }

    #[test]
    fn blank_merchant_name_never_matches() {
        let merchants = [entry(1, "  ", None, None), entry(2, "", None, None)];
        assert!(find_merchant("anything", &merchants).is_none());
    }

    #[test]
    fn deep_link_appends_encoded_title_and_suffix() {
        let amazon = entry(
            1,
            "Amazon",
            Some("https://www.amazon.ca/s?k="),
            Some("&tag=impact-20"),
        );
        assert_eq!(
            deep_link(&amazon, "Lego (Star Wars) Set #123").as_deref(),
            Some("https://www.amazon.ca/s?k=Lego%20Star%20Wars%20Set%20123&tag=impact-20")
        );
    }

    #[test]
    fn deep_link_encodes_non_ascii_as_utf8() {
        let simons = entry(2, "Simons", Some("https://www.simons.ca/fr/search?q="), None);
        assert_eq!(
            deep_link(&simons, "Robe été").as_deref(),
            Some("https://www.simons.ca/fr/search?q=Robe%20%C3%A9t%C3%A9")
        );
    }

    #[test]
    fn deep_link_requires_search_url_and_title() {
        assert!(deep_link(&entry(1, "Amazon", None, None), "Casque").is_none());
        assert!(deep_link(&entry(1, "Amazon", Some(" "), None), "Casque").is_none());
        assert!(deep_link(&entry(1, "Amazon", Some("https://a.ca/s?k="), None), "###").is_none());
    }

    #[test]
    fn resolve_link_uses_deep_link_for_matched_merchant() {
        let merchants = [entry(7, "Walmart", Some("https://www.walmart.ca/search?q="), None)];
        let resolved = resolve_link(
            &result("Cafetière", Some("Walmart.ca"), Some("https://provider/x")),
            &merchants,
        );
        assert_eq!(resolved.merchant_id, Some(7));
        assert_eq!(
            resolved.link.as_deref(),
            Some("https://www.walmart.ca/search?q=Cafeti%C3%A8re")
        );
    }

    #[test]
    fn resolve_link_keeps_provider_link_without_search_url() {
        let merchants = [entry(3, "Sephora", None, None)];
        let resolved = resolve_link(
            &result("Parfum", Some("Sephora"), Some("https://provider/p")),
            &merchants,
        );
        assert_eq!(resolved.merchant_id, Some(3));
        assert_eq!(resolved.link.as_deref(), Some("https://provider/p"));
    }

    #[test]
    fn resolve_link_falls_back_to_product_link() {
        let mut unmatched = result("Parfum", Some("Boutique X"), None);
        unmatched.product_link = Some("https://provider/product".to_string());
        let resolved = resolve_link(&unmatched, &[]);
        assert_eq!(resolved.merchant_id, None);
        assert_eq!(resolved.link.as_deref(), Some("https://provider/product"));
    }

    #[test]
    fn resolve_link_without_source_is_unmatched() {
        let merchants = [entry(1, "Amazon", Some("https://a.ca/s?k="), None)];
        let resolved = resolve_link(&result("Amazon Echo", None, Some("https://p/1")), &merchants);
        assert_eq!(resolved.merchant_id, None);
        assert_eq!(resolved.link.as_deref(), Some("https://p/1"));
    }
}
