//! Personalization token substitution.
//!
//! Templates carry `{{identifier}}` tokens. At render time each token is
//! looked up in a flat [`RecipientData`] mapping: a present key (even with
//! an empty value) replaces the token, an absent key leaves the token text
//! untouched so authors can see which tokens went unfilled.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Regex pattern matching `{{identifier}}` personalization tokens.
pub const TOKEN_PATTERN: &str = r"\{\{(\w+)\}\}";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN).expect("valid regex"));

/// Flat per-recipient lookup table fed to [`substitute`].
pub type RecipientData = HashMap<String, String>;

// ---------------------------------------------------------------------------
// Variable vocabulary
// ---------------------------------------------------------------------------

/// The closed set of tokens a template author can insert from the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    FirstName,
    LastName,
    Company,
    FullName,
    CustomField,
    LandingPage,
}

impl Variable {
    pub const ALL: [Variable; 6] = [
        Variable::FirstName,
        Variable::LastName,
        Variable::Company,
        Variable::FullName,
        Variable::CustomField,
        Variable::LandingPage,
    ];

    /// Key used in [`RecipientData`].
    pub fn key(self) -> &'static str {
        match self {
            Variable::FirstName => "first_name",
            Variable::LastName => "last_name",
            Variable::Company => "company",
            Variable::FullName => "full_name",
            Variable::CustomField => "custom_field",
            Variable::LandingPage => "landing_page",
        }
    }

    /// Human label shown on the insert-variable menu.
    pub fn label(self) -> &'static str {
        match self {
            Variable::FirstName => "First name",
            Variable::LastName => "Last name",
            Variable::Company => "Company",
            Variable::FullName => "Full name",
            Variable::CustomField => "Custom field",
            Variable::LandingPage => "Landing page URL",
        }
    }

    /// The literal `{{key}}` text inserted into a template.
    pub fn token(self) -> String {
        format!("{{{{{}}}}}", self.key())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }
}

// ---------------------------------------------------------------------------
// Substitution
// ---------------------------------------------------------------------------

/// Replace every `{{identifier}}` whose identifier is a key of `data`.
///
/// Unknown identifiers are left verbatim, braces included. Total for any
/// input; `substitute(s, &RecipientData::new()) == s`.
pub fn substitute(text: &str, data: &RecipientData) -> String {
    if data.is_empty() {
        return text.to_string();
    }
    TOKEN_RE
        .replace_all(text, |caps: &Captures<'_>| match data.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Like [`substitute`] but only when a mapping is supplied.
pub fn substitute_opt(text: &str, data: Option<&RecipientData>) -> String {
    match data {
        Some(data) => substitute(text, data),
        None => text.to_string(),
    }
}

/// Extract the identifiers of all tokens in `text`, de-duplicated and sorted.
pub fn extract_tokens(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = TOKEN_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect();
    tokens.sort();
    tokens.dedup();
    tokens
}

/// Tokens in `text` that no mapping can ever fill (outside [`Variable`]).
pub fn unknown_tokens(text: &str) -> Vec<String> {
    extract_tokens(text)
        .into_iter()
        .filter(|t| Variable::from_key(t).is_none())
        .collect()
}

// ---------------------------------------------------------------------------
// Recipient data
// ---------------------------------------------------------------------------

/// The contact fields a recipient mapping is built from.
#[derive(Debug, Clone, Default)]
pub struct RecipientProfile<'a> {
    pub first_name: &'a str,
    pub last_name: Option<&'a str>,
    pub company: Option<&'a str>,
    pub custom_message: Option<&'a str>,
}

/// `first_name last_name`, trimmed; just the first name when there is no last name.
pub fn full_name(first_name: &str, last_name: Option<&str>) -> String {
    let joined = format!("{} {}", first_name.trim(), last_name.unwrap_or("").trim());
    joined.trim().to_string()
}

impl RecipientProfile<'_> {
    /// Build the substitution mapping for this recipient.
    ///
    /// The four name and company keys are always present (empty when the
    /// contact lacks the field) so a real recipient never sees raw tokens.
    pub fn to_data(&self, landing_page: Option<&str>) -> RecipientData {
        let mut data = RecipientData::new();
        data.insert(Variable::FirstName.key().into(), self.first_name.to_string());
        data.insert(
            Variable::LastName.key().into(),
            self.last_name.unwrap_or("").to_string(),
        );
        data.insert(
            Variable::Company.key().into(),
            self.company.unwrap_or("").to_string(),
        );
        data.insert(
            Variable::FullName.key().into(),
            full_name(self.first_name, self.last_name),
        );
        data.insert(
            Variable::CustomField.key().into(),
            self.custom_message.unwrap_or("").to_string(),
        );
        if let Some(url) = landing_page {
            data.insert(Variable::LandingPage.key().into(), url.to_string());
        }
        data
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> RecipientData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_known_tokens() {
        let m = data(&[("first_name", "Ann"), ("company", "Acme")]);
        assert_eq!(
            substitute("Hi {{first_name}} from {{company}}!", &m),
            "Hi Ann from Acme!"
        );
    }

    #[test]
    fn empty_value_still_replaces() {
        let m = data(&[("company", "")]);
        assert_eq!(substitute("at {{company}}.", &m), "at .");
    }

    #[test]
    fn unknown_token_left_verbatim() {
        let m = data(&[("first_name", "Ann")]);
        assert_eq!(
            substitute("{{first_name}} {{nickname}}", &m),
            "Ann {{nickname}}"
        );
    }

    #[test]
    fn empty_mapping_is_identity() {
        let empty = RecipientData::new();
        for s in [
            "",
            "plain",
            "{{first_name}}",
            "{{ spaced }}",
            "{{{x}}}",
            "unicode ✓ {{naïve}}",
        ] {
            assert_eq!(substitute(s, &empty), s);
        }
    }

    #[test]
    fn malformed_tokens_are_not_touched() {
        let m = data(&[("a", "X")]);
        assert_eq!(substitute("{{a} {a}} {{ a }} {{}}", &m), "{{a} {a}} {{ a }} {{}}");
        assert_eq!(substitute("{{{a}}}", &m), "{X}");
    }

    #[test]
    fn values_are_not_rescanned() {
        let m = data(&[("a", "{{b}}"), ("b", "nope")]);
        assert_eq!(substitute("{{a}}", &m), "{{b}}");
    }

    #[test]
    fn extracts_sorted_unique_tokens() {
        assert_eq!(
            extract_tokens("{{b}} {{a}} {{b}} {{not valid}}"),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(unknown_tokens("{{first_name}} {{shoe_size}}"), vec!["shoe_size"]);
    }

    #[test]
    fn variable_tokens_round_trip_through_keys() {
        for v in Variable::ALL {
            assert_eq!(v.token(), format!("{{{{{}}}}}", v.key()));
            assert_eq!(Variable::from_key(v.key()), Some(v));
        }
    }

    #[test]
    fn recipient_data_derives_full_name() {
        let profile = RecipientProfile {
            first_name: "Jane",
            last_name: Some("Doe"),
            company: None,
            custom_message: None,
        };
        let m = profile.to_data(Some("https://x.test/p/abc"));
        assert_eq!(m["full_name"], "Jane Doe");
        assert_eq!(m["company"], "");
        assert_eq!(m["landing_page"], "https://x.test/p/abc");
        assert_eq!(full_name("Solo", None), "Solo");
    }
}
