//! Java identifiers from schema names, and the registry that keeps them unique.

use heck::ToShoutySnakeCase;
use std::collections::HashMap;

use crate::error::{GenerationError, Result};
use crate::model::TypeId;
use crate::schema::CanonicalUri;
use crate::settings::GenerationSettings;

const JAVA_KEYWORDS: &[&str] = &[
    "_", "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

#[must_use]
pub fn is_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

/// Derives type and member identifiers with the configured word delimiters.
#[derive(Debug, Clone, Copy)]
pub struct NameAllocator<'s> {
    delimiters: &'s [char],
    prefix: &'s str,
    suffix: &'s str,
}

impl<'s> NameAllocator<'s> {
    #[must_use]
    pub fn new(settings: &'s GenerationSettings) -> Self {
        Self {
            delimiters: &settings.property_word_delimiters,
            prefix: &settings.class_name_prefix,
            suffix: &settings.class_name_suffix,
        }
    }

    /// Class or enum name: `"line-item"` becomes `LineItem` when `-` is a delimiter.
    #[must_use]
    pub fn type_name(&self, raw: &str) -> String {
        let base: String = capitalize(&normalize(raw, self.delimiters));
        format!("{}{base}{}", self.prefix, self.suffix)
    }

    /// Field name: lower camel case, keywords prefixed with `_`.
    #[must_use]
    pub fn property_name(&self, raw: &str) -> String {
        let name: String = decapitalize(&normalize(raw, self.delimiters));
        if is_keyword(&name) {
            format!("_{name}")
        } else {
            name
        }
    }
}

/// Enum constant name: camel-case humps and punctuation become `_`-separated
/// upper-case words.
#[must_use]
pub fn constant_name(literal: &str) -> String {
    let shouty: String = literal
        .to_shouty_snake_case()
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { '_' })
        .collect();
    let trimmed: &str = shouty.trim_matches('_');
    if trimmed.is_empty() {
        "__EMPTY__".to_string()
    } else if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Singular form of an English plural, used to name array element types.
#[must_use]
pub fn singularize(word: &str) -> String {
    let lower: String = word.to_ascii_lowercase();
    if lower.ends_with("ies") && word.len() > 3 {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return word[..word.len() - 2].to_string();
    }
    if lower.ends_with('s') && !["ss", "us", "is"].iter().any(|suffix| lower.ends_with(suffix)) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Upper-cases the first character.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars
        .next()
        .map(|first| first.to_lowercase().chain(chars).collect())
        .unwrap_or_default()
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Removes delimiters, upper-casing the character after each one, then
/// replaces anything that cannot appear in a Java identifier.
fn normalize(raw: &str, delimiters: &[char]) -> String {
    let mut joined: String = String::with_capacity(raw.len());
    let mut upper_next: bool = false;
    for c in raw.chars() {
        if delimiters.contains(&c) {
            upper_next = true;
        } else if upper_next {
            joined.extend(c.to_uppercase());
            upper_next = false;
        } else {
            joined.push(c);
        }
    }
    let cleaned: String = joined
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}

/// Outcome of asking for a qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Vacant,
    /// Already held by the type generated for the same schema location.
    Taken(TypeId),
}

/// Qualified type names handed out during one run.
#[derive(Debug, Default)]
pub struct NameRegistry {
    slots: HashMap<String, (TypeId, CanonicalUri)>,
}

impl NameRegistry {
    /// Checks whether `qualified` may be used for the schema at `uri`.
    ///
    /// # Errors
    ///
    /// Returns `NameConflict` if another schema location already holds the name.
    pub fn claim(&self, qualified: &str, uri: &CanonicalUri) -> Result<Claim> {
        match self.slots.get(qualified) {
            None => Ok(Claim::Vacant),
            Some((id, existing)) if existing == uri => Ok(Claim::Taken(*id)),
            Some((_, existing)) => Err(GenerationError::NameConflict {
                name: qualified.to_string(),
                existing: existing.to_string(),
                requested: uri.to_string(),
            }),
        }
    }

    pub fn record(&mut self, qualified: String, id: TypeId, uri: CanonicalUri) {
        self.slots.insert(qualified, (id, uri));
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
