//! Immutable revision snapshots and language-aware views over them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldValue;
use crate::types::{DbId, Timestamp};

/// The user who saved a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: DbId,
    pub display_name: String,
}

/// A localized overlay of a revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// True when this revision changed this translation's content.
    #[serde(default)]
    pub affected: bool,
    /// Translated field values. Fields not listed here fall back to the
    /// base language.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

/// Snapshot of a record as of one save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub revision_id: DbId,
    pub record_id: DbId,
    pub record_type: String,
    pub bundle: String,
    /// Base language of the record.
    pub langcode: String,
    pub timestamp: Timestamp,
    /// `None` when the author account has since been deleted.
    pub author: Option<Author>,
    pub log_message: Option<String>,
    pub is_current: bool,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub translations: BTreeMap<String, Translation>,
}

/// Which translations a view may switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationSelection {
    /// Only a translation this revision actually changed.
    AffectedOnly,
    /// Any existing translation.
    Any,
}

impl Revision {
    /// View of the base language.
    pub fn view(&self) -> RevisionView<'_> {
        RevisionView {
            revision: self,
            translation: None,
        }
    }

    /// View in `langcode` if a suitable translation exists, else the base.
    pub fn view_for(&self, langcode: &str, selection: TranslationSelection) -> RevisionView<'_> {
        if langcode == self.langcode {
            return self.view();
        }
        let translation = self
            .translations
            .get_key_value(langcode)
            .filter(|(_, t)| selection == TranslationSelection::Any || t.affected)
            .map(|(code, t)| (code.as_str(), t));
        RevisionView {
            revision: self,
            translation,
        }
    }

    pub fn has_translation(&self, langcode: &str) -> bool {
        langcode == self.langcode || self.translations.contains_key(langcode)
    }

    /// Whether the record exists in more than one language at this revision.
    pub fn is_multilingual(&self) -> bool {
        self.translations.keys().any(|code| *code != self.langcode)
    }

    /// The log message, if it has any visible content.
    pub fn visible_log_message(&self) -> Option<&str> {
        self.log_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// A revision seen through one language.
#[derive(Debug, Clone, Copy)]
pub struct RevisionView<'a> {
    revision: &'a Revision,
    translation: Option<(&'a str, &'a Translation)>,
}

impl<'a> RevisionView<'a> {
    pub fn langcode(&self) -> &'a str {
        match self.translation {
            Some((code, _)) => code,
            None => &self.revision.langcode,
        }
    }

    pub fn is_translated(&self) -> bool {
        self.translation.is_some()
    }

    /// The field's value in this language, falling back to the base value
    /// for fields the translation does not carry.
    pub fn field(&self, name: &str) -> Option<&'a FieldValue> {
        self.translation
            .and_then(|(_, t)| t.fields.get(name))
            .or_else(|| self.revision.fields.get(name))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}
