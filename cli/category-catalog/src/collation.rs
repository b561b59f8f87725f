//! Locale aware ordering of category names.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::str::FromStr;

use icu::collator::options::CollatorOptions;
use icu::collator::{Collator, CollatorBorrowed};
use icu::locale::Locale;

use crate::error::CollationError;

/// Locale used for ordering category names unless configured otherwise.
pub const DEFAULT_COLLATION_LOCALE: &str = "ru-RU";

/// Compares category names with the collation rules of a fixed locale.
pub struct NameCollator {
    locale: String,
    collator: CollatorBorrowed<'static>,
}

impl NameCollator {
    pub fn new(locale: impl AsRef<str>) -> Result<Self, CollationError> {
        let locale = locale.as_ref();
        let parsed = Locale::from_str(locale).map_err(|source| CollationError::InvalidLocale {
            locale: locale.to_string(),
            source,
        })?;
        let collator = Collator::try_new(parsed.into(), CollatorOptions::default()).map_err(
            |source| CollationError::MissingData {
                locale: locale.to_string(),
                source,
            },
        )?;

        Ok(Self {
            locale: locale.to_string(),
            collator,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }
}

impl Debug for NameCollator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameCollator")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
