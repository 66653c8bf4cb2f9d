//! Locale-aware ordering of tree nodes and directory entries.
//!
//! Sorting is an in-place binary-heap sort: O(n log n) in the worst case,
//! including listings that arrive already ordered. It is not stable.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use icu_locale_core::Locale;
use icu_normalizer::properties::CanonicalCombiningClassMapBorrowed;
use icu_normalizer::DecomposingNormalizerBorrowed;
use log::debug;

use crate::error::{Error, Result};

/// Compares strings at primary strength: case and accents are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collator {
    locale: Locale,
}

impl Collator {
    /// Build a collator for a BCP-47 locale tag such as `en-US` or `fr`.
    pub fn try_new(tag: &str) -> Result<Self> {
        let locale = tag
            .parse::<Locale>()
            .map_err(|_| Error::invalid("locale", tag))?;
        Ok(Self { locale })
    }

    /// Collator for `tag`, or `None` (ordinal comparison) when one cannot be built.
    pub fn for_locale(tag: Option<&str>) -> Option<Self> {
        let tag = tag?;
        match Self::try_new(tag) {
            Ok(collator) => Some(collator),
            Err(e) => {
                debug!("falling back to ordinal comparison: {}", e);
                None
            }
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        primary_key(a).cmp(&primary_key(b))
    }
}

impl fmt::Display for Collator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locale)
    }
}

/// Decompose, drop combining marks, lowercase.
///
/// A mark is any character with a non-zero canonical combining class:
/// Latin accents, Hebrew points, Arabic harakat, Indic nukta. Spacing vowel
/// signs have class 0 and stay primary.
fn primary_key(s: &str) -> String {
    let nfd = DecomposingNormalizerBorrowed::new_nfd();
    let ccc = CanonicalCombiningClassMapBorrowed::new();
    nfd.normalize(s)
        .chars()
        .filter(|c| ccc.get_u8(*c) == 0)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two keys with `collator`, or ordinally when there is none.
pub fn compare(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(c) => c.compare(a, b),
        None => a.cmp(b),
    }
}

/// The text an element is ordered by.
pub trait SortKey {
    fn sort_key(&self) -> Cow<'_, str>;
}

impl SortKey for str {
    fn sort_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl SortKey for String {
    fn sort_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// A missing key sorts as the empty string.
impl<T: SortKey> SortKey for Option<T> {
    fn sort_key(&self) -> Cow<'_, str> {
        match self {
            Some(v) => v.sort_key(),
            None => Cow::Borrowed(""),
        }
    }
}

impl<T: SortKey + ?Sized> SortKey for &T {
    fn sort_key(&self) -> Cow<'_, str> {
        (**self).sort_key()
    }
}

/// Orders any `Display` value by its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByDisplay<T>(pub T);

impl<T: fmt::Display> SortKey for ByDisplay<T> {
    fn sort_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.0.to_string())
    }
}

/// Sort `list` ascending by [`SortKey`] in place.
pub fn sort<T: SortKey>(collator: Option<&Collator>, list: &mut [T]) {
    let len = list.len();
    if len < 2 {
        return;
    }
    let cmp = |a: &T, b: &T| compare(collator, &a.sort_key(), &b.sort_key());

    for root in (0..len / 2).rev() {
        adjust_list(list, root, len, &cmp);
    }
    for end in (1..len).rev() {
        list.swap(0, end);
        adjust_list(list, 0, end, &cmp);
    }
}

/// Sift `list[root]` down until the max-heap property holds within `list[..len]`.
fn adjust_list<T, F>(list: &mut [T], mut root: usize, len: usize, cmp: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    loop {
        let left = 2 * root + 1;
        if left >= len {
            return;
        }
        let mut child = left;
        if left + 1 < len && cmp(&list[left], &list[left + 1]) == Ordering::Less {
            child = left + 1;
        }
        if cmp(&list[root], &list[child]) != Ordering::Less {
            return;
        }
        list.swap(root, child);
        root = child;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(collator: Option<&Collator>, items: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        sort(collator, &mut v);
        v
    }

    #[test]
    fn collated_sort_ignores_case() {
        let c = Collator::try_new("en").unwrap();
        assert_eq!(
            sorted(Some(&c), &["banana", "Apple", "cherry"]),
            vec!["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn ordinal_sort_uses_code_points() {
        assert_eq!(
            sorted(None, &["banana", "Apple", "cherry"]),
            vec!["Apple", "banana", "cherry"]
        );
        assert_eq!(
            sorted(None, &["banana", "apple", "Cherry"]),
            vec!["Cherry", "apple", "banana"]
        );
    }

    #[test]
    fn accent_variants_diverge_between_modes() {
        assert_eq!(
            sorted(None, &["café", "cafe", "Cafe"]),
            vec!["Cafe", "cafe", "café"]
        );

        // At primary strength all three are the same word.
        let c = Collator::try_new("fr").unwrap();
        assert_eq!(c.compare("café", "cafe"), Ordering::Equal);
        assert_eq!(c.compare("Cafe", "café"), Ordering::Equal);
        let mut collated = sorted(Some(&c), &["café", "cafe", "Cafe"]);
        collated.sort();
        assert_eq!(collated, vec!["Cafe", "cafe", "café"]);
    }

    #[test]
    fn accented_initial_sorts_with_its_base_letter() {
        let c = Collator::try_new("fr").unwrap();
        let input = ["zebra", "éclair", "apple"];
        assert_eq!(
            sorted(Some(&c), &input),
            vec!["apple", "éclair", "zebra"]
        );
        assert_eq!(sorted(None, &input), vec!["apple", "zebra", "éclair"]);
    }

    #[test]
    fn non_latin_diacritics_are_ignored() {
        let he = Collator::try_new("he").unwrap();
        assert_eq!(he.compare("שָׁלוֹם", "שלום"), Ordering::Equal);

        let ar = Collator::try_new("ar").unwrap();
        assert_eq!(ar.compare("كَتَبَ", "كتب"), Ordering::Equal);

        let hi = Collator::try_new("hi").unwrap();
        assert_eq!(hi.compare("\u{0958}", "\u{0915}"), Ordering::Equal);
        assert_eq!(hi.compare("\u{0915}\u{093C}", "\u{0915}"), Ordering::Equal);
    }

    #[test]
    fn spacing_vowel_signs_stay_significant() {
        let hi = Collator::try_new("hi").unwrap();
        // कि vs का
        assert_ne!(hi.compare("\u{0915}\u{093F}", "\u{0915}\u{093E}"), Ordering::Equal);
    }

    #[test]
    fn invalid_locale_falls_back_to_ordinal() {
        assert!(Collator::try_new("not a locale!").is_err());
        assert!(Collator::for_locale(Some("not a locale!")).is_none());
        assert!(Collator::for_locale(None).is_none());
        assert!(Collator::for_locale(Some("ko-KR")).is_some());
    }

    #[test]
    fn missing_keys_sort_first() {
        let mut v = vec![Some("b".to_string()), None, Some("a".to_string())];
        sort(None, &mut v);
        assert_eq!(v, vec![None, Some("a".to_string()), Some("b".to_string())]);
    }

    #[test]
    fn display_values_sort_by_string_form() {
        let mut v = vec![ByDisplay(10), ByDisplay(9), ByDisplay(100)];
        sort(None, &mut v);
        assert_eq!(v, vec![ByDisplay(10), ByDisplay(100), ByDisplay(9)]);
    }

    #[test]
    fn handles_already_ordered_and_reversed_input() {
        let ascending: Vec<String> = (0..50).map(|i| format!("{:03}", i)).collect();
        let mut a = ascending.clone();
        sort(None, &mut a);
        assert_eq!(a, ascending);

        let mut r: Vec<String> = ascending.iter().rev().cloned().collect();
        sort(None, &mut r);
        assert_eq!(r, ascending);
    }

    #[test]
    fn trivial_lengths() {
        let mut empty: Vec<String> = Vec::new();
        sort(None, &mut empty);
        assert!(empty.is_empty());
        let mut one = vec!["x".to_string()];
        sort(None, &mut one);
        assert_eq!(one, vec!["x"]);
    }
}
