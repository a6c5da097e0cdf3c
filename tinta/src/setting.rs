//! User space settings for variation axes.

use core::str::FromStr;

use super::Tag;

/// A value selected by a tag.
///
/// Settings are accepted anywhere an `Into<Setting<T>>` is expected, so
/// `(Tag, T)` and `(&str, T)` tuples (or references to them) can be used
/// directly. A string that is not a valid tag becomes the default tag,
/// which matches no axis.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Setting<T> {
    pub selector: Tag,
    pub value: T,
}

impl<T> Setting<T> {
    pub fn new(selector: Tag, value: T) -> Self {
        Self { selector, value }
    }

    fn from_str_selector(selector: &str, value: T) -> Self {
        Self::new(Tag::from_str(selector).unwrap_or_default(), value)
    }
}

impl<T: Copy> From<&Setting<T>> for Setting<T> {
    fn from(setting: &Setting<T>) -> Self {
        *setting
    }
}

impl<T> From<(Tag, T)> for Setting<T> {
    fn from((selector, value): (Tag, T)) -> Self {
        Self::new(selector, value)
    }
}

impl<T: Copy> From<&(Tag, T)> for Setting<T> {
    fn from(&(selector, value): &(Tag, T)) -> Self {
        Self::new(selector, value)
    }
}

impl<T> From<(&str, T)> for Setting<T> {
    fn from((selector, value): (&str, T)) -> Self {
        Self::from_str_selector(selector, value)
    }
}

impl<T: Copy> From<&(&str, T)> for Setting<T> {
    fn from(&(selector, value): &(&str, T)) -> Self {
        Self::from_str_selector(selector, value)
    }
}

/// A position on a variation axis in user coordinates, such as
/// `wght = 700`.
///
/// # Example
/// ```
/// use tinta::{Tag, VariationSetting};
///
/// let bold: VariationSetting = ("wght", 700.0).into();
/// assert_eq!(bold, VariationSetting::new(Tag::new(b"wght"), 700.0));
/// ```
pub type VariationSetting = Setting<f32>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        let wght = Tag::new(b"wght");
        let expected = VariationSetting::new(wght, 500.0);
        assert_eq!(VariationSetting::from(("wght", 500.0)), expected);
        assert_eq!(VariationSetting::from(&("wght", 500.0)), expected);
        assert_eq!(VariationSetting::from((wght, 500.0)), expected);
        assert_eq!(VariationSetting::from(&(wght, 500.0)), expected);
        assert_eq!(VariationSetting::from(&expected), expected);
    }

    #[test]
    fn invalid_tag() {
        let setting = VariationSetting::from(("too long", 1.0));
        assert_eq!(setting.selector, Tag::default());
    }
}
