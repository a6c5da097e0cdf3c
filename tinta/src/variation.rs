//! Axes of variation in a variable font.

use tinta_read::{
    tables::avar::Avar,
    tables::fvar::{self, Fvar},
    types::{NameId, Tag},
    TableProvider,
};

use crate::{
    instance::{Location, NormalizedCoord},
    setting::VariationSetting,
};

/// Axis of variation in a variable font.
///
/// In variable fonts, an axis usually refers to a single aspect of a
/// typeface's design that can be altered by the user.
///
/// See <https://fonts.google.com/knowledge/glossary/axis_in_variable_fonts>
#[derive(Clone, Debug)]
pub struct Axis<'a> {
    index: usize,
    record: &'a fvar::VariationAxisRecord,
}

impl Axis<'_> {
    /// Returns the tag that identifies the axis.
    pub fn tag(&self) -> Tag {
        self.record.axis_tag()
    }

    /// Returns the index of the axis in its owning collection.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the name identifier for the name of the axis.
    pub fn name_id(&self) -> NameId {
        self.record.axis_name_id()
    }

    /// Returns true if the axis should be hidden in user interfaces.
    pub fn is_hidden(&self) -> bool {
        const AXIS_HIDDEN_FLAG: u16 = 0x1;
        self.record.flags() & AXIS_HIDDEN_FLAG != 0
    }

    /// Returns the minimum value of the axis.
    pub fn min_value(&self) -> f32 {
        self.record.min_value().to_f64() as _
    }

    /// Returns the default value of the axis.
    pub fn default_value(&self) -> f32 {
        self.record.default_value().to_f64() as _
    }

    /// Returns the maximum value of the axis.
    pub fn max_value(&self) -> f32 {
        self.record.max_value().to_f64() as _
    }

    /// Returns a normalized coordinate for the given user coordinate.
    ///
    /// The value will be clamped to the range specified by the minimum
    /// and maximum values.
    ///
    /// This does not apply any axis variation remapping.
    pub fn normalize(&self, coord: f32) -> NormalizedCoord {
        NormalizedCoord::from_f32(self.record.normalize(coord))
    }
}

/// Collection of axes in a variable font.
///
/// Converts user ([fvar](https://learn.microsoft.com/en-us/typography/opentype/spec/fvar))
/// locations to normalized locations. See [`Self::location`].
///
/// A font without a usable `fvar` table has no axes; a missing or malformed
/// `avar` table is treated as the identity mapping.
#[derive(Clone, Debug, Default)]
pub struct AxisCollection {
    fvar: Option<Fvar>,
    avar: Option<Avar>,
}

impl AxisCollection {
    /// Creates a new axis collection from the given font.
    pub fn new<'a>(font: &impl TableProvider<'a>) -> Self {
        let fvar = font
            .fvar()
            .map_err(|e| log::debug!("no usable fvar table: {e}"))
            .ok();
        let avar = fvar.as_ref().and_then(|_| {
            font.avar()
                .map_err(|e| log::debug!("no usable avar table: {e}"))
                .ok()
        });
        Self { fvar, avar }
    }

    /// Returns the number of variation axes in the font.
    pub fn len(&self) -> usize {
        self.fvar
            .as_ref()
            .map(|fvar| fvar.axis_count() as usize)
            .unwrap_or(0)
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the axis at the given index.
    pub fn get(&self, index: usize) -> Option<Axis<'_>> {
        let record = self.fvar.as_ref()?.axes().get(index)?;
        Some(Axis { index, record })
    }

    /// Returns the axis with the given tag.
    pub fn get_by_tag(&self, tag: Tag) -> Option<Axis<'_>> {
        self.iter().find(|axis| axis.tag() == tag)
    }

    /// Returns an iterator over the axes in the collection.
    pub fn iter(&self) -> impl Iterator<Item = Axis<'_>> + Clone {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Given an iterator of variation settings in user space, computes an
    /// ordered sequence of normalized coordinates.
    ///
    /// * Setting selectors that don't match an axis are ignored.
    /// * Setting values are clamped to the range of their associated axis
    ///   before normalization.
    /// * If more than one setting for an axis is provided, the last one is
    ///   used.
    /// * Omitted settings are set to the default position of their axis.
    ///
    /// The `avar` mapping, if present, is applied to every axis.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # fn wrapper(axes: &tinta::AxisCollection) {
    /// let location = axes.location([("wght", 250.0), ("wdth", 75.0)]);
    /// # }
    /// ```
    pub fn location<I>(&self, settings: I) -> Location
    where
        I: IntoIterator,
        I::Item: Into<VariationSetting>,
    {
        let mut location = Location::new(self.len());
        self.location_to_slice(settings, location.coords_mut());
        location
    }

    /// Same as [`Self::location`] but stores the coordinates in the target
    /// slice.
    ///
    /// Entries of `location` past the number of axes are set to zero.
    pub fn location_to_slice<I>(&self, settings: I, location: &mut [NormalizedCoord])
    where
        I: IntoIterator,
        I::Item: Into<VariationSetting>,
    {
        location.fill(NormalizedCoord::default());
        let mut user_coords: Vec<Option<f32>> = vec![None; self.len()];
        for setting in settings {
            let setting = setting.into();
            if let Some(axis) = self.get_by_tag(setting.selector) {
                user_coords[axis.index()] = Some(setting.value);
            }
        }
        for (axis, (coord, user_coord)) in self.iter().zip(location.iter_mut().zip(user_coords)) {
            let normalized = match user_coord {
                Some(value) => self.normalize_and_remap(&axis, value),
                None => self.remap(axis.index(), 0.0),
            };
            *coord = NormalizedCoord::from_f32(normalized);
        }
    }

    /// Given an iterator of variation settings in user space, returns a
    /// new iterator yielding those settings that are valid for this axis
    /// collection.
    ///
    /// * Setting selectors that don't match an axis are dropped.
    /// * If more than one setting for an axis is provided, the last one is
    ///   retained.
    /// * Setting values are clamped to the range of their associated axis.
    pub fn filter<I>(&self, settings: I) -> impl Iterator<Item = VariationSetting> + Clone
    where
        I: IntoIterator,
        I::Item: Into<VariationSetting>,
    {
        let mut results: Vec<Option<VariationSetting>> = vec![None; self.len()];
        for setting in settings {
            let setting = setting.into();
            if let Some(axis) = self.get_by_tag(setting.selector) {
                let value = setting
                    .value
                    .max(axis.min_value())
                    .min(axis.max_value());
                results[axis.index()] = Some(VariationSetting::new(axis.tag(), value));
            }
        }
        results.into_iter().flatten()
    }

    /// Returns the named instance at the given index.
    pub fn named_instance(&self, index: usize) -> Option<NamedInstance<'_>> {
        let record = self.fvar.as_ref()?.instances().get(index)?;
        Some(NamedInstance { axes: self, record })
    }

    /// Returns an iterator over the named instances of the font.
    pub fn named_instances(&self) -> impl Iterator<Item = NamedInstance<'_>> + Clone {
        let count = self
            .fvar
            .as_ref()
            .map(|fvar| fvar.instance_count() as usize)
            .unwrap_or(0);
        (0..count).filter_map(move |i| self.named_instance(i))
    }

    fn normalize_and_remap(&self, axis: &Axis, value: f32) -> f32 {
        let normalized = axis.record.normalize(value);
        self.remap(axis.index(), normalized)
    }

    fn remap(&self, axis_index: usize, normalized: f32) -> f32 {
        let remapped = self
            .avar
            .as_ref()
            .and_then(|avar| avar.axis_segment_maps().get(axis_index))
            .map(|map| map.apply(normalized))
            .unwrap_or(normalized);
        remapped.clamp(-1.0, 1.0)
    }
}

/// Named instance of a variation.
///
/// A set of fixed axis positions selected by the type designer and assigned a
/// name.
///
/// See <https://fonts.google.com/knowledge/glossary/instance>
#[derive(Clone, Debug)]
pub struct NamedInstance<'a> {
    axes: &'a AxisCollection,
    record: &'a fvar::InstanceRecord,
}

impl<'a> NamedInstance<'a> {
    /// Returns the name identifier for the subfamily name of the instance.
    pub fn subfamily_name_id(&self) -> NameId {
        self.record.subfamily_name_id
    }

    /// Returns the name identifier for the PostScript name of the instance.
    pub fn postscript_name_id(&self) -> Option<NameId> {
        self.record.post_script_name_id
    }

    /// Returns an iterator over the ordered sequence of user space coordinates
    /// that define the instance, one coordinate per axis.
    pub fn user_coords(&self) -> impl Iterator<Item = f32> + 'a + Clone {
        self.record
            .coordinates
            .iter()
            .map(|coord| coord.to_f64() as _)
    }

    /// Computes a location in normalized variation space for this instance.
    pub fn location(&self) -> Location {
        let settings = self
            .axes
            .iter()
            .map(|axis| axis.tag())
            .zip(self.user_coords());
        self.axes.location(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestFont;
    use tinta_read::tables::{avar, fvar};
    use tinta_test_data::variations::{self, WDTH, WGHT};

    fn coords(values: &[f32]) -> Vec<NormalizedCoord> {
        values.iter().copied().map(NormalizedCoord::from_f32).collect()
    }

    #[test]
    fn axes() {
        let fvar_data = variations::fvar_wght_wdth();
        let font = TestFont::default().with_table(fvar::TAG, &fvar_data);
        let axes = AxisCollection::new(&font);
        assert_eq!(axes.len(), 2);
        let wght = axes.get_by_tag(WGHT).unwrap();
        assert_eq!(wght.index(), 0);
        assert_eq!(wght.name_id(), NameId::new(256));
        assert!(!wght.is_hidden());
        assert_eq!(
            (wght.min_value(), wght.default_value(), wght.max_value()),
            (100.0, 400.0, 900.0)
        );
        assert_eq!(wght.normalize(400.0), NormalizedCoord::ZERO);
        assert_eq!(wght.normalize(900.0), NormalizedCoord::ONE);
        assert_eq!(wght.normalize(2000.0), NormalizedCoord::ONE);
        assert!(axes.get(2).is_none());
        assert_eq!(
            axes.iter().map(|axis| axis.tag()).collect::<Vec<_>>(),
            [WGHT, WDTH]
        );
    }

    #[test]
    fn no_fvar_means_no_axes() {
        let avar_data = variations::avar_wght();
        let font = TestFont::default().with_table(avar::TAG, &avar_data);
        let axes = AxisCollection::new(&font);
        assert!(axes.is_empty());
        assert!(axes.location([("wght", 900.0)]).coords().is_empty());
        assert_eq!(axes.named_instances().count(), 0);
    }

    #[test]
    fn default_location() {
        let fvar_data = variations::fvar_wght_wdth();
        let font = TestFont::default().with_table(fvar::TAG, &fvar_data);
        let axes = AxisCollection::new(&font);
        let location = axes.location([("wght", 400.0), ("wdth", 100.0)]);
        assert_eq!(location.coords(), coords(&[0.0, 0.0]));
        assert!(axes.location(Vec::<VariationSetting>::new()).is_default());
    }

    #[test]
    fn location_settings() {
        let fvar_data = variations::fvar_wght_wdth();
        let font = TestFont::default().with_table(fvar::TAG, &fvar_data);
        let axes = AxisCollection::new(&font);
        // unknown tags are ignored, the last wght wins, values are clamped
        let location = axes.location([
            ("wght", 100.0),
            ("opsz", 12.0),
            ("wdth", 50.0),
            ("wght", 650.0),
        ]);
        assert_eq!(location.coords(), coords(&[0.5, -1.0]));
    }

    #[test]
    fn location_with_avar() {
        let fvar_data = variations::fvar_wght_wdth();
        let avar_data = variations::avar_wght();
        let font = TestFont::default()
            .with_table(fvar::TAG, &fvar_data)
            .with_table(avar::TAG, &avar_data);
        let axes = AxisCollection::new(&font);
        let location = axes.location([(WGHT, 650.0), (WDTH, 112.5)]);
        // wght: 0.5 -> 0.75 by the avar map; wdth has an empty map
        assert_eq!(location.coords(), coords(&[0.75, 0.5]));
        let location = axes.location([(WGHT, 525.0)]);
        // 0.25 is halfway between 0 -> 0 and 0.5 -> 0.75
        assert_eq!(location.coords(), coords(&[0.375, 0.0]));
    }

    #[test]
    fn filter() {
        let fvar_data = variations::fvar_wght_wdth();
        let font = TestFont::default().with_table(fvar::TAG, &fvar_data);
        let axes = AxisCollection::new(&font);
        let filtered: Vec<_> = axes
            .filter([("wght", 400.0), ("opsz", 100.0), ("wght", 1200.0)])
            .collect();
        assert_eq!(&filtered, &[("wght", 900.0).into()]);
    }

    #[test]
    fn named_instances() {
        let fvar_data = variations::fvar_wght_wdth();
        let font = TestFont::default().with_table(fvar::TAG, &fvar_data);
        let axes = AxisCollection::new(&font);
        let instances: Vec<_> = axes.named_instances().collect();
        assert_eq!(instances.len(), 2);
        let bold = &instances[0];
        assert_eq!(bold.subfamily_name_id(), NameId::new(258));
        assert_eq!(bold.postscript_name_id(), Some(NameId::new(259)));
        assert_eq!(bold.user_coords().collect::<Vec<_>>(), [700.0, 100.0]);
        assert_eq!(bold.location().coords(), coords(&[0.6, 0.0]));
        let condensed = &instances[1];
        assert_eq!(condensed.postscript_name_id(), None);
        assert_eq!(condensed.location().coords(), coords(&[0.0, -1.0]));
        assert!(axes.named_instance(2).is_none());
    }
}
