//! Positions in variation space.

/// Type for a normalized variation coordinate.
pub type NormalizedCoord = tinta_read::types::F2Dot14;

/// An owned position in variation space.
///
/// Holds one normalized coordinate per axis, in `fvar` order. Produced by
/// [`AxisCollection::location`](crate::AxisCollection::location) and
/// [`NamedInstance::location`](crate::NamedInstance::location).
#[derive(Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    coords: Vec<NormalizedCoord>,
}

impl Location {
    /// Creates a location at the default position of `len` axes.
    pub fn new(len: usize) -> Self {
        Self {
            coords: vec![NormalizedCoord::default(); len],
        }
    }

    pub fn coords(&self) -> &[NormalizedCoord] {
        &self.coords
    }

    pub fn coords_mut(&mut self) -> &mut [NormalizedCoord] {
        &mut self.coords
    }

    /// Returns `true` if every coordinate is at the default position.
    pub fn is_default(&self) -> bool {
        self.coords.iter().all(|coord| *coord == NormalizedCoord::ZERO)
    }
}

impl From<Vec<NormalizedCoord>> for Location {
    fn from(coords: Vec<NormalizedCoord>) -> Self {
        Self { coords }
    }
}

impl<'a> From<&'a Location> for LocationRef<'a> {
    fn from(value: &'a Location) -> Self {
        LocationRef(value.coords())
    }
}

/// Reference to an ordered sequence of normalized variation coordinates.
///
/// This type represents a position in the variation space where each
/// coordinate corresponds to an axis (in the same order as the `fvar` table)
/// and is a normalized value in the range `[-1..1]`.
///
/// See [Coordinate Scales and Normalization](https://learn.microsoft.com/en-us/typography/opentype/spec/otvaroverview#coordinate-scales-and-normalization)
/// for further details.
///
/// If the array is larger in length than the number of axes, extraneous
/// values are ignored. If it is smaller, unrepresented axes are assumed to be
/// at their default positions (i.e. 0).
///
/// A value of this type constructed with `default()` represents the default
/// position for each axis.
#[derive(Copy, Clone, Default, Debug)]
pub struct LocationRef<'a>(&'a [NormalizedCoord]);

impl<'a> LocationRef<'a> {
    /// Creates a new sequence of normalized coordinates from the given array.
    pub fn new(coords: &'a [NormalizedCoord]) -> Self {
        Self(coords)
    }

    /// Returns the underlying array of normalized coordinates.
    pub fn coords(&self) -> &'a [NormalizedCoord] {
        self.0
    }
}

impl<'a> From<&'a [NormalizedCoord]> for LocationRef<'a> {
    fn from(value: &'a [NormalizedCoord]) -> Self {
        Self(value)
    }
}

impl<'a> IntoIterator for LocationRef<'a> {
    type IntoIter = core::slice::Iter<'a, NormalizedCoord>;
    type Item = &'a NormalizedCoord;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_location() {
        let location = Location::new(3);
        assert_eq!(location.coords().len(), 3);
        assert!(location.is_default());
        let location_ref = LocationRef::from(&location);
        assert_eq!(location_ref.into_iter().count(), 3);
    }

    #[test]
    fn modified_location() {
        let mut location = Location::new(2);
        location.coords_mut()[1] = NormalizedCoord::from_f32(-0.5);
        assert!(!location.is_default());
        assert_eq!(
            LocationRef::from(&location).coords(),
            &[NormalizedCoord::ZERO, NormalizedCoord::from_f32(-0.5)]
        );
    }
}
