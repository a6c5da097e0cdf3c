//! End to end tests from user space settings to resolved deltas.

mod common;

use common::{init_logging, Font};
use pretty_assertions::assert_eq;
use tinta::{
    metrics::{Metric, VariableMetrics},
    outline::glyph_deltas,
    raw::{
        tables::{avar, fvar, gvar, hvar, variations::VariationRegionList},
        types::{F2Dot14, Point},
        FontData, FontRead, TableProvider,
    },
    AxisCollection, GlyphId, LocationRef, NormalizedCoord,
};
use tinta_test_data::{be_buffer, gvar as gvar_data, variations};

fn coords(values: &[f32]) -> Vec<NormalizedCoord> {
    values.iter().copied().map(NormalizedCoord::from_f32).collect()
}

#[test]
fn default_design_coordinate() {
    init_logging();
    let fvar_data = variations::fvar_wght_wdth();
    let font = Font::default().with_table(fvar::TAG, &fvar_data);
    let axes = AxisCollection::new(&font);
    let location = axes.location([("wght", 400.0), ("wdth", 100.0)]);
    assert_eq!(location.coords(), coords(&[0.0, 0.0]));
    assert!(location.is_default());
    // a region that ignores both axes
    let regions = be_buffer!(
        2u16,
        1u16,
        F2Dot14::from_f32(-1.0),
        F2Dot14::ZERO,
        F2Dot14::ONE,
        F2Dot14::from_f32(-1.0),
        F2Dot14::ZERO,
        F2Dot14::ONE
    );
    let regions = VariationRegionList::read(FontData::new(&regions)).unwrap();
    let region = &regions.variation_regions()[0];
    let default = location.coords().to_vec();
    for point in [default, coords(&[0.5, -0.75]), coords(&[-1.0, 1.0])] {
        assert_eq!(region.compute_scalar(&point), 1.0);
    }
}

#[test]
fn tent_scalars() {
    let regions = be_buffer!(
        1u16,
        1u16,
        F2Dot14::ZERO,
        F2Dot14::from_f32(0.5),
        F2Dot14::ONE
    );
    let regions = VariationRegionList::read(FontData::new(&regions)).unwrap();
    let region = &regions.variation_regions()[0];
    let scalar = |value: f32| region.compute_scalar(&coords(&[value]));
    assert_eq!(scalar(0.5), 1.0);
    assert_eq!(scalar(0.0), 0.0);
    assert_eq!(scalar(1.0), 0.0);
    assert_eq!(scalar(0.25), 0.5);
    assert_eq!(scalar(-0.5), 0.0);
}

#[test]
fn invalid_region_is_fatal() {
    // peak outside of start..end
    let regions = be_buffer!(
        1u16,
        1u16,
        F2Dot14::from_f32(0.5),
        F2Dot14::ZERO,
        F2Dot14::ONE
    );
    assert!(VariationRegionList::read(FontData::new(&regions)).is_err());
}

#[test]
fn settings_with_avar() {
    let fvar_data = variations::fvar_wght_wdth();
    let avar_data = variations::avar_wght();
    let font = Font::default()
        .with_table(fvar::TAG, &fvar_data)
        .with_table(avar::TAG, &avar_data);
    let axes = AxisCollection::new(&font);
    // wght 650 normalizes to 0.5, which avar maps to 0.75; wdth 112.5 is
    // halfway to the max and the wdth map is empty
    let location = axes.location([("wght", 650.0), ("wdth", 112.5)]);
    assert_eq!(location.coords(), coords(&[0.75, 0.5]));
    // out of range values clamp to the axis range
    let location = axes.location([("wght", 2000.0), ("wdth", 0.0)]);
    assert_eq!(location.coords(), coords(&[1.0, -1.0]));
}

#[test]
fn named_instance_locations() {
    let fvar_data = variations::fvar_wght_wdth();
    let font = Font::default().with_table(fvar::TAG, &fvar_data);
    let axes = AxisCollection::new(&font);
    let locations: Vec<_> = axes
        .named_instances()
        .map(|instance| instance.location())
        .collect();
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].coords(), coords(&[0.6, 0.0]));
    assert_eq!(locations[1].coords(), coords(&[0.0, -1.0]));
}

#[test]
fn metric_deltas_from_settings() {
    init_logging();
    let fvar_data = variations::fvar_wght_wdth();
    let hvar_data = variations::hvar();
    let font = Font::default()
        .with_table(fvar::TAG, &fvar_data)
        .with_table(hvar::HVAR_TAG, &hvar_data);
    let axes = AxisCollection::new(&font);
    let hvar = font.hvar().unwrap();
    assert!(font.vvar().is_err());
    let location = axes.location([("wght", 900.0)]);
    let metrics = VariableMetrics::new(Some(&hvar), None, (&location).into());
    assert_eq!(metrics.delta(GlyphId::new(0), Metric::AdvanceWidth), 100.0);
    assert_eq!(metrics.delta(GlyphId::new(1), Metric::AdvanceWidth), -300.0);
    assert_eq!(metrics.delta(GlyphId::new(1), Metric::LeftSideBearing), 70000.0);
    assert_eq!(metrics.delta(GlyphId::new(0), Metric::AdvanceHeight), 0.0);
    // the light side of wght only activates the third region
    let location = axes.location([("wght", 250.0)]);
    let metrics = VariableMetrics::new(Some(&hvar), None, (&location).into());
    assert_eq!(metrics.delta(GlyphId::new(0), Metric::AdvanceWidth), -10.0);
}

#[test]
fn outline_deltas_from_settings() {
    init_logging();
    let fvar_data = variations::fvar_wght_wdth();
    let gvar_bytes = gvar_data::gvar();
    let font = Font::default()
        .with_table(fvar::TAG, &fvar_data)
        .with_table(gvar::TAG, &gvar_bytes);
    let axes = AxisCollection::new(&font);
    let gvar = font.gvar().unwrap();
    let points: Vec<_> = gvar_data::SQUARE_POINTS
        .iter()
        .map(|(x, y)| Point::new(*x, *y))
        .collect();
    let deltas = |settings: &[(&str, f32)]| {
        let location = axes.location(settings.iter().copied());
        glyph_deltas(
            &gvar,
            GlyphId::new(0),
            LocationRef::from(&location),
            &points,
            &gvar_data::SQUARE_CONTOURS,
        )
        .unwrap()
    };
    assert_eq!(deltas(&[]), vec![Point::new(0.0, 0.0); 4]);
    assert_eq!(
        deltas(&[("wght", 900.0)]),
        [
            Point::new(10.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(10.0, 0.0)
        ]
    );
    assert_eq!(deltas(&[("wght", 100.0)]), vec![Point::new(0.0, -5.0); 4]);
}
