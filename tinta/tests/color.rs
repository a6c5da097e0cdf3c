//! Color glyph resolution through the public API.

mod common;

use common::{init_logging, Font};
use kurbo::Shape;
use pretty_assertions::assert_eq;
use tinta::{
    color::{
        Brush, Color, ColorGlyphCollection, ColorGlyphFormat, Extend, PaintError,
        ResolvedGlyphLayer, Transform,
    },
    raw::{
        tables::colr::{self, CompositeMode, Paint},
        types::{BoundingBox, F2Dot14, Point},
    },
    AxisCollection, GlyphId, LocationRef,
};
use tinta_test_data::{colr as test_data, variations};

/// Palette entries are pure red, green and blue.
fn palette(palette_index: u16, alpha: f32) -> Color {
    let mut color = Color {
        alpha: (alpha * 255.0).round() as u8,
        ..Default::default()
    };
    match palette_index {
        test_data::RED => color.red = 255,
        test_data::GREEN => color.green = 255,
        _ => color.blue = 255,
    }
    color
}

fn layers(glyphs: &ColorGlyphCollection, glyph_id: u32) -> Vec<ResolvedGlyphLayer> {
    glyphs
        .v1_layers(GlyphId::new(glyph_id), LocationRef::default())
        .unwrap()
}

#[test]
fn composite_with_unbound_backdrop() {
    init_logging();
    let data = test_data::colr_v1();
    let font = Font::default().with_table(colr::TAG, &data);
    let glyphs = ColorGlyphCollection::new(&font);
    let layers = layers(&glyphs, test_data::COMPOSITE_GLYPH);
    assert_eq!(
        layers,
        [ResolvedGlyphLayer {
            glyph_id: GlyphId::new(7),
            paint: Paint::Solid {
                palette_index: test_data::RED,
                alpha: F2Dot14::ONE,
            },
            transform: Transform::IDENTITY,
            composite_mode: CompositeMode::SrcOver,
            clip_box: Some(BoundingBox {
                x_min: 0.0,
                y_min: 0.0,
                x_max: 100.0,
                y_max: 100.0,
            }),
        }]
    );
    assert_eq!(
        glyphs.brush(&layers[0], LocationRef::default(), &palette),
        Some(Brush::Solid(Color {
            red: 255,
            green: 0,
            blue: 0,
            alpha: 255
        }))
    );
}

#[test]
fn scale_applies_before_translate() {
    let data = test_data::colr_v1();
    let font = Font::default().with_table(colr::TAG, &data);
    let glyphs = ColorGlyphCollection::new(&font);
    let layers = layers(&glyphs, test_data::TRANSFORM_GLYPH);
    assert_eq!(layers.len(), 1);
    let transform = layers[0].transform;
    let expected = Transform::translate(10.0, 5.0) * Transform::scale(1.5, 1.5);
    assert_eq!(transform, expected);
    assert_eq!(
        transform.transform_point(Point::new(2.0, 4.0)),
        Point::new(13.0, 11.0)
    );
    // same result through kurbo
    let affine = kurbo::Affine::from(transform);
    assert_eq!(
        affine * kurbo::Point::new(2.0, 4.0),
        kurbo::Point::new(13.0, 11.0)
    );
    let square = |glyph_id: GlyphId, _: LocationRef| {
        (glyph_id == GlyphId::new(3))
            .then(|| kurbo::Rect::new(0.0, 0.0, 100.0, 100.0).to_path(0.1))
    };
    let path = layers[0].geometry(LocationRef::default(), &square).unwrap();
    assert_eq!(path.bounding_box(), kurbo::Rect::new(10.0, 5.0, 160.0, 155.0));
}

#[test]
fn failing_glyphs_do_not_affect_others() {
    init_logging();
    let data = test_data::colr_v1();
    let font = Font::default().with_table(colr::TAG, &data);
    let glyphs = ColorGlyphCollection::new(&font);
    let location = LocationRef::default();
    assert_eq!(
        glyphs.v1_layers(GlyphId::new(test_data::CYCLE_GLYPH), location),
        Err(PaintError::PaintCycleDetected)
    );
    assert_eq!(
        glyphs.v1_layers(GlyphId::new(test_data::DEEP_GLYPH), location),
        Err(PaintError::DepthLimitExceeded)
    );
    assert_eq!(
        glyphs.v1_layers(GlyphId::new(test_data::UNBOUND_GLYPH), location),
        Err(PaintError::NoLayers(GlyphId::new(test_data::UNBOUND_GLYPH)))
    );
    // every other v1 glyph still resolves
    let resolved: Vec<_> = glyphs
        .iter_v1()
        .filter(|glyph| glyph.resolve(location).is_ok())
        .map(|glyph| glyph.glyph_id().to_u32())
        .collect();
    assert_eq!(resolved, [1, 2, 3, 6, 9, 12]);
}

#[test]
fn gradient_stops_are_sorted() {
    let data = test_data::colr_v1();
    let font = Font::default().with_table(colr::TAG, &data);
    let glyphs = ColorGlyphCollection::new(&font);
    let layers = layers(&glyphs, test_data::GRADIENT_GLYPH);
    let Some(Brush::LinearGradient {
        p0,
        p1,
        color_stops,
        extend,
    }) = glyphs.brush(&layers[0], LocationRef::default(), &palette)
    else {
        panic!("expected a linear gradient");
    };
    assert_eq!((p0, p1), (Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
    assert_eq!(extend, Extend::Pad);
    let stops: Vec<_> = color_stops
        .iter()
        .map(|stop| (stop.offset, stop.palette_index, stop.color))
        .collect();
    assert_eq!(
        stops,
        [
            (0.0, test_data::RED, palette(test_data::RED, 0.5)),
            (1.0, test_data::BLUE, palette(test_data::BLUE, 1.0)),
        ]
    );
}

#[test]
fn variable_paint_from_settings() {
    let fvar_data = variations::fvar_wght_wdth();
    let data = test_data::colr_v1();
    let font = Font::default()
        .with_table(tinta::raw::tables::fvar::TAG, &fvar_data)
        .with_table(colr::TAG, &data);
    let axes = AxisCollection::new(&font);
    let glyphs = ColorGlyphCollection::new(&font);
    let location = axes.location([("wght", 900.0)]);
    let layers = glyphs
        .v1_layers(GlyphId::new(test_data::VARIABLE_GLYPH), (&location).into())
        .unwrap();
    assert_eq!(layers[0].transform, Transform::translate(110.0, -280.0));
    assert_eq!(
        layers[0].clip_box,
        Some(BoundingBox {
            x_min: 100.0,
            y_min: -300.0,
            x_max: 50.0,
            y_max: 50.0,
        })
    );
    let default = glyphs
        .v1_layers(GlyphId::new(test_data::VARIABLE_GLYPH), LocationRef::default())
        .unwrap();
    assert_eq!(default[0].transform, Transform::translate(10.0, 20.0));
}

#[test]
fn v0_only_table() {
    let data = test_data::colr_v0();
    let font = Font::default().with_table(colr::TAG, &data);
    let glyphs = ColorGlyphCollection::new(&font);
    let glyph_id = GlyphId::new(test_data::V0_GLYPH);
    assert!(glyphs.has_v0(glyph_id));
    assert!(!glyphs.has_v1(glyph_id));
    assert!(glyphs.iter_v1().next().is_none());
    let glyph = glyphs.get(glyph_id).unwrap();
    assert_eq!(glyph.format(), ColorGlyphFormat::ColrV0);
    let layers: Vec<_> = glyph
        .resolve(LocationRef::default())
        .unwrap()
        .into_iter()
        .map(|layer| {
            let brush = glyphs.brush(&layer, LocationRef::default(), &palette);
            (layer.glyph_id.to_u32(), brush)
        })
        .collect();
    assert_eq!(
        layers,
        [
            (11, Some(Brush::Solid(palette(test_data::RED, 1.0)))),
            (12, Some(Brush::Solid(palette(test_data::GREEN, 1.0)))),
        ]
    );
}

#[test]
fn font_without_colr() {
    let font = Font::default();
    let glyphs = ColorGlyphCollection::new(&font);
    assert!(!glyphs.has_v0(GlyphId::new(1)));
    assert!(glyphs.get(GlyphId::new(1)).is_none());
    assert_eq!(
        glyphs.v1_layers(GlyphId::new(1), LocationRef::default()),
        Err(PaintError::GlyphNotFound(GlyphId::new(1)))
    );
}

#[cfg(feature = "serde")]
#[test]
fn serialize_transform() {
    let transform = Transform::translate(10.0, 5.0);
    let json = serde_json::to_string(&transform).unwrap();
    assert_eq!(
        json,
        r#"{"xx":1.0,"yx":0.0,"xy":0.0,"yy":1.0,"dx":10.0,"dy":5.0}"#
    );
    let round_trip: Transform = serde_json::from_str(&json).unwrap();
    assert_eq!(round_trip, transform);
    let metric = tinta::metrics::Metric::LeftSideBearing;
    assert_eq!(
        serde_json::to_string(&metric).unwrap(),
        r#""LeftSideBearing""#
    );
}
