use image::RgbaImage;
use svg_atlas_core::prelude::*;
use svg_atlas_core::{RasterError, Shape, ShapeKind};

fn doc(size: f32) -> SceneDocument {
    SceneDocument::new(size, size).with_group(
        Some("body"),
        vec![Shape {
            kind: ShapeKind::Rect,
            x: 0.0,
            y: 0.0,
            w: size,
            h: size,
            fill: [0, 128, 255, 255],
        }],
    )
}

struct FailingRasterizer;

impl Rasterizer<SceneDocument> for FailingRasterizer {
    fn draw_batch(
        &self,
        _documents: &[SceneDocument],
        _rects: &[PackedRect],
        _surface: &mut RgbaImage,
        _quality: RenderingQuality,
    ) -> std::result::Result<(), RasterError> {
        Err(RasterError::Draw("out of memory".into()))
    }
}

#[test]
fn duplicate_inputs_are_ignored() {
    let loader = MemoryLoader::new().with("a.json", doc(8.0));
    let mut g = AtlasGenerator::new(GeneratorConfig::default(), loader, SceneRasterizer).unwrap();
    assert!(g.add_input("a.json", false, 1.0).unwrap());
    assert!(!g.add_input("a.json", true, 2.0).unwrap());
    assert_eq!(g.inputs().len(), 1);
    assert!(!g.inputs()[0].explode_groups);
    assert!(matches!(
        g.add_input("b.json", false, 0.0),
        Err(AtlasError::InvalidConfig(_))
    ));
    assert_eq!(g.inputs().len(), 1);
}

#[test]
fn missing_source_fails_before_packing() {
    let loader = MemoryLoader::new().with("a.json", doc(8.0));
    let mut g = AtlasGenerator::new(GeneratorConfig::default(), loader, SceneRasterizer).unwrap();
    g.add_input("a.json", false, 1.0).unwrap();
    g.add_input("missing.json", false, 1.0).unwrap();
    let err = g.generate().err().expect("load failure");
    assert!(err.is_recoverable());
    match err {
        AtlasError::SourceLoadFailed { source_id, reason } => {
            assert_eq!(source_id, "missing.json");
            assert!(matches!(reason, svg_atlas_core::LoadError::NotFound(_)));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn rasterizer_failure_names_the_bin() {
    let loader = MemoryLoader::new().with("a.json", doc(8.0));
    let mut g = AtlasGenerator::new(GeneratorConfig::default(), loader, FailingRasterizer).unwrap();
    g.add_input("a.json", false, 1.0).unwrap();
    match g.generate() {
        Err(AtlasError::RasterizationFailed { bin_index, reason }) => {
            assert_eq!(bin_index, 0);
            assert_eq!(reason, RasterError::Draw("out of memory".into()));
        }
        other => panic!("expected RasterizationFailed, got {:?}", other.err()),
    }
}

#[test]
fn capacity_failure_can_be_fixed_and_retried() {
    let loader = MemoryLoader::new()
        .with("small.json", doc(8.0))
        .with("big.json", doc(100.0));
    let cfg = GeneratorConfig::builder().max_dimension(64).border(1).build();
    let mut g = AtlasGenerator::new(cfg, loader, SceneRasterizer).unwrap();
    g.add_input("small.json", false, 1.0).unwrap();
    g.add_input("big.json", false, 1.0).unwrap();

    let err = g.generate().err().expect("capacity failure");
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("big.json"));
    assert!(matches!(
        err,
        AtlasError::CapacityExceeded { collected: 1, packed: 0, max_dimension: 64, .. }
    ));

    g.set_max_dimension(128).unwrap();
    let atlas = g.generate().unwrap();
    assert_eq!(atlas.regions().len(), 2);
}

#[test]
fn scale_is_reported_with_the_shortfall() {
    let loader = MemoryLoader::new().with("a.json", doc(40.0));
    let cfg = GeneratorConfig::builder().max_dimension(64).scale(2.0).build();
    let mut g = AtlasGenerator::new(cfg, loader, SceneRasterizer).unwrap();
    g.add_input("a.json", false, 0.5).unwrap();
    // 2.0 * 0.5 keeps the box at 40px, which fits
    assert!(g.generate().is_ok());

    g.set_scale(4.0).unwrap();
    match g.generate() {
        Err(AtlasError::CapacityExceeded { scale, .. }) => assert_eq!(scale, 2.0),
        other => panic!("expected CapacityExceeded, got {:?}", other.err()),
    }
}

#[test]
fn collect_stats_reports_every_input() {
    let loader = MemoryLoader::new()
        .with("a.json", doc(8.0))
        .with("b.json", doc(500.0));
    let cfg = GeneratorConfig::builder().max_dimension(64).build();
    let mut g = AtlasGenerator::new(cfg, loader, SceneRasterizer).unwrap();
    g.add_input("a.json", true, 1.0).unwrap();
    g.add_input("b.json", true, 1.0).unwrap();
    let stats = g.collect_stats().unwrap();
    assert_eq!(stats.len(), 2);
    assert!(stats[0].1.is_complete());
    assert_eq!(stats[1].1.shortfall(), 1);
}
