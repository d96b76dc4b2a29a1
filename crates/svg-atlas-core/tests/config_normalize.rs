use svg_atlas_core::config::{MAX_PAGE_DIMENSION, clamp_border, max_border, normalize_max_dimension};
use svg_atlas_core::prelude::*;

fn generator(cfg: GeneratorConfig) -> AtlasGenerator<MemoryLoader, SceneRasterizer> {
    AtlasGenerator::new(cfg, MemoryLoader::new(), SceneRasterizer).expect("valid config")
}

#[test]
fn border_is_clamped_to_leave_one_pixel() {
    assert_eq!(max_border(8), 3);
    assert_eq!(max_border(9), 4);
    assert_eq!(max_border(1), 0);
    assert_eq!(clamp_border(100, 8), 3);
    assert_eq!(clamp_border(2, 8), 2);
    for d in 1..200u32 {
        let b = max_border(d);
        assert!(2 * b + 1 <= d, "d={d} b={b}");
        assert!(2 * (b + 1) + 1 > d, "d={d} b={b} is not the largest");
    }
}

#[test]
fn pow2_rounds_max_dimension_up() {
    assert_eq!(normalize_max_dimension(500, true), 512);
    assert_eq!(normalize_max_dimension(512, true), 512);
    assert_eq!(normalize_max_dimension(500, false), 500);
    assert_eq!(normalize_max_dimension(0, false), 1);
    assert_eq!(normalize_max_dimension(0, true), 1);
}

#[test]
fn generator_applies_normalization() {
    let cfg = GeneratorConfig::builder()
        .max_dimension(500)
        .pow2(true)
        .border(1000)
        .build();
    let g = generator(cfg);
    assert_eq!(g.max_dimension(), 512);
    assert_eq!(g.border(), 255);
    assert!(g.pow2());
}

#[test]
fn setters_renormalize_from_requested_values() {
    let cfg = GeneratorConfig::builder().max_dimension(1024).border(10).build();
    let mut g = generator(cfg);
    g.set_max_dimension(4).unwrap();
    assert_eq!(g.border(), 1);
    g.set_max_dimension(1024).unwrap();
    assert_eq!(g.border(), 10);

    g.set_max_dimension(300).unwrap();
    g.set_pow2(true).unwrap();
    assert_eq!(g.max_dimension(), 512);
    g.set_pow2(false).unwrap();
    assert_eq!(g.max_dimension(), 300);
}

#[test]
fn invalid_values_are_rejected() {
    for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let cfg = GeneratorConfig::builder().scale(scale).build();
        let err = AtlasGenerator::new(cfg, MemoryLoader::new(), SceneRasterizer).err();
        assert!(matches!(err, Some(AtlasError::InvalidConfig(_))), "scale {scale}");
    }
    let cfg = GeneratorConfig::builder().max_dimension(0).build();
    assert!(matches!(
        AtlasGenerator::new(cfg, MemoryLoader::new(), SceneRasterizer).err(),
        Some(AtlasError::InvalidConfig(_))
    ));

    let mut g = generator(GeneratorConfig::default());
    assert!(g.set_scale(0.0).is_err());
    assert!(g.set_max_dimension(0).is_err());
    // a rejected update leaves the previous values in place
    assert_eq!(g.scale(), 1.0);
    assert_eq!(g.max_dimension(), 1024);
}

#[test]
fn page_sizes_beyond_record_range_are_rejected() {
    let limit = MAX_PAGE_DIMENSION;
    assert_eq!(limit, i32::MAX as u32);
    assert!(GeneratorConfig::builder().max_dimension(limit).build().validate().is_ok());
    for (max, pow2) in [(limit + 1, false), (u32::MAX, false), (limit, true), (1 << 30 | 1, true)] {
        let cfg = GeneratorConfig::builder().max_dimension(max).pow2(pow2).build();
        assert!(
            matches!(cfg.validate(), Err(AtlasError::InvalidConfig(_))),
            "max {max} pow2 {pow2}"
        );
    }
    assert!(GeneratorConfig::builder().max_dimension(1 << 30).pow2(true).build().validate().is_ok());

    let mut g = generator(GeneratorConfig::default());
    assert!(g.set_max_dimension(u32::MAX).is_err());
    assert_eq!(g.max_dimension(), 1024);
}

#[test]
fn defaults_and_partial_yaml() {
    let cfg = GeneratorConfig::default();
    assert_eq!(cfg.scale, 1.0);
    assert_eq!(cfg.max_dimension, 1024);
    assert_eq!(cfg.border, 1);
    assert!(!cfg.pow2);
    assert_eq!(cfg.clear_color, [0, 0, 0, 0]);
    assert!(cfg.dilate_edges);
    assert_eq!(cfg.filter(), FilterMode::Linear);

    let parsed: GeneratorConfig =
        serde_yaml::from_str("max_dimension: 256\npow2: true\nplacer: skyline\n").unwrap();
    assert_eq!(parsed.max_dimension, 256);
    assert!(parsed.pow2);
    assert_eq!(parsed.placer, PlacerKind::Skyline);
    assert_eq!(parsed.border, 1);
}

#[test]
fn enums_parse_from_cli_strings() {
    assert_eq!("maxrects".parse::<PlacerKind>(), Ok(PlacerKind::MaxRects));
    assert_eq!("Skyline".parse::<PlacerKind>(), Ok(PlacerKind::Skyline));
    assert!("guillotine".parse::<PlacerKind>().is_err());
    assert_eq!("cp".parse::<MaxRectsHeuristic>(), Ok(MaxRectsHeuristic::ContactPoint));
    assert_eq!("minwaste".parse::<SkylineHeuristic>(), Ok(SkylineHeuristic::MinWaste));
    assert_eq!("faster".parse::<RenderingQuality>(), Ok(RenderingQuality::Faster));
}
