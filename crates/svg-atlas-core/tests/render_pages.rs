use svg_atlas_core::prelude::*;
use svg_atlas_core::{Shape, ShapeKind};

fn block(w: f32, h: f32, fill: [u8; 4]) -> SceneDocument {
    SceneDocument::new(w, h).with_group(
        Some("block"),
        vec![Shape {
            kind: ShapeKind::Rect,
            x: 0.0,
            y: 0.0,
            w,
            h,
            fill,
        }],
    )
}

fn generate(cfg: GeneratorConfig, docs: &[(&str, SceneDocument)]) -> Atlas {
    let mut loader = MemoryLoader::new();
    for (id, d) in docs {
        loader.insert(*id, d.clone());
    }
    let mut g = AtlasGenerator::new(cfg, loader, SceneRasterizer).unwrap();
    for (id, _) in docs {
        g.add_input(*id, true, 1.0).unwrap();
    }
    g.generate().unwrap()
}

#[test]
fn elements_are_drawn_at_their_packed_position() {
    let red = [255, 0, 0, 255];
    let blue = [0, 0, 255, 255];
    let cfg = GeneratorConfig::builder()
        .max_dimension(128)
        .border(2)
        .clear_color([0, 255, 0, 255])
        .dilate_edges(false)
        .build();
    let atlas = generate(cfg, &[("red.json", block(20.0, 10.0, red)), ("blue.json", block(8.0, 8.0, blue))]);
    assert_eq!(atlas.pages().len(), 1);
    let page = &atlas.pages()[0];
    assert_eq!(page.filter(), FilterMode::Nearest);

    for (key, color) in [("red#block", red), ("blue#block", blue)] {
        let r = atlas.region(key).unwrap();
        let px = page.pixels();
        for y in r.y()..r.y() + r.height() {
            for x in r.x()..r.x() + r.width() {
                assert_eq!(px.get_pixel(x as u32, y as u32).0, color, "{key} at {x},{y}");
            }
        }
        // the border ring around the element keeps the clear color
        assert_eq!(px.get_pixel((r.x() - 1) as u32, r.y() as u32).0, [0, 255, 0, 255]);
        assert_eq!(px.get_pixel(r.x() as u32, (r.y() - 1) as u32).0, [0, 255, 0, 255]);
    }
}

#[test]
fn dilation_switches_filter_and_keeps_alpha() {
    let cfg = GeneratorConfig::builder()
        .max_dimension(64)
        .border(1)
        .dilate_edges(true)
        .build();
    let atlas = generate(cfg, &[("a.json", block(10.0, 10.0, [10, 20, 30, 255]))]);
    let page = &atlas.pages()[0];
    assert_eq!(page.filter(), FilterMode::Linear);
    let r = atlas.region("a#block").unwrap();
    let left = page.pixels().get_pixel((r.x() - 1) as u32, r.y() as u32).0;
    assert_eq!(left, [10, 20, 30, 0]);
}

#[test]
fn pages_have_exact_or_pow2_size() {
    let cfg = GeneratorConfig::builder()
        .max_dimension(256)
        .border(1)
        .pow2(false)
        .build();
    let atlas = generate(cfg, &[("a.json", block(30.0, 12.0, [1, 1, 1, 255]))]);
    let page = &atlas.pages()[0];
    assert_eq!((page.width(), page.height()), (32, 14));

    let cfg = GeneratorConfig::builder()
        .max_dimension(256)
        .border(1)
        .pow2(true)
        .build();
    let atlas = generate(cfg, &[("a.json", block(30.0, 12.0, [1, 1, 1, 255]))]);
    let page = &atlas.pages()[0];
    assert_eq!((page.width(), page.height()), (32, 16));
    let uv = atlas.region("a#block").unwrap().uv(TextureAllocation::Exact);
    assert_eq!(uv.u0, 1.0 / 32.0);
    assert_eq!(uv.u1, 31.0 / 32.0);
}

#[test]
fn stats_account_for_every_region() {
    let cfg = GeneratorConfig::builder().max_dimension(128).border(0).build();
    let docs: Vec<(String, SceneDocument)> = (0..4)
        .map(|i| (format!("s{i}.json"), block(32.0, 32.0, [0, 0, 0, 255])))
        .collect();
    let refs: Vec<(&str, SceneDocument)> = docs.iter().map(|(k, d)| (k.as_str(), d.clone())).collect();
    let atlas = generate(cfg, &refs);
    let stats = atlas.stats();
    assert_eq!(stats.num_regions, 4);
    assert_eq!(stats.used_area, 4 * 32 * 32);
    assert!(stats.total_page_area >= stats.used_area);
    assert!(stats.occupancy > 0.0 && stats.occupancy <= 1.0);
    assert!(stats.summary().contains("Regions: 4"));
}

#[test]
fn fractional_offset_element_fills_its_frame() {
    let teal = [0, 128, 128, 255];
    let doc = SceneDocument::new(40.0, 40.0).with_group(
        Some("chip"),
        vec![Shape {
            kind: ShapeKind::Rect,
            x: 3.5,
            y: 7.25,
            w: 10.0,
            h: 6.0,
            fill: teal,
        }],
    );
    let cfg = GeneratorConfig::builder()
        .max_dimension(64)
        .border(1)
        .clear_color([255, 0, 255, 255])
        .dilate_edges(false)
        .quality(RenderingQuality::NonAntialiased)
        .build();
    let atlas = generate(cfg, &[("chip.json", doc)]);
    let r = atlas.region("chip#chip").unwrap();
    assert_eq!((r.width(), r.height()), (10, 6));
    assert_eq!((r.rect.original_x, r.rect.original_y), (3, 7));
    let px = atlas.pages()[0].pixels();
    for y in r.y()..r.y() + r.height() {
        for x in r.x()..r.x() + r.width() {
            assert_eq!(px.get_pixel(x as u32, y as u32).0, teal, "{x},{y}");
        }
    }
}
