use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use svg_atlas_core::config::{MaxRectsHeuristic, SkylineHeuristic};
use svg_atlas_core::model::Rect;
use svg_atlas_core::packer::{BinLimits, BuiltinPlacer, Placer, PlacementItem};

fn placers() -> Vec<BuiltinPlacer> {
    vec![
        BuiltinPlacer::MaxRects(MaxRectsHeuristic::BestAreaFit),
        BuiltinPlacer::MaxRects(MaxRectsHeuristic::BestShortSideFit),
        BuiltinPlacer::MaxRects(MaxRectsHeuristic::BestLongSideFit),
        BuiltinPlacer::MaxRects(MaxRectsHeuristic::BottomLeft),
        BuiltinPlacer::MaxRects(MaxRectsHeuristic::ContactPoint),
        BuiltinPlacer::Skyline(SkylineHeuristic::BottomLeft),
        BuiltinPlacer::Skyline(SkylineHeuristic::MinWaste),
    ]
}

#[test]
fn placements_respect_border_spacing() {
    let mut rng = StdRng::seed_from_u64(0xa71a5);
    for placer in placers() {
        for border in [0u32, 1, 3] {
            let limits = BinLimits {
                max_dimension: 256,
                border,
            };
            let items: Vec<PlacementItem> = (0..60)
                .map(|id| PlacementItem {
                    id,
                    width: rng.gen_range(1..48),
                    height: rng.gen_range(1..48),
                })
                .collect();
            let placed = placer.place(&items, &limits);
            assert!(!placed.is_empty(), "{placer:?}");

            // grow every element by the border on its right/bottom side
            let slots: Vec<Rect> = placed
                .iter()
                .map(|p| {
                    let it = &items[p.id];
                    Rect::new(p.x, p.y, it.width + border, it.height + border)
                })
                .collect();
            for (i, a) in slots.iter().enumerate() {
                assert!(a.x >= border && a.y >= border, "{placer:?} border {border}");
                assert!(a.right() <= 256 && a.bottom() <= 256);
                for b in &slots[i + 1..] {
                    assert!(!a.intersects(b), "{placer:?} border {border}: {a:?} vs {b:?}");
                }
            }
            let mut ids: Vec<usize> = placed.iter().map(|p| p.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), placed.len());
        }
    }
}

#[test]
fn single_item_fills_tightest_page() {
    for placer in placers() {
        let limits = BinLimits {
            max_dimension: 10,
            border: 2,
        };
        assert!(limits.fits(6, 6));
        assert!(!limits.fits(7, 6));
        let placed = placer.place(&[PlacementItem { id: 7, width: 6, height: 6 }], &limits);
        assert_eq!(placed.len(), 1, "{placer:?}");
        assert_eq!((placed[0].id, placed[0].x, placed[0].y), (7, 2, 2));
    }
}
