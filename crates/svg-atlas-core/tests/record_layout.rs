use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use svg_atlas_core::record::{self, NameTable, RecordLayout, RectBuffer};
use svg_atlas_core::{AtlasError, PackedRect, SourceRef};

fn random_rect(rng: &mut StdRng, names: &[&str]) -> PackedRect {
    PackedRect {
        name: names[rng.gen_range(0..names.len())].to_string(),
        original_x: rng.gen_range(-500..500),
        original_y: rng.gen_range(-500..500),
        x: rng.gen_range(0..4096),
        y: rng.gen_range(0..4096),
        width: rng.gen_range(1..512),
        height: rng.gen_range(1..512),
        source: SourceRef(rng.gen_range(0..16)),
        element_index: rng.gen_range(0..64),
        z_order: rng.gen_range(-8..64),
        dst_viewport_width: rng.gen_range(1.0f32..2048.0),
        dst_viewport_height: rng.gen_range(1.0f32..2048.0),
    }
}

#[test]
fn record_sizes() {
    assert_eq!(RecordLayout::Compact.record_size(), 48);
    assert_eq!(RecordLayout::Wide.record_size(), 56);
    let native = RecordLayout::native();
    if cfg!(target_pointer_width = "64") {
        assert_eq!(native, RecordLayout::Wide);
    } else {
        assert_eq!(native, RecordLayout::Compact);
    }
}

#[test]
fn buffers_decode_to_what_was_encoded() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let names = ["", "head", "arm", "leg", "torso"];
    for layout in [RecordLayout::Compact, RecordLayout::Wide] {
        let rects: Vec<PackedRect> = (0..37).map(|_| random_rect(&mut rng, &names)).collect();
        let buf = RectBuffer::encode(&rects, layout);
        assert_eq!(buf.len(), rects.len());
        assert_eq!(buf.as_bytes().len(), rects.len() * layout.record_size());
        assert_eq!(buf.decode_all().unwrap(), rects);
    }
}

#[test]
fn wide_layout_pads_with_zeros() {
    let mut rng = StdRng::seed_from_u64(7);
    let rect = random_rect(&mut rng, &["x"]);
    let mut names = NameTable::new();
    let mut out = Vec::new();
    record::encode(&rect, RecordLayout::Wide, &mut names, &mut out);
    assert_eq!(out.len(), 56);
    assert_eq!(&out[52..56], &[0, 0, 0, 0]);
    // name reference is little-endian index 1
    assert_eq!(&out[0..8], &1u64.to_le_bytes());
}

#[test]
fn empty_name_is_reference_zero() {
    let mut names = NameTable::new();
    assert_eq!(names.intern(""), 0);
    assert_eq!(names.intern("a"), 1);
    assert_eq!(names.intern("a"), 1);
    assert_eq!(names.get(0), Some(""));
    assert_eq!(names.len(), 2);
}

#[test]
fn truncated_buffer_is_malformed() {
    let mut rng = StdRng::seed_from_u64(11);
    let rects: Vec<PackedRect> = (0..2).map(|_| random_rect(&mut rng, &["a"])).collect();
    let layout = RecordLayout::Compact;
    let buf = RectBuffer::encode(&rects, layout);
    let bytes = &buf.as_bytes()[..buf.as_bytes().len() - 1];

    assert!(record::decode(bytes, 0, layout, buf.names()).is_ok());
    match record::decode(bytes, 48, layout, buf.names()) {
        Err(AtlasError::MalformedRecord {
            offset,
            needed,
            available,
        }) => {
            assert_eq!(offset, 48);
            assert_eq!(needed, 48);
            assert_eq!(available, 47);
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
    assert!(matches!(
        record::decode_all(bytes, 2, layout, buf.names()),
        Err(AtlasError::MalformedRecord { .. })
    ));
    assert!(matches!(
        record::decode(bytes, 1000, layout, buf.names()),
        Err(AtlasError::MalformedRecord { available: 0, .. })
    ));
}

#[test]
fn unknown_name_reference_is_rejected() {
    let mut rng = StdRng::seed_from_u64(3);
    let rect = random_rect(&mut rng, &["named"]);
    let mut names = NameTable::new();
    let mut out = Vec::new();
    record::encode(&rect, RecordLayout::Compact, &mut names, &mut out);
    let empty = NameTable::new();
    assert!(matches!(
        record::decode(&out, 0, RecordLayout::Compact, &empty),
        Err(AtlasError::UnknownName { offset: 0, index: 1 })
    ));
}
