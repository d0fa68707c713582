// tests/map_tests.rs

mod common;

use common::{store, TOWN};
use macroquad::math::{ivec2, uvec2, vec2};
use macroquad_tiled_batch::{PropertyValue, TextureId};

#[test]
fn map_dimensions() {
    let mut maps = store();
    let map = maps.load_from_str("town.tmx", TOWN).expect("loads");

    assert_eq!(map.size_in_tiles(), uvec2(4, 3));
    assert_eq!(map.tile_size(), uvec2(16, 16));
    assert_eq!(map.size_in_pixels(), Some(uvec2(64, 48)));
    assert_eq!(map.batch_count(), 3);
}

#[test]
fn batches_hold_whole_quads_with_local_indices() {
    let mut maps = store();
    let map = maps.load_from_str("town.tmx", TOWN).expect("loads");

    for batch in map.batches() {
        assert_eq!(batch.vertices.len() % 4, 0);
        assert_eq!(batch.indices.len(), batch.vertices.len() / 4 * 6);
        for (q, tri) in batch.indices.chunks(6).enumerate() {
            let base = q as u32 * 4;
            assert_eq!(tri, [base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
}

#[test]
fn decor_tiles_land_in_their_cells_with_their_uvs() {
    let mut maps = store();
    let map = maps.load_from_str("town.tmx", TOWN).expect("loads");
    let props = &map.layer("decor").expect("decor").batches[0];
    assert_eq!(props.texture, TextureId(101));

    // gid 17: props tile 0 at cell (1, 0)
    assert_eq!(props.vertices[0].position, vec2(16.0, 16.0));
    assert_eq!(props.vertices[2].position, vec2(32.0, 0.0));
    assert_eq!(props.vertices[0].uv, vec2(0.0, 0.5));
    assert_eq!(props.vertices[2].uv, vec2(0.5, 0.0));

    // gid 18: props tile 1 at cell (0, 1)
    assert_eq!(props.vertices[4].position, vec2(0.0, 32.0));
    assert_eq!(props.vertices[4].uv, vec2(0.5, 0.5));

    // gid 20: props tile 3 at cell (2, 2)
    assert_eq!(props.vertices[11].position, vec2(32.0, 32.0));
    assert_eq!(props.vertices[11].uv, vec2(0.5, 0.5));
    assert_eq!(props.vertices[9].uv, vec2(1.0, 1.0));
}

#[test]
fn flipped_gid_swaps_uvs_but_not_positions() {
    let xml = r#"<map width="2" height="1" tilewidth="16" tileheight="16">
        <tileset firstgid="1" tilecount="16" columns="4"><image source="terrain.png"/></tileset>
        <layer name="ground"><data encoding="csv">1,2147483649</data></layer>
    </map>"#;
    let mut maps = store();
    let map = maps.load_from_str("flip.tmx", xml).expect("loads");
    let batch = &map.layers()[0].batches[0];

    assert_eq!(batch.quad_count(), 2);
    let plain = &batch.vertices[0..4];
    let flipped = &batch.vertices[4..8];
    for i in 0..4 {
        assert_eq!(flipped[i].position, plain[i].position + vec2(16.0, 0.0));
    }
    // left-bottom now samples the right edge
    assert_eq!(flipped[0].uv, plain[1].uv);
    assert_eq!(flipped[1].uv, plain[0].uv);
}

#[test]
fn objects_come_out_in_document_order() {
    let mut maps = store();
    let map = maps.load_from_str("town.tmx", TOWN).expect("loads");
    let ids: Vec<_> = map.objects().iter().map(|o| o.id).collect();
    assert_eq!(ids, [1, 2, 3]);

    let spawn = map.objects_by_name("spawn").next().expect("spawn");
    assert_eq!(spawn.kind, "player");
    assert_eq!(spawn.group, "entities");
    assert_eq!(spawn.position, ivec2(10, 20));
    assert_eq!(spawn.size, uvec2(32, 32));

    let team = spawn.property("team").expect("team");
    assert_eq!(team.parsed(), PropertyValue::Int(1));
    assert_eq!(team.as_i64(), Some(1));
}

#[test]
fn objects_by_type_keeps_duplicates() {
    let mut maps = store();
    let map = maps.load_from_str("town.tmx", TOWN).expect("loads");

    let chests: Vec<_> = map.objects_by_type("loot").map(|o| o.position).collect();
    assert_eq!(chests, [ivec2(48, 16), ivec2(0, 32)]);
    assert_eq!(map.objects_by_name("chest").count(), 2);
    assert_eq!(map.objects_by_type("enemy").count(), 0);
}

#[test]
fn map_without_objects_loads() {
    let xml = r#"<map width="1" height="1" tilewidth="8" tileheight="8">
        <tileset firstgid="1" tilecount="16" columns="4"><image source="terrain.png"/></tileset>
        <layer name="ground"><data encoding="csv">1</data></layer>
    </map>"#;
    let mut maps = store();
    let map = maps.load_from_str("bare.tmx", xml).expect("loads");
    assert!(map.objects().is_empty());
}

#[test]
fn oversized_map_loads_and_reports_no_pixel_size() {
    let xml = r#"<map width="70000" height="2" tilewidth="70000" tileheight="16">
        <tileset firstgid="1" tilewidth="16" tileheight="16" tilecount="16" columns="4">
            <image source="terrain.png"/>
        </tileset>
        <layer name="ground"><data encoding="csv">1</data></layer>
    </map>"#;
    let mut maps = store();
    let map = maps.load_from_str("wide.tmx", xml).expect("loads");

    assert_eq!(map.size_in_tiles(), uvec2(70000, 2));
    assert_eq!(map.size_in_pixels(), None);
    assert_eq!(map.batch_count(), 1);
}

#[test]
fn huge_grid_with_one_value_builds_one_quad() {
    let xml = r#"<map width="60000" height="60000" tilewidth="16" tileheight="16">
        <tileset firstgid="1" tilecount="16" columns="4"><image source="terrain.png"/></tileset>
        <layer name="ground"><data encoding="csv">1</data></layer>
    </map>"#;
    let mut maps = store();
    let map = maps.load_from_str("vast.tmx", xml).expect("loads");

    assert_eq!(map.batch_count(), 1);
    assert_eq!(map.layers()[0].batches[0].quad_count(), 1);
    assert_eq!(map.size_in_pixels(), Some(uvec2(960_000, 960_000)));
}

#[test]
fn tilesets_with_the_same_image_share_one_batch() {
    let xml = r#"<map width="2" height="1" tilewidth="16" tileheight="16">
        <tileset firstgid="1" tilecount="16" columns="4"><image source="a/terrain.png"/></tileset>
        <tileset firstgid="17" tilecount="16" columns="4"><image source="b/terrain.png"/></tileset>
        <layer name="ground"><data encoding="csv">2,21</data></layer>
    </map>"#;
    let mut maps = store();
    let map = maps.load_from_str("alias.tmx", xml).expect("loads");
    let batches = &map.layers()[0].batches;

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].texture, TextureId(100));
    assert_eq!(batches[0].quad_count(), 2);
    // each tile uses its own tileset's local number
    assert_eq!(batches[0].vertices[3].uv, vec2(0.25, 0.0));
    assert_eq!(batches[0].vertices[7].uv, vec2(0.0, 0.25));
}

#[test]
fn layer_opacity_is_kept_for_callers() {
    let xml = r#"<map width="1" height="1" tilewidth="16" tileheight="16">
        <tileset firstgid="1" tilecount="16" columns="4"><image source="terrain.png"/></tileset>
        <layer name="fog" opacity="0.25"><data encoding="csv">1</data></layer>
    </map>"#;
    let mut maps = store();
    let map = maps.load_from_str("fog.tmx", xml).expect("loads");
    let fog = map.layer("fog").expect("fog");

    assert_eq!(fog.opacity, 0.25);
    assert!(fog.visible);
    assert!(maps.draw("fog.tmx"));
    assert_eq!(maps.backend().draws.len(), 1);
}
