use std::collections::HashSet;

use proptest::prelude::*;
use tessel_geom::{Rect, Transform, Vec2, Vec3};
use tessel_mesh_cpu::{BuilderLimits, DrawList, MaterialId, MeshError, TileMesh, TileMeshBuilder};
use tessel_tiles::{
    Texture, TextureId, TextureRegion, TileData, TileFlip, TileMap, TileMapData, TilePoint,
    TileSet, TileShape, TileSource,
};

fn region(id: u16) -> TextureRegion {
    TextureRegion::new(
        Texture::new(TextureId(id), 32, 32),
        Rect::new(Vec2::ZERO, Vec2::new(16.0, 16.0)),
    )
}

/// Two shapes on two textures, one shape on a third.
fn two_texture_map(w: i32, h: i32) -> TileMapData {
    let mut data = TileMapData::new(w, h);
    let set = TileSet::new(
        "ground",
        vec![
            TileShape::new("grass", vec![region(0)]),
            TileShape::new("stone", vec![region(1)]),
            TileShape::new("water", vec![region(2)]),
        ],
    );
    data.add_tile_set(set);
    data
}

fn chunk_tiles(source: &TileMapData, origin: TilePoint, cw: i32, ch: i32) -> Vec<tessel_tiles::Tile> {
    let mut out = Vec::new();
    for y in origin.y..origin.y + ch {
        for x in origin.x..origin.x + cw {
            out.push(source.get_tile(x, y));
        }
    }
    out
}

#[test]
fn chunk_with_two_textures_has_two_drawable_batches() {
    let mut data = two_texture_map(4, 4);
    data.fill(0, 0, 2, 4, TileData::new(0, 0, 0, TileFlip::None));
    data.fill(2, 0, 2, 4, TileData::new(0, 1, 0, TileFlip::None));
    let mut b = TileMeshBuilder::new(BuilderLimits::new(4, 4));
    let mut m = TileMesh::new();
    b.rebuild(&mut m, chunk_tiles(&data, TilePoint::ZERO, 4, 4), TilePoint::ZERO, 1.0)
        .unwrap();

    assert_eq!(m.vertices().len(), 64);
    assert_eq!(m.drawable_batch_count(), 2);
    assert_eq!(m.batch_count(), 2);
    for batch in m.batches() {
        assert_eq!(batch.len(), 8 * 6);
    }

    let mut list = DrawList::new("main");
    let n = m
        .submit(
            &mut list,
            Transform::from_translation(Vec3::new(1.0, 2.0, 0.0)),
            MaterialId(1),
        )
        .unwrap();
    assert_eq!(n, 2);
    let ids: HashSet<_> = list.iter().map(|c| c.texture.id).collect();
    assert_eq!(ids, HashSet::from([TextureId(0), TextureId(1)]));
}

#[test]
fn three_tiles_two_textures() {
    let mut data = two_texture_map(3, 1);
    data.set_tile(0, 0, TileData::new(0, 0, 0, TileFlip::None));
    data.set_tile(1, 0, TileData::new(0, 1, 0, TileFlip::None));
    data.set_tile(2, 0, TileData::new(0, 0, 0, TileFlip::None));
    let mut b = TileMeshBuilder::new(BuilderLimits::new(3, 1));
    let mut m = TileMesh::new();
    b.rebuild(&mut m, chunk_tiles(&data, TilePoint::ZERO, 3, 1), TilePoint::ZERO, 1.0)
        .unwrap();
    assert_eq!(m.batch_count(), 2);
    assert_eq!(m.batch(0).map(<[u32]>::len), Some(12));
    assert_eq!(m.batch(1).map(<[u32]>::len), Some(6));
    assert_eq!(m.batch(1), Some(&[4, 5, 7, 6, 7, 5][..]));
}

#[test]
fn empty_chunk_builds_only_the_untextured_batch() {
    let data = two_texture_map(4, 4);
    let mut b = TileMeshBuilder::new(BuilderLimits::new(4, 4));
    let mut m = TileMesh::new();
    b.rebuild(&mut m, chunk_tiles(&data, TilePoint::ZERO, 4, 4), TilePoint::ZERO, 1.0)
        .unwrap();
    assert_eq!(m.batch_count(), 1);
    assert_eq!(m.drawable_batch_count(), 0);
    let mut list = DrawList::new("main");
    assert_eq!(
        m.submit(&mut list, Transform::IDENTITY, MaterialId::default()).unwrap(),
        0
    );
}

#[test]
fn rebuild_with_fewer_textures_drops_stale_batches() {
    let mut data = two_texture_map(3, 1);
    data.set_tile(0, 0, TileData::new(0, 0, 0, TileFlip::None));
    data.set_tile(1, 0, TileData::new(0, 1, 0, TileFlip::None));
    data.set_tile(2, 0, TileData::new(0, 2, 0, TileFlip::None));
    let mut b = TileMeshBuilder::new(BuilderLimits::new(3, 1));
    let mut m = TileMesh::new();
    b.rebuild(&mut m, chunk_tiles(&data, TilePoint::ZERO, 3, 1), TilePoint::ZERO, 1.0)
        .unwrap();
    assert_eq!(m.drawable_batch_count(), 3);

    data.fill(0, 0, 3, 1, TileData::new(0, 0, 0, TileFlip::None));
    b.rebuild(&mut m, chunk_tiles(&data, TilePoint::ZERO, 3, 1), TilePoint::ZERO, 1.0)
        .unwrap();
    assert_eq!(m.batch_count(), 1);
    assert_eq!(m.batches().len(), 1);
    assert_eq!(m.batch(0).map(<[u32]>::len), Some(18));
    assert_eq!(m.build_count(), 2);
}

#[test]
fn horizontal_flip_swaps_u_only() {
    let mut data = two_texture_map(1, 1);
    data.set_tile(0, 0, TileData::new(0, 0, 0, TileFlip::Horizontal));
    let map = TileMap::new(&data, Vec3::ZERO, 1.0);
    let mut b = TileMeshBuilder::new(BuilderLimits::new(1, 1));
    let mut m = TileMesh::new();
    b.rebuild(&mut m, [map.get_tile(0, 0)], TilePoint::ZERO, 1.0).unwrap();
    assert_eq!(
        m.uvs(),
        &[
            Vec2::new(0.5, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.5),
            Vec2::new(0.5, 0.5),
        ]
    );
}

#[test]
fn released_mesh_rejects_draw_and_rebuild() {
    let data = two_texture_map(2, 2);
    let mut b = TileMeshBuilder::new(BuilderLimits::new(2, 2));
    let mut m = TileMesh::new();
    m.release();
    let err = b
        .rebuild(&mut m, chunk_tiles(&data, TilePoint::ZERO, 2, 2), TilePoint::ZERO, 1.0)
        .unwrap_err();
    assert_eq!(err, MeshError::Released(m.id()));
    assert!(!err.is_recoverable());
    let mut list = DrawList::new("main");
    assert!(m.submit(&mut list, Transform::IDENTITY, MaterialId::default()).is_err());
}

fn tile_grid() -> impl Strategy<Value = (i32, i32, Vec<i8>)> {
    (1i32..=8, 1i32..=8).prop_flat_map(|(w, h)| {
        let n = (w * h) as usize;
        (Just(w), Just(h), prop::collection::vec(-1i8..3, n))
    })
}

proptest! {
    #[test]
    fn buffers_are_consistent((w, h, cells) in tile_grid(), ts in 0.25f32..4.0) {
        let mut data = two_texture_map(w, h);
        for (i, shape) in cells.iter().enumerate() {
            let (x, y) = (i as i32 % w, i as i32 / w);
            let td = if *shape < 0 { TileData::EMPTY } else { TileData::new(0, *shape as u8, 0, TileFlip::None) };
            data.set_tile(x, y, td);
        }
        let mut b = TileMeshBuilder::new(BuilderLimits::new(w as usize, h as usize));
        let mut m = TileMesh::new();
        b.rebuild(&mut m, chunk_tiles(&data, TilePoint::ZERO, w, h), TilePoint::ZERO, ts).unwrap();

        let tiles = (w * h) as usize;
        prop_assert_eq!(m.vertices().len(), tiles * 4);
        prop_assert_eq!(m.uvs().len(), tiles * 4);
        let total: usize = m.batches().iter().map(Vec::len).sum();
        prop_assert_eq!(total, tiles * 6);
        prop_assert!(m.batches().iter().flatten().all(|&i| (i as usize) < tiles * 4));

        let distinct: HashSet<_> = cells.iter().filter(|s| **s >= 0).collect();
        prop_assert_eq!(m.drawable_batch_count(), distinct.len());
        for v in m.vertices() {
            prop_assert!(v.x >= 0.0 && v.x <= w as f32 * ts + 1e-3);
            prop_assert!(v.y >= 0.0 && v.y <= h as f32 * ts + 1e-3);
        }
    }
}
