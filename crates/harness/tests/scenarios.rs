use fogbound_core::{FogGrid, GridRect, PlayerId, SceneId};
use fogbound_engine::{EngineError, ExploreRequest, FogView, RectRequest};
use fogbound_harness::{TestTable, grid_from_rows, init_tracing, open_engine};

const T: bool = true;
const F: bool = false;

// ============================================================================
// Walkthrough scenarios
// ============================================================================

#[test]
fn new_player_gets_empty_fog() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let table = TestTable::new()?;
    let mut engine = open_engine(table.path())?;
    let alice = PlayerId::new();

    let record = engine.get_fog(table.scene_id(), alice)?;
    assert!(record.explored_grid.is_empty());
    assert!(record.revealed_grid.is_empty());
    assert_eq!(record.grid_cell_size, 50);

    let json = serde_json::to_value(FogView::from(record))?;
    assert_eq!(json["exploredGrid"], serde_json::json!([]));
    assert_eq!(json["revealedGrid"], serde_json::json!([]));
    assert_eq!(json["gridCellSize"], 50);

    Ok(())
}

#[test]
fn explore_merges_same_shape() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = TestTable::new()?;
    let scene = table.scene_id();
    let alice = PlayerId::new();

    table.gm().explore(scene, alice, &FogGrid::from_rows(vec![vec![T, T, F], vec![T, F, F]]))?;
    let record = table
        .gm()
        .explore(scene, alice, &FogGrid::from_rows(vec![vec![F, T, F], vec![F, T, F]]))?;

    assert_eq!(record.explored_grid.rows(), &[vec![T, T, F], vec![T, T, F]]);
    Ok(())
}

#[test]
fn explore_grows_to_union_of_extents() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = TestTable::new()?;
    let scene = table.scene_id();
    let alice = PlayerId::new();

    table.gm().explore(scene, alice, &FogGrid::from_rows(vec![vec![T, F], vec![F, F]]))?;
    let record = table.gm().explore(
        scene,
        alice,
        &FogGrid::from_rows(vec![vec![F, T, T], vec![F, T, F], vec![T, F, F]]),
    )?;

    assert_eq!(
        record.explored_grid.rows(),
        &[vec![T, T, T], vec![F, T, F], vec![T, F, F]]
    );
    Ok(())
}

#[test]
fn reveal_reaches_every_player() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = TestTable::new()?;
    let scene = table.scene_id();
    let alice = table.seat_player()?;
    let bob = table.seat_player()?;

    let updated = table.gm().reveal(scene, GridRect::new(1, 1, 2, 2)?)?;
    assert_eq!(updated.len(), 2);

    for player in [alice, bob] {
        let record = table.gm().get_fog(scene, player)?;
        let grid = &record.revealed_grid;
        assert!(grid.row_count() >= 3);
        for (row, col) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            assert!(grid.get(row, col), "({row}, {col}) not revealed for {player:?}");
        }
        assert_eq!(grid.count_true(), 4);
    }
    Ok(())
}

#[test]
fn hide_beyond_bounds_does_not_grow() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = TestTable::new()?;
    let scene = table.scene_id();
    let alice = table.seat_player()?;
    table.gm().reveal(scene, GridRect::new(0, 0, 4, 4)?)?;

    table.gm().hide(scene, GridRect::new(10, 10, 2, 2)?)?;

    let record = table.gm().get_fog(scene, alice)?;
    assert_eq!(record.revealed_grid.row_count(), 4);
    assert_eq!(record.revealed_grid.rows(), &[vec![T; 4], vec![T; 4], vec![T; 4], vec![T; 4]]);
    Ok(())
}

#[test]
fn reset_clears_both_grids_for_everyone() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = TestTable::new()?;
    let scene = table.scene_id();
    let alice = table.seat_player()?;
    let bob = table.seat_player()?;

    table.gm().explore(scene, alice, &grid_from_rows(&["##", ".#"]))?;
    table.gm().explore(scene, bob, &grid_from_rows(&["#"]))?;
    table.gm().reveal(scene, GridRect::new(0, 0, 3, 3)?)?;

    let updated = table.gm().reset(scene)?;
    assert_eq!(updated.len(), 2);

    for player in [alice, bob] {
        let record = table.gm().get_fog(scene, player)?;
        assert!(record.explored_grid.is_empty());
        assert!(record.revealed_grid.is_empty());
    }
    Ok(())
}

// ============================================================================
// Boundary validation
// ============================================================================

#[test]
fn explore_request_without_grid_is_invalid() -> Result<(), Box<dyn std::error::Error>> {
    let req: ExploreRequest = serde_json::from_str(r#"{"somethingElse": 1}"#)?;
    assert!(matches!(req.into_grid(), Err(EngineError::InvalidArgument(_))));
    Ok(())
}

#[test]
fn json_explore_flows_through_engine() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = TestTable::new()?;
    let scene = table.scene_id();
    let alice = PlayerId::new();

    let req: ExploreRequest =
        serde_json::from_str(r#"{"exploredGrid": [[false, true], [], [true]]}"#)?;
    let record = table.gm().explore(scene, alice, &req.into_grid()?)?;

    let json = serde_json::to_value(FogView::from(record))?;
    assert_eq!(
        json["exploredGrid"],
        serde_json::json!([[false, true], [], [true]])
    );
    Ok(())
}

#[test]
fn negative_rectangle_is_invalid() -> Result<(), Box<dyn std::error::Error>> {
    for body in [
        r#"{"x": -1, "y": 0, "width": 1, "height": 1}"#,
        r#"{"x": 0, "y": 0, "width": -3, "height": 1}"#,
    ] {
        let req: RectRequest = serde_json::from_str(body)?;
        assert!(matches!(req.into_rect(), Err(EngineError::InvalidArgument(_))));
    }
    Ok(())
}

#[test]
fn scenes_do_not_share_fog() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = TestTable::new()?;
    let scene = table.scene_id();
    let other_scene = SceneId::new();
    let alice = table.seat_player()?;
    table.gm().get_fog(other_scene, alice)?;

    table.gm().reveal(scene, GridRect::new(0, 0, 2, 2)?)?;
    table.gm().explore(scene, alice, &grid_from_rows(&["#"]))?;

    let elsewhere = table.gm().get_fog(other_scene, alice)?;
    assert!(elsewhere.explored_grid.is_empty());
    assert!(elsewhere.revealed_grid.is_empty());
    Ok(())
}
