use mesh_forest::prelude::*;

#[test]
fn flagged_cell_then_global_in_one_dimension() {
    let mut tria = hyper_cube::<1>(0.0, 1.0).unwrap();
    tria.refine_global().unwrap();
    assert_eq!(tria.n_active_cells(), 2);

    tria.first_active_cell_mut().unwrap().set_refine_flag().unwrap();
    assert!(tria.first_active_cell().unwrap().refine_flag_set());
    let summary = tria.execute_refinement().unwrap();
    assert_eq!(summary.cells_refined, 1);
    assert_eq!(tria.n_active_cells(), 3);
    assert!(tria.active_cells().all(|c| !c.refine_flag_set()));

    tria.refine_global().unwrap();
    assert_eq!(tria.n_active_cells(), 6);
    assert_eq!(tria.n_cells(), 11);
    assert_eq!(tria.n_vertices(), 7);
    assert_eq!(tria.n_levels(), 4);
    assert_eq!(tria.n_active_cells_on_level(3), 4);
    assert_eq!(tria.n_active_cells_on_level(2), 2);

    let mut left_ends: Vec<f64> = tria
        .active_cells()
        .map(|c| c.vertex(0).unwrap()[0])
        .collect();
    left_ends.sort_by(f64::total_cmp);
    assert_eq!(left_ends, vec![0.0, 0.125, 0.25, 0.375, 0.5, 0.75]);
}

#[test]
fn hanging_vertices_are_shared() {
    let mut tria = hyper_cube::<2>(0.0, 1.0).unwrap();
    tria.refine_global().unwrap();
    tria.first_active_cell_mut().unwrap().set_refine_flag().unwrap();
    tria.execute_refinement().unwrap();
    assert_eq!(tria.n_active_cells(), 7);
    assert_eq!(tria.n_vertices(), 14);

    tria.refine_global().unwrap();
    assert_eq!(tria.n_active_cells(), 28);
    assert_eq!(tria.n_levels(), 4);
    // fine 5x5 grid on the refined quarter, 5x5 coarse grid elsewhere,
    // sharing 3x3 points
    assert_eq!(tria.n_vertices(), 41);

    let points: Vec<_> = tria.vertices().iter().map(|v| v.point()).collect();
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            assert!(a.distance(b) > 1e-12, "vertex {a} appears twice");
        }
    }
    assert!(tria.validate_invariants().is_ok());
}

#[test]
fn coarser_neighbor_across_a_hanging_face() {
    let mut tria = hyper_cube::<2>(0.0, 1.0).unwrap();
    tria.refine_global().unwrap();
    let lower_left = tria.first_active_cell().unwrap().id();
    let lower_right = tria.active_cell_ids().nth(1).unwrap();
    tria.cell_mut(lower_left).unwrap().set_refine_flag().unwrap();
    tria.execute_refinement().unwrap();

    // child 1 of the lower-left quarter touches the unrefined lower-right quarter
    let fine = tria.cell(lower_left).unwrap().child(1).unwrap();
    let across = fine.neighbor(1).unwrap().unwrap();
    assert_eq!(across.id(), lower_right);
    assert_eq!(across.level(), 1);
    assert_eq!(fine.face(1).unwrap().parent().unwrap().id(), across.face_id(0).unwrap());
}

#[test]
fn flags_only_go_on_active_cells() {
    let mut tria = hyper_cube::<1>(0.0, 1.0).unwrap();
    tria.refine_global().unwrap();
    let root = CellId::new(0);
    assert_eq!(
        tria.cell_mut(root).unwrap().set_refine_flag().unwrap_err(),
        MeshError::CellNotActive(root)
    );

    let id = tria.active_cell_ids().last().unwrap();
    let mut cell = tria.cell_mut(id).unwrap();
    cell.set_refine_flag().unwrap();
    cell.clear_refine_flag();
    assert_eq!(tria.execute_refinement().unwrap().cells_refined, 0);
    assert_eq!(tria.n_active_cells(), 2);
}

#[test]
fn flag_driven_refinement_uses_manifolds_too() {
    use std::sync::Arc;

    let mut tria = hyper_cube::<1>(0.0, 2.0).unwrap();
    tria.set_manifold(
        ManifoldId::new(3),
        Arc::new(SphericalManifold::new(Point::new([-1.0]), 2.5).unwrap()),
    )
    .unwrap();
    let mut cell = tria.first_active_cell_mut().unwrap();
    cell.set_manifold_id(ManifoldId::new(3));
    cell.set_refine_flag().unwrap();
    tria.execute_refinement().unwrap();
    let mid = tria.vertex(VertexId::new(2)).unwrap().point();
    assert!((mid[0] - 1.5).abs() < 1e-12);
}

/// Two squares side by side; only the left one is curved.
fn curved_left_flat_right() -> Triangulation<2, 2> {
    use std::sync::Arc;

    let mut tria = subdivided_hyper_rectangle(
        [2, 1],
        Point::new([-1.0, -0.5]),
        Point::new([1.0, 0.5]),
    )
    .unwrap();
    tria.set_manifold(
        ManifoldId::new(1),
        Arc::new(SphericalManifold::new(Point::new([-2.0, 0.0]), 1.6).unwrap()),
    )
    .unwrap();
    tria.cell_mut(CellId::new(0))
        .unwrap()
        .set_manifold_id(ManifoldId::new(1));
    tria
}

#[test]
fn flat_shared_edge_is_split_flat_in_either_order() {
    let mut shared = Vec::new();
    for order in [[0, 1], [1, 0]] {
        let mut tria = curved_left_flat_right();
        for id in order {
            tria.cell_mut(CellId::new(id)).unwrap().set_refine_flag().unwrap();
            tria.execute_refinement().unwrap();
        }
        let left = tria.cell(CellId::new(0)).unwrap();
        let right = tria.cell(CellId::new(1)).unwrap();
        // lattice point (2, 1) of the left cell is (0, 1) of the right one
        let from_left = left.child(1).unwrap().vertex(3).unwrap();
        let from_right = right.child(0).unwrap().vertex(2).unwrap();
        assert_eq!(from_left, from_right);
        // only the interior of the curved cell leaves the straight lattice
        let center = left.child(0).unwrap().vertex(3).unwrap();
        assert!((center[0] + 0.4).abs() < 1e-12 && center[1].abs() < 1e-12);
        shared.push(from_left);
    }
    assert_eq!(shared, vec![Point::new([0.0, 0.0]); 2]);
}
