//! Unit tests for igo-spatial.
//!
//! All tests use a hand-crafted network so they run without any OSM file.

#[cfg(test)]
mod helpers {
    use igo_core::{GeoPoint, NodeId};
    use crate::{EdgeAttrs, RoadClass, SpatialGraph, SpatialGraphBuilder};

    /// Build a small grid network for testing.
    ///
    /// Nodes (lon, lat):
    ///   0:(0,0)  1:(1,0)  2:(2,0)
    ///   3:(0,1)           4:(2,1)
    ///
    /// Two-way streets: 0-1, 1-2, 0-3, 2-4, 3-4
    ///
    /// Shortest path 0→4 by length: 0→1→2→4 (300 m) vs 0→3→4 (600 m).
    pub fn grid_network() -> (SpatialGraph, [NodeId; 5]) {
        let mut b = SpatialGraphBuilder::new();

        let n0 = b.add_node(100, GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(101, GeoPoint::new(1.0, 0.0));
        let n2 = b.add_node(102, GeoPoint::new(2.0, 0.0));
        let n3 = b.add_node(103, GeoPoint::new(0.0, 1.0));
        let n4 = b.add_node(104, GeoPoint::new(2.0, 1.0));

        let street = |len| EdgeAttrs::new(len, RoadClass::Residential);
        b.add_road(n0, n1, street(100.0));
        b.add_road(n1, n2, street(100.0));
        b.add_road(n2, n4, street(100.0));
        b.add_road(n0, n3, street(500.0)); // long detour
        b.add_road(n3, n4, street(100.0));

        (b.build(), [n0, n1, n2, n3, n4])
    }
}

// ── Road classes ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod class {
    use crate::class::{parse_max_speed, DEFAULT_SPEED_KMH};
    use crate::RoadClass;

    #[test]
    fn speed_table() {
        assert_eq!(RoadClass::TrunkLink.default_speed_kmh(), 60.0);
        assert_eq!(RoadClass::Primary.default_speed_kmh(), 50.0);
        assert_eq!(RoadClass::Secondary.default_speed_kmh(), 50.0);
        assert_eq!(RoadClass::PrimaryLink.default_speed_kmh(), 50.0);
        assert_eq!(RoadClass::Residential.default_speed_kmh(), 30.0);
        assert_eq!(RoadClass::Tertiary.default_speed_kmh(), 30.0);
        assert_eq!(RoadClass::LivingStreet.default_speed_kmh(), 20.0);
        assert_eq!(RoadClass::Unclassified.default_speed_kmh(), 10.0);
        assert_eq!(RoadClass::Motorway.default_speed_kmh(), DEFAULT_SPEED_KMH);
    }

    #[test]
    fn single_value_taken_as_is() {
        assert_eq!(RoadClass::resolve(["trunk_link"]), RoadClass::TrunkLink);
        assert_eq!(RoadClass::resolve(["bogus"]), RoadClass::Other);
        assert_eq!(RoadClass::resolve(std::iter::empty()), RoadClass::Other);
    }

    #[test]
    fn precedence_residential_over_primary() {
        assert_eq!(RoadClass::resolve(["primary", "residential"]), RoadClass::Residential);
        assert_eq!(RoadClass::resolve(["secondary", "tertiary"]), RoadClass::Tertiary);
    }

    #[test]
    fn precedence_primary_over_living_street() {
        assert_eq!(RoadClass::resolve(["living_street", "primary_link"]), RoadClass::PrimaryLink);
        assert_eq!(RoadClass::resolve(["unclassified", "living_street"]), RoadClass::LivingStreet);
    }

    #[test]
    fn precedence_falls_back_to_first() {
        assert_eq!(RoadClass::resolve(["motorway", "trunk"]), RoadClass::Motorway);
    }

    #[test]
    fn multi_valued_tag_drivable_if_any_value_is() {
        assert!(RoadClass::is_drivable("residential"));
        assert!(RoadClass::is_drivable("residential;tertiary"));
        assert!(RoadClass::is_drivable("footway;living_street"));
        assert!(!RoadClass::is_drivable("footway;cycleway"));
        assert!(!RoadClass::is_drivable(""));
        assert_eq!(RoadClass::resolve("residential;tertiary".split(';')), RoadClass::Residential);
    }

    #[test]
    fn max_speed_multi_value_takes_max() {
        assert_eq!(parse_max_speed("50"), Some(50.0));
        assert_eq!(parse_max_speed("30;50"), Some(50.0));
        assert_eq!(parse_max_speed("20|40"), Some(40.0));
        assert_eq!(parse_max_speed("none"), None);
        assert_eq!(parse_max_speed("0"), None);
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use igo_core::{EdgeId, GeoPoint};
    use crate::{EdgeAttrs, RoadClass, SpatialGraphBuilder};

    #[test]
    fn empty_build() {
        let net = SpatialGraphBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn csr_out_edges() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();

        let n1_out: Vec<_> = net.out_edges(n1).collect();
        assert_eq!(n1_out.len(), 2, "n1 should have 2 outgoing edges");

        assert_eq!(net.out_degree(n0), 2); // n0→n1, n0→n3
        assert_eq!(net.out_degree(n2), 2); // n2→n1, n2→n4
        assert_eq!(net.out_degree(n3), 2); // n3→n0, n3→n4
        assert_eq!(net.out_degree(n4), 2); // n4→n2, n4→n3
    }

    #[test]
    fn out_edges_source_correctness() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
        assert!(net.find_edge(n0, n1).is_some());
    }

    #[test]
    fn directed_only_edge() {
        let mut b = SpatialGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0));
        let c = b.add_node(2, GeoPoint::new(1.0, 0.0));
        b.add_directed_edge(a, c, EdgeAttrs::new(100.0, RoadClass::Primary));
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 0); // no return edge
        assert!(net.find_edge(c, a).is_none());
    }

    #[test]
    fn max_speed_resolution() {
        let mut b = SpatialGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0));
        let c = b.add_node(2, GeoPoint::new(1.0, 0.0));
        b.add_directed_edge(a, c, EdgeAttrs::new(100.0, RoadClass::Primary));
        b.add_directed_edge(c, a, EdgeAttrs::new(100.0, RoadClass::Primary).with_max_speed(80.0));
        let net = b.build();

        let forward = net.edge(net.find_edge(a, c).unwrap());
        let back = net.edge(net.find_edge(c, a).unwrap());
        assert_eq!(forward.max_speed_kmh, 50.0);
        assert_eq!(forward.base_time(), 2.0);
        assert_eq!(back.max_speed_kmh, 80.0);
        assert_eq!(net.base_time(EdgeId(0)), forward.base_time());
    }

    #[test]
    fn views_cover_everything() {
        let (net, _) = super::helpers::grid_network();
        assert_eq!(net.nodes().count(), 5);
        assert_eq!(net.edges().count(), 10);
        assert!(net.edges().all(|e| e.length_m > 0.0 && e.max_speed_kmh == 30.0));
    }
}

// ── Nearest-node snapping ─────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use igo_core::GeoPoint;
    use crate::{LinearScanIndex, NearestNodeIndex, RTreeIndex, SpatialGraphBuilder};

    #[test]
    fn snap_exact_position() {
        let (net, nodes) = super::helpers::grid_network();
        for (id, pos) in net.nodes() {
            assert_eq!(net.snap_to_node(pos), Some(id));
        }
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.0)), Some(nodes[0]));
    }

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(0.4, 0.0)), Some(n0));
        assert_eq!(net.snap_to_node(GeoPoint::new(0.6, 0.0)), Some(n1));
    }

    #[test]
    fn empty_network_returns_none() {
        let net = SpatialGraphBuilder::new().build();
        assert!(net.snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
        assert!(LinearScanIndex::new(&[]).nearest(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn ties_go_to_lowest_id() {
        // (0.5, 0.5) is equidistant from all four corners.
        let corners = [
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(0.0, 1.0),
        ];
        let query = GeoPoint::new(0.5, 0.5);
        let linear = LinearScanIndex::new(&corners).nearest(query);
        let rtree = RTreeIndex::new(&corners).nearest(query);
        assert_eq!(linear, Some(igo_core::NodeId(0)));
        assert_eq!(rtree, linear);
    }

    #[test]
    fn linear_and_rtree_agree() {
        let (net, _) = super::helpers::grid_network();
        let linear = LinearScanIndex::new(&net.node_pos);
        for i in 0..40 {
            let q = GeoPoint::new(-0.5 + i as f64 * 0.075, 1.2 - i as f64 * 0.04);
            assert_eq!(linear.nearest(q), net.index().nearest(q), "query {q}");
        }
    }

    #[test]
    fn k_nearest_order() {
        let (net, nodes) = super::helpers::grid_network();
        let nearest = net.index().k_nearest(GeoPoint::new(0.0, 0.0), 2);
        assert_eq!(nearest[0], nodes[0]);
        // n1 (dist=1) and n3 (dist=1) are equidistant: either is valid.
        assert!(nearest[1] == nodes[1] || nearest[1] == nodes[3]);
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use igo_core::{EdgeId, GeoPoint, NodeId};
    use crate::router::{by_base_time, by_length};
    use crate::{DijkstraRouter, EdgeAttrs, RoadClass, Router, SpatialError, SpatialGraph, SpatialGraphBuilder};

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let p = DijkstraRouter.route(&net, n0, n0, by_length(&net)).unwrap();
        assert!(p.is_trivial());
        assert_eq!(p.nodes, vec![n0]);
        assert_eq!(p.total_cost, 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let path = DijkstraRouter.route(&net, n0, n4, by_length(&net)).unwrap();

        assert_eq!(path.total_cost, 300.0);
        assert_eq!(path.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(path.edges.len(), 3);
        for (i, e) in path.edges.iter().enumerate() {
            assert_eq!(net.edge_from[e.index()], path.nodes[i]);
            assert_eq!(net.edge_to[e.index()], path.nodes[i + 1]);
        }
    }

    #[test]
    fn custom_cost_changes_route() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        let slow = net.find_edge(n1, n2).unwrap();
        let cost = |e: EdgeId| if e == slow { 10_000.0 } else { net.edge_length_m[e.index()] };
        let path = DijkstraRouter.route(&net, n0, n4, cost).unwrap();
        assert_eq!(path.nodes, vec![n0, n3, n4]);
        assert_eq!(path.total_cost, 600.0);
    }

    #[test]
    fn infinite_edge_never_taken() {
        let (net, [n0, n1, _, n3, n4]) = super::helpers::grid_network();
        let blocked = net.find_edge(n0, n1).unwrap();
        let cost = |e: EdgeId| if e == blocked { f64::INFINITY } else { net.edge_length_m[e.index()] };
        let path = DijkstraRouter.route(&net, n0, n4, cost).unwrap();
        assert!(!path.edges.contains(&blocked));
        assert_eq!(path.nodes, vec![n0, n3, n4]);
    }

    #[test]
    fn infinite_only_route_is_no_path() {
        let mut b = SpatialGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0));
        let c = b.add_node(2, GeoPoint::new(1.0, 0.0));
        b.add_directed_edge(a, c, EdgeAttrs::new(100.0, RoadClass::Primary));
        let net = b.build();
        let result = DijkstraRouter.route(&net, a, c, |_| f64::INFINITY);
        assert!(matches!(result, Err(SpatialError::NoPath { .. })));
    }

    #[test]
    fn no_path_disconnected() {
        let mut b = SpatialGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0));
        let c = b.add_node(2, GeoPoint::new(1.0, 0.0));
        let net = b.build();
        let result = DijkstraRouter.route(&net, a, c, by_length(&net));
        assert!(matches!(result, Err(SpatialError::NoPath { .. })));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = SpatialGraphBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0));
        let c = b.add_node(2, GeoPoint::new(1.0, 0.0));
        b.add_directed_edge(a, c, EdgeAttrs::new(100.0, RoadClass::Primary));
        let net = b.build();

        let forward = DijkstraRouter.route(&net, a, c, by_base_time(&net)).unwrap();
        assert_eq!(forward.nodes, vec![a, c]);
        assert_eq!(forward.total_cost, 2.0);
        assert!(DijkstraRouter.route(&net, c, a, by_base_time(&net)).is_err());
    }

    #[test]
    fn unknown_node_rejected() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let result = DijkstraRouter.route(&net, n0, NodeId(99), by_length(&net));
        assert!(matches!(result, Err(SpatialError::NodeNotFound(_))));
    }

    #[test]
    fn empty_graph_has_no_routes() {
        let net = SpatialGraph::empty();
        let result = DijkstraRouter.route(&net, NodeId(0), NodeId(0), by_length(&net));
        assert!(matches!(result, Err(SpatialError::EmptyGraph)));
    }
}

// ── Providers & persisted store ───────────────────────────────────────────────

#[cfg(test)]
mod store {
    use std::cell::Cell;
    use std::io::Cursor;

    use crate::store::place_key;
    use crate::{CsvGraphProvider, GraphProvider, GraphStore, RoadClass, SpatialError, SpatialGraph, SpatialResult};

    const NODES: &str = "id,lon,lat\n10,2.0,41.0\n11,2.001,41.0\n12,2.002,41.0\n";
    const EDGES: &str = "\
from,to,length_m,highway,maxspeed\n\
10,11,84.0,primary|residential,\n\
11,12,84.0,primary,50;70\n\
12,99,10.0,primary,\n\
11,10,-1.0,primary,\n";

    struct CountingProvider {
        calls: Cell<usize>,
    }

    impl GraphProvider for CountingProvider {
        fn fetch(&self, _place: &str) -> SpatialResult<SpatialGraph> {
            self.calls.set(self.calls.get() + 1);
            CsvGraphProvider::read(Cursor::new(NODES), Cursor::new(EDGES))
        }
    }

    struct Unreachable;

    impl GraphProvider for Unreachable {
        fn fetch(&self, place: &str) -> SpatialResult<SpatialGraph> {
            Err(SpatialError::ResourceUnavailable(place.to_owned()))
        }
    }

    #[test]
    fn csv_provider_reads_and_skips_bad_edges() {
        let g = CsvGraphProvider::read(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2); // unknown node and negative length skipped
        assert_eq!(g.edge_class[0], RoadClass::Residential);
        assert_eq!(g.edge_max_speed_kmh[0], 30.0);
        assert_eq!(g.edge_max_speed_kmh[1], 70.0);
        assert_eq!(g.node_key, vec![10, 11, 12]);
    }

    #[test]
    fn csv_provider_skips_unparseable_rows() {
        let nodes = "id,lon,lat\n1,2.0,41.0\nx,2.0,41.0\n2,2.001,41.0\n";
        let edges = "from,to,length_m,highway,maxspeed\n1,2,abc,primary,\n1,2,100,primary,\n";
        let g = CsvGraphProvider::read(Cursor::new(nodes), Cursor::new(edges)).unwrap();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_length_m[0], 100.0);
    }

    #[test]
    fn place_key_is_file_safe() {
        assert_eq!(place_key("Barcelona, Catalonia"), "barcelona__catalonia");
    }

    #[test]
    fn load_fetches_once_then_reuses_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path());
        let provider = CountingProvider { calls: Cell::new(0) };

        let first = store.load("Testville", &provider).unwrap();
        assert!(store.snapshot_path("Testville").exists());
        let second = store.load("Testville", &provider).unwrap();

        assert_eq!(provider.calls.get(), 1);
        assert_eq!(first.node_key, second.node_key);
        assert_eq!(first.edge_to, second.edge_to);
        assert_eq!(first.edge_class, second.edge_class);
        assert_eq!(first.edge_max_speed_kmh, second.edge_max_speed_kmh);
    }

    #[test]
    fn corrupt_snapshot_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path());
        std::fs::write(store.snapshot_path("Testville"), b"{ not json").unwrap();

        let provider = CountingProvider { calls: Cell::new(0) };
        let g = store.load("Testville", &provider).unwrap();
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn snapshot_for_other_place_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path());
        let provider = CountingProvider { calls: Cell::new(0) };
        let g = store.load("Testville", &provider).unwrap();

        // Same file key, different place string.
        store.persist("testville", &g).unwrap();
        assert_eq!(store.snapshot_path("testville"), store.snapshot_path("Testville"));
        store.load("Testville", &provider).unwrap();
        assert_eq!(provider.calls.get(), 2);
    }

    #[test]
    fn provider_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path());
        let result = store.load("Nowhere", &Unreachable);
        assert!(matches!(result, Err(SpatialError::ResourceUnavailable(_))));
        assert!(!store.snapshot_path("Nowhere").exists());
    }

    #[test]
    fn csv_provider_missing_dir_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvGraphProvider::new(dir.path().join("missing"));
        assert!(matches!(provider.fetch("X"), Err(SpatialError::ResourceUnavailable(_))));
    }
}
