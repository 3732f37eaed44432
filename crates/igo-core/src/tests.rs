//! Unit tests for igo-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, HighwayId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::from_index(42), id);
    }

    #[test]
    fn ordering() {
        assert!(HighwayId(0) < HighwayId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert!(!HighwayId::INVALID.is_valid());
        assert!(HighwayId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(HighwayId(7).to_string(), "highway 7");
        assert_eq!(EdgeId(3).to_string(), "edge 3");
        assert_eq!(NodeId::INVALID.to_string(), "node <none>");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(2.1734, 41.3851);
        assert!(p.distance_m(p) < 0.01);
        assert_eq!(p.planar_distance_2(p), 0.0);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(2.0, 41.0);
        let b = GeoPoint::new(2.0, 42.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn planar_distance_ignores_latitude_scaling() {
        let origin = GeoPoint::new(0.0, 60.0);
        let east = GeoPoint::new(1.0, 60.0);
        let north = GeoPoint::new(0.0, 61.0);
        assert_eq!(origin.planar_distance_2(east), origin.planar_distance_2(north));
    }

    #[test]
    fn lat_lon_constructor_swaps() {
        let p = GeoPoint::from_lat_lon(41.38, 2.17);
        assert_eq!(p, GeoPoint::new(2.17, 41.38));
        assert_eq!(p.to_array(), [2.17, 41.38]);
    }

    #[test]
    fn non_finite_detected() {
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_finite());
        assert!(GeoPoint::new(0.0, 0.0).is_finite());
    }
}

#[cfg(test)]
mod config {
    use crate::{IgoConfig, IgoError};

    #[test]
    fn default_is_valid() {
        let cfg = IgoConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.map_size, 800);
    }

    #[test]
    fn empty_place_rejected() {
        let cfg = IgoConfig { place: "  ".into(), ..IgoConfig::default() };
        assert!(matches!(cfg.validate(), Err(IgoError::Config(_))));
    }

    #[test]
    fn zero_map_size_reports_field() {
        let cfg = IgoConfig { map_size: 0, ..IgoConfig::default() };
        let IgoError::Config(msg) = cfg.validate().unwrap_err();
        assert!(msg.contains("map_size"), "{msg}");
    }

    #[test]
    fn zero_threads_rejected() {
        let cfg = IgoConfig { num_threads: Some(0), ..IgoConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_uses_defaults() {
        let cfg: IgoConfig = serde_json::from_str(r#"{ "place": "Girona", "map_size": 400 }"#).unwrap();
        assert_eq!(cfg.place, "Girona");
        assert_eq!(cfg.map_size, 400);
        assert_eq!(cfg.geocode_suffix, ", Barcelona");
    }
}
