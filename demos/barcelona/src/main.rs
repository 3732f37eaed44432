//! barcelona: end-to-end demo of the igo traffic-aware router.
//!
//! Builds a synthetic Eixample street grid, maps three feed highways onto
//! it, and answers `/where`, `/congestions` and `/go` style queries twice:
//! once with moderate traffic and once with Passeig de Gràcia blocked.
//! Map requests are written as JSON next to the generated feeds.
//!
//! Usage: `barcelona [config.json]`.  Without a config, everything lives
//! under the system temp directory.

mod city;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use igo_core::{GeoPoint, IgoConfig};
use igo_engine::{EngineBuilder, EngineResult, FileFeed, Geocoder, IgoService, MapRenderer, MapRequest};
use igo_spatial::{CsvGraphProvider, GraphStore};
use igo_traffic::{build_highways, parse_highway_feed, LogObserver};

// ── Collaborators ─────────────────────────────────────────────────────────────

/// Landmark lookup standing in for a web geocoder.
struct Landmarks(HashMap<&'static str, GeoPoint>);

impl Landmarks {
    fn eixample() -> Self {
        Self(HashMap::from([
            ("Plaça de Catalunya, Barcelona", city::node_pos(0, 1)),
            ("Casa Batlló, Barcelona", city::node_pos(1, 1)),
            ("Sagrada Familia, Barcelona", city::node_pos(2, 2)),
        ]))
    }
}

impl Geocoder for Landmarks {
    fn geocode(&self, query: &str) -> Option<GeoPoint> {
        self.0.get(query).copied()
    }
}

/// Writes each request to `<dir>/<name>.json`.
struct JsonRenderer {
    dir:  PathBuf,
    name: &'static str,
}

impl JsonRenderer {
    fn to(&mut self, name: &'static str) -> &mut Self {
        self.name = name;
        self
    }
}

impl MapRenderer for JsonRenderer {
    fn render(&mut self, request: &MapRequest) -> EngineResult<()> {
        let path = self.dir.join(format!("{}.json", self.name));
        let json = serde_json::to_string_pretty(request)
            .map_err(|e| igo_engine::EngineError::ResourceUnavailable(e.to_string()))?;
        fs::write(&path, json).map_err(|e| igo_engine::EngineError::ResourceUnavailable(e.to_string()))?;
        println!("  map: {} ({} lines, {} markers)", path.display(), request.lines.len(), request.markers.len());
        Ok(())
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn load_config() -> Result<IgoConfig> {
    let config: IgoConfig = match std::env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => {
            let root = std::env::temp_dir().join("igo-barcelona");
            IgoConfig {
                graph_cache_dir: root.join("cache"),
                graph_source:    root.join("graph"),
                highways_feed:   root.join("transit_relacio_trams.csv"),
                congestion_feed: root.join("trams_congestions.csv"),
                ..IgoConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== barcelona: igo traffic-aware router ===");
    let config = load_config()?;
    println!("Place: {}", config.place);

    if let Some(n) = config.num_threads {
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
    }

    // 1. Provider inputs and feeds.
    city::write_graph(&config.graph_source)?;
    city::write_highways(&config.highways_feed)?;
    city::write_congestion(&config.congestion_feed, &[(1, 2), (2, 4), (4, 1)])?;

    // 2. Static graph, from the snapshot cache when present.
    let t0 = Instant::now();
    let provider = CsvGraphProvider::new(&config.graph_source);
    let graph = GraphStore::new(&config.graph_cache_dir).load(&config.place, &provider)?;
    println!("Graph: {graph:?} in {:.3} s", t0.elapsed().as_secs_f64());

    // 3. Highways, mapped once per graph.
    let feed = fs::File::open(&config.highways_feed)
        .with_context(|| format!("opening {}", config.highways_feed.display()))?;
    let raw = parse_highway_feed(feed)?;
    let mapped = build_highways(&graph, &graph, &raw.value);
    println!(
        "Highways: {} mapped, {} rejected, {} unreachable segments",
        mapped.table.len(),
        raw.rejected.len() + mapped.rejected.len(),
        mapped.unreachable_segments
    );

    // 4. Engine and service.
    let engine = EngineBuilder::new(graph).highways(mapped.table).build()?;
    let service = IgoService::new(engine, Landmarks::eixample(), FileFeed::new(&config.congestion_feed), &config);
    let mut renderer = JsonRenderer { dir: config.graph_cache_dir.clone(), name: "" };

    // 5. Queries.
    let here = service.resolve("41.380 2.160")?;
    println!();
    println!("/where");
    renderer.to("where").render(&service.where_map(Some(here))?)?;

    println!("/congestions");
    renderer.to("congestions").render(&service.congestions(&mut LogObserver)?)?;

    println!("/go Sagrada Familia");
    let directions = service.go(Some(here), "Sagrada Familia", &mut LogObserver)?;
    print_plan(&directions.plan);
    renderer.to("path").render(&directions.map)?;

    // 6. Passeig de Gràcia closes; the next query rebuilds and re-routes.
    city::write_congestion(&config.congestion_feed, &[(1, 2), (2, 6), (4, 1)])?;
    println!();
    println!("/go Casa Batlló   (Passeig de Gràcia blocked)");
    match service.go(Some(here), "Casa Batlló", &mut LogObserver) {
        Ok(directions) => {
            print_plan(&directions.plan);
            renderer.to("path_blocked").render(&directions.map)?;
        }
        Err(e) => println!("  {e}"),
    }

    info!("done; outputs under {}", config.graph_cache_dir.display());
    Ok(())
}

fn print_plan(plan: &igo_engine::RoutePlan) {
    println!("  generation {}: {} nodes, {:.2} time units", plan.generation, plan.nodes.len(), plan.total_time);
    println!("  {:<6} {:<22} {:<6}", "Step", "From", "Level");
    println!("  {}", "-".repeat(36));
    for (i, (pos, level)) in plan.coordinates.iter().zip(&plan.levels).enumerate() {
        println!("  {:<6} {:<22} {:<6}", i, pos.to_string(), level.value());
    }
}
