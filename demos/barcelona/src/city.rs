//! Synthetic Eixample city written as provider and feed files.
//!
//! A 3 × 3 grid of two-way streets around Passeig de Gràcia.  Three feed
//! highways (Gran Via, Passeig de Gràcia, Diagonal) follow grid lines.

use std::fs;
use std::path::Path;

use anyhow::Result;

use igo_core::GeoPoint;

const LONS: [f64; 3] = [2.160, 2.170, 2.180];
const LATS: [f64; 3] = [41.380, 41.390, 41.400];

/// OSM-style id of the grid node at `(row, col)`.
fn node_id(row: usize, col: usize) -> i64 {
    1_000 + (row * 3 + col) as i64
}

pub fn node_pos(row: usize, col: usize) -> GeoPoint {
    GeoPoint::new(LONS[col], LATS[row])
}

/// `(highway, maxspeed)` for the street along row `r` / column `c`.
const ROW_CLASS: [(&str, &str); 3] = [("primary", "50;30"), ("residential|tertiary", ""), ("secondary", "")];
const COL_CLASS: [(&str, &str); 3] = [("tertiary", ""), ("primary", ""), ("residential", "")];

/// Write `nodes.csv` and `edges.csv` into `dir`.
pub fn write_graph(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    let mut nodes = String::from("id,lon,lat\n");
    for row in 0..3 {
        for col in 0..3 {
            let p = node_pos(row, col);
            nodes.push_str(&format!("{},{},{}\n", node_id(row, col), p.lon, p.lat));
        }
    }

    let mut edges = String::from("from,to,length_m,highway,maxspeed\n");
    let mut road = |a: (usize, usize), b: (usize, usize), (class, speed): (&str, &str)| {
        let len = node_pos(a.0, a.1).distance_m(node_pos(b.0, b.1));
        for (from, to) in [(a, b), (b, a)] {
            edges.push_str(&format!(
                "{},{},{len:.1},{class},{speed}\n",
                node_id(from.0, from.1),
                node_id(to.0, to.1)
            ));
        }
    };
    for row in 0..3 {
        for col in 0..2 {
            road((row, col), (row, col + 1), ROW_CLASS[row]);
        }
    }
    for col in 0..3 {
        for row in 0..2 {
            road((row, col), (row + 1, col), COL_CLASS[col]);
        }
    }

    fs::write(dir.join("nodes.csv"), nodes)?;
    fs::write(dir.join("edges.csv"), edges)?;
    Ok(())
}

/// Write the highway feed: each highway is a slightly offset polyline.
pub fn write_highways(path: &Path) -> Result<()> {
    let polyline = |points: [(usize, usize); 3]| {
        points
            .iter()
            .map(|&(r, c)| {
                let p = node_pos(r, c);
                format!("{:.5},{:.5}", p.lon + 0.0002, p.lat - 0.0001)
            })
            .collect::<Vec<_>>()
            .join(",")
    };
    let feed = format!(
        "Tram,Descripcio,Coordenades\n\
         1,\"Gran Via (Balmes a Girona)\",\"{}\"\n\
         2,\"Passeig de Gràcia (Gran Via a Diagonal)\",\"{}\"\n\
         4,\"Diagonal (Balmes a Girona)\",\"{}\"\n",
        polyline([(0, 0), (0, 1), (0, 2)]),
        polyline([(0, 1), (1, 1), (2, 1)]),
        polyline([(2, 0), (2, 1), (2, 2)]),
    );
    fs::write(path, feed)?;
    Ok(())
}

/// Write a congestion feed with one `(highway, level)` row each.
pub fn write_congestion(path: &Path, levels: &[(u32, i32)]) -> Result<()> {
    let feed: String = levels
        .iter()
        .map(|(h, level)| format!("{h}#20211021152000#{level}#{level}\n"))
        .collect();
    fs::write(path, feed)?;
    Ok(())
}
