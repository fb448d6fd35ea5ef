/*!
 * Types and functions for grouping location points into clusters.
 *
 * A cluster describes the aggregate properties of a group of LocationPoint objects that share
 * the same nearest k-means center. The cluster centers are what get proposed as new sites.
 */
use crate::{
    geo::{great_circle_distance, Coord},
    location::{LocationPoint, ProposedSite},
};
use log::{debug, warn};

/// The number of sites proposed when nobody asks for a specific number.
pub const DEFAULT_SITE_COUNT: usize = 5;

/// The default cap on k-means iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/**
 * The aggregate properties of a group of LocationPoint objects.
 */
#[derive(Clone, Copy, Debug)]
pub struct Cluster {
    /// The k-means center of the points in the cluster.
    pub center: Coord,
    /// Total (sum) of the weight (PEA) of the points in the cluster.
    pub weight: f64,
    /// The distance in kilometers from the center to the farthest point in the cluster.
    pub radius: f64,
    /// The number of points that are in this cluster.
    pub count: usize,
}

impl Default for Cluster {
    fn default() -> Self {
        Cluster {
            center: Coord::new(f64::NAN, f64::NAN),
            weight: 0.0,
            radius: 0.0,
            count: 0,
        }
    }
}

impl Cluster {
    /// Turn the cluster center into a proposed site named "CAP n", where n = index + 1.
    pub fn to_site(&self, index: usize) -> ProposedSite {
        ProposedSite::new(self.center, format!("CAP {}", index + 1))
    }
}

/// Turn a list of clusters into proposed sites, keeping their order.
pub fn proposed_sites(clusters: &[Cluster]) -> Vec<ProposedSite> {
    clusters
        .iter()
        .enumerate()
        .map(|(i, clust)| clust.to_site(i))
        .collect()
}

/// Plain k-means over latitude and longitude.
#[derive(Clone, Copy, Debug)]
pub struct KMeans {
    pub k: usize,
    pub max_iters: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        KMeans {
            k: DEFAULT_SITE_COUNT,
            max_iters: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        KMeans {
            k,
            ..Self::default()
        }
    }

    /**
     * Group points into clusters.
     *
     * Seeding is deterministic: the first point, then over and over the point farthest from
     * every center chosen so far. After that, the usual assign / recompute loop runs until no
     * point changes cluster or `max_iters` is reached. A cluster that loses all its points keeps
     * its previous center.
     *
     * #Arguments
     * points - the points to group, only their coordinates and weights are used.
     *
     * #Returns
     * One Cluster per center, at most as many as there are points.
     */
    pub fn fit(&self, points: &[LocationPoint]) -> Vec<Cluster> {
        if points.is_empty() || self.k == 0 {
            return vec![];
        }

        let k = if self.k > points.len() {
            warn!(
                "Asked for {} clusters but there are only {} points, using {}",
                self.k,
                points.len(),
                points.len()
            );
            points.len()
        } else {
            self.k
        };

        let coords: Vec<Coord> = points.iter().map(|p| p.coord).collect();
        let mut centers = seed_centers(&coords, k);
        let mut assignments = vec![usize::MAX; coords.len()];

        for iteration in 0..self.max_iters.max(1) {
            let mut changed = false;
            for (i, c) in coords.iter().enumerate() {
                let best = nearest_center(*c, &centers);
                if assignments[i] != best {
                    assignments[i] = best;
                    changed = true;
                }
            }

            if !changed {
                debug!("k-means converged after {} iterations", iteration);
                break;
            }

            let mut sums = vec![Coord::default(); k];
            let mut counts = vec![0usize; k];
            for (i, c) in coords.iter().enumerate() {
                let cluster = assignments[i];
                sums[cluster].lat += c.lat;
                sums[cluster].lon += c.lon;
                counts[cluster] += 1;
            }

            for j in 0..k {
                if counts[j] > 0 {
                    centers[j] = Coord::new(
                        sums[j].lat / counts[j] as f64,
                        sums[j].lon / counts[j] as f64,
                    );
                }
            }
        }

        let mut clusters: Vec<Cluster> = centers
            .iter()
            .map(|&center| Cluster {
                center,
                ..Cluster::default()
            })
            .collect();

        for (pnt, &cluster) in points.iter().zip(assignments.iter()) {
            let clust = &mut clusters[cluster];
            clust.weight += pnt.weight;
            clust.count += 1;

            let gs_distance = great_circle_distance(
                pnt.coord.lat,
                pnt.coord.lon,
                clust.center.lat,
                clust.center.lon,
            );
            clust.radius = clust.radius.max(gs_distance);
        }

        clusters
    }
}

fn squared_distance(a: Coord, b: Coord) -> f64 {
    (a.lat - b.lat).powi(2) + (a.lon - b.lon).powi(2)
}

fn nearest_center(c: Coord, centers: &[Coord]) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (j, ctr) in centers.iter().enumerate() {
        let dist = squared_distance(c, *ctr);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = j;
        }
    }

    best_cluster
}

fn seed_centers(coords: &[Coord], k: usize) -> Vec<Coord> {
    let mut centers: Vec<Coord> = Vec::with_capacity(k);
    centers.push(coords[0]);

    for _ in 1..k {
        let mut best_idx = 0;
        let mut best_dist = -1.0;
        for (i, c) in coords.iter().enumerate() {
            let min_dist = centers
                .iter()
                .map(|ctr| squared_distance(*c, *ctr))
                .fold(f64::INFINITY, f64::min);
            if min_dist > best_dist {
                best_dist = min_dist;
                best_idx = i;
            }
        }
        centers.push(coords[best_idx]);
    }

    centers
}
