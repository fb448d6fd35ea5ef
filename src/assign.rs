/*!
 * Tie proposed sites back to existing places.
 *
 * Each proposed site takes the state and municipality of the closest reference point. Ties go to
 * the reference point that comes first.
 */
use crate::{
    geo::DistanceMetric,
    location::{Assignment, LocationPoint, ProposedSite},
};
use log::warn;

/**
 * Build the full matrix of distances between sites and reference points.
 *
 * #Returns
 * One row per site, one column per reference point.
 */
pub fn distance_matrix(
    sites: &[ProposedSite],
    reference: &[LocationPoint],
    metric: DistanceMetric,
) -> Vec<Vec<f64>> {
    sites
        .iter()
        .map(|site| {
            reference
                .iter()
                .map(|pnt| metric.distance(site.coord, pnt.coord))
                .collect()
        })
        .collect()
}

/// Index of the smallest value, the first one wins ties. NaN never wins.
pub fn argmin(row: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, &dist) in row.iter().enumerate() {
        if dist.is_nan() {
            continue;
        }

        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((i, dist)),
        }
    }

    best.map(|(i, _)| i)
}

/**
 * Assign each proposed site the state and municipality of its nearest reference point.
 *
 * Sites come back in the same order. With no sites the result is empty. With no reference points
 * there is nothing to assign, so the sites come back untouched.
 */
pub fn assign_nearest(
    mut sites: Vec<ProposedSite>,
    reference: &[LocationPoint],
    metric: DistanceMetric,
) -> Vec<ProposedSite> {
    if sites.is_empty() {
        return sites;
    }

    if reference.is_empty() {
        warn!("No reference points to assign {} sites to", sites.len());
        return sites;
    }

    let distances = distance_matrix(&sites, reference, metric);

    for (site, row) in sites.iter_mut().zip(distances.iter()) {
        if let Some(idx) = argmin(row) {
            let nearest = &reference[idx];
            site.assignment = Some(Assignment {
                region: nearest.region.clone(),
                label: nearest.label.clone(),
            });
        } else {
            warn!("No finite distance from {} to any reference point", site.id);
        }
    }

    sites
}
