//! Aggregate queries over auction collections
//!
//! Every function here is pure: it reads its input slice and returns a new
//! collection without touching shared state, so callers are free to fan
//! queries out across threads.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Auction, VehicleType};

/// Keep auctions whose vehicle year falls in `[min_year, max_year]`.
/// A `max_year` of `None` leaves the range unbounded above.
pub fn filter_by_year(auctions: &[Auction], min_year: i32, max_year: Option<i32>) -> Vec<Auction> {
    auctions
        .iter()
        .filter(|a| {
            a.vehicle().year() >= min_year
                && max_year.map_or(true, |max| a.vehicle().year() <= max)
        })
        .cloned()
        .collect()
}

/// Keep auctions whose make matches any of `makes`, case-insensitively.
pub fn filter_by_make(auctions: &[Auction], makes: &[String]) -> Vec<Auction> {
    let wanted: HashSet<String> = makes.iter().map(|m| m.to_lowercase()).collect();
    auctions
        .iter()
        .filter(|a| wanted.contains(&a.vehicle().make().to_lowercase()))
        .cloned()
        .collect()
}

/// Keep auctions whose vehicle type matches exactly.
pub fn filter_by_vehicle_type(auctions: &[Auction], vehicle_type: VehicleType) -> Vec<Auction> {
    auctions
        .iter()
        .filter(|a| a.vehicle().vehicle_type() == vehicle_type)
        .cloned()
        .collect()
}

/// Keep auctions whose sale instant falls in `[start, end]`, inclusive on
/// both bounds.
pub fn filter_by_date_range(
    auctions: &[Auction],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Auction> {
    auctions
        .iter()
        .filter(|a| a.auction_date_utc() >= start && a.auction_date_utc() <= end)
        .cloned()
        .collect()
}

/// Partition auctions by make. Sub-sequences preserve input order.
pub fn group_by_make(auctions: &[Auction]) -> HashMap<String, Vec<Auction>> {
    let mut groups: HashMap<String, Vec<Auction>> = HashMap::new();
    for auction in auctions {
        groups
            .entry(auction.vehicle().make().to_string())
            .or_default()
            .push(auction.clone());
    }
    groups
}

/// Partition auctions by branch. Sub-sequences preserve input order.
pub fn group_by_branch(auctions: &[Auction]) -> HashMap<String, Vec<Auction>> {
    let mut groups: HashMap<String, Vec<Auction>> = HashMap::new();
    for auction in auctions {
        groups
            .entry(auction.branch().to_string())
            .or_default()
            .push(auction.clone());
    }
    groups
}

/// Partition auctions by vehicle type. Sub-sequences preserve input order.
pub fn group_by_vehicle_type(auctions: &[Auction]) -> HashMap<VehicleType, Vec<Auction>> {
    let mut groups: HashMap<VehicleType, Vec<Auction>> = HashMap::new();
    for auction in auctions {
        groups
            .entry(auction.vehicle().vehicle_type())
            .or_default()
            .push(auction.clone());
    }
    groups
}

/// The `n` most frequent makes, count descending. Ties keep first-seen order.
pub fn get_top_makes(auctions: &[Auction], n: usize) -> Vec<(String, usize)> {
    top_by_key(auctions, n, |a| a.vehicle().make().to_string())
}

/// The `n` most frequent "Make Model" combinations, count descending.
/// Ties keep first-seen order.
pub fn get_top_models(auctions: &[Auction], n: usize) -> Vec<(String, usize)> {
    top_by_key(auctions, n, |a| {
        format!("{} {}", a.vehicle().make(), a.vehicle().model())
    })
}

fn top_by_key(
    auctions: &[Auction],
    n: usize,
    key: impl Fn(&Auction) -> String,
) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for auction in auctions {
        let k = key(auction);
        match index.get(&k) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(k.clone(), counts.len());
                counts.push((k, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Mean mileage per model year, computed over known odometer readings only.
/// A year where every reading is unknown is absent from the result.
pub fn get_average_mileage_by_year(auctions: &[Auction]) -> HashMap<i32, f64> {
    let mut by_year: HashMap<i32, Vec<u32>> = HashMap::new();
    for auction in auctions {
        if let Some(mileage) = auction.vehicle().mileage() {
            by_year
                .entry(auction.vehicle().year())
                .or_default()
                .push(mileage);
        }
    }

    by_year
        .into_iter()
        .map(|(year, mileages)| (year, mean(&mileages)))
        .collect()
}

/// Aggregate snapshot of an auction collection
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub total_auctions: usize,
    pub unique_makes: usize,
    pub unique_branches: usize,
    /// (min, max) vehicle year; `None` for an empty collection
    pub year_range: Option<(i32, i32)>,
    /// Mean over known mileages; `None` when no reading is known
    pub avg_mileage: Option<f64>,
    /// Median over known mileages; `None` when no reading is known
    pub median_mileage: Option<f64>,
    /// Occurrence count per vehicle type actually present
    pub vehicle_types: HashMap<VehicleType, usize>,
}

/// Compute the aggregate snapshot.
pub fn get_statistics(auctions: &[Auction]) -> Statistics {
    let mileages: Vec<u32> = auctions
        .iter()
        .filter_map(|a| a.vehicle().mileage())
        .collect();

    let mut vehicle_types: HashMap<VehicleType, usize> = HashMap::new();
    for auction in auctions {
        *vehicle_types
            .entry(auction.vehicle().vehicle_type())
            .or_insert(0) += 1;
    }

    let years = auctions.iter().map(|a| a.vehicle().year());

    Statistics {
        total_auctions: auctions.len(),
        unique_makes: auctions
            .iter()
            .map(|a| a.vehicle().make())
            .collect::<HashSet<_>>()
            .len(),
        unique_branches: auctions
            .iter()
            .map(|a| a.branch())
            .collect::<HashSet<_>>()
            .len(),
        year_range: years.clone().min().zip(years.max()),
        avg_mileage: if mileages.is_empty() {
            None
        } else {
            Some(mean(&mileages))
        },
        median_mileage: median(&mileages),
        vehicle_types,
    }
}

fn mean(values: &[u32]) -> f64 {
    values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
}

fn median(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    } else {
        f64::from(sorted[mid])
    })
}
