//! Auction listing record

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Vehicle;

/// One auction listing: a stock identifier, the originating branch, the sale
/// instant and the vehicle on offer. The sale instant is always UTC; local
/// or ambiguous offsets never reach this type. Each auction exclusively owns
/// its vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Auction {
    stock_number: String,
    branch: String,
    auction_date_utc: DateTime<Utc>,
    vehicle: Vehicle,
}

impl Auction {
    pub fn new(
        stock_number: impl Into<String>,
        branch: impl Into<String>,
        auction_date_utc: DateTime<Utc>,
        vehicle: Vehicle,
    ) -> Self {
        Self {
            stock_number: stock_number.into(),
            branch: branch.into(),
            auction_date_utc,
            vehicle,
        }
    }

    /// Stock identifier as it appears in the feed. Not validated for
    /// uniqueness or format.
    pub fn stock_number(&self) -> &str {
        &self.stock_number
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn auction_date_utc(&self) -> DateTime<Utc> {
        self.auction_date_utc
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }
}
