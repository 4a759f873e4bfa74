//! Output formatting module

use auction_domain::model::Auction;
use auction_domain::service::Statistics;
use auction_infra::time::to_display_time;
use auction_types::{OutputFormat, Result};

pub fn print_statistics(format: OutputFormat, stats: &Statistics) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("\nAuction Statistics");
    println!("==================");
    println!("Total auctions:  {}", stats.total_auctions);
    println!("Unique makes:    {}", stats.unique_makes);
    println!("Unique branches: {}", stats.unique_branches);
    match stats.year_range {
        Some((min, max)) => println!("Year range:      {}-{}", min, max),
        None => println!("Year range:      (no data)"),
    }
    match stats.avg_mileage {
        Some(avg) => println!("Avg mileage:     {:.0} mi", avg),
        None => println!("Avg mileage:     (unknown)"),
    }
    match stats.median_mileage {
        Some(median) => println!("Median mileage:  {:.0} mi", median),
        None => println!("Median mileage:  (unknown)"),
    }

    if !stats.vehicle_types.is_empty() {
        println!("\nVehicle types:");
        let mut types: Vec<_> = stats.vehicle_types.iter().collect();
        types.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.label().cmp(b.0.label())));
        for (vehicle_type, count) in types {
            println!("  {:<12} {}", vehicle_type.label(), count);
        }
    }

    Ok(())
}

pub fn print_top(format: OutputFormat, title: &str, entries: &[(String, usize)]) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));
    for (rank, (key, count)) in entries.iter().enumerate() {
        println!("{:>3}. {:<30} {}", rank + 1, key, count);
    }

    Ok(())
}

pub fn print_auctions(format: OutputFormat, auctions: &[Auction]) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(auctions)?);
        return Ok(());
    }

    println!("\n{} matching auctions", auctions.len());
    for auction in auctions {
        let vehicle = auction.vehicle();
        let mileage = vehicle
            .mileage()
            .map(|m| format!("{} mi", m))
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{:<12} {:>4} {:<10} {:<15} {:<12} {:>12}  {:<20} {}",
            auction.stock_number(),
            vehicle.year(),
            vehicle.make(),
            vehicle.model(),
            vehicle.vehicle_type().label(),
            mileage,
            auction.branch(),
            to_display_time(auction.auction_date_utc()).format("%Y-%m-%d %H:%M %Z"),
        );
    }

    Ok(())
}

pub fn print_mileage_by_year(format: OutputFormat, by_year: &[(i32, f64)]) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(by_year)?);
        return Ok(());
    }

    println!("\nAverage Mileage by Year");
    println!("=======================");
    for (year, avg) in by_year {
        println!("{:>6}  {:.0} mi", year, avg);
    }

    Ok(())
}

pub fn print_sample(auction: &Auction) {
    let vehicle = auction.vehicle();
    let mileage = vehicle
        .mileage()
        .map(|m| format!("{} mi", m))
        .unwrap_or_else(|| "unknown".to_string());

    println!("\nSample Auction");
    println!("==============");
    println!("Stock number: {}", auction.stock_number());
    println!("Branch:       {}", auction.branch());
    println!("Make:         {}", vehicle.make());
    println!("Model:        {}", vehicle.model());
    println!("Year:         {}", vehicle.year());
    println!("Type:         {}", vehicle.vehicle_type());
    println!("Mileage:      {}", mileage);
    println!(
        "Date (UTC):   {}",
        auction.auction_date_utc().format("%Y-%m-%d %H:%M")
    );
    println!(
        "Date (local): {}",
        to_display_time(auction.auction_date_utc()).format("%Y-%m-%d %H:%M %Z")
    );
}
