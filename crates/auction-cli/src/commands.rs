//! Command handlers

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use auction_domain::model::{Auction, VehicleType, MIN_VEHICLE_YEAR};
use auction_domain::service;
use auction_infra::loader::{load_files, FileLoadResult};
use auction_infra::scan::scan_directory;
use auction_types::{Error, OutputFormat, Result};
use chrono::{DateTime, NaiveDate, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{Cli, Commands, GroupKey};
use crate::config::Config;
use crate::output;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    let output_format = cli.format.unwrap_or(config.output_format);
    let jobs = resolve_jobs(cli.jobs.unwrap_or(config.jobs));

    match &cli.command {
        Commands::Report { paths, top } => {
            let auctions = load_paths(&cli, &config, paths, jobs)?;
            cmd_report(output_format, &auctions, *top)
        }

        Commands::Stats { paths } => {
            let auctions = load_paths(&cli, &config, paths, jobs)?;
            output::print_statistics(output_format, &service::get_statistics(&auctions))
        }

        Commands::Top {
            paths,
            models,
            count,
        } => {
            let auctions = load_paths(&cli, &config, paths, jobs)?;
            if *models {
                let top = service::get_top_models(&auctions, *count);
                output::print_top(output_format, &format!("Top {} Models", count), &top)
            } else {
                let top = service::get_top_makes(&auctions, *count);
                output::print_top(output_format, &format!("Top {} Makes", count), &top)
            }
        }

        Commands::Filter {
            paths,
            min_year,
            max_year,
            make,
            vehicle_type,
            after,
            before,
            group_by,
        } => {
            let auctions = load_paths(&cli, &config, paths, jobs)?;
            cmd_filter(
                output_format,
                auctions,
                *min_year,
                *max_year,
                make,
                vehicle_type.as_deref(),
                after.as_deref(),
                before.as_deref(),
                *group_by,
            )
        }

        Commands::Mileage { paths } => {
            let auctions = load_paths(&cli, &config, paths, jobs)?;
            let mut by_year: Vec<(i32, f64)> = service::get_average_mileage_by_year(&auctions)
                .into_iter()
                .collect();
            by_year.sort_by_key(|(year, _)| *year);
            output::print_mileage_by_year(output_format, &by_year)
        }

        Commands::Config {
            show,
            set_format,
            set_jobs,
            set_data_dir,
            reset,
        } => cmd_config(*show, *set_format, *set_jobs, set_data_dir.clone(), *reset),
    }
}

fn resolve_jobs(jobs: usize) -> usize {
    if jobs == 0 {
        num_cpus::get()
    } else {
        jobs
    }
}

/// Expand files and directories into CSV paths, then load them in parallel.
/// Per-file failures are reported to stderr and skipped; at least one file
/// must load successfully.
fn load_paths(cli: &Cli, config: &Config, paths: &[PathBuf], jobs: usize) -> Result<Vec<Auction>> {
    let files = collect_csv_files(config, paths)?;
    if files.is_empty() {
        return Err(Error::FileNotFound("no CSV files to load".to_string()));
    }

    if cli.verbose {
        eprintln!("Loading {} files with {} parallel jobs", files.len(), jobs);
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    progress.set_message(format!("Loading {} files...", files.len()));
    progress.enable_steady_tick(Duration::from_millis(100));

    let results = load_files(&files, jobs);
    progress.finish_and_clear();

    let mut auctions = Vec::new();
    let mut failed = 0usize;
    for FileLoadResult { path, result } in results {
        match result {
            Ok(mut parsed) => auctions.append(&mut parsed),
            Err(e) => {
                failed += 1;
                eprintln!("Warning: skipping {}: {}", path.display(), e);
            }
        }
    }

    if auctions.is_empty() && failed > 0 {
        return Err(Error::CsvLoad(format!("all {} files failed to load", failed)));
    }

    if cli.verbose {
        eprintln!("Loaded {} auctions ({} files failed)", auctions.len(), failed);
    }

    Ok(auctions)
}

fn collect_csv_files(config: &Config, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut roots: Vec<PathBuf> = paths.to_vec();
    if roots.is_empty() {
        roots.push(
            config
                .data_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("data")),
        );
    }

    let mut files = Vec::new();
    for root in roots {
        if root.is_dir() {
            files.extend(scan_directory(&root));
        } else if root.is_file() {
            files.push(root);
        } else {
            return Err(Error::FileNotFound(root.display().to_string()));
        }
    }

    Ok(files)
}

fn cmd_report(format: OutputFormat, auctions: &[Auction], top: usize) -> Result<()> {
    let stats = service::get_statistics(auctions);
    let top_makes = service::get_top_makes(auctions, top);
    let top_models = service::get_top_models(auctions, 5);

    if format == OutputFormat::Json {
        let report = serde_json::json!({
            "statistics": stats,
            "top_makes": top_makes,
            "top_models": top_models,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::print_statistics(format, &stats)?;
    output::print_top(format, &format!("Top {} Makes", top), &top_makes)?;
    output::print_top(format, "Top 5 Models", &top_models)?;

    if let Some(sample) = auctions.first() {
        output::print_sample(sample);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_filter(
    format: OutputFormat,
    auctions: Vec<Auction>,
    min_year: Option<i32>,
    max_year: Option<i32>,
    makes: &[String],
    vehicle_type: Option<&str>,
    after: Option<&str>,
    before: Option<&str>,
    group_by: Option<GroupKey>,
) -> Result<()> {
    let mut filtered = auctions;

    if min_year.is_some() || max_year.is_some() {
        filtered = service::filter_by_year(
            &filtered,
            min_year.unwrap_or(MIN_VEHICLE_YEAR),
            max_year,
        );
    }

    if !makes.is_empty() {
        filtered = service::filter_by_make(&filtered, makes);
    }

    if let Some(type_str) = vehicle_type {
        // from_string is total; unrecognized names select the Other bucket
        filtered = service::filter_by_vehicle_type(&filtered, VehicleType::from_string(type_str));
    }

    if after.is_some() || before.is_some() {
        let start = match after {
            Some(s) => parse_day_bound(s, false)?,
            None => DateTime::<Utc>::MIN_UTC,
        };
        let end = match before {
            Some(s) => parse_day_bound(s, true)?,
            None => DateTime::<Utc>::MAX_UTC,
        };
        filtered = service::filter_by_date_range(&filtered, start, end);
    }

    match group_by {
        Some(GroupKey::Make) => output::print_top(
            format,
            "Auctions by Make",
            &group_counts(service::group_by_make(&filtered)),
        ),
        Some(GroupKey::Branch) => output::print_top(
            format,
            "Auctions by Branch",
            &group_counts(service::group_by_branch(&filtered)),
        ),
        Some(GroupKey::Type) => {
            let groups = service::group_by_vehicle_type(&filtered);
            let labeled: HashMap<String, Vec<Auction>> = groups
                .into_iter()
                .map(|(vehicle_type, group)| (vehicle_type.label().to_string(), group))
                .collect();
            output::print_top(format, "Auctions by Vehicle Type", &group_counts(labeled))
        }
        None => output::print_auctions(format, &filtered),
    }
}

/// Parse a YYYY-MM-DD argument into the UTC start or end of that day
fn parse_day_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("expected YYYY-MM-DD date, got {:?}", value)))?;

    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59).unwrap()
    } else {
        date.and_hms_opt(0, 0, 0).unwrap()
    };

    Ok(time.and_utc())
}

fn group_counts(groups: HashMap<String, Vec<Auction>>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = groups
        .into_iter()
        .map(|(key, group)| (key, group.len()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn cmd_config(
    show: bool,
    set_format: Option<OutputFormat>,
    set_jobs: Option<usize>,
    set_data_dir: Option<PathBuf>,
    reset: bool,
) -> Result<()> {
    if reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut changed = false;

    if let Some(format) = set_format {
        config.output_format = format;
        changed = true;
    }
    if let Some(jobs) = set_jobs {
        config.jobs = jobs;
        changed = true;
    }
    if let Some(data_dir) = set_data_dir {
        config.data_dir = Some(data_dir);
        changed = true;
    }

    if changed {
        config.save()?;
        println!("Configuration saved");
    }

    if show || !changed {
        print!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_day_bound() {
        let start = parse_day_bound("2025-09-03", false).unwrap();
        assert_eq!(start.hour(), 0);

        let end = parse_day_bound("2025-09-03", true).unwrap();
        assert_eq!(end.hour(), 23);
        assert_eq!(end.second(), 59);

        assert!(parse_day_bound("09/03/2025", false).is_err());
    }

    #[test]
    fn test_group_counts_sorted_by_count_then_name() {
        let mut groups: HashMap<String, Vec<Auction>> = HashMap::new();
        groups.insert("b".to_string(), Vec::new());
        groups.insert("a".to_string(), Vec::new());

        let counts = group_counts(groups);
        assert_eq!(counts[0].0, "a");
        assert_eq!(counts[1].0, "b");
    }
}
