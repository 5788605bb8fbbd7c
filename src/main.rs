mod cli;
mod config;
mod error;
mod leap_table;
mod leap_update;
mod logging;
mod marstime_config;
#[allow(dead_code)]
mod msd;
mod orbit;
mod pipeline;
mod soldate;
#[allow(dead_code)]
mod time_scale;
mod time_utils;
mod zones;

use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use serde::Serialize;

use cli::{Cli, Command, LeapCommand};
use leap_table::LeapTable;
use marstime_config::MarsTimeConfig;
use pipeline::MarsClock;
use time_scale::UtcInstant;
use time_utils::unix_to_iso8601;
use zones::{TimeZoneProfile, ZoneRegistry};

/// Options shared by every conversion subcommand.
struct Conversion {
    at: Option<f64>,
    zone: Option<String>,
    longitude: Option<f64>,
    leap_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let Cli {
        command,
        at,
        zone,
        longitude,
        leap_file,
        log_level,
    } = Cli::parse();
    let cfg = marstime_config::load_config();
    logging::init(log_level.unwrap_or(cfg.log_level));

    let registry = ZoneRegistry::with_custom(&cfg.zones);
    let conv = Conversion {
        at,
        zone,
        longitude,
        leap_file,
    };

    match command {
        None => run_now(&conv, &registry, &cfg),
        Some(Command::All) => run_all(&conv, &registry, &cfg),
        Some(Command::Detail { json }) => run_detail(&conv, &registry, &cfg, json),
        Some(Command::Zones) => run_zones(&registry, &cfg),
        Some(Command::Leap { command }) => run_leap_command(command, &conv, &cfg),
        Some(Command::Completions { shell }) => {
            generate(shell, &mut Cli::command(), "marstime", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_table(leap_file: Option<PathBuf>, cfg: &MarsTimeConfig) -> Result<(PathBuf, LeapTable)> {
    let path = config::resolve_leap_file(leap_file, cfg.leap_file.clone());
    let table = LeapTable::load(&path).with_context(|| {
        format!(
            "no usable leap second table at {}; run `marstime leap update` or pass --leap-file",
            path.display()
        )
    })?;
    Ok((path, table))
}

fn instant(at: Option<f64>) -> UtcInstant {
    at.map_or_else(UtcInstant::now, UtcInstant::from_seconds)
}

/// Judged against the instant being converted, which `--at` may move.
fn expiry_note(table: &LeapTable, at: UtcInstant) -> &'static str {
    if table.is_expired_at(at.secs) {
        " (expired)"
    } else {
        ""
    }
}

/// The zone asked for on the command line, else the configured default.
fn select_zone<'a>(
    conv: &Conversion,
    registry: &'a ZoneRegistry,
    cfg: &MarsTimeConfig,
) -> Result<Cow<'a, TimeZoneProfile>> {
    if let Some(lon) = conv.longitude {
        return Ok(Cow::Owned(TimeZoneProfile::local_mean(lon)));
    }
    let name = conv.zone.as_deref().unwrap_or(&cfg.default_zone);
    Ok(Cow::Borrowed(registry.get(name)?))
}

fn run_now(conv: &Conversion, registry: &ZoneRegistry, cfg: &MarsTimeConfig) -> Result<()> {
    let (_, table) = load_table(conv.leap_file.clone(), cfg)?;
    let tz = select_zone(conv, registry, cfg)?;
    let line = pipeline::mars_time(instant(conv.at), &table, &tz)?;
    println!("{line}");
    Ok(())
}

fn run_all(conv: &Conversion, registry: &ZoneRegistry, cfg: &MarsTimeConfig) -> Result<()> {
    let (_, table) = load_table(conv.leap_file.clone(), cfg)?;
    let clock = MarsClock::at(instant(conv.at), &table)?;

    let name_w = registry.iter().map(|(n, _)| n.len()).max().unwrap_or(4).max(4);
    println!("{:<name_w$}  {}", "ZONE", "TIME");
    for (name, tz) in registry.iter() {
        println!("{:<name_w$}  {}", name, clock.soldate(tz).render()?);
    }
    if let Some(lon) = conv.longitude {
        let tz = TimeZoneProfile::local_mean(lon);
        println!("{:<name_w$}  {}", "lmst", clock.soldate(&tz).render()?);
    }
    Ok(())
}

#[derive(Serialize)]
struct Detail<'a> {
    utc_iso: String,
    leap_file: PathBuf,
    #[serde(flatten)]
    clock: &'a MarsClock,
    #[serde(skip_serializing_if = "Option::is_none")]
    lmst: Option<f64>,
    zone: &'a str,
    local: String,
}

fn run_detail(
    conv: &Conversion,
    registry: &ZoneRegistry,
    cfg: &MarsTimeConfig,
    json: bool,
) -> Result<()> {
    let (leap_file, table) = load_table(conv.leap_file.clone(), cfg)?;
    let now = instant(conv.at);
    let clock = MarsClock::at(now, &table)?;
    let tz = select_zone(conv, registry, cfg)?;

    let detail = Detail {
        utc_iso: unix_to_iso8601(now.secs),
        leap_file,
        clock: &clock,
        lmst: conv
            .longitude
            .map(|lon| orbit::local_mean_solar_time(clock.msd, lon)),
        zone: match conv.longitude {
            Some(_) => "lmst",
            None => conv.zone.as_deref().unwrap_or(&cfg.default_zone),
        },
        local: clock.soldate(&tz).render()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let status = match clock.tai_utc.status {
        leap_table::OffsetStatus::Authoritative => "",
        leap_table::OffsetStatus::PreRange => " (before 1972, approximate)",
        leap_table::OffsetStatus::Stale => " (table expired)",
    };
    println!("UTC        {} ({:.6})", detail.utc_iso, clock.utc);
    println!("TAI-UTC    {} s{status}", clock.tai_utc.seconds);
    println!("TAI        {:.6}", clock.tai);
    println!("TT         {:.6}", clock.tt);
    println!("J2000      {:.8} d", clock.j2000);
    println!("MSD        {:.8}", clock.msd);
    println!("MTC        {:.6} h", clock.mtc);
    println!("Ls         {:.4}°", clock.ls);
    println!("EOC        {:.4}°", clock.equation_of_center);
    println!("EOT        {:.4}°", clock.equation_of_time);
    if let Some(lmst) = detail.lmst {
        println!("LMST       {lmst:.8}");
    }
    println!("Local      {}", detail.local);
    Ok(())
}

fn run_zones(registry: &ZoneRegistry, cfg: &MarsTimeConfig) -> Result<()> {
    let name_w = registry.iter().map(|(n, _)| n.len()).max().unwrap_or(4).max(4);
    let epoch_w = registry
        .iter()
        .map(|(_, tz)| tz.epoch_name.len())
        .max()
        .unwrap_or(5)
        .max(5);

    println!(
        "{:<name_w$}  {:<epoch_w$}  {:>9}  {:>12}  {}",
        "NAME", "EPOCH", "START SOL", "OFFSET (s)", "ZONE"
    );
    for (name, tz) in registry.iter() {
        let marker = if name.eq_ignore_ascii_case(&cfg.default_zone) {
            " *"
        } else {
            ""
        };
        let zone = if tz.zone_name.is_empty() {
            "-"
        } else {
            tz.zone_name.as_str()
        };
        println!(
            "{:<name_w$}  {:<epoch_w$}  {:>9}  {:>12.3}  {}{}",
            name, tz.epoch_name, tz.start_sol, tz.offset_seconds, zone, marker
        );
    }
    Ok(())
}

fn run_leap_command(cmd: LeapCommand, conv: &Conversion, cfg: &MarsTimeConfig) -> Result<()> {
    match cmd {
        LeapCommand::Info => {
            let (path, table) = load_table(conv.leap_file.clone(), cfg)?;
            println!("file     {}", path.display());
            println!("updated  {}", unix_to_iso8601(table.updated()));
            println!(
                "expires  {}{}",
                unix_to_iso8601(table.expires()),
                expiry_note(&table, instant(conv.at))
            );
            println!("entries  {}", table.entries().len());
            println!();
            println!("{:<20}  {:>7}", "EFFECTIVE", "TAI-UTC");
            for entry in table.entries() {
                println!(
                    "{:<20}  {:>7}",
                    unix_to_iso8601(entry.effective_at),
                    entry.offset
                );
            }
            Ok(())
        }

        LeapCommand::Update { url } => {
            let dest = match conv.leap_file.clone().or_else(|| cfg.leap_file.clone()) {
                Some(path) => path,
                None => config::data_dir()?.join(config::LEAP_FILE_NAME),
            };
            leap_update::update(&url, &dest)?;
            Ok(())
        }
    }
}
