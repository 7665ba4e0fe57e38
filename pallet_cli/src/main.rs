//! # Pallet Quote CLI
//!
//! Command-line front end for the pricing engine. Reads pallets and quotes
//! as JSON, prices them against the settings in the data directory, and
//! prints human-readable results followed by the JSON form.
//!
//! ```text
//! pallet_cli [--config pallet.toml] <command>
//!
//!   init                                 save a starter settings document
//!   locations                            list shipping locations
//!   add-location <name> <miles> [addr]   add a shipping location
//!   price <pallet.json>                  basic calculator, one pallet
//!   quote <quote.json> [--save]          advanced calculator, many pallets
//!   plan <pallet.json>                   pallets-per-truck for each pattern
//!   pdf <quote-id> <out.pdf>             render a saved quote
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pallet_core::errors::{QuoteError, QuoteResult};
use pallet_core::file_io::read_json;
use pallet_core::format::{format_board_feet, format_dollars, format_fastener_cost, format_money};
use pallet_core::load_plan::{plan_load, LoadingPattern, PalletFootprint};
use pallet_core::pallet::Pallet;
use pallet_core::pdf::render_quote_pdf;
use pallet_core::pricing::{CalculationResults, QuoteInput, QuoteSummary};
use pallet_core::session::QuoteSession;
use pallet_core::settings::GlobalSettings;
use pallet_core::store::{JsonDataDir, LocationStore, QuoteStore, SettingsStore};
use pallet_core::{load_config, AppConfig};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG: &str = "pallet.toml";
const RULE: &str = "═══════════════════════════════════════";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn usage() -> &'static str {
    "usage: pallet_cli [--config <file>] <init|locations|add-location|price|quote|plan|pdf> [args]"
}

fn missing_arg(name: &str) -> QuoteError {
    QuoteError::invalid_input(name, "", format!("Missing argument <{}>. {}", name, usage()))
}

/// Split `--config <path>` off the front of the argument list.
fn parse_config_path(args: &mut Vec<String>) -> QuoteResult<PathBuf> {
    match args.iter().position(|a| a == "--config") {
        Some(index) => {
            if index + 1 >= args.len() {
                return Err(missing_arg("config"));
            }
            let path = args.remove(index + 1);
            args.remove(index);
            Ok(PathBuf::from(path))
        }
        None => Ok(PathBuf::from(DEFAULT_CONFIG)),
    }
}

fn open_session(store: &JsonDataDir, config: &AppConfig) -> QuoteResult<QuoteSession> {
    Ok(QuoteSession::load(store, store)?.with_default_transportation_type(config.default_transportation_type.clone()))
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!();
    println!("JSON Output:");
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

fn print_results(results: &CalculationResults) {
    println!("  Board feet:            {}", format_board_feet(results.board_feet));
    println!("  Cost per MBF:          {}", format_dollars(results.cost_per_mbf));
    println!("  Total cost:            {}", format_dollars(results.total_cost));
    println!("  Transportation:        {}", format_dollars(results.transportation_cost));
    println!("  Total w/ transport:    {}", format_dollars(results.total_cost_with_transport));
    println!("  Price per board foot:  {}", format_dollars(results.price_per_board_foot));
    println!();
    println!("  Walkaway price:        {}", format_dollars(results.walkaway_price));
    println!("  20% margin:            {}", format_dollars(results.profit_margin_20));
    println!("  25% margin:            {}", format_dollars(results.profit_margin_25));
    println!("  30% margin:            {}", format_dollars(results.profit_margin_30));
    println!("  35% margin:            {}", format_dollars(results.profit_margin_35));
}

fn cmd_init(store: &mut JsonDataDir) -> QuoteResult<()> {
    if store.current_settings()?.is_some() {
        println!("Settings already exist in {}", store.config().data_dir.display());
        return Ok(());
    }
    store.save_settings(GlobalSettings::default())?;
    println!("Saved starter settings to {}", store.config().settings_path().display());
    println!("Edit lumber prices, delivery fees and vehicles there before quoting.");
    Ok(())
}

fn cmd_locations(store: &JsonDataDir) -> QuoteResult<()> {
    let locations = store.list_locations()?;
    if locations.is_empty() {
        println!("No shipping locations. Add one with `add-location`.");
        return Ok(());
    }
    for location in &locations {
        println!(
            "  {:<38} {:<24} {:>8} mi  {}",
            location.id,
            location.name,
            format_money(location.distance_miles),
            location.address
        );
    }
    Ok(())
}

fn cmd_add_location(store: &mut JsonDataDir, args: &[String]) -> QuoteResult<()> {
    let name = args.first().ok_or_else(|| missing_arg("name"))?;
    let miles_arg = args.get(1).ok_or_else(|| missing_arg("miles"))?;
    let miles: f64 = miles_arg
        .parse()
        .map_err(|_| QuoteError::invalid_input("miles", miles_arg.as_str(), "Distance must be a number"))?;
    let address = args.get(2).map(String::as_str).unwrap_or("");

    let location = store.add_location(name, address, miles)?;
    println!("Added location {} ({})", location.name, location.id);
    Ok(())
}

fn cmd_price(store: &JsonDataDir, config: &AppConfig, path: &Path) -> QuoteResult<()> {
    let pallet: Pallet = read_json(path)?;
    let mut session = open_session(store, config)?;
    let id = session.insert_pallet(pallet);

    println!("{}", RULE);
    println!("  BASIC PALLET PRICE");
    println!("{}", RULE);
    println!();

    match session.calculate_single(&id)? {
        Some(single) => {
            print_results(&single.results);
            println!();
            println!("  Fasteners (not in total): ${}", format_fastener_cost(single.fastener_cost));
            print_json(&single.results);
        }
        None => {
            let pallet = session.pallet(&id)?;
            println!(
                "  No price curve for lumber type '{}'.",
                pallet.primary_lumber_type().unwrap_or("(none)")
            );
        }
    }
    Ok(())
}

fn print_summary(summary: &QuoteSummary) {
    println!(
        "  {:<20} {:>10} {:>12} {:>12} {:>10} {:>12} {:>12}",
        "Pallet", "Board Ft", "Lumber", "Processing", "Fasteners", "Freight", "Walkaway"
    );
    for line in &summary.pallets {
        println!(
            "  {:<20} {:>10} {:>12} {:>12} {:>10} {:>12} {:>12}",
            line.pallet_name,
            format_board_feet(line.board_feet),
            format_dollars(line.lumber_price),
            format_dollars(line.processing_cost),
            format!("${}", format_fastener_cost(line.fastener_cost)),
            format_dollars(line.transportation_cost),
            format_dollars(line.results.walkaway_price),
        );
    }
    println!();
    println!("  Total board feet:      {}", format_board_feet(summary.total_board_feet));
    println!("  Lumber:                {}", format_dollars(summary.lumber_price));
    println!("  Processing:            {}", format_dollars(summary.processing_cost));
    println!("  Additional options:    {}", format_dollars(summary.additional_options_cost));
    println!("  Delivery fee:          {}", format_dollars(summary.delivery_fee));
    println!("  Labor (build):         {}", format_dollars(summary.labor_build_price));
    println!();
    println!("{}", RULE);
    println!("  NET REVENUE PRICE (30%): {}", format_dollars(summary.net_revenue_price_30));
    println!("{}", RULE);
}

fn cmd_quote(store: &mut JsonDataDir, config: &AppConfig, path: &Path, save: bool) -> QuoteResult<()> {
    let input: QuoteInput = read_json(path)?;
    let mut session = open_session(store, config)?;
    for pallet in input.pallets {
        session.insert_pallet(pallet);
    }
    session.set_build_options(input.build_options);
    session.set_delivery_fee(input.delivery_fee);
    session.set_labor_build_price(input.labor_build_price);

    let summary = session.calculate()?.clone();
    print_summary(&summary);

    if save {
        let id = session.save_quote(store)?;
        println!();
        println!("Saved quote {}", id);
    }
    print_json(&summary);
    Ok(())
}

fn cmd_plan(store: &JsonDataDir, path: &Path) -> QuoteResult<()> {
    let pallet: Pallet = read_json(path)?;
    let settings = store
        .current_settings()?
        .ok_or_else(|| QuoteError::configuration_missing("global settings"))?;

    let footprint = PalletFootprint::from_pallet(&pallet)
        .ok_or_else(|| QuoteError::invalid_input("pallet", &pallet.name, "Pallet needs stringers and boards to plan a load"))?;
    let vehicle_type = pallet
        .transportation_type
        .as_deref()
        .ok_or_else(|| QuoteError::validation_failed(&pallet.name, "transportation_type", "Select a transportation type"))?;
    let vehicle = settings
        .vehicle(vehicle_type)
        .ok_or_else(|| QuoteError::not_found("VehicleDimensions", vehicle_type))?;

    println!(
        "  Pallet {}\" x {}\" x {}\" on {}",
        format_money(footprint.length.0),
        format_money(footprint.width.0),
        format_money(footprint.height.0),
        vehicle_type
    );
    println!();
    let plans: Vec<_> = LoadingPattern::ALL
        .iter()
        .map(|&pattern| plan_load(&footprint, vehicle, pattern))
        .collect();
    for plan in &plans {
        println!(
            "  {:<12} {:>4} per layer x {:>2} layers = {:>4} per truck",
            plan.pattern.label(),
            plan.per_layer,
            plan.layers,
            plan.pallets_per_truck
        );
    }
    print_json(&plans);
    Ok(())
}

fn cmd_pdf(store: &JsonDataDir, args: &[String]) -> QuoteResult<()> {
    let id = args.first().ok_or_else(|| missing_arg("quote-id"))?;
    let out = args.get(1).ok_or_else(|| missing_arg("out.pdf"))?;

    let quote = store
        .load_quote(id)?
        .ok_or_else(|| QuoteError::not_found("Quote", id.as_str()))?;
    let bytes = render_quote_pdf(&quote)?;
    std::fs::write(out, &bytes).map_err(|e| QuoteError::file_error("write pdf", out.as_str(), e.to_string()))?;
    info!(quote = %quote.id, path = %out, "pdf written");
    println!("Wrote {} ({} bytes)", out, bytes.len());
    Ok(())
}

fn run(mut args: Vec<String>) -> QuoteResult<()> {
    let config_path = parse_config_path(&mut args)?;
    let config = load_config(&config_path)?;
    debug!(data_dir = %config.data_dir.display(), "using data directory");
    let mut store = JsonDataDir::new(config.clone());

    let command = args.first().map(String::as_str).ok_or_else(|| missing_arg("command"))?;
    let rest = &args[1..];

    match command {
        "init" => cmd_init(&mut store),
        "locations" => cmd_locations(&store),
        "add-location" => cmd_add_location(&mut store, rest),
        "price" => {
            let path = rest.first().ok_or_else(|| missing_arg("pallet.json"))?;
            cmd_price(&store, &config, Path::new(path))
        }
        "quote" => {
            let path = rest.first().ok_or_else(|| missing_arg("quote.json"))?;
            let save = rest.iter().any(|a| a == "--save");
            cmd_quote(&mut store, &config, Path::new(path), save)
        }
        "plan" => {
            let path = rest.first().ok_or_else(|| missing_arg("pallet.json"))?;
            cmd_plan(&store, Path::new(path))
        }
        "pdf" => cmd_pdf(&store, rest),
        other => Err(QuoteError::invalid_input("command", other, usage())),
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
