use std::fs;
use std::path::PathBuf;

use culinary_atlas::globe::ManualScheduler;
use culinary_atlas::narrative::{GeminiClient, NarrativeBackend};
use culinary_atlas::shell::{AppStatus, PresentationShell, ReportView, SUGGESTED_QUERIES};
use culinary_atlas::topology::HttpBoundarySource;
use culinary_atlas::{AtlasConfig, telemetry};

const USAGE: &str = "usage: culinary_atlas <query> [--json] [--frame-out <path>]";

#[derive(Debug)]
struct CliArgs {
    query: String,
    json: bool,
    frame_out: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let _ = telemetry::init_tracing_with_filter("warn");
    let args = parse_args()?;
    let config = AtlasConfig::from_env();

    let mut shell = PresentationShell::from_config(&config);
    for warning in shell.warnings() {
        eprintln!("warning: {warning}");
    }
    let client = config
        .gemini_config()
        .ok()
        .map(GeminiClient::new)
        .transpose()
        .map_err(|err| err.to_string())?;

    if query_status(&mut shell, client.as_ref(), &args.query) != AppStatus::Success {
        return Err(shell
            .error_message()
            .unwrap_or("query did not complete")
            .to_owned());
    }
    let report = shell
        .report()
        .ok_or_else(|| "report missing after success".to_owned())?;
    let mut view = ReportView::build(report, &config, ManualScheduler::new())
        .map_err(|err| err.to_string())?;

    if let Some(path) = &args.frame_out {
        let source = HttpBoundarySource::new(&config.boundary_url, &config.boundary_object);
        view.globe.load_boundaries_from(&source);
        // Land the intro so the frame shows the origin.
        view.advance(config.globe.intro_duration_ms);
        let frame = view.globe.build_frame().map_err(|err| err.to_string())?;
        let json = frame.to_json_pretty().map_err(|err| err.to_string())?;
        fs::write(path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display()))?;
    }

    if args.json {
        let json = serde_json::to_string_pretty(report)
            .map_err(|err| format!("failed to serialize report: {err}"))?;
        println!("{json}");
    } else {
        print_view(&view);
    }
    Ok(())
}

/// Runs the query through the shell; without a client the shell blocks it.
fn query_status<B: NarrativeBackend>(
    shell: &mut PresentationShell,
    client: Option<&B>,
    query: &str,
) -> AppStatus {
    match client {
        Some(client) => shell.run_query(client, query),
        None => {
            shell.submit(query);
            shell.status()
        }
    }
}

fn print_view(view: &ReportView<ManualScheduler>) {
    println!("{}", view.food_name.to_uppercase());
    println!();
    for insight in &view.key_insights {
        println!("{:<14} {}", insight.label, insight.value);
    }

    if !view.cultural_insights.is_empty() {
        println!("\nCULTURAL SOUL");
        for insight in &view.cultural_insights {
            println!("  {}: {} ({})", insight.region, insight.meaning, insight.tradition);
        }
    }

    println!("\nFLAVOR");
    for (label, value) in view.stats.radar.labels().iter().zip(view.stats.radar.values()) {
        println!("  {label:<8} {value:>4.1}");
    }
    if !view.stats.hub_ranking.is_empty() {
        println!("\nCONSUMPTION");
        for hub in &view.stats.hub_ranking {
            println!("  {:<20} {:>5.1}%", hub.country, hub.percentage);
        }
    }
    if !view.stats.ingredient_shifts.is_empty() {
        println!("\nINGREDIENT SHIFTS");
        for shift in &view.stats.ingredient_shifts {
            println!("  {} -> {}: {}", shift.original, shift.modern, shift.reason);
        }
    }

    println!("\nTIMELINE ({})", view.historical_span);
    for entry in &view.timeline {
        println!("  [{}] {} @ {}", entry.when, entry.title, entry.location);
        println!("      {}", entry.body);
    }

    if !view.regional_variations.is_empty() {
        println!("\nREGIONAL VARIATIONS");
        for variation in &view.regional_variations {
            println!(
                "  {} ({}, {}): {}",
                variation.name, variation.region, variation.popularity, variation.key_difference
            );
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut query = None::<String>;
    let mut json = false;
    let mut frame_out = None::<PathBuf>;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--frame-out" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --frame-out".to_owned())?;
                frame_out = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                return Err(format!(
                    "{USAGE}\ntry one of: {}",
                    SUGGESTED_QUERIES.join(", ")
                ));
            }
            flag if flag.starts_with("--") => return Err(format!("unknown argument `{flag}`")),
            _ if query.is_some() => return Err(format!("unexpected argument `{arg}`")),
            _ => query = Some(arg),
        }
    }

    let query = query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| USAGE.to_owned())?;
    Ok(CliArgs {
        query,
        json,
        frame_out,
    })
}
