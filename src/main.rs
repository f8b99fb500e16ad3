use crate::aircraft::Status;
use crate::airport::Airport;
use crate::config::SimConfig;
use crate::flight::Direction;
use crate::geo::to_grid_cell;
use crate::report::{AircraftRow, TickReport, colorize};
use crate::scenario::Scenario;
use crate::simulation::simulation::Simulation;
use crate::time::Time;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use tabled::settings::Style;
use tracing::warn;

mod aircraft;
mod airport;
mod atc;
mod config;
mod error;
mod flight;
mod geo;
mod logging;
mod report;
mod scenario;
mod simulation;
mod time;
mod track;
mod weather;

const GRID_WIDTH: usize = 41;
const GRID_HEIGHT: usize = 21;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/lax.json")]
    scenario: PathBuf,

    /// Airport identifier, overrides the scenario
    #[arg(long)]
    airport: Option<String>,

    /// Airport latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Airport longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Simulation start (unix seconds, RFC 3339 or "YYYY-MM-DD HH:MM[:SS]" UTC)
    #[arg(long)]
    start: Option<Time>,

    /// Simulation end, same formats as --start
    #[arg(long)]
    end: Option<Time>,

    /// Tick length in seconds
    #[arg(long, value_name = "SECS")]
    step: Option<u64>,

    /// Control radius around the airport
    #[arg(long, value_name = "KM")]
    radius: Option<f64>,

    /// Seed for the weather generator
    #[arg(long)]
    seed: Option<u64>,

    /// Which of the airport's flights to simulate
    #[arg(short, long, value_enum, default_value_t = Direction::Arrival)]
    direction: Direction,

    /// Run to the end without the console
    #[arg(long)]
    batch: bool,

    /// In batch mode print one JSON report per tick to stdout
    #[arg(long)]
    json: bool,

    /// In batch mode wait this long between ticks
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pace_ms: u64,

    /// In batch mode stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn apply(&self, config: &mut SimConfig) {
        if let Some(id) = &self.airport {
            config.airport = Airport::new(id, config.airport.lat, config.airport.lon);
        }
        if let Some(lat) = self.lat {
            config.airport.lat = lat;
        }
        if let Some(lon) = self.lon {
            config.airport.lon = lon;
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(end) = self.end {
            config.end = end;
        }
        if let Some(step) = self.step {
            config.step_secs = step;
        }
        if let Some(radius) = self.radius {
            config.control_radius_km = radius;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let mut pager = match pager {
        Ok(p) => p,
        Err(_) => {
            println!("{}", content);
            return;
        }
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn print_tick(report: &TickReport) {
    let weather = report
        .weather
        .as_ref()
        .map(|w| w.to_string())
        .unwrap_or_else(|| "no weather".to_string());
    println!(
        "{} tick {:>4}  in area {:>3}  holding {:>3}  {}",
        report.time.to_string().as_str().bold(),
        report.tick,
        report.in_area.len(),
        report.count(Status::Holding),
        weather
    );
}

fn print_table(report: &TickReport, filter: &str) {
    let rows: Vec<AircraftRow> = report
        .aircraft
        .iter()
        .filter(|a| match filter {
            "f" | "flying" => matches!(a.status, Status::InFlight | Status::Holding | Status::ClearedToLand),
            "c" | "control" => report.in_area.contains(&a.id),
            "l" | "landed" => a.status == Status::Landed,
            "n" | "notrack" => a.status == Status::NoTrack,
            _ => true, // 'ls' or 'ls a'
        })
        .map(AircraftRow::from)
        .collect();
    if rows.is_empty() {
        println!("No matching aircraft found.");
        return;
    }
    let mut table = tabled::Table::new(&rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn print_aircraft(sim: &Simulation, id: &str) {
    let Some(ac) = sim.aircraft().iter().find(|a| &*a.id == id || a.callsign.eq_ignore_ascii_case(id)) else {
        println!("Unknown aircraft: {}", id);
        return;
    };
    let none = || "-".to_string();
    println!("{} ({})", ac.label().bold(), ac.id);
    println!(
        "  route     {} -> {}",
        ac.departure_airport.as_deref().unwrap_or("?"),
        ac.arrival_airport.as_deref().unwrap_or("?")
    );
    println!("  scheduled {} -> {}", ac.departure_time, ac.arrival_time);
    println!("  status    {}", colorize(ac.status()));
    println!("  track     {}/{} waypoints", ac.cursor(), ac.track().len());
    println!("  position  {}", ac.position().map(|p| p.to_string()).unwrap_or_else(none));
    println!("  altitude  {}", ac.altitude().map(|a| format!("{:.0} m", a)).unwrap_or_else(none));
    if let Some(wp) = ac.cursor().checked_sub(1).and_then(|i| ac.track().get(i)) {
        println!(
            "  heading   {}{}",
            wp.heading.map(|h| format!("{:.0}°", h)).unwrap_or_else(none),
            if wp.on_ground { " (on ground)" } else { "" }
        );
    }
}

fn print_grid(sim: &Simulation) {
    let control = sim.control();
    let bounds = control.airport.bounds(control.control_radius_km);
    let mut cells = vec![vec![0usize; GRID_WIDTH]; GRID_HEIGHT];
    for (_, (x, y)) in control.grid(sim.aircraft(), GRID_WIDTH, GRID_HEIGHT) {
        cells[y][x] += 1;
    }
    let home = to_grid_cell(control.airport.lon, control.airport.lat, &bounds, GRID_WIDTH, GRID_HEIGHT);

    println!("{} within {} km", control.airport, control.control_radius_km);
    for y in (0..GRID_HEIGHT).rev() {
        let line: String = (0..GRID_WIDTH)
            .map(|x| match cells[y][x] {
                0 if (x, y) == home => '+',
                0 => '.',
                n @ 1..=9 => char::from_digit(n as u32, 10).unwrap_or('*'),
                _ => '*',
            })
            .collect();
        println!("  {}", line);
    }
}

fn run_batch(sim: &mut Simulation, args: &Args) {
    let stop = sim.stop_handle();
    let pace = Duration::from_millis(args.pace_ms);
    let summary = sim.run_with(|report| {
        if args.json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("could not encode tick {}: {}", report.tick, e),
            }
        }
        if args.max_ticks.is_some_and(|max| report.tick + 1 >= max) {
            stop.request_stop();
        }
        if !pace.is_zero() {
            std::thread::sleep(pace);
        }
    });
    if args.json {
        eprintln!("{}", summary);
    } else {
        println!("{}", summary);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_logging(&args.log_level);

    let mut scenario = Scenario::load_from_file(&args.scenario)?;
    args.apply(&mut scenario.config);
    let roster = scenario.aircraft(args.direction);
    let mut sim = Simulation::new(scenario.config, roster)?;

    if args.batch {
        run_batch(&mut sim, &args);
        return Ok(());
    }

    println!(
        "Tower online at {}. Loaded {} aircraft from {}, {} ticks of {}s from {}",
        sim.config().airport,
        sim.aircraft().len(),
        args.scenario.display(),
        sim.config().tick_count(),
        sim.config().step_secs,
        sim.clock()
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "step".to_string(),
            "run".to_string(),
            "ls".to_string(),
            "show".to_string(),
            "weather".to_string(),
            "grid".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(&format!("{} >> ", sim.clock()));
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "step" => {
                        let n = parts.get(1).and_then(|s| s.parse::<u64>().ok()).unwrap_or(1);
                        for _ in 0..n {
                            match sim.tick() {
                                Some(report) => print_tick(report),
                                None => {
                                    println!("Simulation window is over.");
                                    break;
                                }
                            }
                        }
                    },
                    "run" => {
                        let summary = sim.run_with(print_tick);
                        println!("{}", summary);
                    },
                    "ls" => {
                        let sub = parts.get(1).map(|s| *s).unwrap_or("a");
                        print_table(&sim.snapshot(), sub);
                    },
                    "show" => {
                        if let Some(id) = parts.get(1) {
                            print_aircraft(&sim, id);
                        } else {
                            println!("Usage: show <aircraft_id|callsign>");
                        }
                    },
                    "weather" => match sim.weather().current() {
                        Some(w) => println!("{}", w),
                        None => println!("No weather sampled yet."),
                    },
                    "grid" => print_grid(&sim),
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  step [n]     - Advance the simulation by n ticks (default 1)");
                        println!("  run          - Run to the end of the simulation window");
                        println!("  ls [filter]  - List aircraft, filter: a - all, f - flying, c - in control area, l - landed, n - no track");
                        println!("  show <id>    - Show one aircraft by transponder id or callsign");
                        println!("  weather      - Show the current weather");
                        println!("  grid         - Show aircraft inside the control area on a grid");
                        println!("  help / ?     - Show this help menu");
                        println!("  exit / quit  - Exit the simulator\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
