// Searches the enumeration of trial nets for one whose reduction factors the given number, then
// prints the winning net and exports it as a Graphviz file.

#[macro_use]
extern crate clap;

use std::fs;
use std::process;
use std::time::Instant;

use clap::{App, Arg, ArgMatches};
use tracing::{error, info, Level};

use inet::inet::{show_net, to_dot};
use inet::search::{search_factor, search_factor_parallel, solution_net, Enumerator, SearchConfig};

fn progress(index: usize, found: bool) {
  if found {
    println!("Found solution at index {}!", index);
  } else {
    println!("Searched through {} indices...", index);
  }
}

// Parses an optional argument, exiting with clap's usage error if it is present but malformed.
fn value_or<T: std::str::FromStr>(matches: &ArgMatches, name: &str, default: T) -> T {
  if matches.is_present(name) {
    value_t!(matches, name, T).unwrap_or_else(|err| err.exit())
  } else {
    default
  }
}

fn main() {
  let matches = App::new("inet")
    .version(crate_version!())
    .about("Searches interaction nets for a factorization of a number")
    .arg(Arg::with_name("number").help("The number to factor").required(true).index(1))
    .arg(Arg::with_name("max_nodes").help("Arena capacity of each net").index(2))
    .arg(Arg::with_name("gas_limit").help("Rewrite budget of each reduction").index(3))
    .arg(
      Arg::with_name("workers")
        .short("w")
        .long("workers")
        .takes_value(true)
        .help("Number of search threads"),
    )
    .arg(
      Arg::with_name("max_search")
        .short("m")
        .long("max-search")
        .takes_value(true)
        .help("Number of indices to try"),
    )
    .arg(
      Arg::with_name("dot")
        .long("dot")
        .takes_value(true)
        .default_value("solution.dot")
        .help("Where to write the solution graph"),
    )
    .arg(Arg::with_name("verbose").short("v").multiple(true).help("Log more (repeat for more detail)"))
    .get_matches();

  let level = match matches.occurrences_of("verbose") {
    0 => Level::WARN,
    1 => Level::INFO,
    2 => Level::DEBUG,
    _ => Level::TRACE,
  };
  tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

  let defaults = SearchConfig::default();
  let config = SearchConfig {
    target: value_t_or_exit!(matches, "number", u64),
    max_nodes: value_or(&matches, "max_nodes", defaults.max_nodes),
    gas_limit: value_or(&matches, "gas_limit", defaults.gas_limit),
    workers: value_or(&matches, "workers", defaults.workers),
    max_search: value_or(&matches, "max_search", defaults.max_search),
    ..defaults
  };
  if let Err(err) = config.validate() {
    eprintln!("The number to factor must be greater than 1 ({})", err);
    process::exit(1);
  }

  println!(
    "Searching for a factorization of {} with max_nodes={} and gas_limit={}",
    config.target, config.max_nodes, config.gas_limit
  );
  info!(?config, "search started");

  let start = Instant::now();
  let solution = if config.workers > 1 {
    search_factor_parallel(&config, Some(&progress))
  } else {
    let mut walk = Enumerator::new(config.max_nodes);
    search_factor(&mut walk, &config, Some(&progress))
  };
  let elapsed = start.elapsed();

  match solution {
    Some(index) => {
      println!("\nSuccess! Found a factorization for {} at index {}", config.target, index);
      match solution_net(&config, index) {
        Ok(net) => {
          println!("Factors: {} * {} = {}", net.probe.factor_a, net.probe.factor_b, config.target);
          print!("{}", show_net(&net));
          let path = matches.value_of("dot").unwrap_or("solution.dot");
          match fs::write(path, to_dot(&net)) {
            Ok(()) => {
              println!("Graph visualization saved to {}", path);
              println!("You can visualize it with: dot -Tpng {} -o solution.png", path);
            }
            Err(err) => error!(%err, path, "could not write graph"),
          }
        }
        Err(err) => error!(%err, index, "could not rebuild solution net"),
      }
    }
    None => println!("\nFailed to find a factorization for {}", config.target),
  }

  println!("\nSearch completed in {:.2} seconds", elapsed.as_secs_f64());
  process::exit(if solution.is_some() { 0 } else { 1 });
}
