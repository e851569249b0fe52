use clap::{Parser, Subcommand};
use mana_castable::card::{
    parse_cost, parse_pool_file, parse_sources, LandDatabase, ManaSource, Symbol,
};
use mana_castable::castable::{Caster, Strategy};
use mana_castable::config::CastConfig;
use mana_castable::simulation::{race, run_crossval, CrossvalParams};

#[derive(Parser)]
#[command(name = "mana-castable")]
#[command(about = "Decide whether a set of lands can pay a mana cost", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file (limits, wildcard rule, default strategy)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level: error, warn, info, debug or trace (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Comma separated symbol groups, one per land, e.g. "BR,R,B,W"
    #[arg(short, long, conflicts_with = "pool")]
    lands: Option<String>,

    /// Land pool file ("4 Swamp" per line)
    #[arg(short, long)]
    pool: Option<String>,

    /// Land database used to resolve pool entries
    #[arg(long, default_value = "lands.json")]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the lands can pay a cost
    Check {
        #[command(flatten)]
        sources: SourceArgs,

        /// Cost to pay, e.g. "WRWRB", "2WW" or "{1}{B}"
        #[arg(short = 'x', long)]
        cost: String,

        /// Solver to use (defaults to the configured strategy)
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Print which land pays each symbol
        #[arg(short, long)]
        assign: bool,

        /// Print the compatibility matrix
        #[arg(short, long)]
        matrix: bool,
    },

    /// Cross-validate all strategies on random instances
    Crossval {
        /// Number of random instances
        #[arg(short, long, default_value = "1000")]
        trials: usize,

        /// Base seed; trial i uses seed + i
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Largest number of lands per instance
        #[arg(long, default_value = "8")]
        max_sources: usize,

        /// Largest cost length per instance
        #[arg(long, default_value = "6")]
        max_cost: usize,

        /// Write the JSON report to this file
        #[arg(short, long)]
        report: Option<String>,
    },

    /// Time every strategy on one instance
    Race {
        #[command(flatten)]
        sources: SourceArgs,

        #[arg(short = 'x', long)]
        cost: String,

        /// Queries per strategy
        #[arg(short, long, default_value = "1000")]
        iterations: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref());

    let config = match &cli.config {
        Some(path) => match CastConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("✗ Failed to load config '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => CastConfig::default(),
    };

    match cli.command {
        Commands::Check {
            sources,
            cost,
            strategy,
            assign,
            matrix,
        } => {
            let sources = load_sources(&sources);
            let cost = load_cost(&cost);
            check(&config, &sources, &cost, strategy, assign, matrix);
        }
        Commands::Crossval {
            trials,
            seed,
            max_sources,
            max_cost,
            report,
        } => {
            let params = CrossvalParams {
                trials,
                seed,
                max_sources,
                max_cost,
                ..Default::default()
            };
            crossval(&config, &params, report.as_deref());
        }
        Commands::Race {
            sources,
            cost,
            iterations,
        } => {
            let sources = load_sources(&sources);
            let cost = load_cost(&cost);
            race_strategies(&config, &sources, &cost, iterations);
        }
    }
}

fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        match level.parse::<log::LevelFilter>() {
            Ok(filter) => {
                builder.filter_level(filter);
            }
            Err(_) => {
                eprintln!("✗ Unknown log level '{}'", level);
                std::process::exit(1);
            }
        }
    }
    builder.init();
}

fn load_sources(args: &SourceArgs) -> Vec<ManaSource> {
    if let Some(pool) = &args.pool {
        let db = match LandDatabase::from_file(&args.db) {
            Ok(db) => {
                eprintln!("✓ Loaded {} lands from {}", db.land_count(), args.db);
                db
            }
            Err(e) => {
                eprintln!("✗ Failed to load lands: {}", e);
                std::process::exit(1);
            }
        };
        return match parse_pool_file(pool, &db) {
            Ok(sources) => sources,
            Err(e) => {
                eprintln!("✗ Failed to parse pool file '{}': {}", pool, e);
                std::process::exit(1);
            }
        };
    }

    match parse_sources(args.lands.as_deref().unwrap_or("")) {
        Ok(sources) => sources,
        Err(e) => {
            eprintln!("✗ Failed to parse lands: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_cost(input: &str) -> Vec<Symbol> {
    match parse_cost(input) {
        Ok(cost) => cost,
        Err(e) => {
            eprintln!("✗ Failed to parse cost '{}': {}", input, e);
            std::process::exit(1);
        }
    }
}

fn describe_cost(cost: &[Symbol]) -> String {
    cost.iter().map(|s| format!("{{{}}}", s)).collect()
}

fn check(
    config: &CastConfig,
    sources: &[ManaSource],
    cost: &[Symbol],
    strategy: Option<Strategy>,
    assign: bool,
    show_matrix: bool,
) {
    let mut caster = Caster::from_config(config);
    if let Some(strategy) = strategy {
        caster = caster.with_strategy(strategy);
    }

    println!("\n=== Castability Check ===\n");
    println!("Lands: {}", sources.len());
    for (idx, source) in sources.iter().enumerate() {
        println!("  {:2}: {}", idx, source);
    }
    println!("Cost: {}", describe_cost(cost));
    println!("Strategy: {}", caster.strategy());
    println!();

    if show_matrix {
        println!("Compatibility matrix (rows = lands, columns = cost symbols):");
        print!("{}", caster.matrix(sources, cost));
        println!();
    }

    match caster.find_assignment(sources, cost) {
        Ok(Some(assignment)) => {
            println!("Castable: yes");
            if assign {
                println!();
                for (position, source) in assignment.pairs() {
                    println!("  {{{}}} <- {:2}: {}", cost[position], source, sources[source]);
                }
            }
        }
        Ok(None) => println!("Castable: no"),
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(2);
        }
    }
}

fn crossval(config: &CastConfig, params: &CrossvalParams, report_path: Option<&str>) {
    println!("\n=== Strategy Cross-Validation ===\n");
    println!("Trials: {}", params.trials);
    println!("Seed: {}", params.seed);
    println!(
        "Instance size: up to {} lands, cost up to {}",
        params.max_sources, params.max_cost
    );
    println!();

    let report = match run_crossval(params, config, true) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("✗ Cross-validation aborted: {}", e);
            std::process::exit(2);
        }
    };

    let pct = report.castable as f64 / report.trials.max(1) as f64 * 100.0;
    println!("Castable: {:5.1}% ({}/{})", pct, report.castable, report.trials);
    println!("Disagreements: {}", report.disagreements.len());
    for d in &report.disagreements {
        println!(
            "  seed {}: sat={} sdr={} matching={}",
            d.outcome.seed, d.outcome.sat, d.outcome.sdr, d.outcome.matching
        );
    }
    println!(
        "\nCompleted in {} ms ({:.0} trials/sec)",
        report.elapsed_ms,
        report.trials as f64 / (report.elapsed_ms.max(1) as f64 / 1000.0)
    );

    if let Some(path) = report_path {
        let written = report
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("Report written to {}", path),
            Err(e) => {
                eprintln!("✗ Failed to write report '{}': {}", path, e);
                std::process::exit(1);
            }
        }
    }

    if !report.all_agree() {
        std::process::exit(3);
    }
}

fn race_strategies(config: &CastConfig, sources: &[ManaSource], cost: &[Symbol], iterations: u32) {
    println!("\n=== Strategy Timing ===\n");
    println!("Lands: {}", sources.len());
    println!("Cost: {}", describe_cost(cost));
    println!("Iterations: {}", iterations);
    println!();

    match race(sources, cost, config, iterations) {
        Ok(results) => {
            for result in results {
                println!(
                    "  {:<9} castable={:<5} total {:>10.2?}  per query {:>9.2?}",
                    result.strategy.to_string(),
                    result.castable,
                    result.total,
                    result.per_iteration()
                );
            }
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(2);
        }
    }
}
