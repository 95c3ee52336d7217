use clap::{Parser, ValueEnum};
use cut_planner::config::{CostModel, DEFAULT_SEARCH_BUDGET, PlannerConfig, Strategy};
use cut_planner::ordering::StockOrder;
use cut_planner::planner::Planner;
use cut_planner::render::{self, Totals};
use cut_planner::types::{DemandItem, SourceKind, StockLot};
use tracing::Level;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Least scrap, never welds
    Scrap,
    /// Weigh scrap against weld cost
    Weld,
}

#[derive(Parser)]
#[command(
    name = "cut_planner",
    about = "1D bar cutting planner (rebar, profiles, tubes)"
)]
struct Cli {
    /// Stock bars as LENGTH:QTY (e.g. 12000:10 6000:4)
    #[arg(long, num_args = 1..)]
    stock: Vec<String>,

    /// Demanded pieces as LENGTH:QTY (e.g. 5000:5 3000:8)
    #[arg(long, num_args = 1..)]
    demand: Vec<String>,

    /// Stock order: ascending or descending
    #[arg(long, default_value = "ascending", value_parser = parse_order)]
    order: StockOrder,

    #[arg(long, value_enum, default_value_t = StrategyArg::Scrap)]
    strategy: StrategyArg,

    /// Cost per unit of scrap length
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// Cost per weld
    #[arg(long, default_value_t = 500.0)]
    beta: f64,

    /// Shortest offcut kept for reuse (weld strategy)
    #[arg(long, default_value_t = 100)]
    gamma: u32,

    /// Shortest segment allowed in a weld
    #[arg(long, default_value_t = 100)]
    delta: u32,

    /// Node budget for each weld search
    #[arg(long, default_value_t = DEFAULT_SEARCH_BUDGET)]
    search_budget: usize,

    /// Show ASCII layout of each bar
    #[arg(long)]
    layout: bool,

    /// Log planner decisions to stderr
    #[arg(long)]
    verbose: bool,
}

fn parse_order(s: &str) -> Result<StockOrder, String> {
    match s {
        "ascending" | "asc" => Ok(StockOrder::Ascending),
        "descending" | "desc" => Ok(StockOrder::Descending),
        _ => Err(format!(
            "invalid order '{}', expected: ascending or descending",
            s
        )),
    }
}

fn parse_pair(s: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid entry '{}', expected LENGTH:QTY", s));
    }
    let length = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    let qty = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if length == 0 {
        return Err(format!("length must be non-zero in '{}'", s));
    }
    Ok((length, qty))
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_max_level(Level::DEBUG)
            .init();
    }

    let stock: Vec<StockLot> = cli
        .stock
        .iter()
        .map(|s| parse_pair(s).map(|(l, q)| StockLot::new(l, q)))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| fail(e));

    let demand: Vec<DemandItem> = cli
        .demand
        .iter()
        .map(|s| parse_pair(s).map(|(l, q)| DemandItem::new(l, q)))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| fail(e));

    if stock.is_empty() || demand.is_empty() {
        fail("both --stock and --demand are required");
    }

    let cost = CostModel {
        alpha: cli.alpha,
        beta: cli.beta,
        gamma: cli.gamma,
        delta: cli.delta,
    };
    let strategy = match cli.strategy {
        StrategyArg::Scrap => Strategy::Scrap,
        StrategyArg::Weld => Strategy::Weld {
            cost,
            search_budget: cli.search_budget,
        },
    };

    let planner = Planner::new(PlannerConfig::new(cli.order, strategy));
    let plan = planner.plan(&stock, &demand).unwrap_or_else(|e| fail(e));

    // Output results
    for (i, entry) in plan.entries.iter().enumerate() {
        let from = match entry.source {
            SourceKind::Stock => "bar",
            SourceKind::Leftover => "offcut",
        };
        println!(
            "{} {} ({}): {:?}, offcut {}",
            i + 1,
            from,
            entry.source_length,
            entry.cuts,
            entry.offcut()
        );
        if cli.layout {
            println!("  {}", render::render_bar(entry));
        }
    }
    println!();

    println!("Leftover: {:?}", plan.leftover);
    if !plan.scrap.is_empty() {
        println!("Scrap: {:?}", plan.scrap);
    }
    for weld in &plan.welds {
        println!(
            "Weld: {} = {} + {}",
            weld.demand_length, weld.first_segment, weld.second_segment
        );
    }
    for item in &plan.unmet {
        println!("Unmet: {}", item);
    }
    for segment in &plan.unmet_segments {
        println!(
            "Unmet segment: {} (for {})",
            segment.length, segment.demand_length
        );
    }

    let totals = Totals::of(&plan, &cost);
    println!(
        "Summary: {} entr{}, {} cut{}, {} weld{}, waste {}, cost {:.1}",
        plan.entries.len(),
        if plan.entries.len() == 1 { "y" } else { "ies" },
        plan.cut_count,
        if plan.cut_count == 1 { "" } else { "s" },
        plan.weld_count(),
        if plan.weld_count() == 1 { "" } else { "s" },
        totals.waste,
        totals.cost,
    );
}
