use std::path::PathBuf;

use clap::Parser;
use plank_planner::assemble::{OrderResponse, ProductBreakdown};
use plank_planner::catalog::MemoryCatalog;
use plank_planner::engine::{OrderRequest, calculate_order_by_product, calculate_order_by_size};
use plank_planner::render;
use plank_planner::types::{Dimension, Direction, OrderRequestItem};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "plank_planner",
    about = "Cut list and plank count for a furniture production order"
)]
struct Cli {
    /// Catalog of pieces and products (JSON)
    #[arg(long)]
    catalog: PathBuf,

    /// Ordered products as ID:qty (e.g. 1:5 3:2)
    #[arg(long = "products", num_args = 1.., value_parser = parse_product)]
    products: Vec<OrderRequestItem>,

    /// Stock plank length
    #[arg(long, default_value_t = 3000)]
    plank_size: i64,

    /// Blade kerf width (default: 0)
    #[arg(long, default_value_t = 0)]
    kerf: i64,

    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc", value_parser = parse_direction)]
    order: Direction,

    /// Dimension precedence, a permutation of x,y,z
    #[arg(long, default_value = "x,y,z")]
    sort_by: String,

    /// Group the result by size (with plank counts) or by product
    #[arg(long, default_value = "size", value_parser = ["size", "product"])]
    group_by: String,

    /// Show the cuts on each plank
    #[arg(long)]
    layout: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log each calculation stage to stderr
    #[arg(long)]
    verbose: bool,
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    match s {
        "asc" => Ok(Direction::Asc),
        "desc" => Ok(Direction::Desc),
        _ => Err(format!("invalid order '{}', expected: asc or desc", s)),
    }
}

fn parse_sort_by(s: &str) -> Result<Vec<Dimension>, String> {
    s.split(',')
        .map(|d| Dimension::parse(d).ok_or_else(|| format!("invalid dimension '{}' in '{}'", d, s)))
        .collect()
}

fn parse_product(s: &str) -> Result<OrderRequestItem, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid product '{}', expected ID:qty", s));
    }
    let product_id = parts[0]
        .parse::<i64>()
        .map_err(|_| format!("invalid product id in '{}'", s))?;
    let quantity = parts[1]
        .parse::<i64>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    Ok(OrderRequestItem {
        product_id,
        quantity,
    })
}

fn print_by_size(resp: &OrderResponse, plank_size: i64) {
    for p in &resp.requested_products {
        println!(
            "{}: {} piece{} ({} distinct)",
            p.product,
            p.total_quantity,
            if p.total_quantity == 1 { "" } else { "s" },
            p.pieces
        );
    }
    println!();

    for gauge in &resp.order {
        println!(
            "Gauge {}x{}: {} plank{}",
            gauge.y,
            gauge.z,
            gauge.planks_needed,
            if gauge.planks_needed == 1 { "" } else { "s" },
        );
        for size in &gauge.details {
            println!("  {}x{}x{}  x{}", size.x, size.y, size.z, size.total_quantity);
            for d in &size.details {
                println!(
                    "      {} / {}: {} x {} = {}",
                    d.product, d.piece, d.quantity, d.product_quantity, d.total_quantity
                );
            }
        }
        if let Some(runs) = &gauge.planks {
            for run in runs {
                print!(
                    "  {:>6} x {}",
                    run.count,
                    render::render_plank(plank_size as u64, &run.plank)
                );
            }
        }
        println!();
    }

    let total: u64 = resp.order.iter().map(|g| g.planks_needed).sum();
    println!(
        "Summary: {} gauge{}, {} plank{}",
        resp.order.len(),
        if resp.order.len() == 1 { "" } else { "s" },
        total,
        if total == 1 { "" } else { "s" },
    );
}

fn print_by_product(rows: &[ProductBreakdown]) {
    for row in rows {
        println!("{}: {} pieces", row.product, row.total_quantity);
        for p in &row.pieces {
            println!(
                "  {:<20} {}x{}x{}  {} x {} = {}",
                p.piece, p.x, p.y, p.z, p.quantity, p.product_quantity, p.total_quantity
            );
        }
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let catalog = MemoryCatalog::load(&cli.catalog).unwrap_or_else(|e| fail(e));

    let sort_by = parse_sort_by(&cli.sort_by).unwrap_or_else(|e| fail(e));
    let request = OrderRequest {
        order: cli.order,
        sort_by,
        plank_size: cli.plank_size,
        kerf: cli.kerf,
        layout: cli.layout,
        products: cli.products,
    };

    if cli.group_by == "product" {
        let rows = calculate_order_by_product(&request, &catalog).unwrap_or_else(|e| fail(e));
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_else(|e| fail(e)));
        } else {
            print_by_product(&rows);
        }
        return;
    }

    let resp = calculate_order_by_size(&request, &catalog).unwrap_or_else(|e| fail(e));
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&resp).unwrap_or_else(|e| fail(e)));
    } else {
        print_by_size(&resp, request.plank_size);
    }
}
