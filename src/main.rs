use clap::Parser;
use cut_policy::episode::Episode;
use cut_policy::render;
use cut_policy::{ColumnGenerationPolicy, ProductDemand, Rect, StockSheet, Variant};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "cut_policy",
    about = "Greedy column-generation placement policy for 2D cutting stock"
)]
struct Cli {
    /// Stock sheet dimensions as WxH (e.g. 10x10 6x4)
    #[arg(long = "stock", num_args = 1.., required = true)]
    stocks: Vec<String>,

    /// Products as WxH:qty (e.g. 4x3:2 2x2:5)
    #[arg(long = "cuts", num_args = 1..)]
    cuts: Vec<String>,

    /// Policy variant: 1 (waste-minimizing) or 2 (first-fit)
    #[arg(long, default_value = "1", value_parser = parse_variant)]
    variant: Variant,

    /// Maximum number of decisions before stopping
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,

    /// Show ASCII layout of each used sheet
    #[arg(long)]
    layout: bool,

    /// Print the episode summary as JSON
    #[arg(long)]
    json: bool,

    /// Log every decision to stderr
    #[arg(long)]
    verbose: bool,
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    let id = s
        .parse::<u8>()
        .map_err(|_| format!("invalid variant '{}', expected 1 or 2", s))?;
    Variant::try_from(id).map_err(|e| e.to_string())
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let w = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(w, h))
}

fn parse_stock(s: &str) -> Result<StockSheet, String> {
    let r = parse_dimensions(s)?;
    StockSheet::try_new(r.w, r.h).map_err(|e| e.to_string())
}

fn parse_cut(s: &str) -> Result<ProductDemand, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid cut '{}', expected WxH:qty", s));
    }
    let size = parse_dimensions(parts[0])?;
    let quantity = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    Ok(ProductDemand::new(size, quantity))
}

fn exit_with(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let stocks: Vec<StockSheet> = cli
        .stocks
        .iter()
        .map(String::as_str)
        .map(parse_stock)
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| exit_with(e));

    let products: Vec<ProductDemand> = cli
        .cuts
        .iter()
        .map(String::as_str)
        .map(parse_cut)
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| exit_with(e));

    let mut policy = ColumnGenerationPolicy::new(cli.variant);
    let mut episode = Episode::new(stocks, products);
    let summary = episode
        .run(&mut policy, cli.max_steps)
        .unwrap_or_else(|e| exit_with(e));

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).unwrap_or_else(|e| exit_with(e));
        println!("{json}");
        return;
    }

    for (i, sheet) in episode.stocks().iter().enumerate() {
        let pieces: Vec<_> = summary
            .placements
            .iter()
            .filter(|p| p.stock_idx == i)
            .collect();
        if pieces.is_empty() && sheet.is_untouched() {
            continue;
        }
        println!("Stock {} ({}):", i, sheet.size());
        for p in pieces {
            println!("  {} @ {} [product {}]", p.size, p.position, p.product_idx);
        }
        if cli.layout {
            print!("{}", render::render_sheet(sheet));
        }
        println!();
    }

    println!(
        "Summary: {:?} after {} step{}, {} stock{} used, {} piece{} left, {:.1}% waste",
        summary.outcome,
        summary.steps,
        if summary.steps == 1 { "" } else { "s" },
        summary.used_stocks,
        if summary.used_stocks == 1 { "" } else { "s" },
        summary.remaining_pieces,
        if summary.remaining_pieces == 1 { "" } else { "s" },
        summary.waste_percent,
    );
}
