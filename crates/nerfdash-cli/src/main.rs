//! nerfdash CLI: the experiment analysis pipeline in the terminal.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use tracing_subscriber::EnvFilter;

use nerfdash_core::models::{CategoryKey, Field, FieldValue, MetricKey, TableRecord};
use nerfdash_core::{
    format, group_records, normalize, pivot, sort_records, store, DashError, PivotOptions,
    PrimaryFilter,
};
use nerfdash_server::{serve, ServerConfig};

#[derive(Parser)]
#[command(
    name = "nerfdash",
    about = "Analysis dashboard for scene-reconstruction experiments",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard server
    Serve {
        /// Path to the experiment data file
        #[arg(long, default_value = "data/experiments.json")]
        data: PathBuf,
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to
        #[arg(long, short, default_value_t = 8000)]
        port: u16,
    },
    /// Show the experiment table
    List {
        /// Path to the experiment data file
        #[arg(long, default_value = "data/experiments.json")]
        data: PathBuf,
        /// Comma-separated columns to show (default: a compact set)
        #[arg(long, short)]
        columns: Option<String>,
        /// Column to sort by
        #[arg(long, short)]
        sort: Option<String>,
        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page
        #[arg(long, default_value_t = 20)]
        per_page: usize,
    },
    /// Group records by a column and aggregate metrics
    Group {
        /// Path to the experiment data file
        #[arg(long, default_value = "data/experiments.json")]
        data: PathBuf,
        /// Column to group by (tag_obj / tag_esc expand to one group per tag)
        #[arg(long, short)]
        by: String,
        /// Comma-separated metrics to aggregate
        #[arg(long, short, default_value = "psnr,ssim,lpips")]
        metrics: String,
    },
    /// Cross-tabulate metric averages per category
    Pivot {
        /// Path to the experiment data file
        #[arg(long, default_value = "data/experiments.json")]
        data: PathBuf,
        /// Row/series key: model or preprocessor
        #[arg(long, short, default_value = "model")]
        by: String,
        /// Comma-separated metrics
        #[arg(long, short, default_value = "psnr,ssim,lpips")]
        metrics: String,
        /// Comma-separated categories (default: all five)
        #[arg(long, short)]
        categories: Option<String>,
        /// Average over exact-zero metric values too
        #[arg(long)]
        include_zero: bool,
    },
    /// Export the normalized table
    Export {
        /// Path to the experiment data file
        #[arg(long, default_value = "data/experiments.json")]
        data: PathBuf,
        /// Output format
        #[arg(long, short, default_value = "csv", value_parser = ["csv", "json"])]
        format: String,
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { data, host, port } => cmd_serve(data, host, port).await?,
        Commands::List {
            data,
            columns,
            sort,
            desc,
            page,
            per_page,
        } => cmd_list(data, columns, sort, desc, page, per_page)?,
        Commands::Group { data, by, metrics } => cmd_group(data, by, metrics)?,
        Commands::Pivot {
            data,
            by,
            metrics,
            categories,
            include_zero,
        } => cmd_pivot(data, by, metrics, categories, include_zero)?,
        Commands::Export {
            data,
            format,
            output,
        } => cmd_export(data, format, output)?,
    }

    Ok(())
}

// ─── Command implementations ──────────────────────────────────────────────────

async fn cmd_serve(data: PathBuf, host: String, port: u16) -> Result<()> {
    println!("nerfdash dashboard");
    println!("   Data: {}", data.display());
    println!("   URL:  http://{}:{}", host, port);
    println!();

    let config = ServerConfig {
        data_path: data,
        host,
        port,
    };
    serve(config).await?;
    Ok(())
}

fn cmd_list(
    data: PathBuf,
    columns: Option<String>,
    sort: Option<String>,
    desc: bool,
    page: usize,
    per_page: usize,
) -> Result<()> {
    let set = store::load_set(&data)?;
    let mut records = normalize(&set.items);

    if let Some(name) = sort {
        let column = parse_field(&name)?;
        sort_records(&mut records, column, !desc);
    }

    let columns = match columns {
        Some(names) => names
            .split(',')
            .map(|n| parse_field(n.trim()))
            .collect::<Result<Vec<_>>>()?,
        None => vec![
            Field::Id,
            Field::Title,
            Field::Dataset,
            Field::Model,
            Field::Preprocessor,
            Field::TagObj,
            Field::TagEsc,
            Field::Metric(MetricKey::Psnr),
            Field::Metric(MetricKey::Ssim),
            Field::Metric(MetricKey::Lpips),
            Field::DateAdded,
        ],
    };

    let total = records.len();
    let pages = total.div_ceil(per_page.max(1)).max(1);
    let page = page.clamp(1, pages);
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(columns.iter().map(|c| c.label()));
    for record in &records[start..end] {
        table.add_row(columns.iter().map(|&c| cell_text(record, c)));
    }

    println!("{table}");
    println!("Page {page}/{pages} ({total} experiments)");
    Ok(())
}

fn cmd_group(data: PathBuf, by: String, metrics: String) -> Result<()> {
    let set = store::load_set(&data)?;
    let records = normalize(&set.items);
    let group_by = parse_field(&by)?;
    let metrics = parse_metrics(&metrics)?;

    let groups = group_records(&records, group_by, &metrics);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let mut header = vec![group_by.label().to_string(), "Records".to_string()];
    header.extend(metrics.iter().map(|m| format!("{} avg (min/max)", m.label())));
    table.set_header(header);

    for group in &groups {
        let mut row = vec![group.key.clone(), group.len().to_string()];
        for metric in &metrics {
            let stats = &group.stats[metric];
            if stats.is_empty() {
                row.push("-".to_string());
            } else {
                row.push(format!(
                    "{} ({} / {})",
                    format::format_metric(*metric, stats.avg),
                    format::format_metric(*metric, stats.min),
                    format::format_metric(*metric, stats.max),
                ));
            }
        }
        table.add_row(row);
    }

    println!("Grouped by {} over {} experiments", group_by, records.len());
    println!("{table}");
    Ok(())
}

fn cmd_pivot(
    data: PathBuf,
    by: String,
    metrics: String,
    categories: Option<String>,
    include_zero: bool,
) -> Result<()> {
    let set = store::load_set(&data)?;
    let primary = PrimaryFilter::parse(&by)
        .ok_or_else(|| DashError::UnknownField(by.clone()))?;
    let metrics = parse_metrics(&metrics)?;
    let categories = match categories {
        Some(names) => names
            .split(',')
            .map(|n| {
                let n = n.trim();
                CategoryKey::parse(n).ok_or_else(|| DashError::UnknownCategory(n.to_string()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?,
        None => CategoryKey::ALL.to_vec(),
    };

    let summary = pivot(
        &set.items,
        &metrics,
        &categories,
        primary,
        PivotOptions { include_zero },
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let mut header = vec![primary.label().to_string(), "Metric".to_string()];
    for (category, count) in summary.table.categories.iter().zip(&summary.table.counts) {
        header.push(format!("{} ({count})", category.label()));
    }
    table.set_header(header);

    for row in &summary.table.rows {
        for (i, cells) in row.cells.iter().enumerate() {
            let label = if i == 0 { row.primary_value.as_str() } else { "" };
            let mut line = vec![label.to_string(), cells.metric.label().to_string()];
            line.extend(cells.cells.iter().cloned());
            table.add_row(line);
        }
    }

    println!("{table}");
    Ok(())
}

fn cmd_export(data: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let set = store::load_set(&data)?;
    let records = normalize(&set.items);

    let content = match format.as_str() {
        "json" => serde_json::to_string_pretty(&records)?,
        "csv" => {
            let columns: Vec<Field> = Field::all().collect();
            let mut out = columns
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(",")
                + "\n";
            for record in &records {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|&c| csv_cell(&record.key_of(c)))
                    .collect();
                out += &(cells.join(",") + "\n");
            }
            out
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &content)?;
            println!("Exported {} records to {}", records.len(), path.display());
        }
        None => print!("{content}"),
    }

    Ok(())
}

// ─── Rendering helpers ────────────────────────────────────────────────────────

fn parse_field(name: &str) -> Result<Field> {
    Ok(Field::parse(name).ok_or_else(|| DashError::UnknownField(name.to_string()))?)
}

fn parse_metrics(names: &str) -> Result<Vec<MetricKey>> {
    names
        .split(',')
        .map(|n| {
            let n = n.trim();
            Ok(MetricKey::parse(n).ok_or_else(|| DashError::UnknownMetric(n.to_string()))?)
        })
        .collect()
}

/// One table cell for a record column.
fn cell_text(record: &TableRecord, column: Field) -> String {
    match record.value_of(column) {
        FieldValue::Int(v) => v.to_string(),
        FieldValue::Text(v) => v.to_string(),
        FieldValue::Bool(v) => if v { "Yes" } else { "No" }.to_string(),
        FieldValue::Time(v) => format::format_date(&v),
        FieldValue::Num(v) => match (column, v) {
            (_, None) => "-".to_string(),
            (Field::Metric(m), Some(n)) => format::format_metric(m, n),
            (_, Some(n)) => format!("{n:.2}"),
        },
        FieldValue::Tags(tags) => tags
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Minimal CSV quoting; tag lists carry commas.
fn csv_cell(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
