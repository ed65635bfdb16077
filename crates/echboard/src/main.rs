//! echboard - Epichlorohydrin scenario simulation dashboard

mod cli;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use echboard_core::export::{default_filename, write_csv};
use echboard_core::results::{load_result_graceful, save_result};
use echboard_core::table::SortSpec;
use echboard_core::{ApiClient, DashboardConfig, DashboardView, LoadReport};
use echboard_types::{ScenarioCatalog, SimulationResult};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "echboard",
    version,
    about = "Scenario-driven ECH price simulation dashboard",
    long_about = "Runs price scenarios for epichlorohydrin (ECH) against the simulation API and\n\
                  presents the result as aligned history, forecast and regional comparison tables.\n\
                  \n\
                  Regions: us_ech, eu_ech, asia_ech, china_ech (short forms: us, eu, asia, china)\n\
                  \n\
                  Examples:\n\
                    echboard scenarios                          # List scenarios\n\
                    echboard scenarios --category supply        # Filter by category\n\
                    echboard info 3                             # Scenario definition\n\
                    echboard simulate 3 -p duration_months=24   # Run with an override\n\
                    echboard simulate 3 --save run.json         # Keep the raw result\n\
                    echboard show run.json --table forecast     # Re-render a saved result\n\
                    echboard show run.json --sort us:change --desc -r us -r eu\n\
                    echboard export run.json --table comparison -o cmp.csv\n\
                    echboard compare 1 3 6 -r eu                # Scenarios side by side\n\
                    echboard sensitivity 3 -p capacity_loss --values 0.1,0.2,0.3\n\
                    echboard baseline                           # Historical dataset\n\
                  \n\
                  Environment Variables:\n\
                    ECHBOARD_API_URL                 # Simulation API base URL\n\
                    ECHBOARD_CONFIG_DIR              # Override config directory\n\
                    ECHBOARD_NO_FORECAST             # Hide the forecast horizon\n\
                    ECHBOARD_NO_COLOR                # Disable ANSI colors (log-friendly)\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Simulation API base URL (default: from config, http://localhost:5000)
    #[arg(long, env = "ECHBOARD_API_URL", global = true)]
    api_url: Option<String>,

    /// Config directory (default: <config_dir>/echboard)
    #[arg(long, env = "ECHBOARD_CONFIG_DIR", global = true)]
    config_dir: Option<PathBuf>,

    /// Hide the forecast horizon
    #[arg(long, env = "ECHBOARD_NO_FORECAST", global = true)]
    no_forecast: bool,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "ECHBOARD_NO_COLOR", global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List available scenarios
    Scenarios {
        /// Only scenarios in this category
        #[arg(long, short = 'c')]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List scenario categories with counts
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a scenario definition
    Info {
        scenario_id: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a simulation and render the result
    Simulate {
        scenario_id: u32,
        /// Parameter override (repeatable)
        #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
        params: Vec<String>,
        /// Save the raw result as JSON
        #[arg(long)]
        save: Option<PathBuf>,
        /// Print the raw result as JSON instead of tables
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Simulate up to 5 scenarios side by side
    Compare {
        #[arg(required = true, num_args = 1..)]
        scenario_ids: Vec<u32>,
        /// Restrict to regions (repeatable)
        #[arg(long = "region", short = 'r')]
        regions: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-run a scenario across several values of one parameter
    Sensitivity {
        scenario_id: u32,
        /// Parameter to vary
        #[arg(long, short = 'p')]
        param: String,
        /// Values to test, comma-separated
        #[arg(long, required = true, value_delimiter = ',', allow_negative_numbers = true)]
        values: Vec<f64>,
        /// Restrict to regions (repeatable)
        #[arg(long = "region", short = 'r')]
        regions: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize the historical dataset
    Baseline {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a saved simulation result
    Show {
        file: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Export a table of a saved simulation result as CSV
    Export {
        file: PathBuf,
        /// Table to export
        #[arg(long, value_enum, default_value_t = TableKind::Data)]
        table: TableKind,
        /// Output path (default: <table>-YYYYMMDD-HHMMSS.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Restrict to regions (repeatable)
        #[arg(long = "region", short = 'r')]
        regions: Vec<String>,
    },
    /// Show or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum ConfigAction {
    /// Print the effective configuration (default)
    Show,
    /// Write the effective configuration to disk
    Init,
    /// Print the configuration file path
    Path,
}

#[derive(Args)]
struct ViewArgs {
    /// Table to render
    #[arg(long, value_enum, default_value_t = TableKind::Data)]
    table: TableKind,
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    page: usize,
    /// Sort key: date | REGION:KIND for data/forecast, or a comparison column
    #[arg(long)]
    sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    desc: bool,
    /// Restrict to regions (repeatable)
    #[arg(long = "region", short = 'r')]
    regions: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
enum TableKind {
    Data,
    Forecast,
    Comparison,
}

impl Command {
    fn requires_valid_config(&self) -> bool {
        !matches!(self, Command::Config { .. })
    }
}

impl TableKind {
    fn file_stem(self) -> &'static str {
        match self {
            TableKind::Data => "data-table",
            TableKind::Forecast => "forecast-table",
            TableKind::Comparison => "comparison-table",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_dir = match cli.config_dir.clone() {
        Some(dir) => dir,
        None => DashboardConfig::default_dir().context("Could not determine config directory")?,
    };

    let mut config = DashboardConfig::load(&config_dir);
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if cli.no_forecast {
        config.forecast_enabled = false;
    }
    // `config show/path` must still work on a broken config file
    if cli.command.requires_valid_config() {
        config.validate().context("Invalid configuration")?;
    }
    tracing::debug!(
        "Config dir {}, API {}, forecast {}",
        config_dir.display(),
        config.api_base_url,
        config.forecast_enabled
    );

    let no_color = cli.no_color;

    match cli.command {
        Command::Scenarios { category, json } => {
            run_scenarios(&config, category, json, no_color).await?;
        }
        Command::Categories { json } => {
            let client = ApiClient::from_config(&config)?;
            let categories = client.categories().await?;
            println!("{}", cli::format_categories(&categories, json, no_color));
        }
        Command::Info { scenario_id, json } => {
            let client = ApiClient::from_config(&config)?;
            let scenario = client.scenario(scenario_id).await?;
            println!("{}", cli::format_scenario_info(&scenario, json));
        }
        Command::Simulate {
            scenario_id,
            params,
            save,
            json,
            view,
        } => {
            run_simulate(&config, scenario_id, &params, save.as_deref(), json, &view, no_color)
                .await?;
        }
        Command::Compare {
            scenario_ids,
            regions,
            json,
        } => {
            let regions = cli::parse_regions(&regions)?;
            let client = ApiClient::from_config(&config)?;
            let comparison = client
                .compare(&scenario_ids)
                .await
                .with_context(|| format!("Failed to compare scenarios on {}", client.base_url()))?;
            println!(
                "{}",
                cli::format_scenario_comparison(&comparison, &regions, json, no_color)
            );
        }
        Command::Sensitivity {
            scenario_id,
            param,
            values,
            regions,
            json,
        } => {
            let regions = cli::parse_regions(&regions)?;
            let client = ApiClient::from_config(&config)?;
            let analysis = client
                .sensitivity(scenario_id, &param, values)
                .await
                .with_context(|| format!("Sensitivity analysis of scenario {} failed", scenario_id))?;
            println!("{}", cli::format_sensitivity(&analysis, &regions, json, no_color));
        }
        Command::Baseline { json } => {
            let client = ApiClient::from_config(&config)?;
            let baseline = client.baseline().await?;
            println!("{}", cli::format_baseline(&baseline, json, no_color));
        }
        Command::Show { file, view } => {
            run_show(&config, &file, &view, no_color).await?;
        }
        Command::Export {
            file,
            table,
            output,
            regions,
        } => {
            run_export(&config, &file, table, output, &regions).await?;
        }
        Command::Config { action } => {
            run_config(&config, &config_dir, action.unwrap_or(ConfigAction::Show))?;
        }
    }

    Ok(())
}

async fn run_scenarios(
    config: &DashboardConfig,
    category: Option<String>,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let catalog = client
        .list_scenarios(category.as_deref())
        .await
        .with_context(|| format!("Failed to list scenarios from {}", client.base_url()))?;

    println!("{}", cli::format_scenarios(&catalog, json, no_color));
    Ok(())
}

async fn run_simulate(
    config: &DashboardConfig,
    scenario_id: u32,
    params: &[String],
    save: Option<&Path>,
    json: bool,
    args: &ViewArgs,
    no_color: bool,
) -> Result<()> {
    let overrides = cli::parse_params(params)?;
    let client = ApiClient::from_config(config)?;

    let mut view = DashboardView::new(config.clone());
    if !overrides.is_empty() {
        let scenario = client.scenario(scenario_id).await?;
        view.set_catalog(ScenarioCatalog {
            count: 1,
            scenarios: vec![scenario],
        });
    }
    view.select_scenario(scenario_id);

    for (name, value) in &overrides {
        if !view.set_override(name, *value) {
            let known = view
                .selected_scenario()
                .map(|s| s.parameters.keys().cloned().collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            return Err(cli::CliError::UnknownParam {
                name: name.clone(),
                scenario_id,
                known,
            }
            .into());
        }
    }

    view.begin_simulation();
    let outcome = client.simulate(scenario_id, view.overrides().clone()).await;
    view.finish_simulation(outcome);

    let result = match view.state() {
        echboard_core::SimulationState::Ready(result) => result.clone(),
        echboard_core::SimulationState::Failed(message) => {
            anyhow::bail!("Simulation of scenario {} failed: {}", scenario_id, message)
        }
        _ => anyhow::bail!("Simulation of scenario {} did not complete", scenario_id),
    };

    if let Some(path) = save {
        save_result(&result, path).await?;
        eprintln!("Saved result to {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(result.as_ref())?);
        return Ok(());
    }

    render(&mut view, args, no_color)
}

/// Load a saved result, printing a hint for the common failure modes
async fn load_saved(file: &Path) -> Result<SimulationResult> {
    let mut report = LoadReport::new();
    match load_result_graceful(file, &mut report).await {
        Some(result) => Ok(result),
        None => {
            for error in &report.errors {
                eprintln!("{}", error.message);
                if let Some(suggestion) = &error.suggestion {
                    eprintln!("  hint: {}", suggestion);
                }
            }
            anyhow::bail!("Could not load simulation result {}", file.display())
        }
    }
}

async fn run_show(
    config: &DashboardConfig,
    file: &Path,
    args: &ViewArgs,
    no_color: bool,
) -> Result<()> {
    let result = load_saved(file).await?;
    let mut view = DashboardView::new(config.clone());
    view.set_result(result);
    render(&mut view, args, no_color)
}

/// Print header, validation warnings and the requested table
fn render(view: &mut DashboardView, args: &ViewArgs, no_color: bool) -> Result<()> {
    let regions = cli::parse_regions(&args.regions)?;
    cli::apply_region_filter(view, &regions);

    let Some(result) = view.result().cloned() else {
        println!("No data available.");
        return Ok(());
    };

    let merged = view.merged();
    println!("{}", cli::format_result_header(&result, &merged));
    println!();

    let direction = cli::direction(args.desc);
    let output = match args.table {
        TableKind::Data | TableKind::Forecast => {
            let key = match &args.sort {
                Some(sort) => cli::parse_column_sort(sort)?,
                None => echboard_core::SortKey::Date,
            };
            let sort = SortSpec::new(key, direction);
            let table = if args.table == TableKind::Data {
                view.data_table(sort, args.page)
            } else {
                view.forecast_table(sort, args.page)
            };
            cli::format_record_table(&table, no_color)
        }
        TableKind::Comparison => {
            let key = match &args.sort {
                Some(sort) => cli::parse_comparison_sort(sort)?,
                None => echboard_core::SortKey::Date,
            };
            cli::format_comparison_table(&view.comparison_table(SortSpec::new(key, direction)), no_color)
        }
    };
    println!("{}", output);

    if let Some(summary) = view.degraded_state().as_ref().and_then(cli::format_degraded) {
        eprintln!();
        eprintln!("{}", summary);
    }
    if let Some(report) = view.report().as_ref().and_then(cli::format_report) {
        eprintln!("{}", report);
    }

    Ok(())
}

async fn run_export(
    config: &DashboardConfig,
    file: &Path,
    table: TableKind,
    output: Option<PathBuf>,
    regions: &[String],
) -> Result<()> {
    let result = load_saved(file).await?;
    let mut view = DashboardView::new(config.clone());
    view.set_result(result);
    cli::apply_region_filter(&mut view, &cli::parse_regions(regions)?);

    let csv = match table {
        TableKind::Data => view.export_data_csv(),
        TableKind::Forecast => view.export_forecast_csv(),
        TableKind::Comparison => view.export_comparison_csv(),
    };

    let path = output
        .unwrap_or_else(|| PathBuf::from(default_filename(table.file_stem(), chrono::Utc::now())));
    write_csv(&csv, &path)?;

    println!("Exported {} rows to {}", csv.lines().count().saturating_sub(1), path.display());
    Ok(())
}

fn run_config(config: &DashboardConfig, config_dir: &Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigAction::Init => {
            config.validate().context("Refusing to write an invalid configuration")?;
            config.save(config_dir)?;
            println!("Wrote {}", DashboardConfig::path(config_dir).display());
        }
        ConfigAction::Path => {
            println!("{}", DashboardConfig::path(config_dir).display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_commands_skip_validation() {
        let cli = Cli::try_parse_from(["echboard", "config", "show"]).unwrap();
        assert!(!cli.command.requires_valid_config());

        let cli = Cli::try_parse_from(["echboard", "config"]).unwrap();
        assert!(!cli.command.requires_valid_config());

        let cli = Cli::try_parse_from(["echboard", "show", "run.json"]).unwrap();
        assert!(cli.command.requires_valid_config());
    }

    #[test]
    fn test_invalid_page_size_blocks_only_data_commands() {
        let config = DashboardConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let cli = Cli::try_parse_from(["echboard", "config", "path"]).unwrap();
        assert!(!cli.command.requires_valid_config());
    }

    #[test]
    fn test_compare_takes_scenario_ids() {
        let cli = Cli::try_parse_from(["echboard", "compare", "1", "6", "-r", "eu"]).unwrap();
        match cli.command {
            Command::Compare {
                scenario_ids,
                regions,
                ..
            } => {
                assert_eq!(scenario_ids, vec![1, 6]);
                assert_eq!(regions, vec!["eu".to_string()]);
            }
            _ => panic!("expected compare"),
        }

        assert!(Cli::try_parse_from(["echboard", "compare"]).is_err());
    }

    #[test]
    fn test_sensitivity_values_split_on_commas() {
        let cli = Cli::try_parse_from([
            "echboard",
            "sensitivity",
            "5",
            "--param",
            "capacity_loss",
            "--values",
            "0.1,0.2,-0.5",
        ])
        .unwrap();
        match cli.command {
            Command::Sensitivity {
                scenario_id,
                param,
                values,
                ..
            } => {
                assert_eq!(scenario_id, 5);
                assert_eq!(param, "capacity_loss");
                assert_eq!(values, vec![0.1, 0.2, -0.5]);
            }
            _ => panic!("expected sensitivity"),
        }

        assert!(Cli::try_parse_from(["echboard", "sensitivity", "5", "--param", "x"]).is_err());
        assert!(Cli::try_parse_from(["echboard", "sensitivity", "5", "-p", "x", "--values", "a"]).is_err());
    }
}
