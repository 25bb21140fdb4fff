//! cellsnap CLI - snap UV islands of OBJ meshes to a grid.
//!
//! Usage: cellsnap [OPTIONS] <COMMAND>
//!
//! Run `cellsnap --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cellsnap::algo::grid::{island_bounds, Direction, Grid};
use cellsnap::algo::island::{find_islands, IslandOptions, DEFAULT_EPSILON};
use cellsnap::config::GridConfig;
use cellsnap::io::{self, ObjOptions};
use cellsnap::mesh::{PolyMesh, UvMesh};
use cellsnap::ops::{self, OperatorStatus, Reporter};

#[derive(Parser)]
#[command(name = "cellsnap")]
#[command(author, version, about = "Snap UV islands to grid cells", long_about = None)]
struct Cli {
    /// Configuration file (TOML with uv_channel, grid_columns, grid_rows)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// UV channel to operate on (overrides the config file)
    #[arg(long, global = true)]
    channel: Option<String>,

    /// Number of grid columns (overrides the config file)
    #[arg(long, global = true)]
    columns: Option<u32>,

    /// Number of grid rows (overrides the config file)
    #[arg(long, global = true)]
    rows: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Center selected UV islands on a grid cell
    Snap {
        /// Input OBJ file
        input: PathBuf,

        /// Output OBJ file
        output: PathBuf,

        /// Target cell index, counted row by row from the top left (see `cellsnap grid`)
        #[arg(short, long)]
        cell: usize,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Move selected UV islands by one grid cell
    Offset {
        /// Input OBJ file
        input: PathBuf,

        /// Output OBJ file
        output: PathBuf,

        /// Direction to move in
        #[arg(short, long, value_enum)]
        direction: DirectionArg,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// List the UV islands of the selection
    Islands {
        /// Input OBJ file
        input: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Print the grid cell layout
    Grid,
}

#[derive(Args)]
struct SelectionArgs {
    /// Only operate on these objects (default: all objects)
    #[arg(short, long = "object")]
    objects: Vec<String>,

    /// Only select faces in these groups (default: all faces)
    #[arg(short, long = "group")]
    groups: Vec<String>,

    /// UV distance below which two corners count as shared
    #[arg(short, long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    /// Towards v = 1
    Up,
    /// Towards v = 0
    Down,
    /// Towards u = 0
    Left,
    /// Towards u = 1
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
            DirectionArg::Left => Direction::Left,
            DirectionArg::Right => Direction::Right,
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cellsnap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Snap {
            input,
            output,
            cell,
            selection,
        } => {
            let operation = ops::Operation::Snap { cell_index: cell };
            cmd_transform(&input, &output, &config, &selection, operation)
        }

        Commands::Offset {
            input,
            output,
            direction,
            selection,
        } => {
            let operation = ops::Operation::Offset {
                direction: direction.into(),
            };
            cmd_transform(&input, &output, &config, &selection, operation)
        }

        Commands::Islands { input, selection } => cmd_islands(&input, &config, &selection),

        Commands::Grid => cmd_grid(&config),
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<GridConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };
    if let Some(channel) = &cli.channel {
        config.uv_channel = channel.clone();
    }
    if let Some(columns) = cli.columns {
        config.grid_columns = columns;
    }
    if let Some(rows) = cli.rows {
        config.grid_rows = rows;
    }
    config.validate()?;
    debug!(?config, "configuration");
    Ok(config)
}

/// Load the meshes and apply the object and group selection.
///
/// Returns all meshes plus a flag per mesh telling whether it is selected.
fn load_selection(
    input: &Path,
    config: &GridConfig,
    selection: &SelectionArgs,
) -> Result<(Vec<PolyMesh>, Vec<bool>), Box<dyn std::error::Error>> {
    let options = ObjOptions::default().with_uv_channel(config.uv_channel.clone());
    let mut meshes = io::load(input, &options)?;
    info!("Loaded {}: {} object(s)", input.display(), meshes.len());

    let selected: Vec<bool> = meshes
        .iter()
        .map(|m| selection.objects.is_empty() || selection.objects.iter().any(|o| o == m.name()))
        .collect();
    for object in &selection.objects {
        if !meshes.iter().any(|m| m.name() == object) {
            warn!("object '{}' not found in {}", object, input.display());
        }
    }

    if !selection.groups.is_empty() {
        for (mesh, _) in meshes.iter_mut().zip(&selected).filter(|(_, &s)| s) {
            mesh.deselect_all();
            for group in &selection.groups {
                let count = mesh.select_group(group);
                debug!(mesh = mesh.name(), group = %group, faces = count, "selected group");
            }
        }
    }

    Ok((meshes, selected))
}

fn cmd_transform(
    input: &Path,
    output: &Path,
    config: &GridConfig,
    selection: &SelectionArgs,
    operation: ops::Operation,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut meshes, selected) = load_selection(input, config, selection)?;
    let options = IslandOptions::default().with_epsilon(selection.epsilon);
    let reporter = Reporter::new(|severity, message| eprintln!("{}: {}", severity, message));

    let start = Instant::now();
    let targets = meshes
        .iter_mut()
        .zip(&selected)
        .filter(|(_, &s)| s)
        .map(|(m, _)| m);
    let outcome = ops::run(targets, operation, config, &options, &reporter);
    let elapsed = start.elapsed();

    if outcome.status == OperatorStatus::Cancelled {
        return Err("operation cancelled, nothing was written".into());
    }

    io::save(&meshes, output, &config.uv_channel)?;
    println!(
        "Moved {} island(s); saved: {} ({:.2?})",
        outcome.islands_moved(),
        output.display(),
        elapsed
    );
    Ok(())
}

fn cmd_islands(
    input: &Path,
    config: &GridConfig,
    selection: &SelectionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (meshes, selected) = load_selection(input, config, selection)?;
    let options = IslandOptions::default().with_epsilon(selection.epsilon);
    let grid = config.grid()?;

    for (mesh, _) in meshes.iter().zip(&selected).filter(|(_, &s)| s) {
        let islands = match find_islands(mesh, &config.uv_channel, &options) {
            Ok(islands) => islands,
            Err(e) => {
                println!("{}: {}", mesh.name(), e);
                continue;
            }
        };
        println!(
            "{}: {} island(s) from {} selected face(s)",
            mesh.name(),
            islands.len(),
            mesh.selected_faces().count()
        );

        let Some(channel) = mesh.find_channel(&config.uv_channel) else {
            continue;
        };
        for (i, island) in islands.iter().enumerate() {
            let Some(bounds) = island_bounds(mesh, channel, island) else {
                continue;
            };
            let center = bounds.center();
            let cell = grid
                .cell_at(center)
                .map_or_else(|| "outside".to_string(), |c| c.to_string());
            println!(
                "  #{:<3} faces={:<5} min=({:.4}, {:.4}) max=({:.4}, {:.4}) \
                 center=({:.4}, {:.4}) cell={}",
                i,
                island.num_faces(),
                bounds.min.x,
                bounds.min.y,
                bounds.max.x,
                bounds.max.y,
                center.x,
                center.y,
                cell
            );
        }
    }
    Ok(())
}

fn cmd_grid(config: &GridConfig) -> Result<(), Box<dyn std::error::Error>> {
    let grid: Grid = config.grid()?;
    println!(
        "{} x {} grid on channel '{}' (row 0 at the top of UV space)",
        grid.columns(),
        grid.rows(),
        config.uv_channel
    );

    let width = grid.cell_count().saturating_sub(1).to_string().len();
    for row in 0..grid.rows() as usize {
        let labels: Vec<String> = (0..grid.columns() as usize)
            .map(|column| format!("[{:>w$}]", row * grid.columns() as usize + column, w = width))
            .collect();
        println!("{}", labels.join(" "));
    }

    let arrows: Vec<&str> = Direction::ALL.iter().map(|d| d.as_str()).collect();
    println!("offset directions: {}", arrows.join(", "));
    Ok(())
}
