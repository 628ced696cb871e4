//! carcass CLI - cut lists for built-in bookcases
//!
//! Dimensions the carcass, packs the panels onto stock sheets and writes the
//! sheet diagrams and an OpenSCAD sketch.

use anyhow::{Context, Result};
use carcass::export::{dxf::DxfRenderer, scad, svg::SvgRenderer, write_sheets};
use carcass::{default_packer, dimension, pack_pieces, report, CabinetConfig, CarcassError, CutList};
use carcass_pack::PackError;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

mod logging;

#[derive(Parser)]
#[command(name = "carcass", version)]
#[command(about = "Cut list, sheet layout and OpenSCAD sketch for a bookcase carcass", long_about = None)]
#[command(after_help = "Exit status: 0 on success, 1 when the pieces do not all fit the stock \
(or on an I/O failure), 2 on a configuration error.")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dimension, pack and write all artifacts (default)
    Plan {
        #[command(flatten)]
        cabinet: CabinetArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the piece list and material estimate only
    Pieces {
        #[command(flatten)]
        cabinet: CabinetArgs,
    },
    /// Write the effective configuration as TOML
    InitConfig {
        /// Destination file
        path: PathBuf,
        #[command(flatten)]
        cabinet: CabinetArgs,
    },
}

/// Configuration sources: defaults, then `--config`, then individual flags.
#[derive(Args, Debug, Clone, Default)]
struct CabinetArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Outer width (mm)
    #[arg(long)]
    width: Option<f64>,
    /// Outer height (mm)
    #[arg(long)]
    height: Option<f64>,
    /// Depth (mm)
    #[arg(long)]
    depth: Option<f64>,
    /// Number of columns
    #[arg(long)]
    columns: Option<usize>,
    /// Shelves per column, comma separated (e.g. 5,4)
    #[arg(long, value_delimiter = ',')]
    shelves: Option<Vec<usize>>,
    /// Saw blade width (mm)
    #[arg(long)]
    kerf: Option<f64>,
    /// Sheet thickness (mm)
    #[arg(long)]
    thickness: Option<f64>,
    /// Keep every panel in its drawn orientation
    #[arg(long)]
    no_rotate: bool,
}

impl CabinetArgs {
    /// Merge the sources and validate the result.
    fn resolve(&self) -> carcass::Result<CabinetConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => CabinetConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(thickness) = self.thickness {
            config.sheet_thickness = thickness;
        }
        if let Some(shelves) = &self.shelves {
            config.number_shelves = shelves.clone();
            // --shelves alone implies the column count
            if self.columns.is_none() {
                config.number_columns = shelves.len();
            }
        }
        if let Some(columns) = self.columns {
            config.number_columns = columns;
        }
        if let Some(kerf) = self.kerf {
            config.packing.kerf = kerf;
        }
        if self.no_rotate {
            config.packing.allow_rotation = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> carcass::Result<CabinetConfig> {
    match CabinetConfig::load(path) {
        Err(CarcassError::Io(e)) => Err(CarcassError::InvalidConfig(format!(
            "cannot read {}: {e}",
            path.display()
        ))),
        other => other,
    }
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Directory for cabinet.scad, sheet diagrams and the JSON summary
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Also write sheet_N.dxf cut outlines
    #[arg(long)]
    dxf: bool,
    /// Also write cutlist.json
    #[arg(long)]
    json: bool,
}

impl Default for OutputArgs {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            dxf: false,
            json: false,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(command: Option<Commands>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Some(Commands::Plan { cabinet, output }) => plan(&cabinet.resolve()?, &output, &mut out),
        Some(Commands::Pieces { cabinet }) => {
            let pieces = dimension(&cabinet.resolve()?)?;
            report::write_piece_summary(&mut out, &pieces)?;
            Ok(())
        }
        Some(Commands::InitConfig { path, cabinet }) => {
            let config = cabinet.resolve()?;
            fs::write(&path, config.to_toml_string()?)
                .with_context(|| format!("writing {}", path.display()))?;
            writeln!(out, "Wrote configuration to {}", path.display())?;
            Ok(())
        }
        None => plan(
            &CabinetArgs::default().resolve()?,
            &OutputArgs::default(),
            &mut out,
        ),
    }
}

fn plan(config: &CabinetConfig, output: &OutputArgs, out: &mut impl Write) -> Result<()> {
    debug!(?config, "effective configuration");

    let pieces = dimension(config)?;
    report::write_piece_summary(out, &pieces)?;

    let packer = default_packer(&config.packing);
    let layout = pack_pieces(&pieces, &config.packing, &packer)?;
    report::write_layout(out, &layout)?;

    let dir = &output.out_dir;
    let mut written = write_sheets(&layout, &SvgRenderer::default(), dir)
        .with_context(|| format!("writing SVG sheets to {}", dir.display()))?;
    if output.dxf {
        written.extend(
            write_sheets(&layout, &DxfRenderer::default(), dir)
                .with_context(|| format!("writing DXF sheets to {}", dir.display()))?,
        );
    }
    if output.json {
        let path = dir.join("cutlist.json");
        let json = CutList::new(config, &pieces, &layout).to_json()?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }

    let scad_path = dir.join("cabinet.scad");
    scad::write_openscad(&pieces, config.width, config.height, &scad_path)
        .with_context(|| format!("writing {}", scad_path.display()))?;
    written.push(scad_path);

    info!(files = written.len(), dir = %dir.display(), "plan complete");
    for path in &written {
        writeln!(out, "Wrote {}", path.display())?;
    }
    Ok(())
}

/// 2 for configuration problems, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CarcassError>() {
            return match e {
                CarcassError::InvalidConfig(_) | CarcassError::ConfigParse(_) => 2,
                _ => 1,
            };
        }
        if cause.downcast_ref::<PackError>().is_some() {
            return 1;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("carcass").chain(args.iter().copied())).unwrap()
    }

    fn cabinet_of(cli: Cli) -> CabinetArgs {
        match cli.command {
            Some(Commands::Plan { cabinet, .. })
            | Some(Commands::Pieces { cabinet })
            | Some(Commands::InitConfig { cabinet, .. }) => cabinet,
            None => CabinetArgs::default(),
        }
    }

    #[test]
    fn test_help_documents_exit_status() {
        use clap::CommandFactory;

        let help = Cli::command().render_help().to_string();
        assert!(help.contains("Exit status"));
        assert!(help.contains("2 on a configuration error"));
    }

    #[test]
    fn test_no_subcommand_uses_defaults() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cabinet_of(cli).resolve().unwrap(), CabinetConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = parse(&[
            "plan", "--width", "960", "--height", "960", "--depth", "350", "--shelves",
            "6,6,6,6,6", "--kerf", "4", "--no-rotate", "--dxf",
        ]);
        let config = cabinet_of(cli).resolve().unwrap();

        assert_eq!(config.width, 960.0);
        assert_eq!(config.depth, 350.0);
        assert_eq!(config.number_columns, 5);
        assert_eq!(config.number_shelves, vec![6; 5]);
        assert_eq!(config.packing.kerf, 4.0);
        assert!(!config.packing.allow_rotation);
        assert_eq!(config.sheet_thickness, 18.0);
    }

    #[test]
    fn test_plan_output_args() {
        let cli = parse(&["plan", "--out-dir", "build", "--json"]);
        match cli.command {
            Some(Commands::Plan { output, .. }) => {
                assert_eq!(output.out_dir, PathBuf::from("build"));
                assert!(output.json);
                assert!(!output.dxf);
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn test_mismatched_columns_is_config_error() {
        let cli = parse(&["pieces", "--columns", "3"]);
        let err = anyhow::Error::from(cabinet_of(cli).resolve().unwrap_err());
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_config_file_then_flags() {
        let path = std::env::temp_dir().join("carcass_cli_test_config.toml");
        fs::write(&path, "width = 900.0\nheight = 2000.0\n").unwrap();

        let cli = parse(&["pieces", "--config", path.to_str().unwrap(), "--height", "1800"]);
        let config = cabinet_of(cli).resolve().unwrap();
        assert_eq!(config.width, 900.0);
        assert_eq!(config.height, 1800.0);
        assert_eq!(config.number_shelves, vec![5, 4]);
    }

    #[test]
    fn test_overflowing_shelves_flag_is_config_error() {
        let cli = parse(&["pieces", "--shelves", "18446744073709551615,1"]);
        let err = anyhow::Error::from(cabinet_of(cli).resolve().unwrap_err());
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let cli = parse(&["pieces", "--config", "/nonexistent/carcass.toml"]);
        let err = anyhow::Error::from(cabinet_of(cli).resolve().unwrap_err());
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_exit_codes() {
        let incomplete = anyhow::Error::from(PackError::Incomplete {
            placed: 30,
            required: 38,
            unplaced: vec![],
        });
        assert_eq!(exit_code(&incomplete), 1);
        assert_eq!(
            format!("{incomplete:#}"),
            "30 rectangles packed, but 38 required"
        );

        let parse_err = CabinetConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert_eq!(exit_code(&anyhow::Error::from(parse_err).context("loading")), 2);

        let io = anyhow::Error::from(CarcassError::Io(io::Error::other("disk full")));
        assert_eq!(exit_code(&io), 1);
    }

    #[test]
    fn test_plan_writes_artifacts() {
        let dir = std::env::temp_dir().join("carcass_cli_test_plan");
        let _ = fs::remove_dir_all(&dir);
        let output = OutputArgs {
            out_dir: dir.clone(),
            dxf: true,
            json: true,
        };

        let mut out = Vec::new();
        plan(&CabinetConfig::default(), &output, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Total packed rectangles: 14"));
        assert!(dir.join("cabinet.scad").exists());
        assert!(dir.join("cutlist.json").exists());
        for n in 1..=7 {
            assert!(dir.join(format!("sheet_{n}.svg")).exists());
            assert!(dir.join(format!("sheet_{n}.dxf")).exists());
        }
    }

    #[test]
    fn test_incomplete_plan_writes_nothing() {
        let dir = std::env::temp_dir().join("carcass_cli_test_incomplete");
        let _ = fs::remove_dir_all(&dir);
        let mut config = CabinetConfig::default();
        config.packing.stock[0].count = 2;

        let output = OutputArgs {
            out_dir: dir.clone(),
            ..OutputArgs::default()
        };
        let err = plan(&config, &output, &mut Vec::new()).unwrap_err();

        assert_eq!(exit_code(&err), 1);
        assert!(format!("{err}").ends_with("rectangles packed, but 14 required"));
        assert!(!dir.exists());
    }
}
