use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tree_coloring_classes::artifact::{Alphabet, read_artifact, render};
use tree_coloring_classes::canonical::{CanonicalOracle, ForestOracle};
use tree_coloring_classes::colored::encode_uncolored;
use tree_coloring_classes::combinatorics::reciprocal_sum;
use tree_coloring_classes::config::EnumerationConfig;
use tree_coloring_classes::coloring::ColoringMode;
use tree_coloring_classes::driver::Driver;
use tree_coloring_classes::graph::Graph;
use tree_coloring_classes::moduli::ModuliSpace;
use tree_coloring_classes::partition::Partitioner;
use tree_coloring_classes::trees::FreeTrees;

/// Vertex colorings of trees up to tree automorphism
#[derive(Parser, Debug)]
#[command(name = "treecolor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one artifact per tree shape in a vertex range
    Enumerate {
        /// TOML file with enumeration settings; flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        min_vertices: Option<usize>,

        #[arg(long)]
        max_vertices: Option<usize>,

        /// Number of colors
        #[arg(short = 'k', long)]
        colors: Option<usize>,

        /// Only color adjacent vertices differently
        #[arg(long)]
        proper: bool,

        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Artifact file name prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Worker threads
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Also classify each shape's colorings in parallel
        #[arg(long)]
        parallel_colorings: bool,
    },

    /// Print the artifact of the tree with the given Prüfer fingerprint
    Classify {
        /// Prüfer sequence in artifact symbols; empty for the single edge
        #[arg(default_value = "")]
        fingerprint: String,

        #[arg(short = 'k', long, default_value_t = 3)]
        colors: usize,

        #[arg(long)]
        proper: bool,
    },

    /// Summarize an artifact file
    Inspect { path: PathBuf },

    /// Fixed loci of degree `d` stable maps from genus 0 curves to `P^n`
    Moduli {
        /// Dimension of the target projective space
        n: usize,
        /// Degree of the maps
        d: u32,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let alphabet = Alphabet::default();
    match cli.command {
        Command::Enumerate {
            config,
            min_vertices,
            max_vertices,
            colors,
            proper,
            output_dir,
            prefix,
            threads,
            parallel_colorings,
        } => {
            let mut settings = match &config {
                Some(path) => EnumerationConfig::from_toml_file(path)?,
                None => EnumerationConfig::default(),
            };
            if let Some(n) = min_vertices {
                settings.min_vertices = n;
            }
            if let Some(n) = max_vertices {
                settings.max_vertices = n;
            }
            if let Some(k) = colors {
                settings.colors = k;
            }
            if proper {
                settings.mode = ColoringMode::Proper;
            }
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            if let Some(prefix) = prefix {
                settings.file_prefix = prefix;
            }
            if threads.is_some() {
                settings.threads = threads;
            }
            settings.parallel_colorings |= parallel_colorings;

            let driver = Driver::new(ForestOracle, FreeTrees, settings, alphabet)
                .context("invalid enumeration settings")?;
            let report = driver.run().context("enumeration aborted")?;

            if !report.is_success() {
                for failure in &report.failed {
                    warn!(
                        vertices = failure.vertices,
                        index = failure.index,
                        "no artifact: {}",
                        failure.error
                    );
                }
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Classify {
            fingerprint,
            colors,
            proper,
        } => {
            let Some(code) = alphabet.decode(&fingerprint) else {
                bail!("'{fingerprint}' contains symbols outside the artifact alphabet");
            };
            let tree = Graph::from_prufer(&code).context("invalid fingerprint")?;
            let mode = if proper {
                ColoringMode::Proper
            } else {
                ColoringMode::Total
            };

            let classes = Partitioner::new(ForestOracle)
                .with_mode(mode)
                .classify(&tree, colors)?;
            print!("{}", render(&tree, classes.classes(), &alphabet)?);
        }

        Command::Inspect { path } => {
            let artifact = read_artifact(&path, &alphabet)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let tree = artifact.tree()?;
            let group = ForestOracle.automorphism_group_order(&encode_uncolored(&tree))?;

            let mut colorings: u128 = 0;
            for class in &artifact.classes {
                if class.automorphism_order == 0 || group % class.automorphism_order != 0 {
                    bail!(
                        "class {:?} has order {}, which does not divide |Aut(T)| = {group}",
                        class.representative.as_slice(),
                        class.automorphism_order
                    );
                }
                colorings += group / class.automorphism_order;
            }

            println!("vertices: {}", tree.num_vertices());
            println!("edges: {:?}", tree.edges());
            println!("automorphisms: {group}");
            println!("classes: {}", artifact.classes.len());
            println!("colorings: {colorings}");
        }

        Command::Moduli { n, d } => {
            let space = ModuliSpace::new(n, d);
            let classes = space.fixed_locus_classes(&ForestOracle)?;
            let Some((num, den)) =
                reciprocal_sum(classes.iter().map(|c| c.automorphism_order))
            else {
                bail!("sum of 1/|Aut| overflows");
            };

            info!(n, d, classes = classes.len(), "classified fixed loci");
            println!("dimension: {}", space.dim());
            println!("fixed points: {}", space.fixed_points());
            println!("fixed loci: {}", classes.total_members());
            println!("distinct fixed loci: {}", classes.len());
            println!("sum of 1/|Aut|: {num}/{den}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
