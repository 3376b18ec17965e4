//! Enumeration over every tree shape in a vertex range.
//!
//! Shapes are independent: each is classified and written on its own, in parallel on a rayon
//! pool, and a failing shape is logged and reported without stopping the others.
use std::fs;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{error, info};

use crate::artifact::{Alphabet, artifact_name, write_artifact};
use crate::canonical::CanonicalOracle;
use crate::config::EnumerationConfig;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::partition::Partitioner;
use crate::trees::TreeSource;

/// A shape whose artifact could not be produced.
#[derive(Debug)]
pub struct ShapeFailure {
    pub vertices: usize,
    /// Position of the shape among the trees the source gave for `vertices`.
    pub index: usize,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<ShapeFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Driver<O, S> {
    partitioner: Partitioner<O>,
    trees: S,
    config: EnumerationConfig,
    alphabet: Alphabet,
}

impl<O, S> Driver<O, S>
where
    O: CanonicalOracle + Sync,
    S: TreeSource + Sync,
{
    /// Fails if `config` does not validate against `alphabet`.
    pub fn new(
        oracle: O,
        trees: S,
        config: EnumerationConfig,
        alphabet: Alphabet,
    ) -> Result<Self> {
        config.validate(&alphabet)?;
        Ok(Driver {
            partitioner: Partitioner::new(oracle).with_mode(config.mode),
            trees,
            config,
            alphabet,
        })
    }

    pub fn config(&self) -> &EnumerationConfig {
        &self.config
    }

    /// Write one artifact per shape. Only a missing output directory or a thread pool that
    /// cannot be built abort the run; per-shape failures land in the report.
    pub fn run(&self) -> Result<RunReport> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| Error::Io {
            path: output_dir.clone(),
            source,
        })?;

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        let shapes: Vec<(usize, usize, Graph)> = (self.config.min_vertices
            ..=self.config.max_vertices)
            .flat_map(|n| {
                self.trees
                    .trees_with_n_vertices(n)
                    .into_iter()
                    .enumerate()
                    .map(move |(i, tree)| (n, i, tree))
            })
            .collect();

        info!(
            shapes = shapes.len(),
            colors = self.config.colors,
            output_dir = %output_dir.display(),
            "enumerating colorings"
        );

        let outcomes: Vec<(usize, usize, Result<PathBuf>)> = pool.install(|| {
            shapes
                .par_iter()
                .map(|(n, i, tree)| (*n, *i, self.process_shape(tree)))
                .collect()
        });

        let mut report = RunReport::default();
        for (vertices, index, outcome) in outcomes {
            match outcome {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    error!(vertices, index, error = %e, "shape failed");
                    report.failed.push(ShapeFailure {
                        vertices,
                        index,
                        error: e,
                    });
                }
            }
        }

        info!(
            written = report.written.len(),
            failed = report.failed.len(),
            "enumeration finished"
        );
        Ok(report)
    }

    /// Classify the colorings of one tree and write its artifact.
    pub fn process_shape(&self, tree: &Graph) -> Result<PathBuf> {
        let name = artifact_name(
            &self.config.file_prefix,
            self.config.colors,
            tree,
            &self.alphabet,
        )?;
        let path = self.config.output_dir.join(name);

        let classes = if self.config.parallel_colorings {
            self.partitioner.classify_par(tree, self.config.colors)?
        } else {
            self.partitioner.classify(tree, self.config.colors)?
        };

        write_artifact(&path, tree, classes.classes(), &self.alphabet)?;
        info!(
            vertices = tree.num_vertices(),
            classes = classes.len(),
            path = %path.display(),
            "wrote shape"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::read_artifact;
    use crate::canonical::ForestOracle;
    use crate::coloring::ColoringMode;
    use crate::trees::FreeTrees;
    use tempfile::TempDir;

    /// Hands out a fixed list of graphs for every vertex count they have.
    struct Listed(Vec<Graph>);

    impl TreeSource for Listed {
        fn trees_with_n_vertices(&self, vertices: usize) -> Vec<Graph> {
            self.0
                .iter()
                .filter(|g| g.num_vertices() == vertices)
                .cloned()
                .collect()
        }
    }

    fn config(dir: &TempDir) -> EnumerationConfig {
        EnumerationConfig {
            min_vertices: 2,
            max_vertices: 4,
            colors: 2,
            output_dir: dir.path().to_path_buf(),
            threads: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_writes_one_artifact_per_shape() {
        let dir = TempDir::new().unwrap();
        let driver =
            Driver::new(ForestOracle, FreeTrees, config(&dir), Alphabet::default()).unwrap();

        let report = driver.run().unwrap();
        assert!(report.is_success());
        // one tree on 2 and 3 vertices, two on 4
        assert_eq!(report.written.len(), 4);

        let mut names: Vec<String> = report
            .written
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(String::from))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "colorings_2_2",
                "colorings_2_3_2",
                "colorings_2_4_22",
                "colorings_2_4_23"
            ]
        );

        for path in &report.written {
            let artifact = read_artifact(path, &Alphabet::default()).unwrap();
            let tree = artifact.tree().unwrap();
            let group = ForestOracle
                .automorphism_group_order(&crate::colored::encode_uncolored(&tree))
                .unwrap();
            let orbits: u128 = artifact
                .classes
                .iter()
                .map(|c| group / c.automorphism_order)
                .sum();
            assert_eq!(orbits, 1u128 << tree.num_vertices());
        }
    }

    #[test]
    fn test_single_edge_artifact_content() {
        let dir = TempDir::new().unwrap();
        let config = EnumerationConfig {
            max_vertices: 2,
            ..config(&dir)
        };
        let driver = Driver::new(ForestOracle, FreeTrees, config, Alphabet::default()).unwrap();

        let report = driver.run().unwrap();
        assert_eq!(report.written, vec![dir.path().join("colorings_2_2")]);
        assert_eq!(
            fs::read_to_string(&report.written[0]).unwrap(),
            "\n11,2\n12,1\n22,2\nSTOP\n"
        );
    }

    #[test]
    fn test_failing_shape_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let triangle = Graph::new(3, [(0, 1), (1, 2), (0, 2)]).unwrap();
        let trees = Listed(vec![Graph::path(2), triangle, Graph::star(4)]);
        let driver = Driver::new(ForestOracle, trees, config(&dir), Alphabet::default()).unwrap();

        let report = driver.run().unwrap();
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].vertices, 3);
        assert!(!report.is_success());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_parallel_colorings_agree() {
        let sequential_dir = TempDir::new().unwrap();
        let parallel_dir = TempDir::new().unwrap();
        let parallel = EnumerationConfig {
            parallel_colorings: true,
            ..config(&parallel_dir)
        };

        let sequential = Driver::new(
            ForestOracle,
            FreeTrees,
            config(&sequential_dir),
            Alphabet::default(),
        )
        .unwrap()
            .run()
            .unwrap();
        let parallel = Driver::new(ForestOracle, FreeTrees, parallel, Alphabet::default())
            .unwrap()
            .run()
            .unwrap();

        for (a, b) in sequential.written.iter().zip(&parallel.written) {
            let mut a = read_artifact(a, &Alphabet::default()).unwrap().classes;
            let mut b = read_artifact(b, &Alphabet::default()).unwrap().classes;
            a.sort_by_key(|c| c.automorphism_order);
            b.sort_by_key(|c| c.automorphism_order);
            assert_eq!(
                a.iter().map(|c| c.automorphism_order).collect::<Vec<_>>(),
                b.iter().map(|c| c.automorphism_order).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_proper_mode() {
        let dir = TempDir::new().unwrap();
        let config = EnumerationConfig {
            max_vertices: 3,
            mode: ColoringMode::Proper,
            ..config(&dir)
        };
        let driver = Driver::new(ForestOracle, FreeTrees, config, Alphabet::default()).unwrap();

        let report = driver.run().unwrap();
        let path3 = dir.path().join("colorings_2_3_2");
        assert!(report.written.contains(&path3));
        assert_eq!(
            fs::read_to_string(path3).unwrap(),
            "2\n121,2\n212,2\nSTOP\n"
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let config = EnumerationConfig {
            colors: 3,
            ..config(&dir)
        };
        let result = Driver::new(ForestOracle, FreeTrees, config, Alphabet::new("12").unwrap());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
