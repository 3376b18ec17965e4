//! The per-tree artifact file.
//!
//! ```text
//! <fingerprint symbols>
//! <coloring symbols>,<automorphism order>
//! ...
//! STOP
//! ```
//!
//! Symbols come from a fixed ordered [`Alphabet`]; an index outside it is a hard error, raised
//! before anything touches the filesystem. Files are written to a temporary file in the
//! target directory and renamed into place, so a failed write leaves nothing behind.
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::coloring::Coloring;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::partition::IsomorphismClass;

pub const DEFAULT_SYMBOLS: &str = "123456789abcdefghijklmnopqrstu";
pub const TERMINATOR: &str = "STOP";

/// An ordered list of distinct symbols; index `i` is written as the `i`-th symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet {
            symbols: DEFAULT_SYMBOLS.chars().collect(),
        }
    }
}

impl Alphabet {
    /// `None` for an empty alphabet, repeated symbols, or symbols that would clash with the
    /// file layout (`,` and whitespace).
    pub fn new(symbols: &str) -> Option<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty()
            || symbols.iter().any(|&c| c == ',' || c.is_whitespace())
            || symbols
                .iter()
                .enumerate()
                .any(|(i, c)| symbols[..i].contains(c))
        {
            return None;
        }
        Some(Alphabet { symbols })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(Error::AlphabetExhausted {
                index,
                len: self.symbols.len(),
            })
    }

    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&c| c == symbol)
    }

    pub fn encode(&self, indices: &[usize]) -> Result<String> {
        indices.iter().map(|&i| self.symbol(i)).collect()
    }

    pub fn decode(&self, text: &str) -> Option<Vec<usize>> {
        text.chars().map(|c| self.index_of(c)).collect()
    }
}

/// The Prüfer sequence of `tree`, spelled in `alphabet`.
pub fn fingerprint(tree: &Graph, alphabet: &Alphabet) -> Result<String> {
    alphabet.encode(&tree.prufer_code()?)
}

/// `<prefix>_<colors>_<n>_<fingerprint>`, dropping the last part when the fingerprint is
/// empty.
pub fn artifact_name(
    prefix: &str,
    num_colors: usize,
    tree: &Graph,
    alphabet: &Alphabet,
) -> Result<String> {
    let fingerprint = fingerprint(tree, alphabet)?;
    let n = tree.num_vertices();
    Ok(if fingerprint.is_empty() {
        format!("{prefix}_{num_colors}_{n}")
    } else {
        format!("{prefix}_{num_colors}_{n}_{fingerprint}")
    })
}

/// The complete artifact text.
pub fn render(
    tree: &Graph,
    classes: &[IsomorphismClass<Coloring>],
    alphabet: &Alphabet,
) -> Result<String> {
    let mut out = fingerprint(tree, alphabet)?;
    out.push('\n');
    for class in classes {
        out.push_str(&alphabet.encode(class.representative.as_slice())?);
        out.push(',');
        out.push_str(&class.automorphism_order.to_string());
        out.push('\n');
    }
    out.push_str(TERMINATOR);
    out.push('\n');
    Ok(out)
}

/// Render and atomically replace `path`.
pub fn write_artifact(
    path: &Path,
    tree: &Graph,
    classes: &[IsomorphismClass<Coloring>],
    alphabet: &Alphabet,
) -> Result<()> {
    let content = render(tree, classes, alphabet)?;

    let io = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io)?;
    file.write_all(content.as_bytes()).map_err(io)?;
    file.as_file().sync_all().map_err(io)?;
    file.persist(path).map_err(|e| io(e.error))?;

    debug!(path = %path.display(), classes = classes.len(), "wrote artifact");
    Ok(())
}

/// A parsed artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub fingerprint: Vec<usize>,
    pub classes: Vec<IsomorphismClass<Coloring>>,
}

impl Artifact {
    pub fn parse(content: &str, alphabet: &Alphabet) -> Result<Self> {
        let parse_error = |line: usize, message: String| Error::Parse { line, message };
        let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l));

        let (_, first) = lines
            .next()
            .ok_or_else(|| parse_error(1, "empty artifact".into()))?;
        // older artifacts end the fingerprint line with a comma
        let first = first.strip_suffix(',').unwrap_or(first);
        let fingerprint = alphabet
            .decode(first)
            .ok_or_else(|| parse_error(1, format!("unknown symbol in fingerprint '{first}'")))?;

        let mut classes = Vec::new();
        let mut terminated = false;
        for (number, line) in lines.by_ref() {
            if line == TERMINATOR {
                terminated = true;
                break;
            }

            let (symbols, order) = line
                .rsplit_once(',')
                .ok_or_else(|| parse_error(number, format!("expected '<coloring>,<order>', got '{line}'")))?;
            let colors = alphabet
                .decode(symbols)
                .ok_or_else(|| parse_error(number, format!("unknown symbol in '{symbols}'")))?;
            let automorphism_order: u128 = order
                .parse()
                .map_err(|e| parse_error(number, format!("bad order '{order}': {e}")))?;

            classes.push(IsomorphismClass {
                representative: Coloring::new(colors),
                automorphism_order,
            });
        }

        if !terminated {
            return Err(parse_error(
                content.lines().count(),
                format!("missing {TERMINATOR} line"),
            ));
        }
        if let Some((number, line)) = lines.find(|(_, l)| !l.trim().is_empty()) {
            return Err(parse_error(number, format!("content after {TERMINATOR}: '{line}'")));
        }

        Ok(Artifact {
            fingerprint,
            classes,
        })
    }

    /// The labelled tree the fingerprint encodes.
    ///
    /// The single vertex and the single edge both have an empty fingerprint; their size is
    /// read off the representatives, or for the colorless trivial class off its order.
    pub fn tree(&self) -> Result<Graph> {
        if !self.fingerprint.is_empty() {
            return Ok(Graph::from_prufer(&self.fingerprint)?);
        }
        let Some(first) = self.classes.first() else {
            return Err(Error::Parse {
                line: 2,
                message: "no classes to size an empty fingerprint".to_string(),
            });
        };
        match (first.representative.len(), first.automorphism_order) {
            (1, _) | (0, 1) => Ok(Graph::path(1)),
            _ => Ok(Graph::from_prufer(&[])?),
        }
    }
}

pub fn read_artifact(path: &Path, alphabet: &Alphabet) -> Result<Artifact> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Artifact::parse(&content, alphabet)
}
