//! Tree-pair input files
//!
//! Two line-oriented formats describe a source tree followed by a target
//! tree:
//!
//! - Parent records: per tree a count line `n`, then `n` lines
//!   `label parentIndex` where the index is 0-based within that tree and `-1`
//!   marks the root.
//! - Edge lists: `parentLabel childLabel` lines, labels naming nodes within a
//!   tree. The target tree starts after a comment containing `Tree 2`, or,
//!   when no such marker exists, after the first blank line following a
//!   source node. A line holding a single label declares a lone node.
//!
//! Lines starting with `#` are comments. Files ending in `.gz` are
//! decompressed on the fly.

use crate::tree::{NodeId, Tree, TreeError};
use atoi::FromRadix10SignedChecked;
use bstr::ByteSlice;
use flate2::read::MultiGzDecoder;
use lasso::Spur;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker comment that opens the target tree of an edge list
const TREE_2_MARKER: &str = "Tree 2";

/// Layout of an input file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// Parent records if the first content line is a lone integer, else edges
    #[default]
    Auto,
    ParentRecords,
    EdgeList,
}

/// Error while reading a tree pair
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input error: failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Input error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Input error at line {line}: label is not valid UTF-8")]
    Utf8 { line: usize },

    #[error("Input error: tree {tree} is missing")]
    MissingTree { tree: usize },

    #[error("Input error: tree {tree} has no root")]
    MissingRoot { tree: usize },

    #[error("Input error: tree {tree} has more than one root ({first}, {second})")]
    MultipleRoots {
        tree: usize,
        first: String,
        second: String,
    },

    #[error("Input error at line {line}: parent index {parent} does not name a record of tree {tree}")]
    DanglingParent { tree: usize, line: usize, parent: i64 },

    #[error("Input error at line {line}: node {label} of tree {tree} already has a parent")]
    MultipleParents {
        tree: usize,
        line: usize,
        label: String,
    },

    #[error("Input error: {unreached} nodes of tree {tree} are not reachable from the root")]
    Unreachable { tree: usize, unreached: usize },

    #[error("Input error: {0}")]
    Tree(#[from] TreeError),
}

/// Read a source/target tree pair from a file
pub fn read_tree_pair(
    path: impl AsRef<Path>,
    format: InputFormat,
) -> Result<(Tree, Tree), InputError> {
    let path = path.as_ref();
    let data = read_bytes(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", data.len(), path.display());
    parse_tree_pair(&data, format)
}

fn read_bytes(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        MultiGzDecoder::new(file).read_to_end(&mut data)?;
    } else {
        file.read_to_end(&mut data)?;
    }
    Ok(data)
}

/// Parse a source/target tree pair from an in-memory buffer
pub fn parse_tree_pair(data: &[u8], format: InputFormat) -> Result<(Tree, Tree), InputError> {
    let format = match format {
        InputFormat::Auto => detect_format(data)?,
        explicit => explicit,
    };
    log::debug!("parsing input as {:?}", format);

    match format {
        InputFormat::ParentRecords => parse_parent_records(data),
        _ => parse_edge_lists(data),
    }
}

fn detect_format(data: &[u8]) -> Result<InputFormat, InputError> {
    let Some((_, line)) = content_lines(data).next() else {
        return Err(InputError::MissingTree { tree: 1 });
    };
    let mut fields = line.fields();
    match (fields.next(), fields.next()) {
        (Some(field), None) if parse_int(field).is_some() => Ok(InputFormat::ParentRecords),
        _ => Ok(InputFormat::EdgeList),
    }
}

/// Trimmed lines with their 1-based line numbers
struct Lines<'a> {
    data: &'a [u8],
    pos: usize,
    line_num: usize,
}

impl<'a> Lines<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line_num: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let end = memchr::memchr(b'\n', rest).unwrap_or(rest.len());
        self.pos += end + 1;
        self.line_num += 1;
        Some((self.line_num, rest[..end].trim()))
    }
}

fn is_comment(line: &[u8]) -> bool {
    line.first() == Some(&b'#')
}

/// Lines that are neither blank nor comments
fn content_lines(data: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    Lines::new(data).filter(|(_, line)| !line.is_empty() && !is_comment(line))
}

/// Parse a whole field as a signed integer
fn parse_int(field: &[u8]) -> Option<i64> {
    match i64::from_radix_10_signed_checked(field) {
        (Some(value), used) if used == field.len() => Some(value),
        _ => None,
    }
}

fn to_label(line: usize, field: &[u8]) -> Result<&str, InputError> {
    field.to_str().map_err(|_| InputError::Utf8 { line })
}

fn parse_parent_records(data: &[u8]) -> Result<(Tree, Tree), InputError> {
    let mut lines = content_lines(data);
    let t1 = read_records(&mut lines, 1)?;
    let t2 = read_records(&mut lines, 2)?;

    if let Some((line, _)) = lines.next() {
        return Err(InputError::Syntax {
            line,
            message: "unexpected content after the second tree".to_string(),
        });
    }
    Ok((t1, t2))
}

/// Read one count line and its records
fn read_records<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a [u8])>,
    tree_no: usize,
) -> Result<Tree, InputError> {
    let Some((count_line, line)) = lines.next() else {
        return Err(InputError::MissingTree { tree: tree_no });
    };
    let count = parse_int(line)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| InputError::Syntax {
            line: count_line,
            message: format!("expected the node count of tree {}", tree_no),
        })?;

    let mut tree = Tree::new();
    let mut parents: Vec<(usize, i64)> = Vec::with_capacity(count);
    let mut last_line = count_line;
    for _ in 0..count {
        let Some((line_num, line)) = lines.next() else {
            return Err(InputError::Syntax {
                line: last_line,
                message: format!(
                    "tree {} declares {} records but only {} follow",
                    tree_no,
                    count,
                    parents.len()
                ),
            });
        };
        last_line = line_num;

        let mut fields = line.fields();
        let (Some(label), Some(parent), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(InputError::Syntax {
                line: line_num,
                message: "expected `label parentIndex`".to_string(),
            });
        };
        let parent = parse_int(parent).ok_or_else(|| InputError::Syntax {
            line: line_num,
            message: format!("invalid parent index: {}", parent.as_bstr()),
        })?;

        tree.create_node(to_label(line_num, label)?);
        parents.push((line_num, parent));
    }

    link_records(tree, &parents, tree_no)
}

fn link_records(
    mut tree: Tree,
    parents: &[(usize, i64)],
    tree_no: usize,
) -> Result<Tree, InputError> {
    let mut root: Option<NodeId> = None;
    for (id, &(line, parent)) in parents.iter().enumerate() {
        if parent == -1 {
            if let Some(first) = root {
                return Err(InputError::MultipleRoots {
                    tree: tree_no,
                    first: tree.label(first).to_string(),
                    second: tree.label(id).to_string(),
                });
            }
            root = Some(id);
            continue;
        }

        let parent_id = usize::try_from(parent)
            .ok()
            .filter(|&p| p < parents.len())
            .ok_or(InputError::DanglingParent {
                tree: tree_no,
                line,
                parent,
            })?;
        tree.add_child(parent_id, id)?;
    }

    let Some(root) = root else {
        return Err(InputError::MissingRoot { tree: tree_no });
    };
    finish_tree(tree, root, tree_no)
}

/// Set the root, number the tree and reject unreachable nodes
fn finish_tree(mut tree: Tree, root: NodeId, tree_no: usize) -> Result<Tree, InputError> {
    tree.set_root(root)?;
    let reached = tree.assign_preorder_and_depth();
    if reached != tree.len() {
        return Err(InputError::Unreachable {
            tree: tree_no,
            unreached: tree.len() - reached,
        });
    }
    Ok(tree)
}

/// Accumulates one tree from `parent child` lines
struct EdgeTreeBuilder {
    tree_no: usize,
    tree: Tree,
    by_label: FxHashMap<Spur, NodeId>,
    has_parent: Vec<bool>,
}

impl EdgeTreeBuilder {
    fn new(tree_no: usize) -> Self {
        Self {
            tree_no,
            tree: Tree::new(),
            by_label: FxHashMap::default(),
            has_parent: Vec::new(),
        }
    }

    /// Look up a node by label, creating it on first sight
    fn node_for(&mut self, label: &str) -> NodeId {
        let key = self.tree.intern(label);
        if let Some(&id) = self.by_label.get(&key) {
            return id;
        }
        let id = self.tree.create_node(label);
        self.by_label.insert(key, id);
        self.has_parent.push(false);
        id
    }

    fn add_edge(&mut self, line: usize, parent: &str, child: &str) -> Result<(), InputError> {
        let parent = self.node_for(parent);
        let child = self.node_for(child);
        if self.has_parent[child] {
            return Err(InputError::MultipleParents {
                tree: self.tree_no,
                line,
                label: self.tree.label(child).to_string(),
            });
        }
        self.tree.add_child(parent, child)?;
        self.has_parent[child] = true;
        Ok(())
    }

    fn finish(self) -> Result<Tree, InputError> {
        if self.tree.is_empty() {
            return Err(InputError::MissingTree { tree: self.tree_no });
        }

        let mut roots = self
            .has_parent
            .iter()
            .enumerate()
            .filter(|&(_, &has_parent)| !has_parent)
            .map(|(id, _)| id);
        let Some(root) = roots.next() else {
            return Err(InputError::MissingRoot { tree: self.tree_no });
        };
        if let Some(second) = roots.next() {
            return Err(InputError::MultipleRoots {
                tree: self.tree_no,
                first: self.tree.label(root).to_string(),
                second: self.tree.label(second).to_string(),
            });
        }

        finish_tree(self.tree, root, self.tree_no)
    }
}

fn parse_edge_lists(data: &[u8]) -> Result<(Tree, Tree), InputError> {
    let has_marker = Lines::new(data)
        .any(|(_, line)| is_comment(line) && line.contains_str(TREE_2_MARKER));

    let mut source = EdgeTreeBuilder::new(1);
    let mut target = EdgeTreeBuilder::new(2);
    let mut in_target = false;

    for (line_num, line) in Lines::new(data) {
        if line.is_empty() {
            if !has_marker && !source.tree.is_empty() {
                in_target = true;
            }
            continue;
        }
        if is_comment(line) {
            if line.contains_str(TREE_2_MARKER) {
                in_target = true;
            }
            continue;
        }

        let builder = if in_target { &mut target } else { &mut source };
        let mut fields = line.fields();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(label), None, None) => {
                builder.node_for(to_label(line_num, label)?);
            }
            (Some(parent), Some(child), None) => {
                let parent = to_label(line_num, parent)?;
                let child = to_label(line_num, child)?;
                builder.add_edge(line_num, parent, child)?;
            }
            _ => {
                return Err(InputError::Syntax {
                    line: line_num,
                    message: "expected `parentLabel childLabel`".to_string(),
                });
            }
        }
    }

    Ok((source.finish()?, target.finish()?))
}
