//! Hierarchical grouping (nest) and per-group reduction (rollup).
//!
//! Groups keep the order in which their key was first seen at each level;
//! nothing is sorted. A missing cell groups under the empty key.

use std::collections::HashMap;
use std::rc::Rc;

use vizgrid_model::{ColumnRef, Grid, Row};

use crate::cache::{ChecksumCache, DerivedView, SharedGrid};

/// Reduction applied to the rows of each leaf group.
pub type RollupFn<R> = dyn Fn(&Grid, &[&Row]) -> R;

#[derive(Debug, Clone, PartialEq)]
pub enum NestNode<T> {
    Branch(Vec<NestEntry<T>>),
    Leaf(T),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestEntry<T> {
    pub key: String,
    pub values: NestNode<T>,
}

impl<T> NestNode<T> {
    pub fn entries(&self) -> &[NestEntry<T>] {
        match self {
            Self::Branch(entries) => entries,
            Self::Leaf(_) => &[],
        }
    }

    pub fn leaf(&self) -> Option<&T> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Branch(_) => None,
        }
    }

    /// Child under `key` at this level.
    pub fn get(&self, key: &str) -> Option<&NestNode<T>> {
        self.entries()
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.values)
    }

    /// Descend through one key per level.
    pub fn get_path(&self, path: &[&str]) -> Option<&NestNode<T>> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries().iter().map(|entry| entry.key.as_str())
    }

    /// Visit every leaf with its key path, depth first in group order.
    pub fn for_each_leaf<'a>(&'a self, mut visit: impl FnMut(&[String], &'a T)) {
        fn walk<'a, T>(
            node: &'a NestNode<T>,
            path: &mut Vec<String>,
            visit: &mut dyn FnMut(&[String], &'a T),
        ) {
            match node {
                NestNode::Leaf(value) => visit(path, value),
                NestNode::Branch(entries) => {
                    for entry in entries {
                        path.push(entry.key.clone());
                        walk(&entry.values, path, visit);
                        path.pop();
                    }
                }
            }
        }
        walk(self, &mut Vec::new(), &mut visit);
    }
}

/// Keyed access to a computed nest, in first-seen key order.
#[derive(Debug, Clone)]
pub struct NestMap<T> {
    root: Rc<NestNode<T>>,
}

impl<T> NestMap<T> {
    pub fn get(&self, key: &str) -> Option<&NestNode<T>> {
        self.root.get(key)
    }

    pub fn get_path(&self, path: &[&str]) -> Option<&NestNode<T>> {
        self.root.get_path(path)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.root.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.root.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split rows by the value in `column`, keeping first-seen key order.
pub fn group_rows<'a>(rows: &[&'a Row], column: usize) -> Vec<(String, Vec<&'a Row>)> {
    let mut groups: Vec<(String, Vec<&'a Row>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for &row in rows {
        let key = row.get(column).map_or("", |cell| cell.raw());
        match index.get(key) {
            Some(&pos) => groups[pos].1.push(row),
            None => {
                index.insert(key, groups.len());
                groups.push((key.to_string(), vec![row]));
            }
        }
    }
    groups
}

/// Flat multi-column grouping: one entry per distinct key tuple, in
/// first-seen order.
pub fn group_by_keys<'a>(rows: &[&'a Row], columns: &[usize]) -> Vec<(Vec<String>, Vec<&'a Row>)> {
    let mut groups: Vec<(Vec<String>, Vec<&'a Row>)> = Vec::new();
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    for &row in rows {
        let key: Vec<String> = columns
            .iter()
            .map(|&c| row.get(c).map_or("", |cell| cell.raw()).to_string())
            .collect();
        match index.get(&key) {
            Some(&pos) => groups[pos].1.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }
    groups
}

/// Build the nest tree for `rows` over `columns`.
pub fn nest<R>(grid: &Grid, rows: &[&Row], columns: &[usize], rollup: &RollupFn<R>) -> NestNode<R> {
    match columns.split_first() {
        None => NestNode::Leaf(rollup(grid, rows)),
        Some((&column, rest)) => NestNode::Branch(
            group_rows(rows, column)
                .into_iter()
                .map(|(key, group)| NestEntry {
                    key,
                    values: nest(grid, &group, rest, rollup),
                })
                .collect(),
        ),
    }
}

/// One flattened rollup group.
#[derive(Debug, Clone, PartialEq)]
pub struct RollupRow<R> {
    pub keys: Vec<String>,
    pub value: R,
}

/// One flattened source row with its group path.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedRow {
    pub keys: Vec<String>,
    pub row: Row,
}

/// Grouping with a custom per-group reduction.
pub struct RollupView<R> {
    grid: SharedGrid,
    columns: Vec<ColumnRef>,
    rollup: Box<RollupFn<R>>,
    cache: ChecksumCache<NestNode<R>>,
}

impl<R> RollupView<R> {
    pub fn new(
        grid: &SharedGrid,
        columns: Vec<ColumnRef>,
        rollup: impl Fn(&Grid, &[&Row]) -> R + 'static,
    ) -> Self {
        Self {
            grid: Rc::clone(grid),
            columns,
            rollup: Box::new(rollup),
            cache: ChecksumCache::new(),
        }
    }

    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    /// The grouped tree. Unresolvable columns are reported and skipped.
    pub fn entries(&self) -> Rc<NestNode<R>> {
        self.cache.resolve(&self.grid, |grid| {
            let columns: Vec<usize> = self
                .columns
                .iter()
                .filter_map(|column| grid.resolve_or_report(column))
                .collect();
            let rows: Vec<&Row> = grid.data().iter().collect();
            nest(grid, &rows, &columns, self.rollup.as_ref())
        })
    }

    pub fn map(&self) -> NestMap<R> {
        NestMap {
            root: self.entries(),
        }
    }
}

impl<R: Clone> RollupView<R> {
    /// One row per leaf group: its key path and rolled-up value.
    pub fn data(&self) -> Vec<RollupRow<R>> {
        let root = self.entries();
        let mut out = Vec::new();
        root.for_each_leaf(|keys, value| {
            out.push(RollupRow {
                keys: keys.to_vec(),
                value: value.clone(),
            });
        });
        out
    }
}

impl<R> DerivedView for RollupView<R> {
    fn source(&self) -> &SharedGrid {
        &self.grid
    }

    fn is_stale(&self) -> bool {
        !self.cache.is_fresh(self.checksum())
    }

    fn invalidate(&self) {
        self.cache.invalidate();
    }
}

/// Grouping whose leaves hold the grouped rows themselves.
pub struct NestView {
    inner: RollupView<Vec<Row>>,
}

impl NestView {
    pub fn new(grid: &SharedGrid, columns: Vec<ColumnRef>) -> Self {
        Self {
            inner: RollupView::new(grid, columns, |_, rows: &[&Row]| {
                rows.iter().map(|row| (*row).clone()).collect()
            }),
        }
    }

    pub fn columns(&self) -> &[ColumnRef] {
        self.inner.columns()
    }

    pub fn entries(&self) -> Rc<NestNode<Vec<Row>>> {
        self.inner.entries()
    }

    pub fn map(&self) -> NestMap<Vec<Row>> {
        self.inner.map()
    }

    /// Every source row, in group order, with its key path.
    pub fn data(&self) -> Vec<NestedRow> {
        let root = self.entries();
        let mut out = Vec::new();
        root.for_each_leaf(|keys, rows| {
            out.extend(rows.iter().map(|row| NestedRow {
                keys: keys.to_vec(),
                row: row.clone(),
            }));
        });
        out
    }
}

impl DerivedView for NestView {
    fn source(&self) -> &SharedGrid {
        self.inner.source()
    }

    fn is_stale(&self) -> bool {
        self.inner.is_stale()
    }

    fn invalidate(&self) {
        self.inner.invalidate();
    }
}
