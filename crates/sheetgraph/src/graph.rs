//! Dependency graph over the sheet's cell table
//!
//! Edges live on the cells themselves: `referenced` points at the cells a
//! formula reads, `dependents` is the exact inverse. Positions act as stable
//! handles; a cell stays in the table while anything depends on it, so every
//! edge always names a stored cell.

use crate::cell::Cell;
use ahash::{AHashMap, AHashSet};
use sheetgraph_core::Position;

pub(crate) type CellTable = AHashMap<Position, Cell>;

/// Check whether giving `this` the outgoing edges `references` closes a cycle
///
/// A cycle appears exactly when one of the new targets already depends on
/// `this`, directly or transitively (or is `this` itself). The search walks
/// `dependents` edges from `this` and stops at the first target it meets.
/// Runs before any edge is touched.
pub(crate) fn creates_cycle(cells: &CellTable, this: Position, references: &[Position]) -> bool {
    if references.is_empty() {
        return false;
    }

    let targets: AHashSet<Position> = references.iter().copied().collect();
    let mut visited = AHashSet::new();
    let mut stack = vec![this];

    while let Some(current) = stack.pop() {
        if targets.contains(&current) {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(cell) = cells.get(&current) {
            stack.extend(
                cell.dependents
                    .iter()
                    .copied()
                    .filter(|dependent| !visited.contains(dependent)),
            );
        }
    }

    false
}

/// Replace the outgoing edges of `this` with `references`
///
/// Referenced positions without a stored cell get an empty placeholder so
/// the inverse edge has somewhere to live. `this` must already be stored.
pub(crate) fn replace_references(cells: &mut CellTable, this: Position, references: &[Position]) {
    let old = cells
        .get_mut(&this)
        .map(|cell| std::mem::take(&mut cell.referenced))
        .unwrap_or_default();

    for pos in old {
        if let Some(cell) = cells.get_mut(&pos) {
            cell.dependents.remove(&this);
        }
    }

    for &pos in references {
        cells.entry(pos).or_default().dependents.insert(this);
    }

    if let Some(cell) = cells.get_mut(&this) {
        cell.referenced = references.iter().copied().collect();
    }
}

/// Invalidate the cache of `start` and of everything downstream of it
///
/// `start` is always invalidated. A dependent is only descended into when it
/// actually held a cache: a dependent that was already stale had its own
/// dependents invalidated when it became stale. Returns the number of cells
/// visited.
pub(crate) fn invalidate_from(cells: &mut CellTable, start: Position) -> usize {
    let mut stack = Vec::new();
    let mut visited = 0;

    if let Some(cell) = cells.get_mut(&start) {
        cell.invalidate_cache();
        stack.extend(cell.dependents.iter().copied());
        visited += 1;
    }

    while let Some(pos) = stack.pop() {
        let Some(cell) = cells.get_mut(&pos) else {
            continue;
        };
        if cell.invalidate_cache() {
            visited += 1;
            stack.extend(cell.dependents.iter().copied());
        }
    }

    visited
}

/// Formula cells without a cached result that reading `start` would compute,
/// precedents before their dependents
///
/// Evaluating in this order means every lookup finds its precedents already
/// cached, so evaluation never nests deeper than one cell however long the
/// reference chain is. `start` comes last when it is stale itself.
pub(crate) fn stale_precedents(cells: &CellTable, start: Position) -> Vec<Position> {
    let mut order = Vec::new();
    let mut visited = AHashSet::new();
    let mut stack = vec![(start, false)];

    while let Some((pos, expanded)) = stack.pop() {
        if expanded {
            order.push(pos);
            continue;
        }
        if !visited.insert(pos) {
            continue;
        }
        let Some(cell) = cells.get(&pos) else {
            continue;
        };
        if cell.has_cache() {
            continue;
        }

        stack.push((pos, true));
        stack.extend(
            cell.referenced
                .iter()
                .filter(|precedent| !visited.contains(*precedent))
                .map(|&precedent| (precedent, false)),
        );
    }

    order
}
