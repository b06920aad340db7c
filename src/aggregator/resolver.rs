//! Frame resolution against the capture's library and symbol tables.
//!
//! A frame is resolved to a `(function name, library name)` pair by falling
//! through three strategies: native symbol table, declared function table,
//! raw address. Absence at every level degrades to the literal `"unknown"`;
//! nothing in here returns an error.

use crate::demangle::normalize;
use crate::parser::schema::{table_index, LibraryInfo, Thread};
use std::path::Path;

/// One library's address range and display name
#[derive(Debug, Clone)]
struct LibraryRange {
    start: u64,
    end: Option<u64>,
    name: String,
}

/// Address-range and positional lookup over the capture's library table.
///
/// Keeps two views: declaration order (native symbols reference libraries by
/// positional index) and start-address order (for raw-address fallback).
#[derive(Debug, Clone)]
pub struct LibraryIndex {
    by_index: Vec<LibraryRange>,
    by_addr: Vec<LibraryRange>,
}

impl LibraryIndex {
    pub fn new(libs: &[LibraryInfo]) -> Self {
        let by_index: Vec<LibraryRange> = libs
            .iter()
            .map(|lib| LibraryRange {
                start: lib.start,
                end: lib.end,
                name: display_name(lib),
            })
            .collect();

        let mut by_addr = by_index.clone();
        by_addr.sort_by_key(|range| range.start);

        Self { by_index, by_addr }
    }

    /// Number of libraries in the capture
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Library display name at a declaration-order position
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.by_index.get(index).map(|range| range.name.as_str())
    }

    /// Map an address to the first library whose `[start, end)` range
    /// contains it, scanning in ascending start order.
    ///
    /// An absent `end` is unbounded upward. Ranges are assumed disjoint but
    /// this does not enforce it.
    pub fn lookup_address(&self, addr: u64) -> &str {
        for range in &self.by_addr {
            if range.start <= addr && range.end.map_or(true, |end| addr < end) {
                return &range.name;
            }
        }
        "unknown"
    }
}

/// Pick a display name: explicit name, debug name, then path basename.
fn display_name(lib: &LibraryInfo) -> String {
    non_empty(lib.name.as_deref())
        .or_else(|| non_empty(lib.debug_name.as_deref()))
        .map(str::to_string)
        .or_else(|| path_basename(lib.path.as_deref()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn path_basename(path: Option<&str>) -> Option<String> {
    path.and_then(|p| Path::new(p).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Resolve a frame index to a demangled `(function name, library name)` pair.
///
/// Strategies, in order:
/// 1. Native symbol: name from the string array, library by positional index.
///    An out-of-range library index leaves the library `"unknown"` without
///    failing the name.
/// 2. Declared function from the func table. A library found in step 1
///    survives into this step.
/// 3. Raw address: library via range lookup, name synthesized as `0x<hex>`.
///
/// Empty string-table entries count as unresolved and fall through.
pub fn resolve_frame(libs: &LibraryIndex, thread: &Thread, frame_idx: usize) -> (String, String) {
    let strings = &thread.string_array;
    let frames = &thread.frame_table;

    let mut name: Option<&str> = None;
    let mut library = "unknown";

    // Strategy 1: native symbol
    if let Some(ns_idx) = table_index(frames.native_symbol.get(frame_idx).copied().flatten()) {
        let symbols = &thread.native_symbols;
        if ns_idx < symbols.name.len() {
            if let Some(name_idx) = table_index(symbols.name.get(ns_idx).copied().flatten()) {
                name = non_empty(strings.get(name_idx).map(String::as_str));
            }
            if let Some(lib_idx) = table_index(symbols.lib_index.get(ns_idx).copied().flatten()) {
                if let Some(lib_name) = libs.name_at(lib_idx) {
                    library = lib_name;
                }
            }
        }
    }

    // Strategy 2: declared function
    if name.is_none() {
        if let Some(func_idx) = table_index(frames.func.get(frame_idx).copied().flatten()) {
            if let Some(name_idx) =
                table_index(thread.func_table.name.get(func_idx).copied().flatten())
            {
                name = non_empty(strings.get(name_idx).map(String::as_str));
            }
        }
    }

    // Strategy 3: raw address
    if name.is_none() {
        let addr = frames
            .address
            .get(frame_idx)
            .copied()
            .flatten()
            .and_then(|a| u64::try_from(a).ok());
        if let Some(addr) = addr {
            let library = libs.lookup_address(addr).to_string();
            return (normalize(Some(&format!("0x{addr:x}"))), library);
        }
    }

    (normalize(name), library.to_string())
}
