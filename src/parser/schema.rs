//! samply/Firefox Profiler JSON schema (input side).
//!
//! This is the processed-profile format: columnar tables referencing each
//! other by index, with a per-thread string array holding all names. Only the
//! tables the aggregation needs are modeled; everything else in the capture is
//! ignored during deserialization.
//!
//! Every table carries `#[serde(default)]` so a partially-shaped capture
//! degrades to empty tables instead of failing the whole load. Index columns
//! are signed because processed profiles use negative sentinels for "no
//! entry" in some writers; [`table_index`] treats those as absent.

use serde::Deserialize;

/// Top-level profile capture
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    /// Shared library table, in declaration order
    pub libs: Vec<LibraryInfo>,

    /// One entry per profiled thread
    pub threads: Vec<Thread>,
}

/// A mapped library and its address range
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LibraryInfo {
    pub name: Option<String>,
    pub debug_name: Option<String>,
    pub path: Option<String>,

    /// Start of the mapped range
    pub start: u64,

    /// End of the mapped range, exclusive; absent means unbounded upward
    pub end: Option<u64>,
}

/// Per-thread tables
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thread {
    pub name: String,
    pub samples: SampleTable,
    pub stack_table: StackTable,
    pub frame_table: FrameTable,
    pub func_table: FuncTable,
    pub native_symbols: NativeSymbolTable,

    /// All strings referenced by index from the tables above
    pub string_array: Vec<String>,
}

/// Captured samples; `stack[i]` points into the stack table, null when the
/// sampler recorded no stack
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SampleTable {
    pub stack: Vec<Option<i64>>,
}

/// Stack nodes as (frame, parent) pairs; `prefix` is null at the root
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StackTable {
    pub frame: Vec<i64>,
    pub prefix: Vec<Option<i64>>,
}

/// Frames, referencing a declared function, a native symbol, and/or a raw
/// address (parallel columns keyed by frame index)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameTable {
    pub func: Vec<Option<i64>>,
    pub native_symbol: Vec<Option<i64>>,
    pub address: Vec<Option<i64>>,
}

/// Declared functions; `name[i]` indexes the thread's string array
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FuncTable {
    pub name: Vec<Option<i64>>,
}

/// Resolved machine-code symbols; `name` indexes the string array,
/// `lib_index` the declaration-ordered library table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NativeSymbolTable {
    pub name: Vec<Option<i64>>,
    pub lib_index: Vec<Option<i64>>,
}

/// Convert a raw index column value into a usable table index.
///
/// Null and negative sentinels both mean "no entry".
pub fn table_index(value: Option<i64>) -> Option<usize> {
    value.and_then(|v| usize::try_from(v).ok())
}
