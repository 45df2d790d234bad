//! Public library surface (spec §6.1 / §6). The teacher ships a bin-only
//! crate; a lib target is added here because the daemon this core is meant
//! to sit behind consumes these five entry points directly, in-process,
//! not through a CLI subprocess boundary.

mod cfg;
mod dfg;
mod errors;
mod lang;
mod model;
mod parse;
mod pdg;
mod reach;

pub use errors::{AnalysisError, AnalysisResult, Context};
pub use model::{
    BlockId, BlockType, CFGBlock, CFGEdge, CFGInfo, DataflowEdge, DepType, Dependencies, DFGInfo,
    EdgeType, PDGEdge, PDGInfo, PDGNode, PDGNodeType, RefType, VarRef,
};

use std::path::Path;

/// Parses and builds the CFG, tagging any failure as `cfg_extraction_failed`
/// with the original cause attached (§7). Shared by all three `extract_*`
/// entry points so the wrap is applied exactly once at the root.
fn parse_and_build_cfg(
    file_path: &Path,
    function_name: &str,
) -> AnalysisResult<(parse::ParsedFunction, CFGInfo)> {
    let parsed = parse::parse_function(file_path, function_name).map_err(|source| {
        AnalysisError::CfgExtractionFailed {
            path: file_path.to_owned(),
            function: function_name.to_owned(),
            source: Box::new(source),
        }
    })?;
    let cfg = cfg::build_cfg(&parsed, function_name);
    Ok((parsed, cfg))
}

/// spec §6 entry point 1.
pub fn extract_cfg(file_path: &Path, function_name: &str) -> AnalysisResult<CFGInfo> {
    let (_, cfg) = parse_and_build_cfg(file_path, function_name)?;
    Ok(cfg)
}

/// spec §6 entry point 2. Internally consumes `extract_cfg`: the reaching-
/// definitions pass that fills in `dataflow_edges` needs the CFG's block
/// boundaries and edges, not just the per-language def/use stream. A
/// failure at that stage is re-tagged `dfg_extraction_failed`, carrying the
/// `cfg_extraction_failed` it chained from as its `source` (§7).
pub fn extract_dfg(file_path: &Path, function_name: &str) -> AnalysisResult<DFGInfo> {
    let (parsed, cfg) =
        parse_and_build_cfg(file_path, function_name).map_err(|source| {
            AnalysisError::DfgExtractionFailed {
                path: file_path.to_owned(),
                function: function_name.to_owned(),
                source: Box::new(source),
            }
        })?;
    let mut dfg = dfg::extract_dfg(&parsed, function_name);
    dfg.dataflow_edges = reach::compute(&cfg, &dfg.var_refs);
    Ok(dfg)
}

/// spec §6 entry point 3. Consumes both `extract_cfg` and `extract_dfg`;
/// per §7 the PDG layer wraps upstream errors without inspecting them, so
/// any failure here is whatever `parse_and_build_cfg` already produced,
/// forwarded unchanged rather than tagged with a third wrapper kind.
pub fn extract_pdg(file_path: &Path, function_name: &str) -> AnalysisResult<PDGInfo> {
    let (parsed, cfg) = parse_and_build_cfg(file_path, function_name)?;
    let mut dfg = dfg::extract_dfg(&parsed, function_name);
    dfg.dataflow_edges = reach::compute(&cfg, &dfg.var_refs);
    Ok(pdg::build_pdg(function_name, cfg, dfg))
}

/// spec §6 entry point 4. Slicing never errors (§7); a missing line or var
/// just yields an empty slice.
pub fn backward_slice(pdg: &PDGInfo, line: usize, var: Option<&str>) -> Vec<usize> {
    pdg::backward_slice(pdg, line, var)
}

pub fn forward_slice(pdg: &PDGInfo, line: usize, var: Option<&str>) -> Vec<usize> {
    pdg::forward_slice(pdg, line, var)
}

/// spec §6 entry point 5.
pub fn get_dependencies(pdg: &PDGInfo, line: usize) -> Dependencies {
    pdg::get_dependencies(pdg, line)
}

pub fn get_variable_names(pdg: &PDGInfo) -> Vec<String> {
    pdg::get_variable_names(pdg)
}

pub fn find_nodes_by_variable<'a>(pdg: &'a PDGInfo, name: &str) -> Vec<&'a BlockId> {
    pdg::find_nodes_by_variable(pdg, name)
}

pub fn get_node_at_line<'a>(pdg: &'a PDGInfo, line: usize) -> Option<&'a BlockId> {
    pdg::get_node_at_line(pdg, line)
}

pub fn get_all_nodes_at_line<'a>(pdg: &'a PDGInfo, line: usize) -> Vec<&'a BlockId> {
    pdg::get_all_nodes_at_line(pdg, line)
}
