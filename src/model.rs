//! Data model shared by the CFG builder, def/use extractor, reaching-
//! definitions engine, and PDG builder. Field names match the JSON
//! stability contract: `id`, `type`, `start_line`, `end_line`, `statements`,
//! `source_id`, `target_id`, `edge_type`, `function_name`, `blocks`,
//! `edges`, `entry_block_id`, `exit_block_ids`, `cyclomatic_complexity`,
//! `name`, `ref_type`, `line`, `column`, `def_ref`, `use_ref`, `var_name`,
//! `var_refs`, `dataflow_edges`, `variables`, `imports`, `dep_type`,
//! `label`, `definitions`, `uses`, `cfg_block_id`, `nodes`, `cfg`, `dfg`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type BlockId = String;

/// Sentinel `target_id` for unresolved `break`/`continue`/`goto` edges
/// (spec §9 "unresolved jump targets").
pub const UNRESOLVED_TARGET: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Entry,
    Exit,
    Branch,
    LoopBody,
    Return,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Unconditional,
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
    BackEdge,
    Break,
    Continue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CFGBlock {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub start_line: usize,
    pub end_line: usize,
    pub statements: Vec<String>,
}

impl CFGBlock {
    pub fn push_statement(&mut self, text: &str, line: usize) {
        self.statements.push(text.to_owned());
        if self.end_line < line {
            self.end_line = line;
        }
        if self.start_line == 0 || line < self.start_line {
            self.start_line = line;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CFGEdge {
    pub source_id: BlockId,
    pub target_id: BlockId,
    pub edge_type: EdgeType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CFGInfo {
    pub function_name: String,
    pub blocks: BTreeMap<BlockId, CFGBlock>,
    pub edges: Vec<CFGEdge>,
    pub entry_block_id: BlockId,
    pub exit_block_ids: Vec<BlockId>,
    pub cyclomatic_complexity: u32,
}

impl CFGInfo {
    pub fn block(&self, id: &str) -> Option<&CFGBlock> {
        self.blocks.get(id)
    }

    /// Predecessor ids of `id` in the edge relation (ignores unresolved
    /// empty-sentinel targets).
    pub fn predecessors(&self, id: &str) -> Vec<&BlockId> {
        self.edges
            .iter()
            .filter(|e| e.target_id == id && !e.target_id.is_empty())
            .map(|e| &e.source_id)
            .collect()
    }

    pub fn successors(&self, id: &str) -> Vec<&BlockId> {
        self.edges
            .iter()
            .filter(|e| e.source_id == id && !e.target_id.is_empty())
            .map(|e| &e.target_id)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefType {
    Definition,
    Update,
    Use,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarRef {
    pub name: String,
    pub ref_type: RefType,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataflowEdge {
    pub def_ref: VarRef,
    pub use_ref: VarRef,
    pub var_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DFGInfo {
    pub function_name: String,
    pub var_refs: Vec<VarRef>,
    pub dataflow_edges: Vec<DataflowEdge>,
    pub variables: BTreeMap<String, Vec<VarRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imports: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PDGNodeType {
    Statement,
    Branch,
    Loop,
    Entry,
    Exit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PDGNode {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub node_type: PDGNodeType,
    pub start_line: usize,
    pub end_line: usize,
    pub definitions: Vec<VarRef>,
    pub uses: Vec<VarRef>,
    pub cfg_block_id: BlockId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepType {
    Control,
    Data,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PDGEdge {
    pub source_id: BlockId,
    pub target_id: BlockId,
    pub dep_type: DepType,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PDGInfo {
    pub function_name: String,
    pub cfg: CFGInfo,
    pub dfg: DFGInfo,
    pub nodes: BTreeMap<BlockId, PDGNode>,
    pub edges: Vec<PDGEdge>,
}

/// Return value of `get_dependencies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dependencies {
    pub control_in: Vec<PDGEdge>,
    pub control_out: Vec<PDGEdge>,
    pub data_in: Vec<PDGEdge>,
    pub data_out: Vec<PDGEdge>,
}

impl BlockType {
    pub fn to_pdg_node_type(self) -> PDGNodeType {
        match self {
            BlockType::Entry => PDGNodeType::Entry,
            BlockType::Exit => PDGNodeType::Exit,
            BlockType::Branch => PDGNodeType::Branch,
            BlockType::LoopBody => PDGNodeType::Loop,
            BlockType::Return | BlockType::Plain => PDGNodeType::Statement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_type_maps_to_pdg_node_type() {
        assert_eq!(BlockType::Return.to_pdg_node_type(), PDGNodeType::Statement);
        assert_eq!(BlockType::LoopBody.to_pdg_node_type(), PDGNodeType::Loop);
    }

    #[test]
    fn edge_type_serializes_to_spec_strings() {
        assert_eq!(serde_json::to_string(&EdgeType::True).unwrap(), "\"true\"");
        assert_eq!(
            serde_json::to_string(&EdgeType::BackEdge).unwrap(),
            "\"back_edge\""
        );
    }

    #[test]
    fn push_statement_extends_end_line() {
        let mut b = CFGBlock {
            id: "block_1".to_owned(),
            block_type: BlockType::Plain,
            start_line: 3,
            end_line: 3,
            statements: vec![],
        };
        b.push_statement("x = 1", 4);
        assert_eq!(b.end_line, 4);
        assert_eq!(b.statements, vec!["x = 1"]);
    }
}
