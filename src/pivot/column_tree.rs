use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{key_codec, KeyPath, PivotError};

/// How a leaf column behaves when its enclosing column group is toggled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandState {
    /// Shown only while the group is expanded
    Open,
    /// Shown only while the group is collapsed
    Closed,
    /// Always shown, there is no enclosing group
    #[default]
    None,
}

impl ExpandState {
    pub fn is_none(&self) -> bool {
        matches!(self, ExpandState::None)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafColumn {
    /// The flat identifier of the full key path, used as the row record field
    #[serde(rename = "field")]
    pub flat_id: String,
    #[serde(rename = "headerName")]
    pub display_name: String,
    #[serde(
        rename = "columnGroupShow",
        default,
        skip_serializing_if = "ExpandState::is_none"
    )]
    pub expand_state: ExpandState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupColumn {
    #[serde(rename = "groupId")]
    pub group_id: String,
    #[serde(rename = "headerName")]
    pub display_name: String,
    pub children: Vec<ColumnNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnNode {
    Group(GroupColumn),
    Leaf(LeafColumn),
}

type NodeId = usize;
type ListId = usize;

const ROOT: ListId = 0;

enum ArenaNode {
    Group { group_id: String, children: ListId },
    Leaf(LeafColumn),
}

/// Merges key paths into a column tree, grouping paths that share a prefix.
///
/// Nodes live in a flat arena and every sibling list is a list of node ids, so
/// inserting a path only ever appends to the lists it walks through.
pub struct ColumnTreeBuilder<'a> {
    expandable_leaves: &'a HashSet<String>,
    nodes: Vec<ArenaNode>,
    lists: Vec<Vec<NodeId>>,
}

impl<'a> ColumnTreeBuilder<'a> {
    pub fn new(expandable_leaves: &'a HashSet<String>) -> Self {
        Self {
            expandable_leaves,
            nodes: vec![],
            lists: vec![vec![]],
        }
    }

    pub fn insert(&mut self, key_path: &[String]) -> Result<(), PivotError> {
        let flat_id = key_codec::encode(key_path)?;
        let (column_name, groups) = key_path.split_last().ok_or(PivotError::EmptyKeyPath)?;

        if column_name.is_empty() {
            return Err(PivotError::MissingColumnName(key_path.to_vec()));
        }

        let mut list = ROOT;
        for segment in groups {
            list = self.find_or_insert_group(list, segment, key_path)?;
        }

        self.insert_leaf(list, column_name, flat_id, key_path)
    }

    pub fn build(&self) -> Vec<ColumnNode> {
        self.materialize(ROOT)
    }

    fn find_or_insert_group(
        &mut self,
        list: ListId,
        segment: &str,
        key_path: &[String],
    ) -> Result<ListId, PivotError> {
        for &id in &self.lists[list] {
            match &self.nodes[id] {
                ArenaNode::Group {
                    group_id,
                    children,
                } if group_id == segment => return Ok(*children),
                ArenaNode::Leaf(leaf) if leaf.display_name == segment => {
                    return Err(PivotError::ConflictingColumnPath(key_path.to_vec()))
                }
                _ => {}
            }
        }

        let children = self.lists.len();
        self.lists.push(vec![]);
        self.append(
            list,
            ArenaNode::Group {
                group_id: segment.to_owned(),
                children,
            },
        );

        Ok(children)
    }

    fn insert_leaf(
        &mut self,
        list: ListId,
        column_name: &str,
        flat_id: String,
        key_path: &[String],
    ) -> Result<(), PivotError> {
        for &id in &self.lists[list] {
            match &self.nodes[id] {
                ArenaNode::Leaf(leaf) if leaf.flat_id == flat_id => return Ok(()),
                ArenaNode::Group { group_id, .. } if group_id == column_name => {
                    return Err(PivotError::ConflictingColumnPath(key_path.to_vec()))
                }
                _ => {}
            }
        }

        let leaf = |expand_state| {
            ArenaNode::Leaf(LeafColumn {
                flat_id: flat_id.clone(),
                display_name: column_name.to_owned(),
                expand_state,
            })
        };

        if self.expandable_leaves.contains(column_name) {
            // collapsed aggregate first, then the copy revealed on expansion
            self.append(list, leaf(ExpandState::Closed));
            self.append(list, leaf(ExpandState::Open));
        } else if list == ROOT {
            self.append(list, leaf(ExpandState::None));
        } else {
            self.append(list, leaf(ExpandState::Open));
        }

        Ok(())
    }

    fn append(&mut self, list: ListId, node: ArenaNode) {
        let id = self.nodes.len();
        self.nodes.push(node);
        self.lists[list].push(id);
    }

    fn materialize(&self, list: ListId) -> Vec<ColumnNode> {
        self.lists[list]
            .iter()
            .map(|&id| match &self.nodes[id] {
                ArenaNode::Group {
                    group_id,
                    children,
                } => ColumnNode::Group(GroupColumn {
                    group_id: group_id.clone(),
                    display_name: group_id.clone(),
                    children: self.materialize(*children),
                }),
                ArenaNode::Leaf(leaf) => ColumnNode::Leaf(leaf.clone()),
            })
            .collect()
    }
}

/// Builds the hierarchical header definitions for the pivot result columns of one response.
pub fn build_pivot_columns(
    columns: &[KeyPath],
    expandable_leaves: &HashSet<String>,
) -> Result<Vec<ColumnNode>, PivotError> {
    let mut builder = ColumnTreeBuilder::new(expandable_leaves);
    for key_path in columns {
        builder.insert(key_path)?;
    }
    Ok(builder.build())
}
